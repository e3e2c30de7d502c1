//! Families computed from the age and field-size dependent cone model.

use crate::spectral::{
    CHROMATICITY_CHANNELS, CmfError, CmfResult, ConeFundamentals, Domain, DomainParams, Info,
    LMS_CHANNELS, MACLEOD_BOYNTON_CHANNELS, MAXWELLIAN_CHANNELS, MacLeodBoynton, Mat3, Maxwellian,
    Precision, Projection, SpectralTable, TangentPoint, Vec3, XYZ_CHANNELS, XyzTransform,
    chromaticity, chromaticity_purples, log10_table, project, purple_fractions, round3,
    round_purples, tangent_points, tangent_rows, tristimulus_purples,
};

use super::output::{Output, PurpleOutput};
use super::{
    CHROMATICITY_PRECISION, COORDINATE_PRECISION, LMS_LOG_BASE_PRECISION, LMS_LOG_PRECISION,
    LMS_PRECISION, NORM_PRECISION, PhysiologicalRequest, Resolution, TRISTIMULUS_PRECISION, finish,
};

/// `(x, y)` plane of a chromaticity table.
const XY_PLANE: [usize; 2] = [0, 1];

fn lms_sums(cones: &ConeFundamentals, domain: &Domain) -> Vec3 {
    cones
        .sample_points(domain)
        .into_iter()
        .fold(Vec3::ZERO, |acc, (_, lms)| acc + lms)
}

fn degenerate_white() -> CmfError {
    CmfError::DegenerateSample {
        wavelength: f64::NAN,
    }
}

pub(super) fn lms(request: &PhysiologicalRequest, resolution: Resolution) -> CmfResult<Output> {
    let domain = resolution.grid(request.domain)?;
    let cones = ConeFundamentals::new(request.observer)?;
    let mut table = cones.sample(&domain);

    let flags = request.flags;
    let precision = match (flags.log, flags.base) {
        (false, false) => LMS_PRECISION,
        (false, true) => Precision::BASE,
        (true, false) => LMS_LOG_PRECISION,
        (true, true) => LMS_LOG_BASE_PRECISION,
    };
    if flags.log {
        table = log10_table(&table)?;
    }
    Ok(finish(table, Vec::new(), precision, resolution))
}

// ─────────────────────────────────────────────────────────────────────────────
// MacLeod-Boynton and Maxwellian
// ─────────────────────────────────────────────────────────────────────────────

fn macleod_boynton_table(
    cones: &ConeFundamentals,
    mb: &MacLeodBoynton,
    domain: &Domain,
) -> (SpectralTable, Vec<f64>) {
    let mut table = SpectralTable::new(&MACLEOD_BOYNTON_CHANNELS);
    let mut dropped = Vec::new();
    for (wavelength, lms) in cones.sample_points(domain) {
        match mb.apply(lms) {
            Some(v) => table.push(wavelength, v.to_array().to_vec()),
            None => dropped.push(wavelength),
        }
    }
    (table, dropped)
}

pub(super) fn macleod_boynton(
    request: &PhysiologicalRequest,
    resolution: Resolution,
) -> CmfResult<Output> {
    let domain = resolution.grid(request.domain)?;
    let cones = ConeFundamentals::new(request.observer)?;
    let fit = XyzTransform::fit(&cones)?;
    let mb = MacLeodBoynton::new(&cones, &fit)?;

    if resolution.wants_info(request.flags) {
        let white = mb
            .apply(lms_sums(&cones, &domain))
            .ok_or_else(degenerate_white)?;
        let (fine, _) = macleod_boynton_table(&cones, &mb, &request.domain.fine().build()?);
        // l against s
        let tangents = tangent_points(&fine.select(&[0, 2]), XY_PLANE)?;
        return Ok(Output::Info(Info {
            norm: Some(round3(mb.kappa.to_array(), NORM_PRECISION)),
            white: Some(round3(white.to_array(), COORDINATE_PRECISION)),
            tg_purple: Some(tangent_rows(&tangents, COORDINATE_PRECISION)),
            ..Info::default()
        }));
    }

    let (table, dropped) = macleod_boynton_table(&cones, &mb, &domain);
    Ok(finish(table, dropped, COORDINATE_PRECISION, resolution))
}

fn maxwellian_projection(cones: &ConeFundamentals, mw: &Maxwellian, domain: &Domain) -> Projection {
    let scaled = SpectralTable::from_vec3(
        LMS_CHANNELS,
        cones
            .sample_points(domain)
            .into_iter()
            .map(|(wavelength, lms)| (wavelength, mw.apply(lms))),
    );
    project(&scaled, MAXWELLIAN_CHANNELS)
}

pub(super) fn maxwellian(request: &PhysiologicalRequest, resolution: Resolution) -> CmfResult<Output> {
    let domain = resolution.grid(request.domain)?;
    let cones = ConeFundamentals::new(request.observer)?;
    // Cone areas always come from the requested grid, also when plotting.
    let sums = lms_sums(&cones, &request.domain.build()?);
    let mw = Maxwellian::from_sums(sums)?;

    if resolution.wants_info(request.flags) {
        let white = chromaticity(mw.apply(sums)).ok_or_else(degenerate_white)?;
        let fine = maxwellian_projection(&cones, &mw, &request.domain.fine().build()?).table;
        let tangents = tangent_points(&fine.select(&XY_PLANE), XY_PLANE)?;
        return Ok(Output::Info(Info {
            norm: Some(round3(mw.k.to_array(), NORM_PRECISION)),
            white: Some(round3(white.to_array(), COORDINATE_PRECISION)),
            tg_purple: Some(tangent_rows(&tangents, COORDINATE_PRECISION)),
            ..Info::default()
        }));
    }

    let projection = maxwellian_projection(&cones, &mw, &domain);
    Ok(finish(
        projection.table,
        projection.dropped,
        COORDINATE_PRECISION,
        resolution,
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// XYZ and its derivatives
// ─────────────────────────────────────────────────────────────────────────────

/// Tangent points of the fine locus, as chromaticity and as tristimulus.
struct Tangents {
    chromatic: [TangentPoint; 2],
    tristimulus: [TangentPoint; 2],
}

/// Cone model plus the (optionally equal-area) XYZ matrix of one request.
struct XyzModel {
    cones: ConeFundamentals,
    matrix: Mat3,
    /// LMS sums over the requested grid.
    lms_sums: Vec3,
    bounds: DomainParams,
}

impl XyzModel {
    fn new(request: &PhysiologicalRequest) -> CmfResult<Self> {
        let cones = ConeFundamentals::new(request.observer)?;
        let fit = XyzTransform::fit(&cones)?;
        let lms_sums = lms_sums(&cones, &request.domain.build()?);
        // The fit already equalises the areas on the main grid.
        let matrix = if request.flags.norm && request.domain != DomainParams::default() {
            fit.equal_area(lms_sums)
        } else {
            fit.matrix
        };
        Ok(Self {
            cones,
            matrix,
            lms_sums,
            bounds: request.domain,
        })
    }

    fn tristimulus(&self, domain: &Domain) -> SpectralTable {
        SpectralTable::from_vec3(
            XYZ_CHANNELS,
            self.cones
                .sample_points(domain)
                .into_iter()
                .map(|(wavelength, lms)| (wavelength, self.matrix.apply(lms))),
        )
    }

    /// Chromaticity of the equal-energy stimulus.
    fn white(&self) -> CmfResult<Vec3> {
        chromaticity(self.matrix.apply(self.lms_sums)).ok_or_else(degenerate_white)
    }

    fn tangents(&self) -> CmfResult<Tangents> {
        let fine = self.tristimulus(&self.bounds.fine().build()?);
        let locus = project(&fine, CHROMATICITY_CHANNELS).table;
        let chromatic = tangent_points(&locus, XY_PLANE)?;
        let tristimulus_at = |tangent: &TangentPoint| {
            fine.row_at(tangent.wavelength)
                .map(|row| TangentPoint {
                    wavelength: row.wavelength,
                    coordinates: row.values.clone(),
                })
                .ok_or(CmfError::DegenerateSample {
                    wavelength: tangent.wavelength,
                })
        };
        let tristimulus = [tristimulus_at(&chromatic[0])?, tristimulus_at(&chromatic[1])?];
        Ok(Tangents {
            chromatic,
            tristimulus,
        })
    }

    fn chromaticity_info(&self) -> CmfResult<Info> {
        let white = self.white()?;
        let tangents = self.tangents()?;
        Ok(Info {
            xyz_white: Some(round3(white.to_array(), CHROMATICITY_PRECISION)),
            xyz_tg_purple: Some(tangent_rows(&tangents.chromatic, CHROMATICITY_PRECISION)),
            tristimulus_tg_purple: Some(tangent_rows(&tangents.tristimulus, TRISTIMULUS_PRECISION)),
            ..Info::default()
        })
    }
}

fn tangent_vec3(tangent: &TangentPoint) -> Vec3 {
    let at = |i: usize| tangent.coordinates.get(i).copied().unwrap_or(0.0);
    Vec3::new(at(0), at(1), at(2))
}

pub(super) fn xyz(request: &PhysiologicalRequest, resolution: Resolution) -> CmfResult<Output> {
    let domain = resolution.grid(request.domain)?;
    let model = XyzModel::new(request)?;
    if resolution.wants_info(request.flags) {
        return Ok(Output::Info(Info {
            trans_mat: Some(model.matrix),
            ..Info::default()
        }));
    }
    Ok(finish(
        model.tristimulus(&domain),
        Vec::new(),
        TRISTIMULUS_PRECISION,
        resolution,
    ))
}

pub(super) fn xy(request: &PhysiologicalRequest, resolution: Resolution) -> CmfResult<Output> {
    let domain = resolution.grid(request.domain)?;
    let model = XyzModel::new(request)?;
    if resolution.wants_info(request.flags) {
        return Ok(Output::Info(model.chromaticity_info()?));
    }
    let projection = project(&model.tristimulus(&domain), CHROMATICITY_CHANNELS);
    Ok(finish(
        projection.table,
        projection.dropped,
        CHROMATICITY_PRECISION,
        resolution,
    ))
}

/// Purple-line stimuli, as tristimulus values or (`chromatic`) as their
/// chromaticity.
pub(super) fn purples(
    request: &PhysiologicalRequest,
    resolution: Resolution,
    chromatic: bool,
) -> CmfResult<Output> {
    let domain = resolution.grid(request.domain)?;
    let model = XyzModel::new(request)?;
    if resolution.wants_info(request.flags) {
        return Ok(Output::Info(model.chromaticity_info()?));
    }

    let white = model.white()?;
    let tangents = model.tangents()?;
    let locus = project(&model.tristimulus(&domain), CHROMATICITY_CHANNELS).table;
    let fractions = purple_fractions(&locus, XY_PLANE, [white.x, white.y], &tangents.chromatic);
    let [short, long] = &tangents.tristimulus;
    let mut table = tristimulus_purples(
        &fractions,
        tangent_vec3(short),
        tangent_vec3(long),
        XYZ_CHANNELS,
    );
    let mut precision = TRISTIMULUS_PRECISION;
    if chromatic {
        table = chromaticity_purples(&table, CHROMATICITY_CHANNELS);
        precision = CHROMATICITY_PRECISION;
    }
    log::debug!(
        "{} purple samples between {} nm and {} nm",
        table.len(),
        short.wavelength,
        long.wavelength
    );

    if resolution.rounds() {
        table = round_purples(&table, precision);
    }
    Ok(Output::Purples(PurpleOutput { table }))
}
