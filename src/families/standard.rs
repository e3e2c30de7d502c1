//! Families backed by the tabulated CIE standard observers.

use crate::spectral::{
    CHROMATICITY_CHANNELS, CmfResult, Info, StandardObserver, project, tangent_points, tangent_rows,
};

use super::output::Output;
use super::{CHROMATICITY_PRECISION, Resolution, StandardRequest, TRISTIMULUS_PRECISION, finish};

pub(super) fn xyz(request: &StandardRequest, resolution: Resolution) -> CmfResult<Output> {
    let domain = resolution.grid(request.domain)?;
    let observer = StandardObserver::new(request.field)?;
    let table = observer.sample(&domain)?;
    Ok(finish(table, Vec::new(), TRISTIMULUS_PRECISION, resolution))
}

pub(super) fn xy(request: &StandardRequest, resolution: Resolution) -> CmfResult<Output> {
    let domain = resolution.grid(request.domain)?;
    let observer = StandardObserver::new(request.field)?;

    if resolution.wants_info(request.flags) {
        let fine = observer.sample(&request.domain.fine().build()?)?;
        let locus = project(&fine, CHROMATICITY_CHANNELS).table;
        let tangents = tangent_points(&locus, [0, 1])?;
        return Ok(Output::Info(Info {
            white: Some(request.field.equal_energy_white()),
            tg_purple: Some(tangent_rows(&tangents, CHROMATICITY_PRECISION)),
            ..Info::default()
        }));
    }

    let projection = project(&observer.sample(&domain)?, CHROMATICITY_CHANNELS);
    Ok(finish(
        projection.table,
        projection.dropped,
        CHROMATICITY_PRECISION,
        resolution,
    ))
}
