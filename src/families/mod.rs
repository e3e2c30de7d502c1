//! Representation families and their dispatch.
//!
//! Every family has its own typed request; [`Representation`] is the tagged
//! union over all nine, and [`FamilyRegistry`] maps user-facing names onto
//! [`Family`] tags.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::spectral::{
    CmfError, CmfResult, Domain, DomainParams, Flags, ObserverParams, Precision, SpectralTable,
    StandardField, round_table,
};

pub mod output;
pub mod params;
mod physiological;
mod standard;

pub use output::{Output, PurpleOutput, TableOutput};
pub use params::{ParamLookupExt, ParamMap, ParamValue};

/// The nine representation families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Family {
    Lms,
    MacLeodBoynton,
    Maxwellian,
    Xyz,
    Xy,
    XyzPurples,
    XyPurples,
    XyzStandard,
    XyStandard,
}

impl Family {
    pub const ALL: [Self; 9] = [
        Self::Lms,
        Self::MacLeodBoynton,
        Self::Maxwellian,
        Self::Xyz,
        Self::Xy,
        Self::XyzPurples,
        Self::XyPurples,
        Self::XyzStandard,
        Self::XyStandard,
    ];

    /// Canonical short name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lms => "lms",
            Self::MacLeodBoynton => "lms-mb",
            Self::Maxwellian => "lms-mw",
            Self::Xyz => "xyz",
            Self::Xy => "xy",
            Self::XyzPurples => "xyz-p",
            Self::XyPurples => "xy-p",
            Self::XyzStandard => "xyz-std",
            Self::XyStandard => "xy-std",
        }
    }

    #[must_use]
    pub const fn is_standard(self) -> bool {
        matches!(self, Self::XyzStandard | Self::XyStandard)
    }

    /// Whether an output flag may be used with this family.
    #[must_use]
    pub fn allows(self, flag: &str) -> bool {
        match flag {
            "log" | "base" => matches!(self, Self::Lms),
            "norm" => matches!(self, Self::Xyz | Self::Xy | Self::XyzPurples | Self::XyPurples),
            "info" => matches!(
                self,
                Self::MacLeodBoynton
                    | Self::Maxwellian
                    | Self::Xyz
                    | Self::Xy
                    | Self::XyzPurples
                    | Self::XyPurples
                    | Self::XyStandard
            ),
            _ => false,
        }
    }

    /// # Errors
    /// `OutOfRangeParameter` on the first flag this family does not support.
    pub fn check_flags(self, flags: Flags) -> CmfResult<()> {
        match flags.set_names().into_iter().find(|flag| !self.allows(flag)) {
            Some(flag) => Err(CmfError::out_of_range(
                "flag",
                format!("`{flag}` is not supported by `{}`", self.name()),
            )),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Names under which a family can be requested.
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    pub names: &'static [&'static str],
    pub kind: Family,
}

/// All family registrations.
pub const REGISTRATIONS: &[Registration] = &[
    Registration {
        names: &["lms", "cone-fundamentals"],
        kind: Family::Lms,
    },
    Registration {
        names: &["lms-mb", "macleod-boynton", "mb"],
        kind: Family::MacLeodBoynton,
    },
    Registration {
        names: &["lms-mw", "maxwellian", "mw"],
        kind: Family::Maxwellian,
    },
    Registration {
        names: &["xyz", "tristimulus"],
        kind: Family::Xyz,
    },
    Registration {
        names: &["xy", "chromaticity"],
        kind: Family::Xy,
    },
    Registration {
        names: &["xyz-p", "xyz-purples"],
        kind: Family::XyzPurples,
    },
    Registration {
        names: &["xy-p", "xy-purples"],
        kind: Family::XyPurples,
    },
    Registration {
        names: &["xyz-std", "xyz-standard"],
        kind: Family::XyzStandard,
    },
    Registration {
        names: &["xy-std", "xy-standard"],
        kind: Family::XyStandard,
    },
];

/// Name → family lookup.
#[derive(Debug, Clone)]
pub struct FamilyRegistry {
    by_name: HashMap<String, Family>,
}

impl Default for FamilyRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        for registration in REGISTRATIONS {
            registry.register_names(registration.names, registration.kind);
        }
        registry
    }
}

impl FamilyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    pub fn register_names(&mut self, names: &[&str], kind: Family) {
        for name in names {
            self.by_name.insert(normalize_name(name), kind);
        }
    }

    /// # Errors
    /// `UnknownFamily`, with the closest registered name when one is near.
    pub fn resolve(&self, name: &str) -> CmfResult<Family> {
        let key = normalize_name(name);
        if let Some(kind) = self.by_name.get(&key) {
            return Ok(*kind);
        }
        let suggestion = params::suggest(&key, self.by_name.keys().map(String::as_str));
        Err(CmfError::UnknownFamily {
            name: name.to_owned(),
            suggestion,
        })
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(['_', ' '], "-")
}

/// Request of a family driven by the physiological observer model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysiologicalRequest {
    pub observer: ObserverParams,
    pub domain: DomainParams,
    pub flags: Flags,
}

/// Request of a standard-observer family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StandardRequest {
    pub field: StandardField,
    pub domain: DomainParams,
    pub flags: Flags,
}

/// Grid resolution and rounding of a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// Requested grid, rounded to the family precision.
    Requested,
    /// 0.1 nm grid over the requested bounds, unrounded.
    Plot,
}

impl Resolution {
    /// The grid to evaluate on. The requested domain is validated either
    /// way, so a bad step is rejected for plots too.
    pub(crate) fn grid(self, params: DomainParams) -> CmfResult<Domain> {
        params.validate()?;
        match self {
            Self::Requested => params.build(),
            Self::Plot => params.fine().build(),
        }
    }

    pub(crate) fn rounds(self) -> bool {
        matches!(self, Self::Requested)
    }

    /// `info` is only answered on the requested grid.
    pub(crate) fn wants_info(self, flags: Flags) -> bool {
        flags.info && self.rounds()
    }
}

pub(crate) const LMS_PRECISION: Precision = Precision::Significant(6);
pub(crate) const LMS_LOG_PRECISION: Precision = Precision::Decimals(5);
pub(crate) const LMS_LOG_BASE_PRECISION: Precision = Precision::Decimals(8);
pub(crate) const COORDINATE_PRECISION: Precision = Precision::Decimals(6);
pub(crate) const TRISTIMULUS_PRECISION: Precision = Precision::Significant(7);
pub(crate) const CHROMATICITY_PRECISION: Precision = Precision::Decimals(5);
pub(crate) const NORM_PRECISION: Precision = Precision::Decimals(8);

/// Round (unless plotting) and wrap a spectral table.
pub(crate) fn finish(
    table: SpectralTable,
    dropped: Vec<f64>,
    precision: Precision,
    resolution: Resolution,
) -> Output {
    let table = if resolution.rounds() {
        round_table(&table, precision)
    } else {
        table
    };
    Output::Table(TableOutput { table, dropped })
}

/// One fully typed request, tagged by family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "family", content = "request")]
pub enum Representation {
    Lms(PhysiologicalRequest),
    MacLeodBoynton(PhysiologicalRequest),
    Maxwellian(PhysiologicalRequest),
    Xyz(PhysiologicalRequest),
    Xy(PhysiologicalRequest),
    XyzPurples(PhysiologicalRequest),
    XyPurples(PhysiologicalRequest),
    XyzStandard(StandardRequest),
    XyStandard(StandardRequest),
}

impl Representation {
    /// Typed request for a physiological family.
    ///
    /// # Errors
    /// `OutOfRangeParameter` for an invalid observer or flag, or when the
    /// family is a standard-observer family.
    pub fn physiological(
        family: Family,
        observer: ObserverParams,
        domain: DomainParams,
        flags: Flags,
    ) -> CmfResult<Self> {
        observer.validate()?;
        family.check_flags(flags)?;
        let request = PhysiologicalRequest {
            observer,
            domain,
            flags,
        };
        Ok(match family {
            Family::Lms => Self::Lms(request),
            Family::MacLeodBoynton => Self::MacLeodBoynton(request),
            Family::Maxwellian => Self::Maxwellian(request),
            Family::Xyz => Self::Xyz(request),
            Family::Xy => Self::Xy(request),
            Family::XyzPurples => Self::XyzPurples(request),
            Family::XyPurples => Self::XyPurples(request),
            Family::XyzStandard | Family::XyStandard => {
                return Err(CmfError::out_of_range(
                    "family",
                    format!("`{family}` is a standard-observer family and takes no observer age"),
                ));
            }
        })
    }

    /// Typed request for a standard-observer family.
    ///
    /// # Errors
    /// `UnsupportedFieldSize` unless the field size is 2 or 10,
    /// `OutOfRangeParameter` for an invalid flag or a non-standard family.
    pub fn standard(family: Family, field_size: f64, domain: DomainParams, flags: Flags) -> CmfResult<Self> {
        let field = StandardField::from_field_size(field_size)?;
        family.check_flags(flags)?;
        let request = StandardRequest {
            field,
            domain,
            flags,
        };
        match family {
            Family::XyzStandard => Ok(Self::XyzStandard(request)),
            Family::XyStandard => Ok(Self::XyStandard(request)),
            other => Err(CmfError::out_of_range(
                "family",
                format!("`{other}` is not a standard-observer family and needs an observer age"),
            )),
        }
    }

    /// Build from untyped parameters.
    ///
    /// # Errors
    /// Any validation error of the parameters or flags.
    pub fn from_params(family: Family, map: &ParamMap) -> CmfResult<Self> {
        if family.is_standard() {
            let (field, domain, flags) = params::parse_standard(map)?;
            Self::standard(family, field.degrees(), domain, flags)
        } else {
            let (observer, domain, flags) = params::parse_physiological(map)?;
            Self::physiological(family, observer, domain, flags)
        }
    }

    #[must_use]
    pub fn family(&self) -> Family {
        match self {
            Self::Lms(_) => Family::Lms,
            Self::MacLeodBoynton(_) => Family::MacLeodBoynton,
            Self::Maxwellian(_) => Family::Maxwellian,
            Self::Xyz(_) => Family::Xyz,
            Self::Xy(_) => Family::Xy,
            Self::XyzPurples(_) => Family::XyzPurples,
            Self::XyPurples(_) => Family::XyPurples,
            Self::XyzStandard(_) => Family::XyzStandard,
            Self::XyStandard(_) => Family::XyStandard,
        }
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        match self {
            Self::Lms(r)
            | Self::MacLeodBoynton(r)
            | Self::Maxwellian(r)
            | Self::Xyz(r)
            | Self::Xy(r)
            | Self::XyzPurples(r)
            | Self::XyPurples(r) => r.flags,
            Self::XyzStandard(r) | Self::XyStandard(r) => r.flags,
        }
    }

    /// Compute the table (or `info` bundle) on the requested grid.
    ///
    /// # Errors
    /// Any [`CmfError`] raised while validating or computing.
    pub fn compute(&self) -> CmfResult<Output> {
        self.run(Resolution::Requested)
    }

    /// Companion table on a 0.1 nm grid over the requested bounds, without
    /// rounding. `info` is ignored here.
    ///
    /// # Errors
    /// Any [`CmfError`] raised while validating or computing.
    pub fn compute_plot(&self) -> CmfResult<Output> {
        self.run(Resolution::Plot)
    }

    fn run(&self, resolution: Resolution) -> CmfResult<Output> {
        log::debug!("computing {} at {resolution:?}", self.family());
        match self {
            Self::Lms(r) => physiological::lms(r, resolution),
            Self::MacLeodBoynton(r) => physiological::macleod_boynton(r, resolution),
            Self::Maxwellian(r) => physiological::maxwellian(r, resolution),
            Self::Xyz(r) => physiological::xyz(r, resolution),
            Self::Xy(r) => physiological::xy(r, resolution),
            Self::XyzPurples(r) => physiological::purples(r, resolution, false),
            Self::XyPurples(r) => physiological::purples(r, resolution, true),
            Self::XyzStandard(r) => standard::xyz(r, resolution),
            Self::XyStandard(r) => standard::xy(r, resolution),
        }
    }
}

/// Resolve a family by name and compute it from untyped parameters.
///
/// # Errors
/// `UnknownFamily` or any validation/computation error.
pub fn compute_named(registry: &FamilyRegistry, name: &str, map: &ParamMap) -> CmfResult<Output> {
    let family = registry.resolve(name)?;
    Representation::from_params(family, map)?.compute()
}

#[cfg(test)]
mod tests {
    use super::{Family, FamilyRegistry, Representation};
    use crate::spectral::{CmfError, DomainParams, Flags, ObserverParams};

    #[test]
    fn registry_resolves_short_and_long_names() {
        let registry = FamilyRegistry::default();
        assert_eq!(registry.resolve("lms").unwrap(), Family::Lms);
        assert_eq!(registry.resolve(" MacLeod-Boynton ").unwrap(), Family::MacLeodBoynton);
        assert_eq!(registry.resolve("xy_std").unwrap(), Family::XyStandard);
        for family in Family::ALL {
            assert_eq!(registry.resolve(family.name()).unwrap(), family);
        }
    }

    #[test]
    fn registry_suggests_close_names() {
        let registry = FamilyRegistry::default();
        match registry.resolve("xyz-sdt") {
            Err(CmfError::UnknownFamily { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("xyz-std"));
            }
            other => panic!("expected UnknownFamily, got {other:?}"),
        }
        assert!(matches!(
            registry.resolve("spectrogram-of-doom"),
            Err(CmfError::UnknownFamily { suggestion: None, .. })
        ));
    }

    #[test]
    fn flag_validity_follows_the_family_table() {
        let cases = [
            (Family::Lms, "log", true),
            (Family::Lms, "base", true),
            (Family::Lms, "norm", false),
            (Family::Lms, "info", false),
            (Family::MacLeodBoynton, "norm", false),
            (Family::MacLeodBoynton, "info", true),
            (Family::Maxwellian, "log", false),
            (Family::Xyz, "norm", true),
            (Family::Xyz, "base", false),
            (Family::Xy, "info", true),
            (Family::XyPurples, "norm", true),
            (Family::XyzStandard, "info", false),
            (Family::XyStandard, "info", true),
            (Family::XyStandard, "norm", false),
        ];
        for (family, flag, allowed) in cases {
            assert_eq!(family.allows(flag), allowed, "{family} {flag}");
        }
    }

    #[test]
    fn invalid_flag_is_rejected_before_computing() {
        let flags = Flags {
            norm: true,
            ..Flags::default()
        };
        let err = Representation::physiological(
            Family::Lms,
            ObserverParams::default(),
            DomainParams::default(),
            flags,
        )
        .unwrap_err();
        assert!(matches!(err, CmfError::OutOfRangeParameter { ref name, .. } if name == "flag"));
    }

    #[test]
    fn standard_families_need_a_canonical_field() {
        let err = Representation::standard(Family::XyStandard, 4.0, DomainParams::default(), Flags::default())
            .unwrap_err();
        assert_eq!(err, CmfError::UnsupportedFieldSize { field_size: 4.0 });
    }

    #[test]
    fn mismatched_request_kind_names_the_family() {
        let err = Representation::standard(Family::Xyz, 2.0, DomainParams::default(), Flags::default())
            .unwrap_err();
        assert!(matches!(err, CmfError::OutOfRangeParameter { ref name, .. } if name == "family"));

        let err = Representation::physiological(
            Family::XyStandard,
            ObserverParams::default(),
            DomainParams::default(),
            Flags::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CmfError::OutOfRangeParameter { ref name, .. } if name == "family"));
    }

    #[test]
    fn typed_request_reports_its_family() {
        let repr = Representation::physiological(
            Family::Xy,
            ObserverParams::new(10.0, 40.0).unwrap(),
            DomainParams::default(),
            Flags::default(),
        )
        .unwrap();
        assert_eq!(repr.family(), Family::Xy);
        assert_eq!(repr.flags(), Flags::default());
    }
}
