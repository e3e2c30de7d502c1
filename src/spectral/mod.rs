mod chromaticity;
mod cone;
mod core;
pub(crate) mod data;
mod domain;
mod error;
mod format;
mod interpolate;
mod purple;
mod standard;
mod table;
mod transform;

pub use chromaticity::{
    CHROMATICITY_CHANNELS, DEGENERATE_SUM, Projection, chromaticity, plane, project, project_strict,
};
pub use cone::{AGE_BOUNDS, ConeFundamentals, FIELD_SIZE_BOUNDS, LMS_CHANNELS, ObserverParams, OpticalDensities};
pub use self::core::{Mat3, Vec3, round_decimals, round_significant};
pub use domain::{
    Domain, DomainParams, FINE_STEP, MAIN_STEP, MAX_BOUNDS, MIN_BOUNDS, MODEL_RANGE, STEP_BOUNDS,
};
pub use error::{CmfError, CmfResult};
pub use format::{
    Flags, Info, Precision, equal_area, equal_area_factors, log10_table, round3, round_purples,
    round_table, tangent_rows,
};
pub use interpolate::{CubicSpline, InterpolateError, MonotoneCubic};
pub use purple::{
    ClosedLoop, PurpleFraction, PurpleRow, PurpleTable, TangentPoint, chromaticity_purples,
    closed_loop, purple_fractions, tangent_indices, tangent_points, tristimulus_purples,
};
pub use standard::{STANDARD_RANGE, StandardField, StandardObserver};
pub use table::{SpectralRow, SpectralTable};
pub use transform::{
    LM_WEIGHTS, MACLEOD_BOYNTON_CHANNELS, MATRIX_DECIMALS, MAXWELLIAN_CHANNELS, MacLeodBoynton,
    Maxwellian, XYZ_CHANNELS, XyzTransform,
};

#[cfg(test)]
mod tests;
