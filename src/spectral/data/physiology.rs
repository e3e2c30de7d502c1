//! Baseline physiological tables on the 5 nm model grid (390–830 nm).
//!
//! Photopigment absorbance is log10 of the relative absorbance, peak 0. It
//! is the absorbance that, with the macular and lens densities below and
//! the 2° photopigment densities, yields the CIE 2006 2° cone fundamentals
//! of a 32-year-old observer. The S-cone absorbance beyond 615 nm, where the
//! S fundamental is not tabulated, continues its last log-linear decay.
//!
//! Macular density is the template at 0.35 peak density at 460 nm. Lens
//! density is split into the component that grows with age and the one that
//! does not (Pokorny, Smith and Lutze), so that the 32-year total is their
//! sum.

/// First tabulated wavelength (nm).
pub(crate) const START: f64 = 390.0;
/// Tabulation step (nm).
pub(crate) const STEP: f64 = 5.0;
/// Number of tabulated wavelengths.
pub(crate) const LEN: usize = 89;

/// Macular density of the template at its reference peak.
pub(crate) const MACULAR_TEMPLATE_PEAK: f64 = 0.35;

pub(crate) const LOG_ABSORBANCE_L: [f64; LEN] = [
    -1.856337, -1.718338, -1.562606, -1.398853, -1.280759, -1.185341,
    -1.136761, -1.091433, -1.046199, -0.978213, -0.922115, -0.875966,
    -0.836568, -0.792302, -0.733978, -0.657302, -0.593765, -0.542713,
    -0.500030, -0.459063, -0.434783, -0.408440, -0.382038, -0.344688,
    -0.292142, -0.225417, -0.160136, -0.110640, -0.070562, -0.041292,
    -0.012217, 0.000000, -0.002989, -0.001289, -0.007980, -0.016696,
    -0.031241, -0.056147, -0.091473, -0.118258, -0.154465, -0.195356,
    -0.243598, -0.296765, -0.359545, -0.430565, -0.507931, -0.590078,
    -0.687775, -0.791909, -0.897994, -1.007336, -1.131302, -1.261168,
    -1.395603, -1.534383, -1.677629, -1.826014, -1.980023, -2.140019,
    -2.306927, -2.467768, -2.628448, -2.790529, -2.957737, -3.125292,
    -3.288981, -3.452118, -3.612113, -3.771482, -3.931231, -4.085645,
    -4.240586, -4.393097, -4.543367, -4.692981, -4.839799, -4.987291,
    -5.130055, -5.272134, -5.413032, -5.553105, -5.690497, -5.825821,
    -5.962019, -6.095680, -6.226211, -6.356312, -6.484988,
];

pub(crate) const LOG_ABSORBANCE_M: [f64; LEN] = [
    -1.955594, -1.806287, -1.636137, -1.459036, -1.325186, -1.196900,
    -1.112683, -1.024428, -0.940839, -0.833111, -0.747927, -0.676425,
    -0.618424, -0.563146, -0.493834, -0.411370, -0.347650, -0.302773,
    -0.270216, -0.240410, -0.231653, -0.222348, -0.214260, -0.192608,
    -0.154655, -0.102683, -0.051324, -0.020989, -0.003844, 0.000000,
    -0.000718, -0.020938, -0.056869, -0.090669, -0.136701, -0.185697,
    -0.245398, -0.316464, -0.401117, -0.484796, -0.574816, -0.673262,
    -0.781481, -0.898881, -1.023892, -1.155565, -1.294256, -1.439264,
    -1.588082, -1.741362, -1.900076, -2.066747, -2.223909, -2.386706,
    -2.556737, -2.727202, -2.890977, -3.054567, -3.219581, -3.387235,
    -3.558728, -3.722762, -3.883757, -4.045096, -4.211364, -4.376201,
    -4.537501, -4.697010, -4.853739, -5.008566, -5.162048, -5.312847,
    -5.462364, -5.610864, -5.757147, -5.901810, -6.044685, -6.186849,
    -6.325891, -6.463911, -6.600194, -6.735437, -6.868940, -7.000524,
    -7.131216, -7.260402, -7.387225, -7.512837, -7.636917,
];

pub(crate) const LOG_ABSORBANCE_S: [f64; LEN] = [
    -1.106883, -0.971309, -0.790382, -0.577685, -0.417096, -0.267644,
    -0.186095, -0.126394, -0.083933, -0.033260, 0.000000, -0.007665,
    -0.047366, -0.122732, -0.198348, -0.271550, -0.388375, -0.542615,
    -0.718646, -0.894109, -1.087931, -1.278098, -1.470934, -1.680288,
    -1.898547, -2.086658, -2.278075, -2.474442, -2.676498, -2.881959,
    -3.095660, -3.313246, -3.533638, -3.756235, -3.977693, -4.198550,
    -4.417986, -4.635588, -4.850253, -5.060870, -5.267422, -5.466476,
    -5.660671, -5.849226, -6.032410, -6.210561, -6.388684, -6.566778,
    -6.744844, -6.922383, -7.099896, -7.277881, -7.455841, -7.630275,
    -7.804683, -7.979067, -8.153426, -8.327761, -8.502072, -8.676360,
    -8.850624, -9.024866, -9.199085, -9.373282, -9.547457, -9.721611,
    -9.895743, -10.069855, -10.243945, -10.418016, -10.592066, -10.766097,
    -10.940107, -11.114100, -11.288068, -11.462022, -11.635967, -11.809892,
    -11.983761, -12.157641, -12.331557, -12.505298, -12.679218, -12.852942,
    -13.026617, -13.200766, -13.373961, -13.548200, -13.720611,
];

pub(crate) const MACULAR_DENSITY: [f64; LEN] = [
    0.0650, 0.0790, 0.0955, 0.1140, 0.1330, 0.1530,
    0.1740, 0.1960, 0.2225, 0.2490, 0.2745, 0.3005,
    0.3225, 0.3415, 0.3500, 0.3465, 0.3350, 0.3215,
    0.3055, 0.2855, 0.2520, 0.2025, 0.1440, 0.0920,
    0.0545, 0.0310, 0.0175, 0.0100, 0.0060, 0.0035,
    0.0020, 0.0012, 0.0007, 0.0004, 0.0002, 0.0001,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
];

pub(crate) const LENS_DENSITY_AGED: [f64; LEN] = [
    0.7059, 0.6508, 0.6000, 0.5550, 0.5100, 0.4715,
    0.4330, 0.4050, 0.3770, 0.3520, 0.3270, 0.3110,
    0.2950, 0.2810, 0.2670, 0.2500, 0.2330, 0.2200,
    0.2070, 0.1970, 0.1870, 0.1770, 0.1670, 0.1570,
    0.1470, 0.1400, 0.1330, 0.1265, 0.1200, 0.1135,
    0.1070, 0.1000, 0.0930, 0.0865, 0.0800, 0.0735,
    0.0670, 0.0600, 0.0530, 0.0465, 0.0400, 0.0365,
    0.0330, 0.0300, 0.0270, 0.0235, 0.0200, 0.0165,
    0.0130, 0.0100, 0.0070, 0.0035, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
];

pub(crate) const LENS_DENSITY_STABLE: [f64; LEN] = [
    0.8969, 0.6763, 0.5100, 0.4000, 0.2900, 0.2200,
    0.1500, 0.1100, 0.0700, 0.0550, 0.0400, 0.0300,
    0.0200, 0.0150, 0.0100, 0.0075, 0.0050, 0.0025,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
    0.0000, 0.0000, 0.0000, 0.0000, 0.0000,
];
