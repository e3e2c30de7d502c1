mod test_chromaticity_basic;
mod test_cone_basic;
mod test_interpolate_basic;
mod test_standard_basic;
