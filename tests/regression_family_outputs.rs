use cmf_engine::Engine;
use cmf_engine::families::{Output, ParamMap, ParamValue, PurpleOutput, TableOutput};
use cmf_engine::spectral::Info;

fn request(field_size: f64, age: Option<i64>, extra: &[(&str, ParamValue)]) -> ParamMap {
    let mut map = ParamMap::new();
    map.insert("field_size".into(), field_size.into());
    if let Some(age) = age {
        map.insert("age".into(), age.into());
    }
    for (key, value) in extra {
        map.insert((*key).to_owned(), value.clone());
    }
    map
}

fn table(family: &str, map: &ParamMap) -> TableOutput {
    match Engine::new().compute_output(family, map).expect(family) {
        Output::Table(table) => table,
        other => panic!("{family}: expected a table, got {other:?}"),
    }
}

fn purples(family: &str, map: &ParamMap) -> PurpleOutput {
    match Engine::new().compute_output(family, map).expect(family) {
        Output::Purples(purples) => purples,
        other => panic!("{family}: expected purples, got {other:?}"),
    }
}

fn info(family: &str, map: &ParamMap) -> Info {
    match Engine::new().compute_output(family, map).expect(family) {
        Output::Info(info) => info,
        other => panic!("{family}: expected info, got {other:?}"),
    }
}

fn decimals(value: f64) -> usize {
    let text = format!("{value}");
    text.split_once('.').map_or(0, |(_, fraction)| fraction.len())
}

#[test]
fn lms_defaults_to_six_significant_figures() {
    let out = table("lms", &request(2.0, Some(32), &[]));
    assert_eq!(out.table.channels, vec!["L", "M", "S"]);
    for row in &out.table.rows {
        for value in &row.values {
            assert!(*value > 0.0);
            let digits = format!("{value:e}");
            let mantissa = digits.split('e').next().unwrap().replace(['.', '-'], "");
            assert!(mantissa.len() <= 6, "{value}");
        }
    }
}

#[test]
fn lms_log_is_non_positive_with_five_decimals() {
    let out = table("lms", &request(2.0, Some(32), &[("log", true.into())]));
    for row in &out.table.rows {
        for value in &row.values {
            assert!(*value <= 0.0);
            assert!(decimals(*value) <= 5, "{value}");
        }
    }
    let base = table(
        "lms",
        &request(2.0, Some(32), &[("log", true.into()), ("base", true.into())]),
    );
    assert!(base.table.rows.iter().flat_map(|r| &r.values).any(|v| decimals(*v) > 5));
}

#[test]
fn macleod_boynton_rows_have_l_plus_m_one() {
    let out = table("lms-mb", &request(2.0, Some(32), &[("step_size", 5.0.into())]));
    assert_eq!(out.table.channels, vec!["l_mb", "m_mb", "s_mb"]);
    for row in &out.table.rows {
        assert!((row.values[0] + row.values[1] - 1.0).abs() <= 1.5e-6, "{row:?}");
        assert!(row.values.iter().all(|v| decimals(*v) <= 6));
    }
}

#[test]
fn macleod_boynton_info_bundle() {
    let bundle = info("lms-mb", &request(2.0, Some(32), &[("info", true.into())]));
    let norm = bundle.norm.expect("norm");
    assert!(norm.iter().all(|k| *k > 0.0));
    let white = bundle.white.expect("white");
    assert!((white[0] + white[1] - 1.0).abs() <= 1.5e-6);
    let tangents = bundle.tg_purple.expect("tangents");
    assert_eq!(tangents.len(), 2);
    assert_eq!(tangents[0].len(), 3);
    assert!(tangents[0][0] < tangents[1][0]);
    assert!(bundle.trans_mat.is_none());
}

#[test]
fn maxwellian_info_white_is_the_centre() {
    let bundle = info("lms-mw", &request(10.0, Some(32), &[("info", true.into())]));
    assert_eq!(bundle.white, Some([0.333_333; 3]));
    let tangents = bundle.tg_purple.expect("tangents");
    assert_eq!(tangents[0].len(), 3);
}

#[test]
fn maxwellian_rows_are_chromaticities() {
    let out = table("lms-mw", &request(2.0, Some(70), &[("step_size", 5.0.into())]));
    for row in &out.table.rows {
        assert!((row.values.iter().sum::<f64>() - 1.0).abs() <= 2e-6);
    }
}

#[test]
fn xyz_norm_equalises_the_channel_areas() {
    let out = table(
        "xyz",
        &request(2.0, Some(32), &[("norm", true.into()), ("min", 400.0.into()), ("max", 700.0.into())]),
    );
    let sums = out.table.channel_sums();
    assert!((sums[0] / sums[1] - 1.0).abs() < 1e-5, "{sums:?}");
    assert!((sums[2] / sums[1] - 1.0).abs() < 1e-5, "{sums:?}");
}

#[test]
fn xyz_info_carries_the_transform() {
    let bundle = info("xyz", &request(2.0, Some(32), &[("info", true.into())]));
    let m = bundle.trans_mat.expect("matrix").rows;
    assert_eq!(m[1][2], 0.0);
    assert_eq!(m[2][0], 0.0);
    assert_eq!(m[2][1], 0.0);

    // Equal-area factors come from the requested grid, so a narrow domain
    // moves the X and Z rows.
    let normalised = info(
        "xyz",
        &request(
            2.0,
            Some(32),
            &[
                ("info", true.into()),
                ("norm", true.into()),
                ("min", 400.0.into()),
                ("max", 700.0.into()),
            ],
        ),
    );
    let n = normalised.trans_mat.expect("matrix").rows;
    assert_eq!(n[1], m[1]);
    assert_ne!(n[0], m[0]);
}

#[test]
fn xyz_norm_keeps_the_fitted_matrix_on_the_default_grid() {
    let plain = info("xyz", &request(2.0, Some(32), &[("info", true.into())]));
    let normalised = info(
        "xyz",
        &request(2.0, Some(32), &[("info", true.into()), ("norm", true.into())]),
    );
    assert_eq!(normalised.trans_mat, plain.trans_mat);

    let tables = (
        table("xyz", &request(10.0, Some(50), &[])),
        table("xyz", &request(10.0, Some(50), &[("norm", true.into())])),
    );
    assert_eq!(tables.0.table, tables.1.table);
}

#[test]
fn xy_rows_sum_to_one() {
    let out = table("xy", &request(2.0, Some(32), &[]));
    assert_eq!(out.table.len(), 441);
    for row in &out.table.rows {
        assert!((row.values.iter().sum::<f64>() - 1.0).abs() <= 2e-5);
        assert!(row.values.iter().all(|v| decimals(*v) <= 5));
    }
}

#[test]
fn normalised_white_round_trips_to_the_centre() {
    let bundle = info(
        "xy",
        &request(2.0, Some(32), &[("info", true.into()), ("norm", true.into())]),
    );
    let white = bundle.xyz_white.expect("white");
    for value in white {
        assert!((value - 1.0 / 3.0).abs() < 1e-5, "{white:?}");
    }
    let chromatic = bundle.xyz_tg_purple.expect("chromaticity tangents");
    let tristimulus = bundle.tristimulus_tg_purple.expect("tristimulus tangents");
    assert_eq!(chromatic.len(), 2);
    assert_eq!(chromatic[0][0], tristimulus[0][0]);
    assert_eq!(chromatic[1][0], tristimulus[1][0]);
    assert!(chromatic[0][0] < 450.0 && chromatic[1][0] > 650.0);
}

#[test]
fn purple_rows_are_ordered_by_fraction() {
    let map = request(2.0, Some(32), &[("step_size", 2.0.into())]);
    let xyz = purples("xyz-p", &map);
    let xy = purples("xy-p", &map);
    assert!(!xyz.table.is_empty());
    assert_eq!(xyz.table.channels, vec!["X", "Y", "Z"]);
    assert_eq!(xy.table.channels, vec!["x", "y", "z"]);
    assert_eq!(xyz.table.len(), xy.table.len());
    let fractions: Vec<f64> = xy.table.rows.iter().map(|row| row.fraction).collect();
    assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
    assert!(fractions.iter().all(|t| (0.0..=1.0).contains(t)));

    // Complementary wavelengths of purples lie in the green part of the
    // spectrum.
    for row in &xy.table.rows {
        assert!((480.0..=580.0).contains(&row.complementary_wavelength), "{row:?}");
    }
}

#[test]
fn purple_info_matches_xy_info() {
    let map = request(2.0, Some(32), &[("info", true.into())]);
    assert_eq!(info("xy-p", &map), info("xy", &map));
    assert_eq!(info("xyz-p", &map), info("xy", &map));
}

#[test]
fn standard_xyz_returns_published_values() {
    let out = table("xyz-std", &request(2.0, None, &[]));
    let row = out.table.row_at(555.0).expect("555 nm");
    assert_eq!(row.values[1], 1.0);
    let row = out.table.row_at(600.0).expect("600 nm");
    assert_eq!(row.values, vec![1.0622, 0.631, 0.0008]);
}

#[test]
fn standard_white_is_the_published_equal_energy_point() {
    let two = info("xy-std", &request(2.0, None, &[("info", true.into())]));
    assert_eq!(two.white, Some([0.33331, 0.33329, 0.33340]));
    let ten = info("xy-std", &request(10.0, None, &[("info", true.into())]));
    assert_eq!(ten.white, Some([0.33330, 0.33333, 0.33337]));
    // Independent of the requested sub-range.
    let narrow = info(
        "xy-std",
        &request(2.0, None, &[("info", true.into()), ("min", 450.0.into()), ("max", 650.0.into())]),
    );
    assert_eq!(narrow.white, two.white);
}

#[test]
fn standard_xy_info_bundle() {
    let bundle = info("xy-std", &request(10.0, None, &[("info", true.into())]));
    let white = bundle.white.expect("white");
    assert!(white.iter().all(|v| (0.3..0.37).contains(v)), "{white:?}");
    assert_eq!(bundle.tg_purple.expect("tangents").len(), 2);
    assert!(bundle.norm.is_none());
}
