use cmf_engine::Engine;
use cmf_engine::families::{Family, FamilyRegistry, Output, ParamMap, ParamValue, Representation};
use cmf_engine::spectral::{CmfError, DomainParams, Flags, ObserverParams};

fn params(entries: &[(&str, ParamValue)]) -> ParamMap {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_owned(), value.clone()))
        .collect()
}

fn observer(field_size: f64, age: i64) -> ParamMap {
    params(&[("field_size", field_size.into()), ("age", age.into())])
}

#[test]
fn engine_initializes() {
    let engine = Engine::new();
    assert!(engine.is_initialized());
}

#[test]
fn default_lms_request_covers_390_to_830() {
    let engine = Engine::new();
    let output = engine.compute_output("lms", &observer(2.0, 32)).expect("lms");
    let table = output.as_table().expect("table output");
    assert_eq!(table.table.len(), 441);
    assert_eq!(table.table.rows[0].wavelength, 390.0);
    assert_eq!(table.table.rows[440].wavelength, 830.0);
    assert!(table.dropped.is_empty());
}

#[test]
fn reversed_domain_is_invalid() {
    let engine = Engine::new();
    let mut map = observer(2.0, 32);
    map.insert("min".into(), 500.0.into());
    map.insert("max".into(), 400.0.into());
    let err = engine.compute_output("xyz", &map).unwrap_err();
    assert_eq!(err.kind(), "InvalidDomain");
}

#[test]
fn too_young_observer_is_out_of_range() {
    let engine = Engine::new();
    let err = engine.compute_output("lms", &observer(2.0, 15)).unwrap_err();
    assert!(matches!(err, CmfError::OutOfRangeParameter { ref name, .. } if name == "age"));
}

#[test]
fn age_is_rounded_to_whole_years() {
    let engine = Engine::new();
    let mut map = observer(2.0, 32);
    map.insert("age".into(), 32.4.into());
    let rounded = engine.compute_output("lms", &map).unwrap();
    let exact = engine.compute_output("lms", &observer(2.0, 32)).unwrap();
    assert_eq!(rounded, exact);
}

#[test]
fn unknown_family_suggests_a_name() {
    let err = FamilyRegistry::default().resolve("macleod-boyton").unwrap_err();
    assert_eq!(
        err,
        CmfError::UnknownFamily {
            name: "macleod-boyton".into(),
            suggestion: Some("macleod-boynton".into()),
        }
    );
    assert!(err.to_string().contains("did you mean `macleod-boynton`"));
}

#[test]
fn unknown_parameter_is_rejected() {
    let engine = Engine::new();
    let mut map = observer(2.0, 32);
    map.insert("stepsize".into(), 1.0.into());
    let err = engine.compute_output("lms", &map).unwrap_err();
    assert_eq!(err.kind(), "OutOfRangeParameter");
    assert!(err.to_string().contains("step_size"));
}

#[test]
fn standard_families_reject_age() {
    let engine = Engine::new();
    let err = engine.compute_output("xyz-std", &observer(2.0, 32)).unwrap_err();
    assert_eq!(err.kind(), "OutOfRangeParameter");

    let err = engine
        .compute_output("xy-std", &params(&[("field_size", 4.0.into())]))
        .unwrap_err();
    assert_eq!(err, CmfError::UnsupportedFieldSize { field_size: 4.0 });
}

#[test]
fn flags_arrive_as_booleans_or_as_a_list() {
    let engine = Engine::new();
    let mut listed = observer(2.0, 32);
    listed.insert("optional".into(), "norm, info".into());
    let mut separate = observer(2.0, 32);
    separate.insert("norm".into(), true.into());
    separate.insert("info".into(), true.into());
    let a = engine.compute_output("xyz", &listed).unwrap();
    let b = engine.compute_output("xyz", &separate).unwrap();
    assert_eq!(a, b);
    assert!(a.as_info().and_then(|info| info.trans_mat).is_some());
}

#[test]
fn unsupported_flag_combination_is_rejected() {
    let engine = Engine::new();
    let mut map = observer(2.0, 32);
    map.insert("log".into(), true.into());
    let err = engine.compute_output("xyz", &map).unwrap_err();
    assert!(matches!(err, CmfError::OutOfRangeParameter { ref name, .. } if name == "flag"));
}

#[test]
fn typed_and_untyped_requests_agree() {
    let typed = Representation::physiological(
        Family::MacLeodBoynton,
        ObserverParams::new(10.0, 40.0).unwrap(),
        DomainParams::new(400.0, 700.0, 2.0),
        Flags::default(),
    )
    .unwrap();
    let mut map = observer(10.0, 40);
    map.insert("min".into(), 400.0.into());
    map.insert("max".into(), 700.0.into());
    map.insert("step_size".into(), 2.0.into());
    let untyped = Engine::new().request("mb", &map).unwrap();
    assert_eq!(typed, untyped);
    assert_eq!(typed.compute().unwrap(), untyped.compute().unwrap());
}

#[test]
fn plot_tables_use_a_tenth_of_a_nanometre() {
    let engine = Engine::new();
    let mut map = observer(2.0, 32);
    map.insert("min".into(), 400.0.into());
    map.insert("max".into(), 700.0.into());
    map.insert("step_size".into(), 5.0.into());
    map.insert("info".into(), true.into());
    let plot = engine.compute_plot_output("xy", &map).unwrap();
    let Output::Table(table) = plot else {
        panic!("plot ignores info and returns a table");
    };
    assert_eq!(table.table.len(), 3001);
}

#[test]
fn outputs_serialise_with_a_kind_tag() {
    let engine = Engine::new();
    let mut map = observer(2.0, 32);
    map.insert("step_size".into(), 5.0.into());
    let output = engine.compute_output("xy", &map).unwrap();
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["kind"], "table");
    assert_eq!(json["key"], "wavelength");
    assert_eq!(json["channels"], serde_json::json!(["x", "y", "z"]));
    assert_eq!(json["rows"][0].as_array().map(Vec::len), Some(4));

    let purples = engine.compute_output("xy-p", &map).unwrap();
    let json = serde_json::to_value(&purples).unwrap();
    assert_eq!(json["kind"], "purples");
    assert_eq!(json["key"], "complementary_wavelength");
}

#[test]
fn computations_are_deterministic() {
    let engine = Engine::new();
    let mut map = observer(4.0, 55);
    map.insert("step_size".into(), 2.5.into());
    for family in ["lms", "lms-mb", "lms-mw", "xyz", "xy", "xyz-p", "xy-p"] {
        let a = engine.compute_output(family, &map).unwrap();
        let b = engine.compute_output(family, &map).unwrap();
        assert_eq!(a, b, "{family}");
    }
}
