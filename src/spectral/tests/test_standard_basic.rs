use crate::spectral::{CmfError, Domain, DomainParams, StandardField, StandardObserver};

#[test]
fn published_values_are_returned_exactly() {
    let two = StandardObserver::cie1931().unwrap();
    assert_eq!(two.field(), StandardField::Two);
    assert_eq!(two.eval(555.0).y, 1.0);
    assert_eq!(two.eval(600.0).x, 1.0622);
    assert_eq!(two.eval(450.0).z, 1.77211);
    assert_eq!(two.eval(600.0).y, 0.631);

    let ten = StandardObserver::cie1964().unwrap();
    assert_eq!(ten.eval(555.0).y, 0.99911);
    assert_eq!(ten.eval(450.0).y, 0.089456);
}

#[test]
fn resampled_grid_hits_every_knot() {
    let two = StandardObserver::new(StandardField::Two).unwrap();
    let table = two.sample(&DomainParams::new(390.0, 830.0, 0.5).build().unwrap()).unwrap();
    let row = table.row_at(555.0).expect("555 nm sampled");
    assert_eq!(row.values[1], 1.0);
    assert_eq!(table.len(), 881);
}

#[test]
fn resampling_never_goes_negative() {
    for field in [StandardField::Two, StandardField::Ten] {
        let observer = StandardObserver::new(field).unwrap();
        let table = observer.sample(&Domain::span(380.0, 830.0, 0.1)).unwrap();
        for row in &table.rows {
            assert!(row.values.iter().all(|v| *v >= 0.0), "{field:?} {}", row.wavelength);
        }
    }
}

#[test]
fn between_knots_stays_between_neighbours_on_monotone_runs() {
    let two = StandardObserver::cie1931().unwrap();
    // Y rises monotonically from 500 to 505 nm.
    let (lo, hi) = (two.eval(500.0).y, two.eval(505.0).y);
    let mid = two.eval(502.5).y;
    assert!(lo < mid && mid < hi, "{lo} {mid} {hi}");
}

#[test]
fn only_two_and_ten_degrees_exist() {
    assert_eq!(StandardField::from_field_size(2.0).unwrap(), StandardField::Two);
    assert_eq!(StandardField::from_field_size(10.0).unwrap(), StandardField::Ten);
    assert_eq!(StandardField::Ten.degrees(), 10.0);
    assert_eq!(
        StandardField::from_field_size(4.0).unwrap_err(),
        CmfError::UnsupportedFieldSize { field_size: 4.0 }
    );
    assert!(StandardField::from_field_size(2.000_001).is_err());
}

#[test]
fn outside_the_tabulation_is_rejected() {
    let two = StandardObserver::cie1931().unwrap();
    let err = two.sample(&Domain::span(370.0, 700.0, 5.0)).unwrap_err();
    assert!(matches!(err, CmfError::OutOfRangeParameter { ref name, .. } if name == "domain"));
}
