use approx::assert_relative_eq;

use crate::spectral::{
    CHROMATICITY_CHANNELS, CmfError, SpectralTable, Vec3, XYZ_CHANNELS, chromaticity, plane,
    project, project_strict,
};

fn table(rows: &[(f64, [f64; 3])]) -> SpectralTable {
    SpectralTable::from_vec3(
        XYZ_CHANNELS,
        rows.iter().map(|(w, v)| (*w, Vec3::from_array(*v))),
    )
}

#[test]
fn chromaticity_divides_by_the_sum() {
    let c = chromaticity(Vec3::new(1.0, 2.0, 1.0)).unwrap();
    assert_relative_eq!(c.x, 0.25);
    assert_relative_eq!(c.y, 0.5);
    assert_relative_eq!(c.z, 0.25);
    assert!(chromaticity(Vec3::ZERO).is_none());
    assert!(chromaticity(Vec3::new(f64::NAN, 1.0, 1.0)).is_none());
}

#[test]
fn zero_rows_are_dropped_and_reported() {
    let tristimulus = table(&[
        (400.0, [0.2, 0.1, 0.7]),
        (405.0, [0.0, 0.0, 0.0]),
        (410.0, [1.0, 1.0, 2.0]),
    ]);
    let projection = project(&tristimulus, CHROMATICITY_CHANNELS);
    assert_eq!(projection.dropped, vec![405.0]);
    assert_eq!(projection.dropped_count(), 1);
    assert_eq!(projection.table.len(), 2);
    assert_eq!(projection.table.wavelengths().collect::<Vec<_>>(), vec![400.0, 410.0]);
    for row in &projection.table.rows {
        assert_relative_eq!(row.values.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    let err = project_strict(&tristimulus, CHROMATICITY_CHANNELS).unwrap_err();
    assert_eq!(err, CmfError::DegenerateSample { wavelength: 405.0 });
}

#[test]
fn plane_keeps_the_first_two_coordinates() {
    let projected = project_strict(&table(&[(500.0, [1.0, 3.0, 4.0])]), CHROMATICITY_CHANNELS).unwrap();
    let xy = plane(&projected);
    assert_eq!(xy.channels, vec!["x", "y"]);
    assert_eq!(xy.rows[0].values.len(), 2);
    assert_relative_eq!(xy.rows[0].values[1], 0.375);
}
