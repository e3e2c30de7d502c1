use approx::assert_relative_eq;

use crate::spectral::{
    CmfError, ConeFundamentals, Domain, DomainParams, LMS_CHANNELS, ObserverParams,
    OpticalDensities,
};

#[test]
fn lms_is_finite_and_positive_for_supported_observers() {
    let domain = Domain::main();
    for field_size in [1.0, 2.0, 4.5, 10.0, 20.0] {
        for age in [20.0, 32.0, 60.0, 80.0] {
            let observer = ObserverParams::new(field_size, age).expect("observer");
            let cones = ConeFundamentals::new(observer).expect("cones");
            let table = cones.sample(&domain);
            assert_eq!(table.channels, LMS_CHANNELS.to_vec());
            for row in &table.rows {
                for value in &row.values {
                    assert!(value.is_finite() && *value > 0.0, "{observer:?} {} {value}", row.wavelength);
                }
            }
        }
    }
}

#[test]
fn two_degree_observer_at_32_reproduces_cie_2006_fundamentals() {
    // (nm, L, M, S) of the CIE 2006 2° fundamentals, linear energy units.
    let published = [
        (390.0, 4.15003e-4, 3.68349e-4, 9.54729e-3),
        (440.0, 4.02563e-2, 6.47782e-2, 9.91020e-1),
        (500.0, 2.88959e-1, 4.27764e-1, 1.22839e-1),
        (570.0, 9.99993e-1, 8.13509e-1, 2.81800e-4),
        (600.0, 8.33982e-1, 3.34429e-1, 1.83459e-5),
    ];
    let cones = ConeFundamentals::new(ObserverParams::new(2.0, 32.0).unwrap()).unwrap();
    for (wavelength, l, m, s) in published {
        let lms = cones.eval(wavelength);
        assert_relative_eq!(lms.x, l, max_relative = 1e-5);
        assert_relative_eq!(lms.y, m, max_relative = 1e-5);
        assert_relative_eq!(lms.z, s, max_relative = 1e-5);
    }
    // S is not tabulated past 615 nm; L and M are.
    let far_red = cones.eval(700.0);
    assert_relative_eq!(far_red.x, 5.89749e-3, max_relative = 1e-5);
    assert_relative_eq!(far_red.y, 3.65317e-4, max_relative = 1e-5);
}

#[test]
fn every_channel_peaks_at_one() {
    let cones = ConeFundamentals::new(ObserverParams::default()).expect("cones");
    let fine = Domain::model_fine();
    let table = cones.sample(&fine);
    for channel in 0..3 {
        let peak = table.column(channel).fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(peak, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn cone_peaks_are_ordered_s_m_l() {
    let cones = ConeFundamentals::new(ObserverParams::default()).expect("cones");
    let table = cones.sample(&Domain::model_fine());
    let peak_wavelength = |channel: usize| {
        table
            .rows
            .iter()
            .max_by(|a, b| a.values[channel].total_cmp(&b.values[channel]))
            .map(|row| row.wavelength)
            .unwrap()
    };
    let (l, m, s) = (peak_wavelength(0), peak_wavelength(1), peak_wavelength(2));
    assert!(s < m && m < l, "peaks S {s} M {m} L {l}");
    assert!((420.0..460.0).contains(&s));
}

#[test]
fn optical_densities_follow_field_size_and_age() {
    let small = OpticalDensities::for_observer(&ObserverParams::new(2.0, 32.0).unwrap());
    let large = OpticalDensities::for_observer(&ObserverParams::new(10.0, 32.0).unwrap());
    assert!(large.photopigment_lm < small.photopigment_lm);
    assert!(large.photopigment_s < small.photopigment_s);
    assert!(large.macular_peak < small.macular_peak);
    assert_relative_eq!(small.lens_age_factor, 1.0);

    let old = OpticalDensities::for_observer(&ObserverParams::new(2.0, 70.0).unwrap());
    assert_relative_eq!(old.lens_age_factor, 1.56 + 0.0667 * 10.0, epsilon = 1e-12);
    let sixty = OpticalDensities::for_observer(&ObserverParams::new(2.0, 60.0).unwrap());
    assert_relative_eq!(sixty.lens_age_factor, 1.56, epsilon = 1e-12);
}

#[test]
fn older_lens_absorbs_more_short_wavelength_light() {
    let young = ConeFundamentals::new(ObserverParams::new(2.0, 20.0).unwrap()).unwrap();
    let old = ConeFundamentals::new(ObserverParams::new(2.0, 80.0).unwrap()).unwrap();
    // Peak normalised, so compare S relative to its own peak deep in the blue.
    assert!(old.eval(400.0).z < young.eval(400.0).z);
}

#[test]
fn out_of_range_observer_is_rejected() {
    let err = ObserverParams::new(2.0, 15.0).unwrap_err();
    assert!(matches!(err, CmfError::OutOfRangeParameter { ref name, .. } if name == "age"));

    let err = ObserverParams::new(25.0, 32.0).unwrap_err();
    assert!(matches!(err, CmfError::OutOfRangeParameter { ref name, .. } if name == "field_size"));

    let err = ConeFundamentals::new(ObserverParams { field_size: 2.0, age: 90.0 }).unwrap_err();
    assert_eq!(err.kind(), "OutOfRangeParameter");
}

#[test]
fn sampling_is_deterministic() {
    let observer = ObserverParams::new(7.0, 45.0).unwrap();
    let domain = DomainParams::new(395.0, 780.0, 0.5).build().unwrap();
    let a = ConeFundamentals::new(observer).unwrap().sample(&domain);
    let b = ConeFundamentals::new(observer).unwrap().sample(&domain);
    assert_eq!(a, b);
}
