use taylogram_core::{
    DiagramOptions, Error, SampleSet, Series, StyleConfig, TaylorDiagram, stats,
};

fn reference() -> Series {
    Series::new("obs", vec![1.0, 2.0, 3.0, 4.0, 5.0])
}

#[test]
fn identical_sample_coincides_with_reference_point() {
    let mut samples = SampleSet::new();
    samples.insert("model-a".to_string(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    let d = TaylorDiagram::with_defaults(reference(), samples).unwrap();

    let p = &d.samples()[0];
    assert_eq!(p.correlation, 1.0);
    assert_eq!(p.theta, 0.0);
    assert!((p.radius - d.refstd()).abs() < 1e-12);
    // pandas-style sample stddev of [1..5]
    assert!((d.refstd() - 2.5f64.sqrt()).abs() < 1e-12);
}

#[test]
fn anticorrelated_sample_is_rejected() {
    let mut samples = SampleSet::new();
    samples.insert("model-b".to_string(), vec![5.0, 4.0, 3.0, 2.0, 1.0]);
    let err = TaylorDiagram::with_defaults(reference(), samples).unwrap_err();
    match err {
        Error::NegativeCorrelation { name, r } => {
            assert_eq!(name, "model-b");
            assert!((r + 1.0).abs() < 1e-9);
        }
        other => panic!("expected NegativeCorrelation, got {other:?}"),
    }
}

#[test]
fn uncorrelated_sample_maps_to_quarter_turn() {
    let mut samples = SampleSet::new();
    samples.insert("noise".to_string(), vec![1.0, 3.0, 1.0]);
    let d = TaylorDiagram::with_defaults(Series::new("obs", vec![1.0, 2.0, 3.0]), samples).unwrap();
    assert!((d.samples()[0].theta - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
}

#[test]
fn misaligned_sample_fails_fast() {
    let mut samples = SampleSet::new();
    samples.insert("short".to_string(), vec![1.0, 2.0, 3.0]);
    let err = TaylorDiagram::with_defaults(reference(), samples).unwrap_err();
    match err {
        Error::LengthMismatch {
            name,
            sample_len,
            reference_len,
            ..
        } => {
            assert_eq!(name, "short");
            assert_eq!(sample_len, 3);
            assert_eq!(reference_len, 5);
        }
        other => panic!("expected LengthMismatch, got {other:?}"),
    }
}

#[test]
fn style_shortfall_is_a_construction_error() {
    let mut samples = SampleSet::new();
    for i in 0..7 {
        let values: Vec<f64> = (0..5).map(|j| (i + 1) as f64 * (j + 1) as f64).collect();
        samples.insert(format!("model-{i}"), values);
    }
    // Default styles cover six samples; the seventh must be reported.
    let err = TaylorDiagram::new(
        reference(),
        samples,
        StyleConfig::default(),
        DiagramOptions::default(),
    )
    .unwrap_err();
    match err {
        Error::StyleShortfall { styles, samples } => {
            assert_eq!(styles, 6);
            assert_eq!(samples, 7);
        }
        other => panic!("expected StyleShortfall, got {other:?}"),
    }
}

#[test]
fn constant_sample_has_no_defined_correlation() {
    let mut samples = SampleSet::new();
    samples.insert("flat".to_string(), vec![2.0; 5]);
    let err = TaylorDiagram::with_defaults(reference(), samples).unwrap_err();
    assert!(matches!(err, Error::ZeroVariance { name } if name == "flat"));
}

#[test]
fn non_finite_values_are_reported_with_their_index() {
    let mut samples = SampleSet::new();
    samples.insert("holey".to_string(), vec![1.0, f64::NAN, 3.0, 4.0, 5.0]);
    let err = TaylorDiagram::with_defaults(reference(), samples).unwrap_err();
    assert!(matches!(err, Error::NonFiniteValue { name, index } if name == "holey" && index == 1));
}

#[test]
fn zero_scale_config_fails_construction_not_layout() {
    // A JSON config with scale 0 used to reach layout and divide the pixel
    // radius by a zero extent; it must be a construction error.
    let options: DiagramOptions = serde_json::from_str(r#"{"scale": 0.0}"#).unwrap();
    let mut samples = SampleSet::new();
    samples.insert("model".to_string(), vec![1.1, 2.2, 2.9, 4.1, 4.8]);
    let err =
        TaylorDiagram::new(reference(), samples, StyleConfig::default(), options).unwrap_err();
    assert!(matches!(err, Error::InvalidOptions { .. }));
}

#[test]
fn radial_extent_scales_the_largest_std() {
    let mut samples = SampleSet::new();
    samples.insert("wide".to_string(), vec![2.0, 4.0, 6.0, 8.0, 10.0]);
    let d = TaylorDiagram::with_defaults(reference(), samples).unwrap();
    let wide_std = stats::stddev(&[2.0, 4.0, 6.0, 8.0, 10.0]);
    assert!((d.radial_extent() - wide_std * 1.2).abs() < 1e-12);
    assert!((d.view_radius() - wide_std).abs() < 1e-12);
}

#[test]
fn sample_order_is_input_order() {
    let mut samples = SampleSet::new();
    samples.insert("z".to_string(), vec![1.0, 2.0, 3.0, 4.0, 5.1]);
    samples.insert("a".to_string(), vec![1.0, 2.0, 3.0, 4.2, 5.0]);
    let d = TaylorDiagram::with_defaults(reference(), samples).unwrap();
    let names: Vec<&str> = d.samples().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["z", "a"]);
}
