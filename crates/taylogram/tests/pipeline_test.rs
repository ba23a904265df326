use taylogram::render::{HeadlessRenderer, sanitize_svg_id};
use taylogram::{Error, SampleSet, Series, TaylorDiagram};

fn gauge_reference() -> Series {
    Series::new("gauge", vec![1.0, 2.0, 3.0, 4.0, 5.0])
}

#[test]
fn end_to_end_identical_sample_coincides_with_reference() {
    let mut samples = SampleSet::new();
    samples.insert("sat-a".to_string(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    let diagram = TaylorDiagram::with_defaults(gauge_reference(), samples).unwrap();

    let renderer = HeadlessRenderer::new();
    let layout = renderer.layout(&diagram).unwrap();

    let reference = &layout.markers[0];
    let sample = &layout.markers[1];
    assert!((reference.x - sample.x).abs() < 1e-9);
    assert!((reference.y - sample.y).abs() < 1e-9);
    // Sample stddev of [1..5], pandas-style n-1 denominator.
    assert!((sample.radius - 2.5f64.sqrt()).abs() < 1e-12);
}

#[test]
fn end_to_end_reversed_sample_is_a_validation_error() {
    let mut samples = SampleSet::new();
    samples.insert("sat-b".to_string(), vec![5.0, 4.0, 3.0, 2.0, 1.0]);
    let err = TaylorDiagram::with_defaults(gauge_reference(), samples).unwrap_err();
    assert!(matches!(err, Error::NegativeCorrelation { .. }));
}

#[test]
fn three_diagrams_side_by_side_get_distinct_ids() {
    let renderer = HeadlessRenderer::new().with_legend(true);
    let mut svgs = Vec::new();
    for cell in ["cell 0", "cell 1", "cell 2"] {
        let mut samples = SampleSet::new();
        samples.insert("model".to_string(), vec![1.1, 2.2, 2.9, 4.1, 4.8]);
        let diagram = TaylorDiagram::with_defaults(gauge_reference(), samples).unwrap();
        svgs.push(
            renderer
                .render_svg_with_diagram_id(&diagram, cell)
                .unwrap(),
        );
    }
    assert!(svgs[0].contains(r#"id="cell-0""#));
    assert!(svgs[1].contains(r#"id="cell-1""#));
    assert!(svgs[2].contains(r#"id="cell-2""#));
    assert_eq!(sanitize_svg_id("cell 2"), "cell-2");

    // Same data, different ids only.
    let normalized: Vec<String> = svgs
        .iter()
        .map(|s| s.replace("cell-0", "X").replace("cell-1", "X").replace("cell-2", "X"))
        .collect();
    assert_eq!(normalized[0], normalized[1]);
    assert_eq!(normalized[1], normalized[2]);
}

#[test]
fn rendered_svg_parses_and_carries_all_points() {
    let mut samples = SampleSet::new();
    samples.insert("a".to_string(), vec![1.2, 1.9, 3.1, 4.2, 4.9]);
    samples.insert("b".to_string(), vec![0.9, 2.1, 3.0, 3.9, 5.3]);
    let diagram = TaylorDiagram::with_defaults(gauge_reference(), samples).unwrap();
    let svg = HeadlessRenderer::new().render_svg(&diagram).unwrap();

    let doc = roxmltree::Document::parse(&svg).unwrap();
    let markers = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("taylorMarker"))
        .count();
    assert_eq!(markers, 3);
}
