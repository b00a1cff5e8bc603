use swimlane_layout::{Error, LayoutConfig, Orientation};

#[test]
fn defaults_match_documented_values() {
    let c = LayoutConfig::default();
    assert_eq!(c.orientation, Orientation::North);
    assert_eq!(c.intra_cell_spacing, 30.0);
    assert_eq!(c.inter_rank_cell_spacing, 100.0);
    assert_eq!(c.inter_hierarchy_spacing, 60.0);
    assert_eq!(c.parallel_edge_spacing, 10.0);
    assert_eq!(c.parent_border, 0.0);
    assert!(!c.resize_parent);
    assert!(!c.move_parent);
    assert!(!c.maintain_parent_location);
    assert!(c.disable_edge_style);
    assert!(c.traverse_ancestors);
    assert!(c.tighten_to_source);
    assert!(c.fine_tuning);
    assert_eq!(c.dummy_vertex_width, 50.0);
    assert_eq!(c.max_crossing_iterations, 24);
    assert_eq!(c.crossing_iterations_without_improvement, 2);
    assert!(c.validate().is_ok());
}

#[test]
fn from_json_fills_missing_fields_with_defaults() {
    let c = LayoutConfig::from_json(
        r#"{"orientation":"west","intraCellSpacing":12.5,"resizeParent":true}"#,
    )
    .unwrap();
    assert_eq!(c.orientation, Orientation::West);
    assert_eq!(c.intra_cell_spacing, 12.5);
    assert!(c.resize_parent);
    assert_eq!(c.inter_rank_cell_spacing, 100.0);
    assert!(c.fine_tuning);
}

#[test]
fn serializes_with_camel_case_keys() {
    let json = serde_json::to_value(LayoutConfig::default()).unwrap();
    assert_eq!(json["orientation"], "north");
    assert_eq!(json["interRankCellSpacing"], 100.0);
    assert_eq!(json["maintainParentLocation"], false);
}

#[test]
fn negative_spacing_is_rejected() {
    let err = LayoutConfig::from_json(r#"{"parallelEdgeSpacing":-1}"#).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidSpacing {
            name: "parallelEdgeSpacing",
            ..
        }
    ));

    let c = LayoutConfig {
        parent_border: f64::NAN,
        ..Default::default()
    };
    assert!(matches!(
        c.validate(),
        Err(Error::InvalidSpacing {
            name: "parentBorder",
            ..
        })
    ));
}

#[test]
fn malformed_json_is_a_config_error() {
    assert!(matches!(
        LayoutConfig::from_json(r#"{"orientation":"up"}"#),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        LayoutConfig::from_json("not json"),
        Err(Error::Config(_))
    ));
}
