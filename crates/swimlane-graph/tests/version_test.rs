#[test]
fn version_matches_cargo_pkg_version() {
    assert_eq!(swimlane_graph::VERSION, env!("CARGO_PKG_VERSION"));
    assert!(!swimlane_graph::VERSION.is_empty());
}
