use std::{fs, path::PathBuf};

use attack_graph::{
    GraphError, load_files,
    render::{self, CircularLayout, ForceDirectedLayout, SvgRenderer},
};
use tempfile::TempDir;

fn write_inputs(dir: &TempDir, topology: &str, connections: &str) -> (PathBuf, PathBuf) {
    let topology_path = dir.path().join("topology.txt");
    let connections_path = dir.path().join("connections.txt");
    fs::write(&topology_path, topology).unwrap();
    fs::write(&connections_path, connections).unwrap();
    (topology_path, connections_path)
}

#[test]
fn test_load_reference_scenario_from_files() {
    let dir = TempDir::new().unwrap();
    let (topology, connections) = write_inputs(
        &dir,
        "10.0.0.1 : CVE-1, CVE-2\n10.0.0.2 : CVE-3\n",
        "10.0.0.1:\n>10.0.0.2\n+10.0.0.3\n-10.0.0.4\n",
    );

    let model = load_files(&topology, &connections).unwrap();

    let nodes: Vec<_> = model
        .nodes()
        .map(|n| (n.id.as_str(), n.vulnerabilities.len(), n.declared))
        .collect();
    assert_eq!(
        nodes,
        [("10.0.0.1", 2, true), ("10.0.0.2", 1, true), ("10.0.0.3", 0, false)]
    );
    let edges: Vec<_> = model.edges().into_iter().map(|e| e.to_string()).collect();
    assert_eq!(edges, ["10.0.0.1 -> 10.0.0.2", "10.0.0.1 -> 10.0.0.3"]);
    let denials: Vec<_> = model.denials().map(|d| d.to_string()).collect();
    assert_eq!(denials, ["10.0.0.1 -x 10.0.0.4"]);
}

#[test]
fn test_missing_file_is_file_not_found() {
    let dir = TempDir::new().unwrap();
    let (topology, _) = write_inputs(&dir, "10.0.0.1 : CVE-1\n", "");
    let missing = dir.path().join("nope.txt");

    let err = load_files(&topology, &missing).unwrap_err();
    match err {
        GraphError::FileNotFound { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_parse_error_names_the_file() {
    let dir = TempDir::new().unwrap();
    let (topology, connections) = write_inputs(&dir, "10.0.0.1 : CVE-1\n10.0.0.2\n", "");

    let err = load_files(&topology, &connections).unwrap_err();
    assert!(matches!(err, GraphError::MalformedTopologyLine { line: 2, .. }));
    assert!(err.to_string().contains(&topology.display().to_string()));
}

#[test]
fn test_render_svg_and_png_files() {
    let dir = TempDir::new().unwrap();
    let (topology, connections) = write_inputs(
        &dir,
        "10.0.0.1 : CVE-1, CVE-2\n10.0.0.2 : CVE-3\n",
        "10.0.0.1:\n>10.0.0.2\n+10.0.0.3\n-10.0.0.4\n",
    );
    let model = load_files(&topology, &connections).unwrap();

    let svg_path = dir.path().join("graph.svg");
    let circular = CircularLayout {
        center: Some("10.0.0.1".into()),
        radius: 8.0,
    };
    render::render_to_path(&model, &circular, &SvgRenderer::default(), &svg_path).unwrap();
    let svg = fs::read_to_string(&svg_path).unwrap();
    assert!(svg.contains("10.0.0.3"));

    let png_path = dir.path().join("graph.png");
    render::render_to_path(&model, &ForceDirectedLayout::default(), &SvgRenderer::default(), &png_path)
        .unwrap();
    let png = fs::read(&png_path).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}
