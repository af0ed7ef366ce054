use pumldraw_core::{DiagramModel, Engine, ParseOptions};
use pumldraw_render::text::DeterministicTextMeasurer;
use pumldraw_render::{RenderOptions, layout_model, render_model, resolve_edges};
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn parse_fixture(kind: &str, name: &str) -> DiagramModel {
    let path = workspace_root().join("fixtures").join(kind).join(name);
    let text = std::fs::read_to_string(&path).expect("fixture");
    Engine::new()
        .parse_diagram_sync(&text, ParseOptions::default())
        .expect("parse")
        .model
}

fn preview(kind: &str, name: &str) -> String {
    render_model(&parse_fixture(kind, name), &RenderOptions::default())
        .unwrap()
        .preview
}

const ALL: [&str; 8] = [
    "class",
    "sequence",
    "state",
    "mindmap",
    "er",
    "deployment",
    "usecase",
    "activity",
];

#[test]
fn svg_root_is_sized_from_layout_bounds() {
    let measurer = DeterministicTextMeasurer::default();
    for kind in ALL {
        let model = parse_fixture(kind, "basic.puml");
        let options = RenderOptions::default();
        let layout = layout_model(&model, &options.layout, &measurer).unwrap();
        let svg = render_model(&model, &options).unwrap().preview;

        let doc = roxmltree::Document::parse(&svg).expect("well-formed SVG");
        let root = doc.root_element();
        assert_eq!(root.tag_name().name(), "svg", "{kind}");
        let width: f64 = root.attribute("width").unwrap().parse().unwrap();
        let height: f64 = root.attribute("height").unwrap().parse().unwrap();
        assert!((width - layout.bounds.width()).abs() < 1e-6, "{kind}");
        assert!((height - layout.bounds.height()).abs() < 1e-6, "{kind}");
        assert_eq!(
            root.attribute("viewBox").unwrap(),
            format!("0 0 {} {}", root.attribute("width").unwrap(), root.attribute("height").unwrap())
        );
    }
}

#[test]
fn shared_markers_are_defined() {
    let svg = preview("class", "basic.puml");
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let markers: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name("marker"))
        .filter_map(|n| n.attribute("id"))
        .collect();
    for id in ["arrow", "triangle", "diamond", "diamond-filled"] {
        assert!(markers.contains(&id), "missing marker {id}");
    }
}

#[test]
fn one_edge_group_per_resolved_edge() {
    let measurer = DeterministicTextMeasurer::default();
    for kind in ALL {
        let model = parse_fixture(kind, "basic.puml");
        let options = RenderOptions::default();
        let layout = layout_model(&model, &options.layout, &measurer).unwrap();
        let edges = resolve_edges(&model, &layout);
        let svg = render_model(&model, &options).unwrap().preview;
        let doc = roxmltree::Document::parse(&svg).unwrap();
        let groups = doc
            .descendants()
            .filter(|n| n.has_tag_name("g") && n.attribute("class") == Some("edge"))
            .count();
        assert_eq!(groups, edges.len(), "{kind}");
    }
}

#[test]
fn inheritance_and_dashing_follow_relation_kind() {
    let svg = preview("class", "basic.puml");
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let lines: Vec<roxmltree::Node> = doc
        .descendants()
        .filter(|n| n.has_tag_name("line") && n.parent().and_then(|p| p.attribute("class")) == Some("edge"))
        .collect();
    assert!(lines.iter().any(|l| {
        l.attribute("marker-end") == Some("url(#triangle)") && l.attribute("stroke-dasharray").is_some()
    }));
    assert!(lines.iter().any(|l| {
        l.attribute("marker-end") == Some("url(#triangle)") && l.attribute("stroke-dasharray").is_none()
    }));
    assert!(lines.iter().any(|l| l.attribute("marker-start") == Some("url(#diamond-filled)")));
    assert_eq!(
        doc.descendants()
            .find(|n| n.has_tag_name("title"))
            .and_then(|n| n.text()),
        Some("Shapes")
    );
}

#[test]
fn activity_primitives() {
    let svg = preview("activity", "basic.puml");
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let radii: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name("circle"))
        .filter_map(|n| n.attribute("r"))
        .collect();
    assert!(radii.contains(&"15"));
    assert!(radii.contains(&"12"));
    assert!(radii.contains(&"18"));
    let polygons = doc.descendants().filter(|n| n.has_tag_name("polygon")).count();
    assert_eq!(polygons, 2);
}

#[test]
fn loop_back_edges_route_around_the_side() {
    let svg = preview("activity", "loop.puml");
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let polylines = doc
        .descendants()
        .filter(|n| n.has_tag_name("polyline") && n.parent().and_then(|p| p.attribute("class")) == Some("edge"))
        .count();
    assert_eq!(polylines, 1);
}

#[test]
fn sequence_draws_lifelines_and_divider() {
    let svg = preview("sequence", "basic.puml");
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let count = |class: &str| {
        doc.descendants()
            .filter(|n| n.attribute("class") == Some(class))
            .count()
    };
    assert_eq!(count("lifeline"), 3);
    assert_eq!(count("divider"), 1);
    assert_eq!(count("note"), 2);
}
