use crate::models::{MindmapDiagram, MindmapSide};
use crate::*;
use futures::executor::block_on;

fn parse_mindmap(text: &str) -> MindmapDiagram {
    let engine = Engine::new();
    let res = block_on(engine.parse_diagram(text, ParseOptions::default())).unwrap();
    assert_eq!(res.kind, DiagramKind::Mindmap);
    match res.model {
        DiagramModel::Mindmap(db) => db,
        other => panic!("expected mindmap model, got {:?}", other.kind()),
    }
}

#[test]
fn star_children_alternate_sides() {
    let db = parse_mindmap(
        "@startmindmap\n* Root\n** Right1\n*** Deep\n** Left1\n** Right2\n@endmindmap",
    );
    let sides: Vec<_> = db.nodes.iter().map(|n| (n.label.as_str(), n.side)).collect();
    assert_eq!(
        sides,
        vec![
            ("Root", MindmapSide::Center),
            ("Right1", MindmapSide::Right),
            ("Deep", MindmapSide::Right),
            ("Left1", MindmapSide::Left),
            ("Right2", MindmapSide::Right),
        ]
    );
    assert_eq!(db.root().unwrap().name, "n0");
    assert_eq!(db.nodes.get("n2").unwrap().parent.as_deref(), Some("n1"));
    assert_eq!(db.nodes.get("n2").unwrap().level, 3);
    assert_eq!(db.relations.len(), 4);
    assert!(db.relations.iter().all(|r| r.kind == RelationKind::Containment));
}

#[test]
fn plus_and_minus_pick_sides() {
    let db = parse_mindmap("@startmindmap\n* Root\n++ R\n-- L\n--- L2\n@endmindmap");
    let sides: Vec<_> = db.nodes.iter().map(|n| n.side).collect();
    assert_eq!(
        sides,
        vec![
            MindmapSide::Center,
            MindmapSide::Right,
            MindmapSide::Left,
            MindmapSide::Left,
        ]
    );
    assert_eq!(db.children_of("n0").count(), 2);
}

#[test]
fn multiline_boxless_and_colored_nodes() {
    let db = parse_mindmap(
        "@startmindmap\n* Root\n**:first\nsecond;\n**_ boxless\n**[#Orange] Colored\n@endmindmap",
    );
    let labels: Vec<_> = db.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["Root", "first\nsecond", "boxless", "Colored"]);
    assert!(db.nodes.get("n2").unwrap().boxless);
    assert!(!db.nodes.get("n3").unwrap().boxless);
}

#[test]
fn second_root_is_reported() {
    let res = Engine::new()
        .parse_diagram_sync("@startmindmap\n* A\n* B\n@endmindmap", ParseOptions::lenient())
        .unwrap();
    assert_eq!(res.model.node_count(), 1);
    assert_eq!(res.diagnostics.len(), 1);
    assert_eq!(res.diagnostics[0].line, 3);
}
