use crate::models::{ActivityDiagram, ActivityNodeType};
use crate::*;
use futures::executor::block_on;

fn parse_activity_full(text: &str) -> (ActivityDiagram, Vec<Diagnostic>) {
    let engine = Engine::new();
    let res = block_on(engine.parse_diagram(text, ParseOptions::default())).unwrap();
    assert_eq!(res.kind, DiagramKind::Activity);
    match res.model {
        DiagramModel::Activity(db) => (db, res.diagnostics),
        other => panic!("expected activity model, got {:?}", other.kind()),
    }
}

fn parse_activity(text: &str) -> ActivityDiagram {
    parse_activity_full(text).0
}

fn types(db: &ActivityDiagram) -> Vec<&'static str> {
    db.nodes.iter().map(|n| n.node_type.as_str()).collect()
}

fn edges(db: &ActivityDiagram) -> Vec<(&str, &str, Option<&str>)> {
    db.edges
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str(), e.label.as_deref()))
        .collect()
}

const ORDER: &str = r#"@startuml
start
:Receive order;
if (In stock?) then (yes)
  :Ship;
else (no)
  :Backorder;
endif
stop
@enduml"#;

#[test]
fn if_else_reconstructs_both_branches() {
    let db = parse_activity(ORDER);
    assert_eq!(
        types(&db),
        vec!["start", "action", "decision", "action", "else_marker", "action", "merge", "end"]
    );
    assert_eq!(db.nodes[2].label, "In stock?");
    assert_eq!(db.nodes[2].yes_branch.as_deref(), Some("yes"));
    assert_eq!(db.nodes[4].related_decision.as_deref(), Some("a2"));
    assert_eq!(db.nodes[6].related_decision.as_deref(), Some("a2"));
    assert_eq!(
        edges(&db),
        vec![
            ("a0", "a1", None),
            ("a1", "a2", None),
            ("a2", "a3", Some("yes")),
            ("a2", "a5", Some("no")),
            ("a3", "a6", None),
            ("a5", "a6", None),
            ("a6", "a7", None),
        ]
    );
    assert!(db.edges.iter().all(|e| e.kind == RelationKind::Transition));
}

#[test]
fn markers_are_never_edge_endpoints() {
    let db = parse_activity(ORDER);
    let markers: Vec<&str> = db
        .nodes
        .iter()
        .filter(|n| n.is_marker())
        .map(|n| n.name.as_str())
        .collect();
    assert!(!markers.is_empty());
    for edge in &db.edges {
        assert!(!markers.contains(&edge.from.as_str()));
        assert!(!markers.contains(&edge.to.as_str()));
    }
    assert_eq!(db.visible_nodes().count(), 7);
}

#[test]
fn while_loop_links_back_to_its_decision() {
    let db = parse_activity("start\nwhile (more?) is (yes)\n  :work;\nendwhile (no)\nstop");
    assert_eq!(types(&db), vec!["start", "decision", "action", "merge", "end"]);
    assert!(db.nodes[1].looping);
    assert!(db.nodes[3].looping);
    assert_eq!(
        edges(&db),
        vec![
            ("a0", "a1", None),
            ("a1", "a2", Some("yes")),
            ("a1", "a4", Some("no")),
            ("a2", "a3", None),
            ("a3", "a1", None),
        ]
    );
}

#[test]
fn fork_branches_meet_at_the_join() {
    let db = parse_activity("start\nfork\n  :A;\nfork again\n  :B;\nend fork\nstop");
    assert_eq!(
        types(&db),
        vec!["start", "fork", "action", "fork_again_marker", "action", "join", "end"]
    );
    assert_eq!(
        edges(&db),
        vec![
            ("a0", "a1", None),
            ("a1", "a2", None),
            ("a1", "a4", None),
            ("a2", "a5", None),
            ("a4", "a5", None),
            ("a5", "a6", None),
        ]
    );
}

#[test]
fn if_without_else_has_an_implicit_bypass() {
    let db = parse_activity("start\nif (x?) then (yes)\n  :A;\nendif\nstop");
    assert_eq!(
        edges(&db),
        vec![
            ("a0", "a1", None),
            ("a1", "a2", Some("yes")),
            ("a1", "a3", None),
            ("a2", "a3", None),
            ("a3", "a4", None),
        ]
    );
}

#[test]
fn elseif_label_falls_back_to_its_condition() {
    let db = parse_activity(
        "start\nif (a?) then (yes)\n  :A;\nelseif (b) then\n  :B;\nelse\n  :C;\nendif\nstop",
    );
    assert_eq!(db.nodes[3].node_type, ActivityNodeType::ElseifMarker);
    assert_eq!(db.nodes[3].label, "b");
    let from_decision: Vec<_> = edges(&db).into_iter().filter(|e| e.0 == "a1").collect();
    assert_eq!(
        from_decision,
        vec![("a1", "a2", Some("yes")), ("a1", "a4", Some("b")), ("a1", "a6", None)]
    );
    assert!(edges(&db).contains(&("a4", "a7", None)));
    assert!(edges(&db).contains(&("a7", "a8", None)));
}

#[test]
fn nested_if_else_resolves_to_the_outer_merge() {
    let db = parse_activity(
        "start\nif (a) then\n  if (b) then\n    :X;\n  else\n    :Y;\n  endif\nelse\n  :Z;\nendif\nstop",
    );
    assert_eq!(
        types(&db),
        vec![
            "start",
            "decision",
            "decision",
            "action",
            "else_marker",
            "action",
            "merge",
            "else_marker",
            "action",
            "merge",
            "end",
        ]
    );
    assert_eq!(db.nodes[6].related_decision.as_deref(), Some("a2"));
    assert_eq!(db.nodes[7].related_decision.as_deref(), Some("a1"));
    assert_eq!(
        edges(&db),
        vec![
            ("a0", "a1", None),
            ("a1", "a2", None),
            ("a1", "a8", None),
            ("a2", "a3", None),
            ("a2", "a5", None),
            ("a3", "a6", None),
            ("a5", "a6", None),
            ("a6", "a9", None),
            ("a8", "a9", None),
            ("a9", "a10", None),
        ]
    );
    assert_eq!(
        db.count(ActivityNodeType::Merge),
        db.count(ActivityNodeType::Decision)
    );
}

#[test]
fn unterminated_frames_are_closed_at_end_of_input() {
    let (db, diagnostics) = parse_activity_full("start\nif (a) then\n  while (b)\n    :x;");
    assert!(diagnostics.is_empty());
    assert_eq!(db.count(ActivityNodeType::Decision), 2);
    assert_eq!(db.count(ActivityNodeType::Merge), 2);
    // Innermost frame closes first.
    assert_eq!(db.nodes[4].related_decision.as_deref(), Some("a2"));
    assert!(db.nodes[4].looping);
    assert_eq!(db.nodes[5].related_decision.as_deref(), Some("a1"));
    assert!(edges(&db).contains(&("a4", "a2", None)));
}

#[test]
fn mismatched_closer_is_reported_and_ignored() {
    let (db, diagnostics) =
        parse_activity_full("start\nwhile (b)\n  :x;\n  endif\nendwhile\nstop");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, 4);
    assert_eq!(diagnostics[0].text, "endif");
    assert_eq!(types(&db), vec!["start", "decision", "action", "merge", "end"]);
}

#[test]
fn swimlanes_track_their_node_span() {
    let db = parse_activity("|Sales|\nstart\n:Order;\n|Warehouse|\n:Pick;\n|Sales|\n:Invoice;\nstop");
    let lanes: Vec<_> = db
        .swimlanes
        .iter()
        .map(|s| (s.name.as_str(), s.first_node, s.last_node))
        .collect();
    assert_eq!(lanes, vec![("Sales", 0, 4), ("Warehouse", 2, 2)]);
    assert_eq!(db.nodes[2].lane.as_deref(), Some("Warehouse"));
    assert_eq!(db.nodes[3].lane.as_deref(), Some("Sales"));
}

#[test]
fn partitions_cover_their_nodes() {
    let db = parse_activity("start\npartition Setup {\n:a;\n:b;\n}\nstop");
    assert_eq!(db.partitions.len(), 1);
    let p = &db.partitions[0];
    assert_eq!((p.name.as_str(), p.start, p.end), ("Setup", 1, 3));
    assert_eq!(db.nodes[1].partition.as_deref(), Some("Setup"));
    assert_eq!(db.nodes[3].partition, None);
}

#[test]
fn notes_attach_to_the_previous_node() {
    let db = parse_activity("start\n:a;\nnote right: first\nnote left\nmore\nend note\nstop");
    assert_eq!(db.nodes[1].note.as_deref(), Some("first\nmore"));
    assert_eq!(db.nodes.len(), 3);
}

#[test]
fn multi_line_actions() {
    let db = parse_activity("start\n:first line\nsecond line;\nstop");
    assert_eq!(db.nodes[1].label, "first line\nsecond line");
    assert_eq!(db.nodes.len(), 3);
}

#[test]
fn model_serializes_with_kind_tags() {
    let engine = Engine::new();
    let res = engine.parse_diagram_sync(ORDER, ParseOptions::default()).unwrap();
    let json = serde_json::to_string(&res.model).unwrap();
    assert!(json.contains(r#""kind":"activity""#));
    assert!(json.contains(r#""type":"else_marker""#));
    assert!(json.contains(r#""type":"transition""#));
}
