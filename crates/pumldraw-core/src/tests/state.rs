use crate::models::{StateDiagram, StateKind};
use crate::*;
use futures::executor::block_on;

fn parse_state(text: &str) -> StateDiagram {
    let engine = Engine::new();
    let res = block_on(engine.parse_diagram(text, ParseOptions::default())).unwrap();
    assert_eq!(res.kind, DiagramKind::State);
    match res.model {
        DiagramModel::State(db) => db,
        other => panic!("expected state model, got {:?}", other.kind()),
    }
}

const SAMPLE: &str = r#"[*] --> Idle
state Running {
  [*] --> Fast
  Fast --> Slow : brake
  Slow --> [*]
}
Idle --> Running : start
Running --> [*]
state Choice1 <<choice>>
Idle : waiting for input
"#;

#[test]
fn pseudo_states_are_scoped_per_composite() {
    let db = parse_state(SAMPLE);
    assert_eq!(db.states.get("[*]").unwrap().kind, StateKind::Initial);
    assert_eq!(db.states.get("[*]end").unwrap().kind, StateKind::Final);

    let inner_start = db.states.get("Running[*]").unwrap();
    assert_eq!(inner_start.kind, StateKind::Initial);
    assert_eq!(inner_start.parent.as_deref(), Some("Running"));
    assert_eq!(db.states.get("Running[*]end").unwrap().kind, StateKind::Final);
}

#[test]
fn composite_children_get_containment() {
    let db = parse_state(SAMPLE);
    assert_eq!(db.states.get("Running").unwrap().kind, StateKind::Composite);
    assert_eq!(db.states.get("Fast").unwrap().parent.as_deref(), Some("Running"));
    assert_eq!(db.states.get("Idle").unwrap().parent, None);

    let contained: Vec<_> = db
        .relations
        .iter()
        .filter(|r| r.kind == RelationKind::Containment)
        .map(|r| (r.from.as_str(), r.to.as_str()))
        .collect();
    assert_eq!(
        contained,
        vec![
            ("Running", "Running[*]"),
            ("Running", "Fast"),
            ("Running", "Slow"),
            ("Running", "Running[*]end"),
        ]
    );
}

#[test]
fn transitions_descriptions_and_stereotypes() {
    let db = parse_state(SAMPLE);
    let transitions: Vec<_> = db
        .relations
        .iter()
        .filter(|r| r.kind == RelationKind::Transition)
        .collect();
    assert_eq!(transitions.len(), 6);
    assert_eq!(transitions[2].label.as_deref(), Some("brake"));
    assert_eq!(db.states.get("Choice1").unwrap().kind, StateKind::Choice);
    assert_eq!(
        db.states.get("Idle").unwrap().descriptions,
        vec!["waiting for input".to_string()]
    );
}

#[test]
fn aliased_state_declaration() {
    let db = parse_state("state \"Waiting for data\" as Wait\n[*] --> Wait\nWait -left-> Done");
    let wait = db.states.get("Wait").unwrap();
    assert_eq!(wait.label, "Waiting for data");
    assert!(db.states.contains("Done"));
    assert_eq!(db.relations.len(), 2);
}

#[test]
fn transition_endpoint_named_like_a_note_keeps_its_state() {
    let db = parse_state("note \"watch\" as Idle\n[*] --> Idle\nIdle --> Busy");
    assert!(db.states.contains("Idle"));
    assert_eq!(db.notes.len(), 1);
    assert_eq!(db.notes[0].name, "note-0");
    assert_eq!(db.notes[0].text, "watch");
}
