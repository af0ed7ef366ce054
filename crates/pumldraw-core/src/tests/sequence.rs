use crate::models::{MessageKind, NotePlacement, ParticipantKind, SequenceDiagram, SequenceStep};
use crate::*;
use futures::executor::block_on;

fn parse_sequence(text: &str) -> SequenceDiagram {
    let engine = Engine::new();
    let res = block_on(engine.parse_diagram(text, ParseOptions::default())).unwrap();
    assert_eq!(res.kind, DiagramKind::Sequence);
    match res.model {
        DiagramModel::Sequence(db) => db,
        other => panic!("expected sequence model, got {:?}", other.kind()),
    }
}

const SAMPLE: &str = r#"@startuml
participant Alice
actor Bob as "Bobby"
Alice -> Bob : hello
Bob --> Alice : ok
Alice ->> Carol : async
Alice <- Bob : back
Bob -> Bob : self
== Phase 2 ==
note left of Alice : thinking
note over Alice, Bob
shared
end note
@enduml"#;

#[test]
fn participants_keep_declaration_order_and_aliases() {
    let db = parse_sequence(SAMPLE);
    assert_eq!(
        db.participants.names().collect::<Vec<_>>(),
        vec!["Alice", "Bob", "Carol"]
    );
    let bob = db.participants.get("Bob").unwrap();
    assert_eq!(bob.kind, ParticipantKind::Actor);
    assert_eq!(bob.label, "Bobby");
    assert_eq!(
        db.participants.get("Carol").unwrap().kind,
        ParticipantKind::Participant
    );
}

#[test]
fn message_kinds_and_directions() {
    let db = parse_sequence(SAMPLE);
    let got: Vec<_> = db
        .messages()
        .map(|m| (m.from.as_str(), m.to.as_str(), m.kind, m.label.as_deref()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Alice", "Bob", MessageKind::Sync, Some("hello")),
            ("Bob", "Alice", MessageKind::Reply, Some("ok")),
            ("Alice", "Carol", MessageKind::Async, Some("async")),
            ("Bob", "Alice", MessageKind::Sync, Some("back")),
            ("Bob", "Bob", MessageKind::Sync, Some("self")),
        ]
    );
    assert!(db.messages().last().unwrap().is_self());
}

#[test]
fn entity_participants_keep_their_messages() {
    let db = parse_sequence("entity Store\nAlice -> Store : buy\nStore --> Alice : receipt");
    assert_eq!(
        db.participants.names().collect::<Vec<_>>(),
        vec!["Store", "Alice"]
    );
    assert_eq!(
        db.participants.get("Store").unwrap().kind,
        ParticipantKind::Entity
    );
    let got: Vec<_> = db
        .messages()
        .map(|m| (m.from.as_str(), m.to.as_str(), m.kind))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Alice", "Store", MessageKind::Sync),
            ("Store", "Alice", MessageKind::Reply),
        ]
    );
}

#[test]
fn steps_keep_source_order() {
    let db = parse_sequence(SAMPLE);
    assert_eq!(db.steps.len(), 8);
    assert_eq!(
        db.steps[5],
        SequenceStep::Divider {
            label: "Phase 2".to_string()
        }
    );
    let SequenceStep::Note(note) = &db.steps[6] else {
        panic!("expected note step");
    };
    assert_eq!(note.placement, NotePlacement::Left);
    assert_eq!(note.participants, vec!["Alice".to_string()]);
    let SequenceStep::Note(over) = &db.steps[7] else {
        panic!("expected note step");
    };
    assert_eq!(over.placement, NotePlacement::Over);
    assert_eq!(over.participants.len(), 2);
    assert_eq!(over.text, "shared");
}

#[test]
fn replies_project_onto_dashed_relations() {
    let model = block_on(Engine::new().parse_diagram(SAMPLE, ParseOptions::default()))
        .unwrap()
        .model;
    let relations = model.relations();
    assert_eq!(relations.len(), 5);
    assert_eq!(relations[1].kind, RelationKind::Reply);
    assert!(relations[1].kind.is_dashed());
    assert_eq!(relations[0].kind, RelationKind::Message);
}

#[test]
fn unsupported_fragments_are_skipped() {
    let text = "Alice -> Bob : hi\nalt ok\nBob -> Alice : yes\nend";
    let res = Engine::new()
        .parse_diagram_sync(text, ParseOptions::lenient())
        .unwrap();
    assert_eq!(res.kind, DiagramKind::Sequence);
    assert_eq!(res.diagnostics.len(), 2);
    assert_eq!(res.model.relations().len(), 2);
}
