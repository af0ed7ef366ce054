use crate::models::{ClassDiagram, ClassKind, Visibility};
use crate::*;
use futures::executor::block_on;

fn parse_class(text: &str) -> ClassDiagram {
    let engine = Engine::new();
    let res = block_on(engine.parse_diagram(text, ParseOptions::default())).unwrap();
    assert_eq!(res.kind, DiagramKind::Class);
    match res.model {
        DiagramModel::Class(db) => db,
        other => panic!("expected class model, got {:?}", other.kind()),
    }
}

#[test]
fn two_classes_and_a_labelled_association() {
    let db = parse_class("@startuml\nclass A\nclass B\nA --> B : uses\n@enduml");
    assert_eq!(db.classes.names().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(db.relations.len(), 1);
    let rel = &db.relations[0];
    assert_eq!((rel.from.as_str(), rel.to.as_str()), ("A", "B"));
    assert_eq!(rel.kind, RelationKind::Association);
    assert_eq!(rel.label.as_deref(), Some("uses"));
}

#[test]
fn class_body_members() {
    let db = parse_class(
        "class User {\n  -id: int\n  +name: String\n  --\n  +getName(): String\n  {static} +count(): int\n}",
    );
    let user = db.classes.get("User").unwrap();
    assert_eq!(user.attributes.len(), 2);
    assert_eq!(user.methods.len(), 2);
    assert_eq!(user.attributes[0].visibility, Visibility::Private);
    assert_eq!(user.attributes[0].name, "id");
    assert_eq!(user.attributes[0].type_name, "int");
    assert_eq!(user.methods[0].name, "getName()");
    assert_eq!(user.methods[0].type_name, "String");
    assert!(user.methods[1].is_static);
    assert_eq!(user.attributes[1].display_text(), "+ name: String");
}

#[test]
fn relation_kinds_follow_arrow_priority() {
    let db = parse_class(
        "interface Shape\nabstract class Base\nenum Color {\n  RED\n  GREEN\n}\n\
         Shape <|.. Circle\nBase <|-- Circle\nCar *-- Wheel\nTeam o-- Player\n\
         Client ..> Service\nA -- B\nC .. D",
    );

    assert_eq!(db.classes.get("Shape").unwrap().kind, ClassKind::Interface);
    assert_eq!(db.classes.get("Base").unwrap().kind, ClassKind::Abstract);
    let color = db.classes.get("Color").unwrap();
    assert_eq!(color.kind, ClassKind::Enum);
    assert_eq!(color.attributes.len(), 2);
    assert_eq!(db.classes.get("Circle").unwrap().kind, ClassKind::Class);

    let got: Vec<_> = db
        .relations
        .iter()
        .map(|r| (r.from.as_str(), r.to.as_str(), r.kind))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Circle", "Shape", RelationKind::Implements),
            ("Circle", "Base", RelationKind::Extends),
            ("Car", "Wheel", RelationKind::Composition),
            ("Team", "Player", RelationKind::Aggregation),
            ("Client", "Service", RelationKind::Dependency),
            ("A", "B", RelationKind::Association),
            ("C", "D", RelationKind::Dependency),
        ]
    );
}

#[test]
fn reversed_heads_swap_endpoints() {
    let db = parse_class("Wheel --* Car\nAnimal <-- Keeper\nDog --|> Animal");
    let got: Vec<_> = db
        .relations
        .iter()
        .map(|r| (r.from.as_str(), r.to.as_str(), r.kind))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Car", "Wheel", RelationKind::Composition),
            ("Keeper", "Animal", RelationKind::Association),
            ("Dog", "Animal", RelationKind::Extends),
        ]
    );
}

#[test]
fn quoted_multiplicities() {
    let db = parse_class("Customer \"1\" *-- \"many\" Order : places");
    let rel = &db.relations[0];
    assert_eq!(rel.kind, RelationKind::Composition);
    assert_eq!(rel.from_label.as_deref(), Some("1"));
    assert_eq!(rel.to_label.as_deref(), Some("many"));
    assert_eq!(rel.label.as_deref(), Some("places"));
}

#[test]
fn inheritance_keywords_and_generics() {
    let db = parse_class("class Dog extends Animal implements Pet, Named\nclass Box<T>");
    assert_eq!(db.classes.get("Pet").unwrap().kind, ClassKind::Interface);
    assert_eq!(db.relations.len(), 3);
    assert_eq!(db.relations[2].to, "Named");
    assert_eq!(db.relations[2].kind, RelationKind::Implements);
    let boxed = db.classes.get("Box").unwrap();
    assert_eq!(boxed.generic.as_deref(), Some("T"));
    assert_eq!(boxed.title(), "Box<T>");
}

#[test]
fn aliases_and_stereotypes() {
    let db = parse_class("class \"Order Line\" as OL <<entity>>\nOL --> Product");
    let ol = db.classes.get("OL").unwrap();
    assert_eq!(ol.label, "Order Line");
    assert_eq!(ol.stereotype.as_deref(), Some("entity"));
    assert!(db.classes.contains("Product"));
}

#[test]
fn notes_attach_to_targets() {
    let db = parse_class("class A\nnote left of A : hello\nnote \"free\" as N1\nN1 .. A");
    assert_eq!(db.notes.len(), 2);
    assert_eq!(db.notes[0].target.as_deref(), Some("A"));
    assert_eq!(db.notes[0].text, "hello");
    assert_eq!(db.notes[1].name, "N1");
    assert_eq!(db.notes[1].target.as_deref(), Some("A"));
    assert!(db.relations.is_empty());
}

#[test]
fn note_alias_never_shadows_a_class() {
    let db = parse_class("class N1
class B
note \"hello\" as N1
N1 --> B");
    assert_eq!(db.classes.names().collect::<Vec<_>>(), vec!["N1", "B"]);
    assert_eq!(db.notes.len(), 1);
    assert_eq!(db.notes[0].name, "note-0");
    assert_eq!(db.notes[0].target, None);
    assert_eq!(db.relations.len(), 1);
    assert_eq!(
        (db.relations[0].from.as_str(), db.relations[0].to.as_str()),
        ("N1", "B")
    );

    // A class declared after the note wins too.
    let db = parse_class("note \"free\" as Store\nclass Cart\nclass Store\nCart --> Store");
    assert_eq!(db.notes[0].name, "note-0");
    assert!(db.classes.contains("Store"));
    assert_eq!(db.relations.len(), 1);
}

#[test]
fn member_lines_outside_a_body() {
    let db = parse_class("class A\nA : +size: int\nA : +grow()");
    let a = db.classes.get("A").unwrap();
    assert_eq!(a.attributes.len(), 1);
    assert_eq!(a.methods.len(), 1);
}

#[test]
fn strict_mode_reports_the_first_skipped_line() {
    let engine = Engine::new();
    let text = "class A\nthis is nonsense\nclass B";

    let res = engine.parse_diagram_sync(text, ParseOptions::lenient()).unwrap();
    assert_eq!(res.diagnostics.len(), 1);
    assert_eq!(res.diagnostics[0].line, 2);
    assert_eq!(res.model.node_count(), 2);

    let err = engine
        .parse_diagram_sync(text, ParseOptions::strict())
        .unwrap_err();
    match err {
        Error::Unrecognized { count, first, .. } => {
            assert_eq!(count, 1);
            assert_eq!(first.text, "this is nonsense");
        }
        other => panic!("unexpected error: {other}"),
    }
}
