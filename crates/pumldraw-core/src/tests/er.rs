use crate::models::{Cardinality, ErDiagram};
use crate::*;
use futures::executor::block_on;

fn parse_er(text: &str) -> ErDiagram {
    let engine = Engine::new();
    let res = block_on(engine.parse_diagram(text, ParseOptions::default())).unwrap();
    assert_eq!(res.kind, DiagramKind::Er);
    match res.model {
        DiagramModel::Er(db) => db,
        other => panic!("expected er model, got {:?}", other.kind()),
    }
}

const SAMPLE: &str = r#"@startuml
entity User {
  *id : int <<PK>>
  --
  name : text
}
entity Order {
  *order_id : int
  --
  *user_id : int <<FK>>
  total : decimal
}
entity Product {
  sku : text
}
User ||--o{ Order : places
@enduml"#;

#[test]
fn entities_keep_declared_attributes() {
    let db = parse_er(SAMPLE);
    assert_eq!(
        db.entities.names().collect::<Vec<_>>(),
        vec!["User", "Order", "Product"]
    );

    let user = db.entities.get("User").unwrap();
    assert_eq!(user.attributes.len(), 2);
    assert!(user.attributes[0].primary_key);
    assert!(user.attributes[0].mandatory);
    assert_eq!(user.attributes[0].type_name, "int");
    assert!(!user.attributes[1].primary_key);

    let order = db.entities.get("Order").unwrap();
    assert!(order.attributes[0].primary_key);
    assert!(order.attributes[1].foreign_key);
    assert!(!order.attributes[1].primary_key);
    assert_eq!(order.attributes[1].display_text(), "FK user_id: int");

    let product = db.entities.get("Product").unwrap();
    assert!(!product.attributes[0].primary_key);
}

#[test]
fn crows_foot_sets_cardinalities() {
    let db = parse_er(SAMPLE);
    assert_eq!(db.relationships.len(), 1);
    let rel = &db.relationships[0];
    assert_eq!((rel.from.as_str(), rel.to.as_str()), ("User", "Order"));
    assert_eq!(rel.from_cardinality, Cardinality::ExactlyOne);
    assert_eq!(rel.to_cardinality, Cardinality::ZeroOrMany);
    assert!(rel.identifying);
    assert_eq!(rel.label.as_deref(), Some("places"));

    let projected = rel.to_relation();
    assert_eq!(projected.kind, RelationKind::Relationship);
    assert_eq!(projected.from_label.as_deref(), Some("1"));
    assert_eq!(projected.to_label.as_deref(), Some("0..*"));
}

#[test]
fn dotted_relationships_are_non_identifying_and_auto_declare() {
    let db = parse_er("Order }|..|| Customer\nCustomer |o--|{ Address");
    assert_eq!(db.entities.len(), 3);
    let first = &db.relationships[0];
    assert_eq!(first.from_cardinality, Cardinality::OneOrMany);
    assert_eq!(first.to_cardinality, Cardinality::ExactlyOne);
    assert!(!first.identifying);
    let second = &db.relationships[1];
    assert_eq!(second.from_cardinality, Cardinality::ZeroOrOne);
    assert_eq!(second.to_cardinality, Cardinality::OneOrMany);
}

#[test]
fn aliased_entity() {
    let db = parse_er("entity \"Line Item\" as LI {\n  qty : int\n}");
    let li = db.entities.get("LI").unwrap();
    assert_eq!(li.label, "Line Item");
    assert_eq!(li.attributes.len(), 1);
}
