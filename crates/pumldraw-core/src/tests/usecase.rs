use crate::models::{UseCaseDiagram, UseCaseNodeKind};
use crate::*;
use futures::executor::block_on;

fn parse_usecase(text: &str) -> UseCaseDiagram {
    let engine = Engine::new();
    let res = block_on(engine.parse_diagram(text, ParseOptions::default())).unwrap();
    assert_eq!(res.kind, DiagramKind::Usecase);
    match res.model {
        DiagramModel::Usecase(db) => db,
        other => panic!("expected use case model, got {:?}", other.kind()),
    }
}

const SAMPLE: &str = r#"actor Customer as C
actor Admin
usecase (Checkout) as UC1
rectangle Shop {
  (Browse)
  usecase "Pay Now" as UC2
}
C --> (Browse)
C --> UC1
UC1 .> UC2 : <<include>>
(Refund) .> UC1 : <<extend>>
Admin <|-- C
"#;

#[test]
fn actors_use_cases_and_boundaries() {
    let db = parse_usecase(SAMPLE);
    assert_eq!(db.nodes.len(), 6);
    assert_eq!(
        db.actors().map(|n| n.name.as_str()).collect::<Vec<_>>(),
        vec!["C", "Admin"]
    );
    assert_eq!(db.nodes.get("C").unwrap().label, "Customer");
    let uc1 = db.nodes.get("UC1").unwrap();
    assert_eq!(uc1.kind, UseCaseNodeKind::UseCase);
    assert_eq!(uc1.label, "Checkout");
    assert_eq!(db.nodes.get("Browse").unwrap().boundary.as_deref(), Some("Shop"));
    assert_eq!(db.nodes.get("UC2").unwrap().label, "Pay Now");
    assert_eq!(db.nodes.get("Refund").unwrap().boundary, None);
}

#[test]
fn include_extend_and_generalisation() {
    let db = parse_usecase(SAMPLE);
    let got: Vec<_> = db
        .relations
        .iter()
        .map(|r| (r.from.as_str(), r.to.as_str(), r.kind))
        .collect();
    assert_eq!(
        got,
        vec![
            ("C", "Browse", RelationKind::Association),
            ("C", "UC1", RelationKind::Association),
            ("UC1", "UC2", RelationKind::Include),
            ("Refund", "UC1", RelationKind::Extend),
            ("C", "Admin", RelationKind::Extends),
        ]
    );
    assert!(db.relations[2].label.is_none());
}

#[test]
fn colon_actors_and_label_lookup() {
    let db = parse_usecase(":Guest: as G\nusecase (Sign up) as SU\n:Guest: --> (Sign up)");
    assert_eq!(db.nodes.len(), 2);
    assert_eq!(db.relations[0].from, "G");
    assert_eq!(db.relations[0].to, "SU");
}
