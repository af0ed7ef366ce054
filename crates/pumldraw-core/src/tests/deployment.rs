use crate::models::{DeploymentDiagram, DeviceArchetype};
use crate::*;
use futures::executor::block_on;

fn parse_deployment(text: &str) -> DeploymentDiagram {
    let engine = Engine::new();
    let res = block_on(engine.parse_diagram(text, ParseOptions::default())).unwrap();
    assert_eq!(res.kind, DiagramKind::Deployment);
    match res.model {
        DiagramModel::Deployment(db) => db,
        other => panic!("expected deployment model, got {:?}", other.kind()),
    }
}

const SAMPLE: &str = r#"node "Web Server" as web {
  artifact app.war
}
database DB
cloud Internet
[Load Balancer] as lb
Internet --> lb
lb --> web : http
web ..> DB : jdbc
"#;

#[test]
fn archetypes_and_component_shorthand() {
    let db = parse_deployment(SAMPLE);
    assert_eq!(
        db.nodes.names().collect::<Vec<_>>(),
        vec!["web", "app.war", "DB", "Internet", "lb"]
    );
    let web = db.nodes.get("web").unwrap();
    assert_eq!(web.label, "Web Server");
    assert_eq!(web.archetype, DeviceArchetype::Node);
    assert_eq!(db.nodes.get("DB").unwrap().archetype, DeviceArchetype::Database);
    let lb = db.nodes.get("lb").unwrap();
    assert_eq!(lb.archetype, DeviceArchetype::Component);
    assert_eq!(lb.label, "Load Balancer");
}

#[test]
fn nesting_and_relations() {
    let db = parse_deployment(SAMPLE);
    assert_eq!(db.nodes.get("app.war").unwrap().parent.as_deref(), Some("web"));
    let got: Vec<_> = db
        .relations
        .iter()
        .map(|r| (r.from.as_str(), r.to.as_str(), r.kind, r.label.as_deref()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("web", "app.war", RelationKind::Containment, None),
            ("Internet", "lb", RelationKind::Association, None),
            ("lb", "web", RelationKind::Association, Some("http")),
            ("web", "DB", RelationKind::Dependency, Some("jdbc")),
        ]
    );
}

#[test]
fn bracketed_endpoints_create_components() {
    let db = parse_deployment("node A\n[Cache] --> A");
    assert_eq!(db.nodes.get("Cache").unwrap().archetype, DeviceArchetype::Component);
    assert_eq!(db.relations[0].from, "Cache");
}
