use crate::*;

fn detect(text: &str) -> DiagramKind {
    Engine::new().detect(text)
}

#[test]
fn class_is_the_fallback() {
    assert_eq!(
        detect("@startuml\nclass A\nclass B\nA --> B : uses\n@enduml"),
        DiagramKind::Class
    );
    assert_eq!(detect(""), DiagramKind::Class);
    assert_eq!(detect("' only a comment"), DiagramKind::Class);
}

#[test]
fn message_syntax_wins_over_actor() {
    let text = "actor User\nparticipant System\nUser -> System : login\nSystem --> User : ok";
    assert_eq!(detect(text), DiagramKind::Sequence);
    assert_eq!(detect("Alice -> Bob : hi"), DiagramKind::Sequence);
}

#[test]
fn participants_with_arrows_are_sequence() {
    assert_eq!(
        detect("participant A\nparticipant B\nA -> B"),
        DiagramKind::Sequence
    );
}

#[test]
fn activity_needs_terminal_and_flow() {
    let text = "start\n:Step1;\nif (x) then (yes)\n:Action1;\nelse (no)\n:Action2;\nendif\nstop";
    assert_eq!(detect(text), DiagramKind::Activity);
    assert_eq!(detect("start\nwhile (more)\n:x;\nendwhile"), DiagramKind::Activity);
}

#[test]
fn state_markers() {
    assert_eq!(
        detect("[*] --> Idle\nIdle --> Running : go\nRunning --> [*]"),
        DiagramKind::State
    );
    assert_eq!(detect("state Idle\nstate Busy\nIdle --> Busy"), DiagramKind::State);
}

#[test]
fn mindmap_marker_or_depth_markers() {
    assert_eq!(
        detect("@startmindmap\n* root\n** child\n@endmindmap"),
        DiagramKind::Mindmap
    );
    assert_eq!(detect("* root\n** a\n*** b\n** c"), DiagramKind::Mindmap);
}

#[test]
fn er_keywords_and_crows_feet() {
    assert_eq!(detect("entity User {\n id : int\n}"), DiagramKind::Er);
    assert_eq!(detect("User ||--o{ Order"), DiagramKind::Er);
    assert_eq!(detect("entity User\nentity Order"), DiagramKind::Er);
}

#[test]
fn entity_participant_stays_sequence() {
    assert_eq!(
        detect("entity Store\nAlice -> Store : buy\nStore --> Alice : receipt"),
        DiagramKind::Sequence
    );
    assert_eq!(
        detect("entity Store {\n sku : text\n}\nStore -> Order : holds"),
        DiagramKind::Er
    );
}

#[test]
fn usecase_signals() {
    assert_eq!(
        detect("actor User\n(Login)\nUser --> (Login)"),
        DiagramKind::Usecase
    );
    assert_eq!(detect("usecase (Pay) as P"), DiagramKind::Usecase);
}

#[test]
fn deployment_archetypes() {
    assert_eq!(
        detect("node Server\ndatabase DB\nServer --> DB"),
        DiagramKind::Deployment
    );
    assert_eq!(
        detect("cloud Internet\n[Balancer] as lb\nInternet --> lb : https"),
        DiagramKind::Deployment
    );
}

#[test]
fn detection_is_idempotent() {
    let engine = Engine::new();
    let text = "actor User\nUser -> System : login";
    let first = engine.detect(text);
    for _ in 0..3 {
        assert_eq!(engine.detect(text), first);
    }
}

#[test]
fn custom_detector_runs_in_registration_order() {
    let mut engine = Engine::new();
    let mut registry = DetectorRegistry::new(DiagramKind::Mindmap);
    registry.add_fn(DiagramKind::Er, |pre| pre.lines.len() == 1);
    *engine.registry_mut() = registry;

    assert_eq!(engine.detect("anything"), DiagramKind::Er);
    assert_eq!(engine.detect("two\nlines"), DiagramKind::Mindmap);
}
