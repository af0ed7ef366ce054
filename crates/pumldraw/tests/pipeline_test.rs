use chrono::{TimeZone, Utc};
use futures::executor::block_on;
use pumldraw::{
    ConvertError, Converter, DiagramKind, DiagramModel, ParseOptions, RelationKind,
    RenderOptions, XmlMode, convert, decompress_diagram, parse, render,
};

fn pinned() -> RenderOptions {
    RenderOptions {
        modified: Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
        ..RenderOptions::default()
    }
}

#[test]
fn class_scenario_end_to_end() {
    let model = parse("@startuml\nclass A\nclass B\nA --> B : uses\n@enduml").unwrap();
    assert_eq!(model.kind(), DiagramKind::Class);
    assert_eq!(model.node_count(), 2);
    let relations = model.relations();
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].kind, RelationKind::Association);
    assert_eq!(relations[0].label.as_deref(), Some("uses"));

    let out = render(&model).unwrap();
    assert_eq!(out.element_count, 2);
    assert_eq!(out.relation_count, 1);
    assert!(out.xml.contains(r#"value="uses""#));
    assert!(out.preview.starts_with("<svg"));
}

#[test]
fn activity_scenario_end_to_end() {
    let text = "start\n:Step1;\nif (x) then (yes)\n:Action1;\nelse (no)\n:Action2;\nendif\nstop";
    let DiagramModel::Activity(d) = parse(text).unwrap() else {
        panic!("expected activity");
    };
    let types: Vec<&str> = d.nodes.iter().map(|n| n.node_type.as_str()).collect();
    assert_eq!(
        types,
        vec!["start", "action", "decision", "action", "else_marker", "action", "merge", "end"]
    );
    assert_eq!(d.nodes[2].yes_branch.as_deref(), Some("yes"));
    let has = |from: &str, to: &str, label: &str| {
        d.edges
            .iter()
            .any(|e| e.from == from && e.to == to && e.label.as_deref() == Some(label))
    };
    assert!(has("a2", "a3", "yes"));
    assert!(has("a2", "a5", "no"));

    let out = convert(text).unwrap();
    assert_eq!(out.element_count, 7);
    assert_eq!(out.relation_count, d.edges.len());
}

#[test]
fn empty_and_comment_only_input_has_no_valid_elements() {
    for text in ["", "   \n\n", "' just a comment\n/' block\ncomment '/", "@startuml\n@enduml"] {
        let err = convert(text).unwrap_err();
        assert!(matches!(err, ConvertError::NoValidElements), "{text:?}");
        assert_eq!(err.to_string(), "no valid elements found");
    }
}

#[test]
fn strict_mode_surfaces_unrecognized_lines() {
    let converter = Converter::new().with_parse_options(ParseOptions::strict());
    let err = converter
        .convert_sync("class A\nthis is not plantuml")
        .unwrap_err();
    assert!(matches!(err, ConvertError::Parse(_)));

    let lenient = Converter::new().convert_sync("class A\nthis is not plantuml").unwrap();
    assert_eq!(lenient.element_count, 1);
}

#[test]
fn pinned_conversion_is_byte_identical() {
    let converter = Converter::new().with_render_options(pinned());
    let text = "actor User\nparticipant System\nUser -> System : login\nSystem --> User : ok";
    let first = converter.convert_sync(text).unwrap();
    let second = converter.convert_sync(text).unwrap();
    assert_eq!(first, second);
    assert!(first.xml.contains(r#"modified="2025-06-01T12:00:00.000Z""#));
}

#[test]
fn compressed_output_holds_the_same_graph() {
    let text = "[*] --> Idle\nIdle --> Busy : go\nBusy --> [*]";
    let pretty = Converter::new().with_render_options(pinned()).convert_sync(text).unwrap();
    let compressed = Converter::new()
        .with_render_options(RenderOptions {
            xml_mode: XmlMode::Compressed,
            ..pinned()
        })
        .convert_sync(text)
        .unwrap();

    let doc = roxmltree::Document::parse(&compressed.xml).unwrap();
    let payload = doc
        .descendants()
        .find(|n| n.has_tag_name("diagram"))
        .and_then(|n| n.text())
        .unwrap();
    let graph = decompress_diagram(payload).unwrap();
    let graph_doc = roxmltree::Document::parse(&graph).unwrap();
    let pretty_doc = roxmltree::Document::parse(&pretty.xml).unwrap();
    let count = |doc: &roxmltree::Document| doc.descendants().filter(|n| n.has_tag_name("mxCell")).count();
    assert_eq!(count(&graph_doc), count(&pretty_doc));
    assert_eq!(compressed.preview, pretty.preview);
}

#[test]
fn async_wrappers_match_the_sync_pipeline() {
    let converter = Converter::new().with_render_options(pinned());
    let text = "@startmindmap\n* Root\n** A\n** B\n@endmindmap";
    let model = block_on(converter.parse(text)).unwrap();
    assert_eq!(model.kind(), DiagramKind::Mindmap);
    let rendered = block_on(converter.render(&model)).unwrap();
    assert_eq!(rendered, block_on(converter.convert(text)).unwrap());
    assert_eq!(rendered, converter.convert_sync(text).unwrap());
}

#[test]
fn every_relation_with_placed_endpoints_is_drawn() {
    let text = "User ||--o{ Order : places\nOrder }|--|| Product";
    let converter = Converter::new().with_render_options(pinned());
    let out = converter.convert_sync(text).unwrap();
    let doc = roxmltree::Document::parse(&out.xml).unwrap();
    let edges = doc
        .descendants()
        .filter(|n| n.has_tag_name("mxCell") && n.attribute("edge") == Some("1"))
        .count();
    assert_eq!(edges, out.relation_count);
    assert_eq!(edges, 2);
}
