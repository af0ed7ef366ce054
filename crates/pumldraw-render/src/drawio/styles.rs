//! draw.io style strings, keyed by node shape and relation kind.

use crate::edges::ResolvedEdge;
use pumldraw_core::models::{
    ActivityNodeType, ClassKind, DeviceArchetype, MessageKind, ParticipantKind, StateKind,
};
use pumldraw_core::RelationKind;

pub const CLASS_MEMBER: &str = "text;strokeColor=none;fillColor=none;align=left;verticalAlign=top;spacingLeft=4;spacingRight=4;overflow=hidden;rotatable=0;points=[[0,0.5],[1,0.5]];portConstraint=eastwest;";
pub const CLASS_SEPARATOR: &str = "line;strokeWidth=1;fillColor=none;align=left;verticalAlign=middle;spacingTop=-1;spacingLeft=3;spacingRight=3;rotatable=0;labelPosition=right;points=[];portConstraint=eastwest;";
pub const NOTE: &str = "shape=note;whiteSpace=wrap;html=1;backgroundOutline=1;darkOpacity=0.05;fillColor=#fff2cc;strokeColor=#d6b656;size=14;align=left;spacingLeft=5;";
pub const ACTOR: &str = "shape=umlActor;verticalLabelPosition=bottom;verticalAlign=top;html=1;outlineConnect=0;";
pub const USE_CASE: &str = "ellipse;whiteSpace=wrap;html=1;fillColor=#dae8fc;strokeColor=#6c8ebf;";
pub const BOUNDARY: &str = "swimlane;whiteSpace=wrap;html=1;startSize=24;fillColor=none;strokeColor=#666666;";
pub const PARTITION: &str = "swimlane;whiteSpace=wrap;html=1;startSize=24;fillColor=none;strokeColor=#666666;dashed=1;";
pub const LANE: &str = "swimlane;whiteSpace=wrap;html=1;startSize=30;fillColor=#f5f5f5;strokeColor=#666666;";
pub const END_RING: &str = "ellipse;whiteSpace=wrap;html=1;aspect=fixed;fillColor=none;strokeColor=#000000;strokeWidth=2;";
pub const DIVIDER: &str = "line;strokeWidth=1;dashed=1;html=1;fillColor=none;labelPosition=center;verticalLabelPosition=top;align=center;verticalAlign=bottom;";
pub const EDGE_LABEL: &str = "edgeLabel;resizable=0;html=1;align=left;verticalAlign=bottom;";
pub const MINDMAP_EDGE: &str = "endArrow=none;html=1;curved=1;strokeColor=#666666;";

const CLASS_CONTAINER: &str = "swimlane;fontStyle=1;align=center;verticalAlign=top;childLayout=stackLayout;horizontal=1;horizontalStack=0;resizeParent=1;resizeParentMax=0;resizeLast=0;collapsible=1;marginBottom=0;";

/// `header` is the title bar height, which grows when a stereotype line is shown.
pub fn class_container(kind: ClassKind, header: &str) -> String {
    let (fill, stroke) = match kind {
        ClassKind::Interface => ("#d5e8d4", "#82b366"),
        ClassKind::Abstract => ("#fff2cc", "#d6b656"),
        ClassKind::Enum => ("#e1d5e7", "#9673a6"),
        _ => ("#dae8fc", "#6c8ebf"),
    };
    format!("{CLASS_CONTAINER}startSize={header};fillColor={fill};strokeColor={stroke};")
}

pub fn entity_container() -> String {
    format!(
        "{CLASS_CONTAINER}startSize={};fillColor=#f5f5f5;strokeColor=#666666;",
        crate::xml::fmt(crate::shapes::HEADER_HEIGHT)
    )
}

pub fn state(kind: StateKind) -> &'static str {
    match kind {
        StateKind::Initial => {
            "ellipse;whiteSpace=wrap;html=1;aspect=fixed;fillColor=#000000;strokeColor=#000000;"
        }
        StateKind::Final => {
            "ellipse;shape=doubleEllipse;whiteSpace=wrap;html=1;aspect=fixed;fillColor=#000000;strokeColor=#000000;"
        }
        StateKind::Fork | StateKind::Join => "rounded=0;html=1;fillColor=#000000;strokeColor=#000000;",
        StateKind::Choice => "rhombus;whiteSpace=wrap;html=1;fillColor=#fff2cc;strokeColor=#d6b656;",
        StateKind::Composite => {
            "swimlane;rounded=1;whiteSpace=wrap;html=1;startSize=26;fillColor=#dae8fc;strokeColor=#6c8ebf;"
        }
        StateKind::Normal => "rounded=1;whiteSpace=wrap;html=1;fillColor=#dae8fc;strokeColor=#6c8ebf;",
    }
}

pub fn deployment(archetype: DeviceArchetype) -> &'static str {
    match archetype {
        DeviceArchetype::Node => "shape=cube;whiteSpace=wrap;html=1;boundedLbl=1;backgroundOutline=1;darkOpacity=0.05;darkOpacity2=0.1;size=10;fillColor=#dae8fc;strokeColor=#6c8ebf;",
        DeviceArchetype::Database => "shape=cylinder3;whiteSpace=wrap;html=1;boundedLbl=1;backgroundOutline=1;size=15;fillColor=#dae8fc;strokeColor=#6c8ebf;",
        DeviceArchetype::Cloud => "ellipse;shape=cloud;whiteSpace=wrap;html=1;fillColor=#dae8fc;strokeColor=#6c8ebf;",
        DeviceArchetype::Artifact => "shape=note;whiteSpace=wrap;html=1;backgroundOutline=1;size=12;fillColor=#ffffff;strokeColor=#6c8ebf;",
        DeviceArchetype::Folder => "shape=folder;whiteSpace=wrap;html=1;tabWidth=40;tabHeight=14;tabPosition=left;fillColor=#dae8fc;strokeColor=#6c8ebf;",
        DeviceArchetype::Frame => "shape=umlFrame;whiteSpace=wrap;html=1;fillColor=none;strokeColor=#6c8ebf;",
        DeviceArchetype::Package => "shape=folder;whiteSpace=wrap;html=1;tabWidth=50;tabHeight=16;tabPosition=left;fillColor=#f5f5f5;strokeColor=#666666;",
        DeviceArchetype::Queue => "shape=cylinder3;whiteSpace=wrap;html=1;boundedLbl=1;backgroundOutline=1;size=15;direction=south;fillColor=#dae8fc;strokeColor=#6c8ebf;",
        DeviceArchetype::Storage => "shape=cylinder3;whiteSpace=wrap;html=1;boundedLbl=1;backgroundOutline=1;size=8;fillColor=#f5f5f5;strokeColor=#666666;",
        DeviceArchetype::File => "shape=note;whiteSpace=wrap;html=1;backgroundOutline=1;size=10;fillColor=#ffffff;strokeColor=#666666;",
        DeviceArchetype::Interface => "ellipse;whiteSpace=wrap;html=1;aspect=fixed;fillColor=#ffffff;strokeColor=#6c8ebf;",
        DeviceArchetype::Rectangle => "rounded=0;whiteSpace=wrap;html=1;fillColor=#ffffff;strokeColor=#666666;",
        DeviceArchetype::Component => "shape=component;align=left;spacingLeft=36;rounded=0;whiteSpace=wrap;html=1;fillColor=#dae8fc;strokeColor=#6c8ebf;",
    }
}

pub fn lifeline(kind: ParticipantKind) -> String {
    let participant = match kind {
        ParticipantKind::Actor => "umlActor",
        ParticipantKind::Boundary => "umlBoundary",
        ParticipantKind::Control => "umlControl",
        ParticipantKind::Entity => "umlEntity",
        ParticipantKind::Database => "cylinder3",
        _ => "",
    };
    let mut style = String::from("shape=umlLifeline;perimeter=lifelinePerimeter;whiteSpace=wrap;html=1;container=0;dropTarget=0;collapsible=0;recursiveResize=0;outlineConnect=0;portConstraint=eastwest;newEdgeStyle={\"edgeStyle\":\"elbowEdgeStyle\",\"elbow\":\"vertical\",\"curved\":0,\"rounded\":0};");
    if !participant.is_empty() {
        style.push_str("participant=");
        style.push_str(participant);
        style.push(';');
    } else {
        style.push_str("fillColor=#dae8fc;strokeColor=#6c8ebf;");
    }
    style
}

pub fn message(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Sync => "html=1;verticalAlign=bottom;endArrow=block;endFill=1;rounded=0;",
        MessageKind::Async => "html=1;verticalAlign=bottom;endArrow=open;endSize=8;rounded=0;",
        MessageKind::Reply => "html=1;verticalAlign=bottom;endArrow=open;endSize=8;dashed=1;rounded=0;",
    }
}

pub fn activity(node_type: ActivityNodeType) -> &'static str {
    match node_type {
        ActivityNodeType::Start => {
            "ellipse;whiteSpace=wrap;html=1;aspect=fixed;fillColor=#000000;strokeColor=#000000;"
        }
        ActivityNodeType::End => {
            "ellipse;whiteSpace=wrap;html=1;aspect=fixed;fillColor=#000000;strokeColor=#000000;strokeWidth=3;"
        }
        ActivityNodeType::Decision => {
            "rhombus;whiteSpace=wrap;html=1;fillColor=#fff2cc;strokeColor=#d6b656;"
        }
        ActivityNodeType::Merge => "rhombus;whiteSpace=wrap;html=1;fillColor=#f5f5f5;strokeColor=#666666;",
        ActivityNodeType::Fork | ActivityNodeType::Join => {
            "rounded=0;html=1;fillColor=#000000;strokeColor=#000000;"
        }
        _ => "rounded=1;whiteSpace=wrap;html=1;fillColor=#dae8fc;strokeColor=#6c8ebf;",
    }
}

const ACTIVITY_EDGE: &str = "endArrow=classic;html=1;rounded=0;exitX=0.5;exitY=1;exitDx=0;exitDy=0;entryX=0.5;entryY=0;entryDx=0;entryDy=0;";
const ACTIVITY_BACK_EDGE: &str = "endArrow=classic;html=1;rounded=0;edgeStyle=orthogonalEdgeStyle;exitX=1;exitY=0.5;exitDx=0;exitDy=0;entryX=1;entryY=0.5;entryDx=0;entryDy=0;";

/// Activity flow edges leave the bottom and enter the top; loop-backs go around the right side.
pub fn activity_edge(edge: &ResolvedEdge) -> &'static str {
    if edge.back_edge {
        ACTIVITY_BACK_EDGE
    } else {
        ACTIVITY_EDGE
    }
}

/// Style of a relation edge in the grid kinds and ER diagrams.
pub fn edge(edge: &ResolvedEdge) -> String {
    if let Some((from, to)) = edge.cardinality {
        let mut style = format!(
            "edgeStyle=entityRelationEdgeStyle;fontSize=12;html=1;endFill=0;startFill=0;startArrow={};endArrow={};",
            from.drawio_arrow(),
            to.drawio_arrow()
        );
        if edge.dashed {
            style.push_str("dashed=1;");
        }
        return style;
    }
    match edge.kind {
        RelationKind::Extends => "endArrow=block;endSize=16;endFill=0;html=1;rounded=0;".to_string(),
        RelationKind::Implements => {
            "endArrow=block;endSize=16;endFill=0;html=1;rounded=0;dashed=1;".to_string()
        }
        RelationKind::Composition => {
            "startArrow=diamondThin;startFill=1;startSize=24;endArrow=none;html=1;rounded=0;".to_string()
        }
        RelationKind::Aggregation => {
            "startArrow=diamondThin;startFill=0;startSize=24;endArrow=none;html=1;rounded=0;".to_string()
        }
        RelationKind::Dependency | RelationKind::Include | RelationKind::Extend => {
            "endArrow=open;endSize=12;html=1;rounded=0;dashed=1;".to_string()
        }
        RelationKind::Note => "endArrow=none;html=1;rounded=0;dashed=1;".to_string(),
        RelationKind::Containment => "endArrow=none;html=1;rounded=0;dashed=1;".to_string(),
        _ => "endArrow=open;endSize=12;html=1;rounded=0;".to_string(),
    }
}

pub fn mindmap_node(is_root: bool, boxless: bool) -> &'static str {
    if boxless {
        "text;html=1;strokeColor=none;fillColor=none;align=center;verticalAlign=middle;whiteSpace=wrap;"
    } else if is_root {
        "ellipse;whiteSpace=wrap;html=1;fontStyle=1;fillColor=#dae8fc;strokeColor=#6c8ebf;"
    } else {
        "rounded=1;whiteSpace=wrap;html=1;arcSize=40;fillColor=#fff2cc;strokeColor=#d6b656;"
    }
}
