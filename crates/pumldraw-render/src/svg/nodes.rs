use super::text_block;
use crate::layout::{activity_note_id, sequence_note_id};
use crate::model::{Layout, NodeBox};
use crate::shapes::{
    HEADER_HEIGHT, MEMBER_ROW_HEIGHT, SEPARATOR_HEIGHT, STEREOTYPE_HEIGHT, class_header_height,
    entity_separator_index,
};
use crate::xml::fmt;
use crate::Result;
use pumldraw_core::DiagramModel;
use pumldraw_core::models::{
    ActivityDiagram, ActivityNodeType, ClassDiagram, ClassKind, DeploymentDiagram,
    DeviceArchetype, ErDiagram, MindmapDiagram, Note, SequenceDiagram, SequenceStep, StateDiagram,
    StateKind, UseCaseDiagram, UseCaseNodeKind,
};
use std::fmt::Write as _;

const BLUE_FILL: &str = "#dae8fc";
const BLUE_STROKE: &str = "#6c8ebf";
const NOTE_FOLD: f64 = 12.0;

fn rect(out: &mut String, b: &NodeBox, rx: f64, fill: &str, stroke: &str) {
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{fill}" stroke="{stroke}"/>"#,
        fmt(b.left()),
        fmt(b.top()),
        fmt(b.width),
        fmt(b.height),
        fmt(rx),
    );
}

fn circle(out: &mut String, cx: f64, cy: f64, r: f64, fill: &str, stroke: &str, stroke_width: f64) {
    let _ = write!(
        out,
        r#"<circle cx="{}" cy="{}" r="{}" fill="{fill}" stroke="{stroke}" stroke-width="{}"/>"#,
        fmt(cx),
        fmt(cy),
        fmt(r),
        fmt(stroke_width),
    );
}

fn diamond(out: &mut String, b: &NodeBox, fill: &str, stroke: &str) {
    let _ = write!(
        out,
        r#"<polygon points="{},{} {},{} {},{} {},{}" fill="{fill}" stroke="{stroke}"/>"#,
        fmt(b.x),
        fmt(b.top()),
        fmt(b.right()),
        fmt(b.y),
        fmt(b.x),
        fmt(b.bottom()),
        fmt(b.left()),
        fmt(b.y),
    );
}

fn hline(out: &mut String, x1: f64, x2: f64, y: f64, stroke: &str) {
    let _ = write!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}"/>"#,
        fmt(x1),
        fmt(y),
        fmt(x2),
        fmt(y),
    );
}

fn label(out: &mut String, b: &NodeBox, text: &str, line_height: f64) {
    text_block(out, b.x, b.y, text, "middle", line_height, "");
}

fn stick_figure(out: &mut String, b: &NodeBox) {
    let top = b.top();
    let _ = write!(
        out,
        r#"<g fill="white" stroke="{BLUE_STROKE}" stroke-width="1.5"><circle cx="{x}" cy="{head}" r="10"/><line x1="{x}" y1="{neck}" x2="{x}" y2="{hip}"/><line x1="{l}" y1="{arms}" x2="{r}" y2="{arms}"/><line x1="{x}" y1="{hip}" x2="{l}" y2="{foot}"/><line x1="{x}" y1="{hip}" x2="{r}" y2="{foot}"/></g>"#,
        x = fmt(b.x),
        head = fmt(top + 10.0),
        neck = fmt(top + 20.0),
        hip = fmt(top + 40.0),
        arms = fmt(top + 28.0),
        l = fmt(b.left()),
        r = fmt(b.right()),
        foot = fmt(b.bottom()),
    );
}

fn note_shape(out: &mut String, b: &NodeBox, text: &str, line_height: f64) {
    let (l, t, r, btm) = (b.left(), b.top(), b.right(), b.bottom());
    let _ = write!(
        out,
        r##"<g class="note"><path d="M{},{} L{},{} L{},{} L{},{} L{},{} z" fill="#fff2cc" stroke="#d6b656"/><path d="M{},{} L{},{} L{},{}" fill="none" stroke="#d6b656"/>"##,
        fmt(l),
        fmt(t),
        fmt(r - NOTE_FOLD),
        fmt(t),
        fmt(r),
        fmt(t + NOTE_FOLD),
        fmt(r),
        fmt(btm),
        fmt(l),
        fmt(btm),
        fmt(r - NOTE_FOLD),
        fmt(t),
        fmt(r - NOTE_FOLD),
        fmt(t + NOTE_FOLD),
        fmt(r),
        fmt(t + NOTE_FOLD),
    );
    text_block(out, l + 8.0, b.y, text, "start", line_height, "");
    out.push_str("</g>");
}

fn notes(out: &mut String, notes: &[Note], layout: &Layout, line_height: f64) -> Result<()> {
    for note in notes {
        note_shape(out, layout.require(&note.name)?, &note.text, line_height);
    }
    Ok(())
}

/// Titled box with member rows, shared by classes and entities.
#[allow(clippy::too_many_arguments)]
fn compartment_box(
    out: &mut String,
    b: &NodeBox,
    title: &[&str],
    header: f64,
    rows: &[String],
    split: Option<usize>,
    fill: &str,
    stroke: &str,
    line_height: f64,
) {
    rect(out, b, 0.0, fill, stroke);
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="white" stroke="{stroke}"/>"#,
        fmt(b.left()),
        fmt(b.top() + header),
        fmt(b.width),
        fmt(b.height - header),
    );
    text_block(
        out,
        b.x,
        b.top() + header / 2.0,
        &title.join("\n"),
        "middle",
        line_height.min(STEREOTYPE_HEIGHT),
        r#" font-weight="bold""#,
    );
    let mut y = b.top() + header;
    for (i, row) in rows.iter().enumerate() {
        if split == Some(i) {
            hline(out, b.left(), b.right(), y + SEPARATOR_HEIGHT / 2.0, stroke);
            y += SEPARATOR_HEIGHT;
        }
        text_block(out, b.left() + 6.0, y + MEMBER_ROW_HEIGHT / 2.0, row, "start", line_height, "");
        y += MEMBER_ROW_HEIGHT;
    }
}

fn class_nodes(out: &mut String, d: &ClassDiagram, layout: &Layout, lh: f64) -> Result<()> {
    for class in d.classes.iter() {
        let b = layout.require(&class.name)?;
        let (fill, stroke) = match class.kind {
            ClassKind::Interface => ("#d5e8d4", "#82b366"),
            ClassKind::Abstract => ("#fff2cc", "#d6b656"),
            ClassKind::Enum => ("#e1d5e7", "#9673a6"),
            _ => (BLUE_FILL, BLUE_STROKE),
        };
        let stereotype = class
            .kind
            .stereotype()
            .map(str::to_string)
            .or_else(|| class.stereotype.as_ref().map(|s| format!("\u{ab}{s}\u{bb}")));
        let name = class.title();
        let mut title: Vec<&str> = stereotype.iter().map(String::as_str).collect();
        title.push(&name);
        let rows: Vec<String> = class
            .attributes
            .iter()
            .chain(&class.methods)
            .map(|m| m.display_text())
            .collect();
        let split = (!class.attributes.is_empty() && !class.methods.is_empty())
            .then_some(class.attributes.len());
        out.push_str(r#"<g class="node class">"#);
        compartment_box(out, b, &title, class_header_height(class), &rows, split, fill, stroke, lh);
        out.push_str("</g>");
    }
    notes(out, &d.notes, layout, lh)
}

fn er_nodes(out: &mut String, d: &ErDiagram, layout: &Layout, lh: f64) -> Result<()> {
    for entity in d.entities.iter() {
        let b = layout.require(&entity.name)?;
        let rows: Vec<String> = entity.attributes.iter().map(|a| a.display_text()).collect();
        out.push_str(r#"<g class="node entity">"#);
        compartment_box(
            out,
            b,
            &[entity.label.as_str()],
            HEADER_HEIGHT,
            &rows,
            entity_separator_index(entity),
            "#f5f5f5",
            "#666666",
            lh,
        );
        out.push_str("</g>");
    }
    Ok(())
}

fn state_nodes(out: &mut String, d: &StateDiagram, layout: &Layout, lh: f64) -> Result<()> {
    for state in d.states.iter() {
        let b = layout.require(&state.name)?;
        out.push_str(r#"<g class="node state">"#);
        match state.kind {
            StateKind::Initial => circle(out, b.x, b.y, b.width / 2.0, "#333", "#333", 1.0),
            StateKind::Final => {
                circle(out, b.x, b.y, b.width / 2.0, "white", "#333", 1.5);
                circle(out, b.x, b.y, b.width / 2.0 - 5.0, "#333", "#333", 1.0);
            }
            StateKind::Fork | StateKind::Join => rect(out, b, 2.0, "#333", "#333"),
            StateKind::Choice => diamond(out, b, "#fff2cc", "#d6b656"),
            StateKind::Normal | StateKind::Composite => {
                rect(out, b, 10.0, BLUE_FILL, BLUE_STROKE);
                if state.descriptions.is_empty() {
                    label(out, b, &state.label, lh);
                } else {
                    let title_y = b.top() + 12.0 + lh / 2.0;
                    text_block(out, b.x, title_y, &state.label, "middle", lh, r#" font-weight="bold""#);
                    hline(out, b.left(), b.right(), title_y + lh / 2.0 + 4.0, BLUE_STROKE);
                    let body = state.descriptions.join("\n");
                    let body_y = (title_y + lh / 2.0 + 4.0 + b.bottom()) / 2.0;
                    text_block(out, b.x, body_y, &body, "middle", lh, "");
                }
            }
        }
        out.push_str("</g>");
    }
    notes(out, &d.notes, layout, lh)
}

fn cylinder(out: &mut String, b: &NodeBox, cap: f64) {
    let (l, t, r, btm) = (b.left(), b.top(), b.right(), b.bottom());
    let rx = b.width / 2.0;
    let _ = write!(
        out,
        r#"<path d="M{l},{tc} A{rx},{cap} 0 0 1 {r},{tc} L{r},{bc} A{rx},{cap} 0 0 1 {l},{bc} z" fill="{BLUE_FILL}" stroke="{BLUE_STROKE}"/><path d="M{l},{tc} A{rx},{cap} 0 0 0 {r},{tc}" fill="none" stroke="{BLUE_STROKE}"/>"#,
        l = fmt(l),
        r = fmt(r),
        tc = fmt(t + cap),
        bc = fmt(btm - cap),
        rx = fmt(rx),
        cap = fmt(cap),
    );
}

fn deployment_nodes(out: &mut String, d: &DeploymentDiagram, layout: &Layout, lh: f64) -> Result<()> {
    for node in d.nodes.iter() {
        let b = layout.require(&node.name)?;
        out.push_str(r#"<g class="node deployment">"#);
        match node.archetype {
            DeviceArchetype::Database | DeviceArchetype::Queue | DeviceArchetype::Storage => {
                cylinder(out, b, 8.0)
            }
            DeviceArchetype::Cloud | DeviceArchetype::Interface => {
                let _ = write!(
                    out,
                    r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" fill="{BLUE_FILL}" stroke="{BLUE_STROKE}"/>"#,
                    fmt(b.x),
                    fmt(b.y),
                    fmt(b.width / 2.0),
                    fmt(b.height / 2.0),
                );
            }
            DeviceArchetype::Node => {
                rect(out, b, 0.0, BLUE_FILL, BLUE_STROKE);
                let _ = write!(
                    out,
                    r#"<polyline points="{},{} {},{} {},{} {},{}" fill="none" stroke="{BLUE_STROKE}"/>"#,
                    fmt(b.left()),
                    fmt(b.top()),
                    fmt(b.left() + 8.0),
                    fmt(b.top() - 8.0),
                    fmt(b.right() + 8.0),
                    fmt(b.top() - 8.0),
                    fmt(b.right() + 8.0),
                    fmt(b.bottom() - 8.0),
                );
            }
            DeviceArchetype::Artifact | DeviceArchetype::File => {
                rect(out, b, 0.0, "white", BLUE_STROKE);
            }
            _ => rect(out, b, 2.0, BLUE_FILL, BLUE_STROKE),
        }
        label(out, b, &node.label, lh);
        out.push_str("</g>");
    }
    notes(out, &d.notes, layout, lh)
}

fn usecase_nodes(out: &mut String, d: &UseCaseDiagram, layout: &Layout, lh: f64) -> Result<()> {
    for node in d.nodes.iter() {
        let b = layout.require(&node.name)?;
        out.push_str(r#"<g class="node usecase">"#);
        match node.kind {
            UseCaseNodeKind::Actor => {
                stick_figure(out, b);
                text_block(out, b.x, b.bottom() + lh, &node.label, "middle", lh, "");
            }
            UseCaseNodeKind::UseCase => {
                let _ = write!(
                    out,
                    r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" fill="{BLUE_FILL}" stroke="{BLUE_STROKE}"/>"#,
                    fmt(b.x),
                    fmt(b.y),
                    fmt(b.width / 2.0),
                    fmt(b.height / 2.0),
                );
                label(out, b, &node.label, lh);
            }
        }
        out.push_str("</g>");
    }
    notes(out, &d.notes, layout, lh)
}

fn mindmap_nodes(out: &mut String, d: &MindmapDiagram, layout: &Layout, lh: f64) -> Result<()> {
    for node in d.nodes.iter() {
        let b = layout.require(&node.name)?;
        out.push_str(r#"<g class="node mindmap">"#);
        if node.parent.is_none() {
            let _ = write!(
                out,
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" fill="{BLUE_FILL}" stroke="{BLUE_STROKE}"/>"#,
                fmt(b.x),
                fmt(b.y),
                fmt(b.width / 2.0),
                fmt(b.height / 2.0),
            );
        } else if !node.boxless {
            rect(out, b, b.height / 2.0, "#fff2cc", "#d6b656");
        }
        label(out, b, &node.label, lh);
        out.push_str("</g>");
    }
    Ok(())
}

fn sequence_nodes(out: &mut String, d: &SequenceDiagram, layout: &Layout, lh: f64) -> Result<()> {
    for participant in d.participants.iter() {
        let b = layout.require(&participant.name)?;
        out.push_str(r#"<g class="node participant">"#);
        if participant.kind.is_actor() {
            let figure = NodeBox::new(b.x, b.y - lh / 2.0, 30.0, (b.height - lh).max(20.0));
            stick_figure(out, &figure);
            text_block(out, b.x, b.bottom() - lh / 2.0, &participant.label, "middle", lh, "");
        } else {
            rect(out, b, 3.0, BLUE_FILL, BLUE_STROKE);
            label(out, b, &participant.label, lh);
        }
        out.push_str("</g>");
    }
    let mut note_index = 0usize;
    for step in &d.steps {
        if let SequenceStep::Note(note) = step {
            let id = sequence_note_id(note_index);
            note_index += 1;
            if let Some(b) = layout.get(&id) {
                note_shape(out, b, &note.text, lh);
            }
        }
    }
    Ok(())
}

fn activity_nodes(out: &mut String, d: &ActivityDiagram, layout: &Layout, lh: f64) -> Result<()> {
    for node in d.visible_nodes() {
        let b = layout.require(&node.name)?;
        out.push_str(r#"<g class="node activity">"#);
        match node.node_type {
            ActivityNodeType::Start => circle(out, b.x, b.y, 15.0, "#333", "#333", 1.0),
            ActivityNodeType::End => {
                circle(out, b.x, b.y, 18.0, "none", "#333", 2.0);
                circle(out, b.x, b.y, 12.0, "#333", "#333", 1.0);
            }
            ActivityNodeType::Action => {
                rect(out, b, 10.0, BLUE_FILL, BLUE_STROKE);
                label(out, b, &node.label, lh);
            }
            ActivityNodeType::Decision => {
                diamond(out, b, "#fff2cc", "#d6b656");
                label(out, b, &node.label, lh);
            }
            ActivityNodeType::Merge => diamond(out, b, "#f5f5f5", "#666666"),
            ActivityNodeType::Fork | ActivityNodeType::Join => rect(out, b, 2.0, "#333", "#333"),
            ActivityNodeType::ElseMarker
            | ActivityNodeType::ElseifMarker
            | ActivityNodeType::ForkAgainMarker => {}
        }
        out.push_str("</g>");
        if let Some(text) = &node.note {
            note_shape(out, layout.require(&activity_note_id(&node.name))?, text, lh);
        }
    }
    Ok(())
}

/// Sequence lifelines and dividers, drawn beneath messages.
pub(super) fn write_backdrop(out: &mut String, model: &DiagramModel, layout: &Layout, lh: f64) {
    let (DiagramModel::Sequence(d), Some(seq)) = (model, &layout.sequence) else {
        return;
    };
    for participant in d.participants.iter() {
        if let Some(b) = layout.get(&participant.name) {
            let _ = write!(
                out,
                r##"<line class="lifeline" x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="#999" stroke-dasharray="4 4"/>"##,
                fmt(b.bottom()),
                fmt(seq.lifeline_end),
                x = fmt(b.x),
            );
        }
    }
    for (step, y) in d.steps.iter().zip(&seq.rows) {
        if let SequenceStep::Divider { label } = step {
            let _ = write!(
                out,
                r##"<line class="divider" x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="#999" stroke-dasharray="8 4"/>"##,
                fmt(seq.left),
                fmt(seq.right),
                y = fmt(*y),
            );
            if !label.is_empty() {
                text_block(out, (seq.left + seq.right) / 2.0, y - lh * 0.75, label, "middle", lh, r#" font-weight="bold""#);
            }
        }
    }
}

pub(super) fn write_nodes(out: &mut String, model: &DiagramModel, layout: &Layout, lh: f64) -> Result<()> {
    match model {
        DiagramModel::Class(d) => class_nodes(out, d, layout, lh),
        DiagramModel::Er(d) => er_nodes(out, d, layout, lh),
        DiagramModel::State(d) => state_nodes(out, d, layout, lh),
        DiagramModel::Deployment(d) => deployment_nodes(out, d, layout, lh),
        DiagramModel::Usecase(d) => usecase_nodes(out, d, layout, lh),
        DiagramModel::Mindmap(d) => mindmap_nodes(out, d, layout, lh),
        DiagramModel::Sequence(d) => sequence_nodes(out, d, layout, lh),
        DiagramModel::Activity(d) => activity_nodes(out, d, layout, lh),
    }
}
