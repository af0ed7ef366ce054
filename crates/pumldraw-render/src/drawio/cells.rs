use super::styles;
use crate::edges::ResolvedEdge;
use crate::layout::{activity_note_id, sequence_note_id};
use crate::model::{Layout, NodeBox, SequenceLayout};
use crate::shapes::{
    self, MEMBER_ROW_HEIGHT, SEPARATOR_HEIGHT, START_SIZE, class_header_height,
    entity_separator_index,
};
use crate::xml::{escape_attr, fmt};
use crate::{Error, Result};
use pumldraw_core::DiagramModel;
use pumldraw_core::models::{
    ActivityDiagram, ActivityNodeType, ClassDiagram, ClassNode, DeploymentDiagram, ErDiagram,
    MindmapDiagram, Note, SequenceDiagram, SequenceStep, StateDiagram, StateKind, UseCaseDiagram,
    UseCaseNodeKind,
};
use rustc_hash::FxHashMap;
use std::fmt::Write as _;

const ROOT_PARENT: &str = "1";
const SELF_MESSAGE_WIDTH: f64 = 40.0;
const SELF_MESSAGE_DROP: f64 = 20.0;

/// Top-left geometry of a cell, relative to its parent.
#[derive(Debug, Clone, Copy)]
pub(super) struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<&NodeBox> for Geometry {
    fn from(b: &NodeBox) -> Self {
        Self {
            x: b.left(),
            y: b.top(),
            width: b.width,
            height: b.height,
        }
    }
}

/// Accumulates `mxCell` elements, handing out ids from 2 upward and remembering which cell
/// stands for which model node.
pub(super) struct CellWriter {
    out: String,
    pretty: bool,
    next_id: usize,
    ids: FxHashMap<String, String>,
}

impl CellWriter {
    pub fn new(pretty: bool) -> Self {
        Self {
            out: String::new(),
            pretty,
            next_id: 2,
            ids: FxHashMap::default(),
        }
    }

    fn fresh_id(&mut self) -> String {
        let id = self.next_id.to_string();
        self.next_id += 1;
        id
    }

    /// Appends one element line; `depth` 0 is a cell directly under `<root>`.
    fn line(&mut self, depth: usize, element: &str) {
        if self.pretty {
            for _ in 0..(8 + depth * 2) {
                self.out.push(' ');
            }
            self.out.push_str(element);
            self.out.push('\n');
        } else {
            self.out.push_str(element);
        }
    }

    pub fn vertex(&mut self, value: &str, style: &str, parent: &str, geo: Geometry) -> String {
        let id = self.fresh_id();
        let open = format!(
            r#"<mxCell id="{id}" value="{}" style="{}" vertex="1" parent="{parent}">"#,
            escape_attr(value),
            escape_attr(style),
        );
        let geometry = format!(
            r#"<mxGeometry x="{}" y="{}" width="{}" height="{}" as="geometry"/>"#,
            fmt(geo.x),
            fmt(geo.y),
            fmt(geo.width),
            fmt(geo.height),
        );
        self.line(0, &open);
        self.line(1, &geometry);
        self.line(0, "</mxCell>");
        id
    }

    /// A top-level vertex standing for model node `name`.
    pub fn node(&mut self, name: &str, value: &str, style: &str, b: &NodeBox) -> String {
        let id = self.vertex(value, style, ROOT_PARENT, Geometry::from(b));
        self.ids.insert(name.to_string(), id.clone());
        id
    }

    pub fn id_of(&self, name: &str) -> Result<String> {
        self.ids.get(name).cloned().ok_or_else(|| Error::InvalidModel {
            message: format!("edge endpoint {name} was never emitted"),
        })
    }

    pub fn edge(
        &mut self,
        value: &str,
        style: &str,
        source: &str,
        target: &str,
        points: &[(f64, f64)],
    ) -> String {
        let id = self.fresh_id();
        let open = format!(
            r#"<mxCell id="{id}" value="{}" style="{}" edge="1" parent="{ROOT_PARENT}" source="{source}" target="{target}">"#,
            escape_attr(value),
            escape_attr(style),
        );
        self.line(0, &open);
        if points.is_empty() {
            self.line(1, r#"<mxGeometry relative="1" as="geometry"/>"#);
        } else {
            self.line(1, r#"<mxGeometry relative="1" as="geometry">"#);
            self.line(2, r#"<Array as="points">"#);
            for (x, y) in points {
                let point = format!(r#"<mxPoint x="{}" y="{}"/>"#, fmt(*x), fmt(*y));
                self.line(3, &point);
            }
            self.line(2, "</Array>");
            self.line(1, "</mxGeometry>");
        }
        self.line(0, "</mxCell>");
        id
    }

    /// Multiplicity text pinned to one end of `edge_id` (`x` = -1 source end, 1 target end).
    pub fn edge_label(&mut self, edge_id: &str, value: &str, x: f64) {
        let id = self.fresh_id();
        let mut open = String::new();
        let _ = write!(
            open,
            r#"<mxCell id="{id}" value="{}" style="{}" vertex="1" connectable="0" parent="{edge_id}">"#,
            escape_attr(value),
            styles::EDGE_LABEL,
        );
        self.line(0, &open);
        self.line(1, &format!(r#"<mxGeometry x="{}" relative="1" as="geometry">"#, fmt(x)));
        self.line(2, r#"<mxPoint as="offset"/>"#);
        self.line(1, "</mxGeometry>");
        self.line(0, "</mxCell>");
    }

    pub fn finish(self) -> String {
        self.out
    }
}

pub(super) fn write_model(
    w: &mut CellWriter,
    model: &DiagramModel,
    layout: &Layout,
    edges: &[ResolvedEdge],
) -> Result<()> {
    match model {
        DiagramModel::Class(d) => write_class(w, d, layout)?,
        DiagramModel::Er(d) => write_er(w, d, layout)?,
        DiagramModel::State(d) => write_state(w, d, layout)?,
        DiagramModel::Deployment(d) => write_deployment(w, d, layout)?,
        DiagramModel::Usecase(d) => write_usecase(w, d, layout)?,
        DiagramModel::Mindmap(d) => write_mindmap(w, d, layout)?,
        DiagramModel::Activity(d) => write_activity(w, d, layout)?,
        DiagramModel::Sequence(d) => {
            let seq = layout.sequence.as_ref().ok_or_else(|| Error::InvalidModel {
                message: "sequence diagram laid out without rows".to_string(),
            })?;
            write_sequence(w, d, layout, seq)?;
            return write_messages(w, layout, seq, edges);
        }
    }
    write_edges(w, model, edges)
}

fn write_notes(w: &mut CellWriter, notes: &[Note], layout: &Layout) -> Result<()> {
    for note in notes {
        w.node(&note.name, &note.text, styles::NOTE, layout.require(&note.name)?);
    }
    Ok(())
}

/// Member rows below a container title bar, with an optional separator before row `split`.
fn write_rows(
    w: &mut CellWriter,
    parent: &str,
    width: f64,
    header: f64,
    rows: &[String],
    split: Option<usize>,
) {
    let mut y = header;
    for (i, row) in rows.iter().enumerate() {
        if split == Some(i) {
            let geo = Geometry {
                x: 0.0,
                y,
                width,
                height: SEPARATOR_HEIGHT,
            };
            w.vertex("", styles::CLASS_SEPARATOR, parent, geo);
            y += SEPARATOR_HEIGHT;
        }
        let geo = Geometry {
            x: 0.0,
            y,
            width,
            height: MEMBER_ROW_HEIGHT,
        };
        w.vertex(row, styles::CLASS_MEMBER, parent, geo);
        y += MEMBER_ROW_HEIGHT;
    }
}

fn class_title(node: &ClassNode) -> String {
    let stereotype = node
        .kind
        .stereotype()
        .map(str::to_string)
        .or_else(|| node.stereotype.as_ref().map(|s| format!("\u{ab}{s}\u{bb}")));
    match stereotype {
        Some(s) => format!("{s}\n{}", node.title()),
        None => node.title(),
    }
}

fn write_class(w: &mut CellWriter, d: &ClassDiagram, layout: &Layout) -> Result<()> {
    for class in d.classes.iter() {
        let b = layout.require(&class.name)?;
        let header = class_header_height(class);
        let style = styles::class_container(class.kind, &fmt(header));
        let id = w.node(&class.name, &class_title(class), &style, b);
        let rows: Vec<String> = class
            .attributes
            .iter()
            .chain(&class.methods)
            .map(|m| m.display_text())
            .collect();
        let split = (!class.attributes.is_empty() && !class.methods.is_empty())
            .then_some(class.attributes.len());
        write_rows(w, &id, b.width, header, &rows, split);
    }
    write_notes(w, &d.notes, layout)
}

fn write_er(w: &mut CellWriter, d: &ErDiagram, layout: &Layout) -> Result<()> {
    let style = styles::entity_container();
    for entity in d.entities.iter() {
        let b = layout.require(&entity.name)?;
        let id = w.node(&entity.name, &entity.label, &style, b);
        let rows: Vec<String> = entity.attributes.iter().map(|a| a.display_text()).collect();
        write_rows(
            w,
            &id,
            b.width,
            shapes::HEADER_HEIGHT,
            &rows,
            entity_separator_index(entity),
        );
    }
    Ok(())
}

fn write_state(w: &mut CellWriter, d: &StateDiagram, layout: &Layout) -> Result<()> {
    for state in d.states.iter() {
        let value = match state.kind {
            StateKind::Normal | StateKind::Composite => {
                let mut lines = vec![state.label.as_str()];
                lines.extend(state.descriptions.iter().map(String::as_str));
                lines.join("\n")
            }
            _ => String::new(),
        };
        w.node(&state.name, &value, styles::state(state.kind), layout.require(&state.name)?);
    }
    write_notes(w, &d.notes, layout)
}

fn write_deployment(w: &mut CellWriter, d: &DeploymentDiagram, layout: &Layout) -> Result<()> {
    for node in d.nodes.iter() {
        w.node(
            &node.name,
            &node.label,
            styles::deployment(node.archetype),
            layout.require(&node.name)?,
        );
    }
    write_notes(w, &d.notes, layout)
}

fn write_usecase(w: &mut CellWriter, d: &UseCaseDiagram, layout: &Layout) -> Result<()> {
    for group in &layout.groups {
        let geo = Geometry {
            x: group.x,
            y: group.y,
            width: group.width,
            height: group.height,
        };
        w.vertex(&group.name, styles::BOUNDARY, ROOT_PARENT, geo);
    }
    for node in d.nodes.iter() {
        let style = match node.kind {
            UseCaseNodeKind::Actor => styles::ACTOR,
            UseCaseNodeKind::UseCase => styles::USE_CASE,
        };
        w.node(&node.name, &node.label, style, layout.require(&node.name)?);
    }
    write_notes(w, &d.notes, layout)
}

fn write_mindmap(w: &mut CellWriter, d: &MindmapDiagram, layout: &Layout) -> Result<()> {
    for node in d.nodes.iter() {
        let style = styles::mindmap_node(node.parent.is_none(), node.boxless);
        w.node(&node.name, &node.label, style, layout.require(&node.name)?);
    }
    Ok(())
}

fn write_activity(w: &mut CellWriter, d: &ActivityDiagram, layout: &Layout) -> Result<()> {
    for lane in &layout.lanes {
        let geo = Geometry {
            x: lane.x,
            y: lane.y,
            width: lane.width,
            height: lane.height,
        };
        w.vertex(&lane.name, styles::LANE, ROOT_PARENT, geo);
    }
    for group in &layout.groups {
        let geo = Geometry {
            x: group.x,
            y: group.y,
            width: group.width,
            height: group.height,
        };
        w.vertex(&group.name, styles::PARTITION, ROOT_PARENT, geo);
    }

    for node in d.visible_nodes() {
        let b = layout.require(&node.name)?;
        let style = styles::activity(node.node_type);
        match node.node_type {
            ActivityNodeType::End => {
                let disc = NodeBox::new(b.x, b.y, START_SIZE, START_SIZE);
                w.node(&node.name, "", style, &disc);
                w.vertex("", styles::END_RING, ROOT_PARENT, Geometry::from(b));
            }
            ActivityNodeType::Action | ActivityNodeType::Decision => {
                w.node(&node.name, &node.label, style, b);
            }
            _ => {
                w.node(&node.name, "", style, b);
            }
        }
        if let Some(text) = &node.note {
            let id = activity_note_id(&node.name);
            w.node(&id, text, styles::NOTE, layout.require(&id)?);
        }
    }
    Ok(())
}

fn write_sequence(
    w: &mut CellWriter,
    d: &SequenceDiagram,
    layout: &Layout,
    seq: &SequenceLayout,
) -> Result<()> {
    for participant in d.participants.iter() {
        let b = layout.require(&participant.name)?;
        let geo = Geometry {
            x: b.left(),
            y: seq.top,
            width: b.width,
            height: seq.lifeline_end - seq.top,
        };
        let style = format!("{}size={};", styles::lifeline(participant.kind), fmt(seq.header_height));
        let id = w.vertex(&participant.label, &style, ROOT_PARENT, geo);
        w.ids.insert(participant.name.clone(), id);
    }

    let mut note_index = 0usize;
    for (step, y) in d.steps.iter().zip(&seq.rows) {
        match step {
            SequenceStep::Note(note) => {
                let id = sequence_note_id(note_index);
                note_index += 1;
                if let Some(b) = layout.get(&id) {
                    w.node(&id, &note.text, styles::NOTE, b);
                }
            }
            SequenceStep::Divider { label } => {
                let geo = Geometry {
                    x: seq.left,
                    y: y - 5.0,
                    width: seq.right - seq.left,
                    height: 10.0,
                };
                w.vertex(label, styles::DIVIDER, ROOT_PARENT, geo);
            }
            SequenceStep::Message(_) => {}
        }
    }
    Ok(())
}

fn write_messages(
    w: &mut CellWriter,
    layout: &Layout,
    seq: &SequenceLayout,
    edges: &[ResolvedEdge],
) -> Result<()> {
    for edge in edges {
        let Some(message) = edge.message else {
            continue;
        };
        let source = w.id_of(&edge.from)?;
        let target = w.id_of(&edge.to)?;
        let exit = seq.lifeline_fraction(message.y);
        let label = edge.label.as_deref().unwrap_or_default();
        if edge.is_self_loop() {
            let x = layout.require(&edge.from)?.x + SELF_MESSAGE_WIDTH;
            let end_y = message.y + SELF_MESSAGE_DROP;
            let style = format!(
                "{}exitX=0.5;exitY={};exitDx=0;exitDy=0;entryX=0.5;entryY={};entryDx=0;entryDy=0;",
                styles::message(message.kind),
                fmt(exit),
                fmt(seq.lifeline_fraction(end_y)),
            );
            w.edge(label, &style, &source, &target, &[(x, message.y), (x, end_y)]);
        } else {
            let style = format!(
                "{}exitX=0.5;exitY={};exitDx=0;exitDy=0;entryX=0.5;entryY={};entryDx=0;entryDy=0;",
                styles::message(message.kind),
                fmt(exit),
                fmt(exit),
            );
            w.edge(label, &style, &source, &target, &[]);
        }
    }
    Ok(())
}

fn write_edges(w: &mut CellWriter, model: &DiagramModel, edges: &[ResolvedEdge]) -> Result<()> {
    for edge in edges {
        let source = w.id_of(&edge.from)?;
        let target = w.id_of(&edge.to)?;
        let label = edge.label.as_deref().unwrap_or_default();
        let style = match model {
            DiagramModel::Activity(_) => styles::activity_edge(edge).to_string(),
            DiagramModel::Mindmap(_) => styles::MINDMAP_EDGE.to_string(),
            _ => styles::edge(edge),
        };
        let id = w.edge(label, &style, &source, &target, &[]);
        if edge.cardinality.is_some() {
            continue;
        }
        if let Some(text) = &edge.from_label {
            w.edge_label(&id, text, -1.0);
        }
        if let Some(text) = &edge.to_label {
            w.edge_label(&id, text, 1.0);
        }
    }
    Ok(())
}
