//! Edge resolution shared by both renderers: one pass over the model's relations, keeping
//! exactly the edges whose endpoints both have coordinates.

use crate::model::Layout;
use pumldraw_core::models::{Cardinality, MessageKind, Note, SequenceStep};
use pumldraw_core::{DiagramModel, Relation, RelationKind};
use serde::Serialize;

/// A sequence message pinned to its row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MessageRow {
    pub kind: MessageKind,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEdge {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
    /// Display label; include/extend relations show their stereotype instead of the raw text.
    pub label: Option<String>,
    pub from_label: Option<String>,
    pub to_label: Option<String>,
    pub dashed: bool,
    /// `(from, to)` crow's-foot ends of an ER relationship.
    pub cardinality: Option<(Cardinality, Cardinality)>,
    pub message: Option<MessageRow>,
    /// Activity edge whose target sits above its source (loop back edge).
    pub back_edge: bool,
}

impl ResolvedEdge {
    fn from_relation(rel: &Relation) -> Self {
        let label = match rel.kind {
            RelationKind::Include => Some("\u{ab}include\u{bb}".to_string()),
            RelationKind::Extend => Some("\u{ab}extend\u{bb}".to_string()),
            _ => rel.label.clone(),
        };
        Self {
            from: rel.from.clone(),
            to: rel.to.clone(),
            kind: rel.kind,
            label,
            from_label: rel.from_label.clone(),
            to_label: rel.to_label.clone(),
            dashed: rel.kind.is_dashed(),
            cardinality: None,
            message: None,
            back_edge: false,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

fn note_links(notes: &[Note]) -> impl Iterator<Item = Relation> + '_ {
    notes.iter().filter_map(|n| {
        n.target
            .as_ref()
            .map(|target| Relation::new(&n.name, target, RelationKind::Note))
    })
}

/// Computes the drawable edges of `model` against `layout`, in model order. Relations naming an
/// endpoint without coordinates are dropped.
pub fn resolve_edges(model: &DiagramModel, layout: &Layout) -> Vec<ResolvedEdge> {
    let candidates: Vec<ResolvedEdge> = match model {
        DiagramModel::Class(d) => d
            .relations
            .iter()
            .cloned()
            .chain(note_links(&d.notes))
            .map(|r| ResolvedEdge::from_relation(&r))
            .collect(),
        DiagramModel::State(d) => d
            .relations
            .iter()
            .cloned()
            .chain(note_links(&d.notes))
            .map(|r| ResolvedEdge::from_relation(&r))
            .collect(),
        DiagramModel::Deployment(d) => d
            .relations
            .iter()
            .cloned()
            .chain(note_links(&d.notes))
            .map(|r| ResolvedEdge::from_relation(&r))
            .collect(),
        DiagramModel::Usecase(d) => d
            .relations
            .iter()
            .cloned()
            .chain(note_links(&d.notes))
            .map(|r| ResolvedEdge::from_relation(&r))
            .collect(),
        DiagramModel::Mindmap(d) => d.relations.iter().map(ResolvedEdge::from_relation).collect(),
        DiagramModel::Er(d) => d
            .relationships
            .iter()
            .map(|rel| {
                let mut edge = ResolvedEdge::from_relation(&rel.to_relation());
                edge.dashed = !rel.identifying;
                edge.cardinality = Some((rel.from_cardinality, rel.to_cardinality));
                edge
            })
            .collect(),
        DiagramModel::Sequence(d) => {
            let rows = layout.sequence.as_ref().map(|s| s.rows.as_slice()).unwrap_or_default();
            d.steps
                .iter()
                .zip(rows)
                .filter_map(|(step, y)| match step {
                    SequenceStep::Message(message) => {
                        let mut edge = ResolvedEdge::from_relation(&message.to_relation());
                        edge.message = Some(MessageRow {
                            kind: message.kind,
                            y: *y,
                        });
                        Some(edge)
                    }
                    _ => None,
                })
                .collect()
        }
        DiagramModel::Activity(d) => d
            .edges
            .iter()
            .map(|rel| {
                let mut edge = ResolvedEdge::from_relation(rel);
                edge.back_edge = match (layout.get(&rel.from), layout.get(&rel.to)) {
                    (Some(from), Some(to)) => to.y < from.y,
                    _ => false,
                };
                edge
            })
            .collect(),
    };

    candidates
        .into_iter()
        .filter(|edge| {
            let keep = layout.contains(&edge.from) && layout.contains(&edge.to);
            if !keep {
                tracing::trace!(from = %edge.from, to = %edge.to, "dropping edge with unplaced endpoint");
            }
            keep
        })
        .collect()
}
