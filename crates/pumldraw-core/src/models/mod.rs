//! Typed diagram model shared by the parsers, the layout engine and both renderers.
//!
//! Every diagram kind owns an ordered node table keyed by identity (`name`) plus a relation
//! list whose endpoints reference those identities. Tables are filled in a single pass and
//! treated as frozen once [`crate::Engine`] hands the model out.

mod activity;
mod class;
mod deployment;
mod er;
mod mindmap;
mod sequence;
mod state;
mod usecase;

pub use activity::{ActivityDiagram, ActivityNode, ActivityNodeType, Partition, Swimlane};
pub use class::{ClassDiagram, ClassKind, ClassMember, ClassNode, Visibility};
pub use deployment::{DeploymentDiagram, DeploymentNode, DeviceArchetype};
pub use er::{Cardinality, EntityAttribute, EntityNode, ErDiagram, ErRelationship};
pub use mindmap::{MindmapDiagram, MindmapNode, MindmapSide};
pub use sequence::{
    Message, MessageKind, NotePlacement, Participant, ParticipantKind, SequenceDiagram,
    SequenceNote, SequenceStep,
};
pub use state::{StateDiagram, StateKind, StateNode};
pub use usecase::{UseCaseDiagram, UseCaseNode, UseCaseNodeKind};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Class,
    Sequence,
    State,
    Mindmap,
    Er,
    Deployment,
    Usecase,
    Activity,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 8] = [
        DiagramKind::Class,
        DiagramKind::Sequence,
        DiagramKind::State,
        DiagramKind::Mindmap,
        DiagramKind::Er,
        DiagramKind::Deployment,
        DiagramKind::Usecase,
        DiagramKind::Activity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DiagramKind::Class => "class",
            DiagramKind::Sequence => "sequence",
            DiagramKind::State => "state",
            DiagramKind::Mindmap => "mindmap",
            DiagramKind::Er => "er",
            DiagramKind::Deployment => "deployment",
            DiagramKind::Usecase => "usecase",
            DiagramKind::Activity => "activity",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DiagramKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiagramKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Extends,
    Implements,
    Composition,
    Aggregation,
    Association,
    Dependency,
    Transition,
    Message,
    Reply,
    Containment,
    Include,
    Extend,
    Relationship,
    Note,
}

impl RelationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Extends => "extends",
            RelationKind::Implements => "implements",
            RelationKind::Composition => "composition",
            RelationKind::Aggregation => "aggregation",
            RelationKind::Association => "association",
            RelationKind::Dependency => "dependency",
            RelationKind::Transition => "transition",
            RelationKind::Message => "message",
            RelationKind::Reply => "reply",
            RelationKind::Containment => "containment",
            RelationKind::Include => "include",
            RelationKind::Extend => "extend",
            RelationKind::Relationship => "relationship",
            RelationKind::Note => "note",
        }
    }

    pub fn is_dashed(self) -> bool {
        matches!(
            self,
            RelationKind::Implements
                | RelationKind::Dependency
                | RelationKind::Reply
                | RelationKind::Include
                | RelationKind::Extend
                | RelationKind::Note
                | RelationKind::Containment
        )
    }

    pub fn is_directed(self) -> bool {
        !matches!(self, RelationKind::Note | RelationKind::Containment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: RelationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Multiplicity text drawn next to the `from` end (class diagrams).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_label: Option<String>,
    /// Multiplicity text drawn next to the `to` end (class diagrams).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_label: Option<String>,
}

impl Relation {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            label: None,
            from_label: None,
            to_label: None,
        }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label.filter(|l| !l.is_empty());
        self
    }
}

/// A free-standing or attached note in grid-laid-out diagrams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Identity in the coordinate map (`note-<n>`).
    pub name: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Note {
    pub fn id_for(index: usize) -> String {
        format!("note-{index}")
    }
}

/// Anything stored in a [`NodeTable`].
pub trait Named {
    fn name(&self) -> &str;
}

/// Ordered symbol table with get-or-create semantics; the first declaration fixes identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeTable<T> {
    nodes: IndexMap<String, T>,
}

impl<T> Default for NodeTable<T> {
    fn default() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }
}

impl<T: Named> NodeTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `node` unless its name is already declared; returns the stored node.
    pub fn declare(&mut self, node: T) -> &mut T {
        self.nodes.entry(node.name().to_string()).or_insert(node)
    }

    /// Looks up `name`, creating it with `make` on first reference.
    pub fn get_or_insert_with(&mut self, name: &str, make: impl FnOnce() -> T) -> &mut T {
        self.nodes.entry(name.to_string()).or_insert_with(make)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.nodes.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.nodes.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.nodes.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }
}

impl<'a, T> IntoIterator for &'a NodeTable<T> {
    type Item = (&'a String, &'a T);
    type IntoIter = indexmap::map::Iter<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// The parsed diagram, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DiagramModel {
    Class(ClassDiagram),
    Sequence(SequenceDiagram),
    State(StateDiagram),
    Mindmap(MindmapDiagram),
    Er(ErDiagram),
    Deployment(DeploymentDiagram),
    Usecase(UseCaseDiagram),
    Activity(ActivityDiagram),
}

impl DiagramModel {
    pub fn empty(kind: DiagramKind) -> Self {
        match kind {
            DiagramKind::Class => DiagramModel::Class(ClassDiagram::default()),
            DiagramKind::Sequence => DiagramModel::Sequence(SequenceDiagram::default()),
            DiagramKind::State => DiagramModel::State(StateDiagram::default()),
            DiagramKind::Mindmap => DiagramModel::Mindmap(MindmapDiagram::default()),
            DiagramKind::Er => DiagramModel::Er(ErDiagram::default()),
            DiagramKind::Deployment => DiagramModel::Deployment(DeploymentDiagram::default()),
            DiagramKind::Usecase => DiagramModel::Usecase(UseCaseDiagram::default()),
            DiagramKind::Activity => DiagramModel::Activity(ActivityDiagram::default()),
        }
    }

    pub fn kind(&self) -> DiagramKind {
        match self {
            DiagramModel::Class(_) => DiagramKind::Class,
            DiagramModel::Sequence(_) => DiagramKind::Sequence,
            DiagramModel::State(_) => DiagramKind::State,
            DiagramModel::Mindmap(_) => DiagramKind::Mindmap,
            DiagramModel::Er(_) => DiagramKind::Er,
            DiagramModel::Deployment(_) => DiagramKind::Deployment,
            DiagramModel::Usecase(_) => DiagramKind::Usecase,
            DiagramModel::Activity(_) => DiagramKind::Activity,
        }
    }

    /// Number of drawable nodes (markers and notes excluded).
    pub fn node_count(&self) -> usize {
        match self {
            DiagramModel::Class(d) => d.classes.len(),
            DiagramModel::Sequence(d) => d.participants.len(),
            DiagramModel::State(d) => d.states.len(),
            DiagramModel::Mindmap(d) => d.nodes.len(),
            DiagramModel::Er(d) => d.entities.len(),
            DiagramModel::Deployment(d) => d.nodes.len(),
            DiagramModel::Usecase(d) => d.nodes.len(),
            DiagramModel::Activity(d) => d.nodes.iter().filter(|n| !n.is_marker()).count(),
        }
    }

    /// True when parsing recognised no elements at all.
    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// All relations as `(from, to, kind, label)` views, in model order. ER relationships and
    /// sequence messages are projected onto the common [`Relation`] shape.
    pub fn relations(&self) -> Vec<Relation> {
        match self {
            DiagramModel::Class(d) => d.relations.clone(),
            DiagramModel::Sequence(d) => d.messages().map(Message::to_relation).collect(),
            DiagramModel::State(d) => d.relations.clone(),
            DiagramModel::Mindmap(d) => d.relations.clone(),
            DiagramModel::Er(d) => d.relationships.iter().map(ErRelationship::to_relation).collect(),
            DiagramModel::Deployment(d) => d.relations.clone(),
            DiagramModel::Usecase(d) => d.relations.clone(),
            DiagramModel::Activity(d) => d.edges.clone(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            DiagramModel::Class(d) => d.title.as_deref(),
            DiagramModel::Sequence(d) => d.title.as_deref(),
            DiagramModel::State(d) => d.title.as_deref(),
            DiagramModel::Mindmap(d) => d.title.as_deref(),
            DiagramModel::Er(d) => d.title.as_deref(),
            DiagramModel::Deployment(d) => d.title.as_deref(),
            DiagramModel::Usecase(d) => d.title.as_deref(),
            DiagramModel::Activity(d) => d.title.as_deref(),
        }
    }

    pub(crate) fn set_title(&mut self, title: Option<String>) {
        let slot = match self {
            DiagramModel::Class(d) => &mut d.title,
            DiagramModel::Sequence(d) => &mut d.title,
            DiagramModel::State(d) => &mut d.title,
            DiagramModel::Mindmap(d) => &mut d.title,
            DiagramModel::Er(d) => &mut d.title,
            DiagramModel::Deployment(d) => &mut d.title,
            DiagramModel::Usecase(d) => &mut d.title,
            DiagramModel::Activity(d) => &mut d.title,
        };
        *slot = title;
    }
}
