use super::{Named, NodeTable, Relation, RelationKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceDiagram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub participants: NodeTable<Participant>,
    /// Messages, notes and dividers in source order; each occupies one layout row.
    #[serde(default)]
    pub steps: Vec<SequenceStep>,
}

impl SequenceDiagram {
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.steps.iter().filter_map(|s| match s {
            SequenceStep::Message(m) => Some(m),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
    #[default]
    Participant,
    Actor,
    Boundary,
    Control,
    Entity,
    Database,
    Collections,
    Queue,
}

impl ParticipantKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "participant" => Some(ParticipantKind::Participant),
            "actor" => Some(ParticipantKind::Actor),
            "boundary" => Some(ParticipantKind::Boundary),
            "control" => Some(ParticipantKind::Control),
            "entity" => Some(ParticipantKind::Entity),
            "database" => Some(ParticipantKind::Database),
            "collections" => Some(ParticipantKind::Collections),
            "queue" => Some(ParticipantKind::Queue),
            _ => None,
        }
    }

    pub fn is_actor(self) -> bool {
        self == ParticipantKind::Actor
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ParticipantKind,
}

impl Participant {
    pub fn new(name: impl Into<String>, kind: ParticipantKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
        }
    }
}

impl Named for Participant {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Sync,
    Async,
    Reply,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Message {
    pub fn is_self(&self) -> bool {
        self.from == self.to
    }

    pub fn to_relation(&self) -> Relation {
        let kind = match self.kind {
            MessageKind::Reply => RelationKind::Reply,
            MessageKind::Sync | MessageKind::Async => RelationKind::Message,
        };
        Relation::new(&self.from, &self.to, kind).with_label(self.label.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotePlacement {
    Left,
    Right,
    Over,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceNote {
    pub placement: NotePlacement,
    /// One participant, or two for `note over A,B`.
    pub participants: Vec<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "lowercase")]
pub enum SequenceStep {
    Message(Message),
    Note(SequenceNote),
    Divider { label: String },
}
