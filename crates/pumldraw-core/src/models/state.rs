use super::{Named, NodeTable, Note, Relation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDiagram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub states: NodeTable<StateNode>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateKind {
    #[default]
    Normal,
    Initial,
    Final,
    Fork,
    Join,
    Choice,
    Composite,
}

impl StateKind {
    pub fn from_stereotype(stereotype: &str) -> Option<Self> {
        match stereotype.trim().to_ascii_lowercase().as_str() {
            "fork" => Some(StateKind::Fork),
            "join" => Some(StateKind::Join),
            "choice" => Some(StateKind::Choice),
            "end" => Some(StateKind::Final),
            "start" => Some(StateKind::Initial),
            _ => None,
        }
    }

    pub fn is_pseudo(self) -> bool {
        matches!(
            self,
            StateKind::Initial | StateKind::Final | StateKind::Fork | StateKind::Join | StateKind::Choice
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateNode {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: StateKind,
    #[serde(default)]
    pub descriptions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl StateNode {
    pub fn new(name: impl Into<String>, kind: StateKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
            descriptions: Vec::new(),
            parent: None,
        }
    }
}

impl Named for StateNode {
    fn name(&self) -> &str {
        &self.name
    }
}
