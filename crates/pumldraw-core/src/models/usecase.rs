use super::{Named, NodeTable, Note, Relation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UseCaseDiagram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub nodes: NodeTable<UseCaseNode>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl UseCaseDiagram {
    pub fn actors(&self) -> impl Iterator<Item = &UseCaseNode> {
        self.nodes.iter().filter(|n| n.kind == UseCaseNodeKind::Actor)
    }

    pub fn use_cases(&self) -> impl Iterator<Item = &UseCaseNode> {
        self.nodes.iter().filter(|n| n.kind == UseCaseNodeKind::UseCase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UseCaseNodeKind {
    Actor,
    #[serde(rename = "usecase")]
    UseCase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseCaseNode {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: UseCaseNodeKind,
    /// Enclosing `rectangle` system boundary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<String>,
}

impl UseCaseNode {
    pub fn new(name: impl Into<String>, kind: UseCaseNodeKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
            boundary: None,
        }
    }

    pub fn is_actor(&self) -> bool {
        self.kind == UseCaseNodeKind::Actor
    }
}

impl Named for UseCaseNode {
    fn name(&self) -> &str {
        &self.name
    }
}
