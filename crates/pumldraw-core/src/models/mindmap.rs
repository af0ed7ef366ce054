use super::{Named, NodeTable, Relation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindmapDiagram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub nodes: NodeTable<MindmapNode>,
    /// Parent to child `containment` relations.
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl MindmapDiagram {
    pub fn root(&self) -> Option<&MindmapNode> {
        self.nodes.iter().find(|n| n.parent.is_none())
    }

    pub fn children_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MindmapNode> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.parent.as_deref() == Some(name))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MindmapSide {
    #[default]
    Center,
    Right,
    Left,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindmapNode {
    pub name: String,
    pub label: String,
    /// Root is level 1.
    pub level: usize,
    pub side: MindmapSide,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Drawn without a box (`*_`).
    #[serde(default)]
    pub boxless: bool,
}

impl Named for MindmapNode {
    fn name(&self) -> &str {
        &self.name
    }
}
