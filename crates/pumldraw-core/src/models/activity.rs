use super::Relation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityDiagram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Nodes in encounter order, markers included.
    pub nodes: Vec<ActivityNode>,
    #[serde(default)]
    pub edges: Vec<Relation>,
    #[serde(default)]
    pub swimlanes: Vec<Swimlane>,
    #[serde(default)]
    pub partitions: Vec<Partition>,
}

impl ActivityDiagram {
    pub fn node(&self, name: &str) -> Option<&ActivityNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Nodes that are drawn (markers are bookkeeping only).
    pub fn visible_nodes(&self) -> impl Iterator<Item = &ActivityNode> {
        self.nodes.iter().filter(|n| !n.is_marker())
    }

    pub fn count(&self, node_type: ActivityNodeType) -> usize {
        self.nodes.iter().filter(|n| n.node_type == node_type).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityNodeType {
    Start,
    End,
    Action,
    Decision,
    Merge,
    Fork,
    Join,
    ElseMarker,
    ElseifMarker,
    ForkAgainMarker,
}

impl ActivityNodeType {
    pub fn is_marker(self) -> bool {
        matches!(
            self,
            ActivityNodeType::ElseMarker
                | ActivityNodeType::ElseifMarker
                | ActivityNodeType::ForkAgainMarker
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityNodeType::Start => "start",
            ActivityNodeType::End => "end",
            ActivityNodeType::Action => "action",
            ActivityNodeType::Decision => "decision",
            ActivityNodeType::Merge => "merge",
            ActivityNodeType::Fork => "fork",
            ActivityNodeType::Join => "join",
            ActivityNodeType::ElseMarker => "else_marker",
            ActivityNodeType::ElseifMarker => "elseif_marker",
            ActivityNodeType::ForkAgainMarker => "fork_again_marker",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityNode {
    /// Identity (`a<index>`), unique within the diagram.
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: ActivityNodeType,
    pub label: String,
    /// `then (...)` / `is (...)` text of a decision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yes_branch: Option<String>,
    /// Branch text of an `else`/`elseif` marker, or the `endwhile (...)` text of a loop merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_label: Option<String>,
    /// Opening decision/fork of a marker, merge or join.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_decision: Option<String>,
    /// Decision or merge of a `while` loop.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub looping: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ActivityNode {
    pub fn is_marker(&self) -> bool {
        self.node_type.is_marker()
    }
}

/// Presentation-only lane; `first_node..=last_node` spans every node assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swimlane {
    pub name: String,
    pub first_node: usize,
    pub last_node: usize,
}

/// Presentation-only group; covers node indices `start..end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub name: String,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}
