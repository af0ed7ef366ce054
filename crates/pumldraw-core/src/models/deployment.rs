use super::{Named, NodeTable, Note, Relation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentDiagram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub nodes: NodeTable<DeploymentNode>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceArchetype {
    #[default]
    Node,
    Database,
    Cloud,
    Artifact,
    Component,
    Storage,
    Folder,
    Frame,
    File,
    Rectangle,
    Queue,
    Interface,
    Package,
}

impl DeviceArchetype {
    pub const KEYWORDS: [&'static str; 13] = [
        "node",
        "database",
        "cloud",
        "artifact",
        "component",
        "storage",
        "folder",
        "frame",
        "file",
        "rectangle",
        "queue",
        "interface",
        "package",
    ];

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "node" => Some(DeviceArchetype::Node),
            "database" => Some(DeviceArchetype::Database),
            "cloud" => Some(DeviceArchetype::Cloud),
            "artifact" => Some(DeviceArchetype::Artifact),
            "component" => Some(DeviceArchetype::Component),
            "storage" => Some(DeviceArchetype::Storage),
            "folder" => Some(DeviceArchetype::Folder),
            "frame" => Some(DeviceArchetype::Frame),
            "file" => Some(DeviceArchetype::File),
            "rectangle" => Some(DeviceArchetype::Rectangle),
            "queue" => Some(DeviceArchetype::Queue),
            "interface" => Some(DeviceArchetype::Interface),
            "package" => Some(DeviceArchetype::Package),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentNode {
    pub name: String,
    pub label: String,
    pub archetype: DeviceArchetype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl DeploymentNode {
    pub fn new(name: impl Into<String>, archetype: DeviceArchetype) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            archetype,
            parent: None,
        }
    }
}

impl Named for DeploymentNode {
    fn name(&self) -> &str {
        &self.name
    }
}
