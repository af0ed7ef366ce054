use super::{Named, NodeTable, Relation, RelationKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErDiagram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub entities: NodeTable<EntityNode>,
    #[serde(default)]
    pub relationships: Vec<ErRelationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAttribute {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub foreign_key: bool,
    #[serde(default)]
    pub mandatory: bool,
}

impl EntityAttribute {
    pub fn display_text(&self) -> String {
        let mut out = String::new();
        if self.primary_key {
            out.push_str("PK ");
        } else if self.foreign_key {
            out.push_str("FK ");
        }
        out.push_str(&self.name);
        if !self.type_name.is_empty() {
            out.push_str(": ");
            out.push_str(&self.type_name);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityNode {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub attributes: Vec<EntityAttribute>,
}

impl EntityNode {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            attributes: Vec::new(),
        }
    }
}

impl Named for EntityNode {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Crow's-foot end of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cardinality {
    ZeroOrOne,
    ExactlyOne,
    ZeroOrMany,
    OneOrMany,
}

impl Cardinality {
    /// Token on the left of the line (`|o--`, `||--`, `}o--`, `}|--`).
    pub fn from_left_token(token: &str) -> Option<Self> {
        match token {
            "|o" => Some(Cardinality::ZeroOrOne),
            "||" => Some(Cardinality::ExactlyOne),
            "}o" => Some(Cardinality::ZeroOrMany),
            "}|" => Some(Cardinality::OneOrMany),
            _ => None,
        }
    }

    /// Token on the right of the line (`--o|`, `--||`, `--o{`, `--|{`).
    pub fn from_right_token(token: &str) -> Option<Self> {
        match token {
            "o|" => Some(Cardinality::ZeroOrOne),
            "||" => Some(Cardinality::ExactlyOne),
            "o{" => Some(Cardinality::ZeroOrMany),
            "|{" => Some(Cardinality::OneOrMany),
            _ => None,
        }
    }

    /// Short multiplicity text (`0..1`, `1`, `0..*`, `1..*`).
    pub fn multiplicity(self) -> &'static str {
        match self {
            Cardinality::ZeroOrOne => "0..1",
            Cardinality::ExactlyOne => "1",
            Cardinality::ZeroOrMany => "0..*",
            Cardinality::OneOrMany => "1..*",
        }
    }

    /// draw.io ER arrow name for this end.
    pub fn drawio_arrow(self) -> &'static str {
        match self {
            Cardinality::ZeroOrOne => "ERzeroToOne",
            Cardinality::ExactlyOne => "ERmandOne",
            Cardinality::ZeroOrMany => "ERzeroToMany",
            Cardinality::OneOrMany => "ERoneToMany",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErRelationship {
    pub from: String,
    pub to: String,
    pub from_cardinality: Cardinality,
    pub to_cardinality: Cardinality,
    /// Solid line (`--`); dotted (`..`) relationships are non-identifying.
    pub identifying: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ErRelationship {
    pub fn to_relation(&self) -> Relation {
        let mut rel = Relation::new(&self.from, &self.to, RelationKind::Relationship)
            .with_label(self.label.clone());
        rel.from_label = Some(self.from_cardinality.multiplicity().to_string());
        rel.to_label = Some(self.to_cardinality.multiplicity().to_string());
        rel
    }
}
