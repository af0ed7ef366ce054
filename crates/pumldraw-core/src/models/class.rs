use super::{Named, NodeTable, Note, Relation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDiagram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub classes: NodeTable<ClassNode>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Abstract,
    Enum,
    Annotation,
}

impl ClassKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(ClassKind::Class),
            "interface" => Some(ClassKind::Interface),
            "abstract" => Some(ClassKind::Abstract),
            "enum" => Some(ClassKind::Enum),
            "annotation" => Some(ClassKind::Annotation),
            _ => None,
        }
    }

    /// Stereotype line shown above the class name, if any.
    pub fn stereotype(self) -> Option<&'static str> {
        match self {
            ClassKind::Class => None,
            ClassKind::Interface => Some("«interface»"),
            ClassKind::Abstract => Some("«abstract»"),
            ClassKind::Enum => Some("«enumeration»"),
            ClassKind::Annotation => Some("«annotation»"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    #[serde(rename = "+")]
    Public,
    #[serde(rename = "-")]
    Private,
    #[serde(rename = "#")]
    Protected,
    #[serde(rename = "~")]
    Package,
}

impl Visibility {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Visibility::Public),
            '-' => Some(Visibility::Private),
            '#' => Some(Visibility::Protected),
            '~' => Some(Visibility::Package),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Visibility::Public => '+',
            Visibility::Private => '-',
            Visibility::Protected => '#',
            Visibility::Package => '~',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMember {
    pub visibility: Visibility,
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    pub is_method: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
}

impl ClassMember {
    /// `+ name: type` as drawn in both outputs.
    pub fn display_text(&self) -> String {
        if self.type_name.is_empty() {
            format!("{} {}", self.visibility.symbol(), self.name)
        } else {
            format!("{} {}: {}", self.visibility.symbol(), self.name, self.type_name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassNode {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ClassKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stereotype: Option<String>,
    #[serde(default)]
    pub attributes: Vec<ClassMember>,
    #[serde(default)]
    pub methods: Vec<ClassMember>,
}

impl ClassNode {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
            generic: None,
            stereotype: None,
            attributes: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn title(&self) -> String {
        match &self.generic {
            Some(g) => format!("{}<{}>", self.label, g),
            None => self.label.clone(),
        }
    }

    pub fn member_count(&self) -> usize {
        self.attributes.len() + self.methods.len()
    }
}

impl Named for ClassNode {
    fn name(&self) -> &str {
        &self.name
    }
}
