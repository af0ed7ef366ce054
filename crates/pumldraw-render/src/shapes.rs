//! Content-dependent box sizes. The layout stores these in its coordinate map, and both
//! renderers draw from the stored boxes, so proportions match between the two outputs.

use crate::text::{TextMeasurer, TextMetrics, TextStyle};
use pumldraw_core::models::{
    ActivityNode, ActivityNodeType, ClassNode, DeploymentNode, EntityNode, MindmapNode,
    Participant, StateKind, StateNode, UseCaseNode, UseCaseNodeKind,
};

/// Height of a class or entity title bar.
pub const HEADER_HEIGHT: f64 = 26.0;
/// Extra title bar height when a stereotype line is shown.
pub const STEREOTYPE_HEIGHT: f64 = 14.0;
pub const MEMBER_ROW_HEIGHT: f64 = 20.0;
pub const SEPARATOR_HEIGHT: f64 = 8.0;
/// Padding below the last member row.
pub const BODY_PADDING: f64 = 6.0;

pub const START_SIZE: f64 = 30.0;
/// Outer ring of an activity end node; the filled disc inside is [`START_SIZE`].
pub const END_SIZE: f64 = 40.0;
pub const MERGE_SIZE: f64 = 30.0;
pub const BAR_HEIGHT: f64 = 8.0;
pub const ACTOR_WIDTH: f64 = 30.0;
pub const ACTOR_HEIGHT: f64 = 60.0;

/// Sizes every kind of node from its text.
pub struct Sizer<'a> {
    measurer: &'a dyn TextMeasurer,
    style: TextStyle,
}

impl<'a> Sizer<'a> {
    pub fn new(measurer: &'a dyn TextMeasurer, font_size: f64) -> Self {
        Self {
            measurer,
            style: TextStyle::sized(font_size),
        }
    }

    pub fn text(&self, text: &str) -> TextMetrics {
        self.measurer.measure(text, &self.style)
    }

    fn widest<'t>(&self, texts: impl IntoIterator<Item = &'t str>) -> f64 {
        texts
            .into_iter()
            .map(|t| self.text(t).width)
            .fold(0.0, f64::max)
    }

    pub fn class(&self, node: &ClassNode) -> (f64, f64) {
        let title = node.title();
        let members: Vec<String> = node
            .attributes
            .iter()
            .chain(&node.methods)
            .map(|m| m.display_text())
            .collect();
        let widest = self
            .widest(members.iter().map(String::as_str))
            .max(self.text(&title).width);
        let separator = !node.attributes.is_empty() && !node.methods.is_empty();
        let header = class_header_height(node);
        let body = member_block_height(members.len(), separator);
        ((widest + 16.0).max(160.0), header + body)
    }

    pub fn entity(&self, node: &EntityNode) -> (f64, f64) {
        let rows: Vec<String> = node.attributes.iter().map(|a| a.display_text()).collect();
        let widest = self
            .widest(rows.iter().map(String::as_str))
            .max(self.text(&node.label).width);
        let separator = entity_separator_index(node).is_some();
        let body = member_block_height(rows.len(), separator);
        ((widest + 16.0).max(160.0), HEADER_HEIGHT + body)
    }

    pub fn state(&self, node: &StateNode) -> (f64, f64) {
        match node.kind {
            StateKind::Initial | StateKind::Final => (START_SIZE, START_SIZE),
            StateKind::Fork | StateKind::Join => (80.0, BAR_HEIGHT),
            StateKind::Choice => (40.0, 40.0),
            StateKind::Normal | StateKind::Composite => {
                let label = self.text(&node.label);
                let desc = self.widest(node.descriptions.iter().map(String::as_str));
                let desc_height = node.descriptions.len() as f64 * self.line_height();
                (
                    (label.width.max(desc) + 30.0).max(120.0),
                    (label.height + desc_height + 24.0).max(60.0),
                )
            }
        }
    }

    pub fn deployment(&self, node: &DeploymentNode) -> (f64, f64) {
        let m = self.text(&node.label);
        ((m.width + 40.0).max(120.0), (m.height + 30.0).max(60.0))
    }

    pub fn usecase(&self, node: &UseCaseNode) -> (f64, f64) {
        match node.kind {
            UseCaseNodeKind::Actor => (ACTOR_WIDTH, ACTOR_HEIGHT),
            UseCaseNodeKind::UseCase => {
                let m = self.text(&node.label);
                ((m.width + 50.0).max(120.0), (m.height + 30.0).max(60.0))
            }
        }
    }

    pub fn mindmap(&self, node: &MindmapNode, is_root: bool) -> (f64, f64) {
        let m = self.text(&node.label);
        if is_root {
            ((m.width + 40.0).max(80.0), m.height + 24.0)
        } else {
            ((m.width + 24.0).max(60.0), m.height + 16.0)
        }
    }

    pub fn participant(&self, node: &Participant, header_height: f64) -> (f64, f64) {
        let m = self.text(&node.label);
        ((m.width + 24.0).max(100.0), header_height.max(m.height + 12.0))
    }

    pub fn activity(&self, node: &ActivityNode) -> (f64, f64) {
        match node.node_type {
            ActivityNodeType::Start => (START_SIZE, START_SIZE),
            ActivityNodeType::End => (END_SIZE, END_SIZE),
            ActivityNodeType::Action => {
                let m = self.text(&node.label);
                ((m.width + 20.0).max(140.0), (m.height + 16.0).max(40.0))
            }
            ActivityNodeType::Decision => {
                let m = self.text(&node.label);
                ((m.width * 1.4 + 20.0).max(100.0), (m.height * 2.0 + 20.0).max(60.0))
            }
            ActivityNodeType::Merge => (MERGE_SIZE, MERGE_SIZE),
            ActivityNodeType::Fork | ActivityNodeType::Join => (160.0, BAR_HEIGHT),
            ActivityNodeType::ElseMarker
            | ActivityNodeType::ElseifMarker
            | ActivityNodeType::ForkAgainMarker => (0.0, 0.0),
        }
    }

    pub fn note(&self, text: &str) -> (f64, f64) {
        let m = self.text(text);
        ((m.width + 24.0).max(120.0), (m.height + 16.0).max(40.0))
    }

    pub fn line_height(&self) -> f64 {
        self.text("").height
    }
}

pub fn class_header_height(node: &ClassNode) -> f64 {
    if node.kind.stereotype().is_some() || node.stereotype.is_some() {
        HEADER_HEIGHT + STEREOTYPE_HEIGHT
    } else {
        HEADER_HEIGHT
    }
}

/// Height of the member rows below a title bar; an empty body still leaves a small strip.
pub fn member_block_height(rows: usize, separator: bool) -> f64 {
    let sep = if separator { SEPARATOR_HEIGHT } else { 0.0 };
    rows as f64 * MEMBER_ROW_HEIGHT + sep + BODY_PADDING
}

/// Index of the first non-key attribute when the entity has both key and non-key attributes.
pub fn entity_separator_index(node: &EntityNode) -> Option<usize> {
    let first_plain = node.attributes.iter().position(|a| !a.primary_key)?;
    (first_plain > 0).then_some(first_plain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::DeterministicTextMeasurer;
    use pumldraw_core::models::{ClassKind, ClassMember, EntityAttribute, Visibility};

    fn member(name: &str, is_method: bool) -> ClassMember {
        ClassMember {
            visibility: Visibility::Public,
            name: name.to_string(),
            type_name: String::new(),
            is_method,
            is_static: false,
            is_abstract: false,
        }
    }

    #[test]
    fn class_height_counts_rows_and_separator() {
        let m = DeterministicTextMeasurer::default();
        let sizer = Sizer::new(&m, 13.0);
        let mut node = ClassNode::new("A", ClassKind::Class);
        node.attributes.push(member("a", false));
        node.methods.push(member("b()", true));
        let (w, h) = sizer.class(&node);
        assert_eq!(w, 160.0);
        assert_eq!(h, HEADER_HEIGHT + 2.0 * MEMBER_ROW_HEIGHT + SEPARATOR_HEIGHT + BODY_PADDING);
    }

    #[test]
    fn interfaces_get_a_stereotype_line() {
        let node = ClassNode::new("I", ClassKind::Interface);
        assert_eq!(class_header_height(&node), HEADER_HEIGHT + STEREOTYPE_HEIGHT);
    }

    #[test]
    fn long_action_labels_widen_the_box() {
        let m = DeterministicTextMeasurer::default();
        let sizer = Sizer::new(&m, 10.0);
        let node = ActivityNode {
            name: "a0".to_string(),
            node_type: ActivityNodeType::Action,
            label: "x".repeat(40),
            yes_branch: None,
            branch_label: None,
            related_decision: None,
            looping: false,
            lane: None,
            partition: None,
            note: None,
        };
        let (w, h) = sizer.activity(&node);
        assert_eq!(w, 40.0 * 6.0 + 20.0);
        assert_eq!(h, 40.0);
    }

    #[test]
    fn entity_separator_only_between_key_and_plain_attributes() {
        let attr = |name: &str, pk: bool| EntityAttribute {
            name: name.to_string(),
            type_name: String::new(),
            primary_key: pk,
            foreign_key: false,
            mandatory: false,
        };
        let mut node = EntityNode::new("E");
        node.attributes = vec![attr("id", true), attr("name", false)];
        assert_eq!(entity_separator_index(&node), Some(1));
        node.attributes = vec![attr("name", false)];
        assert_eq!(entity_separator_index(&node), None);
    }
}
