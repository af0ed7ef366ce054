use crate::diagram::Diagnostics;
use crate::models::{
    DiagramModel, Relation, RelationKind, UseCaseDiagram, UseCaseNode, UseCaseNodeKind,
};
use crate::preprocess::SourceLine;
use crate::utils::{
    Arrow, parse_alias, parse_arrow, parse_grid_note, rename_colliding_notes, strip_color,
    take_stereotype, unescape_newlines, unquote,
};
use crate::Result;

#[derive(Debug, Default)]
struct UseCaseDb {
    diagram: UseCaseDiagram,
    /// Open `rectangle`/`package` boundaries, innermost last.
    boundaries: Vec<String>,
}

impl UseCaseDb {
    fn declare(&mut self, name: &str, label: String, kind: UseCaseNodeKind) {
        let boundary = self.boundaries.last().cloned();
        let node = self
            .diagram
            .nodes
            .get_or_insert_with(name, || UseCaseNode::new(name, kind));
        node.kind = kind;
        node.label = label;
        if node.boundary.is_none() {
            node.boundary = boundary;
        }
    }

    /// Resolves a relation endpoint, creating it on first reference. `(Label)` and `:Label:` also
    /// match a node declared with that label under an alias. Bare names default to actors; use
    /// cases are always written in parentheses.
    fn ensure(&mut self, token: &str) -> String {
        let (name, kind) = endpoint(token);
        if let Some(aliased) = self
            .diagram
            .nodes
            .iter()
            .find(|n| n.kind == kind && n.label == name && n.name != name)
        {
            return aliased.name.clone();
        }
        if !self.diagram.nodes.contains(&name) {
            self.declare(&name, unescape_newlines(&name), kind);
        }
        name
    }
}

fn endpoint(token: &str) -> (String, UseCaseNodeKind) {
    if let Some(inner) = token.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        return (inner.trim().to_string(), UseCaseNodeKind::UseCase);
    }
    if let Some(inner) = token.strip_prefix(':').and_then(|t| t.strip_suffix(':')) {
        return (inner.trim().to_string(), UseCaseNodeKind::Actor);
    }
    (unquote(token).to_string(), UseCaseNodeKind::Actor)
}

pub fn parse_usecase(lines: &[SourceLine], diagnostics: &mut Diagnostics) -> Result<DiagramModel> {
    let mut db = UseCaseDb::default();
    let mut idx = 0;

    while idx < lines.len() {
        let text = lines[idx].as_str();
        idx += 1;

        if text == "}" {
            db.boundaries.pop();
            continue;
        }

        if let Some(next) = parse_grid_note(lines, idx - 1, &mut db.diagram.notes) {
            idx = next;
            continue;
        }

        if let Some(caps) = regex!(r"^(?:rectangle|package|frame)\s+(.+?)\s*\{$").captures(text) {
            let (decl, _) = take_stereotype(&caps[1]);
            let (_, label) = parse_alias(strip_color(&decl));
            db.boundaries.push(label);
            continue;
        }

        if let Some(arrow) = parse_arrow(text) {
            add_relation(&mut db, arrow);
            continue;
        }

        if let Some((name, label, kind)) = parse_declaration(text) {
            db.declare(&name, label, kind);
            continue;
        }

        diagnostics.skip(&lines[idx - 1], "unrecognized use case diagram line");
    }

    let targets: Vec<String> = db
        .diagram
        .notes
        .iter()
        .filter_map(|n| n.target.clone())
        .collect();
    for target in targets {
        db.ensure(&target);
    }

    rename_colliding_notes(&mut db.diagram.notes, |name| db.diagram.nodes.contains(name));
    Ok(DiagramModel::Usecase(db.diagram))
}

fn parse_declaration(text: &str) -> Option<(String, String, UseCaseNodeKind)> {
    let (text, _) = take_stereotype(text);
    let text = strip_color(&text);

    let (kind, rest) = if let Some(rest) = text.strip_prefix("actor ") {
        (UseCaseNodeKind::Actor, rest.trim())
    } else if let Some(rest) = text.strip_prefix("usecase ") {
        (UseCaseNodeKind::UseCase, rest.trim())
    } else if text.starts_with('(') {
        (UseCaseNodeKind::UseCase, text)
    } else if regex!(r"^:[^:]+:").is_match(text) {
        (UseCaseNodeKind::Actor, text)
    } else {
        return None;
    };

    // `(Label) as X`, `:Label: as X` and the bare bracketed forms.
    if let Some(caps) = regex!(r"^(\([^)]+\)|:[^:]+:)(?:\s+as\s+(.+))?$").captures(rest) {
        let (label, _) = endpoint(&caps[1]);
        let name = caps
            .get(2)
            .map(|m| unquote(m.as_str()).to_string())
            .unwrap_or_else(|| label.clone());
        return Some((name, unescape_newlines(&label), kind));
    }
    if let Some(caps) = regex!(r"^(.+?)\s+as\s+(\([^)]+\)|:[^:]+:)$").captures(rest) {
        let (label, _) = endpoint(&caps[2]);
        return Some((unquote(&caps[1]).to_string(), unescape_newlines(&label), kind));
    }

    let (name, label) = parse_alias(rest);
    (!name.is_empty()).then_some((name, label, kind))
}

fn add_relation(db: &mut UseCaseDb, arrow: Arrow<'_>) {
    let left = db.ensure(arrow.left);
    let right = db.ensure(arrow.right);

    let stereotype = arrow
        .label
        .as_deref()
        .and_then(|l| regex!(r"<<\s*(include|extend)s?\s*>>").captures(l))
        .map(|caps| caps[1].to_string());
    let (kind, label) = match stereotype.as_deref() {
        Some("include") => (RelationKind::Include, None),
        Some(_) => (RelationKind::Extend, None),
        None if arrow.left_head == "<|" || arrow.right_head == "|>" => {
            (RelationKind::Extends, arrow.label)
        }
        None => (RelationKind::Association, arrow.label),
    };

    let reversed = matches!(arrow.left_head, "<|" | "<");
    let (from, to) = if reversed { (right, left) } else { (left, right) };
    db.diagram.relations.push(Relation::new(from, to, kind).with_label(label));
}
