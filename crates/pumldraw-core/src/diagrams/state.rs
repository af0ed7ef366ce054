use crate::diagram::Diagnostics;
use crate::models::{DiagramModel, Relation, RelationKind, StateDiagram, StateKind, StateNode};
use crate::preprocess::SourceLine;
use crate::utils::{
    parse_alias, parse_arrow, parse_grid_note, rename_colliding_notes, split_label, strip_color,
    take_stereotype, unescape_newlines, unquote,
};
use crate::Result;

#[derive(Debug, Default)]
struct StateDb {
    diagram: StateDiagram,
    /// Open composite states, innermost last.
    scopes: Vec<String>,
}

impl StateDb {
    fn scope(&self) -> Option<&str> {
        self.scopes.last().map(String::as_str)
    }

    /// Gets or creates `name` in the current scope; new children of a composite gain a
    /// containment relation from their parent.
    fn ensure(&mut self, name: &str, kind: StateKind) -> &mut StateNode {
        if !self.diagram.states.contains(name) {
            let parent = self.scope().filter(|p| *p != name).map(str::to_string);
            let mut node = StateNode::new(name, kind);
            if matches!(kind, StateKind::Initial | StateKind::Final) {
                node.label = String::new();
            }
            if let Some(parent) = &parent {
                self.diagram
                    .relations
                    .push(Relation::new(parent, name, RelationKind::Containment));
            }
            node.parent = parent;
            self.diagram.states.declare(node);
        }
        self.diagram
            .states
            .get_or_insert_with(name, || StateNode::new(name, kind))
    }

    /// `[*]` is the initial pseudo-state as a source and the final one as a target, scoped to the
    /// enclosing composite.
    fn resolve_endpoint(&mut self, token: &str, is_source: bool) -> String {
        if token.ends_with("[*]") {
            let scope = match token.strip_suffix("[*]").filter(|s| !s.is_empty()) {
                Some(explicit) => explicit.to_string(),
                None => self.scope().unwrap_or_default().to_string(),
            };
            let (name, kind) = if is_source {
                (format!("{scope}[*]"), StateKind::Initial)
            } else {
                (format!("{scope}[*]end"), StateKind::Final)
            };
            self.ensure(&name, kind);
            return name;
        }
        let name = unquote(token).to_string();
        self.ensure(&name, StateKind::Normal);
        name
    }
}

pub fn parse_state(lines: &[SourceLine], diagnostics: &mut Diagnostics) -> Result<DiagramModel> {
    let mut db = StateDb::default();
    let mut idx = 0;

    while idx < lines.len() {
        let text = lines[idx].as_str();

        if text == "}" {
            db.scopes.pop();
            idx += 1;
            continue;
        }
        if text == "--" || text == "||" {
            idx += 1;
            continue;
        }

        if let Some(next) = parse_grid_note(lines, idx, &mut db.diagram.notes) {
            idx = next;
            continue;
        }

        if let Some(rest) = text.strip_prefix("state ") {
            parse_state_declaration(&mut db, rest);
            idx += 1;
            continue;
        }

        if let Some(arrow) = parse_arrow(text) {
            let reversed = arrow.left_head == "<";
            let (source, target) = if reversed {
                (arrow.right, arrow.left)
            } else {
                (arrow.left, arrow.right)
            };
            let from = db.resolve_endpoint(source, true);
            let to = db.resolve_endpoint(target, false);
            db.diagram
                .relations
                .push(Relation::new(from, to, RelationKind::Transition).with_label(arrow.label));
            idx += 1;
            continue;
        }

        if let Some(caps) = regex!(r#"^("[^"]+"|[\w.$]+)\s*:\s*(.*)$"#).captures(text) {
            let name = unquote(&caps[1]).to_string();
            let description = unescape_newlines(caps[2].trim());
            let node = db.ensure(&name, StateKind::Normal);
            if !description.is_empty() {
                node.descriptions.push(description);
            }
            idx += 1;
            continue;
        }

        diagnostics.skip(&lines[idx], "unrecognized state diagram line");
        idx += 1;
    }

    let targets: Vec<String> = db
        .diagram
        .notes
        .iter()
        .filter_map(|n| n.target.clone())
        .collect();
    for target in targets {
        db.ensure(&target, StateKind::Normal);
    }

    rename_colliding_notes(&mut db.diagram.notes, |name| db.diagram.states.contains(name));
    Ok(DiagramModel::State(db.diagram))
}

fn parse_state_declaration(db: &mut StateDb, rest: &str) {
    let mut decl = rest.trim();
    let opens = decl.ends_with('{');
    if opens {
        decl = decl.trim_end_matches('{').trim_end();
    }

    let (decl, description) = split_label(decl);
    let (decl, stereotype) = take_stereotype(decl);
    let (name, label) = parse_alias(strip_color(&decl));
    if name.is_empty() {
        return;
    }

    let kind = match (&stereotype, opens) {
        (Some(st), _) => StateKind::from_stereotype(st).unwrap_or(StateKind::Normal),
        (None, true) => StateKind::Composite,
        (None, false) => StateKind::Normal,
    };
    let node = db.ensure(&name, kind);
    if kind != StateKind::Normal {
        node.kind = kind;
    }
    if label != name {
        node.label = label;
    }
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        node.descriptions.push(description);
    }

    if opens {
        db.scopes.push(name);
    }
}
