use crate::diagram::Diagnostics;
use crate::models::{
    DeploymentDiagram, DeploymentNode, DeviceArchetype, DiagramModel, Relation, RelationKind,
};
use crate::preprocess::SourceLine;
use crate::utils::{
    parse_alias, parse_arrow, parse_grid_note, rename_colliding_notes, strip_color, take_stereotype,
    unquote,
};
use crate::Result;

#[derive(Debug, Default)]
struct DeploymentDb {
    diagram: DeploymentDiagram,
    scopes: Vec<String>,
}

impl DeploymentDb {
    fn declare(&mut self, name: &str, label: String, archetype: DeviceArchetype) {
        if !self.diagram.nodes.contains(name) {
            let parent = self.scopes.last().cloned();
            if let Some(parent) = &parent {
                self.diagram
                    .relations
                    .push(Relation::new(parent, name, RelationKind::Containment));
            }
            let mut node = DeploymentNode::new(name, archetype);
            node.parent = parent;
            self.diagram.nodes.declare(node);
        }
        if let Some(node) = self.diagram.nodes.get_mut(name) {
            node.archetype = archetype;
            node.label = label;
        }
    }

    fn ensure(&mut self, token: &str) -> String {
        let (name, archetype) = match token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            Some(inner) => (inner.trim().to_string(), DeviceArchetype::Component),
            None => (unquote(token).to_string(), DeviceArchetype::Node),
        };
        if !self.diagram.nodes.contains(&name) {
            self.declare(&name, name.clone(), archetype);
        }
        name
    }
}

pub fn parse_deployment(lines: &[SourceLine], diagnostics: &mut Diagnostics) -> Result<DiagramModel> {
    let mut db = DeploymentDb::default();
    let mut idx = 0;

    while idx < lines.len() {
        let text = lines[idx].as_str();

        if text == "}" {
            db.scopes.pop();
            idx += 1;
            continue;
        }

        if let Some(next) = parse_grid_note(lines, idx, &mut db.diagram.notes) {
            idx = next;
            continue;
        }

        if let Some(caps) = regex!(
            r"^(node|database|cloud|artifact|component|storage|folder|frame|file|rectangle|queue|interface|package)\s+(.+)$"
        )
        .captures(text)
        {
            let archetype = DeviceArchetype::from_keyword(&caps[1]).unwrap_or_default();
            declare_line(&mut db, &caps[2], archetype);
            idx += 1;
            continue;
        }

        if let Some(caps) = regex!(r"^\[([^\]]+)\](.*)$").captures(text) {
            if parse_arrow(text).is_none() {
                let rest = caps[2].trim();
                let decl = match rest.strip_prefix("as ") {
                    Some(alias) => format!("\"{}\" as {}", caps[1].trim(), alias.trim()),
                    None => format!("\"{}\" {}", caps[1].trim(), rest),
                };
                declare_line(&mut db, &decl, DeviceArchetype::Component);
                idx += 1;
                continue;
            }
        }

        if let Some(arrow) = parse_arrow(text) {
            let reversed = arrow.left_head == "<";
            let kind = if arrow.dotted {
                RelationKind::Dependency
            } else {
                RelationKind::Association
            };
            let left = db.ensure(arrow.left);
            let right = db.ensure(arrow.right);
            let (from, to) = if reversed { (right, left) } else { (left, right) };
            db.diagram
                .relations
                .push(Relation::new(from, to, kind).with_label(arrow.label));
            idx += 1;
            continue;
        }

        diagnostics.skip(&lines[idx], "unrecognized deployment diagram line");
        idx += 1;
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
    Ok(DiagramModel::Deployment(db.diagram))
}

fn declare_line(db: &mut DeploymentDb, rest: &str, archetype: DeviceArchetype) {
    let mut decl = rest.trim();
    let opens = decl.ends_with('{');
    if opens {
        decl = decl.trim_end_matches('{').trim_end();
    }
    let (decl, _) = take_stereotype(decl);
    let (name, label) = parse_alias(strip_color(&decl));
    if name.is_empty() {
        return;
    }
    db.declare(&name, label, archetype);
    if opens {
        db.scopes.push(name);
    }
}
