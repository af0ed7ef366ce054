use crate::diagram::Diagnostics;
use crate::models::{DiagramModel, MindmapDiagram, MindmapNode, MindmapSide, Relation, RelationKind};
use crate::preprocess::SourceLine;
use crate::Result;

#[derive(Debug, Default)]
struct MindmapDb {
    diagram: MindmapDiagram,
    /// `(level, name, side)` of the current ancestor chain.
    ancestors: Vec<(usize, String, MindmapSide)>,
    /// Level-2 `*` nodes seen so far; drives right/left alternation.
    balanced: usize,
}

impl MindmapDb {
    fn add_node(&mut self, marker: char, level: usize, label: String, boxless: bool) -> bool {
        while self
            .ancestors
            .last()
            .is_some_and(|(l, _, _)| *l >= level)
        {
            self.ancestors.pop();
        }
        let parent = self.ancestors.last().cloned();
        if parent.is_none() && self.diagram.root().is_some() {
            return false;
        }

        let side = match (&parent, marker) {
            (None, _) => MindmapSide::Center,
            (Some(_), '+') => MindmapSide::Right,
            (Some(_), '-') => MindmapSide::Left,
            (Some((_, _, MindmapSide::Center)), _) => {
                let side = if self.balanced % 2 == 0 {
                    MindmapSide::Right
                } else {
                    MindmapSide::Left
                };
                self.balanced += 1;
                side
            }
            (Some((_, _, parent_side)), _) => *parent_side,
        };

        let name = format!("n{}", self.diagram.nodes.len());
        let parent_name = parent.map(|(_, name, _)| name);
        if let Some(parent_name) = &parent_name {
            self.diagram
                .relations
                .push(Relation::new(parent_name, &name, RelationKind::Containment));
        }
        self.diagram.nodes.declare(MindmapNode {
            name: name.clone(),
            label,
            level,
            side,
            parent: parent_name,
            boxless,
        });
        self.ancestors.push((level, name, side));
        true
    }
}

pub fn parse_mindmap(lines: &[SourceLine], diagnostics: &mut Diagnostics) -> Result<DiagramModel> {
    let mut db = MindmapDb::default();
    let mut idx = 0;

    while idx < lines.len() {
        let line = &lines[idx];
        idx += 1;

        let Some(caps) =
            regex!(r"^([*]+|[+]+|-+)(_)?\s*(?:\[#[^\]]*\])?\s*(.*)$").captures(line.as_str())
        else {
            diagnostics.skip(line, "unrecognized mind map line");
            continue;
        };

        let markers = &caps[1];
        let marker = markers.chars().next().unwrap_or('*');
        let level = markers.chars().count();
        let boxless = caps.get(2).is_some();
        let mut text = caps[3].trim().to_string();

        if let Some(first) = text.strip_prefix(':') {
            let mut parts = vec![first.to_string()];
            if !first.ends_with(';') {
                while idx < lines.len() {
                    let continuation = lines[idx].as_str();
                    idx += 1;
                    parts.push(continuation.to_string());
                    if continuation.ends_with(';') {
                        break;
                    }
                }
            }
            if let Some(last) = parts.last_mut() {
                if let Some(stripped) = last.strip_suffix(';') {
                    *last = stripped.to_string();
                }
            }
            text = parts.join("\n");
        }

        if text.is_empty() {
            diagnostics.skip(line, "mind map node without text");
            continue;
        }
        if !db.add_node(marker, level, text, boxless) {
            diagnostics.skip(line, "second mind map root");
        }
    }

    Ok(DiagramModel::Mindmap(db.diagram))
}
