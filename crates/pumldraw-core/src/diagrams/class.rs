use crate::diagram::Diagnostics;
use crate::models::{
    ClassDiagram, ClassKind, ClassMember, ClassNode, DiagramModel, Relation, RelationKind,
    Visibility,
};
use crate::preprocess::SourceLine;
use crate::utils::{
    Arrow, parse_alias, parse_arrow, parse_grid_note, rename_colliding_notes, strip_color,
    take_stereotype, unquote,
};
use crate::Result;

pub fn parse_class(lines: &[SourceLine], diagnostics: &mut Diagnostics) -> Result<DiagramModel> {
    let mut db = ClassDiagram::default();
    let mut idx = 0;

    while idx < lines.len() {
        let text = lines[idx].as_str();

        if let Some(next) = parse_grid_note(lines, idx, &mut db.notes) {
            idx = next;
            continue;
        }

        if let Some(caps) =
            regex!(r"^(abstract\s+class|abstract|class|interface|enum|annotation)\s+(.+)$").captures(text)
        {
            let kind = match &caps[1] {
                k if k.starts_with("abstract") => ClassKind::Abstract,
                k => ClassKind::from_keyword(k).unwrap_or_default(),
            };
            idx = parse_declaration(lines, idx, kind, &caps[2], &mut db);
            continue;
        }

        if regex!(r"^(?:package|namespace|together)\b.*\{$").is_match(text) || text == "}" {
            tracing::trace!(line = lines[idx].line, "ignoring grouping line");
            idx += 1;
            continue;
        }

        if let Some(arrow) = parse_arrow(text) {
            add_relation(&mut db, arrow);
            idx += 1;
            continue;
        }

        // `Name : member` adds a member outside a body.
        if let Some(caps) = regex!(r"^([\w$]+)\s*:\s*(.+)$").captures(text) {
            let class = db
                .classes
                .get_or_insert_with(&caps[1], || ClassNode::new(&caps[1], ClassKind::Class));
            if let Some(member) = parse_member(&caps[2]) {
                push_member(class, member);
            }
            idx += 1;
            continue;
        }

        diagnostics.skip(&lines[idx], "unrecognized class diagram line");
        idx += 1;
    }

    attach_notes(&mut db);
    rename_colliding_notes(&mut db.notes, |name| db.classes.contains(name));
    Ok(DiagramModel::Class(db))
}

/// Parses a declaration (and its body, if any); returns the index of the next unconsumed line.
fn parse_declaration(
    lines: &[SourceLine],
    idx: usize,
    kind: ClassKind,
    rest: &str,
    db: &mut ClassDiagram,
) -> usize {
    let mut decl = rest.trim();
    let mut inline_body = None;
    let mut opens_body = false;
    if let Some(open) = decl.find('{') {
        let after = &decl[open + 1..];
        match after.rfind('}') {
            Some(close) => inline_body = Some(&after[..close]),
            None => opens_body = true,
        }
        decl = decl[..open].trim();
    }

    let (decl, stereotype) = take_stereotype(decl);
    let (decl, parents) = split_inheritance(&decl);
    let (decl, generic) = match regex!(r"^(.*?)\s*<([^<>]+)>$").captures(decl) {
        Some(caps) => (caps.get(1).map_or("", |m| m.as_str()), Some(caps[2].trim().to_string())),
        None => (decl, None),
    };
    let (name, label) = parse_alias(strip_color(decl));
    if name.is_empty() {
        return idx + 1;
    }

    let class = db
        .classes
        .get_or_insert_with(&name, || ClassNode::new(&name, kind));
    class.kind = kind;
    class.label = label;
    if generic.is_some() {
        class.generic = generic;
    }
    if stereotype.is_some() {
        class.stereotype = stereotype;
    }

    if let Some(body) = inline_body {
        for member in body.split(';').filter_map(parse_member) {
            push_member(class, member);
        }
    }

    let mut next = idx + 1;
    if opens_body {
        while next < lines.len() {
            let line = lines[next].as_str();
            next += 1;
            if line.starts_with('}') {
                break;
            }
            if is_separator(line) {
                continue;
            }
            if let Some(member) = parse_member(line) {
                push_member(class, member);
            }
        }
    }

    for (parent, relation_kind) in parents {
        db.classes.get_or_insert_with(&parent, || {
            let parent_kind = if relation_kind == RelationKind::Implements {
                ClassKind::Interface
            } else {
                ClassKind::Class
            };
            ClassNode::new(&parent, parent_kind)
        });
        db.relations.push(Relation::new(&name, parent, relation_kind));
    }

    next
}

/// `Child extends Base implements A, B` -> (`Child`, [(Base, extends), (A, implements), ...]).
fn split_inheritance(decl: &str) -> (&str, Vec<(String, RelationKind)>) {
    let keywords: Vec<_> = regex!(r"\s(extends|implements)\s").find_iter(decl).collect();
    let Some(first) = keywords.first() else {
        return (decl, Vec::new());
    };

    let mut parents = Vec::new();
    for (pos, keyword) in keywords.iter().enumerate() {
        let end = keywords.get(pos + 1).map_or(decl.len(), |next| next.start());
        let kind = if keyword.as_str().trim() == "implements" {
            RelationKind::Implements
        } else {
            RelationKind::Extends
        };
        for parent in decl[keyword.end()..end].split(',').map(str::trim) {
            if !parent.is_empty() {
                parents.push((parent.to_string(), kind));
            }
        }
    }
    (decl[..first.start()].trim(), parents)
}

fn is_separator(line: &str) -> bool {
    regex!(r"^(?:-{2,}|\.{2,}|={2,}|_{2,})").is_match(line)
}

fn push_member(class: &mut ClassNode, member: ClassMember) {
    if member.is_method {
        class.methods.push(member);
    } else {
        class.attributes.push(member);
    }
}

fn parse_member(raw: &str) -> Option<ClassMember> {
    let mut content = raw.trim().trim_end_matches(',').trim().to_string();
    let mut take = |modifier: &str| {
        let found = content.contains(modifier);
        if found {
            content = content.replace(modifier, "").trim().to_string();
        }
        found
    };
    let is_static = take("{static}") | take("{classifier}");
    let is_abstract = take("{abstract}");
    let forced_method = if take("{method}") {
        Some(true)
    } else if take("{field}") {
        Some(false)
    } else {
        None
    };

    let mut chars = content.chars();
    let visibility = match chars.next().and_then(Visibility::from_symbol) {
        Some(v) => {
            content = chars.as_str().trim().to_string();
            v
        }
        None => Visibility::Public,
    };
    if content.is_empty() {
        return None;
    }

    let is_method = forced_method.unwrap_or_else(|| content.contains('('));
    let (name, type_name) = if is_method {
        match content.rfind(')') {
            Some(close) => {
                let tail = content[close + 1..].trim();
                let type_name = tail.strip_prefix(':').unwrap_or(tail).trim();
                (content[..=close].trim().to_string(), type_name.to_string())
            }
            None => (content.clone(), String::new()),
        }
    } else {
        match content.split_once(':') {
            Some((name, ty)) => (name.trim().to_string(), ty.trim().to_string()),
            None => (content.clone(), String::new()),
        }
    };

    Some(ClassMember {
        visibility,
        name,
        type_name,
        is_method,
        is_static,
        is_abstract,
    })
}

fn add_relation(db: &mut ClassDiagram, arrow: Arrow<'_>) {
    let left = unquote(arrow.left).to_string();
    let right = unquote(arrow.right).to_string();

    // A relation touching a note alias anchors the note instead of creating a class. A declared
    // class of the same name takes precedence.
    for (note_side, other) in [(&left, &right), (&right, &left)] {
        if db.classes.contains(note_side) {
            continue;
        }
        if let Some(note) = db.notes.iter_mut().find(|n| &n.name == note_side) {
            note.target = Some(other.clone());
            ensure_class(db, other);
            return;
        }
    }

    let (kind, reversed) = classify(&arrow);
    let (from, to, from_label, to_label) = if reversed {
        (right, left, arrow.right_mult, arrow.left_mult)
    } else {
        (left, right, arrow.left_mult, arrow.right_mult)
    };
    ensure_class(db, &from);
    ensure_class(db, &to);

    let mut relation = Relation::new(from, to, kind).with_label(arrow.label);
    relation.from_label = from_label.map(str::to_string).filter(|s| !s.is_empty());
    relation.to_label = to_label.map(str::to_string).filter(|s| !s.is_empty());
    db.relations.push(relation);
}

/// Relation kind plus whether `from`/`to` are the right and left endpoints respectively.
///
/// Inheritance points from child to parent; composition and aggregation point from the whole
/// (diamond end) to the part; plain arrows point along the arrow head.
fn classify(arrow: &Arrow<'_>) -> (RelationKind, bool) {
    let dotted = arrow.dotted;
    let inherit = if dotted {
        RelationKind::Implements
    } else {
        RelationKind::Extends
    };
    let plain = if dotted {
        RelationKind::Dependency
    } else {
        RelationKind::Association
    };
    match (arrow.left_head, arrow.right_head) {
        ("<|", _) => (inherit, true),
        (_, "|>") => (inherit, false),
        ("*", _) => (RelationKind::Composition, false),
        (_, "*") => (RelationKind::Composition, true),
        ("o", _) => (RelationKind::Aggregation, false),
        (_, "o") => (RelationKind::Aggregation, true),
        ("<", _) => (plain, true),
        _ => (plain, false),
    }
}

fn ensure_class(db: &mut ClassDiagram, name: &str) {
    db.classes
        .get_or_insert_with(name, || ClassNode::new(name, ClassKind::Class));
}

/// Notes anchored to an undeclared name still get a node so the note edge resolves.
fn attach_notes(db: &mut ClassDiagram) {
    let targets: Vec<String> = db.notes.iter().filter_map(|n| n.target.clone()).collect();
    for target in targets {
        ensure_class(db, &target);
    }
}
