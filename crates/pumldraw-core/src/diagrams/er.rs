use crate::diagram::Diagnostics;
use crate::models::{Cardinality, DiagramModel, EntityAttribute, EntityNode, ErDiagram, ErRelationship};
use crate::preprocess::SourceLine;
use crate::utils::{parse_alias, split_label, strip_color, take_stereotype, unquote};
use crate::Result;

pub fn parse_er(lines: &[SourceLine], diagnostics: &mut Diagnostics) -> Result<DiagramModel> {
    let mut db = ErDiagram::default();
    let mut idx = 0;

    while idx < lines.len() {
        let text = lines[idx].as_str();

        if let Some(rest) = text.strip_prefix("entity ") {
            idx = parse_entity(lines, idx, rest, &mut db);
            continue;
        }

        if let Some(relationship) = parse_relationship(text) {
            for name in [&relationship.from, &relationship.to] {
                db.entities.get_or_insert_with(name, || EntityNode::new(name));
            }
            db.relationships.push(relationship);
            idx += 1;
            continue;
        }

        diagnostics.skip(&lines[idx], "unrecognized entity-relationship line");
        idx += 1;
    }

    Ok(DiagramModel::Er(db))
}

fn parse_entity(lines: &[SourceLine], idx: usize, rest: &str, db: &mut ErDiagram) -> usize {
    let mut decl = rest.trim();
    let mut body: Vec<&str> = Vec::new();
    let mut next = idx + 1;

    if let Some(open) = decl.find('{') {
        let inline = &decl[open + 1..];
        decl = decl[..open].trim();
        match inline.rfind('}') {
            Some(close) => body.extend(inline[..close].split(';')),
            None => {
                while next < lines.len() {
                    let line = lines[next].as_str();
                    next += 1;
                    if line.starts_with('}') {
                        break;
                    }
                    body.push(line);
                }
            }
        }
    }

    let (decl, _) = take_stereotype(decl);
    let (name, label) = parse_alias(strip_color(&decl));
    if name.is_empty() {
        return next;
    }

    let separator = body.iter().position(|l| is_key_separator(l));
    let attributes = body
        .iter()
        .enumerate()
        .filter(|(pos, line)| !line.trim().is_empty() && Some(*pos) != separator)
        .filter_map(|(pos, line)| parse_attribute(line, separator.is_some_and(|sep| pos < sep)));

    let entity = db.entities.get_or_insert_with(&name, || EntityNode::new(&name));
    entity.label = label;
    entity.attributes.extend(attributes);
    next
}

fn is_key_separator(line: &str) -> bool {
    regex!(r"^(?:-{2,}|={2,}|\.{2,}|_{2,})$").is_match(line.trim())
}

fn parse_attribute(line: &str, above_separator: bool) -> Option<EntityAttribute> {
    let (text, stereotype) = take_stereotype(line);
    let mut text = text.as_str();
    let mut primary_key = above_separator;
    let mut foreign_key = false;
    match stereotype.as_deref().map(str::to_ascii_uppercase).as_deref() {
        Some("PK") => primary_key = true,
        Some("FK") => foreign_key = true,
        _ => {}
    }
    for (prefix, is_pk) in [("PK ", true), ("FK ", false)] {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest;
            if is_pk {
                primary_key = true;
            } else {
                foreign_key = true;
            }
        }
    }

    let mandatory = text.starts_with('*');
    let text = text.trim_start_matches('*').trim();
    let (name, type_name) = match text.split_once(':') {
        Some((name, ty)) => (name.trim(), ty.trim()),
        None => (text, ""),
    };
    if name.is_empty() {
        return None;
    }
    Some(EntityAttribute {
        name: name.to_string(),
        type_name: type_name.to_string(),
        primary_key,
        foreign_key,
        mandatory,
    })
}

fn parse_relationship(text: &str) -> Option<ErRelationship> {
    let (body, label) = split_label(text);
    let caps = regex!(
        r#"^(?P<a>"[^"]+"|[\w$]+)\s*(?P<l>\|o|\|\||\}o|\}\|)(?P<line>-+|\.+)(?P<r>o\||\|\||o\{|\|\{)\s*(?P<b>"[^"]+"|[\w$]+)$"#
    )
    .captures(body)?;
    Some(ErRelationship {
        from: unquote(&caps["a"]).to_string(),
        to: unquote(&caps["b"]).to_string(),
        from_cardinality: Cardinality::from_left_token(&caps["l"])?,
        to_cardinality: Cardinality::from_right_token(&caps["r"])?,
        identifying: caps["line"].starts_with('-'),
        label,
    })
}
