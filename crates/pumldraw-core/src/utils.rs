//! Line-level helpers shared by the per-kind parsers.

use crate::models::Note;
use crate::preprocess::SourceLine;
use rustc_hash::FxHashSet;

/// Removes one pair of surrounding double quotes.
pub fn unquote(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
}

/// Splits `body : label` at the first colon outside double quotes.
pub fn split_label(line: &str) -> (&str, Option<String>) {
    let mut in_quotes = false;
    for (idx, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => {
                let label = line[idx + 1..].trim();
                let label = (!label.is_empty()).then(|| unescape_newlines(label));
                return (line[..idx].trim(), label);
            }
            _ => {}
        }
    }
    (line.trim(), None)
}

/// Turns the literal `\n` escape into a real line break.
pub fn unescape_newlines(s: &str) -> String {
    s.replace("\\n", "\n")
}

/// Resolves `"Label" as Id`, `Id as "Label"`, `Label as Id`, `"Label"` and `Id` into
/// `(identity, label)`.
pub fn parse_alias(decl: &str) -> (String, String) {
    let decl = decl.trim();
    if let Some(caps) = regex!(r#"^(.+?)\s+as\s+(.+)$"#).captures(decl) {
        let left = caps[1].trim();
        let right = caps[2].trim();
        if right.starts_with('"') {
            return (unquote(left).to_string(), unescape_newlines(unquote(right)));
        }
        return (unquote(right).to_string(), unescape_newlines(unquote(left)));
    }
    let name = unquote(decl);
    (name.to_string(), unescape_newlines(name))
}

/// Splits off a trailing or embedded `<<stereotype>>`.
pub fn take_stereotype(s: &str) -> (String, Option<String>) {
    match regex!(r"<<\s*([^>]+?)\s*>>").captures(s) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
            let mut rest = String::with_capacity(s.len());
            rest.push_str(&s[..whole.start]);
            rest.push_str(&s[whole.end..]);
            (rest.trim().to_string(), Some(caps[1].to_string()))
        }
        None => (s.trim().to_string(), None),
    }
}

/// Drops a `#color` / `#color;line:...` decoration that follows a declaration.
pub fn strip_color(s: &str) -> &str {
    match regex!(r"\s+#[\w;:.#]+\s*$").find(s) {
        Some(m) => s[..m.start()].trim_end(),
        None => s,
    }
}

/// Returns `(body, next_index)` for a block starting after `lines[start]` and ending at the first
/// line accepted by `is_end`. An unterminated block runs to the end of input.
pub fn read_block<'a>(
    lines: &'a [SourceLine],
    start: usize,
    is_end: impl Fn(&str) -> bool,
) -> (Vec<&'a str>, usize) {
    let mut body = Vec::new();
    let mut idx = start + 1;
    while idx < lines.len() {
        let text = lines[idx].as_str();
        if is_end(text) {
            return (body, idx + 1);
        }
        body.push(text);
        idx += 1;
    }
    (body, idx)
}

pub fn is_end_note(line: &str) -> bool {
    matches!(line, "end note" | "endnote")
}

/// Note syntax shared by the grid-laid-out kinds. Returns the index after the consumed lines when
/// `lines[idx]` opens a note.
///
/// - `note "text" as N`
/// - `note left|right|top|bottom [of X] : text`
/// - `note left|right|top|bottom [of X]` ... `end note`
/// - `note as N` ... `end note`
pub fn parse_grid_note(lines: &[SourceLine], idx: usize, notes: &mut Vec<Note>) -> Option<usize> {
    let text = lines[idx].as_str();
    if !text.starts_with("note") {
        return None;
    }

    if let Some(caps) = regex!(r#"^note\s+"([^"]*)"\s+as\s+(\w+)$"#).captures(text) {
        push_note(notes, unescape_newlines(&caps[1]), None, Some(caps[2].to_string()));
        return Some(idx + 1);
    }

    if let Some(caps) = regex!(r"^note\s+as\s+(\w+)$").captures(text) {
        let (body, next) = read_block(lines, idx, is_end_note);
        push_note(notes, body.join("\n"), None, Some(caps[1].to_string()));
        return Some(next);
    }

    let caps = regex!(r#"^note\s+(?:left|right|top|bottom)(?:\s+of\s+("[^"]+"|[\w.]+))?\s*(?::\s*(.*))?$"#)
        .captures(text)?;
    let target = caps.get(1).map(|m| unquote(m.as_str()).to_string());
    match caps.get(2) {
        Some(inline) => {
            push_note(notes, unescape_newlines(inline.as_str().trim()), target, None);
            Some(idx + 1)
        }
        None => {
            let (body, next) = read_block(lines, idx, is_end_note);
            push_note(notes, body.join("\n"), target, None);
            Some(next)
        }
    }
}

fn push_note(notes: &mut Vec<Note>, text: String, target: Option<String>, alias: Option<String>) {
    let name = alias.unwrap_or_else(|| Note::id_for(notes.len()));
    notes.push(Note { name, text, target });
}

/// Gives a generated `note-<n>` id to every note whose alias is already a node name or an earlier
/// note's name. Notes share the coordinate map with nodes, so identities must stay distinct.
pub fn rename_colliding_notes(notes: &mut [Note], is_node: impl Fn(&str) -> bool) {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut counter = notes.len();
    for idx in 0..notes.len() {
        let name = notes[idx].name.clone();
        if !is_node(&name) && !seen.contains(&name) {
            seen.insert(name);
            continue;
        }
        let mut fresh = Note::id_for(idx);
        while is_node(&fresh) || seen.contains(&fresh) || notes.iter().any(|n| n.name == fresh) {
            fresh = Note::id_for(counter);
            counter += 1;
        }
        tracing::warn!(alias = %name, renamed = %fresh, "note alias collides with another element");
        seen.insert(fresh.clone());
        notes[idx].name = fresh;
    }
}

/// A relation line split into endpoints, arrow heads, line style and the trailing `: label`.
///
/// Endpoints are raw tokens (`Name`, `"Quoted"`, `(Use case)`, `:Actor:`, `[Component]`,
/// `[*]`); each parser decides how to resolve them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrow<'a> {
    pub left: &'a str,
    pub right: &'a str,
    pub left_head: &'a str,
    pub right_head: &'a str,
    pub dotted: bool,
    pub left_mult: Option<&'a str>,
    pub right_mult: Option<&'a str>,
    pub label: Option<String>,
}

impl Arrow<'_> {
    pub fn has_heads(&self) -> bool {
        !self.left_head.is_empty() || !self.right_head.is_empty()
    }
}

pub fn parse_arrow(line: &str) -> Option<Arrow<'_>> {
    let caps = regex!(
        r#"^(?P<l>"[^"]+"|\([^)]+\)|:[^:]+:|\[[^\]]+\]|[\w$]+(?:\.[\w$]+)*(?:\[\*\])?)\s*(?:"(?P<lm>[^"]*)"\s*)?(?P<lh><\||\*|o|<|\+)?(?P<line>[-.]+(?:(?:\[[^\]]*\]|left|right|up|down|le|ri|do|l|r|u|d)[-.]+)?)(?P<rh>\|>|\*|o|>|\+)?\s*(?:"(?P<rm>[^"]*)"\s*)?(?P<r>"[^"]+"|\([^)]+\)|:[^:]+:|\[[^\]]+\]|[\w$]+(?:\.[\w$]+)*(?:\[\*\])?)(?:\s*:\s*(?P<label>.*))?$"#
    )
    .captures(line)?;
    let line = caps.name("line")?.as_str();
    Some(Arrow {
        left: caps.name("l")?.as_str(),
        right: caps.name("r")?.as_str(),
        left_head: caps.name("lh").map(|m| m.as_str()).unwrap_or(""),
        right_head: caps.name("rh").map(|m| m.as_str()).unwrap_or(""),
        dotted: line.starts_with('.'),
        left_mult: caps.name("lm").map(|m| m.as_str()),
        right_mult: caps.name("rm").map(|m| m.as_str()),
        label: caps
            .name("label")
            .map(|m| m.as_str().trim())
            .filter(|l| !l.is_empty())
            .map(unescape_newlines),
    })
}
