use serde::{Deserialize, Serialize};

/// A trimmed, non-empty input line with its 1-based position in the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLine {
    pub line: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Default)]
pub struct PreprocessResult {
    pub lines: Vec<SourceLine>,
    pub title: Option<String>,
    /// `@startmindmap` was present.
    pub mindmap_marker: bool,
}

impl PreprocessResult {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

const DROPPED_PREFIXES: &[&str] = &[
    "skinparam",
    "hide ",
    "show ",
    "!",
    "scale ",
    "autonumber",
    "left to right direction",
    "top to bottom direction",
    "header ",
    "footer ",
    "caption ",
];

/// Filters raw markup into the line list every parser consumes: comments, blank lines, document
/// markers and presentation directives are removed, `title` is captured.
pub fn preprocess_diagram(input: &str) -> PreprocessResult {
    let mut out = PreprocessResult::default();
    let mut in_block_comment = false;
    let mut skinparam_depth = 0usize;

    for (idx, raw) in input.split('\n').enumerate() {
        let line_no = idx + 1;
        let mut text = raw.strip_suffix('\r').unwrap_or(raw).trim().to_string();

        if in_block_comment {
            match text.find("'/") {
                Some(end) => {
                    in_block_comment = false;
                    text = text[end + 2..].trim().to_string();
                }
                None => continue,
            }
        }
        if let Some(start) = text.find("/'") {
            let before = text[..start].trim().to_string();
            match text[start + 2..].find("'/") {
                Some(rel_end) => {
                    let after = text[start + 2 + rel_end + 2..].trim();
                    text = format!("{before} {after}").trim().to_string();
                }
                None => {
                    in_block_comment = true;
                    text = before;
                }
            }
        }

        if text.is_empty() || text.starts_with('\'') {
            continue;
        }

        if skinparam_depth > 0 {
            skinparam_depth += text.matches('{').count();
            skinparam_depth = skinparam_depth.saturating_sub(text.matches('}').count());
            continue;
        }

        let lower = text.to_ascii_lowercase();
        if lower.starts_with("@start") || lower.starts_with("@end") {
            if lower.starts_with("@startmindmap") {
                out.mindmap_marker = true;
            }
            continue;
        }
        if lower.starts_with("skinparam") && text.ends_with('{') {
            skinparam_depth = 1;
            continue;
        }
        if DROPPED_PREFIXES.iter().any(|p| lower.starts_with(p)) {
            continue;
        }
        if let Some(rest) = strip_keyword(&text, "title") {
            out.title = Some(rest.to_string());
            continue;
        }

        out.lines.push(SourceLine::new(line_no, text));
    }

    out
}

fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() {
        return None;
    }
    rest.starts_with(char::is_whitespace).then(|| rest.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(r: &PreprocessResult) -> Vec<&str> {
        r.lines.iter().map(SourceLine::as_str).collect()
    }

    #[test]
    fn drops_markers_comments_and_directives() {
        let r = preprocess_diagram(
            "@startuml\r\n' a comment\n\nskinparam monochrome true\nclass A\n  hide empty members\n@enduml\n",
        );
        assert_eq!(texts(&r), vec!["class A"]);
        assert_eq!(r.lines[0].line, 5);
        assert!(!r.mindmap_marker);
    }

    #[test]
    fn block_comments_span_lines() {
        let r = preprocess_diagram("class A /' inline '/\n/' start\nstill comment\nend '/ class B\nclass C");
        assert_eq!(texts(&r), vec!["class A", "class B", "class C"]);
    }

    #[test]
    fn skinparam_blocks_are_skipped() {
        let r = preprocess_diagram("skinparam class {\n  BackgroundColor red\n}\nclass A");
        assert_eq!(texts(&r), vec!["class A"]);
    }

    #[test]
    fn captures_title_and_mindmap_marker() {
        let r = preprocess_diagram("@startmindmap\ntitle My Map\n* root\n@endmindmap");
        assert_eq!(r.title.as_deref(), Some("My Map"));
        assert!(r.mindmap_marker);
        assert_eq!(texts(&r), vec!["* root"]);
    }
}
