use crate::models::DiagramKind;
use crate::preprocess::PreprocessResult;

pub type DetectorFn = fn(input: &PreprocessResult) -> bool;

#[derive(Debug, Clone)]
pub struct Detector {
    pub kind: DiagramKind,
    pub detector: DetectorFn,
}

/// Ordered heuristic classifier. Rules run top to bottom and the first match wins, so the
/// registration order encodes priority when signals overlap.
#[derive(Debug, Clone)]
pub struct DetectorRegistry {
    detectors: Vec<Detector>,
    fallback: DiagramKind,
}

impl DetectorRegistry {
    pub fn new(fallback: DiagramKind) -> Self {
        Self {
            detectors: Vec::new(),
            fallback,
        }
    }

    pub fn add(&mut self, detector: Detector) {
        self.detectors.push(detector);
    }

    pub fn add_fn(&mut self, kind: DiagramKind, detector: DetectorFn) {
        self.add(Detector { kind, detector });
    }

    /// Always returns a kind; ambiguous input falls through to the registry's fallback.
    pub fn detect_kind(&self, input: &PreprocessResult) -> DiagramKind {
        self.detectors
            .iter()
            .find(|det| (det.detector)(input))
            .map(|det| det.kind)
            .unwrap_or(self.fallback)
    }

    pub fn default_plantuml() -> Self {
        let mut reg = Self::new(DiagramKind::Class);

        // The detector order is significant: message syntax outranks `actor`, so an input with
        // both is a sequence diagram rather than a use-case diagram.
        reg.add_fn(DiagramKind::Sequence, detector_sequence_messages);
        reg.add_fn(DiagramKind::Sequence, detector_sequence_participants);
        reg.add_fn(DiagramKind::Activity, detector_activity);
        reg.add_fn(DiagramKind::State, detector_state);
        reg.add_fn(DiagramKind::Mindmap, detector_mindmap);
        reg.add_fn(DiagramKind::Er, detector_er);
        reg.add_fn(DiagramKind::Usecase, detector_usecase);
        reg.add_fn(DiagramKind::Deployment, detector_deployment);

        reg
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::default_plantuml()
    }
}

fn lines(input: &PreprocessResult) -> impl Iterator<Item = &str> {
    input.lines.iter().map(|l| l.as_str())
}

fn starts_with_keyword(line: &str, keyword: &str) -> bool {
    line.strip_prefix(keyword)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

fn has_keyword_line(input: &PreprocessResult, keywords: &[&str]) -> bool {
    lines(input).any(|l| keywords.iter().any(|k| starts_with_keyword(l, k)))
}

fn is_message_line(line: &str) -> bool {
    regex!(r"^[\w.]+\s*(?:->>?|-->>?|<-|<--)\s*[\w.]+\s*:").is_match(line)
}

fn is_arrow_line(line: &str) -> bool {
    regex!(r"[-.]+>|<[-.]+").is_match(line)
}

/// Declarations that never appear in a sequence diagram. `database` and `queue` are shared with
/// sequence participants and absent. `entity` is a participant keyword too, so only its
/// attribute-block form counts.
fn has_structural_declarations(input: &PreprocessResult) -> bool {
    has_keyword_line(
        input,
        &[
            "class", "interface", "abstract", "enum", "state", "usecase", "node", "cloud",
            "artifact", "component", "storage", "folder", "frame", "file", "rectangle", "package",
        ],
    ) || lines(input).any(|l| {
        l.contains("[*]")
            || l.starts_with('[')
            || is_entity_block(l)
            || has_crows_foot(l)
            || has_usecase_syntax(l)
    })
}

fn is_entity_block(line: &str) -> bool {
    regex!(r"^entity\s+[^{]*\{").is_match(line)
}

fn has_crows_foot(line: &str) -> bool {
    regex!(r"(?:\|o|\|\||\}o|\}\|)(?:--|\.\.)|(?:--|\.\.)(?:o\||\|\||o\{|\|\{)").is_match(line)
}

fn has_usecase_syntax(line: &str) -> bool {
    starts_with_keyword(line, "usecase") || regex!(r"(?:^|[\s>-])\([^()]+\)(?:\s|$|[-.<])").is_match(line)
}

fn detector_sequence_messages(input: &PreprocessResult) -> bool {
    lines(input).any(is_message_line) && !has_structural_declarations(input)
}

fn detector_sequence_participants(input: &PreprocessResult) -> bool {
    let has_arrows = lines(input).any(is_arrow_line);
    if !has_arrows {
        return false;
    }
    if has_keyword_line(
        input,
        &["participant", "boundary", "control", "collections"],
    ) {
        return true;
    }
    has_keyword_line(input, &["actor"])
        && !lines(input).any(has_usecase_syntax)
        && !lines(input).any(|l| regex!(r":[^:]+:").is_match(l) && !is_message_line(l))
}

fn detector_activity(input: &PreprocessResult) -> bool {
    let has_terminal = lines(input).any(|l| matches!(l, "start" | "stop" | "end"));
    let has_flow = lines(input).any(|l| {
        (l.starts_with(':') && !l.ends_with(':'))
            || l.starts_with("if (")
            || l.starts_with("if(")
            || l.starts_with("while (")
            || l.starts_with("while(")
    });
    has_terminal && has_flow
}

fn detector_state(input: &PreprocessResult) -> bool {
    let has_transition = lines(input).any(|l| regex!(r"-+(?:\w+-+)?>").is_match(l));
    let has_state = lines(input).any(|l| l.contains("[*]") || starts_with_keyword(l, "state"));
    has_state && (has_transition || has_keyword_line(input, &["state"]))
}

fn detector_mindmap(input: &PreprocessResult) -> bool {
    if input.mindmap_marker {
        return true;
    }
    let mut it = lines(input).peekable();
    it.peek().is_some() && it.all(|l| regex!(r"^[*+-]+_?(?:\[#?\w+\])?[\s:]").is_match(l))
}

fn detector_er(input: &PreprocessResult) -> bool {
    has_keyword_line(input, &["entity"]) || lines(input).any(has_crows_foot)
}

fn detector_usecase(input: &PreprocessResult) -> bool {
    has_keyword_line(input, &["actor", "usecase"])
        || lines(input).any(has_usecase_syntax)
        || lines(input).any(|l| regex!(r"^:[^:]+:").is_match(l))
}

/// Archetypes that mark a deployment diagram. `interface`, `package` and `rectangle` also appear in
/// class and use-case diagrams, so they are parsed but not used as signals.
const DEPLOYMENT_SIGNALS: &[&str] = &[
    "node", "database", "cloud", "artifact", "component", "storage", "folder", "frame", "file",
    "queue",
];

fn detector_deployment(input: &PreprocessResult) -> bool {
    has_keyword_line(input, DEPLOYMENT_SIGNALS)
        || lines(input).any(|l| regex!(r"^\[[^\]]+\]").is_match(l))
}
