use crate::models::{DiagramKind, DiagramModel};
use crate::preprocess::SourceLine;
use crate::{Diagnostic, Error, Result};
use rustc_hash::FxHashMap;

pub type DiagramParser =
    fn(lines: &[SourceLine], diagnostics: &mut Diagnostics) -> Result<DiagramModel>;

#[derive(Debug, Clone)]
pub struct DiagramRegistry {
    parsers: FxHashMap<DiagramKind, DiagramParser>,
}

impl DiagramRegistry {
    pub fn new() -> Self {
        Self {
            parsers: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, kind: DiagramKind, parser: DiagramParser) {
        self.parsers.insert(kind, parser);
    }

    pub fn get(&self, kind: DiagramKind) -> Option<DiagramParser> {
        self.parsers.get(&kind).copied()
    }

    pub fn default_plantuml() -> Self {
        let mut reg = Self::new();

        reg.insert(DiagramKind::Class, crate::diagrams::class::parse_class);
        reg.insert(DiagramKind::Sequence, crate::diagrams::sequence::parse_sequence);
        reg.insert(DiagramKind::State, crate::diagrams::state::parse_state);
        reg.insert(DiagramKind::Mindmap, crate::diagrams::mindmap::parse_mindmap);
        reg.insert(DiagramKind::Er, crate::diagrams::er::parse_er);
        reg.insert(DiagramKind::Deployment, crate::diagrams::deployment::parse_deployment);
        reg.insert(DiagramKind::Usecase, crate::diagrams::usecase::parse_usecase);
        reg.insert(DiagramKind::Activity, crate::diagrams::activity::parse_activity);

        reg
    }
}

impl Default for DiagramRegistry {
    fn default() -> Self {
        Self::default_plantuml()
    }
}

pub fn parse_or_unsupported(
    registry: &DiagramRegistry,
    kind: DiagramKind,
    lines: &[SourceLine],
    diagnostics: &mut Diagnostics,
) -> Result<DiagramModel> {
    let Some(parser) = registry.get(kind) else {
        return Err(Error::DiagramParse {
            diagram_type: kind.to_string(),
            message: "no parser registered".to_string(),
        });
    };
    parser(lines, diagnostics)
}

/// Collects skipped lines while a parser runs.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    kind: DiagramKind,
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(kind: DiagramKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub fn skip(&mut self, line: &SourceLine, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::trace!(kind = %self.kind, line = line.line, text = %line.text, %reason, "skipped line");
        self.items.push(Diagnostic {
            line: line.line,
            text: line.text.clone(),
            reason,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
