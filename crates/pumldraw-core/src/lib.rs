#![forbid(unsafe_code)]

//! PlantUML-style markup parser + typed diagram model (headless).
//!
//! Design goals:
//! - one pass per input: preprocess, detect, parse, freeze
//! - permissive by default (unrecognized lines are skipped and reported as diagnostics)
//! - deterministic, testable outputs
//! - runtime-agnostic async APIs (no specific executor required)

#[macro_use]
mod macros;

pub mod detect;
pub mod diagram;
pub mod diagrams;
pub mod error;
pub mod models;
pub mod preprocess;
pub mod utils;

pub use detect::{Detector, DetectorRegistry};
pub use diagram::{DiagramParser, DiagramRegistry, Diagnostics};
pub use error::{Error, Result};
pub use models::{DiagramKind, DiagramModel, Relation, RelationKind};
pub use preprocess::{PreprocessResult, SourceLine, preprocess_diagram};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub strict: bool,
}

impl ParseOptions {
    /// Strict parsing: any skipped line fails the parse with [`Error::Unrecognized`].
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Lenient parsing: skipped lines are only reported in [`ParsedDiagram::diagnostics`].
    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

/// A line the parser for the detected kind could not place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based line number in the original input.
    pub line: usize,
    pub text: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDiagram {
    pub kind: DiagramKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub model: DiagramModel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    registry: DetectorRegistry,
    diagram_registry: DiagramRegistry,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DetectorRegistry {
        &mut self.registry
    }

    pub fn diagram_registry(&self) -> &DiagramRegistry {
        &self.diagram_registry
    }

    pub fn diagram_registry_mut(&mut self) -> &mut DiagramRegistry {
        &mut self.diagram_registry
    }

    /// Classifies `text` without parsing it. Always returns a kind.
    pub fn detect(&self, text: &str) -> DiagramKind {
        let pre = preprocess_diagram(text);
        self.registry.detect_kind(&pre)
    }

    /// Synchronous variant of [`Engine::parse_diagram`].
    ///
    /// Empty input (or input made only of comments and directives) yields an empty model of the
    /// fallback kind; callers decide whether that is an error.
    pub fn parse_diagram_sync(&self, text: &str, options: ParseOptions) -> Result<ParsedDiagram> {
        let pre = preprocess_diagram(text);
        let kind = self.registry.detect_kind(&pre);
        self.parse_preprocessed(kind, pre, options)
    }

    /// Parses `text` as an already-known diagram kind (skips detection).
    pub fn parse_diagram_as_sync(
        &self,
        kind: DiagramKind,
        text: &str,
        options: ParseOptions,
    ) -> Result<ParsedDiagram> {
        self.parse_preprocessed(kind, preprocess_diagram(text), options)
    }

    pub async fn parse_diagram(&self, text: &str, options: ParseOptions) -> Result<ParsedDiagram> {
        self.parse_diagram_sync(text, options)
    }

    pub async fn parse_diagram_as(
        &self,
        kind: DiagramKind,
        text: &str,
        options: ParseOptions,
    ) -> Result<ParsedDiagram> {
        self.parse_diagram_as_sync(kind, text, options)
    }

    fn parse_preprocessed(
        &self,
        kind: DiagramKind,
        pre: PreprocessResult,
        options: ParseOptions,
    ) -> Result<ParsedDiagram> {
        tracing::debug!(kind = %kind, lines = pre.lines.len(), "detected diagram kind");

        let mut diagnostics = Diagnostics::new(kind);
        let mut model = if pre.is_empty() {
            DiagramModel::empty(kind)
        } else {
            diagram::parse_or_unsupported(&self.diagram_registry, kind, &pre.lines, &mut diagnostics)?
        };
        model.set_title(pre.title.clone());

        let diagnostics = diagnostics.into_vec();
        tracing::debug!(
            kind = %kind,
            nodes = model.node_count(),
            relations = model.relations().len(),
            skipped = diagnostics.len(),
            "parsed diagram"
        );

        if options.strict {
            if let Some(first) = diagnostics.first() {
                return Err(Error::Unrecognized {
                    diagram_type: kind.to_string(),
                    count: diagnostics.len(),
                    first: first.clone(),
                });
            }
        }

        Ok(ParsedDiagram {
            kind,
            title: pre.title,
            model,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests;
