#![forbid(unsafe_code)]

//! `pumldraw` converts PlantUML-style diagram text into a draw.io document plus an SVG preview.
//!
//! The two boundary functions are [`parse`] (text to a typed [`DiagramModel`]) and [`render`]
//! (model to both outputs). [`convert`] chains them. Everything is synchronous, CPU-bound and
//! performs no I/O; the async variants exist for callers that want a uniform future-based API.

pub use pumldraw_core::*;

pub use pumldraw_render::{
    LayoutConfig, RenderOptions, RenderedDiagram, XmlMode, compress_diagram, decompress_diagram,
};

/// Lower-level access to layout and the individual renderers.
pub mod render {
    pub use pumldraw_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use pumldraw_render::{
        Bounds, GroupBox, LaneBox, Layout, NodeBox, ResolvedEdge, SequenceLayout, layout_model,
        render_model, render_model_with_measurer, resolve_edges,
    };
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] pumldraw_core::Error),
    #[error(transparent)]
    Render(#[from] pumldraw_render::Error),
    /// Nothing drawable was recognised in the input.
    #[error("no valid elements found")]
    NoValidElements,
}

pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

fn render_error(err: pumldraw_render::Error) -> ConvertError {
    match err {
        pumldraw_render::Error::EmptyDiagram => ConvertError::NoValidElements,
        other => ConvertError::Render(other),
    }
}

/// Parses `text` with the default engine in lenient mode.
pub fn parse(text: &str) -> ConvertResult<DiagramModel> {
    Converter::default().parse_sync(text)
}

/// Renders `model` with default options (pretty XML, current timestamp).
pub fn render(model: &DiagramModel) -> ConvertResult<RenderedDiagram> {
    Converter::default().render_sync(model)
}

pub fn convert(text: &str) -> ConvertResult<RenderedDiagram> {
    Converter::default().convert_sync(text)
}

/// Bundles an [`Engine`] with parse and render options so hosts configure once and call with
/// just the input text.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    pub engine: Engine,
    pub parse: ParseOptions,
    pub render: RenderOptions,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Full parse result including title and line diagnostics.
    pub fn parse_diagram_sync(&self, text: &str) -> ConvertResult<ParsedDiagram> {
        Ok(self.engine.parse_diagram_sync(text, self.parse)?)
    }

    pub fn parse_sync(&self, text: &str) -> ConvertResult<DiagramModel> {
        Ok(self.parse_diagram_sync(text)?.model)
    }

    pub fn render_sync(&self, model: &DiagramModel) -> ConvertResult<RenderedDiagram> {
        pumldraw_render::render_model(model, &self.render).map_err(render_error)
    }

    pub fn convert_sync(&self, text: &str) -> ConvertResult<RenderedDiagram> {
        let parsed = self.parse_diagram_sync(text)?;
        tracing::debug!(
            kind = %parsed.kind,
            diagnostics = parsed.diagnostics.len(),
            "converting diagram"
        );
        self.render_sync(&parsed.model)
    }

    pub async fn parse(&self, text: &str) -> ConvertResult<DiagramModel> {
        self.parse_sync(text)
    }

    pub async fn render(&self, model: &DiagramModel) -> ConvertResult<RenderedDiagram> {
        self.render_sync(model)
    }

    pub async fn convert(&self, text: &str) -> ConvertResult<RenderedDiagram> {
        self.convert_sync(text)
    }
}
