#![forbid(unsafe_code)]

pub mod config;
pub mod drawio;
pub mod edges;
pub mod layout;
pub mod model;
pub mod shapes;
pub mod svg;
pub mod text;
mod xml;

pub use config::LayoutConfig;
pub use drawio::{XmlMode, compress_diagram, decompress_diagram};
pub use edges::{ResolvedEdge, resolve_edges};
pub use layout::layout_model;
pub use model::{Bounds, GroupBox, LaneBox, Layout, NodeBox, SequenceLayout};

use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use chrono::{DateTime, Utc};
use pumldraw_core::DiagramModel;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no valid elements found")]
    EmptyDiagram,
    #[error("invalid diagram model: {message}")]
    InvalidModel { message: String },
    #[error("diagram compression failed: {0}")]
    Compression(#[from] std::io::Error),
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("compressed payload is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("layout config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub xml_mode: XmlMode,
    /// Pins the `mxfile` `modified` attribute; `None` uses the current time.
    pub modified: Option<DateTime<Utc>>,
    pub diagram_name: String,
    pub layout: LayoutConfig,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            xml_mode: XmlMode::Pretty,
            modified: None,
            diagram_name: "Page-1".to_string(),
            layout: LayoutConfig::default(),
        }
    }
}

impl RenderOptions {
    pub fn compressed() -> Self {
        Self {
            xml_mode: XmlMode::Compressed,
            ..Self::default()
        }
    }
}

/// Both outputs of one conversion plus the summary counts shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDiagram {
    pub xml: String,
    pub preview: String,
    pub element_count: usize,
    pub relation_count: usize,
}

/// Lays out `model` once and renders the draw.io document and the SVG preview from the same
/// coordinate map.
pub fn render_model(model: &DiagramModel, options: &RenderOptions) -> Result<RenderedDiagram> {
    let measurer = DeterministicTextMeasurer::default();
    render_model_with_measurer(model, options, &measurer)
}

pub fn render_model_with_measurer(
    model: &DiagramModel,
    options: &RenderOptions,
    measurer: &dyn TextMeasurer,
) -> Result<RenderedDiagram> {
    if model.is_empty() {
        return Err(Error::EmptyDiagram);
    }

    let layout = layout_model(model, &options.layout, measurer)?;
    let edges = resolve_edges(model, &layout);
    tracing::debug!(
        kind = %model.kind(),
        nodes = layout.nodes.len(),
        edges = edges.len(),
        "laid out diagram"
    );

    let xml = drawio::render_drawio(model, &layout, &edges, options)?;
    let preview = svg::render_svg(model, &layout, &edges, &options.layout)?;

    Ok(RenderedDiagram {
        xml,
        preview,
        element_count: model.node_count(),
        relation_count: model.relations().len(),
    })
}
