//! draw.io (`mxfile`) output, either readable or in the compressed form draw.io itself saves.

mod cells;
mod styles;

use crate::edges::ResolvedEdge;
use crate::model::Layout;
use crate::{RenderOptions, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{SecondsFormat, Utc};
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use pumldraw_core::DiagramModel;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

const HOST: &str = "pumldraw";
const AGENT: &str = concat!("pumldraw/", env!("CARGO_PKG_VERSION"));
const FILE_VERSION: &str = "1.0";
const GRAPH_ATTRS: &str = r#"dx="1200" dy="800" grid="1" gridSize="10" guides="1" tooltips="1" connect="1" arrows="1" fold="1" page="1" pageScale="1" pageWidth="850" pageHeight="1100" math="0" shadow="0""#;

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XmlMode {
    /// Indented, human-readable cells.
    #[default]
    Pretty,
    /// One line; the graph model is deflated and base64-encoded inside `<diagram>`.
    Compressed,
}

pub fn render_drawio(
    model: &DiagramModel,
    layout: &Layout,
    edges: &[ResolvedEdge],
    options: &RenderOptions,
) -> Result<String> {
    let pretty = options.xml_mode == XmlMode::Pretty;
    let mut writer = cells::CellWriter::new(pretty);
    cells::write_model(&mut writer, model, layout, edges)?;
    let body = writer.finish();

    let modified = options
        .modified
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    let name = crate::xml::escape_attr(&options.diagram_name);
    let head = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>{nl}<mxfile host="{HOST}" modified="{modified}" agent="{AGENT}" version="{FILE_VERSION}">"#,
        nl = if pretty { "\n" } else { "" },
    );

    if pretty {
        Ok(format!(
            "{head}\n  <diagram name=\"{name}\" id=\"diagram-1\">\n    <mxGraphModel {GRAPH_ATTRS}>\n      <root>\n        <mxCell id=\"0\"/>\n        <mxCell id=\"1\" parent=\"0\"/>\n{body}      </root>\n    </mxGraphModel>\n  </diagram>\n</mxfile>\n"
        ))
    } else {
        let graph = format!(
            r#"<mxGraphModel {GRAPH_ATTRS}><root><mxCell id="0"/><mxCell id="1" parent="0"/>{body}</root></mxGraphModel>"#
        );
        let payload = compress_diagram(&graph)?;
        Ok(format!(
            r#"{head}<diagram name="{name}" id="diagram-1">{payload}</diagram></mxfile>"#
        ))
    }
}

/// Encodes an `mxGraphModel` document the way draw.io stores it: URI-component escaping, raw
/// deflate, then base64.
pub fn compress_diagram(xml: &str) -> Result<String> {
    let escaped = utf8_percent_encode(xml, URI_COMPONENT).to_string();
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(escaped.as_bytes())?;
    let deflated = encoder.finish()?;
    Ok(STANDARD.encode(deflated))
}

/// Inverse of [`compress_diagram`]. Whitespace inside the payload is ignored.
pub fn decompress_diagram(payload: &str) -> Result<String> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let decoded = STANDARD.decode(compact)?;
    let mut decoder = DeflateDecoder::new(&decoded[..]);
    let mut inflated = Vec::new();
    decoder.read_to_end(&mut inflated)?;
    let inflated = std::str::from_utf8(&inflated)?;
    Ok(percent_decode_str(inflated).decode_utf8()?.into_owned())
}
