//! SVG preview drawn from the same coordinate map as the draw.io output.

mod nodes;

use crate::config::LayoutConfig;
use crate::edges::ResolvedEdge;
use crate::model::{Layout, NodeBox};
use crate::xml::{escape_xml, fmt};
use crate::Result;
use pumldraw_core::models::MessageKind;
use pumldraw_core::{DiagramModel, RelationKind};
use std::fmt::Write as _;

const EDGE_STROKE: &str = "#666";
const BACK_EDGE_OFFSET: f64 = 24.0;
const SELF_MESSAGE_WIDTH: f64 = 40.0;
const SELF_MESSAGE_DROP: f64 = 20.0;

const DEFS: &str = r##"<defs><marker id="arrow" markerWidth="10" markerHeight="10" refX="9" refY="3" orient="auto" markerUnits="strokeWidth"><path d="M0,0 L0,6 L9,3 z" fill="#666"/></marker><marker id="open-arrow" markerWidth="10" markerHeight="10" refX="9" refY="4" orient="auto" markerUnits="strokeWidth"><path d="M0,0 L9,4 L0,8" fill="none" stroke="#666"/></marker><marker id="triangle" markerWidth="14" markerHeight="14" refX="13" refY="7" orient="auto" markerUnits="userSpaceOnUse"><path d="M1,1 L1,13 L13,7 z" fill="white" stroke="#666"/></marker><marker id="diamond" markerWidth="18" markerHeight="10" refX="1" refY="5" orient="auto" markerUnits="userSpaceOnUse"><path d="M1,5 L9,1 L17,5 L9,9 z" fill="white" stroke="#666"/></marker><marker id="diamond-filled" markerWidth="18" markerHeight="10" refX="1" refY="5" orient="auto" markerUnits="userSpaceOnUse"><path d="M1,5 L9,1 L17,5 L9,9 z" fill="#666" stroke="#666"/></marker></defs>"##;

/// Text lines drawn as `tspan`s, vertically centred on `cy`.
pub(crate) fn text_block(
    out: &mut String,
    x: f64,
    cy: f64,
    text: &str,
    anchor: &str,
    line_height: f64,
    extra: &str,
) {
    let lines: Vec<&str> = text.split('\n').collect();
    let first = cy - (lines.len() as f64 - 1.0) * line_height / 2.0;
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" text-anchor="{anchor}" dominant-baseline="central"{extra}>"#,
        fmt(x),
        fmt(first),
    );
    for (i, line) in lines.iter().enumerate() {
        let _ = write!(
            out,
            r#"<tspan x="{}" y="{}">{}</tspan>"#,
            fmt(x),
            fmt(first + i as f64 * line_height),
            escape_xml(line),
        );
    }
    out.push_str("</text>");
}

pub fn render_svg(
    model: &DiagramModel,
    layout: &Layout,
    edges: &[ResolvedEdge],
    config: &LayoutConfig,
) -> Result<String> {
    let width = layout.bounds.width().max(1.0);
    let height = layout.bounds.height().max(1.0);
    let line_height = config.font_size * 1.2;

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="Arial, Helvetica, sans-serif" font-size="{fs}">"#,
        w = fmt(width),
        h = fmt(height),
        fs = fmt(config.font_size),
    );
    if let Some(title) = model.title() {
        let _ = write!(out, "<title>{}</title>", escape_xml(title));
    }
    out.push_str(DEFS);
    out.push_str(r#"<rect x="0" y="0" width="100%" height="100%" fill="white"/>"#);

    for group in &layout.groups {
        let _ = write!(
            out,
            r##"<g class="group"><rect x="{}" y="{}" width="{}" height="{}" rx="6" fill="none" stroke="#999" stroke-dasharray="6 3"/>"##,
            fmt(group.x),
            fmt(group.y),
            fmt(group.width),
            fmt(group.height),
        );
        text_block(
            &mut out,
            group.x + 8.0,
            group.y + 12.0,
            &group.name,
            "start",
            line_height,
            r#" font-weight="bold""#,
        );
        out.push_str("</g>");
    }
    for lane in &layout.lanes {
        let _ = write!(
            out,
            r##"<g class="lane"><rect x="{}" y="{}" width="{}" height="{}" fill="#fafafa" stroke="#999"/><line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#999"/>"##,
            fmt(lane.x),
            fmt(lane.y),
            fmt(lane.width),
            fmt(lane.height),
            fmt(lane.x),
            fmt(lane.y + config.lane_header_height),
            fmt(lane.x + lane.width),
            fmt(lane.y + config.lane_header_height),
        );
        text_block(
            &mut out,
            lane.x + lane.width / 2.0,
            lane.y + config.lane_header_height / 2.0,
            &lane.name,
            "middle",
            line_height,
            r#" font-weight="bold""#,
        );
        out.push_str("</g>");
    }

    nodes::write_backdrop(&mut out, model, layout, line_height);
    for edge in edges {
        write_edge(&mut out, layout, edge, line_height)?;
    }
    nodes::write_nodes(&mut out, model, layout, line_height)?;

    out.push_str("</svg>");
    Ok(out)
}

fn marker_attrs(edge: &ResolvedEdge) -> &'static str {
    if edge.message.is_some_and(|m| m.kind != MessageKind::Sync) {
        return r#" marker-end="url(#open-arrow)""#;
    }
    match edge.kind {
        RelationKind::Extends | RelationKind::Implements => r#" marker-end="url(#triangle)""#,
        RelationKind::Composition => r#" marker-start="url(#diamond-filled)""#,
        RelationKind::Aggregation => r#" marker-start="url(#diamond)""#,
        RelationKind::Relationship | RelationKind::Note | RelationKind::Containment => "",
        _ => r#" marker-end="url(#arrow)""#,
    }
}

fn stroke_attrs(edge: &ResolvedEdge) -> String {
    let dash = if edge.dashed {
        r#" stroke-dasharray="5 4""#
    } else {
        ""
    };
    format!(r#" fill="none" stroke="{EDGE_STROKE}" stroke-width="1.5"{dash}{}"#, marker_attrs(edge))
}

fn label_at(out: &mut String, x: f64, y: f64, text: &str, line_height: f64) {
    text_block(out, x, y, text, "middle", line_height, r##" fill="#333""##);
}

fn write_edge(out: &mut String, layout: &Layout, edge: &ResolvedEdge, line_height: f64) -> Result<()> {
    let from = layout.require(&edge.from)?;
    let to = layout.require(&edge.to)?;
    let attrs = stroke_attrs(edge);
    out.push_str(r#"<g class="edge">"#);

    if let Some(message) = edge.message {
        let y = message.y;
        if edge.is_self_loop() {
            let x2 = from.x + SELF_MESSAGE_WIDTH;
            let _ = write!(
                out,
                r#"<polyline points="{},{} {},{} {},{} {},{}"{attrs}/>"#,
                fmt(from.x),
                fmt(y),
                fmt(x2),
                fmt(y),
                fmt(x2),
                fmt(y + SELF_MESSAGE_DROP),
                fmt(from.x),
                fmt(y + SELF_MESSAGE_DROP),
            );
            if let Some(label) = &edge.label {
                text_block(out, x2 + 6.0, y, label, "start", line_height, r##" fill="#333""##);
            }
        } else {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{attrs}/>"#,
                fmt(from.x),
                fmt(y),
                fmt(to.x),
                fmt(y),
            );
            if let Some(label) = &edge.label {
                label_at(out, (from.x + to.x) / 2.0, y - line_height * 0.75, label, line_height);
            }
        }
        out.push_str("</g>");
        return Ok(());
    }

    if edge.back_edge {
        let x = from.right().max(to.right()) + BACK_EDGE_OFFSET;
        let _ = write!(
            out,
            r#"<polyline points="{},{} {},{} {},{} {},{}"{attrs}/>"#,
            fmt(from.right()),
            fmt(from.y),
            fmt(x),
            fmt(from.y),
            fmt(x),
            fmt(to.y),
            fmt(to.right()),
            fmt(to.y),
        );
        if let Some(label) = &edge.label {
            text_block(out, x + 6.0, (from.y + to.y) / 2.0, label, "start", line_height, r##" fill="#333""##);
        }
        out.push_str("</g>");
        return Ok(());
    }

    let (x1, y1, x2, y2) = clipped(from, to);
    let _ = write!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{attrs}/>"#,
        fmt(x1),
        fmt(y1),
        fmt(x2),
        fmt(y2),
    );
    if let Some(label) = &edge.label {
        label_at(out, (x1 + x2) / 2.0, (y1 + y2) / 2.0 - line_height * 0.6, label, line_height);
    }
    if let Some(text) = &edge.from_label {
        label_at(out, x1 + (x2 - x1) * 0.15, y1 + (y2 - y1) * 0.15 - 8.0, text, line_height);
    }
    if let Some(text) = &edge.to_label {
        label_at(out, x2 - (x2 - x1) * 0.15, y2 - (y2 - y1) * 0.15 - 8.0, text, line_height);
    }
    out.push_str("</g>");
    Ok(())
}

/// Segment between the two box borders along the centre line.
fn clipped(from: &NodeBox, to: &NodeBox) -> (f64, f64, f64, f64) {
    let (x1, y1) = from.border_point(to.x, to.y);
    let (x2, y2) = to.border_point(from.x, from.y);
    (x1, y1, x2, y2)
}
