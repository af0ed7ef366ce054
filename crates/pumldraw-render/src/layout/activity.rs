use crate::config::LayoutConfig;
use crate::model::{Bounds, GroupBox, LaneBox, Layout, NodeBox};
use crate::shapes::Sizer;
use pumldraw_core::models::ActivityDiagram;

const PARTITION_PADDING: f64 = 12.0;
const PARTITION_TITLE: f64 = 24.0;

/// Identity of the note attached to activity node `name`.
pub fn note_id(name: &str) -> String {
    format!("{name}-note")
}

/// A single top-to-bottom chain. With swimlanes every node sits on its lane's centre line;
/// without, everything is in lane 0.
pub(super) fn layout_activity(d: &ActivityDiagram, config: &LayoutConfig, sizer: &Sizer<'_>) -> Layout {
    let mut layout = Layout::default();
    let sizes: Vec<(f64, f64)> = d.nodes.iter().map(|n| sizer.activity(n)).collect();
    let widest = d
        .visible_nodes()
        .map(|n| sizer.activity(n).0)
        .fold(0.0, f64::max);
    let column = config.lane_width.max(widest + config.horizontal_gap);
    let lane_of = |lane: Option<&str>| -> usize {
        lane.and_then(|l| d.swimlanes.iter().position(|s| s.name == l))
            .unwrap_or(0)
    };

    let top = config.margin;
    let mut cursor = top;
    if !d.swimlanes.is_empty() {
        cursor += config.lane_header_height;
    }

    for (index, node) in d.nodes.iter().enumerate() {
        let opening = d.partitions.iter().filter(|p| p.start == index).count() as f64;
        cursor += opening * (PARTITION_PADDING + PARTITION_TITLE);

        if !node.is_marker() {
            let (w, h) = sizes[index];
            let x = config.margin + lane_of(node.lane.as_deref()) as f64 * column + column / 2.0;
            let placed = NodeBox::new(x, cursor + h / 2.0, w, h);
            layout.insert(&node.name, placed);

            if let Some(text) = &node.note {
                let (nw, nh) = sizer.note(text);
                let nx = placed.right() + config.note_gap + nw / 2.0;
                layout.insert(note_id(&node.name), NodeBox::new(nx, placed.y, nw, nh));
            }
            cursor += h + config.activity_gap;
        }

        let closing = d.partitions.iter().filter(|p| p.end == index + 1).count() as f64;
        cursor += closing * PARTITION_PADDING;
    }

    if !d.swimlanes.is_empty() {
        let height = cursor - top;
        layout.lanes = d
            .swimlanes
            .iter()
            .enumerate()
            .map(|(i, lane)| LaneBox {
                name: lane.name.clone(),
                x: config.margin + i as f64 * column,
                y: top,
                width: column,
                height,
            })
            .collect();
    }

    for partition in &d.partitions {
        let members = d
            .nodes
            .get(partition.start..partition.end)
            .unwrap_or_default()
            .iter()
            .filter_map(|n| layout.get(&n.name).map(NodeBox::bounds))
            .reduce(Bounds::union);
        if let Some(content) = members {
            layout.groups.push(GroupBox::around(
                &partition.name,
                content,
                PARTITION_PADDING,
                PARTITION_TITLE,
            ));
        }
    }
    layout
}
