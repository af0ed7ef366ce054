use crate::config::LayoutConfig;
use crate::model::{Layout, NodeBox};
use crate::shapes::Sizer;
use pumldraw_core::models::{MindmapDiagram, MindmapSide};

/// Root at the origin; each side is a column stack per level, filled in document order with its
/// own vertical cursor, then centred on the root.
pub(super) fn layout_mindmap(d: &MindmapDiagram, config: &LayoutConfig, sizer: &Sizer<'_>) -> Layout {
    let mut layout = Layout::default();
    let Some(root) = d.root() else {
        return layout;
    };
    let (w, h) = sizer.mindmap(root, true);
    layout.insert(&root.name, NodeBox::new(0.0, 0.0, w, h));

    for (side, direction) in [(MindmapSide::Right, 1.0), (MindmapSide::Left, -1.0)] {
        let mut placed: Vec<(&str, NodeBox)> = Vec::new();
        let mut cursor = 0.0;
        for node in d.nodes.iter() {
            if node.name == root.name {
                continue;
            }
            let node_side = match node.side {
                MindmapSide::Center => MindmapSide::Right,
                other => other,
            };
            if node_side != side {
                continue;
            }
            let (w, h) = sizer.mindmap(node, false);
            let depth = node.level.saturating_sub(root.level) as f64;
            let x = direction * depth * config.mindmap_level_distance;
            placed.push((node.name.as_str(), NodeBox::new(x, cursor + h / 2.0, w, h)));
            cursor += h + config.mindmap_row_gap;
        }
        let column_height = (cursor - config.mindmap_row_gap).max(0.0);
        for (name, mut node) in placed {
            node.y -= column_height / 2.0;
            layout.insert(name, node);
        }
    }
    layout
}
