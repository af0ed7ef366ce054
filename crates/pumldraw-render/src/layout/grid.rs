use crate::config::LayoutConfig;
use crate::model::{Bounds, GroupBox, Layout, NodeBox};
use crate::shapes::Sizer;
use pumldraw_core::models::{
    ClassDiagram, DeploymentDiagram, ErDiagram, Note, StateDiagram, UseCaseDiagram,
};

const BOUNDARY_PADDING: f64 = 16.0;
const BOUNDARY_TITLE: f64 = 20.0;

#[derive(Debug, Clone)]
struct GridItem {
    name: String,
    width: f64,
    height: f64,
    /// Start a new row before this item (unless already at the start of one).
    row_break: bool,
}

impl GridItem {
    fn new(name: &str, (width, height): (f64, f64)) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            row_break: false,
        }
    }
}

/// Left-to-right rows of `config.grid_columns` cells. The column pitch is the widest box plus
/// the horizontal gap; each row is as tall as its tallest box.
fn place(items: &[GridItem], config: &LayoutConfig) -> Layout {
    let mut layout = Layout::default();
    let widest = items.iter().map(|i| i.width).fold(0.0, f64::max);
    let pitch = widest + config.horizontal_gap;
    let columns = config.columns();

    let mut col = 0usize;
    let mut top = config.margin;
    let mut row_height = 0.0f64;
    for item in items {
        if col == columns || (item.row_break && col > 0) {
            top += row_height + config.vertical_gap;
            row_height = 0.0;
            col = 0;
        }
        let x = config.margin + col as f64 * pitch + widest / 2.0;
        let y = top + item.height / 2.0;
        layout.insert(&item.name, NodeBox::new(x, y, item.width, item.height));
        row_height = row_height.max(item.height);
        col += 1;
    }
    layout
}

fn note_items<'a>(notes: &'a [Note], sizer: &'a Sizer<'_>) -> impl Iterator<Item = GridItem> + 'a {
    notes.iter().map(|n| GridItem::new(&n.name, sizer.note(&n.text)))
}

pub(super) fn layout_class(d: &ClassDiagram, config: &LayoutConfig, sizer: &Sizer<'_>) -> Layout {
    let items: Vec<GridItem> = d
        .classes
        .iter()
        .map(|c| GridItem::new(&c.name, sizer.class(c)))
        .chain(note_items(&d.notes, sizer))
        .collect();
    place(&items, config)
}

pub(super) fn layout_er(d: &ErDiagram, config: &LayoutConfig, sizer: &Sizer<'_>) -> Layout {
    let items: Vec<GridItem> = d
        .entities
        .iter()
        .map(|e| GridItem::new(&e.name, sizer.entity(e)))
        .collect();
    place(&items, config)
}

pub(super) fn layout_state(d: &StateDiagram, config: &LayoutConfig, sizer: &Sizer<'_>) -> Layout {
    let items: Vec<GridItem> = d
        .states
        .iter()
        .map(|s| GridItem::new(&s.name, sizer.state(s)))
        .chain(note_items(&d.notes, sizer))
        .collect();
    place(&items, config)
}

pub(super) fn layout_deployment(
    d: &DeploymentDiagram,
    config: &LayoutConfig,
    sizer: &Sizer<'_>,
) -> Layout {
    let items: Vec<GridItem> = d
        .nodes
        .iter()
        .map(|n| GridItem::new(&n.name, sizer.deployment(n)))
        .chain(note_items(&d.notes, sizer))
        .collect();
    place(&items, config)
}

/// Free actors and use cases come first; each system boundary then starts its own row so its
/// frame encloses only its members.
pub(super) fn layout_usecase(d: &UseCaseDiagram, config: &LayoutConfig, sizer: &Sizer<'_>) -> Layout {
    let mut boundaries: Vec<&str> = Vec::new();
    for node in d.nodes.iter() {
        if let Some(b) = node.boundary.as_deref() {
            if !boundaries.contains(&b) {
                boundaries.push(b);
            }
        }
    }

    let mut items: Vec<GridItem> = d
        .nodes
        .iter()
        .filter(|n| n.boundary.is_none())
        .map(|n| GridItem::new(&n.name, sizer.usecase(n)))
        .collect();
    for boundary in &boundaries {
        let mut first = true;
        for node in d.nodes.iter().filter(|n| n.boundary.as_deref() == Some(*boundary)) {
            let mut item = GridItem::new(&node.name, sizer.usecase(node));
            item.row_break = first;
            first = false;
            items.push(item);
        }
    }
    let mut notes = note_items(&d.notes, sizer);
    if let Some(first) = notes.next() {
        items.push(GridItem {
            row_break: !boundaries.is_empty(),
            ..first
        });
        items.extend(notes);
    }

    // Leave room above each boundary row for the frame title.
    let spaced = LayoutConfig {
        vertical_gap: config.vertical_gap + BOUNDARY_PADDING * 2.0 + BOUNDARY_TITLE,
        ..config.clone()
    };
    let mut layout = place(&items, if boundaries.is_empty() { config } else { &spaced });

    for boundary in boundaries {
        let members = d
            .nodes
            .iter()
            .filter(|n| n.boundary.as_deref() == Some(boundary))
            .filter_map(|n| layout.get(&n.name).map(NodeBox::bounds))
            .reduce(Bounds::union);
        if let Some(content) = members {
            layout
                .groups
                .push(GroupBox::around(boundary, content, BOUNDARY_PADDING, BOUNDARY_TITLE));
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, w: f64, h: f64) -> GridItem {
        GridItem::new(name, (w, h))
    }

    #[test]
    fn rows_wrap_at_the_column_count() {
        let config = LayoutConfig {
            grid_columns: 2,
            ..LayoutConfig::default()
        };
        let items = vec![item("a", 100.0, 50.0), item("b", 100.0, 80.0), item("c", 100.0, 50.0)];
        let layout = place(&items, &config);
        let a = layout.get("a").unwrap();
        let b = layout.get("b").unwrap();
        let c = layout.get("c").unwrap();
        assert_eq!(a.top(), b.top());
        assert_eq!(b.x - a.x, 100.0 + config.horizontal_gap);
        assert_eq!(c.x, a.x);
        assert_eq!(c.top(), a.top() + 80.0 + config.vertical_gap);
    }

    #[test]
    fn row_break_starts_a_new_row() {
        let config = LayoutConfig::default();
        let mut second = item("b", 100.0, 50.0);
        second.row_break = true;
        let layout = place(&[item("a", 100.0, 50.0), second], &config);
        assert_eq!(layout.get("a").unwrap().x, layout.get("b").unwrap().x);
        assert!(layout.get("b").unwrap().top() > layout.get("a").unwrap().bottom());
    }
}
