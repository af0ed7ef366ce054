use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// A placed node: `x`/`y` are the centre, `width`/`height` the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NodeBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.y - self.height / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.left(),
            min_y: self.top(),
            max_x: self.right(),
            max_y: self.bottom(),
        }
    }

    /// Point where the segment from the centre towards `(tx, ty)` leaves the box.
    pub fn border_point(&self, tx: f64, ty: f64) -> (f64, f64) {
        let dx = tx - self.x;
        let dy = ty - self.y;
        if dx.abs() < f64::EPSILON && dy.abs() < f64::EPSILON {
            return (self.x, self.y);
        }
        let sx = if dx.abs() > f64::EPSILON {
            (self.width / 2.0) / dx.abs()
        } else {
            f64::INFINITY
        };
        let sy = if dy.abs() > f64::EPSILON {
            (self.height / 2.0) / dy.abs()
        } else {
            f64::INFINITY
        };
        let s = sx.min(sy).min(1.0);
        (self.x + dx * s, self.y + dy * s)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

/// An activity swimlane column; `x`/`y` are the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneBox {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A titled frame drawn behind its members (activity partitions, use case boundaries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBox {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl GroupBox {
    pub fn around(name: impl Into<String>, content: Bounds, padding: f64, title_height: f64) -> Self {
        Self {
            name: name.into(),
            x: content.min_x - padding,
            y: content.min_y - padding - title_height,
            width: content.width() + padding * 2.0,
            height: content.height() + padding * 2.0 + title_height,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.x,
            min_y: self.y,
            max_x: self.x + self.width,
            max_y: self.y + self.height,
        }
    }
}

/// Vertical geometry of a sequence diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceLayout {
    /// Top edge of the participant headers.
    pub top: f64,
    pub header_height: f64,
    /// Centre line of each step, indexed like the model's steps.
    pub rows: Vec<f64>,
    /// Where every lifeline ends.
    pub lifeline_end: f64,
    /// Horizontal extent of the participant columns.
    pub left: f64,
    pub right: f64,
}

impl SequenceLayout {
    /// Fraction of the lifeline cell height at which row `y` sits.
    pub fn lifeline_fraction(&self, y: f64) -> f64 {
        let height = self.lifeline_end - self.top;
        if height <= 0.0 {
            return 0.0;
        }
        ((y - self.top) / height).clamp(0.0, 1.0)
    }
}

/// The coordinate map shared by both renderers. Built once by [`crate::layout_model`] and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Node identity -> box, in placement order. Notes use their note identity.
    pub nodes: IndexMap<String, NodeBox>,
    pub lanes: Vec<LaneBox>,
    pub groups: Vec<GroupBox>,
    pub sequence: Option<SequenceLayout>,
    pub bounds: Bounds,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            nodes: IndexMap::new(),
            lanes: Vec::new(),
            groups: Vec::new(),
            sequence: None,
            bounds: Bounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 0.0,
                max_y: 0.0,
            },
        }
    }
}

impl Layout {
    pub fn insert(&mut self, name: impl Into<String>, node: NodeBox) {
        self.nodes.insert(name.into(), node);
    }

    pub fn get(&self, name: &str) -> Option<&NodeBox> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Like [`Layout::get`], for lookups that cannot fail on a consistent layout.
    pub fn require(&self, name: &str) -> Result<&NodeBox> {
        self.nodes.get(name).ok_or_else(|| Error::InvalidModel {
            message: format!("node {name} has no coordinates"),
        })
    }

    fn content_bounds(&self) -> Option<Bounds> {
        let boxes = self.nodes.values().map(NodeBox::bounds);
        let lanes = self.lanes.iter().map(|l| Bounds {
            min_x: l.x,
            min_y: l.y,
            max_x: l.x + l.width,
            max_y: l.y + l.height,
        });
        let groups = self.groups.iter().map(GroupBox::bounds);
        let lifelines = self.sequence.iter().map(|s| Bounds {
            min_x: s.left,
            min_y: s.top,
            max_x: s.right,
            max_y: s.lifeline_end,
        });
        boxes
            .chain(lanes)
            .chain(groups)
            .chain(lifelines)
            .reduce(Bounds::union)
    }

    /// Shifts everything so the content starts at `margin` and records the final canvas
    /// bounds (origin at zero, `margin` on every side).
    pub(crate) fn finish(&mut self, margin: f64) {
        let Some(content) = self.content_bounds() else {
            return;
        };
        let dx = margin - content.min_x;
        let dy = margin - content.min_y;
        if dx.abs() > f64::EPSILON || dy.abs() > f64::EPSILON {
            for node in self.nodes.values_mut() {
                node.translate(dx, dy);
            }
            for lane in &mut self.lanes {
                lane.x += dx;
                lane.y += dy;
            }
            for group in &mut self.groups {
                group.x += dx;
                group.y += dy;
            }
            if let Some(seq) = &mut self.sequence {
                seq.top += dy;
                seq.lifeline_end += dy;
                seq.left += dx;
                seq.right += dx;
                for row in &mut seq.rows {
                    *row += dy;
                }
            }
        }
        self.bounds = Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: content.width() + margin * 2.0,
            max_y: content.height() + margin * 2.0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_point_clips_to_the_box_edge() {
        let b = NodeBox::new(0.0, 0.0, 100.0, 40.0);
        assert_eq!(b.border_point(200.0, 0.0), (50.0, 0.0));
        assert_eq!(b.border_point(0.0, -100.0), (0.0, -20.0));
        assert_eq!(b.border_point(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn finish_moves_content_to_the_margin() {
        let mut layout = Layout::default();
        layout.insert("a", NodeBox::new(-50.0, -10.0, 20.0, 20.0));
        layout.insert("b", NodeBox::new(50.0, 30.0, 20.0, 20.0));
        layout.finish(10.0);
        let a = layout.get("a").unwrap();
        assert_eq!((a.left(), a.top()), (10.0, 10.0));
        assert_eq!(layout.bounds.max_x, 120.0 + 20.0);
        assert_eq!(layout.bounds.max_y, 60.0 + 20.0);
    }

    #[test]
    fn require_reports_missing_nodes() {
        let layout = Layout::default();
        assert!(matches!(layout.require("x"), Err(Error::InvalidModel { .. })));
    }
}
