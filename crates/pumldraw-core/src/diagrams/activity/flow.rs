use crate::models::{ActivityNode, ActivityNodeType, Relation, RelationKind};
use crate::{Error, Result};
use rustc_hash::{FxHashMap, FxHashSet};

/// Index of the frozen node sequence used by the edge pass.
struct FlowIndex<'a> {
    nodes: &'a [ActivityNode],
    /// Opener (decision/fork) name -> index of its merge/join.
    closing: FxHashMap<&'a str, usize>,
    /// Opener name -> indices of its `else`/`elseif`/`fork again` markers, in order.
    markers: FxHashMap<&'a str, Vec<usize>>,
}

impl<'a> FlowIndex<'a> {
    fn new(nodes: &'a [ActivityNode]) -> Self {
        let mut closing = FxHashMap::default();
        let mut markers: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
        for (idx, node) in nodes.iter().enumerate() {
            let Some(opener) = node.related_decision.as_deref() else {
                continue;
            };
            match node.node_type {
                ActivityNodeType::Merge | ActivityNodeType::Join => {
                    closing.insert(opener, idx);
                }
                t if t.is_marker() => markers.entry(opener).or_default().push(idx),
                _ => {}
            }
        }
        Self {
            nodes,
            closing,
            markers,
        }
    }

    fn closing_of(&self, opener: &str) -> Result<usize> {
        self.closing.get(opener).copied().ok_or_else(|| Error::DiagramParse {
            diagram_type: "activity".to_string(),
            message: format!("node {opener} has no closing merge or join"),
        })
    }

    /// The node control reaches after `idx`. A marker in that position means the current branch
    /// is over, so control continues at the closing node of the marker's frame.
    fn successor(&self, idx: usize) -> Result<Option<usize>> {
        let Some(next) = self.nodes.get(idx + 1) else {
            return Ok(None);
        };
        if !next.is_marker() {
            return Ok(Some(idx + 1));
        }
        let opener = next.related_decision.as_deref().ok_or_else(|| Error::DiagramParse {
            diagram_type: "activity".to_string(),
            message: format!("marker {} is not bound to a decision", next.name),
        })?;
        self.closing_of(opener).map(Some)
    }

    fn markers_of(&self, opener: &str) -> &[usize] {
        self.markers.get(opener).map(Vec::as_slice).unwrap_or_default()
    }
}

#[derive(Default)]
struct EdgeSink {
    edges: Vec<Relation>,
    seen: FxHashSet<(usize, usize)>,
}

impl EdgeSink {
    fn connect(&mut self, nodes: &[ActivityNode], from: usize, to: Option<usize>, label: Option<String>) {
        let Some(to) = to else {
            return;
        };
        if self.seen.insert((from, to)) {
            self.edges.push(
                Relation::new(&nodes[from].name, &nodes[to].name, RelationKind::Transition)
                    .with_label(label),
            );
        }
    }
}

/// Derives control-flow edges from the node sequence.
///
/// End nodes have no outgoing edges and markers never appear as endpoints. A `(from, to)` pair
/// is emitted at most once; the first label wins.
pub fn build_edges(nodes: &[ActivityNode]) -> Result<Vec<Relation>> {
    let index = FlowIndex::new(nodes);
    let mut sink = EdgeSink::default();

    for (idx, node) in nodes.iter().enumerate() {
        match node.node_type {
            ActivityNodeType::End
            | ActivityNodeType::ElseMarker
            | ActivityNodeType::ElseifMarker
            | ActivityNodeType::ForkAgainMarker => {}

            ActivityNodeType::Start | ActivityNodeType::Action | ActivityNodeType::Join => {
                sink.connect(nodes, idx, index.successor(idx)?, None);
            }

            ActivityNodeType::Merge if node.looping => {
                let decision = node.related_decision.as_deref().unwrap_or_default();
                let Some(decision_idx) = nodes.iter().position(|n| n.name == decision) else {
                    return Err(Error::DiagramParse {
                        diagram_type: "activity".to_string(),
                        message: format!("loop merge {} has no decision", node.name),
                    });
                };
                sink.connect(nodes, idx, Some(decision_idx), None);
            }

            ActivityNodeType::Merge => {
                sink.connect(nodes, idx, index.successor(idx)?, None);
            }

            ActivityNodeType::Decision if node.looping => {
                sink.connect(nodes, idx, index.successor(idx)?, node.yes_branch.clone());
                let merge = index.closing_of(&node.name)?;
                sink.connect(
                    nodes,
                    idx,
                    index.successor(merge)?,
                    nodes[merge].branch_label.clone(),
                );
            }

            ActivityNodeType::Decision => {
                sink.connect(nodes, idx, index.successor(idx)?, node.yes_branch.clone());
                let mut has_else = false;
                for &marker in index.markers_of(&node.name) {
                    let m = &nodes[marker];
                    has_else |= m.node_type == ActivityNodeType::ElseMarker;
                    let label = m.branch_label.clone().or_else(|| {
                        (m.node_type == ActivityNodeType::ElseifMarker && !m.label.is_empty())
                            .then(|| m.label.clone())
                    });
                    sink.connect(nodes, idx, index.successor(marker)?, label);
                }
                if !has_else {
                    sink.connect(nodes, idx, Some(index.closing_of(&node.name)?), None);
                }
            }

            ActivityNodeType::Fork => {
                sink.connect(nodes, idx, index.successor(idx)?, None);
                for &marker in index.markers_of(&node.name) {
                    sink.connect(nodes, idx, index.successor(marker)?, None);
                }
            }
        }
    }

    Ok(sink.edges)
}
