//! Activity diagrams: a single token pass builds the node sequence with an explicit stack of open
//! `if`/`while`/`fork` frames, then [`flow::build_edges`] derives the control-flow edges from the
//! frozen node list.

mod flow;
mod parse;

pub use flow::build_edges;

use crate::diagram::Diagnostics;
use crate::models::DiagramModel;
use crate::preprocess::SourceLine;
use crate::Result;

pub fn parse_activity(lines: &[SourceLine], diagnostics: &mut Diagnostics) -> Result<DiagramModel> {
    let mut diagram = parse::ActivityBuilder::new().run(lines, diagnostics);
    diagram.edges = build_edges(&diagram.nodes)?;
    tracing::debug!(
        nodes = diagram.nodes.len(),
        edges = diagram.edges.len(),
        lanes = diagram.swimlanes.len(),
        partitions = diagram.partitions.len(),
        "reconstructed activity flow"
    );
    Ok(DiagramModel::Activity(diagram))
}
