//! Deterministic placement. Every diagram kind uses exactly one rule; the result is the
//! coordinate map both renderers read.

mod activity;
mod grid;
mod mindmap;
mod sequence;

use crate::config::LayoutConfig;
use crate::model::Layout;
use crate::shapes::Sizer;
use crate::text::TextMeasurer;
use crate::Result;
use pumldraw_core::DiagramModel;

pub use activity::note_id as activity_note_id;
pub use sequence::note_id as sequence_note_id;

pub fn layout_model(
    model: &DiagramModel,
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
) -> Result<Layout> {
    let sizer = Sizer::new(measurer, config.font_size);
    let mut layout = match model {
        DiagramModel::Class(d) => grid::layout_class(d, config, &sizer),
        DiagramModel::Er(d) => grid::layout_er(d, config, &sizer),
        DiagramModel::State(d) => grid::layout_state(d, config, &sizer),
        DiagramModel::Deployment(d) => grid::layout_deployment(d, config, &sizer),
        DiagramModel::Usecase(d) => grid::layout_usecase(d, config, &sizer),
        DiagramModel::Sequence(d) => sequence::layout_sequence(d, config, &sizer),
        DiagramModel::Mindmap(d) => mindmap::layout_mindmap(d, config, &sizer),
        DiagramModel::Activity(d) => activity::layout_activity(d, config, &sizer),
    };
    layout.finish(config.margin);
    Ok(layout)
}
