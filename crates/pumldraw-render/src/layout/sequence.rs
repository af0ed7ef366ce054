use crate::config::LayoutConfig;
use crate::model::{Layout, NodeBox, SequenceLayout};
use crate::shapes::Sizer;
use pumldraw_core::models::{Note, NotePlacement, SequenceDiagram, SequenceStep};

const NOTE_OFFSET: f64 = 10.0;
const NOTE_ROW_PADDING: f64 = 16.0;

/// Identity of the `index`-th note step (counting notes only).
pub fn note_id(index: usize) -> String {
    Note::id_for(index)
}

pub(super) fn layout_sequence(
    d: &SequenceDiagram,
    config: &LayoutConfig,
    sizer: &Sizer<'_>,
) -> Layout {
    let mut layout = Layout::default();
    let sizes: Vec<(&str, (f64, f64))> = d
        .participants
        .iter()
        .map(|p| (p.name.as_str(), sizer.participant(p, config.sequence_header_height)))
        .collect();
    let widest = sizes.iter().map(|(_, (w, _))| *w).fold(0.0, f64::max);
    let header_height = sizes
        .iter()
        .map(|(_, (_, h))| *h)
        .fold(config.sequence_header_height, f64::max);
    let pitch = (widest + config.horizontal_gap).max(config.sequence_column_width);

    let top = config.margin;
    let header_y = top + header_height / 2.0;
    for (i, (name, (w, _))) in sizes.iter().enumerate() {
        let x = config.margin + i as f64 * pitch + pitch / 2.0;
        layout.insert(*name, NodeBox::new(x, header_y, *w, header_height));
    }

    let row_height = config.sequence_row_height;
    let mut cursor = top + header_height;
    let mut rows = Vec::with_capacity(d.steps.len());
    let mut note_index = 0usize;
    for step in &d.steps {
        match step {
            SequenceStep::Note(note) => {
                let (w, h) = sizer.note(&note.text);
                let advance = row_height.max(h + NOTE_ROW_PADDING);
                let y = cursor + advance / 2.0;
                rows.push(y);
                cursor += advance;

                let anchors: Vec<f64> = note
                    .participants
                    .iter()
                    .filter_map(|p| layout.get(p).map(|b| b.x))
                    .collect();
                let id = note_id(note_index);
                note_index += 1;
                let (Some(first), Some(last)) = (anchors.first(), anchors.last()) else {
                    tracing::trace!(note = %id, "note without a known participant");
                    continue;
                };
                let note_box = match note.placement {
                    NotePlacement::Left => NodeBox::new(first - NOTE_OFFSET - w / 2.0, y, w, h),
                    NotePlacement::Right => NodeBox::new(first + NOTE_OFFSET + w / 2.0, y, w, h),
                    NotePlacement::Over => {
                        let span = (last - first).abs();
                        let width = if anchors.len() > 1 { w.max(span + NOTE_OFFSET * 4.0) } else { w };
                        NodeBox::new((first + last) / 2.0, y, width, h)
                    }
                };
                layout.insert(id, note_box);
            }
            SequenceStep::Message(_) | SequenceStep::Divider { .. } => {
                rows.push(cursor + row_height / 2.0);
                cursor += row_height;
            }
        }
    }

    let left = config.margin;
    let right = config.margin + sizes.len() as f64 * pitch;
    layout.sequence = Some(SequenceLayout {
        top,
        header_height,
        rows,
        lifeline_end: cursor + row_height / 2.0,
        left,
        right,
    });
    layout
}
