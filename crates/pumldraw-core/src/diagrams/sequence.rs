use crate::diagram::Diagnostics;
use crate::models::{
    DiagramModel, Message, MessageKind, NotePlacement, Participant, ParticipantKind,
    SequenceDiagram, SequenceNote, SequenceStep,
};
use crate::preprocess::SourceLine;
use crate::utils::{
    is_end_note, parse_alias, read_block, split_label, strip_color, take_stereotype,
    unescape_newlines, unquote,
};
use crate::Result;

pub fn parse_sequence(lines: &[SourceLine], diagnostics: &mut Diagnostics) -> Result<DiagramModel> {
    let mut db = SequenceDiagram::default();
    let mut idx = 0;

    while idx < lines.len() {
        let text = lines[idx].as_str();

        if let Some(caps) = regex!(
            r"^(participant|actor|boundary|control|entity|database|collections|queue)\s+(.+)$"
        )
        .captures(text)
        {
            let kind = ParticipantKind::from_keyword(&caps[1]).unwrap_or_default();
            let (decl, _) = take_stereotype(&caps[2]);
            let decl = regex!(r"\s+order\s+-?\d+").replace(&decl, "");
            let (name, label) = parse_alias(strip_color(&decl));
            let participant = db
                .participants
                .get_or_insert_with(&name, || Participant::new(&name, kind));
            participant.kind = kind;
            participant.label = label;
            idx += 1;
            continue;
        }

        if let Some(caps) = regex!(r"^==+\s*(.*?)\s*==+$").captures(text) {
            db.steps.push(SequenceStep::Divider {
                label: caps[1].to_string(),
            });
            idx += 1;
            continue;
        }

        if let Some(next) = parse_note(lines, idx, &mut db) {
            idx = next;
            continue;
        }

        if let Some(message) = parse_message(text) {
            for name in [&message.from, &message.to] {
                db.participants
                    .get_or_insert_with(name, || Participant::new(name, ParticipantKind::Participant));
            }
            db.steps.push(SequenceStep::Message(message));
            idx += 1;
            continue;
        }

        diagnostics.skip(&lines[idx], "unrecognized sequence diagram line");
        idx += 1;
    }

    Ok(DiagramModel::Sequence(db))
}

fn parse_message(text: &str) -> Option<Message> {
    let (body, label) = split_label(text);
    let caps = regex!(
        r#"^(?P<a>"[^"]+"|[\w.$]+)\s*(?P<arrow><<?-(?:\[[^\]]*\])?-?|-(?:\[[^\]]*\])?-?>>?)\s*(?P<b>"[^"]+"|[\w.$]+)$"#
    )
    .captures(body)?;

    let arrow = &caps["arrow"];
    let dashes = arrow.matches('-').count();
    let kind = if dashes >= 2 {
        MessageKind::Reply
    } else if arrow.contains(">>") || arrow.contains("<<") {
        MessageKind::Async
    } else {
        MessageKind::Sync
    };

    let a = unquote(&caps["a"]).to_string();
    let b = unquote(&caps["b"]).to_string();
    let (from, to) = if arrow.starts_with('<') { (b, a) } else { (a, b) };
    Some(Message {
        from,
        to,
        kind,
        label,
    })
}

fn parse_note(lines: &[SourceLine], idx: usize, db: &mut SequenceDiagram) -> Option<usize> {
    let caps = regex!(
        r#"^[hr]?note\s+(?:(left|right)(?:\s+of\s+("[^"]+"|[\w.$]+))?|over\s+("[^"]+"|[\w.$]+)(?:\s*,\s*("[^"]+"|[\w.$]+))?)\s*(?::\s*(.*))?$"#
    )
    .captures(lines[idx].as_str())?;

    let placement = match caps.get(1).map(|m| m.as_str()) {
        Some("left") => NotePlacement::Left,
        Some(_) => NotePlacement::Right,
        None => NotePlacement::Over,
    };
    let mut participants: Vec<String> = [caps.get(2), caps.get(3), caps.get(4)]
        .into_iter()
        .flatten()
        .map(|m| unquote(m.as_str()).to_string())
        .collect();
    if participants.is_empty() {
        // `note left : x` attaches to the participant of the previous message.
        let anchor = db.steps.iter().rev().find_map(|s| match s {
            SequenceStep::Message(m) => Some(if placement == NotePlacement::Left {
                m.from.clone()
            } else {
                m.to.clone()
            }),
            _ => None,
        });
        participants.extend(anchor);
    }
    if participants.is_empty() {
        return None;
    }

    let (text, next) = match caps.get(5) {
        Some(inline) => (unescape_newlines(inline.as_str().trim()), idx + 1),
        None => {
            let (body, next) = read_block(lines, idx, |l| {
                is_end_note(l) || matches!(l, "endrnote" | "endhnote" | "end rnote" | "end hnote")
            });
            (body.join("\n"), next)
        }
    };

    for name in &participants {
        db.participants
            .get_or_insert_with(name, || Participant::new(name, ParticipantKind::Participant));
    }
    db.steps.push(SequenceStep::Note(SequenceNote {
        placement,
        participants,
        text,
    }));
    Some(next)
}
