use crate::diagram::Diagnostics;
use crate::models::{ActivityDiagram, ActivityNode, ActivityNodeType, Partition, Swimlane};
use crate::preprocess::SourceLine;
use crate::utils::{is_end_note, read_block, unescape_newlines, unquote};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Conditional,
    Loop,
    Fork,
}

/// One open `if`, `while` or `fork`.
#[derive(Debug, Clone)]
struct Frame {
    kind: FrameKind,
    /// Name of the decision or fork node that opened the frame.
    opener: String,
}

#[derive(Debug, Default)]
pub(super) struct ActivityBuilder {
    diagram: ActivityDiagram,
    stack: Vec<Frame>,
    lane: Option<String>,
    /// Indices into `diagram.partitions` of the open partitions, innermost last.
    open_partitions: Vec<usize>,
}

impl ActivityBuilder {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn run(mut self, lines: &[SourceLine], diagnostics: &mut Diagnostics) -> ActivityDiagram {
        let mut idx = 0;
        while idx < lines.len() {
            idx = self.step(lines, idx, diagnostics);
        }
        self.finish()
    }

    /// Consumes the construct starting at `lines[idx]` and returns the next index.
    fn step(&mut self, lines: &[SourceLine], idx: usize, diagnostics: &mut Diagnostics) -> usize {
        let line = &lines[idx];
        let text = line.as_str();

        match text {
            "start" => {
                self.push(ActivityNodeType::Start, "Start".to_string());
                return idx + 1;
            }
            "stop" | "end" | "kill" | "detach" => {
                self.push(ActivityNodeType::End, "End".to_string());
                return idx + 1;
            }
            "fork" => {
                let opener = self.push(ActivityNodeType::Fork, String::new());
                self.stack.push(Frame {
                    kind: FrameKind::Fork,
                    opener,
                });
                return idx + 1;
            }
            "fork again" => {
                if !self.marker(FrameKind::Fork, ActivityNodeType::ForkAgainMarker, None, None) {
                    diagnostics.skip(line, "`fork again` outside of a fork");
                }
                return idx + 1;
            }
            "end fork" | "endfork" | "end merge" => {
                if !self.close(FrameKind::Fork, None) {
                    diagnostics.skip(line, "`end fork` without a matching fork");
                }
                return idx + 1;
            }
            "endif" | "end if" => {
                if !self.close(FrameKind::Conditional, None) {
                    diagnostics.skip(line, "`endif` without a matching if");
                }
                return idx + 1;
            }
            "}" => {
                match self.open_partitions.pop() {
                    Some(p) => self.diagram.partitions[p].end = self.diagram.nodes.len(),
                    None => diagnostics.skip(line, "unbalanced `}`"),
                }
                return idx + 1;
            }
            _ => {}
        }

        if text.starts_with(':') {
            return self.action(lines, idx);
        }

        if let Some(caps) = regex!(
            r"^if\s*\((?P<cond>.*)\)\s*(?:is\s*\((?P<is>[^)]*)\)\s*)?then(?:\s*\((?P<label>[^)]*)\))?$"
        )
        .captures(text)
        {
            let yes = caps.name("label").or(caps.name("is")).map(|m| m.as_str().trim().to_string());
            let opener = self.push(ActivityNodeType::Decision, caps["cond"].trim().to_string());
            self.last_mut().yes_branch = yes.filter(|y| !y.is_empty());
            self.stack.push(Frame {
                kind: FrameKind::Conditional,
                opener,
            });
            return idx + 1;
        }

        if let Some(caps) = regex!(
            r"^else\s*if\s*\((?P<cond>.*)\)\s*(?:is\s*\((?P<is>[^)]*)\)\s*)?then(?:\s*\((?P<label>[^)]*)\))?$|^elseif\s*\((?P<cond2>.*)\)\s*(?:is\s*\((?P<is2>[^)]*)\)\s*)?then(?:\s*\((?P<label2>[^)]*)\))?$"
        )
        .captures(text)
        {
            let cond = caps.name("cond").or(caps.name("cond2")).map_or("", |m| m.as_str());
            let branch = ["label", "is", "label2", "is2"]
                .into_iter()
                .find_map(|g| caps.name(g))
                .map(|m| m.as_str().trim().to_string());
            if !self.marker(
                FrameKind::Conditional,
                ActivityNodeType::ElseifMarker,
                Some(cond.trim().to_string()),
                branch,
            ) {
                diagnostics.skip(line, "`elseif` outside of an if");
            }
            return idx + 1;
        }

        if let Some(caps) = regex!(r"^else(?:\s*\((?P<label>[^)]*)\))?$").captures(text) {
            let branch = caps.name("label").map(|m| m.as_str().trim().to_string());
            if !self.marker(FrameKind::Conditional, ActivityNodeType::ElseMarker, None, branch) {
                diagnostics.skip(line, "`else` outside of an if");
            }
            return idx + 1;
        }

        if let Some(caps) =
            regex!(r"^while\s*\((?P<cond>.*?)\)\s*(?:is\s*\((?P<label>[^)]*)\))?$").captures(text)
        {
            let opener = self.push(ActivityNodeType::Decision, caps["cond"].trim().to_string());
            let node = self.last_mut();
            node.looping = true;
            node.yes_branch = caps
                .name("label")
                .map(|m| m.as_str().trim().to_string())
                .filter(|l| !l.is_empty());
            self.stack.push(Frame {
                kind: FrameKind::Loop,
                opener,
            });
            return idx + 1;
        }

        if let Some(caps) =
            regex!(r"^end\s*while(?:\s*\((?P<label>[^)]*)\))?$").captures(text)
        {
            let label = caps.name("label").map(|m| m.as_str().trim().to_string());
            if !self.close(FrameKind::Loop, label) {
                diagnostics.skip(line, "`endwhile` without a matching while");
            }
            return idx + 1;
        }

        if let Some(caps) = regex!(r"^\|(?:#[^|]*\|)?([^|]+)\|$").captures(text) {
            self.switch_lane(caps[1].trim());
            return idx + 1;
        }

        if let Some(caps) =
            regex!(r#"^(?:partition|group)\s+("[^"]+"|[^{]+?)\s*(?:#\w+\s*)?\{?$"#).captures(text)
        {
            let parent = self
                .open_partitions
                .last()
                .map(|&p| self.diagram.partitions[p].name.clone());
            self.diagram.partitions.push(Partition {
                name: unquote(&caps[1]).to_string(),
                start: self.diagram.nodes.len(),
                end: self.diagram.nodes.len(),
                parent,
            });
            self.open_partitions.push(self.diagram.partitions.len() - 1);
            return idx + 1;
        }

        if let Some(caps) =
            regex!(r"^(?:floating\s+)?note\s+(?:left|right|top|bottom)?\s*(?::\s*(?P<text>.*))?$")
                .captures(text)
        {
            let (note, next) = match caps.name("text") {
                Some(inline) => (unescape_newlines(inline.as_str().trim()), idx + 1),
                None => {
                    let (body, next) = read_block(lines, idx, is_end_note);
                    (body.join("\n"), next)
                }
            };
            self.attach_note(note);
            return next;
        }

        diagnostics.skip(line, "unrecognized activity diagram line");
        idx + 1
    }

    /// `:text;`, possibly spanning several lines.
    fn action(&mut self, lines: &[SourceLine], idx: usize) -> usize {
        let first = &lines[idx].as_str()[1..];
        let mut parts = vec![first];
        let mut next = idx + 1;
        if !first.ends_with(';') {
            while next < lines.len() {
                let text = lines[next].as_str();
                next += 1;
                parts.push(text);
                if text.ends_with(';') {
                    break;
                }
            }
        }
        let joined = parts.join("\n");
        let label = joined.strip_suffix(';').unwrap_or(&joined).trim();
        self.push(ActivityNodeType::Action, unescape_newlines(label));
        next
    }

    /// Appends a node in the current lane/partition context and returns its name.
    fn push(&mut self, node_type: ActivityNodeType, label: String) -> String {
        let index = self.diagram.nodes.len();
        let name = format!("a{index}");
        if let Some(lane) = &self.lane {
            if let Some(swimlane) = self.diagram.swimlanes.iter_mut().find(|s| &s.name == lane) {
                swimlane.last_node = index;
            }
        }
        let partition = self
            .open_partitions
            .last()
            .map(|&p| self.diagram.partitions[p].name.clone());
        self.diagram.nodes.push(ActivityNode {
            name: name.clone(),
            node_type,
            label,
            yes_branch: None,
            branch_label: None,
            related_decision: None,
            looping: false,
            lane: self.lane.clone(),
            partition,
            note: None,
        });
        name
    }

    fn last_mut(&mut self) -> &mut ActivityNode {
        let last = self.diagram.nodes.len() - 1;
        &mut self.diagram.nodes[last]
    }

    /// Emits a branch marker for the top frame; `false` when the top frame has another kind.
    fn marker(
        &mut self,
        kind: FrameKind,
        node_type: ActivityNodeType,
        condition: Option<String>,
        branch: Option<String>,
    ) -> bool {
        let Some(frame) = self.stack.last().filter(|f| f.kind == kind).cloned() else {
            return false;
        };
        self.push(node_type, condition.unwrap_or_default());
        let node = self.last_mut();
        node.related_decision = Some(frame.opener);
        node.branch_label = branch.filter(|b| !b.is_empty());
        true
    }

    /// Pops the top frame and emits its merge or join; `false` when the top frame has another
    /// kind (the line is then unrecognized and the frame stays open).
    fn close(&mut self, kind: FrameKind, label: Option<String>) -> bool {
        if self.stack.last().is_none_or(|f| f.kind != kind) {
            return false;
        }
        let Some(frame) = self.stack.pop() else {
            return false;
        };
        self.emit_close(frame, label);
        true
    }

    fn emit_close(&mut self, frame: Frame, label: Option<String>) {
        let node_type = match frame.kind {
            FrameKind::Fork => ActivityNodeType::Join,
            FrameKind::Conditional | FrameKind::Loop => ActivityNodeType::Merge,
        };
        self.push(node_type, String::new());
        let node = self.last_mut();
        node.related_decision = Some(frame.opener);
        node.looping = frame.kind == FrameKind::Loop;
        node.branch_label = label.filter(|l| !l.is_empty());
    }

    fn switch_lane(&mut self, lane: &str) {
        if !self.diagram.swimlanes.iter().any(|s| s.name == lane) {
            let next = self.diagram.nodes.len();
            self.diagram.swimlanes.push(Swimlane {
                name: lane.to_string(),
                first_node: next,
                last_node: next,
            });
        }
        self.lane = Some(lane.to_string());
    }

    fn attach_note(&mut self, note: String) {
        match self.diagram.nodes.iter_mut().rev().find(|n| !n.is_marker()) {
            Some(node) => {
                node.note = Some(match node.note.take() {
                    Some(existing) => format!("{existing}\n{note}"),
                    None => note,
                });
            }
            None => tracing::trace!("dropping note before the first activity node"),
        }
    }

    /// Closes frames still open at end of input, innermost first, so every decision gets its
    /// merge and every fork its join.
    fn finish(mut self) -> ActivityDiagram {
        while let Some(frame) = self.stack.pop() {
            tracing::trace!(opener = %frame.opener, "closing unterminated frame");
            self.emit_close(frame, None);
        }
        let len = self.diagram.nodes.len();
        for p in self.open_partitions.drain(..) {
            self.diagram.partitions[p].end = len;
        }
        self.diagram
    }
}
