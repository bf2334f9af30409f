use serde::Serialize;

use crate::config::LayoutMetrics;
use crate::ir::{Note, NoteColor, StepRef};

use super::bounds::BoundingBox;

const SUBGRAPH_END_SUFFIX: &str = "-subgraph-end";

/// Id of the sentinel placed at the bottom of `step_name`'s subgraph.
///
/// Router convergence edges and loop return edges point at this id, so every
/// caller must go through here rather than formatting the string itself.
pub fn subgraph_end_id(step_name: &str) -> String {
    format!("{step_name}{SUBGRAPH_END_SUFFIX}")
}

pub fn big_add_button_id(parent_step: &str, slot: StepSlot) -> String {
    match slot {
        StepSlot::InsideLoop => format!("{parent_step}-big-add-button-inside-loop"),
        StepSlot::InsideBranch { branch_index } => {
            format!("{parent_step}-big-add-button-inside-branch-{branch_index}")
        }
    }
}

pub fn edge_id(source: &str, target: &str) -> String {
    format!("{source}->{target}")
}

/// Structural slot a placeholder fills inside its parent step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "location", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepSlot {
    InsideLoop,
    InsideBranch { branch_index: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepNodeData {
    pub step_name: String,
    pub display_name: String,
    pub step_type: &'static str,
    pub valid: bool,
    pub skip: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Step(StepNodeData),
    GraphEnd { step_name: String },
    BigAddButton { parent_step: String, slot: StepSlot },
    Note { content: String, color: NoteColor },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: NodeKind,
}

impl VisualNode {
    pub fn step(step: StepRef<'_>, x: f32, y: f32, metrics: &LayoutMetrics) -> Self {
        Self {
            id: step.name().to_string(),
            x,
            y,
            width: metrics.step_width,
            height: metrics.step_height,
            kind: NodeKind::Step(StepNodeData {
                step_name: step.name().to_string(),
                display_name: step.display_name().to_string(),
                step_type: step.type_name(),
                valid: step.valid(),
                skip: step.skip(),
            }),
        }
    }

    pub fn graph_end(id: String, step_name: &str, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            width: 0.0,
            height: 0.0,
            kind: NodeKind::GraphEnd {
                step_name: step_name.to_string(),
            },
        }
    }

    pub fn big_add_button(
        parent_step: &str,
        slot: StepSlot,
        x: f32,
        y: f32,
        metrics: &LayoutMetrics,
    ) -> Self {
        Self {
            id: big_add_button_id(parent_step, slot),
            x,
            y,
            width: metrics.big_add_button_width,
            height: metrics.big_add_button_height,
            kind: NodeKind::BigAddButton {
                parent_step: parent_step.to_string(),
                slot,
            },
        }
    }

    pub fn note(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            x: note.position.x,
            y: note.position.y,
            width: note.size.width,
            height: note.size.height,
            kind: NodeKind::Note {
                content: note.content.clone(),
                color: note.color,
            },
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_rect(self.x, self.y, self.width, self.height)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn is_graph_end(&self) -> bool {
        matches!(self.kind, NodeKind::GraphEnd { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeKind {
    StraightLine {
        draw_arrow_head: bool,
        parent_step: String,
    },
    LoopStart {
        is_loop_empty: bool,
    },
    LoopReturn {
        draw_arrow_head_after_end: bool,
        vertical_space: f32,
    },
    RouterStart {
        is_branch_empty: bool,
        label: String,
        draw_starting_vertical_line: bool,
    },
    RouterEnd {
        draw_ending_vertical_line: bool,
        vertical_space: f32,
        router_has_next_step: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

impl VisualEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: EdgeKind) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: edge_id(&source, &target),
            source,
            target,
            kind,
        }
    }
}
