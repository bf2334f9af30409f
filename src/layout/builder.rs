use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;

use super::*;

/// A step's laid out subtree together with the id of its own sentinel.
pub(super) struct Subgraph {
    pub(super) graph: PositionedGraph,
    pub(super) end_id: String,
}

/// Greedy top-down stacker: every step owns a column ending in a sentinel
/// and the next step starts right under the measured extent of that column.
pub(super) struct FlowGraphBuilder<'a> {
    pub(super) metrics: &'a LayoutMetrics,
    seen: HashSet<&'a str>,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> FlowGraphBuilder<'a> {
    pub(super) fn new(metrics: &'a LayoutMetrics, cancel: Option<&'a AtomicBool>) -> Self {
        Self {
            metrics,
            seen: HashSet::new(),
            cancel,
        }
    }

    /// Lays out the chain starting at `step`. A missing step ends the chain.
    pub(super) fn build_subgraph(
        &mut self,
        step: Option<StepRef<'a>>,
        x: f32,
        y: f32,
        depth: usize,
    ) -> Result<PositionedGraph, LayoutError> {
        match step {
            Some(step) => Ok(self.build_chain(step, x, y, depth)?.graph),
            None => Ok(PositionedGraph::new()),
        }
    }

    /// Stacks `head` and every step after it, each one directly under the
    /// measured extent of the one before. Only loop and router nesting
    /// recurses; `depth` counts nesting levels, not chain length.
    pub(super) fn build_chain(
        &mut self,
        head: StepRef<'a>,
        x: f32,
        y: f32,
        depth: usize,
    ) -> Result<Subgraph, LayoutError> {
        let first = self.build_step(head, x, y, depth)?;
        let mut next_y = y + first.graph.bounding_box().height();
        let mut graph = first.graph;

        let mut next = head.next_action();
        while let Some(action) = next {
            let placed = self.build_step(StepRef::Action(action), x, next_y, depth)?;
            next_y += placed.graph.bounding_box().height();
            graph.merge(placed.graph);
            next = action.next_action.as_deref();
        }

        Ok(Subgraph {
            graph,
            end_id: first.end_id,
        })
    }

    /// Places one step with its nested content and sentinel, without the
    /// steps that follow it.
    fn build_step(
        &mut self,
        step: StepRef<'a>,
        x: f32,
        y: f32,
        depth: usize,
    ) -> Result<Subgraph, LayoutError> {
        self.enter(step, depth)?;
        let metrics = self.metrics;
        let name = step.name();
        let has_next_step = step.next_action().is_some();
        trace!(step = name, x, y, depth, "placing step");

        // Sentinel identity exists before any nested wiring refers to it.
        let end_id = subgraph_end_id(name);

        let mut graph = PositionedGraph::new();
        graph.push_node(VisualNode::step(step, x, y, metrics));

        match step.action_kind() {
            Some(ActionKind::LoopOnItems { first_loop_action }) => {
                let body = self.build_loop_body(name, first_loop_action.as_deref(), x, y, depth)?;
                graph.merge(body);
            }
            Some(ActionKind::Router { children, branches }) => {
                let fan_out = self.build_router_branches(
                    RouterContext {
                        name,
                        children,
                        branches,
                        end_id: &end_id,
                        has_next_step,
                    },
                    x,
                    y,
                    depth,
                )?;
                graph.merge(fan_out);
            }
            _ => {}
        }

        let graph_height = graph.bounding_box().height();
        graph.push_node(VisualNode::graph_end(
            end_id.clone(),
            name,
            x + metrics.step_width / 2.0,
            y + graph_height,
        ));
        graph.push_edge(VisualEdge::new(
            name,
            end_id.clone(),
            EdgeKind::StraightLine {
                draw_arrow_head: has_next_step,
                parent_step: name.to_string(),
            },
        ));

        Ok(Subgraph { graph, end_id })
    }

    fn enter(&mut self, step: StepRef<'a>, depth: usize) -> Result<(), LayoutError> {
        if let Some(cancel) = self.cancel {
            if cancel.load(Ordering::Relaxed) {
                return Err(LayoutError::Cancelled);
            }
        }
        if depth >= self.metrics.max_depth {
            return Err(LayoutError::DepthExceeded {
                limit: self.metrics.max_depth,
            });
        }
        if !self.seen.insert(step.name()) {
            return Err(LayoutError::DuplicateStep {
                name: step.name().to_string(),
            });
        }
        Ok(())
    }
}
