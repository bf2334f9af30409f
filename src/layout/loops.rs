use super::builder::FlowGraphBuilder;
use super::*;

impl<'a> FlowGraphBuilder<'a> {
    /// Places a loop body to the right of and below the loop step.
    ///
    /// An empty body becomes a single add-button with no return edge.
    pub(super) fn build_loop_body(
        &mut self,
        loop_name: &'a str,
        first_loop_action: Option<&'a Action>,
        x: f32,
        y: f32,
        depth: usize,
    ) -> Result<PositionedGraph, LayoutError> {
        let metrics = self.metrics;
        let child_x = x + metrics.step_width + metrics.horizontal_gap;
        let child_y = y + metrics.step_height + metrics.loop_child_vertical_offset;

        let mut graph = PositionedGraph::new();
        let (first_child_id, child_end_id) = match first_loop_action {
            Some(action) => {
                let child = self.build_chain(StepRef::Action(action), child_x, child_y, depth + 1)?;
                graph.merge(child.graph);
                (action.name.clone(), Some(child.end_id))
            }
            None => {
                let button =
                    VisualNode::big_add_button(loop_name, StepSlot::InsideLoop, child_x, child_y, metrics);
                let id = button.id.clone();
                graph.push_node(button);
                (id, None)
            }
        };

        graph.push_edge(VisualEdge::new(
            loop_name,
            first_child_id,
            EdgeKind::LoopStart {
                is_loop_empty: first_loop_action.is_none(),
            },
        ));

        if let Some(child_end_id) = child_end_id {
            graph.push_edge(VisualEdge::new(
                child_end_id,
                loop_name,
                EdgeKind::LoopReturn {
                    draw_arrow_head_after_end: true,
                    vertical_space: metrics.vertical_gap,
                },
            ));
        }

        Ok(graph)
    }
}
