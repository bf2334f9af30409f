use tracing::warn;

use super::builder::FlowGraphBuilder;
use super::*;

pub(super) struct RouterContext<'a, 'e> {
    pub(super) name: &'a str,
    pub(super) children: &'a [Option<Action>],
    pub(super) branches: &'a [RouterBranch],
    /// Sentinel of the router itself; created by the caller after this returns.
    pub(super) end_id: &'e str,
    pub(super) has_next_step: bool,
}

struct BranchEnds {
    start: String,
    end: String,
    empty: bool,
}

impl<'a> FlowGraphBuilder<'a> {
    /// Fans branches out left to right under the router, one column each,
    /// and converges every branch onto the router's sentinel.
    pub(super) fn build_router_branches(
        &mut self,
        router: RouterContext<'a, '_>,
        x: f32,
        y: f32,
        depth: usize,
    ) -> Result<PositionedGraph, LayoutError> {
        let metrics = self.metrics;
        if router.branches.len() != router.children.len() {
            warn!(
                router = router.name,
                branches = router.branches.len(),
                children = router.children.len(),
                "router branch metadata does not match its children"
            );
        }

        let branch_y = y + metrics.step_height + metrics.router_child_vertical_offset;
        let mut graph = PositionedGraph::new();
        let mut ends = Vec::with_capacity(router.children.len());

        for (index, child) in router.children.iter().enumerate() {
            let branch_x = x + index as f32 * metrics.branch_column_width();
            match child {
                Some(action) => {
                    let branch =
                        self.build_chain(StepRef::Action(action), branch_x, branch_y, depth + 1)?;
                    graph.merge(branch.graph);
                    ends.push(BranchEnds {
                        start: action.name.clone(),
                        end: branch.end_id,
                        empty: false,
                    });
                }
                None => {
                    let button = VisualNode::big_add_button(
                        router.name,
                        StepSlot::InsideBranch {
                            branch_index: index,
                        },
                        branch_x,
                        branch_y,
                        metrics,
                    );
                    ends.push(BranchEnds {
                        start: button.id.clone(),
                        end: button.id.clone(),
                        empty: true,
                    });
                    graph.push_node(button);
                }
            }
        }

        for (index, branch) in ends.iter().enumerate() {
            graph.push_edge(VisualEdge::new(
                router.name,
                branch.start.clone(),
                EdgeKind::RouterStart {
                    is_branch_empty: branch.empty,
                    label: branch_label(router.branches, index),
                    draw_starting_vertical_line: index == 0,
                },
            ));
        }

        let last = ends.len().saturating_sub(1);
        for (index, branch) in ends.into_iter().enumerate() {
            graph.push_edge(VisualEdge::new(
                branch.end,
                router.end_id,
                EdgeKind::RouterEnd {
                    draw_ending_vertical_line: index == last,
                    vertical_space: metrics.vertical_gap,
                    router_has_next_step: router.has_next_step,
                },
            ));
        }

        Ok(graph)
    }
}

fn branch_label(branches: &[RouterBranch], index: usize) -> String {
    branches
        .get(index)
        .and_then(|branch| branch.branch_name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Branch {}", index + 1))
}
