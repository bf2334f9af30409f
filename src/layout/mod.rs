mod bounds;
mod builder;
mod error;
mod graph;
mod loops;
mod router;
pub(crate) mod types;
pub use bounds::BoundingBox;
pub use error::LayoutError;
pub use graph::PositionedGraph;
pub use types::*;
use builder::FlowGraphBuilder;
use router::RouterContext;

use crate::config::{DEFAULT_METRICS, LayoutConfig, LayoutMetrics};
use crate::ir::{Action, ActionKind, FlowVersion, RouterBranch, StepRef};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread::JoinHandle;
use tracing::debug;

const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Lays out the trigger chain from the origin, then drops every note at its
/// own absolute position.
pub fn build_graph(flow: &FlowVersion, config: &LayoutConfig) -> Result<PositionedGraph, LayoutError> {
    let metrics = LayoutMetrics::new(config);
    build(flow, &metrics, None)
}

pub fn build_default_graph(flow: &FlowVersion) -> Result<PositionedGraph, LayoutError> {
    build(flow, &DEFAULT_METRICS, None)
}

pub fn build_graph_with_metrics(
    flow: &FlowVersion,
    metrics: &LayoutMetrics,
) -> Result<PositionedGraph, LayoutError> {
    build(flow, metrics, None)
}

/// Same as [`build_graph`], but checks `cancel` before placing each step.
pub fn build_graph_cancellable(
    flow: &FlowVersion,
    config: &LayoutConfig,
    cancel: &AtomicBool,
) -> Result<PositionedGraph, LayoutError> {
    let metrics = LayoutMetrics::new(config);
    build(flow, &metrics, Some(cancel))
}

/// Runs a layout pass on a dedicated worker thread.
pub fn spawn_layout(
    flow: FlowVersion,
    config: LayoutConfig,
    cancel: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<Result<PositionedGraph, LayoutError>>> {
    std::thread::Builder::new()
        .name("flow-layout".to_string())
        .stack_size(WORKER_STACK_SIZE)
        .spawn(move || build_graph_cancellable(&flow, &config, &cancel))
}

fn build(
    flow: &FlowVersion,
    metrics: &LayoutMetrics,
    cancel: Option<&AtomicBool>,
) -> Result<PositionedGraph, LayoutError> {
    debug!(flow = flow.id.as_deref().unwrap_or(""), trigger = %flow.trigger.name, "building flow graph");
    let mut builder = FlowGraphBuilder::new(metrics, cancel);
    let mut graph = builder.build_subgraph(Some(StepRef::Trigger(&flow.trigger)), 0.0, 0.0, 0)?;
    for note in &flow.notes {
        graph.push_node(VisualNode::note(note));
    }
    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        notes = flow.notes.len(),
        "flow graph built"
    );
    Ok(graph)
}
