#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, LayoutMetrics, load_config};
pub use ir::{FlowVersion, parse_flow};
pub use layout::{
    LayoutError, PositionedGraph, build_default_graph, build_graph, build_graph_cancellable,
    spawn_layout,
};
pub use layout_dump::LayoutDump;

/// Parses a flow version from JSON, lays it out and returns the dump as JSON.
pub fn layout_json(flow_json: &str, config: &Config) -> anyhow::Result<String> {
    let flow = parse_flow(flow_json)?;
    let graph = build_graph(&flow, &config.layout)?;
    let dump = LayoutDump::from_graph(graph, &flow);
    Ok(dump.to_json(config.dump.pretty)?)
}
