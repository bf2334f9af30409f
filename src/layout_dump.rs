use crate::ir::FlowVersion;
use crate::layout::{PositionedGraph, VisualEdge, VisualNode};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// What renderers and hit-testing layers consume: positioned nodes and
/// attributed edges, plus the overall extent.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub flow_id: Option<String>,
    pub display_name: String,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

impl LayoutDump {
    pub fn from_graph(graph: PositionedGraph, flow: &FlowVersion) -> Self {
        let bbox = graph.bounding_box();
        let (left, top, width, height) = if bbox.is_empty() {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            (bbox.left, bbox.top, bbox.width(), bbox.height())
        };
        LayoutDump {
            flow_id: flow.id.clone(),
            display_name: flow.display_name.clone(),
            left,
            top,
            width,
            height,
            nodes: graph.nodes,
            edges: graph.edges,
        }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

pub fn write_layout_dump(path: &Path, dump: &LayoutDump, pretty: bool) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(writer, dump)?;
    } else {
        serde_json::to_writer(writer, dump)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Action, Trigger};
    use crate::layout::build_default_graph;

    #[test]
    fn dump_serializes_tagged_kinds() {
        let flow = FlowVersion::new(Trigger::new("trigger").then(Action::looping("loop", None)));
        let graph = build_default_graph(&flow).unwrap();
        let dump = LayoutDump::from_graph(graph, &flow);
        assert_eq!((dump.left, dump.top), (0.0, 0.0));
        assert_eq!(dump.width, 312.0 + 50.0);
        assert_eq!(dump.height, 290.0);

        let value: serde_json::Value = serde_json::from_str(&dump.to_json(false).unwrap()).unwrap();
        let nodes = value["nodes"].as_array().unwrap();
        assert_eq!(nodes[0]["kind"]["type"], "step");
        assert_eq!(nodes[0]["kind"]["step_type"], "EMPTY");
        let button = nodes
            .iter()
            .find(|n| n["kind"]["type"] == "big_add_button")
            .unwrap();
        assert_eq!(button["kind"]["slot"]["location"], "INSIDE_LOOP");
        let loop_start = value["edges"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["kind"]["type"] == "loop_start")
            .unwrap();
        assert_eq!(loop_start["kind"]["is_loop_empty"], true);
        assert_eq!(loop_start["id"], "loop->loop-big-add-button-inside-loop");
    }
}
