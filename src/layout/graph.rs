use serde::Serialize;

use super::bounds::BoundingBox;
use super::types::{VisualEdge, VisualNode};

/// Nodes and edges produced for one subtree, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PositionedGraph {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

impl PositionedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_node(&mut self, node: VisualNode) {
        self.nodes.push(node);
    }

    pub fn push_edge(&mut self, edge: VisualEdge) {
        self.edges.push(edge);
    }

    /// Appends `other` in place. Duplicate ids are not detected here.
    pub fn merge(&mut self, other: PositionedGraph) {
        self.nodes.extend(other.nodes);
        self.edges.extend(other.edges);
    }

    /// Extent of every node; edges do not contribute.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for node in &self.nodes {
            bbox.expand(&node.bounds());
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&VisualEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub fn edges_from<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a VisualEdge> + 'a {
        self.edges.iter().filter(move |edge| edge.source == source)
    }

    pub fn edges_to<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a VisualEdge> + 'a {
        self.edges.iter().filter(move |edge| edge.target == target)
    }

    /// Topmost-last hit: notes and nested steps added later win over earlier ones.
    pub fn node_at(&self, x: f32, y: f32) -> Option<&VisualNode> {
        self.nodes
            .iter()
            .rev()
            .find(|node| !node.is_graph_end() && node.contains(x, y))
    }
}
