//! Handle-based storage for nodes and edges.
//!
//! Chains store `EdgeId`s and edges store `NodeId`s; merging two nodes is a
//! handle rewrite on the edge. An arena is created per pairwise computation
//! and dropped with it, so nothing is shared across remap workers.

use nalgebra::Vector2;

use super::edge::{Edge, EdgeId};
use super::node::{Node, NodeId, NodeLoc};

#[derive(Clone, Debug, Default)]
pub struct Arena {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
        }
    }

    #[inline]
    pub fn add_node(&mut self, pos: Vector2<f64>) -> NodeId {
        self.add_node_with_loc(pos, NodeLoc::Unknown)
    }

    #[inline]
    pub fn add_node_with_loc(&mut self, pos: Vector2<f64>, loc: NodeLoc) -> NodeId {
        self.nodes.push(Node::with_loc(pos, loc));
        NodeId(self.nodes.len() - 1)
    }

    #[inline]
    pub(crate) fn push_edge(&mut self, edge: Edge) -> EdgeId {
        self.edges.push(edge);
        EdgeId(self.edges.len() - 1)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    #[inline]
    pub fn pos(&self, id: NodeId) -> Vector2<f64> {
        self.nodes[id.0].pos
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    #[inline]
    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.0]
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
