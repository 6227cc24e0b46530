//! Edges: oriented curves between two arena nodes.
//!
//! Edges are shared by handle between the elementary edges of several chains
//! (e.g. the common boundary of two split polygons), so classification written
//! on an edge is visible to every chain that references it.

use nalgebra::Vector2;

use super::arena::Arena;
use super::bounds::Bounds;
use super::cfg::GeomCfg;
use super::curve::{ArcData, Curve, CurveGeom};
use super::node::{Node, NodeId, NodeLoc};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// Location of a whole edge against the polygon being located.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeLoc {
    Unknown,
    FullIn,
    FullOut,
    FullOn,
}

#[derive(Clone, Copy, Debug)]
pub struct Edge {
    pub start: NodeId,
    pub end: NodeId,
    pub curve: Curve,
    pub loc: EdgeLoc,
    pub bounds: Bounds,
}

impl Arena {
    /// Adds an edge between two existing nodes; bounds are computed here.
    pub fn add_edge(&mut self, start: NodeId, end: NodeId, curve: Curve) -> EdgeId {
        let geom = CurveGeom {
            start: self.pos(start),
            end: self.pos(end),
            curve,
        };
        self.push_edge(Edge {
            start,
            end,
            curve,
            loc: EdgeLoc::Unknown,
            bounds: geom.bounds(),
        })
    }

    pub fn add_line(&mut self, start: NodeId, end: NodeId) -> EdgeId {
        self.add_edge(start, end, Curve::Line)
    }

    /// Arc from `start` to `end` through `middle`; falls back to a line when
    /// the three points are colinear.
    pub fn add_arc(&mut self, start: NodeId, middle: Vector2<f64>, end: NodeId) -> EdgeId {
        match ArcData::through(self.pos(start), middle, self.pos(end)) {
            Some(arc) => self.add_edge(start, end, Curve::Arc(arc)),
            None => self.add_line(start, end),
        }
    }

    /// Line when `start → middle → end` is straight under
    /// `cfg.arc_detection_precision`, arc otherwise.
    pub fn add_edge_from_3_points(
        &mut self,
        start: NodeId,
        middle: Vector2<f64>,
        end: NodeId,
        cfg: &GeomCfg,
    ) -> EdgeId {
        let s = self.pos(start);
        let e = self.pos(end);
        let first = CurveGeom::line(s, middle);
        let second = CurveGeom::line(middle, e);
        if super::intersect::seg_seg::are_colinears(&first, &second, cfg) {
            self.add_line(start, end)
        } else {
            self.add_arc(start, middle, end)
        }
    }

    /// Value snapshot of an edge.
    #[inline]
    pub fn geom(&self, e: EdgeId) -> CurveGeom {
        let edge = self.edge(e);
        CurveGeom {
            start: self.pos(edge.start),
            end: self.pos(edge.end),
            curve: edge.curve,
        }
    }

    /// New edge on the same curve as `e`, restricted to `[s, e_node]`
    /// (reversed when `direction` is false).
    pub fn build_edge_lying_on(
        &mut self,
        e: EdgeId,
        s: NodeId,
        e_node: NodeId,
        direction: bool,
    ) -> EdgeId {
        let sub = self.geom(e).lying_on(self.pos(s), self.pos(e_node), direction);
        let (start, end) = if direction { (s, e_node) } else { (e_node, s) };
        self.push_edge(Edge {
            start,
            end,
            curve: sub.curve,
            loc: EdgeLoc::Unknown,
            bounds: sub.bounds(),
        })
    }

    /// Replaces the start node of `e` with `n` when they are equal under
    /// tolerance. Returns false (no-op) otherwise.
    pub fn change_start_node_with(&mut self, e: EdgeId, n: NodeId, prec: f64) -> bool {
        let cur = self.edge(e).start;
        if cur == n {
            return true;
        }
        if self.node(cur).is_equal(self.node(n), prec) {
            self.edge_mut(e).start = n;
            return true;
        }
        false
    }

    pub fn change_end_node_with(&mut self, e: EdgeId, n: NodeId, prec: f64) -> bool {
        let cur = self.edge(e).end;
        if cur == n {
            return true;
        }
        if self.node(cur).is_equal(self.node(n), prec) {
            self.edge_mut(e).end = n;
            return true;
        }
        false
    }

    /// Sets the edge location from `Unknown` and propagates the matching
    /// declaration to both endpoints.
    pub fn declare_edge_on(&mut self, e: EdgeId) {
        self.declare_edge(e, EdgeLoc::FullOn, Node::declare_on);
    }

    pub fn declare_edge_in(&mut self, e: EdgeId) {
        self.declare_edge(e, EdgeLoc::FullIn, Node::declare_in);
    }

    pub fn declare_edge_out(&mut self, e: EdgeId) {
        self.declare_edge(e, EdgeLoc::FullOut, Node::declare_out);
    }

    fn declare_edge(&mut self, e: EdgeId, loc: EdgeLoc, on_node: fn(&mut Node)) {
        let edge = *self.edge(e);
        if edge.loc != EdgeLoc::Unknown {
            return;
        }
        self.edge_mut(e).loc = loc;
        on_node(self.node_mut(edge.start));
        on_node(self.node_mut(edge.end));
    }

    /// Resets the edge and both endpoints to `Unknown`.
    pub fn init_edge_locs(&mut self, e: EdgeId) {
        let edge = *self.edge(e);
        self.edge_mut(e).loc = EdgeLoc::Unknown;
        self.node_mut(edge.start).init_loc();
        self.node_mut(edge.end).init_loc();
    }

    #[inline]
    pub fn edge_loc(&self, e: EdgeId) -> EdgeLoc {
        self.edge(e).loc
    }

    #[inline]
    pub fn start_loc(&self, e: EdgeId) -> NodeLoc {
        self.node(self.edge(e).start).loc
    }

    #[inline]
    pub fn end_loc(&self, e: EdgeId) -> NodeLoc {
        self.node(self.edge(e).end).loc
    }

    /// Length of `e` in the current frame.
    #[inline]
    pub fn edge_length(&self, e: EdgeId) -> f64 {
        self.geom(e).length()
    }
}
