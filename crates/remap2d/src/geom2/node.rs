//! Points of the kernel graph.
//!
//! A `Node` is owned by the `Arena` and shared by handle among all edges that
//! use it as an endpoint. Equality between nodes is a tolerance test on
//! coordinates; identity is `NodeId` equality.

use nalgebra::Vector2;

use super::num::{angle_of, slope_of};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Classification of a node against the polygon currently being located.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeLoc {
    Unknown,
    In,
    Out,
    /// Crossing point of two boundaries.
    On,
    /// Merged extremity; its edges need an absolute location computation.
    OnLim,
    /// Tangential contact; does not flip parity in ray casting.
    OnTangent,
}

#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub pos: Vector2<f64>,
    pub loc: NodeLoc,
}

impl Node {
    #[inline]
    pub fn new(pos: Vector2<f64>) -> Self {
        Self {
            pos,
            loc: NodeLoc::Unknown,
        }
    }

    #[inline]
    pub fn with_loc(pos: Vector2<f64>, loc: NodeLoc) -> Self {
        Self { pos, loc }
    }

    /// Coordinate-wise comparison under `prec`.
    #[inline]
    pub fn is_equal(&self, other: &Node, prec: f64) -> bool {
        positions_equal(self.pos, other.pos, prec)
    }

    #[inline]
    pub fn distance_sq_to(&self, other: &Node) -> f64 {
        (self.pos - other.pos).norm_squared()
    }

    /// Undirected slope in [0, π) of the vector from `self` to `other`.
    #[inline]
    pub fn slope_to(&self, other: &Node) -> f64 {
        slope_of(other.pos - self.pos)
    }

    /// Polar angle of the vector from `self` to `other`.
    #[inline]
    pub fn angle_to(&self, other: &Node) -> f64 {
        angle_of(other.pos - self.pos)
    }

    pub fn declare_in(&mut self) {
        if self.loc == NodeLoc::Unknown {
            self.loc = NodeLoc::In;
        }
    }

    pub fn declare_out(&mut self) {
        if self.loc == NodeLoc::Unknown {
            self.loc = NodeLoc::Out;
        }
    }

    pub fn declare_on(&mut self) {
        if self.loc == NodeLoc::Unknown {
            self.loc = NodeLoc::On;
        }
    }

    pub fn declare_on_lim(&mut self) {
        if matches!(self.loc, NodeLoc::Unknown | NodeLoc::On) {
            self.loc = NodeLoc::OnLim;
        }
    }

    pub fn declare_on_tangent(&mut self) {
        self.loc = NodeLoc::OnTangent;
    }

    #[inline]
    pub fn init_loc(&mut self) {
        self.loc = NodeLoc::Unknown;
    }

    /// `(p - bary) / dim`.
    #[inline]
    pub fn apply_similarity(&mut self, bary: Vector2<f64>, dim: f64) {
        self.pos = (self.pos - bary) / dim;
    }

    #[inline]
    pub fn unapply_similarity(&mut self, bary: Vector2<f64>, dim: f64) {
        self.pos = self.pos * dim + bary;
    }
}

#[inline]
pub fn positions_equal(a: Vector2<f64>, b: Vector2<f64>, prec: f64) -> bool {
    (a.x - b.x).abs() < prec && (a.y - b.y).abs() < prec
}
