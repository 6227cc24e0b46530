//! Exact 2D geometric kernel.
//!
//! Purpose
//! - Points, oriented curves (line, circular arc, infinite line) and chains of
//!   curves, with the intersection machinery that cuts two chains at their
//!   common points and rebuilds their overlap.
//!
//! Why this design
//! - Nodes and edges live in an `Arena` and are addressed by `NodeId`/`EdgeId`;
//!   merging two coincident nodes is a handle rewrite on the edges.
//! - Tolerances come from an explicit `GeomCfg`. Comparisons that decide
//!   colinearity are scaled by the characteristic dimensions of the curves
//!   involved, and polygon operations work in the unit frame of the pair's
//!   bounding box.
//!
//! References
//! - Code cross-refs: `Arena::intersect_with`, `Chain::intersect_with_abs`,
//!   `Chain::is_in_or_out`, `split::SPLIT_TABLE`.

pub mod arena;
pub mod bounds;
pub mod cfg;
pub mod composed;
pub mod curve;
pub mod edge;
pub mod error;
pub mod interp1d;
pub mod intersect;
pub mod merge;
pub mod node;
pub mod num;
pub mod polygon;

pub use arena::Arena;
pub use bounds::{Bounds, Position};
pub use cfg::{GeomCfg, Robustness};
pub use composed::{Chain, ElementaryEdge};
pub use curve::{ArcData, Curve, CurveGeom, CurveKind};
pub use edge::{Edge, EdgeId, EdgeLoc};
pub use error::GeomError;
pub use interp1d::{interpolate_1d_lin, overlap_length_1d};
pub use intersect::{Intersector, Placement};
pub use merge::MergePoints;
pub use node::{Node, NodeId, NodeLoc};
