//! Remapping engine: overlap matrix assembly and field transfer.
//!
//! Purpose
//! - Intersect every candidate (target cell, source cell) pair with the
//!   geometric kernel, store the non-zero overlap measures in a sparse
//!   matrix, and apply it to cell fields under a conservation policy.
//!
//! Why this design
//! - Each cell pair is intersected in its own arena, so pairs share no node
//!   or edge and target rows can be assembled in parallel (rayon) without
//!   locking. Rows are written once and collected in order.
//! - Node values (`P1`) are carried by median-dual pieces of the cells, so
//!   node-based pairs reuse the same polygon overlap and only change which
//!   row and column a piece overlap is added to.
//! - The policy (`Nature`) only changes the denominators; they are cached
//!   and recomputed when another policy is requested.
//!
//! References
//! - Code cross-refs: `geom2::Chain::{intersect_with_abs, intersect_with_abs_1d}`,
//!   `geom2::overlap_length_1d`.

mod discretization;
mod error;
mod field;
mod matrix;
mod mesh;
mod nature;
pub mod options;
mod remapper;

pub use discretization::{Discretization, Support};
pub use error::RemapError;
pub use field::Field;
pub use matrix::{SparseMatrix, SparseRow};
pub use mesh::{Cell, CellKind, Mesh};
pub use nature::{Denominators, Nature};
pub use options::RemapOptions;
pub use remapper::{cell_overlap, OverlapKind, Remapper};

#[cfg(test)]
mod tests;
