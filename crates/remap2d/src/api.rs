//! Curated internal API (UNSTABLE).
//!
//! A convenience surface for the CLI and benches. Breaking changes are
//! allowed and expected.

// 2D kernel
pub use crate::geom2::{
    interpolate_1d_lin, overlap_length_1d, Arena, Bounds, Chain, GeomCfg, GeomError, MergePoints,
    Robustness,
};
// Remapping engine
pub use crate::remap::options as option_keys;
pub use crate::remap::{
    cell_overlap, Cell, CellKind, Denominators, Discretization, Field, Mesh, Nature, OverlapKind,
    RemapError, RemapOptions, Remapper, SparseMatrix, Support,
};
// Mesh generation
pub use crate::gen::{
    linear_field, perturbed_grid, segment_mesh, GridCfg as GridGenCfg,
    ReplayToken as GridReplay,
};
