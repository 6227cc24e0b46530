//! Conservative field remapping between 2-D (and 1-D) meshes, cell or node values.
//!
//! Modules
//! - `geom2`: edge/node arena, splitting of intersecting edges and exact
//!   polygon overlap measures (linear and circular-arc sides).
//! - `remap`: meshes, the interpolation matrix (P0/P1 pairs) and field transfer under the
//!   four physical natures.
//! - `gen`: reproducible perturbed-grid meshes for tests and benches.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; prefer
//!   clarity over compatibility when the design improves.

pub mod api;
pub mod gen;
pub mod geom2;
pub mod remap;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom2::GeomCfg;
pub use nalgebra::Vector2 as Vec2;
pub use remap::{Discretization, Mesh, Nature, RemapError, Remapper};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::gen::{linear_field, perturbed_grid, segment_mesh, GridCfg, ReplayToken};
    pub use crate::geom2::{Arena, Chain, GeomCfg, Robustness};
    pub use crate::remap::{
        Cell, CellKind, Discretization, Field, Mesh, Nature, RemapError, RemapOptions, Remapper,
        SparseMatrix,
    };
    pub use nalgebra::Vector2 as Vec2;
}
