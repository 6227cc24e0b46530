//! Reproducible perturbed-grid meshes.
//!
//! Purpose
//! - Provide small, deterministic test and benchmark meshes: a structured
//!   `nx x ny` grid over a rectangle whose interior nodes are jittered.
//!   Boundary nodes stay on the rectangle, so two grids over the same
//!   rectangle cover each other exactly.
//!
//! Model
//! - Interior node `(i, j)` moves by `u * jitter * (hx, hy)` with `u` uniform
//!   in `[-1, 1]²`; `jitter` is clamped to `[0, 0.45]` so cells stay convex
//!   enough to remain simple.
//! - Determinism uses a replay token `(seed, index)` mixed into one RNG.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::remap::{Cell, CellKind, Mesh, RemapError};

/// Grid shape and placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCfg {
    pub nx: usize,
    pub ny: usize,
    pub origin: Vector2<f64>,
    pub size: Vector2<f64>,
    /// Interior node jitter as a fraction of the cell size.
    pub jitter: f64,
    /// Split every quad along its diagonal.
    pub triangles: bool,
}

impl Default for GridCfg {
    fn default() -> Self {
        Self {
            nx: 4,
            ny: 4,
            origin: Vector2::zeros(),
            size: Vector2::new(1.0, 1.0),
            jitter: 0.2,
            triangles: false,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { seed, index: 0 }
    }

    fn to_std_rng(self) -> StdRng {
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        StdRng::seed_from_u64(mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15))))
    }
}

/// Perturbed structured grid. Cells are counterclockwise quads, or pairs of
/// triangles when `cfg.triangles` is set.
pub fn perturbed_grid(cfg: GridCfg, tok: ReplayToken) -> Result<Mesh, RemapError> {
    let (nx, ny) = (cfg.nx.max(1), cfg.ny.max(1));
    let h = Vector2::new(cfg.size.x / nx as f64, cfg.size.y / ny as f64);
    let jitter = cfg.jitter.clamp(0.0, 0.45);
    let mut rng = tok.to_std_rng();
    let mut coords = Vec::with_capacity(2 * (nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            let mut p = cfg.origin + Vector2::new(i as f64 * h.x, j as f64 * h.y);
            if i > 0 && i < nx && j > 0 && j < ny {
                let u = Vector2::new(rng.gen::<f64>() * 2.0 - 1.0, rng.gen::<f64>() * 2.0 - 1.0);
                p += u.component_mul(&h) * jitter;
            }
            coords.extend_from_slice(&[p.x, p.y]);
        }
    }
    let id = |i: usize, j: usize| j * (nx + 1) + i;
    let mut cells = Vec::with_capacity(if cfg.triangles { 2 * nx * ny } else { nx * ny });
    for j in 0..ny {
        for i in 0..nx {
            let (a, b, c, d) = (id(i, j), id(i + 1, j), id(i + 1, j + 1), id(i, j + 1));
            if cfg.triangles {
                cells.push(Cell::new(CellKind::Tri3, vec![a, b, c]));
                cells.push(Cell::new(CellKind::Tri3, vec![a, c, d]));
            } else {
                cells.push(Cell::new(CellKind::Quad4, vec![a, b, c, d]));
            }
        }
    }
    Mesh::new(2, coords, cells)
}

/// Uniform 1-D mesh of `n` segments over `[x0, x1]` (space dimension 1).
pub fn segment_mesh(n: usize, x0: f64, x1: f64) -> Result<Mesh, RemapError> {
    let n = n.max(1);
    let coords = (0..=n)
        .map(|i| x0 + (x1 - x0) * i as f64 / n as f64)
        .collect();
    let cells = (0..n).map(|i| Cell::new(CellKind::Seg2, vec![i, i + 1])).collect();
    Mesh::new(1, coords, cells)
}

/// `a + b·x + c·y` evaluated at the vertex mean of every cell.
pub fn linear_field(mesh: &Mesh, a: f64, b: f64, c: f64) -> Vec<f64> {
    (0..mesh.n_cells())
        .map(|k| {
            let pts = mesh.cell_points(k);
            let m = pts.iter().fold(Vector2::zeros(), |acc, p| acc + p) / pts.len() as f64;
            a + b * m.x + c * m.y
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_reproducible_and_keeps_its_boundary() {
        let cfg = GridCfg {
            nx: 3,
            ny: 2,
            jitter: 0.4,
            ..GridCfg::default()
        };
        let m1 = perturbed_grid(cfg, ReplayToken::new(7)).unwrap();
        let m2 = perturbed_grid(cfg, ReplayToken::new(7)).unwrap();
        let m3 = perturbed_grid(cfg, ReplayToken { seed: 7, index: 1 }).unwrap();
        assert_eq!(m1, m2);
        assert_ne!(m1, m3);
        assert_eq!(m1.n_cells(), 6);
        assert_eq!(m1.n_nodes(), 12);
        // corners and edges untouched
        assert_eq!(m1.point(0), Vector2::new(0.0, 0.0));
        assert_eq!(m1.point(3), Vector2::new(1.0, 0.0));
        assert!((m1.point(4).x - 0.0).abs() < 1e-15);
    }

    #[test]
    fn triangles_double_the_cells() {
        let cfg = GridCfg {
            nx: 2,
            ny: 2,
            triangles: true,
            ..GridCfg::default()
        };
        let m = perturbed_grid(cfg, ReplayToken::new(1)).unwrap();
        assert_eq!(m.n_cells(), 8);
        assert!(m.cells().iter().all(|c| c.kind == CellKind::Tri3));
    }

    #[test]
    fn segments_and_linear_field() {
        let m = segment_mesh(4, 0.0, 2.0).unwrap();
        assert_eq!(m.n_cells(), 4);
        let f = linear_field(&m, 1.0, 2.0, 0.0);
        assert!((f[0] - 1.5).abs() < 1e-12);
        assert!((f[3] - 4.5).abs() < 1e-12);
    }
}
