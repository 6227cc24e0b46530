//! Unstructured meshes as seen by the engine.
//!
//! A mesh is a flat coordinate array (`space_dim` values per node) plus a
//! list of cells referencing nodes by index. Each cell is turned into a
//! closed `Chain` in a caller-provided arena when it is intersected.

use nalgebra::Vector2;

use super::error::RemapError;
use crate::geom2::{Arena, Bounds, Chain, GeomCfg, GeomError};

/// Supported cell shapes. Quadratic kinds list their corners first, then one
/// middle node per side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Seg2,
    Seg3,
    Tri3,
    Quad4,
    Polygon,
    Tri6,
    Quad8,
    QPolygon,
}

impl CellKind {
    /// Topological dimension.
    #[inline]
    pub fn dim(self) -> usize {
        match self {
            CellKind::Seg2 | CellKind::Seg3 => 1,
            _ => 2,
        }
    }

    #[inline]
    pub fn is_quadratic(self) -> bool {
        matches!(
            self,
            CellKind::Seg3 | CellKind::Tri6 | CellKind::Quad8 | CellKind::QPolygon
        )
    }

    fn accepts(self, n: usize) -> bool {
        match self {
            CellKind::Seg2 => n == 2,
            CellKind::Seg3 | CellKind::Tri3 => n == 3,
            CellKind::Quad4 => n == 4,
            CellKind::Polygon => n >= 3,
            CellKind::Tri6 => n == 6,
            CellKind::Quad8 => n == 8,
            CellKind::QPolygon => n >= 6 && n % 2 == 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CellKind::Seg2 => "Seg2",
            CellKind::Seg3 => "Seg3",
            CellKind::Tri3 => "Tri3",
            CellKind::Quad4 => "Quad4",
            CellKind::Polygon => "Polygon",
            CellKind::Tri6 => "Tri6",
            CellKind::Quad8 => "Quad8",
            CellKind::QPolygon => "QPolygon",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "Seg2" => CellKind::Seg2,
            "Seg3" => CellKind::Seg3,
            "Tri3" => CellKind::Tri3,
            "Quad4" => CellKind::Quad4,
            "Polygon" => CellKind::Polygon,
            "Tri6" => CellKind::Tri6,
            "Quad8" => CellKind::Quad8,
            "QPolygon" => CellKind::QPolygon,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub kind: CellKind,
    pub nodes: Vec<usize>,
}

impl Cell {
    pub fn new(kind: CellKind, nodes: Vec<usize>) -> Self {
        Self { kind, nodes }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    space_dim: usize,
    coords: Vec<f64>,
    cells: Vec<Cell>,
}

impl Mesh {
    /// Validates the coordinate layout, node references and node counts.
    pub fn new(space_dim: usize, coords: Vec<f64>, cells: Vec<Cell>) -> Result<Self, RemapError> {
        if !(1..=3).contains(&space_dim) {
            return Err(RemapError::invalid_mesh(format!(
                "space dimension {space_dim} not in 1..=3"
            )));
        }
        if coords.len() % space_dim != 0 {
            return Err(RemapError::invalid_mesh(format!(
                "{} coordinates do not split into nodes of dimension {space_dim}",
                coords.len()
            )));
        }
        let n_nodes = coords.len() / space_dim;
        for (i, c) in cells.iter().enumerate() {
            if !c.kind.accepts(c.nodes.len()) {
                return Err(RemapError::invalid_mesh(format!(
                    "cell {i}: {} nodes for a {}",
                    c.nodes.len(),
                    c.kind.as_str()
                )));
            }
            if let Some(&bad) = c.nodes.iter().find(|&&n| n >= n_nodes) {
                return Err(RemapError::invalid_mesh(format!(
                    "cell {i}: node {bad} out of range ({n_nodes} nodes)"
                )));
            }
        }
        Ok(Self {
            space_dim,
            coords,
            cells,
        })
    }

    #[inline]
    pub fn space_dim(&self) -> usize {
        self.space_dim
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.coords.len() / self.space_dim
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Common dimension of all cells. Empty and mixed meshes are rejected.
    pub fn mesh_dim(&self) -> Result<usize, RemapError> {
        let first = self
            .cells
            .first()
            .ok_or_else(|| RemapError::invalid_mesh("mesh has no cell"))?
            .kind
            .dim();
        if self.cells.iter().any(|c| c.kind.dim() != first) {
            return Err(RemapError::invalid_mesh("cells of mixed dimension"));
        }
        Ok(first)
    }

    /// Node `i` in the plane; 1-D nodes lie on the x axis. A third coordinate
    /// is dropped.
    pub fn point(&self, i: usize) -> Vector2<f64> {
        let p = &self.coords[i * self.space_dim..(i + 1) * self.space_dim];
        match self.space_dim {
            1 => Vector2::new(p[0], 0.0),
            _ => Vector2::new(p[0], p[1]),
        }
    }

    pub fn cell_points(&self, c: usize) -> Vec<Vector2<f64>> {
        self.cells[c].nodes.iter().map(|&n| self.point(n)).collect()
    }

    /// Boundary of cell `c` as stored (no orientation fix).
    fn raw_chain(&self, c: usize, arena: &mut Arena, cfg: &GeomCfg) -> Result<Chain, GeomError> {
        let pts = self.cell_points(c);
        match self.cells[c].kind {
            CellKind::Seg2 | CellKind::Tri3 | CellKind::Quad4 | CellKind::Polygon => {
                Ok(Chain::build_linear_polygon(arena, &pts))
            }
            // Back and forth through the middle node.
            CellKind::Seg3 => {
                Chain::build_arc_circle_polygon(arena, &[pts[0], pts[1], pts[2], pts[2]], cfg)
            }
            CellKind::Tri6 | CellKind::Quad8 | CellKind::QPolygon => {
                Chain::build_arc_circle_polygon(arena, &pts, cfg)
            }
        }
    }

    /// Boundary of cell `c`, counterclockwise for surface cells.
    pub fn build_cell(&self, c: usize, arena: &mut Arena, cfg: &GeomCfg) -> Result<Chain, GeomError> {
        let mut chain = self.raw_chain(c, arena, cfg)?;
        if self.cells[c].kind.dim() == 2 && chain.area(arena) < 0.0 {
            chain.reverse();
        }
        Ok(chain)
    }

    /// Bounding box of cell `c`, arcs included.
    pub fn cell_bounds(&self, c: usize, cfg: &GeomCfg) -> Result<Bounds, RemapError> {
        let mut arena = Arena::new();
        let chain = self
            .raw_chain(c, &mut arena, cfg)
            .map_err(|err| RemapError::Cell { cell: c, err })?;
        Ok(chain.bounds(&arena))
    }

    /// Length of segment cells, area of surface cells. Signed unless `abs`.
    pub fn measure(&self, c: usize, cfg: &GeomCfg, abs: bool) -> Result<f64, RemapError> {
        let m = if self.space_dim == 1 {
            let p = self.cell_points(c);
            p[1].x - p[0].x
        } else {
            let mut arena = Arena::new();
            let chain = self
                .raw_chain(c, &mut arena, cfg)
                .map_err(|err| RemapError::Cell { cell: c, err })?;
            match self.cells[c].kind.dim() {
                1 => chain.perimeter(&arena) / 2.0,
                _ => chain.area(&arena),
            }
        };
        Ok(if abs { m.abs() } else { m })
    }

    pub fn measures(&self, cfg: &GeomCfg, abs: bool) -> Result<Vec<f64>, RemapError> {
        (0..self.n_cells()).map(|c| self.measure(c, cfg, abs)).collect()
    }

    /// Median-dual piece of cell `c` at its corner `corner`: the corner, the
    /// midpoint of the next side, the vertex mean of the cell and the
    /// midpoint of the previous side. Pieces follow the stored orientation.
    pub fn dual_piece_points(&self, c: usize, corner: usize) -> Vec<Vector2<f64>> {
        let pts = self.cell_points(c);
        let n = pts.len();
        let bary = pts.iter().sum::<Vector2<f64>>() / n as f64;
        let (prev, cur, next) = (pts[(corner + n - 1) % n], pts[corner], pts[(corner + 1) % n]);
        vec![cur, (cur + next) / 2.0, bary, (prev + cur) / 2.0]
    }

    /// Dual piece of cell `c` at `corner`, counterclockwise.
    pub fn build_dual_piece(&self, c: usize, corner: usize, arena: &mut Arena) -> Chain {
        let mut chain = Chain::build_linear_polygon(arena, &self.dual_piece_points(c, corner));
        if chain.area(arena) < 0.0 {
            chain.reverse();
        }
        chain
    }

    /// Per node, the summed area of its dual pieces. Signed unless `abs`.
    /// Only meaningful for linear surface cells.
    pub fn node_measures(&self, abs: bool) -> Vec<f64> {
        let mut out = vec![0.0; self.n_nodes()];
        for (c, cell) in self.cells.iter().enumerate() {
            for (corner, &n) in cell.nodes.iter().enumerate() {
                let mut arena = Arena::new();
                let a = Chain::build_linear_polygon(&mut arena, &self.dual_piece_points(c, corner))
                    .area(&arena);
                out[n] += if abs { a.abs() } else { a };
            }
        }
        out
    }
}
