use rayon::prelude::*;
use tracing::{debug, info};

use super::discretization::{Discretization, Support};
use super::error::RemapError;
use super::field::Field;
use super::matrix::{SparseMatrix, SparseRow};
use super::mesh::Mesh;
use super::nature::{Denominators, Nature};
use super::options::RemapOptions;
use crate::geom2::{overlap_length_1d, Arena, Chain, GeomCfg, GeomError};

/// Overlap measure used for a (space, source, target) dimension triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlapKind {
    /// Surface cells in the plane.
    Area,
    /// Curve cells in the plane.
    Curve,
    /// Intervals on a line.
    Interval,
}

impl OverlapKind {
    pub fn select(source: &Mesh, target: &Mesh) -> Result<Self, RemapError> {
        let space = source.space_dim();
        if space != target.space_dim() {
            return Err(RemapError::IncoherentSpaceDim {
                source: space,
                target: target.space_dim(),
            });
        }
        let (sd, td) = (source.mesh_dim()?, target.mesh_dim()?);
        match (space, sd, td) {
            (2, 2, 2) => Ok(OverlapKind::Area),
            (2, 1, 1) => Ok(OverlapKind::Curve),
            (1, 1, 1) => Ok(OverlapKind::Interval),
            _ => Err(RemapError::NoInterpolation {
                space_dim: space,
                source_dim: sd,
                target_dim: td,
            }),
        }
    }
}

/// Overlap measure of target cell `t` and source cell `s`, each built in a
/// fresh arena.
pub fn cell_overlap(
    kind: OverlapKind,
    source: &Mesh,
    s: usize,
    target: &Mesh,
    t: usize,
    cfg: &GeomCfg,
) -> Result<f64, GeomError> {
    match kind {
        OverlapKind::Area => {
            let mut arena = Arena::new();
            let tc = target.build_cell(t, &mut arena, cfg)?;
            let sc = source.build_cell(s, &mut arena, cfg)?;
            tc.intersect_with_abs(&sc, &mut arena, cfg)
        }
        OverlapKind::Curve => {
            let mut arena = Arena::new();
            let tc = target.build_cell(t, &mut arena, cfg)?;
            let sc = source.build_cell(s, &mut arena, cfg)?;
            Ok(tc.intersect_with_abs_1d(&sc, &mut arena, cfg)?.0)
        }
        OverlapKind::Interval => {
            let (a, b) = (target.cell_points(t), source.cell_points(s));
            overlap_length_1d((a[0].x, a[1].x), (b[0].x, b[1].x), cfg)
        }
    }
}

fn assemble_row(
    kind: OverlapKind,
    source: &Mesh,
    target: &Mesh,
    t: usize,
    candidates: &[usize],
    cfg: &GeomCfg,
    print_level: usize,
) -> Result<SparseRow, RemapError> {
    let mut row = SparseRow::new();
    for &s in candidates {
        let v = cell_overlap(kind, source, s, target, t, cfg).map_err(|err| RemapError::Geometry {
            target: t,
            source: s,
            err,
        })?;
        if v != 0.0 {
            row.insert(s, v);
        }
    }
    if print_level > 0 {
        debug!(
            target_cell = t,
            candidates = candidates.len(),
            kept = row.len(),
            "row"
        );
    }
    Ok(row)
}

/// Part of a cell carrying one value: the whole cell or the dual piece at
/// one of its corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Piece {
    Cell,
    Corner(usize),
}

/// `(value index, piece)` pairs of cell `c`.
fn pieces(mesh: &Mesh, c: usize, support: Support) -> Vec<(usize, Piece)> {
    match support {
        Support::Cells => vec![(c, Piece::Cell)],
        Support::Nodes => mesh.cells()[c]
            .nodes
            .iter()
            .enumerate()
            .map(|(corner, &n)| (n, Piece::Corner(corner)))
            .collect(),
    }
}

fn build_piece(
    mesh: &Mesh,
    c: usize,
    piece: Piece,
    arena: &mut Arena,
    cfg: &GeomCfg,
) -> Result<Chain, GeomError> {
    match piece {
        Piece::Cell => mesh.build_cell(c, arena, cfg),
        Piece::Corner(corner) => Ok(mesh.build_dual_piece(c, corner, arena)),
    }
}

fn piece_overlap(
    source: &Mesh,
    s: (usize, Piece),
    target: &Mesh,
    t: (usize, Piece),
    cfg: &GeomCfg,
) -> Result<f64, GeomError> {
    let mut arena = Arena::new();
    let tc = build_piece(target, t.0, t.1, &mut arena, cfg)?;
    let sc = build_piece(source, s.0, s.1, &mut arena, cfg)?;
    tc.intersect_with_abs(&sc, &mut arena, cfg)
}

/// `(target value, source value, overlap)` triples contributed by target
/// cell `t` under a node-based pair. Surface overlaps only.
fn dual_contributions(
    method: Discretization,
    source: &Mesh,
    target: &Mesh,
    t: usize,
    candidates: &[usize],
    cfg: &GeomCfg,
) -> Result<Vec<(usize, usize, f64)>, RemapError> {
    let t_pieces = pieces(target, t, method.target());
    let mut out = Vec::new();
    for &s in candidates {
        for (sv, sp) in pieces(source, s, method.source()) {
            for &(tv, tp) in &t_pieces {
                let v = piece_overlap(source, (s, sp), target, (t, tp), cfg).map_err(|err| {
                    RemapError::Geometry {
                        target: t,
                        source: s,
                        err,
                    }
                })?;
                if v != 0.0 {
                    out.push((tv, sv, v));
                }
            }
        }
    }
    Ok(out)
}

/// Node-based pairs need linear surface cells on every node side.
fn check_discretization(
    kind: OverlapKind,
    method: Discretization,
    source: &Mesh,
    target: &Mesh,
) -> Result<(), RemapError> {
    if method == Discretization::P0P0 {
        return Ok(());
    }
    if kind != OverlapKind::Area {
        return Err(RemapError::UnsupportedDiscretization {
            method,
            reason: format!("node values need surface cells, got {kind:?} overlaps"),
        });
    }
    for (side, mesh, support) in [
        ("source", source, method.source()),
        ("target", target, method.target()),
    ] {
        if support != Support::Nodes {
            continue;
        }
        if let Some(c) = mesh.cells().iter().position(|c| c.kind.is_quadratic()) {
            return Err(RemapError::UnsupportedDiscretization {
                method,
                reason: format!("{side} cell {c} is quadratic"),
            });
        }
    }
    Ok(())
}

/// Remapper between a source and a target mesh.
///
/// `prepare` assembles `matrix[t][s]` = overlap measure of the target piece
/// carrying value `t` and the source piece carrying value `s` (cells for
/// `P0`, median-dual node pieces for `P1`); the transfer operations then
/// apply it under the selected `Nature`.
#[derive(Clone, Debug, Default)]
pub struct Remapper {
    options: RemapOptions,
    nature: Nature,
    discretization: Discretization,
    matrix: SparseMatrix,
    src_measures: Vec<f64>,
    trg_measures: Vec<f64>,
    deno: Option<Denominators>,
    prepared: bool,
}

impl Remapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RemapOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    #[inline]
    pub fn options(&self) -> &RemapOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut RemapOptions {
        &mut self.options
    }

    pub fn set_option_f64(&mut self, key: &str, value: f64) -> bool {
        self.options.set_option_f64(key, value)
    }

    pub fn set_option_usize(&mut self, key: &str, value: usize) -> bool {
        self.options.set_option_usize(key, value)
    }

    pub fn set_option_bool(&mut self, key: &str, value: bool) -> bool {
        self.options.set_option_bool(key, value)
    }

    pub fn set_option_str(&mut self, key: &str, value: &str) -> bool {
        self.options.set_option_str(key, value)
    }

    #[inline]
    pub fn nature(&self) -> Nature {
        self.nature
    }

    pub fn set_nature(&mut self, nature: Nature) {
        self.nature = nature;
    }

    /// Pair used by the last `prepare`.
    #[inline]
    pub fn discretization(&self) -> Discretization {
        self.discretization
    }

    /// Source candidates per target cell from enlarged bounding boxes.
    pub fn broad_phase(&self, source: &Mesh, target: &Mesh) -> Result<Vec<Vec<usize>>, RemapError> {
        let cfg = self.options.geom_cfg();
        let (rel, abs) = (
            self.options.bounding_box_adjustment,
            self.options.bounding_box_adjustment_abs,
        );
        let src_boxes = (0..source.n_cells())
            .map(|s| source.cell_bounds(s, &cfg).map(|b| b.enlarged(rel, abs)))
            .collect::<Result<Vec<_>, _>>()?;
        (0..target.n_cells())
            .map(|t| {
                let tb = target.cell_bounds(t, &cfg)?.enlarged(rel, abs);
                Ok(src_boxes
                    .iter()
                    .enumerate()
                    .filter(|(_, sb)| sb.am_i_intersecting_with(&tb).is_some())
                    .map(|(s, _)| s)
                    .collect())
            })
            .collect()
    }

    /// Builds the interpolation matrix using the built-in broad phase.
    pub fn prepare(
        &mut self,
        source: &Mesh,
        target: &Mesh,
        method: Discretization,
    ) -> Result<(), RemapError> {
        let kind = OverlapKind::select(source, target)?;
        check_discretization(kind, method, source, target)?;
        let candidates = self.broad_phase(source, target)?;
        self.prepare_with_candidates(source, target, method, &candidates)
    }

    /// Builds the interpolation matrix from caller-supplied candidates
    /// (`candidates[t]` = source cells possibly overlapping target cell `t`).
    /// The list must be a superset of the true overlaps.
    pub fn prepare_with_candidates(
        &mut self,
        source: &Mesh,
        target: &Mesh,
        method: Discretization,
        candidates: &[Vec<usize>],
    ) -> Result<(), RemapError> {
        let kind = OverlapKind::select(source, target)?;
        check_discretization(kind, method, source, target)?;
        if candidates.len() != target.n_cells() {
            return Err(RemapError::InvalidCandidates {
                reason: format!(
                    "{} candidate lists for {} target cells",
                    candidates.len(),
                    target.n_cells()
                ),
            });
        }
        if let Some(bad) = candidates.iter().flatten().find(|&&s| s >= source.n_cells()) {
            return Err(RemapError::InvalidCandidates {
                reason: format!("source cell {bad} out of range"),
            });
        }
        self.prepared = false;
        self.deno = None;
        let cfg = self.options.geom_cfg();
        let print_level = self.options.print_level;
        let parallel = self.options.parallel;
        let rows = if method == Discretization::P0P0 {
            let row = |t: usize| assemble_row(kind, source, target, t, &candidates[t], &cfg, print_level);
            if parallel {
                (0..target.n_cells())
                    .into_par_iter()
                    .map(row)
                    .collect::<Result<Vec<_>, _>>()?
            } else {
                (0..target.n_cells()).map(row).collect::<Result<Vec<_>, _>>()?
            }
        } else {
            let cell = |t: usize| dual_contributions(method, source, target, t, &candidates[t], &cfg);
            let per_cell: Vec<Vec<(usize, usize, f64)>> = if parallel {
                (0..target.n_cells())
                    .into_par_iter()
                    .map(cell)
                    .collect::<Result<_, _>>()?
            } else {
                (0..target.n_cells()).map(cell).collect::<Result<_, _>>()?
            };
            let n_rows = match method.target() {
                Support::Cells => target.n_cells(),
                Support::Nodes => target.n_nodes(),
            };
            let mut rows = vec![SparseRow::new(); n_rows];
            for (t, s, v) in per_cell.into_iter().flatten() {
                *rows[t].entry(s).or_insert(0.0) += v;
            }
            rows
        };
        let abs = self.options.measure_abs;
        let (n_cols, src_measures) = match method.source() {
            Support::Cells => (source.n_cells(), source.measures(&cfg, abs)?),
            Support::Nodes => (source.n_nodes(), source.node_measures(abs)),
        };
        self.trg_measures = match method.target() {
            Support::Cells => target.measures(&cfg, abs)?,
            Support::Nodes => target.node_measures(abs),
        };
        self.matrix = SparseMatrix::from_rows(rows, n_cols);
        self.src_measures = src_measures;
        self.discretization = method;
        self.prepared = true;
        info!(
            kind = ?kind,
            method = %method,
            rows = self.matrix.n_rows(),
            cols = self.matrix.n_cols(),
            nnz = self.matrix.nnz(),
            "prepare"
        );
        Ok(())
    }

    #[inline]
    pub fn matrix(&self) -> &SparseMatrix {
        &self.matrix
    }

    #[inline]
    pub fn number_of_rows(&self) -> usize {
        self.matrix.n_rows()
    }

    #[inline]
    pub fn number_of_columns(&self) -> usize {
        self.matrix.n_cols()
    }

    pub fn sum_per_column(&self) -> Vec<f64> {
        self.matrix.col_sums()
    }

    /// Source-major copy of the matrix.
    pub fn reverse_matrix(&self) -> SparseMatrix {
        self.matrix.transpose()
    }

    /// Measures of the source values (cells or node dual areas) recorded by
    /// the last `prepare`.
    pub fn source_measures(&self) -> &[f64] {
        &self.src_measures
    }

    pub fn target_measures(&self) -> &[f64] {
        &self.trg_measures
    }

    /// Recomputes the cached denominators when `nature` changed.
    fn refresh_denominators(&mut self, nature: Nature) -> Result<(), RemapError> {
        if !self.prepared {
            return Err(RemapError::NotPrepared);
        }
        let deno = match self.deno.take() {
            Some(d) if d.nature == nature => d,
            _ => Denominators::compute(nature, &self.matrix, &self.src_measures, &self.trg_measures)?,
        };
        self.deno = Some(deno);
        Ok(())
    }

    fn check_len(values: &[f64], n_tuples: usize, n_components: usize) -> Result<(), RemapError> {
        let expected = n_tuples * n_components;
        if n_components == 0 || values.len() != expected {
            return Err(RemapError::FieldMismatch {
                expected,
                got: values.len(),
            });
        }
        Ok(())
    }

    /// Writes the forward product into `out`; rows without overlap are left
    /// untouched and their indices returned.
    fn forward_product(
        &mut self,
        nature: Nature,
        src: &[f64],
        n_components: usize,
        out: &mut [f64],
    ) -> Result<Vec<usize>, RemapError> {
        let nc = n_components;
        self.refresh_denominators(nature)?;
        Self::check_len(src, self.matrix.n_cols(), nc)?;
        Self::check_len(out, self.matrix.n_rows(), nc)?;
        let Some(deno) = self.deno.as_ref().map(|d| &d.forward) else {
            return Err(RemapError::NotPrepared);
        };
        let mut empty = Vec::new();
        for (t, row) in self.matrix.rows().iter().enumerate() {
            if row.is_empty() {
                empty.push(t);
                continue;
            }
            let dst = &mut out[t * nc..(t + 1) * nc];
            dst.fill(0.0);
            for (&s, &v) in row {
                let w = v / deno[t][&s];
                for (d, x) in dst.iter_mut().zip(&src[s * nc..(s + 1) * nc]) {
                    *d += w * x;
                }
            }
        }
        Ok(empty)
    }

    /// `target[t] = Σ_s matrix[t][s] * source[s] / deno[t][s]` with the
    /// current nature; uncovered target cells get `default`.
    pub fn transfer(
        &mut self,
        src: &[f64],
        n_components: usize,
        default: f64,
    ) -> Result<Vec<f64>, RemapError> {
        let mut out = vec![default; self.matrix.n_rows() * n_components];
        let empty = self.forward_product(self.nature, src, n_components, &mut out)?;
        info!(nature = %self.nature, uncovered = empty.len(), "transfer");
        Ok(out)
    }

    /// Like `transfer`, but uncovered target cells keep their value in `target`.
    pub fn partial_transfer(
        &mut self,
        src: &[f64],
        n_components: usize,
        target: &mut [f64],
    ) -> Result<(), RemapError> {
        let empty = self.forward_product(self.nature, src, n_components, target)?;
        info!(nature = %self.nature, kept = empty.len(), "partial transfer");
        Ok(())
    }

    fn reverse_product(
        &mut self,
        nature: Nature,
        trg: &[f64],
        n_components: usize,
        default: f64,
    ) -> Result<Vec<f64>, RemapError> {
        let nc = n_components;
        self.refresh_denominators(nature)?;
        Self::check_len(trg, self.matrix.n_rows(), nc)?;
        let Some(deno) = self.deno.as_ref().map(|d| &d.reverse) else {
            return Err(RemapError::NotPrepared);
        };
        let n_src = self.matrix.n_cols();
        let mut out = vec![0.0; n_src * nc];
        let mut reached = vec![false; n_src];
        for (t, s, v) in self.matrix.iter() {
            reached[s] = true;
            let w = v / deno[s][&t];
            for (d, x) in out[s * nc..(s + 1) * nc].iter_mut().zip(&trg[t * nc..(t + 1) * nc]) {
                *d += w * x;
            }
        }
        for (s, _) in reached.iter().enumerate().filter(|(_, r)| !**r) {
            out[s * nc..(s + 1) * nc].fill(default);
        }
        Ok(out)
    }

    /// Transposed product, target values back onto the source cells;
    /// unreached source cells get `default`.
    pub fn reverse_transfer(
        &mut self,
        trg: &[f64],
        n_components: usize,
        default: f64,
    ) -> Result<Vec<f64>, RemapError> {
        let out = self.reverse_product(self.nature, trg, n_components, default)?;
        info!(nature = %self.nature, "reverse transfer");
        Ok(out)
    }

    /// Transfers a source field with its own nature; the result carries the
    /// same nature.
    pub fn transfer_field(&mut self, src: &Field, default: f64) -> Result<Field, RemapError> {
        let nc = src.n_components;
        let mut out = vec![default; self.matrix.n_rows() * nc];
        self.forward_product(src.nature, &src.values, nc, &mut out)?;
        Ok(Field {
            nature: src.nature,
            n_components: nc,
            values: out,
        })
    }

    pub fn reverse_transfer_field(&mut self, trg: &Field, default: f64) -> Result<Field, RemapError> {
        let values = self.reverse_product(trg.nature, &trg.values, trg.n_components, default)?;
        Ok(Field {
            nature: trg.nature,
            n_components: trg.n_components,
            values,
        })
    }
}
