//! Remap case files.
//!
//! A case is one JSON document holding both meshes, the source field, its
//! nature, the discretization pair and engine options. Running it yields a small JSON outcome plus the
//! sparse interpolation matrix, written as a `(target, source, value)` CSV.

use anyhow::{Context, Result};
use polars::prelude::*;
use remap2d::api::{
    linear_field, perturbed_grid, Cell, CellKind, Discretization, Field, GridGenCfg, GridReplay,
    Mesh, Nature, Remapper, SparseMatrix,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellSpec {
    pub kind: String,
    pub nodes: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshSpec {
    pub space_dim: usize,
    pub coords: Vec<f64>,
    pub cells: Vec<CellSpec>,
}

impl MeshSpec {
    pub fn to_mesh(&self) -> Result<Mesh> {
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let kind = CellKind::parse(&c.kind)
                    .with_context(|| format!("cell {i}: unknown kind {:?}", c.kind))?;
                Ok(Cell::new(kind, c.nodes.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Mesh::new(self.space_dim, self.coords.clone(), cells)?)
    }

    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self {
            space_dim: mesh.space_dim(),
            coords: mesh.coords().to_vec(),
            cells: mesh
                .cells()
                .iter()
                .map(|c| CellSpec {
                    kind: c.kind.as_str().to_string(),
                    nodes: c.nodes.clone(),
                })
                .collect(),
        }
    }
}

fn one() -> usize {
    1
}

fn cell_to_cell() -> String {
    Discretization::P0P0.to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemapCase {
    pub source: MeshSpec,
    pub target: MeshSpec,
    pub nature: String,
    /// Discretization pair, e.g. `P0P0` or `P1P0`.
    #[serde(default = "cell_to_cell")]
    pub method: String,
    #[serde(default = "one")]
    pub n_components: usize,
    /// Source values, row-major `n_values x n_components` (cells or nodes).
    pub values: Vec<f64>,
    /// Value given to target values no source piece overlaps.
    #[serde(default)]
    pub default: f64,
    /// Engine options by key, e.g. `{"Precision": 1e-12, "Parallel": false}`.
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemapOutcome {
    pub nature: String,
    pub method: String,
    pub n_components: usize,
    pub values: Vec<f64>,
    pub rows: usize,
    pub cols: usize,
    pub nnz: usize,
    pub matrix_sum: f64,
    /// Target values without any overlapping source piece.
    pub uncovered: Vec<usize>,
}

/// Forwards JSON options to the engine setters; returns the keys it ignored.
pub fn apply_options(r: &mut Remapper, options: &BTreeMap<String, Value>) -> Vec<String> {
    let mut ignored = Vec::new();
    for (key, v) in options {
        let known = match v {
            Value::Bool(b) => r.set_option_bool(key, *b),
            Value::String(s) => r.set_option_str(key, s),
            Value::Number(n) => {
                n.as_u64().is_some_and(|u| r.set_option_usize(key, u as usize))
                    || n.as_f64().is_some_and(|x| r.set_option_f64(key, x))
            }
            _ => false,
        };
        if !known {
            tracing::warn!(key = key.as_str(), value = %v, "ignored option");
            ignored.push(key.clone());
        }
    }
    ignored
}

pub fn run_case(case: &RemapCase) -> Result<(RemapOutcome, SparseMatrix)> {
    let nature: Nature = case.nature.parse()?;
    let method: Discretization = case.method.parse()?;
    let source = case.source.to_mesh().context("source mesh")?;
    let target = case.target.to_mesh().context("target mesh")?;
    let field = Field::new(nature, case.n_components, case.values.clone())?;

    let mut r = Remapper::new();
    apply_options(&mut r, &case.options);
    r.prepare(&source, &target, method)?;
    let out = r.transfer_field(&field, case.default)?;

    let m = r.matrix();
    let uncovered = m
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_empty())
        .map(|(t, _)| t)
        .collect();
    let outcome = RemapOutcome {
        nature: nature.to_string(),
        method: method.to_string(),
        n_components: out.n_components,
        values: out.values,
        rows: m.n_rows(),
        cols: m.n_cols(),
        nnz: m.nnz(),
        matrix_sum: m.sum(),
        uncovered,
    };
    Ok((outcome, m.clone()))
}

pub fn matrix_frame(m: &SparseMatrix) -> PolarsResult<DataFrame> {
    let n = m.nnz();
    let (mut t, mut s, mut v) = (
        Vec::<u64>::with_capacity(n),
        Vec::<u64>::with_capacity(n),
        Vec::<f64>::with_capacity(n),
    );
    for (i, j, x) in m.iter() {
        t.push(i as u64);
        s.push(j as u64);
        v.push(x);
    }
    df!("target" => t, "source" => s, "value" => v)
}

pub fn write_matrix_csv(m: &SparseMatrix, path: &Path) -> Result<()> {
    let mut df = matrix_frame(m)?;
    let mut file =
        fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    Ok(())
}

/// Perturbed quad grid onto a finer perturbed triangle grid over the unit
/// square, carrying the linear field `1 + x + 2y`.
pub fn gen_case(nx: usize, ny: usize, jitter: f64, seed: u64) -> Result<RemapCase> {
    let src_cfg = GridGenCfg {
        nx,
        ny,
        jitter,
        ..GridGenCfg::default()
    };
    let trg_cfg = GridGenCfg {
        nx: nx + 1,
        ny: ny + 1,
        triangles: true,
        ..src_cfg
    };
    let source = perturbed_grid(src_cfg, GridReplay::new(seed))?;
    let target = perturbed_grid(trg_cfg, GridReplay { seed, index: 1 })?;
    Ok(RemapCase {
        values: linear_field(&source, 1.0, 1.0, 2.0),
        source: MeshSpec::from_mesh(&source),
        target: MeshSpec::from_mesh(&target),
        nature: Nature::IntensiveMaximum.to_string(),
        method: cell_to_cell(),
        n_components: 1,
        default: 0.0,
        options: BTreeMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn reference_case(nature: &str) -> RemapCase {
        serde_json::from_value(json!({
            "source": {
                "space_dim": 2,
                "coords": [-0.3, -0.3, 0.7, -0.3, -0.3, 0.7, 0.7, 0.7],
                "cells": [
                    {"kind": "Tri3", "nodes": [0, 3, 1]},
                    {"kind": "Tri3", "nodes": [0, 2, 3]}
                ]
            },
            "target": {
                "space_dim": 2,
                "coords": [-0.3, -0.3, 0.2, -0.3, 0.7, -0.3, -0.3, 0.2, 0.2, 0.2,
                           0.7, 0.2, -0.3, 0.7, 0.2, 0.7, 0.7, 0.7],
                "cells": [
                    {"kind": "Quad4", "nodes": [0, 3, 4, 1]},
                    {"kind": "Tri3", "nodes": [1, 4, 2]},
                    {"kind": "Tri3", "nodes": [4, 5, 2]},
                    {"kind": "Quad4", "nodes": [6, 7, 4, 3]},
                    {"kind": "Quad4", "nodes": [7, 8, 5, 4]}
                ]
            },
            "nature": nature,
            "values": [7.0, 8.0],
            "options": {"Parallel": false}
        }))
        .unwrap()
    }

    #[test]
    fn reference_case_runs() {
        let (out, m) = run_case(&reference_case("IntensiveMaximum")).unwrap();
        let expected = [7.5, 7.0, 7.0, 8.0, 7.5];
        assert!(out.values.iter().zip(expected).all(|(a, b)| (a - b).abs() < 1e-12));
        assert_eq!((out.rows, out.cols), (5, 2));
        assert!((out.matrix_sum - 1.0).abs() < 1e-12);
        assert!(out.uncovered.is_empty());
        assert_eq!(m.nnz(), out.nnz);
        assert_eq!(out.n_components, 1);
        assert_eq!(out.nature, "IntensiveMaximum");
        assert_eq!(out.method, "P0P0");
    }

    #[test]
    fn node_source_values() {
        let mut case = reference_case("IntensiveMaximum");
        case.method = "P1P0".into();
        case.values = vec![7.0, 8.0, 9.0, 10.0];
        let (out, _) = run_case(&case).unwrap();
        assert_eq!((out.rows, out.cols), (5, 4));
        assert_eq!(out.method, "P1P0");
        let expected = [7.0, 7.666666666666667, 8.666666666666666, 8.833333333333334, 10.0];
        assert!(out.values.iter().zip(expected).all(|(a, b)| (a - b).abs() < 1e-12));
        case.method = "P2P0".into();
        let err = run_case(&case).unwrap_err();
        assert!(format!("{err:#}").contains("P2P0"));
    }

    #[test]
    fn bad_cases_are_reported() {
        assert!(run_case(&reference_case("Bogus")).is_err());
        let mut case = reference_case("IntensiveMaximum");
        case.source.cells[0].kind = "Hexa8".into();
        let err = run_case(&case).unwrap_err();
        assert!(format!("{err:#}").contains("Hexa8"));
        let mut case = reference_case("IntensiveMaximum");
        case.values.pop();
        assert!(run_case(&case).is_err());
    }

    #[test]
    fn options_are_forwarded() {
        let mut r = Remapper::new();
        let opts: BTreeMap<String, Value> = serde_json::from_value(json!({
            "Precision": 1e-10,
            "PrintLevel": 1,
            "MeasureAbs": false,
            "IntersectionRobustness": "Tolerant",
            "Nonsense": 3
        }))
        .unwrap();
        let ignored = apply_options(&mut r, &opts);
        assert_eq!(ignored, vec!["Nonsense".to_string()]);
        assert_eq!(r.options().precision, 1e-10);
        assert_eq!(r.options().print_level, 1);
        assert!(!r.options().measure_abs);
    }

    #[test]
    fn generated_case_covers_the_target() {
        let case = gen_case(3, 2, 0.2, 5).unwrap();
        assert_eq!(case.source.cells.len(), 6);
        assert_eq!(case.target.cells.len(), 24);
        let text = serde_json::to_string(&case).unwrap();
        let back: RemapCase = serde_json::from_str(&text).unwrap();
        assert_eq!(back, case);
        let (out, _) = run_case(&case).unwrap();
        assert!(out.uncovered.is_empty());
        assert!((out.matrix_sum - 1.0).abs() < 1e-10);
        // Intensive averages stay within the source range.
        let (lo, hi) = case
            .values
            .iter()
            .fold((f64::MAX, f64::MIN), |(l, h), &v| (l.min(v), h.max(v)));
        assert!(out.values.iter().all(|&v| v >= lo - 1e-12 && v <= hi + 1e-12));
    }

    #[test]
    fn matrix_csv_has_one_line_per_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("matrix.csv");
        let (_, m) = run_case(&reference_case("ExtensiveConservation")).unwrap();
        write_matrix_csv(&m, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("target,source,value"));
        assert_eq!(lines.count(), m.nnz());
    }
}
