//! Row-major sparse matrix: one ordered map per target value.

use std::collections::BTreeMap;

pub type SparseRow = BTreeMap<usize, f64>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseMatrix {
    rows: Vec<SparseRow>,
    n_cols: usize,
}

impl SparseMatrix {
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            rows: vec![SparseRow::new(); n_rows],
            n_cols,
        }
    }

    /// Column indices must be `< n_cols`.
    pub fn from_rows(rows: Vec<SparseRow>, n_cols: usize) -> Self {
        debug_assert!(rows.iter().all(|r| r.keys().all(|&j| j < n_cols)));
        Self { rows, n_cols }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    #[inline]
    pub fn row(&self, i: usize) -> &SparseRow {
        &self.rows[i]
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.rows.get(i).and_then(|r| r.get(&j).copied())
    }

    /// Adds `v` to entry `(i, j)`.
    pub fn add(&mut self, i: usize, j: usize, v: f64) {
        *self.rows[i].entry(j).or_insert(0.0) += v;
    }

    /// Number of stored coefficients.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(BTreeMap::is_empty)
    }

    /// `(row, col, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(i, r)| r.iter().map(move |(&j, &v)| (i, j, v)))
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.values().sum()).collect()
    }

    pub fn col_sums(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.n_cols];
        for (_, j, v) in self.iter() {
            out[j] += v;
        }
        out
    }

    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, _, v)| v).sum()
    }

    pub fn transpose(&self) -> SparseMatrix {
        let mut out = SparseMatrix::new(self.n_cols, self.n_rows());
        for (i, j, v) in self.iter() {
            out.rows[j].insert(i, v);
        }
        out
    }
}
