//! Conservation policies and the denominators they induce.
//!
//! The matrix is assembled once; the policy only decides what each
//! coefficient is divided by before the product.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::RemapError;
use super::matrix::SparseMatrix;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Nature {
    #[default]
    NoNature,
    /// Coverage-weighted average (row sums).
    IntensiveMaximum,
    /// Extensive quantity spread by source cell measure.
    ExtensiveMaximum,
    /// Extensive quantity exactly conserved (column sums).
    ExtensiveConservation,
    /// Intensive quantity averaged by target cell measure.
    IntensiveConservation,
}

impl Nature {
    pub fn as_str(self) -> &'static str {
        match self {
            Nature::NoNature => "NoNature",
            Nature::IntensiveMaximum => "IntensiveMaximum",
            Nature::ExtensiveMaximum => "ExtensiveMaximum",
            Nature::ExtensiveConservation => "ExtensiveConservation",
            Nature::IntensiveConservation => "IntensiveConservation",
        }
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Nature {
    type Err = RemapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NoNature" => Ok(Nature::NoNature),
            "IntensiveMaximum" => Ok(Nature::IntensiveMaximum),
            "ExtensiveMaximum" => Ok(Nature::ExtensiveMaximum),
            "ExtensiveConservation" => Ok(Nature::ExtensiveConservation),
            "IntensiveConservation" => Ok(Nature::IntensiveConservation),
            _ => Err(RemapError::UnknownNature { name: s.to_string() }),
        }
    }
}

/// Per-coefficient divisors: `forward[t][s]` for target-from-source products
/// and `reverse[s][t]` for the transposed product.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Denominators {
    pub nature: Nature,
    pub forward: Vec<BTreeMap<usize, f64>>,
    pub reverse: Vec<BTreeMap<usize, f64>>,
}

impl Denominators {
    /// `src_measure`/`trg_measure` are only read by the measure-based natures.
    pub fn compute(
        nature: Nature,
        matrix: &SparseMatrix,
        src_measure: &[f64],
        trg_measure: &[f64],
    ) -> Result<Self, RemapError> {
        if nature == Nature::NoNature {
            return Err(RemapError::NoNature);
        }
        let rows = matrix.row_sums();
        let cols = matrix.col_sums();
        let mut forward = vec![BTreeMap::new(); matrix.n_rows()];
        let mut reverse = vec![BTreeMap::new(); matrix.n_cols()];
        for (t, s, _) in matrix.iter() {
            let (fwd, rev) = match nature {
                Nature::NoNature | Nature::IntensiveMaximum => (rows[t], cols[s]),
                Nature::ExtensiveMaximum => (src_measure[s], trg_measure[t]),
                Nature::ExtensiveConservation => (cols[s], rows[t]),
                Nature::IntensiveConservation => (trg_measure[t], src_measure[s]),
            };
            forward[t].insert(s, fwd);
            reverse[s].insert(t, rev);
        }
        Ok(Self {
            nature,
            forward,
            reverse,
        })
    }
}
