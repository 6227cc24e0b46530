use std::fmt;

use super::discretization::Discretization;
use crate::geom2::GeomError;

/// Errors of the remapping engine. Kernel failures carry the cell pair being
/// intersected when they occur.
#[derive(Debug, Clone, PartialEq)]
pub enum RemapError {
    /// Source and target live in spaces of different dimension.
    IncoherentSpaceDim { source: usize, target: usize },
    /// No overlap computation exists for this space/mesh dimension triple.
    NoInterpolation {
        space_dim: usize,
        source_dim: usize,
        target_dim: usize,
    },
    /// Malformed mesh (bad connectivity, mixed cell dimensions, ...).
    InvalidMesh { reason: String },
    /// `transfer` family called before `prepare`.
    NotPrepared,
    /// No conservation policy selected.
    NoNature,
    /// Policy name not recognised.
    UnknownNature { name: String },
    /// Discretization pair name not recognised.
    UnknownDiscretization { name: String },
    /// Discretization pair not available for these meshes.
    UnsupportedDiscretization {
        method: Discretization,
        reason: String,
    },
    /// Field values do not match the mesh/component layout.
    FieldMismatch { expected: usize, got: usize },
    /// Field values and component count are inconsistent.
    InvalidField { reason: String },
    /// Candidate lists do not match the meshes.
    InvalidCandidates { reason: String },
    /// Kernel failure while intersecting target cell `target` with source cell `source`.
    Geometry {
        target: usize,
        source: usize,
        err: GeomError,
    },
    /// Kernel failure while building or measuring a single cell.
    Cell { cell: usize, err: GeomError },
}

impl RemapError {
    pub(crate) fn invalid_mesh(reason: impl Into<String>) -> Self {
        Self::InvalidMesh {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RemapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemapError::IncoherentSpaceDim { source, target } => write!(
                f,
                "incoherent space dimension between source ({source}) and target ({target})"
            ),
            RemapError::NoInterpolation {
                space_dim,
                source_dim,
                target_dim,
            } => write!(
                f,
                "no interpolation available for space dim {space_dim}, source mesh dim {source_dim}, target mesh dim {target_dim}"
            ),
            RemapError::InvalidMesh { reason } => write!(f, "invalid mesh: {reason}"),
            RemapError::NotPrepared => write!(f, "transfer requested before prepare"),
            RemapError::NoNature => write!(f, "no nature specified, select one"),
            RemapError::UnknownNature { name } => write!(f, "unknown nature '{name}'"),
            RemapError::UnknownDiscretization { name } => {
                write!(f, "unknown discretization pair '{name}'")
            }
            RemapError::UnsupportedDiscretization { method, reason } => {
                write!(f, "{method} not available: {reason}")
            }
            RemapError::FieldMismatch { expected, got } => {
                write!(f, "field has {got} values, expected {expected}")
            }
            RemapError::InvalidField { reason } => write!(f, "invalid field: {reason}"),
            RemapError::InvalidCandidates { reason } => write!(f, "invalid candidates: {reason}"),
            RemapError::Geometry {
                target,
                source,
                err,
            } => write!(f, "target cell {target} x source cell {source}: {err}"),
            RemapError::Cell { cell, err } => write!(f, "cell {cell}: {err}"),
        }
    }
}

impl std::error::Error for RemapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RemapError::Geometry { err, .. } | RemapError::Cell { err, .. } => Some(err),
            _ => None,
        }
    }
}
