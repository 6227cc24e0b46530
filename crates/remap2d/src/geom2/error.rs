use std::fmt;

use super::curve::CurveKind;

/// Errors surfaced by the geometric kernel. Numerical degeneracies are never
/// reported here; they are resolved by merging or colinearity decisions.
#[derive(Debug, Clone, PartialEq)]
pub enum GeomError {
    /// No intersector exists for this ordered pair of curve kinds.
    UnsupportedCurvePair { first: CurveKind, second: CurveKind },
    /// The overlap placement pair has no splitting recipe.
    UnreachedSplitCode { code: u8 },
    /// An intersector reported success but produced no point.
    EmptyIntersection,
    /// A chain could not be closed (last end differs from first start).
    NotClosed,
    /// Two split polygons do not share the node required to close a result.
    IncompatiblePolygons { reason: String },
    /// A polygon or curve could not be built from the given points.
    InvalidInput { reason: String },
}

impl GeomError {
    pub(crate) fn incompatible(reason: impl Into<String>) -> Self {
        Self::IncompatiblePolygons {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GeomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeomError::UnsupportedCurvePair { first, second } => {
                write!(f, "unsupported pair of curve kinds ({first:?}, {second:?})")
            }
            GeomError::UnreachedSplitCode { code } => {
                write!(f, "internal error: unreached overlap split code {code}")
            }
            GeomError::EmptyIntersection => {
                write!(f, "internal error: intersector reported success without points")
            }
            GeomError::NotClosed => write!(f, "chain is not closed"),
            GeomError::IncompatiblePolygons { reason } => {
                write!(f, "polygons incompatible with each other: {reason}")
            }
            GeomError::InvalidInput { reason } => write!(f, "invalid geometry input: {reason}"),
        }
    }
}

impl std::error::Error for GeomError {}
