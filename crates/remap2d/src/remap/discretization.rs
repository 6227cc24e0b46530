//! Where field values live on each side of a remap.
//!
//! `P0` values are carried by cells, `P1` values by nodes. A node carries the
//! median-dual pieces of its cells: corner, the two adjacent edge midpoints
//! and the cell barycenter.

use std::fmt;
use std::str::FromStr;

use super::error::RemapError;

/// Value carrier of one side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Support {
    #[default]
    Cells,
    Nodes,
}

/// Source/target discretization pair, named source first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Discretization {
    #[default]
    P0P0,
    P0P1,
    P1P0,
    P1P1,
}

impl Discretization {
    pub fn as_str(self) -> &'static str {
        match self {
            Discretization::P0P0 => "P0P0",
            Discretization::P0P1 => "P0P1",
            Discretization::P1P0 => "P1P0",
            Discretization::P1P1 => "P1P1",
        }
    }

    #[inline]
    pub fn source(self) -> Support {
        match self {
            Discretization::P0P0 | Discretization::P0P1 => Support::Cells,
            Discretization::P1P0 | Discretization::P1P1 => Support::Nodes,
        }
    }

    #[inline]
    pub fn target(self) -> Support {
        match self {
            Discretization::P0P0 | Discretization::P1P0 => Support::Cells,
            Discretization::P0P1 | Discretization::P1P1 => Support::Nodes,
        }
    }
}

impl fmt::Display for Discretization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Discretization {
    type Err = RemapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P0P0" => Ok(Discretization::P0P0),
            "P0P1" => Ok(Discretization::P0P1),
            "P1P0" => Ok(Discretization::P1P0),
            "P1P1" => Ok(Discretization::P1P1),
            _ => Err(RemapError::UnknownDiscretization { name: s.to_string() }),
        }
    }
}
