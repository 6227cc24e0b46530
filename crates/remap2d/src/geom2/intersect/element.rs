//! Isolated intersection points between two curves.

use nalgebra::Vector2;

use crate::geom2::curve::CurveGeom;
use crate::geom2::node::{NodeId, NodeLoc};

/// Outcome of the "extremity of one curve, interior of the other" test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Limit {
    /// The point is not an extremity of exactly one curve.
    None,
    /// Extremity of one curve, outside the other: dropped.
    Alone,
    /// Extremity of one curve, inside the other: kept on that extremity node.
    On,
}

/// One crossing point, with the parameter of the point on each curve and the
/// endpoint coincidence flags. Flags and values are always stored in the
/// caller's curve order (first, second).
#[derive(Clone, Copy, Debug)]
pub struct IntersectElement {
    pub val1: f64,
    pub val2: f64,
    pub start1: bool,
    pub end1: bool,
    pub start2: bool,
    pub end2: bool,
    pub pos: Vector2<f64>,
    /// Classification of the point at creation (`On` or `OnTangent`).
    pub loc: NodeLoc,
    /// Existing arena node this point was snapped to, if any.
    pub node: Option<NodeId>,
}

/// Endpoint coincidence flags `(start1, end1, start2, end2)`.
pub type Flags = (bool, bool, bool, bool);

impl IntersectElement {
    /// Builds an element from values computed in intersector order; when
    /// `keep_order` is false the intersector's curves are the caller's curves
    /// swapped, and the element is stored swapped back.
    pub fn new(
        val1: f64,
        val2: f64,
        flags: Flags,
        pos: Vector2<f64>,
        loc: NodeLoc,
        keep_order: bool,
    ) -> Self {
        let (s1, e1, s2, e2) = flags;
        if keep_order {
            Self {
                val1,
                val2,
                start1: s1,
                end1: e1,
                start2: s2,
                end2: e2,
                pos,
                loc,
                node: None,
            }
        } else {
            Self {
                val1: val2,
                val2: val1,
                start1: s2,
                end1: e2,
                start2: s1,
                end2: e1,
                pos,
                loc,
                node: None,
            }
        }
    }

    #[inline]
    pub fn is_on_merged_extremity(&self) -> bool {
        (self.start1 || self.end1) && (self.start2 || self.end2)
    }

    #[inline]
    pub fn is_included_by_both(&self, g1: &CurveGeom, g2: &CurveGeom) -> bool {
        g1.is_in(self.val1) && g2.is_in(self.val2)
    }

    /// Classifies a point lying on an extremity of exactly one curve and
    /// snaps it to that extremity node.
    pub fn limit(
        &mut self,
        g1: &CurveGeom,
        g2: &CurveGeom,
        first_ends: (NodeId, NodeId),
        second_ends: (NodeId, NodeId),
    ) -> Limit {
        let on_first = self.start1 || self.end1;
        let on_second = self.start2 || self.end2;
        if on_first && !on_second {
            self.node = Some(if self.start1 { first_ends.0 } else { first_ends.1 });
            return if g2.is_in(self.val2) {
                Limit::On
            } else {
                Limit::Alone
            };
        }
        if on_second && !on_first {
            self.node = Some(if self.start2 { second_ends.0 } else { second_ends.1 });
            return if g1.is_in(self.val1) {
                Limit::On
            } else {
                Limit::Alone
            };
        }
        Limit::None
    }
}
