//! Arc / line intersector (also used for the classification ray).
//!
//! Intersects the line carrying the segment with the full circle and lets the
//! generic filter discard points outside either curve.

use nalgebra::Vector2;

use super::element::IntersectElement;
use crate::geom2::cfg::GeomCfg;
use crate::geom2::curve::{ArcData, CurveGeom};
use crate::geom2::node::{positions_equal, NodeLoc};
use crate::geom2::num::{safe_sqrt, sign};

#[derive(Clone, Copy, Debug)]
pub struct ArcSegIntersector {
    arc_geom: CurveGeom,
    arc: ArcData,
    seg: CurveGeom,
    /// True when the arc is the caller's first curve.
    arc_first: bool,
    prec: f64,
    dx: f64,
    dy: f64,
    dr_sq: f64,
    cross: f64,
    determinant: f64,
}

impl ArcSegIntersector {
    pub fn new(
        arc_geom: CurveGeom,
        arc: ArcData,
        seg: CurveGeom,
        arc_first: bool,
        cfg: &GeomCfg,
    ) -> Self {
        let dx = seg.end.x - seg.start.x;
        let dy = seg.end.y - seg.start.y;
        let dr_sq = dx * dx + dy * dy;
        let c = arc.center;
        let cross = (seg.start.x - c.x) * (seg.end.y - c.y) - (seg.start.y - c.y) * (seg.end.x - c.x);
        let determinant = arc.radius * arc.radius / dr_sq - cross * cross / (dr_sq * dr_sq);
        Self {
            arc_geom,
            arc,
            seg,
            arc_first,
            prec: cfg.precision,
            dx,
            dy,
            dr_sq,
            cross,
            determinant,
        }
    }

    /// A line never overlaps a circle; the only decision is whether the
    /// carrying line misses the circle.
    pub fn are_overlapped_or_only_colinears(&self) -> (bool, bool) {
        (self.determinant <= -2.0 * self.prec, false)
    }

    fn element(&self, p: Vector2<f64>, loc: NodeLoc) -> IntersectElement {
        let flags = (
            positions_equal(self.arc_geom.start, p, self.prec),
            positions_equal(self.arc_geom.end, p, self.prec),
            positions_equal(self.seg.start, p, self.prec),
            positions_equal(self.seg.end, p, self.prec),
        );
        IntersectElement::new(
            self.arc_geom.charact_value(p),
            self.seg.charact_value(p),
            flags,
            p,
            loc,
            self.arc_first,
        )
    }

    pub fn intersections(&self) -> Vec<IntersectElement> {
        let c = self.arc.center;
        let foot = Vector2::new(
            self.cross * self.dy / self.dr_sq,
            -self.cross * self.dx / self.dr_sq,
        );
        if self.determinant.abs() >= 2.0 * self.prec {
            let sd = safe_sqrt(self.determinant);
            let offset = Vector2::new(sign(self.dy) * self.dx * sd, self.dy.abs() * sd);
            vec![
                self.element(c + foot + offset, NodeLoc::On),
                self.element(c + foot - offset, NodeLoc::On),
            ]
        } else {
            vec![self.element(c + foot, NodeLoc::OnTangent)]
        }
    }
}
