//! Line / line intersector.
//!
//! Works on the 2x2 system `s1 + t (e1 - s1) = s2 + u (e2 - s2)`. The
//! colinearity thresholds are scaled by both segments' characteristic
//! dimensions so that the decision does not depend on the absolute size of
//! the input.

use nalgebra::Vector2;

use super::element::IntersectElement;
use super::Placement;
use crate::geom2::cfg::GeomCfg;
use crate::geom2::curve::CurveGeom;
use crate::geom2::node::{positions_equal, NodeLoc};

/// Relative colinearity test used to tell lines from arcs.
pub fn are_colinears(g1: &CurveGeom, g2: &CurveGeom, cfg: &GeomCfg) -> bool {
    let ix = SegSegIntersector::new(*g1, *g2, cfg);
    ix.determinant().abs() < cfg.arc_detection_precision * ix.scale()
}

#[derive(Clone, Copy, Debug)]
pub struct SegSegIntersector {
    g1: CurveGeom,
    g2: CurveGeom,
    prec: f64,
    m: [f64; 4],
    col: [f64; 2],
    /// Coordinate used to parameterize `g1` when locating points on it.
    ind: usize,
}

impl SegSegIntersector {
    pub fn new(g1: CurveGeom, g2: CurveGeom, cfg: &GeomCfg) -> Self {
        let m = [
            g2.start.x - g2.end.x,
            g1.end.x - g1.start.x,
            g2.start.y - g2.end.y,
            g1.end.y - g1.start.y,
        ];
        let col = [
            m[3] * g1.start.x - m[1] * g1.start.y,
            -m[2] * g2.start.x + m[0] * g2.start.y,
        ];
        // Locate along y for x-aligned segments and along x otherwise.
        let ind = if m[3].abs() > m[1].abs() { 0 } else { 1 };
        Self {
            g1,
            g2,
            prec: cfg.precision,
            m,
            col,
            ind,
        }
    }

    #[inline]
    fn determinant(&self) -> f64 {
        self.m[0] * self.m[3] - self.m[1] * self.m[2]
    }

    /// Product of both characteristic dimensions.
    #[inline]
    fn scale(&self) -> f64 {
        let d1 = self.g1.bounds().characteristic_dim();
        let d2 = self.g2.bounds().characteristic_dim();
        (d1 * d2).max(f64::MIN_POSITIVE)
    }

    /// Returns `(obvious_no_intersection, overlapped)`. Must be called once,
    /// before `intersections`.
    pub fn are_overlapped_or_only_colinears(&mut self) -> (bool, bool) {
        let det = self.determinant();
        if det.abs() > 2.0 * self.prec * self.scale() {
            for v in self.m.iter_mut() {
                *v /= det;
            }
            return (false, false);
        }
        // Parallel: overlapped iff `s2` lies on the line carrying `g1`, within
        // `prec` relative to the size of `g1`.
        let d1 = self.g1.end - self.g1.start;
        let deno = d1.norm();
        let w = self.g1.start - self.g2.start;
        let dist = (d1.y * w.x - d1.x * w.y) / deno;
        let d1_char = self.g1.bounds().characteristic_dim().max(f64::MIN_POSITIVE);
        (true, dist.abs() < self.prec * d1_char)
    }

    /// Meaningful only for colinear segments.
    pub fn same_direction(&self) -> bool {
        let d1 = self.g1.end - self.g1.start;
        let d2 = self.g2.end - self.g2.start;
        d1.dot(&d2) > 0.0
    }

    /// Placement of a point known to be on the carrying line of `g1`.
    pub fn placement(&self, p: Vector2<f64>) -> Placement {
        let k = 1 - self.ind;
        let t = (p[k] - self.g1.start[k]) / (self.g1.end[k] - self.g1.start[k]);
        if t > 0.0 && t < 1.0 {
            Placement::Inside
        } else if t < 0.0 {
            Placement::OutBefore
        } else {
            Placement::OutAfter
        }
    }

    pub fn intersections(&self) -> Vec<IntersectElement> {
        let m = &self.m;
        let c = &self.col;
        let p = Vector2::new(m[0] * c[0] + m[1] * c[1], m[2] * c[0] + m[3] * c[1]);
        let flags = (
            positions_equal(self.g1.start, p, self.prec),
            positions_equal(self.g1.end, p, self.prec),
            positions_equal(self.g2.start, p, self.prec),
            positions_equal(self.g2.end, p, self.prec),
        );
        vec![IntersectElement::new(
            self.g1.charact_value(p),
            self.g2.charact_value(p),
            flags,
            p,
            NodeLoc::On,
            true,
        )]
    }
}
