//! Arc / arc intersector.

use nalgebra::Vector2;
use std::f64::consts::PI;

use super::element::IntersectElement;
use super::Placement;
use crate::geom2::cfg::GeomCfg;
use crate::geom2::curve::{ArcData, CurveGeom};
use crate::geom2::node::NodeLoc;
use crate::geom2::num::{angle_of, is_in_2pi, nearly_eq, normalize_angle, safe_sqrt};

#[derive(Clone, Copy, Debug)]
pub struct ArcArcIntersector {
    g1: CurveGeom,
    g2: CurveGeom,
    a1: ArcData,
    a2: ArcData,
    prec: f64,
    dist: f64,
}

/// Shorter arc ("little") and longer arc ("big") of a pair.
struct LittleBig<'a> {
    little: &'a ArcData,
    big: &'a ArcData,
    dist_sq: f64,
    cst: f64,
}

impl<'a> LittleBig<'a> {
    fn of(a1: &'a ArcData, a2: &'a ArcData) -> Self {
        let l1 = (a1.angle * a1.radius).abs();
        let l2 = (a2.angle * a2.radius).abs();
        let (little, big) = if l1 < l2 { (a1, a2) } else { (a2, a1) };
        let rb2 = big.radius * big.radius;
        let dist_sq = (little.center - big.center).norm_squared();
        let cst = dist_sq / rb2 + little.radius * little.radius / rb2;
        Self {
            little,
            big,
            dist_sq,
            cst,
        }
    }
}

impl ArcArcIntersector {
    pub fn new(g1: CurveGeom, a1: ArcData, g2: CurveGeom, a2: ArcData, cfg: &GeomCfg) -> Self {
        Self {
            g1,
            g2,
            a1,
            a2,
            prec: cfg.precision,
            dist: (a1.center - a2.center).norm(),
        }
    }

    /// Both arcs lie on the same circle (within tolerance).
    pub fn are_colinears(&self) -> bool {
        let lb = LittleBig::of(&self.a1, &self.a2);
        nearly_eq(lb.cst, 1.0, 2.0 * self.prec)
    }

    fn are_arcs_overlapped(&self) -> bool {
        let lb = LittleBig::of(&self.a1, &self.a2);
        if !nearly_eq(lb.cst, 1.0, 2.0 * self.prec) {
            return false;
        }
        let (little, big) = (lb.little, lb.big);
        let window = self
            .g1
            .bounds()
            .nearly_am_i_intersecting_with(&self.g2.bounds(), self.prec)
            .and_then(|merge| merge.intercepted_arc(little.center, little.radius));
        let (angle0_l, angle_l) = window.unwrap_or((little.angle0, little.angle));
        let tmp = lb.dist_sq.sqrt();
        if tmp.abs() < self.prec / (10.0 * little.radius.max(big.radius)) {
            return nearly_eq(little.radius, big.radius, self.prec);
        }
        let phi = angle_of((little.center - big.center) / tmp);
        let cst2 = 2.0 * little.radius * tmp / (big.radius * big.radius);
        let mut best = (lb.cst + cst2 * (phi - angle0_l).cos())
            .max(lb.cst + cst2 * (phi - angle0_l + angle_l).cos());
        if is_in_2pi(angle0_l, angle_l, normalize_angle(phi - angle0_l)) {
            best = best.max(lb.cst + cst2);
        }
        if is_in_2pi(angle0_l, angle_l, normalize_angle(phi - angle0_l + PI)) {
            best = best.max(lb.cst - cst2);
        }
        nearly_eq(best, 1.0, 2.0 * self.prec)
    }

    /// Returns `(obvious_no_intersection, overlapped)`.
    pub fn are_overlapped_or_only_colinears(&self) -> (bool, bool) {
        let (r1, r2) = (self.a1.radius, self.a2.radius);
        if self.dist > r1 + r2 + self.prec || self.dist + r1.min(r2) + self.prec < r1.max(r2) {
            return (true, false);
        }
        if self.are_arcs_overlapped() {
            return (false, true);
        }
        // Same circle, disjoint spans: no isolated crossing to compute.
        if self.dist < self.prec {
            return (true, false);
        }
        (false, false)
    }

    pub fn same_direction(&self) -> bool {
        (self.a1.angle > 0.0 && self.a2.angle > 0.0) || (self.a1.angle < 0.0 && self.a2.angle < 0.0)
    }

    /// Placements of two points lying on the common circle, given the
    /// placements already settled by endpoint coincidence.
    pub fn placements(
        &self,
        start: Vector2<f64>,
        end: Vector2<f64>,
        obvious_start: Option<Placement>,
        obvious_end: Option<Placement>,
    ) -> (Placement, Placement) {
        let a = &self.a1;
        let in_first = |p: Vector2<f64>| is_in_2pi(a.angle0, a.angle, angle_of(p - a.center));
        match (obvious_start, obvious_end) {
            (Some(ps), Some(pe)) => (ps, pe),
            (Some(ps), None) => {
                let pe = if in_first(end) {
                    Placement::Inside
                } else {
                    Placement::OutAfter
                };
                (ps, pe)
            }
            (None, Some(pe)) => {
                let ps = if in_first(start) {
                    Placement::Inside
                } else {
                    Placement::OutBefore
                };
                (ps, pe)
            }
            (None, None) => {
                if in_first(start) {
                    let pe = if in_first(end) {
                        Placement::Inside
                    } else {
                        Placement::OutAfter
                    };
                    (Placement::Inside, pe)
                } else if in_first(end) {
                    (Placement::OutBefore, Placement::Inside)
                } else if is_in_2pi(self.a2.angle0, self.a2.angle, a.angle0) {
                    (Placement::OutBefore, Placement::OutAfter)
                } else {
                    (Placement::OutBefore, Placement::OutBefore)
                }
            }
        }
    }

    pub fn intersections(&self) -> Vec<IntersectElement> {
        let (a1, a2) = (&self.a1, &self.a2);
        let (r1, r2) = (a1.radius, a2.radius);
        let dist = self.dist;
        let d1 = (dist * dist - r2 * r2 + r1 * r1) / (2.0 * dist);
        let u = (a2.center - a1.center) / dist;
        let d1y = safe_sqrt(r1 * r1 - d1 * d1);
        let end_angle1 = normalize_angle(a1.angle0 + a1.angle);
        let end_angle2 = normalize_angle(a2.angle0 + a2.angle);
        let c12 = a1.center - a2.center;
        let flags = |t1: f64, t2: f64, k1: f64, k2: f64| {
            (
                nearly_eq(t1, a1.angle0, k1 * self.prec),
                nearly_eq(t1, end_angle1, k1 * self.prec),
                nearly_eq(t2, a2.angle0, k2 * self.prec),
                nearly_eq(t2, end_angle2, k2 * self.prec),
            )
        };
        if !nearly_eq(d1y, 0.0, self.prec) {
            let v1 = Vector2::new(u.x * d1 - u.y * d1y, u.y * d1 + u.x * d1y);
            let v2 = Vector2::new(u.x * d1 + u.y * d1y, u.y * d1 - u.x * d1y);
            let p1_on_1 = angle_of(v1 / r1);
            let p2_on_1 = angle_of(v2 / r1);
            let p1_on_2 = angle_of((c12 + v1) / r2);
            let p2_on_2 = angle_of((c12 + v2) / r2);
            vec![
                IntersectElement::new(
                    p1_on_1,
                    p1_on_2,
                    flags(p1_on_1, p1_on_2, r1, r1),
                    a1.center + v1,
                    NodeLoc::On,
                    true,
                ),
                IntersectElement::new(
                    p2_on_1,
                    p2_on_2,
                    flags(p2_on_1, p2_on_2, r2, r2),
                    a1.center + v2,
                    NodeLoc::On,
                    true,
                ),
            ]
        } else {
            let v1 = d1 * u;
            let t1 = angle_of(v1 / r1);
            let t2 = angle_of((c12 + v1) / r2);
            vec![IntersectElement::new(
                t1,
                t2,
                flags(t1, t2, r1, r2),
                a1.center + v1,
                NodeLoc::OnTangent,
                true,
            )]
        }
    }
}
