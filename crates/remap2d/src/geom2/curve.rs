//! Curve kinds and their closed-form quantities.
//!
//! Every quantity here is a pure function of the endpoint positions and the
//! curve descriptor, so intersectors can work on `CurveGeom` snapshots without
//! touching the arena.
//!
//! Parameterization ("characteristic value")
//! - Line / InfiniteLine: `t = (p - s)·(e - s) / |e - s|²` (0 at start, 1 at end).
//! - Arc: polar angle of `p - center`.

use nalgebra::Vector2;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::bounds::Bounds;
use super::num::{angle_of, cross, is_angle_not_in, is_in_2pi, safe_sqrt};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveKind {
    Line,
    Arc,
    InfiniteLine,
}

/// Circle arc: starts at polar angle `angle0` and sweeps the signed `angle`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcData {
    pub center: Vector2<f64>,
    pub radius: f64,
    pub angle0: f64,
    pub angle: f64,
}

impl ArcData {
    /// Arc from `s` to `e` passing through `m`. `None` when the points are colinear.
    pub fn through(s: Vector2<f64>, m: Vector2<f64>, e: Vector2<f64>) -> Option<Self> {
        let delta = (m.x - s.x) * (e.y - m.y) - (e.x - m.x) * (m.y - s.y);
        if delta == 0.0 {
            return None;
        }
        let b1 = (m.y * m.y + m.x * m.x - s.x * s.x - s.y * s.y) / 2.0;
        let b2 = (e.y * e.y + e.x * e.x - m.x * m.x - m.y * m.y) / 2.0;
        let center = Vector2::new(
            ((e.y - m.y) * b1 + (s.y - m.y) * b2) / delta,
            ((m.x - e.x) * b1 + (m.x - s.x) * b2) / delta,
        );
        let radius = safe_sqrt((s - center).norm_squared());
        let us = (s - center) / radius;
        let ue = (e - center) / radius;
        let angle0 = angle_of(us);
        let angle_m = angle_of(m - center);
        let mut angle = cross(us, ue).atan2(us.dot(&ue));
        if is_angle_not_in(angle0, angle, angle_m) {
            angle = if angle < 0.0 { TAU + angle } else { angle - TAU };
        }
        Some(Self {
            center,
            radius,
            angle0,
            angle,
        })
    }

    #[inline]
    pub fn point_at(&self, theta: f64) -> Vector2<f64> {
        self.center + self.radius * Vector2::new(theta.cos(), theta.sin())
    }

    #[inline]
    pub fn middle(&self) -> Vector2<f64> {
        self.point_at(self.angle0 + self.angle / 2.0)
    }
}

/// Curve descriptor; endpoints are held by the owning edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
    Line,
    Arc(ArcData),
    /// Synthetic ray through `start` with direction `end - start`; used only for
    /// point classification.
    InfiniteLine,
}

impl Curve {
    #[inline]
    pub fn kind(&self) -> CurveKind {
        match self {
            Curve::Line => CurveKind::Line,
            Curve::Arc(_) => CurveKind::Arc,
            Curve::InfiniteLine => CurveKind::InfiniteLine,
        }
    }

    pub fn apply_similarity(&mut self, bary: Vector2<f64>, dim: f64) {
        if let Curve::Arc(a) = self {
            a.center = (a.center - bary) / dim;
            a.radius /= dim;
        }
    }

    pub fn unapply_similarity(&mut self, bary: Vector2<f64>, dim: f64) {
        if let Curve::Arc(a) = self {
            a.center = a.center * dim + bary;
            a.radius *= dim;
        }
    }
}

/// Value snapshot of an edge: endpoints plus descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveGeom {
    pub start: Vector2<f64>,
    pub end: Vector2<f64>,
    pub curve: Curve,
}

impl CurveGeom {
    #[inline]
    pub fn line(start: Vector2<f64>, end: Vector2<f64>) -> Self {
        Self {
            start,
            end,
            curve: Curve::Line,
        }
    }

    /// Ray through `through` with polar direction `slope`.
    pub fn infinite_line(through: Vector2<f64>, slope: f64) -> Self {
        Self {
            start: through,
            end: through + Vector2::new(slope.cos(), slope.sin()),
            curve: Curve::InfiniteLine,
        }
    }

    #[inline]
    pub fn kind(&self) -> CurveKind {
        self.curve.kind()
    }

    pub fn length(&self) -> f64 {
        match &self.curve {
            Curve::Line | Curve::InfiniteLine => (self.start - self.end).norm(),
            Curve::Arc(a) => (a.angle * a.radius).abs(),
        }
    }

    /// Signed contribution `∫ -y dx` from start to end; sums to the signed
    /// area of a closed chain (counterclockwise positive).
    pub fn area_of_zone(&self) -> f64 {
        let (s, e) = (self.start, self.end);
        let chord = (s.x - e.x) * (s.y + e.y) / 2.0;
        match &self.curve {
            Curve::Line | Curve::InfiniteLine => chord,
            Curve::Arc(a) => -a.radius * a.radius * (a.angle.sin() - a.angle) / 2.0 + chord,
        }
    }

    /// First moments `(∫ -xy dx, ∫ -y²/2 dx)` of the zone; divided by the chain
    /// area they give the barycenter.
    pub fn barycenter_of_zone(&self) -> Vector2<f64> {
        match &self.curve {
            Curve::Line | Curve::InfiniteLine => {
                let (x1, y1) = (self.start.x, self.start.y);
                let (x2, y2) = (self.end.x, self.end.y);
                Vector2::new(
                    (x1 - x2) * (y1 * (2.0 * x1 + x2) + y2 * (2.0 * x2 + x1)) / 6.0,
                    (x1 - x2) * (y1 * (y1 + y2) + y2 * y2) / 6.0,
                )
            }
            Curve::Arc(arc) => {
                let (x0, y0) = (arc.center.x, arc.center.y);
                let r = arc.radius;
                let a = arc.angle;
                let a0 = arc.angle0;
                let a1 = a0 + a;
                let (c0, c1) = (a0.cos(), a1.cos());
                let (s0, s1) = (a0.sin(), a1.sin());
                let (c20, c21) = ((2.0 * a0).cos(), (2.0 * a1).cos());
                let (s20, s21) = ((2.0 * a0).sin(), (2.0 * a1).sin());
                let x = r * x0 * y0 * (c0 - c1)
                    + r * r * (y0 * (c20 - c21) / 4.0 + x0 * (a / 2.0 + (s20 - s21) / 4.0))
                    + r * r * r * (s1.powi(3) - s0.powi(3)) / 3.0;
                let y = y0 * y0 * r * (c0 - c1) / 2.0
                    + r * r * y0 * (a / 2.0 + (s20 - s21) / 4.0)
                    + r * r * r * (c0 - c1 + (c1.powi(3) - c0.powi(3)) / 3.0) / 2.0;
                Vector2::new(x, y)
            }
        }
    }

    /// Mid-curve point.
    pub fn barycenter(&self) -> Vector2<f64> {
        match &self.curve {
            Curve::Line | Curve::InfiniteLine => (self.start + self.end) / 2.0,
            Curve::Arc(a) => a.middle(),
        }
    }

    /// A point strictly inside the curve, used for absolute classification.
    #[inline]
    pub fn representative(&self) -> Vector2<f64> {
        self.barycenter()
    }

    pub fn charact_value(&self, p: Vector2<f64>) -> f64 {
        match &self.curve {
            Curve::Line | Curve::InfiniteLine => {
                let d = self.end - self.start;
                (p - self.start).dot(&d) / d.norm_squared()
            }
            Curve::Arc(a) => angle_of(p - a.center),
        }
    }

    /// Curve parameter of `p` rescaled to [0, 1] from start to end.
    pub fn charact_value_btw_0_and_1(&self, p: Vector2<f64>) -> f64 {
        match &self.curve {
            Curve::Line | Curve::InfiniteLine => self.charact_value(p),
            Curve::Arc(a) => {
                let mut d = angle_of(p - a.center) - a.angle0;
                if a.angle > 0.0 {
                    if d < 0.0 {
                        d += TAU;
                    }
                } else if d > 0.0 {
                    d -= TAU;
                }
                d / a.angle
            }
        }
    }

    pub fn is_in(&self, v: f64) -> bool {
        match &self.curve {
            Curve::Line => v > 0.0 && v < 1.0,
            Curve::InfiniteLine => true,
            Curve::Arc(a) => is_in_2pi(a.angle0, a.angle, v),
        }
    }

    /// Order of two parameter values along the curve direction.
    pub fn is_lower(&self, v1: f64, v2: f64, prec: f64) -> bool {
        match &self.curve {
            Curve::Line | Curve::InfiniteLine => v1 < v2,
            Curve::Arc(a) => {
                let mut d1 = v1 - a.angle0;
                let mut d2 = v2 - a.angle0;
                let tol = a.radius * prec;
                if a.angle > 0.0 {
                    if d1 <= -tol {
                        d1 += TAU;
                    }
                    if d2 <= -tol {
                        d2 += TAU;
                    }
                    d1 < d2
                } else {
                    if d1 >= tol {
                        d1 -= TAU;
                    }
                    if d2 >= tol {
                        d2 -= TAU;
                    }
                    d2 < d1
                }
            }
        }
    }

    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::from_points(self.start, self.end);
        if let Curve::Arc(a) = &self.curve {
            let (c, r) = (a.center, a.radius);
            if is_in_2pi(a.angle0, a.angle, FRAC_PI_2) {
                b.y_max = c.y + r;
            }
            if is_in_2pi(a.angle0, a.angle, -FRAC_PI_2) {
                b.y_min = c.y - r;
            }
            if is_in_2pi(a.angle0, a.angle, 0.0) {
                b.x_max = c.x + r;
            }
            if is_in_2pi(a.angle0, a.angle, PI) {
                b.x_min = c.x - r;
            }
        }
        b
    }

    pub fn distance_to_point(&self, p: Vector2<f64>) -> f64 {
        let to_ends = (p - self.start).norm().min((p - self.end).norm());
        match &self.curve {
            Curve::Line | Curve::InfiniteLine => {
                let t = self.charact_value(p);
                if (t > 0.0 && t < 1.0) || self.kind() == CurveKind::InfiniteLine {
                    let proj = self.start + t * (self.end - self.start);
                    (p - proj).norm()
                } else {
                    to_ends
                }
            }
            Curve::Arc(a) => {
                if is_in_2pi(a.angle0, a.angle, angle_of(p - a.center)) {
                    ((p - a.center).norm() - a.radius).abs()
                } else {
                    to_ends
                }
            }
        }
    }

    pub fn is_point_lying_on(&self, p: Vector2<f64>, prec: f64) -> bool {
        match &self.curve {
            Curve::Line | Curve::InfiniteLine => {
                let l = (self.start - self.end).norm();
                ((self.start - p).norm() + (self.end - p).norm() - l).abs() < prec
            }
            Curve::Arc(a) => {
                ((p - a.center).norm() - a.radius).abs() < prec
                    && is_in_2pi(a.angle0, a.angle, angle_of(p - a.center))
            }
        }
    }

    /// Sub-curve of the same underlying curve between `s` and `e` (points
    /// assumed to lie on it). With `direction == false` the result runs from
    /// `e` to `s`.
    pub fn lying_on(&self, s: Vector2<f64>, e: Vector2<f64>, direction: bool) -> CurveGeom {
        let (start, end) = if direction { (s, e) } else { (e, s) };
        let curve = match &self.curve {
            Curve::Line => Curve::Line,
            Curve::InfiniteLine => Curve::InfiniteLine,
            Curve::Arc(a) => {
                let us = (s - a.center) / a.radius;
                let ue = (e - a.center) / a.radius;
                let angle0 = if direction { angle_of(us) } else { angle_of(ue) };
                let mut delta = cross(us, ue).atan2(us.dot(&ue));
                if delta > 0.0 && a.angle < 0.0 {
                    delta -= TAU;
                } else if delta < 0.0 && a.angle > 0.0 {
                    delta += TAU;
                }
                Curve::Arc(ArcData {
                    center: a.center,
                    radius: a.radius,
                    angle0,
                    angle: if direction { delta } else { -delta },
                })
            }
        };
        CurveGeom { start, end, curve }
    }
}
