//! Axis-aligned bounding boxes.
//!
//! Boxes drive the cheap reject test before exact intersection and carry the
//! characteristic dimension used to normalize a pair of chains.

use nalgebra::Vector2;

use super::cfg::AGGREGATION_SENTINEL;
use super::num::{angle_of, safe_asin};

/// Position of a point relative to a box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    In,
    Out,
    OnBoundaryPos,
    OnBoundaryNeg,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    #[inline]
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Box spanned by two points.
    pub fn from_points(a: Vector2<f64>, b: Vector2<f64>) -> Self {
        Self::new(a.x.min(b.x), a.x.max(b.x), a.y.min(b.y), a.y.max(b.y))
    }

    /// Inverted box ready to be grown by `aggregate`.
    pub fn prepare_for_aggregation() -> Self {
        Self::new(
            AGGREGATION_SENTINEL,
            -AGGREGATION_SENTINEL,
            AGGREGATION_SENTINEL,
            -AGGREGATION_SENTINEL,
        )
    }

    pub fn aggregate(&mut self, other: &Bounds) {
        self.x_min = self.x_min.min(other.x_min);
        self.x_max = self.x_max.max(other.x_max);
        self.y_min = self.y_min.min(other.y_min);
        self.y_max = self.y_max.max(other.y_max);
    }

    pub fn aggregate_point(&mut self, p: Vector2<f64>) {
        self.x_min = self.x_min.min(p.x);
        self.x_max = self.x_max.max(p.x);
        self.y_min = self.y_min.min(p.y);
        self.y_max = self.y_max.max(p.y);
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// `max(width, height)`; the scale factor for all relative tolerances.
    #[inline]
    pub fn characteristic_dim(&self) -> f64 {
        self.width().max(self.height())
    }

    #[inline]
    pub fn barycenter(&self) -> Vector2<f64> {
        Vector2::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    pub fn apply_similarity(&mut self, bary: Vector2<f64>, dim: f64) {
        self.x_min = (self.x_min - bary.x) / dim;
        self.x_max = (self.x_max - bary.x) / dim;
        self.y_min = (self.y_min - bary.y) / dim;
        self.y_max = (self.y_max - bary.y) / dim;
    }

    pub fn unapply_similarity(&mut self, bary: Vector2<f64>, dim: f64) {
        self.x_min = self.x_min * dim + bary.x;
        self.x_max = self.x_max * dim + bary.x;
        self.y_min = self.y_min * dim + bary.y;
        self.y_max = self.y_max * dim + bary.y;
    }

    /// Enlarges the box by `rel * characteristic_dim + abs` on every side.
    pub fn enlarged(&self, rel: f64, abs: f64) -> Bounds {
        let d = rel * self.characteristic_dim() + abs;
        Bounds::new(
            self.x_min - d,
            self.x_max + d,
            self.y_min - d,
            self.y_max + d,
        )
    }

    /// Exact box intersection; `None` when disjoint.
    pub fn am_i_intersecting_with(&self, other: &Bounds) -> Option<Bounds> {
        if other.x_min > self.x_max
            || other.x_max < self.x_min
            || other.y_min > self.y_max
            || other.y_max < self.y_min
        {
            return None;
        }
        Some(Bounds::new(
            self.x_min.max(other.x_min),
            self.x_max.min(other.x_max),
            self.y_min.max(other.y_min),
            self.y_max.min(other.y_max),
        ))
    }

    /// Tolerant box intersection. Boxes touching within `prec` intersect; the
    /// result is widened by `prec` on the touching side.
    pub fn nearly_am_i_intersecting_with(&self, other: &Bounds, prec: f64) -> Option<Bounds> {
        if other.x_min > self.x_max + prec
            || other.x_max < self.x_min - prec
            || other.y_min > self.y_max + prec
            || other.y_max < self.y_min - prec
        {
            return None;
        }
        if other.x_min >= self.x_max
            || other.x_max <= self.x_min
            || other.y_min >= self.y_max
            || other.y_max <= self.y_min
        {
            return Some(Bounds::new(
                (self.x_min - prec).max(other.x_min),
                (self.x_max + prec).min(other.x_max),
                (self.y_min - prec).max(other.y_min),
                (self.y_max + prec).min(other.y_max),
            ));
        }
        self.am_i_intersecting_with(other)
    }

    /// Exact inclusive location.
    pub fn locate(&self, p: Vector2<f64>) -> Position {
        if p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max {
            Position::In
        } else {
            Position::Out
        }
    }

    /// Location under tolerance `prec`; degenerate (flat) boxes are handled
    /// so that a point on a flat box is reported on its boundary.
    pub fn nearly_locate(&self, p: Vector2<f64>, prec: f64) -> Position {
        let thin_x = (self.x_max - self.x_min).abs() < prec;
        let thin_y = (self.y_max - self.y_min).abs() < prec;
        let on_x_min = (p.x - self.x_min).abs() < prec;
        let on_x_max = (p.x - self.x_max).abs() < prec;
        let on_y_min = (p.y - self.y_min).abs() < prec;
        let on_y_max = (p.y - self.y_max).abs() < prec;
        if !thin_x
            && (on_x_min || on_x_max)
            && p.y < self.y_max + prec
            && p.y > self.y_min - prec
        {
            return Position::OnBoundaryPos;
        } else if thin_x && !on_x_min && !on_x_max {
            return Position::Out;
        }
        if !thin_y
            && (on_y_min || on_y_max)
            && p.x < self.x_max + prec
            && p.x > self.x_min - prec
        {
            return Position::OnBoundaryPos;
        } else if thin_y && !on_y_min && !on_y_max {
            return Position::Out;
        }
        if thin_x && thin_y {
            return Position::OnBoundaryPos;
        }
        self.locate(p)
    }

    /// Angular window `(start, delta)` of the circle `(center, r)` seen through
    /// this box, when the box is small enough to intercept a proper sub-arc.
    pub fn intercepted_arc(&self, center: Vector2<f64>, r: f64) -> Option<(f64, f64)> {
        if self.diagonal() >= 2.0 * r {
            return None;
        }
        let v1 = Vector2::new(self.x_min - center.x, self.y_max - center.y);
        let v2 = Vector2::new(self.x_max - center.x, self.y_min - center.y);
        let w1 = Vector2::new(v1.x, self.y_min - center.y);
        let w2 = Vector2::new(v2.x, self.y_max - center.y);
        let n1 = v1.norm() * v2.norm();
        let n2 = w1.norm() * w2.norm();
        if n1 == 0.0 || n2 == 0.0 {
            return None;
        }
        let delta1 = safe_asin((v1.x * v2.y - v1.y * v2.x) / n1);
        let delta2 = safe_asin((w1.x * w2.y - w1.y * w2.x) / n2);
        if delta1.abs() > delta2.abs() {
            Some((angle_of(v1), delta1))
        } else {
            Some((angle_of(w1), delta2))
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::prepare_for_aggregation()
    }
}
