//! Scalar helpers shared by curve kinds and intersectors.
//!
//! Angles are radians. Arc spans are signed deltas in (-2π, 2π); start angles
//! live in (-π, π].

use nalgebra::Vector2;
use std::f64::consts::{PI, TAU};

/// `1.0` for non-negative input, `-1.0` otherwise.
#[inline]
pub fn sign(v: f64) -> f64 {
    if v >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

#[inline]
pub fn safe_sqrt(v: f64) -> f64 {
    v.max(0.0).sqrt()
}

#[inline]
pub fn safe_acos(v: f64) -> f64 {
    v.clamp(-1.0, 1.0).acos()
}

#[inline]
pub fn safe_asin(v: f64) -> f64 {
    v.clamp(-1.0, 1.0).asin()
}

#[inline]
pub fn nearly_eq(a: f64, b: f64, prec: f64) -> bool {
    (a - b).abs() < prec
}

/// Brings an angle produced by one addition/subtraction of angles back into (-π, π].
#[inline]
pub fn normalize_angle(a: f64) -> f64 {
    if a > PI {
        a - TAU
    } else if a < -PI {
        a + TAU
    } else {
        a
    }
}

/// Polar angle of `v` in (-π, π].
#[inline]
pub fn angle_of(v: Vector2<f64>) -> f64 {
    v.y.atan2(v.x)
}

/// Undirected slope of `v` in [0, π).
pub fn slope_of(v: Vector2<f64>) -> f64 {
    let norm = v.norm();
    if norm == 0.0 {
        return 0.0;
    }
    let ret = safe_acos(v.x.abs() / norm);
    if (v.x >= 0.0 && v.y >= 0.0) || (v.x < 0.0 && v.y < 0.0) {
        ret
    } else {
        PI - ret
    }
}

/// Whether `angle` lies strictly inside the arc that starts at `start` and sweeps `delta`.
pub fn is_in_2pi(start: f64, delta: f64, angle: f64) -> bool {
    let mut d = angle - start;
    if delta > 0.0 {
        if d < 0.0 {
            d += TAU;
        }
        d > 0.0 && d < delta
    } else {
        if d > 0.0 {
            d -= TAU;
        }
        d > delta && d < 0.0
    }
}

/// Whether `angle` lies outside the arc `[start, start + delta]`; used to pick
/// the sweep of an arc through three points.
pub fn is_angle_not_in(start: f64, delta: f64, angle: f64) -> bool {
    let tmp = if start < 0.0 { start + TAU } else { start };
    let tmp2 = if angle < 0.0 { angle + TAU } else { angle };
    if tmp + delta >= TAU {
        tmp2 < tmp && tmp2 > tmp + delta - TAU
    } else if tmp + delta >= 0.0 {
        tmp2 < tmp.min(tmp + delta) || tmp2 > tmp.max(tmp + delta)
    } else {
        tmp2 > tmp && tmp2 < tmp + delta + TAU
    }
}

/// 2D cross product `a × b`.
#[inline]
pub fn cross(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}
