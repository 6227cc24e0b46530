//! Kernel tolerances.
//!
//! `GeomCfg` is passed explicitly to every kernel entry point; nothing in the
//! kernel reads a process-wide precision.

/// Geometry configuration (tolerances).
///
/// - `precision`: absolute tolerance in the normalized frame (node equality,
///   tangency, colinearity of arcs, placement tie-breaks).
/// - `arc_detection_precision`: relative tolerance deciding whether three
///   points are colinear (line) or define an arc.
/// - `robustness`: point-in-chain test used when locating split edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomCfg {
    pub precision: f64,
    pub arc_detection_precision: f64,
    pub robustness: Robustness,
}

/// Point-in-chain classification variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Robustness {
    /// Plain ray-casting parity.
    #[default]
    Strict,
    /// Points within `precision` of a chain node or of a ray crossing are inside.
    Tolerant,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            precision: 1e-14,
            arc_detection_precision: 1e-7,
            robustness: Robustness::Strict,
        }
    }
}

impl GeomCfg {
    #[inline]
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }
    #[inline]
    pub fn with_arc_detection_precision(mut self, arc_detection_precision: f64) -> Self {
        self.arc_detection_precision = arc_detection_precision;
        self
    }
    #[inline]
    pub fn with_robustness(mut self, robustness: Robustness) -> Self {
        self.robustness = robustness;
        self
    }
}

/// Sentinel magnitude used by `Bounds::prepare_for_aggregation`.
pub(crate) const AGGREGATION_SENTINEL: f64 = 1e200;

/// Safety cap on polygon closing loops; a valid split never needs more steps
/// than the total number of sub-edges involved.
pub(crate) const CLOSE_LOOP_FACTOR: usize = 4;
