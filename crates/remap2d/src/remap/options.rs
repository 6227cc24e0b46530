//! Engine options with a string-keyed setter layer.
//!
//! Setters return `false` for unknown keys or values and leave the options
//! untouched; they never fail.

use crate::geom2::{GeomCfg, Robustness};

pub const PRECISION: &str = "Precision";
pub const ARC_DETECTION_PRECISION: &str = "ArcDetectionPrecision";
pub const BOUNDING_BOX_ADJUSTMENT: &str = "BoundingBoxAdjustment";
pub const BOUNDING_BOX_ADJUSTMENT_ABS: &str = "BoundingBoxAdjustmentAbs";
pub const MEASURE_ABS: &str = "MeasureAbs";
pub const PRINT_LEVEL: &str = "PrintLevel";
pub const INTERSECTION_ROBUSTNESS: &str = "IntersectionRobustness";
pub const PARALLEL: &str = "Parallel";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RemapOptions {
    /// Relative precision forwarded to the kernel.
    pub precision: f64,
    pub arc_detection_precision: f64,
    /// Broad-phase boxes grow by `bounding_box_adjustment * dim + bounding_box_adjustment_abs`.
    pub bounding_box_adjustment: f64,
    pub bounding_box_adjustment_abs: f64,
    /// Use absolute cell measures in the measure-based denominators.
    pub measure_abs: bool,
    pub print_level: usize,
    pub robustness: Robustness,
    pub parallel: bool,
}

impl Default for RemapOptions {
    fn default() -> Self {
        Self {
            precision: 1e-12,
            arc_detection_precision: 1e-7,
            bounding_box_adjustment: 0.1,
            bounding_box_adjustment_abs: 0.0,
            measure_abs: true,
            print_level: 0,
            robustness: Robustness::Strict,
            parallel: true,
        }
    }
}

impl RemapOptions {
    pub fn geom_cfg(&self) -> GeomCfg {
        GeomCfg::default()
            .with_precision(self.precision)
            .with_arc_detection_precision(self.arc_detection_precision)
            .with_robustness(self.robustness)
    }

    pub fn set_option_f64(&mut self, key: &str, value: f64) -> bool {
        match key {
            PRECISION => self.precision = value,
            ARC_DETECTION_PRECISION => self.arc_detection_precision = value,
            BOUNDING_BOX_ADJUSTMENT => self.bounding_box_adjustment = value,
            BOUNDING_BOX_ADJUSTMENT_ABS => self.bounding_box_adjustment_abs = value,
            _ => return false,
        }
        true
    }

    pub fn set_option_usize(&mut self, key: &str, value: usize) -> bool {
        match key {
            PRINT_LEVEL => self.print_level = value,
            MEASURE_ABS => self.measure_abs = value != 0,
            PARALLEL => self.parallel = value != 0,
            _ => return false,
        }
        true
    }

    pub fn set_option_bool(&mut self, key: &str, value: bool) -> bool {
        match key {
            MEASURE_ABS => self.measure_abs = value,
            PARALLEL => self.parallel = value,
            _ => return false,
        }
        true
    }

    pub fn set_option_str(&mut self, key: &str, value: &str) -> bool {
        match (key, value) {
            (INTERSECTION_ROBUSTNESS, "Strict") => self.robustness = Robustness::Strict,
            (INTERSECTION_ROBUSTNESS, "Tolerant") => self.robustness = Robustness::Tolerant,
            _ => return false,
        }
        true
    }
}
