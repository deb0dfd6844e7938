use crate::data::model::{AxisLimits, DataExtents};
use crate::view::units::{reciprocal, PeriodUnit, VelocityUnit};

/// Lower bounds are pulled down to 90 %.
pub const LOWER_MARGIN_FACTOR: f64 = 0.9;
/// Upper bounds are pushed up to 110 %.
pub const UPPER_MARGIN_FACTOR: f64 = 1.1;
/// Floor for every dispersion-axis bound.
pub const ABS_MIN_BOUND: f64 = 1e-10;

/// Dispersion-plot limits that frame every pick, in the displayed domain.
pub fn autoscale(extents: &DataExtents, period_unit: PeriodUnit, velocity_unit: VelocityUnit) -> AxisLimits {
    let (x_lo, x_hi) = match period_unit {
        PeriodUnit::Frequency => (extents.min_frequency, extents.max_frequency),
        PeriodUnit::Period => (reciprocal(extents.max_frequency), reciprocal(extents.min_frequency)),
    };
    let (y_lo, y_hi) = match velocity_unit {
        VelocityUnit::Slowness => (extents.min_slowness, extents.max_slowness),
        VelocityUnit::Velocity => (reciprocal(extents.max_slowness), reciprocal(extents.min_slowness)),
    };
    let (xmin, xmax) = with_margin(x_lo, x_hi);
    let (ymin, ymax) = with_margin(y_lo, y_hi);
    AxisLimits {
        xmin,
        xmax,
        ymin,
        ymax,
    }
}

/// Re-express an axis range after a reciprocal unit switch when there are no
/// picks to rescale from. `1/x` flips ordering, so the bounds trade places.
pub fn reciprocal_range(min: f64, max: f64) -> (f64, f64) {
    let lo = reciprocal(max).max(ABS_MIN_BOUND);
    let hi = reciprocal(min).max(ABS_MIN_BOUND);
    if hi > lo {
        (lo, hi)
    } else {
        (lo, lo + ABS_MIN_BOUND)
    }
}

fn with_margin(lo: f64, hi: f64) -> (f64, f64) {
    let min = (lo * LOWER_MARGIN_FACTOR).max(ABS_MIN_BOUND);
    let max = (hi * UPPER_MARGIN_FACTOR).max(ABS_MIN_BOUND);
    if max > min {
        (min, max)
    } else {
        (min, min + ABS_MIN_BOUND)
    }
}
