use std::fmt;

use serde::{Deserialize, Serialize};

/// Feet per metre.
pub const FEET_PER_METER: f64 = 3.28084;

/// `1/x`, with `0` mapping to `0` instead of infinity.
pub fn reciprocal(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        1.0 / value
    }
}

pub fn to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

pub fn to_meters(feet: f64) -> f64 {
    feet / FEET_PER_METER
}

// ---------------------------------------------------------------------------
// Reciprocal unit pairs
// ---------------------------------------------------------------------------

/// Unit of the dispersion plot's period axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PeriodUnit {
    /// Seconds.
    #[default]
    Period,
    /// Hertz.
    Frequency,
}

impl PeriodUnit {
    pub fn convert(value: f64, from: PeriodUnit, to: PeriodUnit) -> f64 {
        if from == to {
            value
        } else {
            reciprocal(value)
        }
    }

    /// Express a period (s) in this unit.
    pub fn from_period(self, period: f64) -> f64 {
        Self::convert(period, PeriodUnit::Period, self)
    }

    /// Convert a value in this unit back to a period (s).
    pub fn to_period(self, value: f64) -> f64 {
        Self::convert(value, self, PeriodUnit::Period)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PeriodUnit::Period => "s",
            PeriodUnit::Frequency => "Hz",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            PeriodUnit::Period => "Period (s)",
            PeriodUnit::Frequency => "Frequency (Hz)",
        }
    }
}

/// Unit of the dispersion plot's velocity axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VelocityUnit {
    /// m/s.
    #[default]
    Velocity,
    /// s/m.
    Slowness,
}

impl VelocityUnit {
    pub fn convert(value: f64, from: VelocityUnit, to: VelocityUnit) -> f64 {
        if from == to {
            value
        } else {
            reciprocal(value)
        }
    }

    /// Express a velocity (m/s) in this unit.
    pub fn from_velocity(self, velocity: f64) -> f64 {
        Self::convert(velocity, VelocityUnit::Velocity, self)
    }

    pub fn axis_label(self, display: DisplayUnits) -> String {
        let len = display.symbol();
        match self {
            VelocityUnit::Velocity => format!("Velocity ({len}/s)"),
            VelocityUnit::Slowness => format!("Slowness (s/{len})"),
        }
    }

    /// Canonical (SI) value of this axis shown in the chosen length unit.
    pub fn to_display(self, value: f64, display: DisplayUnits) -> f64 {
        match (self, display) {
            (_, DisplayUnits::Meters) => value,
            (VelocityUnit::Velocity, DisplayUnits::Feet) => to_feet(value),
            (VelocityUnit::Slowness, DisplayUnits::Feet) => to_meters(value),
        }
    }

    /// Inverse of [`VelocityUnit::to_display`].
    pub fn from_display(self, value: f64, display: DisplayUnits) -> f64 {
        match (self, display) {
            (_, DisplayUnits::Meters) => value,
            (VelocityUnit::Velocity, DisplayUnits::Feet) => to_meters(value),
            (VelocityUnit::Slowness, DisplayUnits::Feet) => to_feet(value),
        }
    }

    pub fn unit_label(self, display: DisplayUnits) -> String {
        let len = display.symbol();
        match self {
            VelocityUnit::Velocity => format!("{len}/s"),
            VelocityUnit::Slowness => format!("s/{len}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Display length unit
// ---------------------------------------------------------------------------

/// Length unit used for presentation only; the model is always in metres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayUnits {
    #[default]
    Meters,
    Feet,
}

impl DisplayUnits {
    pub fn symbol(self) -> &'static str {
        match self {
            DisplayUnits::Meters => "m",
            DisplayUnits::Feet => "ft",
        }
    }

    /// Metres (or m/s) → displayed value.
    pub fn to_display(self, meters: f64) -> f64 {
        match self {
            DisplayUnits::Meters => meters,
            DisplayUnits::Feet => to_feet(meters),
        }
    }

    /// Displayed value → metres (or m/s).
    pub fn from_display(self, value: f64) -> f64 {
        match self {
            DisplayUnits::Meters => value,
            DisplayUnits::Feet => to_meters(value),
        }
    }
}

impl fmt::Display for DisplayUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_converts_to_zero() {
        assert_eq!(PeriodUnit::convert(0.0, PeriodUnit::Period, PeriodUnit::Frequency), 0.0);
        assert_eq!(VelocityUnit::convert(0.0, VelocityUnit::Slowness, VelocityUnit::Velocity), 0.0);
    }

    #[test]
    fn identity_when_units_match() {
        assert_eq!(PeriodUnit::convert(4.0, PeriodUnit::Frequency, PeriodUnit::Frequency), 4.0);
        assert_eq!(VelocityUnit::Velocity.from_velocity(250.0), 250.0);
    }

    #[test]
    fn reciprocal_pairs_round_trip() {
        for x in [1e-6, 0.003, 0.5, 1.0, 7.25, 1234.5] {
            let f = PeriodUnit::convert(x, PeriodUnit::Period, PeriodUnit::Frequency);
            assert_relative_eq!(
                PeriodUnit::convert(f, PeriodUnit::Frequency, PeriodUnit::Period),
                x,
                max_relative = 1e-12
            );
            let s = VelocityUnit::convert(x, VelocityUnit::Velocity, VelocityUnit::Slowness);
            assert_relative_eq!(
                VelocityUnit::convert(s, VelocityUnit::Slowness, VelocityUnit::Velocity),
                x,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn feet_scale_pair() {
        assert_relative_eq!(to_feet(10.0), 32.8084, max_relative = 1e-12);
        assert_relative_eq!(to_meters(to_feet(17.3)), 17.3, max_relative = 1e-12);
        assert_relative_eq!(DisplayUnits::Feet.from_display(DisplayUnits::Feet.to_display(42.0)), 42.0, max_relative = 1e-12);
    }

    #[test]
    fn slowness_display_divides_by_feet_factor() {
        let s = 0.004; // s/m
        let shown = VelocityUnit::Slowness.to_display(s, DisplayUnits::Feet);
        assert_relative_eq!(shown, 0.004 / FEET_PER_METER, max_relative = 1e-12);
        assert_relative_eq!(VelocityUnit::Slowness.from_display(shown, DisplayUnits::Feet), s, max_relative = 1e-12);
    }
}
