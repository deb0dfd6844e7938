use crate::data::model::AxisLimits;

/// Blank border (px) between the plot frame and the data area.
pub const PLOT_MARGIN: f64 = 10.0;

/// Decimal grid for values read back from the dispersion plot.
pub const DISPERSION_DECIMALS: i32 = 4;

/// Decimal grid for values read back from the depth plot.
pub const DEPTH_DECIMALS: i32 = 1;

/// A position in plot-local screen space: origin at the plot's top-left
/// corner, `x` to the right, `y` downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

// ---------------------------------------------------------------------------
// AxisScale – one value axis mapped onto one screen axis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pub min: f64,
    pub max: f64,
    /// Full screen length of the axis (px), margins included.
    pub size: f64,
    pub decimals: i32,
}

impl AxisScale {
    pub fn new(min: f64, max: f64, size: f64, decimals: i32) -> Self {
        Self {
            min,
            max,
            size,
            decimals,
        }
    }

    /// Drawable length between the two margins.
    fn extent(&self) -> f64 {
        (self.size - 2.0 * PLOT_MARGIN).max(1.0)
    }

    pub fn to_screen(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min) * self.extent() + PLOT_MARGIN
    }

    /// Exact inverse of [`AxisScale::to_screen`], snapped to the decimal grid.
    /// Anything at or before the leading margin reads as the axis minimum.
    pub fn from_screen(&self, screen: f64) -> f64 {
        let adjusted = screen - PLOT_MARGIN;
        if adjusted <= 0.0 {
            return self.min;
        }
        let value = self.min + adjusted / self.extent() * (self.max - self.min);
        round_to(value, self.decimals)
    }
}

// ---------------------------------------------------------------------------
// Orientation flags
// ---------------------------------------------------------------------------

/// How the two logical axes land on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation {
    /// Logical `x` drawn vertically and logical `y` horizontally.
    pub swapped: bool,
    pub x_reversed: bool,
    pub y_reversed: bool,
    /// Values on the vertical screen axis grow upward (chart convention).
    /// The depth plot leaves this off so depth grows downward.
    pub vertical_up: bool,
}

impl Orientation {
    /// Logical `(x, y)` as a `[horizontal, vertical]` chart coordinate.
    /// A reversed axis is negated, which flips its direction on the chart.
    pub fn to_plot(&self, x: f64, y: f64) -> [f64; 2] {
        let x = if self.x_reversed { -x } else { x };
        let y = if self.y_reversed { -y } else { y };
        if self.swapped {
            [y, x]
        } else {
            [x, y]
        }
    }

    /// Chart bounds `(min, max)` covering `limits` after orientation.
    pub fn plot_bounds(&self, limits: &AxisLimits) -> ([f64; 2], [f64; 2]) {
        let a = self.to_plot(limits.xmin, limits.ymin);
        let b = self.to_plot(limits.xmax, limits.ymax);
        ([a[0].min(b[0]), a[1].min(b[1])], [a[0].max(b[0]), a[1].max(b[1])])
    }

    /// Whether tick values on the horizontal chart axis are negated.
    pub fn horizontal_reversed(&self) -> bool {
        if self.swapped {
            self.y_reversed
        } else {
            self.x_reversed
        }
    }

    pub fn vertical_reversed(&self) -> bool {
        if self.swapped {
            self.x_reversed
        } else {
            self.y_reversed
        }
    }
}

// ---------------------------------------------------------------------------
// PlotMapper – logical (x, y) values ↔ plot-local screen points
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotMapper {
    x: AxisScale,
    y: AxisScale,
    orientation: Orientation,
    width: f64,
    height: f64,
}

impl PlotMapper {
    pub fn new(
        limits: &AxisLimits,
        width: f64,
        height: f64,
        orientation: Orientation,
        decimals: i32,
    ) -> Self {
        let (x_size, y_size) = if orientation.swapped {
            (height, width)
        } else {
            (width, height)
        };
        Self {
            x: AxisScale::new(limits.xmin, limits.xmax, x_size, decimals),
            y: AxisScale::new(limits.ymin, limits.ymax, y_size, decimals),
            orientation,
            width,
            height,
        }
    }

    /// Depth-plot mapper: velocity across, depth down, never swapped.
    pub fn depth_plot(limits: &AxisLimits, width: f64, height: f64) -> Self {
        Self::new(limits, width, height, Orientation::default(), DEPTH_DECIMALS)
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn to_screen(&self, x: f64, y: f64) -> Point {
        let (h, v) = if self.orientation.swapped {
            (self.y.to_screen(y), self.x.to_screen(x))
        } else {
            (self.x.to_screen(x), self.y.to_screen(y))
        };
        Point::new(self.orient_h(h), self.orient_v(v))
    }

    /// Inverse of [`PlotMapper::to_screen`]; returns logical `(x, y)`.
    pub fn from_screen(&self, point: Point) -> (f64, f64) {
        let h = self.orient_h(point.x);
        let v = self.orient_v(point.y);
        if self.orientation.swapped {
            (self.x.from_screen(v), self.y.from_screen(h))
        } else {
            (self.x.from_screen(h), self.y.from_screen(v))
        }
    }

    // Reversal is an involution, so the same helpers serve both directions.

    fn orient_h(&self, h: f64) -> f64 {
        let reversed = if self.orientation.swapped {
            self.orientation.y_reversed
        } else {
            self.orientation.x_reversed
        };
        if reversed {
            self.width - h
        } else {
            h
        }
    }

    fn orient_v(&self, v: f64) -> f64 {
        let reversed = if self.orientation.swapped {
            self.orientation.x_reversed
        } else {
            self.orientation.y_reversed
        };
        if reversed != self.orientation.vertical_up {
            self.height - v
        } else {
            v
        }
    }
}
