use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, Ui};
use egui_plot::{GridMark, Legend, Line, Plot, PlotBounds, PlotPoint, PlotPoints, Points};

use crate::data::model::AxisLimits;
use crate::state::{Action, AppState};
use crate::view::coords::{Point, PLOT_MARGIN};
use crate::view::readout;

pub const FRAME_COLOR: Color32 = Color32::from_gray(140);
pub const GRID_COLOR: Color32 = Color32::from_gray(60);
pub const LABEL_COLOR: Color32 = Color32::from_gray(200);
const PICK_COLOR: Color32 = Color32::from_rgb(230, 80, 80);
const CURVE_COLOR: Color32 = Color32::from_rgb(90, 170, 255);

/// Approximate number of labelled ticks per axis.
const TICK_TARGET: usize = 6;

// ---------------------------------------------------------------------------
// Screen helpers shared by both plots
// ---------------------------------------------------------------------------

pub fn to_pos(rect: Rect, p: Point) -> Pos2 {
    rect.min + egui::vec2(p.x as f32, p.y as f32)
}

pub fn to_local(rect: Rect, pos: Pos2) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

/// Evenly spaced "round" values (1, 2 or 5 × 10ⁿ steps) inside `[min, max]`.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let span = hi - lo;
    if !(span > 0.0 && span.is_finite()) || target == 0 {
        return Vec::new();
    }
    let raw = span / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Label with just enough decimals for the tick spacing.
pub fn tick_label(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10() - 1e-9).ceil() as usize
    };
    format!("{value:.decimals$}")
}

/// One axis's ticks: `(screen coordinate along the axis, label)`.
pub type Ticks = Vec<(f64, String)>;

/// Ticks for a value range shown in display units. `to_canonical` maps a
/// display value back to the stored value; `place` maps the stored value to
/// its screen coordinate along the axis.
pub fn axis_ticks(
    display_min: f64,
    display_max: f64,
    to_canonical: impl Fn(f64) -> f64,
    place: impl Fn(f64) -> f64,
) -> Ticks {
    let ticks = nice_ticks(display_min, display_max, TICK_TARGET);
    let step = match ticks.as_slice() {
        [a, b, ..] => b - a,
        _ => 1.0,
    };
    ticks
        .into_iter()
        .map(|t| (place(to_canonical(t)), tick_label(t, step)))
        .collect()
}

/// Frame, grid lines, tick labels and axis titles.
pub fn draw_axes(
    painter: &egui::Painter,
    rect: Rect,
    horizontal: &Ticks,
    vertical: &Ticks,
    horizontal_title: &str,
    vertical_title: &str,
) {
    let m = PLOT_MARGIN as f32;
    let inner = rect.shrink(m);
    let font = FontId::proportional(11.0);

    for (x, label) in horizontal {
        let x = rect.min.x + *x as f32;
        if x < inner.left() - 0.5 || x > inner.right() + 0.5 {
            continue;
        }
        painter.line_segment(
            [Pos2::new(x, inner.top()), Pos2::new(x, inner.bottom())],
            Stroke::new(0.5, GRID_COLOR),
        );
        painter.text(Pos2::new(x, inner.bottom() - 2.0), Align2::CENTER_BOTTOM, label, font.clone(), LABEL_COLOR);
    }
    for (y, label) in vertical {
        let y = rect.min.y + *y as f32;
        if y < inner.top() - 0.5 || y > inner.bottom() + 0.5 {
            continue;
        }
        painter.line_segment(
            [Pos2::new(inner.left(), y), Pos2::new(inner.right(), y)],
            Stroke::new(0.5, GRID_COLOR),
        );
        painter.text(Pos2::new(inner.left() + 2.0, y), Align2::LEFT_CENTER, label, font.clone(), LABEL_COLOR);
    }

    painter.add(Shape::closed_line(
        vec![inner.left_top(), inner.right_top(), inner.right_bottom(), inner.left_bottom()],
        Stroke::new(1.0, FRAME_COLOR),
    ));
    painter.text(
        Pos2::new(inner.center().x, inner.bottom() - 16.0),
        Align2::CENTER_BOTTOM,
        horizontal_title,
        FontId::proportional(12.0),
        LABEL_COLOR,
    );
    painter.text(
        Pos2::new(inner.left() + 4.0, inner.top() + 2.0),
        Align2::LEFT_TOP,
        vertical_title,
        FontId::proportional(12.0),
        LABEL_COLOR,
    );
}

// ---------------------------------------------------------------------------
// Dispersion plot
// ---------------------------------------------------------------------------

fn screen_point(pos: Pos2) -> Point {
    Point::new(pos.x as f64, pos.y as f64)
}

/// Tick label for a chart axis whose values may be negated for reversal.
fn chart_tick(mark: GridMark, reversed: bool) -> String {
    let value = if reversed { -mark.value } else { mark.value };
    tick_label(value, mark.step_size)
}

/// Observed picks and the modeled curve. Hovering a pick shows its value.
pub fn dispersion_plot(ui: &mut Ui, state: &mut AppState) {
    let orientation = state.dispersion_orientation();
    let period_unit = state.period_unit();
    let velocity_unit = state.velocity_unit();
    let display = state.display_units();

    // Logical (x, SI y) → chart coordinate, velocity axis in display units.
    let place = move |x: f64, y: f64| orientation.to_plot(x, velocity_unit.to_display(y, display));

    let limits = *state.dispersion_limits();
    let (bounds_min, bounds_max) = orientation.plot_bounds(&AxisLimits::new(
        limits.xmin,
        limits.xmax,
        velocity_unit.to_display(limits.ymin, display),
        velocity_unit.to_display(limits.ymax, display),
    ));

    let x_title = period_unit.axis_label().to_string();
    let y_title = velocity_unit.axis_label(display);
    let (h_title, v_title) = if orientation.swapped {
        (y_title, x_title)
    } else {
        (x_title, y_title)
    };
    let h_reversed = orientation.horizontal_reversed();
    let v_reversed = orientation.vertical_reversed();

    let curve: PlotPoints = state
        .result()
        .curve
        .iter()
        .map(|&(period, velocity)| place(period_unit.from_period(period), velocity_unit.from_velocity(velocity)))
        .collect();
    let picks: Vec<[f64; 2]> = state
        .picks()
        .iter()
        .filter_map(|p| readout::pick_position(p, period_unit, velocity_unit))
        .map(|(x, y)| place(x, y))
        .collect();

    if state.picks().is_empty() {
        ui.weak("Open a pick file to compare  (File → Open picks…)");
    }

    let picks_ref = state.picks();
    let response = Plot::new("dispersion_plot")
        .legend(Legend::default())
        .x_axis_label(h_title)
        .y_axis_label(v_title)
        .x_axis_formatter(move |mark, _range| chart_tick(mark, h_reversed))
        .y_axis_formatter(move |mark, _range| chart_tick(mark, v_reversed))
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| -> Option<usize> {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(bounds_min, bounds_max));
            if curve.points().len() > 1 {
                plot_ui.line(Line::new(curve).name("Model").color(CURVE_COLOR).width(2.0));
            }
            plot_ui.points(Points::new(picks).name("Picks").color(PICK_COLOR).radius(3.0));

            let pointer = screen_point(plot_ui.screen_from_plot(plot_ui.pointer_coordinate()?));
            readout::nearest_pick(
                pointer,
                picks_ref,
                |x, y| {
                    let [h, v] = place(x, y);
                    screen_point(plot_ui.screen_from_plot(PlotPoint::new(h, v)))
                },
                period_unit,
                velocity_unit,
            )
        });

    state.apply(Action::HoverPick(response.inner));
    if let Some(text) = state.pick_readout() {
        response.response.on_hover_text_at_pointer(text);
    }
}
