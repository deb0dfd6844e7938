use crate::data::model::PickPoint;
use crate::view::coords::{Point, DISPERSION_DECIMALS};
use crate::view::units::{DisplayUnits, PeriodUnit, VelocityUnit};

/// Pointer distance (px) within which a pick is reported on hover.
pub const PICK_HOVER_RADIUS_PX: f64 = 5.0;

const NOT_AVAILABLE: &str = "N/A";

/// A pick expressed on the dispersion plot's logical axes (displayed
/// period unit × displayed velocity unit, SI). `None` for picks whose
/// frequency or slowness is unusable.
pub fn pick_position(pick: &PickPoint, period_unit: PeriodUnit, velocity_unit: VelocityUnit) -> Option<(f64, f64)> {
    let (f, s) = (pick.frequency(), pick.slowness());
    if !(f.is_finite() && f > 0.0 && s.is_finite() && s > 0.0) {
        return None;
    }
    let x = PeriodUnit::convert(f, PeriodUnit::Frequency, period_unit);
    let y = VelocityUnit::convert(s, VelocityUnit::Slowness, velocity_unit);
    Some((x, y))
}

/// Index of the pick drawn closest to `point`, if within the hover radius.
/// `project` places a logical `(x, y)` in the same screen space as `point`.
pub fn nearest_pick(
    point: Point,
    picks: &[PickPoint],
    project: impl Fn(f64, f64) -> Point,
    period_unit: PeriodUnit,
    velocity_unit: VelocityUnit,
) -> Option<usize> {
    picks
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            let (x, y) = pick_position(p, period_unit, velocity_unit)?;
            Some((i, point.distance(project(x, y))))
        })
        .filter(|&(_, d)| d <= PICK_HOVER_RADIUS_PX)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// `"(0.1250 s, 312.4000 m/s)"` style tooltip for a hovered pick.
pub fn pick_readout(
    pick: &PickPoint,
    period_unit: PeriodUnit,
    velocity_unit: VelocityUnit,
    display: DisplayUnits,
) -> Option<String> {
    let (x, y) = pick_position(pick, period_unit, velocity_unit)?;
    let prec = DISPERSION_DECIMALS as usize;
    Some(format!(
        "({:.prec$} {}, {:.prec$} {})",
        x,
        period_unit.symbol(),
        velocity_unit.to_display(y, display),
        velocity_unit.unit_label(display)
    ))
}

fn velocity_text(value: Option<f64>, display: DisplayUnits) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2} {}/s", display.to_display(v), display.symbol()),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn vs30_text(vs30: Option<f64>, display: DisplayUnits) -> String {
    velocity_text(vs30, display)
}

pub fn rmse_text(rmse: Option<f64>, display: DisplayUnits) -> String {
    velocity_text(rmse, display)
}

pub fn site_class_text(class: Option<&str>) -> String {
    class.unwrap_or(NOT_AVAILABLE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::data::model::AxisLimits;
    use crate::view::coords::{Orientation, PlotMapper};

    fn pick(f: f64, s: f64) -> PickPoint {
        PickPoint {
            fields: [0.0, 0.0, f, 0.0, s, 0.0, 0.0],
        }
    }

    fn mapper() -> PlotMapper {
        let orientation = Orientation {
            vertical_up: true,
            ..Orientation::default()
        };
        PlotMapper::new(
            &AxisLimits::new(0.05, 0.55, 100.0, 600.0),
            520.0,
            520.0,
            orientation,
            DISPERSION_DECIMALS,
        )
    }

    #[test]
    fn position_follows_units() {
        let p = pick(4.0, 0.0025);
        let (x, y) = pick_position(&p, PeriodUnit::Period, VelocityUnit::Velocity).unwrap();
        assert_relative_eq!(x, 0.25);
        assert_relative_eq!(y, 400.0, max_relative = 1e-12);
        assert_eq!(pick_position(&p, PeriodUnit::Frequency, VelocityUnit::Slowness), Some((4.0, 0.0025)));
        assert_eq!(pick_position(&pick(0.0, 0.002), PeriodUnit::Period, VelocityUnit::Velocity), None);
    }

    #[test]
    fn hover_finds_pick_within_radius() {
        let picks = [pick(4.0, 0.0025), pick(10.0, 0.005)];
        let m = mapper();
        let on_first = m.to_screen(0.25, 400.0);
        let near = Point::new(on_first.x + 3.0, on_first.y);
        let far = Point::new(on_first.x + 6.0, on_first.y);
        let units = (PeriodUnit::Period, VelocityUnit::Velocity);
        let project = |x, y| m.to_screen(x, y);
        assert_eq!(nearest_pick(near, &picks, project, units.0, units.1), Some(0));
        assert_eq!(nearest_pick(far, &picks, project, units.0, units.1), None);
    }

    #[test]
    fn readout_text() {
        let p = pick(4.0, 0.0025);
        assert_eq!(
            pick_readout(&p, PeriodUnit::Period, VelocityUnit::Velocity, DisplayUnits::Meters).as_deref(),
            Some("(0.2500 s, 400.0000 m/s)")
        );
        assert_eq!(
            pick_readout(&p, PeriodUnit::Frequency, VelocityUnit::Slowness, DisplayUnits::Meters).as_deref(),
            Some("(4.0000 Hz, 0.0025 s/m)")
        );
    }

    #[test]
    fn scalar_readouts() {
        assert_eq!(rmse_text(Some(10.0), DisplayUnits::Meters), "10.00 m/s");
        assert_eq!(rmse_text(Some(10.0), DisplayUnits::Feet), "32.81 ft/s");
        assert_eq!(rmse_text(None, DisplayUnits::Meters), "N/A");
        assert_eq!(vs30_text(Some(f64::NAN), DisplayUnits::Meters), "N/A");
        assert_eq!(site_class_text(Some("BC")), "BC");
        assert_eq!(site_class_text(None), "N/A");
    }
}
