use crate::config::{EditorConfig, MAX_CURVE_POINTS, MIN_CURVE_POINTS};
use crate::data::model::{AxisLimits, DataExtents, Layer, LayerStack, PickPoint};
use crate::editor::{EditContext, Gesture, LayerEditor};
use crate::matcher::{self, MatchRequest, MatchResult};
use crate::solver::{ApproxVelocityModel, SiteCode};
use crate::view::autoscale::{autoscale, reciprocal_range, ABS_MIN_BOUND, LOWER_MARGIN_FACTOR, UPPER_MARGIN_FACTOR};
use crate::view::coords::{Orientation, PlotMapper};
use crate::view::readout;
use crate::view::units::{reciprocal, DisplayUnits, PeriodUnit, VelocityUnit};

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// One bound of a plot's [`AxisLimits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    XMin,
    XMax,
    YMin,
    YMax,
}

/// Every way the application state can change.
#[derive(Debug, Clone)]
pub enum Action {
    LoadPicks(Vec<PickPoint>),
    /// Replace the whole stack (file import).
    LoadModel(Vec<Layer>),
    /// Pointer input on the depth plot, with the plot's size in px.
    Edit { gesture: Gesture, plot_size: (f64, f64) },
    /// Index of the pick under the pointer on the dispersion plot.
    HoverPick(Option<usize>),
    SetPeriodUnit(PeriodUnit),
    SetVelocityUnit(VelocityUnit),
    SetDisplayUnits(DisplayUnits),
    SetSwapAxes(bool),
    SetPeriodReversed(bool),
    SetVelocityReversed(bool),
    SetSiteCode(SiteCode),
    SetCurvePoints(usize),
    /// Typed value in display units.
    SetDispersionLimit(Bound, f64),
    /// Typed value in display units.
    SetDepthLimit(Bound, f64),
    Autoscale,
    ReportError(String),
    ClearStatus,
}

/// Smallest axis maximum accepted above `min`. The gap grows with `min` so
/// it stays representable for large values.
fn just_above(min: f64) -> f64 {
    min + ABS_MIN_BOUND.max(min.abs() * 1e-12)
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full editor state, independent of rendering. Read through the
/// accessors; change only through [`AppState::apply`].
pub struct AppState {
    layers: LayerStack,
    picks: Vec<PickPoint>,
    extents: Option<DataExtents>,

    /// Logical axes: x = period/frequency, y = velocity/slowness (SI).
    dispersion_limits: AxisLimits,
    /// x = velocity (m/s), y = depth (m).
    depth_limits: AxisLimits,

    period_unit: PeriodUnit,
    velocity_unit: VelocityUnit,
    display_units: DisplayUnits,
    swap_axes: bool,
    period_reversed: bool,
    velocity_reversed: bool,

    curve_points: usize,
    site_code: SiteCode,
    default_phase_window: (f64, f64),
    wave_factor: f64,

    editor: LayerEditor,
    result: MatchResult,

    hovered_pick: Option<usize>,

    /// Status / error message shown in the UI.
    status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl AppState {
    pub fn new(config: &EditorConfig) -> Self {
        let mut state = Self {
            layers: config.layer_stack(),
            picks: Vec::new(),
            extents: None,
            dispersion_limits: config.dispersion_limits,
            depth_limits: config.depth_limits,
            period_unit: PeriodUnit::default(),
            velocity_unit: VelocityUnit::default(),
            display_units: config.display_units,
            swap_axes: false,
            period_reversed: false,
            velocity_reversed: false,
            curve_points: config.curve_points.clamp(MIN_CURVE_POINTS, MAX_CURVE_POINTS),
            site_code: config.site_code,
            default_phase_window: config.phase_velocity_window,
            wave_factor: config.wave_factor,
            editor: LayerEditor::default(),
            result: MatchResult::default(),
            hovered_pick: None,
            status_message: None,
        };
        if state.layers.pin_last_boundary_to(state.depth_limits.ymax).is_err() {
            // Configured depth axis ends above the half-space top.
            state.depth_limits = AxisLimits::fit_model(state.layers.layers());
            state.pin_half_space();
        }
        state.recompute();
        state
    }

    // -- read-only projections ------------------------------------------------

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn picks(&self) -> &[PickPoint] {
        &self.picks
    }

    pub fn dispersion_limits(&self) -> &AxisLimits {
        &self.dispersion_limits
    }

    pub fn depth_limits(&self) -> &AxisLimits {
        &self.depth_limits
    }

    pub fn period_unit(&self) -> PeriodUnit {
        self.period_unit
    }

    pub fn velocity_unit(&self) -> VelocityUnit {
        self.velocity_unit
    }

    pub fn display_units(&self) -> DisplayUnits {
        self.display_units
    }

    pub fn swap_axes(&self) -> bool {
        self.swap_axes
    }

    pub fn period_reversed(&self) -> bool {
        self.period_reversed
    }

    pub fn velocity_reversed(&self) -> bool {
        self.velocity_reversed
    }

    pub fn curve_points(&self) -> usize {
        self.curve_points
    }

    pub fn site_code(&self) -> SiteCode {
        self.site_code
    }

    pub fn editor(&self) -> &LayerEditor {
        &self.editor
    }

    pub fn result(&self) -> &MatchResult {
        &self.result
    }

    /// Tooltip for the hovered pick, in the current units.
    pub fn pick_readout(&self) -> Option<String> {
        let pick = self.picks.get(self.hovered_pick?)?;
        readout::pick_readout(pick, self.period_unit, self.velocity_unit, self.display_units)
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn dispersion_orientation(&self) -> Orientation {
        Orientation {
            swapped: self.swap_axes,
            x_reversed: self.period_reversed,
            y_reversed: self.velocity_reversed,
            vertical_up: true,
        }
    }

    pub fn depth_mapper(&self, width: f64, height: f64) -> PlotMapper {
        PlotMapper::depth_plot(&self.depth_limits, width, height)
    }

    /// Phase-velocity search window handed to the solver: from the picks'
    /// slowness range when picks are loaded, otherwise the configured one.
    pub fn phase_velocity_window(&self) -> (f64, f64) {
        match &self.extents {
            Some(e) => (
                reciprocal(e.max_slowness) * LOWER_MARGIN_FACTOR,
                reciprocal(e.min_slowness) * UPPER_MARGIN_FACTOR,
            ),
            None => self.default_phase_window,
        }
    }

    // -- state transition -----------------------------------------------------

    /// Apply one action. Derived values (modeled curve, RMSE, Vs30, site
    /// class) are recomputed once afterwards if anything they depend on
    /// changed.
    pub fn apply(&mut self, action: Action) {
        let dirty = match action {
            Action::LoadPicks(picks) => self.load_picks(picks),
            Action::LoadModel(layers) => self.load_model(layers),
            Action::Edit { gesture, plot_size } => self.edit(gesture, plot_size),
            Action::HoverPick(index) => {
                self.hovered_pick = index;
                false
            }
            Action::SetPeriodUnit(unit) => {
                if unit == self.period_unit {
                    return;
                }
                self.period_unit = unit;
                if !self.autoscale() {
                    let (lo, hi) = reciprocal_range(self.dispersion_limits.xmin, self.dispersion_limits.xmax);
                    self.dispersion_limits.xmin = lo;
                    self.dispersion_limits.xmax = hi;
                }
                true
            }
            Action::SetVelocityUnit(unit) => {
                if unit == self.velocity_unit {
                    return;
                }
                self.velocity_unit = unit;
                if !self.autoscale() {
                    let (lo, hi) = reciprocal_range(self.dispersion_limits.ymin, self.dispersion_limits.ymax);
                    self.dispersion_limits.ymin = lo;
                    self.dispersion_limits.ymax = hi;
                }
                true
            }
            Action::SetDisplayUnits(units) => {
                self.display_units = units;
                false
            }
            Action::SetSwapAxes(swap) => {
                if swap == self.swap_axes {
                    return;
                }
                self.swap_axes = swap;
                self.autoscale();
                true
            }
            Action::SetPeriodReversed(reversed) => {
                self.period_reversed = reversed;
                false
            }
            Action::SetVelocityReversed(reversed) => {
                self.velocity_reversed = reversed;
                false
            }
            Action::SetSiteCode(code) => {
                self.site_code = code;
                true
            }
            Action::SetCurvePoints(n) => {
                self.curve_points = n.clamp(MIN_CURVE_POINTS, MAX_CURVE_POINTS);
                true
            }
            Action::SetDispersionLimit(bound, value) => self.set_dispersion_limit(bound, value),
            Action::SetDepthLimit(bound, value) => self.set_depth_limit(bound, value),
            Action::Autoscale => self.autoscale(),
            Action::ReportError(message) => {
                log::error!("{message}");
                self.status_message = Some(message);
                false
            }
            Action::ClearStatus => {
                self.status_message = None;
                false
            }
        };
        if dirty {
            self.recompute();
        }
    }

    fn load_picks(&mut self, picks: Vec<PickPoint>) -> bool {
        log::info!("Loaded {} picks", picks.len());
        self.extents = DataExtents::from_picks(&picks);
        self.picks = picks;
        self.hovered_pick = None;
        self.status_message = None;
        self.autoscale();
        true
    }

    fn load_model(&mut self, layers: Vec<Layer>) -> bool {
        let limits = AxisLimits::fit_model(&layers);
        if let Err(e) = self.layers.set_all(layers) {
            log::debug!("rejected velocity model: {e}");
            self.status_message = Some(format!("Invalid velocity model: {e}"));
            return false;
        }
        log::info!("Loaded velocity model with {} layers", self.layers.len());
        self.depth_limits = limits;
        self.pin_half_space();
        self.editor = LayerEditor::default();
        self.status_message = None;
        true
    }

    fn edit(&mut self, gesture: Gesture, (width, height): (f64, f64)) -> bool {
        let Some(gesture) = gesture.validated() else {
            log::debug!("dropped non-finite gesture");
            return false;
        };
        let mapper = self.depth_mapper(width, height);
        let ctx = EditContext {
            mapper: &mapper,
            limits: &self.depth_limits,
        };
        self.editor.handle(gesture, &mut self.layers, ctx)
    }

    /// Fit the dispersion axes to the picks. `false` when there are none.
    fn autoscale(&mut self) -> bool {
        match &self.extents {
            Some(extents) => {
                self.dispersion_limits = autoscale(extents, self.period_unit, self.velocity_unit);
                true
            }
            None => false,
        }
    }

    fn set_dispersion_limit(&mut self, bound: Bound, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let value = match bound {
            Bound::XMin | Bound::XMax => value,
            Bound::YMin | Bound::YMax => self.velocity_unit.from_display(value, self.display_units),
        };
        let l = &mut self.dispersion_limits;
        let (min, max) = match bound {
            Bound::XMin | Bound::XMax => (&mut l.xmin, &mut l.xmax),
            Bound::YMin | Bound::YMax => (&mut l.ymin, &mut l.ymax),
        };
        match bound {
            Bound::XMin | Bound::YMin => {
                *min = value.max(ABS_MIN_BOUND);
                if *min >= *max {
                    *max = just_above(*min);
                }
            }
            Bound::XMax | Bound::YMax => {
                *max = value.max(just_above(*min));
            }
        }
        true
    }

    fn set_depth_limit(&mut self, bound: Bound, value: f64) -> bool {
        let value = self.display_units.from_display(value);
        if !(value.is_finite() && value >= 0.0) {
            log::debug!("rejected depth-plot limit {value}");
            return false;
        }
        let mut limits = self.depth_limits;
        match bound {
            Bound::XMin => limits.xmin = value,
            Bound::XMax => limits.xmax = value,
            Bound::YMin => limits.ymin = value,
            Bound::YMax => limits.ymax = value,
        }
        if !(limits.xmin < limits.xmax && limits.ymin < limits.ymax) {
            log::debug!("rejected depth-plot limit {value}: empty range");
            return false;
        }
        if bound == Bound::YMax {
            if let Err(e) = self.layers.pin_last_boundary_to(value) {
                log::debug!("rejected depth maximum: {e}");
                return false;
            }
        }
        self.depth_limits = limits;
        true
    }

    /// Glue the half-space to the depth-axis maximum, widening the axis if
    /// it would end above the half-space top.
    fn pin_half_space(&mut self) {
        if let Err(e) = self.layers.pin_last_boundary_to(self.depth_limits.ymax) {
            log::debug!("depth axis too short for half-space ({e}), refitting");
            let bottom = self.layers.max_depth().max(self.layers.last().start_depth + 1.0);
            self.depth_limits.ymax = bottom.ceil();
            if let Err(e) = self.layers.pin_last_boundary_to(self.depth_limits.ymax) {
                log::debug!("half-space left unpinned: {e}");
            }
        }
    }

    fn recompute(&mut self) {
        let request = MatchRequest {
            layers: self.layers.layers(),
            picks: &self.picks,
            domain: (self.dispersion_limits.xmin, self.dispersion_limits.xmax),
            period_unit: self.period_unit,
            samples: self.curve_points,
            phase_vel_window: self.phase_velocity_window(),
            wave_factor: self.wave_factor,
            site_code: self.site_code,
        };
        match matcher::evaluate::<ApproxVelocityModel>(&request) {
            Ok(result) => self.result = result,
            Err(e) => {
                log::warn!("solver failed: {e}");
                self.status_message = Some(format!("Solver failed: {e}"));
                self.result = MatchResult::default();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::coords::Point;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const PLOT: (f64, f64) = (640.0, 480.0);

    fn pick(f: f64, s: f64) -> PickPoint {
        PickPoint {
            fields: [0.0, 0.0, f, 0.0, s, 0.0, 0.0],
        }
    }

    fn picks() -> Vec<PickPoint> {
        vec![pick(10.0, 0.004), pick(1.0, 0.002), pick(5.0, 0.003)]
    }

    #[test]
    fn starts_with_pinned_default_model() {
        let state = AppState::default();
        assert_eq!(state.layers().len(), 3);
        assert_eq!(state.layers().max_depth(), state.depth_limits().ymax);
        assert_eq!(state.depth_limits().ymax, 100.0);
        assert!(!state.result().curve.is_empty());
        assert!(state.result().vs30.is_some());
        assert!(state.result().rmse.is_none());
    }

    #[test]
    fn short_depth_axis_is_widened() {
        let config = EditorConfig {
            depth_limits: AxisLimits::new(50.0, 1400.0, 0.0, 40.0),
            ..EditorConfig::default()
        };
        let state = AppState::new(&config);
        assert!(state.depth_limits().ymax > 44.0);
        assert_eq!(state.layers().max_depth(), state.depth_limits().ymax);
    }

    #[test]
    fn loading_picks_autoscales() {
        let mut state = AppState::default();
        state.apply(Action::LoadPicks(picks()));
        let l = state.dispersion_limits();
        assert_relative_eq!(l.xmin, 0.09, max_relative = 1e-12);
        assert_relative_eq!(l.xmax, 1.1, max_relative = 1e-12);
        assert_relative_eq!(l.ymin, 225.0, max_relative = 1e-12);
        assert_relative_eq!(l.ymax, 550.0, max_relative = 1e-12);
        assert_eq!(state.result().pick_indices.len(), 3);
    }

    #[test]
    fn phase_window_follows_picks() {
        let mut state = AppState::default();
        assert_eq!(state.phase_velocity_window(), (10.0, 2000.0));
        state.apply(Action::LoadPicks(picks()));
        let (lo, hi) = state.phase_velocity_window();
        assert_relative_eq!(lo, 225.0, max_relative = 1e-12);
        assert_relative_eq!(hi, 550.0, max_relative = 1e-12);
    }

    #[test]
    fn unit_switch_rescales_from_picks() {
        let mut state = AppState::default();
        state.apply(Action::LoadPicks(picks()));
        state.apply(Action::SetPeriodUnit(PeriodUnit::Frequency));
        let l = state.dispersion_limits();
        assert_relative_eq!(l.xmin, 0.9, max_relative = 1e-12);
        assert_relative_eq!(l.xmax, 11.0, max_relative = 1e-12);
        state.apply(Action::SetVelocityUnit(VelocityUnit::Slowness));
        let l = state.dispersion_limits();
        assert_relative_eq!(l.ymin, 0.0018, max_relative = 1e-12);
        assert_relative_eq!(l.ymax, 0.0044, max_relative = 1e-12);
    }

    #[test]
    fn unit_switch_without_picks_inverts_range() {
        let mut state = AppState::default();
        state.apply(Action::SetPeriodUnit(PeriodUnit::Frequency));
        let l = state.dispersion_limits();
        assert_relative_eq!(l.xmin, 1.0 / 0.6, max_relative = 1e-12);
        assert_relative_eq!(l.xmax, 1000.0, max_relative = 1e-12);
    }

    #[test]
    fn manual_override_persists_until_next_trigger() {
        let mut state = AppState::default();
        state.apply(Action::LoadPicks(picks()));
        state.apply(Action::SetDispersionLimit(Bound::XMax, 2.0));
        assert_eq!(state.dispersion_limits().xmax, 2.0);
        state.apply(Action::SetPeriodReversed(true));
        assert_eq!(state.dispersion_limits().xmax, 2.0);
        state.apply(Action::SetSwapAxes(true));
        assert_relative_eq!(state.dispersion_limits().xmax, 1.1, max_relative = 1e-12);
    }

    #[test]
    fn dispersion_limit_entry_rules() {
        let mut state = AppState::default();
        state.apply(Action::SetDispersionLimit(Bound::XMin, -3.0));
        assert_eq!(state.dispersion_limits().xmin, ABS_MIN_BOUND);

        state.apply(Action::SetDispersionLimit(Bound::XMin, 5.0));
        assert_eq!(state.dispersion_limits().xmin, 5.0);
        assert_eq!(state.dispersion_limits().xmax, 5.0 + ABS_MIN_BOUND);

        state.apply(Action::SetDispersionLimit(Bound::XMax, 1.0));
        assert_eq!(state.dispersion_limits().xmax, 5.0 + ABS_MIN_BOUND);

        state.apply(Action::SetDisplayUnits(DisplayUnits::Feet));
        state.apply(Action::SetDispersionLimit(Bound::YMax, 3280.84));
        assert_relative_eq!(state.dispersion_limits().ymax, 1000.0, max_relative = 1e-12);
    }

    #[test]
    fn depth_limit_entry_rules() {
        let mut state = AppState::default();
        let before = *state.depth_limits();
        state.apply(Action::SetDepthLimit(Bound::XMin, -1.0));
        assert_eq!(*state.depth_limits(), before);
        state.apply(Action::SetDepthLimit(Bound::YMax, 20.0));
        assert_eq!(*state.depth_limits(), before);

        state.apply(Action::SetDepthLimit(Bound::YMax, 80.0));
        assert_eq!(state.depth_limits().ymax, 80.0);
        assert_eq!(state.layers().max_depth(), 80.0);

        state.apply(Action::SetDisplayUnits(DisplayUnits::Feet));
        state.apply(Action::SetDepthLimit(Bound::XMax, 3280.84));
        assert_relative_eq!(state.depth_limits().xmax, 1000.0, max_relative = 1e-12);
    }

    #[test]
    fn loading_model_fits_depth_plot() {
        let mut state = AppState::default();
        state.apply(Action::LoadModel(vec![
            Layer::new(0.0, 10.0, 200.0, 1.8),
            Layer::new(10.0, 55.5, 1000.0, 2.1),
        ]));
        let l = state.depth_limits();
        assert_eq!(l.xmin, 0.0);
        assert_eq!(l.xmax, (1000.0f64 * 1.1).ceil());
        assert_eq!(l.ymax, 56.0);
        assert_eq!(state.layers().max_depth(), 56.0);
    }

    #[test]
    fn split_through_edit_recomputes() {
        let mut state = AppState::default();
        let vs30_before = state.result().vs30.unwrap();
        let at = state.depth_mapper(PLOT.0, PLOT.1).to_screen(300.0, 15.0);
        state.apply(Action::Edit {
            gesture: Gesture::SplitRequest(at),
            plot_size: PLOT,
        });
        assert_eq!(state.layers().len(), 4);
        // Same velocities, so Vs30 is unchanged.
        assert_relative_eq!(state.result().vs30.unwrap(), vs30_before, max_relative = 1e-12);
    }

    #[test]
    fn velocity_drag_changes_vs30() {
        let mut state = AppState::default();
        let before = state.result().vs30.unwrap();
        let mapper = state.depth_mapper(PLOT.0, PLOT.1);
        state.apply(Action::Edit {
            gesture: Gesture::DragStart(mapper.to_screen(760.0, 15.0)),
            plot_size: PLOT,
        });
        state.apply(Action::Edit {
            gesture: Gesture::DragMove(mapper.to_screen(400.0, 15.0)),
            plot_size: PLOT,
        });
        state.apply(Action::Edit {
            gesture: Gesture::DragEnd,
            plot_size: PLOT,
        });
        assert!(!state.editor().is_dragging());
        assert_abs_diff_eq!(state.layers().layers()[0].velocity, 400.0, epsilon = 0.05);
        assert!(state.result().vs30.unwrap() < before);
    }

    #[test]
    fn non_finite_gesture_is_ignored() {
        let mut state = AppState::default();
        let before = state.layers().clone();
        state.apply(Action::Edit {
            gesture: Gesture::SplitRequest(Point::new(f64::NAN, 100.0)),
            plot_size: PLOT,
        });
        assert_eq!(*state.layers(), before);
    }

    #[test]
    fn hover_over_pick_sets_readout() {
        let mut state = AppState::default();
        state.apply(Action::LoadPicks(vec![pick(4.0, 0.0025)]));
        state.apply(Action::HoverPick(Some(0)));
        assert_eq!(state.pick_readout().as_deref(), Some("(0.2500 s, 400.0000 m/s)"));

        // Follows a unit switch without another hover.
        state.apply(Action::SetPeriodUnit(PeriodUnit::Frequency));
        assert_eq!(state.pick_readout().as_deref(), Some("(4.0000 Hz, 400.0000 m/s)"));

        state.apply(Action::HoverPick(Some(7)));
        assert_eq!(state.pick_readout(), None);
        state.apply(Action::HoverPick(None));
        assert_eq!(state.pick_readout(), None);
    }

    #[test]
    fn reloading_picks_clears_hover() {
        let mut state = AppState::default();
        state.apply(Action::LoadPicks(vec![pick(4.0, 0.0025)]));
        state.apply(Action::HoverPick(Some(0)));
        state.apply(Action::LoadPicks(vec![pick(2.0, 0.002)]));
        assert_eq!(state.pick_readout(), None);
    }

    #[test]
    fn edit_readout_follows_display_units() {
        let mut state = AppState::default();
        let at = state.depth_mapper(PLOT.0, PLOT.1).to_screen(760.0, 15.0);
        state.apply(Action::Edit {
            gesture: Gesture::Hover(at),
            plot_size: PLOT,
        });
        let text = |state: &AppState| state.editor().readout().map(|r| r.text(state.display_units()));
        assert_eq!(text(&state).as_deref(), Some("Velocity: 760.0 m/s"));
        state.apply(Action::SetDisplayUnits(DisplayUnits::Feet));
        assert_eq!(text(&state).as_deref(), Some("Velocity: 2493.4 ft/s"));
    }

    #[test]
    fn large_dispersion_minimum_keeps_a_non_empty_range() {
        let mut state = AppState::default();
        state.apply(Action::SetDispersionLimit(Bound::YMin, 3.0e9));
        let l = state.dispersion_limits();
        assert_eq!(l.ymin, 3.0e9);
        assert!(l.ymax > l.ymin);
        state.apply(Action::SetDispersionLimit(Bound::YMax, 1.0));
        let l = state.dispersion_limits();
        assert!(l.ymax > l.ymin);
    }

    #[test]
    fn curve_points_are_clamped() {
        let mut state = AppState::default();
        state.apply(Action::SetCurvePoints(0));
        assert_eq!(state.curve_points(), 1);
        state.apply(Action::SetCurvePoints(500));
        assert_eq!(state.curve_points(), 100);
        assert_eq!(state.result().samples.len(), 101);
    }

    #[test]
    fn site_code_changes_class() {
        let mut state = AppState::default();
        let vs30 = state.result().vs30.unwrap();
        assert!(vs30 > 640.0 && vs30 < 762.0, "vs30 = {vs30}");
        assert_eq!(state.result().site_class.as_deref(), Some("BC"));
        state.apply(Action::SetSiteCode(SiteCode::Asce7_16));
        assert_eq!(state.result().site_class.as_deref(), Some("C"));
    }

    #[test]
    fn status_round_trip() {
        let mut state = AppState::default();
        state.apply(Action::ReportError("could not read file".into()));
        assert_eq!(state.status_message(), Some("could not read file"));
        state.apply(Action::ClearStatus);
        assert_eq!(state.status_message(), None);
    }
}
