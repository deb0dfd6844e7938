use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::{AxisLimits, Layer, LayerStack};
use crate::solver::{SiteCode, DEFAULT_WAVE_FACTOR};
use crate::view::units::DisplayUnits;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "DISPER_MODEL_CONFIG";

pub const MIN_CURVE_POINTS: usize = 1;
pub const MAX_CURVE_POINTS: usize = 100;

/// Startup settings. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub initial_layers: Vec<Layer>,
    pub curve_points: usize,
    /// Phase-velocity search window (m/s) used while no picks are loaded.
    pub phase_velocity_window: (f64, f64),
    pub wave_factor: f64,
    pub site_code: SiteCode,
    pub display_units: DisplayUnits,
    /// Period (s) × velocity (m/s).
    pub dispersion_limits: AxisLimits,
    /// Velocity (m/s) × depth (m).
    pub depth_limits: AxisLimits,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_layers: LayerStack::default_model().layers().to_vec(),
            curve_points: 10,
            phase_velocity_window: (10.0, 2000.0),
            wave_factor: DEFAULT_WAVE_FACTOR,
            site_code: SiteCode::default(),
            display_units: DisplayUnits::default(),
            dispersion_limits: AxisLimits::new(0.001, 0.6, 30.0, 500.0),
            depth_limits: AxisLimits::new(50.0, 1400.0, 0.0, 100.0),
        }
    }
}

impl EditorConfig {
    /// Config from [`CONFIG_ENV_VAR`], or defaults when unset or unreadable.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        let path = Path::new(&path);
        match Self::from_path(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("Ignoring config {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("parsing config JSON")?;
        Ok(config.sanitized())
    }

    /// Replace out-of-range values with their defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(MIN_CURVE_POINTS..=MAX_CURVE_POINTS).contains(&self.curve_points) {
            log::warn!("curve_points {} out of range, using {}", self.curve_points, defaults.curve_points);
            self.curve_points = defaults.curve_points;
        }
        let (lo, hi) = self.phase_velocity_window;
        if !(lo > 0.0 && hi > lo && hi.is_finite()) {
            log::warn!("invalid phase_velocity_window ({lo}, {hi}), using default");
            self.phase_velocity_window = defaults.phase_velocity_window;
        }
        if !(self.wave_factor > 0.0 && self.wave_factor.is_finite()) {
            self.wave_factor = defaults.wave_factor;
        }
        if !limits_ok(&self.dispersion_limits) || self.dispersion_limits.xmin <= 0.0 || self.dispersion_limits.ymin <= 0.0 {
            log::warn!("invalid dispersion_limits, using default");
            self.dispersion_limits = defaults.dispersion_limits;
        }
        if !limits_ok(&self.depth_limits) || self.depth_limits.xmin < 0.0 || self.depth_limits.ymin < 0.0 {
            log::warn!("invalid depth_limits, using default");
            self.depth_limits = defaults.depth_limits;
        }
        if let Err(e) = LayerStack::new(self.initial_layers.clone()) {
            log::warn!("invalid initial_layers ({e}), using default model");
            self.initial_layers = defaults.initial_layers;
        }
        self
    }

    /// The starting layer stack.
    pub fn layer_stack(&self) -> LayerStack {
        LayerStack::new(self.initial_layers.clone()).unwrap_or_default()
    }
}

fn limits_ok(l: &AxisLimits) -> bool {
    [l.xmin, l.xmax, l.ymin, l.ymax].iter().all(|v| v.is_finite()) && l.xmin < l.xmax && l.ymin < l.ymax
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.curve_points, 10);
        assert_eq!(config.layer_stack(), LayerStack::default_model());
    }

    #[test]
    fn partial_override() {
        let config = EditorConfig::from_json(
            r#"{ "curve_points": 40, "site_code": "ASCE 7-16", "display_units": "Feet" }"#,
        )
        .unwrap();
        assert_eq!(config.curve_points, 40);
        assert_eq!(config.site_code, SiteCode::Asce7_16);
        assert_eq!(config.display_units, DisplayUnits::Feet);
        assert_eq!(config.wave_factor, DEFAULT_WAVE_FACTOR);
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let config = EditorConfig::from_json(
            r#"{
                "curve_points": 0,
                "phase_velocity_window": [500.0, 100.0],
                "initial_layers": [
                    { "start_depth": 5.0, "end_depth": 10.0, "velocity": 200.0, "density": 2.0 }
                ]
            }"#,
        )
        .unwrap();
        let defaults = EditorConfig::default();
        assert_eq!(config.curve_points, defaults.curve_points);
        assert_eq!(config.phase_velocity_window, defaults.phase_velocity_window);
        assert_eq!(config.initial_layers, defaults.initial_layers);
    }

    #[test]
    fn custom_layers_are_kept() {
        let config = EditorConfig::from_json(
            r#"{ "initial_layers": [
                { "start_depth": 0.0, "end_depth": 8.0, "velocity": 180.0, "density": 1.9 },
                { "start_depth": 8.0, "end_depth": 60.0, "velocity": 520.0, "density": 2.1 }
            ] }"#,
        )
        .unwrap();
        let stack = config.layer_stack();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.layers()[1].velocity, 520.0);
        assert_eq!(stack.layers()[1].ignore, 0.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(EditorConfig::from_json("{ curve_points: ").is_err());
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "wave_factor": 3.0 }"#).unwrap();
        let config = EditorConfig::from_path(&path).unwrap();
        assert_eq!(config.wave_factor, 3.0);
        assert!(EditorConfig::from_path(&dir.path().join("missing.json")).is_err());
    }
}
