use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::model::Layer;
use crate::error::SolverError;

/// Default ratio of wavelength to sampled depth.
pub const DEFAULT_WAVE_FACTOR: f64 = 2.0;

/// Depth over which Vs30 is averaged (m).
const VS30_DEPTH: f64 = 30.0;

/// Rayleigh phase velocity as a fraction of the averaged shear velocity.
/// Repeated in src/bin/generate_sample.rs.
const RAYLEIGH_RATIO: f64 = 0.92;

const MAX_ITERATIONS: usize = 100;
const TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Solver inputs
// ---------------------------------------------------------------------------

/// Everything a velocity model is constructed from.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    pub layer_count: usize,
    pub thicknesses: Vec<f64>,
    pub densities: Vec<f64>,
    pub compression_velocities: Vec<f64>,
    pub shear_velocities: Vec<f64>,
    pub phase_vel_min: f64,
    pub phase_vel_max: f64,
    pub wave_factor: f64,
}

impl ModelParams {
    /// Derive solver inputs from the layer stack. Compression velocity is
    /// estimated as `Vs·√3`.
    pub fn from_layers(layers: &[Layer], phase_vel_min: f64, phase_vel_max: f64, wave_factor: f64) -> Self {
        let shear_velocities: Vec<f64> = layers.iter().map(|l| l.velocity).collect();
        Self {
            layer_count: layers.len(),
            thicknesses: layers.iter().map(Layer::thickness).collect(),
            densities: layers.iter().map(|l| l.density).collect(),
            compression_velocities: shear_velocities.iter().map(|v| v * 3f64.sqrt()).collect(),
            shear_velocities,
            phase_vel_min,
            phase_vel_max,
            wave_factor,
        }
    }

    fn validate(&self) -> Result<(), SolverError> {
        if self.layer_count == 0 {
            return Err(SolverError::NoLayers);
        }
        let arrays: [(&'static str, &[f64]); 4] = [
            ("thicknesses", &self.thicknesses),
            ("densities", &self.densities),
            ("compression_velocities", &self.compression_velocities),
            ("shear_velocities", &self.shear_velocities),
        ];
        for (name, values) in arrays {
            if values.len() != self.layer_count {
                return Err(SolverError::LengthMismatch {
                    name,
                    got: values.len(),
                    expected: self.layer_count,
                });
            }
            if let Some(index) = values.iter().position(|v| !(v.is_finite() && *v > 0.0)) {
                return Err(SolverError::InvalidParameter { name, index });
            }
        }
        if !(self.wave_factor.is_finite() && self.wave_factor > 0.0) {
            return Err(SolverError::InvalidParameter {
                name: "wave_factor",
                index: 0,
            });
        }
        if !(self.phase_vel_min < self.phase_vel_max) {
            return Err(SolverError::EmptyWindow {
                min: self.phase_vel_min,
                max: self.phase_vel_max,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Solver contract
// ---------------------------------------------------------------------------

/// The forward model consumed by the curve matcher.
pub trait VelocityModel: Sized {
    fn build(params: ModelParams) -> Result<Self, SolverError>;

    /// Time-averaged shear velocity of the top 30 m.
    fn vs30(&self) -> f64;

    /// Modeled phase velocity at `period` seconds, or `None` when it falls
    /// outside the configured phase-velocity window.
    fn phase_velocity(&self, period: f64) -> Option<f64>;

    /// Site class for a normalized code name (e.g. `asce_7_22`).
    fn classify_site(code: &str, vs30: f64) -> Option<String>;
}

// ---------------------------------------------------------------------------
// Site-classification codes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SiteCode {
    #[default]
    #[serde(rename = "ASCE 7-22")]
    Asce7_22,
    #[serde(rename = "ASCE 7-16")]
    Asce7_16,
}

impl SiteCode {
    pub const ALL: [SiteCode; 2] = [SiteCode::Asce7_22, SiteCode::Asce7_16];

    pub fn label(self) -> &'static str {
        match self {
            SiteCode::Asce7_22 => "ASCE 7-22",
            SiteCode::Asce7_16 => "ASCE 7-16",
        }
    }

    /// The name forwarded to the solver.
    pub fn normalized(self) -> String {
        normalize_code(self.label())
    }
}

impl fmt::Display for SiteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower-case, with spaces and hyphens turned into underscores.
pub fn normalize_code(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Lower Vs30 bound (m/s) of each class, fastest first.
const ASCE_7_16_CLASSES: [(f64, &str); 5] = [
    (1524.0, "A"),
    (762.0, "B"),
    (366.0, "C"),
    (183.0, "D"),
    (0.0, "E"),
];

const ASCE_7_22_CLASSES: [(f64, &str); 8] = [
    (1524.0, "A"),
    (914.0, "B"),
    (640.0, "BC"),
    (442.0, "C"),
    (305.0, "CD"),
    (213.0, "D"),
    (152.0, "DE"),
    (0.0, "E"),
];

fn site_class(code: &str, vs30: f64) -> Option<String> {
    if !(vs30.is_finite() && vs30 > 0.0) {
        return None;
    }
    let table: &[(f64, &str)] = match code {
        "asce_7_16" => &ASCE_7_16_CLASSES,
        "asce_7_22" => &ASCE_7_22_CLASSES,
        _ => return None,
    };
    table
        .iter()
        .find(|(lower, _)| vs30 > *lower)
        .map(|(_, class)| class.to_string())
}

// ---------------------------------------------------------------------------
// Built-in approximate model
// ---------------------------------------------------------------------------

/// Fast approximation used when no numerical solver is plugged in: the phase
/// velocity at period `T` is the fixed point of
/// `c = 0.92 · V̄s(c·T / wave_factor)`, where `V̄s(z)` is the travel-time
/// average shear velocity down to depth `z` (the last layer extends forever).
#[derive(Debug, Clone)]
pub struct ApproxVelocityModel {
    tops: Vec<f64>,
    shear_velocities: Vec<f64>,
    phase_vel_min: f64,
    phase_vel_max: f64,
    wave_factor: f64,
}

impl ApproxVelocityModel {
    /// Travel-time average shear velocity from the surface to `depth`.
    fn average_vs(&self, depth: f64) -> f64 {
        if depth <= 0.0 {
            return self.shear_velocities[0];
        }
        let mut time = 0.0;
        for (i, &vs) in self.shear_velocities.iter().enumerate() {
            let top = self.tops[i];
            if top >= depth {
                break;
            }
            let bottom = match self.tops.get(i + 1) {
                Some(&next) => next.min(depth),
                None => depth,
            };
            time += (bottom - top) / vs;
        }
        depth / time
    }
}

impl VelocityModel for ApproxVelocityModel {
    fn build(params: ModelParams) -> Result<Self, SolverError> {
        params.validate()?;
        let mut tops = Vec::with_capacity(params.layer_count);
        let mut depth = 0.0;
        for h in &params.thicknesses {
            tops.push(depth);
            depth += h;
        }
        Ok(Self {
            tops,
            shear_velocities: params.shear_velocities,
            phase_vel_min: params.phase_vel_min,
            phase_vel_max: params.phase_vel_max,
            wave_factor: params.wave_factor,
        })
    }

    fn vs30(&self) -> f64 {
        self.average_vs(VS30_DEPTH)
    }

    fn phase_velocity(&self, period: f64) -> Option<f64> {
        if !(period.is_finite() && period > 0.0) {
            return None;
        }
        let mut c = RAYLEIGH_RATIO * self.shear_velocities[0];
        for _ in 0..MAX_ITERATIONS {
            let target = RAYLEIGH_RATIO * self.average_vs(c * period / self.wave_factor);
            let next = 0.5 * (c + target);
            let done = (next - c).abs() <= TOLERANCE * c;
            c = next;
            if done {
                break;
            }
        }
        (c >= self.phase_vel_min && c <= self.phase_vel_max).then_some(c)
    }

    fn classify_site(code: &str, vs30: f64) -> Option<String> {
        site_class(code, vs30)
    }
}
