use thiserror::Error;

// ---------------------------------------------------------------------------
// Layer stack constraint violations
// ---------------------------------------------------------------------------

/// A mutation that would break a layer-stack invariant.
///
/// These never reach the user: `AppState::apply` logs them at debug level
/// and leaves the stack untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayerError {
    #[error("layer index {index} out of range (stack has {len} layers)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("split depth {depth} is not strictly inside layer {index} ({start}..{end})")]
    SplitOutsideLayer {
        index: usize,
        depth: f64,
        start: f64,
        end: f64,
    },

    #[error("cannot delete the only remaining layer")]
    LastLayer,

    #[error("velocity must be positive, got {0}")]
    NonPositiveVelocity(f64),

    #[error("density must be positive, got {0}")]
    NonPositiveDensity(f64),

    #[error("boundary depth {depth} outside allowed window {min}..{max}")]
    BoundaryOutOfWindow { depth: f64, min: f64, max: f64 },

    #[error("layer {index} does not start where layer {prev} ends")]
    NotContiguous { index: usize, prev: usize },

    #[error("first layer must start at depth 0, got {0}")]
    FirstLayerOffset(f64),

    #[error("layer stack must contain at least one layer")]
    Empty,
}

// ---------------------------------------------------------------------------
// Solver construction failures
// ---------------------------------------------------------------------------

/// Failure to build a velocity model from the layer parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("velocity model needs at least one layer")]
    NoLayers,

    #[error("parameter array '{name}' has {got} entries, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        got: usize,
        expected: usize,
    },

    #[error("parameter '{name}' must be positive and finite at layer {index}")]
    InvalidParameter { name: &'static str, index: usize },

    #[error("phase velocity window {min}..{max} is empty")]
    EmptyWindow { min: f64, max: f64 },
}
