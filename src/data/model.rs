use serde::{Deserialize, Serialize};

use crate::error::LayerError;

/// Smallest gap (m) kept between a dragged boundary and its neighbours.
pub const BOUNDARY_EPSILON: f64 = 0.1;

/// Contiguity tolerance used when validating externally supplied stacks.
const CONTIGUITY_TOLERANCE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Layer – one depth interval of the earth model
// ---------------------------------------------------------------------------

/// A single layer, stored in SI units (m, m/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub start_depth: f64,
    pub end_depth: f64,
    /// Shear-wave velocity.
    pub velocity: f64,
    pub density: f64,
    /// Carried through the model file untouched.
    #[serde(default)]
    pub ignore: f64,
}

impl Layer {
    pub fn new(start_depth: f64, end_depth: f64, velocity: f64, density: f64) -> Self {
        Self {
            start_depth,
            end_depth,
            velocity,
            density,
            ignore: 0.0,
        }
    }

    pub fn thickness(&self) -> f64 {
        self.end_depth - self.start_depth
    }

    /// Whether `depth` lies strictly between the layer's top and bottom.
    pub fn contains_strictly(&self, depth: f64) -> bool {
        self.start_depth < depth && depth < self.end_depth
    }
}

// ---------------------------------------------------------------------------
// LayerStack – ordered, contiguous sequence of layers
// ---------------------------------------------------------------------------

/// The layered model. Every public mutation either keeps the invariants
/// (sorted, contiguous, first start at 0, positive velocity/density,
/// non-empty) or returns a [`LayerError`] and leaves the stack unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    /// Build a stack from externally supplied layers, validating invariants.
    pub fn new(layers: Vec<Layer>) -> Result<Self, LayerError> {
        validate_layers(&layers)?;
        Ok(Self { layers })
    }

    /// The three-layer model shown when the editor starts.
    pub fn default_model() -> Self {
        Self {
            layers: vec![
                Layer::new(0.0, 30.0, 760.0, 2.0),
                Layer::new(30.0, 44.0, 1061.0, 2.0),
                Layer::new(44.0, 144.0, 1270.657, 2.0),
            ],
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn last(&self) -> &Layer {
        // Non-empty by construction.
        &self.layers[self.layers.len() - 1]
    }

    /// Bottom of the half-space.
    pub fn max_depth(&self) -> f64 {
        self.last().end_depth
    }

    /// Index of the layer whose open depth interval contains `depth`.
    pub fn layer_at_depth(&self, depth: f64) -> Option<usize> {
        self.layers.iter().position(|l| l.contains_strictly(depth))
    }

    /// Replace the whole stack (file import).
    pub fn set_all(&mut self, layers: Vec<Layer>) -> Result<(), LayerError> {
        validate_layers(&layers)?;
        self.layers = layers;
        Ok(())
    }

    /// Split layer `index` in two at `at_depth`; both halves keep the
    /// original velocity, density and ignore flag.
    pub fn split_layer(&mut self, index: usize, at_depth: f64) -> Result<(), LayerError> {
        let layer = *self.layer_checked(index)?;
        if !layer.contains_strictly(at_depth) {
            return Err(LayerError::SplitOutsideLayer {
                index,
                depth: at_depth,
                start: layer.start_depth,
                end: layer.end_depth,
            });
        }
        let upper = Layer {
            end_depth: at_depth,
            ..layer
        };
        let lower = Layer {
            start_depth: at_depth,
            ..layer
        };
        self.layers[index] = upper;
        self.layers.insert(index + 1, lower);
        Ok(())
    }

    /// Remove layer `index` and close the gap it leaves.
    ///
    /// * first layer: the new first layer is pinned to depth 0
    /// * last layer: the new last layer takes over the old maximum depth
    /// * middle layer: the preceding layer is extended to the removed
    ///   layer's end depth
    pub fn delete_layer(&mut self, index: usize) -> Result<(), LayerError> {
        let removed = *self.layer_checked(index)?;
        if self.layers.len() == 1 {
            return Err(LayerError::LastLayer);
        }
        let old_max = self.max_depth();
        self.layers.remove(index);

        if index == 0 {
            self.layers[0].start_depth = 0.0;
        } else if index == self.layers.len() {
            let last = self.layers.len() - 1;
            self.layers[last].end_depth = old_max;
        } else {
            self.layers[index - 1].end_depth = removed.end_depth;
        }
        Ok(())
    }

    /// Move the boundary at the bottom of layer `index`. For an interior
    /// boundary the next layer's top moves with it.
    pub fn set_boundary_depth(&mut self, index: usize, depth: f64) -> Result<(), LayerError> {
        let layer = *self.layer_checked(index)?;
        let max = self
            .layers
            .get(index + 1)
            .map(|next| next.end_depth)
            .unwrap_or(f64::INFINITY);
        if !(depth > layer.start_depth && depth < max) {
            return Err(LayerError::BoundaryOutOfWindow {
                depth,
                min: layer.start_depth,
                max,
            });
        }
        self.layers[index].end_depth = depth;
        if let Some(next) = self.layers.get_mut(index + 1) {
            next.start_depth = depth;
        }
        Ok(())
    }

    pub fn set_velocity(&mut self, index: usize, velocity: f64) -> Result<(), LayerError> {
        self.layer_checked(index)?;
        if !(velocity > 0.0 && velocity.is_finite()) {
            return Err(LayerError::NonPositiveVelocity(velocity));
        }
        self.layers[index].velocity = velocity;
        Ok(())
    }

    /// Glue the half-space bottom to the depth-axis maximum.
    pub fn pin_last_boundary_to(&mut self, depth_axis_max: f64) -> Result<(), LayerError> {
        let last = self.layers.len() - 1;
        let start = self.layers[last].start_depth;
        if !(depth_axis_max > start && depth_axis_max.is_finite()) {
            return Err(LayerError::BoundaryOutOfWindow {
                depth: depth_axis_max,
                min: start,
                max: f64::INFINITY,
            });
        }
        self.layers[last].end_depth = depth_axis_max;
        Ok(())
    }

    fn layer_checked(&self, index: usize) -> Result<&Layer, LayerError> {
        self.layers.get(index).ok_or(LayerError::IndexOutOfRange {
            index,
            len: self.layers.len(),
        })
    }
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::default_model()
    }
}

/// Check the stack invariants without building a [`LayerStack`].
pub fn validate_layers(layers: &[Layer]) -> Result<(), LayerError> {
    let first = layers.first().ok_or(LayerError::Empty)?;
    if first.start_depth != 0.0 {
        return Err(LayerError::FirstLayerOffset(first.start_depth));
    }
    for (i, layer) in layers.iter().enumerate() {
        if !(layer.velocity > 0.0 && layer.velocity.is_finite()) {
            return Err(LayerError::NonPositiveVelocity(layer.velocity));
        }
        if !(layer.density > 0.0 && layer.density.is_finite()) {
            return Err(LayerError::NonPositiveDensity(layer.density));
        }
        if !(layer.end_depth > layer.start_depth) {
            return Err(LayerError::BoundaryOutOfWindow {
                depth: layer.end_depth,
                min: layer.start_depth,
                max: f64::INFINITY,
            });
        }
        if i > 0 && (layer.start_depth - layers[i - 1].end_depth).abs() > CONTIGUITY_TOLERANCE {
            return Err(LayerError::NotContiguous { index: i, prev: i - 1 });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// PickPoint – one observed dispersion sample
// ---------------------------------------------------------------------------

/// A raw line of a `.pck` file. All seven numeric fields are kept; only
/// frequency (field 2) and slowness (field 4) are used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickPoint {
    pub fields: [f64; 7],
}

impl PickPoint {
    pub const FREQUENCY_FIELD: usize = 2;
    pub const SLOWNESS_FIELD: usize = 4;

    pub fn frequency(&self) -> f64 {
        self.fields[Self::FREQUENCY_FIELD]
    }

    pub fn slowness(&self) -> f64 {
        self.fields[Self::SLOWNESS_FIELD]
    }
}

/// Min/max frequency and slowness across all loaded picks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataExtents {
    pub min_frequency: f64,
    pub max_frequency: f64,
    pub min_slowness: f64,
    pub max_slowness: f64,
}

impl DataExtents {
    /// Extents over picks with finite, positive frequency and slowness.
    /// `None` when no pick qualifies.
    pub fn from_picks(picks: &[PickPoint]) -> Option<Self> {
        let mut usable = picks.iter().filter(|p| {
            p.frequency().is_finite()
                && p.frequency() > 0.0
                && p.slowness().is_finite()
                && p.slowness() > 0.0
        });
        let first = usable.next()?;
        let init = Self {
            min_frequency: first.frequency(),
            max_frequency: first.frequency(),
            min_slowness: first.slowness(),
            max_slowness: first.slowness(),
        };
        Some(usable.fold(init, |acc, p| Self {
            min_frequency: acc.min_frequency.min(p.frequency()),
            max_frequency: acc.max_frequency.max(p.frequency()),
            min_slowness: acc.min_slowness.min(p.slowness()),
            max_slowness: acc.max_slowness.max(p.slowness()),
        }))
    }
}

// ---------------------------------------------------------------------------
// AxisLimits – view bounds in canonical units
// ---------------------------------------------------------------------------

/// View bounds. For the dispersion plot `x` is the period/frequency axis and
/// `y` the velocity/slowness axis regardless of axis swap; for the depth plot
/// `x` is velocity and `y` depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl AxisLimits {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        debug_assert!(xmin < xmax && ymin < ymax, "degenerate axis limits");
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// Depth-plot limits fitted to an imported model: velocity axis from 0 to
    /// 110 % of the fastest layer, depth axis from 0 to the deepest node.
    pub fn fit_model(layers: &[Layer]) -> Self {
        let max_velocity = layers.iter().map(|l| l.velocity).fold(0.0, f64::max);
        let max_depth = layers.iter().map(|l| l.end_depth).fold(0.0, f64::max);
        Self {
            xmin: 0.0,
            xmax: (max_velocity * 1.1).ceil().max(1.0),
            ymin: 0.0,
            ymax: max_depth.ceil().max(1.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
