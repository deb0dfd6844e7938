/// Data layer: core types and file formats.
///
/// Architecture:
/// ```text
///  .pck picks          velocity_model.txt
///        │                    ▲   │
///        ▼                    │   ▼
///   ┌──────────┐         ┌──────────┐
///   │  loader   │ ──────► │  model   │  LayerStack, PickPoint, AxisLimits
///   └──────────┘         └──────────┘
///        │
///        ▼
///   curve.csv (modeled dispersion curve export)
/// ```

pub mod loader;
pub mod model;
