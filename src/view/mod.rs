/// View layer: unit handling, screen mapping and axis scaling.
///
/// ```text
///   picks ──► autoscale ──► AxisLimits ──► coords::PlotMapper ◄── pointer
///                 ▲                              │
///               units ───────────────────────────┘
///                                    readout: pick hover, Vs30, RMSE text
/// ```

pub mod autoscale;
pub mod coords;
pub mod readout;
pub mod units;
