use crate::data::model::{AxisLimits, Layer, LayerStack, BOUNDARY_EPSILON};
use crate::view::coords::{PlotMapper, Point, PLOT_MARGIN};
use crate::view::units::DisplayUnits;

/// Pointer distance (px) within which a line counts as grabbed.
pub const HIT_TOLERANCE_PX: f64 = 10.0;

/// Velocities never drop below one step of the depth plot's decimal grid.
pub const MIN_VELOCITY: f64 = 0.1;

// ---------------------------------------------------------------------------
// Handles and gestures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// Horizontal line at a layer's bottom (shared with the next layer's top).
    Boundary,
    /// Vertical line spanning a layer at its velocity.
    Velocity,
}

/// A draggable line belonging to `layer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    pub layer: usize,
    pub kind: HandleKind,
}

/// Exists only between drag start and drag end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub handle: Handle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Idle,
    Hovering(Handle),
    Dragging(DragSession),
}

/// Pointer input for the depth plot, in plot-local screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Hover(Point),
    DragStart(Point),
    DragMove(Point),
    /// Release or cancellation anywhere, inside the plot or not.
    DragEnd,
    SplitRequest(Point),
    DeleteRequest(Point),
    /// The pointer is no longer over the plot.
    PointerLeft,
}

impl Gesture {
    /// Rejects gestures carrying non-finite coordinates.
    pub fn validated(self) -> Option<Self> {
        let point = match self {
            Gesture::Hover(p)
            | Gesture::DragStart(p)
            | Gesture::DragMove(p)
            | Gesture::SplitRequest(p)
            | Gesture::DeleteRequest(p) => p,
            Gesture::DragEnd | Gesture::PointerLeft => return Some(self),
        };
        (point.x.is_finite() && point.y.is_finite()).then_some(self)
    }
}

// ---------------------------------------------------------------------------
// Pure geometry
// ---------------------------------------------------------------------------

// The depth plot is never swapped, so depth always maps to screen y and
// velocity to screen x.

fn screen_y(mapper: &PlotMapper, depth: f64) -> f64 {
    mapper.to_screen(0.0, depth).y
}

fn screen_x(mapper: &PlotMapper, velocity: f64) -> f64 {
    mapper.to_screen(velocity, 0.0).x
}

/// The handle under `point`, if any. Boundaries win over velocity lines;
/// among candidates of one kind the nearest wins.
pub fn hit_test(point: Point, layers: &[Layer], mapper: &PlotMapper) -> Option<Handle> {
    let interior = layers.len().saturating_sub(1);
    let boundary = layers[..interior]
        .iter()
        .enumerate()
        .map(|(i, l)| (i, (point.y - screen_y(mapper, l.end_depth)).abs()))
        .filter(|&(_, d)| d < HIT_TOLERANCE_PX)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((layer, _)) = boundary {
        return Some(Handle {
            layer,
            kind: HandleKind::Boundary,
        });
    }

    let plot_bottom = mapper.height() - PLOT_MARGIN;
    layers
        .iter()
        .enumerate()
        .filter(|&(i, l)| {
            let top = screen_y(mapper, l.start_depth);
            let bottom = if i + 1 == layers.len() {
                plot_bottom
            } else {
                screen_y(mapper, l.end_depth)
            };
            point.y >= top.min(bottom) && point.y <= top.max(bottom)
        })
        .map(|(i, l)| (i, (point.x - screen_x(mapper, l.velocity)).abs()))
        .filter(|&(_, d)| d < HIT_TOLERANCE_PX)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(layer, _)| Handle {
            layer,
            kind: HandleKind::Velocity,
        })
}

/// Allowed depth window for the boundary at the bottom of `layer`:
/// `(start + ε, next end − ε)`, or up to the depth-axis maximum for the
/// half-space.
pub fn boundary_window(layers: &[Layer], layer: usize, depth_axis_max: f64) -> Option<(f64, f64)> {
    let current = layers.get(layer)?;
    let lo = current.start_depth + BOUNDARY_EPSILON;
    let hi = match layers.get(layer + 1) {
        Some(next) => next.end_depth - BOUNDARY_EPSILON,
        None => depth_axis_max,
    };
    (lo <= hi).then_some((lo, hi))
}

/// Velocity window enforced while dragging.
pub fn velocity_window(limits: &AxisLimits) -> (f64, f64) {
    let lo = limits.xmin.max(MIN_VELOCITY);
    (lo, limits.xmax.max(lo))
}

/// Value shown next to the hovered or dragged line. Kept in metres and
/// formatted at draw time, so a unit switch applies immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Readout {
    Velocity(f64),
    Depth(f64),
}

impl Readout {
    pub fn text(self, units: DisplayUnits) -> String {
        match self {
            Readout::Velocity(v) => velocity_readout(v, units),
            Readout::Depth(d) => depth_readout(d, units),
        }
    }
}

pub fn velocity_readout(velocity: f64, units: DisplayUnits) -> String {
    format!("Velocity: {:.1} {}/s", units.to_display(velocity), units.symbol())
}

pub fn depth_readout(depth: f64, units: DisplayUnits) -> String {
    format!("Depth: {:.1} {}", units.to_display(depth), units.symbol())
}

// ---------------------------------------------------------------------------
// LayerEditor – gesture state machine
// ---------------------------------------------------------------------------

/// Everything a gesture needs besides the stack it edits.
#[derive(Debug, Clone, Copy)]
pub struct EditContext<'a> {
    pub mapper: &'a PlotMapper,
    /// Depth-plot limits (`x` velocity, `y` depth).
    pub limits: &'a AxisLimits,
}

#[derive(Debug, Clone, Default)]
pub struct LayerEditor {
    mode: EditorMode,
    readout: Option<Readout>,
}

impl LayerEditor {
    #[cfg(test)]
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn readout(&self) -> Option<Readout> {
        self.readout
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.mode, EditorMode::Dragging(_))
    }

    /// The handle to highlight, hovered or dragged.
    pub fn active_handle(&self) -> Option<Handle> {
        match self.mode {
            EditorMode::Idle => None,
            EditorMode::Hovering(h) => Some(h),
            EditorMode::Dragging(s) => Some(s.handle),
        }
    }

    /// Feed one gesture. Returns `true` when the stack changed.
    pub fn handle(&mut self, gesture: Gesture, stack: &mut LayerStack, ctx: EditContext<'_>) -> bool {
        match gesture {
            Gesture::Hover(point) => {
                if let EditorMode::Dragging(session) = self.mode {
                    return self.drag_to(session, point, stack, ctx);
                }
                self.hover(point, stack, ctx);
                false
            }
            Gesture::DragStart(point) => {
                self.mode = match hit_test(point, stack.layers(), ctx.mapper) {
                    Some(handle) => EditorMode::Dragging(DragSession { handle }),
                    None => EditorMode::Idle,
                };
                false
            }
            Gesture::DragMove(point) => match self.mode {
                EditorMode::Dragging(session) => self.drag_to(session, point, stack, ctx),
                _ => {
                    self.hover(point, stack, ctx);
                    false
                }
            },
            Gesture::DragEnd => {
                self.mode = EditorMode::Idle;
                false
            }
            Gesture::PointerLeft => {
                if !self.is_dragging() {
                    self.mode = EditorMode::Idle;
                    self.readout = None;
                }
                false
            }
            Gesture::SplitRequest(point) => {
                if self.is_dragging() {
                    return false;
                }
                let (_, depth) = ctx.mapper.from_screen(point);
                let Some(index) = stack.layer_at_depth(depth) else {
                    return false;
                };
                match stack.split_layer(index, depth) {
                    Ok(()) => {
                        log::info!("split layer {index} at {depth:.1} m");
                        true
                    }
                    Err(e) => {
                        log::debug!("split ignored: {e}");
                        false
                    }
                }
            }
            Gesture::DeleteRequest(point) => {
                if self.is_dragging() {
                    return false;
                }
                let (_, depth) = ctx.mapper.from_screen(point);
                let Some(index) = stack.layer_at_depth(depth) else {
                    return false;
                };
                match stack.delete_layer(index) {
                    Ok(()) => {
                        log::info!("deleted layer {index}");
                        self.mode = EditorMode::Idle;
                        true
                    }
                    Err(e) => {
                        log::debug!("delete ignored: {e}");
                        false
                    }
                }
            }
        }
    }

    fn hover(&mut self, point: Point, stack: &LayerStack, ctx: EditContext<'_>) {
        match hit_test(point, stack.layers(), ctx.mapper) {
            Some(handle) => {
                self.mode = EditorMode::Hovering(handle);
                let layer = &stack.layers()[handle.layer];
                self.readout = Some(match handle.kind {
                    HandleKind::Velocity => Readout::Velocity(layer.velocity),
                    HandleKind::Boundary => Readout::Depth(layer.end_depth),
                });
            }
            None => {
                self.mode = EditorMode::Idle;
                self.readout = None;
            }
        }
    }

    fn drag_to(&mut self, session: DragSession, point: Point, stack: &mut LayerStack, ctx: EditContext<'_>) -> bool {
        let (velocity, depth) = ctx.mapper.from_screen(point);
        let index = session.handle.layer;
        let result = match session.handle.kind {
            HandleKind::Velocity => {
                let (lo, hi) = velocity_window(ctx.limits);
                let velocity = velocity.clamp(lo, hi);
                self.readout = Some(Readout::Velocity(velocity));
                stack.set_velocity(index, velocity)
            }
            HandleKind::Boundary => {
                let Some((lo, hi)) = boundary_window(stack.layers(), index, ctx.limits.ymax) else {
                    return false;
                };
                let depth = depth.clamp(lo, hi);
                self.readout = Some(Readout::Depth(depth));
                stack.set_boundary_depth(index, depth)
            }
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                log::trace!("drag step ignored: {e}");
                false
            }
        }
    }
}
