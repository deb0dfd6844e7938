use eframe::egui::{self, Align2, Color32, CursorIcon, FontId, Pos2, Sense, Stroke, Ui};

use crate::color::layer_band_colors;
use crate::editor::{Gesture, HandleKind};
use crate::state::{Action, AppState};
use crate::ui::plot::{axis_ticks, draw_axes, to_local, to_pos, LABEL_COLOR};
use crate::view::coords::{Point, PLOT_MARGIN};

const LINE_COLOR: Color32 = Color32::from_rgb(235, 235, 235);
const ACTIVE_COLOR: Color32 = Color32::from_rgb(255, 200, 40);

// ---------------------------------------------------------------------------
// Pointer input → editor gestures
// ---------------------------------------------------------------------------

/// Translate this frame's pointer input into editor gestures. Shift-click
/// splits, Alt-click deletes; a release or the pointer leaving the window
/// anywhere ends a drag. Outside a drag, a pointer off the plot clears the
/// hover.
fn collect_gestures(ui: &Ui, response: &egui::Response, dragging: bool) -> Vec<Gesture> {
    let rect = response.rect;
    let (shift, alt, press_origin, released, gone) = ui.input(|i| {
        (
            i.modifiers.shift,
            i.modifiers.alt,
            i.pointer.press_origin(),
            i.pointer.any_released(),
            i.events.iter().any(|e| matches!(e, egui::Event::PointerGone)),
        )
    });

    let mut gestures = Vec::new();
    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            if shift {
                gestures.push(Gesture::SplitRequest(to_local(rect, pos)));
            } else if alt {
                gestures.push(Gesture::DeleteRequest(to_local(rect, pos)));
            }
        }
    }

    if response.drag_started() && !shift && !alt {
        if let Some(origin) = press_origin.or(response.interact_pointer_pos()) {
            gestures.push(Gesture::DragStart(to_local(rect, origin)));
        }
    }
    if dragging && response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            gestures.push(Gesture::DragMove(to_local(rect, pos)));
        }
    } else if let Some(pos) = response.hover_pos() {
        gestures.push(Gesture::Hover(to_local(rect, pos)));
    } else if !dragging {
        gestures.push(Gesture::PointerLeft);
    }

    if dragging && (released || gone) {
        gestures.push(Gesture::DragEnd);
    }
    gestures
}

// ---------------------------------------------------------------------------
// Layer plot
// ---------------------------------------------------------------------------

/// Velocity (across) vs depth (down) with draggable layer lines.
pub fn layer_plot(ui: &mut Ui, state: &mut AppState) {
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let rect = response.rect;
    let plot_size = (rect.width() as f64, rect.height() as f64);

    for gesture in collect_gestures(ui, &response, state.editor().is_dragging()) {
        state.apply(Action::Edit { gesture, plot_size });
    }

    let mapper = state.depth_mapper(plot_size.0, plot_size.1);
    let limits = *state.depth_limits();
    let display = state.display_units();

    let h_ticks = axis_ticks(
        display.to_display(limits.xmin),
        display.to_display(limits.xmax),
        |v| display.from_display(v),
        |v| mapper.to_screen(v, limits.ymin).x,
    );
    let v_ticks = axis_ticks(
        display.to_display(limits.ymin),
        display.to_display(limits.ymax),
        |v| display.from_display(v),
        |v| mapper.to_screen(limits.xmin, v).y,
    );
    draw_axes(
        &painter,
        rect,
        &h_ticks,
        &v_ticks,
        &format!("Shear velocity ({}/s)", display.symbol()),
        &format!("Depth ({})", display.symbol()),
    );

    let layers = state.layers().layers();
    let colors = layer_band_colors(layers);
    let active = state.editor().active_handle();
    let left = rect.min.x + PLOT_MARGIN as f32;
    let right = rect.max.x - PLOT_MARGIN as f32;
    let plot_bottom = rect.max.y - PLOT_MARGIN as f32;

    for (i, layer) in layers.iter().enumerate() {
        let top = to_pos(rect, mapper.to_screen(layer.velocity, layer.start_depth));
        let bottom_y = if i + 1 == layers.len() {
            plot_bottom
        } else {
            to_pos(rect, mapper.to_screen(layer.velocity, layer.end_depth)).y
        };
        let x = top.x.clamp(left, right);

        // ---- Band ----
        let band = egui::Rect::from_min_max(Pos2::new(left, top.y), Pos2::new(x, bottom_y));
        painter.rect_filled(band, 0.0, colors[i]);

        // ---- Velocity line ----
        let is_active = |kind: HandleKind| active.is_some_and(|h| h.layer == i && h.kind == kind);
        let stroke = |kind: HandleKind| {
            if is_active(kind) {
                Stroke::new(3.0, ACTIVE_COLOR)
            } else {
                Stroke::new(1.5, LINE_COLOR)
            }
        };
        painter.line_segment([Pos2::new(top.x, top.y), Pos2::new(top.x, bottom_y)], stroke(HandleKind::Velocity));

        // ---- Boundary (interior only) ----
        if i + 1 < layers.len() {
            painter.line_segment([Pos2::new(left, bottom_y), Pos2::new(right, bottom_y)], stroke(HandleKind::Boundary));
        }
    }

    // ---- Cursor and readout ----
    match active.map(|h| h.kind) {
        Some(HandleKind::Boundary) => ui.ctx().set_cursor_icon(CursorIcon::ResizeVertical),
        Some(HandleKind::Velocity) => ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal),
        None => {}
    }
    if let Some(readout) = state.editor().readout() {
        painter.text(
            to_pos(rect, Point::new(plot_size.0 - PLOT_MARGIN - 6.0, PLOT_MARGIN + 4.0)),
            Align2::RIGHT_TOP,
            readout.text(display),
            FontId::monospace(13.0),
            LABEL_COLOR,
        );
    }
}
