use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::loader;
use crate::solver::SiteCode;
use crate::state::{Action, AppState, Bound};
use crate::view::readout;
use crate::view::units::{DisplayUnits, PeriodUnit, VelocityUnit};

// ---------------------------------------------------------------------------
// Left side panel – units, axes, results, layer table
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            results_section(ui, state);
            ui.separator();

            egui::CollapsingHeader::new(RichText::new("Units").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| units_section(ui, state));

            egui::CollapsingHeader::new(RichText::new("Dispersion axes").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| dispersion_axes_section(ui, state));

            egui::CollapsingHeader::new(RichText::new("Depth axes").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| depth_axes_section(ui, state));

            egui::CollapsingHeader::new(RichText::new("Curve").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| curve_section(ui, state));

            egui::CollapsingHeader::new(RichText::new("Layers").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| layer_table(ui, state));

            ui.add_space(6.0);
            ui.label(
                RichText::new("Drag lines to edit · Shift-click splits · Alt-click deletes")
                    .small()
                    .weak(),
            );
        });
}

fn results_section(ui: &mut Ui, state: &AppState) {
    let display = state.display_units();
    let result = state.result();
    egui::Grid::new("results").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.strong("Vs30");
        ui.label(readout::vs30_text(result.vs30, display));
        ui.end_row();
        ui.strong("Site class");
        ui.label(readout::site_class_text(result.site_class.as_deref()));
        ui.end_row();
        ui.strong("RMSE");
        ui.label(readout::rmse_text(result.rmse, display));
        ui.end_row();
    });
}

fn units_section(ui: &mut Ui, state: &mut AppState) {
    let mut period_unit = state.period_unit();
    let mut velocity_unit = state.velocity_unit();
    let mut display = state.display_units();

    ui.horizontal(|ui: &mut Ui| {
        ui.radio_value(&mut period_unit, PeriodUnit::Period, "Period");
        ui.radio_value(&mut period_unit, PeriodUnit::Frequency, "Frequency");
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.radio_value(&mut velocity_unit, VelocityUnit::Velocity, "Velocity");
        ui.radio_value(&mut velocity_unit, VelocityUnit::Slowness, "Slowness");
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.radio_value(&mut display, DisplayUnits::Meters, "Meters");
        ui.radio_value(&mut display, DisplayUnits::Feet, "Feet");
    });

    if period_unit != state.period_unit() {
        state.apply(Action::SetPeriodUnit(period_unit));
    }
    if velocity_unit != state.velocity_unit() {
        state.apply(Action::SetVelocityUnit(velocity_unit));
    }
    if display != state.display_units() {
        state.apply(Action::SetDisplayUnits(display));
    }
}

/// A labelled number field; returns the new value when edited.
fn limit_field(ui: &mut Ui, label: &str, value: f64, speed: f64) -> Option<f64> {
    let mut v = value;
    ui.label(label);
    let changed = ui
        .add(DragValue::new(&mut v).speed(speed).max_decimals(6))
        .changed();
    ui.end_row();
    changed.then_some(v)
}

fn dispersion_axes_section(ui: &mut Ui, state: &mut AppState) {
    let mut swap = state.swap_axes();
    let mut period_reversed = state.period_reversed();
    let mut velocity_reversed = state.velocity_reversed();
    ui.checkbox(&mut swap, "Swap axes");
    ui.checkbox(&mut period_reversed, format!("Reverse {}", state.period_unit().axis_label()));
    ui.checkbox(
        &mut velocity_reversed,
        format!("Reverse {}", state.velocity_unit().axis_label(state.display_units())),
    );
    if swap != state.swap_axes() {
        state.apply(Action::SetSwapAxes(swap));
    }
    if period_reversed != state.period_reversed() {
        state.apply(Action::SetPeriodReversed(period_reversed));
    }
    if velocity_reversed != state.velocity_reversed() {
        state.apply(Action::SetVelocityReversed(velocity_reversed));
    }

    let limits = *state.dispersion_limits();
    let velocity_unit = state.velocity_unit();
    let display = state.display_units();
    let x_unit = state.period_unit().symbol();
    let y_unit = velocity_unit.unit_label(display);
    let x_speed = (limits.xmax - limits.xmin) / 200.0;
    let ymin = velocity_unit.to_display(limits.ymin, display);
    let ymax = velocity_unit.to_display(limits.ymax, display);
    let y_speed = (ymax - ymin).abs() / 200.0;

    let mut edits = Vec::new();
    egui::Grid::new("dispersion_limits").num_columns(2).show(ui, |ui: &mut Ui| {
        if let Some(v) = limit_field(ui, &format!("Min ({x_unit})"), limits.xmin, x_speed) {
            edits.push((Bound::XMin, v));
        }
        if let Some(v) = limit_field(ui, &format!("Max ({x_unit})"), limits.xmax, x_speed) {
            edits.push((Bound::XMax, v));
        }
        if let Some(v) = limit_field(ui, &format!("Min ({y_unit})"), ymin, y_speed) {
            edits.push((Bound::YMin, v));
        }
        if let Some(v) = limit_field(ui, &format!("Max ({y_unit})"), ymax, y_speed) {
            edits.push((Bound::YMax, v));
        }
    });
    for (bound, value) in edits {
        state.apply(Action::SetDispersionLimit(bound, value));
    }

    let autoscale = ui.add_enabled(!state.picks().is_empty(), egui::Button::new("Fit to picks"));
    if autoscale.clicked() {
        state.apply(Action::Autoscale);
    }
}

fn depth_axes_section(ui: &mut Ui, state: &mut AppState) {
    let limits = *state.depth_limits();
    let display = state.display_units();
    let len = display.symbol();

    let mut edits = Vec::new();
    egui::Grid::new("depth_limits").num_columns(2).show(ui, |ui: &mut Ui| {
        let fields = [
            (Bound::XMin, format!("Min velocity ({len}/s)"), limits.xmin, 5.0),
            (Bound::XMax, format!("Max velocity ({len}/s)"), limits.xmax, 5.0),
            (Bound::YMin, format!("Min depth ({len})"), limits.ymin, 0.5),
            (Bound::YMax, format!("Max depth ({len})"), limits.ymax, 0.5),
        ];
        for (bound, label, value, speed) in fields {
            if let Some(v) = limit_field(ui, &label, display.to_display(value), speed) {
                edits.push((bound, v));
            }
        }
    });
    for (bound, value) in edits {
        state.apply(Action::SetDepthLimit(bound, value));
    }
}

fn curve_section(ui: &mut Ui, state: &mut AppState) {
    let mut points = state.curve_points();
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Curve points");
        ui.add(DragValue::new(&mut points).range(1..=100));
    });
    if points != state.curve_points() {
        state.apply(Action::SetCurvePoints(points));
    }

    let mut code = state.site_code();
    egui::ComboBox::from_id_salt("site_code")
        .selected_text(code.label())
        .show_ui(ui, |ui: &mut Ui| {
            for option in SiteCode::ALL {
                ui.selectable_value(&mut code, option, option.label());
            }
        });
    if code != state.site_code() {
        state.apply(Action::SetSiteCode(code));
    }
}

fn layer_table(ui: &mut Ui, state: &AppState) {
    let display = state.display_units();
    let len = display.symbol();
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto())
        .columns(Column::auto().at_least(60.0), 4)
        .header(18.0, |mut header| {
            for title in [
                "#".to_string(),
                format!("Top ({len})"),
                format!("Bottom ({len})"),
                format!("Vs ({len}/s)"),
                "Density".to_string(),
            ] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (i, layer) in state.layers().layers().iter().enumerate() {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{}", i + 1));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.1}", display.to_display(layer.start_depth)));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.1}", display.to_display(layer.end_depth)));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.1}", display.to_display(layer.velocity)));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.2}", layer.density));
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open picks…").clicked() {
                open_picks_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open velocity model…").clicked() {
                open_model_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Save velocity model…").clicked() {
                save_model_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(!state.result().curve.is_empty(), egui::Button::new("Export curve CSV…"))
                .clicked()
            {
                export_curve_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} layers, {} picks",
            state.layers().len(),
            state.picks().len()
        ));

        if let Some(msg) = state.status_message() {
            let msg = msg.to_string();
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
            if ui.small_button("✕").clicked() {
                state.apply(Action::ClearStatus);
            }
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_picks_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open dispersion picks")
        .add_filter("Pick files", &["pck"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_picks(&path) {
            Ok(picks) => state.apply(Action::LoadPicks(picks)),
            Err(e) => state.apply(Action::ReportError(format!("Error: {e:#}"))),
        }
    }
}

pub fn open_model_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open velocity model")
        .add_filter("Text", &["txt"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_velocity_model(&path) {
            Ok(layers) => state.apply(Action::LoadModel(layers)),
            Err(e) => state.apply(Action::ReportError(format!("Error: {e:#}"))),
        }
    }
}

pub fn save_model_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save velocity model")
        .set_file_name("velocity_model.txt")
        .add_filter("Text", &["txt"])
        .save_file();

    if let Some(path) = file {
        match loader::save_velocity_model(&path, state.layers().layers()) {
            Ok(()) => log::info!("Saved velocity model to {}", path.display()),
            Err(e) => state.apply(Action::ReportError(format!("Error: {e:#}"))),
        }
    }
}

pub fn export_curve_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export modeled curve")
        .set_file_name("dispersion_curve.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match loader::save_curve_csv(&path, &state.result().curve) {
            Ok(()) => log::info!("Exported {} curve points to {}", state.result().curve.len(), path.display()),
            Err(e) => state.apply(Action::ReportError(format!("Error: {e:#}"))),
        }
    }
}
