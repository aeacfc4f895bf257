use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::analysis::AnalysisResult;
use crate::config;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – query parameters and results
// ---------------------------------------------------------------------------

/// Render the sidebar: analysis parameters on top, latest results below.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Analysis parameters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            query_widgets(ui, state);
            ui.separator();
            if let Some(analysis) = &state.analysis {
                results_section(ui, analysis);
            } else if state.ready() {
                ui.label("Pick a point and press Analyze, or click the map.");
            }
        });
}

fn query_widgets(ui: &mut Ui, state: &mut AppState) {
    let ready = state.ready();

    ui.add_enabled_ui(ready, |ui: &mut Ui| {
        ui.strong("City preset");
        let current = config::CITIES[state.selected_city].0;
        egui::ComboBox::from_id_salt("city_preset")
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                for (idx, (name, _, _)) in config::CITIES.iter().enumerate() {
                    if ui
                        .selectable_label(state.selected_city == idx, *name)
                        .clicked()
                    {
                        state.select_city(idx);
                    }
                }
            });

        ui.add_space(4.0);
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Lat");
            ui.add(egui::DragValue::new(&mut state.query_lat).speed(0.01));
            ui.label("Lon");
            ui.add(egui::DragValue::new(&mut state.query_lon).speed(0.01));
        });

        let (min_r, max_r) = config::RADIUS_RANGE_KM;
        ui.add(
            egui::Slider::new(&mut state.radius_km, min_r..=max_r)
                .text("Radius (km)")
                .integer(),
        );

        if ui.button("Analyze selected point").clicked() {
            state.run_analysis();
        }
    });

    if !ready {
        ui.label("Analysis is disabled until data and model are available.");
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

fn results_section(ui: &mut Ui, analysis: &AnalysisResult) {
    ui.heading("Results");

    metric(ui, "Fires within radius", analysis.num_fires.to_string());
    metric(
        ui,
        "Avg brightness nearby",
        format!("{:.2}", analysis.avg_brightness),
    );
    metric(
        ui,
        "Global avg brightness",
        format!("{:.2}", analysis.global_avg_brightness),
    );
    if let Some((lat, lon)) = analysis.center_of_mass {
        metric(ui, "Center of mass", format!("({lat:.2}, {lon:.2})"));
    }

    ui.add_space(4.0);
    ui.strong("Recommendation");
    if station_recommended(analysis) {
        ui.label(
            RichText::new("Recommend siting a fire station here")
                .color(Color32::from_rgb(0, 160, 70)),
        );
        ui.label("High fire likelihood from historical data, or the point sits near the fire center of mass.");
    } else {
        ui.label(RichText::new("No fire station needed").color(Color32::RED));
        ui.label("Low fire likelihood from historical data.");
    }
    let context = if analysis.avg_brightness > analysis.global_avg_brightness {
        "above the global average, indicating intense fires"
    } else {
        "at or below the global average, indicating milder fires"
    };
    ui.label(format!(
        "Nearby brightness is {:.2} ({context}).",
        analysis.avg_brightness
    ));

    if !analysis.monthly.is_empty() {
        ui.add_space(4.0);
        ui.strong("Fires by month");
        egui::Grid::new("monthly_stats")
            .striped(true)
            .show(ui, |ui: &mut Ui| {
                ui.label("Month");
                ui.label("Fires");
                ui.end_row();
                for row in &analysis.monthly {
                    ui.label(row.month.to_string());
                    ui.label(row.count.to_string());
                    ui.end_row();
                }
            });
    }
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).strong());
    });
}

/// Siting rule: high model probability, or the query point sits within half
/// a degree of the centroid on both axes.
fn station_recommended(analysis: &AnalysisResult) -> bool {
    if analysis.probability > 0.5 {
        return true;
    }
    matches!(
        analysis.center_of_mass,
        Some((lat, lon))
            if (analysis.query.latitude - lat).abs() < 0.5
                && (analysis.query.longitude - lon).abs() < 0.5
    )
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / status bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Data", |ui: &mut Ui| {
            if ui.button("Open directory…").clicked() {
                open_directory_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                let dir = state.data_dir.clone();
                state.reload(dir);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records from {}",
                ds.len(),
                state.data_dir.display()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

fn open_directory_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Select hotspot archive directory")
        .pick_folder();

    if let Some(dir) = dir {
        log::info!("loading archives from {}", dir.display());
        state.reload(dir);
    }
}
