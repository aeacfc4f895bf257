use eframe::egui::{Color32, Ui};
use egui_plot::{MarkerShape, Plot, Points};

use crate::color::HEAT_BINS;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Hotspot map (central panel)
// ---------------------------------------------------------------------------

/// Render the hotspot map: the heat layer, the query marker, and (after an
/// analysis) the nearby subset and the centroid. Clicking the plot moves
/// the query point to the clicked coordinate.
pub fn map_panel(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No hotspot data loaded  (Data → Open directory…)");
        });
        return;
    }

    let response = Plot::new("hotspot_map")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .data_aspect(1.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            // ---- Heat layer, batched per colour bin ----
            let mut bins: Vec<Vec<[f64; 2]>> = vec![Vec::new(); HEAT_BINS];
            for p in &state.heat_points {
                bins[state.heat_scale.bin(p.intensity)].push([p.longitude, p.latitude]);
            }
            for (bin, pts) in bins.into_iter().enumerate() {
                if pts.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(pts)
                        .color(state.heat_scale.bin_color(bin))
                        .radius(1.5),
                );
            }

            // ---- Analysis overlays ----
            if let Some(analysis) = &state.analysis {
                let nearby: Vec<[f64; 2]> = analysis
                    .nearby
                    .iter()
                    .map(|r| [r.longitude, r.latitude])
                    .collect();
                if !nearby.is_empty() {
                    plot_ui.points(
                        Points::new(nearby)
                            .color(Color32::ORANGE)
                            .radius(3.0)
                            .name("Nearby fires"),
                    );
                }
                if let Some((lat, lon)) = analysis.center_of_mass {
                    plot_ui.points(
                        Points::new(vec![[lon, lat]])
                            .color(Color32::LIGHT_BLUE)
                            .radius(6.0)
                            .shape(MarkerShape::Diamond)
                            .name("Center of mass"),
                    );
                }
            }

            // ---- Query marker ----
            plot_ui.points(
                Points::new(vec![[state.query_lon, state.query_lat]])
                    .color(Color32::RED)
                    .radius(5.0)
                    .shape(MarkerShape::Cross)
                    .name("Query point"),
            );

            plot_ui.pointer_coordinate()
        });

    if response.response.clicked() {
        if let Some(coord) = response.inner {
            state.query_lat = coord.y;
            state.query_lon = coord.x;
            log::debug!("query point moved to ({:.4}, {:.4})", coord.y, coord.x);
        }
    }
}
