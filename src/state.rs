use std::path::{Path, PathBuf};

use crate::analysis::{self, AnalysisResult, Query};
use crate::classifier::{FireClassifier, TrainConfig};
use crate::color::HeatScale;
use crate::config;
use crate::data::features::{self, PreparedDataset};
use crate::data::loader;
use crate::heatmap::{self, HeatPoint};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
///
/// The presentation layer owns everything here; the analytics core is a
/// set of pure functions that receive these fields by reference. The last
/// analysis lives only in `analysis` and is replaced wholesale on the next
/// query.
pub struct AppState {
    /// Directory the current dataset was loaded from.
    pub data_dir: PathBuf,

    /// Augmented hotspot table (None while no archives are found).
    pub dataset: Option<PreparedDataset>,

    /// The trained (or reloaded) classifier.
    pub model: Option<FireClassifier>,

    /// Heat-layer points for the map, one per record.
    pub heat_points: Vec<HeatPoint>,

    /// Brightness → colour scale for the heat layer.
    pub heat_scale: HeatScale,

    /// Index into [`config::CITIES`] for the sidebar preset.
    pub selected_city: usize,

    /// Query point currently entered in the sidebar.
    pub query_lat: f64,
    pub query_lon: f64,

    /// Query radius in kilometres.
    pub radius_km: f64,

    /// Result of the latest analysis, if any.
    pub analysis: Option<AnalysisResult>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let (_, lat, lon) = config::CITIES[0];
        Self {
            data_dir: PathBuf::from(config::DATA_DIR),
            dataset: None,
            model: None,
            heat_points: Vec::new(),
            heat_scale: HeatScale::from_intensities(std::iter::empty()),
            selected_city: 0,
            query_lat: lat,
            query_lon: lon,
            radius_km: config::DEFAULT_RADIUS_KM,
            analysis: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Build the startup state: run the whole pipeline against the
    /// configured data directory.
    pub fn bootstrap() -> Self {
        let mut state = Self::default();
        state.reload(PathBuf::from(config::DATA_DIR));
        state
    }

    /// Load archives from `dir`, prepare features, and train or reload the
    /// model. Failures leave the state in degraded mode with a message;
    /// absence of data is a warning, not an error.
    pub fn reload(&mut self, dir: PathBuf) {
        self.dataset = None;
        self.model = None;
        self.heat_points.clear();
        self.analysis = None;
        self.status_message = None;

        match loader::load_dir(&dir, "csv") {
            Ok(Some(raw)) if !raw.is_empty() => {
                let prepared = features::prepare(&raw);
                if prepared.dataset.is_empty() {
                    self.status_message = Some(format!(
                        "No records above confidence {}, nothing to analyse",
                        features::MIN_CONFIDENCE
                    ));
                } else {
                    self.model = self.obtain_model(&prepared.features, &prepared.labels);
                    self.heat_points = heatmap::heat_points(&prepared.dataset);
                    self.heat_scale =
                        HeatScale::from_intensities(self.heat_points.iter().map(|p| p.intensity));
                    self.dataset = Some(prepared.dataset);
                }
            }
            Ok(_) => {
                self.status_message = Some(format!(
                    "No hotspot records found under {} (run generate_sample or fetch_archive)",
                    dir.display()
                ));
            }
            Err(e) => {
                log::error!("failed to load archives: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
        self.data_dir = dir;
    }

    /// Reload a previously saved model, falling back to a fresh training
    /// run on the prepared features.
    fn obtain_model(
        &mut self,
        feature_rows: &[[f64; features::N_FEATURES]],
        labels: &[bool],
    ) -> Option<FireClassifier> {
        let path = Path::new(config::MODEL_PATH);
        match FireClassifier::load(path) {
            Ok(Some(model)) => return Some(model),
            Ok(None) => {}
            Err(e) => {
                log::error!("failed to read saved model, retraining: {e:#}");
            }
        }
        match FireClassifier::train(feature_rows, labels, &TrainConfig::default(), path) {
            Ok(model) => Some(model),
            Err(e) => {
                log::error!("training failed: {e:#}");
                self.status_message = Some(format!("Training failed: {e:#}"));
                None
            }
        }
    }

    /// Whether a query can be answered (data and model both present).
    pub fn ready(&self) -> bool {
        self.dataset.is_some() && self.model.is_some()
    }

    /// Move the query point to a preset city.
    pub fn select_city(&mut self, idx: usize) {
        if let Some(&(_, lat, lon)) = config::CITIES.get(idx) {
            self.selected_city = idx;
            self.query_lat = lat;
            self.query_lon = lon;
        }
    }

    /// Analyse the current query point, replacing the previous result.
    pub fn run_analysis(&mut self) {
        let (Some(data), Some(model)) = (&self.dataset, &self.model) else {
            return;
        };
        let query = Query {
            latitude: self.query_lat,
            longitude: self.query_lon,
            radius_km: self.radius_km,
        };
        self.analysis = Some(analysis::analyze(data, model, &query));
    }
}
