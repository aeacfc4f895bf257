//! Fire-likelihood classifier: a bootstrap-resampled forest of gini-grown
//! decision trees over (latitude, longitude, brightness, month, day, hour).
//!
//! The whole pipeline is deterministic for a fixed seed: the 70/30
//! train/test split, the per-tree bootstrap samples, and the per-split
//! feature subsets all draw from one [`rng::Lcg64`] stream.
//!
//! The fitted forest persists as JSON at [`crate::config::MODEL_PATH`];
//! exactly one in-memory instance exists per process, owned by the
//! application state.

pub mod rng;
pub mod tree;

use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::features::N_FEATURES;
use rng::Lcg64;
use tree::{DecisionTree, GrowParams};

// ---------------------------------------------------------------------------
// Fixed query context
// ---------------------------------------------------------------------------

/// Stand-in feature values used when predicting for a map click. The model
/// is queried for a location, not a moment, so the temporal and brightness
/// inputs are pinned to a mid-season daytime observation.
pub const QUERY_BRIGHTNESS: f64 = 300.0;
pub const QUERY_MONTH: f64 = 6.0;
pub const QUERY_DAY: f64 = 15.0;
pub const QUERY_HOUR: f64 = 12.0;

// ---------------------------------------------------------------------------
// Training configuration
// ---------------------------------------------------------------------------

/// Forest training parameters.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Depth limit per tree.
    pub max_depth: usize,
    /// Minimum rows on each side of a split.
    pub min_samples_leaf: usize,
    /// Features considered per split (⌊√6⌋).
    pub n_split_features: usize,
    /// Share of rows held out for the accuracy report.
    pub test_fraction: f64,
    /// Seed for the split, the bootstrap, and the feature subsets.
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            n_trees: 100,
            max_depth: 16,
            min_samples_leaf: 1,
            n_split_features: 2,
            test_fraction: 0.3,
            seed: 42,
        }
    }
}

// ---------------------------------------------------------------------------
// FireClassifier
// ---------------------------------------------------------------------------

/// The trained ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireClassifier {
    trees: Vec<DecisionTree>,
}

impl FireClassifier {
    /// Fit a forest. Splits the rows 70/30 (per `config.test_fraction`),
    /// trains on the larger share, and logs held-out accuracy. Accuracy is
    /// reported, never enforced.
    ///
    /// # Errors
    ///
    /// Fails on an empty feature matrix or row-misaligned labels; the
    /// caller is expected to have short-circuited the absent-data case.
    pub fn fit(
        features: &[[f64; N_FEATURES]],
        labels: &[bool],
        config: &TrainConfig,
    ) -> Result<Self> {
        if features.is_empty() {
            bail!("cannot train on an empty feature matrix");
        }
        if features.len() != labels.len() {
            bail!(
                "feature/label row mismatch: {} features vs {} labels",
                features.len(),
                labels.len()
            );
        }

        let mut rng = Lcg64::new(config.seed);
        let mut order: Vec<usize> = (0..features.len()).collect();
        rng.shuffle(&mut order);
        let n_test = (features.len() as f64 * config.test_fraction).round() as usize;
        let (test_idx, train_idx) = order.split_at(n_test.min(features.len()));
        if train_idx.is_empty() {
            bail!("no rows left to train on after the hold-out split");
        }

        let params = GrowParams {
            max_depth: config.max_depth,
            min_samples_leaf: config.min_samples_leaf,
            n_split_features: config.n_split_features,
        };
        let mut trees = Vec::with_capacity(config.n_trees);
        for _ in 0..config.n_trees {
            let sample: Vec<usize> = (0..train_idx.len())
                .map(|_| train_idx[rng.next_below(train_idx.len())])
                .collect();
            trees.push(DecisionTree::fit(features, labels, &sample, &params, &mut rng));
        }
        let model = FireClassifier { trees };

        if !test_idx.is_empty() {
            let correct = test_idx
                .iter()
                .filter(|&&i| (model.proba(&features[i]) >= 0.5) == labels[i])
                .count();
            log::info!(
                "model accuracy on held-out rows: {:.2} ({correct}/{})",
                correct as f64 / test_idx.len() as f64,
                test_idx.len()
            );
        }
        log::debug!(
            "forest grown: {} trees, {} nodes",
            model.trees.len(),
            model.trees.iter().map(DecisionTree::n_nodes).sum::<usize>()
        );
        Ok(model)
    }

    /// Fit and persist in one step (the startup fallback when [`Self::load`]
    /// finds nothing on disk).
    pub fn train(
        features: &[[f64; N_FEATURES]],
        labels: &[bool],
        config: &TrainConfig,
        path: &Path,
    ) -> Result<Self> {
        let model = Self::fit(features, labels, config)?;
        model.save(path)?;
        Ok(model)
    }

    /// Serialize the forest to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating model directory {}", parent.display()))?;
        }
        let file = fs::File::create(path)
            .with_context(|| format!("creating model file {}", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), self).context("serializing model")?;
        log::info!("model saved to {}", path.display());
        Ok(())
    }

    /// Deserialize a previously saved forest, or `None` when no model file
    /// exists yet (the caller falls back to [`Self::train`]).
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            log::info!("no saved model at {}", path.display());
            return Ok(None);
        }
        let file = fs::File::open(path)
            .with_context(|| format!("opening model file {}", path.display()))?;
        let model: FireClassifier =
            serde_json::from_reader(BufReader::new(file)).context("deserializing model")?;
        log::info!(
            "model loaded from {} ({} trees)",
            path.display(),
            model.trees.len()
        );
        Ok(Some(model))
    }

    /// Mean positive-class proportion across the ensemble.
    pub fn proba(&self, x: &[f64; N_FEATURES]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict_proba(x)).sum();
        sum / self.trees.len() as f64
    }

    /// Fire probability at a query coordinate under the fixed
    /// [`QUERY_BRIGHTNESS`]/month/day/hour context.
    pub fn fire_probability(&self, lat: f64, lon: f64) -> f64 {
        self.proba(&[lat, lon, QUERY_BRIGHTNESS, QUERY_MONTH, QUERY_DAY, QUERY_HOUR])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two clusters separated purely by geography: fires around (55, 37),
    /// quiet terrain around (60, 42). The remaining features match the
    /// fixed query context so the probes below are decided by location.
    fn clustered_data() -> (Vec<[f64; N_FEATURES]>, Vec<bool>) {
        let mut rng = Lcg64::new(1);
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for _ in 0..40 {
            let brightness = 290.0 + 20.0 * rng.next_f64();
            features.push([55.0 + rng.next_f64(), 37.0 + rng.next_f64(), brightness, 6.0, 15.0, 12.0]);
            labels.push(true);
            features.push([60.0 + rng.next_f64(), 42.0 + rng.next_f64(), brightness, 6.0, 15.0, 12.0]);
            labels.push(false);
        }
        (features, labels)
    }

    fn small_config() -> TrainConfig {
        TrainConfig {
            n_trees: 25,
            // Every split sees every feature, so each tree finds the clean
            // latitude/longitude separation.
            n_split_features: N_FEATURES,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn empty_features_are_rejected() {
        let err = FireClassifier::fit(&[], &[], &small_config()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn misaligned_labels_are_rejected() {
        let (features, _) = clustered_data();
        let err = FireClassifier::fit(&features, &[true], &small_config()).unwrap_err();
        assert!(err.to_string().contains("mismatch"));
    }

    #[test]
    fn clusters_are_separated() {
        let (features, labels) = clustered_data();
        let model = FireClassifier::fit(&features, &labels, &small_config()).unwrap();

        assert!(model.fire_probability(55.5, 37.5) > 0.5);
        assert!(model.fire_probability(60.5, 42.5) < 0.5);
    }

    #[test]
    fn training_is_deterministic() {
        let (features, labels) = clustered_data();
        let a = FireClassifier::fit(&features, &labels, &small_config()).unwrap();
        let b = FireClassifier::fit(&features, &labels, &small_config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn saved_model_round_trips() {
        let (features, labels) = clustered_data();
        let dir = tempfile::tempdir().unwrap();
        // Nested path also exercises parent-directory creation.
        let path = dir.path().join("model/random_forest.json");

        let trained = FireClassifier::train(&features, &labels, &small_config(), &path).unwrap();
        let loaded = FireClassifier::load(&path).unwrap().expect("model file exists");

        assert_eq!(trained, loaded);
        let p_mem = trained.fire_probability(55.5, 37.5);
        let p_disk = loaded.fire_probability(55.5, 37.5);
        assert_eq!(p_mem, p_disk);
    }

    #[test]
    fn missing_model_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = FireClassifier::load(&dir.path().join("nope.json")).unwrap();
        assert!(loaded.is_none());
    }
}
