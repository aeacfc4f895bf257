use super::model::{HotspotDataset, HotspotRecord};

/// Rows at or below this confidence are excluded from the pipeline.
pub const MIN_CONFIDENCE: u8 = 50;

/// Rows above this confidence are labelled as high-confidence fires.
pub const LABEL_CONFIDENCE: u8 = 80;

/// Number of model input features per record.
pub const N_FEATURES: usize = 6;

// ---------------------------------------------------------------------------
// PreparedRecord – one row of the augmented table
// ---------------------------------------------------------------------------

/// A confidence-filtered record with its calendar features materialised.
/// This is the table the spatial analytics and the heatmap builder consume.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub brightness: f64,
    pub confidence: u8,
    /// Calendar month, 1–12.
    pub month: u32,
    /// Day of month, 1–31.
    pub day: u32,
    /// Hour of acquisition, 0–23.
    pub hour: u32,
}

impl PreparedRecord {
    fn from_record(rec: &HotspotRecord) -> Self {
        PreparedRecord {
            latitude: rec.latitude,
            longitude: rec.longitude,
            brightness: rec.brightness,
            confidence: rec.confidence,
            month: rec.month(),
            day: rec.day(),
            hour: rec.hour(),
        }
    }

    /// Model input vector: (latitude, longitude, brightness, month, day, hour).
    pub fn features(&self) -> [f64; N_FEATURES] {
        [
            self.latitude,
            self.longitude,
            self.brightness,
            f64::from(self.month),
            f64::from(self.day),
            f64::from(self.hour),
        ]
    }

    /// Training label: high-confidence fire.
    pub fn label(&self) -> bool {
        self.confidence > LABEL_CONFIDENCE
    }
}

/// The augmented table produced by [`prepare`].
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub records: Vec<PreparedRecord>,
}

impl PreparedDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mean brightness over the whole table (0.0 when empty).
    pub fn mean_brightness(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.records.iter().map(|r| r.brightness).sum();
        sum / self.records.len() as f64
    }
}

// ---------------------------------------------------------------------------
// Feature preparation
// ---------------------------------------------------------------------------

/// Model inputs, labels, and the augmented table, all row-aligned.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub features: Vec<[f64; N_FEATURES]>,
    pub labels: Vec<bool>,
    pub dataset: PreparedDataset,
}

/// Filter to confidence > [`MIN_CONFIDENCE`], derive calendar features, and
/// assemble the feature matrix and label vector.
///
/// Absence of input data is the caller's concern: the loader hands over an
/// `Option<HotspotDataset>`, and `prepare` only runs on the `Some` arm.
pub fn prepare(data: &HotspotDataset) -> Prepared {
    let records: Vec<PreparedRecord> = data
        .records
        .iter()
        .filter(|r| r.confidence > MIN_CONFIDENCE)
        .map(PreparedRecord::from_record)
        .collect();

    let features = records.iter().map(PreparedRecord::features).collect();
    let labels = records.iter().map(PreparedRecord::label).collect();

    log::info!(
        "prepared {} of {} records for training",
        records.len(),
        data.len()
    );
    Prepared {
        features,
        labels,
        dataset: PreparedDataset { records },
    }
}
