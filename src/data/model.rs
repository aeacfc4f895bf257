use chrono::{Datelike, NaiveDate};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DataError – load-time validation failures
// ---------------------------------------------------------------------------

/// Schema and value errors raised while loading hotspot archives.
///
/// These are hard failures: a malformed file aborts the whole load rather
/// than silently dropping rows.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("header {found:?} does not match first file's header {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("confidence {0} outside the 0-100 range")]
    ConfidenceRange(i64),

    #[error("unparsable acquisition date '{0}' (expected YYYY-MM-DD)")]
    BadDate(String),

    #[error("acquisition time {0:04} is not a valid HHMM value")]
    BadTime(u16),
}

/// Columns every archive file must carry.
pub const REQUIRED_COLUMNS: &[&str] =
    &["latitude", "longitude", "brightness", "confidence", "acq_date"];

// ---------------------------------------------------------------------------
// HotspotRecord – one satellite detection
// ---------------------------------------------------------------------------

/// A single thermal-anomaly detection (one row of the source archive).
/// Immutable once loaded; construction validates every field.
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotRecord {
    /// Detection latitude in degrees.
    pub latitude: f64,
    /// Detection longitude in degrees.
    pub longitude: f64,
    /// Radiance-derived intensity.
    pub brightness: f64,
    /// Sensor confidence score, 0–100.
    pub confidence: u8,
    /// Acquisition date (UTC).
    pub acq_date: NaiveDate,
    /// Acquisition time as HHMM (0 when the archive has no time column).
    pub acq_time: u16,
}

impl HotspotRecord {
    /// Validate raw field values into a record.
    pub fn new(
        latitude: f64,
        longitude: f64,
        brightness: f64,
        confidence: i64,
        acq_date: &str,
        acq_time: Option<u16>,
    ) -> Result<Self, DataError> {
        if !(0..=100).contains(&confidence) {
            return Err(DataError::ConfidenceRange(confidence));
        }
        let acq_date = NaiveDate::parse_from_str(acq_date, "%Y-%m-%d")
            .map_err(|_| DataError::BadDate(acq_date.to_string()))?;
        let acq_time = acq_time.unwrap_or(0);
        if acq_time / 100 > 23 || acq_time % 100 > 59 {
            return Err(DataError::BadTime(acq_time));
        }
        Ok(HotspotRecord {
            latitude,
            longitude,
            brightness,
            confidence: confidence as u8,
            acq_date,
            acq_time,
        })
    }

    /// Calendar month of acquisition, 1–12.
    pub fn month(&self) -> u32 {
        self.acq_date.month()
    }

    /// Day of month of acquisition, 1–31.
    pub fn day(&self) -> u32 {
        self.acq_date.day()
    }

    /// Hour of acquisition, 0–23.
    pub fn hour(&self) -> u32 {
        u32::from(self.acq_time / 100)
    }
}

// ---------------------------------------------------------------------------
// HotspotDataset – the concatenated archive
// ---------------------------------------------------------------------------

/// All detections from one load, in per-file row order (files visited in
/// sorted path order).
#[derive(Debug, Clone)]
pub struct HotspotDataset {
    /// All records (rows).
    pub records: Vec<HotspotRecord>,
    /// How many archive files contributed rows.
    pub n_files: usize,
}

impl HotspotDataset {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_validates_fields() {
        let rec = HotspotRecord::new(55.0, 37.0, 310.5, 90, "2021-07-14", Some(1330)).unwrap();
        assert_eq!(rec.confidence, 90);
        assert_eq!(rec.month(), 7);
        assert_eq!(rec.day(), 14);
        assert_eq!(rec.hour(), 13);
    }

    #[test]
    fn missing_time_defaults_to_midnight() {
        let rec = HotspotRecord::new(55.0, 37.0, 310.5, 60, "2021-01-02", None).unwrap();
        assert_eq!(rec.hour(), 0);
    }

    #[test]
    fn confidence_out_of_range_is_rejected() {
        let err = HotspotRecord::new(55.0, 37.0, 310.5, 101, "2021-07-14", None).unwrap_err();
        assert!(matches!(err, DataError::ConfidenceRange(101)));
    }

    #[test]
    fn bad_date_is_rejected() {
        let err = HotspotRecord::new(55.0, 37.0, 310.5, 90, "14/07/2021", None).unwrap_err();
        assert!(matches!(err, DataError::BadDate(_)));
    }

    #[test]
    fn bad_time_is_rejected() {
        let err = HotspotRecord::new(55.0, 37.0, 310.5, 90, "2021-07-14", Some(2460)).unwrap_err();
        assert!(matches!(err, DataError::BadTime(2460)));
    }
}
