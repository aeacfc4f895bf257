//! Spatial analytics over the prepared hotspot table.
//!
//! Distances are approximated with an axis-aligned window: a record is
//! "nearby" when its latitude and longitude each lie within
//! `radius_km / 111` degrees of the query point. The window is a square,
//! not a circle, and widens with latitude; it is not geodesic distance.

use std::collections::BTreeMap;

use crate::classifier::FireClassifier;
use crate::config::KM_PER_DEGREE;
use crate::data::features::{PreparedDataset, PreparedRecord};

// ---------------------------------------------------------------------------
// Query and result types
// ---------------------------------------------------------------------------

/// A point-and-radius question asked from the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

/// Detections per calendar month within the query window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCount {
    pub month: u32,
    pub count: usize,
}

/// Aggregates over the nearby subset.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    /// Mean brightness of nearby records, 0.0 when none.
    pub avg_brightness: f64,
    /// Histogram sorted by month.
    pub monthly: Vec<MonthlyCount>,
}

/// Everything one query produces. Transient: owned by the presentation
/// layer and recomputed from scratch on every analysis request.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub query: Query,
    /// Model fire probability at the query point.
    pub probability: f64,
    pub num_fires: usize,
    pub avg_brightness: f64,
    pub global_avg_brightness: f64,
    /// Unweighted centroid of the nearby subset, `None` when empty.
    pub center_of_mass: Option<(f64, f64)>,
    pub nearby: Vec<PreparedRecord>,
    pub monthly: Vec<MonthlyCount>,
}

// ---------------------------------------------------------------------------
// Windowed selection
// ---------------------------------------------------------------------------

/// Half-width of the selection window in degrees.
fn degree_window(radius_km: f64) -> f64 {
    radius_km / KM_PER_DEGREE
}

/// Records within the per-axis degree window around (`lat`, `lon`).
pub fn nearby_records(
    data: &PreparedDataset,
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> Vec<PreparedRecord> {
    let window = degree_window(radius_km);
    data.records
        .iter()
        .filter(|r| (r.latitude - lat).abs() <= window && (r.longitude - lon).abs() <= window)
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Count, mean brightness, and per-month histogram of the subset.
pub fn summary_stats(nearby: &[PreparedRecord]) -> SummaryStats {
    let count = nearby.len();
    let avg_brightness = if count == 0 {
        0.0
    } else {
        nearby.iter().map(|r| r.brightness).sum::<f64>() / count as f64
    };

    let mut by_month: BTreeMap<u32, usize> = BTreeMap::new();
    for rec in nearby {
        *by_month.entry(rec.month).or_default() += 1;
    }
    let monthly = by_month
        .into_iter()
        .map(|(month, count)| MonthlyCount { month, count })
        .collect();

    SummaryStats {
        count,
        avg_brightness,
        monthly,
    }
}

/// Unweighted centroid of the subset's coordinates, `None` when empty.
///
/// Named after the marker it drives on the map; brightness does not enter
/// the mean.
pub fn center_of_mass(nearby: &[PreparedRecord]) -> Option<(f64, f64)> {
    if nearby.is_empty() {
        return None;
    }
    let n = nearby.len() as f64;
    let lat = nearby.iter().map(|r| r.latitude).sum::<f64>() / n;
    let lon = nearby.iter().map(|r| r.longitude).sum::<f64>() / n;
    Some((lat, lon))
}

// ---------------------------------------------------------------------------
// Query orchestration
// ---------------------------------------------------------------------------

/// Run one full analysis for a query point. Pure: reads the table and the
/// model, holds nothing back.
///
/// The centroid is computed from the same `nearby_records` selection as the
/// statistics, so the two can never use diverging windows.
pub fn analyze(data: &PreparedDataset, model: &FireClassifier, query: &Query) -> AnalysisResult {
    let nearby = nearby_records(data, query.latitude, query.longitude, query.radius_km);
    let stats = summary_stats(&nearby);
    let center = center_of_mass(&nearby);

    log::debug!(
        "analysis at ({:.3}, {:.3}) r={}km: {} nearby records",
        query.latitude,
        query.longitude,
        query.radius_km,
        stats.count
    );

    AnalysisResult {
        query: *query,
        probability: model.fire_probability(query.latitude, query.longitude),
        num_fires: stats.count,
        avg_brightness: stats.avg_brightness,
        global_avg_brightness: data.mean_brightness(),
        center_of_mass: center,
        nearby,
        monthly: stats.monthly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TrainConfig;

    fn rec(lat: f64, lon: f64, brightness: f64, confidence: u8, month: u32) -> PreparedRecord {
        PreparedRecord {
            latitude: lat,
            longitude: lon,
            brightness,
            confidence,
            month,
            day: 15,
            hour: 12,
        }
    }

    /// The three-record scenario: two detections near (55, 37) in January,
    /// one far away in February.
    fn scenario() -> PreparedDataset {
        PreparedDataset {
            records: vec![
                rec(55.0, 37.0, 300.0, 90, 1),
                rec(55.01, 37.01, 310.0, 95, 1),
                rec(60.0, 40.0, 250.0, 60, 2),
            ],
        }
    }

    #[test]
    fn window_is_per_axis_and_inclusive() {
        let data = PreparedDataset {
            records: vec![
                rec(56.0, 37.0, 300.0, 90, 1),      // exactly on the lat edge
                rec(56.000001, 37.0, 300.0, 90, 1), // just beyond it
                rec(55.0, 38.1, 300.0, 90, 1),      // lon outside
                rec(55.9, 37.9, 300.0, 90, 1),      // corner of the square
            ],
        };
        // 111 km → a 1-degree half-window on each axis.
        let nearby = nearby_records(&data, 55.0, 37.0, 111.0);
        let lats: Vec<f64> = nearby.iter().map(|r| r.latitude).collect();
        assert_eq!(lats, vec![56.0, 55.9]);
    }

    #[test]
    fn nearby_selection_matches_scenario() {
        let nearby = nearby_records(&scenario(), 55.0, 37.0, 50.0);
        assert_eq!(nearby.len(), 2);
        assert!(nearby.iter().all(|r| r.month == 1));
    }

    #[test]
    fn summary_of_scenario() {
        let nearby = nearby_records(&scenario(), 55.0, 37.0, 50.0);
        let stats = summary_stats(&nearby);
        assert_eq!(stats.count, 2);
        assert!((stats.avg_brightness - 305.0).abs() < 1e-9);
        assert_eq!(
            stats.monthly,
            vec![MonthlyCount {
                month: 1,
                count: 2
            }]
        );
    }

    #[test]
    fn summary_of_empty_subset() {
        let stats = summary_stats(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.avg_brightness, 0.0);
        assert!(stats.monthly.is_empty());
    }

    #[test]
    fn monthly_histogram_is_sorted() {
        let subset = vec![
            rec(55.0, 37.0, 300.0, 90, 8),
            rec(55.0, 37.0, 300.0, 90, 1),
            rec(55.0, 37.0, 300.0, 90, 8),
            rec(55.0, 37.0, 300.0, 90, 3),
        ];
        let stats = summary_stats(&subset);
        let months: Vec<u32> = stats.monthly.iter().map(|m| m.month).collect();
        assert_eq!(months, vec![1, 3, 8]);
        assert_eq!(stats.monthly[2].count, 2);
    }

    #[test]
    fn centroid_of_scenario() {
        let nearby = nearby_records(&scenario(), 55.0, 37.0, 50.0);
        let (lat, lon) = center_of_mass(&nearby).unwrap();
        assert!((lat - 55.005).abs() < 1e-9);
        assert!((lon - 37.005).abs() < 1e-9);
    }

    #[test]
    fn centroid_of_empty_subset_is_none() {
        assert_eq!(center_of_mass(&[]), None);
    }

    #[test]
    fn analyze_composes_the_pieces() {
        let data = scenario();
        let features: Vec<_> = data.records.iter().map(|r| r.features()).collect();
        let labels: Vec<_> = data.records.iter().map(|r| r.label()).collect();
        let config = TrainConfig {
            n_trees: 5,
            test_fraction: 0.0,
            ..TrainConfig::default()
        };
        let model = FireClassifier::fit(&features, &labels, &config).unwrap();

        let query = Query {
            latitude: 55.0,
            longitude: 37.0,
            radius_km: 50.0,
        };
        let result = analyze(&data, &model, &query);

        assert_eq!(result.num_fires, 2);
        assert!((result.avg_brightness - 305.0).abs() < 1e-9);
        let global = (300.0 + 310.0 + 250.0) / 3.0;
        assert!((result.global_avg_brightness - global).abs() < 1e-9);
        assert_eq!(result.nearby.len(), 2);
        assert!((0.0..=1.0).contains(&result.probability));
        let (lat, lon) = result.center_of_mass.unwrap();
        assert!((lat - 55.005).abs() < 1e-9);
        assert!((lon - 37.005).abs() < 1e-9);
    }
}
