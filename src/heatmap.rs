//! Heat-layer input for the map: one `(lat, lon, intensity)` triple per
//! prepared record, in table order, no filtering.

use crate::data::features::PreparedDataset;

/// A single heat-layer point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Brightness of the detection, used as rendering intensity.
    pub intensity: f64,
}

/// Project the prepared table to heat points.
pub fn heat_points(data: &PreparedDataset) -> Vec<HeatPoint> {
    data.records
        .iter()
        .map(|r| HeatPoint {
            latitude: r.latitude,
            longitude: r.longitude,
            intensity: r.brightness,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::features::PreparedRecord;

    fn dataset() -> PreparedDataset {
        let rec = |lat: f64, brightness: f64| PreparedRecord {
            latitude: lat,
            longitude: 37.0,
            brightness,
            confidence: 90,
            month: 1,
            day: 1,
            hour: 0,
        };
        PreparedDataset {
            records: vec![rec(55.0, 300.0), rec(60.0, 250.0), rec(55.5, 330.0)],
        }
    }

    #[test]
    fn order_and_fields_are_preserved() {
        let points = heat_points(&dataset());
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].latitude, 55.0);
        assert_eq!(points[1].intensity, 250.0);
        assert_eq!(points[2].latitude, 55.5);
    }

    #[test]
    fn projection_is_idempotent() {
        let data = dataset();
        assert_eq!(heat_points(&data), heat_points(&data));
    }
}
