/// Fixed paths and analysis constants.
///
/// Everything here is compile-time configuration: where the FIRMS archive
/// lives on disk, where the trained model is persisted, and the presets
/// offered by the query sidebar.

/// Directory scanned for hotspot archive files.
pub const DATA_DIR: &str = "data/FIRMS/modis-c6.1/Russia_Asia";

/// Location of the persisted random-forest model.
pub const MODEL_PATH: &str = "model/random_forest.json";

/// Approximate kilometres per degree of latitude/longitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Default query radius in kilometres.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Radius slider bounds (km).
pub const RADIUS_RANGE_KM: (f64, f64) = (10.0, 100.0);

/// City presets for the sidebar selector: (name, latitude, longitude).
pub const CITIES: &[(&str, f64, f64)] = &[
    ("Moscow", 55.7558, 37.6173),
    ("Saint Petersburg", 59.9311, 30.3609),
    ("Novosibirsk", 55.0084, 82.9357),
    ("Yekaterinburg", 56.8389, 60.6057),
    ("Krasnoyarsk", 56.0153, 92.8932),
    ("Irkutsk", 52.2869, 104.3050),
    ("Khabarovsk", 48.4827, 135.0838),
    ("Vladivostok", 43.1332, 131.9113),
];
