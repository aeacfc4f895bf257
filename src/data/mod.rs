/// Data layer: typed records, archive loading, and feature preparation.
///
/// Architecture:
/// ```text
///  data/FIRMS/**.csv|.txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  glob + parse + validate → HotspotDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ HotspotDataset │  Vec<HotspotRecord>, per-file row order
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ features  │  confidence filter + calendar features
///   └──────────┘     → feature matrix, labels, PreparedDataset
/// ```

pub mod features;
pub mod loader;
pub mod model;
