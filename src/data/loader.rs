use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::{DataError, HotspotDataset, HotspotRecord, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load every `*.{ext}` archive file in `dir` into one dataset.
///
/// Files are visited in sorted path order and their rows concatenated, so a
/// reload of the same directory always produces the same row order. All
/// files must share an identical header; the header must contain at least
/// the [`REQUIRED_COLUMNS`].
///
/// Returns `Ok(None)` (with a warning) when no matching file exists;
/// downstream stages disable themselves instead of failing.
pub fn load_dir(dir: &Path, ext: &str) -> Result<Option<HotspotDataset>> {
    let files = archive_files(dir, ext)?;
    if files.is_empty() {
        log::warn!("no *.{ext} archives found under {}", dir.display());
        return Ok(None);
    }

    let mut records = Vec::new();
    let mut expected_header: Option<Vec<String>> = None;
    for path in &files {
        load_file(path, &mut expected_header, &mut records)
            .with_context(|| format!("loading {}", path.display()))?;
    }

    log::info!(
        "loaded {} hotspot records from {} file(s)",
        records.len(),
        files.len()
    );
    Ok(Some(HotspotDataset {
        records,
        n_files: files.len(),
    }))
}

/// Collect matching files, sorted for deterministic concatenation order.
fn archive_files(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(ext))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// Single-file parser
// ---------------------------------------------------------------------------

/// Parse one archive file, appending its rows to `records`.
///
/// The first file loaded establishes `expected_header`; every later file
/// must match it exactly.
fn load_file(
    path: &Path,
    expected_header: &mut Option<Vec<String>>,
    records: &mut Vec<HotspotRecord>,
) -> Result<()> {
    let mut reader = csv::Reader::from_path(path).context("opening archive")?;
    let header: Vec<String> = reader
        .headers()
        .context("reading header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    for &col in REQUIRED_COLUMNS {
        if !header.iter().any(|h| h == col) {
            return Err(DataError::MissingColumn(col).into());
        }
    }
    match expected_header {
        Some(expected) if *expected != header => {
            return Err(DataError::SchemaMismatch {
                expected: expected.clone(),
                found: header,
            }
            .into());
        }
        Some(_) => {}
        None => *expected_header = Some(header.clone()),
    }

    let col = |name: &str| header.iter().position(|h| h == name);
    // Presence of the required columns was checked above.
    let lat_idx = col("latitude").unwrap();
    let lon_idx = col("longitude").unwrap();
    let bright_idx = col("brightness").unwrap();
    let conf_idx = col("confidence").unwrap();
    let date_idx = col("acq_date").unwrap();
    let time_idx = col("acq_time");

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let latitude = parse_f64(field(lat_idx), row_no, "latitude")?;
        let longitude = parse_f64(field(lon_idx), row_no, "longitude")?;
        let brightness = parse_f64(field(bright_idx), row_no, "brightness")?;
        let confidence: i64 = field(conf_idx)
            .parse()
            .with_context(|| format!("row {row_no}: confidence '{}'", field(conf_idx)))?;
        let acq_time = match time_idx {
            Some(idx) => Some(
                field(idx)
                    .parse::<u16>()
                    .with_context(|| format!("row {row_no}: acq_time '{}'", field(idx)))?,
            ),
            None => None,
        };

        let rec = HotspotRecord::new(
            latitude,
            longitude,
            brightness,
            confidence,
            field(date_idx),
            acq_time,
        )
        .with_context(|| format!("row {row_no}"))?;
        records.push(rec);
    }
    Ok(())
}

fn parse_f64(s: &str, row: usize, col: &str) -> Result<f64> {
    s.parse::<f64>()
        .with_context(|| format!("row {row}, {col}: '{s}' is not a number"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "latitude,longitude,brightness,scan,track,acq_date,acq_time,confidence";

    fn write_archive(dir: &Path, name: &str, rows: &[&str]) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        writeln!(f, "{HEADER}").unwrap();
        for row in rows {
            writeln!(f, "{row}").unwrap();
        }
    }

    #[test]
    fn empty_directory_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_dir(dir.path(), "csv").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn missing_directory_yields_none() {
        let loaded = load_dir(Path::new("does/not/exist"), "csv").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn files_concatenate_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(
            dir.path(),
            "b.csv",
            &["60.0,40.0,250.0,1.0,1.0,2021-02-03,0512,60"],
        );
        write_archive(
            dir.path(),
            "a.csv",
            &[
                "55.0,37.0,300.0,1.0,1.0,2021-01-01,1330,90",
                "55.01,37.01,310.0,1.0,1.0,2021-01-02,1330,95",
            ],
        );

        let ds = load_dir(dir.path(), "csv").unwrap().unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.n_files, 2);
        // a.csv sorts before b.csv
        assert_eq!(ds.records[0].latitude, 55.0);
        assert_eq!(ds.records[2].latitude, 60.0);
        assert_eq!(ds.records[2].hour(), 5);
    }

    #[test]
    fn extension_selector_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(
            dir.path(),
            "legacy.txt",
            &["55.0,37.0,300.0,1.0,1.0,2021-01-01,1330,90"],
        );
        assert!(load_dir(dir.path(), "csv").unwrap().is_none());
        let ds = load_dir(dir.path(), "txt").unwrap().unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn mismatched_headers_fail() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(
            dir.path(),
            "a.csv",
            &["55.0,37.0,300.0,1.0,1.0,2021-01-01,1330,90"],
        );
        let mut f = fs::File::create(dir.path().join("b.csv")).unwrap();
        writeln!(f, "latitude,longitude,brightness,confidence,acq_date").unwrap();
        writeln!(f, "55.0,37.0,300.0,90,2021-01-01").unwrap();

        let err = load_dir(dir.path(), "csv").unwrap_err();
        assert!(format!("{err:#}").contains("does not match"));
    }

    #[test]
    fn missing_required_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = fs::File::create(dir.path().join("a.csv")).unwrap();
        writeln!(f, "latitude,longitude,brightness,acq_date").unwrap();
        writeln!(f, "55.0,37.0,300.0,2021-01-01").unwrap();

        let err = load_dir(dir.path(), "csv").unwrap_err();
        assert!(format!("{err:#}").contains("confidence"));
    }

    #[test]
    fn out_of_range_confidence_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(
            dir.path(),
            "a.csv",
            &["55.0,37.0,300.0,1.0,1.0,2021-01-01,1330,101"],
        );
        let err = load_dir(dir.path(), "csv").unwrap_err();
        assert!(format!("{err:#}").contains("0-100"));
    }

    #[test]
    fn unparsable_date_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(
            dir.path(),
            "a.csv",
            &["55.0,37.0,300.0,1.0,1.0,01.05.2021,1330,90"],
        );
        let err = load_dir(dir.path(), "csv").unwrap_err();
        assert!(format!("{err:#}").contains("acquisition date"));
    }
}
