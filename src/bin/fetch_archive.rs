use std::env;
use std::fs;
use std::process::Command;

use anyhow::{bail, Context, Result};

/// FIRMS near-real-time archive for the Russia/Asia region.
const ARCHIVE_URL: &str =
    "https://nrt3.modaps.eosdis.nasa.gov/api/v2/content/archives/FIRMS/modis-c6.1/Russia_Asia";

/// Where the mirrored files land; the dashboard scans this directory.
const DATA_DIR: &str = "data/FIRMS/modis-c6.1/Russia_Asia";

/// Mirror the hotspot archive with `wget`, authenticating with the
/// Earthdata bearer token from the `FIRMS_TOKEN` environment variable.
///
/// This is a plain transfer wrapper: it reports success or failure and
/// nothing else. Schema checks happen later, at load time.
fn main() -> Result<()> {
    let token =
        env::var("FIRMS_TOKEN").context("FIRMS_TOKEN is not set (Earthdata bearer token)")?;
    fs::create_dir_all(DATA_DIR).context("creating data directory")?;

    let status = Command::new("wget")
        .args([
            "-q",
            "-e",
            "robots=off",
            "-m",
            "-np",
            "-R",
            ".html,.tmp",
            "-nH",
            "--cut-dirs=4",
            ARCHIVE_URL,
            "--header",
            &format!("Authorization: Bearer {token}"),
            "-P",
            DATA_DIR,
        ])
        .status()
        .context("running wget")?;

    if !status.success() {
        bail!("wget exited with {status}");
    }
    println!("Archive mirrored into {DATA_DIR}");
    Ok(())
}
