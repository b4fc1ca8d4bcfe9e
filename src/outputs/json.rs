//! JSON output for the site's front end.
//!
//! # Output Structure
//!
//! Files are organized by date with edition names, plus a `latest.json` that
//! always holds the most recent build:
//! ```text
//! json_output_dir/
//! ├── latest.json
//! └── 2025-05-06/
//!     ├── morning.json
//!     ├── afternoon.json
//!     └── evening.json
//! ```

use crate::models::SitePage;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`SitePage`] to `{json_output_dir}/{date}/{time_of_day}.json` and
/// `{json_output_dir}/latest.json`.
///
/// Returns the path of the dated file.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_page(page: &SitePage, json_output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(page)?;

    let dated_dir = Path::new(json_output_dir).join(&page.local_date);
    info!(dir = %dated_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&dated_dir).await {
        error!(dir = %dated_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let dated_file = dated_dir.join(format!("{}.json", page.time_of_day));
    fs::write(&dated_file, &json).await?;
    info!(path = %dated_file.display(), "Wrote JSON page file");

    let latest = Path::new(json_output_dir).join("latest.json");
    fs::write(&latest, &json).await?;
    info!(path = %latest.display(), "Updated latest.json");

    Ok(dated_file)
}
