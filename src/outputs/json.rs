//! JSON output for listing and summary reports.
//!
//! Reports go to stdout unless an output path is given. Logging goes to
//! stderr, so stdout stays machine-readable.

use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tokio::io::{self, AsyncWriteExt};
use tracing::{error, info, instrument};

/// Serialize `value` as pretty JSON with a trailing newline.
pub fn render<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Write `value` to `output`, creating parent directories as needed, or to
/// stdout when `output` is `None`.
#[instrument(level = "info", skip_all, fields(output = ?output))]
pub async fn write_report<T: Serialize>(value: &T, output: Option<&str>) -> Result<(), Box<dyn Error>> {
    let json = render(value)?;

    let Some(path) = output else {
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes()).await?;
        stdout.flush().await?;
        return Ok(());
    };

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    fs::write(path, &json).await?;
    info!(%path, bytes = json.len(), "Wrote JSON report");
    Ok(())
}
