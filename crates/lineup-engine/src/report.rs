use lineup_common::model::{BatchResult, TrackRequest};
use std::fmt;
use std::path::Path;

/// Write the failed items, one `"<artist> - <title>"` per line.
///
/// Nothing is written for an empty list. Returns whether a file was written.
pub async fn write_failure_report(
    path: &Path,
    failures: &[TrackRequest],
) -> std::io::Result<bool> {
    if failures.is_empty() {
        return Ok(false);
    }
    tokio::fs::write(path, render_failures(failures)).await?;
    tracing::info!(path = %path.display(), count = failures.len(), "Wrote failure report");
    Ok(true)
}

pub fn render_failures(failures: &[TrackRequest]) -> String {
    failures
        .iter()
        .map(TrackRequest::label)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Human-readable totals of a finished batch.
pub struct BatchSummary<'a>(pub &'a BatchResult);

impl fmt::Display for BatchSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Successfully added: {}", self.0.success_count)?;
        write!(f, "Failed: {}", self.0.failure_count)
    }
}
