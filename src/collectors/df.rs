use crate::error::UsageError;
use crate::models::usage::UsageRecord;
use std::time::Duration;
use tokio::process::Command;

/// How long the `df` call may take before the tick gives up on it.
const DF_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `df -h` and parse its table into usage records.
pub async fn get_usage() -> Result<Vec<UsageRecord>, UsageError> {
    let output = tokio::time::timeout(DF_TIMEOUT, Command::new("df").arg("-h").output())
        .await
        .map_err(|_| UsageError::TimedOut(DF_TIMEOUT))?
        .map_err(UsageError::Spawn)?;

    if !output.status.success() {
        return Err(UsageError::Failed(output.status));
    }

    parse_usage(&String::from_utf8_lossy(&output.stdout))
}

/// Parse the whitespace-aligned `df` table.
///
/// The header row names the columns; only the positions of the exact labels
/// `Avail` and `Use%` matter, so the column order is irrelevant. Data rows
/// too short to cover those columns are skipped: a filesystem name with
/// embedded spaces shifts the alignment and produces a row we cannot trust.
pub fn parse_usage(output: &str) -> Result<Vec<UsageRecord>, UsageError> {
    let mut lines = output.lines();
    let header: Vec<&str> = match lines.next() {
        Some(h) => h.split_whitespace().collect(),
        None    => return Err(UsageError::Empty),
    };

    let avail_idx = column_index(&header, "Avail")?;
    let used_idx  = column_index(&header, "Use%")?;

    let records = lines
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            let filesystem = parts.first()?;
            let avail      = parts.get(avail_idx)?;
            let used_pct   = parts.get(used_idx)?;
            Some(UsageRecord {
                filesystem: filesystem.to_string(),
                avail:      avail.to_string(),
                used_pct:   used_pct.to_string(),
            })
        })
        .collect();

    Ok(records)
}

fn column_index(header: &[&str], label: &'static str) -> Result<usize, UsageError> {
    header
        .iter()
        .position(|h| *h == label)
        .ok_or(UsageError::MissingColumn(label))
}
