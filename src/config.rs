use crate::error::ConfigError;
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Per-filesystem percent thresholds, keyed by the identifier `df` reports.
pub type ThresholdMap = HashMap<String, f64>;

/// Runtime settings, re-read from the environment every tick. Nothing is
/// cached across ticks, so a supervised process picks up threshold or
/// endpoint edits without a restart.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Webhook endpoint for warning POSTs. Empty = delivery fails harmlessly.
    pub api_endpoint:     String,
    /// Raw FILE_SYSTEMS spec, parsed by `parse_thresholds` each tick.
    pub file_systems:     String,
    /// Default percent threshold for entries without an explicit one.
    pub global_threshold: f64,
    /// Polling delay after a clean tick.
    pub trigger_interval: Duration,
    /// Polling delay after a tick with at least one breach.
    pub warning_interval: Duration,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let global_threshold = if let Some(raw) = get("GLOBAL_THRESHOLD") {
            parse_setting("GLOBAL_THRESHOLD", &raw)?
        } else if let Some(raw) = get("THRESHOLD") {
            parse_setting("THRESHOLD", &raw)?
        } else {
            1.0
        };

        Ok(Settings {
            api_endpoint:     get("API_ENDPOINT").unwrap_or_default(),
            file_systems:     get("FILE_SYSTEMS").unwrap_or_default(),
            global_threshold,
            trigger_interval: Duration::from_secs(seconds(&get, "TRIGGER_INTERVAL", 60)?),
            warning_interval: Duration::from_secs(seconds(&get, "WARNING_INTERVAL", 3600)?),
        })
    }
}

fn seconds<F>(get: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(raw) => parse_setting(name, &raw),
        None      => Ok(default),
    }
}

fn parse_setting<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidSetting {
        name,
        value: raw.to_string(),
    })
}

/// Parse the FILE_SYSTEMS spec into a threshold map.
///
/// Entries are comma-separated, either `fs` (inherits `global`) or
/// `fs::threshold`. An empty spec still yields one empty-string entry; it
/// matches no real filesystem but counts for duplicate detection like any
/// other key. A repeated filesystem aborts the whole parse.
pub fn parse_thresholds(global: f64, spec: &str) -> Result<ThresholdMap, ConfigError> {
    let mut map = ThresholdMap::new();

    for entry in spec.split(',') {
        let (filesystem, threshold) = match entry.split_once("::") {
            Some((fs, raw)) => {
                let value = raw.parse().map_err(|_| ConfigError::InvalidThreshold {
                    filesystem: fs.to_string(),
                    value:      raw.to_string(),
                })?;
                (fs, value)
            }
            None => (entry, global),
        };

        if map.insert(filesystem.to_string(), threshold).is_some() {
            return Err(ConfigError::DuplicateFilesystem(filesystem.to_string()));
        }
    }

    Ok(map)
}
