use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Configuration problems. These are fatal: the daemon refuses to run with a
/// partial or contradictory setup and exits with a diagnostic naming the
/// offending token.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicated filesystem entry {0:?} in FILE_SYSTEMS")]
    DuplicateFilesystem(String),

    #[error("invalid threshold {value:?} for filesystem {filesystem:?}")]
    InvalidThreshold { filesystem: String, value: String },

    #[error("invalid value {value:?} for {name}")]
    InvalidSetting { name: &'static str, value: String },
}

/// Failures while sampling the usage table. The daemon logs these and retries
/// on the next tick; one-shot modes propagate them as a non-zero exit.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("failed to run df: {0}")]
    Spawn(std::io::Error),

    #[error("df exited with {0}")]
    Failed(ExitStatus),

    #[error("df timed out after {0:?}")]
    TimedOut(Duration),

    #[error("usage table header is missing the {0:?} column")]
    MissingColumn(&'static str),

    #[error("usage table is empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_name_the_offending_token() {
        let err = ConfigError::DuplicateFilesystem("/data".into());
        assert_eq!(
            err.to_string(),
            "duplicated filesystem entry \"/data\" in FILE_SYSTEMS"
        );

        let err = ConfigError::InvalidThreshold {
            filesystem: "/data".into(),
            value: "high".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid threshold \"high\" for filesystem \"/data\""
        );

        let err = ConfigError::InvalidSetting {
            name: "TRIGGER_INTERVAL",
            value: "soon".into(),
        };
        assert_eq!(err.to_string(), "invalid value \"soon\" for TRIGGER_INTERVAL");
    }

    #[test]
    fn usage_errors_describe_the_failure() {
        let err = UsageError::MissingColumn("Use%");
        assert_eq!(
            err.to_string(),
            "usage table header is missing the \"Use%\" column"
        );
        assert_eq!(UsageError::Empty.to_string(), "usage table is empty");
    }
}
