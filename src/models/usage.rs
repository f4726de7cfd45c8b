use serde::Serialize;

/// One row of the `df` table: a mounted filesystem with live usage data.
///
/// Built fresh every tick and discarded after one evaluation pass. The
/// percentage stays in its raw string form (`"80%"`) so the notifier can
/// forward exactly what `df` reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRecord {
    pub filesystem: String,
    pub avail:      String,
    pub used_pct:   String,
}

impl UsageRecord {
    /// Numeric used percentage, if the raw token parses ("80%" -> 80.0).
    pub fn used_pct_value(&self) -> Option<f64> {
        self.used_pct.trim_end_matches('%').parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(used_pct: &str) -> UsageRecord {
        UsageRecord {
            filesystem: "/dev/sda1".into(),
            avail:      "100G".into(),
            used_pct:   used_pct.into(),
        }
    }

    #[test]
    fn percent_sign_is_stripped_for_the_numeric_value() {
        assert_eq!(record("80%").used_pct_value(), Some(80.0));
        assert_eq!(record("1.5%").used_pct_value(), Some(1.5));
        assert_eq!(record("0%").used_pct_value(), Some(0.0));
    }

    #[test]
    fn unparsable_tokens_yield_none() {
        assert_eq!(record("-").used_pct_value(), None);
        assert_eq!(record("n/a").used_pct_value(), None);
        assert_eq!(record("").used_pct_value(), None);
    }
}
