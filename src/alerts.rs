use crate::config::ThresholdMap;
use crate::models::usage::UsageRecord;
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

/// A filesystem at or above its configured threshold this tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breach {
    pub filesystem: String,
    /// The raw used-percentage token as `df` reported it, e.g. "91%".
    pub used:       String,
}

/// Evaluate one tick's usage table against the thresholds.
///
/// Only filesystems present in the map are considered; everything else in the
/// table is ignored. Pure and stateless: identical inputs always yield the
/// same breaches, in table order. A used% token that fails to parse is logged
/// and skipped, the same lenient policy the row parser applies.
pub fn evaluate(records: &[UsageRecord], thresholds: &ThresholdMap) -> Vec<Breach> {
    let mut breaches = Vec::new();

    for record in records {
        let Some(&threshold) = thresholds.get(&record.filesystem) else {
            continue;
        };
        let Some(used) = record.used_pct_value() else {
            warn!(
                "{}: unparsable used% token {:?}, skipping",
                record.filesystem, record.used_pct
            );
            continue;
        };
        if used >= threshold {
            breaches.push(Breach {
                filesystem: record.filesystem.clone(),
                used:       record.used_pct.clone(),
            });
        }
    }

    breaches
}

/// Delay until the next tick: back off to the long warning interval after a
/// breaching tick, otherwise poll at the trigger interval. The choice is made
/// per tick; no warning state is carried between ticks.
pub fn next_delay(breached: bool, trigger: Duration, warning: Duration) -> Duration {
    if breached { warning } else { trigger }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn records() -> Vec<UsageRecord> {
        vec![
            UsageRecord {
                filesystem: "/dev/sda1".into(),
                avail:      "100G".into(),
                used_pct:   "80%".into(),
            },
            UsageRecord {
                filesystem: "/dev/sda2".into(),
                avail:      "200G".into(),
                used_pct:   "30%".into(),
            },
        ]
    }

    #[test]
    fn breach_when_usage_reaches_the_threshold() {
        let thresholds = HashMap::from([
            ("/dev/sda1".to_string(), 70.0),
            ("/dev/sda2".to_string(), 50.0),
        ]);
        let breaches = evaluate(&records(), &thresholds);
        assert_eq!(breaches.len(), 1);
        assert_eq!(breaches[0].filesystem, "/dev/sda1");
        assert_eq!(breaches[0].used, "80%");
    }

    #[test]
    fn no_breach_below_every_threshold() {
        let thresholds = HashMap::from([
            ("/dev/sda1".to_string(), 90.0),
            ("/dev/sda2".to_string(), 40.0),
        ]);
        assert!(evaluate(&records(), &thresholds).is_empty());
    }

    #[test]
    fn threshold_is_inclusive() {
        let thresholds = HashMap::from([("/dev/sda1".to_string(), 80.0)]);
        let breaches = evaluate(&records(), &thresholds);
        assert_eq!(breaches.len(), 1);
    }

    #[test]
    fn unconfigured_filesystems_are_ignored() {
        let thresholds = HashMap::from([("/dev/sdz9".to_string(), 0.0)]);
        assert!(evaluate(&records(), &thresholds).is_empty());
    }

    #[test]
    fn unparsable_used_tokens_are_skipped() {
        let records = vec![UsageRecord {
            filesystem: "/dev/sda1".into(),
            avail:      "100G".into(),
            used_pct:   "-".into(),
        }];
        let thresholds = HashMap::from([("/dev/sda1".to_string(), 0.0)]);
        assert!(evaluate(&records, &thresholds).is_empty());
    }

    #[test]
    fn evaluation_is_idempotent() {
        let thresholds = HashMap::from([
            ("/dev/sda1".to_string(), 70.0),
            ("/dev/sda2".to_string(), 50.0),
        ]);
        let first  = evaluate(&records(), &thresholds);
        let second = evaluate(&records(), &thresholds);
        assert_eq!(first, second);
    }

    #[test]
    fn delay_backs_off_only_after_a_breach() {
        let trigger = Duration::from_secs(30);
        let warning = Duration::from_secs(900);
        assert_eq!(next_delay(true, trigger, warning), warning);
        assert_eq!(next_delay(false, trigger, warning), trigger);
    }
}
