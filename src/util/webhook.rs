use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

const POST_TIMEOUT: Duration = Duration::from_secs(10);

/// Webhook delivery is best-effort: every transport failure is logged and
/// swallowed, so a dead or unset endpoint can never stall the monitor loop.
pub struct Notifier {
    client: reqwest::Client,
}

impl Notifier {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(POST_TIMEOUT)
            .build()
            .expect("default reqwest client");
        Notifier { client }
    }

    /// POST one warning line for `filesystem` to `url`.
    pub async fn notify(&self, url: &str, filesystem: &str, used: &str) {
        let result = self
            .client
            .post(url)
            .json(&payload(filesystem, used))
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => {
                debug!("webhook delivered for {filesystem}");
            }
            Ok(resp) => warn!("webhook returned {} for {filesystem}", resp.status()),
            Err(e)   => warn!("webhook delivery failed for {filesystem}: {e}"),
        }
    }
}

// Slack and Discord both accept {"text": "..."} as a minimal payload.
fn payload(filesystem: &str, used: &str) -> Value {
    json!({ "text": format!("WARNING: {filesystem}: used {used}") })
}
