//! Best-effort push alerts for the attach path.
//!
//! Alerts are strictly out-of-band: failures are logged and swallowed, and
//! the primary response never depends on them. Without credentials the sink
//! is a no-op.

use std::time::Duration;

const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";
const ALERT_TITLE: &str = "SingleFile Bridge";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Notifier {
    client: reqwest::Client,
    credentials: Option<(String, String)>,
}

impl Notifier {
    pub fn new(token: Option<String>, user: Option<String>) -> Self {
        let credentials = match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() && !user.is_empty() => {
                Some((token, user))
            }
            _ => None,
        };
        Self {
            client: reqwest::Client::new(),
            credentials,
        }
    }

    pub fn enabled(&self) -> bool {
        self.credentials.is_some()
    }

    pub async fn send(&self, message: &str) {
        let Some((token, user)) = &self.credentials else {
            return;
        };

        let form = [
            ("token", token.as_str()),
            ("user", user.as_str()),
            ("title", ALERT_TITLE),
            ("message", message),
            ("priority", "0"),
        ];

        let result = self
            .client
            .post(PUSHOVER_API_URL)
            .timeout(SEND_TIMEOUT)
            .form(&form)
            .send()
            .await;

        match result {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(status = %response.status(), "alert delivery rejected");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "alert delivery failed");
            }
        }
    }
}

/// Compact display form of a URL for alert text: scheme and query stripped,
/// trailing slash trimmed.
pub fn shorten_url(url: &str) -> String {
    let short = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let short = short.split('?').next().unwrap_or(short);
    short.trim_end_matches('/').to_string()
}
