//! Discord webhook delivery with exponential-backoff retry.
//!
//! [`DiscordNotifier`] turns a [`SiteEvent`] into a Discord message and
//! POSTs it to a webhook URL. Failed attempts are retried up to three
//! times with exponential backoff (1 s, 2 s, 4 s).

use std::time::Duration;

use crate::bus::{
    SiteEvent, EVENT_CHARACTER_APPROVED, EVENT_CHARACTER_DELETED, EVENT_CHARACTER_REJECTED,
    EVENT_CHARACTER_SUBMITTED,
};

/// Retry delays in seconds (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Display name the webhook posts under.
const WEBHOOK_USERNAME: &str = "Tavern";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for Discord delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum DiscordError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Discord returned a non-2xx status code.
    #[error("Discord webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// DiscordNotifier
// ---------------------------------------------------------------------------

/// Delivers site events to a Discord webhook.
pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl DiscordNotifier {
    /// Create a new notifier with a pre-configured HTTP client.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            webhook_url: webhook_url.into(),
        }
    }

    /// Deliver an event to the webhook with retry.
    ///
    /// Retries up to 3 times with exponential backoff before giving up.
    /// Returns `Ok(())` on the first successful attempt.
    pub async fn deliver(&self, event: &SiteEvent) -> Result<(), DiscordError> {
        let payload = serde_json::json!({
            "username": WEBHOOK_USERNAME,
            "content": format_message(event),
        });

        let mut last_err: Option<DiscordError> = None;

        for (attempt, delay_secs) in RETRY_DELAYS_SECS.iter().enumerate() {
            match self.try_send(&payload).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        error = %e,
                        "Discord delivery attempt failed, retrying"
                    );
                    last_err = Some(e);
                    tokio::time::sleep(Duration::from_secs(*delay_secs)).await;
                }
            }
        }

        // Final attempt after the last backoff.
        match self.try_send(&payload).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, "Discord delivery failed after all retries");
                Err(last_err.unwrap_or(e))
            }
        }
    }

    /// Execute a single POST request and check the response status.
    async fn try_send(&self, payload: &serde_json::Value) -> Result<(), DiscordError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(DiscordError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Build the human-readable Discord message for an event.
///
/// Character events carry `name`, `class`, and `level` in their payload;
/// anything else falls back to the raw event type name.
fn format_message(event: &SiteEvent) -> String {
    let name = event.payload["name"].as_str().unwrap_or("(unknown)");
    let class = event.payload["class"].as_str().unwrap_or("?");
    let level = event.payload["level"].as_i64().unwrap_or(0);

    match event.event_type.as_str() {
        EVENT_CHARACTER_SUBMITTED => {
            format!("New submission: **{name}** ({class} {level}) is awaiting review.")
        }
        EVENT_CHARACTER_APPROVED => {
            format!("Approved: **{name}** ({class} {level}) now has a public profile.")
        }
        EVENT_CHARACTER_REJECTED => match event.payload["reason"].as_str() {
            Some(reason) => format!("Rejected: **{name}** — {reason}"),
            None => format!("Rejected: **{name}**"),
        },
        EVENT_CHARACTER_DELETED => format!("Deleted: **{name}**"),
        other => format!("Event: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
