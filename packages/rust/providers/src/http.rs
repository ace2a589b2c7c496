//! HTTP plumbing shared by the vendor implementations.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use campaignforge_shared::{CampaignForgeError, Result};

use crate::USER_AGENT;

/// Longest slice of an error body carried into a transport error.
const MAX_ERROR_BODY: usize = 500;

/// Build the HTTP client a provider reuses across dispatches.
pub(crate) fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| {
            CampaignForgeError::transport(None, format!("failed to build HTTP client: {e}"))
        })
}

/// Send a prepared request with `body` and return the decoded JSON envelope.
///
/// Non-2xx statuses and network failures (including the timeout) become
/// `Transport`; a 2xx body that is not JSON becomes `MalformedResponse`.
pub(crate) async fn send_json<B: serde::Serialize + ?Sized>(
    request: RequestBuilder,
    body: &B,
    timeout: Duration,
) -> Result<Value> {
    let response = request
        .timeout(timeout)
        .json(body)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                CampaignForgeError::transport(
                    None,
                    format!("request timed out after {}s", timeout.as_secs_f32()),
                )
            } else {
                CampaignForgeError::transport(None, e.to_string())
            }
        })?;

    let status = response.status();
    let text = response.text().await.map_err(|e| {
        CampaignForgeError::transport(Some(status.as_u16()), format!("body read failed: {e}"))
    })?;

    if !status.is_success() {
        return Err(CampaignForgeError::transport(
            Some(status.as_u16()),
            truncate(&text, MAX_ERROR_BODY),
        ));
    }

    serde_json::from_str(&text).map_err(|e| {
        CampaignForgeError::MalformedResponse(format!(
            "response body is not JSON: {e} (got: {})",
            truncate(&text, 200)
        ))
    })
}

/// Join a base URL and a path without doubling slashes.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_cleanly() {
        assert_eq!(
            endpoint("https://api.openai.com/v1/", "/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(endpoint("http://127.0.0.1:9000", "messages"), "http://127.0.0.1:9000/messages");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 2), "éé...");
    }
}
