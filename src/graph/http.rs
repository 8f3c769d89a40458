//! HTTP utilities for Graph API calls

use super::auth::REQUIRED_PERMISSIONS;
use crate::error::{GraphError, Result};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// HTTP client wrapper for Graph API calls
///
/// Every call sends exactly one request. Bodies are relayed whatever the
/// HTTP status: the Graph API reports most failures as a JSON `error`
/// object, and interpreting it is left to the caller.
#[derive(Clone, Debug)]
pub struct GraphHttpClient {
    client: Client,
}

impl GraphHttpClient {
    /// Create a new HTTP client with a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("pagepurge/{}", crate::VERSION))
            .timeout(timeout)
            .build()
            .map_err(|e| GraphError::remote(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Make a GET request
    pub async fn get(&self, url: &Url, query: &[(&str, &str)]) -> Result<Value> {
        self.send(Method::GET, url, query).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &Url, query: &[(&str, &str)]) -> Result<Value> {
        self.send(Method::DELETE, url, query).await
    }

    async fn send(&self, method: Method, url: &Url, query: &[(&str, &str)]) -> Result<Value> {
        // Query strings carry the access token; only the path is logged
        tracing::debug!("{} {}", method, url.path());

        let response = self
            .client
            .request(method, url.clone())
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                "Graph API returned {} for {} - {}",
                status,
                url.path(),
                sanitize_for_log(&body)
            );
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Unparseable response from {}: {}", url.path(), sanitize_for_log(&body));
            GraphError::from(e)
        })
    }
}

/// Format a Graph error for display
/// Maps well-known failures to actionable messages and never echoes raw payloads at length
pub fn format_graph_error(error: &GraphError) -> String {
    let error_str = error.to_string();
    let lower = error_str.to_lowercase();

    if let GraphError::Validation(message) = error {
        return message.clone();
    }
    if lower.contains("oauth") || lower.contains("access token") || lower.contains("session has expired") {
        return "Access token is invalid or expired. Generate a new token and try again.".to_string();
    }
    if lower.contains("permission") {
        return format!(
            "Permission denied. The token needs {}.",
            REQUIRED_PERMISSIONS.join(", ")
        );
    }
    if lower.contains("limit reached") || lower.contains("too many calls") || lower.contains("rate limit") {
        return "Rate limit exceeded. Wait a while before trying again.".to_string();
    }
    if lower.contains("timed out") || lower.contains("timeout") {
        return "Request timed out. Check your network connection and try again.".to_string();
    }
    if lower.contains("connect") || lower.contains("dns") {
        return "Could not reach the Graph API. Check your network connection.".to_string();
    }

    let sanitized = error_str
        .chars()
        .filter(|c| !c.is_control())
        .take(120)
        .collect::<String>();

    if sanitized.chars().count() < error_str.chars().count() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
