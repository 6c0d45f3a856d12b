//! Order-service API client.
//!
//! HTTP communication with the persistence collaborator: menu catalog
//! fetch, bulk check fetch, and check upserts. Errors are mapped to
//! user-friendly messages suitable for the banner channel.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::types::{Check, MenuItem};

// ---------------------------------------------------------------------------
// URL normalisation
// ---------------------------------------------------------------------------

/// Normalise the order-service base URL:
/// - strip trailing slashes
/// - ensure a scheme is present (https, or http for localhost)
pub fn normalize_base_url(url: &str) -> String {
    let mut url = url.trim().to_string();

    if !url.starts_with("http://") && !url.starts_with("https://") {
        if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
            url = format!("http://{url}");
        } else {
            url = format!("https://{url}");
        }
    }

    while url.ends_with('/') {
        url.pop();
    }

    url
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Convert a `reqwest::Error` into a user-friendly message.
fn friendly_error(url: &str, err: &reqwest::Error) -> String {
    if err.is_connect() {
        return format!("Cannot reach order service at {url}");
    }
    if err.is_timeout() {
        return format!("Connection to {url} timed out");
    }
    if err.is_builder() {
        return format!("Invalid order service URL: {url}");
    }
    format!("Network error communicating with {url}: {err}")
}

/// Convert an HTTP status code into a user-friendly message.
fn status_error(status: StatusCode) -> String {
    match status.as_u16() {
        404 => "Order service endpoint not found".to_string(),
        s if s >= 500 => format!("Order service error (HTTP {s})"),
        s => format!("Unexpected response from order service (HTTP {s})"),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {e}"))?;
        Ok(Self {
            client,
            base_url: normalize_base_url(&config.base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the menu catalog. Read-only, called once at startup.
    pub async fn fetch_catalog(&self) -> Result<Vec<MenuItem>, String> {
        let url = format!("{}/api/Dish", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| friendly_error(&self.base_url, &e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let dishes: Vec<MenuItem> = resp
            .json()
            .await
            .map_err(|e| format!("Invalid menu payload from order service: {e}"))?;
        info!(dishes = dishes.len(), "menu catalog fetched");
        Ok(dishes)
    }

    /// Fetch every check, open and closed; the core partitions them by
    /// status. Raw timestamps arrive as ISO-8601 strings and parse into
    /// `DateTime<Utc>` here; malformed rows are skipped with a warning
    /// rather than failing the whole load.
    pub async fn fetch_all_checks(&self) -> Result<Vec<Check>, String> {
        let url = format!("{}/api/Orders", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| friendly_error(&self.base_url, &e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let rows: Vec<Value> = resp
            .json()
            .await
            .map_err(|e| format!("Invalid orders payload from order service: {e}"))?;

        let mut checks = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value::<Check>(row) {
                Ok(check) => checks.push(check),
                Err(e) => warn!("skipping malformed check row: {e}"),
            }
        }
        info!(checks = checks.len(), "checks fetched");
        Ok(checks)
    }

    /// Upsert a check (create/update an open check, or close one; the
    /// `status` field distinguishes intent). Money fields are pre-rounded
    /// to 2 decimals at this boundary.
    ///
    /// The collaborator does not guarantee idempotency, so each write
    /// carries a stable key derived from the order id and a monotonic
    /// revision; a retried request deduplicates server-side once the
    /// service honours the header.
    pub async fn post_check(&self, check: &Check, revision: u64) -> Result<(), String> {
        let url = format!("{}/api/Orders", self.base_url);
        let idempotency_key = format!("check:{}:{revision}", check.order_id);

        let resp = self
            .client
            .post(&url)
            .header("X-Idempotency-Key", &idempotency_key)
            .json(&check.rounded())
            .send()
            .await
            .map_err(|e| friendly_error(&self.base_url, &e))?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<Value>(&body_text)
                .ok()
                .and_then(|json| {
                    json.get("error")
                        .or_else(|| json.get("message"))
                        .or_else(|| json.get("title"))
                        .and_then(Value::as_str)
                        .map(|s| format!("{s} (HTTP {})", status.as_u16()))
                })
                .unwrap_or_else(|| status_error(status));
            return Err(detail);
        }

        info!(
            order_id = check.order_id,
            status = ?check.status,
            idempotency_key = %idempotency_key,
            "check posted"
        );
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://localhost:7230/"),
            "https://localhost:7230"
        );
        assert_eq!(
            normalize_base_url("localhost:7230"),
            "http://localhost:7230"
        );
        assert_eq!(
            normalize_base_url("pos.example.com//"),
            "https://pos.example.com"
        );
        assert_eq!(
            normalize_base_url("  https://pos.example.com  "),
            "https://pos.example.com"
        );
    }

    #[test]
    fn test_status_error_messages() {
        assert_eq!(
            status_error(StatusCode::NOT_FOUND),
            "Order service endpoint not found"
        );
        assert_eq!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR),
            "Order service error (HTTP 500)"
        );
        assert_eq!(
            status_error(StatusCode::IM_A_TEAPOT),
            "Unexpected response from order service (HTTP 418)"
        );
    }

    #[test]
    fn test_client_normalizes_configured_url() {
        let config = ApiConfig {
            base_url: "localhost:7230/".to_string(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(&config).expect("client");
        assert_eq!(client.base_url(), "http://localhost:7230");
    }

    #[tokio::test]
    async fn test_unreachable_service_yields_friendly_error() {
        // Nothing listens on the discard port; the connect error must map
        // to banner-ready text.
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: std::time::Duration::from_secs(2),
        };
        let client = ApiClient::new(&config).expect("client");
        let err = client.fetch_catalog().await.unwrap_err();
        assert!(
            err.contains("Cannot reach order service")
                || err.contains("Network error")
                || err.contains("timed out"),
            "unexpected error text: {err}"
        );
    }
}
