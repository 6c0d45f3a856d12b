//! Configuration for the persistence collaborator endpoint.

use std::time::Duration;

/// Default order-service URL for the single-location deployment.
const DEFAULT_BASE_URL: &str = "https://localhost:7230";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Build from the environment, falling back to defaults.
    /// `POS_API_URL` overrides the order-service base URL.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("POS_API_URL") {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_order_service() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://localhost:7230");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
