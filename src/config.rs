//! Runtime settings of the form.

use crate::constants::*;
use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Environment variable holding the page URL for native runs.
pub const PAGE_URL_ENV: &str = "AREA_CHECK_URL";

/// Settings the app is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// URL the form starts on; its query seeds the selection and its origin
    /// hosts the endpoint. Ignored in the browser, where the tab URL is used.
    pub page_url: String,
    /// Quiet period before a text input is validated, in milliseconds
    pub debounce_ms: u64,
    /// Longest text accepted from a coordinate input
    pub max_input_len: usize,
    /// How long an error notification stays visible, in milliseconds
    pub error_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            debounce_ms: DEBOUNCE_MS,
            max_input_len: MAX_FLOAT_INPUT_LENGTH,
            error_timeout_ms: ERROR_HIDE_TIMEOUT_MS,
        }
    }
}

impl AppConfig {
    /// Defaults, with the page URL taken from [`PAGE_URL_ENV`] when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(PAGE_URL_ENV) {
            config.page_url = url;
        }
        config
    }

    /// Debounce delay as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Notification lifetime as a duration.
    pub fn error_timeout(&self) -> Duration {
        Duration::from_millis(self.error_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = AppConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(400));
        assert_eq!(config.max_input_len, 15);
        assert_eq!(config.error_timeout(), Duration::from_millis(4000));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"debounce_ms": 50}"#).unwrap();
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.page_url, DEFAULT_PAGE_URL);
    }
}
