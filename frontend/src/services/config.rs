//! Runtime configuration for the admin frontend.
//!
//! Values come from three layers, later ones winning:
//! 1. Built-in defaults
//! 2. `MONEYWHERE_API_URL` / `MONEYWHERE_LOG_LEVEL` at build time
//! 3. The JSON in `<script id="app-config" type="application/json">` on the page

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

const CONFIG_ELEMENT_ID: &str = "app-config";

fn default_api_base_url() -> String {
    option_env!("MONEYWHERE_API_URL")
        .unwrap_or("http://localhost:9092/api/v1")
        .to_string()
}

fn default_ai_summary_timeout_ms() -> u32 {
    100_000
}

fn default_page_size() -> u32 {
    20
}

fn default_log_level() -> String {
    option_env!("MONEYWHERE_LOG_LEVEL").unwrap_or("info").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_ai_summary_timeout_ms")]
    pub ai_summary_timeout_ms: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            ai_summary_timeout_ms: default_ai_summary_timeout_ms(),
            page_size: default_page_size(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Read the page's config block, falling back to defaults.
    ///
    /// Runs before the logger exists, so problems go straight to the console.
    pub fn load() -> Self {
        match Self::from_page() {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                gloo::console::warn!(format!("Ignoring app config: {:#}", e));
                Self::default()
            }
        }
    }

    fn from_page() -> Result<Option<Self>> {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return Ok(None);
        };
        let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
            return Ok(None);
        };
        let text = element.text_content().unwrap_or_default();
        if text.trim().is_empty() {
            return Ok(None);
        }
        Self::from_json(&text).map(Some)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(text).context("app-config is not valid JSON")?;
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        if self.page_size == 0 {
            self.page_size = default_page_size();
        }
        self
    }

    /// Unknown level names fall back to `info`
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.ai_summary_timeout_ms, 100_000);
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{"apiBaseUrl": "https://books.example.com/api/v1/"}"#).unwrap();
        assert_eq!(config.api_base_url, "https://books.example.com/api/v1");
        assert_eq!(config.ai_summary_timeout_ms, 100_000);
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_zero_page_size_is_replaced() {
        let config = AppConfig::from_json(r#"{"pageSize": 0}"#).unwrap();
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(AppConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_level_filter() {
        let mut config = AppConfig::default();
        config.log_level = "debug".to_string();
        assert_eq!(config.level_filter(), LevelFilter::Debug);
        config.log_level = "chatty".to_string();
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }
}
