use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.fridaypr.com/wp-json/wp/v2";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContentConfig {
    /// Root of the REST namespace, e.g. `https://host/wp-json/wp/v2`.
    pub api_base_url: String,
    /// Path under `api_base_url` that serves media objects by id.
    pub media_path: String,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
    /// Sent with every request; per-request headers take precedence.
    pub default_headers: BTreeMap<String, String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            media_path: "media".to_string(),
            timeout_secs: 30,
            user_agent: None,
            default_headers: BTreeMap::new(),
        }
    }
}

impl ContentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    pub fn with_media_path(mut self, media_path: impl Into<String>) -> Self {
        self.media_path = media_path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// `{api_base_url}/{media_path}`
    pub fn media_base_url(&self) -> String {
        format!("{}/{}", self.base(), self.media_path.trim_matches('/'))
    }

    pub fn media_url(&self, media_id: u64) -> String {
        format!("{}/{}", self.media_base_url(), media_id)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base(), path.trim_start_matches('/'))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_base_url.is_empty() {
            return Err("API base URL cannot be empty".to_string());
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err("API base URL must start with http:// or https://".to_string());
        }

        if self.media_path.trim_matches('/').is_empty() {
            return Err("Media path cannot be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if let Some(name) = self.default_headers.keys().find(|name| name.trim().is_empty()) {
            return Err(format!("Header name cannot be blank: {:?}", name));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ContentConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ContentConfig::new()
            .with_api_base_url("http://localhost:8080/wp-json/wp/v2/")
            .with_media_path("/media/")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("site/0.1")
            .with_header("Authorization", "Bearer abc");

        assert_eq!(config.media_base_url(), "http://localhost:8080/wp-json/wp/v2/media");
        assert_eq!(config.media_url(7), "http://localhost:8080/wp-json/wp/v2/media/7");
        assert_eq!(config.endpoint("/posts"), "http://localhost:8080/wp-json/wp/v2/posts");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent.as_deref(), Some("site/0.1"));
        assert_eq!(config.default_headers["Authorization"], "Bearer abc");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ContentConfig::default();

        config.api_base_url = "".to_string();
        assert!(config.validate().is_err());

        config.api_base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.api_base_url = DEFAULT_API_BASE_URL.to_string();
        config.media_path = "/".to_string();
        assert!(config.validate().is_err());

        config.media_path = "media".to_string();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.timeout_secs = 10;
        config.default_headers.insert(" ".to_string(), "x".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: ContentConfig =
            serde_json::from_str(r#"{"api_base_url":"https://cms.example.org/wp-json/wp/v2"}"#)
                .unwrap();
        assert_eq!(config.api_base_url, "https://cms.example.org/wp-json/wp/v2");
        assert_eq!(config.media_path, "media");
        assert_eq!(config.timeout_secs, 30);
    }
}
