use crate::config::ContentConfig;
use crate::provider::{ContentError, ContentResult, FetchResponse, Fetcher};
use crate::types::RequestOptions;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::collections::BTreeMap;
use tracing::debug;

/// [`Fetcher`] backed by a shared `reqwest::Client`.
pub struct HttpFetcher {
    http_client: reqwest::Client,
    default_headers: BTreeMap<String, String>,
}

impl HttpFetcher {
    pub fn new(config: &ContentConfig) -> ContentResult<Self> {
        config
            .validate()
            .map_err(|message| ContentError::InvalidConfig { message })?;

        let mut builder = reqwest::Client::builder().timeout(config.timeout());
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let http_client = builder.build().map_err(|e| ContentError::Unknown {
            message: format!("Failed to build HTTP client: {}", e),
        })?;

        Ok(Self {
            http_client,
            default_headers: config.default_headers.clone(),
        })
    }

    pub fn with_default_config() -> ContentResult<Self> {
        Self::new(&ContentConfig::default())
    }

    fn headers(&self, options: &RequestOptions) -> ContentResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in self.default_headers.iter().chain(options.headers.iter()) {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ContentError::InvalidConfig {
                    message: format!("Invalid header name {:?}: {}", name, e),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| ContentError::InvalidConfig {
                message: format!("Invalid value for header {}: {}", name, e),
            })?;
            headers.insert(name, value);
        }

        Ok(headers)
    }

    fn classify(e: reqwest::Error) -> ContentError {
        if e.is_timeout() {
            ContentError::ServiceUnavailable {
                message: "Request timeout".to_string(),
            }
        } else if e.is_connect() {
            ContentError::ServiceUnavailable {
                message: "Cannot connect to content API".to_string(),
            }
        } else {
            ContentError::Network(e)
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str, options: &RequestOptions) -> ContentResult<FetchResponse> {
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .headers(self.headers(options)?)
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(Self::classify)?;

        debug!("GET {} -> {}", url, status);
        Ok(FetchResponse { status, body })
    }

    fn fetcher_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_headers_override_defaults() {
        let config = ContentConfig::default()
            .with_header("X-Site", "default")
            .with_header("Accept-Language", "en");
        let fetcher = HttpFetcher::new(&config).unwrap();

        let headers = fetcher
            .headers(&RequestOptions::new().with_header("X-Site", "override"))
            .unwrap();

        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["x-site"], "override");
        assert_eq!(headers["accept-language"], "en");
    }

    #[test]
    fn test_invalid_header_is_config_error() {
        let fetcher = HttpFetcher::with_default_config().unwrap();
        let result = fetcher.headers(&RequestOptions::new().with_header("bad header", "x"));
        assert!(matches!(result, Err(ContentError::InvalidConfig { .. })));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ContentConfig::default().with_api_base_url("");
        assert!(HttpFetcher::new(&config).is_err());
    }
}
