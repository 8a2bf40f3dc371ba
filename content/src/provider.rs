use crate::types::RequestOptions;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

pub type ContentResult<T> = Result<T, ContentError>;

/// A completed HTTP exchange. Non-2xx statuses are not errors at this layer;
/// the resolver decides whether to fall back or fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ContentResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// The HTTP capability the resolver depends on.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str, options: &RequestOptions) -> ContentResult<FetchResponse>;

    fn fetcher_name(&self) -> &'static str;
}
