use content::{
    Collection, ContentConfig, ContentError, Fetcher, HttpFetcher, RequestOptions, Resolver,
    ResolverProfile,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    #[error("Failed to load {what}: {message}")]
    Fetch { what: &'static str, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type SiteResult<T> = Result<T, SiteError>;

/// Settings file layout:
///
/// ```toml
/// [content]
/// api_base_url = "https://cms.example.org/wp-json/wp/v2"
/// timeout_secs = 10
///
/// [request_headers]
/// X-Api-Key = "..."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub content: ContentConfig,
    pub request_headers: BTreeMap<String, String>,
}

impl SiteSettings {
    pub fn from_toml_str(raw: &str) -> SiteResult<Self> {
        let settings: Self = toml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> SiteResult<Self> {
        debug!("Loading settings from {}", path.display());
        let raw = std::fs::read_to_string(path).map_err(|source| SiteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&raw)?;
        info!("Using content API at {}", settings.content.api_base_url);
        Ok(settings)
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> SiteResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> SiteResult<Self> {
        if let Some(base_url) = base_url {
            self.content.api_base_url = base_url;
            self.validate()?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> SiteResult<()> {
        self.content
            .validate()
            .map_err(|message| SiteError::InvalidConfig { message })
    }

    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            headers: self.request_headers.clone(),
        }
    }

    pub fn fetcher(&self) -> SiteResult<Arc<dyn Fetcher>> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&self.content)?);
        Ok(fetcher)
    }

    pub fn resolver(&self, profile: ResolverProfile) -> SiteResult<Resolver> {
        Ok(Resolver::new(self.fetcher()?, self.content.clone(), profile)?)
    }

    pub fn resolver_for(&self, collection: Collection) -> SiteResult<Resolver> {
        self.resolver(collection.profile())
    }

    pub fn listing_resolver(
        &self,
        collection: Collection,
        category: Option<&str>,
    ) -> SiteResult<Resolver> {
        self.resolver(collection.listing_profile(category))
    }

    pub fn page_url(&self, slug: &str) -> SiteResult<String> {
        Ok(Collection::Pages.query_url(&self.content, &[("slug", slug)])?)
    }
}
