//! Collection retrieval with per-item image resolution.
//!
//! One [`Resolver`] serves both the content collections (posts, services,
//! pages) and the portfolio collection; what differs between them is captured
//! by a [`ResolverProfile`]:
//!
//! - where an item's image reference lives ([`ReferenceExtractor`]),
//! - which [`Palette`] supplies the placeholder gradient,
//! - whether the collection request asks the API to embed related media,
//! - whether the portfolio field whitelist is normalized onto each item.
//!
//! A fetch cycle is: collection request (with `_embed`, then without on
//! failure), JSON normalization to a list, then concurrent per-item resolution
//! that walks the item's references in order and ends in a placeholder when
//! none of them yields a URL. Per-item failures are reported to the
//! [`ResolutionObserver`] and never fail the cycle.

use crate::config::ContentConfig;
use crate::observer::{ResolutionEvent, ResolutionObserver, TracingObserver};
use crate::palette::Palette;
use crate::provider::{ContentError, ContentResult, FetchResponse, Fetcher};
use crate::types::{
    ContentItem, EnrichedItem, ImageOrigin, MediaObject, MediaReference, Payload,
    PortfolioFields, RequestOptions, ResolvedImage,
};
use futures::future::join_all;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

pub type ReferenceExtractor = fn(&ContentItem) -> Vec<MediaReference>;

#[derive(Clone, Copy)]
pub struct ResolverProfile {
    pub name: &'static str,
    pub references: ReferenceExtractor,
    pub palette: Palette,
    pub request_embed: bool,
    pub portfolio_fields: bool,
}

impl ResolverProfile {
    /// Posts, services and pages: embedded media first, then `featured_media`.
    pub fn content() -> Self {
        Self {
            name: "content",
            references: content_references,
            palette: Palette::content(),
            request_embed: true,
            portfolio_fields: false,
        }
    }

    /// Portfolio entries: `acf.project_images` first, then `featured_media`.
    pub fn portfolio() -> Self {
        Self {
            name: "portfolio",
            references: portfolio_references,
            palette: Palette::portfolio(),
            request_embed: false,
            portfolio_fields: true,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_embed(mut self, request_embed: bool) -> Self {
        self.request_embed = request_embed;
        self
    }
}

impl fmt::Debug for ResolverProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverProfile")
            .field("name", &self.name)
            .field("palette_len", &self.palette.len())
            .field("request_embed", &self.request_embed)
            .field("portfolio_fields", &self.portfolio_fields)
            .finish()
    }
}

pub fn content_references(item: &ContentItem) -> Vec<MediaReference> {
    let mut references = Vec::with_capacity(2);
    if let Some(url) = item.embedded_image_url() {
        references.push(MediaReference::Embedded(url.to_string()));
    }
    if let Some(media_id) = item.featured_media_id() {
        references.push(MediaReference::MediaId(media_id));
    }
    references
}

pub fn portfolio_references(item: &ContentItem) -> Vec<MediaReference> {
    let mut references = Vec::with_capacity(2);
    let project_image = PortfolioFields::from_item(item).image_reference();
    if let Some(reference) = project_image.clone() {
        references.push(reference);
    }
    if let Some(media_id) = item.featured_media_id() {
        if project_image != Some(MediaReference::MediaId(media_id)) {
            references.push(MediaReference::MediaId(media_id));
        }
    }
    references
}

/// Appends the embed marker, keeping any existing query string and fragment.
pub fn embed_url(url: &str) -> String {
    let (base, fragment) = match url.find('#') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    };
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}_embed{}", base, separator, fragment)
}

/// The site's collections and the profile each page renders them with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Services,
    Portfolio,
    Pages,
}

impl Collection {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::Services => "services",
            Self::Portfolio => "portfolio",
            Self::Pages => "pages",
        }
    }

    pub fn profile(&self) -> ResolverProfile {
        match self {
            Self::Portfolio => ResolverProfile::portfolio(),
            Self::Posts | Self::Services | Self::Pages => ResolverProfile::content(),
        }
    }

    /// The profile a listing page uses. The category-filtered projects page
    /// resolves portfolio entries like posts: embedded media, then
    /// `featured_media`.
    pub fn listing_profile(&self, category: Option<&str>) -> ResolverProfile {
        match (self, category) {
            (Self::Portfolio, Some(_)) => ResolverProfile::content(),
            _ => self.profile(),
        }
    }

    pub fn url(&self, config: &ContentConfig) -> String {
        config.endpoint(self.path())
    }

    /// The collection URL with `pairs` appended as percent-encoded query
    /// parameters.
    pub fn query_url(
        &self,
        config: &ContentConfig,
        pairs: &[(&str, &str)],
    ) -> ContentResult<String> {
        let mut url =
            reqwest::Url::parse(&self.url(config)).map_err(|e| ContentError::InvalidConfig {
                message: format!("invalid collection URL: {}", e),
            })?;
        url.query_pairs_mut().extend_pairs(pairs);
        Ok(url.to_string())
    }
}

pub struct Resolver {
    fetcher: Arc<dyn Fetcher>,
    config: ContentConfig,
    profile: ResolverProfile,
    observer: Arc<dyn ResolutionObserver>,
}

impl Resolver {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        config: ContentConfig,
        profile: ResolverProfile,
    ) -> ContentResult<Self> {
        config
            .validate()
            .map_err(|message| ContentError::InvalidConfig { message })?;

        Ok(Self {
            fetcher,
            config,
            profile,
            observer: Arc::new(TracingObserver),
        })
    }

    pub fn for_collection(
        fetcher: Arc<dyn Fetcher>,
        config: ContentConfig,
        collection: Collection,
    ) -> ContentResult<Self> {
        Self::new(fetcher, config, collection.profile())
    }

    pub fn with_observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn profile(&self) -> &ResolverProfile {
        &self.profile
    }

    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    /// Runs one fetch cycle for `url`.
    pub async fn resolve(&self, url: &str, options: &RequestOptions) -> ContentResult<Payload> {
        debug!("Resolving {} with {} profile", url, self.profile.name);

        match self.resolve_inner(url, options).await {
            Ok(payload) => {
                self.observer.observe(&ResolutionEvent::CollectionResolved {
                    url: url.to_string(),
                    items: payload.len(),
                });
                Ok(payload)
            }
            Err(e) => {
                self.observer.observe(&ResolutionEvent::CollectionFailed {
                    url: url.to_string(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Plain JSON fetch without embedding or image enrichment.
    pub async fn fetch_json(&self, url: &str, options: &RequestOptions) -> ContentResult<Value> {
        let response = self.fetcher.get(url, options).await?;
        if !response.is_success() {
            return Err(ContentError::Status {
                status: response.status,
            });
        }
        response.json()
    }

    async fn resolve_inner(&self, url: &str, options: &RequestOptions) -> ContentResult<Payload> {
        let response = self.fetch_collection(url, options).await?;
        let body: Value = response.json()?;

        match body {
            Value::Array(values) => {
                let items: Vec<ContentItem> = values
                    .into_iter()
                    .enumerate()
                    .filter_map(|(index, value)| match serde_json::from_value(value) {
                        Ok(item) => Some(item),
                        Err(e) => {
                            self.observer.observe(&ResolutionEvent::ItemSkipped {
                                url: url.to_string(),
                                index,
                                reason: e.to_string(),
                            });
                            None
                        }
                    })
                    .collect();
                let enriched = join_all(items.into_iter().map(|item| self.enrich(item, options)))
                    .await;
                info!("Fetched {} items from {}", enriched.len(), url);
                Ok(Payload::Collection(enriched))
            }
            Value::Object(_) => {
                let item: ContentItem = serde_json::from_value(body)?;
                Ok(Payload::Single(self.enrich(item, options).await))
            }
            other => Err(ContentError::MalformedPayload {
                message: format!("expected an array or object, got {}", json_kind(&other)),
            }),
        }
    }

    async fn fetch_collection(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> ContentResult<FetchResponse> {
        if self.profile.request_embed {
            let embedded = embed_url(url);
            let reason = match self.fetcher.get(&embedded, options).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => format!("status {}", response.status),
                Err(e) => e.to_string(),
            };
            self.observer.observe(&ResolutionEvent::EmbedFallback {
                url: embedded,
                reason,
            });
        }

        let response = self.fetcher.get(url, options).await?;
        if !response.is_success() {
            return Err(ContentError::Status {
                status: response.status,
            });
        }
        Ok(response)
    }

    async fn enrich(&self, item: ContentItem, options: &RequestOptions) -> EnrichedItem {
        let portfolio = self
            .profile
            .portfolio_fields
            .then(|| PortfolioFields::from_item(&item));
        let (image, image_origin) = self.resolve_image(&item, options).await;

        EnrichedItem {
            item,
            image,
            image_origin,
            portfolio,
        }
    }

    async fn resolve_image(
        &self,
        item: &ContentItem,
        options: &RequestOptions,
    ) -> (ResolvedImage, ImageOrigin) {
        let mut origin = ImageOrigin::NoReference;

        for reference in (self.profile.references)(item) {
            match reference {
                MediaReference::Embedded(url) => {
                    return (ResolvedImage::url(url), ImageOrigin::Embedded);
                }
                MediaReference::Url(url) => {
                    return (ResolvedImage::url(url), ImageOrigin::DirectReference);
                }
                MediaReference::MediaId(media_id) => {
                    match self.lookup_media(media_id, options).await {
                        Ok(url) => {
                            return (ResolvedImage::url(url), ImageOrigin::MediaLookup { media_id });
                        }
                        Err(e) => {
                            self.observer.observe(&ResolutionEvent::MediaLookupFailed {
                                item_id: item.id,
                                media_id,
                                reason: e.to_string(),
                            });
                            origin = ImageOrigin::LookupFailed { media_id };
                        }
                    }
                }
            }
        }

        self.observer.observe(&ResolutionEvent::PlaceholderAssigned {
            item_id: item.id,
            origin: origin.clone(),
        });
        (self.profile.palette.placeholder(item.id), origin)
    }

    async fn lookup_media(&self, media_id: u64, options: &RequestOptions) -> ContentResult<String> {
        let response = self
            .fetcher
            .get(&self.config.media_url(media_id), options)
            .await?;
        if !response.is_success() {
            return Err(ContentError::Status {
                status: response.status,
            });
        }

        let media: MediaObject = response.json()?;
        media
            .source_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ContentError::MalformedPayload {
                message: format!("media {} has no source_url", media_id),
            })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
