pub mod config;
pub mod http;
pub mod listing;
pub mod observer;
pub mod palette;
pub mod provider;
pub mod resolver;
pub mod resource;
pub mod types;

pub use config::{ContentConfig, DEFAULT_API_BASE_URL};
pub use http::HttpFetcher;
pub use listing::DateStyle;
pub use observer::{
    NoopObserver, RecordingObserver, ResolutionEvent, ResolutionObserver, TracingObserver,
};
pub use palette::Palette;
pub use provider::{ContentError, ContentResult, FetchResponse, Fetcher};
pub use resolver::{embed_url, Collection, Resolver, ResolverProfile};
pub use resource::{ContentResource, Phase, ResourceState};
pub use types::{
    ContentItem, EnrichedItem, ImageOrigin, MediaReference, Payload, PortfolioFields,
    RequestOptions, ResolvedImage,
};

pub mod prelude {
    pub use crate::config::*;
    pub use crate::http::*;
    pub use crate::listing::*;
    pub use crate::observer::*;
    pub use crate::palette::*;
    pub use crate::provider::*;
    pub use crate::resolver::*;
    pub use crate::resource::*;
    pub use crate::types::*;
}
