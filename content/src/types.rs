use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embedded {
    #[serde(
        rename = "wp:featuredmedia",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub featured_media: Vec<EmbeddedMedia>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A record as returned by the content API. Fields the resolver does not
/// interpret are kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Rendered>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<Rendered>,
    #[serde(default, deserialize_with = "lenient_media_id")]
    pub featured_media: u64,
    #[serde(rename = "_embedded", default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acf: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `featured_media` as a number or numeric string; `null` and anything
/// unusable mean "none".
fn lenient_media_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(id.unwrap_or(0))
}

impl ContentItem {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            slug: None,
            date: None,
            title: Rendered {
                rendered: title.into(),
            },
            content: None,
            excerpt: None,
            featured_media: 0,
            embedded: None,
            acf: None,
            extra: Map::new(),
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_featured_media(mut self, media_id: u64) -> Self {
        self.featured_media = media_id;
        self
    }

    pub fn with_embedded_image(mut self, source_url: impl Into<String>) -> Self {
        let embedded = self.embedded.get_or_insert_with(Embedded::default);
        embedded.featured_media = vec![EmbeddedMedia {
            source_url: Some(source_url.into()),
            ..EmbeddedMedia::default()
        }];
        self
    }

    pub fn with_acf(mut self, acf: Value) -> Self {
        self.acf = Some(acf);
        self
    }

    /// `_embedded["wp:featuredmedia"][0].source_url`, when non-empty.
    pub fn embedded_image_url(&self) -> Option<&str> {
        self.embedded
            .as_ref()?
            .featured_media
            .first()?
            .source_url
            .as_deref()
            .filter(|url| !url.is_empty())
    }

    pub fn featured_media_id(&self) -> Option<u64> {
        (self.featured_media != 0).then_some(self.featured_media)
    }

    /// A field of the `acf` object. The API sends `[]` instead of `{}` when an
    /// item has no custom fields, so anything that is not an object yields `None`.
    pub fn acf_field(&self, name: &str) -> Option<&Value> {
        self.acf.as_ref()?.as_object()?.get(name)
    }
}

/// Body of `GET {media}/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaObject {
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaReference {
    /// URL inlined by the embed request.
    Embedded(String),
    /// Needs a `GET {media}/{id}` lookup.
    MediaId(u64),
    /// URL stored directly on the item.
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedImage {
    Url { url: String },
    Gradient { gradient: String },
}

impl ResolvedImage {
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url { url: url.into() }
    }

    pub fn gradient(gradient: impl Into<String>) -> Self {
        Self::Gradient {
            gradient: gradient.into(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Gradient { .. })
    }
}

/// Why an item ended up with the image it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ImageOrigin {
    Embedded,
    MediaLookup { media_id: u64 },
    DirectReference,
    NoReference,
    LookupFailed { media_id: u64 },
}

/// Optional descriptive fields of a portfolio entry. Missing, null, `false`,
/// `0` and empty-string values all normalize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioFields {
    pub client_name: Option<String>,
    pub tools_used: Option<Value>,
    pub project_url: Option<String>,
    pub the_challenge: Option<String>,
    pub our_solution: Option<String>,
    pub results_achieved: Option<String>,
    pub key_features: Option<Value>,
    pub project_images: Option<Value>,
    pub project_category: Option<String>,
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn present_text(value: Option<&Value>) -> Option<String> {
    match present(value)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl PortfolioFields {
    pub fn from_item(item: &ContentItem) -> Self {
        Self {
            client_name: present_text(item.acf_field("client_name")),
            tools_used: present(item.acf_field("tools_used")).cloned(),
            project_url: present_text(item.acf_field("project_url")),
            the_challenge: present_text(item.acf_field("the_challenge")),
            our_solution: present_text(item.acf_field("our_solution")),
            results_achieved: present_text(item.acf_field("results_achieved")),
            key_features: present(item.acf_field("key_features")).cloned(),
            project_images: present(item.acf_field("project_images")).cloned(),
            project_category: present_text(item.acf_field("project_category")),
        }
    }

    /// Interprets `project_images` as something an image can be resolved from.
    pub fn image_reference(&self) -> Option<MediaReference> {
        match self.project_images.as_ref()? {
            Value::Number(n) => n.as_u64().filter(|id| *id != 0).map(MediaReference::MediaId),
            Value::String(s) => {
                let s = s.trim();
                if let Ok(id) = s.parse::<u64>() {
                    (id != 0).then_some(MediaReference::MediaId(id))
                } else if s.starts_with("http://") || s.starts_with("https://") {
                    Some(MediaReference::Url(s.to_string()))
                } else {
                    None
                }
            }
            Value::Object(obj) => match (obj.get("url"), obj.get("id")) {
                (Some(Value::String(url)), _) if !url.is_empty() => {
                    Some(MediaReference::Url(url.clone()))
                }
                (_, Some(Value::Number(id))) => {
                    id.as_u64().filter(|id| *id != 0).map(MediaReference::MediaId)
                }
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedItem {
    #[serde(flatten)]
    pub item: ContentItem,
    pub image: ResolvedImage,
    pub image_origin: ImageOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<PortfolioFields>,
}

impl EnrichedItem {
    pub fn id(&self) -> u64 {
        self.item.id
    }

    pub fn slug(&self) -> Option<&str> {
        self.item.slug.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.item.title.rendered
    }
}

/// The resolved result of one fetch cycle, keeping the shape the API used.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Collection(Vec<EnrichedItem>),
    Single(EnrichedItem),
}

impl Payload {
    pub fn items(&self) -> &[EnrichedItem] {
        match self {
            Self::Collection(items) => items,
            Self::Single(item) => std::slice::from_ref(item),
        }
    }

    pub fn into_items(self) -> Vec<EnrichedItem> {
        match self {
            Self::Collection(items) => items,
            Self::Single(item) => vec![item],
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }
}
