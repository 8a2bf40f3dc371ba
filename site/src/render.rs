//! Terminal rendering of resolved content, mirroring what the site's pages show.

use crate::settings::{SiteError, SiteResult};
use content::listing::{self, DateStyle};
use content::{Collection, EnrichedItem, Phase, ResolvedImage, ResourceState};
use serde::Serialize;
use std::fmt::Write;

pub const EXCERPT_CHARS: usize = 120;
pub const RELATED_LIMIT: usize = 3;

pub fn image_line(image: &ResolvedImage) -> String {
    match image {
        ResolvedImage::Url { url } => format!("image: {}", url),
        ResolvedImage::Gradient { gradient } => format!("placeholder: {}", gradient),
    }
}

pub fn link(collection: Collection, item: &EnrichedItem) -> String {
    let key = item
        .slug()
        .map(str::to_string)
        .unwrap_or_else(|| item.id().to_string());
    let section = match collection {
        Collection::Posts => "blog",
        Collection::Services => "services",
        Collection::Portfolio => "portfolio",
        Collection::Pages => "pages",
    };
    format!("/{}/{}", section, key)
}

pub fn card(collection: Collection, item: &EnrichedItem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", listing::strip_html(item.title()));

    if collection == Collection::Posts {
        let _ = writeln!(
            out,
            "  {}",
            listing::format_date(item.item.date.as_deref(), DateStyle::Short)
        );
    }
    if collection == Collection::Portfolio {
        let _ = writeln!(out, "  category: {}", listing::category_of(item));
    }

    let summary = item
        .item
        .excerpt
        .as_ref()
        .or(item.item.content.as_ref())
        .map(|rendered| listing::excerpt(&rendered.rendered, EXCERPT_CHARS))
        .unwrap_or_default();
    if !summary.is_empty() {
        let _ = writeln!(out, "  {}", summary);
    }

    let _ = writeln!(out, "  {}", image_line(&item.image));
    let _ = writeln!(out, "  {}", link(collection, item));
    out
}

pub fn cards(collection: Collection, items: &[&EnrichedItem]) -> String {
    items
        .iter()
        .map(|item| card(collection, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The items a listing page shows for `state`, or the reason it shows none.
pub fn visible_items<'a>(
    state: &'a ResourceState,
    collection: Collection,
    category: Option<&str>,
    limit: Option<usize>,
) -> SiteResult<Vec<&'a EnrichedItem>> {
    let what = collection.path();
    match state.phase() {
        Phase::Loading => Err(SiteError::Fetch {
            what,
            message: "still loading".to_string(),
        }),
        Phase::Failed => Err(SiteError::Fetch {
            what,
            message: state.error.clone().unwrap_or_default(),
        }),
        Phase::Ready => {
            let items = state.data.as_ref().map(|d| d.items()).unwrap_or_default();
            let mut visible = match category {
                Some(category) => listing::filter_by_category(items, category),
                None => items.iter().collect(),
            };
            if let Some(limit) = limit {
                visible.truncate(limit);
            }
            Ok(visible)
        }
    }
}

pub fn post_detail(post: &EnrichedItem, related: &[&EnrichedItem]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", listing::strip_html(post.title()));
    let _ = writeln!(
        out,
        "{}",
        listing::format_date(post.item.date.as_deref(), DateStyle::Long)
    );
    let _ = writeln!(out, "{}", image_line(&post.image));
    if let Some(body) = &post.item.content {
        let _ = writeln!(out, "\n{}", listing::strip_html(&body.rendered).trim());
    }
    if !related.is_empty() {
        let _ = writeln!(out, "\nRelated posts:");
        for item in related {
            let _ = writeln!(
                out,
                "  - {} ({})",
                listing::strip_html(item.title()),
                link(Collection::Posts, item)
            );
        }
    }
    out
}

pub fn project_detail(project: &EnrichedItem, related: &[&EnrichedItem]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", listing::strip_html(project.title()));
    let _ = writeln!(out, "{}", image_line(&project.image));

    if let Some(fields) = &project.portfolio {
        let sections = [
            ("Client", fields.client_name.as_deref()),
            ("Website", fields.project_url.as_deref()),
            ("The challenge", fields.the_challenge.as_deref()),
            ("Our solution", fields.our_solution.as_deref()),
            ("Results", fields.results_achieved.as_deref()),
        ];
        for (label, value) in sections {
            if let Some(value) = value {
                let _ = writeln!(out, "{}: {}", label, listing::strip_html(value).trim());
            }
        }

        let features = listing::parse_features(fields.key_features.as_ref());
        if !features.is_empty() {
            let _ = writeln!(out, "Key features:");
            for feature in features {
                let _ = writeln!(out, "  - {}", feature);
            }
        }

        let tools = listing::parse_features(fields.tools_used.as_ref());
        if !tools.is_empty() {
            let _ = writeln!(out, "Tools: {}", tools.join(", "));
        }
    }

    if !related.is_empty() {
        let _ = writeln!(out, "\nMore projects:");
        for item in related {
            let _ = writeln!(
                out,
                "  - {} ({})",
                listing::strip_html(item.title()),
                link(Collection::Portfolio, item)
            );
        }
    }
    out
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> SiteResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
