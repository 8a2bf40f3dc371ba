//! Helpers page renderers apply to resolved items.

use crate::types::EnrichedItem;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

pub const DEFAULT_CATEGORY: &str = "web-design";
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `March 05, 2024`
    Long,
    /// `Mar 05, 2024`
    Short,
}

/// Finds the item whose slug, or decimal id, equals `key`.
pub fn find_by_slug_or_id<'a>(items: &'a [EnrichedItem], key: &str) -> Option<&'a EnrichedItem> {
    items
        .iter()
        .find(|item| item.slug() == Some(key) || item.id().to_string() == key)
}

/// The first `limit` items other than `exclude_id`, in input order.
pub fn related(items: &[EnrichedItem], exclude_id: Option<u64>, limit: usize) -> Vec<&EnrichedItem> {
    items
        .iter()
        .filter(|item| Some(item.id()) != exclude_id)
        .take(limit)
        .collect()
}

pub fn category_of(item: &EnrichedItem) -> &str {
    item.portfolio
        .as_ref()
        .and_then(|fields| fields.project_category.as_deref())
        .or_else(|| {
            item.item
                .acf_field("project_category")
                .and_then(Value::as_str)
                .filter(|category| !category.is_empty())
        })
        .unwrap_or(DEFAULT_CATEGORY)
}

pub fn filter_by_category<'a>(items: &'a [EnrichedItem], category: &str) -> Vec<&'a EnrichedItem> {
    items
        .iter()
        .filter(|item| category == ALL_CATEGORIES || category_of(item) == category)
        .collect()
}

fn tag_pattern() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

pub fn strip_html(html: &str) -> String {
    tag_pattern().replace_all(html, "").into_owned()
}

/// Tag-free text cut to at most `max_chars` characters, with `...` appended
/// when anything was cut.
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let text = strip_html(html);
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Formats an API date; anything unparseable becomes `Recent`.
pub fn format_date(value: Option<&str>, style: DateStyle) -> String {
    let Some(date) = value.and_then(parse_date) else {
        return "Recent".to_string();
    };
    match style {
        DateStyle::Long => date.format("%B %d, %Y").to_string(),
        DateStyle::Short => date.format("%b %d, %Y").to_string(),
    }
}

/// Accepts a list of strings or a comma-separated string.
pub fn parse_features(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| match entry {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|feature| !feature.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|feature| !feature.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentItem, ImageOrigin, PortfolioFields, ResolvedImage};
    use serde_json::json;

    fn enriched(item: ContentItem) -> EnrichedItem {
        let portfolio = Some(PortfolioFields::from_item(&item));
        EnrichedItem {
            item,
            image: ResolvedImage::gradient("g"),
            image_origin: ImageOrigin::NoReference,
            portfolio,
        }
    }

    fn sample() -> Vec<EnrichedItem> {
        vec![
            enriched(ContentItem::new(1, "One").with_slug("one")),
            enriched(
                ContentItem::new(2, "Two")
                    .with_slug("two")
                    .with_acf(json!({"project_category": "seo"})),
            ),
            enriched(ContentItem::new(3, "Three")),
            enriched(ContentItem::new(4, "Four").with_acf(json!({"project_category": "branding"}))),
            enriched(ContentItem::new(5, "Five").with_acf(json!({"project_category": "seo"}))),
        ]
    }

    #[test]
    fn test_find_by_slug_or_id() {
        let items = sample();
        assert_eq!(find_by_slug_or_id(&items, "two").map(|i| i.id()), Some(2));
        assert_eq!(find_by_slug_or_id(&items, "3").map(|i| i.id()), Some(3));
        assert!(find_by_slug_or_id(&items, "missing").is_none());
    }

    #[test]
    fn test_related_excludes_current() {
        let items = sample();
        let ids: Vec<u64> = related(&items, Some(2), 3).iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec![1, 3, 4]);

        let ids: Vec<u64> = related(&items, None, 2).iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_filter_by_category() {
        let items = sample();
        assert_eq!(filter_by_category(&items, ALL_CATEGORIES).len(), 5);

        let seo: Vec<u64> = filter_by_category(&items, "seo").iter().map(|i| i.id()).collect();
        assert_eq!(seo, vec![2, 5]);

        let web: Vec<u64> = filter_by_category(&items, DEFAULT_CATEGORY)
            .iter()
            .map(|i| i.id())
            .collect();
        assert_eq!(web, vec![1, 3]);
    }

    #[test]
    fn test_strip_html_and_excerpt() {
        assert_eq!(strip_html("<p>Hello <strong>there</strong></p>"), "Hello there");
        assert_eq!(strip_html("no tags"), "no tags");
        assert_eq!(excerpt("<p>Short text</p>", 120), "Short text");
        assert_eq!(excerpt("<p>abcdef ghijk</p>", 7), "abcdef...");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(
            format_date(Some("2024-03-05T10:00:00"), DateStyle::Long),
            "March 05, 2024"
        );
        assert_eq!(
            format_date(Some("2024-03-05T10:00:00+00:00"), DateStyle::Short),
            "Mar 05, 2024"
        );
        assert_eq!(format_date(Some("2024-12-31"), DateStyle::Short), "Dec 31, 2024");
        assert_eq!(format_date(Some("yesterday"), DateStyle::Long), "Recent");
        assert_eq!(format_date(None, DateStyle::Long), "Recent");
    }

    #[test]
    fn test_parse_features() {
        assert_eq!(
            parse_features(Some(&json!("Fast, Accessible , ,SEO"))),
            vec!["Fast", "Accessible", "SEO"]
        );
        assert_eq!(
            parse_features(Some(&json!(["One", " Two ", ""]))),
            vec!["One", "Two"]
        );
        assert!(parse_features(Some(&json!(42))).is_empty());
        assert!(parse_features(None).is_empty());
    }
}
