//! Visibility into recoverable failures during resolution.
//!
//! The resolver never logs on its own behalf for outcomes a caller may want to
//! route elsewhere; it reports a [`ResolutionEvent`] to the configured
//! [`ResolutionObserver`]. [`TracingObserver`] is the default and turns events
//! into `tracing` records, [`NoopObserver`] drops them.

use crate::types::ImageOrigin;
use std::sync::Mutex;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionEvent {
    /// The primary request failed and the request without `_embed` follows.
    EmbedFallback { url: String, reason: String },
    CollectionFailed { url: String, error: String },
    CollectionResolved { url: String, items: usize },
    /// An array element that is not a usable item was left out of the result.
    ItemSkipped {
        url: String,
        index: usize,
        reason: String,
    },
    MediaLookupFailed {
        item_id: u64,
        media_id: u64,
        reason: String,
    },
    PlaceholderAssigned { item_id: u64, origin: ImageOrigin },
}

pub trait ResolutionObserver: Send + Sync {
    fn observe(&self, event: &ResolutionEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ResolutionObserver for TracingObserver {
    fn observe(&self, event: &ResolutionEvent) {
        match event {
            ResolutionEvent::EmbedFallback { url, reason } => {
                debug!("Embedded request for {} failed ({}), retrying without _embed", url, reason);
            }
            ResolutionEvent::CollectionFailed { url, error: message } => {
                error!("Content API error for {}: {}", url, message);
            }
            ResolutionEvent::CollectionResolved { url, items } => {
                debug!("Resolved {} items from {}", items, url);
            }
            ResolutionEvent::ItemSkipped { url, index, reason } => {
                warn!("Skipping element {} of {}: {}", index, url, reason);
            }
            ResolutionEvent::MediaLookupFailed {
                item_id,
                media_id,
                reason,
            } => {
                warn!(
                    "Failed to fetch media {} for item {}: {}",
                    media_id, item_id, reason
                );
            }
            ResolutionEvent::PlaceholderAssigned { item_id, origin } => {
                debug!("Item {} uses placeholder gradient ({:?})", item_id, origin);
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ResolutionObserver for NoopObserver {
    fn observe(&self, _event: &ResolutionEvent) {}
}

/// Keeps every event in memory; useful for callers that report failures in
/// bulk after a fetch cycle.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ResolutionEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ResolutionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn media_failures(&self) -> Vec<(u64, u64)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ResolutionEvent::MediaLookupFailed {
                    item_id, media_id, ..
                } => Some((item_id, media_id)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl ResolutionObserver for RecordingObserver {
    fn observe(&self, event: &ResolutionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
