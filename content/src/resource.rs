//! The `{data, loading, error}` triple a page renders from.
//!
//! A [`ContentResource`] owns one resolver and re-runs it whenever its URL
//! changes. Every run gets a generation number; a completion is published only
//! if its generation is still current, so a slow response for an old URL can
//! never overwrite the state of a newer one. State is distributed through a
//! `tokio::sync::watch` channel.

use crate::resolver::Resolver;
use crate::types::{Payload, RequestOptions};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState {
    pub data: Option<Payload>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for ResourceState {
    fn default() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }
}

impl ResourceState {
    pub fn phase(&self) -> Phase {
        match (self.loading, &self.error) {
            (true, _) => Phase::Loading,
            (false, Some(_)) => Phase::Failed,
            (false, None) => Phase::Ready,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

pub struct ContentResource {
    resolver: Arc<Resolver>,
    options: RequestOptions,
    url: Option<String>,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<ResourceState>>,
    task: Option<JoinHandle<()>>,
}

impl ContentResource {
    pub fn new(resolver: Resolver) -> Self {
        Self::with_options(resolver, RequestOptions::default())
    }

    pub fn with_options(resolver: Resolver, options: RequestOptions) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            resolver: Arc::new(resolver),
            options,
            url: None,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
            task: None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> ResourceState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState> {
        self.state.subscribe()
    }

    /// Points the resource at `url`. Setting the URL it already has is a
    /// no-op; an empty URL cancels any in-flight cycle and returns to the
    /// initial state without issuing a request.
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        if self.url.as_deref() == Some(url.as_str()) {
            return;
        }

        if url.is_empty() {
            self.invalidate();
            self.url = None;
            self.state.send_replace(ResourceState::default());
            return;
        }

        self.url = Some(url);
        self.start();
    }

    /// Re-runs the current URL even though it has not changed.
    pub fn refresh(&mut self) {
        if self.url.is_some() {
            self.start();
        }
    }

    /// Waits until the current generation has published a result and returns
    /// that state. Returns immediately when no URL is set.
    pub async fn settled(&self) -> ResourceState {
        if self.url.is_none() {
            return self.state();
        }

        let mut receiver = self.state.subscribe();
        let settled = match receiver.wait_for(|state| !state.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }

    fn invalidate(&mut self) -> u64 {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn start(&mut self) {
        let Some(url) = self.url.clone() else {
            return;
        };
        let generation = self.invalidate();

        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        let resolver = Arc::clone(&self.resolver);
        let options = self.options.clone();
        let current = Arc::clone(&self.generation);
        let state = Arc::clone(&self.state);

        debug!("Starting fetch cycle {} for {}", generation, url);
        self.task = Some(tokio::spawn(async move {
            let result = resolver.resolve(&url, &options).await;

            state.send_if_modified(|state| {
                if current.load(Ordering::SeqCst) != generation {
                    debug!("Discarding stale result of cycle {} for {}", generation, url);
                    return false;
                }
                match result {
                    Ok(payload) => {
                        state.data = Some(payload);
                        state.error = None;
                    }
                    Err(e) => state.error = Some(e.to_string()),
                }
                state.loading = false;
                true
            });
        }));
    }
}

impl Drop for ContentResource {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
