//! Application state shared across handlers

use std::sync::Arc;

use ormctl_core::FeedSettings;

use crate::db::{Database, SessionMode};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    items: Arc<dyn Database>,
    relations: Arc<dyn Database>,
    feed: FeedSettings,
}

impl AppState {
    pub fn new(items: Arc<dyn Database>, relations: Arc<dyn Database>, feed: FeedSettings) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                items,
                relations,
                feed,
            }),
        }
    }

    /// Database holding `items`
    pub fn items(&self) -> &dyn Database {
        self.inner.items.as_ref()
    }

    /// Database holding requests, trainings and their links
    pub fn relations(&self) -> &dyn Database {
        self.inner.relations.as_ref()
    }

    pub fn feed(&self) -> FeedSettings {
        self.inner.feed
    }

    pub fn mode(&self) -> SessionMode {
        self.inner.items.mode()
    }
}
