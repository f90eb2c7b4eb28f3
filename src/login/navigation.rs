//! Navigation seam. The controller only pushes a path or asks for a refresh;
//! what that means (router, redirect, terminal output) belongs to the host.

use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

pub trait Navigator: Send + Sync {
    /// Moves to `path`.
    fn push(&self, path: &str);

    /// Re-synchronizes the current view with server state.
    fn refresh(&self);
}

impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    fn push(&self, path: &str) {
        (**self).push(path);
    }

    fn refresh(&self) {
        (**self).refresh();
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationEvent {
    Push(String),
    Refresh,
}

/// Navigator that records every request in order. Clones share the history.
#[derive(Clone, Debug, Default)]
pub struct HistoryNavigator {
    events: Arc<Mutex<Vec<NavigationEvent>>>,
}

impl HistoryNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Path of the most recent push, if any.
    #[must_use]
    pub fn current_path(&self) -> Option<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find_map(|event| match event {
                NavigationEvent::Push(path) => Some(path.clone()),
                NavigationEvent::Refresh => None,
            })
    }

    fn record(&self, event: NavigationEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl Navigator for HistoryNavigator {
    fn push(&self, path: &str) {
        info!(path, "navigating");
        self.record(NavigationEvent::Push(path.to_string()));
    }

    fn refresh(&self) {
        info!("refreshing view");
        self.record(NavigationEvent::Refresh);
    }
}
