//! Observable list loading for screens that fetch a list on open.
//!
//! A [`ListLoader`] publishes [`ListState`] through a `tokio::sync::watch`
//! channel. Each call to [`ListLoader::load`] starts a new generation; only the
//! most recently started load may publish its result, so a slow response can
//! never overwrite a newer one.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::ApiError;

/// What a list screen should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState<T> {
    Loading,
    /// The request succeeded with no items.
    Empty,
    Loaded(Vec<T>),
    /// User-facing error message.
    Failed(String),
}

impl<T> ListState<T> {
    fn from_result(result: Result<Vec<T>, ApiError>) -> Self {
        match result {
            Ok(items) if items.is_empty() => Self::Empty,
            Ok(items) => Self::Loaded(items),
            Err(e) => {
                warn!(error = %e, "List load failed");
                Self::Failed(e.user_message().to_owned())
            }
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Items, if loaded.
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Loaded(items) => items,
            _ => &[],
        }
    }
}

/// Publishes the state of a list that can be (re)loaded.
#[derive(Debug)]
pub struct ListLoader<T> {
    state: watch::Sender<ListState<T>>,
    generation: AtomicU64,
}

impl<T: Clone> ListLoader<T> {
    /// A loader in the `Loading` state.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(ListState::Loading);
        Self {
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Receive every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> ListState<T> {
        self.state.borrow().clone()
    }

    /// Run `fetch` and publish its outcome.
    ///
    /// Returns the outcome even when a newer load has started in the meantime
    /// and the result was therefore not published.
    pub async fn load<F>(&self, fetch: F) -> ListState<T>
    where
        F: Future<Output = Result<Vec<T>, ApiError>>,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(ListState::Loading);

        let outcome = ListState::from_result(fetch.await);

        let published = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = outcome.clone();
            true
        });
        if !published {
            debug!(generation, "Dropped stale list result");
        }

        outcome
    }
}

impl<T: Clone> Default for ListLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}
