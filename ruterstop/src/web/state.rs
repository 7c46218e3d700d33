//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedEnturClient;
use crate::entur::StopFetcher;
use crate::pipeline::DepartureOptions;

/// Shared application state.
pub struct AppState<F> {
    /// Cached Entur client
    pub entur: Arc<CachedEnturClient<F>>,

    /// Options used when a request does not override them
    pub defaults: Arc<DepartureOptions>,
}

impl<F: StopFetcher> AppState<F> {
    /// Create a new app state.
    pub fn new(entur: CachedEnturClient<F>, defaults: DepartureOptions) -> Self {
        Self {
            entur: Arc::new(entur),
            defaults: Arc::new(defaults),
        }
    }
}

// Manual impl: the fetcher itself need not be `Clone`.
impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            entur: Arc::clone(&self.entur),
            defaults: Arc::clone(&self.defaults),
        }
    }
}
