//! Mock Entur client for use without network access.
//!
//! Loads stop documents from JSON files and serves them as if they were
//! live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use super::client::StopFetcher;
use super::error::EnturError;
use super::types::{StopData, StopResponse};

/// Mock client serving pre-loaded stop documents.
///
/// Stops without a document answer like the real API does for an unknown
/// stop: with a null stop place.
#[derive(Debug, Clone, Default)]
pub struct MockEnturClient {
    stops: Arc<HashMap<u32, StopResponse>>,
    fetches: Arc<AtomicUsize>,
}

impl MockEnturClient {
    /// Load documents from a directory.
    ///
    /// Expects files named `{stop_id}.json` (e.g. `6013.json`).
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, EnturError> {
        let data_dir = data_dir.as_ref();
        let mut stops = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            EnturError::Mock(format!("failed to read mock data directory: {e}"))
        })?;

        for entry in entries {
            let entry = entry
                .map_err(|e| EnturError::Mock(format!("failed to read directory entry: {e}")))?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let stop_id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u32>().ok())
                .ok_or_else(|| EnturError::Mock(format!("invalid stop id in filename: {path:?}")))?;

            let json = std::fs::read_to_string(&path)
                .map_err(|e| EnturError::Mock(format!("failed to read {path:?}: {e}")))?;

            let doc: StopResponse = serde_json::from_str(&json)
                .map_err(|e| EnturError::Mock(format!("failed to parse {path:?}: {e}")))?;

            stops.insert(stop_id, doc);
        }

        debug!(stops = stops.len(), dir = ?data_dir, "Loaded mock stop data");
        Ok(Self::from_documents(stops))
    }

    /// Build a mock from documents already in memory.
    pub fn from_documents(stops: impl IntoIterator<Item = (u32, StopResponse)>) -> Self {
        Self {
            stops: Arc::new(stops.into_iter().collect()),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of stops with data.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether no stop has data.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// How many times [`StopFetcher::fetch_stop`] has been called.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl StopFetcher for MockEnturClient {
    async fn fetch_stop(&self, stop_id: u32) -> Result<StopResponse, EnturError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let doc = self.stops.get(&stop_id).cloned().unwrap_or(StopResponse {
            data: StopData { stop_place: None },
        });
        Ok(doc)
    }
}
