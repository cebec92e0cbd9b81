#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Feature collection fetch for dataset rendering.
//!
//! The layer assembler obtains a dataset's `GeoJSON` features through
//! the [`FeatureSource`] trait: [`HttpFeatureSource`] talks to the
//! dataset API, [`StaticFeatureSource`] serves collections already in
//! memory (tests, local files). A bearer token is attached when the
//! session's [`TokenProvider`] holds one.
//!
//! There is deliberately no retry here: a failed fetch yields no
//! clustered layer for that render pass, and the next pass retries
//! naturally because failures are never cached.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use geojson::FeatureCollection;
use uuid::Uuid;

/// Errors that can occur while fetching a dataset's features.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// No collection is registered for the dataset.
    #[error("No feature collection for dataset {dataset_id}")]
    NotFound {
        /// The dataset that was requested.
        dataset_id: Uuid,
    },
}

/// Supplies the session's bearer token, if any.
///
/// Mirrors the browser client's persisted session storage: read at
/// request time, no refresh logic (token refresh is the API client's
/// concern, not this engine's).
pub trait TokenProvider: Send + Sync {
    /// Returns the current bearer token, if one is stored.
    fn token(&self) -> Option<String>;
}

/// In-memory [`TokenProvider`].
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn set_token(&self, token: &str) {
        *self.token.write().expect("token store lock poisoned") = Some(token.to_string());
    }

    /// Clears the stored token.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn clear(&self) {
        *self.token.write().expect("token store lock poisoned") = None;
    }
}

impl TokenProvider for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.read().expect("token store lock poisoned").clone()
    }
}

/// Source of `GeoJSON` feature collections, keyed by dataset id.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    /// Fetches the dataset's full feature collection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the fetch fails.
    async fn fetch_features(&self, dataset_id: Uuid) -> Result<FeatureCollection, ClientError>;
}

/// Fetches feature collections from the dataset API.
pub struct HttpFeatureSource {
    client: reqwest::Client,
    base_url: String,
    tokens: Option<Arc<dyn TokenProvider>>,
}

impl HttpFeatureSource {
    /// Creates a source for an unauthenticated API.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens: None,
        }
    }

    /// Attaches a token provider; its token (when present) is sent as a
    /// bearer credential on every fetch.
    #[must_use]
    pub fn with_tokens(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    fn geojson_url(&self, dataset_id: Uuid) -> String {
        format!("{}/api/v1/datasets/{dataset_id}/geojson", self.base_url)
    }
}

#[async_trait]
impl FeatureSource for HttpFeatureSource {
    async fn fetch_features(&self, dataset_id: Uuid) -> Result<FeatureCollection, ClientError> {
        let url = self.geojson_url(dataset_id);
        let mut request = self.client.get(&url);
        if let Some(token) = self.tokens.as_ref().and_then(|t| t.token()) {
            request = request.bearer_auth(token);
        }

        log::debug!("Fetching features for dataset {dataset_id} from {url}");
        let response = request.send().await?.error_for_status()?;
        let collection = response.json::<FeatureCollection>().await?;
        log::debug!(
            "Fetched {} features for dataset {dataset_id}",
            collection.features.len()
        );
        Ok(collection)
    }
}

/// Serves collections already held in memory.
#[derive(Default)]
pub struct StaticFeatureSource {
    collections: BTreeMap<Uuid, FeatureCollection>,
}

impl StaticFeatureSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a collection for a dataset id.
    #[must_use]
    pub fn with_collection(mut self, dataset_id: Uuid, collection: FeatureCollection) -> Self {
        self.collections.insert(dataset_id, collection);
        self
    }
}

#[async_trait]
impl FeatureSource for StaticFeatureSource {
    async fn fetch_features(&self, dataset_id: Uuid) -> Result<FeatureCollection, ClientError> {
        self.collections
            .get(&dataset_id)
            .cloned()
            .ok_or(ClientError::NotFound { dataset_id })
    }
}
