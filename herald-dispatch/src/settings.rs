//! Settings provider seam and the in-memory store behind the API surface.

use std::collections::BTreeMap;

use async_trait::async_trait;
use herald_common::{Credentials, FromAddress, GatewaySettings};
use tokio::sync::RwLock;

use crate::error::SettingsError;

/// Source of the per-dispatch gateway settings bundle.
///
/// Consulted exactly once per top-level dispatch; the bundle is then shared
/// read-only by every batch and retry round of that dispatch. An `Err` here
/// aborts the dispatch before any batch runs.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    async fn gateway_settings(&self) -> Result<GatewaySettings, SettingsError>;
}

#[derive(Debug, Default)]
struct Inner {
    credentials: Option<Credentials>,
    from: Option<FromAddress>,
    headers: BTreeMap<String, String>,
}

/// In-memory settings store.
///
/// Settings live for the lifetime of the process, which matches the engine's
/// own durability story. The [`SettingsProvider`] seam keeps an external
/// backend possible without touching the dispatch path.
#[derive(Debug, Default)]
pub struct SettingsStore {
    inner: RwLock<Inner>,
}

impl SettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn save_credentials(&self, credentials: Credentials) {
        self.inner.write().await.credentials = Some(credentials);
    }

    pub async fn save_from(&self, from: FromAddress) {
        self.inner.write().await.from = Some(from);
    }

    /// Replace the whole custom header set.
    pub async fn save_headers(&self, headers: BTreeMap<String, String>) {
        self.inner.write().await.headers = headers;
    }

    pub async fn headers(&self) -> BTreeMap<String, String> {
        self.inner.read().await.headers.clone()
    }

    pub async fn from_address(&self) -> Option<FromAddress> {
        self.inner.read().await.from.clone()
    }
}

#[async_trait]
impl SettingsProvider for SettingsStore {
    async fn gateway_settings(&self) -> Result<GatewaySettings, SettingsError> {
        let inner = self.inner.read().await;

        let credentials = inner
            .credentials
            .clone()
            .ok_or(SettingsError::MissingCredentials)?;
        let from = inner.from.clone().ok_or(SettingsError::MissingFrom)?;

        Ok(GatewaySettings {
            credentials,
            headers: inner.headers.clone(),
            from,
        })
    }
}
