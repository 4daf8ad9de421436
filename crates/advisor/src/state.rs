//! Application state shared across handlers.

use std::sync::Arc;

use routine_advisor_core::Catalog;
use sqlx::SqlitePool;

use crate::config::AdvisorConfig;
use crate::proxy::{ProxyClient, ProxyError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and owns everything a request
/// needs besides the visitor's session: configuration, the catalog loaded at
/// startup, and the proxy client. The pool backs the session store and is
/// absent when sessions are held in memory.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdvisorConfig,
    catalog: Catalog,
    proxy: ProxyClient,
    pool: Option<SqlitePool>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy HTTP client cannot be built.
    pub fn new(
        config: AdvisorConfig,
        catalog: Catalog,
        pool: Option<SqlitePool>,
    ) -> Result<Self, ProxyError> {
        let proxy = ProxyClient::new(&config.proxy)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                proxy,
                pool,
            }),
        })
    }

    /// Get a reference to the advisor configuration.
    #[must_use]
    pub fn config(&self) -> &AdvisorConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the proxy client.
    #[must_use]
    pub fn proxy(&self) -> &ProxyClient {
        &self.inner.proxy
    }

    /// Get the session database pool, if sessions are persisted.
    #[must_use]
    pub fn pool(&self) -> Option<&SqlitePool> {
        self.inner.pool.as_ref()
    }
}
