//! Application state shared across handlers.

use std::sync::Arc;

use fairprice_core::ProximityRule;
use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::services::QuoteService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The configured proximity discount rule.
    #[must_use]
    pub fn pricing_rule(&self) -> ProximityRule {
        self.inner.config.pricing
    }

    /// A quote service over the shared pool.
    #[must_use]
    pub fn quotes(&self) -> QuoteService<'_> {
        QuoteService::new(self.pool(), self.pricing_rule())
    }
}
