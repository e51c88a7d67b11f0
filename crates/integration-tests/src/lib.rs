//! Integration tests for Fairprice.
//!
//! # Running Tests
//!
//! ```bash
//! # Pure pricing contract tests (no services needed)
//! cargo test -p fairprice-integration-tests
//!
//! # Database-backed tests
//! TEST_DATABASE_URL=postgres://localhost/fp_test \
//!     cargo test -p fairprice-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `pricing_contract` - Proximity discount behavior through the public core API
//! - `storefront_api` - HTTP quotes against a migrated `PostgreSQL` database

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::expect_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use secrecy::SecretString;
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceExt;

use fairprice_core::{
    Competitor, Coordinate, Price, Product, ProximityRule, ZipCode, ZipCodeRecord,
};
use fairprice_storefront::config::StorefrontConfig;
use fairprice_storefront::db::{self, CompetitorRepository, ProductRepository, ZipCodeRepository};
use fairprice_storefront::routes;
use fairprice_storefront::state::AppState;

/// Database tests share one schema, so they run one at a time.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

/// Database URL for tests.
fn test_database_url() -> String {
    std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("STOREFRONT_DATABASE_URL"))
        .unwrap_or_else(|_| "postgres://localhost/fp_test".to_string())
}

/// A migrated, emptied database and the storefront app on top of it.
pub struct TestContext {
    pub pool: PgPool,
    _guard: MutexGuard<'static, ()>,
}

impl TestContext {
    /// Connect, migrate, and clear all storefront tables.
    pub async fn new() -> Self {
        let guard = DB_LOCK.lock().await;

        let url = SecretString::from(test_database_url());
        let pool = db::create_pool(&url)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("../storefront/migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        sqlx::query(
            "TRUNCATE storefront.product, storefront.competitor, storefront.zip_code RESTART IDENTITY",
        )
        .execute(&pool)
        .await
        .expect("Failed to clear tables");

        Self {
            pool,
            _guard: guard,
        }
    }

    /// The storefront router with the given pricing rule.
    pub fn app(&self, rule: ProximityRule) -> Router {
        let mut config = StorefrontConfig::from_lookup(|key| {
            (key == "STOREFRONT_DATABASE_URL").then(test_database_url)
        })
        .expect("Failed to build test configuration");
        config.pricing = rule;

        routes::app(AppState::new(config, self.pool.clone()))
    }

    pub async fn zip_code(&self, zip: &str, latitude: f64, longitude: f64) -> ZipCodeRecord {
        ZipCodeRepository::new(&self.pool)
            .create(
                &ZipCode::parse(zip).unwrap(),
                "Test City",
                "CA",
                Coordinate::new(latitude, longitude).unwrap(),
            )
            .await
            .expect("Failed to insert zip code")
    }

    pub async fn competitor(&self, name: &str, zip: &str) -> Competitor {
        CompetitorRepository::new(&self.pool)
            .create(name, "1 Main St", &ZipCode::parse(zip).unwrap())
            .await
            .expect("Failed to insert competitor")
    }

    pub async fn product(&self, name: &str, base_price: &str) -> Product {
        let price = Price::usd(base_price.parse().unwrap()).unwrap();
        ProductRepository::new(&self.pool)
            .create(name, price)
            .await
            .expect("Failed to insert product")
    }
}

/// Send a GET request through `app` and return the status and body.
///
/// The body is parsed as JSON when possible, otherwise returned as a string.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    (status, body)
}
