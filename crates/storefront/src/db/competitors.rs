//! Competitor repository for database operations.

use sqlx::{PgConnection, PgPool};

use fairprice_core::{Competitor, CompetitorId, ZipCode};

use super::RepositoryError;

/// Row shape of `storefront.competitor`.
///
/// `zip` is read as a plain string: rows typed in by hand may hold values
/// that do not parse as a [`ZipCode`].
#[derive(Debug, sqlx::FromRow)]
struct CompetitorRow {
    id: CompetitorId,
    name: String,
    address: String,
    zip: String,
}

/// Repository for competitor database operations.
pub struct CompetitorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitorRepository<'a> {
    /// Create a new competitor repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load every competitor in insertion order.
    ///
    /// Competitors whose stored zip is malformed can never be geocoded, so
    /// they are logged and left out rather than failing the whole scan.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Competitor>, RepositoryError> {
        let rows = sqlx::query_as::<_, CompetitorRow>(
            r"
            SELECT id, name, address, zip
            FROM storefront.competitor
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match ZipCode::parse(&row.zip) {
                Ok(zip) => Some(Competitor {
                    id: row.id,
                    name: row.name,
                    address: row.address,
                    zip,
                }),
                Err(e) => {
                    tracing::warn!(
                        competitor_id = %row.id,
                        zip = %row.zip,
                        error = %e,
                        "skipping competitor with malformed zip"
                    );
                    None
                }
            })
            .collect())
    }

    /// Create a new competitor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        address: &str,
        zip: &ZipCode,
    ) -> Result<Competitor, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        Self::insert(&mut conn, name, address, zip).await
    }

    /// Insert a competitor on an existing connection or transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        conn: &mut PgConnection,
        name: &str,
        address: &str,
        zip: &ZipCode,
    ) -> Result<Competitor, RepositoryError> {
        let id = sqlx::query_scalar::<_, CompetitorId>(
            r"
            INSERT INTO storefront.competitor (name, address, zip)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(name)
        .bind(address)
        .bind(zip)
        .fetch_one(conn)
        .await?;

        Ok(Competitor {
            id,
            name: name.to_owned(),
            address: address.to_owned(),
            zip: zip.clone(),
        })
    }
}
