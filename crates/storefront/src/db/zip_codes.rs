//! Zip code geocoding table.
//!
//! `storefront.zip_code` is not unique on `zip`. Lookups return only the
//! lowest-`id` row per postal code, which is the authoritative record.

use sqlx::{PgConnection, PgPool};

use fairprice_core::{Coordinate, ZipCode, ZipCodeId, ZipCodeRecord};

use super::RepositoryError;

/// Row shape of `storefront.zip_code`.
#[derive(Debug, sqlx::FromRow)]
struct ZipCodeRow {
    id: ZipCodeId,
    zip: String,
    city: String,
    state: String,
    latitude: f64,
    longitude: f64,
}

impl TryFrom<ZipCodeRow> for ZipCodeRecord {
    type Error = String;

    fn try_from(row: ZipCodeRow) -> Result<Self, Self::Error> {
        let zip = ZipCode::parse(&row.zip).map_err(|e| e.to_string())?;
        let coordinate = Coordinate::new(row.latitude, row.longitude).map_err(|e| e.to_string())?;
        Ok(Self {
            id: row.id,
            zip,
            city: row.city,
            state: row.state,
            coordinate,
        })
    }
}

/// Repository for the zip code geocoding table.
pub struct ZipCodeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ZipCodeRepository<'a> {
    /// Create a new zip code repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the authoritative (lowest `id`) row for each of `zips`.
    ///
    /// Duplicates are dropped before validation. An authoritative row with an
    /// unparseable zip or out-of-range coordinates is logged and skipped, so
    /// its zip looks unknown to the pricing rule; later duplicates never
    /// stand in for it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_many(&self, zips: &[ZipCode]) -> Result<Vec<ZipCodeRecord>, RepositoryError> {
        if zips.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = zips.iter().map(|z| z.as_str().to_owned()).collect();
        let rows = sqlx::query_as::<_, ZipCodeRow>(
            r"
            SELECT DISTINCT ON (zip) id, zip, city, state, latitude, longitude
            FROM storefront.zip_code
            WHERE zip = ANY($1)
            ORDER BY zip, id
            ",
        )
        .bind(keys)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                ZipCodeRecord::try_from(row)
                    .inspect_err(|e| {
                        tracing::warn!(zip_code_id = %id, error = %e, "skipping invalid zip code row");
                    })
                    .ok()
            })
            .collect())
    }

    /// Insert a geocoding row.
    ///
    /// Duplicates are allowed; the row with the lowest `id` stays authoritative.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        zip: &ZipCode,
        city: &str,
        state: &str,
        coordinate: Coordinate,
    ) -> Result<ZipCodeRecord, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        Self::insert(&mut conn, zip, city, state, coordinate).await
    }

    /// Insert a geocoding row on an existing connection or transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        conn: &mut PgConnection,
        zip: &ZipCode,
        city: &str,
        state: &str,
        coordinate: Coordinate,
    ) -> Result<ZipCodeRecord, RepositoryError> {
        let id = sqlx::query_scalar::<_, ZipCodeId>(
            r"
            INSERT INTO storefront.zip_code (zip, city, state, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(zip)
        .bind(city)
        .bind(state)
        .bind(coordinate.latitude())
        .bind(coordinate.longitude())
        .fetch_one(conn)
        .await?;

        Ok(ZipCodeRecord {
            id,
            zip: zip.clone(),
            city: city.to_owned(),
            state: state.to_owned(),
            coordinate,
        })
    }
}
