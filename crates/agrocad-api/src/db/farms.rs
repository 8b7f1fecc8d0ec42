//! Farm persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `farms` table. Area
//! invariants are enforced at the application layer before a record ever
//! reaches this module, not in SQL.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use agrocad_model::{Crop, Uf};

use crate::state::FarmRecord;

/// Serialize the crop list for the JSONB column.
fn serialize_crops(crops: &[Crop]) -> Result<serde_json::Value, sqlx::Error> {
    serde_json::to_value(crops).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize farm crops");
        sqlx::Error::Encode(Box::new(e))
    })
}

/// Insert a new farm record.
pub async fn insert(pool: &PgPool, record: &FarmRecord) -> Result<(), sqlx::Error> {
    let crops = serialize_crops(&record.crops)?;

    sqlx::query(
        "INSERT INTO farms (id, producer_id, name, city, state, total_area,
                            agricultural_area, vegetation_area, crops, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(record.id)
    .bind(record.producer_id)
    .bind(&record.name)
    .bind(&record.city)
    .bind(record.state.as_str())
    .bind(record.total_area)
    .bind(record.agricultural_area)
    .bind(record.vegetation_area)
    .bind(&crops)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Replace a farm's fields, including the crop list.
pub async fn update(pool: &PgPool, record: &FarmRecord) -> Result<bool, sqlx::Error> {
    let crops = serialize_crops(&record.crops)?;

    let result = sqlx::query(
        "UPDATE farms
         SET producer_id = $1, name = $2, city = $3, state = $4, total_area = $5,
             agricultural_area = $6, vegetation_area = $7, crops = $8, updated_at = $9
         WHERE id = $10",
    )
    .bind(record.producer_id)
    .bind(&record.name)
    .bind(&record.city)
    .bind(record.state.as_str())
    .bind(record.total_area)
    .bind(record.agricultural_area)
    .bind(record.vegetation_area)
    .bind(&crops)
    .bind(record.updated_at)
    .bind(record.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a farm by ID.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM farms WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all farms from the database into the in-memory store on startup.
///
/// Rows with an unknown state code or unreadable crop list are logged and
/// skipped rather than aborting the boot.
pub async fn load_all(pool: &PgPool) -> Result<Vec<FarmRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FarmRow>(
        "SELECT id, producer_id, name, city, state, total_area,
                agricultural_area, vegetation_area, crops, created_at, updated_at
         FROM farms ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(FarmRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct FarmRow {
    id: Uuid,
    producer_id: Uuid,
    name: String,
    city: String,
    state: String,
    total_area: f64,
    agricultural_area: f64,
    vegetation_area: f64,
    crops: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FarmRow {
    fn into_record(self) -> Option<FarmRecord> {
        let state: Uf = match self.state.parse() {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(
                    id = %self.id,
                    state = %self.state,
                    error = %e,
                    "unknown state code in database row — skipping farm"
                );
                return None;
            }
        };

        let crops: Vec<Crop> = match serde_json::from_value(self.crops) {
            Ok(crops) => crops,
            Err(e) => {
                tracing::error!(
                    id = %self.id,
                    error = %e,
                    "failed to deserialize farm crops — skipping farm"
                );
                return None;
            }
        };

        Some(FarmRecord {
            id: self.id,
            producer_id: self.producer_id,
            name: self.name,
            city: self.city,
            state,
            total_area: self.total_area,
            agricultural_area: self.agricultural_area,
            vegetation_area: self.vegetation_area,
            crops,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
