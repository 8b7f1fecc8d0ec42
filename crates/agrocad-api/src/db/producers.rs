//! Producer persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `producers` table.
//! Documents are stored as canonical digits, matching the in-memory form,
//! so the UNIQUE constraint and the handler-level uniqueness check agree.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use agrocad_core::DocumentId;
use agrocad_model::Address;

use crate::state::ProducerRecord;

/// Serialize the address for the JSONB column.
fn serialize_address(address: &Address) -> Result<serde_json::Value, sqlx::Error> {
    serde_json::to_value(address).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize producer address");
        sqlx::Error::Encode(Box::new(e))
    })
}

/// Insert a new producer record.
pub async fn insert(pool: &PgPool, record: &ProducerRecord) -> Result<(), sqlx::Error> {
    let address = serialize_address(&record.address)?;

    sqlx::query(
        "INSERT INTO producers (id, document, name, email, phone, address, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(record.id)
    .bind(record.document.as_str())
    .bind(&record.name)
    .bind(&record.email)
    .bind(&record.phone)
    .bind(&address)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Replace a producer's fields.
pub async fn update(pool: &PgPool, record: &ProducerRecord) -> Result<bool, sqlx::Error> {
    let address = serialize_address(&record.address)?;

    let result = sqlx::query(
        "UPDATE producers
         SET document = $1, name = $2, email = $3, phone = $4, address = $5, updated_at = $6
         WHERE id = $7",
    )
    .bind(record.document.as_str())
    .bind(&record.name)
    .bind(&record.email)
    .bind(&record.phone)
    .bind(&address)
    .bind(record.updated_at)
    .bind(record.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a producer. The FK cascade removes the producer's farms.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM producers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all producers from the database into the in-memory store on startup.
///
/// Rows that no longer pass validation (a corrupted document, a malformed
/// address) are logged and skipped rather than aborting the boot.
pub async fn load_all(pool: &PgPool) -> Result<Vec<ProducerRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ProducerRow>(
        "SELECT id, document, name, email, phone, address, created_at, updated_at
         FROM producers ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(ProducerRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ProducerRow {
    id: Uuid,
    document: String,
    name: String,
    email: String,
    phone: String,
    address: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProducerRow {
    fn into_record(self) -> Option<ProducerRecord> {
        let document = match DocumentId::new(&self.document) {
            Ok(document) => document,
            Err(e) => {
                tracing::error!(
                    id = %self.id,
                    error = %e,
                    "invalid document in database row — skipping producer; \
                     investigate: the write path should never store this"
                );
                return None;
            }
        };

        let address: Address = match serde_json::from_value(self.address) {
            Ok(address) => address,
            Err(e) => {
                tracing::error!(
                    id = %self.id,
                    error = %e,
                    "failed to deserialize producer address — skipping producer"
                );
                return None;
            }
        };

        Some(ProducerRecord {
            id: self.id,
            document,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
