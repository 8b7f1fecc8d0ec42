//! # Database Layer
//!
//! Optional PostgreSQL persistence behind the in-memory stores. The stores
//! are the runtime source of truth; every mutation is written through here,
//! and the rows are loaded back once at startup.
//!
//! `DATABASE_URL` controls everything: unset means in-memory-only mode and
//! every function in the submodules goes uncalled.

pub mod farms;
pub mod producers;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Create the connection pool from `DATABASE_URL` and ensure the schema
/// exists.
///
/// Returns `Ok(None)` when `DATABASE_URL` is unset. A set-but-unreachable
/// database is an error: silently degrading to in-memory mode would lose
/// writes the operator expected to be durable.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            tracing::info!("DATABASE_URL not set; running in-memory only");
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    ensure_schema(&pool).await?;
    tracing::info!("database connected and schema ensured");

    Ok(Some(pool))
}

/// Create the tables if they do not exist.
///
/// The `document` column carries the canonical digits-only CPF/CNPJ; the
/// UNIQUE constraint is the durable backstop for the uniqueness check the
/// handlers perform in memory. Farms cascade with their producer.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS producers (
            id UUID PRIMARY KEY,
            document TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            address JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS farms (
            id UUID PRIMARY KEY,
            producer_id UUID NOT NULL REFERENCES producers(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            city TEXT NOT NULL,
            state TEXT NOT NULL,
            total_area DOUBLE PRECISION NOT NULL,
            agricultural_area DOUBLE PRECISION NOT NULL,
            vegetation_area DOUBLE PRECISION NOT NULL,
            crops JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
