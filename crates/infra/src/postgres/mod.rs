//! Postgres-backed store adapters.
//!
//! ## Error Mapping
//!
//! | sqlx error | Postgres code | `StoreError` |
//! |------------|---------------|--------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (foreign key violation) | `23503` | `Conflict` |
//! | Database (other) | any other | `Backend` |
//! | PoolClosed / other | n/a | `Backend` |

mod orders;
mod profiles;
mod schema;
mod tags;

pub use orders::PostgresOrderStore;
pub use profiles::PostgresUserProfileStore;
pub use schema::ensure_schema;
pub use tags::PostgresOrderTagStore;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use orderdesk_core::StoreError;

use crate::config::{AppConfig, ConfigError};

/// Open a pool for `config.database_url` and make sure the tables exist.
pub async fn connect(config: &AppConfig) -> Result<PgPool, StoreError> {
    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| StoreError::backend(ConfigError::Missing("DATABASE_URL").to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))?;
    info!(max_connections = config.max_connections, "connected to postgres");

    ensure_schema(&pool).await?;
    Ok(pool)
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {operation}: {}", db_err.message());
            match db_err.code().as_deref() {
                Some("23505") | Some("23503") => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::backend(format!("connection pool closed in {operation}"))
        }
        other => StoreError::backend(format!("sqlx error in {operation}: {other}")),
    }
}
