use sqlx::PgPool;
use tracing::instrument;

use orderdesk_core::StoreResult;

use super::map_sqlx_error;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS order_tags (
        id          BIGSERIAL PRIMARY KEY,
        name        VARCHAR(100) NOT NULL,
        is_active   BOOLEAN NOT NULL DEFAULT TRUE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id            BIGSERIAL PRIMARY KEY,
        start_date    DATE NOT NULL,
        embargo_date  DATE NOT NULL,
        is_active     BOOLEAN NOT NULL DEFAULT TRUE,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_tag_links (
        order_id  BIGINT NOT NULL REFERENCES orders (id),
        tag_id    BIGINT NOT NULL REFERENCES order_tags (id),
        PRIMARY KEY (order_id, tag_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_profiles (
        id            BIGSERIAL PRIMARY KEY,
        email         VARCHAR(254) NOT NULL UNIQUE,
        password      VARCHAR(255) NOT NULL,
        first_name    VARCHAR(150) NOT NULL DEFAULT '',
        last_name     VARCHAR(150) NOT NULL DEFAULT '',
        date_joined   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        last_login    TIMESTAMPTZ NULL,
        is_staff      BOOLEAN NOT NULL DEFAULT FALSE,
        is_superuser  BOOLEAN NOT NULL DEFAULT FALSE,
        is_admin      BOOLEAN NOT NULL DEFAULT FALSE,
        is_active     BOOLEAN NOT NULL DEFAULT TRUE,
        avatar        VARCHAR(100) NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_orders_dates ON orders (start_date, embargo_date)",
];

/// Create missing tables. Safe to run on every start.
#[instrument(skip(pool), err)]
pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }
    Ok(())
}
