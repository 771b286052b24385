use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use orderdesk_core::{OrderTagId, StoreResult};
use orderdesk_orders::{NewOrderTag, OrderTag, OrderTagStore};

use super::map_sqlx_error;

#[derive(Debug, Clone)]
pub struct PostgresOrderTagStore {
    pool: Arc<PgPool>,
}

impl PostgresOrderTagStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl OrderTagStore for PostgresOrderTagStore {
    #[instrument(skip(self), err)]
    async fn list(&self) -> StoreResult<Vec<OrderTag>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, is_active, created_at, updated_at
            FROM order_tags
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_tags", e))?;

        rows.iter()
            .map(|row| TagRow::from_row(row).map(OrderTag::from))
            .collect::<Result<_, _>>()
            .map_err(|e| map_sqlx_error("list_tags", e))
    }

    #[instrument(skip(self, new), fields(name = %new.name), err)]
    async fn insert(&self, new: NewOrderTag) -> StoreResult<OrderTag> {
        let row = sqlx::query(
            r#"
            INSERT INTO order_tags (name, is_active)
            VALUES ($1, $2)
            RETURNING id, name, is_active, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(new.is_active)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_tag", e))?;

        TagRow::from_row(&row)
            .map(OrderTag::from)
            .map_err(|e| map_sqlx_error("insert_tag", e))
    }

    #[instrument(skip(self, ids), fields(requested = ids.len()), err)]
    async fn existing(&self, ids: &[OrderTagId]) -> StoreResult<Vec<OrderTagId>> {
        let ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let found: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM order_tags WHERE id = ANY($1) ORDER BY id")
                .bind(&ids)
                .fetch_all(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("existing_tags", e))?;
        Ok(found.into_iter().map(OrderTagId::new).collect())
    }
}

struct TagRow {
    id: i64,
    name: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for TagRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(TagRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<TagRow> for OrderTag {
    fn from(row: TagRow) -> Self {
        OrderTag {
            id: OrderTagId::new(row.id),
            name: row.name,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
