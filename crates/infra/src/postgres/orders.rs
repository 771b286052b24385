//! `OrderStore` over the `orders` and `order_tag_links` tables.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::{Span, instrument};

use orderdesk_core::{OrderId, OrderTagId, StoreError, StoreResult};
use orderdesk_orders::{DateRange, Deactivation, NewOrder, Order, OrderStore};

use super::map_sqlx_error;

const SELECT_ORDERS: &str = r#"
    SELECT id, start_date, embargo_date, is_active, created_at, updated_at
    FROM orders
"#;

#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    pool: Arc<PgPool>,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Decode order rows and attach their tag ids.
    async fn hydrate(&self, rows: Vec<PgRow>) -> StoreResult<Vec<Order>> {
        let rows = rows
            .iter()
            .map(OrderRow::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::backend(format!("failed to decode order row: {e}")))?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let links = sqlx::query(
            r#"
            SELECT order_id, tag_id
            FROM order_tag_links
            WHERE order_id = ANY($1)
            ORDER BY order_id, tag_id
            "#,
        )
        .bind(&ids)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_order_tags", e))?;

        let mut tags: BTreeMap<i64, Vec<OrderTagId>> = BTreeMap::new();
        for link in links {
            let order_id: i64 = link
                .try_get("order_id")
                .map_err(|e| map_sqlx_error("load_order_tags", e))?;
            let tag_id: i64 = link
                .try_get("tag_id")
                .map_err(|e| map_sqlx_error("load_order_tags", e))?;
            tags.entry(order_id).or_default().push(OrderTagId::new(tag_id));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let tags = tags.remove(&row.id).unwrap_or_default();
                row.into_order(tags)
            })
            .collect())
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    #[instrument(skip(self), fields(order_count = tracing::field::Empty), err)]
    async fn list(&self) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query(&format!("{SELECT_ORDERS} ORDER BY id ASC"))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_orders", e))?;
        let orders = self.hydrate(rows).await?;
        Span::current().record("order_count", orders.len());
        Ok(orders)
    }

    #[instrument(skip(self, new), fields(tag_count = new.tags.len()), err)]
    async fn insert(&self, new: NewOrder) -> StoreResult<Order> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("insert_order", e))?;

        let row = sqlx::query(
            r#"
            INSERT INTO orders (start_date, embargo_date)
            VALUES ($1, $2)
            RETURNING id, start_date, embargo_date, is_active, created_at, updated_at
            "#,
        )
        .bind(new.start_date)
        .bind(new.embargo_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_order", e))?;
        let row = OrderRow::from_row(&row).map_err(|e| map_sqlx_error("insert_order", e))?;

        if !new.tags.is_empty() {
            let tag_ids: Vec<i64> = new.tags.iter().map(|t| t.get()).collect();
            sqlx::query(
                r#"
                INSERT INTO order_tag_links (order_id, tag_id)
                SELECT $1, UNNEST($2::bigint[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(row.id)
            .bind(&tag_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("link_order_tags", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("insert_order", e))?;

        Ok(row.into_order(new.tags))
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn deactivate(&self, id: OrderId) -> StoreResult<Deactivation> {
        // Conditional update: only one concurrent caller can flip the flag.
        let flipped = sqlx::query(
            r#"
            UPDATE orders
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND is_active
            RETURNING id
            "#,
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("deactivate_order", e))?;
        if flipped.is_some() {
            return Ok(Deactivation::Deactivated);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM orders WHERE id = $1)")
            .bind(id.get())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("deactivate_order", e))?;
        if exists {
            Ok(Deactivation::AlreadyInactive)
        } else {
            Err(StoreError::NotFound)
        }
    }

    #[instrument(skip(self), fields(start = %range.start, embargo = %range.embargo), err)]
    async fn within(&self, range: DateRange) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "{SELECT_ORDERS} WHERE start_date >= $1 AND embargo_date <= $2 ORDER BY id ASC"
        ))
        .bind(range.start)
        .bind(range.embargo)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("orders_within", e))?;
        self.hydrate(rows).await
    }
}

#[derive(Debug)]
struct OrderRow {
    id: i64,
    start_date: NaiveDate,
    embargo_date: NaiveDate,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for OrderRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(OrderRow {
            id: row.try_get("id")?,
            start_date: row.try_get("start_date")?,
            embargo_date: row.try_get("embargo_date")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl OrderRow {
    fn into_order(self, tags: Vec<OrderTagId>) -> Order {
        Order {
            id: OrderId::new(self.id),
            start_date: self.start_date,
            embargo_date: self.embargo_date,
            tags,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
