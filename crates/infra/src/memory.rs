//! In-memory stores for tests/dev.
//!
//! Each store is a single `RwLock`-guarded table, so every operation
//! (including deactivation's check-and-write) is atomic.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use orderdesk_core::{Entity, OrderId, OrderTagId, StoreError, StoreResult, UserProfileId};
use orderdesk_orders::{
    DateRange, Deactivation, NewOrder, NewOrderTag, Order, OrderStore, OrderTag, OrderTagStore,
};
use orderdesk_profiles::{NewUserProfile, UserProfile, UserProfileStore};

fn poisoned() -> StoreError {
    StoreError::backend("in-memory table lock poisoned")
}

#[derive(Debug)]
struct Rows<E: Entity> {
    last_id: i64,
    rows: BTreeMap<E::Id, E>,
}

/// Auto-incrementing table keyed by the entity id.
#[derive(Debug)]
struct Table<E: Entity> {
    inner: RwLock<Rows<E>>,
}

impl<E> Table<E>
where
    E: Entity + Clone,
{
    fn new() -> Self {
        Self {
            inner: RwLock::new(Rows {
                last_id: 0,
                rows: BTreeMap::new(),
            }),
        }
    }

    /// Build and insert a row under the next id; `build` sees the current rows
    /// so uniqueness checks happen under the same lock.
    fn insert_with(
        &self,
        build: impl FnOnce(i64, &BTreeMap<E::Id, E>) -> StoreResult<E>,
    ) -> StoreResult<E> {
        let mut table = self.inner.write().map_err(|_| poisoned())?;
        let row = build(table.last_id + 1, &table.rows)?;
        table.last_id += 1;
        table.rows.insert(row.id(), row.clone());
        Ok(row)
    }

    /// Rows matching `predicate`, ascending by id.
    fn filter(&self, predicate: impl Fn(&E) -> bool) -> StoreResult<Vec<E>> {
        let table = self.inner.read().map_err(|_| poisoned())?;
        Ok(table.rows.values().filter(|row| predicate(row)).cloned().collect())
    }

    fn update<R>(&self, id: E::Id, apply: impl FnOnce(&mut E) -> R) -> StoreResult<R> {
        let mut table = self.inner.write().map_err(|_| poisoned())?;
        let row = table.rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        Ok(apply(row))
    }
}

#[derive(Debug)]
pub struct InMemoryOrderStore {
    table: Table<Order>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self { table: Table::new() }
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn list(&self) -> StoreResult<Vec<Order>> {
        self.table.filter(|_| true)
    }

    async fn insert(&self, new: NewOrder) -> StoreResult<Order> {
        self.table
            .insert_with(|id, _| Ok(Order::create(OrderId::new(id), new, Utc::now())))
    }

    async fn deactivate(&self, id: OrderId) -> StoreResult<Deactivation> {
        self.table.update(id, |order| order.deactivate(Utc::now()))
    }

    async fn within(&self, range: DateRange) -> StoreResult<Vec<Order>> {
        self.table.filter(|order| range.contains(order))
    }
}

#[derive(Debug)]
pub struct InMemoryOrderTagStore {
    table: Table<OrderTag>,
}

impl InMemoryOrderTagStore {
    pub fn new() -> Self {
        Self { table: Table::new() }
    }
}

impl Default for InMemoryOrderTagStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderTagStore for InMemoryOrderTagStore {
    async fn list(&self) -> StoreResult<Vec<OrderTag>> {
        self.table.filter(|_| true)
    }

    async fn insert(&self, new: NewOrderTag) -> StoreResult<OrderTag> {
        self.table
            .insert_with(|id, _| Ok(OrderTag::create(OrderTagId::new(id), new, Utc::now())))
    }

    async fn existing(&self, ids: &[OrderTagId]) -> StoreResult<Vec<OrderTagId>> {
        Ok(self
            .table
            .filter(|tag| ids.contains(&tag.id))?
            .into_iter()
            .map(|tag| tag.id)
            .collect())
    }
}

#[derive(Debug)]
pub struct InMemoryUserProfileStore {
    table: Table<UserProfile>,
}

impl InMemoryUserProfileStore {
    pub fn new() -> Self {
        Self { table: Table::new() }
    }
}

impl Default for InMemoryUserProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserProfileStore for InMemoryUserProfileStore {
    async fn insert(&self, new: NewUserProfile) -> StoreResult<UserProfile> {
        self.table.insert_with(|id, rows| {
            if rows.values().any(|p| p.email == new.email) {
                return Err(StoreError::Conflict(format!("email {} already exists", new.email)));
            }
            Ok(UserProfile::create(UserProfileId::new(id), new))
        })
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserProfile>> {
        Ok(self.table.filter(|p| p.email == email)?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, orderdesk_orders::DATE_FORMAT).unwrap()
    }

    fn new_order(start: &str, embargo: &str) -> NewOrder {
        NewOrder {
            start_date: date(start),
            embargo_date: date(embargo),
            tags: vec![],
        }
    }

    fn new_profile(email: &str) -> NewUserProfile {
        NewUserProfile {
            email: email.to_string(),
            password: "!unusable".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            date_joined: Utc::now(),
            is_staff: false,
            is_superuser: false,
            is_admin: false,
            is_active: true,
            avatar: None,
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_in_order() {
        let store = InMemoryOrderStore::new();
        let a = store.insert(new_order("2024-01-01", "2024-02-01")).await.unwrap();
        let b = store.insert(new_order("2024-03-01", "2024-04-01")).await.unwrap();

        assert_eq!(a.id, OrderId::new(1));
        assert_eq!(b.id, OrderId::new(2));
        assert_eq!(store.list().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn deactivate_is_one_way() {
        let store = InMemoryOrderStore::new();
        let order = store.insert(new_order("2024-01-01", "2024-02-01")).await.unwrap();

        assert_eq!(store.deactivate(order.id).await.unwrap(), Deactivation::Deactivated);
        assert_eq!(store.deactivate(order.id).await.unwrap(), Deactivation::AlreadyInactive);
        assert!(!store.list().await.unwrap()[0].is_active);
        assert_eq!(store.deactivate(OrderId::new(99)).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn concurrent_deactivations_succeed_once() {
        let store = Arc::new(InMemoryOrderStore::new());
        let order = store.insert(new_order("2024-01-01", "2024-02-01")).await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.deactivate(order.id).await.unwrap() })
            })
            .collect();

        let mut deactivated = 0;
        for handle in handles {
            if handle.await.unwrap() == Deactivation::Deactivated {
                deactivated += 1;
            }
        }
        assert_eq!(deactivated, 1);
    }

    #[tokio::test]
    async fn within_applies_both_bounds() {
        let store = InMemoryOrderStore::new();
        let inside = store.insert(new_order("2024-02-01", "2024-11-30")).await.unwrap();
        store.insert(new_order("2023-12-01", "2024-06-01")).await.unwrap();
        store.insert(new_order("2024-06-01", "2025-01-15")).await.unwrap();

        let range = DateRange::new(date("2024-01-01"), date("2024-12-31"));
        assert_eq!(store.within(range).await.unwrap(), vec![inside]);
    }

    #[tokio::test]
    async fn existing_reports_known_tags_only() {
        let store = InMemoryOrderTagStore::new();
        let tag = store
            .insert(NewOrderTag {
                name: "priority".into(),
                is_active: true,
            })
            .await
            .unwrap();

        let found = store.existing(&[tag.id, OrderTagId::new(42)]).await.unwrap();
        assert_eq!(found, vec![tag.id]);
    }

    #[tokio::test]
    async fn profile_emails_are_unique() {
        let store = InMemoryUserProfileStore::new();
        let created = store.insert(new_profile("a@b.com")).await.unwrap();

        assert!(matches!(
            store.insert(new_profile("a@b.com")).await,
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(store.find_by_email("a@b.com").await.unwrap(), Some(created));
        assert_eq!(store.find_by_email("c@d.com").await.unwrap(), None);
    }
}
