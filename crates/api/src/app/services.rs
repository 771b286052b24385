//! Store wiring and the operations behind each handler.

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use orderdesk_core::{DomainError, OrderId, StoreError};
use orderdesk_infra::postgres::{
    self, PostgresOrderStore, PostgresOrderTagStore, PostgresUserProfileStore,
};
use orderdesk_infra::{
    AppConfig, InMemoryOrderStore, InMemoryOrderTagStore, InMemoryUserProfileStore, SuperuserSeed,
};
use orderdesk_orders::{
    DateRangeQuery, Deactivation, Order, OrderPayload, OrderStore, OrderTag, OrderTagPayload,
    OrderTagStore,
};
use orderdesk_profiles::{
    Argon2Credentials, ExtraFields, ProfileError, UserProfile, UserProfileManager,
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Shared application state, injected into handlers as `Extension<Arc<AppServices>>`.
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<dyn OrderStore>,
    pub tags: Arc<dyn OrderTagStore>,
    pub profiles: UserProfileManager,
}

impl AppServices {
    pub fn in_memory() -> Self {
        Self {
            orders: Arc::new(InMemoryOrderStore::new()),
            tags: Arc::new(InMemoryOrderTagStore::new()),
            profiles: UserProfileManager::new(
                Arc::new(InMemoryUserProfileStore::new()),
                Arc::new(Argon2Credentials),
            ),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            orders: Arc::new(PostgresOrderStore::new(pool.clone())),
            tags: Arc::new(PostgresOrderTagStore::new(pool.clone())),
            profiles: UserProfileManager::new(
                Arc::new(PostgresUserProfileStore::new(pool)),
                Arc::new(Argon2Credentials),
            ),
        }
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, ServiceError> {
        Ok(self.orders.list().await?)
    }

    /// Validate `payload` (tag ids must exist) and persist a new active order.
    pub async fn create_order(&self, payload: OrderPayload) -> Result<Order, ServiceError> {
        let requested = payload.tag_ids();
        let existing = if requested.is_empty() {
            Vec::new()
        } else {
            self.tags.existing(&requested).await?
        };

        let new = payload.validate(&existing)?;
        Ok(self.orders.insert(new).await?)
    }

    pub async fn deactivate_order(&self, id: OrderId) -> Result<Deactivation, ServiceError> {
        Ok(self.orders.deactivate(id).await?)
    }

    /// Empty when either bound is missing or blank.
    pub async fn orders_by_date_range(
        &self,
        query: &DateRangeQuery,
    ) -> Result<Vec<Order>, ServiceError> {
        match query.resolve()? {
            Some(range) => Ok(self.orders.within(range).await?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn list_tags(&self) -> Result<Vec<OrderTag>, ServiceError> {
        Ok(self.tags.list().await?)
    }

    pub async fn create_tag(&self, payload: OrderTagPayload) -> Result<OrderTag, ServiceError> {
        let new = payload.validate()?;
        Ok(self.tags.insert(new).await?)
    }

    /// Create the configured superuser unless a profile with that email exists.
    pub async fn seed_superuser(
        &self,
        seed: &SuperuserSeed,
    ) -> Result<Option<UserProfile>, ProfileError> {
        if self.profiles.get_by_email(&seed.email).await?.is_some() {
            info!(email = %seed.email, "superuser already present; skipping seed");
            return Ok(None);
        }

        let profile = self
            .profiles
            .create_superuser(&seed.email, &seed.password, ExtraFields::default())
            .await?;
        info!(profile_id = %profile.id, "seeded superuser");
        Ok(Some(profile))
    }
}

/// Build services from configuration.
///
/// Postgres stores are used when `config.database_url` is set, in-memory
/// stores otherwise.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let services = if config.database_url.is_some() {
        let pool = postgres::connect(config)
            .await
            .context("failed to connect to Postgres")?;
        AppServices::postgres(pool)
    } else {
        info!("USE_PERSISTENT_STORES not enabled; using in-memory stores");
        AppServices::in_memory()
    };

    if let Some(seed) = &config.superuser {
        services
            .seed_superuser(seed)
            .await
            .context("failed to seed superuser")?;
    }

    Ok(services)
}
