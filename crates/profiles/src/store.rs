//! Store port for user profiles (implemented in `orderdesk-infra`).

use async_trait::async_trait;

use orderdesk_core::StoreResult;

use crate::{NewUserProfile, UserProfile};

#[async_trait]
pub trait UserProfileStore: Send + Sync {
    /// Insert a profile. A duplicate email yields `StoreError::Conflict`.
    async fn insert(&self, new: NewUserProfile) -> StoreResult<UserProfile>;

    /// Exact match on the (already normalized) email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserProfile>>;
}
