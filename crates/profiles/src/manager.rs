//! User profile manager: the only way profiles get created.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use orderdesk_core::{DomainError, StoreError};

use crate::credentials::{CredentialError, CredentialService};
use crate::email::Email;
use crate::store::UserProfileStore;
use crate::user::{ExtraFields, NewUserProfile, UserProfile, NAME_MAX_LEN};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Creates user profiles: validates and normalizes the email, hashes the
/// password, applies flag defaults and persists through the store.
#[derive(Clone)]
pub struct UserProfileManager {
    store: Arc<dyn UserProfileStore>,
    credentials: Arc<dyn CredentialService>,
}

impl UserProfileManager {
    pub fn new(store: Arc<dyn UserProfileStore>, credentials: Arc<dyn CredentialService>) -> Self {
        Self { store, credentials }
    }

    pub fn credentials(&self) -> &dyn CredentialService {
        self.credentials.as_ref()
    }

    /// Create a regular profile.
    ///
    /// Fails with a validation error when `email` is empty, malformed or
    /// already taken. A `None` password stores an unusable marker.
    pub async fn create_user(
        &self,
        email: &str,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> Result<UserProfile, ProfileError> {
        if email.trim().is_empty() {
            return Err(DomainError::validation("email", "The Email must be set").into());
        }
        let email = Email::parse(&self.credentials.normalize_email(email))?;

        for (field, value) in [("first_name", &extra.first_name), ("last_name", &extra.last_name)] {
            if value.chars().count() > NAME_MAX_LEN {
                return Err(DomainError::validation(
                    field,
                    format!("Ensure this field has no more than {NAME_MAX_LEN} characters."),
                )
                .into());
            }
        }

        let password = match password {
            Some(raw) => self.credentials.hash_password(raw)?,
            None => self.credentials.unusable_password(),
        };

        let new = NewUserProfile {
            email: email.into_string(),
            password,
            first_name: extra.first_name,
            last_name: extra.last_name,
            date_joined: Utc::now(),
            is_staff: extra.is_staff.unwrap_or(false),
            is_superuser: extra.is_superuser.unwrap_or(false),
            is_admin: extra.is_admin.unwrap_or(false),
            is_active: extra.is_active.unwrap_or(true),
            avatar: extra.avatar,
        };

        let profile = self.store.insert(new).await.map_err(|e| match e {
            StoreError::Conflict(_) => ProfileError::Domain(DomainError::validation(
                "email",
                "user profile with this email already exists.",
            )),
            other => ProfileError::Store(other),
        })?;

        tracing::info!(
            profile_id = %profile.id,
            is_staff = profile.is_staff,
            is_superuser = profile.is_superuser,
            "user profile created"
        );
        Ok(profile)
    }

    /// Create a superuser.
    ///
    /// `is_staff`, `is_superuser` and `is_active` default to `true`; an
    /// explicit `false` for either elevated flag is rejected.
    pub async fn create_superuser(
        &self,
        email: &str,
        password: &str,
        mut extra: ExtraFields,
    ) -> Result<UserProfile, ProfileError> {
        if !*extra.is_staff.get_or_insert(true) {
            return Err(DomainError::validation("is_staff", "Superuser must have is_staff=True.").into());
        }
        if !*extra.is_superuser.get_or_insert(true) {
            return Err(
                DomainError::validation("is_superuser", "Superuser must have is_superuser=True.").into(),
            );
        }
        extra.is_active.get_or_insert(true);

        self.create_user(email, Some(password), extra).await
    }

    /// Look up a profile by email (normalized before matching).
    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserProfile>, ProfileError> {
        let email = self.credentials.normalize_email(email);
        Ok(self.store.find_by_email(&email).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use orderdesk_core::{StoreResult, UserProfileId};

    use super::*;
    use crate::Argon2Credentials;

    #[derive(Default)]
    struct FakeStore {
        rows: Mutex<BTreeMap<i64, UserProfile>>,
    }

    #[async_trait]
    impl UserProfileStore for FakeStore {
        async fn insert(&self, new: NewUserProfile) -> StoreResult<UserProfile> {
            let mut rows = self.rows.lock().unwrap();
            if rows.values().any(|p| p.email == new.email) {
                return Err(StoreError::Conflict("email".into()));
            }
            let id = UserProfileId::new(rows.len() as i64 + 1);
            let profile = UserProfile::create(id, new);
            rows.insert(id.get(), profile.clone());
            Ok(profile)
        }

        async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserProfile>> {
            Ok(self.rows.lock().unwrap().values().find(|p| p.email == email).cloned())
        }
    }

    fn manager() -> UserProfileManager {
        UserProfileManager::new(Arc::new(FakeStore::default()), Arc::new(Argon2Credentials::new()))
    }

    fn field_error(err: &ProfileError, field: &str) -> Option<String> {
        match err {
            ProfileError::Domain(e) => e.field_errors()?.get(field)?.first().cloned(),
            _ => None,
        }
    }

    #[tokio::test]
    async fn create_user_requires_email() {
        let err = manager().create_user("", Some("x"), ExtraFields::default()).await.unwrap_err();
        assert_eq!(field_error(&err, "email").as_deref(), Some("The Email must be set"));

        let err = manager().create_user("   ", Some("x"), ExtraFields::default()).await.unwrap_err();
        assert_eq!(field_error(&err, "email").as_deref(), Some("The Email must be set"));
    }

    #[tokio::test]
    async fn create_user_normalizes_email_and_hashes_password() {
        let mgr = manager();
        let profile = mgr
            .create_user(" Jane@Example.COM ", Some("x"), ExtraFields::default())
            .await
            .unwrap();

        assert_eq!(profile.email, "Jane@example.com");
        assert_ne!(profile.password, "x");
        assert!(profile.check_password(mgr.credentials(), "x"));
        assert!(profile.is_active);
        assert!(!profile.is_staff && !profile.is_superuser && !profile.is_admin);
    }

    #[tokio::test]
    async fn create_user_without_password_is_unusable() {
        let profile = manager()
            .create_user("a@b.com", None, ExtraFields::default())
            .await
            .unwrap();
        assert!(!profile.has_usable_password());
    }

    #[tokio::test]
    async fn duplicate_email_fails_uniqueness_validation() {
        let mgr = manager();
        mgr.create_user("a@b.com", Some("x"), ExtraFields::default()).await.unwrap();

        let err = mgr
            .create_user("a@B.com", Some("y"), ExtraFields::default())
            .await
            .unwrap_err();
        assert_eq!(
            field_error(&err, "email").as_deref(),
            Some("user profile with this email already exists.")
        );
    }

    #[tokio::test]
    async fn create_user_rejects_long_names() {
        let extra = ExtraFields {
            last_name: "x".repeat(NAME_MAX_LEN + 1),
            ..ExtraFields::default()
        };
        let err = manager().create_user("a@b.com", Some("x"), extra).await.unwrap_err();
        assert!(field_error(&err, "last_name").is_some());
    }

    #[tokio::test]
    async fn create_superuser_forces_elevated_flags() {
        let profile = manager()
            .create_superuser("root@example.com", "x", ExtraFields::default())
            .await
            .unwrap();

        assert!(profile.is_staff);
        assert!(profile.is_superuser);
        assert!(profile.is_active);
    }

    #[tokio::test]
    async fn create_superuser_rejects_explicit_false() {
        let mgr = manager();
        let staff = ExtraFields {
            is_staff: Some(false),
            ..ExtraFields::default()
        };
        let err = mgr.create_superuser("root@example.com", "x", staff).await.unwrap_err();
        assert_eq!(
            field_error(&err, "is_staff").as_deref(),
            Some("Superuser must have is_staff=True.")
        );

        let superuser = ExtraFields {
            is_superuser: Some(false),
            ..ExtraFields::default()
        };
        let err = mgr.create_superuser("root@example.com", "x", superuser).await.unwrap_err();
        assert!(field_error(&err, "is_superuser").is_some());

        assert!(mgr.get_by_email("root@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_by_email_normalizes_lookup() {
        let mgr = manager();
        let created = mgr.create_user("a@b.com", Some("x"), ExtraFields::default()).await.unwrap();

        let found = mgr.get_by_email("  a@B.COM").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
    }
}
