//! User profile entity: the authentication subject, identified by email.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{Entity, UserProfileId};

use crate::credentials::{CredentialError, CredentialService, UNUSABLE_PASSWORD_PREFIX};

/// Longest accepted first/last name, in characters.
pub const NAME_MAX_LEN: usize = 150;

/// Optional attributes accepted by the manager on creation.
///
/// Flags left as `None` take the model default (`false`, except
/// `is_active` which defaults to `true`). `create_superuser` fills
/// `is_staff`, `is_superuser` and `is_active` with `true` when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExtraFields {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
    pub avatar: Option<String>,
}

/// Fully prepared row handed to the store (email normalized, password hashed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserProfile {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: DateTime<Utc>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_admin: bool,
    pub is_active: bool,
    pub avatar: Option<String>,
}

/// Persisted user profile.
///
/// `password` only ever holds a credential hash (or an unusable marker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserProfileId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_admin: bool,
    pub is_active: bool,
    pub avatar: Option<String>,
}

impl UserProfile {
    pub fn create(id: UserProfileId, new: NewUserProfile) -> Self {
        Self {
            id,
            email: new.email,
            password: new.password,
            first_name: new.first_name,
            last_name: new.last_name,
            date_joined: new.date_joined,
            last_login: None,
            is_staff: new.is_staff,
            is_superuser: new.is_superuser,
            is_admin: new.is_admin,
            is_active: new.is_active,
            avatar: new.avatar,
        }
    }

    /// The login identifier.
    pub fn username(&self) -> &str {
        &self.email
    }

    /// `"first last"`, trimmed when either part is blank.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn has_usable_password(&self) -> bool {
        !self.password.starts_with(UNUSABLE_PASSWORD_PREFIX)
    }

    /// Replace the stored hash. `None` makes the password unusable.
    pub fn set_password(
        &mut self,
        credentials: &dyn CredentialService,
        raw: Option<&str>,
    ) -> Result<(), CredentialError> {
        self.password = match raw {
            Some(raw) => credentials.hash_password(raw)?,
            None => credentials.unusable_password(),
        };
        Ok(())
    }

    pub fn check_password(&self, credentials: &dyn CredentialService, raw: &str) -> bool {
        self.has_usable_password() && credentials.verify_password(raw, &self.password)
    }
}

impl Entity for UserProfile {
    type Id = UserProfileId;

    fn id(&self) -> UserProfileId {
        self.id
    }
}

impl core::fmt::Display for UserProfile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.email)
    }
}
