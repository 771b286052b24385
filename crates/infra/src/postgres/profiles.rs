use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use orderdesk_core::{StoreResult, UserProfileId};
use orderdesk_profiles::{NewUserProfile, UserProfile, UserProfileStore};

use super::map_sqlx_error;

const PROFILE_COLUMNS: &str = "id, email, password, first_name, last_name, date_joined, \
     last_login, is_staff, is_superuser, is_admin, is_active, avatar";

/// `UserProfileStore` over `user_profiles`; the unique index on `email`
/// surfaces duplicates as `StoreError::Conflict`.
#[derive(Debug, Clone)]
pub struct PostgresUserProfileStore {
    pool: Arc<PgPool>,
}

impl PostgresUserProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn decode(operation: &str, row: Option<PgRow>) -> StoreResult<Option<UserProfile>> {
    row.map(|row| ProfileRow::from_row(&row).map(UserProfile::from))
        .transpose()
        .map_err(|e| map_sqlx_error(operation, e))
}

#[async_trait]
impl UserProfileStore for PostgresUserProfileStore {
    #[instrument(skip(self, new), fields(email = %new.email), err)]
    async fn insert(&self, new: NewUserProfile) -> StoreResult<UserProfile> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO user_profiles (
                email, password, first_name, last_name, date_joined,
                is_staff, is_superuser, is_admin, is_active, avatar
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(&new.email)
        .bind(&new.password)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.date_joined)
        .bind(new.is_staff)
        .bind(new.is_superuser)
        .bind(new.is_admin)
        .bind(new.is_active)
        .bind(&new.avatar)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_profile", e))?;

        ProfileRow::from_row(&row)
            .map(UserProfile::from)
            .map_err(|e| map_sqlx_error("insert_profile", e))
    }

    #[instrument(skip(self), err)]
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_profile_by_email", e))?;
        decode("find_profile_by_email", row)
    }
}

struct ProfileRow {
    id: i64,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    date_joined: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
    is_staff: bool,
    is_superuser: bool,
    is_admin: bool,
    is_active: bool,
    avatar: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for ProfileRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProfileRow {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            date_joined: row.try_get("date_joined")?,
            last_login: row.try_get("last_login")?,
            is_staff: row.try_get("is_staff")?,
            is_superuser: row.try_get("is_superuser")?,
            is_admin: row.try_get("is_admin")?,
            is_active: row.try_get("is_active")?,
            avatar: row.try_get("avatar")?,
        })
    }
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        UserProfile {
            id: UserProfileId::new(row.id),
            email: row.email,
            password: row.password,
            first_name: row.first_name,
            last_name: row.last_name,
            date_joined: row.date_joined,
            last_login: row.last_login,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
            is_admin: row.is_admin,
            is_active: row.is_active,
            avatar: row.avatar,
        }
    }
}
