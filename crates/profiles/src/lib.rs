//! `orderdesk-profiles`: user profiles (email-login subjects) and their manager.
//!
//! Credential handling (email normalization, password hashing) sits behind
//! [`CredentialService`] so the hashing algorithm can be swapped without
//! touching the manager or the stores.

pub mod credentials;
pub mod email;
pub mod manager;
pub mod store;
pub mod user;

pub use credentials::{Argon2Credentials, CredentialError, CredentialService};
pub use email::{normalize_email, Email};
pub use manager::{ProfileError, UserProfileManager};
pub use store::UserProfileStore;
pub use user::{ExtraFields, NewUserProfile, UserProfile, NAME_MAX_LEN};
