//! `orderdesk-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the order and
//! profile slices (no HTTP, no SQL).

pub mod entity;
pub mod error;
pub mod id;
pub mod store;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, FieldErrors};
pub use id::{OrderId, OrderTagId, UserProfileId};
pub use store::{StoreError, StoreResult};
pub use value_object::ValueObject;
