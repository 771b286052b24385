//! Infrastructure layer: configuration and store adapters.

pub mod config;
pub mod memory;
pub mod postgres;

pub use config::{AppConfig, ConfigError, SuperuserSeed};
pub use memory::{InMemoryOrderStore, InMemoryOrderTagStore, InMemoryUserProfileStore};
