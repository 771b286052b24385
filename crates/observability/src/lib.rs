//! Process-wide tracing setup shared by the binaries.

pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize tracing/logging. Repeated calls are no-ops.
pub fn init() {
    self::tracing::init(LogFormat::from_env());
}
