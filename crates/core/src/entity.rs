//! Entity trait: a row identified by a stable primary key.

/// Entity marker + minimal interface.
///
/// Entities keep their identity across state changes (an order stays the
/// same order after it is deactivated).
pub trait Entity {
    /// Strongly-typed primary key.
    type Id: Copy + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the primary key.
    fn id(&self) -> Self::Id;
}
