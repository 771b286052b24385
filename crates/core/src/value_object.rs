//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects carry no identity: two instances with the same attribute
/// values are the same value. Examples in this workspace are a normalized
/// email address and an order date window.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct DateRange { start: NaiveDate, embargo: NaiveDate }
///
/// impl ValueObject for DateRange {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
