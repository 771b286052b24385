//! Email normalization and the `Email` value object.

use serde::{Deserialize, Serialize};

use orderdesk_core::{DomainError, DomainResult, ValueObject};

/// Canonical form used for storage and lookups.
///
/// Surrounding whitespace is stripped and the domain part (after the last
/// `@`) is lowercased. The local part is kept as typed, since mailbox names
/// may be case-sensitive.
pub fn normalize_email(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => trimmed.to_string(),
    }
}

/// A normalized, syntactically plausible email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl ValueObject for Email {}

impl Email {
    /// Normalize `raw` and check it has a non-empty local and domain part.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let normalized = normalize_email(raw);
        if normalized.is_empty() {
            return Err(DomainError::validation("email", "The Email must be set"));
        }
        match normalized.rsplit_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !normalized.contains(char::is_whitespace) =>
            {
                Ok(Self(normalized))
            }
            _ => Err(DomainError::validation("email", "Enter a valid email address.")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_domain_only() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "Jane.Doe@example.com");
    }

    #[test]
    fn normalize_keeps_strings_without_at_sign() {
        assert_eq!(normalize_email(" nobody "), "nobody");
    }

    #[test]
    fn parse_rejects_blank_and_malformed() {
        assert!(matches!(Email::parse("   "), Err(DomainError::Validation(_))));
        assert!(Email::parse("no-at-sign").is_err());
        assert!(Email::parse("@example.com").is_err());
        assert!(Email::parse("a b@example.com").is_err());
    }

    #[test]
    fn parse_returns_normalized_value() {
        let email = Email::parse("A@B.COM").unwrap();
        assert_eq!(email.as_str(), "A@b.com");
        assert_eq!(email.to_string(), "A@b.com");
    }
}
