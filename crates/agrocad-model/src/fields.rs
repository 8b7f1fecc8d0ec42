//! # Producer Field Rules
//!
//! Normalization and validation for the free-text fields of a producer
//! record: name, email, phone, and postal address. Every rule returns the
//! normalized value so callers store exactly what was validated.

use serde::{Deserialize, Serialize};

use agrocad_core::ValidationError;

use crate::uf::Uf;

/// Minimum accepted name length (after trimming).
const NAME_MIN: usize = 2;

/// Maximum accepted name length.
const NAME_MAX: usize = 100;

/// Validate and normalize a producer or farm name: trimmed, 2..=100 chars.
pub fn normalize_name(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < NAME_MIN {
        return Err(ValidationError::InvalidName {
            value: value.to_string(),
            reason: format!("must have at least {NAME_MIN} characters"),
        });
    }
    if len > NAME_MAX {
        return Err(ValidationError::InvalidName {
            value: value.to_string(),
            reason: format!("must have at most {NAME_MAX} characters"),
        });
    }
    Ok(trimmed.to_string())
}

/// Validate and normalize an email address: lowercased, structural check.
///
/// One `@`, non-empty local part, and a domain containing a dot with
/// non-empty labels. Deliberately structural rather than RFC-exhaustive —
/// deliverability is not this layer's concern.
pub fn normalize_email(value: &str) -> Result<String, ValidationError> {
    let normalized = value.trim().to_lowercase();
    let mut parts = normalized.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.split('.').all(|label| !label.is_empty());
    if local.is_empty() || !domain_ok || normalized.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail(value.to_string()));
    }
    Ok(normalized)
}

/// Validate and normalize a phone number: trimmed, non-empty, and made of
/// digits with common punctuation (`+ - ( ) .` and spaces).
pub fn normalize_phone(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let digit_count = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
    let chars_ok = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | '.' | ' '));
    if trimmed.is_empty() || digit_count < 8 || !chars_ok {
        return Err(ValidationError::InvalidName {
            value: value.to_string(),
            reason: "phone must contain at least 8 digits".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// A producer's postal address, validated at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street and number.
    pub street: String,
    /// City name.
    pub city: String,
    /// Federative unit.
    pub state: Uf,
    /// Postal code (CEP), stored as given after trimming.
    pub zip_code: String,
}

impl Address {
    /// Create an address, trimming fields and rejecting empty ones.
    pub fn new(
        street: &str,
        city: &str,
        state: Uf,
        zip_code: &str,
    ) -> Result<Self, ValidationError> {
        let street = street.trim();
        let city = city.trim();
        let zip_code = zip_code.trim();
        if street.is_empty() || city.is_empty() || zip_code.is_empty() {
            return Err(ValidationError::InvalidName {
                value: format!("{street}/{city}/{zip_code}"),
                reason: "address fields must not be empty".to_string(),
            });
        }
        Ok(Self {
            street: street.to_string(),
            city: city.to_string(),
            state,
            zip_code: zip_code.to_string(),
        })
    }
}
