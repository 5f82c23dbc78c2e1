//! Dining-preference entity.
//!
//! # Responsibility
//! - Define the `Preference` snapshot and its field validation.
//!
//! # Invariants
//! - `pid` is unique store-wide and never reused.
//! - `username` is immutable after creation and references an existing
//!   account.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};

/// Stable generated identifier for a preference.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PreferenceId = i64;

/// One saved search preference owned by exactly one user.
///
/// The four categorical fields are free-form strings; no server-side
/// enumeration is authoritative, but each must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub pid: PreferenceId,
    /// Owning account, immutable after creation.
    pub username: String,
    pub location: String,
    pub cuisine: String,
    pub price: String,
    pub sort_by: String,
}

/// Checks that every categorical field carries a value.
pub fn validate_preference_fields(
    location: &str,
    cuisine: &str,
    price: &str,
    sort_by: &str,
) -> Result<(), ValidationError> {
    for (field, value) in [
        ("location", location),
        ("cuisine", cuisine),
        ("price", price),
        ("sortBy", sort_by),
    ] {
        if value.is_empty() {
            return Err(ValidationError::EmptyPreferenceField(field));
        }
    }
    Ok(())
}
