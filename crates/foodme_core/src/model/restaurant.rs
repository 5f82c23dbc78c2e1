//! Restaurant catalog entity.
//!
//! # Responsibility
//! - Define the global `Restaurant` identity referenced by affinity sets.
//!
//! # Invariants
//! - `restaurant_id` is unique catalog-wide.
//! - Affinity operations never mutate the restaurant itself.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};

/// Global catalog entry, not owned by any user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Opaque external identifier, minimum length 1.
    pub restaurant_id: String,
    /// Display name, minimum length 1.
    pub restaurant_name: String,
}

/// Checks the minimum-length rule on both identity fields.
pub fn validate_restaurant_fields(id: &str, name: &str) -> Result<(), ValidationError> {
    if id.is_empty() || name.is_empty() {
        return Err(ValidationError::EmptyRestaurantField);
    }
    Ok(())
}
