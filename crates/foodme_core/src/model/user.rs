//! Account entity and account-field validation rules.
//!
//! # Responsibility
//! - Define the `AppUser` snapshot handed to callers of the account store.
//! - Provide the pure input predicates behind every account mutation.
//!
//! # Invariants
//! - `username` is immutable once the account exists.
//! - `liked` and `disliked` are disjoint at all times.

use crate::model::preference::PreferenceId;
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Snapshot of one account, including its three affinity sets.
///
/// The affinity sets are loaded together with the profile fields so a
/// caller always observes a consistent liked/disliked pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUser {
    /// Unique immutable identity key, minimum 4 characters.
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Opaque value produced by the credential verifier.
    pub password_hash: String,
    /// Points at a preference owned by this user, when set.
    pub default_preference_id: Option<PreferenceId>,
    pub liked: BTreeSet<String>,
    pub disliked: BTreeSet<String>,
    pub visited: BTreeSet<String>,
}

/// Returns whether every character of `value` is an alphabetic letter.
///
/// The empty string passes vacuously; empty names are caught elsewhere,
/// when at all.
pub fn is_all_letters(value: &str) -> bool {
    value.chars().all(char::is_alphabetic)
}

/// Returns whether `value` looks like an email address (contains `@` and `.`).
pub fn is_valid_email(value: &str) -> bool {
    value.contains('@') && value.contains('.')
}

/// Returns whether `value` satisfies the password length policy (> 6 chars).
pub fn is_valid_password(value: &str) -> bool {
    value.chars().count() > 6
}

/// Returns whether `value` satisfies the username length policy (> 3 chars).
pub fn is_valid_username(value: &str) -> bool {
    value.chars().count() > 3
}

/// Checks every account-creation rule in the order the account store
/// reports them: email, password, username, first name, last name.
pub fn validate_new_account(
    username: &str,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_valid_password(password) {
        return Err(ValidationError::PasswordTooShort);
    }
    if !is_valid_username(username) {
        return Err(ValidationError::UsernameTooShort);
    }
    if !is_all_letters(first_name) {
        return Err(ValidationError::NonAlphabeticFirstName);
    }
    if !is_all_letters(last_name) {
        return Err(ValidationError::NonAlphabeticLastName);
    }
    Ok(())
}
