//! Domain model for accounts, preferences and restaurants.
//!
//! # Responsibility
//! - Define the entity snapshots returned by every store operation.
//! - Host persistence-free validation predicates and their error type.
//!
//! # Invariants
//! - A restaurant id never appears in both the liked and disliked set of
//!   the same user.
//! - `default_preference_id` only references a preference owned by the
//!   same user.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod preference;
pub mod restaurant;
pub mod user;

/// One variant per broken input rule, so callers can react to the exact
/// policy violation instead of parsing a message string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidEmail,
    PasswordTooShort,
    UsernameTooShort,
    NonAlphabeticFirstName,
    NonAlphabeticLastName,
    SameFirstName,
    SameLastName,
    EmptyPreferenceField(&'static str),
    EmptyRestaurantField,
    NotOnLikedList(String),
    NotOnDislikedList(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "this is not a valid email address"),
            Self::PasswordTooShort => {
                write!(f, "your password must be longer than 6 characters")
            }
            Self::UsernameTooShort => {
                write!(f, "username should be longer than 3 characters")
            }
            Self::NonAlphabeticFirstName => {
                write!(f, "first name should contain only alphabetic characters")
            }
            Self::NonAlphabeticLastName => {
                write!(f, "last name should contain only alphabetic characters")
            }
            Self::SameFirstName => {
                write!(f, "new first name cannot be the same as current name")
            }
            Self::SameLastName => {
                write!(f, "new last name cannot be the same as current name")
            }
            Self::EmptyPreferenceField(field) => {
                write!(f, "preference {field} cannot be empty")
            }
            Self::EmptyRestaurantField => {
                write!(f, "restaurant id and name must be at least 1 character")
            }
            Self::NotOnLikedList(id) => {
                write!(f, "restaurant {id} is not on the liked list")
            }
            Self::NotOnDislikedList(id) => {
                write!(f, "restaurant {id} is not on the disliked list")
            }
        }
    }
}

impl Error for ValidationError {}
