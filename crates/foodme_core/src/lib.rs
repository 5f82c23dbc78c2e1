//! Core domain logic for the restaurant-recommendation account service.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod security;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::preference::{Preference, PreferenceId};
pub use model::restaurant::Restaurant;
pub use model::user::AppUser;
pub use model::ValidationError;
pub use repo::affinity_repo::{AffinityRepository, SqliteAffinityRepository};
pub use repo::preference_repo::{PreferenceRepository, SqlitePreferenceRepository};
pub use repo::restaurant_repo::{RestaurantRepository, SqliteRestaurantRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::AccountService;
pub use service::affinity_service::AffinityService;
pub use service::preference_service::PreferenceService;
pub use service::restaurant_service::RestaurantService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
