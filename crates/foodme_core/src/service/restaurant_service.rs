//! Restaurant catalog use-case service.
//!
//! # Responsibility
//! - Provide stable catalog entry points for core callers.
//! - Delegate persistence to repository implementations.

use crate::model::restaurant::Restaurant;
use crate::repo::restaurant_repo::RestaurantRepository;
use crate::repo::RepoResult;

/// Use-case wrapper around one catalog implementation.
pub struct RestaurantService<R: RestaurantRepository> {
    repo: R,
}

impl<R: RestaurantRepository> RestaurantService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Strict create: a duplicate id is a conflict.
    pub fn create_restaurant(&mut self, id: &str, name: &str) -> RepoResult<Restaurant> {
        self.repo.create_restaurant(id, name)
    }

    /// Create-if-absent path used when a restaurant is referenced rather
    /// than registered.
    pub fn ensure_exists(&mut self, id: &str, name: &str) -> RepoResult<Restaurant> {
        self.repo.ensure_exists(id, name)
    }

    pub fn delete_restaurant(&mut self, name_or_id: &str) -> RepoResult<Restaurant> {
        self.repo.delete_restaurant(name_or_id)
    }

    pub fn get_all(&self) -> RepoResult<Vec<Restaurant>> {
        self.repo.get_all()
    }
}
