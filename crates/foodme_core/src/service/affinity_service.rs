//! Affinity use-case service.
//!
//! # Responsibility
//! - Provide stable liked/disliked/visited entry points for core callers.
//! - Delegate invariant enforcement to the repository layer.

use crate::model::restaurant::Restaurant;
use crate::repo::affinity_repo::AffinityRepository;
use crate::repo::RepoResult;

/// Use-case wrapper around one affinity store implementation.
pub struct AffinityService<R: AffinityRepository> {
    repo: R,
}

impl<R: AffinityRepository> AffinityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_liked(
        &mut self,
        username: &str,
        restaurant_id: &str,
        restaurant_name: &str,
    ) -> RepoResult<Restaurant> {
        self.repo.add_liked(username, restaurant_id, restaurant_name)
    }

    pub fn add_disliked(
        &mut self,
        username: &str,
        restaurant_id: &str,
        restaurant_name: &str,
    ) -> RepoResult<Restaurant> {
        self.repo
            .add_disliked(username, restaurant_id, restaurant_name)
    }

    pub fn add_visited(
        &mut self,
        username: &str,
        restaurant_id: &str,
        restaurant_name: &str,
    ) -> RepoResult<Restaurant> {
        self.repo
            .add_visited(username, restaurant_id, restaurant_name)
    }

    pub fn remove_liked(&mut self, username: &str, restaurant_id: &str) -> RepoResult<Restaurant> {
        self.repo.remove_liked(username, restaurant_id)
    }

    pub fn remove_disliked(
        &mut self,
        username: &str,
        restaurant_id: &str,
    ) -> RepoResult<Restaurant> {
        self.repo.remove_disliked(username, restaurant_id)
    }

    pub fn list_all_liked(&self, username: &str) -> RepoResult<Vec<String>> {
        self.repo.list_all_liked(username)
    }

    pub fn list_all_disliked(&self, username: &str) -> RepoResult<Vec<String>> {
        self.repo.list_all_disliked(username)
    }
}
