//! Preference use-case service.
//!
//! # Responsibility
//! - Provide stable preference entry points for core callers.
//! - Delegate persistence to repository implementations.

use crate::model::preference::{Preference, PreferenceId};
use crate::repo::preference_repo::PreferenceRepository;
use crate::repo::RepoResult;

/// Use-case wrapper around one preference store implementation.
pub struct PreferenceService<R: PreferenceRepository> {
    repo: R,
}

impl<R: PreferenceRepository> PreferenceService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_preference(
        &mut self,
        username: &str,
        location: &str,
        cuisine: &str,
        price: &str,
        sort_by: &str,
    ) -> RepoResult<Preference> {
        self.repo
            .create_preference(username, location, cuisine, price, sort_by)
    }

    /// Wholesale overwrite of all categorical fields.
    pub fn edit_preference(
        &mut self,
        username: &str,
        pid: PreferenceId,
        location: &str,
        cuisine: &str,
        price: &str,
        sort_by: &str,
    ) -> RepoResult<Preference> {
        self.repo
            .edit_preference(username, pid, location, cuisine, price, sort_by)
    }

    pub fn delete_preference(
        &mut self,
        username: &str,
        pid: PreferenceId,
    ) -> RepoResult<Preference> {
        self.repo.delete_preference(username, pid)
    }

    pub fn get_preference(&self, pid: PreferenceId) -> RepoResult<Preference> {
        self.repo.get_preference(pid)
    }

    pub fn list_all(&self) -> RepoResult<Vec<Preference>> {
        self.repo.list_all()
    }

    pub fn list_for_user(&self, username: &str) -> RepoResult<Vec<Preference>> {
        self.repo.list_for_user(username)
    }
}
