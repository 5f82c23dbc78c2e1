//! Account use-case service.
//!
//! # Responsibility
//! - Provide stable account entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::preference::{Preference, PreferenceId};
use crate::model::user::AppUser;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;

/// Use-case wrapper around one account store implementation.
pub struct AccountService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> AccountService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an account; validation and conflict errors pass through
    /// unchanged.
    pub fn create_account(
        &mut self,
        username: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> RepoResult<AppUser> {
        self.repo
            .create_account(username, first_name, last_name, email, password)
    }

    pub fn get_user(&self, username: &str) -> RepoResult<AppUser> {
        self.repo.get_user(username)
    }

    pub fn change_password(
        &mut self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> RepoResult<AppUser> {
        self.repo.change_password(username, old_password, new_password)
    }

    pub fn reset_password(&mut self, username: &str, new_password: &str) -> RepoResult<AppUser> {
        self.repo.reset_password(username, new_password)
    }

    pub fn change_first_name(&mut self, username: &str, value: &str) -> RepoResult<AppUser> {
        self.repo.change_first_name(username, value)
    }

    pub fn change_last_name(&mut self, username: &str, value: &str) -> RepoResult<AppUser> {
        self.repo.change_last_name(username, value)
    }

    pub fn change_email(&mut self, username: &str, value: &str) -> RepoResult<AppUser> {
        self.repo.change_email(username, value)
    }

    pub fn delete_account(&mut self, username: &str) -> RepoResult<AppUser> {
        self.repo.delete_account(username)
    }

    pub fn list_all_users(&self) -> RepoResult<Vec<AppUser>> {
        self.repo.list_all_users()
    }

    /// Returns 0 for an empty store, never an error for emptiness.
    pub fn count_users(&self) -> RepoResult<u64> {
        self.repo.count_users()
    }

    pub fn set_default_preference(
        &mut self,
        username: &str,
        pid: PreferenceId,
    ) -> RepoResult<PreferenceId> {
        self.repo.set_default_preference(username, pid)
    }

    pub fn get_default_preference(&self, username: &str) -> RepoResult<Preference> {
        self.repo.get_default_preference(username)
    }
}
