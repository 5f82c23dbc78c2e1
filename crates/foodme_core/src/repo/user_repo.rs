//! Account store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own `AppUser` identity and profile fields behind validated mutations.
//! - Own the default-preference pointer and its referential checks.
//!
//! # Invariants
//! - Usernames are unique and immutable once created.
//! - Deleting an account cascades to its preferences and affinity rows.
//! - `default_preference_id` is only ever set to a preference owned by the
//!   same user; a dangling pointer reads as "no default set".

use crate::model::preference::{Preference, PreferenceId};
use crate::model::user::{
    is_all_letters, is_valid_email, is_valid_password, validate_new_account, AppUser,
};
use crate::model::ValidationError;
use crate::repo::readiness::{ensure_connection_ready, TableSpec};
use crate::repo::{RepoError, RepoResult};
use crate::security::password;
use rusqlite::{params, Connection, TransactionBehavior};
use std::collections::BTreeSet;

const USER_TABLES: &[TableSpec] = &[
    TableSpec {
        table: "app_users",
        columns: &[
            "username",
            "first_name",
            "last_name",
            "email",
            "password_hash",
            "default_preference_id",
        ],
    },
    TableSpec {
        table: "preferences",
        columns: &["pid", "username"],
    },
    TableSpec {
        table: "affinities",
        columns: &["username", "restaurant_id", "kind"],
    },
];

/// Repository interface for account operations.
pub trait UserRepository {
    /// Creates an account after full field validation; fails with
    /// `Conflict` when the username is taken.
    fn create_account(
        &mut self,
        username: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> RepoResult<AppUser>;
    /// Gets one account snapshot, affinity sets included.
    fn get_user(&self, username: &str) -> RepoResult<AppUser>;
    /// Verifies the old password, then stores a hash of the new one.
    fn change_password(
        &mut self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> RepoResult<AppUser>;
    /// Administrative reset path: no old-password verification.
    fn reset_password(&mut self, username: &str, new_password: &str) -> RepoResult<AppUser>;
    fn change_first_name(&mut self, username: &str, new_first_name: &str) -> RepoResult<AppUser>;
    fn change_last_name(&mut self, username: &str, new_last_name: &str) -> RepoResult<AppUser>;
    fn change_email(&mut self, username: &str, new_email: &str) -> RepoResult<AppUser>;
    /// Deletes the account and everything it owns; returns the pre-delete
    /// snapshot.
    fn delete_account(&mut self, username: &str) -> RepoResult<AppUser>;
    /// Lists every account; an empty store is an `EmptyListing` error.
    fn list_all_users(&self) -> RepoResult<Vec<AppUser>>;
    /// Number of accounts; maps the empty-store listing error to 0.
    fn count_users(&self) -> RepoResult<u64>;
    /// Marks one of the user's own preferences as the default.
    fn set_default_preference(
        &mut self,
        username: &str,
        pid: PreferenceId,
    ) -> RepoResult<PreferenceId>;
    /// Resolves the default preference; unset and dangling pointers are
    /// both `NotFound`.
    fn get_default_preference(&self, username: &str) -> RepoResult<Preference>;
}

/// SQLite-backed account store.
#[derive(Debug)]
pub struct SqliteUserRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, USER_TABLES)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_account(
        &mut self,
        username: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> RepoResult<AppUser> {
        validate_new_account(username, first_name, last_name, email, password)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if user_exists(&tx, username)? {
            return Err(RepoError::Conflict {
                entity: "user",
                key: username.to_string(),
            });
        }

        let password_hash = password::salted_hash(password);
        tx.execute(
            "INSERT INTO app_users (
                username,
                first_name,
                last_name,
                email,
                password_hash,
                default_preference_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, NULL);",
            params![username, first_name, last_name, email, password_hash],
        )?;
        tx.commit()?;

        Ok(AppUser {
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password_hash,
            default_preference_id: None,
            liked: BTreeSet::new(),
            disliked: BTreeSet::new(),
            visited: BTreeSet::new(),
        })
    }

    fn get_user(&self, username: &str) -> RepoResult<AppUser> {
        load_required_user(self.conn, username)
    }

    fn change_password(
        &mut self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> RepoResult<AppUser> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut user = load_required_user(&tx, username)?;
        password::check(old_password, &user.password_hash)?;
        if !is_valid_password(new_password) {
            return Err(ValidationError::PasswordTooShort.into());
        }

        let password_hash = password::salted_hash(new_password);
        tx.execute(
            "UPDATE app_users SET password_hash = ?2 WHERE username = ?1;",
            params![username, password_hash],
        )?;
        tx.commit()?;

        user.password_hash = password_hash;
        Ok(user)
    }

    fn reset_password(&mut self, username: &str, new_password: &str) -> RepoResult<AppUser> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut user = load_required_user(&tx, username)?;
        if !is_valid_password(new_password) {
            return Err(ValidationError::PasswordTooShort.into());
        }

        let password_hash = password::salted_hash(new_password);
        tx.execute(
            "UPDATE app_users SET password_hash = ?2 WHERE username = ?1;",
            params![username, password_hash],
        )?;
        tx.commit()?;

        user.password_hash = password_hash;
        Ok(user)
    }

    fn change_first_name(&mut self, username: &str, new_first_name: &str) -> RepoResult<AppUser> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut user = load_required_user(&tx, username)?;
        // No-op rejection takes precedence over the alphabetic rule.
        if new_first_name == user.first_name {
            return Err(ValidationError::SameFirstName.into());
        }
        if !is_all_letters(new_first_name) {
            return Err(ValidationError::NonAlphabeticFirstName.into());
        }

        tx.execute(
            "UPDATE app_users SET first_name = ?2 WHERE username = ?1;",
            params![username, new_first_name],
        )?;
        tx.commit()?;

        user.first_name = new_first_name.to_string();
        Ok(user)
    }

    fn change_last_name(&mut self, username: &str, new_last_name: &str) -> RepoResult<AppUser> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut user = load_required_user(&tx, username)?;
        if new_last_name == user.last_name {
            return Err(ValidationError::SameLastName.into());
        }
        if !is_all_letters(new_last_name) {
            return Err(ValidationError::NonAlphabeticLastName.into());
        }

        tx.execute(
            "UPDATE app_users SET last_name = ?2 WHERE username = ?1;",
            params![username, new_last_name],
        )?;
        tx.commit()?;

        user.last_name = new_last_name.to_string();
        Ok(user)
    }

    fn change_email(&mut self, username: &str, new_email: &str) -> RepoResult<AppUser> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut user = load_required_user(&tx, username)?;
        if !is_valid_email(new_email) {
            return Err(ValidationError::InvalidEmail.into());
        }

        tx.execute(
            "UPDATE app_users SET email = ?2 WHERE username = ?1;",
            params![username, new_email],
        )?;
        tx.commit()?;

        user.email = new_email.to_string();
        Ok(user)
    }

    fn delete_account(&mut self, username: &str) -> RepoResult<AppUser> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let user = load_required_user(&tx, username)?;
        // Foreign keys cascade the user's preferences and affinity rows.
        tx.execute("DELETE FROM app_users WHERE username = ?1;", [username])?;
        tx.commit()?;
        Ok(user)
    }

    fn list_all_users(&self) -> RepoResult<Vec<AppUser>> {
        let conn: &Connection = self.conn;
        let mut stmt = conn.prepare("SELECT username FROM app_users ORDER BY username ASC;")?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            let username: String = row.get(0)?;
            users.push(load_required_user(conn, &username)?);
        }

        if users.is_empty() {
            return Err(RepoError::EmptyListing("users"));
        }
        Ok(users)
    }

    fn count_users(&self) -> RepoResult<u64> {
        match self.list_all_users() {
            Ok(users) => Ok(users.len() as u64),
            Err(RepoError::EmptyListing(_)) => Ok(0),
            Err(err) => Err(err),
        }
    }

    fn set_default_preference(
        &mut self,
        username: &str,
        pid: PreferenceId,
    ) -> RepoResult<PreferenceId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !user_exists(&tx, username)? {
            return Err(RepoError::NotFound {
                entity: "user",
                key: username.to_string(),
            });
        }

        let owned: i64 = tx.query_row(
            "SELECT COUNT(*) FROM preferences WHERE pid = ?1 AND username = ?2;",
            params![pid, username],
            |row| row.get(0),
        )?;
        if owned != 1 {
            return Err(RepoError::NotFound {
                entity: "preference",
                key: pid.to_string(),
            });
        }

        tx.execute(
            "UPDATE app_users SET default_preference_id = ?1 WHERE username = ?2;",
            params![pid, username],
        )?;
        tx.commit()?;
        Ok(pid)
    }

    fn get_default_preference(&self, username: &str) -> RepoResult<Preference> {
        let conn: &Connection = self.conn;
        let user = load_required_user(conn, username)?;
        let no_default = || RepoError::NotFound {
            entity: "default preference",
            key: username.to_string(),
        };
        let pid = user.default_preference_id.ok_or_else(no_default)?;

        // An unset pointer and a dangling pointer read the same way.
        load_owned_preference(conn, username, pid)?.ok_or_else(no_default)
    }
}

/// Returns whether the account row exists (profile only, no set loading).
pub(crate) fn user_exists(conn: &Connection, username: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM app_users WHERE username = ?1);",
        [username],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Loads one full account snapshot, or `NotFound`.
pub(crate) fn load_required_user(conn: &Connection, username: &str) -> RepoResult<AppUser> {
    load_user(conn, username)?.ok_or_else(|| RepoError::NotFound {
        entity: "user",
        key: username.to_string(),
    })
}

fn load_user(conn: &Connection, username: &str) -> RepoResult<Option<AppUser>> {
    let mut stmt = conn.prepare(
        "SELECT
            username,
            first_name,
            last_name,
            email,
            password_hash,
            default_preference_id
         FROM app_users
         WHERE username = ?1;",
    )?;

    let mut rows = stmt.query([username])?;
    if let Some(row) = rows.next()? {
        let mut user = AppUser {
            username: row.get("username")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            email: row.get("email")?,
            password_hash: row.get("password_hash")?,
            default_preference_id: row.get("default_preference_id")?,
            liked: BTreeSet::new(),
            disliked: BTreeSet::new(),
            visited: BTreeSet::new(),
        };
        load_affinity_sets(conn, &mut user)?;
        return Ok(Some(user));
    }

    Ok(None)
}

fn load_affinity_sets(conn: &Connection, user: &mut AppUser) -> RepoResult<()> {
    let mut stmt = conn.prepare(
        "SELECT restaurant_id, kind FROM affinities WHERE username = ?1;",
    )?;
    let mut rows = stmt.query([user.username.as_str()])?;
    while let Some(row) = rows.next()? {
        let restaurant_id: String = row.get(0)?;
        let kind: String = row.get(1)?;
        match kind.as_str() {
            "liked" => user.liked.insert(restaurant_id),
            "disliked" => user.disliked.insert(restaurant_id),
            "visited" => user.visited.insert(restaurant_id),
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid affinity kind `{other}` in affinities.kind"
                )));
            }
        };
    }
    Ok(())
}

fn load_owned_preference(
    conn: &Connection,
    username: &str,
    pid: PreferenceId,
) -> RepoResult<Option<Preference>> {
    let mut stmt = conn.prepare(
        "SELECT pid, username, location, cuisine, price, sort_by
         FROM preferences
         WHERE pid = ?1 AND username = ?2;",
    )?;
    let mut rows = stmt.query(params![pid, username])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(Preference {
            pid: row.get("pid")?,
            username: row.get("username")?,
            location: row.get("location")?,
            cuisine: row.get("cuisine")?,
            price: row.get("price")?,
            sort_by: row.get("sort_by")?,
        }));
    }
    Ok(None)
}
