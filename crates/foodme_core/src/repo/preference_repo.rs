//! Preference store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own `Preference` entities scoped to exactly one account.
//! - Enforce ownership on edit/delete and keep the owner's default pointer
//!   consistent when a preference disappears.
//!
//! # Invariants
//! - Every preference references an existing account at creation time.
//! - Deleting a preference clears a default pointer aimed at it, in the
//!   same transaction.
//! - Listing operations treat an empty result set as an error; single-item
//!   lookups report `NotFound` only for the missing item.

use crate::model::preference::{validate_preference_fields, Preference, PreferenceId};
use crate::repo::readiness::{ensure_connection_ready, TableSpec};
use crate::repo::user_repo::user_exists;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, TransactionBehavior};

const PREFERENCE_TABLES: &[TableSpec] = &[
    TableSpec {
        table: "preferences",
        columns: &["pid", "username", "location", "cuisine", "price", "sort_by"],
    },
    TableSpec {
        table: "app_users",
        columns: &["username", "default_preference_id"],
    },
];

/// Repository interface for preference operations.
pub trait PreferenceRepository {
    /// Creates a preference for an existing account and returns it with
    /// its freshly assigned id. Duplicate content is allowed.
    fn create_preference(
        &mut self,
        username: &str,
        location: &str,
        cuisine: &str,
        price: &str,
        sort_by: &str,
    ) -> RepoResult<Preference>;
    /// Overwrites all categorical fields of an owned preference.
    fn edit_preference(
        &mut self,
        username: &str,
        pid: PreferenceId,
        location: &str,
        cuisine: &str,
        price: &str,
        sort_by: &str,
    ) -> RepoResult<Preference>;
    /// Deletes an owned preference and returns its last snapshot.
    fn delete_preference(&mut self, username: &str, pid: PreferenceId) -> RepoResult<Preference>;
    fn get_preference(&self, pid: PreferenceId) -> RepoResult<Preference>;
    /// Every preference in the store; empty is an error.
    fn list_all(&self) -> RepoResult<Vec<Preference>>;
    /// Every preference of one user; empty is an error.
    fn list_for_user(&self, username: &str) -> RepoResult<Vec<Preference>>;
}

/// SQLite-backed preference store.
pub struct SqlitePreferenceRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePreferenceRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, PREFERENCE_TABLES)?;
        Ok(Self { conn })
    }
}

impl PreferenceRepository for SqlitePreferenceRepository<'_> {
    fn create_preference(
        &mut self,
        username: &str,
        location: &str,
        cuisine: &str,
        price: &str,
        sort_by: &str,
    ) -> RepoResult<Preference> {
        validate_preference_fields(location, cuisine, price, sort_by)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !user_exists(&tx, username)? {
            return Err(RepoError::NotFound {
                entity: "user",
                key: username.to_string(),
            });
        }

        tx.execute(
            "INSERT INTO preferences (username, location, cuisine, price, sort_by)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![username, location, cuisine, price, sort_by],
        )?;
        let pid = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Preference {
            pid,
            username: username.to_string(),
            location: location.to_string(),
            cuisine: cuisine.to_string(),
            price: price.to_string(),
            sort_by: sort_by.to_string(),
        })
    }

    fn edit_preference(
        &mut self,
        username: &str,
        pid: PreferenceId,
        location: &str,
        cuisine: &str,
        price: &str,
        sort_by: &str,
    ) -> RepoResult<Preference> {
        validate_preference_fields(location, cuisine, price, sort_by)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current = load_required_preference(&tx, pid)?;
        ensure_owned_by(&current, username)?;

        tx.execute(
            "UPDATE preferences
             SET location = ?2, cuisine = ?3, price = ?4, sort_by = ?5
             WHERE pid = ?1;",
            params![pid, location, cuisine, price, sort_by],
        )?;
        tx.commit()?;

        Ok(Preference {
            pid,
            username: current.username,
            location: location.to_string(),
            cuisine: cuisine.to_string(),
            price: price.to_string(),
            sort_by: sort_by.to_string(),
        })
    }

    fn delete_preference(&mut self, username: &str, pid: PreferenceId) -> RepoResult<Preference> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let preference = load_required_preference(&tx, pid)?;
        ensure_owned_by(&preference, username)?;

        // Clear a default pointer aimed at the row being deleted so no
        // dangling reference survives the transaction.
        tx.execute(
            "UPDATE app_users
             SET default_preference_id = NULL
             WHERE username = ?1 AND default_preference_id = ?2;",
            params![username, pid],
        )?;
        tx.execute("DELETE FROM preferences WHERE pid = ?1;", [pid])?;
        tx.commit()?;

        Ok(preference)
    }

    fn get_preference(&self, pid: PreferenceId) -> RepoResult<Preference> {
        load_required_preference(self.conn, pid)
    }

    fn list_all(&self) -> RepoResult<Vec<Preference>> {
        let conn: &Connection = self.conn;
        let mut stmt = conn.prepare(&format!("{PREFERENCE_SELECT_SQL} ORDER BY pid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut preferences = Vec::new();
        while let Some(row) = rows.next()? {
            preferences.push(parse_preference_row(row)?);
        }

        if preferences.is_empty() {
            return Err(RepoError::EmptyListing("preferences"));
        }
        Ok(preferences)
    }

    fn list_for_user(&self, username: &str) -> RepoResult<Vec<Preference>> {
        let conn: &Connection = self.conn;
        let mut stmt = conn.prepare(&format!(
            "{PREFERENCE_SELECT_SQL} WHERE username = ?1 ORDER BY pid ASC;"
        ))?;
        let mut rows = stmt.query([username])?;
        let mut preferences = Vec::new();
        while let Some(row) = rows.next()? {
            preferences.push(parse_preference_row(row)?);
        }

        if preferences.is_empty() {
            return Err(RepoError::EmptyListing("preferences for user"));
        }
        Ok(preferences)
    }
}

const PREFERENCE_SELECT_SQL: &str = "SELECT
    pid,
    username,
    location,
    cuisine,
    price,
    sort_by
FROM preferences";

fn parse_preference_row(row: &rusqlite::Row<'_>) -> RepoResult<Preference> {
    Ok(Preference {
        pid: row.get("pid")?,
        username: row.get("username")?,
        location: row.get("location")?,
        cuisine: row.get("cuisine")?,
        price: row.get("price")?,
        sort_by: row.get("sort_by")?,
    })
}

fn load_required_preference(conn: &Connection, pid: PreferenceId) -> RepoResult<Preference> {
    let mut stmt = conn.prepare(&format!("{PREFERENCE_SELECT_SQL} WHERE pid = ?1;"))?;
    let mut rows = stmt.query([pid])?;
    if let Some(row) = rows.next()? {
        return parse_preference_row(row);
    }
    Err(RepoError::NotFound {
        entity: "preference",
        key: pid.to_string(),
    })
}

fn ensure_owned_by(preference: &Preference, username: &str) -> RepoResult<()> {
    if preference.username != username {
        return Err(RepoError::Authorization {
            entity: "preference",
            key: preference.pid.to_string(),
            username: username.to_string(),
        });
    }
    Ok(())
}
