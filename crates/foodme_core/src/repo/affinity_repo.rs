//! Affinity store: per-user liked/disliked/visited restaurant sets.
//!
//! # Responsibility
//! - Maintain the three membership sets between accounts and catalog
//!   entries.
//! - Enforce the liked/disliked mutual-exclusion invariant inside one
//!   transaction per call.
//!
//! # Invariants
//! - A restaurant id is never in both the liked and disliked set of the
//!   same user, not even transiently for a subsequent reader.
//! - Adding to a set is idempotent; `visited` is set-only.
//! - The restaurant itself is never mutated by affinity operations.

use crate::model::restaurant::{validate_restaurant_fields, Restaurant};
use crate::model::ValidationError;
use crate::repo::readiness::{ensure_connection_ready, TableSpec};
use crate::repo::restaurant_repo::load_restaurant;
use crate::repo::user_repo::user_exists;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

const AFFINITY_TABLES: &[TableSpec] = &[
    TableSpec {
        table: "affinities",
        columns: &["username", "restaurant_id", "kind"],
    },
    TableSpec {
        table: "restaurants",
        columns: &["restaurant_id", "restaurant_name"],
    },
    TableSpec {
        table: "app_users",
        columns: &["username"],
    },
];

/// Membership set selector inside the `affinities` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AffinityKind {
    Liked,
    Disliked,
    Visited,
}

impl AffinityKind {
    fn as_db(self) -> &'static str {
        match self {
            Self::Liked => "liked",
            Self::Disliked => "disliked",
            Self::Visited => "visited",
        }
    }

    /// The mutually exclusive counterpart set, when one exists.
    fn opposite(self) -> Option<Self> {
        match self {
            Self::Liked => Some(Self::Disliked),
            Self::Disliked => Some(Self::Liked),
            Self::Visited => None,
        }
    }
}

/// Repository interface for affinity-set operations.
pub trait AffinityRepository {
    /// Ensures the restaurant exists, then puts it on the liked list,
    /// pulling it off the disliked list when present. Idempotent.
    fn add_liked(
        &mut self,
        username: &str,
        restaurant_id: &str,
        restaurant_name: &str,
    ) -> RepoResult<Restaurant>;
    /// Symmetric to `add_liked`.
    fn add_disliked(
        &mut self,
        username: &str,
        restaurant_id: &str,
        restaurant_name: &str,
    ) -> RepoResult<Restaurant>;
    /// Independent set: no exclusivity with liked/disliked, never unset.
    fn add_visited(
        &mut self,
        username: &str,
        restaurant_id: &str,
        restaurant_name: &str,
    ) -> RepoResult<Restaurant>;
    /// Fails with a validation error when the id is not on the liked list.
    fn remove_liked(&mut self, username: &str, restaurant_id: &str) -> RepoResult<Restaurant>;
    fn remove_disliked(&mut self, username: &str, restaurant_id: &str) -> RepoResult<Restaurant>;
    /// Liked ids of one user; empty is a normal result, not an error.
    fn list_all_liked(&self, username: &str) -> RepoResult<Vec<String>>;
    fn list_all_disliked(&self, username: &str) -> RepoResult<Vec<String>>;
}

/// SQLite-backed affinity store.
pub struct SqliteAffinityRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteAffinityRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, AFFINITY_TABLES)?;
        Ok(Self { conn })
    }

    fn add(
        &mut self,
        username: &str,
        restaurant_id: &str,
        restaurant_name: &str,
        kind: AffinityKind,
    ) -> RepoResult<Restaurant> {
        validate_restaurant_fields(restaurant_id, restaurant_name)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_user_in_tx(&tx, username)?;

        // Catalog ensure path: create-if-absent, an existing entry keeps
        // its stored name.
        tx.execute(
            "INSERT OR IGNORE INTO restaurants (restaurant_id, restaurant_name)
             VALUES (?1, ?2);",
            params![restaurant_id, restaurant_name],
        )?;

        if let Some(opposite) = kind.opposite() {
            tx.execute(
                "DELETE FROM affinities
                 WHERE username = ?1 AND restaurant_id = ?2 AND kind = ?3;",
                params![username, restaurant_id, opposite.as_db()],
            )?;
        }
        tx.execute(
            "INSERT OR IGNORE INTO affinities (username, restaurant_id, kind)
             VALUES (?1, ?2, ?3);",
            params![username, restaurant_id, kind.as_db()],
        )?;

        let restaurant = load_restaurant(&tx, restaurant_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "restaurant `{restaurant_id}` vanished during affinity insert"
            ))
        })?;
        tx.commit()?;
        Ok(restaurant)
    }

    fn remove(
        &mut self,
        username: &str,
        restaurant_id: &str,
        kind: AffinityKind,
    ) -> RepoResult<Restaurant> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_user_in_tx(&tx, username)?;

        let restaurant = load_restaurant(&tx, restaurant_id)?;
        let changed = tx.execute(
            "DELETE FROM affinities
             WHERE username = ?1 AND restaurant_id = ?2 AND kind = ?3;",
            params![username, restaurant_id, kind.as_db()],
        )?;
        if changed == 0 {
            return Err(not_on_list_error(kind, restaurant_id));
        }

        // The FK guarantees a catalog row behind every affinity row.
        let restaurant = restaurant.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "affinity row without catalog entry for `{restaurant_id}`"
            ))
        })?;
        tx.commit()?;
        Ok(restaurant)
    }

    fn list(&self, username: &str, kind: AffinityKind) -> RepoResult<Vec<String>> {
        let conn: &Connection = self.conn;
        if !user_exists(conn, username)? {
            return Err(RepoError::NotFound {
                entity: "user",
                key: username.to_string(),
            });
        }

        let mut stmt = conn.prepare(
            "SELECT restaurant_id
             FROM affinities
             WHERE username = ?1 AND kind = ?2
             ORDER BY restaurant_id ASC;",
        )?;
        let mut rows = stmt.query(params![username, kind.as_db()])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get(0)?);
        }
        Ok(ids)
    }
}

impl AffinityRepository for SqliteAffinityRepository<'_> {
    fn add_liked(
        &mut self,
        username: &str,
        restaurant_id: &str,
        restaurant_name: &str,
    ) -> RepoResult<Restaurant> {
        self.add(username, restaurant_id, restaurant_name, AffinityKind::Liked)
    }

    fn add_disliked(
        &mut self,
        username: &str,
        restaurant_id: &str,
        restaurant_name: &str,
    ) -> RepoResult<Restaurant> {
        self.add(
            username,
            restaurant_id,
            restaurant_name,
            AffinityKind::Disliked,
        )
    }

    fn add_visited(
        &mut self,
        username: &str,
        restaurant_id: &str,
        restaurant_name: &str,
    ) -> RepoResult<Restaurant> {
        self.add(
            username,
            restaurant_id,
            restaurant_name,
            AffinityKind::Visited,
        )
    }

    fn remove_liked(&mut self, username: &str, restaurant_id: &str) -> RepoResult<Restaurant> {
        self.remove(username, restaurant_id, AffinityKind::Liked)
    }

    fn remove_disliked(&mut self, username: &str, restaurant_id: &str) -> RepoResult<Restaurant> {
        self.remove(username, restaurant_id, AffinityKind::Disliked)
    }

    fn list_all_liked(&self, username: &str) -> RepoResult<Vec<String>> {
        self.list(username, AffinityKind::Liked)
    }

    fn list_all_disliked(&self, username: &str) -> RepoResult<Vec<String>> {
        self.list(username, AffinityKind::Disliked)
    }
}

fn ensure_user_in_tx(tx: &Transaction<'_>, username: &str) -> RepoResult<()> {
    if !user_exists(tx, username)? {
        return Err(RepoError::NotFound {
            entity: "user",
            key: username.to_string(),
        });
    }
    Ok(())
}

fn not_on_list_error(kind: AffinityKind, restaurant_id: &str) -> RepoError {
    let id = restaurant_id.to_string();
    match kind {
        AffinityKind::Disliked => ValidationError::NotOnDislikedList(id).into(),
        _ => ValidationError::NotOnLikedList(id).into(),
    }
}
