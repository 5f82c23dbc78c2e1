//! Restaurant catalog contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own global restaurant identity (id + name).
//! - Distinguish the strict create path (duplicate is a conflict) from the
//!   ensure path used by the affinity store (create-if-absent).
//!
//! # Invariants
//! - `restaurant_id` is unique catalog-wide.
//! - Deleting a catalog entry also removes it from every user's affinity
//!   sets (cascade).

use crate::model::restaurant::{validate_restaurant_fields, Restaurant};
use crate::model::ValidationError;
use crate::repo::readiness::{ensure_connection_ready, TableSpec};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, TransactionBehavior};

const RESTAURANT_TABLES: &[TableSpec] = &[TableSpec {
    table: "restaurants",
    columns: &["restaurant_id", "restaurant_name"],
}];

/// Repository interface for catalog operations.
pub trait RestaurantRepository {
    /// Strict create: fails with `Conflict` when the id is already known.
    fn create_restaurant(&mut self, id: &str, name: &str) -> RepoResult<Restaurant>;
    /// Create-if-absent: returns the stored entry unchanged when the id is
    /// already known.
    fn ensure_exists(&mut self, id: &str, name: &str) -> RepoResult<Restaurant>;
    /// Deletes by id when one matches, otherwise by name (lowest id wins).
    fn delete_restaurant(&mut self, name_or_id: &str) -> RepoResult<Restaurant>;
    /// Every catalog entry; an empty catalog is a normal result.
    fn get_all(&self) -> RepoResult<Vec<Restaurant>>;
}

/// SQLite-backed restaurant catalog.
pub struct SqliteRestaurantRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteRestaurantRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, RESTAURANT_TABLES)?;
        Ok(Self { conn })
    }
}

impl RestaurantRepository for SqliteRestaurantRepository<'_> {
    fn create_restaurant(&mut self, id: &str, name: &str) -> RepoResult<Restaurant> {
        validate_restaurant_fields(id, name)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if load_restaurant(&tx, id)?.is_some() {
            return Err(RepoError::Conflict {
                entity: "restaurant",
                key: id.to_string(),
            });
        }

        tx.execute(
            "INSERT INTO restaurants (restaurant_id, restaurant_name) VALUES (?1, ?2);",
            params![id, name],
        )?;
        tx.commit()?;

        Ok(Restaurant {
            restaurant_id: id.to_string(),
            restaurant_name: name.to_string(),
        })
    }

    fn ensure_exists(&mut self, id: &str, name: &str) -> RepoResult<Restaurant> {
        validate_restaurant_fields(id, name)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT OR IGNORE INTO restaurants (restaurant_id, restaurant_name)
             VALUES (?1, ?2);",
            params![id, name],
        )?;
        let restaurant = load_restaurant(&tx, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("restaurant `{id}` vanished during ensure"))
        })?;
        tx.commit()?;
        Ok(restaurant)
    }

    fn delete_restaurant(&mut self, name_or_id: &str) -> RepoResult<Restaurant> {
        if name_or_id.is_empty() {
            return Err(ValidationError::EmptyRestaurantField.into());
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let restaurant = match load_restaurant(&tx, name_or_id)? {
            Some(found) => found,
            None => load_restaurant_by_name(&tx, name_or_id)?.ok_or_else(|| {
                RepoError::NotFound {
                    entity: "restaurant",
                    key: name_or_id.to_string(),
                }
            })?,
        };

        // Affinity rows referencing the entry cascade with it.
        tx.execute(
            "DELETE FROM restaurants WHERE restaurant_id = ?1;",
            [restaurant.restaurant_id.as_str()],
        )?;
        tx.commit()?;
        Ok(restaurant)
    }

    fn get_all(&self) -> RepoResult<Vec<Restaurant>> {
        let conn: &Connection = self.conn;
        let mut stmt = conn.prepare(
            "SELECT restaurant_id, restaurant_name
             FROM restaurants
             ORDER BY restaurant_id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut restaurants = Vec::new();
        while let Some(row) = rows.next()? {
            restaurants.push(Restaurant {
                restaurant_id: row.get(0)?,
                restaurant_name: row.get(1)?,
            });
        }
        Ok(restaurants)
    }
}

/// Loads one catalog entry by id.
pub(crate) fn load_restaurant(
    conn: &Connection,
    restaurant_id: &str,
) -> RepoResult<Option<Restaurant>> {
    let mut stmt = conn.prepare(
        "SELECT restaurant_id, restaurant_name
         FROM restaurants
         WHERE restaurant_id = ?1;",
    )?;
    let mut rows = stmt.query([restaurant_id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(Restaurant {
            restaurant_id: row.get(0)?,
            restaurant_name: row.get(1)?,
        }));
    }
    Ok(None)
}

fn load_restaurant_by_name(conn: &Connection, name: &str) -> RepoResult<Option<Restaurant>> {
    let mut stmt = conn.prepare(
        "SELECT restaurant_id, restaurant_name
         FROM restaurants
         WHERE restaurant_name = ?1
         ORDER BY restaurant_id ASC
         LIMIT 1;",
    )?;
    let mut rows = stmt.query([name])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(Restaurant {
            restaurant_id: row.get(0)?,
            restaurant_name: row.get(1)?,
        }));
    }
    Ok(None)
}
