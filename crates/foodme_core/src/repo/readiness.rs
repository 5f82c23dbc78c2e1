//! Connection readiness guard shared by every repository.
//!
//! # Responsibility
//! - Verify schema version and required tables/columns before a repository
//!   accepts a connection.
//!
//! # Invariants
//! - A repository never issues application queries over an unmigrated or
//!   partially migrated connection.

use crate::db::migrations::{current_user_version, latest_version};
use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;

/// Tables and columns one repository depends on.
pub(crate) struct TableSpec {
    pub table: &'static str,
    pub columns: &'static [&'static str],
}

/// Fails unless the connection is fully migrated and every listed
/// table/column is present.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    specs: &[TableSpec],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for spec in specs {
        if !table_exists(conn, spec.table)? {
            return Err(RepoError::MissingRequiredTable(spec.table));
        }
        for column in spec.columns {
            if !table_has_column(conn, spec.table, column)? {
                return Err(RepoError::MissingRequiredColumn {
                    table: spec.table,
                    column,
                });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
