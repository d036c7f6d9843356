//! Schema initialization and introspection.

use super::{Database, embedded};
use anyhow::Result;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Information about a table column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default_value: Option<String>,
    pub primary_key: bool,
}

impl Database {
    /// Ensure the task table exists.
    ///
    /// Runs the embedded migrations; already-applied migrations are skipped, so
    /// calling this repeatedly is a no-op. A `tasks` table created before
    /// migrations were tracked is adopted as-is.
    pub fn ensure_schema(&self) -> Result<()> {
        self.with_conn_mut(|conn| {
            let report = embedded::migrations::runner().run(conn)?;
            let applied = report.applied_migrations();
            if applied.is_empty() {
                debug!("Schema up to date");
            } else {
                for migration in applied {
                    info!(version = migration.version(), name = %migration.name(), "Applied migration");
                }
            }
            Ok(())
        })
    }

    /// Get column information for a table.
    pub fn table_columns(&self, table_name: &str) -> Result<Vec<ColumnInfo>> {
        self.with_conn(|conn| table_columns(conn, table_name))
    }

    /// Get a list of user table names (excludes SQLite and migration bookkeeping).
    pub fn table_names(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table'
                 AND name NOT LIKE 'sqlite_%'
                 AND name NOT LIKE 'refinery_%'
                 ORDER BY name",
            )?;

            let names: Vec<String> = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(names)
        })
    }
}

fn table_columns(conn: &Connection, table_name: &str) -> Result<Vec<ColumnInfo>> {
    let mut stmt = conn.prepare("SELECT * FROM pragma_table_info(?1)")?;

    let columns: Vec<ColumnInfo> = stmt
        .query_map([table_name], |row| {
            Ok(ColumnInfo {
                name: row.get("name")?,
                data_type: row.get::<_, String>("type")?.to_uppercase(),
                nullable: row.get::<_, i32>("notnull")? == 0,
                default_value: row.get("dflt_value")?,
                primary_key: row.get::<_, i32>("pk")? > 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(columns)
}
