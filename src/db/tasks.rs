//! Task CRUD operations.

use super::{Database, now_timestamp};
use crate::types::{Task, TaskId, TaskInput};
use anyhow::Result;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

const TASK_COLUMNS: &str = "id, title, description, completed, created_at, updated_at";

/// Read a stored flag regardless of how it was encoded.
///
/// Rows written by this crate always hold 0/1, but the column has BOOLEAN
/// affinity and older databases may carry text or real values.
fn flag_from_sql(value: ValueRef<'_>) -> bool {
    match value {
        ValueRef::Null => false,
        ValueRef::Integer(i) => i != 0,
        ValueRef::Real(f) => f != 0.0,
        ValueRef::Text(t) => {
            let t = String::from_utf8_lossy(t);
            let t = t.trim();
            !(t.is_empty() || t == "0" || t.eq_ignore_ascii_case("false"))
        }
        ValueRef::Blob(b) => !b.is_empty(),
    }
}

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let description: Option<String> = row.get("description")?;
    let created_at: Option<String> = row.get("created_at")?;
    let updated_at: Option<String> = row.get("updated_at")?;

    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: description.unwrap_or_default(),
        completed: flag_from_sql(row.get_ref("completed")?),
        created_at: created_at.unwrap_or_default(),
        updated_at: updated_at.unwrap_or_default(),
    })
}

/// Internal helper to get a task using an existing connection (avoids deadlock).
fn get_task_internal(conn: &Connection, task_id: TaskId) -> Result<Option<Task>> {
    let task = conn
        .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
            params![task_id],
            parse_task_row,
        )
        .optional()?;
    Ok(task)
}

impl Database {
    /// Create a new task and return the stored row.
    pub fn create_task(&self, input: &TaskInput) -> Result<Task> {
        self.with_conn(|conn| {
            let now = now_timestamp();
            conn.execute(
                "INSERT INTO tasks (title, description, completed, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![input.title(), input.description(), input.completed(), now],
            )?;
            let task_id = conn.last_insert_rowid();
            debug!(task_id, "Inserted task");

            get_task_internal(conn, task_id)?
                .ok_or_else(|| anyhow::anyhow!("Inserted task {} could not be read back", task_id))
        })
    }

    /// Get a task by ID.
    pub fn get_task(&self, task_id: TaskId) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id))
    }

    /// List all tasks, newest first.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, id DESC"
            ))?;
            let tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tasks)
        })
    }

    /// Overwrite a task's mutable fields and return the updated row.
    ///
    /// Returns `Ok(None)` when no task has the given id; nothing is written
    /// in that case.
    pub fn update_task(&self, task_id: TaskId, input: &TaskInput) -> Result<Option<Task>> {
        self.with_conn(|conn| {
            // MAX keeps updated_at monotonic if the wall clock steps backwards.
            let affected = conn.execute(
                "UPDATE tasks
                 SET title = ?1, description = ?2, completed = ?3,
                     updated_at = MAX(updated_at, ?4)
                 WHERE id = ?5",
                params![
                    input.title(),
                    input.description(),
                    input.completed(),
                    now_timestamp(),
                    task_id
                ],
            )?;

            if affected == 0 {
                debug!(task_id, "Update matched no task");
                return Ok(None);
            }
            debug!(task_id, "Updated task");

            get_task_internal(conn, task_id)
        })
    }

    /// Delete a task. Returns `false` when no task had the given id.
    pub fn delete_task(&self, task_id: TaskId) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            debug!(task_id, deleted = affected > 0, "Delete task");
            Ok(affected > 0)
        })
    }

    /// Number of stored tasks.
    pub fn count_tasks(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
            Ok(count)
        })
    }
}
