//! Task CRUD operations.

use super::{Database, now_iso};
use crate::types::Task;
use anyhow::{Result, anyhow};
use rusqlite::{Connection, Row, params};

/// Map a database row onto a `Task` record.
///
/// Databases created by older tooling may hold NULL `description` or
/// `updated_at` values; those are absorbed here (empty string, and
/// `created_at` respectively) so handlers only ever see a complete record.
pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let id: i64 = row.get("id")?;
    let title: String = row.get("title")?;
    let description: Option<String> = row.get("description")?;
    let completed: i64 = row.get("completed")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: Option<String> = row.get("updated_at")?;

    Ok(Task {
        id,
        title,
        description: description.unwrap_or_default(),
        completed: completed != 0,
        updated_at: updated_at.unwrap_or_else(|| created_at.clone()),
        created_at,
    })
}

/// Fetch a task by id using an existing connection.
fn get_task_internal(conn: &Connection, task_id: i64) -> Result<Option<Task>> {
    let mut stmt = conn.prepare("SELECT * FROM tasks WHERE id = ?1")?;

    let result = stmt.query_row(params![task_id], parse_task_row);

    match result {
        Ok(task) => Ok(Some(task)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// List all tasks, most recent first (ties broken by id descending).
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM tasks ORDER BY datetime(created_at) DESC, id DESC")?;
            let tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    /// Fetch a single task by id.
    pub fn get_task(&self, task_id: i64) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id))
    }

    /// Create a new task.
    ///
    /// The store assigns the id; both timestamps are stamped with the
    /// current time, so `created_at == updated_at` on the returned record.
    pub fn create_task(&self, title: &str, description: &str) -> Result<Task> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let now = now_iso();

            tx.execute(
                "INSERT INTO tasks (title, description, completed, created_at, updated_at)
                 VALUES (?1, ?2, 0, ?3, ?3)",
                params![title, description, now],
            )?;
            let task_id = tx.last_insert_rowid();

            let task = get_task_internal(&tx, task_id)?
                .ok_or_else(|| anyhow!("task {} missing after insert", task_id))?;

            tx.commit()?;
            Ok(task)
        })
    }

    /// Replace every mutable field of a task.
    ///
    /// Returns `None` when no task has the given id, checked before the
    /// write. `id` and `created_at` are untouched; `updated_at` is
    /// refreshed.
    pub fn replace_task(
        &self,
        task_id: i64,
        title: &str,
        description: &str,
        completed: bool,
    ) -> Result<Option<Task>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if get_task_internal(&tx, task_id)?.is_none() {
                return Ok(None);
            }

            tx.execute(
                "UPDATE tasks SET title = ?1, description = ?2, completed = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![title, description, completed, now_iso(), task_id],
            )?;

            let task = get_task_internal(&tx, task_id)?
                .ok_or_else(|| anyhow!("task {} missing after update", task_id))?;

            tx.commit()?;
            Ok(Some(task))
        })
    }

    /// Set the completion flag of a task, refreshing `updated_at` and
    /// leaving title and description untouched.
    ///
    /// Returns `None` when no task has the given id.
    pub fn set_completed(&self, task_id: i64, completed: bool) -> Result<Option<Task>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if get_task_internal(&tx, task_id)?.is_none() {
                return Ok(None);
            }

            tx.execute(
                "UPDATE tasks SET completed = ?1, updated_at = ?2 WHERE id = ?3",
                params![completed, now_iso(), task_id],
            )?;

            let task = get_task_internal(&tx, task_id)?
                .ok_or_else(|| anyhow!("task {} missing after update", task_id))?;

            tx.commit()?;
            Ok(Some(task))
        })
    }

    /// Delete a task permanently. Returns `false` when no row matched.
    pub fn delete_task(&self, task_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            Ok(deleted > 0)
        })
    }

    /// Count all tasks.
    pub fn count_tasks(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
            Ok(count)
        })
    }

    /// Verify the database answers a trivial query.
    pub fn ping(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
    }
}
