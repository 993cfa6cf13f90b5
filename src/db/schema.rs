//! Schema initialization and demo seeding for the tasks table.

use super::{Database, now_iso};
use anyhow::Result;
use rusqlite::params;

const CREATE_TASKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

/// Demo rows inserted into an empty database: (title, description, completed).
const DEMO_TASKS: &[(&str, &str, bool)] = &[
    (
        "Welcome to your To-Do List",
        "Try creating, editing, and completing tasks.",
        false,
    ),
    ("Sample completed task", "This one is already done.", true),
];

impl Database {
    /// Create the tasks table if it does not exist. Safe to call repeatedly.
    pub fn init_schema(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(CREATE_TASKS_TABLE, [])?;
            Ok(())
        })
    }

    /// Insert the demo tasks when the table is empty.
    ///
    /// Returns the number of rows inserted. A table that already holds any
    /// data is left untouched (returns 0), so repeated runs never duplicate
    /// the demos.
    pub fn seed_demo_tasks(&self) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let count: i64 = tx.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
            if count > 0 {
                return Ok(0);
            }

            let now = now_iso();
            for (title, description, completed) in DEMO_TASKS {
                tx.execute(
                    "INSERT INTO tasks (title, description, completed, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)",
                    params![title, description, completed, now],
                )?;
            }

            tx.commit()?;
            Ok(DEMO_TASKS.len())
        })
    }
}
