//! Core types for the to-do task API.

use serde::{Deserialize, Serialize};

/// A to-do task as stored and served.
///
/// Timestamps are ISO-8601 strings with second precision in UTC
/// (e.g. `2026-08-23T09:15:04+00:00`). `created_at` is set once;
/// `updated_at` is refreshed by every mutation and equals `created_at`
/// right after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}
