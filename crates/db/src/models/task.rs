//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetrack_core::patch::Patch;
use timetrack_core::types::{DbId, Timestamp};

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub project_id: DbId,
    pub finished: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a task. The project comes from the request path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// DTO for updating a task. All columns are NOT NULL, so `null` is rejected
/// before this reaches the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub finished: Patch<bool>,
}
