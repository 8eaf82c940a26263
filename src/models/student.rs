// src/models/student.rs

use serde::{Deserialize, Serialize};

/// Represents the 'students' table in the database.
/// Owned by the user-management subsystem, read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub username: String,
    pub email: String,
}
