// src/models/quiz.rs

use serde::{Deserialize, Serialize};

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,

    /// Grading period the quiz belongs to (first, second, third cut...).
    pub category: i32,
}
