// src/models/attempt.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle of a quiz attempt, stored as text in `quiz_attempts.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    InProgress,
    Submitted,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::InProgress => "IN_PROGRESS",
            AttemptStatus::Submitted => "SUBMITTED",
        }
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttemptStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" => Ok(AttemptStatus::InProgress),
            "SUBMITTED" => Ok(AttemptStatus::Submitted),
            other => Err(format!("unknown attempt status '{}'", other)),
        }
    }
}

/// Represents the 'quiz_attempts' table in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: i64,
    pub student_id: i64,
    pub quiz_id: i64,
    pub started_at: DateTime<Utc>,

    /// `None` while the attempt is still in progress.
    pub submitted_at: Option<DateTime<Utc>>,
    pub status: AttemptStatus,
    pub max_points: Decimal,
    pub earned_points: Decimal,

    /// Normalized score, only set once graded.
    pub score: Option<Decimal>,
}
