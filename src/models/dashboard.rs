// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::attempt::AttemptStatus;

/// One row of the teacher's student overview.
/// Only students with at least one attempt show up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub student_id: i64,
    pub username: String,
    pub email: String,
    pub attempt_count: i64,

    /// Latest submission across all attempts, `None` if nothing was submitted.
    pub last_submitted_at: Option<DateTime<Utc>>,

    /// Average over scored attempts; unscored attempts are skipped.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub average_score: Option<Decimal>,
}

/// A single attempt as listed in a student's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttemptRecord {
    pub attempt_id: i64,
    pub quiz_id: i64,
    pub quiz_title: String,
    pub quiz_category: i32,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub status: AttemptStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_points: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub earned_points: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub score: Option<Decimal>,
}

/// Leaderboard entry ranked by number of attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptLeader {
    pub student_id: i64,
    pub username: String,
    pub attempt_count: i64,
}

/// Leaderboard entry ranked by number of passed attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassedLeader {
    pub student_id: i64,
    pub username: String,
    pub passed_count: i64,
}
