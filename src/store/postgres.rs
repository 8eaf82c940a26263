// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use super::DashboardStore;
use crate::{
    error::AppError,
    models::{
        attempt::AttemptStatus,
        dashboard::{AttemptLeader, PassedLeader, StudentAttemptRecord, StudentSummary},
    },
};

const STUDENT_SUMMARIES_SQL: &str = r#"
    SELECT
        s.id AS student_id,
        s.username,
        s.email,
        COUNT(a.id) AS attempt_count,
        MAX(a.submitted_at) AS last_submitted_at,
        AVG(a.score) AS average_score
    FROM quiz_attempts a
    JOIN students s ON a.student_id = s.id
    GROUP BY s.id, s.username, s.email
    ORDER BY s.username COLLATE "C" ASC
"#;

const ATTEMPTS_FOR_STUDENT_SQL: &str = r#"
    SELECT
        a.id AS attempt_id,
        q.id AS quiz_id,
        q.title AS quiz_title,
        q.category AS quiz_category,
        a.started_at,
        a.submitted_at,
        a.status,
        a.max_points,
        a.earned_points,
        a.score
    FROM quiz_attempts a
    JOIN quizzes q ON a.quiz_id = q.id
    WHERE a.student_id = $1
    ORDER BY a.started_at DESC, a.id DESC
"#;

const TOP_BY_ATTEMPTS_SQL: &str = r#"
    SELECT
        s.id AS student_id,
        s.username,
        COUNT(a.id) AS attempt_count
    FROM quiz_attempts a
    JOIN students s ON a.student_id = s.id
    GROUP BY s.id, s.username
    ORDER BY COUNT(a.id) DESC, s.username COLLATE "C" ASC
    LIMIT $1
"#;

const TOP_BY_PASSED_SQL: &str = r#"
    SELECT
        s.id AS student_id,
        s.username,
        COUNT(a.id) AS passed_count
    FROM quiz_attempts a
    JOIN students s ON a.student_id = s.id
    WHERE a.status = $1
      AND a.score IS NOT NULL
      AND a.score >= $2
    GROUP BY s.id, s.username
    ORDER BY COUNT(a.id) DESC, s.username COLLATE "C" ASC
    LIMIT $3
"#;

/// Raw row of [`STUDENT_SUMMARIES_SQL`].
#[derive(FromRow)]
struct StudentSummaryRow {
    student_id: i64,
    username: String,
    email: String,
    attempt_count: i64,
    last_submitted_at: Option<DateTime<Utc>>,
    average_score: Option<Decimal>,
}

impl From<StudentSummaryRow> for StudentSummary {
    fn from(row: StudentSummaryRow) -> Self {
        StudentSummary {
            student_id: row.student_id,
            username: row.username,
            email: row.email,
            attempt_count: row.attempt_count,
            last_submitted_at: row.last_submitted_at,
            average_score: row.average_score,
        }
    }
}

/// Raw row of [`ATTEMPTS_FOR_STUDENT_SQL`]. Status comes back as text.
#[derive(FromRow)]
struct AttemptRow {
    attempt_id: i64,
    quiz_id: i64,
    quiz_title: String,
    quiz_category: i32,
    started_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
    status: String,
    max_points: Decimal,
    earned_points: Decimal,
    score: Option<Decimal>,
}

impl TryFrom<AttemptRow> for StudentAttemptRecord {
    type Error = AppError;

    fn try_from(row: AttemptRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<AttemptStatus>().map_err(|e| {
            AppError::RowMapping(format!("attempt {}: {}", row.attempt_id, e))
        })?;

        Ok(StudentAttemptRecord {
            attempt_id: row.attempt_id,
            quiz_id: row.quiz_id,
            quiz_title: row.quiz_title,
            quiz_category: row.quiz_category,
            started_at: row.started_at,
            submitted_at: row.submitted_at,
            status,
            max_points: row.max_points,
            earned_points: row.earned_points,
            score: row.score,
        })
    }
}

#[derive(FromRow)]
struct AttemptLeaderRow {
    student_id: i64,
    username: String,
    attempt_count: i64,
}

impl From<AttemptLeaderRow> for AttemptLeader {
    fn from(row: AttemptLeaderRow) -> Self {
        AttemptLeader {
            student_id: row.student_id,
            username: row.username,
            attempt_count: row.attempt_count,
        }
    }
}

#[derive(FromRow)]
struct PassedRow {
    student_id: i64,
    username: String,
    passed_count: i64,
}

impl From<PassedRow> for PassedLeader {
    fn from(row: PassedRow) -> Self {
        PassedLeader {
            student_id: row.student_id,
            username: row.username,
            passed_count: row.passed_count,
        }
    }
}

/// Postgres-backed store. Every query is a single round trip on the pool.
#[derive(Clone)]
pub struct PgDashboardStore {
    pool: PgPool,
}

impl PgDashboardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardStore for PgDashboardStore {
    async fn student_summaries(&self) -> Result<Vec<StudentSummary>, AppError> {
        tracing::debug!(sql = STUDENT_SUMMARIES_SQL, "Executing query");
        let rows: Vec<StudentSummaryRow> = sqlx::query_as(STUDENT_SUMMARIES_SQL)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(StudentSummary::from).collect())
    }

    async fn attempts_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentAttemptRecord>, AppError> {
        tracing::debug!(sql = ATTEMPTS_FOR_STUDENT_SQL, student_id, "Executing query");
        let rows: Vec<AttemptRow> = sqlx::query_as(ATTEMPTS_FOR_STUDENT_SQL)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(StudentAttemptRecord::try_from).collect()
    }

    async fn top_by_attempts(&self, limit: i64) -> Result<Vec<AttemptLeader>, AppError> {
        tracing::debug!(sql = TOP_BY_ATTEMPTS_SQL, limit, "Executing query");
        let rows: Vec<AttemptLeaderRow> = sqlx::query_as(TOP_BY_ATTEMPTS_SQL)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(AttemptLeader::from).collect())
    }

    async fn top_by_passed(
        &self,
        status: AttemptStatus,
        min_score: Decimal,
        limit: i64,
    ) -> Result<Vec<PassedLeader>, AppError> {
        tracing::debug!(sql = TOP_BY_PASSED_SQL, %status, %min_score, limit, "Executing query");
        let rows: Vec<PassedRow> = sqlx::query_as(TOP_BY_PASSED_SQL)
            .bind(status.as_str())
            .bind(min_score)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PassedLeader::from).collect())
    }
}
