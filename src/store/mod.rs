// src/store/mod.rs

//! Read access to attempt data.
//!
//! The dashboard only ever talks to a [`DashboardStore`]; the Postgres
//! implementation is what runs in production, the in-memory one backs the
//! tests and local runs without a database.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    error::AppError,
    models::{
        attempt::AttemptStatus,
        dashboard::{AttemptLeader, PassedLeader, StudentAttemptRecord, StudentSummary},
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgDashboardStore;

/// One method per parameterized aggregate query.
///
/// `limit` is already non-negative when it gets here.
#[async_trait]
pub trait DashboardStore: Send + Sync {
    /// Per-student attempt summary, ordered by username.
    async fn student_summaries(&self) -> Result<Vec<StudentSummary>, AppError>;

    /// Attempts of one student, newest first.
    async fn attempts_for_student(&self, student_id: i64)
    -> Result<Vec<StudentAttemptRecord>, AppError>;

    /// Students ranked by attempt count, then username.
    async fn top_by_attempts(&self, limit: i64) -> Result<Vec<AttemptLeader>, AppError>;

    /// Students ranked by attempts with `status` and `score >= min_score`, then username.
    async fn top_by_passed(
        &self,
        status: AttemptStatus,
        min_score: Decimal,
        limit: i64,
    ) -> Result<Vec<PassedLeader>, AppError>;
}
