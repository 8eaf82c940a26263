// src/services/dashboard.rs

use std::{error::Error as StdError, future::Future, sync::Arc};

use rust_decimal::Decimal;

use crate::{
    error::AppError,
    models::{
        attempt::AttemptStatus,
        dashboard::{AttemptLeader, PassedLeader, StudentAttemptRecord, StudentSummary},
    },
    store::DashboardStore,
};

/// Read-only reporting for the teacher dashboard.
///
/// Holds its store explicitly; cloning shares the same handle.
/// Failures are logged and handed back untouched, never retried.
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn DashboardStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn DashboardStore>) -> Self {
        Self { store }
    }

    /// Every student with at least one attempt, by username.
    pub async fn list_students_with_attempts(&self) -> Result<Vec<StudentSummary>, AppError> {
        logged("list_students_with_attempts", String::new(), self.store.student_summaries()).await
    }

    /// Attempt history of one student, newest first. Unknown ids yield an empty list.
    pub async fn list_attempts_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentAttemptRecord>, AppError> {
        logged(
            "list_attempts_for_student",
            format!("student_id={}", student_id),
            self.store.attempts_for_student(student_id),
        )
        .await
    }

    /// Top `limit` students by attempt count. A non-positive limit gives an empty list.
    pub async fn top_students_by_attempts(
        &self,
        limit: i64,
    ) -> Result<Vec<AttemptLeader>, AppError> {
        let limit = limit.max(0);
        logged(
            "top_students_by_attempts",
            format!("limit={}", limit),
            self.store.top_by_attempts(limit),
        )
        .await
    }

    /// Top `limit` students by submitted attempts scoring at least `min_score`.
    pub async fn top_students_by_passed_quizzes(
        &self,
        min_score: Decimal,
        limit: i64,
    ) -> Result<Vec<PassedLeader>, AppError> {
        let limit = limit.max(0);
        logged(
            "top_students_by_passed_quizzes",
            format!("min_score={}, limit={}", min_score, limit),
            self.store
                .top_by_passed(AttemptStatus::Submitted, min_score, limit),
        )
        .await
    }
}

/// Wraps one store call with start/completion/failure logging.
async fn logged<T, F>(operation: &'static str, params: String, query: F) -> Result<Vec<T>, AppError>
where
    F: Future<Output = Result<Vec<T>, AppError>>,
{
    tracing::debug!(operation, "{}() - starting ({})", operation, params);

    match query.await {
        Ok(rows) => {
            tracing::debug!(operation, count = rows.len(), "{}() - returning {} rows", operation, rows.len());
            Ok(rows)
        }
        Err(e) => {
            tracing::error!(operation, kind = e.kind(), "Error in {}(): {} | {:?}", operation, e, e);
            let mut cause = e.source();
            while let Some(inner) = cause {
                tracing::error!(operation, "Caused by: {}", inner);
                cause = inner.source();
            }
            Err(e)
        }
    }
}
