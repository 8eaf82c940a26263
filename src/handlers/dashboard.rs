// src/handlers/dashboard.rs

use axum::{Json, extract::State, response::IntoResponse};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::extract::{ApiPath, ApiQuery};
use crate::{config::Config, error::AppError, services::dashboard::DashboardService};

/// Query string for the attempts leaderboard.
#[derive(Debug, Deserialize)]
pub struct TopAttemptsParams {
    pub limit: Option<i64>,
}

/// Query string for the passed-quizzes leaderboard.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPassedParams {
    pub min_score: Option<Decimal>,
    pub limit: Option<i64>,
}

/// Requested size, or the configured default, capped at the configured maximum.
fn effective_limit(requested: Option<i64>, config: &Config) -> i64 {
    requested.unwrap_or(config.default_limit).min(config.max_limit)
}

/// Lists every student with at least one attempt.
pub async fn list_students(
    State(service): State<DashboardService>,
) -> Result<impl IntoResponse, AppError> {
    let students = service.list_students_with_attempts().await?;
    Ok(Json(students))
}

/// Lists the attempts of one student, newest first.
pub async fn list_student_attempts(
    State(service): State<DashboardService>,
    ApiPath(student_id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = service.list_attempts_for_student(student_id).await?;
    Ok(Json(attempts))
}

/// Chart data: students with the most attempts.
pub async fn top_by_attempts(
    State(service): State<DashboardService>,
    State(config): State<Config>,
    ApiQuery(params): ApiQuery<TopAttemptsParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = effective_limit(params.limit, &config);
    let top = service.top_students_by_attempts(limit).await?;
    Ok(Json(top))
}

/// Chart data: students with the most passed quizzes.
pub async fn top_by_passed(
    State(service): State<DashboardService>,
    State(config): State<Config>,
    ApiQuery(params): ApiQuery<TopPassedParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = effective_limit(params.limit, &config);
    let min_score = params.min_score.unwrap_or(config.default_min_score);
    let top = service
        .top_students_by_passed_quizzes(min_score, limit)
        .await?;
    Ok(Json(top))
}
