// src/error.rs

use std::{any::Any, error::Error as StdError, fmt};

use axum::{
    Json,
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Global Application Error Enum.
/// Every variant reaches the caller as the same opaque 500 response,
/// the detail only ever goes to the log stream.
#[derive(Debug)]
pub enum AppError {
    // Store call failed, the sqlx error is kept as the cause
    Database(sqlx::Error),

    // A fetched row could not be turned into a record
    RowMapping(String),

    // Path or query string could not be extracted, axum's rejection is the cause
    Rejected(Box<dyn StdError + Send + Sync>),

    // Anything else nobody expected
    InternalServerError(String),
}

impl AppError {
    /// Stable classification label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::RowMapping(_) => "RowMapping",
            AppError::Rejected(_) => "Rejected",
            AppError::InternalServerError(_) => "InternalServerError",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "database error: {}", e),
            AppError::RowMapping(msg) => write!(f, "row mapping failed: {}", msg),
            AppError::Rejected(e) => write!(f, "request rejected: {}", e),
            AppError::InternalServerError(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AppError::Database(e) => Some(e),
            AppError::Rejected(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// Implements `IntoResponse` for `AppError`.
/// Nothing is translated here, every error goes through [`respond`].
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        respond(self.kind(), &self)
    }
}

/// Converts `sqlx::Error` into `AppError::Database`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

/// Used as the rejection of [`crate::handlers::extract::ApiPath`].
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Rejected(Box::new(rejection))
    }
}

/// Used as the rejection of [`crate::handlers::extract::ApiQuery`].
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Rejected(Box::new(rejection))
    }
}

/// JSON body sent for any unexpected failure.
/// `stack` is always empty: traces stay in the logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub details: String,
    pub stack: String,
}

impl ErrorBody {
    pub fn for_id(error_id: &Uuid) -> Self {
        Self {
            details: format!("Error id {}", error_id),
            stack: String::new(),
        }
    }
}

/// Terminal handler for failures nobody else dealt with.
///
/// * Generates a fresh v4 UUID as correlation id.
/// * Logs the failure, its kind, its message and the wrapped cause (if any) at ERROR.
/// * Answers `500` with an [`ErrorBody`] that only carries the id.
pub fn respond(kind: &str, err: &(dyn StdError + 'static)) -> Response {
    let error_id = Uuid::new_v4();

    tracing::error!(
        error_id = %error_id,
        kind = %kind,
        "Unhandled error [ID: {}]: {} | {:?}",
        error_id,
        err,
        err
    );
    if let Some(cause) = err.source() {
        tracing::error!(
            error_id = %error_id,
            "Caused by: {:?} - {}",
            cause,
            cause
        );
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::for_id(&error_id)),
    )
        .into_response()
}

/// Panic hook for `tower_http::catch_panic::CatchPanicLayer`.
/// A panicking handler gets the same treatment as a returned error.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    let err = AppError::InternalServerError(format!("handler panicked: {}", message));
    respond(err.kind(), &err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CapturedLogs;

    async fn body_of(response: Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn error_id_of(body: &ErrorBody) -> String {
        body.details
            .strip_prefix("Error id ")
            .expect("details must start with 'Error id '")
            .to_string()
    }

    #[tokio::test]
    async fn database_error_is_logged_with_the_id_it_returns() {
        let logs = CapturedLogs::default();
        let err = AppError::from(sqlx::Error::PoolTimedOut);

        let response = logs.capture(|| err.into_response());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.stack, "");

        let id = error_id_of(&body);
        assert!(Uuid::parse_str(&id).is_ok());

        let output = logs.contents();
        assert!(output.contains(&id));
        assert!(output.contains("Database"));
        assert!(output.contains("Caused by: PoolTimedOut"));
    }

    #[tokio::test]
    async fn body_never_leaks_the_message() {
        let logs = CapturedLogs::default();
        let err = AppError::RowMapping("unknown attempt status 'LOST'".to_string());

        let response = logs.capture(|| err.into_response());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let raw: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        let fields = raw.as_object().unwrap();
        assert_eq!(fields.len(), 2);
        assert!(!raw.to_string().contains("LOST"));
        assert!(logs.contents().contains("LOST"));
        assert!(!logs.contents().contains("Caused by"));
    }

    #[tokio::test]
    async fn rejected_query_keeps_its_cause_in_the_logs_only() {
        let logs = CapturedLogs::default();
        let uri: axum::http::Uri = "/charts/top-passed?minScore=abc".parse().unwrap();
        let rejection =
            axum::extract::Query::<std::collections::HashMap<String, i64>>::try_from_uri(&uri)
                .unwrap_err();

        let err = AppError::from(rejection);
        assert_eq!(err.kind(), "Rejected");
        assert!(err.source().is_some());

        let response = logs.capture(|| err.into_response());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.stack, "");
        let id = error_id_of(&body);
        assert!(Uuid::parse_str(&id).is_ok());

        let output = logs.contents();
        assert!(output.contains(&id));
        assert!(output.contains("Caused by"));
        assert!(output.contains("Failed to deserialize query string"));
    }

    #[tokio::test]
    async fn every_call_gets_a_fresh_id() {
        let first = body_of(AppError::InternalServerError("a".into()).into_response()).await;
        let second = body_of(AppError::InternalServerError("a".into()).into_response()).await;
        assert_ne!(first.details, second.details);
    }

    #[tokio::test]
    async fn panics_are_answered_like_errors() {
        let logs = CapturedLogs::default();
        let response = logs.capture(|| handle_panic(Box::new("boom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        let id = error_id_of(&body);
        let output = logs.contents();
        assert!(output.contains(&id));
        assert!(output.contains("handler panicked: boom"));
    }
}
