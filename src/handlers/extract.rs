// src/handlers/extract.rs

use axum::extract::{FromRequestParts, Path, Query};

use crate::error::AppError;

/// `Path` whose rejection goes through [`AppError`] like every other failure.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `Query` whose rejection goes through [`AppError`] like every other failure.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
