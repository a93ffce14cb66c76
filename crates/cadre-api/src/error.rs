//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// Well-formed request that breaks a hierarchy rule, or a hierarchy too
  /// deep or cyclic to evaluate.
  #[error("unprocessable: {0}")]
  Unprocessable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<cadre_core::Error> for ApiError {
  fn from(e: cadre_core::Error) -> Self {
    use cadre_core::Error as E;
    match e {
      E::StaffNotFound(_) => ApiError::NotFound(e.to_string()),
      E::InvalidRelation(_)
      | E::InvalidRole { .. }
      | E::HierarchyTooDeep(_)
      | E::CycleDetected(_) => ApiError::Unprocessable(e.to_string()),
      E::DuplicateName(_) => ApiError::Conflict(e.to_string()),
      E::UnknownRole(_) | E::InvalidSalary(_) => ApiError::BadRequest(e.to_string()),
      E::Store(inner) => ApiError::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
