//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use states_core::StateCode;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("invalid index {position}: {len} fun facts stored")]
  InvalidIndex { position: i64, len: usize },

  #[error("no fun facts found for {0}")]
  NoFactsAvailable(StateCode),

  #[error(transparent)]
  DataUnavailable(states_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn state_not_found() -> Self { Self::NotFound("State not found".into()) }
}

impl From<states_core::Error> for ApiError {
  fn from(e: states_core::Error) -> Self {
    use states_core::Error as Core;
    match e {
      Core::InvalidStateCode(_) | Core::EntryNotFound(_) => Self::state_not_found(),
      Core::InvalidIndex { position, len } => Self::InvalidIndex { position, len },
      Core::Backend(source) => Self::Store(source),
      e @ Core::DataUnavailable { .. } => Self::DataUnavailable(e),
    }
  }
}

/// Convert any store backend error, keeping domain errors distinguishable.
pub fn store_error<E: Into<states_core::Error>>(e: E) -> ApiError { ApiError::from(e.into()) }

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::InvalidIndex { .. } => (StatusCode::BAD_REQUEST, "Invalid index".to_owned()),
      ApiError::NoFactsAvailable(_) => {
        (StatusCode::NOT_FOUND, "No fun facts found for this state".to_owned())
      }
      ApiError::DataUnavailable(_) | ApiError::Store(_) => {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
