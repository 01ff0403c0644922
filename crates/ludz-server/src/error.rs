//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::{HeaderValue, header},
  response::{IntoResponse, Response},
};
use ludz_api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error(transparent)]
  Api(#[from] ApiError),
}

impl From<ludz_core::Error> for Error {
  fn from(e: ludz_core::Error) -> Self { Error::Api(ApiError::Core(e)) }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res = (
          axum::http::StatusCode::UNAUTHORIZED,
          axum::Json(serde_json::json!({ "error": "unauthorized" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"ludz\""),
        );
        res
      }
      Error::Api(e) => e.into_response(),
    }
  }
}
