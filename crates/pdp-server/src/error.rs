// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pdp_core::Error;
use serde_json::json;

/// Wraps `pdp_core::Error` so it can be returned directly from a handler.
/// The wire code and message are always carried in the JSON body; the
/// HTTP status comes from `Error::http_status`.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
	fn from(e: Error) -> Self {
		Self(e)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		(status, Json(json!({ "code": self.0.code.to_string(), "message": self.0.message }))).into_response()
	}
}
