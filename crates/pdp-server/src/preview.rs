// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::error::ApiError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path as AxumPath, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use pdp_preview::{decode_request, BodyFormat, PreviewEvaluator, PreviewFlags};

/// `POST /v0/preview/{*path}`. 404 when the endpoint is disabled by
/// configuration; other HTTP methods never reach here (axum's router
/// returns 405 for a path with no matching method).
pub async fn preview(
	State(state): State<AppState>,
	AxumPath(path): AxumPath<String>,
	Query(flags): Query<PreviewFlags>,
	headers: HeaderMap,
	body: Bytes,
) -> Response {
	if !state.preview_enabled {
		return StatusCode::NOT_FOUND.into_response();
	}

	let format = if content_type_is_yaml(&headers) { BodyFormat::Yaml } else { BodyFormat::Json };
	let gzip = headers.get("content-encoding").and_then(|v| v.to_str().ok()).map(|v| v.eq_ignore_ascii_case("gzip")).unwrap_or(false);

	let mut request = match decode_request(&body, format, gzip) {
		Ok(r) => r,
		Err(e) => return ApiError(e).into_response(),
	};
	request.flags = flags;
	if request.plan_name.is_empty() {
		request.plan_name = path;
	}

	let evaluator = PreviewEvaluator::new(state.namespace.clone(), state.ownership.clone());
	let pretty = request.flags.pretty;
	match evaluator.evaluate(request) {
		Ok(response) if pretty => {
			let body = serde_json::to_string_pretty(&response).unwrap_or_default();
			([("content-type", "application/json")], body).into_response()
		}
		Ok(response) => Json(response).into_response(),
		Err(e) => ApiError(e).into_response(),
	}
}

fn content_type_is_yaml(headers: &HeaderMap) -> bool {
	headers
		.get("content-type")
		.and_then(|v| v.to_str().ok())
		.map(|v| v.contains("yaml"))
		.unwrap_or(false)
}
