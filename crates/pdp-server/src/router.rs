// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::state::AppState;
use crate::{batch, decision, lia, preview};
use axum::routing::{get, post};
use axum::Router;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Request timeout applied to every route except the live impact analysis
/// stream, which legitimately runs for a session's full duration.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_CONCURRENT_REQUESTS: usize = 512;

pub fn build_router(state: AppState) -> Router {
	let data_routes = Router::new()
		.route("/v1/data/{*path}", post(decision::decide))
		.route("/v1/batch/data/{*path}", post(batch::decide_batch))
		.route("/v0/preview/{*path}", post(preview::preview))
		.layer(TimeoutLayer::new(REQUEST_TIMEOUT))
		.layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS));

	let lia_routes = Router::new().route("/v0/lia/record", post(lia::start)).route("/v0/lia/stop", post(lia::stop));

	Router::new()
		.route("/health", get(health))
		.merge(data_routes)
		.merge(lia_routes)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

async fn health() -> &'static str {
	"ok"
}
