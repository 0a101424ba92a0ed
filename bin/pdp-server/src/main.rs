// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_config::Config;
use pdp_ir::Policy;
use pdp_server::DecisionLogSinks;
use pdp_store::{MemoryStore, NamespaceTree, PathOwnershipRegistry};
use pdp_value::Value;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

const DEFAULT_BIND: &str = "0.0.0.0:8181";

#[tokio::main]
async fn main() {
	let _file_guard = init_logging();

	// Reading and parsing a config file is an external concern; this
	// binary only demonstrates wiring an already-parsed tree through.
	let config = Config::from_raw(&Value::empty_object()).expect("empty config tree is always valid");

	let namespace = Arc::new(NamespaceTree::new(Arc::new(MemoryStore::new())));
	let ownership = Arc::new(PathOwnershipRegistry::new());
	let state = pdp_server::AppState::new(namespace, ownership, Policy::default())
		.with_decision_log(DecisionLogSinks::from_config(&config.decision_logs));

	let app = pdp_server::build_router(state);

	let bind = std::env::var("PDP_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
	let listener = tokio::net::TcpListener::bind(&bind).await.unwrap_or_else(|e| panic!("failed to bind {bind}: {e}"));
	tracing::info!(%bind, "pdp-server listening");

	axum::serve(listener, app).await.unwrap_or_else(|e| tracing::error!(error = %e, "server exited"));
}

/// Installs a stdout formatter plus a non-blocking rolling file appender
/// under `PDP_LOG_DIR` (default `./logs`), filtered by `RUST_LOG` (default
/// `info`). The returned guard must stay alive for the file writer to
/// flush; the binary holds it for the lifetime of `main`.
fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
	let log_dir = std::env::var("PDP_LOG_DIR").unwrap_or_else(|_| "logs".to_string());
	let file_appender = tracing_appender::rolling::daily(log_dir, "pdp-server.log");
	let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(non_blocking.and(std::io::stdout)).init();

	guard
}
