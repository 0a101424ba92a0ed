// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::error::ApiError;
use crate::state::AppState;
use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use pdp_lia::{CandidateBundle, RecordSink, SessionConfig, StreamFormat, run_stream};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

#[derive(Deserialize)]
pub struct StartSessionRequest {
	pub duration_seconds: u64,
	#[serde(default = "default_sample_rate")]
	pub sample_rate: f64,
	#[serde(default)]
	pub equals: bool,
	pub candidate: CandidateBundle,
}

fn default_sample_rate() -> f64 {
	1.0
}

#[derive(Deserialize)]
pub struct StreamQuery {
	#[serde(default)]
	pub format: Format,
	#[serde(default)]
	pub group: bool,
}

#[derive(Deserialize, Default, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Format {
	#[default]
	Json,
	Ndjson,
	Csv,
	Table,
}

impl Format {
	fn stream_format(self) -> StreamFormat {
		match self {
			Format::Json => StreamFormat::Json,
			Format::Ndjson => StreamFormat::Ndjson,
			Format::Csv => StreamFormat::Csv,
			Format::Table => StreamFormat::Table,
		}
	}

	fn content_type(self) -> &'static str {
		match self {
			Format::Json => "application/json",
			Format::Ndjson => "application/x-ndjson",
			Format::Csv => "text/csv",
			Format::Table => "text/plain",
		}
	}
}

/// Bridges `RecordSink`'s by-value, pull-free write interface onto a
/// channel feeding an axum streaming response body.
struct ChannelSink(mpsc::Sender<std::io::Result<Bytes>>);

impl RecordSink for ChannelSink {
	fn write(&mut self, bytes: Vec<u8>) -> impl Future<Output = std::io::Result<()>> + Send {
		let sender = self.0.clone();
		async move { sender.send(Ok(Bytes::from(bytes))).await.map_err(|_| std::io::Error::new(std::io::ErrorKind::BrokenPipe, "client gone")) }
	}
}

/// Starts a session, then immediately begins streaming its diff records
/// as the response body. The request and the stream share one HTTP
/// exchange: there is no separate "poll for results" call.
pub async fn start(State(state): State<AppState>, Query(query): Query<StreamQuery>, Json(body): Json<StartSessionRequest>) -> Response {
	let config = SessionConfig {
		duration: Duration::from_secs(body.duration_seconds),
		sample_rate: body.sample_rate,
		equals: body.equals,
		candidate: body.candidate,
	};

	let (active, records) = match state.lia.start(config) {
		Ok(pair) => pair,
		Err(e) => return ApiError(e).into_response(),
	};

	let (body_tx, body_rx) = mpsc::channel::<std::io::Result<Bytes>>(64);
	let sink = ChannelSink(body_tx);
	let format = query.format.stream_format();
	let session = state.lia.clone();
	let shutdown = state.shutdown.clone();

	tokio::spawn(async move {
		run_stream(session, active, format, query.group, records, sink, shutdown).await;
	});

	let stream = ReceiverStream::new(body_rx);
	match Response::builder().header(header::CONTENT_TYPE, query.format.content_type()).body(Body::from_stream(stream)) {
		Ok(response) => response,
		Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
	}
}

/// Tears the active session down early, e.g. on client-initiated stop.
pub async fn stop(State(state): State<AppState>) -> Response {
	state.lia.stop();
	StatusCode::NO_CONTENT.into_response()
}
