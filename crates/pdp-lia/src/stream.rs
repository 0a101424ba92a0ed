// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::record::{CSV_COLUMNS, DiffRecord, TABLE_COLUMNS};
use crate::session::{ActiveSession, LiaSession};
use crate::stats::{GROUP_CSV_COLUMNS, GroupAggregator};
use pdp_core::CancellationToken;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

/// The wire formats a live impact analysis stream may render as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamFormat {
	Json,
	Ndjson,
	Csv,
	Table,
}

/// Why a stream ended, logged by the caller. Mirrors the three
/// cancellation paths the session model names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamOutcome {
	DurationElapsed,
	ClientDisconnected,
	ServerShutdown,
}

/// The write side of a held-open response body. Native async fn in trait,
/// matching `pdp-plugin::Fetcher`'s approach: no `dyn` dispatch needed, so
/// no reason to pull in `async_trait`.
pub trait RecordSink: Send {
	fn write(&mut self, bytes: Vec<u8>) -> impl Future<Output = std::io::Result<()>> + Send;
}

/// Drives one session's streaming loop: renders each diff record (or, in
/// group mode, accumulates it) as it arrives, until one of the three
/// cancellation paths fires. Always calls `session.stop()` before
/// returning, regardless of why the loop ended.
pub async fn run_stream<S: RecordSink>(
	session: Arc<LiaSession>,
	active: Arc<ActiveSession>,
	format: StreamFormat,
	group: bool,
	mut records: mpsc::Receiver<DiffRecord>,
	mut sink: S,
	shutdown: CancellationToken,
) -> StreamOutcome {
	let mut aggregator = group.then(GroupAggregator::new);
	let mut wrote_any = false;

	if !group {
		let _ = match format {
			StreamFormat::Json => sink.write(b"[".to_vec()).await,
			StreamFormat::Csv => sink.write(format!("{CSV_COLUMNS}\n").into_bytes()).await,
			StreamFormat::Table => sink.write(format!("{TABLE_COLUMNS}\n").into_bytes()).await,
			StreamFormat::Ndjson => Ok(()),
		};
	}

	let outcome = loop {
		tokio::select! {
			biased;
			_ = shutdown.cancelled() => break StreamOutcome::ServerShutdown,
			_ = active.cancellation.cancelled() => break StreamOutcome::ServerShutdown,
			_ = tokio::time::sleep(active.remaining()) => break StreamOutcome::DurationElapsed,
			maybe_record = records.recv() => {
				let Some(record) = maybe_record else { break StreamOutcome::DurationElapsed };
				if let Some(agg) = aggregator.as_mut() {
					agg.record(&record);
					continue;
				}
				let bytes = render_record(&record, format, wrote_any);
				if sink.write(bytes).await.is_err() {
					break StreamOutcome::ClientDisconnected;
				}
				wrote_any = true;
			}
		}
	};

	session.stop();

	if let Some(agg) = aggregator {
		flush_group(agg, format, &mut sink).await;
	} else if format == StreamFormat::Json {
		let _ = sink.write(b"]".to_vec()).await;
	}

	outcome
}

fn render_record(record: &DiffRecord, format: StreamFormat, wrote_any: bool) -> Vec<u8> {
	match format {
		StreamFormat::Json => {
			let prefix = if wrote_any { "," } else { "" };
			format!("{prefix}{}", serde_json::to_string(record).unwrap_or_default()).into_bytes()
		}
		StreamFormat::Ndjson => format!("{}\n", serde_json::to_string(record).unwrap_or_default()).into_bytes(),
		StreamFormat::Csv => format!("{}\n", record.csv_row()).into_bytes(),
		StreamFormat::Table => format!("{}\n", record.table_row()).into_bytes(),
	}
}

async fn flush_group<S: RecordSink>(aggregator: GroupAggregator, format: StreamFormat, sink: &mut S) {
	let groups = aggregator.flush();
	match format {
		StreamFormat::Json => {
			let _ = sink.write(serde_json::to_vec(&groups.iter().map(group_json).collect::<Vec<_>>()).unwrap_or_default()).await;
		}
		StreamFormat::Ndjson => {
			for g in &groups {
				let _ = sink.write(format!("{}\n", serde_json::to_string(&group_json(g)).unwrap_or_default()).into_bytes()).await;
			}
		}
		StreamFormat::Csv | StreamFormat::Table => {
			let _ = sink.write(format!("{GROUP_CSV_COLUMNS}\n").into_bytes()).await;
			for g in &groups {
				let _ = sink.write(format!("{}\n", g.csv_row()).into_bytes()).await;
			}
		}
	}
}

fn group_json(g: &crate::stats::GroupStats) -> serde_json::Value {
	serde_json::json!({
		"path": g.path,
		"input": serde_json::Value::from(g.input.clone()),
		"n": g.n,
		"mean_primary_ns": g.primary.mean_ns,
		"median_primary_ns": g.primary.median_ns,
		"min_primary_ns": g.primary.min_ns,
		"max_primary_ns": g.primary.max_ns,
		"stddev_primary_ns": g.primary.stddev_ns,
		"var_primary_ns": g.primary.var_ns,
		"mean_secondary_ns": g.secondary.mean_ns,
		"median_secondary_ns": g.secondary.median_ns,
		"min_secondary_ns": g.secondary.min_ns,
		"max_secondary_ns": g.secondary.max_ns,
		"stddev_secondary_ns": g.secondary.stddev_ns,
		"var_secondary_ns": g.secondary.var_ns,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bundle::CandidateBundle;
	use crate::record::EvalOutcome;
	use crate::session::SessionConfig;
	use pdp_core::{DecisionId, NodeId, RequestId};
	use pdp_ir::Policy;
	use pdp_value::Value;
	use std::time::Duration;

	#[derive(Clone, Default)]
	struct CollectingSink(Arc<parking_lot::Mutex<Vec<u8>>>);

	impl RecordSink for CollectingSink {
		fn write(&mut self, bytes: Vec<u8>) -> impl Future<Output = std::io::Result<()>> + Send {
			self.0.lock().extend_from_slice(&bytes);
			async { Ok(()) }
		}
	}

	struct FailingSink;

	impl RecordSink for FailingSink {
		fn write(&mut self, _bytes: Vec<u8>) -> impl Future<Output = std::io::Result<()>> + Send {
			async { Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "client gone")) }
		}
	}

	fn diff_record() -> DiffRecord {
		DiffRecord {
			node_id: NodeId("node-1".into()),
			req_id: RequestId::new(),
			decision_id: DecisionId::new(),
			path: "test/p".into(),
			input: Value::Null,
			value_a: EvalOutcome::Value(Value::int(0)),
			value_b: EvalOutcome::Value(Value::int(1)),
			eval_ns_a: 10,
			eval_ns_b: 20,
		}
	}

	fn active_session(duration: Duration) -> (Arc<LiaSession>, Arc<ActiveSession>) {
		let session = Arc::new(LiaSession::new());
		let (active, _rx) = session
			.start(SessionConfig {
				duration,
				sample_rate: 1.0,
				equals: false,
				candidate: CandidateBundle { policy: Policy::default(), data: Value::empty_object() },
			})
			.unwrap();
		(session, active)
	}

	#[tokio::test]
	async fn client_disconnect_is_detected_on_next_write() {
		let (session, active) = active_session(Duration::from_secs(60));
		let (tx, rx) = mpsc::channel(4);
		tx.send(diff_record()).await.unwrap();

		let outcome = run_stream(session.clone(), active, StreamFormat::Ndjson, false, rx, FailingSink, CancellationToken::new()).await;
		assert_eq!(outcome, StreamOutcome::ClientDisconnected);
		assert!(session.active().is_none());
	}

	#[tokio::test]
	async fn server_shutdown_tears_down_the_session() {
		let (session, active) = active_session(Duration::from_secs(60));
		let (_tx, rx) = mpsc::channel(4);
		let shutdown = CancellationToken::new();
		shutdown.cancel();

		let outcome = run_stream(session.clone(), active, StreamFormat::Json, false, rx, CollectingSink::default(), shutdown).await;
		assert_eq!(outcome, StreamOutcome::ServerShutdown);
		assert!(session.active().is_none());
	}

	#[tokio::test]
	async fn json_stream_wraps_records_in_an_array() {
		let (session, active) = active_session(Duration::from_secs(60));
		let (tx, rx) = mpsc::channel(4);
		tx.send(diff_record()).await.unwrap();
		drop(tx);

		let sink = CollectingSink::default();
		run_stream(session, active, StreamFormat::Json, false, rx, sink.clone(), CancellationToken::new()).await;
		let bytes = sink.0.lock().clone();
		let text = String::from_utf8(bytes).unwrap();
		assert!(text.starts_with('['));
		assert!(text.ends_with(']'));
	}

	#[tokio::test]
	async fn group_mode_emits_aggregated_rows_on_flush() {
		let (session, active) = active_session(Duration::from_secs(60));
		let (tx, rx) = mpsc::channel(4);
		tx.send(diff_record()).await.unwrap();
		drop(tx);

		let sink = CollectingSink::default();
		run_stream(session, active, StreamFormat::Csv, true, rx, sink.clone(), CancellationToken::new()).await;
		let bytes = sink.0.lock().clone();
		let text = String::from_utf8(bytes).unwrap();
		assert!(text.starts_with(GROUP_CSV_COLUMNS));
		assert!(text.contains("test/p"));
	}
}
