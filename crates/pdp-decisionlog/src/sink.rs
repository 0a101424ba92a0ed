// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::record::DecisionLogRecord;
use std::future::Future;
use std::time::Duration;

/// Where a decision log record goes. Native async fn in trait, matching
/// `pdp-plugin::Fetcher`'s approach: fire-and-forget, no `dyn` dispatch
/// needed. Failures are logged by the implementation, never propagated —
/// a decision log sink must not be able to fail a decision.
pub trait DecisionLogSink: Send + Sync {
	fn log(&self, record: &DecisionLogRecord) -> impl Future<Output = ()> + Send;
}

/// Which stream a console sink writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleStream {
	Stdout,
	Stderr,
}

pub struct ConsoleSink {
	pub stream: ConsoleStream,
}

impl DecisionLogSink for ConsoleSink {
	fn log(&self, record: &DecisionLogRecord) -> impl Future<Output = ()> + Send {
		let line = serde_json::to_string(record).unwrap_or_default();
		let stream = self.stream;
		async move {
			match stream {
				ConsoleStream::Stdout => println!("{line}"),
				ConsoleStream::Stderr => eprintln!("{line}"),
			}
		}
	}
}

/// Forwards decision logs to a remote HTTP collector. Fire-and-forget: a
/// failed POST is retried up to `max_retries` times with no backoff beyond
/// what the client's own connection pool imposes, then dropped and logged.
pub struct RemoteSink {
	pub client: reqwest::Client,
	pub url: String,
	pub max_retries: u32,
}

impl RemoteSink {
	pub fn new(url: String) -> Self {
		Self { client: reqwest::Client::new(), url, max_retries: 3 }
	}
}

impl DecisionLogSink for RemoteSink {
	fn log(&self, record: &DecisionLogRecord) -> impl Future<Output = ()> + Send {
		let client = self.client.clone();
		let url = self.url.clone();
		let max_retries = self.max_retries;
		let body = serde_json::to_vec(record).unwrap_or_default();
		async move {
			for attempt in 0..=max_retries {
				match client.post(&url).header("content-type", "application/json").body(body.clone()).send().await {
					Ok(resp) if resp.status().is_success() => return,
					Ok(resp) => tracing::warn!(status = %resp.status(), attempt, "decision log forwarding rejected"),
					Err(e) => tracing::warn!(error = %e, attempt, "decision log forwarding failed"),
				}
				if attempt < max_retries {
					tokio::time::sleep(Duration::from_millis(50 * 2u64.pow(attempt))).await;
				}
			}
			tracing::error!(url, "decision log dropped after exhausting retries");
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::record::Labels;
	use pdp_core::{DecisionId, RequestId};
	use std::time::SystemTime;

	fn sample() -> DecisionLogRecord {
		DecisionLogRecord::new(
			"test/p".into(),
			RequestId::new(),
			DecisionId::new(),
			SystemTime::now(),
			Labels { id: "bundle1".into(), kind: "boolean".into(), version: "rev1".into() },
		)
	}

	#[tokio::test]
	async fn console_sink_does_not_panic_on_log() {
		let sink = ConsoleSink { stream: ConsoleStream::Stdout };
		sink.log(&sample()).await;
	}
}
