// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::bundle::CandidateBundle;
use crate::record::DiffRecord;
use pdp_core::{CancellationToken, Error, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Parameters a `record` request supplies to activate a session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
	pub duration: Duration,
	pub sample_rate: f64,
	pub equals: bool,
	pub candidate: CandidateBundle,
}

/// Bound for `ActiveSession`'s diff record channel. Decisions arriving
/// faster than the stream consumer drains them are dropped rather than
/// backing up the decision path; see `hook::on_decision`.
const RECORD_CHANNEL_CAPACITY: usize = 1024;

pub struct ActiveSession {
	pub config: SessionConfig,
	started: Instant,
	pub cancellation: CancellationToken,
	pub(crate) sender: mpsc::Sender<DiffRecord>,
}

impl ActiveSession {
	/// `None` once `duration` has elapsed since activation, even if
	/// nothing has yet noticed and called `stop`.
	pub fn expired(&self) -> bool {
		self.started.elapsed() >= self.config.duration
	}

	/// Time left before `duration` elapses, zero once already expired.
	pub fn remaining(&self) -> Duration {
		self.config.duration.saturating_sub(self.started.elapsed())
	}
}

/// The process-wide "exactly one active session" slot, mirroring the
/// same idiom `pdp-plugin`'s `TransformHandle` uses for a single piece of
/// shared mutable state guarded by a plain mutex.
#[derive(Default)]
pub struct LiaSession {
	active: parking_lot::Mutex<Option<Arc<ActiveSession>>>,
}

impl LiaSession {
	pub fn new() -> Self {
		Self::default()
	}

	/// Activates a session, rejecting a concurrent activation attempt.
	/// A previous session whose duration already elapsed is treated as
	/// gone and silently replaced. Returns the session handle alongside
	/// the receiving end of its diff record channel, which the caller
	/// hands to `stream::run_stream`.
	pub fn start(&self, config: SessionConfig) -> Result<(Arc<ActiveSession>, mpsc::Receiver<DiffRecord>)> {
		let mut guard = self.active.lock();
		if let Some(existing) = guard.as_ref() {
			if !existing.expired() {
				return Err(Error::invalid_transaction("a live impact analysis session is already active"));
			}
		}
		let (sender, receiver) = mpsc::channel(RECORD_CHANNEL_CAPACITY);
		let session = Arc::new(ActiveSession { config, started: Instant::now(), cancellation: CancellationToken::new(), sender });
		*guard = Some(session.clone());
		Ok((session, receiver))
	}

	/// The active session, if one exists and has not expired.
	pub fn active(&self) -> Option<Arc<ActiveSession>> {
		let guard = self.active.lock();
		match guard.as_ref() {
			Some(session) if !session.expired() => Some(session.clone()),
			_ => None,
		}
	}

	/// Tears the session down on any of the three cancellation paths
	/// (duration elapsed, client disconnect, server shutdown).
	pub fn stop(&self) {
		if let Some(session) = self.active.lock().take() {
			session.cancellation.cancel();
		}
	}
}
