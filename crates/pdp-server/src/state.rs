// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_config::DecisionLogsConfig;
use pdp_core::{CancellationToken, NodeId};
use pdp_decisionlog::{ConsoleSink, ConsoleStream, RemoteSink};
use pdp_ir::Policy;
use pdp_lia::LiaSession;
use pdp_store::{NamespaceTree, PathOwnershipRegistry};
use parking_lot::RwLock;
use std::sync::Arc;

/// Both decision log sinks are held concretely rather than behind a `dyn`
/// trait object: `DecisionLogSink::log` is a native async fn in trait,
/// which isn't dyn-compatible, and there are only ever these two kinds.
#[derive(Clone, Default)]
pub struct DecisionLogSinks {
	pub console: Option<Arc<ConsoleSink>>,
	pub remote: Option<Arc<RemoteSink>>,
}

impl DecisionLogSinks {
	pub fn from_config(config: &DecisionLogsConfig) -> Self {
		let console = config.console.as_ref().map(|c| {
			let stream = match c.stream {
				pdp_config::ConsoleStream::Stdout => ConsoleStream::Stdout,
				pdp_config::ConsoleStream::Stderr => ConsoleStream::Stderr,
			};
			Arc::new(ConsoleSink { stream })
		});
		let remote = config.remote.as_ref().map(|r| Arc::new(RemoteSink { client: reqwest::Client::new(), url: r.url.clone(), max_retries: r.max_retries }));
		Self { console, remote }
	}
}

/// Shared state behind every handler. `active_policy` is the currently
/// activated compiled bundle: bundle unpacking and IR compilation are
/// out-of-scope external collaborators, so activation here is just a
/// pointer swap onto an already-compiled `Policy` (see the corresponding
/// note in `DESIGN.md`).
#[derive(Clone)]
pub struct AppState {
	pub namespace: Arc<NamespaceTree>,
	pub ownership: Arc<PathOwnershipRegistry>,
	pub active_policy: Arc<RwLock<Policy>>,
	pub lia: Arc<LiaSession>,
	pub decision_log: DecisionLogSinks,
	pub node_id: NodeId,
	pub preview_enabled: bool,
	pub system_name: &'static str,
	/// Cancelled once on graceful shutdown; every open live impact
	/// analysis stream watches this alongside its own session timeout.
	pub shutdown: CancellationToken,
}

impl AppState {
	pub fn new(namespace: Arc<NamespaceTree>, ownership: Arc<PathOwnershipRegistry>, active_policy: Policy) -> Self {
		Self {
			namespace,
			ownership,
			active_policy: Arc::new(RwLock::new(active_policy)),
			lia: Arc::new(LiaSession::new()),
			decision_log: DecisionLogSinks::default(),
			node_id: NodeId("pdp-node".into()),
			preview_enabled: true,
			system_name: "pdp",
			shutdown: CancellationToken::new(),
		}
	}

	pub fn with_decision_log(mut self, decision_log: DecisionLogSinks) -> Self {
		self.decision_log = decision_log;
		self
	}
}
