// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path as AxumPath, State};
use axum::Json;
use pdp_core::{DecisionId, RequestId};
use pdp_decisionlog::{DecisionLogRecord, DecisionLogSink, Labels};
use pdp_lia::{DecisionContext, SecondaryEval, on_decision};
use pdp_value::Value;
use pdp_vm::EvalOptions;
use serde::{Deserialize, Serialize};
use std::time::{Instant, SystemTime};

#[derive(Deserialize)]
pub struct DecisionRequest {
	#[serde(default)]
	pub input: Option<Value>,
}

#[derive(Serialize)]
pub struct DecisionResponse {
	pub result: Option<Value>,
	pub decision_id: DecisionId,
	pub metrics: pdp_vm::EvalStats,
}

/// `POST /v1/data/{*path}`.
pub async fn decide(State(state): State<AppState>, AxumPath(path): AxumPath<String>, Json(body): Json<DecisionRequest>) -> Result<Json<DecisionResponse>, ApiError> {
	let req_id = RequestId::new();
	let decision_id = DecisionId::new();
	let now = SystemTime::now();
	let seed = rand::random::<u64>();

	let (result, metrics, error, secondary) = evaluate(&state, &path, req_id, decision_id, body.input.clone(), now, seed).await;

	emit_log(&state, &path, req_id, decision_id, now, &body.input, &result, metrics, error.as_ref(), None).await;
	if let Some(secondary) = secondary {
		emit_secondary_log(&state, &path, req_id, decision_id, now, &body.input, &secondary).await;
	}

	match error {
		Some(e) => Err(ApiError(e)),
		None => Ok(Json(DecisionResponse { result, decision_id, metrics })),
	}
}

/// Runs the primary evaluation, then — synchronously, still within the
/// caller's task — the sampled LIA comparison if a session is active.
/// Running the hook in-line rather than on a detached task is what keeps
/// diff records (and their paired decision logs) in primary-completion
/// order. Returns the primary result/metrics/error triple plus the
/// hook's outcome, if any, for the caller to log.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn evaluate(
	state: &AppState,
	path: &str,
	req_id: RequestId,
	decision_id: DecisionId,
	input: Option<Value>,
	time: SystemTime,
	seed: u64,
) -> (Option<Value>, pdp_vm::EvalStats, Option<pdp_core::Error>, Option<SecondaryEval>) {
	let mut txn = pdp_store::Transaction::new(state.namespace.clone(), state.ownership.clone(), false);
	let mut opts = EvalOptions::new(time);
	opts.input = input.clone();
	opts.seed = seed;

	let policy = state.active_policy.read().clone();
	let started = Instant::now();
	let outcome = pdp_vm::eval(&policy, path, &mut txn, &opts);
	let eval_ns = started.elapsed().as_nanos() as u64;
	let _ = txn.abort();

	match outcome {
		Ok((mut results, stats)) => {
			let result = results.pop();
			let secondary = if state.lia.active().is_some() {
				let ctx = DecisionContext { node_id: state.node_id.clone(), req_id, decision_id, path: path.to_string(), input, time, seed };
				let result_for_hook = result.clone().unwrap_or(Value::Null);
				on_decision(&state.lia, ctx, &result_for_hook, eval_ns)
			} else {
				None
			};
			(result, stats, None, secondary)
		}
		Err(e) => (None, pdp_vm::EvalStats::default(), Some(e), None),
	}
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn emit_log(
	state: &AppState,
	path: &str,
	req_id: RequestId,
	decision_id: DecisionId,
	time: SystemTime,
	input: &Option<Value>,
	result: &Option<Value>,
	metrics: pdp_vm::EvalStats,
	error: Option<&pdp_core::Error>,
	batch_decision_id: Option<String>,
) {
	let mut record = DecisionLogRecord::new(
		path.to_string(),
		req_id,
		decision_id,
		time,
		Labels { id: "active".into(), kind: "policy".into(), version: "0".into() },
	);
	record.input = input.clone();
	record.result = result.clone();
	record.metrics = Some(metrics);
	record.error = error.map(|e| e.code.to_string());
	if let Some(batch_id) = batch_decision_id {
		record.mark_batch(batch_id, state.system_name);
	}

	dispatch_log(state, &record).await;
}

/// Logs the candidate bundle's evaluation for a decision the hook sampled,
/// sharing the primary's `req_id`/`decision_id` so the two lines tie back
/// to the same decision.
pub(crate) async fn emit_secondary_log(
	state: &AppState,
	path: &str,
	req_id: RequestId,
	decision_id: DecisionId,
	time: SystemTime,
	input: &Option<Value>,
	secondary: &SecondaryEval,
) {
	let mut record = DecisionLogRecord::new(
		path.to_string(),
		req_id,
		decision_id,
		time,
		Labels { id: "candidate".into(), kind: "policy".into(), version: "0".into() },
	);
	record.input = input.clone();
	record.result = secondary.record.value_b.as_value().cloned();
	record.metrics = Some(secondary.stats);
	record.error = secondary.error.clone();

	dispatch_log(state, &record).await;
}

async fn dispatch_log(state: &AppState, record: &DecisionLogRecord) {
	if let Some(console) = &state.decision_log.console {
		console.log(record).await;
	}
	if let Some(remote) = &state.decision_log.remote {
		remote.log(record).await;
	}
}
