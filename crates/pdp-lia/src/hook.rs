// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::record::{DiffRecord, EvalOutcome};
use crate::session::LiaSession;
use pdp_core::{DecisionId, NodeId, RequestId};
use pdp_value::Value;
use pdp_vm::{EvalOptions, EvalStats, StaticNamespace};
use std::time::{Instant, SystemTime};

/// Identifies the decision a hook call is attached to, independent of
/// whatever evaluated it.
pub struct DecisionContext {
	pub node_id: NodeId,
	pub req_id: RequestId,
	pub decision_id: DecisionId,
	pub path: String,
	pub input: Option<Value>,
	pub time: SystemTime,
	pub seed: u64,
}

/// What the hook produced for one sampled decision: the diff record
/// already enqueued onto the session's stream, plus the secondary
/// evaluation's own metrics/error so the caller can emit a decision log
/// for it alongside the primary's.
pub struct SecondaryEval {
	pub record: DiffRecord,
	pub stats: EvalStats,
	pub error: Option<String>,
}

/// Runs after a primary decision evaluation completes, on the same task
/// and before the caller returns its response — the ordering guarantee
/// that diff records (and their paired decision logs) appear in primary
/// completion order depends on this running synchronously rather than
/// being spawned off. A no-op (`None`, no secondary evaluation recorded)
/// unless a session is active, the sample draw admits this decision, and
/// the two results differ (or equals-mode is on). Enqueues any emitted
/// record onto the session's stream and also returns it, for callers
/// that want to inspect it directly or log the secondary evaluation.
pub fn on_decision(session: &LiaSession, ctx: DecisionContext, primary_result: &Value, primary_eval_ns: u64) -> Option<SecondaryEval> {
	let active = session.active()?;
	if rand::random::<f64>() > active.config.sample_rate {
		return None;
	}

	let mut namespace = StaticNamespace(active.config.candidate.data.clone());
	let mut opts = EvalOptions::new(ctx.time);
	opts.seed = ctx.seed;
	opts.input = ctx.input.clone();

	let started = Instant::now();
	let secondary = pdp_vm::eval(&active.config.candidate.policy, &ctx.path, &mut namespace, &opts);
	let eval_ns_b = started.elapsed().as_nanos() as u64;

	let (value_b, instructions_b, error_b) = match secondary {
		Ok((mut results, stats)) => (EvalOutcome::Value(results.pop().unwrap_or(Value::Null)), stats.instructions, None),
		Err(e) => (EvalOutcome::Err(e.code.to_string()), 0, Some(e.code.to_string())),
	};
	let value_a = EvalOutcome::Value(primary_result.clone());

	let differs = match (value_a.as_value(), value_b.as_value()) {
		(Some(a), Some(b)) => !a.deep_eq(b),
		_ => true,
	};
	if !differs && !active.config.equals {
		return None;
	}

	let record = DiffRecord {
		node_id: ctx.node_id,
		req_id: ctx.req_id,
		decision_id: ctx.decision_id,
		path: ctx.path,
		input: ctx.input.unwrap_or(Value::Null),
		value_a,
		value_b,
		eval_ns_a: primary_eval_ns,
		eval_ns_b,
	};
	let _ = active.sender.try_send(record.clone());
	Some(SecondaryEval { record, stats: EvalStats { instructions: instructions_b, eval_ns: eval_ns_b }, error: error_b })
}
