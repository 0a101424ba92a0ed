// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_core::{DecisionId, RequestId};
use pdp_value::{Path, PatchOp, Value};
use pdp_vm::EvalStats;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Bundle identity as reported on a decision log line.
#[derive(Clone, Debug, Serialize)]
pub struct Labels {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub version: String,
}

/// One completed decision, console- or remote-logged verbatim as JSON.
/// Either `result` or `error` is set, never both.
#[derive(Clone, Debug, Serialize)]
pub struct DecisionLogRecord {
	pub path: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub result: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub metrics: Option<EvalStats>,
	pub req_id: RequestId,
	pub decision_id: DecisionId,
	pub timestamp_ms: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub input: Option<Value>,
	pub labels: Labels,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub nd_builtin_cache: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub erased: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub masked: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub intermediate_results: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub custom: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub batch_decision_id: Option<String>,
}

impl DecisionLogRecord {
	pub fn new(path: String, req_id: RequestId, decision_id: DecisionId, time: SystemTime, labels: Labels) -> Self {
		let timestamp_ms = time.duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0);
		Self {
			path,
			result: None,
			error: None,
			metrics: None,
			req_id,
			decision_id,
			timestamp_ms,
			input: None,
			labels,
			nd_builtin_cache: None,
			erased: None,
			masked: None,
			intermediate_results: None,
			custom: None,
			batch_decision_id: None,
		}
	}

	/// Tags this record as belonging to a batch decision: `custom.type` is
	/// set to `"<system>/batch"` alongside `batch_decision_id`, matching
	/// the rest of a record's `custom` payload if one is already set.
	pub fn mark_batch(&mut self, batch_decision_id: String, system: &str) {
		self.batch_decision_id = Some(batch_decision_id);
		let custom = self.custom.take().unwrap_or_else(Value::empty_object);
		let custom = pdp_value::apply_patch(&custom, PatchOp::Add, &Path::parse("/type"), Value::string(format!("{system}/batch")))
			.expect("adding a key to an object never fails");
		self.custom = Some(custom);
	}
}
