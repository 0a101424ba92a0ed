// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_core::{DecisionId, NodeId, RequestId};
use pdp_value::Value;
use serde::{Deserialize, Serialize};

/// Either side of a diff record: the evaluation's single result, or the
/// wire code of an error it raised instead. A secondary evaluation that
/// errors where the primary succeeded is itself the signal worth
/// surfacing, so it becomes a record rather than being dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalOutcome {
	Value(Value),
	Err(String),
}

impl EvalOutcome {
	pub fn as_value(&self) -> Option<&Value> {
		match self {
			EvalOutcome::Value(v) => Some(v),
			EvalOutcome::Err(_) => None,
		}
	}

	/// JSON-rendered for CSV/table cells: the bare value, or `{"error":
	/// "<code>"}` for an error outcome.
	fn cell(&self) -> String {
		match self {
			EvalOutcome::Value(v) => serde_json::to_string(&v).unwrap_or_default(),
			EvalOutcome::Err(code) => format!("{{\"error\":\"{code}\"}}"),
		}
	}
}

/// One decision's dual-evaluation comparison, produced by the per-decision
/// hook that runs the candidate policy alongside the active one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiffRecord {
	pub node_id: NodeId,
	pub req_id: RequestId,
	pub decision_id: DecisionId,
	pub path: String,
	pub input: Value,
	pub value_a: EvalOutcome,
	pub value_b: EvalOutcome,
	pub eval_ns_a: u64,
	pub eval_ns_b: u64,
}

/// The exact per-record CSV column order.
pub const CSV_COLUMNS: &str = "node_id,req_id,value_a,value_b,input,path,eval_ns_a,eval_ns_b";
/// The table rendering renames the nanosecond columns.
pub const TABLE_COLUMNS: &str = "node_id,req_id,value_a,value_b,input,path,eval_duration_a,eval_duration_b";

impl DiffRecord {
	pub fn csv_row(&self) -> String {
		format!(
			"{},{},{},{},{},{},{},{}",
			csv_escape(&self.node_id.to_string()),
			csv_escape(&self.req_id.to_string()),
			csv_escape(&self.value_a.cell()),
			csv_escape(&self.value_b.cell()),
			csv_escape(&serde_json::to_string(&self.input).unwrap_or_default()),
			csv_escape(&self.path),
			self.eval_ns_a,
			self.eval_ns_b,
		)
	}

	pub fn table_row(&self) -> String {
		format!(
			"{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
			self.node_id,
			self.req_id,
			self.value_a.cell(),
			self.value_b.cell(),
			serde_json::to_string(&self.input).unwrap_or_default(),
			self.path,
			self.eval_ns_a,
			self.eval_ns_b,
		)
	}
}

fn csv_escape(field: &str) -> String {
	if field.contains(',') || field.contains('"') || field.contains('\n') {
		format!("\"{}\"", field.replace('"', "\"\""))
	} else {
		field.to_string()
	}
}
