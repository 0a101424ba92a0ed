// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::decision::{emit_log, emit_secondary_log, evaluate};
use crate::state::AppState;
use axum::extract::{Path as AxumPath, State};
use axum::Json;
use pdp_core::{DecisionId, RequestId};
use pdp_value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::SystemTime;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct BatchRequest {
	pub inputs: HashMap<String, Value>,
}

#[derive(Serialize)]
pub struct BatchItemResponse {
	pub result: Option<Value>,
	pub decision_id: DecisionId,
}

#[derive(Serialize)]
pub struct BatchResponse {
	pub responses: HashMap<String, BatchItemResponse>,
}

/// `POST /v1/batch/data/{*path}`. Each input is evaluated independently —
/// no ordering guarantee between them — but every decision log line shares
/// one `batch_decision_id` tying the batch together.
pub async fn decide_batch(State(state): State<AppState>, AxumPath(path): AxumPath<String>, Json(body): Json<BatchRequest>) -> Json<BatchResponse> {
	let batch_decision_id = Uuid::new_v4().to_string();
	let mut responses = HashMap::with_capacity(body.inputs.len());

	for (id, input) in body.inputs {
		let req_id = RequestId::new();
		let decision_id = DecisionId::new();
		let now = SystemTime::now();
		let seed = rand::random::<u64>();

		let (result, metrics, error, secondary) = evaluate(&state, &path, req_id, decision_id, Some(input.clone()), now, seed).await;
		let input = Some(input);
		emit_log(&state, &path, req_id, decision_id, now, &input, &result, metrics, error.as_ref(), Some(batch_decision_id.clone())).await;
		if let Some(secondary) = secondary {
			emit_secondary_log(&state, &path, req_id, decision_id, now, &input, &secondary).await;
		}

		responses.insert(id, BatchItemResponse { result, decision_id });
	}

	Json(BatchResponse { responses })
}
