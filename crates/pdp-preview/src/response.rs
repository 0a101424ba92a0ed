// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_value::Value;
use pdp_vm::EvalStats;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BundleProvenance {
	pub id: String,
	pub revision: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Provenance {
	pub bundles: Vec<BundleProvenance>,
}

/// The assembled answer to a preview request: the first (and, for a
/// conflict-free plan, only) evaluation result, plus whatever optional
/// providers the request's flags turned on.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PreviewResponse {
	pub result: Option<Value>,
	pub printed: Option<Vec<String>>,
	pub metrics: Option<EvalStats>,
	pub provenance: Option<Provenance>,
}
