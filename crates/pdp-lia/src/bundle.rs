// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_ir::Policy;
use pdp_value::Value;
use serde::{Deserialize, Serialize};

/// The secondary side of a dual-evaluation: an already-compiled policy
/// plus the data document it evaluates against. Unpacking an uploaded
/// tarball into this shape is the job of an external front end; this
/// crate only evaluates already-compiled bundles.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CandidateBundle {
	pub policy: Policy,
	pub data: Value,
}
