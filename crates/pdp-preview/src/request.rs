// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::flags::PreviewFlags;
use pdp_ir::Policy;
use pdp_value::Value;
use serde::{Deserialize, Serialize};

/// Identifies the bundle a compiled policy came from, echoed back as
/// provenance when requested.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BundleRevision {
	pub id: String,
	pub revision: String,
}

/// A preview body, accepted as JSON or YAML (optionally gzip-compressed)
/// over the wire. Carries an already-compiled policy directly: compiling
/// `rego_modules` into a `Policy` is the job of an external front end this
/// crate never invokes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewRequest {
	pub policy: Policy,
	pub plan_name: String,
	pub input: Option<Value>,
	/// Overlay data, spliced over (or replacing, under `sandbox`) the
	/// live primary document.
	pub data: Value,
	pub bundle: Option<BundleRevision>,
	pub flags: PreviewFlags,
}
