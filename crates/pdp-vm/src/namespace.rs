// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_core::Result;
use pdp_value::{Path, Value};

/// The data root `DotStmt`/`ScanStmt` consult when walking `data.*`.
/// Implemented by the composite store's transaction; kept as a trait here
/// so the interpreter can be exercised against an in-memory fixture
/// without pulling in the store's locking machinery.
pub trait Namespace: Send {
	fn read(&mut self, path: &Path) -> Result<Value>;
}

impl Namespace for pdp_store::Transaction {
	fn read(&mut self, path: &Path) -> Result<Value> {
		pdp_store::Transaction::read(self, path)
	}
}

/// A fixed in-memory namespace, used in tests and by the preview
/// evaluator's scratch layer when no live transaction is involved.
pub struct StaticNamespace(pub Value);

impl Namespace for StaticNamespace {
	fn read(&mut self, path: &Path) -> Result<Value> {
		if path.is_empty() {
			return Ok(self.0.clone());
		}
		self.0
			.get_path(path)
			.cloned()
			.ok_or_else(|| pdp_core::Error::not_found(format!("path \"{path}\" not found")))
	}
}
