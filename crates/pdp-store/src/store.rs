// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::trigger::{TriggerCallback, TriggerEvent};
use pdp_core::{Error, Result};
use pdp_value::{PatchOp, Path, Value};

/// A backing document store: the root store or one overlay. Every method
/// here operates through a `StoreTransaction`; `Store` itself only begins
/// them.
pub trait Store: Send + Sync {
	fn new_transaction(&self, write: bool) -> Result<Box<dyn StoreTransaction>>;

	/// `true` for the single writable root store; `false` for overlays.
	fn is_writable(&self) -> bool;
}

/// A transaction against one backing store. Optional capabilities
/// (`truncate`, policy CRUD, trigger registration) default to failing with
/// the appropriate wire code; only the root store's transaction overrides
/// them.
pub trait StoreTransaction: Send {
	fn read(&self, path: &Path) -> Result<Value>;

	fn write(&mut self, op: PatchOp, path: &Path, value: Value) -> Result<()>;

	fn commit(self: Box<Self>) -> Result<TriggerEvent>;

	fn abort(self: Box<Self>);

	fn truncate(&mut self) -> Result<()> {
		Err(Error::writes_not_supported("truncate is not supported by this store"))
	}

	fn upsert_policy(&mut self, _id: &str, _bytes: Vec<u8>) -> Result<()> {
		Err(Error::writes_not_supported("policies can only be stored in the root store"))
	}

	fn get_policy(&self, id: &str) -> Result<Vec<u8>> {
		Err(Error::not_found(format!("policy \"{id}\" not found")))
	}

	fn delete_policy(&mut self, _id: &str) -> Result<()> {
		Err(Error::writes_not_supported("policies can only be stored in the root store"))
	}

	fn list_policies(&self) -> Result<Vec<String>> {
		Ok(Vec::new())
	}

	fn register(&mut self, _trigger: TriggerCallback) {}
}
