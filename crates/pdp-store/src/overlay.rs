// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::store::{Store, StoreTransaction};
use crate::trigger::TriggerEvent;
use parking_lot::RwLock;
use pdp_core::{Error, Result};
use pdp_value::{PatchOp, Path, Value};
use std::sync::Arc;

/// A read-only store mounted under a namespace-tree prefix. Rejects every
/// write with `writes_not_supported`; its contents can only change via
/// `OverlayStore::replace`, which the owning mount-point driver (a data
/// plugin, a secondary bundle loader) calls outside of any transaction.
#[derive(Clone)]
pub struct OverlayStore {
	data: Arc<RwLock<Value>>,
}

impl OverlayStore {
	pub fn new(data: Value) -> Self {
		Self { data: Arc::new(RwLock::new(data)) }
	}

	pub fn replace(&self, data: Value) {
		*self.data.write() = data;
	}
}

impl Store for OverlayStore {
	fn new_transaction(&self, write: bool) -> Result<Box<dyn StoreTransaction>> {
		if write {
			return Err(Error::writes_not_supported("overlay stores are read-only"));
		}
		Ok(Box::new(OverlayTransaction { snapshot: self.data.read().clone() }))
	}

	fn is_writable(&self) -> bool {
		false
	}
}

struct OverlayTransaction {
	snapshot: Value,
}

impl StoreTransaction for OverlayTransaction {
	fn read(&self, path: &Path) -> Result<Value> {
		if path.is_empty() {
			return Ok(self.snapshot.clone());
		}
		self.snapshot.get_path(path).cloned().ok_or_else(|| Error::not_found(format!("path \"{path}\" not found")))
	}

	fn write(&mut self, _op: PatchOp, _path: &Path, _value: Value) -> Result<()> {
		Err(Error::writes_not_supported("overlay stores are read-only"))
	}

	fn commit(self: Box<Self>) -> Result<TriggerEvent> {
		Ok(TriggerEvent::default())
	}

	fn abort(self: Box<Self>) {}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn overlay_rejects_write_transactions() {
		let overlay = OverlayStore::new(Value::empty_object());
		assert!(overlay.new_transaction(true).is_err());
	}

	#[test]
	fn overlay_read_reflects_replace() {
		let overlay = OverlayStore::new(Value::object(vec![("a".into(), Value::int(1))]));
		overlay.replace(Value::object(vec![("a".into(), Value::int(2))]));
		let txn = overlay.new_transaction(false).unwrap();
		assert_eq!(txn.read(&Path::parse("/a")).unwrap(), Value::int(2));
	}
}
