// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::store::{Store, StoreTransaction};
use crate::trigger::{DataEvent, PolicyEvent, TriggerCallback, TriggerEvent};
use lock_api::{ArcRwLockReadGuard, ArcRwLockWriteGuard};
use parking_lot::RawRwLock;
use pdp_core::Result;
use pdp_value::{PatchOp, Path, Value};
use std::collections::HashMap;
use std::sync::Arc;

type SharedState = Arc<parking_lot::RwLock<DocumentState>>;

struct DocumentState {
	root: Value,
	policies: HashMap<String, Vec<u8>>,
}

/// The single writable store at the root of a namespace tree. Backed by
/// an in-memory document guarded by a reader/writer lock: any number of
/// concurrent read transactions, at most one write transaction, enforced
/// by the lock itself rather than a side channel.
#[derive(Clone)]
pub struct MemoryStore {
	state: SharedState,
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryStore {
	pub fn new() -> Self {
		Self { state: Arc::new(parking_lot::RwLock::new(DocumentState { root: Value::empty_object(), policies: HashMap::new() })) }
	}
}

impl Store for MemoryStore {
	fn new_transaction(&self, write: bool) -> Result<Box<dyn StoreTransaction>> {
		if write {
			let guard = self.state.write_arc();
			let working_root = guard.root.clone();
			let working_policies = guard.policies.clone();
			Ok(Box::new(MemoryWriteTxn {
				guard,
				working_root,
				working_policies,
				events: TriggerEvent::default(),
				triggers: Vec::new(),
			}))
		} else {
			let guard = self.state.read_arc();
			Ok(Box::new(MemoryReadTxn { guard }))
		}
	}

	fn is_writable(&self) -> bool {
		true
	}
}

struct MemoryReadTxn {
	guard: ArcRwLockReadGuard<RawRwLock, DocumentState>,
}

impl StoreTransaction for MemoryReadTxn {
	fn read(&self, path: &Path) -> Result<Value> {
		read_at(&self.guard.root, path)
	}

	fn write(&mut self, _op: PatchOp, _path: &Path, _value: Value) -> Result<()> {
		Err(pdp_core::Error::writes_not_supported("transaction was opened read-only"))
	}

	fn commit(self: Box<Self>) -> Result<TriggerEvent> {
		Ok(TriggerEvent::default())
	}

	fn abort(self: Box<Self>) {}

	fn get_policy(&self, id: &str) -> Result<Vec<u8>> {
		self.guard
			.policies
			.get(id)
			.cloned()
			.ok_or_else(|| pdp_core::Error::not_found(format!("policy \"{id}\" not found")))
	}

	fn list_policies(&self) -> Result<Vec<String>> {
		Ok(self.guard.policies.keys().cloned().collect())
	}
}

struct MemoryWriteTxn {
	guard: ArcRwLockWriteGuard<RawRwLock, DocumentState>,
	working_root: Value,
	working_policies: HashMap<String, Vec<u8>>,
	events: TriggerEvent,
	triggers: Vec<TriggerCallback>,
}

impl StoreTransaction for MemoryWriteTxn {
	fn read(&self, path: &Path) -> Result<Value> {
		read_at(&self.working_root, path)
	}

	fn write(&mut self, op: PatchOp, path: &Path, value: Value) -> Result<()> {
		self.working_root = pdp_value::apply_patch(&self.working_root, op, path, value.clone())?;
		self.events.data.push(DataEvent { path: path.clone(), value, removed: matches!(op, PatchOp::Remove) });
		Ok(())
	}

	fn commit(mut self: Box<Self>) -> Result<TriggerEvent> {
		self.guard.root = self.working_root;
		self.guard.policies = self.working_policies;
		let event = self.events;
		for trigger in self.triggers {
			trigger(&event);
		}
		Ok(event)
	}

	fn abort(self: Box<Self>) {}

	fn truncate(&mut self) -> Result<()> {
		self.working_root = Value::empty_object();
		self.working_policies.clear();
		Ok(())
	}

	fn upsert_policy(&mut self, id: &str, bytes: Vec<u8>) -> Result<()> {
		self.working_policies.insert(id.to_string(), bytes.clone());
		self.events.policy.push(PolicyEvent { id: id.to_string(), bytes, removed: false });
		Ok(())
	}

	fn get_policy(&self, id: &str) -> Result<Vec<u8>> {
		self.working_policies.get(id).cloned().ok_or_else(|| pdp_core::Error::not_found(format!("policy \"{id}\" not found")))
	}

	fn delete_policy(&mut self, id: &str) -> Result<()> {
		let bytes = self
			.working_policies
			.remove(id)
			.ok_or_else(|| pdp_core::Error::not_found(format!("policy \"{id}\" not found")))?;
		self.events.policy.push(PolicyEvent { id: id.to_string(), bytes, removed: true });
		Ok(())
	}

	fn list_policies(&self) -> Result<Vec<String>> {
		Ok(self.working_policies.keys().cloned().collect())
	}

	fn register(&mut self, trigger: TriggerCallback) {
		self.triggers.push(trigger);
	}
}

fn read_at(root: &Value, path: &Path) -> Result<Value> {
	if path.is_empty() {
		return Ok(root.clone());
	}
	root.get_path(path).cloned().ok_or_else(|| pdp_core::Error::not_found(format!("path \"{path}\" not found")))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn write_then_read_round_trips_value() {
		let store = MemoryStore::new();
		let mut txn = store.new_transaction(true).unwrap();
		txn.write(PatchOp::Add, &Path::parse("/foo"), Value::int(1)).unwrap();
		assert_eq!(txn.read(&Path::parse("/foo")).unwrap(), Value::int(1));
		txn.commit().unwrap();

		let txn = store.new_transaction(false).unwrap();
		assert_eq!(txn.read(&Path::parse("/foo")).unwrap(), Value::int(1));
	}

	#[test]
	fn abort_discards_working_copy() {
		let store = MemoryStore::new();
		let mut txn = store.new_transaction(true).unwrap();
		txn.write(PatchOp::Add, &Path::parse("/foo"), Value::int(1)).unwrap();
		txn.abort();

		let txn = store.new_transaction(false).unwrap();
		assert!(txn.read(&Path::parse("/foo")).is_err());
	}

	#[test]
	fn read_of_empty_root_is_empty_object() {
		let store = MemoryStore::new();
		let txn = store.new_transaction(false).unwrap();
		assert_eq!(txn.read(&Path::root()).unwrap(), Value::empty_object());
	}

	#[test]
	fn commit_fires_registered_trigger_with_data_event() {
		use std::sync::mpsc;
		let store = MemoryStore::new();
		let (tx, rx) = mpsc::channel();
		let mut txn = store.new_transaction(true).unwrap();
		txn.write(PatchOp::Add, &Path::parse("/foo"), Value::int(1)).unwrap();
		txn.register(Box::new(move |event: &TriggerEvent| {
			tx.send(event.data.len()).unwrap();
		}));
		txn.commit().unwrap();
		assert_eq!(rx.recv().unwrap(), 1);
	}
}
