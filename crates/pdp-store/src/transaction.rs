// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::namespace::{Mount, NamespaceTree};
use crate::ownership::PathOwnershipRegistry;
use crate::store::StoreTransaction;
use crate::trigger::TriggerEvent;
use pdp_core::{Error, Result, WireCode};
use pdp_value::{PatchOp, Path, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A virtual transaction spanning every backing store a request touches.
/// Underlying per-store transactions are opened lazily, on first read or
/// write against that store, and tracked in `root`/`overlays` for the
/// duration of this transaction.
pub struct Transaction {
	namespace: Arc<NamespaceTree>,
	ownership: Arc<PathOwnershipRegistry>,
	write: bool,
	writer: Option<String>,
	root: Option<Box<dyn StoreTransaction>>,
	overlays: HashMap<Path, Box<dyn StoreTransaction>>,
	triggers: Vec<crate::trigger::TriggerCallback>,
}

impl Transaction {
	pub fn new(namespace: Arc<NamespaceTree>, ownership: Arc<PathOwnershipRegistry>, write: bool) -> Self {
		Self { namespace, ownership, write, writer: None, root: None, overlays: HashMap::new(), triggers: Vec::new() }
	}

	/// Marks writes on this transaction as coming from `plugin`, so
	/// `write_unchecked` can be attributed and ordinary `write` calls by
	/// other callers still see the prefix as owned.
	pub fn as_plugin_writer(mut self, plugin: impl Into<String>) -> Self {
		self.writer = Some(plugin.into());
		self
	}

	fn root_txn(&mut self) -> Result<&mut dyn StoreTransaction> {
		if self.root.is_none() {
			self.root = Some(self.namespace.root().new_transaction(self.write)?);
		}
		Ok(self.root.as_deref_mut().unwrap())
	}

	fn overlay_txn(&mut self, mount: &Mount) -> Result<&mut dyn StoreTransaction> {
		if !self.overlays.contains_key(&mount.prefix) {
			let txn = mount.store.new_transaction(false)?;
			self.overlays.insert(mount.prefix.clone(), txn);
		}
		Ok(self.overlays.get_mut(&mount.prefix).unwrap().as_mut())
	}

	/// Reads the composed document at `path`: delegates entirely to an
	/// overlay when `path` is at or under its mount, otherwise reads the
	/// root and splices in any overlays nested under `path`.
	pub fn read(&mut self, path: &Path) -> Result<Value> {
		if let Some(mount) = self.namespace.route(path).cloned() {
			let suffix = path.strip_prefix(&mount.prefix);
			return self.overlay_txn(&mount)?.read(&suffix);
		}

		let nested: Vec<Mount> = self.namespace.mounts_under(path).cloned().collect();

		let (mut composed, mut found_any) = match self.root_txn()?.read(path) {
			Ok(v) => (v, true),
			Err(e) if e.code == WireCode::NotFound => (Value::empty_object(), false),
			Err(e) => return Err(e),
		};

		for mount in nested {
			let relative = mount.prefix.strip_prefix(path);
			match self.overlay_txn(&mount)?.read(&Path::root()) {
				Ok(value) => {
					composed = pdp_value::apply_patch(&composed, PatchOp::Add, &relative, value)?;
					found_any = true;
				}
				Err(e) if e.code == WireCode::NotFound => {}
				Err(e) => return Err(e),
			}
		}

		if !found_any && !path.is_empty() {
			return Err(Error::not_found(format!("path \"{path}\" not found")));
		}
		Ok(composed)
	}

	/// Writes to `path`, honoring overlay read-only-ness and the
	/// path-ownership registry.
	pub fn write(&mut self, op: PatchOp, path: &Path, value: Value) -> Result<()> {
		self.check_writable(path)?;
		self.ownership.check_write(path, self.writer.as_deref())?;
		self.root_txn()?.write(op, path, value)
	}

	/// Writes to `path` bypassing the ownership check. Reserved for a
	/// plugin writing into a subtree it itself registered.
	pub fn write_unchecked(&mut self, op: PatchOp, path: &Path, value: Value) -> Result<()> {
		self.check_writable(path)?;
		self.root_txn()?.write(op, path, value)
	}

	fn check_writable(&self, path: &Path) -> Result<()> {
		if !self.write {
			return Err(Error::invalid_transaction("transaction was opened read-only"));
		}
		if self.namespace.route(path).is_some() {
			return Err(Error::writes_not_supported(format!("path \"{path}\" is served by a read-only overlay")));
		}
		Ok(())
	}

	pub fn truncate(&mut self) -> Result<()> {
		self.root_txn()?.truncate()
	}

	pub fn upsert_policy(&mut self, id: &str, bytes: Vec<u8>) -> Result<()> {
		self.root_txn()?.upsert_policy(id, bytes)
	}

	pub fn get_policy(&mut self, id: &str) -> Result<Vec<u8>> {
		self.root_txn()?.get_policy(id)
	}

	pub fn delete_policy(&mut self, id: &str) -> Result<()> {
		self.root_txn()?.delete_policy(id)
	}

	pub fn list_policies(&mut self) -> Result<Vec<String>> {
		self.root_txn()?.list_policies()
	}

	/// Registers an on-commit callback, fired once after this
	/// transaction's `commit` has applied every underlying write.
	pub fn register(&mut self, trigger: crate::trigger::TriggerCallback) {
		self.triggers.push(trigger);
	}

	/// Commits the root store first (it alone can refuse), then the
	/// read-only overlay transactions opened during this transaction's
	/// lifetime, then fires registered triggers.
	pub fn commit(mut self) -> Result<TriggerEvent> {
		let event = match self.root.take() {
			Some(txn) => txn.commit()?,
			None => TriggerEvent::default(),
		};
		for (_, txn) in self.overlays.drain() {
			txn.commit()?;
		}
		if self.write {
			for trigger in self.triggers.drain(..) {
				trigger(&event);
			}
		}
		Ok(event)
	}

	pub fn abort(mut self) {
		if let Some(txn) = self.root.take() {
			txn.abort();
		}
		for (_, txn) in self.overlays.drain() {
			txn.abort();
		}
	}
}
