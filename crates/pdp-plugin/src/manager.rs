// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_core::Result;
use pdp_store::{NamespaceTree, PathOwnershipRegistry, Transaction};
use pdp_value::{PatchOp, Path, Value};
use std::sync::Arc;

/// Shared context handed to every plugin at construction: a handle on the
/// composite store for registering owned paths and allocating their
/// initial empty object, plus the process-wide ownership registry.
#[derive(Clone)]
pub struct PluginManager {
	namespace: Arc<NamespaceTree>,
	ownership: Arc<PathOwnershipRegistry>,
}

impl PluginManager {
	pub fn new(namespace: Arc<NamespaceTree>, ownership: Arc<PathOwnershipRegistry>) -> Self {
		Self { namespace, ownership }
	}

	/// Registers `prefix` as owned by `plugin` and allocates an empty
	/// object there in a single committed transaction. Called once from
	/// `Plugin::start`.
	pub fn claim_path(&self, plugin: &str, prefix: &Path) -> Result<()> {
		self.ownership.register(prefix.clone(), plugin)?;
		let mut txn = self.begin_write(plugin);
		txn.write_unchecked(PatchOp::Add, prefix, Value::empty_object())?;
		txn.commit()?;
		Ok(())
	}

	/// Releases every path owned by `plugin`. Called from `Plugin::stop`.
	pub fn release_paths(&self, plugin: &str) {
		self.ownership.release(plugin);
	}

	/// Opens a write transaction attributed to `plugin`, so its own
	/// writes bypass the ownership check that would otherwise reject
	/// them as a non-owner.
	pub fn begin_write(&self, plugin: &str) -> Transaction {
		Transaction::new(self.namespace.clone(), self.ownership.clone(), true).as_plugin_writer(plugin)
	}

	/// Opens a read-only transaction, e.g. to read the current contents
	/// of the subtree a poll is about to replace or merge into.
	pub fn begin_read(&self) -> Transaction {
		Transaction::new(self.namespace.clone(), self.ownership.clone(), false)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pdp_store::MemoryStore;

	fn manager() -> PluginManager {
		let namespace = Arc::new(NamespaceTree::new(Arc::new(MemoryStore::new())));
		PluginManager::new(namespace, Arc::new(PathOwnershipRegistry::new()))
	}

	#[test]
	fn claim_path_registers_ownership_and_seeds_empty_object() {
		let manager = manager();
		manager.claim_path("kafka", &Path::parse("/kafka/messages")).unwrap();

		let mut txn = manager.begin_write("other");
		let err = txn.write(PatchOp::Add, &Path::parse("/kafka/messages/topic1"), Value::int(1)).unwrap_err();
		assert_eq!(err.message, "path \"/kafka/messages/topic1\" is owned by plugin \"kafka\"");

		let mut read_txn = manager.begin_read();
		assert_eq!(read_txn.read(&Path::parse("/kafka/messages")).unwrap(), Value::empty_object());
	}

	#[test]
	fn release_paths_allows_subsequent_external_writes() {
		let manager = manager();
		manager.claim_path("kafka", &Path::parse("/kafka/messages")).unwrap();
		manager.release_paths("kafka");

		let mut txn = manager.begin_write("other");
		assert!(txn.write(PatchOp::Add, &Path::parse("/kafka/messages/topic1"), Value::int(1)).is_ok());
	}
}
