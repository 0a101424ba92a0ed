// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_store::{MemoryStore, NamespaceTree, PathOwnershipRegistry, Transaction};
use pdp_value::{PatchOp, Path, Value};
use std::sync::Arc;

/// A bare namespace tree over an empty in-memory root store, plus its
/// ownership registry, ready for a fresh write or read-only transaction.
pub fn memory_namespace() -> (Arc<NamespaceTree>, Arc<PathOwnershipRegistry>) {
	let namespace = Arc::new(NamespaceTree::new(Arc::new(MemoryStore::new())));
	let ownership = Arc::new(PathOwnershipRegistry::new());
	(namespace, ownership)
}

/// Writes `value` at `path` in a single committed transaction. Panics on
/// failure: this is a test setup helper, not production code.
pub fn seed(namespace: &Arc<NamespaceTree>, ownership: &Arc<PathOwnershipRegistry>, path: &str, value: Value) {
	let mut txn = Transaction::new(namespace.clone(), ownership.clone(), true);
	txn.write(PatchOp::Add, &Path::parse(path), value).expect("seed write");
	txn.commit().expect("seed commit");
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn seeded_value_is_readable_afterward() {
		let (namespace, ownership) = memory_namespace();
		seed(&namespace, &ownership, "/foo", Value::string("bar"));
		let mut txn = Transaction::new(namespace, ownership, false);
		assert_eq!(txn.read(&Path::parse("/foo")).unwrap(), Value::string("bar"));
	}
}
