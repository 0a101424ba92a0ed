// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::store::Store;
use pdp_core::{Error, Result};
use pdp_value::Path;
use std::sync::Arc;

/// One overlay binding: a read-only store grafted onto the namespace tree
/// at `prefix`. `complete_path` names the depth at which the mounted
/// store's own keys are exhausted and a leaf value lives; it is always at
/// least as deep as `prefix`.
#[derive(Clone)]
pub struct Mount {
	pub prefix: Path,
	pub complete_path: Path,
	pub store: Arc<dyn Store>,
}

/// A prefix trie over one writable root store and any number of read-only
/// overlays. Overlapping mounts are rejected at build time so every path
/// resolves to at most one store.
pub struct NamespaceTree {
	root: Arc<dyn Store>,
	mounts: Vec<Mount>,
}

impl NamespaceTree {
	pub fn new(root: Arc<dyn Store>) -> Self {
		Self { root, mounts: Vec::new() }
	}

	/// Grafts `store` at `prefix`. Fails if `prefix` equals or is a
	/// strict prefix/suffix of an already-mounted prefix, or if
	/// `complete_path` does not extend `prefix`.
	pub fn mount(&mut self, prefix: Path, complete_path: Path, store: Arc<dyn Store>) -> Result<()> {
		if !complete_path.starts_with(&prefix) {
			return Err(Error::internal(format!("complete path \"{complete_path}\" does not extend mount prefix \"{prefix}\"")));
		}
		for existing in &self.mounts {
			if existing.prefix == prefix
				|| existing.prefix.is_strict_prefix_of(&prefix)
				|| prefix.is_strict_prefix_of(&existing.prefix)
			{
				return Err(Error::internal(format!(
					"mount \"{prefix}\" overlaps existing mount \"{}\"",
					existing.prefix
				)));
			}
		}
		self.mounts.push(Mount { prefix, complete_path, store });
		Ok(())
	}

	pub fn root(&self) -> &Arc<dyn Store> {
		&self.root
	}

	/// The deepest mount whose prefix is at or above `path`, if any —
	/// the mount that should service `path` entirely.
	pub fn route(&self, path: &Path) -> Option<&Mount> {
		self.mounts.iter().filter(|m| path.starts_with(&m.prefix)).max_by_key(|m| m.prefix.len())
	}

	/// Mounts strictly nested under `path`, for splicing a shallower
	/// read serviced by the root store.
	pub fn mounts_under<'a>(&'a self, path: &'a Path) -> impl Iterator<Item = &'a Mount> + 'a {
		self.mounts.iter().filter(move |m| m.prefix.starts_with(path) && m.prefix != *path)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::memory::MemoryStore;
	use crate::overlay::OverlayStore;
	use pdp_value::Value;

	#[test]
	fn overlapping_mounts_are_rejected() {
		let mut tree = NamespaceTree::new(Arc::new(MemoryStore::new()));
		tree.mount(Path::parse("/kafka"), Path::parse("/kafka/-"), Arc::new(OverlayStore::new(Value::empty_object())))
			.unwrap();
		let err = tree
			.mount(Path::parse("/kafka/messages"), Path::parse("/kafka/messages/-"), Arc::new(OverlayStore::new(Value::empty_object())))
			.unwrap_err();
		assert_eq!(err.code, pdp_core::WireCode::Internal);
	}

	#[test]
	fn route_finds_deepest_mount() {
		let mut tree = NamespaceTree::new(Arc::new(MemoryStore::new()));
		tree.mount(Path::parse("/kafka"), Path::parse("/kafka/-"), Arc::new(OverlayStore::new(Value::empty_object())))
			.unwrap();
		assert!(tree.route(&Path::parse("/kafka/messages")).is_some());
		assert!(tree.route(&Path::parse("/other")).is_none());
	}
}
