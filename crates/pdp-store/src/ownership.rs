// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use parking_lot::Mutex;
use pdp_core::{Error, Result};
use pdp_value::Path;
use std::sync::Arc;

/// Process-wide map of plugin name to the path prefix it owns. `Write`
/// consults this before every external write; a plugin's own
/// `write_unchecked` bypasses it.
#[derive(Clone, Default)]
pub struct PathOwnershipRegistry {
	inner: Arc<Mutex<Vec<(Path, String)>>>,
}

impl PathOwnershipRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `plugin` as the owner of `prefix`. Returns an error if
	/// the prefix overlaps an existing registration.
	pub fn register(&self, prefix: Path, plugin: impl Into<String>) -> Result<()> {
		let plugin = plugin.into();
		let mut owners = self.inner.lock();
		if owners.iter().any(|(p, _)| p.starts_with(&prefix) || prefix.starts_with(p)) {
			return Err(Error::internal(format!("path \"{prefix}\" overlaps an existing plugin registration")));
		}
		owners.push((prefix, plugin));
		Ok(())
	}

	/// Releases every prefix owned by `plugin`, e.g. on plugin stop.
	pub fn release(&self, plugin: &str) {
		self.inner.lock().retain(|(_, owner)| owner != plugin);
	}

	/// Returns the owning plugin, if any, of the narrowest registered
	/// prefix that contains `path`.
	pub fn owner_of(&self, path: &Path) -> Option<String> {
		self.inner
			.lock()
			.iter()
			.filter(|(prefix, _)| path.starts_with(prefix))
			.max_by_key(|(prefix, _)| prefix.len())
			.map(|(_, owner)| owner.clone())
	}

	/// Fails with `owned_by_plugin` if `path` falls under a registered
	/// prefix owned by a plugin other than `writer`.
	pub fn check_write(&self, path: &Path, writer: Option<&str>) -> Result<()> {
		match self.owner_of(path) {
			Some(owner) if Some(owner.as_str()) != writer => Err(Error::owned_by_plugin(&path.to_string(), &owner)),
			_ => Ok(()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn external_write_under_owned_prefix_is_rejected() {
		let registry = PathOwnershipRegistry::new();
		registry.register(Path::parse("/kafka/messages"), "kafka").unwrap();
		let err = registry.check_write(&Path::parse("/kafka/messages/topic1"), None).unwrap_err();
		assert_eq!(err.message, "path \"/kafka/messages/topic1\" is owned by plugin \"kafka\"");
	}

	#[test]
	fn owning_plugin_write_unchecked_path_is_allowed() {
		let registry = PathOwnershipRegistry::new();
		registry.register(Path::parse("/kafka/messages"), "kafka").unwrap();
		assert!(registry.check_write(&Path::parse("/kafka/messages"), Some("kafka")).is_ok());
	}

	#[test]
	fn overlapping_registration_rejected() {
		let registry = PathOwnershipRegistry::new();
		registry.register(Path::parse("/kafka"), "kafka").unwrap();
		assert!(registry.register(Path::parse("/kafka/messages"), "other").is_err());
	}
}
