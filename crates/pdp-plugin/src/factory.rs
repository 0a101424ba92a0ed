// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::manager::PluginManager;
use crate::plugin::Plugin;
use pdp_core::Result;
use pdp_value::Value;
use std::collections::HashMap;

/// Parses and validates a plugin type's raw configuration, then builds
/// plugin instances from the parsed form. One factory per plugin type
/// (`kafka`, `ldap`, ...), registered by name in a [`FactoryRegistry`].
pub trait Factory: Send + Sync {
	/// The `plugins.data.<name>` key this factory answers for.
	fn plugin_type(&self) -> &'static str;

	/// Parses `raw` into this plugin type's configuration shape,
	/// rejecting unknown SASL mechanisms, certs without keys, and other
	/// structurally invalid input before any plugin is constructed.
	fn validate(&self, raw: &Value) -> Result<Value>;

	/// Builds a plugin bound to `manager` from an already-validated
	/// config (the return value of `validate`).
	fn new_plugin(&self, manager: PluginManager, config: Value) -> Result<Box<dyn Plugin>>;
}

/// Maps plugin type name to its factory, mirroring how the server looks up
/// an authentication provider by method name.
#[derive(Default)]
pub struct FactoryRegistry {
	factories: HashMap<String, Box<dyn Factory>>,
}

impl FactoryRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, factory: Box<dyn Factory>) {
		self.factories.insert(factory.plugin_type().to_string(), factory);
	}

	pub fn get(&self, plugin_type: &str) -> Option<&dyn Factory> {
		self.factories.get(plugin_type).map(|f| f.as_ref())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::status::PluginStatus;

	struct NoopPlugin;
	impl Plugin for NoopPlugin {
		fn start(&mut self) -> Result<()> {
			Ok(())
		}
		fn stop(&mut self) {}
		fn reconfigure(&mut self, _new_config: Value) -> Result<()> {
			Ok(())
		}
		fn status(&self) -> PluginStatus {
			PluginStatus::Ready
		}
	}

	struct NoopFactory;
	impl Factory for NoopFactory {
		fn plugin_type(&self) -> &'static str {
			"noop"
		}
		fn validate(&self, raw: &Value) -> Result<Value> {
			Ok(raw.clone())
		}
		fn new_plugin(&self, _manager: PluginManager, _config: Value) -> Result<Box<dyn Plugin>> {
			Ok(Box::new(NoopPlugin))
		}
	}

	#[test]
	fn registry_looks_up_factory_by_plugin_type() {
		let mut registry = FactoryRegistry::new();
		registry.register(Box::new(NoopFactory));
		assert!(registry.get("noop").is_some());
		assert!(registry.get("missing").is_none());
	}
}
