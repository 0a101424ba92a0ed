// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

mod decision_logs;
mod plugins;

pub use decision_logs::{ConsoleLogConfig, ConsoleStream, DecisionLogsConfig, RemoteLogConfig};
pub use plugins::PluginsConfig;

use pdp_core::Result;
use pdp_value::Value;

/// The server's top-level configuration, mirroring the YAML document's
/// `decision_logs`/`plugins` sections. Loading and parsing the document
/// itself (file I/O, YAML syntax) is an external collaborator's job; this
/// type only validates and shapes an already-parsed raw tree.
#[derive(Clone, Debug, Default)]
pub struct Config {
	pub decision_logs: DecisionLogsConfig,
	pub plugins: PluginsConfig,
}

impl Config {
	pub fn from_raw(raw: &Value) -> Result<Self> {
		Ok(Self {
			decision_logs: DecisionLogsConfig::from_raw(raw.get_key("decision_logs"))?,
			plugins: PluginsConfig::from_raw(raw.get_key("plugins"))?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_yields_default_config() {
		let config = Config::from_raw(&Value::empty_object()).unwrap();
		assert!(config.plugins.data.is_empty());
		assert!(config.decision_logs.console.is_none());
	}

	#[test]
	fn unknown_plugins_section_fails_the_whole_load() {
		let raw = Value::object(vec![("plugins".into(), Value::object(vec![("bogus".into(), Value::empty_object())]))]);
		assert!(Config::from_raw(&raw).is_err());
	}
}
