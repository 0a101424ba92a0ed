// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_core::{Error, Result};
use pdp_value::Value;
use std::collections::HashMap;

const KNOWN_SECTIONS: &[&str] = &["data", "impact_analysis", "eopa_dl", "preview"];

/// The `plugins` config section: per-plugin-type raw config blobs, each
/// later handed to that plugin type's own `Factory::validate`. Section
/// names outside the known set are a startup error — this crate only
/// enforces the envelope; the factories own their own field validation.
#[derive(Clone, Debug, Default)]
pub struct PluginsConfig {
	/// name -> raw config, one entry per configured data plugin instance.
	pub data: HashMap<String, Value>,
	pub impact_analysis: Option<Value>,
	pub eopa_dl: Option<Value>,
	pub preview: Option<Value>,
}

impl PluginsConfig {
	pub fn from_raw(raw: Option<&Value>) -> Result<Self> {
		let Some(raw) = raw else { return Ok(Self::default()) };
		let entries = raw.as_object().ok_or_else(|| Error::internal("plugins section must be an object"))?;

		for (key, _) in entries.as_slice() {
			if !KNOWN_SECTIONS.contains(&key.as_str()) {
				return Err(Error::internal(format!("unknown plugins section \"{key}\"")));
			}
		}

		let data = match raw.get_key("data") {
			Some(data_raw) => {
				let data_entries = data_raw.as_object().ok_or_else(|| Error::internal("plugins.data must be an object"))?;
				data_entries.as_slice().iter().map(|(name, cfg)| (name.clone(), cfg.clone())).collect()
			}
			None => HashMap::new(),
		};

		Ok(Self {
			data,
			impact_analysis: raw.get_key("impact_analysis").cloned(),
			eopa_dl: raw.get_key("eopa_dl").cloned(),
			preview: raw.get_key("preview").cloned(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_section_is_rejected() {
		let raw = Value::object(vec![("bogus".into(), Value::empty_object())]);
		let err = PluginsConfig::from_raw(Some(&raw)).unwrap_err();
		assert!(err.message.contains("unknown plugins section \"bogus\""));
	}

	#[test]
	fn data_plugins_keyed_by_name() {
		let raw = Value::object(vec![(
			"data".into(),
			Value::object(vec![("kafka".into(), Value::object(vec![("path".into(), Value::string("/kafka/messages"))]))]),
		)]);
		let config = PluginsConfig::from_raw(Some(&raw)).unwrap();
		assert!(config.data.contains_key("kafka"));
	}

	#[test]
	fn absent_section_yields_no_plugins() {
		let config = PluginsConfig::from_raw(None).unwrap();
		assert!(config.data.is_empty());
		assert!(config.preview.is_none());
	}
}
