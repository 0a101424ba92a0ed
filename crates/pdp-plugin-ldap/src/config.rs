// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::error::LdapConfigError;
use pdp_core::Result;
use pdp_value::Value;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_poll_interval_ms() -> u64 {
	30_000
}

/// `plugins.data.ldap` configuration. A poll runs `filter` under `base_dn`
/// against `url`, projecting `attributes` off each entry and writing the
/// owned subtree as a JSON object keyed by each result's DN.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LdapConfig {
	pub url: String,
	pub bind_dn: String,
	pub bind_password: String,
	pub base_dn: String,
	pub filter: String,
	pub attributes: Vec<String>,
	pub path: String,
	#[serde(default)]
	pub rego_transform: Option<String>,
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
}

impl LdapConfig {
	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}

	pub fn validate(raw: &Value) -> Result<Self> {
		let config: LdapConfig = serde_json::from_value(raw.clone().into()).map_err(LdapConfigError::Malformed)?;

		if config.url.is_empty() {
			return Err(LdapConfigError::NoUrl.into());
		}
		if config.base_dn.is_empty() {
			return Err(LdapConfigError::NoBaseDn.into());
		}
		if config.attributes.is_empty() {
			return Err(LdapConfigError::NoAttributes.into());
		}
		Ok(config)
	}

	pub fn to_value(&self) -> Value {
		Value::from(serde_json::to_value(self).expect("LdapConfig always serializes"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn base_config() -> serde_json::Value {
		serde_json::json!({
			"url": "ldaps://directory.internal",
			"bind_dn": "cn=pdp,dc=example,dc=com",
			"bind_password": "secret",
			"base_dn": "dc=example,dc=com",
			"filter": "(objectClass=person)",
			"attributes": ["cn", "mail"],
			"path": "/ldap/users",
		})
	}

	#[test]
	fn valid_config_round_trips() {
		let config = LdapConfig::validate(&Value::from(base_config())).unwrap();
		assert_eq!(config.attributes, vec!["cn", "mail"]);
		assert_eq!(config.poll_interval_ms, 30_000);
	}

	#[test]
	fn empty_base_dn_rejected() {
		let mut raw = base_config();
		raw["base_dn"] = serde_json::json!("");
		assert!(LdapConfig::validate(&Value::from(raw)).is_err());
	}

	#[test]
	fn empty_attributes_rejected() {
		let mut raw = base_config();
		raw["attributes"] = serde_json::json!([]);
		assert!(LdapConfig::validate(&Value::from(raw)).is_err());
	}
}
