// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::error::KafkaConfigError;
use pdp_core::Result;
use pdp_value::Value;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const KNOWN_SASL_MECHANISMS: [&str; 3] = ["PLAIN", "SCRAM-SHA-256", "SCRAM-SHA-512"];

fn default_poll_interval_ms() -> u64 {
	1000
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TlsConfig {
	pub ca_cert: Option<String>,
	pub client_cert: Option<String>,
	pub client_key: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaslConfig {
	pub mechanism: String,
	pub username: String,
	pub password: String,
}

/// `plugins.data.kafka` configuration. Mirrors the shape a YAML-parsed
/// `pdp-config` section hands the factory: broker/topic addressing, the
/// subtree this plugin will own, an optional transform rule reference, and
/// optional TLS/SASL material.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KafkaConfig {
	pub brokers: Vec<String>,
	pub topics: Vec<String>,
	pub group_id: String,
	pub path: String,
	#[serde(default)]
	pub rego_transform: Option<String>,
	#[serde(default)]
	pub tls: Option<TlsConfig>,
	#[serde(default)]
	pub sasl: Option<SaslConfig>,
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
}

impl KafkaConfig {
	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}

	/// Parses `raw` and rejects anything `Factory::new_plugin` could not
	/// safely act on: no brokers/topics, an unrecognized SASL mechanism,
	/// or a TLS cert configured without its matching key.
	pub fn validate(raw: &Value) -> Result<Self> {
		let config: KafkaConfig = serde_json::from_value(raw.clone().into()).map_err(KafkaConfigError::Malformed)?;

		if config.brokers.is_empty() {
			return Err(KafkaConfigError::NoBrokers.into());
		}
		if config.topics.is_empty() {
			return Err(KafkaConfigError::NoTopics.into());
		}
		if let Some(sasl) = &config.sasl {
			if !KNOWN_SASL_MECHANISMS.contains(&sasl.mechanism.as_str()) {
				return Err(KafkaConfigError::UnknownSaslMechanism(sasl.mechanism.clone()).into());
			}
		}
		if let Some(tls) = &config.tls {
			if tls.client_cert.is_some() != tls.client_key.is_some() {
				return Err(KafkaConfigError::CertWithoutKey.into());
			}
		}
		Ok(config)
	}

	pub fn to_value(&self) -> Value {
		Value::from(serde_json::to_value(self).expect("KafkaConfig always serializes"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn base_config() -> serde_json::Value {
		serde_json::json!({
			"brokers": ["localhost:9092"],
			"topics": ["messages"],
			"group_id": "pdp",
			"path": "/kafka/messages",
		})
	}

	#[test]
	fn valid_config_round_trips() {
		let raw = Value::from(base_config());
		let config = KafkaConfig::validate(&raw).unwrap();
		assert_eq!(config.brokers, vec!["localhost:9092"]);
		assert_eq!(config.poll_interval_ms, 1000);
	}

	#[test]
	fn unknown_sasl_mechanism_is_rejected() {
		let mut raw = base_config();
		raw["sasl"] = serde_json::json!({"mechanism": "MD5", "username": "u", "password": "p"});
		let err = KafkaConfig::validate(&Value::from(raw)).unwrap_err();
		assert!(err.message.contains("unknown SASL mechanism"));
	}

	#[test]
	fn cert_without_key_is_rejected() {
		let mut raw = base_config();
		raw["tls"] = serde_json::json!({"ca_cert": "ca", "client_cert": "cert"});
		let err = KafkaConfig::validate(&Value::from(raw)).unwrap_err();
		assert!(err.message.contains("client_cert"));
	}

	#[test]
	fn empty_brokers_rejected() {
		let mut raw = base_config();
		raw["brokers"] = serde_json::json!([]);
		assert!(KafkaConfig::validate(&Value::from(raw)).is_err());
	}
}
