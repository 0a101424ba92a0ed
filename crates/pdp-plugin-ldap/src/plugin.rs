// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::config::LdapConfig;
use crate::fetcher::LdapFetcher;
use pdp_core::{CancellationToken, Result};
use pdp_plugin::{Factory, Plugin, PluginManager, PluginStatus, PollLoop, TransformHandle, WriteMode};
use pdp_value::{Path, Value};

const PLUGIN_TYPE: &str = "ldap";

pub struct LdapPlugin {
	manager: PluginManager,
	config: LdapConfig,
	transform: TransformHandle,
	running: Option<CancellationToken>,
	status: PluginStatus,
}

impl LdapPlugin {
	pub fn new(manager: PluginManager, config: LdapConfig) -> Self {
		Self { manager, config, transform: TransformHandle::new(), running: None, status: PluginStatus::NotReady }
	}
}

impl Plugin for LdapPlugin {
	fn start(&mut self) -> Result<()> {
		if self.running.is_some() {
			return Ok(());
		}
		let path = Path::parse(&self.config.path);
		self.manager.claim_path(PLUGIN_TYPE, &path)?;

		let cancellation = CancellationToken::new();
		let poll = PollLoop {
			plugin_name: PLUGIN_TYPE.to_string(),
			owned_path: path,
			tick: self.config.poll_interval(),
			fetch_timeout: self.config.poll_interval(),
			write_mode: WriteMode::Replace,
			transform: self.transform.clone(),
			manager: self.manager.clone(),
			fetcher: LdapFetcher::new(self.config.clone()),
			cancellation: cancellation.clone(),
		};
		tokio::spawn(poll.run());

		self.running = Some(cancellation);
		self.status = PluginStatus::Ready;
		Ok(())
	}

	fn stop(&mut self) {
		if let Some(cancellation) = self.running.take() {
			cancellation.cancel();
		}
		self.manager.release_paths(PLUGIN_TYPE);
		self.status = PluginStatus::NotReady;
	}

	fn reconfigure(&mut self, new_config: Value) -> Result<()> {
		let new_config = LdapConfig::validate(&new_config)?;
		if self.config.to_value() == new_config.to_value() {
			return Ok(());
		}
		self.stop();
		self.config = new_config;
		self.start()
	}

	fn status(&self) -> PluginStatus {
		self.status
	}
}

pub struct LdapFactory;

impl Factory for LdapFactory {
	fn plugin_type(&self) -> &'static str {
		PLUGIN_TYPE
	}

	fn validate(&self, raw: &Value) -> Result<Value> {
		Ok(LdapConfig::validate(raw)?.to_value())
	}

	fn new_plugin(&self, manager: PluginManager, config: Value) -> Result<Box<dyn Plugin>> {
		let config = LdapConfig::validate(&config)?;
		Ok(Box::new(LdapPlugin::new(manager, config)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pdp_store::{MemoryStore, NamespaceTree, PathOwnershipRegistry};
	use std::sync::Arc;

	fn manager() -> PluginManager {
		let namespace = Arc::new(NamespaceTree::new(Arc::new(MemoryStore::new())));
		PluginManager::new(namespace, Arc::new(PathOwnershipRegistry::new()))
	}

	fn config() -> LdapConfig {
		LdapConfig::validate(&Value::from(serde_json::json!({
			"url": "ldaps://directory.internal",
			"bind_dn": "cn=pdp,dc=example,dc=com",
			"bind_password": "secret",
			"base_dn": "dc=example,dc=com",
			"filter": "(objectClass=person)",
			"attributes": ["cn"],
			"path": "/ldap/users",
		})))
		.unwrap()
	}

	#[tokio::test]
	async fn start_then_stop_releases_ownership() {
		let manager = manager();
		let mut plugin = LdapPlugin::new(manager.clone(), config());
		plugin.start().unwrap();
		assert_eq!(plugin.status(), PluginStatus::Ready);
		plugin.stop();

		let mut txn = manager.begin_write("someone-else");
		assert!(txn.write(pdp_value::PatchOp::Add, &Path::parse("/ldap/users/x"), Value::int(1)).is_ok());
	}

	#[test]
	fn factory_rejects_config_missing_required_fields() {
		let factory = LdapFactory;
		let raw = Value::from(serde_json::json!({"url": ""}));
		assert!(factory.validate(&raw).is_err());
	}
}
