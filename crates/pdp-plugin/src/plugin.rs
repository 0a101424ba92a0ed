// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::status::PluginStatus;
use pdp_core::Result;
use pdp_value::Value;

/// A running data or sink plugin. `start`/`stop` bracket the plugin's
/// background task (claiming and releasing its owned path, spawning and
/// aborting its poll loop); `start` must be idempotent after a prior
/// `stop`. `reconfigure` is a no-op when the new config is semantically
/// equal to the current one, else it is stop followed by start.
pub trait Plugin: Send {
	fn start(&mut self) -> Result<()>;

	fn stop(&mut self);

	fn reconfigure(&mut self, new_config: Value) -> Result<()>;

	fn status(&self) -> PluginStatus;
}

/// Default `reconfigure` for plugins whose config is a plain [`Value`]:
/// compares structurally, otherwise stops and restarts.
pub fn reconfigure_via_restart(
	plugin: &mut dyn Plugin,
	current: &Value,
	new_config: &Value,
) -> Result<bool> {
	if current.deep_eq(new_config) {
		return Ok(false);
	}
	plugin.stop();
	plugin.start()?;
	Ok(true)
}
