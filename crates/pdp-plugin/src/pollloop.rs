// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

//! The polling loop every data plugin runs: wait for a tick or an exit
//! signal, fetch a batch, run it through the plugin's transform rule if
//! one is bound, and write the result to the plugin's owned subtree.
//! Transient fetch/transform errors are logged and the loop continues;
//! nothing here ever panics a task on a single bad batch.

use crate::manager::PluginManager;
use crate::transform::{run_transform, TransformHandle};
use crate::Fetcher;
use pdp_core::{CancellationToken, Result};
use pdp_value::{PatchOp, Path, Value};
use std::time::Duration;

/// How a fetched (and possibly transformed) batch is written to the
/// plugin's owned subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
	Replace,
	Merge,
}

pub struct PollLoop<F: Fetcher> {
	pub plugin_name: String,
	pub owned_path: Path,
	pub tick: Duration,
	pub fetch_timeout: Duration,
	pub write_mode: WriteMode,
	pub transform: TransformHandle,
	pub manager: PluginManager,
	pub fetcher: F,
	pub cancellation: CancellationToken,
}

impl<F: Fetcher> PollLoop<F> {
	/// Runs until cancelled. Intended to be handed to `tokio::spawn` by
	/// the owning `Plugin::start`.
	pub async fn run(mut self) {
		let mut ticker = tokio::time::interval(self.tick);
		loop {
			tokio::select! {
				_ = self.cancellation.cancelled() => {
					tracing::info!(plugin = %self.plugin_name, "poll loop stopped");
					return;
				}
				_ = ticker.tick() => {
					if let Err(err) = self.tick_once().await {
						tracing::warn!(plugin = %self.plugin_name, error = %err, "poll tick failed");
					}
				}
			}
		}
	}

	async fn tick_once(&mut self) -> Result<()> {
		let batch = match self.fetcher.fetch(self.fetch_timeout).await {
			Ok(batch) => batch,
			Err(err) => {
				tracing::warn!(plugin = %self.plugin_name, error = %err, "fetch failed, skipping tick");
				return Ok(());
			}
		};
		if is_empty_batch(&batch) {
			return Ok(());
		}

		let Some(transform) = self.transform.get() else {
			tracing::debug!(plugin = %self.plugin_name, "transform not yet bound, idling");
			return Ok(());
		};

		let mut read_txn = self.manager.begin_read();
		let previous = read_txn.read(&self.owned_path).unwrap_or_else(|_| Value::empty_object());

		let replacement = run_transform(&transform, batch, previous)?;

		let mut write_txn = self.manager.begin_write(&self.plugin_name);
		let op = match self.write_mode {
			WriteMode::Replace => PatchOp::Replace,
			WriteMode::Merge => PatchOp::Add,
		};
		write_txn.write_unchecked(op, &self.owned_path, replacement)?;
		write_txn.commit()?;
		Ok(())
	}
}

fn is_empty_batch(value: &Value) -> bool {
	match value {
		Value::Array(items) => items.is_empty(),
		Value::Object(entries) => entries.is_empty(),
		Value::Null => true,
		_ => false,
	}
}
