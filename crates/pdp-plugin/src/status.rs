// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

/// A plugin's lifecycle state, surfaced to the server's health endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PluginStatus {
	/// `start` has not yet been called, or `stop` completed.
	NotReady,
	/// `start` succeeded and the poll task is running.
	Ready,
	/// Configuration was invalid, or a fatal error stopped the poll task.
	Err,
}
