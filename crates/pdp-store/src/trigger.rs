// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_value::{Path, Value};

/// A data-path mutation observed by a commit.
#[derive(Clone, Debug)]
pub struct DataEvent {
	pub path: Path,
	pub value: Value,
	pub removed: bool,
}

/// A policy-document mutation observed by a commit.
#[derive(Clone, Debug)]
pub struct PolicyEvent {
	pub id: String,
	pub bytes: Vec<u8>,
	pub removed: bool,
}

/// The set of mutations a single commit produced, delivered to every
/// callback registered on the transaction that committed.
#[derive(Clone, Debug, Default)]
pub struct TriggerEvent {
	pub data: Vec<DataEvent>,
	pub policy: Vec<PolicyEvent>,
}

impl TriggerEvent {
	pub fn is_empty(&self) -> bool {
		self.data.is_empty() && self.policy.is_empty()
	}
}

/// An on-commit callback. Registered via `Transaction::register` and fired
/// after the composite transaction's `Commit` has applied every underlying
/// store's write, before `Commit` returns control to the caller.
pub type TriggerCallback = Box<dyn FnOnce(&TriggerEvent) + Send>;
