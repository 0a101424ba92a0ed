// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_ir::Local;
use pdp_value::Value;
use std::collections::HashMap;

/// One function/plan's register file. A local that has never been
/// assigned is *undefined*, distinct from holding `Value::Null`.
#[derive(Clone, Debug, Default)]
pub struct Locals {
	slots: HashMap<Local, Value>,
}

impl Locals {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, local: Local) -> Option<&Value> {
		self.slots.get(&local)
	}

	pub fn get_mut(&mut self, local: Local) -> Option<&mut Value> {
		self.slots.get_mut(&local)
	}

	pub fn set(&mut self, local: Local, value: Value) {
		self.slots.insert(local, value);
	}

	pub fn reset(&mut self, local: Local) {
		self.slots.remove(&local);
	}

	pub fn is_defined(&self, local: Local) -> bool {
		self.slots.contains_key(&local)
	}
}
