// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::statement::Block;
use serde::{Deserialize, Serialize};

/// Shared constants for one compiled policy: the interned-string table
/// (referenced by `StringIndex` operands) and the declared function names,
/// positionally aligned with `Policy.functions`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Static {
	pub strings: Vec<String>,
	pub functions: Vec<String>,
}

impl Static {
	pub fn string(&self, index: u32) -> Option<&str> {
		self.strings.get(index as usize).map(String::as_str)
	}

	pub fn function_name(&self, index: u32) -> Option<&str> {
		self.functions.get(index as usize).map(String::as_str)
	}
}

/// A named IR entrypoint. Evaluating a plan runs its blocks in order and
/// yields whatever the blocks accumulate via `ResultSetAddStmt`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plan {
	pub name: String,
	pub blocks: Vec<Block>,
}

/// A callable IR function, invoked via `CallStmt`/`CallDynamicStmt` by its
/// index into `Policy.functions`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Function {
	pub name: String,
	pub params: Vec<u32>,
	pub return_local: u32,
	pub blocks: Vec<Block>,
}

/// A compiled policy bundle: the input the evaluation VM consumes. Assumed
/// well-formed — produced by a front end that already resolved names to
/// indices and local registers.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Policy {
	pub static_data: Static,
	pub plans: Vec<Plan>,
	pub functions: Vec<Function>,
}

impl Policy {
	pub fn plan(&self, name: &str) -> Option<&Plan> {
		self.plans.iter().find(|p| p.name == name)
	}

	pub fn function(&self, index: u32) -> Option<&Function> {
		self.functions.get(index as usize)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn plan_lookup_by_name() {
		let policy = Policy {
			static_data: Static::default(),
			plans: vec![Plan { name: "p".into(), blocks: vec![] }],
			functions: vec![],
		};
		assert!(policy.plan("p").is_some());
		assert!(policy.plan("missing").is_none());
	}
}
