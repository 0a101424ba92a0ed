// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_ir::Policy;
use pdp_value::Value;
use pdp_vm::{EvalOptions, StaticNamespace};
use serde::Deserialize;
use std::time::SystemTime;

/// What a conformance case expects: either an exact result set, or the
/// wire code of the error the evaluation must fail with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Expectation {
	Results(Vec<Value>),
	ErrorCode(String),
}

/// One table-driven VM case: an already-compiled policy, the plan to run
/// it against, optional input, and the expected outcome.
#[derive(Debug, Deserialize)]
pub struct ConformanceCase {
	pub policy: Policy,
	pub plan_name: String,
	#[serde(default)]
	pub input: Option<Value>,
	pub expect: Expectation,
}

/// Runs `case` against a fresh, empty data namespace and panics with a
/// descriptive message if the outcome doesn't match `case.expect`. Intended
/// to be driven by `test_each_file::test_each_path!` over a fixtures
/// directory of JSON case files, one assertion function per caller crate.
pub fn assert_conformance(case: &ConformanceCase) {
	let mut namespace = StaticNamespace(Value::empty_object());
	let mut opts = EvalOptions::new(SystemTime::UNIX_EPOCH);
	opts.input = case.input.clone();

	let outcome = pdp_vm::eval(&case.policy, &case.plan_name, &mut namespace, &opts);
	match &case.expect {
		Expectation::Results(expected) => {
			let (results, _) = outcome.unwrap_or_else(|e| panic!("expected success, eval failed: {e}"));
			assert_eq!(&results, expected, "result set mismatch for plan \"{}\"", case.plan_name);
		}
		Expectation::ErrorCode(code) => {
			let err = outcome.err().unwrap_or_else(|| panic!("expected error \"{code}\", eval succeeded"));
			assert_eq!(err.code.to_string(), *code, "error code mismatch for plan \"{}\"", case.plan_name);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pdp_ir::{Block, Plan, Statement, Static};

	fn empty_array_policy() -> Policy {
		Policy {
			static_data: Static::default(),
			plans: vec![Plan { name: "test/p".into(), blocks: vec![vec![Statement::MakeArray { target: 0 }, Statement::ResultSetAdd { value: 0 }] as Block] }],
			functions: vec![],
		}
	}

	#[test]
	fn matches_expected_results() {
		let case = ConformanceCase {
			policy: empty_array_policy(),
			plan_name: "test/p".into(),
			input: None,
			expect: Expectation::Results(vec![Value::array(vec![])]),
		};
		assert_conformance(&case);
	}

	#[test]
	#[should_panic(expected = "result set mismatch")]
	fn mismatched_expectation_panics() {
		let case = ConformanceCase {
			policy: empty_array_policy(),
			plan_name: "test/p".into(),
			input: None,
			expect: Expectation::Results(vec![Value::int(1)]),
		};
		assert_conformance(&case);
	}
}
