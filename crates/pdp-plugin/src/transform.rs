// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use parking_lot::Mutex;
use pdp_core::{Error, Result};
use pdp_ir::Policy;
use pdp_value::Value;
use pdp_vm::{EvalOptions, StaticNamespace};
use std::sync::Arc;
use std::time::SystemTime;

/// A compiled `rego_transform` rule, ready to run against a fetched batch.
pub struct CompiledTransform {
	pub policy: Policy,
	pub plan_name: String,
}

/// Holds a plugin's transform once the bundle compiler has prepared and
/// bound it. A poll loop consults [`TransformHandle::get`] on every tick
/// and idles while it is `None`, so in-flight batch ordering is preserved
/// across a (re)compile.
#[derive(Clone, Default)]
pub struct TransformHandle {
	inner: Arc<Mutex<Option<Arc<CompiledTransform>>>>,
}

impl TransformHandle {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn bind(&self, transform: CompiledTransform) {
		*self.inner.lock() = Some(Arc::new(transform));
	}

	pub fn unbind(&self) {
		*self.inner.lock() = None;
	}

	pub fn get(&self) -> Option<Arc<CompiledTransform>> {
		self.inner.lock().clone()
	}
}

/// Runs a bound transform against `incoming`/`previous`, returning the
/// replacement object the rule produced. Errors if the rule yields no
/// result (undefined) or more than one (ambiguous replacement).
pub fn run_transform(transform: &CompiledTransform, incoming: Value, previous: Value) -> Result<Value> {
	let input = Value::object(vec![("incoming".to_string(), incoming), ("previous".to_string(), previous)]);
	let mut opts = EvalOptions::new(SystemTime::now());
	opts.input = Some(input);
	let mut namespace = StaticNamespace(Value::empty_object());
	let (results, _stats) = pdp_vm::eval(&transform.policy, &transform.plan_name, &mut namespace, &opts)?;
	match results.len() {
		0 => Err(Error::eval_builtin("rego_transform rule produced no result")),
		1 => Ok(results.into_iter().next().unwrap()),
		_ => Err(Error::eval_conflict("rego_transform rule produced multiple outputs")),
	}
}
