// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_core::CancellationToken;
use pdp_value::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// A per-evaluation memo of non-deterministic builtin results, keyed by
/// builtin name then by the JSON-rendered argument tuple. Consulted before
/// calling a non-deterministic builtin; a miss calls through and caches.
#[derive(Clone, Debug, Default)]
pub struct NdbCache {
	entries: HashMap<String, HashMap<String, Value>>,
}

impl NdbCache {
	pub fn get(&self, builtin: &str, args_key: &str) -> Option<&Value> {
		self.entries.get(builtin)?.get(args_key)
	}

	pub fn insert(&mut self, builtin: &str, args_key: String, value: Value) {
		self.entries.entry(builtin.to_string()).or_default().insert(args_key, value);
	}
}

/// Process-wide cache shared across evaluations (e.g. deduplicated HTTP
/// responses for an `http.send`-style builtin). Plain key/value; callers
/// namespace their own keys.
#[derive(Clone, Default)]
pub struct InterQueryBuiltinCache {
	inner: Arc<Mutex<HashMap<String, Value>>>,
}

impl InterQueryBuiltinCache {
	pub fn get(&self, key: &str) -> Option<Value> {
		self.inner.lock().unwrap().get(key).cloned()
	}

	pub fn insert(&self, key: String, value: Value) {
		self.inner.lock().unwrap().insert(key, value);
	}
}

/// Receives `(location, text)` for every `print` statement executed during
/// an evaluation.
pub type PrintHook = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// The knobs `Eval` accepts, mirroring the contract every evaluation must
/// expose: a pinned clock and seed for determinism, caches for builtin
/// results, a print sink, and the capability/limits/cancellation guards
/// the runtime enforces while interpreting IR.
#[derive(Clone)]
pub struct EvalOptions {
	pub input: Option<Value>,
	pub time: SystemTime,
	pub seed: u64,
	pub runtime: Value,
	pub ndb_cache: NdbCache,
	pub inter_query_builtin_cache: InterQueryBuiltinCache,
	pub print_hook: Option<PrintHook>,
	pub strict_builtin_errors: bool,
	pub capabilities: std::collections::HashSet<String>,
	pub instruction_limit: Option<u64>,
	pub cancellation: CancellationToken,
}

impl EvalOptions {
	pub fn new(time: SystemTime) -> Self {
		Self {
			input: None,
			time,
			seed: 0,
			runtime: Value::empty_object(),
			ndb_cache: NdbCache::default(),
			inter_query_builtin_cache: InterQueryBuiltinCache::default(),
			print_hook: None,
			strict_builtin_errors: false,
			capabilities: std::collections::HashSet::new(),
			instruction_limit: None,
			cancellation: CancellationToken::new(),
		}
	}
}

/// Per-evaluation counters, returned alongside the result so a handler can
/// attach them to a decision-log record.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct EvalStats {
	pub instructions: u64,
	pub eval_ns: u64,
}
