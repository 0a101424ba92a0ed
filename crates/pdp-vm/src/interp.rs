// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::locals::Locals;
use crate::namespace::Namespace;
use crate::options::{EvalOptions, EvalStats};
use pdp_core::{Error, Result, WireCode};
use pdp_ir::{Block, FunctionIndex, Local, Operand, Policy, Statement};
use pdp_value::{Entry, Number, Path, Value};
use std::collections::HashMap;
use std::time::Instant;

/// Register conventions assumed by every compiled policy: register `0`
/// always holds the request input, register `1` is bound to the root of
/// `data`.
pub const INPUT_LOCAL: Local = 0;
pub const DATA_LOCAL: Local = 1;

/// What running one statement or block yielded.
///
/// `Break(n)` unwinds `n` enclosing block scopes before being consumed by
/// the nearest construct that owns a scope boundary (`Scan`, `With`, `Not`,
/// a `Block` alternative). `Return` unwinds every scope in the current
/// function unconditionally and is never consumed early — only
/// `call_function`/`eval` stop propagating it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
	Next,
	Break(u32),
	Return,
}

/// One active `with` override: shadows reads of `root` at or under `path`
/// with `value` for the remainder of the owning `WithStmt`'s block.
struct WithOverride {
	root: Local,
	path: Path,
	value: Value,
}

/// Executes one policy's compiled IR against a data namespace. Holds the
/// mutable evaluation state for a single plan or function invocation;
/// nested function calls run in a fresh `Interpreter` borrowing the same
/// namespace and `with` stack.
pub struct Interpreter<'a, N: Namespace> {
	policy: &'a Policy,
	namespace: &'a mut N,
	opts: &'a EvalOptions,
	locals: Locals,
	data_paths: HashMap<Local, Path>,
	with_stack: Vec<WithOverride>,
	return_local: Option<Local>,
	result_set: Vec<Value>,
	stats: EvalStats,
}

impl<'a, N: Namespace> Interpreter<'a, N> {
	fn new(policy: &'a Policy, namespace: &'a mut N, opts: &'a EvalOptions) -> Self {
		Self {
			policy,
			namespace,
			opts,
			locals: Locals::new(),
			data_paths: HashMap::new(),
			with_stack: Vec::new(),
			return_local: None,
			result_set: Vec::new(),
			stats: EvalStats::default(),
		}
	}

	fn resolve_operand(&mut self, operand: &Operand) -> Result<Option<Value>> {
		match operand {
			Operand::Local(local) => self.resolve_local(*local),
			Operand::StringIndex(index) => {
				let s = self
					.policy
					.static_data
					.string(*index)
					.ok_or_else(|| Error::internal(format!("string index {index} not found")))?;
				Ok(Some(Value::string(s)))
			}
			Operand::Bool(b) => Ok(Some(Value::Bool(*b))),
		}
	}

	/// Resolves a local's current value, honoring lazy `data.*` path
	/// tracking and any active `with` overrides. Absent from both the
	/// register file and the data namespace reads as undefined, not an
	/// error.
	fn resolve_local(&mut self, local: Local) -> Result<Option<Value>> {
		if let Some(path) = self.data_paths.get(&local).cloned() {
			return self.resolve_data_path(local, &path);
		}
		Ok(self.locals.get(local).cloned())
	}

	fn resolve_data_path(&mut self, root: Local, path: &Path) -> Result<Option<Value>> {
		if let Some(value) = self.with_override(root, path) {
			return Ok(Some(value));
		}
		match self.namespace.read(path) {
			Ok(value) => Ok(Some(value)),
			Err(e) if e.code == WireCode::NotFound => Ok(None),
			Err(e) => Err(e),
		}
	}

	/// The nearest enclosing `with` override (innermost first) whose root
	/// matches and whose path is a prefix of (or equal to) the requested
	/// path.
	fn with_override(&self, root: Local, path: &Path) -> Option<Value> {
		for over in self.with_stack.iter().rev() {
			if over.root != root {
				continue;
			}
			if over.path == *path {
				return Some(over.value.clone());
			}
			if over.path.is_strict_prefix_of(path) {
				let suffix = path.strip_prefix(&over.path);
				return over.value.get_path(&suffix).cloned();
			}
		}
		None
	}

	/// `None` means the scan's block should break at level 0, the same
	/// outcome an undefined or non-collection source produces under the
	/// `is_defined(src); len(src) != 0` rewrite of an empty-bodied scan.
	fn collection_entries(&mut self, source: Local) -> Result<Option<Vec<(Value, Value)>>> {
		let Some(container) = self.resolve_local(source)? else { return Ok(None) };
		Ok(match &container {
			Value::Array(items) => Some(items.iter().enumerate().map(|(i, v)| (Value::int(i as i64), v.clone())).collect()),
			Value::Object(entries) => Some(entries.iter().map(|(k, v)| (Value::string(k.clone()), v.clone())).collect()),
			_ => None,
		})
	}

	fn call_function(&mut self, func: FunctionIndex, args: &[Local], result: Local) -> Result<()> {
		let function = self
			.policy
			.function(func)
			.ok_or_else(|| Error::internal(format!("function index {func} not found")))?;
		let mut callee_locals = Locals::new();
		for (param, arg) in function.params.iter().zip(args.iter()) {
			let value = self
				.locals
				.get(*arg)
				.cloned()
				.ok_or_else(|| Error::eval_builtin(format!("argument local {arg} is undefined")))?;
			callee_locals.set(*param, value);
		}
		let mut callee_data_paths = HashMap::new();
		callee_data_paths.insert(DATA_LOCAL, Path::root());

		let mut callee = Interpreter {
			policy: self.policy,
			namespace: &mut *self.namespace,
			opts: self.opts,
			locals: callee_locals,
			data_paths: callee_data_paths,
			with_stack: self.with_stack.clone(),
			return_local: Some(function.return_local),
			result_set: Vec::new(),
			stats: EvalStats::default(),
		};
		callee.run_blocks(&function.blocks)?;
		self.stats.instructions += callee.stats.instructions;

		let return_value = callee
			.locals
			.get(function.return_local)
			.cloned()
			.ok_or_else(|| Error::eval_conflict(format!("function \"{}\" never assigned its return value", function.name)))?;
		self.locals.set(result, return_value);
		Ok(())
	}

	fn call_dynamic(&mut self, path: &[Operand], args: &[Local], result: Local) -> Result<()> {
		let mut segments = Vec::with_capacity(path.len());
		for operand in path {
			let Some(value) = self.resolve_operand(operand)? else {
				return Err(Error::eval_builtin("dynamic call target path contains an undefined segment"));
			};
			match value {
				Value::String(s) => segments.push(s),
				other => return Err(Error::eval_builtin(format!("dynamic call path segment {other} is not a string"))),
			}
		}
		let name = segments.join(".");
		let index = self
			.policy
			.static_data
			.functions
			.iter()
			.position(|n| *n == name)
			.ok_or_else(|| Error::eval_builtin(format!("no function named \"{name}\"")))?;
		self.call_function(index as FunctionIndex, args, result)
	}

	/// Runs a function or plan's top-level blocks in order, stopping as
	/// soon as one yields `Flow::Return`. Each top-level block otherwise
	/// runs independently of the others' `Break` outcome — a plan's
	/// blocks are alternative rule bodies, not a single sequential scope.
	fn run_blocks(&mut self, blocks: &[Block]) -> Result<()> {
		for block in blocks {
			if self.exec_block(block)? == Flow::Return {
				break;
			}
		}
		Ok(())
	}

	fn exec_block(&mut self, block: &Block) -> Result<Flow> {
		if self.opts.cancellation.is_cancelled() {
			return Err(Error::eval_cancel());
		}
		for stmt in block {
			match self.exec_stmt(stmt)? {
				Flow::Next => continue,
				other => return Ok(other),
			}
		}
		Ok(Flow::Next)
	}

	fn exec_stmt(&mut self, stmt: &Statement) -> Result<Flow> {
		self.stats.instructions += 1;
		if let Some(limit) = self.opts.instruction_limit {
			if self.stats.instructions > limit {
				return Err(Error::quota_exceeded(format!("instruction limit of {limit} exceeded")));
			}
		}

		match stmt {
			Statement::MakeNull { target } => {
				self.locals.set(*target, Value::Null);
				Ok(Flow::Next)
			}
			Statement::MakeNumber { target, value } => {
				let text = self
					.policy
					.static_data
					.string(*value)
					.ok_or_else(|| Error::internal(format!("string index {value} not found")))?;
				let number = Number::from_decimal_str(text)
					.ok_or_else(|| Error::internal(format!("malformed numeric literal {text:?}")))?;
				self.locals.set(*target, Value::Number(number));
				Ok(Flow::Next)
			}
			Statement::MakeArray { target } => {
				self.locals.set(*target, Value::array(Vec::new()));
				Ok(Flow::Next)
			}
			Statement::MakeObject { target } => {
				self.locals.set(*target, Value::empty_object());
				Ok(Flow::Next)
			}
			Statement::MakeSet { target } => {
				self.locals.set(*target, Value::array(Vec::new()));
				Ok(Flow::Next)
			}

			Statement::AssignVar { target, source } => {
				let Some(value) = self.resolve_operand(source)? else { return Ok(Flow::Break(0)) };
				self.locals.set(*target, value);
				Ok(Flow::Next)
			}
			Statement::AssignVarOnce { target, source } => {
				let Some(value) = self.resolve_operand(source)? else { return Ok(Flow::Break(0)) };
				match self.locals.get(*target) {
					Some(existing) if existing.deep_eq(&value) => {}
					Some(existing) => {
						return Err(Error::eval_conflict(format!(
							"local {target} assigned conflicting values {existing} and {value}"
						)));
					}
					None => self.locals.set(*target, value),
				}
				Ok(Flow::Next)
			}
			Statement::ResetLocal { target } => {
				self.locals.reset(*target);
				self.data_paths.remove(target);
				Ok(Flow::Next)
			}

			Statement::Dot { target, source, key } => self.exec_dot(*target, *source, key),
			Statement::Len { target, source } => {
				let Some(value) = self.resolve_local(*source)? else { return Ok(Flow::Break(0)) };
				let len = match &value {
					Value::Array(items) => items.len(),
					Value::Object(entries) => entries.len(),
					Value::String(s) => s.chars().count(),
					_ => return Ok(Flow::Break(0)),
				};
				self.locals.set(*target, Value::int(len as i64));
				Ok(Flow::Next)
			}

			Statement::Equal { a, b } => {
				let (Some(va), Some(vb)) = (self.resolve_operand(a)?, self.resolve_operand(b)?) else {
					return Ok(Flow::Break(0));
				};
				Ok(if va.deep_eq(&vb) { Flow::Next } else { Flow::Break(0) })
			}
			Statement::NotEqual { a, b } => {
				let (Some(va), Some(vb)) = (self.resolve_operand(a)?, self.resolve_operand(b)?) else {
					return Ok(Flow::Break(0));
				};
				Ok(if va.deep_eq(&vb) { Flow::Break(0) } else { Flow::Next })
			}
			Statement::IsArray { source } => {
				Ok(match self.resolve_local(*source)? {
					Some(Value::Array(_)) => Flow::Next,
					_ => Flow::Break(0),
				})
			}
			Statement::IsObject { source } => {
				Ok(match self.resolve_local(*source)? {
					Some(Value::Object(_)) => Flow::Next,
					_ => Flow::Break(0),
				})
			}
			Statement::IsDefined { source } => {
				Ok(if self.resolve_local(*source)?.is_some() { Flow::Next } else { Flow::Break(0) })
			}
			Statement::IsUndefined { source } => {
				Ok(if self.resolve_local(*source)?.is_none() { Flow::Next } else { Flow::Break(0) })
			}

			Statement::ArrayAppend { array, value } => {
				let Some(value) = self.resolve_operand(value)? else { return Ok(Flow::Break(0)) };
				let current = self.locals.get(*array).cloned().unwrap_or_else(|| Value::array(Vec::new()));
				let Value::Array(mut items) = current else {
					return Err(Error::internal(format!("local {array} is not an array")));
				};
				items.push(value);
				self.locals.set(*array, Value::Array(items));
				Ok(Flow::Next)
			}
			Statement::ObjectInsert { object, key, value } => {
				let (Some(key), Some(value)) = (self.resolve_operand(key)?, self.resolve_operand(value)?) else {
					return Ok(Flow::Break(0));
				};
				let key = value_as_key(&key)?;
				let current = self.locals.get(*object).cloned().unwrap_or_else(Value::empty_object);
				let Value::Object(mut entries) = current else {
					return Err(Error::internal(format!("local {object} is not an object")));
				};
				match entries.make_mut().iter_mut().find(|(k, _)| *k == key) {
					Some(entry) => entry.1 = value,
					None => entries.push((key, value)),
				}
				self.locals.set(*object, Value::Object(entries));
				Ok(Flow::Next)
			}
			Statement::ObjectInsertOnce { object, key, value } => {
				let (Some(key), Some(value)) = (self.resolve_operand(key)?, self.resolve_operand(value)?) else {
					return Ok(Flow::Break(0));
				};
				let key = value_as_key(&key)?;
				let current = self.locals.get(*object).cloned().unwrap_or_else(Value::empty_object);
				let Value::Object(mut entries) = current else {
					return Err(Error::internal(format!("local {object} is not an object")));
				};
				match entries.iter().find(|(k, _)| *k == key) {
					Some((_, existing)) if existing.deep_eq(&value) => {}
					Some((_, existing)) => {
						return Err(Error::eval_conflict(format!(
							"object key {key:?} assigned conflicting values {existing} and {value}"
						)));
					}
					None => entries.push((key, value)),
				}
				self.locals.set(*object, Value::Object(entries));
				Ok(Flow::Next)
			}
			Statement::ObjectMerge { a, b, target } => {
				let va = self.resolve_local(*a)?.ok_or_else(|| Error::eval_builtin(format!("local {a} is undefined")))?;
				let vb = self.resolve_local(*b)?.ok_or_else(|| Error::eval_builtin(format!("local {b} is undefined")))?;
				self.locals.set(*target, merge_objects(&va, &vb));
				Ok(Flow::Next)
			}
			Statement::SetAdd { set, value } => {
				let Some(value) = self.resolve_operand(value)? else { return Ok(Flow::Break(0)) };
				let current = self.locals.get(*set).cloned().unwrap_or_else(|| Value::array(Vec::new()));
				let Value::Array(mut items) = current else {
					return Err(Error::internal(format!("local {set} is not a set")));
				};
				if !items.iter().any(|existing| existing.deep_eq(&value)) {
					items.push(value);
				}
				self.locals.set(*set, Value::Array(items));
				Ok(Flow::Next)
			}

			Statement::Call { func, args, result } => {
				self.call_function(*func, args, *result)?;
				Ok(Flow::Next)
			}
			Statement::CallDynamic { path, args, result } => {
				self.call_dynamic(path, args, *result)?;
				Ok(Flow::Next)
			}

			Statement::Scan { source, key, value, block } => self.exec_scan(*source, *key, *value, block),
			Statement::Block { blocks } => self.exec_block_alternatives(blocks),
			Statement::Not { block } => self.exec_not(block),
			Statement::With { local, path, value, block } => self.exec_with(*local, path, value, block),

			Statement::Break { index } => Ok(Flow::Break(*index)),
			Statement::ReturnLocal { source } => {
				let value = self
					.locals
					.get(*source)
					.cloned()
					.ok_or_else(|| Error::internal(format!("return source {source} is undefined")))?;
				if let Some(ret) = self.return_local {
					self.locals.set(ret, value);
				}
				Ok(Flow::Return)
			}
			Statement::ResultSetAdd { value } => {
				let value =
					self.locals.get(*value).cloned().ok_or_else(|| Error::internal(format!("local {value} is undefined")))?;
				if !self.result_set.iter().any(|existing| existing.deep_eq(&value)) {
					self.result_set.push(value);
				}
				Ok(Flow::Next)
			}
			Statement::Nop => Ok(Flow::Next),
		}
	}

	fn exec_dot(&mut self, target: Local, source: Local, key: &Operand) -> Result<Flow> {
		let Some(key_value) = self.resolve_operand(key)? else { return Ok(Flow::Break(0)) };
		let key_str = match &key_value {
			Value::String(s) => s.clone(),
			Value::Number(n) => n.to_string(),
			_ => return Ok(Flow::Break(0)),
		};

		if let Some(source_path) = self.data_paths.get(&source).cloned() {
			let child_path = source_path.push(key_str);
			return match self.resolve_data_path(source, &child_path)? {
				Some(value) => {
					self.data_paths.insert(target, child_path);
					self.locals.set(target, value);
					Ok(Flow::Next)
				}
				None => Ok(Flow::Break(0)),
			};
		}

		let Some(container) = self.resolve_local(source)? else { return Ok(Flow::Break(0)) };
		let found = match &container {
			Value::Object(_) => container.get_key(&key_str).cloned(),
			Value::Array(_) => pdp_value::path::segment_as_index(&key_str).and_then(|i| container.get_index(i)).cloned(),
			_ => None,
		};
		match found {
			Some(value) => {
				self.locals.set(target, value);
				Ok(Flow::Next)
			}
			None => Ok(Flow::Break(0)),
		}
	}

	/// A scan succeeds (`Flow::Next`) if at least one iteration's block
	/// runs to completion; it breaks at level 0 if the source is
	/// undefined, not a collection, empty, or every iteration's block
	/// broke at level 0 itself. This existence semantics is what makes
	/// `scan(src){}` equivalent to `is_defined(src); len(src) != 0`.
	fn exec_scan(&mut self, source: Local, key: Local, value: Local, block: &Block) -> Result<Flow> {
		let Some(entries) = self.collection_entries(source)? else { return Ok(Flow::Break(0)) };
		let mut matched = false;
		for (k, v) in entries {
			self.locals.set(key, k);
			self.locals.set(value, v);
			match self.exec_block(block)? {
				Flow::Next => matched = true,
				Flow::Break(0) => {}
				Flow::Break(n) => return Ok(Flow::Break(n - 1)),
				Flow::Return => return Ok(Flow::Return),
			}
		}
		self.locals.reset(key);
		self.locals.reset(value);
		Ok(if matched { Flow::Next } else { Flow::Break(0) })
	}

	fn exec_block_alternatives(&mut self, blocks: &[Block]) -> Result<Flow> {
		for block in blocks {
			match self.exec_block(block)? {
				Flow::Next | Flow::Break(0) => {}
				Flow::Break(n) => return Ok(Flow::Break(n - 1)),
				Flow::Return => return Ok(Flow::Return),
			}
		}
		Ok(Flow::Next)
	}

	fn exec_not(&mut self, block: &Block) -> Result<Flow> {
		Ok(match self.exec_block(block)? {
			Flow::Next => Flow::Break(0),
			Flow::Break(0) => Flow::Next,
			Flow::Break(n) => Flow::Break(n - 1),
			Flow::Return => Flow::Return,
		})
	}

	fn exec_with(&mut self, local: Local, path: &[u32], value: &Operand, block: &Block) -> Result<Flow> {
		let Some(resolved) = self.resolve_operand(value)? else { return Ok(Flow::Break(0)) };
		let segments: Result<Vec<String>> = path
			.iter()
			.map(|idx| {
				self
					.policy
					.static_data
					.string(*idx)
					.map(str::to_string)
					.ok_or_else(|| Error::internal(format!("string index {idx} not found")))
			})
			.collect();
		self.with_stack.push(WithOverride { root: local, path: Path::new(segments?), value: resolved });
		let flow = self.exec_block(block);
		self.with_stack.pop();
		Ok(match flow? {
			Flow::Next => Flow::Next,
			Flow::Break(0) => Flow::Next,
			Flow::Break(n) => Flow::Break(n - 1),
			Flow::Return => Flow::Return,
		})
	}
}

fn value_as_key(value: &Value) -> Result<String> {
	match value {
		Value::String(s) => Ok(s.clone()),
		Value::Number(n) => Ok(n.to_string()),
		other => Err(Error::eval_builtin(format!("{other} cannot be used as an object key"))),
	}
}

fn merge_objects(a: &Value, b: &Value) -> Value {
	let (Value::Object(ea), Value::Object(eb)) = (a, b) else { return b.clone() };
	let mut merged: Vec<Entry> = ea.iter().cloned().collect();
	for (k, v) in eb.iter() {
		match merged.iter_mut().find(|(mk, _)| mk == k) {
			Some(entry) => entry.1 = merge_objects(&entry.1, v),
			None => merged.push((k.clone(), v.clone())),
		}
	}
	Value::object(merged)
}

/// Evaluates one plan to completion, returning every value accumulated via
/// `ResultSetAddStmt` across its top-level blocks.
pub fn eval<N: Namespace>(
	policy: &Policy,
	plan_name: &str,
	namespace: &mut N,
	opts: &EvalOptions,
) -> Result<(Vec<Value>, EvalStats)> {
	#[cfg(feature = "trace")]
	let _span = tracing::info_span!("pdp_vm::eval", plan = plan_name).entered();

	let plan = policy.plan(plan_name).ok_or_else(|| Error::not_found(format!("plan \"{plan_name}\" not found")))?;
	let started = Instant::now();

	let mut interp = Interpreter::new(policy, namespace, opts);
	interp.locals.set(INPUT_LOCAL, opts.input.clone().unwrap_or(Value::Null));
	interp.data_paths.insert(DATA_LOCAL, Path::root());
	interp.run_blocks(&plan.blocks)?;

	interp.stats.eval_ns = started.elapsed().as_nanos() as u64;
	#[cfg(feature = "trace")]
	tracing::trace!(instructions = interp.stats.instructions, eval_ns = interp.stats.eval_ns, "eval finished");
	Ok((interp.result_set, interp.stats))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::namespace::StaticNamespace;
	use pdp_ir::{Function, Plan, Static};

	fn policy_with(plans: Vec<Plan>, functions: Vec<Function>, strings: Vec<&str>, function_names: Vec<&str>) -> Policy {
		Policy {
			static_data: Static {
				strings: strings.into_iter().map(String::from).collect(),
				functions: function_names.into_iter().map(String::from).collect(),
			},
			plans,
			functions,
		}
	}

	fn run(policy: &Policy, input: Value) -> Result<(Vec<Value>, EvalStats)> {
		let mut ns = StaticNamespace(Value::empty_object());
		let mut opts = EvalOptions::new(std::time::SystemTime::UNIX_EPOCH);
		opts.input = Some(input);
		eval(policy, "main", &mut ns, &opts)
	}

	#[test]
	fn assign_and_result_set_add_collects_values() {
		let blocks = vec![vec![
			Statement::AssignVar { target: 2, source: Operand::Bool(true) },
			Statement::ResultSetAdd { value: 2 },
		]];
		let policy = policy_with(vec![Plan { name: "main".into(), blocks }], vec![], vec![], vec![]);
		let (results, _) = run(&policy, Value::Null).unwrap();
		assert_eq!(results, vec![Value::Bool(true)]);
	}

	#[test]
	fn dot_on_input_breaks_block_when_key_missing() {
		let blocks = vec![vec![
			Statement::Dot { target: 2, source: INPUT_LOCAL, key: Operand::StringIndex(0) },
			Statement::ResultSetAdd { value: 2 },
		]];
		let policy = policy_with(vec![Plan { name: "main".into(), blocks }], vec![], vec!["missing"], vec![]);
		let input = Value::object(vec![("present".into(), Value::int(1))]);
		let (results, _) = run(&policy, input).unwrap();
		assert!(results.is_empty());
	}

	#[test]
	fn assign_var_once_conflict_is_an_eval_conflict_error() {
		let blocks = vec![vec![
			Statement::AssignVarOnce { target: 2, source: Operand::Bool(true) },
			Statement::AssignVarOnce { target: 2, source: Operand::Bool(false) },
		]];
		let policy = policy_with(vec![Plan { name: "main".into(), blocks }], vec![], vec![], vec![]);
		let err = run(&policy, Value::Null).unwrap_err();
		assert_eq!(err.code, WireCode::EvalConflictError);
	}

	#[test]
	fn assign_var_once_same_value_twice_is_not_a_conflict() {
		let blocks = vec![vec![
			Statement::AssignVarOnce { target: 2, source: Operand::Bool(true) },
			Statement::AssignVarOnce { target: 2, source: Operand::Bool(true) },
			Statement::ResultSetAdd { value: 2 },
		]];
		let policy = policy_with(vec![Plan { name: "main".into(), blocks }], vec![], vec![], vec![]);
		let (results, _) = run(&policy, Value::Null).unwrap();
		assert_eq!(results, vec![Value::Bool(true)]);
	}

	#[test]
	fn not_negates_block_success() {
		let inner = vec![Statement::Equal { a: Operand::Bool(true), b: Operand::Bool(false) }];
		let blocks = vec![vec![Statement::Not { block: inner }, Statement::AssignVar { target: 2, source: Operand::Bool(true) }, Statement::ResultSetAdd { value: 2 }]];
		let policy = policy_with(vec![Plan { name: "main".into(), blocks }], vec![], vec![], vec![]);
		let (results, _) = run(&policy, Value::Null).unwrap();
		assert_eq!(results, vec![Value::Bool(true)]);
	}

	#[test]
	fn scan_accumulates_result_per_matching_item() {
		let body = vec![
			Statement::Equal { a: Operand::Local(3), b: Operand::Bool(true) },
			Statement::ResultSetAdd { value: 2 },
		];
		let blocks = vec![vec![Statement::Scan { source: INPUT_LOCAL, key: 2, value: 3, block: body }]];
		let policy = policy_with(vec![Plan { name: "main".into(), blocks }], vec![], vec![], vec![]);
		let input = Value::object(vec![
			("a".into(), Value::Bool(true)),
			("b".into(), Value::Bool(false)),
			("c".into(), Value::Bool(true)),
		]);
		let (results, _) = run(&policy, input).unwrap();
		assert_eq!(results.len(), 2);
	}

	#[test]
	fn call_invokes_function_and_binds_result() {
		let func_body = vec![vec![
			Statement::AssignVar { target: 10, source: Operand::Local(5) },
			Statement::ReturnLocal { source: 10 },
		]];
		let function = Function { name: "double".into(), params: vec![5], return_local: 10, blocks: func_body };
		let plan_blocks = vec![vec![
			Statement::AssignVar { target: 2, source: Operand::Bool(true) },
			Statement::Call { func: 0, args: vec![2], result: 3 },
			Statement::ResultSetAdd { value: 3 },
		]];
		let policy = policy_with(vec![Plan { name: "main".into(), blocks: plan_blocks }], vec![function], vec![], vec!["double".into()]);
		let (results, _) = run(&policy, Value::Null).unwrap();
		assert_eq!(results, vec![Value::Bool(true)]);
	}

	#[test]
	fn empty_bodied_scan_requires_a_nonempty_collection() {
		let blocks = vec![vec![
			Statement::Scan { source: INPUT_LOCAL, key: 2, value: 3, block: vec![] },
			Statement::AssignVar { target: 4, source: Operand::Bool(true) },
			Statement::ResultSetAdd { value: 4 },
		]];
		let policy = policy_with(vec![Plan { name: "main".into(), blocks }], vec![], vec![], vec![]);

		let (results, _) = run(&policy, Value::array(vec![Value::int(1)])).unwrap();
		assert_eq!(results, vec![Value::Bool(true)]);

		let (results, _) = run(&policy, Value::array(Vec::new())).unwrap();
		assert!(results.is_empty());

		let (results, _) = run(&policy, Value::Null).unwrap();
		assert!(results.is_empty());
	}

	#[test]
	fn instruction_limit_is_enforced() {
		let blocks = vec![vec![Statement::MakeNull { target: 2 }; 5]];
		let policy = policy_with(vec![Plan { name: "main".into(), blocks }], vec![], vec![], vec![]);
		let mut ns = StaticNamespace(Value::empty_object());
		let mut opts = EvalOptions::new(std::time::SystemTime::UNIX_EPOCH);
		opts.instruction_limit = Some(2);
		let err = eval(&policy, "main", &mut ns, &opts).unwrap_err();
		assert_eq!(err.code, WireCode::QuotaExceeded);
	}
}
