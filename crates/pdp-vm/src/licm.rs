// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

//! Loop invariant code motion: hoists statements out of a `ScanStmt`'s body
//! when their inputs are not written anywhere inside the loop, so repeated
//! work (building a constant, looking up a value that never changes) runs
//! once instead of once per iteration. Recurses into `BlockStmt`, `NotStmt`,
//! `WithStmt`, and nested `ScanStmt` bodies.
//!
//! Only statements with no side effect beyond writing their own register are
//! lift candidates: `MakeNullStmt`/`MakeNumberStmt`/`MakeArrayStmt`/
//! `MakeObjectStmt`/`MakeSetStmt`, `AssignVarStmt`, `DotStmt`, `LenStmt`,
//! `ObjectMergeStmt`. Everything else is a blocker — `AssignVarOnceStmt`/
//! `ObjectInsertOnceStmt` (conflict detection must see every iteration),
//! `CallStmt`/`CallDynamicStmt` (possibly non-deterministic), the
//! accumulator statements (`ArrayAppendStmt`, `ObjectInsertStmt`,
//! `SetAddStmt` — always read their own write target), the comparison/
//! type-test statements (moving their implicit break across the loop
//! boundary would change what it means to break), and the other nested
//! scopes. A statement is also blocked if its target is written more than
//! once inside the remaining loop body, or if it reads a register the loop
//! writes (including its own `key`/`value` registers).

use pdp_ir::{Local, Operand, Policy, Statement};
use std::collections::HashMap;

type Block = pdp_ir::Block;

/// Applies LICM (and recursively, its own nested passes) to every plan and
/// function body in `policy`.
pub fn apply_policy(policy: &mut Policy) {
	for plan in &mut policy.plans {
		plan.blocks = plan.blocks.iter().map(|b| apply(b)).collect();
	}
	for function in &mut policy.functions {
		function.blocks = function.blocks.iter().map(|b| apply(b)).collect();
	}
}

/// Applies one LICM pass to `block`, recursing into every nested scope.
pub fn apply(block: &Block) -> Block {
	let mut out = Vec::with_capacity(block.len());
	for stmt in block {
		match stmt {
			Statement::Scan { source, key, value, block: body } => {
				let optimized = apply(body);
				let (lifted, remaining) = hoist(optimized, *key, *value);
				out.extend(lifted);
				out.push(Statement::Scan { source: *source, key: *key, value: *value, block: remaining });
			}
			Statement::Not { block: body } => out.push(Statement::Not { block: apply(body) }),
			Statement::With { local, path, value, block: body } => {
				out.push(Statement::With { local: *local, path: path.clone(), value: value.clone(), block: apply(body) })
			}
			Statement::Block { blocks } => {
				out.push(Statement::Block { blocks: blocks.iter().map(|b| apply(b)).collect() })
			}
			other => out.push(other.clone()),
		}
	}
	out
}

fn operand_local(op: &Operand) -> Option<Local> {
	match op {
		Operand::Local(l) => Some(*l),
		_ => None,
	}
}

fn targets_of(stmt: &Statement) -> Vec<Local> {
	use Statement::*;
	match stmt {
		MakeNull { target } | MakeNumber { target, .. } | MakeArray { target } | MakeObject { target } | MakeSet { target } => {
			vec![*target]
		}
		AssignVar { target, .. } => vec![*target],
		Dot { target, .. } => vec![*target],
		Len { target, .. } => vec![*target],
		ObjectMerge { target, .. } => vec![*target],
		_ => vec![],
	}
}

fn inputs_of(stmt: &Statement) -> Vec<Local> {
	use Statement::*;
	match stmt {
		MakeNull { .. } | MakeNumber { .. } | MakeArray { .. } | MakeObject { .. } | MakeSet { .. } => vec![],
		AssignVar { source, .. } => operand_local(source).into_iter().collect(),
		Dot { source, key, .. } => {
			let mut v = vec![*source];
			v.extend(operand_local(key));
			v
		}
		Len { source, .. } => vec![*source],
		ObjectMerge { a, b, .. } => vec![*a, *b],
		_ => vec![],
	}
}

fn is_liftable_kind(stmt: &Statement) -> bool {
	matches!(
		stmt,
		Statement::MakeNull { .. }
			| Statement::MakeNumber { .. }
			| Statement::MakeArray { .. }
			| Statement::MakeObject { .. }
			| Statement::MakeSet { .. }
			| Statement::AssignVar { .. }
			| Statement::Dot { .. }
			| Statement::Len { .. }
			| Statement::ObjectMerge { .. }
	)
}

/// Iterates mark-and-lift to a fixpoint, then handles the one case where
/// lifting a `BreakStmt` itself is sound: a loop body that has been reduced
/// entirely to a single unconditional break always yields the same outcome
/// every iteration, so it can run once ahead of the loop with its index
/// decremented for the scope it no longer unwinds through.
fn hoist(mut remaining: Vec<Statement>, loop_key: Local, loop_value: Local) -> (Vec<Statement>, Block) {
	let mut hoisted = Vec::new();
	let is_loop_local = |l: Local| l == loop_key || l == loop_value;

	loop {
		let mut write_counts: HashMap<Local, usize> = HashMap::new();
		for stmt in &remaining {
			for t in targets_of(stmt) {
				*write_counts.entry(t).or_insert(0) += 1;
			}
		}

		let lift_at = remaining.iter().position(|stmt| {
			if !is_liftable_kind(stmt) {
				return false;
			}
			let targets = targets_of(stmt);
			let inputs = inputs_of(stmt);
			let self_referential = targets.iter().any(|t| inputs.contains(t));
			let single_writer = targets.iter().all(|t| write_counts.get(t).copied().unwrap_or(0) <= 1);
			let inputs_external =
				inputs.iter().all(|r| !is_loop_local(*r) && write_counts.get(r).copied().unwrap_or(0) == 0);
			!self_referential && single_writer && inputs_external
		});

		match lift_at {
			Some(i) => hoisted.push(remaining.remove(i)),
			None => break,
		}
	}

	if let [Statement::Break { index }] = remaining.as_slice() {
		if *index >= 1 {
			hoisted.push(Statement::Break { index: index - 1 });
		}
		remaining.clear();
	}

	(hoisted, remaining)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invariant_assignment_is_hoisted_before_the_scan() {
		let body = vec![Statement::AssignVar { target: 10, source: Operand::Bool(true) }, Statement::ResultSetAdd { value: 2 }];
		let block = vec![Statement::Scan { source: 0, key: 2, value: 3, block: body }];

		let optimized = apply(&block);
		assert_eq!(optimized.len(), 2);
		assert!(matches!(optimized[0], Statement::AssignVar { target: 10, .. }));
		assert!(matches!(optimized[1], Statement::Scan { .. }));
		let Statement::Scan { block: remaining, .. } = &optimized[1] else { unreachable!() };
		assert_eq!(remaining.len(), 1);
	}

	#[test]
	fn statement_reading_the_loop_value_is_not_hoisted() {
		let body = vec![Statement::Len { target: 10, source: 3 }];
		let block = vec![Statement::Scan { source: 0, key: 2, value: 3, block: body }];

		let optimized = apply(&block);
		let Statement::Scan { block: remaining, .. } = &optimized[0] else { unreachable!() };
		assert_eq!(remaining.len(), 1);
	}

	#[test]
	fn accumulator_statement_is_never_hoisted() {
		let body = vec![Statement::ArrayAppend { array: 5, value: Operand::Local(3) }];
		let block = vec![Statement::Scan { source: 0, key: 2, value: 3, block: body }];

		let optimized = apply(&block);
		let Statement::Scan { block: remaining, .. } = &optimized[0] else { unreachable!() };
		assert_eq!(remaining.len(), 1);
	}

	#[test]
	fn chained_invariants_all_hoist_in_one_fixpoint() {
		let body = vec![
			Statement::MakeNumber { target: 10, value: 0 },
			Statement::AssignVar { target: 11, source: Operand::Local(10) },
			Statement::ResultSetAdd { value: 2 },
		];
		let block = vec![Statement::Scan { source: 0, key: 2, value: 3, block: body }];

		let optimized = apply(&block);
		assert_eq!(optimized.len(), 3);
		let Statement::Scan { block: remaining, .. } = optimized.last().unwrap() else { unreachable!() };
		assert_eq!(remaining.len(), 1);
	}

	#[test]
	fn fully_invariant_body_reduces_to_a_decremented_break() {
		let body = vec![
			Statement::AssignVar { target: 10, source: Operand::Bool(true) },
			Statement::Break { index: 1 },
		];
		let block = vec![Statement::Scan { source: 0, key: 2, value: 3, block: body }];

		let optimized = apply(&block);
		assert!(matches!(optimized[0], Statement::AssignVar { .. }));
		assert!(matches!(optimized[1], Statement::Break { index: 0 }));
		let Statement::Scan { block: remaining, .. } = &optimized[2] else { unreachable!() };
		assert!(remaining.is_empty());
	}
}
