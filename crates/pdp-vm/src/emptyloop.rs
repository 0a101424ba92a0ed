// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

//! Rewrites an empty-bodied `ScanStmt` into `is_defined(src); len(src) != 0`.
//! A scan with no body is only ever used for its existence check — does
//! `src` have at least one entry — so replacing the loop with two straight-
//! line statements is behavior-preserving (see [`crate::interp`]'s scan
//! existence semantics) while avoiding materializing every entry just to
//! discard it.

use pdp_ir::{Block, Local, Operand, Policy, Static, Statement, StringIndex};

/// Applies the rewrite across every plan and function body in `policy`,
/// interning the `"0"` literal once and allocating fresh registers above
/// whatever each block already uses.
pub fn apply_policy(policy: &mut Policy) {
	let Policy { static_data, plans, functions } = policy;
	for plan in plans.iter_mut() {
		rewrite_blocks(&mut plan.blocks, static_data);
	}
	for function in functions.iter_mut() {
		rewrite_blocks(&mut function.blocks, static_data);
	}
}

fn rewrite_blocks(blocks: &mut [Block], static_data: &mut Static) {
	let mut max_local: Local = 0;
	for block in blocks.iter() {
		max_local_in_block(block, &mut max_local);
	}
	let mut next_local = max_local + 1;
	for block in blocks.iter_mut() {
		*block = apply(block, static_data, &mut next_local);
	}
}

/// Applies one rewrite pass to `block`, recursing into every nested scope.
pub fn apply(block: &Block, static_data: &mut Static, next_local: &mut Local) -> Block {
	let mut out = Vec::with_capacity(block.len());
	for stmt in block {
		match stmt {
			Statement::Scan { source, block: body, .. } if body.is_empty() => {
				out.extend(rewrite_empty_scan(*source, static_data, next_local));
			}
			Statement::Scan { source, key, value, block: body } => {
				out.push(Statement::Scan { source: *source, key: *key, value: *value, block: apply(body, static_data, next_local) });
			}
			Statement::Not { block: body } => out.push(Statement::Not { block: apply(body, static_data, next_local) }),
			Statement::With { local, path, value, block: body } => out.push(Statement::With {
				local: *local,
				path: path.clone(),
				value: value.clone(),
				block: apply(body, static_data, next_local),
			}),
			Statement::Block { blocks } => {
				out.push(Statement::Block { blocks: blocks.iter().map(|b| apply(b, static_data, next_local)).collect() })
			}
			other => out.push(other.clone()),
		}
	}
	out
}

/// `scan` only ever iterates arrays and objects (`collection_entries`
/// returns `None`, i.e. undefined, for every other value kind, strings
/// included — `Len` counts characters for a string, so skipping this
/// guard would turn `scan(s){}` over a non-empty string from undefined
/// into defined). The `Not(Not IsArray; Not IsObject)` pair is an
/// `IsArray OR IsObject` guard built from `Statement`'s existing
/// sequential-AND semantics.
fn rewrite_empty_scan(source: Local, static_data: &mut Static, next_local: &mut Local) -> Vec<Statement> {
	let zero_index = intern(static_data, "0");
	let zero_local = alloc(next_local);
	let len_local = alloc(next_local);
	vec![
		Statement::IsDefined { source },
		Statement::Not {
			block: vec![
				Statement::Not { block: vec![Statement::IsArray { source }] },
				Statement::Not { block: vec![Statement::IsObject { source }] },
			],
		},
		Statement::MakeNumber { target: zero_local, value: zero_index },
		Statement::Len { target: len_local, source },
		Statement::NotEqual { a: Operand::Local(len_local), b: Operand::Local(zero_local) },
	]
}

fn intern(static_data: &mut Static, s: &str) -> StringIndex {
	if let Some(pos) = static_data.strings.iter().position(|existing| existing == s) {
		return pos as StringIndex;
	}
	static_data.strings.push(s.to_string());
	(static_data.strings.len() - 1) as StringIndex
}

fn alloc(next_local: &mut Local) -> Local {
	let id = *next_local;
	*next_local += 1;
	id
}

fn note(l: Local, acc: &mut Local) {
	*acc = (*acc).max(l);
}

fn note_operand(op: &Operand, acc: &mut Local) {
	if let Operand::Local(l) = op {
		*acc = (*acc).max(*l);
	}
}

fn max_local_in_block(block: &Block, acc: &mut Local) {
	for stmt in block {
		max_local_in_stmt(stmt, acc);
	}
}

fn max_local_in_stmt(stmt: &Statement, acc: &mut Local) {
	use Statement::*;
	match stmt {
		MakeNull { target } | MakeNumber { target, .. } | MakeArray { target } | MakeObject { target } | MakeSet { target }
		| ResetLocal { target } => note(*target, acc),
		AssignVar { target, source } | AssignVarOnce { target, source } => {
			note(*target, acc);
			note_operand(source, acc);
		}
		Dot { target, source, key } => {
			note(*target, acc);
			note(*source, acc);
			note_operand(key, acc);
		}
		Len { target, source } => {
			note(*target, acc);
			note(*source, acc);
		}
		Equal { a, b } | NotEqual { a, b } => {
			note_operand(a, acc);
			note_operand(b, acc);
		}
		IsArray { source } | IsObject { source } | IsDefined { source } | IsUndefined { source } => note(*source, acc),
		ArrayAppend { array, value } => {
			note(*array, acc);
			note_operand(value, acc);
		}
		ObjectInsert { object, key, value } | ObjectInsertOnce { object, key, value } => {
			note(*object, acc);
			note_operand(key, acc);
			note_operand(value, acc);
		}
		ObjectMerge { a, b, target } => {
			note(*a, acc);
			note(*b, acc);
			note(*target, acc);
		}
		SetAdd { set, value } => {
			note(*set, acc);
			note_operand(value, acc);
		}
		Call { args, result, .. } => {
			for a in args {
				note(*a, acc);
			}
			note(*result, acc);
		}
		CallDynamic { path, args, result } => {
			for op in path {
				note_operand(op, acc);
			}
			for a in args {
				note(*a, acc);
			}
			note(*result, acc);
		}
		Scan { source, key, value, block } => {
			note(*source, acc);
			note(*key, acc);
			note(*value, acc);
			max_local_in_block(block, acc);
		}
		Block { blocks } => {
			for b in blocks {
				max_local_in_block(b, acc);
			}
		}
		Not { block } => max_local_in_block(block, acc),
		With { local, value, block, .. } => {
			note(*local, acc);
			note_operand(value, acc);
			max_local_in_block(block, acc);
		}
		Break { .. } | Nop => {}
		ReturnLocal { source } => note(*source, acc),
		ResultSetAdd { value } => note(*value, acc),
	}
}
