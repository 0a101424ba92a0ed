// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::operand::{FunctionIndex, Local, Operand, StringIndex};
use serde::{Deserialize, Serialize};

/// An ordered sequence of statements executed as a unit. A block is the
/// target of `break`: exiting a block either falls through to its
/// successor inside a `BlockStmt` group or propagates to the enclosing
/// scope.
pub type Block = Vec<Statement>;

/// One IR instruction. Comparison and type-test statements (`Equal`,
/// `NotEqual`, `IsArray`, ...) do not carry an explicit target: on failure
/// they break the block they live in directly, the same way an undefined
/// lookup does. `AssignVarOnceStmt` and `ObjectInsertOnceStmt` additionally
/// detect conflicting writes and surface an evaluation conflict rather than
/// silently overwriting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Statement {
	MakeNull { target: Local },
	MakeNumber { target: Local, value: StringIndex },
	MakeArray { target: Local },
	MakeObject { target: Local },
	MakeSet { target: Local },

	AssignVar { target: Local, source: Operand },
	AssignVarOnce { target: Local, source: Operand },
	ResetLocal { target: Local },

	Dot { target: Local, source: Local, key: Operand },
	Len { target: Local, source: Local },

	Equal { a: Operand, b: Operand },
	NotEqual { a: Operand, b: Operand },
	IsArray { source: Local },
	IsObject { source: Local },
	IsDefined { source: Local },
	IsUndefined { source: Local },

	ArrayAppend { array: Local, value: Operand },
	ObjectInsert { object: Local, key: Operand, value: Operand },
	ObjectInsertOnce { object: Local, key: Operand, value: Operand },
	ObjectMerge { a: Local, b: Local, target: Local },
	SetAdd { set: Local, value: Operand },

	Call { func: FunctionIndex, args: Vec<Local>, result: Local },
	CallDynamic { path: Vec<Operand>, args: Vec<Local>, result: Local },

	Scan { source: Local, key: Local, value: Local, block: Block },
	Block { blocks: Vec<Block> },
	Not { block: Block },
	With { local: Local, path: Vec<StringIndex>, value: Operand, block: Block },

	Break { index: u32 },
	ReturnLocal { source: Local },
	ResultSetAdd { value: Local },

	Nop,
}
