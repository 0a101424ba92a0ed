// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use serde::{Deserialize, Serialize};

/// A register identifier local to one function or plan body.
pub type Local = u32;

/// An index into a policy's `Static.strings` table.
pub type StringIndex = u32;

/// An index into a policy's `Static.functions` table (and, in lockstep, into
/// `Policy.functions`).
pub type FunctionIndex = u32;

/// An operand consumed by a statement: either a register read or a
/// compile-time constant folded into the IR by the front end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
	Local(Local),
	StringIndex(StringIndex),
	Bool(bool),
}
