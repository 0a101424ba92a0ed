// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

//! IR data types consumed by the evaluation VM: the `Static` constant pool,
//! `Plan`/`Function` entrypoints built of `Block`s of `Statement`s. This
//! crate only describes the shape of a compiled policy; it does not
//! compile one.

pub mod operand;
pub mod policy;
pub mod statement;

pub use operand::{FunctionIndex, Local, Operand, StringIndex};
pub use policy::{Function, Plan, Policy, Static};
pub use statement::{Block, Statement};
