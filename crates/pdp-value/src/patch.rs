// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::path::{APPEND, Path, segment_as_index};
use crate::value::Value;
use pdp_core::{Error, Result};

/// A patch operation. `Add` at an existing object key overwrites; at an
/// array index inserts (shifting later elements); at `-` appends. `Replace`
/// and `Remove` fail with `not_found` if the target does not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchOp {
	Add,
	Replace,
	Remove,
}

/// Applies a single patch operation to `root` at `path`, returning the new
/// root. `root` is never mutated in place beyond the copy-on-write clone
/// `CowVec::make_mut` performs on the segments actually touched — siblings
/// of the edit path keep sharing storage with `root`.
pub fn apply(root: &Value, op: PatchOp, path: &Path, value: Value) -> Result<Value> {
	if path.is_empty() {
		return match op {
			PatchOp::Add | PatchOp::Replace => Ok(value),
			PatchOp::Remove => Err(Error::invalid_patch("cannot remove the root document")),
		};
	}
	let mut root = root.clone();
	apply_at(&mut root, path.segments(), op, value)?;
	Ok(root)
}

fn apply_at(node: &mut Value, segments: &[String], op: PatchOp, value: Value) -> Result<()> {
	let (head, rest) = segments.split_first().expect("non-empty path");

	if rest.is_empty() {
		return apply_leaf(node, head, op, value);
	}

	match node {
		Value::Object(entries) => {
			let idx = entries.iter().position(|(k, _)| k == head);
			match idx {
				Some(i) => {
					let (_, child) = &mut entries.make_mut()[i];
					apply_at(child, rest, op, value)
				}
				None => Err(Error::not_found(format!("path segment \"{head}\" not found"))),
			}
		}
		Value::Array(items) => {
			let idx = segment_as_index(head)
				.ok_or_else(|| Error::invalid_patch(format!("\"{head}\" is not a valid array index")))?;
			let child =
				items.make_mut().get_mut(idx).ok_or_else(|| Error::not_found("array index out of range"))?;
			apply_at(child, rest, op, value)
		}
		Value::Null => Err(Error::not_found(format!("path segment \"{head}\" not found"))),
		_ => Err(Error::invalid_patch("path segment addresses a scalar value")),
	}
}

fn apply_leaf(node: &mut Value, segment: &str, op: PatchOp, value: Value) -> Result<()> {
	match node {
		Value::Object(entries) => match op {
			PatchOp::Add => {
				let entries = entries.make_mut();
				if let Some(e) = entries.iter_mut().find(|(k, _)| k == segment) {
					e.1 = value;
				} else {
					entries.push((segment.to_string(), value));
				}
				Ok(())
			}
			PatchOp::Replace => {
				let entries = entries.make_mut();
				match entries.iter_mut().find(|(k, _)| k == segment) {
					Some(e) => {
						e.1 = value;
						Ok(())
					}
					None => Err(Error::not_found(format!("key \"{segment}\" not found"))),
				}
			}
			PatchOp::Remove => {
				let entries = entries.make_mut();
				let idx = entries
					.iter()
					.position(|(k, _)| k == segment)
					.ok_or_else(|| Error::not_found(format!("key \"{segment}\" not found")))?;
				entries.remove(idx);
				Ok(())
			}
		},
		Value::Array(items) => {
			if segment == APPEND {
				return match op {
					PatchOp::Add => {
						items.make_mut().push(value);
						Ok(())
					}
					_ => Err(Error::invalid_patch("\"-\" is only valid with add")),
				};
			}
			let idx = segment_as_index(segment)
				.ok_or_else(|| Error::invalid_patch(format!("\"{segment}\" is not a valid array index")))?;
			match op {
				PatchOp::Add => {
					let items = items.make_mut();
					if idx > items.len() {
						return Err(Error::invalid_patch("array index out of range"));
					}
					items.insert(idx, value);
					Ok(())
				}
				PatchOp::Replace => {
					let items = items.make_mut();
					if idx >= items.len() {
						return Err(Error::not_found("array index out of range"));
					}
					items[idx] = value;
					Ok(())
				}
				PatchOp::Remove => {
					let items = items.make_mut();
					if idx >= items.len() {
						return Err(Error::not_found("array index out of range"));
					}
					items.remove(idx);
					Ok(())
				}
			}
		}
		_ => Err(Error::invalid_patch("path addresses into a scalar value")),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn store_round_trip_invariant() {
		let root = Value::empty_object();
		let v = Value::object(vec![("x".into(), Value::int(1))]);
		let written = apply(&root, PatchOp::Add, &Path::parse("/foo"), v.clone()).unwrap();
		assert_eq!(written.get_key("foo").unwrap(), &v);
	}

	#[test]
	fn patch_idempotence_remove_twice_not_found() {
		let root = Value::object(vec![("foo".into(), Value::int(1))]);
		let removed = apply(&root, PatchOp::Remove, &Path::parse("/foo"), Value::Null).unwrap();
		assert!(removed.get_key("foo").is_none());
		let err = apply(&removed, PatchOp::Remove, &Path::parse("/foo"), Value::Null).unwrap_err();
		assert_eq!(err.code, pdp_core::WireCode::NotFound);
	}

	#[test]
	fn add_at_array_index_shifts_instead_of_overwriting() {
		let root = Value::object(vec![("arr".into(), Value::array(vec![Value::int(1), Value::int(3)]))]);
		let written = apply(&root, PatchOp::Add, &Path::parse("/arr/1"), Value::int(2)).unwrap();
		let arr = written.get_key("arr").unwrap().as_array().unwrap();
		assert_eq!(arr.as_slice(), &[Value::int(1), Value::int(2), Value::int(3)]);
	}

	#[test]
	fn add_append_segment_appends() {
		let root = Value::object(vec![("arr".into(), Value::array(vec![Value::int(1)]))]);
		let written = apply(&root, PatchOp::Add, &Path::parse("/arr/-"), Value::int(2)).unwrap();
		let arr = written.get_key("arr").unwrap().as_array().unwrap();
		assert_eq!(arr.as_slice(), &[Value::int(1), Value::int(2)]);
	}

	#[test]
	fn replace_missing_key_fails_not_found() {
		let root = Value::empty_object();
		let err = apply(&root, PatchOp::Replace, &Path::parse("/missing"), Value::int(1)).unwrap_err();
		assert_eq!(err.code, pdp_core::WireCode::NotFound);
	}

	#[test]
	fn sibling_subtree_keeps_sharing_storage() {
		let shared_child = Value::array(vec![Value::int(1), Value::int(2), Value::int(3)]);
		let root = Value::object(vec![
			("a".into(), shared_child.clone()),
			("b".into(), Value::int(1)),
		]);
		let written = apply(&root, PatchOp::Replace, &Path::parse("/b"), Value::int(2)).unwrap();
		assert_eq!(written.get_key("a").unwrap(), &shared_child);
	}
}
