// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::cowvec::CowVec;
use crate::number::Number;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// A single object entry. Stored as a flat `(key, Value)` pair rather than
/// a map so the whole object can live in a `CowVec` and share storage with
/// its source on read.
pub type Entry = (String, Value);

/// A document-shaped value: the discriminated union every store, the VM,
/// and every HTTP payload in this system is built from.
///
/// Values are produced fresh on mutation; the underlying containers may
/// share structure with their source via `CowVec`'s copy-on-write clone.
///
/// `Serialize`/`Deserialize` go through `serde_json::Value` so that
/// `Object` renders as a JSON object (not as an array of pairs) despite
/// being stored internally as a flat `CowVec<Entry>`.
#[derive(Clone, Debug)]
pub enum Value {
	Null,
	Bool(bool),
	Number(Number),
	String(String),
	Array(CowVec<Value>),
	Object(CowVec<Entry>),
}

impl Value {
	pub fn object(entries: Vec<Entry>) -> Self {
		Value::Object(CowVec::new(entries))
	}

	pub fn empty_object() -> Self {
		Value::Object(CowVec::default())
	}

	pub fn array(items: Vec<Value>) -> Self {
		Value::Array(CowVec::new(items))
	}

	pub fn string(s: impl Into<String>) -> Self {
		Value::String(s.into())
	}

	pub fn int(v: i64) -> Self {
		Value::Number(Number::from_i64(v))
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn is_object(&self) -> bool {
		matches!(self, Value::Object(_))
	}

	pub fn is_array(&self) -> bool {
		matches!(self, Value::Array(_))
	}

	pub fn as_object(&self) -> Option<&CowVec<Entry>> {
		match self {
			Value::Object(entries) => Some(entries),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&CowVec<Value>> {
		match self {
			Value::Array(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_number(&self) -> Option<&Number> {
		match self {
			Value::Number(n) => Some(n),
			_ => None,
		}
	}

	/// Looks up a single object key. Object key order is not semantically
	/// meaningful, so this is a linear scan, not an index lookup; callers
	/// that need repeated lookups should build their own index.
	pub fn get_key(&self, key: &str) -> Option<&Value> {
		self.as_object()?.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	pub fn get_index(&self, idx: usize) -> Option<&Value> {
		self.as_array()?.get(idx)
	}

	/// Navigates a multi-segment path, returning `None` at the first
	/// missing or non-container segment.
	pub fn get_path(&self, path: &crate::path::Path) -> Option<&Value> {
		let mut node = self;
		for segment in path.segments() {
			node = match node {
				Value::Object(_) => node.get_key(segment)?,
				Value::Array(_) => node.get_index(crate::path::segment_as_index(segment)?)?,
				_ => return None,
			};
		}
		Some(node)
	}

	/// Deep value-equality. Objects compare as unordered key sets
	/// (insertion order is not semantically meaningful); arrays compare
	/// element-wise in order; numbers compare by value regardless of
	/// integer/decimal representation.
	pub fn deep_eq(&self, other: &Value) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::Number(a), Value::Number(b)) => a == b,
			(Value::String(a), Value::String(b)) => a == b,
			(Value::Array(a), Value::Array(b)) => {
				a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.deep_eq(y))
			}
			(Value::Object(a), Value::Object(b)) => {
				a.len() == b.len()
					&& a.iter().all(|(k, v)| b.iter().any(|(k2, v2)| k == k2 && v.deep_eq(v2)))
			}
			_ => false,
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		self.deep_eq(other)
	}
}

impl Default for Value {
	fn default() -> Self {
		Value::Null
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Null => f.write_str("null"),
			Value::Bool(b) => Display::fmt(b, f),
			Value::Number(n) => Display::fmt(n, f),
			Value::String(s) => write!(f, "{s:?}"),
			Value::Array(items) => {
				f.write_str("[")?;
				for (i, v) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(",")?;
					}
					Display::fmt(v, f)?;
				}
				f.write_str("]")
			}
			Value::Object(entries) => {
				f.write_str("{")?;
				for (i, (k, v)) in entries.iter().enumerate() {
					if i > 0 {
						f.write_str(",")?;
					}
					write!(f, "{k:?}:{v}")?;
				}
				f.write_str("}")
			}
		}
	}
}

impl From<serde_json::Value> for Value {
	fn from(v: serde_json::Value) -> Self {
		match v {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(b),
			serde_json::Value::Number(n) => {
				Value::Number(n.try_into().unwrap_or_else(|_| Number::from_i64(0)))
			}
			serde_json::Value::String(s) => Value::String(s),
			serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from).collect()),
			serde_json::Value::Object(map) => {
				Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
			}
		}
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let json: serde_json::Value = self.clone().into();
		json.serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for Value {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let json = serde_json::Value::deserialize(deserializer)?;
		Ok(Value::from(json))
	}
}

impl From<Value> for serde_json::Value {
	fn from(v: Value) -> Self {
		match v {
			Value::Null => serde_json::Value::Null,
			Value::Bool(b) => serde_json::Value::Bool(b),
			Value::Number(n) => serde_json::Value::Number(n.into()),
			Value::String(s) => serde_json::Value::String(s),
			Value::Array(items) => serde_json::Value::Array(items.into_iter().map(Into::into).collect()),
			Value::Object(entries) => {
				serde_json::Value::Object(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_is_null() {
		assert_eq!(Value::default(), Value::Null);
	}

	#[test]
	fn object_equality_ignores_key_order() {
		let a = Value::object(vec![("a".into(), Value::int(1)), ("b".into(), Value::int(2))]);
		let b = Value::object(vec![("b".into(), Value::int(2)), ("a".into(), Value::int(1))]);
		assert_eq!(a, b);
	}

	#[test]
	fn number_equality_ignores_int_vs_decimal_representation() {
		let a = Value::from(serde_json::json!(1));
		let b = Value::from(serde_json::json!(1.0));
		assert_eq!(a, b);
	}

	#[test]
	fn get_path_navigates_nested_containers() {
		let value: Value = serde_json::json!({"foo": {"bar": [10, 20]}}).into();
		let path = crate::path::Path::parse("/foo/bar/1");
		assert_eq!(value.get_path(&path), Some(&Value::int(20)));
		assert_eq!(value.get_path(&crate::path::Path::parse("/foo/missing")), None);
	}

	#[test]
	fn json_round_trip_preserves_structure() {
		let original = serde_json::json!({"foo": {"bar": [1, 2, "x", null, true]}});
		let value: Value = original.clone().into();
		let back: serde_json::Value = value.into();
		assert_eq!(original, back);
	}
}
