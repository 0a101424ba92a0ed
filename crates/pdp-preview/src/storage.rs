// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_core::Result;
use pdp_value::{Entry, Path, Value};
use pdp_vm::Namespace;

/// A read-only namespace composing preview-supplied overlay data over a
/// live primary transaction. The overlay always wins at and below any
/// path it defines; reads that miss the overlay fall through to the
/// primary when one is attached, and `not_found` otherwise.
///
/// `finish` is the only way to dispose of this storage: it aborts the
/// wrapped primary transaction rather than committing it, so nothing
/// evaluated during a preview is ever observable outside it.
pub struct PreviewStorage {
	overlay: Value,
	primary: Option<pdp_store::Transaction>,
}

impl PreviewStorage {
	pub fn new(overlay: Value, primary: Option<pdp_store::Transaction>) -> Self {
		Self { overlay, primary }
	}

	/// Discards the storage. The primary transaction, if any, was opened
	/// read-only and is simply dropped here, never committed.
	pub fn finish(self) {
		if let Some(primary) = self.primary {
			primary.abort();
		}
	}
}

impl Namespace for PreviewStorage {
	fn read(&mut self, path: &Path) -> Result<Value> {
		if path.is_empty() {
			let base = match &mut self.primary {
				Some(primary) => match primary.read(path) {
					Ok(v) => v,
					Err(e) if e.code == pdp_core::WireCode::NotFound => Value::empty_object(),
					Err(e) => return Err(e),
				},
				None => Value::empty_object(),
			};
			return Ok(merge_objects(&base, &self.overlay));
		}

		if let Some(found) = self.overlay.get_path(path) {
			return Ok(found.clone());
		}

		match &mut self.primary {
			Some(primary) => primary.read(path),
			None => Err(pdp_core::Error::not_found(format!("path \"{path}\" not found"))),
		}
	}
}

/// Recursive key-wise merge, overlay wins on conflicting leaves. Mirrors
/// the VM's own `ObjectMerge` instruction semantics.
fn merge_objects(primary: &Value, overlay: &Value) -> Value {
	let (Value::Object(pe), Value::Object(oe)) = (primary, overlay) else { return overlay.clone() };
	let mut merged: Vec<Entry> = pe.iter().cloned().collect();
	for (k, v) in oe.iter() {
		match merged.iter_mut().find(|(mk, _)| mk == k) {
			Some(entry) => entry.1 = merge_objects(&entry.1, v),
			None => merged.push((k.clone(), v.clone())),
		}
	}
	Value::object(merged)
}
