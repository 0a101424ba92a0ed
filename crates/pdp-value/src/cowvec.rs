// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use std::ops::Deref;
use std::sync::Arc;

/// Copy-on-write vector: many `Value`s may share one backing `Vec` until a
/// mutation forces a private copy. `Arc` (not `Rc`) because values cross
/// task boundaries in the async server.
#[derive(Clone, Debug, PartialEq)]
pub enum CowVec<T>
where
	T: Clone,
{
	Owned(Vec<T>),
	Shared(Arc<Vec<T>>),
}

impl<T> CowVec<T>
where
	T: Clone,
{
	pub fn new(vec: Vec<T>) -> Self {
		CowVec::Owned(vec)
	}

	pub fn from_shared(arc: Arc<Vec<T>>) -> Self {
		CowVec::Shared(arc)
	}

	pub fn as_slice(&self) -> &[T] {
		match self {
			CowVec::Owned(vec) => vec,
			CowVec::Shared(arc) => arc,
		}
	}

	pub fn len(&self) -> usize {
		self.as_slice().len()
	}

	pub fn is_empty(&self) -> bool {
		self.as_slice().is_empty()
	}

	pub fn get(&self, idx: usize) -> Option<&T> {
		self.as_slice().get(idx)
	}

	/// Freeze into a cheaply-clonable shared handle. Subsequent clones of
	/// the returned `CowVec` are reference-count bumps, not data copies.
	pub fn share(self) -> Self {
		match self {
			CowVec::Owned(vec) => CowVec::Shared(Arc::new(vec)),
			shared => shared,
		}
	}

	/// Ensures unique ownership and returns a mutable reference to the
	/// inner `Vec`, cloning the backing storage only if it is shared.
	pub fn make_mut(&mut self) -> &mut Vec<T> {
		match self {
			CowVec::Owned(vec) => vec,
			CowVec::Shared(arc) => {
				let cloned = (**arc).clone();
				*self = CowVec::Owned(cloned);
				match self {
					CowVec::Owned(vec) => vec,
					CowVec::Shared(_) => unreachable!(),
				}
			}
		}
	}

	pub fn push(&mut self, value: T) {
		self.make_mut().push(value);
	}

	pub fn set(&mut self, idx: usize, value: T) {
		self.make_mut()[idx] = value;
	}

	pub fn insert(&mut self, idx: usize, value: T) {
		self.make_mut().insert(idx, value);
	}

	pub fn remove(&mut self, idx: usize) -> T {
		self.make_mut().remove(idx)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.as_slice().iter()
	}
}

impl<T> Default for CowVec<T>
where
	T: Clone,
{
	fn default() -> Self {
		CowVec::Owned(Vec::new())
	}
}

impl<T> Deref for CowVec<T>
where
	T: Clone,
{
	type Target = [T];

	fn deref(&self) -> &Self::Target {
		self.as_slice()
	}
}

impl<T> FromIterator<T> for CowVec<T>
where
	T: Clone,
{
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		CowVec::Owned(iter.into_iter().collect())
	}
}

impl<T> IntoIterator for CowVec<T>
where
	T: Clone,
{
	type Item = T;
	type IntoIter = std::vec::IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter {
		match self {
			CowVec::Owned(vec) => vec.into_iter(),
			CowVec::Shared(arc) => (*arc).clone().into_iter(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clone_of_shared_does_not_copy_until_mutated() {
		let a = CowVec::new(vec![1, 2, 3]).share();
		let mut b = a.clone();
		assert_eq!(a.as_slice(), b.as_slice());
		b.push(4);
		assert_eq!(a.as_slice(), &[1, 2, 3]);
		assert_eq!(b.as_slice(), &[1, 2, 3, 4]);
	}
}
