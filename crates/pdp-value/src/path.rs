// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use std::fmt::{Display, Formatter};

/// The literal segment that denotes "append" at the end of an array path.
pub const APPEND: &str = "-";

/// An ordered sequence of string segments addressing a position in a
/// `Value`. A segment parseable as a non-negative integer addresses an
/// array index; the literal segment `-` addresses array append.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Path(Vec<String>);

impl Path {
	pub fn root() -> Self {
		Path(Vec::new())
	}

	pub fn new(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Path(segments.into_iter().map(Into::into).collect())
	}

	/// Parses a `/`-delimited path string, e.g. `/kafka/messages`. The
	/// root path is the empty string.
	pub fn parse(s: &str) -> Self {
		let trimmed = s.trim_matches('/');
		if trimmed.is_empty() { Path::root() } else { Path(trimmed.split('/').map(str::to_string).collect()) }
	}

	pub fn segments(&self) -> &[String] {
		&self.0
	}

	pub fn is_root(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn push(&self, segment: impl Into<String>) -> Self {
		let mut segments = self.0.clone();
		segments.push(segment.into());
		Path(segments)
	}

	pub fn parent(&self) -> Option<Path> {
		if self.0.is_empty() { None } else { Some(Path(self.0[..self.0.len() - 1].to_vec())) }
	}

	pub fn last(&self) -> Option<&str> {
		self.0.last().map(String::as_str)
	}

	/// `true` if `self` is a strict prefix of `other` (i.e. `other` is
	/// strictly deeper and begins with every segment of `self`).
	pub fn is_strict_prefix_of(&self, other: &Path) -> bool {
		self.0.len() < other.0.len() && self.0 == other.0[..self.0.len()]
	}

	pub fn starts_with(&self, prefix: &Path) -> bool {
		prefix.0.len() <= self.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
	}

	/// The remaining segments after stripping `prefix`, assuming
	/// `self.starts_with(prefix)`.
	pub fn strip_prefix(&self, prefix: &Path) -> Path {
		Path(self.0[prefix.0.len()..].to_vec())
	}

	pub fn join(&self, suffix: &Path) -> Path {
		let mut segments = self.0.clone();
        segments.extend(suffix.0.iter().cloned());
		Path(segments)
	}
}

impl Display for Path {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "/{}", self.0.join("/"))
	}
}

impl<S: Into<String>> FromIterator<S> for Path {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Path(iter.into_iter().map(Into::into).collect())
	}
}

/// Parses a path segment as an array index: any segment parseable as a
/// non-negative integer addresses that index.
pub fn segment_as_index(segment: &str) -> Option<usize> {
	if segment == APPEND {
		None
	} else {
		segment.parse::<usize>().ok()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_and_display_round_trip() {
		let p = Path::parse("/kafka/messages");
		assert_eq!(p.segments(), &["kafka".to_string(), "messages".to_string()]);
		assert_eq!(p.to_string(), "/kafka/messages");
	}

	#[test]
	fn root_path_is_empty() {
		assert!(Path::parse("/").is_root());
		assert!(Path::parse("").is_root());
	}

	#[test]
	fn strict_prefix_detection() {
		let mount = Path::parse("/kafka/messages");
		let deeper = Path::parse("/kafka/messages/topic1");
		assert!(mount.is_strict_prefix_of(&deeper));
		assert!(!mount.is_strict_prefix_of(&mount));
		assert!(!deeper.is_strict_prefix_of(&mount));
	}

	#[test]
	fn append_segment_is_not_an_index() {
		assert_eq!(segment_as_index("-"), None);
		assert_eq!(segment_as_index("3"), Some(3));
		assert_eq!(segment_as_index("foo"), None);
	}
}
