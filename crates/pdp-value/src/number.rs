// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A numeric value with lossless decimal/integer semantics. Two numbers
/// compare equal by value, never by representation: `1` and `1.0` are the
/// same `Number`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "serde_json::Number", try_from = "serde_json::Number")]
pub struct Number(BigDecimal);

impl Number {
	pub fn from_i64(v: i64) -> Self {
		Number(BigDecimal::from(v))
	}

	pub fn from_f64(v: f64) -> Option<Self> {
		BigDecimal::try_from(v).ok().map(Number)
	}

	/// Parses a literal numeric string, e.g. an interned IR constant.
	pub fn from_decimal_str(s: &str) -> Option<Self> {
		BigDecimal::from_str(s).ok().map(Number)
	}

	pub fn to_i64(&self) -> Option<i64> {
		use num_bigint::ToBigInt;
		self.0.to_bigint().and_then(|b| {
			if BigDecimal::from(b.clone()) == self.0 { b.to_string().parse().ok() } else { None }
		})
	}

	pub fn to_f64(&self) -> f64 {
		use num_traits::ToPrimitive;
		self.0.to_f64().unwrap_or(f64::NAN)
	}

	pub fn as_decimal(&self) -> &BigDecimal {
		&self.0
	}
}

impl PartialEq for Number {
	fn eq(&self, other: &Self) -> bool {
		self.0 == other.0
	}
}

impl Eq for Number {}

impl Display for Number {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl From<Number> for serde_json::Number {
	fn from(n: Number) -> Self {
		if let Some(i) = n.to_i64() {
			serde_json::Number::from(i)
		} else {
			serde_json::Number::from_f64(n.to_f64()).unwrap_or_else(|| serde_json::Number::from(0))
		}
	}
}

impl TryFrom<serde_json::Number> for Number {
	type Error = String;

	fn try_from(n: serde_json::Number) -> Result<Self, Self::Error> {
		BigDecimal::from_str(&n.to_string()).map(Number).map_err(|e| e.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn integer_and_decimal_forms_compare_equal() {
		let a = Number::from_i64(1);
		let b: Number = serde_json::Number::from_f64(1.0).unwrap().try_into().unwrap();
		assert_eq!(a, b);
	}
}
