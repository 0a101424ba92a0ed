// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::record::DiffRecord;
use pdp_value::Value;
use std::collections::HashMap;

/// Group-mode's per-`(path, input)` samples, accumulated as records arrive
/// and reduced to `GroupStats` on flush.
#[derive(Default)]
pub struct GroupAggregator {
	groups: HashMap<(String, String), Samples>,
}

struct Samples {
	input: Value,
	primary_ns: Vec<u64>,
	secondary_ns: Vec<u64>,
}

impl GroupAggregator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(&mut self, record: &DiffRecord) {
		let input_key = serde_json::to_string(&record.input).unwrap_or_default();
		let entry = self.groups.entry((record.path.clone(), input_key)).or_insert_with(|| Samples {
			input: record.input.clone(),
			primary_ns: Vec::new(),
			secondary_ns: Vec::new(),
		});
		entry.primary_ns.push(record.eval_ns_a);
		entry.secondary_ns.push(record.eval_ns_b);
	}

	/// Reduces every accumulated group to its final statistics. Row
	/// order is unspecified beyond being stable for a given input map.
	pub fn flush(self) -> Vec<GroupStats> {
		self.groups
			.into_iter()
			.map(|((path, _), samples)| GroupStats {
				path,
				input: samples.input,
				n: samples.primary_ns.len(),
				primary: Side::from_samples(&samples.primary_ns),
				secondary: Side::from_samples(&samples.secondary_ns),
			})
			.collect()
	}
}

/// Count, mean, median, min, max, and sample stddev/variance of eval
/// nanoseconds for one side (primary or secondary) of a group.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Side {
	pub mean_ns: f64,
	pub median_ns: f64,
	pub min_ns: u64,
	pub max_ns: u64,
	pub stddev_ns: f64,
	pub var_ns: f64,
}

impl Side {
	fn from_samples(samples: &[u64]) -> Self {
		if samples.is_empty() {
			return Self::default();
		}
		let n = samples.len() as f64;
		let sum: f64 = samples.iter().map(|&v| v as f64).sum();
		let mean = sum / n;

		let mut sorted = samples.to_vec();
		sorted.sort_unstable();
		let median = if sorted.len() % 2 == 0 {
			let mid = sorted.len() / 2;
			(sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
		} else {
			sorted[sorted.len() / 2] as f64
		};

		// Sample variance (Bessel-corrected, n - 1 denominator);
		// undefined for a single sample, reported as 0.
		let var = if samples.len() > 1 {
			samples.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / (n - 1.0)
		} else {
			0.0
		};

		Self {
			mean_ns: mean,
			median_ns: median,
			min_ns: *sorted.first().unwrap(),
			max_ns: *sorted.last().unwrap(),
			stddev_ns: var.sqrt(),
			var_ns: var,
		}
	}
}

/// One aggregated `(path, input)` row, column-ordered to match the
/// group-mode CSV/table layout.
#[derive(Clone, Debug)]
pub struct GroupStats {
	pub path: String,
	pub input: Value,
	pub n: usize,
	pub primary: Side,
	pub secondary: Side,
}

pub const GROUP_CSV_COLUMNS: &str = "path,input,n,mean_primary_ns,median_primary_ns,min_primary_ns,max_primary_ns,stddev_primary_ns,var_primary_ns,mean_secondary_ns,median_secondary_ns,min_secondary_ns,max_secondary_ns,stddev_secondary_ns,var_secondary_ns";

impl GroupStats {
	pub fn csv_row(&self) -> String {
		format!(
			"{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
			self.path,
			serde_json::to_string(&self.input).unwrap_or_default(),
			self.n,
			self.primary.mean_ns,
			self.primary.median_ns,
			self.primary.min_ns,
			self.primary.max_ns,
			self.primary.stddev_ns,
			self.primary.var_ns,
			self.secondary.mean_ns,
			self.secondary.median_ns,
			self.secondary.min_ns,
			self.secondary.max_ns,
			self.secondary.stddev_ns,
			self.secondary.var_ns,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::record::EvalOutcome;
	use pdp_core::{DecisionId, NodeId, RequestId};

	fn record(path: &str, ns_a: u64, ns_b: u64) -> DiffRecord {
		DiffRecord {
			node_id: NodeId("n".into()),
			req_id: RequestId::new(),
			decision_id: DecisionId::new(),
			path: path.into(),
			input: Value::Null,
			value_a: EvalOutcome::Value(Value::int(0)),
			value_b: EvalOutcome::Value(Value::int(1)),
			eval_ns_a: ns_a,
			eval_ns_b: ns_b,
		}
	}

	#[test]
	fn groups_by_path_and_input() {
		let mut agg = GroupAggregator::new();
		agg.record(&record("test/p", 100, 200));
		agg.record(&record("test/p", 300, 400));
		agg.record(&record("test/q", 10, 20));

		let groups = agg.flush();
		assert_eq!(groups.len(), 2);
		let p = groups.iter().find(|g| g.path == "test/p").unwrap();
		assert_eq!(p.n, 2);
		assert_eq!(p.primary.mean_ns, 200.0);
		assert_eq!(p.primary.min_ns, 100);
		assert_eq!(p.primary.max_ns, 300);
	}

	#[test]
	fn single_sample_variance_is_zero() {
		let mut agg = GroupAggregator::new();
		agg.record(&record("test/p", 100, 200));
		let groups = agg.flush();
		assert_eq!(groups[0].primary.var_ns, 0.0);
	}

	#[test]
	fn sample_variance_uses_bessel_correction() {
		let mut agg = GroupAggregator::new();
		agg.record(&record("test/p", 10, 0));
		agg.record(&record("test/p", 20, 0));
		let groups = agg.flush();
		// mean = 15, squared deviations = 25 + 25 = 50, n-1 = 1
		assert_eq!(groups[0].primary.var_ns, 50.0);
	}
}
