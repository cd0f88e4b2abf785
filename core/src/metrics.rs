// Copyright 2018 The Grin Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Monotonically increasing counters shared across a solve. Per-bin workers
//! accumulate private deltas and merge them into the attempt's aggregate at
//! join time, so the hot path never takes a lock.

use std::collections::BTreeMap;

use serde_derive::{Deserialize, Serialize};

/// Stable metrics contract surfaced from `solve`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
	/// Oracle invocations across the solve
	pub hashes_computed: u64,
	/// Edges streamed across degree counting and trimming
	pub edges_touched: u64,
	/// Number of full streaming passes (degree count + trim rounds)
	pub passes: u64,
	/// Number of attempts run so far
	pub attempts: u64,
	/// Number of bins the graph was partitioned into for this solve
	pub bins: u32,
	/// Bin workers that faulted and were treated as "no cycle"
	pub worker_faults: u64,
}

impl Metrics {
	/// Adds another delta's counters into this one. Commutative and
	/// associative, so merge order at join points never matters.
	pub fn merge(&mut self, other: &Metrics) {
		self.hashes_computed += other.hashes_computed;
		self.edges_touched += other.edges_touched;
		self.passes += other.passes;
		self.attempts += other.attempts;
		self.worker_faults += other.worker_faults;
		// `bins` is a constant of the solve, not an accumulator
		self.bins = other.bins;
	}

	/// Renders the stable metrics contract as a string-keyed map for the
	/// external result envelope.
	pub fn to_map(&self) -> BTreeMap<String, f64> {
		let mut map = BTreeMap::new();
		map.insert("hashes_computed".to_string(), self.hashes_computed as f64);
		map.insert("edges_touched".to_string(), self.edges_touched as f64);
		map.insert("passes".to_string(), self.passes as f64);
		map.insert("attempts".to_string(), self.attempts as f64);
		map.insert("bins".to_string(), self.bins as f64);
		if self.worker_faults > 0 {
			map.insert("worker_faults".to_string(), self.worker_faults as f64);
		}
		map
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn merge_is_additive_and_commutative() {
		let mut a = Metrics {
			hashes_computed: 10,
			edges_touched: 5,
			passes: 1,
			attempts: 1,
			bins: 4,
			worker_faults: 0,
		};
		let b = Metrics {
			hashes_computed: 3,
			edges_touched: 7,
			passes: 2,
			attempts: 0,
			bins: 4,
			worker_faults: 1,
		};
		let mut a2 = a.clone();
		a.merge(&b);

		let mut b2 = b.clone();
		b2.merge(&a2);
		a2 = b2;

		assert_eq!(a.hashes_computed, a2.hashes_computed);
		assert_eq!(a.edges_touched, a2.edges_touched);
		assert_eq!(a.passes, a2.passes);
		assert_eq!(a.attempts, a2.attempts);
		assert_eq!(a.worker_faults, a2.worker_faults);
	}

	#[test]
	fn to_map_contains_stable_keys() {
		let m = Metrics {
			hashes_computed: 1,
			edges_touched: 2,
			passes: 3,
			attempts: 4,
			bins: 5,
			worker_faults: 0,
		};
		let map = m.to_map();
		for key in ["hashes_computed", "edges_touched", "passes", "attempts", "bins"] {
			assert!(map.contains_key(key), "missing key {}", key);
		}
		assert!(!map.contains_key("worker_faults"));
	}
}
