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

//! Iterative leaf-trimming. Each round marks the edges whose endpoints both
//! have degree greater than one under the previous round's degree maps, then
//! rebuilds fresh degree maps from just the marked edges. A 42-cycle's edges
//! always have both endpoints of degree two or more, so trimming can never
//! discard an edge that belongs to one.

use crate::bins::bin_edges;
use crate::degree::{count_degrees, DegreeCounter};
use crate::metrics::Metrics;
use crate::oracle::{EdgeOracle, Side};

/// Runs the degree-count pass followed by `rounds` leaf-trimming rounds over
/// one bin, returning the survivor edge indices together with the degree
/// maps they were filtered against. A trailing consistency pass guarantees
/// every returned edge has both endpoints at degree >= 2 in the returned
/// maps regardless of how many rounds were requested, including zero.
pub fn trim_bin(
	oracle: &dyn EdgeOracle,
	edge_bits: u8,
	bins: u32,
	bin: u32,
	rounds: u32,
	metrics: &mut Metrics,
) -> (Vec<u64>, DegreeCounter, DegreeCounter) {
	let (mut deg_u, mut deg_v) = count_degrees(oracle, edge_bits, bins, bin, metrics);
	let mut live: Vec<u64> = bin_edges(edge_bits, bins, bin).collect();

	for _ in 0..rounds {
		let marked = mark_pass(oracle, edge_bits, &live, &deg_u, &deg_v, metrics);

		let mut new_deg_u = DegreeCounter::new(edge_bits);
		let mut new_deg_v = DegreeCounter::new(edge_bits);
		for &e in &marked {
			let u = oracle.endpoint(e, Side::U, edge_bits);
			let v = oracle.endpoint(e, Side::V, edge_bits);
			new_deg_u.increment(u);
			new_deg_v.increment(v);
			metrics.hashes_computed += 2;
			metrics.edges_touched += 1;
		}
		metrics.passes += 1;

		live = marked;
		deg_u = new_deg_u;
		deg_v = new_deg_v;
	}

	let survivors = mark_pass(oracle, edge_bits, &live, &deg_u, &deg_v, metrics);
	(survivors, deg_u, deg_v)
}

fn mark_pass(
	oracle: &dyn EdgeOracle,
	edge_bits: u8,
	live: &[u64],
	deg_u: &DegreeCounter,
	deg_v: &DegreeCounter,
	metrics: &mut Metrics,
) -> Vec<u64> {
	let mut marked = Vec::new();
	for &e in live {
		let u = oracle.endpoint(e, Side::U, edge_bits);
		let v = oracle.endpoint(e, Side::V, edge_bits);
		metrics.hashes_computed += 2;
		metrics.edges_touched += 1;
		if deg_u.get(u) > 1 && deg_v.get(v) > 1 {
			marked.push(e);
		}
	}
	metrics.passes += 1;
	marked
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::oracle::Blake2bOracle;

	#[test]
	fn survivors_satisfy_degree_invariant() {
		let oracle = Blake2bOracle::new(&[5u8; 32]).unwrap();
		let edge_bits = 14u8;
		let bins = 4u32;
		let mut metrics = Metrics::default();
		for bin in 0..bins {
			let (survivors, deg_u, deg_v) =
				trim_bin(&oracle, edge_bits, bins, bin, 6, &mut metrics);
			for &e in &survivors {
				let u = oracle.endpoint(e, Side::U, edge_bits);
				let v = oracle.endpoint(e, Side::V, edge_bits);
				assert!(deg_u.get(u) > 1);
				assert!(deg_v.get(v) > 1);
			}
		}
	}

	#[test]
	fn zero_rounds_still_filters_degree_one_leaves() {
		let oracle = Blake2bOracle::new(&[6u8; 32]).unwrap();
		let edge_bits = 10u8;
		let mut metrics = Metrics::default();
		let (survivors, deg_u, deg_v) = trim_bin(&oracle, edge_bits, 1, 0, 0, &mut metrics);
		for &e in &survivors {
			let u = oracle.endpoint(e, Side::U, edge_bits);
			let v = oracle.endpoint(e, Side::V, edge_bits);
			assert!(deg_u.get(u) > 1);
			assert!(deg_v.get(v) > 1);
		}
	}

	#[test]
	fn more_rounds_never_grows_the_survivor_set() {
		let oracle = Blake2bOracle::new(&[8u8; 32]).unwrap();
		let edge_bits = 14u8;
		let mut m1 = Metrics::default();
		let mut m2 = Metrics::default();
		let (few, _, _) = trim_bin(&oracle, edge_bits, 1, 0, 1, &mut m1);
		let (many, _, _) = trim_bin(&oracle, edge_bits, 1, 0, 8, &mut m2);
		assert!(many.len() <= few.len());
	}
}
