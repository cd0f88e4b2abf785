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

//! Independent verification of a claimed cycle. Verification is cheap
//! relative to solving: it only ever re-derives endpoints for the edges in
//! the claimed cycle and checks length, distinct edges, claimed-endpoint
//! agreement and closure on the caller's own ordering. A malformed cycle is
//! reported as `Ok(false)`, never a panic; `Err` is reserved for a caller
//! contract violation such as a malformed header.

use std::collections::HashSet;

use crate::error::Error;
use crate::oracle::{Blake2bOracle, EdgeOracle, Side};

/// One edge of a claimed cycle: its index and the endpoints the caller
/// claims the oracle produces for it. Carrying `u`/`v` alongside `e` lets
/// `verify` reject a cycle whose claimed endpoints don't match the oracle,
/// not just one whose edge indices happen to chain together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeTriple {
	/// Edge index
	pub e: u64,
	/// Claimed `u`-side endpoint
	pub u: u64,
	/// Claimed `v`-side endpoint
	pub v: u64,
}

/// Verifies that `cycle` is a simple directed cycle of exactly `cycle_len`
/// distinct edges in the bipartite graph defined by `header` and
/// `edge_bits`, and that every claimed endpoint in `cycle` agrees with the
/// oracle.
pub fn verify(header: &[u8], edge_bits: u8, cycle_len: usize, cycle: &[EdgeTriple]) -> Result<bool, Error> {
	let oracle = Blake2bOracle::new(header)?;
	verify_with_oracle(&oracle, edge_bits, cycle_len, cycle)
}

/// Same as [`verify`] but against a caller-supplied oracle, so callers that
/// already hold one (e.g. the solve loop re-checking its own output) don't
/// pay to rebuild it.
pub fn verify_with_oracle(
	oracle: &dyn EdgeOracle,
	edge_bits: u8,
	cycle_len: usize,
	cycle: &[EdgeTriple],
) -> Result<bool, Error> {
	if cycle.len() != cycle_len {
		return Ok(false);
	}

	let mut seen_edges = HashSet::with_capacity(cycle.len());
	for triple in cycle {
		if !seen_edges.insert(triple.e) {
			return Ok(false);
		}
	}

	for triple in cycle {
		let expected_u = oracle.endpoint(triple.e, Side::U, edge_bits);
		let expected_v = oracle.endpoint(triple.e, Side::V, edge_bits);
		if triple.u != expected_u || triple.v != expected_v {
			return Ok(false);
		}
	}

	for i in 0..cycle.len() {
		let next = cycle[(i + 1) % cycle.len()];
		if cycle[i].v != next.u {
			return Ok(false);
		}
	}

	Ok(true)
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::oracle::Side;

	/// Hand-scripted graph with a single directed 4-cycle
	/// `10 -> 20 -> 30 -> 40 -> 10`, matching `cycle::test::FourCycleOracle`.
	struct FourCycleOracle;

	impl EdgeOracle for FourCycleOracle {
		fn endpoint(&self, edge: u64, side: Side, _edge_bits: u8) -> u64 {
			match (edge, side) {
				(0, Side::U) => 10,
				(0, Side::V) => 20,
				(1, Side::U) => 20,
				(1, Side::V) => 30,
				(2, Side::U) => 30,
				(2, Side::V) => 40,
				(3, Side::U) => 40,
				(3, Side::V) => 10,
				_ => unreachable!("test oracle only defines 4 edges"),
			}
		}
	}

	fn valid_cycle(oracle: &dyn EdgeOracle) -> Vec<EdgeTriple> {
		(0..4u64)
			.map(|e| EdgeTriple {
				e,
				u: oracle.endpoint(e, Side::U, 8),
				v: oracle.endpoint(e, Side::V, 8),
			})
			.collect()
	}

	#[test]
	fn accepts_valid_cycle() {
		let oracle = FourCycleOracle;
		let cycle = valid_cycle(&oracle);
		assert_eq!(verify_with_oracle(&oracle, 8, 4, &cycle).unwrap(), true);
	}

	#[test]
	fn rejects_wrong_length() {
		let oracle = FourCycleOracle;
		let cycle = valid_cycle(&oracle);
		assert_eq!(verify_with_oracle(&oracle, 8, 42, &cycle).unwrap(), false);
	}

	#[test]
	fn rejects_duplicate_edges() {
		let oracle = FourCycleOracle;
		let mut cycle = valid_cycle(&oracle);
		cycle[2] = cycle[1];
		assert_eq!(verify_with_oracle(&oracle, 8, 4, &cycle).unwrap(), false);
	}

	#[test]
	fn rejects_flipped_u() {
		let oracle = FourCycleOracle;
		let mut cycle = valid_cycle(&oracle);
		cycle[1].u += 1;
		assert_eq!(verify_with_oracle(&oracle, 8, 4, &cycle).unwrap(), false);
	}

	#[test]
	fn rejects_flipped_v() {
		let oracle = FourCycleOracle;
		let mut cycle = valid_cycle(&oracle);
		cycle[1].v += 1;
		assert_eq!(verify_with_oracle(&oracle, 8, 4, &cycle).unwrap(), false);
	}

	#[test]
	fn rejects_broken_adjacency_on_given_order() {
		// every triple's (u, v) still matches the oracle, but swapping two
		// edges breaks v_i == u_{i+1} on this exact ordering.
		let oracle = FourCycleOracle;
		let mut cycle = valid_cycle(&oracle);
		cycle.swap(1, 2);
		assert_eq!(verify_with_oracle(&oracle, 8, 4, &cycle).unwrap(), false);
	}

	#[test]
	fn rejects_wrong_header_length() {
		assert!(verify(&[0u8; 10], 8, 42, &[]).is_err());
	}

	#[test]
	fn solved_cycle_round_trips_through_verify() {
		use crate::cycle::find_cycle;

		let oracle = FourCycleOracle;
		let survivors = vec![0, 1, 2, 3];
		let found = find_cycle(&oracle, 8, &survivors, 4, 10_000).expect("cycle exists");
		let triples: Vec<EdgeTriple> = found
			.iter()
			.map(|&e| EdgeTriple {
				e,
				u: oracle.endpoint(e, Side::U, 8),
				v: oracle.endpoint(e, Side::V, 8),
			})
			.collect();
		assert_eq!(verify_with_oracle(&oracle, 8, 4, &triples).unwrap(), true);
	}
}
