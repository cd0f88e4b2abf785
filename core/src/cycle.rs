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

//! Bounded-depth search for a simple cycle of exactly `cycle_len` edges
//! among a bin's survivors. The cycle relation is directed: edge `i`'s `v`
//! endpoint must equal edge `i+1`'s `u` endpoint, wrapping around to the
//! start. The survivor set is sparse enough after trimming that an
//! adjacency map fits comfortably in memory; the search is still
//! exponential in the worst case, so callers must supply an expansion
//! budget to bound the work any one bin can spend.

use std::collections::HashMap;

use crate::oracle::{EdgeOracle, Side};

/// Adjacency from a node id to the survivor edges that originate there,
/// i.e. the edges whose `u` endpoint equals that node. Keyed on `u` because
/// the directed walk only ever needs "which edges could follow the current
/// edge", and that's exactly the edges whose `u` matches the current edge's
/// `v`.
pub(crate) struct Adjacency {
	by_u: HashMap<u64, Vec<(u64, u64)>>,
}

impl Adjacency {
	pub(crate) fn build(oracle: &dyn EdgeOracle, edge_bits: u8, survivors: &[u64]) -> Adjacency {
		let mut by_u: HashMap<u64, Vec<(u64, u64)>> = HashMap::new();
		for &e in survivors {
			let u = oracle.endpoint(e, Side::U, edge_bits);
			let v = oracle.endpoint(e, Side::V, edge_bits);
			by_u.entry(u).or_default().push((v, e));
		}
		Adjacency { by_u }
	}

	/// Edges that may directly follow an edge whose `v` endpoint is `node`.
	pub(crate) fn successors(&self, node: u64) -> &[(u64, u64)] {
		self.by_u.get(&node).map(Vec::as_slice).unwrap_or(&[])
	}
}

/// Searches a bin's survivor edges for a simple directed cycle of exactly
/// `cycle_len` edges, spending at most `expansion_budget` edge candidates
/// considered across the whole search. Returns the cycle's edge indices in
/// traversal order — consecutive edges satisfy `v_i == u_{i+1}`, wrapping
/// around to the start — or `None` if no cycle was found before the budget
/// ran out or the survivor set was exhausted.
pub fn find_cycle(
	oracle: &dyn EdgeOracle,
	edge_bits: u8,
	survivors: &[u64],
	cycle_len: usize,
	expansion_budget: u64,
) -> Option<Vec<u64>> {
	if cycle_len == 0 {
		return None;
	}
	let adjacency = Adjacency::build(oracle, edge_bits, survivors);
	let mut budget = expansion_budget;

	for &start_edge in survivors {
		let start_u = oracle.endpoint(start_edge, Side::U, edge_bits);
		let start_v = oracle.endpoint(start_edge, Side::V, edge_bits);

		let mut visited = vec![start_edge];
		let mut path = vec![start_edge];
		if let Some(found) = dfs(
			&adjacency,
			start_v,
			start_u,
			cycle_len,
			&mut path,
			&mut visited,
			&mut budget,
		) {
			return Some(found);
		}
		if budget == 0 {
			return None;
		}
	}
	None
}

fn dfs(
	adjacency: &Adjacency,
	current_v: u64,
	start_u: u64,
	cycle_len: usize,
	path: &mut Vec<u64>,
	visited: &mut Vec<u64>,
	budget: &mut u64,
) -> Option<Vec<u64>> {
	for &(next_v, edge) in adjacency.successors(current_v) {
		if *budget == 0 {
			return None;
		}
		*budget -= 1;
		if visited.contains(&edge) {
			continue;
		}

		path.push(edge);
		visited.push(edge);

		if path.len() == cycle_len {
			if next_v == start_u {
				return Some(path.clone());
			}
		} else if let Some(found) = dfs(adjacency, next_v, start_u, cycle_len, path, visited, budget) {
			return Some(found);
		}

		path.pop();
		visited.pop();
	}
	None
}

#[cfg(test)]
mod test {
	use super::*;

	/// Hand-scripted graph with a single directed 4-cycle
	/// `10 -> 20 -> 30 -> 40 -> 10`, used to exercise the DFS without needing
	/// real trimming to converge to 42 survivors.
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

	fn assert_directed_cycle(oracle: &dyn EdgeOracle, edge_bits: u8, cycle: &[u64]) {
		for i in 0..cycle.len() {
			let v_i = oracle.endpoint(cycle[i], Side::V, edge_bits);
			let u_next = oracle.endpoint(cycle[(i + 1) % cycle.len()], Side::U, edge_bits);
			assert_eq!(
				v_i,
				u_next,
				"edge {} does not chain into edge {}",
				cycle[i],
				cycle[(i + 1) % cycle.len()]
			);
		}
	}

	#[test]
	fn finds_known_four_cycle() {
		let oracle = FourCycleOracle;
		let survivors = vec![0, 1, 2, 3];
		let cycle = find_cycle(&oracle, 8, &survivors, 4, 10_000).expect("cycle exists");
		assert_eq!(cycle, vec![0, 1, 2, 3]);
		assert_directed_cycle(&oracle, 8, &cycle);
	}

	#[test]
	fn no_cycle_of_wrong_length() {
		let oracle = FourCycleOracle;
		let survivors = vec![0, 1, 2, 3];
		assert!(find_cycle(&oracle, 8, &survivors, 6, 10_000).is_none());
	}

	#[test]
	fn finds_cycle_regardless_of_start_edge_order() {
		let oracle = FourCycleOracle;
		let survivors = vec![2, 0, 3, 1];
		let cycle = find_cycle(&oracle, 8, &survivors, 4, 10_000).expect("cycle exists");
		assert_directed_cycle(&oracle, 8, &cycle);
	}

	#[test]
	fn zero_budget_finds_nothing() {
		let oracle = FourCycleOracle;
		let survivors = vec![0, 1, 2, 3];
		assert!(find_cycle(&oracle, 8, &survivors, 4, 0).is_none());
	}

	#[test]
	fn empty_survivor_set_finds_nothing() {
		let oracle = FourCycleOracle;
		assert!(find_cycle(&oracle, 8, &[], 4, 10_000).is_none());
	}
}
