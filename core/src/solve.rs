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

//! Top-level solve loop: repeats attempts until a cycle is found or the
//! caller's budget (attempt count, wall-clock time, or an external stop
//! flag) runs out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{Error, ErrorKind};
use crate::metrics::Metrics;
use crate::oracle::{Blake2bOracle, EdgeOracle};
use crate::orchestrator::{self, AttemptConfig};

/// Parameters governing a full solve. `max_attempts` and `time_budget_ms`
/// are both optional; a solve with neither set runs until it finds a cycle
/// or exhausts the bin partition of a single attempt with nothing to retry.
#[derive(Debug, Clone, Copy)]
pub struct SolveConfig {
	/// log2 of the number of edges in the graph
	pub edge_bits: u8,
	/// Required cycle length
	pub cycle_len: usize,
	/// Number of bins to partition the edge space into
	pub bins: u32,
	/// Leaf-trimming rounds run per bin
	pub trim_rounds: u32,
	/// Cap on cycle-search edge candidates considered, per bin
	pub expansion_budget: u64,
	/// Worker thread pool size
	pub threads: usize,
	/// Maximum number of attempts before giving up
	pub max_attempts: Option<u32>,
	/// Wall-clock budget in milliseconds before giving up
	pub time_budget_ms: Option<u64>,
	/// Salt the oracle by attempt index on retries, trading bit-exact
	/// reproducibility for a fresh graph on every retry. The first attempt
	/// always uses the plain, unsalted oracle.
	pub attempt_diversity: bool,
}

/// Outcome of a solve: the cycle if one was found, the accumulated metrics
/// across every attempt made, and the wall-clock time spent.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
	/// The winning cycle's edge indices, if a cycle was found
	pub cycle: Option<Vec<u64>>,
	/// Index of the attempt that found `cycle`, if any. Callers that need
	/// to re-derive endpoints (e.g. for a result envelope) must reconstruct
	/// the oracle the same way `solve` did for this attempt: unsalted for
	/// attempt 0, `Blake2bOracle::with_attempt(header, winning_attempt)`
	/// otherwise, when `attempt_diversity` was enabled.
	pub winning_attempt: Option<u32>,
	/// Aggregated metrics across every attempt
	pub metrics: Metrics,
	/// Wall-clock time spent solving, in milliseconds
	pub elapsed_ms: u64,
}

/// Runs attempts against `header` until a cycle is found or the configured
/// budget is exhausted. `stop` lets a caller cancel a solve in progress from
/// another thread; it is checked between attempts and by each attempt's
/// worker pool.
pub fn solve(header: &[u8], config: &SolveConfig, stop: Arc<AtomicBool>) -> Result<SolveOutcome, Error> {
	if config.cycle_len == 0 {
		return Err(ErrorKind::InputInvalid("cycle_len must be positive".to_string()).into());
	}
	if config.edge_bits == 0 || config.edge_bits >= 64 {
		return Err(ErrorKind::InputInvalid(format!(
			"edge_bits must be in [1, 63], got {}",
			config.edge_bits
		))
		.into());
	}
	if config.bins == 0 {
		return Err(ErrorKind::InputInvalid("bins must be at least 1".to_string()).into());
	}

	let start = Instant::now();
	let mut metrics = Metrics::default();
	let mut attempt: u32 = 0;

	loop {
		if stop.load(Ordering::Relaxed) {
			break;
		}
		if let Some(max) = config.max_attempts {
			if attempt >= max {
				break;
			}
		}
		if let Some(budget) = config.time_budget_ms {
			if start.elapsed().as_millis() as u64 >= budget {
				break;
			}
		}

		let oracle: Arc<dyn EdgeOracle> = if config.attempt_diversity && attempt > 0 {
			Arc::new(Blake2bOracle::with_attempt(header, attempt as u64)?)
		} else {
			Arc::new(Blake2bOracle::new(header)?)
		};

		let attempt_config = AttemptConfig {
			edge_bits: config.edge_bits,
			cycle_len: config.cycle_len,
			bins: config.bins,
			trim_rounds: config.trim_rounds,
			expansion_budget: config.expansion_budget,
			threads: config.threads,
		};
		let (cycle, delta) = orchestrator::run_attempt(oracle, attempt_config, Arc::clone(&stop));
		metrics.merge(&delta);
		let this_attempt = attempt;
		attempt += 1;

		if cycle.is_some() {
			return Ok(SolveOutcome {
				cycle,
				winning_attempt: Some(this_attempt),
				metrics,
				elapsed_ms: start.elapsed().as_millis() as u64,
			});
		}
	}

	Ok(SolveOutcome {
		cycle: None,
		winning_attempt: None,
		metrics,
		elapsed_ms: start.elapsed().as_millis() as u64,
	})
}

#[cfg(test)]
mod test {
	use super::*;

	fn base_config() -> SolveConfig {
		SolveConfig {
			edge_bits: 12,
			cycle_len: 42,
			bins: 2,
			trim_rounds: 4,
			expansion_budget: 5_000,
			threads: 2,
			max_attempts: Some(3),
			time_budget_ms: None,
			attempt_diversity: false,
		}
	}

	#[test]
	fn rejects_zero_cycle_length() {
		let mut config = base_config();
		config.cycle_len = 0;
		let result = solve(&[1u8; 32], &config, Arc::new(AtomicBool::new(false)));
		assert!(result.is_err());
	}

	#[test]
	fn respects_max_attempts() {
		let config = base_config();
		let outcome = solve(&[2u8; 32], &config, Arc::new(AtomicBool::new(false))).unwrap();
		assert_eq!(outcome.metrics.attempts, config.max_attempts.unwrap() as u64);
	}

	#[test]
	fn pre_set_stop_flag_returns_immediately() {
		let config = base_config();
		let outcome = solve(&[3u8; 32], &config, Arc::new(AtomicBool::new(true))).unwrap();
		assert_eq!(outcome.cycle, None);
		assert_eq!(outcome.metrics.attempts, 0);
	}

	#[test]
	fn zero_time_budget_makes_no_attempts() {
		let mut config = base_config();
		config.time_budget_ms = Some(0);
		config.max_attempts = None;
		let outcome = solve(&[4u8; 32], &config, Arc::new(AtomicBool::new(false))).unwrap();
		assert_eq!(outcome.metrics.attempts, 0);
	}
}
