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

//! Runs one attempt (a full sweep of every bin) across a pool of worker
//! threads. Bins are handed out from a shared atomic counter, so the same
//! code path covers both "one thread per bin" (threads >= bins, every
//! worker grabs exactly one bin before the counter is exhausted) and
//! work-stealing (threads < bins, idle workers pick up whatever bin is
//! next). Each worker owns its degree maps and metrics delta outright;
//! nothing is shared but the oracle, the bin counter and a stop flag.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use log::{debug, warn};

use crate::metrics::Metrics;
use crate::oracle::EdgeOracle;
use crate::{cycle, trim};

/// Parameters governing one attempt over the full edge space.
#[derive(Debug, Clone, Copy)]
pub struct AttemptConfig {
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
}

fn process_bin(oracle: &dyn EdgeOracle, config: &AttemptConfig, bin: u32) -> (Option<Vec<u64>>, Metrics) {
	let mut metrics = Metrics::default();
	let (survivors, _, _) = trim::trim_bin(
		oracle,
		config.edge_bits,
		config.bins,
		bin,
		config.trim_rounds,
		&mut metrics,
	);
	let cycle = cycle::find_cycle(
		oracle,
		config.edge_bits,
		&survivors,
		config.cycle_len,
		config.expansion_budget,
	);
	(cycle, metrics)
}

/// Runs one attempt to completion (or until `stop` is observed), returning
/// the first cycle found across all bins, if any, together with the
/// aggregated metrics for this attempt.
pub fn run_attempt(
	oracle: Arc<dyn EdgeOracle>,
	config: AttemptConfig,
	stop: Arc<AtomicBool>,
) -> (Option<Vec<u64>>, Metrics) {
	let next_bin = Arc::new(AtomicUsize::new(0));
	let found: Arc<Mutex<Option<Vec<u64>>>> = Arc::new(Mutex::new(None));
	let worker_count = std::cmp::max(1, config.threads.min(config.bins as usize));

	let handles: Vec<_> = (0..worker_count)
		.map(|_| {
			let oracle = Arc::clone(&oracle);
			let next_bin = Arc::clone(&next_bin);
			let found = Arc::clone(&found);
			let stop = Arc::clone(&stop);
			thread::spawn(move || -> Metrics {
				let mut metrics = Metrics::default();
				loop {
					if stop.load(Ordering::Relaxed) {
						break;
					}
					let bin = next_bin.fetch_add(1, Ordering::SeqCst) as u32;
					if bin >= config.bins {
						break;
					}
					let (cycle, delta) = process_bin(oracle.as_ref(), &config, bin);
					metrics.merge(&delta);
					if let Some(cycle) = cycle {
						let mut slot = found.lock().expect("attempt result mutex poisoned");
						if slot.is_none() {
							*slot = Some(cycle);
						}
						stop.store(true, Ordering::Relaxed);
						break;
					}
				}
				metrics
			})
		})
		.collect();

	let mut metrics = Metrics::default();
	for handle in handles {
		match handle.join() {
			Ok(delta) => metrics.merge(&delta),
			Err(_) => {
				warn!("bin worker panicked, treating its bins as no cycle found");
				metrics.worker_faults += 1;
			}
		}
	}
	metrics.bins = config.bins;
	metrics.attempts = 1;

	let cycle = found.lock().expect("attempt result mutex poisoned").take();
	if let Some(ref cycle) = cycle {
		debug!("found a {}-edge cycle after {} bins", cycle.len(), config.bins);
	}
	(cycle, metrics)
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::oracle::Blake2bOracle;

	#[test]
	fn single_threaded_attempt_is_deterministic() {
		let oracle: Arc<dyn EdgeOracle> = Arc::new(Blake2bOracle::new(&[4u8; 32]).unwrap());
		let config = AttemptConfig {
			edge_bits: 12,
			cycle_len: 42,
			bins: 4,
			trim_rounds: 4,
			expansion_budget: 10_000,
			threads: 1,
		};
		let stop = Arc::new(AtomicBool::new(false));
		let (cycle_a, metrics_a) = run_attempt(Arc::clone(&oracle), config, Arc::clone(&stop));
		let stop_b = Arc::new(AtomicBool::new(false));
		let (cycle_b, metrics_b) = run_attempt(Arc::clone(&oracle), config, stop_b);
		assert_eq!(cycle_a, cycle_b);
		assert_eq!(metrics_a.bins, metrics_b.bins);
		assert_eq!(metrics_a.attempts, 1);
	}

	#[test]
	fn more_workers_than_bins_still_covers_every_bin() {
		let oracle: Arc<dyn EdgeOracle> = Arc::new(Blake2bOracle::new(&[11u8; 32]).unwrap());
		let config = AttemptConfig {
			edge_bits: 10,
			cycle_len: 42,
			bins: 2,
			trim_rounds: 2,
			expansion_budget: 1_000,
			threads: 8,
		};
		let stop = Arc::new(AtomicBool::new(false));
		let (_, metrics) = run_attempt(oracle, config, stop);
		assert_eq!(metrics.bins, 2);
		assert_eq!(metrics.attempts, 1);
	}

	#[test]
	fn pre_set_stop_flag_short_circuits() {
		let oracle: Arc<dyn EdgeOracle> = Arc::new(Blake2bOracle::new(&[12u8; 32]).unwrap());
		let config = AttemptConfig {
			edge_bits: 16,
			cycle_len: 42,
			bins: 4,
			trim_rounds: 4,
			expansion_budget: 10_000,
			threads: 2,
		};
		let stop = Arc::new(AtomicBool::new(true));
		let (cycle, _metrics) = run_attempt(oracle, config, stop);
		assert!(cycle.is_none());
	}
}
