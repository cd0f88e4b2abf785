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

//! `cuckatoo solve` — runs the solver on a header and prints the result
//! envelope as JSON. Peak resident memory is sampled from a background
//! thread, since the core itself never manages or reports memory; this is
//! exactly the "enclosing harness" role the core's design notes call for.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cuckatoo_core::SolveConfig;
use sysinfo::{PidExt, ProcessExt, System, SystemExt};

use super::config::SolverSettings;
use super::envelope;

/// Decodes a hex-encoded 32-byte header.
pub fn parse_header(hex_str: &str) -> Result<[u8; 32], String> {
	let hex_str = hex_str.trim();
	if hex_str.len() != 64 {
		return Err(format!(
			"header must be 64 hex characters (32 bytes), got {}",
			hex_str.len()
		));
	}
	let mut header = [0u8; 32];
	for (i, byte) in header.iter_mut().enumerate() {
		*byte = u8::from_str_radix(&hex_str[i * 2..i * 2 + 2], 16)
			.map_err(|e| format!("invalid hex at byte {}: {}", i, e))?;
	}
	Ok(header)
}

fn sample_peak_memory_bytes(stop: Arc<AtomicBool>, peak: Arc<AtomicU64>) -> thread::JoinHandle<()> {
	thread::spawn(move || {
		let pid = sysinfo::get_current_pid().ok();
		let mut system = System::new();
		while !stop.load(Ordering::Relaxed) {
			if let Some(pid) = pid {
				system.refresh_process(pid);
				if let Some(process) = system.process(pid) {
					let bytes = process.memory() * 1024;
					peak.fetch_max(bytes, Ordering::Relaxed);
				}
			}
			thread::sleep(Duration::from_millis(20));
		}
	})
}

/// Runs one solve against `header_hex` using `settings`, printing the
/// result envelope to stdout. Returns a process exit code.
pub fn run(header_hex: &str, settings: &SolverSettings) -> i32 {
	let header = match parse_header(header_hex) {
		Ok(h) => h,
		Err(e) => {
			eprintln!("invalid header: {}", e);
			return 2;
		}
	};

	let config = SolveConfig {
		edge_bits: settings.edge_bits,
		cycle_len: settings.cycle_len,
		bins: std::cmp::max(1, settings.k),
		trim_rounds: settings.trim_rounds,
		expansion_budget: settings.expansion_budget,
		threads: settings.threads,
		max_attempts: if settings.max_attempts == 0 {
			None
		} else {
			Some(settings.max_attempts)
		},
		time_budget_ms: settings.time_budget_ms,
		attempt_diversity: settings.attempt_diversity,
	};

	let stop = Arc::new(AtomicBool::new(false));
	let sampling_stop = Arc::new(AtomicBool::new(false));
	let peak_bytes = Arc::new(AtomicU64::new(0));
	let sampler = sample_peak_memory_bytes(Arc::clone(&sampling_stop), Arc::clone(&peak_bytes));

	let outcome = cuckatoo_core::solve(&header, &config, stop);

	sampling_stop.store(true, Ordering::Relaxed);
	sampler.join().ok();

	let outcome = match outcome {
		Ok(o) => o,
		Err(e) => {
			eprintln!("solve failed: {}", e);
			return 1;
		}
	};

	let mut envelope = match envelope::build(
		&header,
		settings.edge_bits,
		settings.attempt_diversity,
		&outcome,
	) {
		Ok(e) => e,
		Err(e) => {
			eprintln!("failed to build result envelope: {}", e);
			return 1;
		}
	};
	envelope.add_peak_memory_bytes(peak_bytes.load(Ordering::Relaxed));

	match serde_json::to_string_pretty(&envelope) {
		Ok(json) => {
			println!("{}", json);
			0
		}
		Err(e) => {
			eprintln!("failed to serialize result: {}", e);
			1
		}
	}
}
