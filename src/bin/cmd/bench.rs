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

//! `cuckatoo bench` — runs a solve per baseline row and checks it against a
//! time allowance derived from that baseline, the same comparison the
//! reference implementation's benchmark script makes: a rewrite is allowed
//! up to `10 * k * baseline_lean_ms` before it's considered a regression.

use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use cuckatoo_core::SolveConfig;

use super::config::SolverSettings;

struct BaselineRow {
	edge_bits: u8,
	threads: usize,
	lean_ms: f64,
}

fn parse_csv(contents: &str) -> Result<Vec<BaselineRow>, String> {
	let mut rows = Vec::new();
	for (line_no, line) in contents.lines().enumerate() {
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') || line.starts_with("edge_bits") {
			continue;
		}
		let fields: Vec<&str> = line.split(',').map(str::trim).collect();
		if fields.len() != 3 {
			return Err(format!(
				"line {}: expected 3 columns (edge_bits,threads,lean_ms), got {}",
				line_no + 1,
				fields.len()
			));
		}
		let edge_bits = fields[0]
			.parse()
			.map_err(|e| format!("line {}: bad edge_bits: {}", line_no + 1, e))?;
		let threads = fields[1]
			.parse()
			.map_err(|e| format!("line {}: bad threads: {}", line_no + 1, e))?;
		let lean_ms = fields[2]
			.parse()
			.map_err(|e| format!("line {}: bad lean_ms: {}", line_no + 1, e))?;
		rows.push(BaselineRow {
			edge_bits,
			threads,
			lean_ms,
		});
	}
	Ok(rows)
}

/// Runs every row of the baseline CSV at `csv_path`, printing a pass/fail
/// table to stdout. Returns a process exit code: 0 if every row stayed
/// within its allowance, 1 otherwise.
pub fn run(csv_path: &Path, header: &[u8; 32], settings: &SolverSettings) -> i32 {
	let contents = match fs::read_to_string(csv_path) {
		Ok(c) => c,
		Err(e) => {
			eprintln!("unable to read baseline csv {}: {}", csv_path.display(), e);
			return 2;
		}
	};
	let rows = match parse_csv(&contents) {
		Ok(r) => r,
		Err(e) => {
			eprintln!("malformed baseline csv: {}", e);
			return 2;
		}
	};

	println!(
		"{:<10} {:<8} {:<12} {:<12} {:<10} {}",
		"edge_bits", "threads", "lean_ms", "elapsed_ms", "allowed_ms", "result"
	);

	let mut all_passed = true;
	for row in &rows {
		let allowed_ms = 10.0 * settings.k as f64 * row.lean_ms;
		let config = SolveConfig {
			edge_bits: row.edge_bits,
			cycle_len: settings.cycle_len,
			bins: std::cmp::max(1, settings.k),
			trim_rounds: settings.trim_rounds,
			expansion_budget: settings.expansion_budget,
			threads: row.threads,
			max_attempts: Some(1),
			time_budget_ms: Some(allowed_ms.ceil() as u64),
			attempt_diversity: settings.attempt_diversity,
		};

		let stop = Arc::new(AtomicBool::new(false));
		let outcome = match cuckatoo_core::solve(header, &config, stop) {
			Ok(o) => o,
			Err(e) => {
				eprintln!("solve failed for edge_bits={}: {}", row.edge_bits, e);
				all_passed = false;
				continue;
			}
		};

		let passed = (outcome.elapsed_ms as f64) <= allowed_ms;
		all_passed &= passed;
		println!(
			"{:<10} {:<8} {:<12.1} {:<12} {:<10.1} {}",
			row.edge_bits,
			row.threads,
			row.lean_ms,
			outcome.elapsed_ms,
			allowed_ms,
			if passed { "PASS" } else { "FAIL" }
		);
	}

	if all_passed {
		0
	} else {
		1
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn parses_rows_and_skips_header_and_comments() {
		let csv = "edge_bits,threads,lean_ms\n# comment\n16,2,12.5\n18,4,30\n";
		let rows = parse_csv(csv).unwrap();
		assert_eq!(rows.len(), 2);
		assert_eq!(rows[0].edge_bits, 16);
		assert_eq!(rows[1].threads, 4);
	}

	#[test]
	fn rejects_malformed_row() {
		let csv = "16,2\n";
		assert!(parse_csv(csv).is_err());
	}
}
