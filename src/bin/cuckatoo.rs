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

//! Command-line front end for the Cuckoo/Cuckatoo Cycle solver.

mod cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cuckatoo", version, about = "Cuckoo/Cuckatoo Cycle proof-of-work solver")]
struct Cli {
	/// Path to a TOML config file; defaults to ~/.cuckatoo/cuckatoo.toml
	#[arg(long, global = true)]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Search for a cycle over a header and print the result envelope
	Solve {
		/// 32-byte header, hex-encoded
		header: String,
		/// log2 of the edge count, overrides the config file
		#[arg(long)]
		edge_bits: Option<u8>,
		/// Memory-tradeoff knob (number of bins), overrides the config file
		#[arg(short = 'k', long)]
		k: Option<u32>,
		/// Worker thread count, overrides the config file
		#[arg(long)]
		threads: Option<usize>,
		/// Maximum attempts (0 = unbounded), overrides the config file
		#[arg(long)]
		max_attempts: Option<u32>,
		/// Wall-clock budget in milliseconds, overrides the config file
		#[arg(long)]
		time_budget_ms: Option<u64>,
	},
	/// Verify a claimed cycle against a header
	Verify {
		/// 32-byte header, hex-encoded
		header: String,
		/// log2 of the edge count
		#[arg(long)]
		edge_bits: u8,
		/// Required cycle length
		#[arg(long, default_value_t = 42)]
		cycle_len: usize,
		/// Edges making up the claimed cycle, each as "e,u,v"
		#[arg(required = true)]
		cycle: Vec<String>,
	},
	/// Run a baseline CSV (edge_bits,threads,lean_ms) through the solver
	Bench {
		/// 32-byte header, hex-encoded, used for every row
		header: String,
		/// Path to the baseline CSV
		csv: PathBuf,
	},
}

fn main() {
	let cli = Cli::parse();
	let mut settings = match cmd::config::load(cli.config.as_deref()) {
		Ok(s) => s,
		Err(e) => {
			eprintln!("failed to load config: {}", e);
			std::process::exit(2);
		}
	};
	cmd::logging::init(&settings.logging);

	let code = match cli.command {
		Command::Solve {
			header,
			edge_bits,
			k,
			threads,
			max_attempts,
			time_budget_ms,
		} => {
			if let Some(v) = edge_bits {
				settings.edge_bits = v;
			}
			if let Some(v) = k {
				settings.k = v;
			}
			if let Some(v) = threads {
				settings.threads = v;
			}
			if let Some(v) = max_attempts {
				settings.max_attempts = v;
			}
			if time_budget_ms.is_some() {
				settings.time_budget_ms = time_budget_ms;
			}
			cmd::solve::run(&header, &settings)
		}
		Command::Verify {
			header,
			edge_bits,
			cycle_len,
			cycle,
		} => {
			let triples: Result<Vec<_>, _> = cycle.iter().map(|s| cmd::verify::parse_triple(s)).collect();
			match triples {
				Ok(triples) => cmd::verify::run(&header, edge_bits, cycle_len, &triples),
				Err(e) => {
					eprintln!("invalid cycle: {}", e);
					2
				}
			}
		}
		Command::Bench { header, csv } => {
			let header_bytes = match cmd::solve::parse_header(&header) {
				Ok(h) => h,
				Err(e) => {
					eprintln!("invalid header: {}", e);
					std::process::exit(2);
				}
			};
			cmd::bench::run(&csv, &header_bytes, &settings)
		}
	};

	std::process::exit(code);
}
