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

//! The public result envelope printed by the `solve` subcommand: the one
//! piece of the harness the solver itself has no opinion about.

use std::collections::BTreeMap;

use cuckatoo_core::oracle::{Blake2bOracle, EdgeOracle, Side};
use cuckatoo_core::SolveOutcome;
use serde_derive::Serialize;

/// JSON-serializable triple `(edge_index, u, v)`.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeTriple {
	e: u64,
	u: u64,
	v: u64,
}

/// The full result of a solve, as printed on stdout.
#[derive(Debug, Clone, Serialize)]
pub struct ResultEnvelope {
	found: bool,
	cycle: Vec<EdgeTriple>,
	elapsed_ms: u64,
	metrics: BTreeMap<String, f64>,
	build_info: BTreeMap<String, String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	peak_memory_bytes: Option<u64>,
}

impl ResultEnvelope {
	/// Attaches a peak resident memory sample taken by the caller. The core
	/// never measures its own memory use, per its resource-discipline
	/// design: this is strictly a harness-side addition to the envelope.
	pub fn add_peak_memory_bytes(&mut self, bytes: u64) {
		self.peak_memory_bytes = Some(bytes);
	}
}

/// Builds the envelope for `outcome`, re-deriving (u, v) for every edge in
/// the winning cycle against whichever oracle variant actually produced it.
pub fn build(
	header: &[u8],
	edge_bits: u8,
	attempt_diversity: bool,
	outcome: &SolveOutcome,
) -> Result<ResultEnvelope, cuckatoo_core::Error> {
	let cycle = match (&outcome.cycle, outcome.winning_attempt) {
		(Some(edges), Some(attempt)) => {
			let oracle: Box<dyn EdgeOracle> = if attempt_diversity && attempt > 0 {
				Box::new(Blake2bOracle::with_attempt(header, attempt as u64)?)
			} else {
				Box::new(Blake2bOracle::new(header)?)
			};
			edges
				.iter()
				.map(|&e| EdgeTriple {
					e,
					u: oracle.endpoint(e, Side::U, edge_bits),
					v: oracle.endpoint(e, Side::V, edge_bits),
				})
				.collect()
		}
		_ => Vec::new(),
	};

	Ok(ResultEnvelope {
		found: outcome.cycle.is_some(),
		cycle,
		elapsed_ms: outcome.elapsed_ms,
		metrics: outcome.metrics.to_map(),
		build_info: build_info(),
		peak_memory_bytes: None,
	})
}

fn build_info() -> BTreeMap<String, String> {
	let mut info = BTreeMap::new();
	info.insert("pkg_version".to_string(), env!("CARGO_PKG_VERSION").to_string());
	info.insert("rustc_target".to_string(), std::env::consts::ARCH.to_string());
	info
}
