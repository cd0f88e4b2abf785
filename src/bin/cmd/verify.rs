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

//! `cuckatoo verify` — checks a claimed cycle against a header, independent
//! of however it was produced.

use cuckatoo_core::EdgeTriple;
use serde_derive::Serialize;

use super::solve::parse_header;

#[derive(Debug, Serialize)]
struct VerifyResult {
	valid: bool,
}

/// Parses a `"e,u,v"` triple into an [`EdgeTriple`].
pub fn parse_triple(raw: &str) -> Result<EdgeTriple, String> {
	let parts: Vec<&str> = raw.split(',').collect();
	if parts.len() != 3 {
		return Err(format!("expected \"e,u,v\", got \"{}\"", raw));
	}
	let parse_one = |s: &str| s.trim().parse::<u64>().map_err(|e| format!("invalid integer \"{}\": {}", s, e));
	Ok(EdgeTriple {
		e: parse_one(parts[0])?,
		u: parse_one(parts[1])?,
		v: parse_one(parts[2])?,
	})
}

/// Verifies `cycle` (edge `(e, u, v)` triples) against `header_hex` at
/// `edge_bits`, printing `{"valid": true|false}` and returning a process
/// exit code.
pub fn run(header_hex: &str, edge_bits: u8, cycle_len: usize, cycle: &[EdgeTriple]) -> i32 {
	let header = match parse_header(header_hex) {
		Ok(h) => h,
		Err(e) => {
			eprintln!("invalid header: {}", e);
			return 2;
		}
	};

	match cuckatoo_core::verify(&header, edge_bits, cycle_len, cycle) {
		Ok(valid) => {
			let result = VerifyResult { valid };
			println!("{}", serde_json::to_string_pretty(&result).unwrap());
			if valid {
				0
			} else {
				1
			}
		}
		Err(e) => {
			eprintln!("verify failed: {}", e);
			2
		}
	}
}
