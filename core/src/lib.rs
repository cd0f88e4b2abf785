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

//! Memory-tradeoff solver and verifier for the Cuckoo/Cuckatoo Cycle proof
//! of work: a bounded-memory search for a 42-edge simple cycle in a keyed
//! bipartite graph, plus the cheap independent check that a claimed cycle
//! is genuine.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

pub mod bins;
pub mod cycle;
pub mod degree;
pub mod error;
pub mod metrics;
pub mod oracle;
pub mod orchestrator;
pub mod solve;
pub mod trim;
pub mod verify;

pub use error::{Error, ErrorKind};
pub use metrics::Metrics;
pub use oracle::{Blake2bOracle, EdgeOracle, Side};
pub use solve::{solve, SolveConfig, SolveOutcome};
pub use verify::{verify, verify_with_oracle, EdgeTriple};
