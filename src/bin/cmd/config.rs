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

//! TOML configuration loading. Mirrors the solver's own parameter names so
//! a config file and CLI flags describe exactly the same knobs; CLI flags
//! always take precedence when both are given.

use std::fs;
use std::path::{Path, PathBuf};

use failure::{Backtrace, Context, Fail};
use serde_derive::{Deserialize, Serialize};
use std::fmt::{self, Display};

use super::logging::LoggingConfig;

/// Config-loading error.
#[derive(Debug)]
pub struct ConfigError {
	inner: Context<ConfigErrorKind>,
}

/// What went wrong while loading a config file.
#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum ConfigErrorKind {
	/// Couldn't read the file at all
	#[fail(display = "unable to read config file {}: {}", _0, _1)]
	Unreadable(String, String),
	/// File existed but didn't parse as the expected TOML schema
	#[fail(display = "malformed config file {}: {}", _0, _1)]
	Malformed(String, String),
}

impl Fail for ConfigError {
	fn cause(&self) -> Option<&dyn Fail> {
		self.inner.cause()
	}
	fn backtrace(&self) -> Option<&Backtrace> {
		self.inner.backtrace()
	}
}

impl Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.inner, f)
	}
}

impl From<ConfigErrorKind> for ConfigError {
	fn from(kind: ConfigErrorKind) -> ConfigError {
		ConfigError {
			inner: Context::new(kind),
		}
	}
}

/// Solver knobs that can come from a TOML file, in the same shape as
/// `cuckatoo_core::SolveConfig` plus the pieces that are harness concerns
/// (logging, thread count defaults).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverSettings {
	/// log2 of the number of edges in the graph; one of 27, 29, 31
	pub edge_bits: u8,
	/// Required cycle length
	pub cycle_len: usize,
	/// Memory-tradeoff knob; number of bins is max(1, k)
	pub k: u32,
	/// Leaf-trimming rounds per bin
	pub trim_rounds: u32,
	/// Cap on cycle-search edge candidates considered, per bin
	pub expansion_budget: u64,
	/// Worker thread pool size
	pub threads: usize,
	/// Maximum number of attempts; 0 means run exactly one attempt
	pub max_attempts: u32,
	/// Wall-clock budget in milliseconds, if any
	pub time_budget_ms: Option<u64>,
	/// Salt successive attempts so retries explore a different graph
	pub attempt_diversity: bool,
	/// Logging setup
	pub logging: LoggingConfig,
}

impl Default for SolverSettings {
	fn default() -> SolverSettings {
		SolverSettings {
			edge_bits: 27,
			cycle_len: 42,
			k: 8,
			trim_rounds: 6,
			expansion_budget: 2_000_000,
			threads: 4,
			max_attempts: 1,
			time_budget_ms: None,
			attempt_diversity: false,
			logging: LoggingConfig::default(),
		}
	}
}

/// Loads settings from `path`, falling back to defaults for any field the
/// TOML file leaves unset. A missing file is not an error: it just means
/// every field takes its default.
pub fn load(path: Option<&Path>) -> Result<SolverSettings, ConfigError> {
	let path = match path {
		Some(p) => p.to_path_buf(),
		None => default_config_path(),
	};

	if !path.exists() {
		return Ok(SolverSettings::default());
	}

	let contents = fs::read_to_string(&path).map_err(|e| {
		ConfigErrorKind::Unreadable(path.display().to_string(), e.to_string())
	})?;

	toml::from_str(&contents)
		.map_err(|e| ConfigErrorKind::Malformed(path.display().to_string(), e.to_string()).into())
}

fn default_config_path() -> PathBuf {
	let mut dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
	dir.push(".cuckatoo");
	dir.push("cuckatoo.toml");
	dir
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn missing_file_falls_back_to_defaults() {
		let settings = load(Some(Path::new("/nonexistent/cuckatoo.toml"))).unwrap();
		assert_eq!(settings.edge_bits, 27);
		assert_eq!(settings.cycle_len, 42);
	}

	#[test]
	fn parses_a_minimal_toml_document() {
		let dir = std::env::temp_dir().join("cuckatoo_config_test_minimal.toml");
		fs::write(
			&dir,
			r#"
			edge_bits = 29
			cycle_len = 42
			k = 16
			trim_rounds = 8
			expansion_budget = 500000
			threads = 2
			max_attempts = 4
			attempt_diversity = true

			[logging]
			log_to_stdout = true
			stdout_log_level = "debug"
			log_to_file = false
			file_log_level = "debug"
			log_file_path = "cuckatoo.log"
			log_max_size_bytes = 1048576
			log_max_files = 2
			"#,
		)
		.unwrap();
		let settings = load(Some(&dir)).unwrap();
		assert_eq!(settings.edge_bits, 29);
		assert_eq!(settings.k, 16);
		assert!(settings.attempt_diversity);
		fs::remove_file(&dir).ok();
	}
}
