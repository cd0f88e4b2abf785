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

//! log4rs setup. The solver itself never logs anything user-facing beyond
//! `warn!`/`debug!` diagnostics from worker faults and found cycles; this
//! module just wires those up to stdout and, optionally, a rolling file.

use std::path::PathBuf;

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use serde_derive::{Deserialize, Serialize};

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l} {M} - {m}{n}";

/// Logging knobs, loaded from the same config file as the solver params.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
	/// Emit to stdout
	pub log_to_stdout: bool,
	/// Minimum level for the stdout appender
	pub stdout_log_level: String,
	/// Also emit to a rolling file
	pub log_to_file: bool,
	/// Minimum level for the file appender
	pub file_log_level: String,
	/// File path, used only when `log_to_file` is set
	pub log_file_path: PathBuf,
	/// Rotate once the active log file exceeds this many bytes
	pub log_max_size_bytes: u64,
	/// Number of rotated files to retain
	pub log_max_files: u32,
}

impl Default for LoggingConfig {
	fn default() -> LoggingConfig {
		LoggingConfig {
			log_to_stdout: true,
			stdout_log_level: "info".to_string(),
			log_to_file: false,
			file_log_level: "debug".to_string(),
			log_file_path: PathBuf::from("cuckatoo.log"),
			log_max_size_bytes: 16 * 1024 * 1024,
			log_max_files: 4,
		}
	}
}

fn parse_level(level: &str) -> LevelFilter {
	level.parse().unwrap_or(LevelFilter::Info)
}

/// Initializes the global logger from `config`. Safe to call once per
/// process; a second call returns an error from `log4rs`, which we log and
/// otherwise ignore (tests in this workspace may init more than once).
pub fn init(config: &LoggingConfig) {
	let mut root_appenders = Vec::new();
	let mut builder = Config::builder();

	if config.log_to_stdout {
		let stdout = ConsoleAppender::builder()
			.encoder(Box::new(PatternEncoder::new(PATTERN)))
			.build();
		builder = builder.appender(Appender::builder().build("stdout", Box::new(stdout)));
		root_appenders.push("stdout");
	}

	if config.log_to_file {
		let roller = FixedWindowRoller::builder()
			.build(
				&format!("{}.{{}}.gz", config.log_file_path.display()),
				config.log_max_files,
			)
			.expect("fixed window roller pattern is well-formed");
		let trigger = SizeTrigger::new(config.log_max_size_bytes);
		let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));
		let file = RollingFileAppender::builder()
			.encoder(Box::new(PatternEncoder::new(PATTERN)))
			.build(&config.log_file_path, Box::new(policy))
			.expect("log file path is writable");
		builder = builder.appender(Appender::builder().build("file", Box::new(file)));
		root_appenders.push("file");
	}

	let level = parse_level(&config.stdout_log_level).max(parse_level(&config.file_log_level));
	let root = Root::builder()
		.appenders(root_appenders)
		.build(level);

	match builder.build(root) {
		Ok(log_config) => {
			if log4rs::init_config(log_config).is_err() {
				eprintln!("logger already initialized");
			}
		}
		Err(e) => eprintln!("failed to build logging config: {}", e),
	}
}
