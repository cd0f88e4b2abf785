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

//! Error types for the Cuckatoo solver core

use failure::{Backtrace, Context, Fail};
use std::fmt::{self, Display};

/// Solver or validation error
#[derive(Debug)]
pub struct Error {
	inner: Context<ErrorKind>,
}

/// Cuckatoo core error definitions. `InputInvalid` is a caller contract
/// violation and is returned before any computation starts.
/// `InternalInvariant` indicates a programmer error (e.g. an oracle that
/// disagrees with itself) and is always fatal.
#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum ErrorKind {
	/// Unsupported edge_bits, wrong header length, or k < 2
	#[fail(display = "Invalid input: {}", _0)]
	InputInvalid(String),
	/// A degree-sum mismatch or a triple that fails to recheck against the
	/// oracle; always a bug, never a consequence of the input header
	#[fail(display = "Internal invariant violated: {}", _0)]
	InternalInvariant(String),
	/// A bin worker panicked or failed unexpectedly; isolated to that bin
	#[fail(display = "Worker fault in bin {}: {}", _0, _1)]
	WorkerFault(u32, String),
}

impl Fail for Error {
	fn cause(&self) -> Option<&dyn Fail> {
		self.inner.cause()
	}

	fn backtrace(&self) -> Option<&Backtrace> {
		self.inner.backtrace()
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.inner, f)
	}
}

impl Error {
	/// Return the error kind
	pub fn kind(&self) -> ErrorKind {
		self.inner.get_context().clone()
	}
}

impl From<ErrorKind> for Error {
	fn from(kind: ErrorKind) -> Error {
		Error {
			inner: Context::new(kind),
		}
	}
}

impl From<Context<ErrorKind>> for Error {
	fn from(inner: Context<ErrorKind>) -> Error {
		Error { inner }
	}
}
