// Copyright 2019 The Grin Developers
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

//! Error types for the slip39 crate
//!
//! `ErrorKind` is a closed enumeration matching the SLIP-39 error taxonomy;
//! every public operation fails with exactly one of these variants.

use failure::{Backtrace, Context, Fail};
use std::env;
use std::fmt::{self, Display};

/// Error definition
#[derive(Debug, Fail)]
pub struct Error {
	inner: Context<ErrorKind>,
}

/// Closed set of SLIP-39 failure modes.
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
	/// Fewer words were supplied than the minimum mnemonic length
	#[fail(display = "Not enough mnemonic words: {}", _0)]
	NotEnoughMnemonicWords(String),

	/// RS1024 verification failed over the supplied word sequence
	#[fail(display = "Invalid mnemonic checksum: {}", _0)]
	InvalidMnemonicChecksum(String),

	/// Master secret shorter than the minimum allowed length
	#[fail(display = "Secret too short: {}", _0)]
	SecretTooShort(String),

	/// Master secret longer than the maximum allowed length
	#[fail(display = "Secret too long: {}", _0)]
	SecretTooLong(String),

	/// Group threshold greater than the number of groups, or zero
	#[fail(display = "Invalid group threshold: {}", _0)]
	InvalidGroupThreshold(String),

	/// member_threshold == 1 with group_count != 1
	#[fail(display = "Invalid singleton member: {}", _0)]
	InvalidSingletonMember(String),

	/// Caller-supplied output buffer too small
	#[fail(display = "Insufficient space: {}", _0)]
	InsufficientSpace(String),

	/// value_length outside [16, 32], or odd
	#[fail(display = "Invalid secret length: {}", _0)]
	InvalidSecretLength(String),

	/// Passphrase contains non-printable-ASCII bytes
	#[fail(display = "Invalid passphrase: {}", _0)]
	InvalidPassphrase(String),

	/// Shares being combined disagree on identifier/iteration_exponent/group_threshold/
	/// group_count/value_length
	#[fail(display = "Invalid shard set: {}", _0)]
	InvalidShardSet(String),

	/// Caller supplied zero mnemonics to combine
	#[fail(display = "Empty mnemonic set: {}", _0)]
	EmptyMnemonicSet(String),

	/// Two shares in the same group share a member_index
	#[fail(display = "Duplicate member index: {}", _0)]
	DuplicateMemberIndex(String),

	/// A group has fewer members present than its member_threshold
	#[fail(display = "Not enough member shards: {}", _0)]
	NotEnoughMemberShards(String),

	/// Members of the same group disagree on member_threshold
	#[fail(display = "Invalid member threshold: {}", _0)]
	InvalidMemberThreshold(String),

	/// Mandatory leading zero padding bits of a mnemonic were not zero
	#[fail(display = "Invalid padding: all padding bits must be 0")]
	InvalidPadding,

	/// Fewer groups met their member threshold than group_threshold requires
	#[fail(display = "Not enough groups: {}", _0)]
	NotEnoughGroups(String),

	/// Binary shard buffer has a bad magic, short length, or bad value_length
	#[fail(display = "Invalid shard buffer: {}", _0)]
	InvalidShardBuffer(String),

	/// The digest share recomputed on recovery did not match
	#[fail(display = "Checksum failure: {}", _0)]
	ChecksumFailure(String),

	/// A mnemonic word is not a member of the wordlist
	#[fail(display = "Unknown word: {}", _0)]
	UnknownWord(String),

	/// Configuration error, with details
	#[fail(display = "Configuration error: {}", _0)]
	Config(String),

	/// Invalid usage of BitPacker (num_bits longer than the container, etc)
	#[fail(display = "BitVec error: {}", _0)]
	BitVec(String),

	/// Invalid usage of one of the arguments to a lower-level routine
	#[fail(display = "Argument error: {}", _0)]
	Argument(String),
}

impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let show_bt = match env::var("RUST_BACKTRACE") {
			Ok(r) => r == "1",
			Err(_) => false,
		};
		let backtrace = match self.backtrace() {
			Some(b) => format!("{}", b),
			None => String::from("Unknown"),
		};
		let inner_output = format!("{}", self.inner,);
		let backtrace_output = format!("\n Backtrace: {}", backtrace);
		let mut output = inner_output;
		if show_bt {
			output.push_str(&backtrace_output);
		}
		Display::fmt(&output, f)
	}
}

impl Error {
	/// get kind
	pub fn kind(&self) -> ErrorKind {
		self.inner.get_context().clone()
	}
	/// get cause string
	pub fn cause_string(&self) -> String {
		match self.cause() {
			Some(k) => format!("{}", k),
			None => "Unknown".to_string(),
		}
	}
	/// get cause
	pub fn cause(&self) -> Option<&dyn Fail> {
		self.inner.cause()
	}
	/// get backtrace
	pub fn backtrace(&self) -> Option<&Backtrace> {
		self.inner.backtrace()
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
