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

//! SLIP-0039 mnemonic-based Shamir secret sharing.
//!
//! A master secret is split into a set of mnemonic-encoded shares,
//! organized into groups, such that a configurable threshold of groups
//! (each themselves satisfied by a threshold of member shares) is required
//! to recover it. See [`generate_mnemonics`] to split a secret and
//! [`combine_mnemonics`] to recover one.

#[macro_use]
extern crate lazy_static;

mod config;
mod error;
mod field;
mod shamir;
mod util;

pub use crate::config::ShamirMnemonicConfig;
pub use crate::error::{Error, ErrorKind};
pub use crate::shamir::scheme::{
	combine_mnemonics, combine_mnemonics_with_passwords, decode_binary_shard, decode_mnemonic,
	decrypt_shard, encode_binary_shard, encode_mnemonic, encrypt_shard, generate_mnemonics,
	generate_mnemonics_flat, generate_mnemonics_random, GroupDescriptor,
};
pub use crate::shamir::share::{string_to_words, words_to_string};
pub use crate::shamir::{GroupShare, Share, Splitter};
pub use crate::util::encrypt::validate_passphrase;
pub use crate::util::hex::{from_hex, to_hex};
pub use crate::util::{fill_vec_rand, RandomGenerator, ThreadRandomGenerator};
