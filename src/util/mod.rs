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

//! cryptography and utility functions

pub mod bitpacker;
pub mod encrypt;
pub mod hex;
pub mod rs1024;

use rand::{thread_rng, RngCore};

/// Source of randomness for share generation.
///
/// Generation never reads from a global RNG directly; every caller of
/// randomness goes through an instance of this trait, so embedded callers
/// can supply their own generator and tests can supply a deterministic one.
pub trait RandomGenerator {
	/// Fill `buf` with random bytes.
	fn fill(&mut self, buf: &mut [u8]);
}

/// Default generator, backed by `rand::thread_rng()`.
#[derive(Debug, Default)]
pub struct ThreadRandomGenerator;

impl RandomGenerator for ThreadRandomGenerator {
	fn fill(&mut self, buf: &mut [u8]) {
		thread_rng().fill_bytes(buf);
	}
}

/// fill a u8 vec with n bytes of random data drawn from `rng`
pub fn fill_vec_rand(n: usize, rng: &mut dyn RandomGenerator) -> Vec<u8> {
	let mut v = vec![0u8; n];
	rng.fill(&mut v);
	v
}
