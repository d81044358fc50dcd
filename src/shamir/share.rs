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

//! Definition of a share, its bit-packed mnemonic form, its fixed-header
//! binary form, and the wordlist it is built on.

use crate::config::ShamirMnemonicConfig;
use crate::error::{Error, ErrorKind};
use crate::util::bitpacker::BitPacker;
use crate::util::rs1024;
use crate::util::{RandomGenerator, ThreadRandomGenerator};

use std::collections::HashMap;
use zeroize::Zeroize;

lazy_static! {
	/// List of SLIP-39 words, sorted ascending, each with a unique 4-character prefix.
	pub static ref WORDLIST: Vec<String> = include_str!("wordlists/en.txt").split_whitespace().map(|s| s.into()).collect();
	/// Reverse lookup, word -> index
	pub static ref WORD_INDEX_MAP: HashMap<String, usize> = {
		let mut retval = HashMap::new();
		for (i, item) in WORDLIST.iter().enumerate() {
			retval.insert(item.to_owned(), i);
		}
		retval
	};
}

/// The 3-byte magic that prefixes the fixed binary shard layout (§4.4).
pub const BINARY_MAGIC: [u8; 3] = [0x48, 0xBD, 0xFD];

/// Size in bytes of the binary shard header (magic + 9 metadata bytes).
const BINARY_HEADER_LEN: usize = 12;

/// Main definition of a share and its mnemonic/binary serializations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
	/// Random 15 bit value which is the same for all shares and is used to verify
	/// that the shares belong together; it is also used as salt in the encryption
	/// of the master secret. (15 bits)
	pub identifier: u16,
	/// Indicates the total number of iterations to be used in PBKDF2. The number of
	/// iterations is calculated as 2500*2^e. (5 bits)
	pub iteration_exponent: u8,
	/// The x value of the group share (4 bits)
	pub group_index: u8,
	/// indicates how many group shares are needed to reconstruct the master secret.
	/// The actual value is encoded as Gt = GT - 1 on the wire, so a value of 0 indicates
	/// that a single group share is needed (GT = 1). This field always holds the real,
	/// decoded value (GT, not GT-1).
	pub group_threshold: u8,
	/// indicates the total number of groups. Encoded as g = G - 1 on the wire; this
	/// field always holds the real, decoded value (G, not G-1).
	pub group_count: u8,
	/// Member index, or x value of the member share in the given group (4 bits)
	pub member_index: u8,
	/// indicates how many member shares are needed to reconstruct the group share.
	/// Encoded as t = T − 1 on the wire; this field always holds the real value.
	pub member_threshold: u8,
	/// corresponds to a list of the SSS part's fk(x) values 1 ≤ k ≤ n. Each fk(x) value is
	/// encoded as a string of eight bits in big-endian order. The concatenation of these bit
	/// strings is the share value.
	pub share_value: Vec<u8>,
	/// Shared configuration constants (word-length derivations, etc).
	pub config: ShamirMnemonicConfig,
}

impl Drop for Share {
	fn drop(&mut self) {
		self.share_value.zeroize();
	}
}

impl Default for Share {
	fn default() -> Self {
		Share {
			identifier: 0,
			iteration_exponent: 0,
			group_index: 0,
			group_threshold: 0,
			group_count: 0,
			member_index: 0,
			member_threshold: 0,
			share_value: vec![],
			config: ShamirMnemonicConfig::new(),
		}
	}
}

impl Share {
	/// Create a new share with a randomly drawn identifier, using the default
	/// thread-local RNG.
	pub fn new() -> Result<Share, Error> {
		Self::new_with_rng(&mut ThreadRandomGenerator)
	}

	/// Create a new share with a randomly drawn identifier, reading randomness
	/// from the supplied generator.
	pub fn new_with_rng(rng: &mut dyn RandomGenerator) -> Result<Share, Error> {
		let mut s = Share::default();
		if WORDLIST.len() != s.config.radix as usize {
			return Err(ErrorKind::Config(format!(
				"The wordlist should contain {} words, but it contains {} words.",
				s.config.radix,
				WORDLIST.len()
			)))?;
		}
		s.identifier = s.generate_random_identifier(rng);
		Ok(s)
	}

	/// convenience to create new from Mnemonic
	pub fn from_mnemonic(mn: &[String]) -> Result<Self, Error> {
		let mut s = Share::new()?;
		s.fill_with_mnemonic(mn)?;
		Ok(s)
	}

	// create the packed bit array
	fn pack_bits(&self) -> Result<BitPacker, Error> {
		let mut padding_bit_count = self.config.radix_bits
			- (self.share_value.len() * 8 % self.config.radix_bits as usize) as u8;
		if padding_bit_count == 10 {
			padding_bit_count = 0;
		}
		let mut bp = BitPacker::new();

		bp.append_u16(self.identifier, self.config.id_length_bits)?;
		bp.append_u8(
			self.iteration_exponent,
			self.config.iteration_exp_length_bits,
		)?;
		bp.append_u8(self.group_index, 4)?;
		bp.append_u8(self.group_threshold - 1, 4)?;
		bp.append_u8(self.group_count - 1, 4)?;
		bp.append_u8(self.member_index, 4)?;
		bp.append_u8(self.member_threshold - 1, 4)?;
		bp.append_padding(padding_bit_count);
		bp.append_vec_u8(&self.share_value)?;

		if bp.len() % self.config.radix_bits as usize != 0 {
			return Err(ErrorKind::InsufficientSpace(format!(
				"Incorrect share bit length. Must be a multiple of {}, actual length: {}",
				self.config.radix_bits,
				bp.len(),
			)))?;
		}

		// Create checksum
		let mut sum_data: Vec<u32> = vec![];
		for i in (0..bp.len()).step_by(self.config.radix_bits as usize) {
			sum_data.push(bp.get_u32(i, self.config.radix_bits as usize)?);
		}

		let checksum = rs1024::create_checksum(
			&self.config.customization_string,
			&sum_data,
			self.config.checksum_length_words,
		);

		for c in checksum {
			bp.append_u32(c, self.config.radix_bits)?;
		}

		Ok(bp)
	}

	/// Convert share data to a share mnemonic
	pub fn to_mnemonic(&self) -> Result<Vec<String>, Error> {
		self.validate()?;
		let bp = self.pack_bits()?;

		let mut ret_vec: Vec<u32> = vec![];
		for i in (0..bp.len()).step_by(self.config.radix_bits as usize) {
			ret_vec.push(bp.get_u32(i, self.config.radix_bits as usize)?);
		}

		Ok(ret_vec
			.iter()
			.map(|d| WORDLIST[*d as usize].to_owned())
			.collect())
	}

	/// Encode this share into the fixed-header binary layout of §4.4.
	pub fn to_binary(&self) -> Result<Vec<u8>, Error> {
		self.validate()?;
		let mut out = Vec::with_capacity(BINARY_HEADER_LEN + self.share_value.len());
		out.extend_from_slice(&BINARY_MAGIC);
		let id = self.identifier.to_be_bytes();
		out.push(id[0]);
		out.push(id[1]);
		out.push(self.iteration_exponent);
		out.push(self.group_index);
		out.push(self.group_threshold);
		out.push(self.group_count);
		out.push(self.member_index);
		out.push(self.member_threshold);
		out.push(self.share_value.len() as u8);
		out.extend_from_slice(&self.share_value);
		Ok(out)
	}

	/// Decode a share from the fixed-header binary layout of §4.4.
	pub fn from_binary(input: &[u8]) -> Result<Self, Error> {
		if input.len() < BINARY_HEADER_LEN {
			return Err(ErrorKind::InvalidShardBuffer(format!(
				"Buffer of {} bytes is shorter than the {}-byte header",
				input.len(),
				BINARY_HEADER_LEN,
			)))?;
		}
		if input[0..3] != BINARY_MAGIC {
			return Err(ErrorKind::InvalidShardBuffer(
				"Bad magic bytes at start of shard buffer".to_string(),
			))?;
		}
		let value_length = input[11] as usize;
		if value_length < 16 || value_length > 32 || value_length % 2 != 0 {
			return Err(ErrorKind::InvalidShardBuffer(format!(
				"value_length {} is not even and in [16, 32]",
				value_length,
			)))?;
		}
		if input.len() < BINARY_HEADER_LEN + value_length {
			return Err(ErrorKind::InvalidShardBuffer(format!(
				"Buffer of {} bytes too short to hold the declared {}-byte value",
				input.len(),
				value_length,
			)))?;
		}
		let share = Share {
			identifier: u16::from_be_bytes([input[3], input[4]]),
			iteration_exponent: input[5],
			group_index: input[6],
			group_threshold: input[7],
			group_count: input[8],
			member_index: input[9],
			member_threshold: input[10],
			share_value: input[BINARY_HEADER_LEN..BINARY_HEADER_LEN + value_length].to_vec(),
			config: ShamirMnemonicConfig::new(),
		};
		share.validate()?;
		Ok(share)
	}

	/// Checks that are decodable from a single share in isolation: value
	/// length parity/range and group threshold/count consistency. The
	/// singleton-group rule (member_threshold == 1 implies a group of one)
	/// is checked against the group descriptor at generation time instead,
	/// since the member count of a group is not itself part of the wire
	/// format of any one share.
	fn validate(&self) -> Result<(), Error> {
		if self.share_value.len() % 2 != 0 || self.share_value.len() < 16 {
			return Err(ErrorKind::SecretTooShort(format!(
				"share value length {} must be even and at least 16 bytes",
				self.share_value.len(),
			)))?;
		}
		if self.share_value.len() > self.config.max_share_value_bytes as usize {
			return Err(ErrorKind::SecretTooLong(format!(
				"share value length {} exceeds the {}-byte maximum",
				self.share_value.len(),
				self.config.max_share_value_bytes,
			)))?;
		}
		if self.group_threshold == 0 || self.group_threshold > self.group_count {
			return Err(ErrorKind::InvalidGroupThreshold(format!(
				"group_threshold {} must be between 1 and group_count {}",
				self.group_threshold, self.group_count,
			)))?;
		}
		Ok(())
	}

	/// convert mnemonic back to share
	fn fill_with_mnemonic(&mut self, mn: &[String]) -> Result<(), Error> {
		if mn.len() < self.config.min_mnemonic_length_words as usize {
			return Err(ErrorKind::NotEnoughMnemonicWords(format!(
				"The length of each mnemonic must be at least {} words, got {}.",
				self.config.min_mnemonic_length_words,
				mn.len(),
			)))?;
		}
		let mut bp = BitPacker::new();
		for s in mn {
			match WORD_INDEX_MAP.get(s) {
				Some(idx) => bp.append_u16(*idx as u16, self.config.radix_bits)?,
				None => return Err(ErrorKind::UnknownWord(s.clone()))?,
			}
		}
		self.parse_bp(&mut bp)
	}

	fn parse_bp(&mut self, bp: &mut BitPacker) -> Result<(), Error> {
		let mut sum_data: Vec<u32> = vec![];
		for i in (0..bp.len()).step_by(self.config.radix_bits as usize) {
			sum_data.push(bp.get_u32(i, self.config.radix_bits as usize)?);
		}

		if (self.config.radix_bits as usize
			* (sum_data.len() - self.config.metadata_length_words as usize))
			% 16 > 8
		{
			return Err(ErrorKind::NotEnoughMnemonicWords(
				"Invalid mnemonic length.".to_string(),
			))?;
		}

		rs1024::verify_checksum(&self.config.customization_string, &sum_data)?;

		self.identifier = bp.get_u16(0, self.config.id_length_bits as usize)?;
		self.iteration_exponent = bp.get_u8(
			self.config.id_length_bits as usize,
			self.config.iteration_exp_length_bits as usize,
		)?;
		self.group_index = bp.get_u8(
			(self.config.id_length_bits + self.config.iteration_exp_length_bits) as usize,
			4,
		)?;
		self.group_threshold = bp.get_u8(24, 4)? + 1;
		self.group_count = bp.get_u8(28, 4)? + 1;
		self.member_index = bp.get_u8(32, 4)?;
		self.member_threshold = bp.get_u8(36, 4)? + 1;

		if self.group_count < self.group_threshold {
			return Err(ErrorKind::InvalidGroupThreshold(
				"Group threshold cannot be greater than group count.".to_string(),
			))?;
		}

		// remove padding and recover data
		bp.split_out(
			40,
			bp.len() - self.config.radix_bits as usize * self.config.checksum_length_words as usize,
		);

		bp.remove_padding(bp.len() % 16)?;

		self.share_value = bp.get_vec_u8(0, bp.len() / 8)?;
		if self.share_value.len() > self.config.max_share_value_bytes as usize {
			return Err(ErrorKind::SecretTooLong(format!(
				"decoded share value of {} bytes exceeds the {}-byte maximum",
				self.share_value.len(),
				self.config.max_share_value_bytes,
			)))?;
		}

		Ok(())
	}

	fn generate_random_identifier(&self, rng: &mut dyn RandomGenerator) -> u16 {
		let mut buf = [0u8; 2];
		rng.fill(&mut buf);
		let retval = u16::from_be_bytes(buf);
		retval & ((1 << self.config.id_length_bits) - 1)
	}
}

/// Split a mnemonic string into its constituent words: any run of characters
/// that is not a lowercase ASCII letter is treated as a separator, and each
/// resulting token is truncated to 15 characters before lookup. An unknown
/// word is a fatal error.
pub fn string_to_words(s: &str) -> Result<Vec<String>, Error> {
	let mut words = vec![];
	for raw in s.split(|c: char| !c.is_ascii_lowercase()) {
		if raw.is_empty() {
			continue;
		}
		let truncated: String = raw.chars().take(15).collect();
		if !WORD_INDEX_MAP.contains_key(&truncated) {
			return Err(ErrorKind::UnknownWord(truncated))?;
		}
		words.push(truncated);
	}
	Ok(words)
}

/// Join a word sequence into a single space-delimited lowercase string.
pub fn words_to_string(words: &[String]) -> String {
	words.join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;

	use crate::error::Error;

	#[test]
	fn share_to_mnemonic() -> Result<(), Error> {
		let share = Share {
			identifier: 21219,
			iteration_exponent: 0,
			group_index: 0,
			group_threshold: 1,
			group_count: 1,
			member_index: 4,
			member_threshold: 3,
			share_value: b"\x84\x06\xce\xa0p\xbfe~\rA\x01\t5\xaf\xd3Z".to_vec(),
			..Default::default()
		};
		let m = share.to_mnemonic()?;
		assert_eq!(m.len(), share.config.min_mnemonic_length_words as usize);

		let dec_share = Share::from_mnemonic(&m)?;
		assert_eq!(share, dec_share);
		Ok(())
	}

	#[test]
	fn mnemonic_rejects_unknown_word() {
		let mut words: Vec<String> = (0..20).map(|_| "academic".to_string()).collect();
		words[5] = "notaslipword".to_string();
		let res = Share::from_mnemonic(&words);
		assert!(matches!(res, Err(ref e) if matches!(e.kind(), ErrorKind::UnknownWord(_))));
	}

	#[test]
	fn mnemonic_rejects_short_word_list() {
		let words: Vec<String> = (0..5).map(|_| "academic".to_string()).collect();
		let res = Share::from_mnemonic(&words);
		assert!(matches!(res, Err(ref e) if matches!(e.kind(), ErrorKind::NotEnoughMnemonicWords(_))));
	}

	#[test]
	fn binary_roundtrip() -> Result<(), Error> {
		let share = Share {
			identifier: 7470,
			iteration_exponent: 2,
			group_index: 3,
			group_threshold: 2,
			group_count: 5,
			member_index: 1,
			member_threshold: 3,
			share_value: vec![0xAB; 16],
			..Default::default()
		};
		let bytes = share.to_binary()?;
		assert_eq!(&bytes[0..3], &BINARY_MAGIC);
		let decoded = Share::from_binary(&bytes)?;
		assert_eq!(share.identifier, decoded.identifier);
		assert_eq!(share.share_value, decoded.share_value);
		assert_eq!(share.member_threshold, decoded.member_threshold);
		Ok(())
	}

	#[test]
	fn binary_rejects_bad_magic() {
		let mut bytes = vec![0u8; 12 + 16];
		bytes[11] = 16;
		let res = Share::from_binary(&bytes);
		assert!(matches!(res, Err(ref e) if matches!(e.kind(), ErrorKind::InvalidShardBuffer(_))));
	}

	#[test]
	fn binary_rejects_bad_value_length() {
		let mut bytes = vec![0u8; 13];
		bytes[0..3].copy_from_slice(&BINARY_MAGIC);
		bytes[11] = 5; // too short, and odd
		let res = Share::from_binary(&bytes);
		assert!(matches!(res, Err(ref e) if matches!(e.kind(), ErrorKind::InvalidShardBuffer(_))));
	}

	#[test]
	fn tokenizer_splits_on_non_lowercase() -> Result<(), Error> {
		let words = string_to_words("academic, ACID\nacne;acquire")?;
		assert_eq!(words, vec!["academic", "acne", "acquire"]);
		Ok(())
	}

	#[test]
	fn tokenizer_rejects_unknown_word() {
		assert!(string_to_words("academic zzznotaword").is_err());
	}

	#[test]
	fn words_to_string_joins_with_spaces() {
		let words = vec!["academic".to_string(), "acid".to_string()];
		assert_eq!(words_to_string(&words), "academic acid");
	}
}
