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

//! Functions and structs that specifically define the SLIP-39 scheme: group
//! policy, the group/member split and recombination orchestration, and the
//! optional per-share re-encryption of §4.7.

use super::share;
use super::{Share, Splitter};
use crate::error::{Error, ErrorKind};
use crate::util::encrypt::{validate_passphrase, MasterSecretEnc};
use crate::util::{self, RandomGenerator, ThreadRandomGenerator};

use std::collections::BTreeMap;
use std::fmt;
use zeroize::Zeroize;

/// Policy for one group: how many of its member shares are required to
/// recover the group share (`threshold`), how many member shares exist
/// (`count`), and an optional per-member password applied with §4.7 before
/// the mnemonic is handed to its recipient.
#[derive(Debug, Clone)]
pub struct GroupDescriptor {
	/// number of member shares required to recover this group's share
	pub threshold: u8,
	/// total number of member shares generated for this group
	pub count: u8,
	/// one password per member share, applied in place after splitting
	pub member_passwords: Option<Vec<String>>,
}

impl GroupDescriptor {
	/// A group with no per-member passwords.
	pub fn new(threshold: u8, count: u8) -> Self {
		GroupDescriptor {
			threshold,
			count,
			member_passwords: None,
		}
	}
}

impl From<(u8, u8)> for GroupDescriptor {
	fn from((threshold, count): (u8, u8)) -> Self {
		GroupDescriptor::new(threshold, count)
	}
}

/// One group's worth of generated shares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupShare {
	/// Group id (shared identifier of the whole split)
	pub group_id: u16,
	/// iteration exponent
	pub iteration_exponent: u8,
	/// group index
	pub group_index: u8,
	/// group threshold
	pub group_threshold: u8,
	/// number of group shares
	pub group_count: u8,
	/// member threshold
	pub member_threshold: u8,
	/// Member shares for the group
	pub member_shares: Vec<Share>,
}

impl fmt::Display for GroupShare {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		writeln!(
			f,
			"Group {} of {} - {} of {} shares required: ",
			self.group_index + 1,
			self.group_count,
			self.member_threshold,
			self.member_shares.len()
		)?;
		for s in &self.member_shares {
			for w in s.to_mnemonic().unwrap_or_default() {
				write!(f, "{} ", w)?;
			}
			writeln!(f)?;
		}
		Ok(())
	}
}

impl GroupShare {
	/// return list of mnemonics
	pub fn mnemonic_list(&self) -> Result<Vec<Vec<String>>, Error> {
		self.member_shares.iter().map(Share::to_mnemonic).collect()
	}

	/// return list of mnemonics as space separated strings
	pub fn mnemonic_list_flat(&self) -> Result<Vec<String>, Error> {
		self.member_shares
			.iter()
			.map(|s| Ok(share::words_to_string(&s.to_mnemonic()?)))
			.collect()
	}

	/// recombine this group's member shares into its single group-level share
	pub fn decode_shares(&mut self) -> Result<Share, Error> {
		let sp = Splitter::new(None);
		sp.recover_secret(&self.member_shares, self.member_threshold)
	}
}

/// Encode a share to its mnemonic word sequence.
pub fn encode_mnemonic(share: &Share) -> Result<Vec<String>, Error> {
	share.to_mnemonic()
}

/// Decode a mnemonic word sequence back to a share.
pub fn decode_mnemonic(words: &[String]) -> Result<Share, Error> {
	Share::from_mnemonic(words)
}

/// Encode a share to the fixed-header binary layout (§4.4).
pub fn encode_binary_shard(share: &Share) -> Result<Vec<u8>, Error> {
	share.to_binary()
}

/// Decode a share from the fixed-header binary layout (§4.4).
pub fn decode_binary_shard(bytes: &[u8]) -> Result<Share, Error> {
	Share::from_binary(bytes)
}

/// Re-encrypt a share's value in place with a per-share password, using the
/// share's own identifier and iteration exponent (§4.7).
pub fn encrypt_shard(share: &mut Share, password: &str) -> Result<(), Error> {
	validate_passphrase(password)?;
	let enc = MasterSecretEnc::new()?;
	let new_value = enc.encrypt(
		&share.share_value,
		password,
		share.iteration_exponent,
		share.identifier,
	);
	share.share_value.zeroize();
	share.share_value = new_value;
	Ok(())
}

/// Reverse of `encrypt_shard`.
pub fn decrypt_shard(share: &mut Share, password: &str) -> Result<(), Error> {
	validate_passphrase(password)?;
	let enc = MasterSecretEnc::new()?;
	let new_value = enc.decrypt(
		&share.share_value,
		password,
		share.iteration_exponent,
		share.identifier,
	);
	share.share_value.zeroize();
	share.share_value = new_value;
	Ok(())
}

fn validate_groups(group_threshold: u8, groups: &[GroupDescriptor]) -> Result<(), Error> {
	if groups.is_empty() {
		return Err(ErrorKind::InvalidGroupThreshold(
			"At least one group is required".to_string(),
		))?;
	}
	if group_threshold == 0 || group_threshold as usize > groups.len() {
		return Err(ErrorKind::InvalidGroupThreshold(format!(
			"group_threshold {} must be between 1 and the number of groups ({})",
			group_threshold,
			groups.len(),
		)))?;
	}
	for g in groups {
		if g.count == 0 || g.threshold == 0 || g.threshold > g.count {
			return Err(ErrorKind::InvalidMemberThreshold(format!(
				"member threshold {} must be between 1 and member count {}",
				g.threshold, g.count,
			)))?;
		}
		if g.threshold == 1 && g.count != 1 {
			return Err(ErrorKind::InvalidSingletonMember(
				"A group with member_threshold == 1 must have exactly one member".to_string(),
			))?;
		}
		if let Some(pw) = &g.member_passwords {
			if pw.len() != g.count as usize {
				return Err(ErrorKind::Argument(format!(
					"Group has {} members but {} per-member passwords were supplied",
					g.count,
					pw.len(),
				)))?;
			}
		}
	}
	Ok(())
}

/// Split a master secret into mnemonic shares.
///
/// `group_threshold`: the number of groups required to reconstruct the master secret.
/// `groups`: one descriptor per group, giving its member threshold, member count, and
/// optional per-member passwords.
/// `master_secret`: the master secret to split; 16..=32 bytes, even length.
/// `passphrase`: the passphrase used to encrypt the master secret (printable ASCII).
/// `iteration_exponent`: PBKDF2 cost parameter.
/// `rng`: source of randomness for the identifier and the Shamir splits.
pub fn generate_mnemonics(
	group_threshold: u8,
	groups: &[GroupDescriptor],
	master_secret: &[u8],
	passphrase: &str,
	iteration_exponent: u8,
	rng: &mut dyn RandomGenerator,
) -> Result<Vec<GroupShare>, Error> {
	if master_secret.len() < 16 {
		return Err(ErrorKind::SecretTooShort(format!(
			"Master secret must be at least 16 bytes, got {}.",
			master_secret.len(),
		)))?;
	}
	if master_secret.len() > 32 {
		return Err(ErrorKind::SecretTooLong(format!(
			"Master secret must be at most 32 bytes, got {}.",
			master_secret.len(),
		)))?;
	}
	if master_secret.len() % 2 != 0 {
		return Err(ErrorKind::InvalidSecretLength(
			"Master secret length must be even".to_string(),
		))?;
	}
	validate_passphrase(passphrase)?;
	validate_groups(group_threshold, groups)?;

	let mut proto_share = Share::new_with_rng(rng)?;
	proto_share.iteration_exponent = iteration_exponent;
	proto_share.group_threshold = group_threshold;
	proto_share.group_count = groups.len() as u8;

	let encoder = MasterSecretEnc::new()?;
	let mut encrypted_master_secret = encoder.encrypt(
		master_secret,
		passphrase,
		iteration_exponent,
		proto_share.identifier,
	);

	let sp = Splitter::new(None);

	let group_shares = match sp.split_secret(
		&proto_share,
		group_threshold,
		groups.len() as u8,
		&encrypted_master_secret,
		rng,
	) {
		Ok(gs) => gs,
		Err(e) => {
			encrypted_master_secret.zeroize();
			return Err(e);
		}
	};
	encrypted_master_secret.zeroize();

	let mut retval: Vec<GroupShare> = vec![];
	let gs_len = group_shares.len();
	for (i, mut elem) in group_shares.into_iter().enumerate() {
		proto_share.group_index = i as u8;
		let descriptor = &groups[i];
		let mut member_shares = sp.split_secret(
			&proto_share,
			descriptor.threshold,
			descriptor.count,
			&elem.share_value,
			rng,
		)?;
		elem.share_value.zeroize();

		if let Some(passwords) = &descriptor.member_passwords {
			for (ms, pw) in member_shares.iter_mut().zip(passwords.iter()) {
				encrypt_shard(ms, pw)?;
			}
		}

		retval.push(GroupShare {
			group_id: proto_share.identifier,
			iteration_exponent,
			group_index: i as u8,
			group_threshold,
			group_count: gs_len as u8,
			member_threshold: descriptor.threshold,
			member_shares,
		});
	}

	Ok(retval)
}

/// As `generate_mnemonics`, but draws a fresh random master secret of
/// `strength_bits` bits instead of taking one from the caller.
pub fn generate_mnemonics_random(
	group_threshold: u8,
	groups: &[GroupDescriptor],
	strength_bits: u16,
	passphrase: &str,
	iteration_exponent: u8,
	rng: &mut dyn RandomGenerator,
) -> Result<Vec<GroupShare>, Error> {
	if strength_bits < 128 {
		return Err(ErrorKind::SecretTooShort(format!(
			"Requested strength of {} bits must be at least 128 bits.",
			strength_bits,
		)))?;
	}
	if strength_bits % 16 != 0 {
		return Err(ErrorKind::InvalidSecretLength(format!(
			"Requested strength of {} bits must be a multiple of 16.",
			strength_bits,
		)))?;
	}
	let mut secret = util::fill_vec_rand(strength_bits as usize / 8, rng);
	let result = generate_mnemonics(
		group_threshold,
		groups,
		&secret,
		passphrase,
		iteration_exponent,
		rng,
	);
	secret.zeroize();
	result
}

/// Flat-buffer variant of `generate_mnemonics` matching the language-neutral
/// contract of §6 literally: returns `(words_per_share, share_count,
/// flat_word_buffer)`, where `flat_word_buffer` holds `share_count *
/// words_per_share` values in `0..1024`. All generated mnemonics for one
/// split are equal length by construction; that invariant is asserted here
/// rather than silently relied upon (§9 design note (b)).
pub fn generate_mnemonics_flat(
	group_threshold: u8,
	groups: &[GroupDescriptor],
	master_secret: &[u8],
	passphrase: &str,
	iteration_exponent: u8,
	rng: &mut dyn RandomGenerator,
) -> Result<(usize, usize, Vec<u16>), Error> {
	let group_shares = generate_mnemonics(
		group_threshold,
		groups,
		master_secret,
		passphrase,
		iteration_exponent,
		rng,
	)?;

	let mut words_per_share = None;
	let mut flat = vec![];
	let mut share_count = 0usize;
	for gs in &group_shares {
		for s in &gs.member_shares {
			let words = s.to_mnemonic()?;
			match words_per_share {
				None => words_per_share = Some(words.len()),
				Some(n) => assert_eq!(
					n,
					words.len(),
					"all mnemonics generated by one split must have equal length"
				),
			}
			for w in &words {
				let idx = *share::WORD_INDEX_MAP
					.get(w)
					.expect("word came from the wordlist itself");
				flat.push(idx as u16);
			}
			share_count += 1;
		}
	}

	Ok((words_per_share.unwrap_or(0), share_count, flat))
}

/// Combine mnemonic shares to recover the master secret, with no per-share passwords.
pub fn combine_mnemonics(mnemonics: &[Vec<String>], passphrase: &str) -> Result<Vec<u8>, Error> {
	let passwords = vec![None; mnemonics.len()];
	combine_mnemonics_with_passwords(mnemonics, &passwords, passphrase)
}

/// Combine mnemonic shares to recover the master secret. `member_passwords`
/// must have one entry per mnemonic (`None` if that share was not
/// individually encrypted).
pub fn combine_mnemonics_with_passwords(
	mnemonics: &[Vec<String>],
	member_passwords: &[Option<String>],
	passphrase: &str,
) -> Result<Vec<u8>, Error> {
	if mnemonics.is_empty() {
		return Err(ErrorKind::EmptyMnemonicSet(
			"List of mnemonics is empty.".to_string(),
		))?;
	}
	if member_passwords.len() != mnemonics.len() {
		return Err(ErrorKind::Argument(
			"member_passwords must have exactly one entry per mnemonic".to_string(),
		))?;
	}
	validate_passphrase(passphrase)?;

	let mut shares = vec![];
	for (mn, pw) in mnemonics.iter().zip(member_passwords.iter()) {
		let mut s = Share::from_mnemonic(mn)?;
		if let Some(p) = pw {
			decrypt_shard(&mut s, p)?;
		}
		shares.push(s);
	}

	let group_shares = bucket_and_validate(shares)?;

	let mut group_level_shares = vec![];
	for mut gs in group_shares {
		let mut s = gs.decode_shares()?;
		s.member_index = s.group_index;
		group_level_shares.push(s);
	}

	let sp = Splitter::new(None);
	let group_threshold = group_level_shares[0].group_threshold;
	let mut ems = sp.recover_secret(&group_level_shares, group_threshold)?;

	let encoder = MasterSecretEnc::new()?;
	let dms = encoder.decrypt(
		&ems.share_value,
		passphrase,
		ems.iteration_exponent,
		ems.identifier,
	);
	ems.share_value.zeroize();
	Ok(dms)
}

/// Decode all mnemonics to shares, cross-validate them, and bucket them by
/// group index, enforcing every consistency invariant of §4.6 step 3-5.
fn bucket_and_validate(shares: Vec<Share>) -> Result<Vec<GroupShare>, Error> {
	let check_share = shares[0].clone();
	for s in &shares {
		if s.identifier != check_share.identifier || s.iteration_exponent != check_share.iteration_exponent
		{
			return Err(ErrorKind::InvalidShardSet(
				"All shares must share the same identifier and iteration exponent.".to_string(),
			))?;
		}
		if s.group_threshold != check_share.group_threshold {
			return Err(ErrorKind::InvalidShardSet(
				"All shares must have the same group threshold.".to_string(),
			))?;
		}
		if s.group_count != check_share.group_count {
			return Err(ErrorKind::InvalidShardSet(
				"All shares must have the same group count.".to_string(),
			))?;
		}
		if s.share_value.len() != check_share.share_value.len() {
			return Err(ErrorKind::InvalidShardSet(
				"All shares must have the same value length.".to_string(),
			))?;
		}
	}

	let mut group_index_map: BTreeMap<u8, GroupShare> = BTreeMap::new();
	for s in shares {
		let entry = group_index_map.entry(s.group_index).or_insert_with(|| GroupShare {
			group_id: s.identifier,
			group_index: s.group_index,
			group_threshold: s.group_threshold,
			iteration_exponent: s.iteration_exponent,
			group_count: s.group_count,
			member_shares: vec![],
			member_threshold: s.member_threshold,
		});

		if entry.member_threshold != s.member_threshold {
			return Err(ErrorKind::InvalidMemberThreshold(format!(
				"Members of group {} disagree on member threshold.",
				s.group_index,
			)))?;
		}
		if entry.member_shares.iter().any(|m| m.member_index == s.member_index) {
			return Err(ErrorKind::DuplicateMemberIndex(format!(
				"Duplicate member index {} in group {}.",
				s.member_index, s.group_index,
			)))?;
		}
		entry.member_shares.push(s);
	}

	if group_index_map.len() < check_share.group_threshold as usize {
		return Err(ErrorKind::NotEnoughGroups(format!(
			"Have {} distinct groups, need {}.",
			group_index_map.len(),
			check_share.group_threshold,
		)))?;
	}

	// Every bucket that was actually submitted must independently clear its own
	// member threshold before the aggregate group count is trusted -- a bucket
	// short on members is NotEnoughMemberShards, not a missing group.
	for g in group_index_map.values() {
		if g.member_shares.len() < g.member_threshold as usize {
			return Err(ErrorKind::NotEnoughMemberShards(format!(
				"Group {} needs {} member shares, has {}.",
				g.group_index,
				g.member_threshold,
				g.member_shares.len(),
			)))?;
		}
	}

	Ok(group_index_map.into_values().collect())
}
