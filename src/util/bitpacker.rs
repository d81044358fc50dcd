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

//! Operations that allow packing bits from primitives into a bitvec
//! Slower, but easier to follow and modify than a lot of bit twiddling
//! BigEndian, as is bitvec default

use bitvec::prelude::*;

use crate::error::{Error, ErrorKind};

/// Simple struct that wraps a bitvec and defines packing/unpacking
/// operations on it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitPacker {
	bv: BitVec<u8, Msb0>,
}

impl BitPacker {
	/// Create a new bitpacker
	pub fn new() -> Self {
		BitPacker { bv: BitVec::new() }
	}

	/// Append num_bits of zero padding to the internal bitvec
	pub fn append_padding(&mut self, num_bits: u8) {
		for _ in 0..num_bits {
			self.bv.push(false);
		}
	}

	/// Append each element of a u8 vec to the bitvec
	pub fn append_vec_u8(&mut self, data: &[u8]) -> Result<(), Error> {
		for &byte in data {
			self.append_u8(byte, 8)?;
		}
		Ok(())
	}

	/// Append first num_bits of a u32 to the bitvec. num_bits must be <= 32
	pub fn append_u32(&mut self, val: u32, num_bits: u8) -> Result<(), Error> {
		if num_bits > 32 {
			return Err(ErrorKind::BitVec(
				"number of bits to pack must be <= 32".to_string(),
			))?;
		}
		for i in (0u8..num_bits).rev() {
			self.bv.push((val >> i) & 1 == 1);
		}
		Ok(())
	}

	/// Append first num_bits of a u16 to the bitvec. num_bits must be <= 16
	pub fn append_u16(&mut self, val: u16, num_bits: u8) -> Result<(), Error> {
		if num_bits > 16 {
			return Err(ErrorKind::BitVec(
				"number of bits to pack must be <= 16".to_string(),
			))?;
		}
		for i in (0u8..num_bits).rev() {
			self.bv.push((val >> i) & 1 == 1);
		}
		Ok(())
	}

	/// Append first num_bits of a u8 to the bitvec, num_bits must be <= 8
	pub fn append_u8(&mut self, val: u8, num_bits: u8) -> Result<(), Error> {
		if num_bits > 8 {
			return Err(ErrorKind::BitVec(
				"number of bits to pack must be <= 8".to_string(),
			))?;
		}
		for i in (0u8..num_bits).rev() {
			self.bv.push((val >> i) & 1 == 1);
		}
		Ok(())
	}

	/// Return length of internal bit vector, in bits
	pub fn len(&self) -> usize {
		self.bv.len()
	}

	/// True if the bitpacker holds no bits
	pub fn is_empty(&self) -> bool {
		self.bv.is_empty()
	}

	/// Read num_bits bits starting at bit offset `start` as a u8
	pub fn get_u8(&self, start: usize, num_bits: usize) -> Result<u8, Error> {
		Ok(self.get_u32(start, num_bits)? as u8)
	}

	/// Read num_bits bits starting at bit offset `start` as a u16
	pub fn get_u16(&self, start: usize, num_bits: usize) -> Result<u16, Error> {
		Ok(self.get_u32(start, num_bits)? as u16)
	}

	/// Read num_bits bits starting at bit offset `start` as a u32
	pub fn get_u32(&self, start: usize, num_bits: usize) -> Result<u32, Error> {
		if num_bits > 32 {
			return Err(ErrorKind::BitVec(
				"number of bits to unpack must be <= 32".to_string(),
			))?;
		}
		if start + num_bits > self.bv.len() {
			return Err(ErrorKind::BitVec(format!(
				"attempt to read {} bits at offset {}, but only {} bits are available",
				num_bits,
				start,
				self.bv.len(),
			)))?;
		}
		let mut val: u32 = 0;
		for i in 0..num_bits {
			val = (val << 1) | (self.bv[start + i] as u32);
		}
		Ok(val)
	}

	/// Read `num_bytes` bytes (8-bit aligned) starting at bit offset `start`
	pub fn get_vec_u8(&self, start: usize, num_bytes: usize) -> Result<Vec<u8>, Error> {
		let mut ret = Vec::with_capacity(num_bytes);
		for i in 0..num_bytes {
			ret.push(self.get_u8(start + i * 8, 8)?);
		}
		Ok(ret)
	}

	/// Re-pack the internal bitvec so its length is a multiple of `radix_bits`,
	/// by left-padding with zero bits.
	pub fn normalize(&mut self, radix_bits: usize) {
		let rem = self.bv.len() % radix_bits;
		if rem != 0 {
			let pad = radix_bits - rem;
			let mut padded: BitVec<u8, Msb0> = BitVec::with_capacity(self.bv.len() + pad);
			for _ in 0..pad {
				padded.push(false);
			}
			padded.extend(self.bv.iter().by_vals());
			self.bv = padded;
		}
	}

	/// Keep only the bits in `[start, end)`, discarding the rest
	pub fn split_out(&mut self, start: usize, end: usize) {
		let kept: BitVec<u8, Msb0> = self.bv[start..end].iter().by_vals().collect();
		self.bv = kept;
	}

	/// Remove and validate `num_bits` of leading zero padding.
	/// Returns `ErrorKind::InvalidPadding` if any padding bit is set.
	pub fn remove_padding(&mut self, num_bits: usize) -> Result<(), Error> {
		if num_bits > self.bv.len() {
			return Err(ErrorKind::BitVec(
				"padding longer than the buffer itself".to_string(),
			))?;
		}
		if self.bv[..num_bits].any() {
			return Err(ErrorKind::InvalidPadding)?;
		}
		let rest: BitVec<u8, Msb0> = self.bv[num_bits..].iter().by_vals().collect();
		self.bv = rest;
		Ok(())
	}
}
