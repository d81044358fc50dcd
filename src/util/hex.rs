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

//! Minimal hex encode/decode, used by tests and by callers that want to
//! print or load master secrets as hex rather than raw bytes.

use crate::error::{Error, ErrorKind};

/// Encode a byte slice as a lowercase hex string.
pub fn to_hex(bytes: &[u8]) -> String {
	bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decode a hex string into bytes. Case-insensitive; rejects odd length or
/// non-hex-digit characters.
pub fn from_hex(s: &str) -> Result<Vec<u8>, Error> {
	if s.len() % 2 != 0 {
		return Err(ErrorKind::Argument(format!(
			"Hex string must have an even number of characters: {}",
			s
		)))?;
	}
	(0..s.len())
		.step_by(2)
		.map(|i| {
			u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| {
				ErrorKind::Argument(format!("Invalid hex digit pair: {}", &s[i..i + 2])).into()
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn roundtrip() {
		let bytes = vec![0x00, 0x0f, 0xab, 0xff];
		let s = to_hex(&bytes);
		assert_eq!(s, "000fabff");
		assert_eq!(from_hex(&s).unwrap(), bytes);
	}

	#[test]
	fn rejects_odd_length() {
		assert!(from_hex("abc").is_err());
	}

	#[test]
	fn rejects_bad_digit() {
		assert!(from_hex("zz").is_err());
	}
}
