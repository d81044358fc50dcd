// Derived from RustySecrets Project at
// https://github.com/SpinResearch/RustySecrets.git
//
// BSD 3-Clause License
//
// Copyright (c) 2016-2018, Spin Research
// All rights reserved.
//
// Modifications Copyright 2019 The Grin Developers
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

//! A polynomial over `Gf256`, represented by its coefficients in
//! ascending order of degree.

use crate::field::gf256::Gf256;

/// `poly.coeffs[i]` is the coefficient of `x^i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
	coeffs: Vec<Gf256>,
}

impl Poly {
	/// Wrap a coefficient vector as a polynomial
	pub fn new(coeffs: Vec<Gf256>) -> Poly {
		Poly { coeffs }
	}

	/// Evaluate the polynomial at `x` using Horner's method
	pub fn evaluate_at(&self, x: Gf256) -> Gf256 {
		let mut result = Gf256::zero();
		for coeff in self.coeffs.iter().rev() {
			result = result * x + *coeff;
		}
		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn evaluate_constant() {
		let poly = Poly::new(vec![Gf256::from_byte(42)]);
		assert_eq!(poly.evaluate_at(Gf256::from_byte(7)), Gf256::from_byte(42));
		assert_eq!(poly.evaluate_at(Gf256::zero()), Gf256::from_byte(42));
	}

	#[test]
	fn evaluate_linear() {
		// p(x) = 3 + 5x, p(0) should be the constant term
		let poly = Poly::new(vec![Gf256::from_byte(3), Gf256::from_byte(5)]);
		assert_eq!(poly.evaluate_at(Gf256::zero()), Gf256::from_byte(3));
	}
}
