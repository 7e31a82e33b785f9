//! Seeded parity-check matrix construction and systematic encoding.
//!
//! The matrix is built by a load-balanced configuration model: each of the
//! `n` variable (codeword bit) columns picks `wc` check rows, preferring
//! whichever rows currently carry the fewest edges so row weight settles
//! near `wr` without being forced exactly to it. The last `m` columns (the
//! parity positions) are required to form an invertible `m x m` submatrix
//! over GF(2); if a seed doesn't produce one, the seed is perturbed and the
//! construction retried. Because both encoder and decoder build the matrix
//! from the same `(wc, wr, n, seed)` inputs, they always agree without
//! transmitting the matrix itself.

use rand::prelude::*;
use rand::rngs::SmallRng;

/// A seeded, systematic-ready LDPC parity-check matrix.
#[derive(Debug, Clone)]
pub struct ParityMatrix {
	/// Codeword length in bits.
	pub n: usize,
	/// Number of parity checks (and parity bits).
	pub m: usize,
	/// Column weight used to build this matrix.
	pub wc: usize,
	/// Row weight this matrix approximates.
	pub wr: usize,
	rows: Vec<Vec<bool>>,
	parity_inverse: Vec<Vec<bool>>,
}

impl ParityMatrix {
	/// Builds a matrix for a codeword of `n` bits with `m` parity checks,
	/// targeting column weight `wc` and row weight `wr`, derived
	/// reproducibly from `seed`.
	pub fn build(n: usize, m: usize, wc: usize, wr: usize, seed: u64) -> Self {
		debug_assert!(m <= n);
		debug_assert!(wc >= 1 && wc <= m);

		let mut attempt: u64 = 0;
		loop {
			let rows = construct_rows(n, m, wc, seed.wrapping_add(attempt));
			if let Some(parity_inverse) = invert_parity_submatrix(&rows, n - m, m) {
				log::debug!("ldpc: built {m}x{n} parity matrix (wc={wc}, wr={wr}) after {attempt} retries");
				return Self {
					n,
					m,
					wc,
					wr,
					rows,
					parity_inverse,
				};
			}
			attempt += 1;
			debug_assert!(attempt < 10_000, "failed to find an invertible parity submatrix");
		}
	}

	/// Produces the systematic codeword `data ++ parity` for `data.len() ==
	/// n - m` payload bits.
	pub fn encode_systematic(&self, data: &[bool]) -> Vec<bool> {
		debug_assert_eq!(data.len(), self.n - self.m);

		let rhs: Vec<bool> = self
			.rows
			.iter()
			.map(|row| row.iter().zip(data).fold(false, |acc, (&h, &d)| acc ^ (h && d)))
			.collect();

		let parity: Vec<bool> = self
			.parity_inverse
			.iter()
			.map(|row| row.iter().zip(&rhs).fold(false, |acc, (&h, &r)| acc ^ (h && r)))
			.collect();

		let mut codeword = Vec::with_capacity(self.n);
		codeword.extend_from_slice(data);
		codeword.extend_from_slice(&parity);
		codeword
	}

	/// Computes `H * codeword` mod 2: one bit per check, set if that check's
	/// parity is currently violated.
	pub fn syndrome(&self, codeword: &[bool]) -> Vec<bool> {
		debug_assert_eq!(codeword.len(), self.n);
		self.rows
			.iter()
			.map(|row| row.iter().zip(codeword).fold(false, |acc, (&h, &c)| acc ^ (h && c)))
			.collect()
	}

	/// Indices of checks incident to variable (codeword bit) `var`.
	pub fn checks_for_variable(&self, var: usize) -> Vec<usize> {
		(0..self.m).filter(|&check| self.rows[check][var]).collect()
	}
}

fn construct_rows(n: usize, m: usize, wc: usize, seed: u64) -> Vec<Vec<bool>> {
	let mut rng = SmallRng::seed_from_u64(seed);
	let mut load = vec![0u32; m];
	let mut rows = vec![vec![false; n]; m];

	for variable in 0..n {
		let mut candidates: Vec<usize> = (0..m).collect();
		candidates.shuffle(&mut rng);
		candidates.sort_by_key(|&check| load[check]);

		for &check in candidates.iter().take(wc) {
			rows[check][variable] = true;
			load[check] += 1;
		}
	}

	rows
}

/// Inverts the `m x m` submatrix formed by columns `[col_offset, col_offset +
/// m)` of `rows`, via Gauss-Jordan elimination with row swaps over GF(2).
/// Returns `None` if the submatrix is singular.
fn invert_parity_submatrix(rows: &[Vec<bool>], col_offset: usize, m: usize) -> Option<Vec<Vec<bool>>> {
	let mut augmented: Vec<Vec<bool>> = (0..m)
		.map(|i| {
			let mut row = vec![false; 2 * m];
			row[..m].copy_from_slice(&rows[i][col_offset..col_offset + m]);
			row[m + i] = true;
			row
		})
		.collect();

	for col in 0..m {
		let pivot = (col..m).find(|&r| augmented[r][col])?;
		augmented.swap(col, pivot);
		for r in 0..m {
			if r != col && augmented[r][col] {
				for c in 0..2 * m {
					augmented[r][c] ^= augmented[col][c];
				}
			}
		}
	}

	Some(augmented.into_iter().map(|row| row[m..].to_vec()).collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn systematic_codeword_satisfies_all_parity_checks() {
		let matrix = ParityMatrix::build(20, 8, 3, 5, 42);
		let data: Vec<bool> = (0..12).map(|i| i % 3 == 0).collect();
		let codeword = matrix.encode_systematic(&data);

		assert_eq!(&codeword[..12], &data[..]);
		assert!(matrix.syndrome(&codeword).iter().all(|&s| !s));
	}

	#[test]
	fn construction_is_deterministic_for_same_seed() {
		let a = ParityMatrix::build(16, 6, 3, 5, 7);
		let b = ParityMatrix::build(16, 6, 3, 5, 7);
		let data = vec![true, false, true, true, false, false, true, false, false, true];
		assert_eq!(a.encode_systematic(&data), b.encode_systematic(&data));
	}

	#[test]
	fn every_column_has_the_requested_weight() {
		let matrix = ParityMatrix::build(24, 9, 3, 8, 99);
		for variable in 0..matrix.n {
			assert_eq!(matrix.checks_for_variable(variable).len(), matrix.wc);
		}
	}

	#[test]
	fn all_zero_data_yields_all_zero_codeword() {
		let matrix = ParityMatrix::build(18, 7, 3, 5, 5);
		let data = vec![false; 11];
		let codeword = matrix.encode_systematic(&data);
		assert!(codeword.iter().all(|&b| !b));
	}
}
