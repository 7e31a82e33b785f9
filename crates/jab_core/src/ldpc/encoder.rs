//! ECC parameter search (`getOptimalECC`) and systematic encode entry point.

use super::matrix::ParityMatrix;
use super::table::ECCLEVEL_TABLE;

/// Searches the `(wc, wr)` space (`3 <= wc <= 8`, `wc < wr <= 9`) for the
/// pair that minimises non-negative slack between the code's data capacity
/// at that rate and `net_data_length`.
///
/// `slack(wc, wr) = (capacity / wr) * (wr - wc) - net_data_length`, integer
/// division throughout. Returns `None` if no pair fits `net_data_length`
/// within `capacity` at all. Ties (equal slack) keep the first pair found,
/// in ascending `(wc, wr)` order, matching the reference search order.
pub fn get_optimal_ecc(capacity: usize, net_data_length: usize) -> Option<(u32, u32)> {
	let mut best: Option<(u32, u32)> = None;
	let mut best_slack = capacity as i64;

	for wc in 3..=8u32 {
		for wr in (wc + 1)..=9u32 {
			let code_bits = (capacity / wr as usize) * wr as usize;
			let data_bits = (capacity / wr as usize) * wc as usize;
			let slack = code_bits as i64 - data_bits as i64 - net_data_length as i64;
			if slack >= 0 && slack < best_slack {
				best_slack = slack;
				best = Some((wc, wr));
			}
		}
	}

	best
}

/// Builds the parity matrix for ECC level `level` at codeword length `n`
/// with `m` parity bits, and produces the systematic codeword for `data`.
pub fn encode(level: u32, n: usize, m: usize, seed: u64, data: &[bool]) -> Option<Vec<bool>> {
	let (wc, wr) = ECCLEVEL_TABLE.get(level as usize).copied()?;
	let matrix = ParityMatrix::build(n, m, wc as usize, wr as usize, seed);
	Some(matrix.encode_systematic(data))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn capacity_1000_net_400_satisfies_the_capacity_invariant() {
		// capacity >= net_data_length * wr / (wr - wc), with minimal non-negative
		// slack: (3, 5) is exact (slack 0) at these inputs.
		let (wc, wr) = get_optimal_ecc(1000, 400).unwrap();
		assert_eq!((wc, wr), (3, 5));
		assert!(1000 >= 400 * wr as usize / (wr - wc) as usize);
	}

	#[test]
	fn slack_is_non_negative_for_selected_pair() {
		for capacity in [200usize, 513, 1000, 4096] {
			for net_data_length in [10usize, 100, 300] {
				if let Some((wc, wr)) = get_optimal_ecc(capacity, net_data_length) {
					let code_bits = (capacity / wr as usize) * wr as usize;
					let data_bits = (capacity / wr as usize) * wc as usize;
					let slack = code_bits as i64 - data_bits as i64 - net_data_length as i64;
					assert!(slack >= 0);
				}
			}
		}
	}

	#[test]
	fn too_large_net_data_length_has_no_solution() {
		assert_eq!(get_optimal_ecc(100, 1_000_000), None);
	}

	#[test]
	fn zero_net_data_length_always_has_a_solution_for_nonzero_capacity() {
		assert!(get_optimal_ecc(1000, 0).is_some());
	}
}
