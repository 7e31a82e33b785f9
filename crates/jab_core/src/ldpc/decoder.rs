//! Bit-flipping message-passing LDPC decoder.

use super::matrix::ParityMatrix;

/// Minimum iteration cap required by the spec; callers may raise it.
pub const DEFAULT_MAX_ITERATIONS: u32 = 50;

/// Outcome of a bit-flipping decode attempt.
#[derive(Debug, Clone)]
pub struct DecodeResult {
	/// The codeword after decoding (may still carry errors if `converged`
	/// is `false`).
	pub codeword: Vec<bool>,
	/// `true` if every parity check was satisfied before the iteration cap.
	pub converged: bool,
	/// Number of iterations actually run.
	pub iterations: u32,
}

/// Runs bit-flipping decode: each iteration, every unsatisfied check votes
/// against its incident variables, and any variable with more unsatisfied
/// than satisfied incident checks flips. Stops early once all checks are
/// satisfied, or after `max_iterations`.
pub fn decode_bit_flipping(matrix: &ParityMatrix, received: &[bool], max_iterations: u32) -> DecodeResult {
	debug_assert_eq!(received.len(), matrix.n);

	let mut codeword = received.to_vec();

	for iteration in 0..max_iterations {
		let syndrome = matrix.syndrome(&codeword);
		if syndrome.iter().all(|&unsatisfied| !unsatisfied) {
			return DecodeResult {
				codeword,
				converged: true,
				iterations: iteration,
			};
		}

		let flips: Vec<usize> = (0..matrix.n)
			.filter(|&variable| {
				let checks = matrix.checks_for_variable(variable);
				if checks.is_empty() {
					return false;
				}
				let unsatisfied_count = checks.iter().filter(|&&check| syndrome[check]).count();
				unsatisfied_count * 2 > checks.len()
			})
			.collect();

		if flips.is_empty() {
			log::warn!("ldpc: bit-flipping stalled at iteration {iteration} with residual errors");
			return DecodeResult {
				codeword,
				converged: false,
				iterations: iteration + 1,
			};
		}

		for variable in flips {
			codeword[variable] = !codeword[variable];
		}
	}

	let converged = matrix.syndrome(&codeword).iter().all(|&unsatisfied| !unsatisfied);
	if !converged {
		log::warn!("ldpc: residual errors after {max_iterations} iterations");
	}
	DecodeResult {
		codeword,
		converged,
		iterations: max_iterations,
	}
}
