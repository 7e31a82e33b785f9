//! Benchmark helper utilities for `jabcode`.
//!
//! This module provides synthetic payload generators and common benchmark
//! sizes for the encode/decode benchmark suite.

/// Generates a deterministic payload of `len` bytes, cycling through every
/// byte value so both Byte-mode and fixed-alphabet segmentation get
/// exercised.
pub fn generate_test_payload(len: usize) -> Vec<u8> {
	(0..len).map(|i| (i % 256) as u8).collect()
}

/// Generates a payload drawn only from printable ASCII, so segmentation
/// picks fixed-alphabet modes over Byte mode for most of it.
pub fn generate_text_payload(len: usize) -> Vec<u8> {
	const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 ";
	(0..len).map(|i| ALPHABET[i % ALPHABET.len()]).collect()
}

/// Common benchmark payload sizes.
pub mod sizes {
	/// A handful of bytes: roughly a short URL or code.
	pub const TINY: usize = 16;
	/// A paragraph's worth of text.
	pub const SMALL: usize = 256;
	/// A small document.
	pub const MEDIUM: usize = 2048;
	/// Near the largest single-symbol capacity at a low color count.
	pub const LARGE: usize = 8192;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn generated_payload_has_the_requested_length() {
		assert_eq!(generate_test_payload(sizes::SMALL).len(), sizes::SMALL);
		assert_eq!(generate_text_payload(sizes::SMALL).len(), sizes::SMALL);
	}

	#[test]
	fn text_payload_is_all_printable_ascii() {
		let payload = generate_text_payload(sizes::MEDIUM);
		assert!(payload.iter().all(|&b| b.is_ascii_graphic() || b == b' '));
	}
}
