//! Error types for encoding and decoding.
//!
//! Mirrors §7 of the specification: encode errors are surfaced directly to
//! the caller as `Result::Err`, while decode errors are caught internally and
//! folded into the numeric [`DecodeStatus`](crate::decoder::DecodeStatus)
//! instead of crossing the public API as exceptions.

use thiserror::Error;

/// Errors that can occur while configuring or running the encoder.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EncodeError {
	/// `color_number` was not one of {4, 8, 16, 32, 64, 128}.
	#[error("invalid color number {0}, expected one of 4, 8, 16, 32, 64, 128")]
	InvalidColorNumber(u32),

	/// `symbol_number` was outside `1..=61`.
	#[error("invalid symbol count {0}, expected 1..=61")]
	InvalidSymbolCount(u32),

	/// A forced ECC level was outside `0..=9`.
	#[error("ecc level {0} out of range, expected 0..=9")]
	EccLevelOutOfRange(u32),

	/// `module_size` was zero.
	#[error("module_size must be >= 1")]
	InvalidModuleSize,

	/// The segmented, LDPC-protected payload does not fit in the chosen
	/// symbol set's data capacity.
	#[error("data too large: {required_bits} bits required, {available_bits} available")]
	DataTooLarge {
		/// Bits the encoded bitstream needs.
		required_bits: usize,
		/// Bits the chosen symbol geometry can carry.
		available_bits: usize,
	},

	/// No `(wc, wr)` pair could satisfy the requested capacity at all.
	#[error("no LDPC parameters satisfy net_data_length={net_data_length} within capacity={capacity}")]
	NoFeasibleEcc {
		/// Requested payload length in bits.
		net_data_length: usize,
		/// Available codeword capacity in bits.
		capacity: usize,
	},

	/// A forced mask pattern index was outside `0..8`.
	#[error("mask pattern {0} out of range, expected 0..8")]
	ForcedMaskOutOfRange(u8),
}

/// Errors raised while decoding a single symbol.
///
/// These never cross the public decode API directly; `decode`/`decode_ex`
/// catch them and fold them into a [`DecodeStatus`](crate::decoder::DecodeStatus)
/// per the policy table in spec §7.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DecodeError {
	/// Part-1 or Part-2 metadata failed to LDPC-decode or contained an
	/// out-of-range field.
	#[error("metadata invalid: {0}")]
	MetadataInvalid(&'static str),

	/// The data codeword's LDPC decode did not converge to a valid parity
	/// check within the iteration cap.
	#[error("LDPC residual errors after {iterations} iterations")]
	LdpcResidualErrors {
		/// Iterations actually run.
		iterations: u32,
	},

	/// The bitstream's mode/length fields could not be parsed.
	#[error("bitstream parse error at bit offset {offset}")]
	BitstreamParse {
		/// Bit offset the parser failed at.
		offset: usize,
	},

	/// `decode_synthetic` was given geometry that doesn't match the supplied
	/// bitmap (e.g. the module grid doesn't fit inside the bitmap bounds).
	#[error("synthetic decode geometry mismatch: {0}")]
	SyntheticGeometryMismatch(&'static str),
}
