//! Systematic binary LDPC error correction over GF(2).
//!
//! Column weight `wc` and row weight `wr` select the code's redundancy; the
//! pair is either chosen automatically by [`get_optimal_ecc`] or forced by
//! the caller via an ECC level index into [`table::ECCLEVEL_TABLE`].

pub mod decoder;
pub mod encoder;
pub mod matrix;
pub mod table;

pub use decoder::{decode_bit_flipping, DecodeResult, DEFAULT_MAX_ITERATIONS};
pub use encoder::get_optimal_ecc;
pub use matrix::ParityMatrix;
pub use table::{level_for_wc_wr, wc_wr_for_level, ECCLEVEL_TABLE};
