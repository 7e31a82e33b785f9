//! Part-1 and Part-2 metadata: small, independently LDPC-protected fields
//! placed in the ring of modules between the three docking-relevant finder
//! corners (FP0 top-left, FP1 top-right, FP2 bottom-left), read with a plain
//! black/white threshold before the full palette has been classified.

use crate::error::{DecodeError, EncodeError};
use crate::ldpc::ParityMatrix;
use crate::placement::finder::FINDER_SIZE;
use crate::symbol::{Module, Symbol};
use std::collections::HashSet;

/// Bit width of Part-2's mask-index field.
pub const MASK_INDEX_BITS: u32 = 3;
/// Bit width of Part-2's default-encodation-mode flag.
pub const DEFAULT_MODE_BITS: u32 = 1;
/// Bit width of Part-2's ECC-level table index (10 entries).
pub const ECC_LEVEL_BITS: u32 = 4;
/// Bit width of each of Part-2's two side-version fields.
pub const VERSION_BITS: u32 = 5;
/// Bit width of Part-2's docked-slave presence mask (one bit per side).
pub const SLAVE_MASK_BITS: u32 = 4;

/// Raw data-bit count of Part-1 (just `Nc`, the bits-per-module field).
pub const PART1_DATA_BITS: u32 = 3;
/// Raw data-bit count of Part-2.
pub const PART2_DATA_BITS: u32 =
	MASK_INDEX_BITS + DEFAULT_MODE_BITS + ECC_LEVEL_BITS + 2 * VERSION_BITS + SLAVE_MASK_BITS;

/// Part-1's LDPC column/row weight. Deliberately lighter than the data
/// path's `getOptimalECC`-selected pairs (wc in 3..=8): metadata payloads
/// are a handful of bits, and the ring of modules available to carry them
/// shrinks fast on small-version symbols, so a column-weight-1 code (a
/// systematic single-parity-style code, still a valid degenerate member of
/// the LDPC family) is used to keep the codeword short enough to fit.
pub const PART1_WC: u32 = 1;
pub const PART1_WR: u32 = 2;
/// Part-2's LDPC column/row weight, chosen the same way for the same reason.
pub const PART2_WC: u32 = 1;
pub const PART2_WR: u32 = 3;

const PART1_SEED: u64 = 0xA5A5_5A5A;
const PART2_SEED: u64 = 0x5A5A_A5A5;

/// Systematic codeword length for `data_bits` data bits at column/row
/// weight `(wc, wr)`, assuming `wr - wc` evenly divides `data_bits * wr`
/// (true for the fixed pairs this module uses).
pub fn codeword_len(data_bits: u32, wc: u32, wr: u32) -> usize {
	debug_assert_eq!((data_bits * wr) % (wr - wc), 0, "metadata field widths must divide evenly");
	(data_bits * wr / (wr - wc)) as usize
}

/// Part-1 metadata: the bits-per-module count, read before the palette can
/// be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Part1 {
	pub nc: u32,
}

/// Part-2 metadata: everything else needed to interpret the rest of the
/// symbol once the palette is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Part2 {
	pub mask_type: u8,
	pub default_mode: bool,
	pub ecc_level: u8,
	pub version_x: u32,
	pub version_y: u32,
	pub slave_mask: u8,
}

/// Maps a palette size to its `Nc` code (`log2(color_number) - 1`).
pub fn nc_for_color_number(color_number: u32) -> Option<u32> {
	match color_number {
		4 => Some(1),
		8 => Some(2),
		16 => Some(3),
		32 => Some(4),
		64 => Some(5),
		128 => Some(6),
		_ => None,
	}
}

/// Inverse of [`nc_for_color_number`].
pub fn color_number_for_nc(nc: u32) -> Option<u32> {
	match nc {
		1 => Some(4),
		2 => Some(8),
		3 => Some(16),
		4 => Some(32),
		5 => Some(64),
		6 => Some(128),
		_ => None,
	}
}

/// The band width, in modules, of the metadata ring on each side.
const BAND: u32 = 4;

/// Candidate metadata-carrying module coordinates: a band of modules
/// hugging the inside edge between each pair of adjacent finder corners,
/// deduplicated where bands meet at a symbol's midline.
pub fn metadata_ring_positions(width: u32, height: u32) -> Vec<(u32, u32)> {
	let margin = FINDER_SIZE;
	let mut seen = HashSet::new();
	let mut positions = Vec::new();

	let mut collect = |xs: std::ops::Range<u32>, ys: std::ops::Range<u32>| {
		for y in ys.clone() {
			for x in xs.clone() {
				if seen.insert((x, y)) {
					positions.push((x, y));
				}
			}
		}
	};

	if width > 2 * margin {
		collect(margin..width - margin, margin..(margin + BAND).min(height));
		if height > 2 * margin + BAND {
			collect(margin..width - margin, (height - margin - BAND)..height - margin);
		}
	}
	if height > 2 * margin {
		collect(margin..(margin + BAND).min(width), margin..height - margin);
		if width > 2 * margin + BAND {
			collect((width - margin - BAND)..width - margin, margin..height - margin);
		}
	}

	positions
}

fn value_to_bits(value: u32, width: u32) -> Vec<bool> {
	(0..width).rev().map(|bit| (value >> bit) & 1 == 1).collect()
}

fn bits_to_value(bits: &[bool]) -> u32 {
	bits.iter().fold(0u32, |acc, &bit| (acc << 1) | bit as u32)
}

fn write_bits(symbol: &mut Symbol, positions: &[(u32, u32)], bits: &[bool], color_number: u32) {
	let white = (color_number - 1) as u8;
	for (&(x, y), &bit) in positions.iter().zip(bits) {
		let module_index = symbol.module_index(x, y);
		symbol.matrix[module_index] = Module::Data(if bit { white } else { 0 });
	}
}

fn read_bits(symbol: &Symbol, positions: &[(u32, u32)], color_number: u32) -> Vec<bool> {
	let threshold = color_number / 2;
	positions
		.iter()
		.map(|&(x, y)| {
			let index = symbol.matrix[symbol.module_index(x, y)].index().unwrap_or(0);
			(index as u32) >= threshold
		})
		.collect()
}

/// Builds Part-1's codeword and writes it into `positions`, the first
/// `codeword_len(PART1_DATA_BITS, ..)` entries of the metadata ring.
pub fn encode_part1(symbol: &mut Symbol, positions: &[(u32, u32)], part1: Part1, color_number: u32) -> Result<(), EncodeError> {
	let data = value_to_bits(part1.nc, PART1_DATA_BITS);
	let n = codeword_len(PART1_DATA_BITS, PART1_WC, PART1_WR);
	if positions.len() < n {
		return Err(EncodeError::DataTooLarge {
			required_bits: n,
			available_bits: positions.len(),
		});
	}
	let m = n - PART1_DATA_BITS as usize;
	let matrix = ParityMatrix::build(n, m, PART1_WC as usize, PART1_WR as usize, PART1_SEED);
	let codeword = matrix.encode_systematic(&data);
	write_bits(symbol, &positions[..n], &codeword, color_number);
	Ok(())
}

/// Reads and LDPC-decodes Part-1 back from `positions`.
pub fn decode_part1(symbol: &Symbol, positions: &[(u32, u32)], color_number: u32) -> Result<Part1, DecodeError> {
	let n = codeword_len(PART1_DATA_BITS, PART1_WC, PART1_WR);
	if positions.len() < n {
		return Err(DecodeError::MetadataInvalid("part-1 ring capacity too small"));
	}
	let received = read_bits(symbol, &positions[..n], color_number);
	decode_part1_bits(&received)
}

/// LDPC-decodes Part-1 from an already-sampled bit vector (`n ==
/// codeword_len(PART1_DATA_BITS, PART1_WC, PART1_WR)` entries), independent
/// of how those bits were sampled — from a classified [`Symbol`] or, before
/// the palette is even known, a plain luminance threshold straight off a
/// bitmap.
pub fn decode_part1_bits(received: &[bool]) -> Result<Part1, DecodeError> {
	let n = codeword_len(PART1_DATA_BITS, PART1_WC, PART1_WR);
	if received.len() != n {
		return Err(DecodeError::MetadataInvalid("part-1 codeword has the wrong length"));
	}
	let m = n - PART1_DATA_BITS as usize;
	let matrix = ParityMatrix::build(n, m, PART1_WC as usize, PART1_WR as usize, PART1_SEED);
	let result = crate::ldpc::decode_bit_flipping(&matrix, received, crate::ldpc::DEFAULT_MAX_ITERATIONS);
	let nc = bits_to_value(&result.codeword[..PART1_DATA_BITS as usize]);
	if color_number_for_nc(nc).is_none() {
		return Err(DecodeError::MetadataInvalid("Nc field decoded to an out-of-range value"));
	}
	Ok(Part1 {
		nc,
	})
}

fn part2_to_bits(part2: Part2) -> Vec<bool> {
	let mut bits = Vec::with_capacity(PART2_DATA_BITS as usize);
	bits.extend(value_to_bits(part2.mask_type as u32, MASK_INDEX_BITS));
	bits.extend(value_to_bits(part2.default_mode as u32, DEFAULT_MODE_BITS));
	bits.extend(value_to_bits(part2.ecc_level as u32, ECC_LEVEL_BITS));
	bits.extend(value_to_bits(part2.version_x - 1, VERSION_BITS));
	bits.extend(value_to_bits(part2.version_y - 1, VERSION_BITS));
	bits.extend(value_to_bits(part2.slave_mask as u32, SLAVE_MASK_BITS));
	bits
}

fn bits_to_part2(bits: &[bool]) -> Part2 {
	let mut offset = 0;
	let mut take = |width: u32| {
		let value = bits_to_value(&bits[offset..offset + width as usize]);
		offset += width as usize;
		value
	};
	let mask_type = take(MASK_INDEX_BITS) as u8;
	let default_mode = take(DEFAULT_MODE_BITS) == 1;
	let ecc_level = take(ECC_LEVEL_BITS) as u8;
	let version_x = take(VERSION_BITS) + 1;
	let version_y = take(VERSION_BITS) + 1;
	let slave_mask = take(SLAVE_MASK_BITS) as u8;
	Part2 {
		mask_type,
		default_mode,
		ecc_level,
		version_x,
		version_y,
		slave_mask,
	}
}

/// Builds Part-2's codeword and writes it into `positions`, starting right
/// after Part-1's span.
pub fn encode_part2(symbol: &mut Symbol, positions: &[(u32, u32)], part2: Part2, color_number: u32) -> Result<(), EncodeError> {
	let data = part2_to_bits(part2);
	let n = codeword_len(PART2_DATA_BITS, PART2_WC, PART2_WR);
	if positions.len() < n {
		return Err(EncodeError::DataTooLarge {
			required_bits: n,
			available_bits: positions.len(),
		});
	}
	let m = n - PART2_DATA_BITS as usize;
	let matrix = ParityMatrix::build(n, m, PART2_WC as usize, PART2_WR as usize, PART2_SEED);
	let codeword = matrix.encode_systematic(&data);
	write_bits(symbol, &positions[..n], &codeword, color_number);
	Ok(())
}

/// Reads and LDPC-decodes Part-2 back from `positions`.
pub fn decode_part2(symbol: &Symbol, positions: &[(u32, u32)], color_number: u32) -> Result<Part2, DecodeError> {
	let n = codeword_len(PART2_DATA_BITS, PART2_WC, PART2_WR);
	if positions.len() < n {
		return Err(DecodeError::MetadataInvalid("part-2 ring capacity too small"));
	}
	let received = read_bits(symbol, &positions[..n], color_number);
	decode_part2_bits(&received)
}

/// LDPC-decodes Part-2 from an already-sampled bit vector, the Part-2
/// counterpart of [`decode_part1_bits`].
pub fn decode_part2_bits(received: &[bool]) -> Result<Part2, DecodeError> {
	let n = codeword_len(PART2_DATA_BITS, PART2_WC, PART2_WR);
	if received.len() != n {
		return Err(DecodeError::MetadataInvalid("part-2 codeword has the wrong length"));
	}
	let m = n - PART2_DATA_BITS as usize;
	let matrix = ParityMatrix::build(n, m, PART2_WC as usize, PART2_WR as usize, PART2_SEED);
	let result = crate::ldpc::decode_bit_flipping(&matrix, received, crate::ldpc::DEFAULT_MAX_ITERATIONS);
	Ok(bits_to_part2(&result.codeword[..PART2_DATA_BITS as usize]))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn nc_round_trips_every_valid_color_number() {
		for &n in &[4u32, 8, 16, 32, 64, 128] {
			let nc = nc_for_color_number(n).unwrap();
			assert_eq!(color_number_for_nc(nc), Some(n));
		}
	}

	#[test]
	fn metadata_ring_has_no_duplicate_positions() {
		let positions = metadata_ring_positions(37, 37);
		let unique: HashSet<_> = positions.iter().collect();
		assert_eq!(unique.len(), positions.len());
	}

	#[test]
	fn metadata_ring_avoids_the_finder_footprints() {
		let positions = metadata_ring_positions(37, 37);
		for &(x, y) in &positions {
			let in_top_left = x < FINDER_SIZE && y < FINDER_SIZE;
			let in_top_right = x >= 37 - FINDER_SIZE && y < FINDER_SIZE;
			let in_bottom_left = x < FINDER_SIZE && y >= 37 - FINDER_SIZE;
			assert!(!in_top_left && !in_top_right && !in_bottom_left);
		}
	}

	#[test]
	fn part1_round_trips_through_encode_and_decode() {
		let mut symbol = Symbol::new_empty(5, 5, 3, 5);
		let positions = metadata_ring_positions(symbol.width, symbol.height);
		let part1 = Part1 {
			nc: 2,
		};
		encode_part1(&mut symbol, &positions, part1, 8).unwrap();
		let decoded = decode_part1(&symbol, &positions, 8).unwrap();
		assert_eq!(decoded, part1);
	}

	#[test]
	fn part2_round_trips_through_encode_and_decode() {
		let mut symbol = Symbol::new_empty(5, 5, 3, 5);
		let positions = metadata_ring_positions(symbol.width, symbol.height);
		let n1 = codeword_len(PART1_DATA_BITS, PART1_WC, PART1_WR);
		let part2 = Part2 {
			mask_type: 5,
			default_mode: true,
			ecc_level: 7,
			version_x: 5,
			version_y: 5,
			slave_mask: 0b1010,
		};
		encode_part2(&mut symbol, &positions[n1..], part2, 8).unwrap();
		let decoded = decode_part2(&symbol, &positions[n1..], 8).unwrap();
		assert_eq!(decoded, part2);
	}

	#[test]
	fn too_few_positions_reports_insufficient_capacity() {
		let mut symbol = Symbol::new_empty(5, 5, 3, 5);
		let positions = metadata_ring_positions(symbol.width, symbol.height);
		let part2 = Part2 {
			mask_type: 0,
			default_mode: false,
			ecc_level: 0,
			version_x: 1,
			version_y: 1,
			slave_mask: 0,
		};
		let result = encode_part2(&mut symbol, &positions[..5], part2, 8);
		assert!(result.is_err());
	}
}
