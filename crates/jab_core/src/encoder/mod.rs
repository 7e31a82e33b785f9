//! Encoder orchestration: segmentation, version/ECC selection, LDPC
//! encoding, structural placement, masking, and rasterization.
//!
//! One logical payload is split across `symbol_number` symbols (the first
//! being the master, the rest docked to its right in a simple chain), each
//! independently sized, LDPC-protected, placed, and masked by
//! [`Encoder::encode_one_symbol`].

use crate::bitmap::Bitmap;
use crate::bitstream::bytes_to_bits;
use crate::encoding_modes::write_bitstream;
use crate::error::EncodeError;
use crate::ldpc::table::ECCLEVEL_TABLE;
use crate::ldpc::{level_for_wc_wr, ParityMatrix};
use crate::palette::Palette;
use crate::placement::mask::MASK_COUNT;
use crate::placement::metadata::nc_for_color_number;
use crate::placement::{self, metadata, LayoutParams, Part1, Part2};
use crate::symbol::{DockSide, Docking, Module, Symbol};

/// Quiet zone width, in modules, surrounding the rasterized assembly on
/// every side. Matches the encoder's synthetic-decode bypass assumption.
pub const QUIET_ZONE_MODULES: u32 = 4;

/// Highest symbol version this crate will try before giving up on capacity.
const MAX_VERSION: u32 = 32;

/// Geometry and encoding parameters needed to bypass camera detection and
/// decode a bitmap this crate produced directly, per
/// [`decode_synthetic`](crate::decoder::decode_synthetic).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticParams {
	/// Palette size used by the master symbol.
	pub color_number: u32,
	/// ECC level table index the master symbol's data codeword was built
	/// with.
	pub ecc_level: u8,
	/// Pixels per module.
	pub module_size: u32,
	/// Master symbol width, in modules.
	pub width_modules: u32,
	/// Master symbol height, in modules.
	pub height_modules: u32,
	/// Mask pattern index the master symbol was masked with.
	pub mask_type: u8,
}

/// Builds a (possibly multi-symbol) JABCode from a byte payload.
#[derive(Debug, Clone)]
pub struct Encoder {
	color_number: u32,
	symbol_number: u32,
	module_size: u32,
	forced_ecc_level: Option<u8>,
	forced_mask: Option<u8>,
	symbols: Vec<Symbol>,
	palette: Option<Palette>,
}

impl Encoder {
	/// Creates an encoder for a `color_number`-color palette spread across
	/// `symbol_number` symbols. `symbol_number > 1` chains the extra symbols
	/// to the right of the master; see the crate's design notes for the
	/// scope of multi-symbol support.
	pub fn new(color_number: u32, symbol_number: u32) -> Result<Self, EncodeError> {
		if !crate::palette::VALID_COLOR_NUMBERS.contains(&color_number) {
			return Err(EncodeError::InvalidColorNumber(color_number));
		}
		if !(1..=61).contains(&symbol_number) {
			return Err(EncodeError::InvalidSymbolCount(symbol_number));
		}
		Ok(Self {
			color_number,
			symbol_number,
			module_size: 4,
			forced_ecc_level: None,
			forced_mask: None,
			symbols: Vec::new(),
			palette: None,
		})
	}

	/// Sets the pixel size of one module. Must be called before
	/// [`Encoder::generate`] to take effect.
	pub fn set_module_size(&mut self, module_size: u32) -> Result<(), EncodeError> {
		if module_size == 0 {
			return Err(EncodeError::InvalidModuleSize);
		}
		self.module_size = module_size;
		Ok(())
	}

	/// Forces a specific ECC level (`0..=9`) instead of the per-symbol
	/// capacity search.
	pub fn set_ecc_level(&mut self, level: u32) -> Result<(), EncodeError> {
		if level > 9 {
			return Err(EncodeError::EccLevelOutOfRange(level));
		}
		self.forced_ecc_level = Some(level as u8);
		Ok(())
	}

	/// Forces a specific mask pattern (`0..8`) instead of the penalty-score
	/// search.
	pub fn set_force_mask(&mut self, mask: u8) -> Result<(), EncodeError> {
		if mask >= MASK_COUNT {
			return Err(EncodeError::ForcedMaskOutOfRange(mask));
		}
		self.forced_mask = Some(mask);
		Ok(())
	}

	/// Segments, LDPC-encodes, places, and masks `data` across this
	/// encoder's symbols.
	pub fn generate(&mut self, data: &[u8]) -> Result<(), EncodeError> {
		let nc = nc_for_color_number(self.color_number).expect("color_number validated in Encoder::new");
		let bits_per_module = nc + 1;

		let bitstream_bytes = write_bitstream(data);
		let data_bits = bytes_to_bits(&bitstream_bytes);

		let chunk_lengths = split_evenly(data_bits.len(), self.symbol_number as usize);

		log::info!(
			"jab_core::encoder: segmented {} bytes into {} bits across {} symbol(s)",
			data.len(),
			data_bits.len(),
			self.symbol_number
		);

		let mut symbols = Vec::with_capacity(self.symbol_number as usize);
		let mut offset = 0;
		for &chunk_len in &chunk_lengths {
			let chunk = &data_bits[offset..offset + chunk_len];
			offset += chunk_len;
			symbols.push(self.encode_one_symbol(chunk, nc, bits_per_module)?);
		}

		for index in 1..symbols.len() {
			symbols[index].docking = Docking {
				host: Some(index - 1),
				side: Some(DockSide::Right),
			};
			symbols[index - 1].slaves[3] = Some(index);
		}

		self.palette = Palette::default_for(self.color_number);
		self.symbols = symbols;
		Ok(())
	}

	/// Finds the smallest square version that can hold `chunk`, LDPC-encodes
	/// it, lays out and masks the resulting symbol.
	fn encode_one_symbol(&self, chunk: &[bool], nc: u32, bits_per_module: u32) -> Result<Symbol, EncodeError> {
		let mut largest_capacity_bits = None;
		for version in 1..=MAX_VERSION {
			let capacity_bits = match self.probe_capacity(version, nc) {
				Ok(modules) => modules * bits_per_module as usize,
				Err(_) => continue,
			};
			largest_capacity_bits = Some(capacity_bits);

			let Some((level, wc, wr, n, k)) = self.fit_ecc(capacity_bits, chunk.len()) else {
				continue;
			};
			let m = n - k;

			let mut symbol = Symbol::new_empty(version, version, wc, wr);
			let part1 = Part1 {
				nc,
			};
			let provisional_part2 = Part2 {
				mask_type: 0,
				default_mode: self.forced_ecc_level.is_none() && self.forced_mask.is_none(),
				ecc_level: level,
				version_x: version,
				version_y: version,
				slave_mask: 0,
			};
			let layout = placement::layout_symbol(
				&mut symbol,
				LayoutParams {
					color_number: self.color_number,
					part1,
					part2: provisional_part2,
				},
			)?;

			let mut padded = chunk.to_vec();
			padded.resize(k, false);
			let seed = data_seed(wc, wr, n);
			let matrix = ParityMatrix::build(n, m, wc as usize, wr as usize, seed);
			let codeword = matrix.encode_systematic(&padded);
			write_codeword(&mut symbol, &layout.data_scan_order, &codeword, bits_per_module);

			let chosen_mask = match self.forced_mask {
				Some(mask) => {
					placement::mask::apply_mask(&mut symbol, mask);
					symbol.mask_type = Some(mask);
					mask
				}
				None => placement::mask::choose_and_apply_best_mask(&mut symbol, self.color_number),
			};

			let final_part2 = Part2 {
				mask_type: chosen_mask,
				..provisional_part2
			};
			metadata::encode_part2(
				&mut symbol,
				&layout.metadata_ring[layout.part1_len..],
				final_part2,
				self.color_number,
			)?;

			return Ok(symbol);
		}

		match largest_capacity_bits {
			Some(capacity) => Err(EncodeError::NoFeasibleEcc {
				net_data_length: chunk.len(),
				capacity,
			}),
			None => Err(EncodeError::DataTooLarge {
				required_bits: chunk.len(),
				available_bits: 0,
			}),
		}
	}

	/// Lays out a throwaway symbol of this version just to count its data
	/// module capacity; the real layout is rebuilt once `(wc, wr)` is known.
	fn probe_capacity(&self, version: u32, nc: u32) -> Result<usize, EncodeError> {
		let mut symbol = Symbol::new_empty(version, version, 3, 5);
		let layout = placement::layout_symbol(
			&mut symbol,
			LayoutParams {
				color_number: self.color_number,
				part1: Part1 {
					nc,
				},
				part2: Part2 {
					mask_type: 0,
					default_mode: true,
					ecc_level: 0,
					version_x: version,
					version_y: version,
					slave_mask: 0,
				},
			},
		)?;
		Ok(layout.data_scan_order.len())
	}

	/// Picks `(level, wc, wr, n, k)` for `capacity_bits` modules-worth of
	/// bits and `net_data_length` payload bits, honoring a forced ECC level
	/// if one was set. Mirrors `getOptimalECC`'s full-capacity alignment
	/// (`n`/`k` always use the whole `capacity_bits / wr` quotient) but
	/// confines the search to [`ECCLEVEL_TABLE`]'s 10 rows so the resulting
	/// level always has a valid metadata index.
	fn fit_ecc(&self, capacity_bits: usize, net_data_length: usize) -> Option<(u8, u32, u32, usize, usize)> {
		if let Some(level) = self.forced_ecc_level {
			let (wc, wr) = ECCLEVEL_TABLE[level as usize];
			let per_wr = capacity_bits / wr as usize;
			let n = per_wr * wr as usize;
			let k = per_wr * (wr - wc) as usize;
			return (k >= net_data_length).then_some((level, wc, wr, n, k));
		}

		let mut best: Option<(u8, u32, u32, usize, usize)> = None;
		let mut best_slack = capacity_bits as i64;
		for (level, &(wc, wr)) in ECCLEVEL_TABLE.iter().enumerate() {
			let per_wr = capacity_bits / wr as usize;
			let n = per_wr * wr as usize;
			let k = per_wr * (wr - wc) as usize;
			if k < net_data_length {
				continue;
			}
			let slack = k as i64 - net_data_length as i64;
			if slack < best_slack {
				best_slack = slack;
				best = Some((level as u8, wc, wr, n, k));
			}
		}
		best
	}

	/// Rasterizes the generated symbols into an RGBA bitmap, `None` before
	/// [`Encoder::generate`] has run.
	pub fn bitmap(&self) -> Option<Bitmap> {
		let palette = self.palette.as_ref()?;
		if self.symbols.is_empty() {
			return None;
		}
		Some(rasterize(&self.symbols, palette, self.module_size))
	}

	/// Parameters for [`crate::decoder::decode_synthetic`] to bypass camera
	/// detection against this encoder's bitmap. Only supported for a single
	/// (master-only) symbol; multi-symbol synthetic decode is out of scope.
	pub fn synthetic_params(&self) -> Option<SyntheticParams> {
		if self.symbol_number != 1 {
			return None;
		}
		let symbol = self.symbols.first()?;
		let ecc_level = level_for_wc_wr(symbol.wc, symbol.wr)?;
		Some(SyntheticParams {
			color_number: self.color_number,
			ecc_level: ecc_level as u8,
			module_size: self.module_size,
			width_modules: symbol.width,
			height_modules: symbol.height,
			mask_type: symbol.mask_type?,
		})
	}
}

/// Splits `total` into `parts` chunk lengths, front-loading the remainder
/// one bit at a time so earlier symbols (closer to the master) never carry
/// less than later ones.
fn split_evenly(total: usize, parts: usize) -> Vec<usize> {
	let base = total / parts;
	let remainder = total % parts;
	(0..parts).map(|index| base + usize::from(index < remainder)).collect()
}

/// Derives a deterministic LDPC construction seed from the code's shape so
/// encoder and decoder agree without transmitting the matrix.
pub(crate) fn data_seed(wc: u32, wr: u32, n: usize) -> u64 {
	let mut seed = 0x9E37_79B9_7F4A_7C15u64;
	seed = seed.wrapping_mul(31).wrapping_add(wc as u64);
	seed = seed.wrapping_mul(31).wrapping_add(wr as u64);
	seed = seed.wrapping_mul(31).wrapping_add(n as u64);
	seed
}

/// Writes `codeword`'s bits into `scan_order`, `bits_per_module` bits per
/// module, MSB-first; any modules beyond `codeword.len()` get a filler
/// value of 0 and are never referenced by the matching decode.
pub(crate) fn write_codeword(symbol: &mut Symbol, scan_order: &[(u32, u32)], codeword: &[bool], bits_per_module: u32) {
	let modules_needed = codeword.len().div_ceil(bits_per_module as usize);
	for (index, &(x, y)) in scan_order.iter().enumerate() {
		let module_index = symbol.module_index(x, y);
		if index >= modules_needed {
			symbol.matrix[module_index] = Module::Data(0);
			continue;
		}
		let start = index * bits_per_module as usize;
		let mut value = 0u8;
		for bit_index in start..start + bits_per_module as usize {
			let bit = codeword.get(bit_index).copied().unwrap_or(false);
			value = (value << 1) | u8::from(bit);
		}
		symbol.matrix[module_index] = Module::Data(value);
	}
}

/// Reads `n` codeword bits back out of `scan_order`, inverse of
/// [`write_codeword`].
pub(crate) fn read_codeword(symbol: &Symbol, scan_order: &[(u32, u32)], n: usize, bits_per_module: u32) -> Vec<bool> {
	let modules_needed = n.div_ceil(bits_per_module as usize);
	let mut bits = Vec::with_capacity(n);
	for &(x, y) in scan_order.iter().take(modules_needed) {
		let value = symbol.matrix[symbol.module_index(x, y)].index().unwrap_or(0);
		for bit in (0..bits_per_module).rev() {
			bits.push((value >> bit) & 1 == 1);
		}
	}
	bits.truncate(n);
	bits
}

/// Tiles `symbols` left to right into one RGBA bitmap with a quiet zone
/// border, each module painted from `palette`.
fn rasterize(symbols: &[Symbol], palette: &Palette, module_size: u32) -> Bitmap {
	let total_width_modules: u32 = symbols.iter().map(|s| s.width).sum::<u32>() + 2 * QUIET_ZONE_MODULES;
	let total_height_modules: u32 = symbols.iter().map(|s| s.height).max().unwrap_or(0) + 2 * QUIET_ZONE_MODULES;

	let mut bitmap = Bitmap::new(total_width_modules * module_size, total_height_modules * module_size);
	let mut x_cursor = QUIET_ZONE_MODULES;

	for symbol in symbols {
		for y in 0..symbol.height {
			for x in 0..symbol.width {
				let index = symbol.matrix[symbol.module_index(x, y)].index().unwrap_or(0);
				let color = palette.get(index as usize);
				let px = (x_cursor + x) * module_size;
				let py = QUIET_ZONE_MODULES * module_size + y * module_size;
				bitmap.fill_block(px, py, module_size, [color.r, color.g, color.b, 255]);
			}
		}
		x_cursor += symbol.width;
	}

	bitmap
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_invalid_color_number() {
		assert!(Encoder::new(5, 1).is_err());
	}

	#[test]
	fn rejects_out_of_range_symbol_count() {
		assert!(Encoder::new(8, 0).is_err());
		assert!(Encoder::new(8, 62).is_err());
	}

	#[test]
	fn set_module_size_rejects_zero() {
		let mut encoder = Encoder::new(8, 1).unwrap();
		assert!(encoder.set_module_size(0).is_err());
		assert!(encoder.set_module_size(4).is_ok());
	}

	#[test]
	fn set_force_mask_rejects_out_of_range() {
		let mut encoder = Encoder::new(8, 1).unwrap();
		assert!(encoder.set_force_mask(8).is_err());
		assert!(encoder.set_force_mask(3).is_ok());
	}

	#[test]
	fn generate_produces_a_bitmap_and_synthetic_params() {
		let mut encoder = Encoder::new(8, 1).unwrap();
		encoder.generate(b"hi").unwrap();
		let bitmap = encoder.bitmap().unwrap();
		let params = encoder.synthetic_params().unwrap();
		assert_eq!(params.color_number, 8);
		assert_eq!(bitmap.width, (params.width_modules + 2 * QUIET_ZONE_MODULES) * params.module_size);
	}

	#[test]
	fn multi_symbol_generate_docks_slaves_to_the_right() {
		let mut encoder = Encoder::new(8, 3).unwrap();
		encoder.generate(b"multi symbol payload").unwrap();
		assert_eq!(encoder.symbols.len(), 3);
		assert_eq!(encoder.symbols[0].slaves[3], Some(1));
		assert_eq!(encoder.symbols[1].docking.host, Some(0));
		assert!(encoder.synthetic_params().is_none());
	}

	#[test]
	fn split_evenly_front_loads_the_remainder() {
		assert_eq!(split_evenly(10, 3), vec![4, 3, 3]);
		assert_eq!(split_evenly(9, 3), vec![3, 3, 3]);
	}

	#[test]
	fn codeword_round_trips_through_scan_order() {
		let mut symbol = Symbol::new_empty(1, 1, 3, 5);
		let scan_order: Vec<(u32, u32)> = (0..symbol.width).map(|x| (x, 0)).collect();
		let codeword = vec![true, false, true, true, false, false, true, false];
		write_codeword(&mut symbol, &scan_order, &codeword, 3);
		let read_back = read_codeword(&symbol, &scan_order, codeword.len(), 3);
		assert_eq!(read_back, codeword);
	}
}
