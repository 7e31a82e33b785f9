//! Synthetic decode: bypasses camera-image pattern detection entirely by
//! sampling module centers straight from a bitmap this crate's own encoder
//! produced, per §4.8. A test and fixture tool, not a camera-image decoder.

use super::{DecodeMode, DecodeStatus};
use crate::bitmap::Bitmap;
use crate::bitstream::bits_to_bytes;
use crate::encoder::{data_seed, read_codeword, SyntheticParams, QUIET_ZONE_MODULES};
use crate::encoding_modes::read_bitstream;
use crate::error::DecodeError;
use crate::ldpc::table::wc_wr_for_level;
use crate::ldpc::{decode_bit_flipping, ParityMatrix, DEFAULT_MAX_ITERATIONS};
use crate::palette::Palette;
use crate::placement::mask;
use crate::placement::metadata::{Part1, Part2};
use crate::placement::{self, LayoutParams};
use crate::symbol::{Module, Symbol};

/// Module-center sampling formula for a bitmap this crate's own encoder
/// rasterized: the same `(quiet_zone * module_size + module_size / 2) +
/// index * module_size` arithmetic [`crate::encoder::rasterize`]'s grid
/// implies, so sampling and rasterization agree exactly regardless of
/// `module_size`.
fn module_center(index: u32, module_size: u32) -> u32 {
	(QUIET_ZONE_MODULES + index) * module_size + module_size / 2
}

/// Decodes a bitmap this crate's own [`crate::encoder::Encoder`] produced,
/// given the `params` it returned from
/// [`crate::encoder::Encoder::synthetic_params`]. Skips geometry detection,
/// metadata readback, and color classification entirely — every value
/// `params` doesn't already carry (mask pattern aside, which it does) is
/// re-derived the same deterministic way the encoder built it, so the only
/// failure modes left are LDPC residual errors or `params` not actually
/// matching `bitmap`.
pub fn decode_synthetic(bitmap: Bitmap, params: &SyntheticParams, mode: DecodeMode) -> (Option<Vec<u8>>, DecodeStatus) {
	match decode_synthetic_inner(&bitmap, params, mode) {
		Ok(result) => result,
		Err(err) => {
			log::warn!("decoder::synthetic: {err}");
			(None, DecodeStatus::NotDecodable)
		}
	}
}

fn decode_synthetic_inner(
	bitmap: &Bitmap,
	params: &SyntheticParams,
	mode: DecodeMode,
) -> Result<(Option<Vec<u8>>, DecodeStatus), DecodeError> {
	let total_width = params.width_modules + 2 * QUIET_ZONE_MODULES;
	let total_height = params.height_modules + 2 * QUIET_ZONE_MODULES;
	if bitmap.width != total_width * params.module_size || bitmap.height != total_height * params.module_size {
		return Err(DecodeError::SyntheticGeometryMismatch("bitmap dimensions don't match params"));
	}

	let version_x = Symbol::side_to_version(params.width_modules)
		.ok_or(DecodeError::SyntheticGeometryMismatch("width_modules isn't a valid version side length"))?;
	let version_y = Symbol::side_to_version(params.height_modules)
		.ok_or(DecodeError::SyntheticGeometryMismatch("height_modules isn't a valid version side length"))?;

	let (wc, wr) = wc_wr_for_level(u32::from(params.ecc_level))
		.ok_or(DecodeError::SyntheticGeometryMismatch("ecc_level out of range"))?;

	let mut throwaway = Symbol::new_empty(version_x, version_y, wc, wr);
	let layout = placement::layout_symbol(
		&mut throwaway,
		LayoutParams {
			color_number: params.color_number,
			part1: Part1 {
				nc: crate::placement::metadata::nc_for_color_number(params.color_number)
					.ok_or(DecodeError::SyntheticGeometryMismatch("unsupported color_number"))?,
			},
			part2: Part2 {
				mask_type: params.mask_type,
				default_mode: true,
				ecc_level: params.ecc_level,
				version_x,
				version_y,
				slave_mask: 0,
			},
		},
	)
	.map_err(|_| DecodeError::SyntheticGeometryMismatch("layout doesn't fit the requested geometry"))?;

	let palette = Palette::default_for(params.color_number)
		.ok_or(DecodeError::SyntheticGeometryMismatch("unsupported color_number"))?;

	let nc = crate::placement::metadata::nc_for_color_number(params.color_number)
		.ok_or(DecodeError::SyntheticGeometryMismatch("unsupported color_number"))?;
	let bits_per_module = nc + 1;

	let mut symbol = Symbol::new_empty(version_x, version_y, wc, wr);
	for &(x, y) in &layout.data_scan_order {
		let px = module_center(x, params.module_size);
		let py = module_center(y, params.module_size);
		let rgba = bitmap.get_pixel(px, py);
		let index = classify_exact(&palette, [rgba[0], rgba[1], rgba[2]]);
		let module_index = symbol.module_index(x, y);
		symbol.matrix[module_index] = Module::Data(index);
		symbol.data_map[module_index] = true;
	}

	mask::apply_mask(&mut symbol, params.mask_type);

	let capacity = layout.data_scan_order.len() * bits_per_module as usize;
	let per_wr = capacity / wr as usize;
	let n = per_wr * wr as usize;
	let k = per_wr * (wr - wc) as usize;
	let m = n - k;

	let received = read_codeword(&symbol, &layout.data_scan_order, n, bits_per_module);
	let seed = data_seed(wc, wr, n);
	let matrix = ParityMatrix::build(n, m, wc as usize, wr as usize, seed);
	let result = decode_bit_flipping(&matrix, &received, DEFAULT_MAX_ITERATIONS);

	if !result.converged && mode == DecodeMode::Normal {
		return Ok((None, DecodeStatus::NotDecodable));
	}

	let payload = &result.codeword[..k];
	let bytes = bits_to_bytes(payload);
	match read_bitstream(&bytes) {
		Ok(data) => {
			let status = if result.converged { DecodeStatus::FullyDecoded } else { DecodeStatus::PartlyDecoded };
			Ok((Some(data), status))
		}
		Err(_) if mode == DecodeMode::Compatible => Ok((None, DecodeStatus::PartlyDecoded)),
		Err(_) => Ok((None, DecodeStatus::NotDecodable)),
	}
}

/// Nearest-palette-color classification by plain Euclidean RGB distance.
/// Synthetic decode samples module centers of a bitmap this crate's own
/// rasterizer painted with flat, unblended blocks, so exact or
/// near-exact matches are the only case that needs handling — no LAB
/// conversion or k-d tree is warranted for it.
fn classify_exact(palette: &Palette, rgb: [u8; 3]) -> u8 {
	(0..palette.len())
		.min_by_key(|&index| {
			let color = palette.get(index);
			let dr = i32::from(color.r) - i32::from(rgb[0]);
			let dg = i32::from(color.g) - i32::from(rgb[1]);
			let db = i32::from(color.b) - i32::from(rgb[2]);
			dr * dr + dg * dg + db * db
		})
		.unwrap_or(0) as u8
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::encoder::Encoder;

	#[test]
	fn round_trips_a_short_message_bit_exactly() {
		let mut encoder = Encoder::new(8, 1).unwrap();
		encoder.set_module_size(4).unwrap();
		encoder.generate(b"synthetic round trip").unwrap();
		let bitmap = encoder.bitmap().unwrap();
		let params = encoder.synthetic_params().unwrap();

		let (data, status) = decode_synthetic(bitmap, &params, DecodeMode::Normal);
		assert_eq!(status, DecodeStatus::FullyDecoded);
		assert_eq!(data.as_deref(), Some(&b"synthetic round trip"[..]));
	}

	#[test]
	fn round_trips_across_every_color_number() {
		for &color_number in &crate::palette::VALID_COLOR_NUMBERS {
			let mut encoder = Encoder::new(color_number, 1).unwrap();
			encoder.set_module_size(4).unwrap();
			encoder.generate(b"N-color payload").unwrap();
			let bitmap = encoder.bitmap().unwrap();
			let params = encoder.synthetic_params().unwrap();

			let (data, status) = decode_synthetic(bitmap, &params, DecodeMode::Normal);
			assert_eq!(status, DecodeStatus::FullyDecoded, "color_number={color_number}");
			assert_eq!(data.as_deref(), Some(&b"N-color payload"[..]));
		}
	}

	#[test]
	fn mismatched_geometry_is_reported_as_not_decodable() {
		let mut encoder = Encoder::new(8, 1).unwrap();
		encoder.set_module_size(4).unwrap();
		encoder.generate(b"hi").unwrap();
		let bitmap = encoder.bitmap().unwrap();
		let mut params = encoder.synthetic_params().unwrap();
		params.module_size += 1;

		let (data, status) = decode_synthetic(bitmap, &params, DecodeMode::Normal);
		assert_eq!(status, DecodeStatus::NotDecodable);
		assert!(data.is_none());
	}

	#[test]
	fn forced_mask_round_trips_through_synthetic_decode() {
		let mut encoder = Encoder::new(16, 1).unwrap();
		encoder.set_module_size(4).unwrap();
		encoder.set_force_mask(5).unwrap();
		encoder.generate(b"masked payload").unwrap();
		let bitmap = encoder.bitmap().unwrap();
		let params = encoder.synthetic_params().unwrap();
		assert_eq!(params.mask_type, 5);

		let (data, status) = decode_synthetic(bitmap, &params, DecodeMode::Normal);
		assert_eq!(status, DecodeStatus::FullyDecoded);
		assert_eq!(data.as_deref(), Some(&b"masked payload"[..]));
	}
}
