//! Decoder orchestration: geometry recovery, metadata readback, color
//! classification, LDPC decoding, and bitstream parsing — §4.6.
//!
//! Camera-image pattern detection and perspective rectification are out of
//! scope (spec §1); [`decode`]/[`decode_ex`] instead assume an already
//! axis-aligned, undistorted bitmap (the common case for a digitally
//! produced or re-rasterized code) and locate the module grid by searching
//! for a module size the top-left finder pattern's known bullseye ring
//! confirms, rather than by full corner-pattern detection under arbitrary
//! rotation/perspective. [`synthetic::decode_synthetic`] bypasses detection
//! entirely, given the geometry an encoder already produced.

pub mod classify;
pub mod synthetic;

pub use classify::ClassifierMode;
pub use synthetic::decode_synthetic;

use crate::bitmap::Bitmap;
use crate::bitstream::bits_to_bytes;
use crate::color::Rgb;
use crate::encoding_modes::read_bitstream;
use crate::error::DecodeError;
use crate::ldpc::wc_wr_for_level;
use crate::ldpc::ParityMatrix;
use crate::palette::adaptive::{self, ObservationCollector};
use crate::palette::Palette;
use crate::placement::finder::{self, FINDER_SIZE};
use crate::placement::metadata::{self, Part1, Part2};
use crate::placement::{self, mask, LayoutParams};
use crate::symbol::{Module, Symbol};
use classify::Classifier;

/// Width, in modules, of the quiet zone surrounding a rasterized symbol.
/// Matches [`crate::encoder::QUIET_ZONE_MODULES`]; decode doesn't depend on
/// the encoder module directly, since a real capture need not have come
/// from this crate's own encoder, but the constant value is shared.
pub const QUIET_ZONE_MODULES: u32 = crate::encoder::QUIET_ZONE_MODULES;

/// Largest module pixel size [`decode`]'s geometry search tries before
/// giving up. Bounded the same way encode bounds module count (§5: bounded
/// work per call).
const MAX_MODULE_SIZE_SEARCH: u32 = 64;

/// Whether the caller wants a best-effort partial result or strict success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
	/// Any LDPC residual error or parse failure fails the whole decode.
	#[default]
	Normal,
	/// LDPC residual errors are tolerated; the decode is reported as
	/// partially decoded (status 2) rather than failed, and whatever the
	/// bitstream parser could recover is still returned.
	Compatible,
}

/// Outcome status, matching spec §4.6/§7's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum DecodeStatus {
	/// The module grid couldn't be located in the bitmap at all.
	NotDetectable = 0,
	/// Geometry was found but metadata or the data codeword didn't decode.
	NotDecodable = 1,
	/// `DecodeMode::Compatible` only: LDPC residual errors were tolerated.
	PartlyDecoded = 2,
	/// Full, LDPC-clean decode.
	FullyDecoded = 3,
}

/// Black/white luminance-threshold parameters for reading the metadata ring
/// straight off sampled pixels, before any palette is known. Named after
/// spec §6's `NcThresholds` test knob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NcThresholds {
	/// Average R/G/B value at or above which a sample reads as "white"
	/// (the high metadata bit).
	pub black: u8,
	/// Per-channel standard deviation above which a sample is logged as an
	/// ambiguous read (still classified, just flagged).
	pub stddev: f64,
}

impl Default for NcThresholds {
	fn default() -> Self {
		Self {
			black: 128,
			stddev: 40.0,
		}
	}
}

/// Every test knob spec §6 enumerates, gathered as explicit per-call fields
/// rather than process-wide globals (§5, §9's redesign note).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecodeOptions {
	/// Skips Part-1 readback and assumes this `Nc` value instead.
	pub force_nc: Option<u32>,
	/// Skips the ECC-level-driven `(wc, wr)` lookup and uses this pair
	/// instead.
	pub force_ecc: Option<(u32, u32)>,
	/// Skips reading the mask index from Part-2 and unmasks with this
	/// pattern instead.
	pub force_mask: Option<u8>,
	/// When `true` (the only mode this crate's encoder ever produces),
	/// always uses the deterministic default palette rather than reading
	/// explicit palette-calibration cells for `color_number >= 16`. Kept as
	/// a field for interface parity with spec §6; calibration-cell
	/// placement isn't implemented (see `DESIGN.md`), so setting this to
	/// `false` only emits a debug log, not different behavior.
	pub use_default_palette_high_color: bool,
	/// Luminance thresholds for metadata readback.
	pub nc_thresholds: NcThresholds,
	/// Distance metric used to classify data modules against the palette.
	pub classifier_mode: ClassifierMode,
	/// Enables per-module `log::debug!` classification traces.
	pub classifier_debug: bool,
	/// Applies a 3x3 median pre-filter to the bitmap before module center
	/// sampling (§4.6 step 1).
	pub median_prefilter: bool,
	/// Runs the adaptive palette correction pass (§4.7) before final data
	/// classification.
	pub adaptive_correction: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			force_nc: None,
			force_ecc: None,
			force_mask: None,
			use_default_palette_high_color: true,
			nc_thresholds: NcThresholds::default(),
			classifier_mode: ClassifierMode::default(),
			classifier_debug: false,
			median_prefilter: true,
			adaptive_correction: true,
		}
	}
}

/// Geometry, metadata, and payload for one decoded symbol, filled in by
/// [`decode_ex`]. Only the single master symbol is supported; multi-symbol
/// decode is out of scope here, matching [`crate::encoder::Encoder::synthetic_params`]'s
/// restriction on the encode side.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSymbol {
	/// Palette size this symbol was decoded against.
	pub color_number: u32,
	/// Module grid width.
	pub width: u32,
	/// Module grid height.
	pub height: u32,
	/// x-axis version.
	pub version_x: u32,
	/// y-axis version.
	pub version_y: u32,
	/// `(wc, wr)` LDPC parameters used for the data codeword.
	pub wc: u32,
	/// Row weight, see [`DecodedSymbol::wc`].
	pub wr: u32,
	/// Mask pattern index this symbol was masked with.
	pub mask_type: u8,
	/// Docked-slave presence bitmask read from Part-2.
	pub slave_mask: u8,
	/// Pixels per module, as recovered by geometry detection.
	pub module_size: u32,
}

/// Pixel geometry of one axis-aligned, undetected-yet symbol: where its
/// module grid starts and how big each module is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
	module_size: u32,
	quiet_zone: u32,
	symbol_width: u32,
	symbol_height: u32,
}

impl Geometry {
	fn pixel_center(&self, x: u32, y: u32) -> (u32, u32) {
		let px = (self.quiet_zone + x) * self.module_size + self.module_size / 2;
		let py = (self.quiet_zone + y) * self.module_size + self.module_size / 2;
		(px, py)
	}
}

fn luminance_bit(rgb: Rgb, black_threshold: u8) -> bool {
	let avg = (rgb.r as u32 + rgb.g as u32 + rgb.b as u32) / 3;
	avg >= black_threshold as u32
}

fn channel_stddev(rgb: Rgb) -> f64 {
	let values = [rgb.r as f64, rgb.g as f64, rgb.b as f64];
	let mean = values.iter().sum::<f64>() / 3.0;
	(values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 3.0).sqrt()
}

fn sample_rgb(bitmap: &Bitmap, px: u32, py: u32) -> Rgb {
	let pixel = bitmap.get_pixel(px, py);
	Rgb::new(pixel[0], pixel[1], pixel[2])
}

/// Searches module sizes (largest first, so a clean high-resolution capture
/// resolves without scanning every smaller candidate) for one whose
/// top-left finder pattern's bullseye ring matches the fixed alternating
/// black/white pattern every encoded symbol carries at FP0, regardless of
/// `color_number` (FP0 is always the black/white pair).
fn detect_geometry(bitmap: &Bitmap, thresholds: NcThresholds) -> Option<Geometry> {
	let quiet_zone = QUIET_ZONE_MODULES;

	for module_size in (1..=MAX_MODULE_SIZE_SEARCH).rev() {
		if bitmap.width % module_size != 0 || bitmap.height % module_size != 0 {
			continue;
		}
		let total_w = bitmap.width / module_size;
		let total_h = bitmap.height / module_size;
		if total_w <= 2 * quiet_zone || total_h <= 2 * quiet_zone {
			continue;
		}
		let symbol_width = total_w - 2 * quiet_zone;
		let symbol_height = total_h - 2 * quiet_zone;
		if Symbol::side_to_version(symbol_width).is_none() || Symbol::side_to_version(symbol_height).is_none() {
			continue;
		}

		let geometry = Geometry {
			module_size,
			quiet_zone,
			symbol_width,
			symbol_height,
		};
		if finder_pattern_matches(bitmap, &geometry, thresholds.black) {
			return Some(geometry);
		}
	}

	None
}

fn finder_pattern_matches(bitmap: &Bitmap, geometry: &Geometry, black_threshold: u8) -> bool {
	for dy in 0..FINDER_SIZE {
		for dx in 0..FINDER_SIZE {
			let (px, py) = geometry.pixel_center(dx, dy);
			if px >= bitmap.width || py >= bitmap.height {
				return false;
			}
			let rgb = sample_rgb(bitmap, px, py);
			let expected_white = finder::ring_index(dx, dy) % 2 == 1;
			if luminance_bit(rgb, black_threshold) != expected_white {
				return false;
			}
		}
	}
	true
}

/// Derives the finder/alignment/metadata/data-scan layout for a symbol of
/// the given module dimensions. The layout is a pure function of
/// `(width, height)` (ring geometry and alignment positions don't depend on
/// `color_number` or the metadata field values themselves), so this can run
/// before either is known — exactly the chicken-and-egg spec §4.6 describes
/// between "read Part-1" and "build the palette".
fn derive_layout(width: u32, height: u32) -> Option<placement::Layout> {
	let version_x = Symbol::side_to_version(width)?;
	let version_y = Symbol::side_to_version(height)?;
	let mut throwaway = Symbol::new_empty(version_x, version_y, 3, 5);
	placement::layout_symbol(
		&mut throwaway,
		LayoutParams {
			color_number: 8,
			part1: Part1 {
				nc: 2,
			},
			part2: Part2 {
				mask_type: 0,
				default_mode: true,
				ecc_level: 0,
				version_x,
				version_y,
				slave_mask: 0,
			},
		},
	)
	.ok()
}

fn sample_metadata_bits(
	bitmap: &Bitmap,
	geometry: &Geometry,
	positions: &[(u32, u32)],
	thresholds: NcThresholds,
	debug: bool,
) -> Vec<bool> {
	positions
		.iter()
		.map(|&(x, y)| {
			let (px, py) = geometry.pixel_center(x, y);
			let rgb = sample_rgb(bitmap, px, py);
			if debug && channel_stddev(rgb) > thresholds.stddev {
				log::debug!("decoder: ambiguous metadata sample at module ({x}, {y}): {rgb:?}");
			}
			luminance_bit(rgb, thresholds.black)
		})
		.collect()
}

/// Decodes `bitmap` with default options. Shorthand for
/// [`decode_with_options`].
pub fn decode(bitmap: &Bitmap, mode: DecodeMode) -> (Option<Vec<u8>>, DecodeStatus) {
	decode_with_options(bitmap, mode, &DecodeOptions::default())
}

/// Decodes `bitmap`, honoring every test knob in `options`.
pub fn decode_with_options(bitmap: &Bitmap, mode: DecodeMode, options: &DecodeOptions) -> (Option<Vec<u8>>, DecodeStatus) {
	decode_ex(bitmap, mode, options, &mut Vec::new())
}

/// Decodes `bitmap`, additionally filling `symbols_out` with the geometry
/// and metadata of the (single, master-only) decoded symbol on success.
pub fn decode_ex(
	bitmap: &Bitmap,
	mode: DecodeMode,
	options: &DecodeOptions,
	symbols_out: &mut Vec<DecodedSymbol>,
) -> (Option<Vec<u8>>, DecodeStatus) {
	let filtered;
	let bitmap = if options.median_prefilter {
		filtered = bitmap.median_filtered();
		&filtered
	} else {
		bitmap
	};

	let Some(geometry) = detect_geometry(bitmap, options.nc_thresholds) else {
		log::warn!("decoder: no module grid found in bitmap ({}x{})", bitmap.width, bitmap.height);
		return (None, DecodeStatus::NotDetectable);
	};

	let Some(layout) = derive_layout(geometry.symbol_width, geometry.symbol_height) else {
		return (None, DecodeStatus::NotDetectable);
	};

	match decode_symbol(bitmap, &geometry, &layout, mode, options) {
		Ok((data, status, decoded)) => {
			symbols_out.push(decoded);
			(data, status)
		}
		Err(_) => (None, DecodeStatus::NotDecodable),
	}
}

fn decode_symbol(
	bitmap: &Bitmap,
	geometry: &Geometry,
	layout: &placement::Layout,
	mode: DecodeMode,
	options: &DecodeOptions,
) -> Result<(Option<Vec<u8>>, DecodeStatus, DecodedSymbol), DecodeError> {
	let part1_positions = &layout.metadata_ring[..layout.part1_len];
	let part1_bits = sample_metadata_bits(bitmap, geometry, part1_positions, options.nc_thresholds, options.classifier_debug);
	let part1 = metadata::decode_part1_bits(&part1_bits)?;
	let nc = options.force_nc.unwrap_or(part1.nc);
	let color_number = metadata::color_number_for_nc(nc).ok_or(DecodeError::MetadataInvalid("Nc out of range"))?;
	log::debug!("decoder: part-1 decoded, color_number={color_number}");

	let part2_positions = &layout.metadata_ring[layout.part1_len..];
	let part2_bits = sample_metadata_bits(bitmap, geometry, part2_positions, options.nc_thresholds, options.classifier_debug);
	let part2 = metadata::decode_part2_bits(&part2_bits)?;
	log::debug!(
		"decoder: part-2 decoded, mask_type={}, ecc_level={}, slave_mask={:#06b}",
		part2.mask_type,
		part2.ecc_level,
		part2.slave_mask
	);

	let palette = Palette::default_for(color_number).ok_or(DecodeError::MetadataInvalid("unsupported color_number"))?;
	if !options.use_default_palette_high_color && color_number >= 16 {
		log::debug!("decoder: explicit palette-calibration cells aren't implemented; using the default palette anyway");
	}

	let bits_per_module = nc + 1;
	let scan_order = &layout.data_scan_order;

	let (mut symbol, collector) = classify_data_modules(
		bitmap,
		geometry,
		scan_order,
		&palette,
		options.classifier_mode,
		options.classifier_debug,
	);

	if options.adaptive_correction {
		let corrected = adaptive::correct(&palette, &collector);
		let (resampled, _) =
			classify_data_modules(bitmap, geometry, scan_order, &corrected, options.classifier_mode, options.classifier_debug);
		symbol = resampled;
	}

	let mask_type = options.force_mask.unwrap_or(part2.mask_type);
	mask::apply_mask(&mut symbol, mask_type);

	let (wc, wr) = options
		.force_ecc
		.or_else(|| wc_wr_for_level(u32::from(part2.ecc_level)))
		.ok_or(DecodeError::MetadataInvalid("ecc_level out of range"))?;

	let capacity = scan_order.len() * bits_per_module as usize;
	let per_wr = capacity / wr as usize;
	let n = per_wr * wr as usize;
	let k = per_wr * (wr - wc) as usize;
	let m = n - k;

	let received = crate::encoder::read_codeword(&symbol, scan_order, n, bits_per_module);
	let seed = crate::encoder::data_seed(wc, wr, n);
	let matrix = ParityMatrix::build(n, m, wc as usize, wr as usize, seed);
	let result = crate::ldpc::decode_bit_flipping(&matrix, &received, crate::ldpc::DEFAULT_MAX_ITERATIONS * 2);

	let decoded_symbol = DecodedSymbol {
		color_number,
		width: geometry.symbol_width,
		height: geometry.symbol_height,
		version_x: part2.version_x,
		version_y: part2.version_y,
		wc,
		wr,
		mask_type,
		slave_mask: part2.slave_mask,
		module_size: geometry.module_size,
	};

	if !result.converged {
		log::warn!("decoder: LDPC residual errors after {} iterations", result.iterations);
		if mode == DecodeMode::Normal {
			return Ok((None, DecodeStatus::NotDecodable, decoded_symbol));
		}
	}

	let payload = &result.codeword[..k];
	let bytes = bits_to_bytes(payload);
	match read_bitstream(&bytes) {
		Ok(data) => {
			let status = if result.converged { DecodeStatus::FullyDecoded } else { DecodeStatus::PartlyDecoded };
			Ok((Some(data), status, decoded_symbol))
		}
		Err(err) => {
			log::warn!("decoder: bitstream parse failed: {err}");
			if mode == DecodeMode::Compatible && !result.converged {
				Ok((None, DecodeStatus::PartlyDecoded, decoded_symbol))
			} else {
				Ok((None, DecodeStatus::NotDecodable, decoded_symbol))
			}
		}
	}
}

fn classify_data_modules(
	bitmap: &Bitmap,
	geometry: &Geometry,
	scan_order: &[(u32, u32)],
	palette: &Palette,
	classifier_mode: ClassifierMode,
	debug: bool,
) -> (Symbol, ObservationCollector) {
	let version_x = Symbol::side_to_version(geometry.symbol_width).unwrap_or(1);
	let version_y = Symbol::side_to_version(geometry.symbol_height).unwrap_or(1);
	let mut symbol = Symbol::new_empty(version_x, version_y, 3, 5);
	let classifier = Classifier::build(palette, classifier_mode);
	let mut collector = ObservationCollector::new(palette.len());

	for &(x, y) in scan_order {
		let (px, py) = geometry.pixel_center(x, y);
		let rgb = sample_rgb(bitmap, px, py);
		let classification = classifier.classify(rgb, debug);
		let module_index = symbol.module_index(x, y);
		symbol.matrix[module_index] = Module::Data(classification.index as u8);
		symbol.data_map[module_index] = true;
		collector.observe(palette, classification.index, classification.observed_lab, classification.confidence);
	}

	(symbol, collector)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::encoder::Encoder;

	#[test]
	fn detect_geometry_finds_the_encoders_own_layout() {
		let mut encoder = Encoder::new(8, 1).unwrap();
		encoder.set_module_size(6).unwrap();
		encoder.generate(b"hi").unwrap();
		let bitmap = encoder.bitmap().unwrap();

		let geometry = detect_geometry(&bitmap, NcThresholds::default()).unwrap();
		assert_eq!(geometry.module_size, 6);
		assert_eq!(geometry.symbol_width, Symbol::version_to_side(1));
		assert_eq!(geometry.symbol_height, Symbol::version_to_side(1));
	}

	#[test]
	fn decode_round_trips_a_short_message() {
		let mut encoder = Encoder::new(8, 1).unwrap();
		encoder.set_module_size(4).unwrap();
		encoder.generate(b"Hello JABCode!").unwrap();
		let bitmap = encoder.bitmap().unwrap();

		let (data, status) = decode(&bitmap, DecodeMode::Normal);
		assert_eq!(status, DecodeStatus::FullyDecoded);
		assert_eq!(data.as_deref(), Some(&b"Hello JABCode!"[..]));
	}

	#[test]
	fn decode_ex_fills_in_symbol_geometry() {
		let mut encoder = Encoder::new(16, 1).unwrap();
		encoder.set_module_size(4).unwrap();
		encoder.generate(b"metadata round trip").unwrap();
		let bitmap = encoder.bitmap().unwrap();

		let mut symbols = Vec::new();
		let (data, status) = decode_ex(&bitmap, DecodeMode::Normal, &DecodeOptions::default(), &mut symbols);
		assert_eq!(status, DecodeStatus::FullyDecoded);
		assert_eq!(data.as_deref(), Some(&b"metadata round trip"[..]));
		assert_eq!(symbols.len(), 1);
		assert_eq!(symbols[0].color_number, 16);
	}

	#[test]
	fn not_detectable_on_a_blank_bitmap() {
		let bitmap = Bitmap::new(64, 64);
		let (data, status) = decode(&bitmap, DecodeMode::Normal);
		assert_eq!(status, DecodeStatus::NotDetectable);
		assert!(data.is_none());
	}

	#[test]
	fn forced_mask_overrides_the_decoded_part2_value() {
		let mut encoder = Encoder::new(8, 1).unwrap();
		encoder.set_module_size(4).unwrap();
		encoder.set_force_mask(3).unwrap();
		encoder.generate(b"forced mask").unwrap();
		let bitmap = encoder.bitmap().unwrap();

		let (data, status) = decode(&bitmap, DecodeMode::Normal);
		assert_eq!(status, DecodeStatus::FullyDecoded);
		assert_eq!(data.as_deref(), Some(&b"forced mask"[..]));
	}
}
