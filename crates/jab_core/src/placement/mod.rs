//! Structural layout of a symbol's module matrix: finder and alignment
//! bullseyes, the Part-1/Part-2 metadata ring, the eight XOR masks, and the
//! data-module scan order that ties them together.

pub mod alignment;
pub mod datamap;
pub mod finder;
pub mod mask;
pub mod metadata;

pub use metadata::{Part1, Part2};

use crate::error::EncodeError;
use crate::symbol::Symbol;

/// Everything [`layout_symbol`] needs to know about a symbol before it can
/// place structural patterns and reserve the metadata ring.
#[derive(Debug, Clone, Copy)]
pub struct LayoutParams {
	pub color_number: u32,
	pub part1: Part1,
	pub part2: Part2,
}

/// The outcome of laying out one symbol's structural patterns: the data
/// module scan order, ready for codeword bits to be written into it in
/// order, and the metadata ring position list split into its Part-1/Part-2
/// spans (`metadata_ring[..part1_len]` is Part-1's, the rest Part-2's),
/// kept around so Part-2 can be rewritten once the mask is chosen.
pub struct Layout {
	pub data_scan_order: Vec<(u32, u32)>,
	pub metadata_ring: Vec<(u32, u32)>,
	pub part1_len: usize,
}

/// Places finders, metadata, and alignment patterns on `symbol`, then fills
/// the data map. Must run before [`mask::choose_and_apply_best_mask`], which
/// needs `data_map` populated to know which cells it may touch. Part-2's
/// `mask_type` is provisional here (the real mask is chosen after data
/// placement); re-run [`metadata::encode_part2`] against
/// `Layout::metadata_ring[Layout::part1_len..]` once it's known.
pub fn layout_symbol(symbol: &mut Symbol, params: LayoutParams) -> Result<Layout, EncodeError> {
	finder::place_finders(symbol, params.color_number);

	let ring = metadata::metadata_ring_positions(symbol.width, symbol.height);
	let n1 = metadata::codeword_len(metadata::PART1_DATA_BITS, metadata::PART1_WC, metadata::PART1_WR);
	if ring.len() < n1 {
		return Err(EncodeError::DataTooLarge {
			required_bits: n1,
			available_bits: ring.len(),
		});
	}
	metadata::encode_part1(symbol, &ring, params.part1, params.color_number)?;
	metadata::encode_part2(symbol, &ring[n1..], params.part2, params.color_number)?;

	alignment::place_alignments(symbol, params.color_number);
	let data_scan_order = datamap::fill_data_map(symbol);

	Ok(Layout {
		data_scan_order,
		metadata_ring: ring,
		part1_len: n1,
	})
}
