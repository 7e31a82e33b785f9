//! 5x5 alignment-pattern bullseyes on a version-dependent grid, used by the
//! decoder to correct perspective drift away from the four corners.

use crate::symbol::{Module, Symbol};

/// Side length of an alignment pattern, in modules.
pub const ALIGNMENT_SIZE: u32 = 5;

/// Maximum number of alignment-pattern positions generated per axis.
pub const MAX_POSITIONS_PER_AXIS: usize = 9;

/// Spacing, in modules, targeted between consecutive alignment pattern
/// centers along one axis.
const TARGET_SPACING: u32 = 16;

/// Center coordinates of alignment patterns along one axis of a symbol with
/// the given side length, excluding the two finder corners and clamped to
/// [`MAX_POSITIONS_PER_AXIS`] positions. Symbols too small to fit even one
/// interior alignment pattern clear of both finders get none.
pub fn axis_positions(side: u32) -> Vec<u32> {
	let finder_margin = super::finder::FINDER_SIZE + 3;
	let first = finder_margin + ALIGNMENT_SIZE / 2;
	let last = side.saturating_sub(finder_margin + ALIGNMENT_SIZE / 2 + 1);
	if first >= last {
		return Vec::new();
	}

	let span = last - first;
	let count = (span / TARGET_SPACING + 1).min(MAX_POSITIONS_PER_AXIS as u32).max(1);
	if count == 1 {
		return vec![first + span / 2];
	}

	(0..count).map(|i| first + (span * i) / (count - 1)).collect()
}

/// Writes every alignment pattern into `symbol`, skipping centers that would
/// collide with a finder footprint or an already-reserved cell (metadata).
pub fn place_alignments(symbol: &mut Symbol, color_number: u32) {
	let xs = axis_positions(symbol.width);
	let ys = axis_positions(symbol.height);
	let white = (color_number - 1) as u8;
	let half = ALIGNMENT_SIZE / 2;

	for &cy in &ys {
		for &cx in &xs {
			if !alignment_fits(symbol, cx, cy, half) {
				continue;
			}
			place_one_alignment(symbol, cx, cy, half, white);
		}
	}
}

fn alignment_fits(symbol: &Symbol, cx: u32, cy: u32, half: u32) -> bool {
	if cx < half || cy < half || cx + half >= symbol.width || cy + half >= symbol.height {
		return false;
	}
	for dy in 0..ALIGNMENT_SIZE {
		for dx in 0..ALIGNMENT_SIZE {
			let (x, y) = (cx - half + dx, cy - half + dy);
			if symbol.matrix[symbol.module_index(x, y)] != Module::Reserved {
				return false;
			}
		}
	}
	true
}

fn place_one_alignment(symbol: &mut Symbol, cx: u32, cy: u32, half: u32, white: u8) {
	for dy in 0..ALIGNMENT_SIZE {
		for dx in 0..ALIGNMENT_SIZE {
			let ring = dx.min(ALIGNMENT_SIZE - 1 - dx).min(dy).min(ALIGNMENT_SIZE - 1 - dy);
			let index = if ring % 2 == 0 { 0 } else { white };
			let (x, y) = (cx - half + dx, cy - half + dy);
			let module_index = symbol.module_index(x, y);
			symbol.matrix[module_index] = Module::Data(index);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn small_symbol_has_no_alignment_positions() {
		assert!(axis_positions(21).is_empty());
	}

	#[test]
	fn larger_symbol_has_interior_positions() {
		let positions = axis_positions(97);
		assert!(!positions.is_empty());
		for &p in &positions {
			assert!(p > 10 && p < 87);
		}
	}

	#[test]
	fn positions_are_capped_per_axis() {
		let positions = axis_positions(4 * 32 + 17);
		assert!(positions.len() <= MAX_POSITIONS_PER_AXIS);
	}

	#[test]
	fn alignments_do_not_overwrite_finder_cells() {
		let mut symbol = Symbol::new_empty(20, 20, 3, 5);
		crate::placement::finder::place_finders(&mut symbol, 8);
		place_alignments(&mut symbol, 8);
		for dy in 0..super::super::finder::FINDER_SIZE {
			for dx in 0..super::super::finder::FINDER_SIZE {
				let module_index = symbol.module_index(dx, dy);
				assert!(symbol.matrix[module_index].index().is_some());
			}
		}
	}
}
