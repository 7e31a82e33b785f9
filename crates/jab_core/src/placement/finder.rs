//! 7x7 finder pattern bullseyes, one per master-symbol corner.

use crate::symbol::{Module, Symbol};

/// The four finder-pattern corners, in the fixed orientation order the
/// metadata's docked-slave mask and synthetic decode both assume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinderCorner {
	/// Top-left.
	Fp0,
	/// Top-right.
	Fp1,
	/// Bottom-left.
	Fp2,
	/// Bottom-right.
	Fp3,
}

/// Side length of a finder pattern, in modules.
pub const FINDER_SIZE: u32 = 7;

impl FinderCorner {
	/// The two palette indices this corner's bullseye alternates between.
	/// Each corner uses a distinct pair so orientation can be read back
	/// from which colors appear together, with FP0 always anchored to the
	/// black/white pair the rest of the symbol's anchors use.
	pub fn color_pair(self, color_number: u32) -> (u8, u8) {
		let white = (color_number - 1) as u8;
		match self {
			FinderCorner::Fp0 => (0, white),
			FinderCorner::Fp1 => (0, 1),
			FinderCorner::Fp2 => (0, 2.min(white.saturating_sub(1)).max(1)),
			FinderCorner::Fp3 => (0, 3.min(white.saturating_sub(1)).max(1)),
		}
	}

	/// Top-left module coordinate of this corner's 7x7 block within a
	/// symbol of the given dimensions.
	pub fn origin(self, width: u32, height: u32) -> (u32, u32) {
		match self {
			FinderCorner::Fp0 => (0, 0),
			FinderCorner::Fp1 => (width - FINDER_SIZE, 0),
			FinderCorner::Fp2 => (0, height - FINDER_SIZE),
			FinderCorner::Fp3 => (width - FINDER_SIZE, height - FINDER_SIZE),
		}
	}
}

/// Writes all four finder patterns into `symbol`'s matrix, marking their
/// cells `Reserved` to data placement.
pub fn place_finders(symbol: &mut Symbol, color_number: u32) {
	for corner in [FinderCorner::Fp0, FinderCorner::Fp1, FinderCorner::Fp2, FinderCorner::Fp3] {
		place_one_finder(symbol, corner, color_number);
	}
}

fn place_one_finder(symbol: &mut Symbol, corner: FinderCorner, color_number: u32) {
	let (origin_x, origin_y) = corner.origin(symbol.width, symbol.height);
	let (color_a, color_b) = corner.color_pair(color_number);

	for dy in 0..FINDER_SIZE {
		for dx in 0..FINDER_SIZE {
			let ring = ring_index(dx, dy);
			let index = if ring % 2 == 0 { color_a } else { color_b };
			let (x, y) = (origin_x + dx, origin_y + dy);
			let module_index = symbol.module_index(x, y);
			symbol.matrix[module_index] = Module::Data(index);
			symbol.data_map[module_index] = false;
		}
	}
}

pub(crate) fn ring_index(dx: u32, dy: u32) -> u32 {
	let max = FINDER_SIZE - 1;
	dx.min(max - dx).min(dy).min(max - dy)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ring_index_identifies_center_and_border() {
		assert_eq!(ring_index(0, 0), 0);
		assert_eq!(ring_index(3, 3), 3);
		assert_eq!(ring_index(3, 0), 0);
	}

	#[test]
	fn finders_occupy_all_four_corners() {
		let mut symbol = Symbol::new_empty(2, 2, 3, 5);
		place_finders(&mut symbol, 8);
		assert!(symbol.matrix[symbol.module_index(0, 0)].index().is_some());
		assert!(symbol.matrix[symbol.module_index(symbol.width - 1, 0)].index().is_some());
		assert!(symbol.matrix[symbol.module_index(0, symbol.height - 1)].index().is_some());
		assert!(symbol.matrix[symbol.module_index(symbol.width - 1, symbol.height - 1)].index().is_some());
	}

	#[test]
	fn finder_cells_are_excluded_from_the_data_map() {
		let mut symbol = Symbol::new_empty(2, 2, 3, 5);
		place_finders(&mut symbol, 8);
		for dy in 0..FINDER_SIZE {
			for dx in 0..FINDER_SIZE {
				assert!(!symbol.data_map[symbol.module_index(dx, dy)]);
			}
		}
	}

	#[test]
	fn corners_use_distinct_color_pairs() {
		let pairs: Vec<_> =
			[FinderCorner::Fp0, FinderCorner::Fp1, FinderCorner::Fp2, FinderCorner::Fp3]
				.iter()
				.map(|&c| c.color_pair(8))
				.collect();
		assert_eq!(pairs[0], (0, 7));
		assert_ne!(pairs[1], pairs[2]);
	}
}
