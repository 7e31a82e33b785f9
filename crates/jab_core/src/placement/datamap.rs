//! Data-module scan order: every module not claimed by a finder, alignment,
//! metadata, or palette-calibration pattern, visited in the order codeword
//! bits get written into it.

use crate::symbol::{Module, Symbol};

/// Marks every still-`Reserved` module as a data module and returns the
/// scan order codeword bits should be written in: boustrophedon (serpentine)
/// row-major, alternating scan direction each row so that physically
/// adjacent modules are also adjacent in the bit sequence, which keeps a
/// single burst error from scattering across unrelated codeword positions.
pub fn fill_data_map(symbol: &mut Symbol) -> Vec<(u32, u32)> {
	let mut order = Vec::with_capacity((symbol.width * symbol.height) as usize);

	for y in 0..symbol.height {
		let left_to_right = y % 2 == 0;
		let xs: Box<dyn Iterator<Item = u32>> =
			if left_to_right { Box::new(0..symbol.width) } else { Box::new((0..symbol.width).rev()) };

		for x in xs {
			let module_index = symbol.module_index(x, y);
			if symbol.matrix[module_index] == Module::Reserved {
				symbol.data_map[module_index] = true;
				order.push((x, y));
			}
		}
	}

	order
}
