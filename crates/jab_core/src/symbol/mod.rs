//! Symbol and module types: the rectangular module matrix a JABCode page is
//! built from, and the master/slave docking relationship between symbols in
//! a multi-symbol code.

/// One cell of a symbol's module matrix: a palette index, or a marker that
/// the cell is reserved for a finder/alignment/metadata/palette-calibration
/// pattern rather than data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
	/// A data-carrying cell holding a palette index in `0..color_number`.
	Data(u8),
	/// A cell reserved for a structural pattern, not available to data
	/// placement or masking.
	Reserved,
}

impl Module {
	/// The palette index, if this is a data module.
	pub fn index(self) -> Option<u8> {
		match self {
			Module::Data(index) => Some(index),
			Module::Reserved => None,
		}
	}
}

/// Which side of the master a slave symbol docks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockSide {
	/// Docked above the host.
	Top,
	/// Docked below the host.
	Bottom,
	/// Docked to the host's left.
	Left,
	/// Docked to the host's right.
	Right,
}

/// A symbol's position in the overall code: the master has no host, every
/// slave docks to exactly one side of another symbol (the master or another
/// slave). Matches the source's index-based `host`/`slaves[4]` linkage —
/// no owning back-pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Docking {
	/// Index, in the owning `Vec<Symbol>`, of the symbol this one is docked
	/// to. `None` for the master.
	pub host: Option<usize>,
	/// Which side of the host this symbol occupies, if docked.
	pub side: Option<DockSide>,
}

impl Docking {
	/// The master symbol: no host, no side.
	pub const MASTER: Self = Self {
		host: None,
		side: None,
	};
}

/// A rectangular module matrix: one symbol of a (possibly multi-symbol)
/// JABCode.
#[derive(Debug, Clone)]
pub struct Symbol {
	/// Module-grid width.
	pub width: u32,
	/// Module-grid height.
	pub height: u32,
	/// Version along the x axis, 1..=32. `width == 4*version_x + 17`.
	pub version_x: u32,
	/// Version along the y axis, 1..=32. `height == 4*version_y + 17`.
	pub version_y: u32,
	/// Column weight of this symbol's LDPC code.
	pub wc: u32,
	/// Row weight of this symbol's LDPC code.
	pub wr: u32,
	/// Chosen mask pattern index, `0..8`, once masking has run.
	pub mask_type: Option<u8>,
	/// Docking relationship to the rest of the code.
	pub docking: Docking,
	/// Row-major module matrix, `width * height` entries.
	pub matrix: Vec<Module>,
	/// Per-module data-map flag in the same row-major order:
	/// `false` = reserved, `true` = data-carrying. Retained alongside
	/// `matrix` for the synthetic decode path, which consumes it directly
	/// instead of re-deriving it from pattern geometry.
	pub data_map: Vec<bool>,
	/// Slave indices docked to each of this symbol's four sides, in
	/// `[Top, Bottom, Left, Right]` order. `None` where no slave is
	/// docked on that side.
	pub slaves: [Option<usize>; 4],
}

impl Symbol {
	/// Converts a version number (1..=32) to its module-grid side length.
	pub fn version_to_side(version: u32) -> u32 {
		4 * version + 17
	}

	/// Converts a module-grid side length back to its version number, per
	/// `version = (size - 17) / 4`. Returns `None` if `size` doesn't land on
	/// an exact version boundary.
	pub fn side_to_version(size: u32) -> Option<u32> {
		if size < 17 {
			return None;
		}
		let offset = size - 17;
		if offset % 4 == 0 {
			Some(offset / 4)
		} else {
			None
		}
	}

	/// Allocates a fresh symbol of the given version pair, with every
	/// module reserved and no data yet placed.
	pub fn new_empty(version_x: u32, version_y: u32, wc: u32, wr: u32) -> Self {
		let width = Self::version_to_side(version_x);
		let height = Self::version_to_side(version_y);
		let area = (width * height) as usize;
		Self {
			width,
			height,
			version_x,
			version_y,
			wc,
			wr,
			mask_type: None,
			docking: Docking::MASTER,
			matrix: vec![Module::Reserved; area],
			data_map: vec![false; area],
			slaves: [None; 4],
		}
	}

	/// Index into `matrix`/`data_map` for module coordinate `(x, y)`.
	pub fn module_index(&self, x: u32, y: u32) -> usize {
		debug_assert!(x < self.width && y < self.height);
		(y * self.width + x) as usize
	}

	/// Number of modules flagged as data-carrying in `data_map`.
	pub fn data_module_count(&self) -> usize {
		self.data_map.iter().filter(|&&is_data| is_data).count()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_round_trips_through_side_length() {
		for version in 1..=32u32 {
			let side = Symbol::version_to_side(version);
			assert_eq!(Symbol::side_to_version(side), Some(version));
		}
	}

	#[test]
	fn version_one_is_twenty_one_modules() {
		assert_eq!(Symbol::version_to_side(1), 21);
	}

	#[test]
	fn non_boundary_size_has_no_version() {
		assert_eq!(Symbol::side_to_version(22), None);
	}

	#[test]
	fn new_empty_symbol_has_all_reserved_modules() {
		let symbol = Symbol::new_empty(1, 1, 3, 5);
		assert_eq!(symbol.width, 21);
		assert_eq!(symbol.height, 21);
		assert_eq!(symbol.data_module_count(), 0);
		assert!(symbol.matrix.iter().all(|&m| m == Module::Reserved));
	}

	#[test]
	fn module_index_is_row_major() {
		let symbol = Symbol::new_empty(1, 1, 3, 5);
		assert_eq!(symbol.module_index(0, 0), 0);
		assert_eq!(symbol.module_index(1, 0), 1);
		assert_eq!(symbol.module_index(0, 1), symbol.width as usize);
	}

	#[test]
	fn master_docking_has_no_host() {
		assert_eq!(Docking::MASTER.host, None);
		assert_eq!(Docking::MASTER.side, None);
	}
}
