//! The 10-entry `(wc, wr)` table that ECC levels index into.

/// `(column_weight, row_weight)` for each of the 10 defined ECC levels.
pub const ECCLEVEL_TABLE: [(u32, u32); 10] =
	[(3, 5), (7, 9), (3, 4), (5, 6), (7, 8), (4, 5), (5, 7), (6, 7), (8, 9), (9, 10)];

/// Looks up `(wc, wr)` for an ECC level in `0..=9`.
pub fn wc_wr_for_level(level: u32) -> Option<(u32, u32)> {
	ECCLEVEL_TABLE.get(level as usize).copied()
}

/// Finds the ECC level index whose table entry is exactly `(wc, wr)`.
pub fn level_for_wc_wr(wc: u32, wr: u32) -> Option<u32> {
	ECCLEVEL_TABLE.iter().position(|&entry| entry == (wc, wr)).map(|index| index as u32)
}
