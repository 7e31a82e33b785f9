//! Viterbi-style mode segmentation: finds the minimum-bit encoding of a
//! byte string as a sequence of `(mode, span)` segments.

use super::tables::{Mode, SEGMENTABLE_MODES};

/// Bits spent on every segment's mode prefix.
const MODE_PREFIX_BITS: u64 = 3;
/// Sentinel for "unreachable" DP cells; large enough that no real cost sum
/// can reach it, small enough that two sentinels summed don't overflow.
const UNREACHABLE: u64 = u64::MAX / 4;

/// One contiguous run of `data` to be encoded in a single mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSpan {
	/// The mode this span is encoded in.
	pub mode: Mode,
	/// Start offset into the original data, inclusive.
	pub start: usize,
	/// End offset into the original data, exclusive.
	pub end: usize,
}

/// Computes the optimal mode segmentation of `data` by dynamic programming.
/// Every byte must be representable by at least one mode in
/// [`SEGMENTABLE_MODES`]; `Byte` always accepts any value, so this never
/// fails to find a segmentation. Returns an empty vector for empty input.
pub fn segment(data: &[u8]) -> Vec<SegmentSpan> {
	let n = data.len();
	if n == 0 {
		return Vec::new();
	}
	let modes = SEGMENTABLE_MODES;
	let num_modes = modes.len();

	// dp[i][m]: min bits to encode data[0..i] such that the open/most-recent
	// segment ending at boundary i is in mode `modes[m]`. dp[0][*] is a
	// virtual "nothing encoded yet" state, shared by every mode.
	let mut dp = vec![vec![UNREACHABLE; num_modes]; n + 1];
	// parent[i][m]: (index into modes of the mode active just before this
	// segment, whether this transition started a new segment).
	let mut parent: Vec<Vec<Option<(usize, bool)>>> = vec![vec![None; num_modes]; n + 1];

	for i in 0..n {
		let prev_min_mode = if i == 0 {
			None
		} else {
			(0..num_modes).min_by_key(|&m| dp[i][m])
		};
		let prev_min_cost = prev_min_mode.map_or(0, |m| dp[i][m]);

		for (mi, mode) in modes.iter().enumerate() {
			if mode.encode_symbol(data[i]).is_none() {
				continue;
			}
			let symbol_cost = mode.bits_per_symbol() as u64;

			let continue_cost =
				if i > 0 && dp[i][mi] < UNREACHABLE { dp[i][mi] + symbol_cost } else { UNREACHABLE };
			let start_cost = if prev_min_cost < UNREACHABLE {
				prev_min_cost + MODE_PREFIX_BITS + mode.length_bits() as u64 + symbol_cost
			} else {
				UNREACHABLE
			};

			if continue_cost <= start_cost {
				dp[i + 1][mi] = continue_cost;
				parent[i + 1][mi] = Some((mi, false));
			} else {
				dp[i + 1][mi] = start_cost;
				parent[i + 1][mi] = Some((prev_min_mode.unwrap_or(mi), true));
			}
		}
	}

	let final_mode = (0..num_modes).min_by_key(|&m| dp[n][m]).expect("Byte mode always reachable");
	debug_assert!(dp[n][final_mode] < UNREACHABLE, "byte mode must always accept every byte value");

	backtrack(&parent, &modes, n, final_mode)
}

fn backtrack(
	parent: &[Vec<Option<(usize, bool)>>],
	modes: &[Mode],
	n: usize,
	final_mode: usize,
) -> Vec<SegmentSpan> {
	let mut boundaries = Vec::new();
	let mut position = n;
	let mut mode_index = final_mode;

	while position > 0 {
		let (prev_mode_index, switched) =
			parent[position][mode_index].expect("every reachable boundary has a recorded parent");
		if switched {
			boundaries.push((position, modes[mode_index]));
			mode_index = prev_mode_index;
		}
		position -= 1;
	}
	boundaries.push((0, modes[mode_index]));
	boundaries.reverse();

	let mut spans = Vec::with_capacity(boundaries.len());
	for window in boundaries.windows(2) {
		let (start, mode) = window[0];
		let (end, _) = window[1];
		spans.push(SegmentSpan {
			mode,
			start,
			end,
		});
	}
	spans
}

#[cfg(test)]
mod tests {
	use super::*;

	fn spans_to_text(data: &[u8], spans: &[SegmentSpan]) -> Vec<(Mode, String)> {
		spans
			.iter()
			.map(|s| (s.mode, String::from_utf8_lossy(&data[s.start..s.end]).into_owned()))
			.collect()
	}

	#[test]
	fn empty_input_has_no_segments() {
		assert_eq!(segment(b""), Vec::new());
	}

	#[test]
	fn pure_uppercase_run_is_one_segment() {
		let data = b"HELLO JABCODE";
		let spans = segment(data);
		assert_eq!(spans.len(), 1);
		assert_eq!(spans[0].mode, Mode::Upper);
		assert_eq!(spans[0].start, 0);
		assert_eq!(spans[0].end, data.len());
	}

	#[test]
	fn pure_numeric_run_is_one_segment() {
		let data = b"0123456789";
		let spans = segment(data);
		assert_eq!(spans.len(), 1);
		assert_eq!(spans[0].mode, Mode::Numeric);
	}

	#[test]
	fn spans_cover_the_whole_input_contiguously() {
		let data = b"Hello, World! 123 bytes \x01\x02\x03";
		let spans = segment(data);
		assert_eq!(spans[0].start, 0);
		assert_eq!(spans.last().unwrap().end, data.len());
		for window in spans.windows(2) {
			assert_eq!(window[0].end, window[1].start);
		}
	}

	#[test]
	fn binary_data_falls_back_to_byte_mode() {
		let data = [0u8, 1, 2, 255, 254, 128];
		let spans = segment(&data);
		assert!(spans.iter().all(|s| s.mode == Mode::Byte));
	}

	#[test]
	fn mixed_case_prefers_mixed_mode_over_switching() {
		let data = b"AbCdEf";
		let spans = segment(data);
		let decoded = spans_to_text(data, &spans);
		let reconstructed: String = decoded.iter().map(|(_, s)| s.as_str()).collect();
		assert_eq!(reconstructed.as_bytes(), data);
	}
}
