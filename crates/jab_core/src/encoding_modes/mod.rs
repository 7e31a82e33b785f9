//! Six fixed-alphabet encode modes plus raw Byte and FNC1, with
//! Viterbi-style segmentation and the packed bitstream format built from it.
//!
//! **Termination convention** (an explicit design decision, since the
//! eight 3-bit mode codes leave no spare value for a dedicated terminator):
//! the encoder always appends one zero-length segment after the real data;
//! the decoder stops as soon as it reads a length field of zero, or once
//! fewer bits remain than a mode-switch header needs (trailing pad bits
//! from [`crate::bitstream::BitWriter::finish`]'s byte alignment).

pub mod segment;
pub mod tables;

pub use segment::{segment, SegmentSpan};
pub use tables::{Mode, ALL_MODES, SEGMENTABLE_MODES};

use crate::bitstream::{BitReader, BitWriter};
use crate::error::DecodeError;

/// Encodes `data` as a packed mode-segmented bitstream, per
/// [`segment`]'s chosen segmentation plus a trailing terminator segment.
pub fn write_bitstream(data: &[u8]) -> Vec<u8> {
	let mut writer = BitWriter::new();
	for span in segment(data) {
		write_segment(&mut writer, span.mode, &data[span.start..span.end]);
	}
	// Terminator: Byte mode, zero length.
	writer.push_bits(Mode::Byte.code(), 3);
	writer.push_bits(0, Mode::Byte.length_bits());
	writer.finish()
}

fn write_segment(writer: &mut BitWriter, mode: Mode, payload: &[u8]) {
	writer.push_bits(mode.code(), 3);
	writer.push_bits(payload.len() as u32, mode.length_bits());
	for &byte in payload {
		let symbol = mode.encode_symbol(byte).expect("segment() only assigns bytes a mode accepts");
		writer.push_bits(symbol, mode.bits_per_symbol());
	}
}

/// Parses a packed mode-segmented bitstream back to its original bytes.
pub fn read_bitstream(bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
	let mut reader = BitReader::new(bytes);
	let mut out = Vec::new();

	loop {
		if reader.remaining() < 3 {
			break;
		}
		let offset = reader.position();
		let code = reader.read_bits(3).ok_or(DecodeError::BitstreamParse {
			offset,
		})?;
		let Some(mode) = Mode::from_code(code) else {
			return Err(DecodeError::BitstreamParse {
				offset,
			});
		};

		if reader.remaining() < mode.length_bits() as usize {
			break;
		}
		let length = reader.read_bits(mode.length_bits()).ok_or(DecodeError::BitstreamParse {
			offset,
		})?;
		if length == 0 {
			break;
		}

		for _ in 0..length {
			let symbol_offset = reader.position();
			let value = reader.read_bits(mode.bits_per_symbol()).ok_or(DecodeError::BitstreamParse {
				offset: symbol_offset,
			})?;
			let byte = mode.decode_symbol(value).ok_or(DecodeError::BitstreamParse {
				offset: symbol_offset,
			})?;
			out.push(byte);
		}
	}

	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_plain_ascii() {
		let data = b"Hello JABCode!";
		let bits = write_bitstream(data);
		assert_eq!(read_bitstream(&bits).unwrap(), data);
	}

	#[test]
	fn round_trips_empty_input() {
		let bits = write_bitstream(b"");
		assert_eq!(read_bitstream(&bits).unwrap(), Vec::<u8>::new());
	}

	#[test]
	fn round_trips_binary_data() {
		let data: Vec<u8> = (0..=255).collect();
		let bits = write_bitstream(&data);
		assert_eq!(read_bitstream(&bits).unwrap(), data);
	}

	#[test]
	fn round_trips_mixed_mode_content() {
		let data = b"UPPER lower 0123 !@# mixedABC123";
		let bits = write_bitstream(data);
		assert_eq!(read_bitstream(&bits).unwrap(), data);
	}

	#[test]
	fn lone_fnc1_byte_reads_as_empty() {
		// 0xFF's top 3 bits select Fnc1 (code 7), whose zero-width length
		// field immediately reads as the terminator.
		assert_eq!(read_bitstream(&[0xFF]).unwrap(), Vec::<u8>::new());
	}
}
