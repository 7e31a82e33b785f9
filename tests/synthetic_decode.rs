//! Synthetic-path round trips across the palette sizes and payload shapes
//! the encoder supports, exercised through the public `jabcode` facade
//! rather than `jab_core` directly.

use jabcode::jab_core::palette::VALID_COLOR_NUMBERS;
use jabcode::prelude::*;

fn text_payload(len: usize) -> Vec<u8> {
	const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 ";
	(0..len).map(|i| ALPHABET[i % ALPHABET.len()]).collect()
}

#[test]
fn synthetic_decode_round_trips_bit_exactly_across_every_color_number() {
	let payload = text_payload(64);

	for &color_number in &VALID_COLOR_NUMBERS {
		let mut encoder = Encoder::new(color_number, 1).unwrap();
		encoder.generate(&payload).unwrap();
		let bitmap = encoder.bitmap().unwrap();
		let params = encoder.synthetic_params().unwrap();

		let (data, status) = decode_synthetic(bitmap, &params, DecodeMode::Normal);
		assert_eq!(status, DecodeStatus::FullyDecoded, "color_number={color_number}");
		assert_eq!(data.as_deref(), Some(payload.as_slice()), "color_number={color_number}");
	}
}

#[test]
fn synthetic_decode_round_trips_a_range_of_payload_sizes() {
	for &len in &[1usize, 16, 256, 2048] {
		let payload = text_payload(len);

		let mut encoder = Encoder::new(8, 1).unwrap();
		encoder.generate(&payload).unwrap();
		let bitmap = encoder.bitmap().unwrap();
		let params = encoder.synthetic_params().unwrap();

		let (data, status) = decode_synthetic(bitmap, &params, DecodeMode::Normal);
		assert_eq!(status, DecodeStatus::FullyDecoded, "len={len}");
		assert_eq!(data.as_deref(), Some(payload.as_slice()), "len={len}");
	}
}

#[test]
fn synthetic_decode_honors_a_forced_mask() {
	let mut encoder = Encoder::new(8, 1).unwrap();
	encoder.set_force_mask(5).unwrap();
	encoder.generate(b"forced synthetic mask").unwrap();
	let bitmap = encoder.bitmap().unwrap();
	let params = encoder.synthetic_params().unwrap();
	assert_eq!(params.mask_type, 5);

	let (data, status) = decode_synthetic(bitmap, &params, DecodeMode::Normal);
	assert_eq!(status, DecodeStatus::FullyDecoded);
	assert_eq!(data.as_deref(), Some(&b"forced synthetic mask"[..]));
}

#[test]
fn synthetic_decode_rejects_mismatched_geometry() {
	let mut encoder = Encoder::new(8, 1).unwrap();
	encoder.generate(b"geometry mismatch").unwrap();
	let bitmap = encoder.bitmap().unwrap();
	let mut params = encoder.synthetic_params().unwrap();
	params.module_size += 1;

	let (data, status) = decode_synthetic(bitmap, &params, DecodeMode::Normal);
	assert!(data.is_none());
	assert_eq!(status, DecodeStatus::NotDecodable);
}
