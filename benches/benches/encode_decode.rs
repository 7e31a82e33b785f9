//! Benchmark suite for JABCode encode/decode.
//!
//! Measures the end-to-end encode and synthetic-decode pipelines at a range
//! of payload sizes and palette sizes, plus the LDPC bit-flipping decoder in
//! isolation since it dominates decode latency on corrupted input.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jab_core::decoder::{decode_synthetic, DecodeMode};
use jab_core::encoder::Encoder;
use jab_core::ldpc::{decode_bit_flipping, ParityMatrix, DEFAULT_MAX_ITERATIONS};
use jabcode_benches::sizes;
use std::hint::black_box;

fn bench_encode(c: &mut Criterion) {
	let mut group = c.benchmark_group("encode");

	for &len in &[sizes::TINY, sizes::SMALL, sizes::MEDIUM, sizes::LARGE] {
		let payload = jabcode_benches::generate_text_payload(len);
		group.throughput(Throughput::Bytes(len as u64));
		group.bench_with_input(BenchmarkId::new("generate", len), &payload, |b, payload| {
			b.iter(|| {
				let mut encoder = Encoder::new(8, 1).unwrap();
				encoder.generate(black_box(payload)).unwrap();
				black_box(encoder.bitmap())
			});
		});
	}

	group.finish();
}

fn bench_synthetic_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("decode_synthetic");

	for &len in &[sizes::TINY, sizes::SMALL, sizes::MEDIUM, sizes::LARGE] {
		let payload = jabcode_benches::generate_text_payload(len);
		let mut encoder = Encoder::new(8, 1).unwrap();
		encoder.generate(&payload).unwrap();
		let bitmap = encoder.bitmap().unwrap();
		let params = encoder.synthetic_params().unwrap();

		group.throughput(Throughput::Bytes(len as u64));
		group.bench_with_input(BenchmarkId::new("round_trip", len), &bitmap, |b, bitmap| {
			b.iter(|| black_box(decode_synthetic(bitmap.clone(), &params, DecodeMode::Normal)));
		});
	}

	group.finish();
}

fn bench_color_number_scaling(c: &mut Criterion) {
	let mut group = c.benchmark_group("decode_synthetic_by_color_number");
	let payload = jabcode_benches::generate_text_payload(sizes::MEDIUM);

	for &color_number in &[4u32, 8, 16, 32, 64, 128] {
		let mut encoder = Encoder::new(color_number, 1).unwrap();
		encoder.generate(&payload).unwrap();
		let bitmap = encoder.bitmap().unwrap();
		let params = encoder.synthetic_params().unwrap();

		group.bench_with_input(BenchmarkId::new("round_trip", color_number), &bitmap, |b, bitmap| {
			b.iter(|| black_box(decode_synthetic(bitmap.clone(), &params, DecodeMode::Normal)));
		});
	}

	group.finish();
}

fn bench_ldpc_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("ldpc_bit_flipping");

	let matrix = ParityMatrix::build(2000, 800, 3, 5, 42);
	let data: Vec<bool> = (0..1200).map(|i| i % 3 == 0).collect();
	let clean = matrix.encode_systematic(&data);

	group.bench_function("clean_codeword", |b| {
		b.iter(|| black_box(decode_bit_flipping(&matrix, black_box(&clean), DEFAULT_MAX_ITERATIONS)));
	});

	let mut lightly_corrupted = clean.clone();
	for bit in lightly_corrupted.iter_mut().step_by(97) {
		*bit = !*bit;
	}
	group.bench_function("scattered_errors", |b| {
		b.iter(|| black_box(decode_bit_flipping(&matrix, black_box(&lightly_corrupted), DEFAULT_MAX_ITERATIONS)));
	});

	group.finish();
}

criterion_group!(benches, bench_encode, bench_synthetic_decode, bench_color_number_scaling, bench_ldpc_decode);
criterion_main!(benches);
