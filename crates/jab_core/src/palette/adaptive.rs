//! Adaptive palette drift correction: §4.7's per-decode LAB-shift estimator.
//!
//! During classification, each module's observed color, chosen palette
//! index, and classification confidence are fed to an [`ObservationCollector`].
//! Once a full symbol's modules have been classified, [`correct`] estimates a
//! per-color LAB shift and produces a corrected palette for re-classification.

use super::Palette;
use crate::color::{delta_e_76, lab_to_rgb, rgb_to_lab, Lab};

/// Minimum confidence a classification must have to be collected at all.
pub const MIN_CONFIDENCE_THRESHOLD: f64 = 0.6;
/// Minimum surviving observations before a color's shift is estimated.
pub const MIN_SAMPLES_FOR_CORRECTION: usize = 5;
/// A shift larger than this (Euclidean in LAB) is rejected as implausible.
pub const MAX_CORRECTION_DELTA_E: f64 = 10.0;
/// Hard cap on observations retained per palette color.
pub const MAX_DIFF_CAPACITY: usize = 1000;

/// Per-color observation buffers: each entry is an (observed − expected) LAB
/// difference from a module that classified to that color with sufficient
/// confidence and a plausible magnitude.
#[derive(Debug, Clone)]
pub struct ObservationCollector {
	diffs: Vec<Vec<Lab>>,
}

impl ObservationCollector {
	/// Creates an empty collector sized for a palette of `color_count`
	/// colors.
	pub fn new(color_count: usize) -> Self {
		Self {
			diffs: vec![Vec::new(); color_count],
		}
	}

	/// Records one module's classification outcome. Confidence below
	/// [`MIN_CONFIDENCE_THRESHOLD`] or a LAB difference exceeding
	/// [`MAX_CORRECTION_DELTA_E`] is discarded; a color already at
	/// [`MAX_DIFF_CAPACITY`] observations discards further ones too.
	pub fn observe(&mut self, palette: &Palette, index: usize, observed_lab: Lab, confidence: f64) {
		if confidence < MIN_CONFIDENCE_THRESHOLD {
			return;
		}
		let expected_lab = rgb_to_lab(palette.get(index));
		if delta_e_76(observed_lab, expected_lab) > MAX_CORRECTION_DELTA_E {
			return;
		}

		let bucket = &mut self.diffs[index];
		if bucket.len() < MAX_DIFF_CAPACITY {
			bucket.push(Lab {
				l: observed_lab.l - expected_lab.l,
				a: observed_lab.a - expected_lab.a,
				b: observed_lab.b - expected_lab.b,
			});
		}
	}

	/// Number of surviving observations collected for palette index
	/// `index`.
	pub fn sample_count(&self, index: usize) -> usize {
		self.diffs[index].len()
	}
}

/// Computes a corrected palette from `collector`'s observations. Colors
/// without enough evidence, or whose shift is too large or non-finite, pass
/// through unchanged — so an all-empty collector returns a palette
/// bit-identical to `palette`.
pub fn correct(palette: &Palette, collector: &ObservationCollector) -> Palette {
	let n = palette.len();
	let mut confidences = vec![0.0f64; n];
	let mut shifts: Vec<Option<Lab>> = vec![None; n];

	for index in 0..n {
		let count = collector.sample_count(index);
		confidences[index] = (count as f64 / 20.0).min(1.0);
		if count >= MIN_SAMPLES_FOR_CORRECTION {
			shifts[index] = Some(median_lab(&collector.diffs[index]));
		}
	}

	let threshold = apply_threshold(&confidences);

	let mut colors: Vec<_> = palette.iter().copied().collect();
	for index in 0..n {
		let Some(shift) = shifts[index] else {
			continue;
		};
		if confidences[index] < threshold {
			continue;
		}
		let magnitude = (shift.l * shift.l + shift.a * shift.a + shift.b * shift.b).sqrt();
		if !magnitude.is_finite() || magnitude > 50.0 {
			log::warn!("adaptive palette: rejecting shift for color {index}, magnitude {magnitude}");
			continue;
		}

		let original = rgb_to_lab(colors[index]);
		let shifted = Lab {
			l: original.l + shift.l,
			a: original.a + shift.a,
			b: original.b + shift.b,
		}
		.clamp();
		colors[index] = lab_to_rgb(shifted);
	}

	Palette::from_colors(colors)
}

fn apply_threshold(confidences: &[f64]) -> f64 {
	median_f64(confidences).max(0.3)
}

fn median_f64(values: &[f64]) -> f64 {
	let mut sorted = values.to_vec();
	sorted.sort_by(f64::total_cmp);
	let n = sorted.len();
	if n == 0 {
		return 0.0;
	}
	if n % 2 == 1 {
		sorted[n / 2]
	} else {
		(sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
	}
}

fn median_lab(diffs: &[Lab]) -> Lab {
	let ls: Vec<f64> = diffs.iter().map(|d| d.l).collect();
	let as_: Vec<f64> = diffs.iter().map(|d| d.a).collect();
	let bs: Vec<f64> = diffs.iter().map(|d| d.b).collect();
	Lab {
		l: median_f64(&ls),
		a: median_f64(&as_),
		b: median_f64(&bs),
	}
}
