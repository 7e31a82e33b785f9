//! Perceptual classification of a sampled module color against a palette,
//! plus the confidence metric adaptive correction (§4.7) consumes.

use crate::color::{delta_e_2000, delta_e_76, rgb_to_lab, Lab, Rgb};
use crate::kdtree::KdTree;
use crate::palette::Palette;

/// Which distance metric [`classify`] uses to pick the nearest palette
/// color. [`ClassifierMode::Delta2000Linear`] is a brute-force linear scan:
/// ΔE2000 isn't a metric the k-d tree's branch-and-bound pruning can exploit
/// (it doesn't satisfy the triangle inequality the pruning relies on), so it
/// never goes through [`KdTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierMode {
	/// ΔE76 (Euclidean in LAB) via the k-d tree. Matches §4.1's contract.
	#[default]
	Delta76Kdtree,
	/// ΔE2000 via linear scan over the whole palette.
	Delta2000Linear,
}

/// The outcome of classifying one sampled module color: the chosen palette
/// index and a confidence derived from how much closer the winner is than
/// the runner-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
	/// Chosen palette index.
	pub index: usize,
	/// The observed color's LAB value, handed to adaptive correction.
	pub observed_lab: Lab,
	/// Confidence in `[0, 1]`: `1 - d1/d2` where `d1` is the distance to the
	/// winner and `d2` to the runner-up. `1.0` when only one palette color
	/// exists (no runner-up to compare against).
	pub confidence: f64,
}

/// A built index over one palette, ready to classify many sampled colors
/// against it. Rebuilt whenever the palette changes (e.g. after adaptive
/// correction).
pub struct Classifier<'a> {
	palette: &'a Palette,
	palette_lab: Vec<Lab>,
	tree: KdTree,
	mode: ClassifierMode,
}

impl<'a> Classifier<'a> {
	/// Builds a classifier over `palette` using `mode`'s distance metric.
	pub fn build(palette: &'a Palette, mode: ClassifierMode) -> Self {
		let palette_lab = palette.as_lab();
		let tree = KdTree::build(palette_lab.iter().copied().zip(0..));
		Self {
			palette,
			palette_lab,
			tree,
			mode,
		}
	}

	/// Classifies one sampled RGB color, returning the chosen index,
	/// its LAB value, and a confidence score. Debug-logs the full distance
	/// breakdown when `debug` is set, and flags near-ties (ΔE76 < 1 between
	/// best and second-best) at `log::debug!` per §7's palette-ambiguity
	/// policy — logged, not an error, since the caller treats it as soft
	/// data for adaptive correction rather than control flow.
	pub fn classify(&self, rgb: Rgb, debug: bool) -> Classification {
		let observed_lab = rgb_to_lab(rgb);

		let (best, second) = match self.mode {
			ClassifierMode::Delta76Kdtree => self.classify_kdtree(observed_lab),
			ClassifierMode::Delta2000Linear => self.classify_linear(observed_lab),
		};

		let confidence = match second {
			Some((d2, _)) if d2 > 0.0 => (1.0 - best.0 / d2).clamp(0.0, 1.0),
			_ => 1.0,
		};

		if debug {
			log::debug!(
				"classify: rgb={rgb:?} lab={observed_lab:?} -> index {} (d1={:.3}, d2={:?}, confidence={confidence:.3})",
				best.1,
				best.0,
				second.map(|(d, _)| d)
			);
		}
		if let Some((d2, _)) = second {
			if d2 - best.0 < 1.0 {
				log::debug!(
					"classify: palette ambiguity at rgb={rgb:?}, best/second-best within ΔE < 1 (d1={:.3}, d2={d2:.3})",
					best.0
				);
			}
		}

		Classification {
			index: best.1,
			observed_lab,
			confidence,
		}
	}

	fn classify_kdtree(&self, observed_lab: Lab) -> ((f64, usize), Option<(f64, usize)>) {
		let best_index = self.tree.nearest(observed_lab).unwrap_or(0);
		let best_distance = delta_e_76(observed_lab, self.palette_lab[best_index]);
		let second = self.second_best(observed_lab, best_index, delta_e_76);
		((best_distance, best_index), second)
	}

	fn classify_linear(&self, observed_lab: Lab) -> ((f64, usize), Option<(f64, usize)>) {
		let mut ranked: Vec<(f64, usize)> = self
			.palette_lab
			.iter()
			.enumerate()
			.map(|(index, &lab)| (delta_e_2000(observed_lab, lab), index))
			.collect();
		ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
		let best = ranked[0];
		let second = ranked.get(1).copied();
		(best, second)
	}

	fn second_best(
		&self,
		observed_lab: Lab,
		best_index: usize,
		distance: impl Fn(Lab, Lab) -> f64,
	) -> Option<(f64, usize)> {
		self.palette_lab
			.iter()
			.enumerate()
			.filter(|&(index, _)| index != best_index)
			.map(|(index, &lab)| (distance(observed_lab, lab), index))
			.min_by(|a, b| a.0.total_cmp(&b.0))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn classifies_exact_palette_colors_with_full_confidence() {
		let palette = Palette::default_for(8).unwrap();
		let classifier = Classifier::build(&palette, ClassifierMode::Delta76Kdtree);
		for index in 0..palette.len() {
			let rgb = palette.get(index);
			let result = classifier.classify(rgb, false);
			assert_eq!(result.index, index);
			assert!(result.confidence > 0.99);
		}
	}

	#[test]
	fn ambiguous_color_has_lower_confidence_than_exact_match() {
		let palette = Palette::default_for(8).unwrap();
		let classifier = Classifier::build(&palette, ClassifierMode::Delta76Kdtree);
		let exact = classifier.classify(palette.get(0), false);
		let midpoint = Rgb::new(127, 127, 127);
		let ambiguous = classifier.classify(midpoint, false);
		assert!(ambiguous.confidence < exact.confidence);
	}

	#[test]
	fn linear_mode_agrees_with_kdtree_mode_on_exact_colors() {
		let palette = Palette::default_for(16).unwrap();
		let kd = Classifier::build(&palette, ClassifierMode::Delta76Kdtree);
		let linear = Classifier::build(&palette, ClassifierMode::Delta2000Linear);
		for index in 0..palette.len() {
			let rgb = palette.get(index);
			assert_eq!(kd.classify(rgb, false).index, index);
			assert_eq!(linear.classify(rgb, false).index, index);
		}
	}
}
