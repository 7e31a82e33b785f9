//! Palette construction: deterministic default grids and (via [`adaptive`])
//! per-decode drift correction.

pub mod adaptive;

use crate::color::{rgb_to_lab, Lab, Rgb};

/// The color counts a palette may hold. The 256-color variant is
/// excluded — see the crate's design notes.
pub const VALID_COLOR_NUMBERS: [u32; 6] = [4, 8, 16, 32, 64, 128];

/// An ordered table of `N` colors. Index 0 is always black, index `N-1` is
/// always white.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
	colors: Vec<Rgb>,
}

impl Palette {
	/// Wraps an already-built color list. Debug-asserts the black/white
	/// anchor invariant rather than re-deriving it, since callers that use
	/// this constructor (versus [`Palette::default_for`]) are responsible
	/// for honoring it.
	pub fn from_colors(colors: Vec<Rgb>) -> Self {
		debug_assert!(!colors.is_empty());
		debug_assert_eq!(colors[0], Rgb::new(0, 0, 0));
		debug_assert_eq!(*colors.last().unwrap(), Rgb::new(255, 255, 255));
		Self {
			colors,
		}
	}

	/// Builds the deterministic default palette for `color_number`. Returns
	/// `None` for any value outside [`VALID_COLOR_NUMBERS`].
	pub fn default_for(color_number: u32) -> Option<Self> {
		if color_number == 4 {
			return Some(Self::from_colors(four_color_corners()));
		}

		let (dr, dg, db) = axis_divisions(color_number)?;
		let mut colors = Vec::with_capacity(color_number as usize);
		for r in 0..dr {
			for g in 0..dg {
				for b in 0..db {
					colors.push(Rgb::new(
						channel_value(r, dr),
						channel_value(g, dg),
						channel_value(b, db),
					));
				}
			}
		}
		Some(Self::from_colors(colors))
	}

	/// Number of colors in the palette.
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	/// `true` if the palette holds no colors (never true for a palette
	/// built via [`Palette::default_for`]).
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Gets the color at `index`.
	pub fn get(&self, index: usize) -> Rgb {
		self.colors[index]
	}

	/// Replaces the color at `index`.
	pub fn set(&mut self, index: usize, color: Rgb) {
		self.colors[index] = color;
	}

	/// Iterates the palette's colors in index order.
	pub fn iter(&self) -> impl Iterator<Item = &Rgb> {
		self.colors.iter()
	}

	/// Converts every color to LAB, in index order.
	pub fn as_lab(&self) -> Vec<Lab> {
		self.colors.iter().map(|&c| rgb_to_lab(c)).collect()
	}
}

fn axis_divisions(color_number: u32) -> Option<(u32, u32, u32)> {
	match color_number {
		8 => Some((2, 2, 2)),
		16 => Some((4, 2, 2)),
		32 => Some((4, 4, 2)),
		64 => Some((4, 4, 4)),
		128 => Some((4, 4, 8)),
		_ => None,
	}
}

fn channel_value(step: u32, divisions: u32) -> u8 {
	if divisions <= 1 {
		0
	} else {
		((step * 255) as f64 / (divisions - 1) as f64).round() as u8
	}
}

fn four_color_corners() -> Vec<Rgb> {
	vec![Rgb::new(0, 0, 0), Rgb::new(255, 0, 0), Rgb::new(0, 255, 255), Rgb::new(255, 255, 255)]
}
