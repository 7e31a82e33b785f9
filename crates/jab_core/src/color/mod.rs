//! CIE LAB color conversion and perceptual distance.
//!
//! sRGB primaries, D65 illuminant, gamma 2.4 with a linear toe below the
//! documented thresholds. All conversions are infallible: out-of-range or
//! non-finite intermediates collapse to 0.0 rather than propagating NaN/Inf.

use std::f64::consts::PI;

/// D65 reference white X component.
const REF_X: f64 = 95.047;
/// D65 reference white Y component.
const REF_Y: f64 = 100.000;
/// D65 reference white Z component.
const REF_Z: f64 = 108.883;

/// (6/29)^3 — threshold between the linear and cube-root branches of `f`.
const LAB_EPSILON: f64 = 0.008856;
/// (29/3)^3 — slope of the linear branch of `f`.
const LAB_KAPPA: f64 = 903.3;

/// An 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
}

impl Rgb {
	/// Creates a new RGB color.
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self {
			r,
			g,
			b,
		}
	}
}

/// A CIE 1931 XYZ tristimulus color, scaled to the 0-100 convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
	/// X component.
	pub x: f64,
	/// Y component.
	pub y: f64,
	/// Z component.
	pub z: f64,
}

/// A CIE LAB color: `l` in `[0, 100]`, `a`/`b` in `[-128, 127]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
	/// Lightness.
	pub l: f64,
	/// Green-red axis.
	pub a: f64,
	/// Blue-yellow axis.
	pub b: f64,
}

impl Lab {
	/// Clamps this color's components to the valid LAB ranges, collapsing
	/// any non-finite component to zero first.
	pub fn clamp(self) -> Self {
		let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
		Self {
			l: finite(self.l).clamp(0.0, 100.0),
			a: finite(self.a).clamp(-128.0, 127.0),
			b: finite(self.b).clamp(-128.0, 127.0),
		}
	}
}

fn linearize_channel(channel: f64) -> f64 {
	if channel > 0.04045 {
		((channel + 0.055) / 1.055).powf(2.4)
	} else {
		channel / 12.92
	}
}

fn delinearize_channel(linear: f64) -> f64 {
	if linear > 0.0031308 {
		1.055 * linear.powf(1.0 / 2.4) - 0.055
	} else {
		12.92 * linear
	}
}

fn lab_f(t: f64) -> f64 {
	if t > LAB_EPSILON {
		t.cbrt()
	} else {
		(LAB_KAPPA * t + 16.0) / 116.0
	}
}

fn lab_f_inv(t: f64) -> f64 {
	let t3 = t * t * t;
	if t3 > LAB_EPSILON {
		t3
	} else {
		(116.0 * t - 16.0) / LAB_KAPPA
	}
}

fn finite_or_zero(v: f64) -> f64 {
	if v.is_finite() { v } else { 0.0 }
}

/// Converts sRGB to CIE XYZ (D65, scaled to 0-100).
pub fn rgb_to_xyz(rgb: Rgb) -> Xyz {
	let r = linearize_channel(rgb.r as f64 / 255.0);
	let g = linearize_channel(rgb.g as f64 / 255.0);
	let b = linearize_channel(rgb.b as f64 / 255.0);

	Xyz {
		x: (r * 0.4124564 + g * 0.3575761 + b * 0.1804375) * 100.0,
		y: (r * 0.2126729 + g * 0.7151522 + b * 0.0721750) * 100.0,
		z: (r * 0.0193339 + g * 0.1191920 + b * 0.9503041) * 100.0,
	}
}

/// Converts CIE XYZ to CIE LAB.
pub fn xyz_to_lab(xyz: Xyz) -> Lab {
	let xr = xyz.x / REF_X;
	let yr = xyz.y / REF_Y;
	let zr = xyz.z / REF_Z;

	let fx = lab_f(xr);
	let fy = lab_f(yr);
	let fz = lab_f(zr);

	Lab {
		l: 116.0 * fy - 16.0,
		a: 500.0 * (fx - fy),
		b: 200.0 * (fy - fz),
	}
}

/// Converts sRGB directly to CIE LAB.
pub fn rgb_to_lab(rgb: Rgb) -> Lab {
	xyz_to_lab(rgb_to_xyz(rgb))
}

/// Converts CIE LAB to CIE XYZ. Inputs are clamped to the valid LAB ranges
/// before conversion; any non-finite output collapses to zero.
pub fn lab_to_xyz(lab: Lab) -> Xyz {
	let lab = lab.clamp();

	let fy = (lab.l + 16.0) / 116.0;
	let fx = lab.a / 500.0 + fy;
	let fz = fy - lab.b / 200.0;

	Xyz {
		x: finite_or_zero(lab_f_inv(fx) * REF_X),
		y: finite_or_zero(lab_f_inv(fy) * REF_Y),
		z: finite_or_zero(lab_f_inv(fz) * REF_Z),
	}
}

/// Converts CIE XYZ to sRGB, clamping to `[0, 255]`.
pub fn xyz_to_rgb(xyz: Xyz) -> Rgb {
	let x = xyz.x / 100.0;
	let y = xyz.y / 100.0;
	let z = xyz.z / 100.0;

	let r = x * 3.2404542 + y * -1.5371385 + z * -0.4985314;
	let g = x * -0.9692660 + y * 1.8760108 + z * 0.0415560;
	let b = x * 0.0556434 + y * -0.2040259 + z * 1.0572252;

	let to_byte = |linear: f64| -> u8 {
		let gamma = delinearize_channel(linear).clamp(0.0, 1.0);
		(gamma * 255.0 + 0.5) as u8
	};

	Rgb::new(to_byte(r), to_byte(g), to_byte(b))
}

/// Converts CIE LAB directly to sRGB.
pub fn lab_to_rgb(lab: Lab) -> Rgb {
	xyz_to_rgb(lab_to_xyz(lab))
}

/// ΔE76: Euclidean distance in LAB space.
pub fn delta_e_76(a: Lab, b: Lab) -> f64 {
	let dl = a.l - b.l;
	let da = a.a - b.a;
	let db = a.b - b.b;
	(dl * dl + da * da + db * db).sqrt()
}

/// ΔE2000: CIEDE2000 perceptual color difference, with k_L = k_C = k_H = 1.
#[allow(clippy::many_single_char_names)]
pub fn delta_e_2000(lab1: Lab, lab2: Lab) -> f64 {
	let k_l = 1.0;
	let k_c = 1.0;
	let k_h = 1.0;

	let c1 = (lab1.a * lab1.a + lab1.b * lab1.b).sqrt();
	let c2 = (lab2.a * lab2.a + lab2.b * lab2.b).sqrt();
	let c_avg = (c1 + c2) / 2.0;

	let c_avg_7 = c_avg.powf(7.0);
	let g = 0.5 * (1.0 - (c_avg_7 / (c_avg_7 + 25f64.powf(7.0))).sqrt());

	let a1_prime = lab1.a * (1.0 + g);
	let a2_prime = lab2.a * (1.0 + g);

	let c1_prime = (a1_prime * a1_prime + lab1.b * lab1.b).sqrt();
	let c2_prime = (a2_prime * a2_prime + lab2.b * lab2.b).sqrt();

	let mut h1_prime = lab1.b.atan2(a1_prime).to_degrees();
	let mut h2_prime = lab2.b.atan2(a2_prime).to_degrees();
	if h1_prime < 0.0 {
		h1_prime += 360.0;
	}
	if h2_prime < 0.0 {
		h2_prime += 360.0;
	}

	let dl_prime = lab2.l - lab1.l;
	let dc_prime = c2_prime - c1_prime;

	let dh_prime_raw = if c1_prime * c2_prime == 0.0 {
		0.0
	} else {
		let dh = h2_prime - h1_prime;
		if dh.abs() <= 180.0 {
			dh
		} else if dh > 180.0 {
			dh - 360.0
		} else {
			dh + 360.0
		}
	};
	let d_h_prime = 2.0 * (c1_prime * c2_prime).sqrt() * (dh_prime_raw * PI / 360.0).sin();

	let l_avg_prime = (lab1.l + lab2.l) / 2.0;
	let c_avg_prime = (c1_prime + c2_prime) / 2.0;

	let h_avg_prime = if c1_prime * c2_prime == 0.0 {
		h1_prime + h2_prime
	} else {
		let sum_h = h1_prime + h2_prime;
		let diff_h = (h1_prime - h2_prime).abs();
		if diff_h <= 180.0 {
			sum_h / 2.0
		} else if sum_h < 360.0 {
			(sum_h + 360.0) / 2.0
		} else {
			(sum_h - 360.0) / 2.0
		}
	};

	let t = 1.0 - 0.17 * ((h_avg_prime - 30.0).to_radians()).cos()
		+ 0.24 * ((2.0 * h_avg_prime).to_radians()).cos()
		+ 0.32 * ((3.0 * h_avg_prime + 6.0).to_radians()).cos()
		- 0.20 * ((4.0 * h_avg_prime - 63.0).to_radians()).cos();

	let l_avg_minus_50_sq = (l_avg_prime - 50.0) * (l_avg_prime - 50.0);
	let s_l = 1.0 + (0.015 * l_avg_minus_50_sq) / (20.0 + l_avg_minus_50_sq).sqrt();
	let s_c = 1.0 + 0.045 * c_avg_prime;
	let s_h = 1.0 + 0.015 * c_avg_prime * t;

	let d_theta = 30.0 * (-(((h_avg_prime - 275.0) / 25.0).powf(2.0))).exp();
	let c_avg_prime_7 = c_avg_prime.powf(7.0);
	let r_c = 2.0 * (c_avg_prime_7 / (c_avg_prime_7 + 25f64.powf(7.0))).sqrt();
	let r_t = -r_c * ((2.0 * d_theta).to_radians()).sin();

	let term1 = dl_prime / (k_l * s_l);
	let term2 = dc_prime / (k_c * s_c);
	let term3 = d_h_prime / (k_h * s_h);
	let term4 = r_t * term2 * term3;

	(term1 * term1 + term2 * term2 + term3 * term3 + term4).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rgb_lab_round_trip_within_quantization() {
		for &(r, g, b) in &[(0, 0, 0), (255, 255, 255), (128, 64, 200), (10, 250, 30), (1, 1, 1)] {
			let original = Rgb::new(r, g, b);
			let back = lab_to_rgb(rgb_to_lab(original));
			assert!((back.r as i32 - original.r as i32).abs() <= 1);
			assert!((back.g as i32 - original.g as i32).abs() <= 1);
			assert!((back.b as i32 - original.b as i32).abs() <= 1);
		}
	}

	#[test]
	fn delta_e_76_is_zero_for_identical_colors() {
		let lab = rgb_to_lab(Rgb::new(12, 200, 77));
		assert_eq!(delta_e_76(lab, lab), 0.0);
	}

	#[test]
	fn delta_e_2000_is_zero_for_identical_colors() {
		let lab = rgb_to_lab(Rgb::new(12, 200, 77));
		assert!(delta_e_2000(lab, lab) < 1e-9);
	}

	#[test]
	fn delta_e_76_is_symmetric() {
		let a = rgb_to_lab(Rgb::new(255, 0, 0));
		let b = rgb_to_lab(Rgb::new(0, 255, 0));
		assert!((delta_e_76(a, b) - delta_e_76(b, a)).abs() < 1e-9);
	}

	#[test]
	fn lab_clamp_collapses_non_finite() {
		let nan_lab = Lab {
			l: f64::NAN,
			a: f64::INFINITY,
			b: -f64::INFINITY,
		};
		let clamped = nan_lab.clamp();
		assert_eq!(clamped.l, 0.0);
		assert_eq!(clamped.a, 0.0);
		assert_eq!(clamped.b, 0.0);
	}

	#[test]
	fn black_and_white_are_extremes_of_lightness() {
		let black = rgb_to_lab(Rgb::new(0, 0, 0));
		let white = rgb_to_lab(Rgb::new(255, 255, 255));
		assert!(black.l < 1.0);
		assert!(white.l > 99.0);
	}
}
