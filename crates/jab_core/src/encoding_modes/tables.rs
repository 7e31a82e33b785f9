//! The eight encode modes: six fixed-alphabet tables, raw Byte, and the
//! FNC1 application-escape flag.

/// A character-stream encode mode and its on-wire parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
	/// Uppercase letters and space.
	Upper,
	/// Lowercase letters and space.
	Lower,
	/// Digits and space.
	Numeric,
	/// Punctuation and space.
	Punct,
	/// Upper- and lowercase letters, digits, and space.
	Mixed,
	/// The QR-style 45-character alphanumeric set.
	Alphanum,
	/// Raw bytes, 8 bits per symbol.
	Byte,
	/// Application-escape flag carrying no payload of its own.
	Fnc1,
}

/// The eight modes in their 3-bit mode-prefix order.
pub const ALL_MODES: [Mode; 8] =
	[Mode::Upper, Mode::Lower, Mode::Numeric, Mode::Punct, Mode::Mixed, Mode::Alphanum, Mode::Byte, Mode::Fnc1];

/// The subset of modes [`crate::encoding_modes::segment::segment`] will
/// choose among. `Fnc1` is never auto-selected; a caller inserts it
/// explicitly as an application-level escape.
pub const SEGMENTABLE_MODES: [Mode; 7] =
	[Mode::Upper, Mode::Lower, Mode::Numeric, Mode::Punct, Mode::Mixed, Mode::Alphanum, Mode::Byte];

const UPPER_TABLE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ ";
const LOWER_TABLE: &[u8] = b"abcdefghijklmnopqrstuvwxyz ";
const NUMERIC_TABLE: &[u8] = b"0123456789 ";
const PUNCT_TABLE: &[u8] = b" !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|";
const MIXED_TABLE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 ";
const ALPHANUM_TABLE: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

impl Mode {
	/// The 3-bit prefix value written before every segment in this mode.
	pub fn code(self) -> u32 {
		ALL_MODES.iter().position(|&m| m == self).expect("Mode is one of ALL_MODES") as u32
	}

	/// Looks up a mode from its 3-bit prefix value.
	pub fn from_code(code: u32) -> Option<Self> {
		ALL_MODES.get(code as usize).copied()
	}

	/// Width, in bits, of this mode's length field.
	pub fn length_bits(self) -> u32 {
		match self {
			Mode::Upper | Mode::Lower | Mode::Punct | Mode::Mixed | Mode::Alphanum => 9,
			Mode::Numeric => 10,
			Mode::Byte => 13,
			Mode::Fnc1 => 0,
		}
	}

	/// Width, in bits, of one symbol in this mode.
	pub fn bits_per_symbol(self) -> u32 {
		match self {
			Mode::Upper | Mode::Lower | Mode::Punct => 5,
			Mode::Numeric => 4,
			Mode::Mixed | Mode::Alphanum => 6,
			Mode::Byte => 8,
			Mode::Fnc1 => 0,
		}
	}

	fn table(self) -> &'static [u8] {
		match self {
			Mode::Upper => UPPER_TABLE,
			Mode::Lower => LOWER_TABLE,
			Mode::Numeric => NUMERIC_TABLE,
			Mode::Punct => PUNCT_TABLE,
			Mode::Mixed => MIXED_TABLE,
			Mode::Alphanum => ALPHANUM_TABLE,
			Mode::Byte | Mode::Fnc1 => &[],
		}
	}

	/// Encodes one input byte to this mode's symbol value. `Byte` accepts
	/// any value directly; table modes look the byte up in their alphabet.
	pub fn encode_symbol(self, byte: u8) -> Option<u32> {
		match self {
			Mode::Byte => Some(byte as u32),
			Mode::Fnc1 => None,
			_ => self.table().iter().position(|&c| c == byte).map(|index| index as u32),
		}
	}

	/// Decodes a symbol value back to the byte it represents.
	pub fn decode_symbol(self, value: u32) -> Option<u8> {
		match self {
			Mode::Byte => u8::try_from(value).ok(),
			Mode::Fnc1 => None,
			_ => self.table().get(value as usize).copied(),
		}
	}
}
