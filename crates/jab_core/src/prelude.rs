//! Prelude module for `jab_core`.
//!
//! This module provides a convenient way to import the commonly used encode
//! and decode types in one `use`.
//!
//! # Examples
//!
//! ```no_run
//! use jab_core::prelude::*;
//!
//! let mut encoder = Encoder::new(8, 1).unwrap();
//! encoder.generate(b"hello").unwrap();
//! let bitmap = encoder.bitmap().unwrap();
//! let (data, status) = decode(&bitmap, DecodeMode::Normal);
//! ```

#[doc(inline)]
pub use crate::bitmap::Bitmap;

#[doc(inline)]
pub use crate::decoder::{
	decode, decode_ex, decode_synthetic, decode_with_options, ClassifierMode, DecodeMode, DecodeOptions, DecodeStatus,
	DecodedSymbol, NcThresholds,
};

#[doc(inline)]
pub use crate::encoder::{Encoder, SyntheticParams};

#[doc(inline)]
pub use crate::palette::Palette;

#[doc(inline)]
pub use crate::error::{DecodeError, EncodeError};
