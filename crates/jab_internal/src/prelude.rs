//! Prelude module for `jab_internal`.
//!
//! Re-exports [`jab_core`]'s own prelude so downstream crates only need one
//! `use`.
//!
//! # Examples
//!
//! ```no_run
//! use jab_internal::prelude::*;
//!
//! let mut encoder = Encoder::new(8, 1).unwrap();
//! encoder.generate(b"hello").unwrap();
//! let bitmap = encoder.bitmap().unwrap();
//! let (data, status) = decode(&bitmap, DecodeMode::Normal);
//! ```

#[doc(inline)]
pub use jab_core::prelude::*;
