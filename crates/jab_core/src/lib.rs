//! Core codec for JABCode ("Just Another Bar Code"), a polychrome 2-D matrix
//! symbology.
//!
//! This crate implements the encoder and decoder core: data segmentation,
//! LDPC error correction, module placement and masking, perceptual color
//! classification, and the synthetic (non-camera) decode path. File I/O,
//! camera-image detection, and language bindings are deliberately out of
//! scope — see the crate-level modules below for where each concern lives.
//!
//! # Examples
//!
//! ```
//! use jab_core::encoder::Encoder;
//! use jab_core::decoder::{decode_synthetic, DecodeMode};
//!
//! let mut encoder = Encoder::new(8, 1).unwrap();
//! encoder.generate(b"Hello JABCode!").unwrap();
//!
//! let bitmap = encoder.bitmap().unwrap();
//! let params = encoder.synthetic_params().unwrap();
//! let (data, status) = decode_synthetic(bitmap, &params, DecodeMode::Normal);
//! assert_eq!(data.as_deref(), Some(&b"Hello JABCode!"[..]));
//! assert_eq!(status, jab_core::decoder::DecodeStatus::FullyDecoded);
//! ```

pub mod bitmap;
pub mod bitstream;
pub mod color;
pub mod decoder;
pub mod encoder;
pub mod encoding_modes;
pub mod error;
pub mod kdtree;
pub mod ldpc;
pub mod palette;
pub mod placement;
pub mod prelude;
pub mod symbol;

pub use error::{DecodeError, EncodeError};
