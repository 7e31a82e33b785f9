//! Internal crate for `jabcode`.
//!
//! This module is separated into its own crate to keep the public facade
//! crate thin and to give `jab_core` room to grow its own sub-crates later
//! without breaking the facade's public surface. It should not be used
//! directly.
//!
//! # Examples
//!
//! ```rust
//! use jab_internal::prelude::*;
//!
//! let mut encoder = Encoder::new(8, 1).unwrap();
//! encoder.generate(b"hello").unwrap();
//! ```

/// `use jab_internal::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export jab_core for convenience.
pub use jab_core;
