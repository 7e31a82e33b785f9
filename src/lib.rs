#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `jabcode` is a Rust implementation of JABCode ("Just Another Bar Code"),
//! a polychrome 2-D matrix barcode symbology that uses a multi-color palette
//! instead of the usual black/white modules to raise data density per
//! module.
//!
//! This facade crate re-exports [`jab_internal`]'s public surface, which in
//! turn re-exports the `jab_core` codec crate's; application code typically
//! only needs `use jabcode::prelude::*;`.
pub use jab_internal::*;
