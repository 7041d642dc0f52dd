//! Domain models for llxt.
//!
//! ## Submodules
//!
//! - [`entry`] - Registry entries (`Entry`) and key normalization

mod entry;

pub use entry::{slugify, Entry};
