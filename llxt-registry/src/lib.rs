// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # llxt Registry
//!
//! The set of known `llms.txt` sources.
//!
//! A [`Registry`] is an ordinary value: build one with
//! [`Registry::bundled`] (the data compiled into the binary) or
//! [`Registry::from_json`], merge user entries into it, and pass it to
//! whatever needs lookups.

mod data;
pub mod error;
pub mod registry;

pub use error::{RegistryError, LOOKUP_HINT};
pub use registry::Registry;
