// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # llxt Core
//!
//! Core types shared across the llxt crates.
//!
//! ## Key Types
//!
//! - [`Entry`] - A documentation source with its `llms.txt` URLs
//! - [`CoreError`] - Errors raised while building or validating entries

pub mod error;
pub mod models;

pub use error::CoreError;
pub use models::{slugify, Entry};
