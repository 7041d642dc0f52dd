// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # llxt Store
//!
//! Loading and saving the llxt configuration file.
//!
//! - **Settings**: HTTP, circuit breaker and user source settings
//! - **Persistence**: default paths and TOML file I/O
//!
//! ## Usage
//!
//! ```ignore
//! use llxt_store::{default_config_path, Settings};
//!
//! let settings = Settings::load(&default_config_path()).await?;
//! let fetcher = llxt_fetch::Fetcher::new(Some(settings.to_client_config()));
//! ```

pub mod error;
pub mod persistence;
pub mod settings;

pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_config_path, load_toml, load_toml_or_default, save_toml,
};
pub use settings::{BreakerSettings, HttpSettings, Settings, SourceSettings};
