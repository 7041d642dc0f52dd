//! Output formatting for CLI.

mod json;
mod spinner;
mod text;

pub use json::JsonFormatter;
pub use spinner::Spinner;
pub use text::TextFormatter;
