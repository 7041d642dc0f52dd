//! Exit codes and user-facing command errors.

use llxt_fetch::{FetchError, FetchErrorKind};
use llxt_registry::RegistryError;
use llxt_store::StoreError;
use thiserror::Error;

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Source not in the registry, or the document does not exist.
    NotFound = 2,
    /// Network or HTTP failure.
    Network = 3,
    /// Config file could not be loaded.
    Config = 4,
    /// Missing or malformed arguments.
    InvalidInput = 5,
    /// The server rate limited the request.
    RateLimited = 6,
}

/// A failure with a chosen exit code and an optional hint.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CommandError {
    code: ExitCode,
    message: String,
    hint: Option<String>,
}

impl CommandError {
    /// Creates an error with the given exit code.
    pub fn new(code: ExitCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
        }
    }

    /// Attaches a hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Exit code for this error.
    pub fn code(&self) -> ExitCode {
        self.code
    }

    /// Hint, if any.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Error for a command invoked without its required source name.
    pub fn missing_name(command: &str) -> Self {
        Self::new(
            ExitCode::InvalidInput,
            format!("name is required\n\nUsage: llxt {command} <name>"),
        )
    }

    /// Error for a registry miss.
    pub fn from_registry(name: &str, err: &RegistryError) -> Self {
        let code = if err.is_not_found() {
            ExitCode::NotFound
        } else {
            ExitCode::Config
        };
        let message = if err.is_not_found() {
            format!("Source {name:?} not found")
        } else {
            err.to_string()
        };
        let mut e = Self::new(code, message);
        if let Some(hint) = err.hint() {
            e = e.with_hint(hint);
        }
        e
    }

    /// Error for a failed fetch.
    pub fn from_fetch(err: &FetchError) -> Self {
        let code = fetch_exit_code(err.kind());
        let mut e = Self::new(code, format!("Failed to fetch llms.txt: {err}"));

        let hint = match (err.hint(), err.retry_after()) {
            (Some(hint), Some(after)) => Some(format!("{hint} (retry after {after})")),
            (Some(hint), None) => Some(hint.to_string()),
            _ => None,
        };
        if let Some(hint) = hint {
            e = e.with_hint(hint);
        }
        e
    }

    /// Error for an unusable config file.
    pub fn from_store(err: &StoreError) -> Self {
        Self::new(ExitCode::Config, format!("Failed to load config: {err}"))
    }
}

/// Maps a fetch failure kind to an exit code.
pub fn fetch_exit_code(kind: FetchErrorKind) -> ExitCode {
    match kind {
        FetchErrorKind::NotFound => ExitCode::NotFound,
        FetchErrorKind::RateLimited => ExitCode::RateLimited,
        FetchErrorKind::Transport | FetchErrorKind::ServerOrClientError => ExitCode::Network,
    }
}

/// Picks the exit code for an error returned by a command.
pub fn code_for(err: &anyhow::Error) -> ExitCode {
    if let Some(e) = err.downcast_ref::<CommandError>() {
        e.code()
    } else if err.downcast_ref::<StoreError>().is_some() {
        ExitCode::Config
    } else {
        ExitCode::Error
    }
}
