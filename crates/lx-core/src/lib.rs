//! Shared primitives used across LibreX crates.

use core::fmt;

/// Result alias used across the workspace.
pub type BrowserResult<T> = Result<T, BrowserError>;

/// Coded error shared by the config loader, shell model and app layer.
///
/// `code` is a dotted identifier namespaced by the emitting module
/// (`config.read_failed`, `shell.navigation.empty_input`, ...) so callers can
/// branch on it without matching message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserError {
    pub code: &'static str,
    pub message: String,
}

impl BrowserError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for BrowserError {}
