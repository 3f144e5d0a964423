//! Flat-text configuration for the LibreX shell: search engine, favicon,
//! shortcut bindings and the chrome stylesheet.

pub mod parser;
pub mod settings;
pub mod style;

use std::path::Path;
use std::path::PathBuf;

pub use parser::ConfigMap;
pub use parser::load_config_file;
pub use parser::load_config_or_default;
pub use parser::parse_config;
pub use settings::SearchEngine;
pub use settings::ShellSettings;
pub use settings::ShortcutBindings;
pub use style::ChromeStyle;
pub use style::Rgb;

pub const CONFIG_DIR_ENV: &str = "LIBREX_CONFIG_DIR";
pub const SEARCH_ENGINE_FILE: &str = "search_engine.conf";
pub const FAVICON_FILE: &str = "favicon.conf";
pub const SHORTCUTS_FILE: &str = "shortcuts.conf";
pub const STYLESHEET_FILE: &str = "chrome.style";

/// Directory holding the shell's config files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDir {
    root: PathBuf,
}

impl ConfigDir {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// `$LIBREX_CONFIG_DIR`, else `./config`.
    pub fn resolve() -> Self {
        if let Some(override_root) = std::env::var_os(CONFIG_DIR_ENV) {
            return Self::new(PathBuf::from(override_root));
        }

        let root = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("config");
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn search_engine_file(&self) -> PathBuf {
        self.root.join(SEARCH_ENGINE_FILE)
    }

    pub fn favicon_file(&self) -> PathBuf {
        self.root.join(FAVICON_FILE)
    }

    pub fn shortcuts_file(&self) -> PathBuf {
        self.root.join(SHORTCUTS_FILE)
    }

    pub fn stylesheet_file(&self) -> PathBuf {
        self.root.join(STYLESHEET_FILE)
    }
}
