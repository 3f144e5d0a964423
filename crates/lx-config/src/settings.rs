//! Typed shell settings assembled from config maps.

use crate::ConfigDir;
use crate::parser::ConfigMap;
use crate::parser::load_config_or_default;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_SEARCH_ENGINE: &str = "https://duckduckgo.com";
pub const DEFAULT_SEARCH_PATH: &str = "/?q=";
pub const DEFAULT_FAVICON_PATH: &str = "assets/icons/favicons/favicon.ico";
pub const DEFAULT_NEW_TAB_SHORTCUT: &str = "Ctrl+T";
pub const DEFAULT_CLOSE_TAB_SHORTCUT: &str = "Ctrl+W";
pub const DEFAULT_CLOSE_WINDOW_SHORTCUT: &str = "Ctrl+Shift+W";

/// Search engine used for non-URL address bar input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEngine {
    pub base_url: String,
    pub query_path: String,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_ENGINE.to_owned(),
            query_path: DEFAULT_SEARCH_PATH.to_owned(),
        }
    }
}

impl SearchEngine {
    pub fn from_map(map: &ConfigMap) -> Self {
        let defaults = Self::default();
        Self {
            base_url: value_or(map, &["search_engine"], defaults.base_url),
            query_path: value_or(map, &["search_path"], defaults.query_path),
        }
    }

    /// Page opened by new tabs without an explicit URL.
    pub fn home_url(&self) -> &str {
        &self.base_url
    }

    /// Concatenates base URL, query path and an already-encoded query.
    pub fn query_url(&self, encoded_query: &str) -> String {
        let mut out =
            String::with_capacity(self.base_url.len() + self.query_path.len() + encoded_query.len());
        out.push_str(&self.base_url);
        out.push_str(&self.query_path);
        out.push_str(encoded_query);
        out
    }
}

/// Raw shortcut strings, parsed later by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutBindings {
    pub new_tab: String,
    pub close_tab: String,
    pub close_window: String,
}

impl Default for ShortcutBindings {
    fn default() -> Self {
        Self {
            new_tab: DEFAULT_NEW_TAB_SHORTCUT.to_owned(),
            close_tab: DEFAULT_CLOSE_TAB_SHORTCUT.to_owned(),
            close_window: DEFAULT_CLOSE_WINDOW_SHORTCUT.to_owned(),
        }
    }
}

impl ShortcutBindings {
    pub fn from_map(map: &ConfigMap) -> Self {
        let defaults = Self::default();
        Self {
            new_tab: value_or(map, &["new_tab"], defaults.new_tab),
            close_tab: value_or(map, &["close_tab"], defaults.close_tab),
            close_window: value_or(map, &["close_browser", "close_window"], defaults.close_window),
        }
    }
}

/// Everything the shell reads from disk at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSettings {
    pub search: SearchEngine,
    pub favicon: PathBuf,
    pub shortcuts: ShortcutBindings,
    pub stylesheet: PathBuf,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            search: SearchEngine::default(),
            favicon: PathBuf::from(DEFAULT_FAVICON_PATH),
            shortcuts: ShortcutBindings::default(),
            stylesheet: PathBuf::from(crate::STYLESHEET_FILE),
        }
    }
}

impl ShellSettings {
    /// Never fails; every missing file or key is logged and defaulted.
    pub fn load(dir: &ConfigDir) -> Self {
        let search = SearchEngine::from_map(&load_config_or_default(&dir.search_engine_file()));
        let favicon_map = load_config_or_default(&dir.favicon_file());
        let favicon = favicon_map
            .get("favicon")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                debug!("no `favicon` key configured, using {DEFAULT_FAVICON_PATH}");
                PathBuf::from(DEFAULT_FAVICON_PATH)
            });
        let shortcuts = ShortcutBindings::from_map(&load_config_or_default(&dir.shortcuts_file()));

        Self {
            search,
            favicon,
            shortcuts,
            stylesheet: dir.stylesheet_file(),
        }
    }
}

fn value_or(map: &ConfigMap, keys: &[&str], default: String) -> String {
    for key in keys {
        if let Some(value) = map.get(*key) {
            return value.clone();
        }
    }
    debug!("config key `{}` not set, using `{default}`", keys.join("|"));
    default
}
