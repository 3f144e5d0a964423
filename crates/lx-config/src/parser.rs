//! Flat `key=value` file parsing.

use lx_core::BrowserError;
use lx_core::BrowserResult;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;
use tracing::warn;

/// Parsed configuration entries, keyed by trimmed key.
pub type ConfigMap = BTreeMap<String, String>;

/// Why a single line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRejection {
    MissingSeparator,
    EmptyKey,
    EmptyValue,
}

impl LineRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingSeparator => "missing `=` separator",
            Self::EmptyKey => "empty key",
            Self::EmptyValue => "empty value",
        }
    }
}

/// Outcome of parsing one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    Skip,
    Entry { key: &'a str, value: &'a str },
    Rejected(LineRejection),
}

/// Classifies one line. Splits on the first `=` so values may contain `=`
/// (search paths such as `/?q=` rely on this).
pub fn parse_line(line: &str) -> ParsedLine<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return ParsedLine::Skip;
    }

    let Some((key, value)) = trimmed.split_once('=') else {
        return ParsedLine::Rejected(LineRejection::MissingSeparator);
    };

    let key = key.trim();
    let value = value.trim();
    if key.is_empty() {
        return ParsedLine::Rejected(LineRejection::EmptyKey);
    }
    if value.is_empty() {
        return ParsedLine::Rejected(LineRejection::EmptyValue);
    }

    ParsedLine::Entry { key, value }
}

/// Parses `source`; `origin` only labels log lines. Rejected lines are logged
/// and skipped, later duplicates overwrite earlier keys.
pub fn parse_config(source: &str, origin: &str) -> ConfigMap {
    let mut map = ConfigMap::new();

    for (index, line) in source.lines().enumerate() {
        match parse_line(line) {
            ParsedLine::Skip => {}
            ParsedLine::Entry { key, value } => {
                map.insert(key.to_owned(), value.to_owned());
            }
            ParsedLine::Rejected(reason) => {
                warn!(
                    origin,
                    line = index + 1,
                    "ignoring malformed config line ({}): {:?}",
                    reason.as_str(),
                    line.trim()
                );
            }
        }
    }

    map
}

pub fn load_config_file(path: &Path) -> BrowserResult<ConfigMap> {
    let content = fs::read_to_string(path).map_err(|error| {
        BrowserError::new(
            "config.read_failed",
            format!("failed to read config file `{}`: {error}", path.display()),
        )
    })?;

    Ok(parse_config(&content, &path.display().to_string()))
}

/// Like [`load_config_file`], but a missing or unreadable file becomes an
/// empty map so callers fall through to their defaults.
pub fn load_config_or_default(path: &Path) -> ConfigMap {
    match load_config_file(path) {
        Ok(map) => map,
        Err(error) => {
            info!("{error}; using built-in defaults");
            ConfigMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LineRejection;
    use super::ParsedLine;
    use super::load_config_file;
    use super::load_config_or_default;
    use super::parse_config;
    use super::parse_line;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_config_path(name: &str) -> std::path::PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|value| value.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!("librex-config-test-{stamp}-{name}"))
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let map = parse_config("# comment\n\n   \n  # indented comment\nkey=value\n", "test");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("key").map(String::as_str), Some("value"));
    }

    #[test]
    fn malformed_lines_do_not_stop_later_entries() {
        let source = "no separator here\n=orphan value\nempty_value=\nsearch_engine=https://example.org\n";
        let map = parse_config(source, "test");
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get("search_engine").map(String::as_str),
            Some("https://example.org")
        );
    }

    #[test]
    fn splits_on_first_separator_and_trims() {
        assert_eq!(
            parse_line("  search_path =  /?q=  "),
            ParsedLine::Entry {
                key: "search_path",
                value: "/?q="
            }
        );
    }

    #[test]
    fn classifies_rejections() {
        assert_eq!(
            parse_line("just text"),
            ParsedLine::Rejected(LineRejection::MissingSeparator)
        );
        assert_eq!(
            parse_line(" = value"),
            ParsedLine::Rejected(LineRejection::EmptyKey)
        );
        assert_eq!(
            parse_line("key =   "),
            ParsedLine::Rejected(LineRejection::EmptyValue)
        );
    }

    #[test]
    fn later_duplicates_win() {
        let map = parse_config("new_tab=Ctrl+T\nnew_tab=Ctrl+N\n", "test");
        assert_eq!(map.get("new_tab").map(String::as_str), Some("Ctrl+N"));
    }

    #[test]
    fn missing_file_reports_read_failure() {
        let loaded = load_config_file(&temp_config_path("missing.conf"));
        assert!(loaded.is_err());
        if let Err(error) = loaded {
            assert_eq!(error.code, "config.read_failed");
        }
    }

    #[test]
    fn missing_file_falls_back_to_empty_map() {
        let map = load_config_or_default(&temp_config_path("absent.conf"));
        assert!(map.is_empty());
    }

    #[test]
    fn loads_file_from_disk() {
        let path = temp_config_path("favicon.conf");
        let wrote = std::fs::write(&path, "# favicon\nfavicon=icons/app.ico\n");
        assert!(wrote.is_ok());

        let map = load_config_or_default(&path);
        assert_eq!(map.get("favicon").map(String::as_str), Some("icons/app.ico"));

        let _ = std::fs::remove_file(path);
    }
}
