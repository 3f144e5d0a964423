//! Keyboard shortcut parsing and lookup.

use lx_config::ShortcutBindings;
use lx_config::settings::DEFAULT_CLOSE_TAB_SHORTCUT;
use lx_config::settings::DEFAULT_CLOSE_WINDOW_SHORTCUT;
use lx_config::settings::DEFAULT_NEW_TAB_SHORTCUT;
use lx_core::BrowserError;
use lx_core::BrowserResult;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    NewTab,
    CloseTab,
    CloseWindow,
}

impl ShortcutAction {
    pub const ALL: [Self; 3] = [Self::NewTab, Self::CloseTab, Self::CloseWindow];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewTab => "new_tab",
            Self::CloseTab => "close_tab",
            Self::CloseWindow => "close_window",
        }
    }

    fn fallback(self) -> &'static str {
        match self {
            Self::NewTab => DEFAULT_NEW_TAB_SHORTCUT,
            Self::CloseTab => DEFAULT_CLOSE_TAB_SHORTCUT,
            Self::CloseWindow => DEFAULT_CLOSE_WINDOW_SHORTCUT,
        }
    }
}

/// A key plus modifier set, e.g. `Ctrl+Shift+W`.
///
/// `key` is stored upper-cased for single characters (`W`) and with its
/// original spelling for named keys (`F5`, `Tab`), so UI layers can map it
/// by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub command: bool,
    pub key: String,
}

impl KeyCombo {
    pub fn parse(input: &str) -> BrowserResult<Self> {
        let mut combo = Self {
            ctrl: false,
            shift: false,
            alt: false,
            command: false,
            key: String::new(),
        };

        for part in input.split('+').map(str::trim) {
            if part.is_empty() {
                return Err(invalid(input, "empty key segment"));
            }

            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => combo.ctrl = true,
                "shift" => combo.shift = true,
                "alt" | "option" => combo.alt = true,
                "cmd" | "command" | "meta" | "super" => combo.command = true,
                _ => {
                    if !combo.key.is_empty() {
                        return Err(invalid(input, "more than one non-modifier key"));
                    }
                    combo.key = normalize_key_name(part);
                }
            }
        }

        if combo.key.is_empty() {
            return Err(invalid(input, "missing non-modifier key"));
        }

        Ok(combo)
    }
}

impl core::fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.command {
            f.write_str("Cmd+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        f.write_str(&self.key)
    }
}

fn normalize_key_name(part: &str) -> String {
    let mut chars = part.chars();
    match (chars.next(), chars.next()) {
        (Some(single), None) => single.to_uppercase().collect(),
        _ => part.to_owned(),
    }
}

fn invalid(input: &str, reason: &str) -> BrowserError {
    BrowserError::new(
        "shell.shortcut.invalid",
        format!("invalid shortcut `{input}`: {reason}"),
    )
}

/// Resolved bindings for the three window shortcuts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutMap {
    bindings: Vec<(ShortcutAction, KeyCombo)>,
}

impl ShortcutMap {
    /// Invalid configured strings are logged and replaced by the built-in
    /// binding for that action.
    pub fn from_bindings(bindings: &ShortcutBindings) -> Self {
        let configured = |action: ShortcutAction| match action {
            ShortcutAction::NewTab => bindings.new_tab.as_str(),
            ShortcutAction::CloseTab => bindings.close_tab.as_str(),
            ShortcutAction::CloseWindow => bindings.close_window.as_str(),
        };

        let mut resolved = Vec::with_capacity(ShortcutAction::ALL.len());
        for action in ShortcutAction::ALL {
            let combo = KeyCombo::parse(configured(action)).or_else(|error| {
                warn!(
                    "{error}; falling back to {} for {}",
                    action.fallback(),
                    action.as_str()
                );
                KeyCombo::parse(action.fallback())
            });
            match combo {
                Ok(combo) => resolved.push((action, combo)),
                Err(error) => warn!("built-in shortcut unusable: {error}"),
            }
        }

        Self { bindings: resolved }
    }

    pub fn combo_for(&self, action: ShortcutAction) -> Option<&KeyCombo> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == action)
            .map(|(_, combo)| combo)
    }

    pub fn action_for(&self, pressed: &KeyCombo) -> Option<ShortcutAction> {
        self.bindings
            .iter()
            .find(|(_, combo)| combo == pressed)
            .map(|(action, _)| *action)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShortcutAction, &KeyCombo)> {
        self.bindings.iter().map(|(action, combo)| (*action, combo))
    }
}

impl Default for ShortcutMap {
    fn default() -> Self {
        Self::from_bindings(&ShortcutBindings::default())
    }
}
