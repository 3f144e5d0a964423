use super::*;

pub(super) const WINDOW_TITLE: &str = "LibreXWebBrowser";
pub(super) const APP_ID: &str = "librex-browser";
pub(super) const ADDRESS_PLACEHOLDER: &str = "Enter URL or search query";
pub(super) const LOADING_REPAINT_INTERVAL: Duration = Duration::from_millis(50);
pub(super) const PLUS_BUTTON_MIN_SCREEN_FRACTION: f32 = 0.0175;
pub(super) const PLUS_BUTTON_MAX_SCREEN_FRACTION: f32 = 0.025;
pub(super) const PROGRESS_BAR_HEIGHT: f32 = 6.0;

/// Messages posted by engine callbacks, drained on the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum EngineMessage {
    View(TabId, ViewEvent),
    /// Shortcut pressed while page content had keyboard focus.
    Shortcut(KeyCombo),
}

pub(super) type EngineSender = mpsc::Sender<EngineMessage>;

pub(super) struct BrowserUiApp {
    pub(super) window: BrowserWindow<WryViewFactory>,
    pub(super) pool: Option<NavigationPool>,
    pub(super) engine_events: mpsc::Receiver<EngineMessage>,
    pub(super) style: ChromeStyle,
    /// egui forms of the configured shortcuts, most specific first.
    pub(super) key_shortcuts: Vec<(lx_shell::ShortcutAction, egui::KeyboardShortcut)>,
    pub(super) content_rect: Option<egui::Rect>,
    pub(super) close_sent: bool,
}
