//! Seam between the shell and the embedded web engine.

use crate::tabs::TabId;
use lx_core::BrowserResult;
use url::Url;

/// One embedded web-engine view, owned by a tab.
pub trait EmbeddedView {
    fn load_url(&mut self, url: &Url) -> BrowserResult<()>;

    /// Stops any in-flight load.
    fn stop(&mut self) -> BrowserResult<()>;

    fn current_url(&self) -> Option<String>;

    fn set_visible(&mut self, visible: bool);
}

/// Creates engine views for new tabs.
pub trait ViewFactory {
    type View: EmbeddedView;

    fn create(&mut self, tab: TabId) -> BrowserResult<Self::View>;
}

/// Engine notifications, delivered to the window tagged with their source
/// tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    LoadStarted,
    LoadProgress(u8),
    LoadFinished,
    UrlChanged(String),
    TitleChanged(String),
}
