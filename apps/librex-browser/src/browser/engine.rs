//! `wry` webviews as the embedded engine behind each tab.
//!
//! A view starts out pending: `wry` needs the native parent window, which
//! eframe only hands out during `update`, so [`WryView::realize`] builds the
//! webview on the first frame after the tab is created.

use super::types::EngineSender;
use super::*;
use lx_core::BrowserError;
use lx_core::BrowserResult;
use lx_shell::EmbeddedView;
use lx_shell::ViewFactory;
use raw_window_handle::HasWindowHandle;
use tracing::debug;
use tracing::error;
use tracing::warn;
use url::Url;
use wry::PageLoadEvent;
use wry::Rect;
use wry::WebView;
use wry::WebViewBuilder;
use wry::dpi::LogicalPosition;
use wry::dpi::LogicalSize;

const IPC_PROGRESS_PREFIX: &str = "progress:";
const IPC_SHORTCUT_PREFIX: &str = "key:";

/// Injected into every page: reports intermediate load progress and
/// forwards modifier shortcuts that the page would otherwise swallow.
const BRIDGE_SCRIPT: &str = r#"
(function () {
  function post(message) {
    try { window.ipc.postMessage(message); } catch (_) {}
  }
  document.addEventListener('readystatechange', function () {
    if (document.readyState === 'interactive') { post('progress:60'); }
  });
  window.addEventListener('load', function () { post('progress:90'); });
  document.addEventListener('keydown', function (event) {
    if (!(event.ctrlKey || event.metaKey || event.altKey)) { return; }
    if (['Control', 'Shift', 'Alt', 'Meta'].indexOf(event.key) >= 0) { return; }
    var parts = [];
    if (event.ctrlKey) { parts.push('Ctrl'); }
    if (event.metaKey) { parts.push('Cmd'); }
    if (event.altKey) { parts.push('Alt'); }
    if (event.shiftKey) { parts.push('Shift'); }
    parts.push(event.key.length === 1 ? event.key.toUpperCase() : event.key);
    post('key:' + parts.join('+'));
  }, true);
})();
"#;

pub(super) struct WryViewFactory {
    events: EngineSender,
    repaint: egui::Context,
}

impl WryViewFactory {
    pub(super) fn new(events: EngineSender, repaint: egui::Context) -> Self {
        Self { events, repaint }
    }
}

impl ViewFactory for WryViewFactory {
    type View = WryView;

    fn create(&mut self, tab: TabId) -> BrowserResult<WryView> {
        Ok(WryView {
            tab,
            webview: None,
            pending_url: None,
            visible: true,
            bounds: None,
            failed: false,
            events: self.events.clone(),
            repaint: self.repaint.clone(),
        })
    }
}

pub(super) struct WryView {
    tab: TabId,
    webview: Option<WebView>,
    pending_url: Option<String>,
    visible: bool,
    bounds: Option<egui::Rect>,
    failed: bool,
    events: EngineSender,
    repaint: egui::Context,
}

impl WryView {
    pub(super) fn is_realized(&self) -> bool {
        self.webview.is_some()
    }

    /// Builds the native webview as a child of `parent`. A failed build is
    /// logged once and not retried; the tab then stays blank.
    pub(super) fn realize<W: HasWindowHandle>(&mut self, parent: &W, bounds: egui::Rect) {
        if self.webview.is_some() || self.failed {
            return;
        }

        let url = self
            .pending_url
            .take()
            .unwrap_or_else(|| "about:blank".to_owned());

        match self.build(parent, &url, bounds) {
            Ok(webview) => {
                debug!(tab = %self.tab, %url, "webview realized");
                self.webview = Some(webview);
                self.bounds = Some(bounds);
            }
            Err(build_error) => {
                error!(tab = %self.tab, "{build_error}");
                self.failed = true;
            }
        }
    }

    fn build<W: HasWindowHandle>(
        &self,
        parent: &W,
        url: &str,
        bounds: egui::Rect,
    ) -> BrowserResult<WebView> {
        let tab = self.tab;

        let load_events = self.events.clone();
        let load_repaint = self.repaint.clone();
        let navigation_events = self.events.clone();
        let navigation_repaint = self.repaint.clone();
        let title_events = self.events.clone();
        let title_repaint = self.repaint.clone();
        let ipc_events = self.events.clone();
        let ipc_repaint = self.repaint.clone();

        WebViewBuilder::new()
            .with_url(url)
            .with_visible(self.visible)
            .with_bounds(to_wry_rect(bounds))
            .with_initialization_script(BRIDGE_SCRIPT)
            .with_on_page_load_handler(move |event, url| {
                let messages = match event {
                    PageLoadEvent::Started => vec![
                        ViewEvent::LoadStarted,
                        ViewEvent::LoadProgress(10),
                        ViewEvent::UrlChanged(url),
                    ],
                    PageLoadEvent::Finished => vec![ViewEvent::LoadFinished],
                };
                for message in messages {
                    let _ = load_events.send(EngineMessage::View(tab, message));
                }
                load_repaint.request_repaint();
            })
            .with_navigation_handler(move |url| {
                let _ = navigation_events.send(EngineMessage::View(tab, ViewEvent::UrlChanged(url)));
                navigation_repaint.request_repaint();
                true
            })
            .with_document_title_changed_handler(move |title| {
                let _ = title_events.send(EngineMessage::View(tab, ViewEvent::TitleChanged(title)));
                title_repaint.request_repaint();
            })
            .with_ipc_handler(move |request: wry::http::Request<String>| {
                if let Some(message) = parse_ipc_message(tab, request.body()) {
                    let _ = ipc_events.send(message);
                    ipc_repaint.request_repaint();
                }
            })
            .build_as_child(parent)
            .map_err(|error| {
                BrowserError::new(
                    "app.engine.webview_build_failed",
                    format!("failed to create webview: {error}"),
                )
            })
    }

    /// Keeps the native view glued to the content area.
    pub(super) fn set_bounds(&mut self, bounds: egui::Rect) {
        if self.bounds == Some(bounds) {
            return;
        }
        self.bounds = Some(bounds);
        if let Some(webview) = &self.webview {
            if let Err(error) = webview.set_bounds(to_wry_rect(bounds)) {
                warn!(tab = %self.tab, "failed to resize webview: {error}");
            }
        }
    }
}

impl EmbeddedView for WryView {
    fn load_url(&mut self, url: &Url) -> BrowserResult<()> {
        if self.failed {
            return Err(BrowserError::new(
                "app.engine.view_unavailable",
                format!("cannot load {url}: webview for {} was never built", self.tab),
            ));
        }

        let Some(webview) = &self.webview else {
            self.pending_url = Some(url.to_string());
            return Ok(());
        };

        webview.load_url(url.as_str()).map_err(|error| {
            BrowserError::new(
                "app.engine.load_failed",
                format!("webview refused {url}: {error}"),
            )
        })
    }

    fn stop(&mut self) -> BrowserResult<()> {
        let Some(webview) = &self.webview else {
            return Ok(());
        };

        webview.evaluate_script("window.stop();").map_err(|error| {
            BrowserError::new(
                "app.engine.stop_failed",
                format!("failed to stop page load: {error}"),
            )
        })
    }

    fn current_url(&self) -> Option<String> {
        match &self.webview {
            Some(webview) => webview.url().ok(),
            None => self.pending_url.clone(),
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if let Some(webview) = &self.webview {
            if let Err(error) = webview.set_visible(visible) {
                warn!(tab = %self.tab, "failed to toggle webview visibility: {error}");
            }
        }
    }
}

fn to_wry_rect(rect: egui::Rect) -> Rect {
    Rect {
        position: LogicalPosition::new(f64::from(rect.min.x), f64::from(rect.min.y)).into(),
        size: LogicalSize::new(
            f64::from(rect.width().max(1.0)),
            f64::from(rect.height().max(1.0)),
        )
        .into(),
    }
}

/// Decodes a message posted by [`BRIDGE_SCRIPT`].
pub(super) fn parse_ipc_message(tab: TabId, body: &str) -> Option<EngineMessage> {
    if let Some(percent) = body.strip_prefix(IPC_PROGRESS_PREFIX) {
        let percent = percent.trim().parse::<u8>().ok()?;
        return Some(EngineMessage::View(
            tab,
            ViewEvent::LoadProgress(percent.min(100)),
        ));
    }

    if let Some(combo) = body.strip_prefix(IPC_SHORTCUT_PREFIX) {
        return KeyCombo::parse(combo).ok().map(EngineMessage::Shortcut);
    }

    debug!(%tab, "ignoring unknown ipc message");
    None
}
