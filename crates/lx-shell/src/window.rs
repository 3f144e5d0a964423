//! Browser window controller: tabs, address bar, progress and navigation
//! wiring, independent of any GUI toolkit.

use crate::navigation::NavigationCounter;
use crate::navigation::NavigationId;
use crate::navigation::NavigationOutcome;
use crate::navigation::NavigationRequest;
use crate::pool::NavigationPool;
use crate::progress::ProgressIndicator;
use crate::shortcuts::ShortcutAction;
use crate::shortcuts::ShortcutMap;
use crate::tabs::CloseOutcome;
use crate::tabs::Tab;
use crate::tabs::TabId;
use crate::tabs::TabStrip;
use crate::title::tab_label;
use crate::view::EmbeddedView;
use crate::view::ViewEvent;
use crate::view::ViewFactory;
use lx_config::ShellSettings;
use std::time::Instant;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;
use url::Url;

pub const NEW_TAB_LABEL: &str = "New Tab";
const BLANK_PAGE: &str = "about:blank";

pub struct BrowserWindow<F: ViewFactory> {
    settings: ShellSettings,
    shortcuts: ShortcutMap,
    factory: F,
    tabs: TabStrip<F::View>,
    progress: ProgressIndicator,
    address: String,
    navigation: NavigationCounter,
    close_requested: bool,
}

impl<F: ViewFactory> BrowserWindow<F> {
    pub fn new(settings: ShellSettings, factory: F) -> Self {
        let shortcuts = ShortcutMap::from_bindings(&settings.shortcuts);
        Self {
            settings,
            shortcuts,
            factory,
            tabs: TabStrip::default(),
            progress: ProgressIndicator::default(),
            address: String::new(),
            navigation: NavigationCounter::default(),
            close_requested: false,
        }
    }

    pub fn settings(&self) -> &ShellSettings {
        &self.settings
    }

    pub fn shortcuts(&self) -> &ShortcutMap {
        &self.shortcuts
    }

    pub fn tabs(&self) -> &TabStrip<F::View> {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut TabStrip<F::View> {
        &mut self.tabs
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn progress(&self) -> &ProgressIndicator {
        &self.progress
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Editable address text, bound to the URL entry field.
    pub fn address_mut(&mut self) -> &mut String {
        &mut self.address
    }

    pub fn latest_navigation(&self) -> Option<NavigationId> {
        self.navigation.latest()
    }

    pub fn is_close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn open_initial_tab(&mut self) -> Option<TabId> {
        self.new_tab(None, NEW_TAB_LABEL, true)
    }

    /// Opens a tab on `url` (default: the search engine home page). Failures
    /// are logged and leave the tab strip untouched.
    pub fn new_tab(&mut self, url: Option<&str>, label: &str, switch: bool) -> Option<TabId> {
        let id = self.tabs.reserve_id();
        let mut view = match self.factory.create(id) {
            Ok(view) => view,
            Err(creation_error) => {
                error!("tab view construction failed: {creation_error}");
                return None;
            }
        };

        let Some(target) = self.initial_url(url) else {
            error!("no loadable URL for the new tab");
            return None;
        };
        if let Err(load_error) = view.load_url(&target) {
            error!("new tab could not load {target}: {load_error}");
            return None;
        }

        let index = self
            .tabs
            .insert(id, view, target.to_string(), label.to_owned(), switch);
        if self.tabs.active_index() == Some(index) {
            self.set_current_tab(index);
        } else if let Some(tab) = self.tabs.get_mut(id) {
            tab.view.set_visible(false);
        }

        debug!(%id, url = %target, "opened tab");
        Some(id)
    }

    /// `url`, else the search engine home page, else `about:blank`.
    fn initial_url(&self, url: Option<&str>) -> Option<Url> {
        let home = self.settings.search.home_url();
        let requested = url.unwrap_or(home);
        match Url::parse(requested) {
            Ok(parsed) => Some(parsed),
            Err(parse_error) => {
                warn!("invalid tab URL `{requested}` ({parse_error}), opening the home page");
                Url::parse(home).or_else(|_| Url::parse(BLANK_PAGE)).ok()
            }
        }
    }

    pub fn close_current_tab(&mut self) {
        if let Some(index) = self.tabs.active_index() {
            self.close_tab(index);
        }
    }

    /// Closing the last remaining tab closes the window instead.
    pub fn close_tab(&mut self, index: usize) {
        match self.tabs.close(index) {
            CloseOutcome::Closed(tab) => {
                debug!(id = %tab.id, "closed tab");
                drop(tab);
                if let Some(active) = self.tabs.active_index() {
                    self.set_current_tab(active);
                }
            }
            CloseOutcome::CloseWindow => self.close_window(),
            CloseOutcome::NoSuchTab => {
                error!("close requested for missing tab index {index}");
            }
        }
    }

    pub fn close_window(&mut self) {
        info!("closing browser window");
        self.close_requested = true;
    }

    /// Focuses the tab at `index`, shows only its view and syncs the
    /// address bar.
    pub fn set_current_tab(&mut self, index: usize) {
        if !self.tabs.set_active(index) {
            self.address.clear();
            return;
        }

        let active = self.tabs.active_id();
        for tab in self.tabs.iter_mut() {
            tab.view.set_visible(Some(tab.id) == active);
        }

        self.address = self
            .tabs
            .active()
            .map(current_tab_url)
            .unwrap_or_default();
        self.progress.reset();
    }

    pub fn move_tab(&mut self, from: usize, to: usize) -> bool {
        self.tabs.move_tab(from, to)
    }

    /// Issues a new navigation id for the address text; `None` for blank
    /// input. Any earlier in-flight request becomes stale.
    pub fn begin_navigation(&mut self) -> Option<NavigationRequest> {
        let input = self.address.trim();
        if input.is_empty() {
            return None;
        }

        let raw_input = input.to_owned();
        let id = self.navigation.next();
        Some(NavigationRequest { raw_input, id })
    }

    pub fn submit_address(&mut self, pool: &NavigationPool) -> Option<NavigationId> {
        let request = self.begin_navigation()?;
        let id = request.id;
        let input = request.raw_input.clone();
        match pool.submit(request) {
            Ok(()) => {
                debug!(%id, "queued navigation for `{input}`");
                Some(id)
            }
            Err(submit_error) => {
                debug!(%id, "navigation not queued: {submit_error}");
                None
            }
        }
    }

    /// Applies a worker result. Returns `true` when the active view was
    /// pointed at the resulting URL.
    pub fn apply_navigation_outcome(&mut self, outcome: NavigationOutcome) -> bool {
        if !self.navigation.is_current(outcome.id) {
            debug!(id = %outcome.id, "dropping stale navigation result");
            return false;
        }

        let url = match outcome.result {
            Ok(url) => url,
            Err(navigation_error) => {
                error!(id = %outcome.id, "navigation failed: {navigation_error}");
                return false;
            }
        };

        debug!(id = %outcome.id, "navigating active tab to {url}");
        let Some(tab) = self.tabs.active_mut() else {
            error!("no active tab to load {url} into");
            return false;
        };

        if let Err(stop_error) = tab.view.stop() {
            warn!("stopping the current load failed: {stop_error}");
        }
        if let Err(load_error) = tab.view.load_url(&url) {
            error!("loading {url} failed: {load_error}");
            return false;
        }

        tab.url = url.to_string();
        self.address = tab.url.clone();
        true
    }

    /// Drains every ready worker result.
    pub fn poll_navigation(&mut self, pool: &NavigationPool) -> usize {
        let mut applied = 0_usize;
        while let Some(outcome) = pool.try_recv() {
            if self.apply_navigation_outcome(outcome) {
                applied = applied.saturating_add(1);
            }
        }
        applied
    }

    /// Engine notifications. Progress is mirrored only for the active tab.
    pub fn handle_view_event(&mut self, source: TabId, event: ViewEvent, now: Instant) {
        let is_active = self.tabs.is_active(source);
        let Some(tab) = self.tabs.get_mut(source) else {
            debug!(%source, ?event, "dropping event for closed tab");
            return;
        };

        match event {
            ViewEvent::LoadStarted => {
                if is_active {
                    self.progress.start();
                }
            }
            ViewEvent::LoadProgress(percent) => {
                if is_active {
                    self.progress.set_progress(percent);
                }
            }
            ViewEvent::LoadFinished => {
                refresh_label(tab);
                if is_active {
                    self.progress.finish(now);
                }
            }
            ViewEvent::UrlChanged(url) => {
                tab.url = url;
                if is_active {
                    self.address = tab.url.clone();
                }
            }
            ViewEvent::TitleChanged(title) => {
                tab.title = title;
                refresh_label(tab);
            }
        }
    }

    pub fn handle_shortcut(&mut self, action: ShortcutAction) {
        debug!(action = action.as_str(), "shortcut triggered");
        match action {
            ShortcutAction::NewTab => {
                let _ = self.new_tab(None, NEW_TAB_LABEL, true);
            }
            ShortcutAction::CloseTab => self.close_current_tab(),
            ShortcutAction::CloseWindow => self.close_window(),
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.progress.tick(now);
    }
}

fn current_tab_url<V: EmbeddedView>(tab: &Tab<V>) -> String {
    tab.view.current_url().unwrap_or_else(|| tab.url.clone())
}

fn refresh_label<V>(tab: &mut Tab<V>) {
    tab.label = tab_label(&tab.title, &tab.url);
}

#[cfg(test)]
mod tests {
    use super::BrowserWindow;
    use super::NEW_TAB_LABEL;
    use crate::navigation::NavigationOutcome;
    use crate::pool::NavigationPool;
    use crate::shortcuts::ShortcutAction;
    use crate::tabs::TabId;
    use crate::view::EmbeddedView;
    use crate::view::ViewEvent;
    use crate::view::ViewFactory;
    use lx_config::SearchEngine;
    use lx_config::ShellSettings;
    use lx_core::BrowserError;
    use lx_core::BrowserResult;
    use std::time::Duration;
    use std::time::Instant;
    use url::Url;

    #[derive(Debug, Default)]
    struct FakeView {
        loaded: Vec<String>,
        stops: usize,
        visible: bool,
        fail_loads: bool,
    }

    impl EmbeddedView for FakeView {
        fn load_url(&mut self, url: &Url) -> BrowserResult<()> {
            if self.fail_loads {
                return Err(BrowserError::new("test.load_failed", "load refused"));
            }
            self.loaded.push(url.to_string());
            Ok(())
        }

        fn stop(&mut self) -> BrowserResult<()> {
            self.stops += 1;
            Ok(())
        }

        fn current_url(&self) -> Option<String> {
            self.loaded.last().cloned()
        }

        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }
    }

    #[derive(Debug, Default)]
    struct FakeFactory {
        fail_create: bool,
        fail_loads: bool,
        created: Vec<TabId>,
    }

    impl ViewFactory for FakeFactory {
        type View = FakeView;

        fn create(&mut self, tab: TabId) -> BrowserResult<FakeView> {
            if self.fail_create {
                return Err(BrowserError::new("test.create_failed", "no engine"));
            }
            self.created.push(tab);
            Ok(FakeView {
                fail_loads: self.fail_loads,
                ..FakeView::default()
            })
        }
    }

    fn window() -> BrowserWindow<FakeFactory> {
        let mut window = BrowserWindow::new(ShellSettings::default(), FakeFactory::default());
        assert!(window.open_initial_tab().is_some());
        window
    }

    fn active_loads(window: &BrowserWindow<FakeFactory>) -> Vec<String> {
        window
            .tabs()
            .active()
            .map(|tab| tab.view.loaded.clone())
            .unwrap_or_default()
    }

    fn resolved(window: &mut BrowserWindow<FakeFactory>, input: &str) -> NavigationOutcome {
        window.address_mut().clear();
        window.address_mut().push_str(input);
        window
            .begin_navigation()
            .unwrap_or_else(|| unreachable!())
            .resolve(&SearchEngine::default())
    }

    #[test]
    fn initial_tab_opens_search_engine_home() {
        let window = window();
        assert_eq!(window.tabs().len(), 1);
        assert_eq!(active_loads(&window), vec!["https://duckduckgo.com/"]);
        assert_eq!(window.address(), "https://duckduckgo.com/");
        assert!(window.tabs().active().is_some_and(|tab| tab.view.visible));
        assert_eq!(
            window.tabs().active().map(|tab| tab.label.as_str()),
            Some(NEW_TAB_LABEL)
        );
    }

    #[test]
    fn background_tab_stays_hidden() {
        let mut window = window();
        let background = window.new_tab(Some("https://example.com/"), "bg", false);
        assert!(background.is_some());
        assert_eq!(window.tabs().active_index(), Some(0));
        let hidden = background.and_then(|id| window.tabs().get(id));
        assert!(hidden.is_some_and(|tab| !tab.view.visible));
    }

    #[test]
    fn factory_failure_leaves_tabs_unchanged() {
        let mut window = window();
        window.factory_mut().fail_create = true;
        assert!(window.new_tab(None, NEW_TAB_LABEL, true).is_none());
        assert_eq!(window.tabs().len(), 1);
    }

    #[test]
    fn closing_sole_tab_closes_window() {
        let mut window = window();
        window.close_current_tab();
        assert!(window.is_close_requested());
        assert_eq!(window.tabs().len(), 1);
    }

    #[test]
    fn closing_one_of_two_tabs_keeps_window_open() {
        let mut window = window();
        assert!(window.new_tab(Some("https://example.com/"), "two", true).is_some());
        window.close_tab(1);
        assert!(!window.is_close_requested());
        assert_eq!(window.tabs().len(), 1);
        assert_eq!(window.address(), "https://duckduckgo.com/");
        assert!(window.tabs().active().is_some_and(|tab| tab.view.visible));
    }

    #[test]
    fn current_navigation_loads_into_active_tab() {
        let mut window = window();
        let outcome = resolved(&mut window, "example.com");
        assert!(window.apply_navigation_outcome(outcome));

        assert_eq!(
            active_loads(&window).last().map(String::as_str),
            Some("https://example.com/")
        );
        assert_eq!(window.address(), "https://example.com/");
        assert!(window.tabs().active().is_some_and(|tab| tab.view.stops == 1));
    }

    #[test]
    fn stale_navigation_is_dropped() {
        let mut window = window();
        let stale = resolved(&mut window, "old.example");
        let fresh = resolved(&mut window, "cats");

        assert!(window.apply_navigation_outcome(fresh));
        let before = active_loads(&window);
        assert!(!window.apply_navigation_outcome(stale));
        assert_eq!(active_loads(&window), before);
        assert_eq!(window.address(), "https://duckduckgo.com/?q=cats");
    }

    #[test]
    fn stale_navigation_is_dropped_even_if_it_arrives_first() {
        let mut window = window();
        let stale = resolved(&mut window, "first.example");
        let _pending = resolved(&mut window, "second.example");

        assert!(!window.apply_navigation_outcome(stale));
        assert_eq!(active_loads(&window), vec!["https://duckduckgo.com/"]);
    }

    #[test]
    fn navigation_error_changes_nothing() {
        let mut window = window();
        let mut outcome = resolved(&mut window, "cats");
        outcome.result = Err(BrowserError::new("test.failed", "boom"));
        assert!(!window.apply_navigation_outcome(outcome));
        assert_eq!(active_loads(&window).len(), 1);
    }

    #[test]
    fn blank_address_does_not_issue_an_id() {
        let mut window = window();
        window.address_mut().clear();
        window.address_mut().push_str("   ");
        assert!(window.begin_navigation().is_none());
        assert!(window.latest_navigation().is_none());
    }

    #[test]
    fn submitted_address_round_trips_through_pool() {
        let mut window = window();
        let pool = NavigationPool::new(SearchEngine::default(), 1)
            .unwrap_or_else(|_| unreachable!());
        window.address_mut().clear();
        window.address_mut().push_str("rust-lang.org");
        assert!(window.submit_address(&pool).is_some());

        let outcome = pool.recv_timeout(Duration::from_secs(5));
        assert!(outcome.is_some_and(|outcome| window.apply_navigation_outcome(outcome)));
        assert_eq!(window.address(), "https://rust-lang.org/");
    }

    #[test]
    fn progress_mirrors_only_active_tab() {
        let mut window = window();
        let active = window.tabs().active_id().unwrap_or_else(|| unreachable!());
        let background = window
            .new_tab(None, "bg", false)
            .unwrap_or_else(|| unreachable!());
        let now = Instant::now();

        window.handle_view_event(background, ViewEvent::LoadStarted, now);
        window.handle_view_event(background, ViewEvent::LoadProgress(40), now);
        assert!(!window.progress().is_visible());

        window.handle_view_event(active, ViewEvent::LoadStarted, now);
        window.handle_view_event(active, ViewEvent::LoadProgress(40), now);
        assert!(window.progress().is_visible());
        assert_eq!(window.progress().value(), 40);

        window.handle_view_event(background, ViewEvent::LoadFinished, now);
        assert_eq!(window.progress().value(), 40);

        window.handle_view_event(active, ViewEvent::LoadFinished, now);
        assert_eq!(window.progress().value(), 100);
        window.tick(now + Duration::from_secs(1));
        assert!(!window.progress().is_visible());
    }

    #[test]
    fn url_changes_update_address_only_for_active_tab() {
        let mut window = window();
        let active = window.tabs().active_id().unwrap_or_else(|| unreachable!());
        let background = window
            .new_tab(None, "bg", false)
            .unwrap_or_else(|| unreachable!());
        let now = Instant::now();

        window.handle_view_event(
            background,
            ViewEvent::UrlChanged("https://bg.example/".to_owned()),
            now,
        );
        assert_eq!(window.address(), "https://duckduckgo.com/");
        assert_eq!(
            window.tabs().get(background).map(|tab| tab.url.as_str()),
            Some("https://bg.example/")
        );

        window.handle_view_event(
            active,
            ViewEvent::UrlChanged("https://fg.example/".to_owned()),
            now,
        );
        assert_eq!(window.address(), "https://fg.example/");
    }

    #[test]
    fn titles_are_truncated_or_fall_back_to_url() {
        let mut window = window();
        let id = window.tabs().active_id().unwrap_or_else(|| unreachable!());
        let now = Instant::now();

        window.handle_view_event(
            id,
            ViewEvent::TitleChanged("abcdefghijklmnopqrst".to_owned()),
            now,
        );
        assert_eq!(
            window.tabs().get(id).map(|tab| tab.label.as_str()),
            Some("abcdefghijklmno...")
        );

        window.handle_view_event(id, ViewEvent::TitleChanged(String::new()), now);
        window.handle_view_event(id, ViewEvent::LoadFinished, now);
        assert_eq!(
            window.tabs().get(id).map(|tab| tab.label.as_str()),
            Some("https://duckduckgo.com/")
        );
    }

    #[test]
    fn switching_tabs_syncs_address_and_visibility() {
        let mut window = window();
        let second = window
            .new_tab(Some("https://example.com/"), "two", false)
            .unwrap_or_else(|| unreachable!());

        window.set_current_tab(1);
        assert_eq!(window.address(), "https://example.com/");
        assert!(window.tabs().get(second).is_some_and(|tab| tab.view.visible));
        assert!(window.tabs().at(0).is_some_and(|tab| !tab.view.visible));
    }

    #[test]
    fn shortcuts_drive_tab_lifecycle() {
        let mut window = window();
        window.handle_shortcut(ShortcutAction::NewTab);
        assert_eq!(window.tabs().len(), 2);
        assert_eq!(window.tabs().active_index(), Some(1));

        window.handle_shortcut(ShortcutAction::CloseTab);
        assert_eq!(window.tabs().len(), 1);
        assert!(!window.is_close_requested());

        window.handle_shortcut(ShortcutAction::CloseWindow);
        assert!(window.is_close_requested());
    }

    #[test]
    fn events_from_closed_tabs_are_ignored() {
        let mut window = window();
        let doomed = window
            .new_tab(None, "doomed", true)
            .unwrap_or_else(|| unreachable!());
        window.close_current_tab();
        window.handle_view_event(doomed, ViewEvent::LoadStarted, Instant::now());
        assert!(!window.progress().is_visible());
    }

    #[test]
    fn unparsable_tab_url_falls_back_to_home_then_blank() {
        let mut window = window();
        assert!(window.new_tab(Some("::bad"), "x", true).is_some());
        assert_eq!(active_loads(&window), vec!["https://duckduckgo.com/"]);

        let mut settings = ShellSettings::default();
        settings.search.base_url = "not a url".to_owned();
        let mut broken = BrowserWindow::new(settings, FakeFactory::default());
        assert!(broken.open_initial_tab().is_some());
        assert_eq!(active_loads(&broken), vec!["about:blank"]);
    }

    #[test]
    fn failed_initial_load_drops_the_tab() {
        let mut window = window();
        window.factory_mut().fail_loads = true;
        assert!(window.new_tab(Some("https://example.com/"), "x", true).is_none());
        assert_eq!(window.tabs().len(), 1);
        assert_eq!(window.tabs().active_index(), Some(0));
        assert_eq!(window.factory_mut().created.len(), 2);
    }
}
