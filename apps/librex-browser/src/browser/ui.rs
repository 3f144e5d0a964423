use super::startup::pump_platform_events;
use super::theme::color;
use super::types::ADDRESS_PLACEHOLDER;
use super::types::BrowserUiApp;
use super::types::LOADING_REPAINT_INTERVAL;
use super::types::PLUS_BUTTON_MAX_SCREEN_FRACTION;
use super::types::PLUS_BUTTON_MIN_SCREEN_FRACTION;
use super::types::PROGRESS_BAR_HEIGHT;
use super::*;
use lx_shell::ShortcutAction;
use lx_shell::ShortcutMap;
use lx_shell::pool::DEFAULT_NAVIGATION_WORKERS;
use std::sync::Arc;
use tracing::error;
use tracing::warn;

impl BrowserUiApp {
    pub(super) fn new(ctx: &egui::Context, settings: ShellSettings, style: ChromeStyle) -> Self {
        let (tx, rx) = mpsc::channel();
        let factory = WryViewFactory::new(tx, ctx.clone());

        let repaint = ctx.clone();
        let pool = match NavigationPool::with_waker(
            settings.search.clone(),
            DEFAULT_NAVIGATION_WORKERS,
            Arc::new(move || repaint.request_repaint()),
        ) {
            Ok(pool) => Some(pool),
            Err(pool_error) => {
                error!("navigation workers unavailable, address bar disabled: {pool_error}");
                None
            }
        };

        let mut window = BrowserWindow::new(settings, factory);
        if window.open_initial_tab().is_none() {
            warn!("browser started without an initial tab");
        }
        let key_shortcuts = egui_shortcuts(window.shortcuts());

        Self {
            window,
            pool,
            engine_events: rx,
            style,
            key_shortcuts,
            content_rect: None,
            close_sent: false,
        }
    }

    fn submit_address(&mut self) {
        let Some(pool) = self.pool.as_ref() else {
            warn!("navigation ignored: no worker pool");
            return;
        };
        let _ = self.window.submit_address(pool);
    }

    fn poll_navigation(&mut self) {
        if let Some(pool) = self.pool.as_ref() {
            self.window.poll_navigation(pool);
        }
    }

    fn poll_engine_events(&mut self) {
        let now = Instant::now();
        while let Ok(message) = self.engine_events.try_recv() {
            match message {
                EngineMessage::View(tab, event) => self.window.handle_view_event(tab, event, now),
                EngineMessage::Shortcut(combo) => {
                    if let Some(action) = self.window.shortcuts().action_for(&combo) {
                        self.window.handle_shortcut(action);
                    }
                }
            }
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let mut triggered = None;
        ctx.input_mut(|input| {
            for (action, shortcut) in &self.key_shortcuts {
                if input.consume_shortcut(shortcut) {
                    triggered = Some(*action);
                    break;
                }
            }
        });

        if let Some(action) = triggered {
            self.window.handle_shortcut(action);
        }
    }

    /// Builds pending webviews and keeps the active one sized to the
    /// content area.
    fn sync_engine_views(&mut self, frame: &eframe::Frame) {
        let Some(rect) = self.content_rect else {
            return;
        };

        let active = self.window.tabs().active_id();
        for tab in self.window.tabs_mut().iter_mut() {
            if Some(tab.id) != active && !tab.view.is_realized() {
                continue;
            }
            tab.view.realize(frame, rect);
            tab.view.set_bounds(rect);
        }
    }

    fn render_address_bar(&mut self, ui: &mut egui::Ui) {
        let response = ui.add_sized(
            [ui.available_width(), 28.0],
            egui::TextEdit::singleline(self.window.address_mut()).hint_text(ADDRESS_PLACEHOLDER),
        );

        let pressed_enter =
            response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));
        if pressed_enter {
            self.submit_address();
        }
    }

    fn render_progress(&self, ui: &mut egui::Ui) {
        let progress = self.window.progress();
        if !progress.is_visible() {
            return;
        }

        ui.add(
            egui::ProgressBar::new(progress.fraction())
                .desired_width(ui.available_width())
                .desired_height(PROGRESS_BAR_HEIGHT)
                .fill(color(self.style.progress_color)),
        );
    }

    fn render_tab_strip(&mut self, ui: &mut egui::Ui) {
        let mut select = None;
        let mut close = None;
        let mut shift: Option<(usize, usize)> = None;
        let active = self.window.tabs().active_index();
        let count = self.window.tabs().len();

        ui.horizontal(|ui| {
            for (index, tab) in self.window.tabs().iter().enumerate() {
                let is_active = Some(index) == active;
                let label = ui
                    .selectable_label(is_active, tab.label.as_str())
                    .on_hover_text(tab.url.as_str());
                if label.clicked() {
                    select = Some(index);
                }
                if label.middle_clicked() {
                    close = Some(index);
                }
                if ui.small_button("x").on_hover_text("Close tab").clicked() {
                    close = Some(index);
                }
                ui.separator();
            }

            if let Some(index) = active {
                if ui
                    .add_enabled(index > 0, egui::Button::new("<").small())
                    .on_hover_text("Move tab left")
                    .clicked()
                {
                    shift = Some((index, index - 1));
                }
                if ui
                    .add_enabled(index + 1 < count, egui::Button::new(">").small())
                    .on_hover_text("Move tab right")
                    .clicked()
                {
                    shift = Some((index, index + 1));
                }
            }

            let side = plus_button_side(ui.ctx().screen_rect().size(), ui.spacing().interact_size.y);
            let plus = ui.add_sized([side, side], egui::Button::new("+"));
            if plus.on_hover_text("New tab").clicked() {
                let _ = self.window.new_tab(None, lx_shell::window::NEW_TAB_LABEL, true);
            }
        });

        if let Some((from, to)) = shift {
            self.window.move_tab(from, to);
        }
        if let Some(index) = close {
            self.window.close_tab(index);
        } else if let Some(index) = select {
            self.window.set_current_tab(index);
        }
    }
}

impl eframe::App for BrowserUiApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        pump_platform_events();
        self.poll_engine_events();
        self.poll_navigation();
        self.handle_keyboard_shortcuts(ctx);
        self.window.tick(Instant::now());

        if self.window.progress().is_visible() {
            ctx.request_repaint_after(LOADING_REPAINT_INTERVAL);
        }

        egui::TopBottomPanel::top("chrome_panel").show(ctx, |ui| {
            self.render_address_bar(ui);
            self.render_progress(ui);
            self.render_tab_strip(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            ui.allocate_rect(rect, egui::Sense::hover());
            if self.window.tabs().is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("No tab could be opened. Check the log for details.");
                });
            }
            self.content_rect = Some(rect);
        });

        self.sync_engine_views(frame);

        if self.window.is_close_requested() && !self.close_sent {
            self.close_sent = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

/// Maps configured combos to egui shortcuts, most specific first so that
/// `Ctrl+Shift+W` is not consumed as `Ctrl+W`.
pub(super) fn egui_shortcuts(map: &ShortcutMap) -> Vec<(ShortcutAction, egui::KeyboardShortcut)> {
    let mut shortcuts: Vec<_> = map
        .iter()
        .filter_map(|(action, combo)| match to_egui_shortcut(combo) {
            Some(shortcut) => Some((action, shortcut)),
            None => {
                warn!("shortcut {combo} has no egui key equivalent");
                None
            }
        })
        .collect();
    shortcuts.sort_by_key(|(_, shortcut)| std::cmp::Reverse(modifier_count(shortcut.modifiers)));
    shortcuts
}

pub(super) fn to_egui_shortcut(combo: &KeyCombo) -> Option<egui::KeyboardShortcut> {
    let key = egui::Key::from_name(&combo.key)?;
    let mut modifiers = egui::Modifiers::NONE;
    if combo.ctrl {
        modifiers = modifiers | egui::Modifiers::CTRL;
    }
    if combo.shift {
        modifiers = modifiers | egui::Modifiers::SHIFT;
    }
    if combo.alt {
        modifiers = modifiers | egui::Modifiers::ALT;
    }
    if combo.command {
        modifiers = modifiers | egui::Modifiers::MAC_CMD;
    }
    Some(egui::KeyboardShortcut::new(modifiers, key))
}

fn modifier_count(modifiers: egui::Modifiers) -> usize {
    [
        modifiers.ctrl,
        modifiers.shift,
        modifiers.alt,
        modifiers.mac_cmd,
    ]
    .into_iter()
    .filter(|pressed| *pressed)
    .count()
}

/// Side of the square `+` button: the widget's natural height, kept between
/// fixed fractions of the screen width.
pub(super) fn plus_button_side(screen: egui::Vec2, natural: f32) -> f32 {
    let min = screen.x * PLUS_BUTTON_MIN_SCREEN_FRACTION;
    let max = (screen.x * PLUS_BUTTON_MAX_SCREEN_FRACTION).max(min);
    natural.clamp(min, max)
}
