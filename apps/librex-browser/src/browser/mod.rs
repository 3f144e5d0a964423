use eframe::egui;
use lx_config::ChromeStyle;
use lx_config::ShellSettings;
use lx_shell::BrowserWindow;
use lx_shell::KeyCombo;
use lx_shell::NavigationPool;
use lx_shell::TabId;
use lx_shell::ViewEvent;
use std::sync::mpsc;
use std::time::Duration;
use std::time::Instant;

mod engine;
mod startup;
mod theme;
mod types;
mod ui;


use engine::WryViewFactory;
use types::EngineMessage;

pub(crate) use startup::run;
