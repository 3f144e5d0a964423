use super::types::APP_ID;
use super::types::BrowserUiApp;
use super::types::WINDOW_TITLE;
use super::*;
use lx_config::ConfigDir;
use std::any::Any;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::Once;
use tracing::error;
use tracing::info;
use tracing::warn;

pub(crate) fn run() -> ExitCode {
    init_logging();
    install_panic_logger();

    let config_dir = ConfigDir::resolve();
    info!(dir = %config_dir.root().display(), "loading shell configuration");
    let settings = ShellSettings::load(&config_dir);
    let style = ChromeStyle::load(&settings.stylesheet);

    init_platform_toolkit();

    let mut viewport = egui::ViewportBuilder::default()
        .with_title(WINDOW_TITLE)
        .with_app_id(APP_ID)
        .with_inner_size([1320.0, 840.0])
        .with_min_inner_size([640.0, 480.0])
        .with_maximized(true);
    if let Some(icon) = load_window_icon(&settings.favicon) {
        viewport = viewport.with_icon(Arc::new(icon));
    }

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let launched = eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(move |cc| {
            theme::apply_chrome_style(&cc.egui_ctx, &style);
            Ok(Box::new(BrowserUiApp::new(&cc.egui_ctx, settings, style)))
        }),
    );

    match launched {
        Ok(()) => ExitCode::SUCCESS,
        Err(launch_error) => {
            error!("failed to start the browser window: {launch_error}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` overrides the default `info` level.
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    let _ = subscriber.try_init();
}

/// Routes panics from any thread through `tracing`, then runs the previous
/// hook so the default report and backtrace still appear.
fn install_panic_logger() {
    static PANIC_HOOK: Once = Once::new();
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown location".to_owned());
            let thread = std::thread::current();
            error!(
                thread = thread.name().unwrap_or("unnamed"),
                %location,
                "unhandled panic: {}",
                panic_message(info.payload())
            );
            previous(info);
        }));
    });
}

pub(super) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}

/// wry's Linux backend is WebKitGTK, which needs GTK initialized on the UI
/// thread before the first webview is built.
#[cfg(target_os = "linux")]
fn init_platform_toolkit() {
    if let Err(gtk_error) = gtk::init() {
        error!("GTK initialization failed, tabs will have no web content: {gtk_error}");
    }
}

#[cfg(not(target_os = "linux"))]
fn init_platform_toolkit() {}

/// Runs pending GTK work so WebKitGTK views keep painting under winit.
#[cfg(target_os = "linux")]
pub(super) fn pump_platform_events() {
    while gtk::events_pending() {
        gtk::main_iteration_do(false);
    }
}

#[cfg(not(target_os = "linux"))]
pub(super) fn pump_platform_events() {}

pub(super) fn load_window_icon(path: &Path) -> Option<egui::IconData> {
    let decoded = match image::open(path) {
        Ok(decoded) => decoded,
        Err(icon_error) => {
            warn!("failed to load favicon `{}`: {icon_error}", path.display());
            return None;
        }
    };

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width,
        height,
    })
}
