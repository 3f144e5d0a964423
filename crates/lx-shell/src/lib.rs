//! Toolkit-independent browser shell: address bar normalization, the
//! navigation worker pool, tabs, progress and title reflection, shortcuts,
//! and the window controller that ties them to an embedded engine view.

pub mod navigation;
pub mod pool;
pub mod progress;
pub mod shortcuts;
pub mod tabs;
pub mod title;
pub mod view;
pub mod window;

pub use navigation::NavigationCounter;
pub use navigation::NavigationId;
pub use navigation::NavigationOutcome;
pub use navigation::NavigationRequest;
pub use navigation::normalize_input;
pub use pool::NavigationPool;
pub use progress::ProgressIndicator;
pub use shortcuts::KeyCombo;
pub use shortcuts::ShortcutAction;
pub use shortcuts::ShortcutMap;
pub use tabs::CloseOutcome;
pub use tabs::Tab;
pub use tabs::TabId;
pub use tabs::TabStrip;
pub use title::tab_label;
pub use title::truncate_title;
pub use view::EmbeddedView;
pub use view::ViewEvent;
pub use view::ViewFactory;
pub use window::BrowserWindow;
