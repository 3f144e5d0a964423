use std::time::Duration;
use std::time::Instant;

/// How long the bar stays at 100% after a load finishes.
pub const FINISH_HIDE_DELAY: Duration = Duration::from_millis(500);

/// Shared loading indicator mirrored from the active tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressIndicator {
    value: u8,
    visible: bool,
    hide_at: Option<Instant>,
}

impl ProgressIndicator {
    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn fraction(&self) -> f32 {
        f32::from(self.value) / 100.0
    }

    pub fn pending_hide(&self) -> Option<Instant> {
        self.hide_at
    }

    pub fn start(&mut self) {
        self.value = 0;
        self.visible = true;
        self.hide_at = None;
    }

    pub fn set_progress(&mut self, percent: u8) {
        self.value = percent.min(100);
    }

    pub fn finish(&mut self, now: Instant) {
        self.value = 100;
        self.hide_at = Some(now + FINISH_HIDE_DELAY);
    }

    /// Applies a pending hide once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.hide_at.is_some_and(|deadline| now >= deadline) {
            self.visible = false;
            self.hide_at = None;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
