//! Perceived-latency progress bar for random searches.
//!
//! The model never reaches 100% on its own; only [`Progress::settle`] does,
//! and it is always shown at 100% before [`Progress::hide`]. Drivers own the
//! repeating timer and must cancel it when the request settles.

use serde::Serialize;

use crate::config::ProgressConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    value: u8,
    visible: bool,
    step: u8,
    cap: u8,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(&ProgressConfig::default())
    }
}

impl Progress {
    pub fn new(config: &ProgressConfig) -> Self {
        Self {
            value: 0,
            visible: false,
            step: config.step.max(1),
            cap: config.cap.min(99),
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show the bar at 0%.
    pub fn start(&mut self) {
        self.value = 0;
        self.visible = true;
    }

    /// Advance one step, never past the cap.
    pub fn tick(&mut self) {
        if self.visible && self.value < self.cap {
            self.value = self.value.saturating_add(self.step).min(self.cap);
        }
    }

    /// The request finished: jump to 100%.
    pub fn settle(&mut self) {
        if self.visible {
            self.value = 100;
        }
    }

    /// Hide and reset.
    pub fn hide(&mut self) {
        self.value = 0;
        self.visible = false;
    }
}
