//! Interactive UI timing

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    /// How long a form stays open after a successful submit
    pub close_delay_ms: u64,
    /// How long a notification stays on screen
    pub toast_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: 2000,
            toast_secs: 5,
        }
    }
}

/// `[ui]` section as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileUi {
    pub close_delay_ms: Option<u64>,
    pub toast_secs: Option<u64>,
}

impl UiConfig {
    pub fn from_file(file: Option<FileUi>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            close_delay_ms: file.close_delay_ms.unwrap_or(defaults.close_delay_ms),
            toast_secs: file.toast_secs.unwrap_or(defaults.toast_secs),
        }
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toast_secs)
    }
}
