use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::logger::object::{LoggerFormat, LoggerLevel};

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Filter expression (e.g. "info", "rankrun_exec=trace,warn").
    pub level: LoggerLevel,
    /// Include module targets in each line.
    pub with_targets: bool,
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            with_targets: false,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Colour is used only when enabled and stderr, where logs go, is a terminal.
    ///
    /// Call at initialization time, not while parsing config.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stderr().is_terminal()
    }
}
