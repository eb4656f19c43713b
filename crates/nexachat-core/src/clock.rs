//! Timestamp source for `sentAt`.
//!
//! Messages carry a display-formatted time string rather than an instant;
//! the string is fixed at creation and never re-rendered.

use chrono::format::{Item, StrftimeItems};

use crate::error::CoreError;

/// Default format, close to a browser's `toLocaleTimeString()` (`3:04:05 PM`).
pub const DEFAULT_TIME_FORMAT: &str = "%-I:%M:%S %p";

/// Produces the `sentAt` string for newly created messages.
pub trait Clock: Send + Sync {
    fn now_display(&self) -> String;
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    format: String,
}

impl SystemClock {
    /// Create a clock rendering with a chrono strftime `format`.
    pub fn new(format: impl Into<String>) -> Result<Self, CoreError> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(CoreError::InvalidTimeFormat(format));
        }
        Ok(Self { format })
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl Clock for SystemClock {
    fn now_display(&self) -> String {
        chrono::Local::now().format(&self.format).to_string()
    }
}

/// A clock that always reports the same string. Used for deterministic tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(pub String);

impl FixedClock {
    pub fn new(display: impl Into<String>) -> Self {
        Self(display.into())
    }
}

impl Clock for FixedClock {
    fn now_display(&self) -> String {
        self.0.clone()
    }
}
