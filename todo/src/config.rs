//! Configuration for the Todo List widget.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use widget_runtime::StoreConfig;

/// Widget configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoListConfig {
    /// Text of the `h1` heading
    pub heading: String,
    /// Key name that submits the new-todo input
    pub submit_key: String,
    /// Actions buffered for each action subscriber
    pub broadcast_capacity: usize,
    /// How long `unmount` waits for in-flight work, in seconds
    pub shutdown_timeout_secs: u64,
}

impl Default for TodoListConfig {
    fn default() -> Self {
        Self {
            heading: "Todo List".to_string(),
            submit_key: "Enter".to_string(),
            broadcast_capacity: 16,
            shutdown_timeout_secs: 30,
        }
    }
}

impl TodoListConfig {
    /// Load configuration from environment variables.
    ///
    /// | variable                          | default     |
    /// |-----------------------------------|-------------|
    /// | `TODO_LIST_HEADING`               | `Todo List` |
    /// | `TODO_LIST_SUBMIT_KEY`            | `Enter`     |
    /// | `TODO_LIST_BROADCAST_CAPACITY`    | `16`        |
    /// | `TODO_LIST_SHUTDOWN_TIMEOUT_SECS` | `30`        |
    ///
    /// Unparseable numbers fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            heading: env::var("TODO_LIST_HEADING").unwrap_or(defaults.heading),
            submit_key: env::var("TODO_LIST_SUBMIT_KEY").unwrap_or(defaults.submit_key),
            broadcast_capacity: env::var("TODO_LIST_BROADCAST_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.broadcast_capacity),
            shutdown_timeout_secs: env::var("TODO_LIST_SHUTDOWN_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.shutdown_timeout_secs),
        }
    }

    /// How long `unmount` waits for in-flight work
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Store settings derived from this configuration
    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.broadcast_capacity, self.shutdown_timeout())
    }
}
