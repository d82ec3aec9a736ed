//! Scheduler configuration.

use serde::{Deserialize, Serialize};

const DEFAULT_NAME: &str = "sensor";
const DEFAULT_INBOX_CAPACITY: usize = 64;

/// Settings for one scheduler instance.
///
/// Deserializable with every field optional, so it can be embedded in an
/// application's own config file:
///
/// ```rust
/// use sensor::runtime::SchedulerConfig;
///
/// let config: SchedulerConfig = serde_json::from_str(r#"{ "name": "login" }"#).unwrap();
/// assert_eq!(config.name, "login");
/// assert_eq!(config.inbox_capacity, SchedulerConfig::default().inbox_capacity);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Label attached to the scheduler's tracing span and errors.
    pub name: String,

    /// Capacity of the inbox shared by external senders and effect tasks.
    /// Senders wait when it is full. Zero is treated as one.
    pub inbox_capacity: usize,
}

impl SchedulerConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_inbox_capacity(mut self, capacity: usize) -> Self {
        self.inbox_capacity = capacity;
        self
    }

    pub(crate) fn effective_capacity(&self) -> usize {
        self.inbox_capacity.max(1)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
        }
    }
}
