//! Bus configuration: where to publish, which group to consume as, and who we are.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_TOPIC: &str = "payment-events";
pub const DEFAULT_GROUP: &str = "payment-service-group";
pub const DEFAULT_SERVICE_ID: &str = "payment-service";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusConfig {
    /// Topic envelopes are published to and consumed from.
    pub destination: String,
    /// Consumer group the dispatcher joins.
    pub group: String,
    /// Service identifier stamped into every envelope as its source.
    pub source: String,
    /// Upper bound on a single transport poll.
    pub poll_interval: Duration,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            destination: DEFAULT_TOPIC.to_string(),
            group: DEFAULT_GROUP.to_string(),
            source: DEFAULT_SERVICE_ID.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl BusConfig {
    /// Load configuration from the environment, reading a `.env` file first
    /// if one exists.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `BUS_TOPIC` | `payment-events` |
    /// | `BUS_CONSUMER_GROUP` | `payment-service-group` |
    /// | `BUS_SERVICE_ID` | `payment-service` |
    /// | `BUS_POLL_INTERVAL_MS` | `50` |
    ///
    /// A poll interval of zero is rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let poll_interval = match lookup("BUS_POLL_INTERVAL_MS") {
            Some(raw) => {
                let ms = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                    key: "BUS_POLL_INTERVAL_MS".to_string(),
                    message: e.to_string(),
                })?;
                if ms == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "BUS_POLL_INTERVAL_MS".to_string(),
                        message: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_millis(ms)
            }
            None => defaults.poll_interval,
        };

        Ok(Self {
            destination: non_empty(lookup("BUS_TOPIC"), "BUS_TOPIC")?
                .unwrap_or(defaults.destination),
            group: non_empty(lookup("BUS_CONSUMER_GROUP"), "BUS_CONSUMER_GROUP")?
                .unwrap_or(defaults.group),
            source: non_empty(lookup("BUS_SERVICE_ID"), "BUS_SERVICE_ID")?
                .unwrap_or(defaults.source),
            poll_interval,
        })
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

fn non_empty(value: Option<String>, key: &str) -> Result<Option<String>, ConfigError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must not be empty".to_string(),
        }),
        other => Ok(other),
    }
}
