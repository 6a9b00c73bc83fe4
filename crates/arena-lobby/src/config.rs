//! Tunables for region selection, polling, browsing and lobby creation.

use std::time::Duration;

use arena_protocol::Visibility;
use serde::{Deserialize, Serialize};

/// Region probe race settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// URL scheme of the connectivity probes. `wss` in production, `ws`
    /// against a local test server.
    pub probe_scheme: String,

    /// How long the whole race may take before selection gives up.
    pub race_timeout_ms: u64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            probe_scheme: "wss".to_string(),
            race_timeout_ms: 5_000,
        }
    }
}

impl RegionConfig {
    pub fn race_timeout(&self) -> Duration {
        Duration::from_millis(self.race_timeout_ms)
    }
}

/// Connection bootstrap polling settings.
///
/// Polling stops at whichever limit is hit first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub max_attempts: u32,
    pub deadline_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 200,
            max_attempts: 150,
            deadline_ms: 30_000,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Forces every field into its valid range: a zero interval would spin,
    /// zero attempts would never poll.
    pub fn validated(mut self) -> Self {
        self.interval_ms = self.interval_ms.max(1);
        self.max_attempts = self.max_attempts.max(1);
        self
    }
}

/// Lobby browser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub refresh_interval_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 5_000,
        }
    }
}

impl BrowserConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }
}

/// Bounds applied to every lobby config this client creates or reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub min_clients: u32,
    pub max_clients: u32,
    /// Visibility of lobbies this client creates.
    pub visibility: Visibility,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            min_clients: 2,
            max_clients: 16,
            visibility: Visibility::Public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(RegionConfig::default().race_timeout(), Duration::from_secs(5));
        let poll = PollConfig::default();
        assert_eq!(poll.interval(), Duration::from_millis(200));
        assert_eq!(poll.max_attempts, 150);
        assert_eq!(poll.deadline(), Duration::from_secs(30));
        assert_eq!(
            BrowserConfig::default().refresh_interval(),
            Duration::from_secs(5)
        );
        let registry = RegistryConfig::default();
        assert_eq!((registry.min_clients, registry.max_clients), (2, 16));
    }

    #[test]
    fn test_poll_validated_rejects_zero() {
        let poll = PollConfig {
            interval_ms: 0,
            max_attempts: 0,
            deadline_ms: 10,
        }
        .validated();
        assert_eq!(poll.interval_ms, 1);
        assert_eq!(poll.max_attempts, 1);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let poll: PollConfig = serde_json::from_str(r#"{"interval_ms": 50}"#).unwrap();
        assert_eq!(poll.interval_ms, 50);
        assert_eq!(poll.max_attempts, 150);
    }
}
