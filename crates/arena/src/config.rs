//! Process-wide configuration.

use arena_lobby::{BrowserConfig, PollConfig, RegionConfig, RegistryConfig};
use arena_room::RoomConfig;
use arena_session::EndpointConfig;
use serde::{Deserialize, Serialize};

use crate::ArenaError;

/// Environment variable overriding [`EndpointConfig::app_id`].
pub const ENV_APP_ID: &str = "ARENA_APP_ID";
/// Environment variable overriding [`EndpointConfig::base_url`].
pub const ENV_BASE_URL: &str = "ARENA_API_BASE_URL";
/// Environment variable overriding [`EndpointConfig::developer_token`].
pub const ENV_DEVELOPER_TOKEN: &str = "ARENA_DEVELOPER_TOKEN";

/// Every setting Arena needs, grouped by the layer that uses it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub endpoint: EndpointConfig,
    pub region: RegionConfig,
    pub poll: PollConfig,
    pub browser: BrowserConfig,
    pub room: RoomConfig,
}

impl ArenaConfig {
    /// Defaults overlaid with the `ARENA_*` environment variables.
    pub fn from_env() -> Result<Self, ArenaError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup` and validates the result.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArenaError> {
        if let Some(app_id) = lookup(ENV_APP_ID) {
            self.endpoint.app_id = app_id;
        }
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.endpoint.base_url = base_url;
        }
        if let Some(token) = lookup(ENV_DEVELOPER_TOKEN).filter(|t| !t.is_empty()) {
            self.endpoint.developer_token = Some(token);
        }
        self.validated()
    }

    /// Clamps every section into range and rejects what can't be fixed.
    pub fn validated(mut self) -> Result<Self, ArenaError> {
        if self.endpoint.app_id.trim().is_empty() {
            return Err(ArenaError::Config(format!(
                "app id is empty (set {ENV_APP_ID})"
            )));
        }
        if !self.endpoint.base_url.starts_with("http://")
            && !self.endpoint.base_url.starts_with("https://")
        {
            return Err(ArenaError::Config(format!(
                "base url {:?} is not http(s)",
                self.endpoint.base_url
            )));
        }
        self.poll = self.poll.validated();
        self.room = self.room.validated();
        Ok(self)
    }

    /// Lobby bounds matching the room bounds, so a lobby never advertises
    /// a capacity its room would refuse.
    pub fn registry(&self) -> RegistryConfig {
        RegistryConfig {
            min_clients: self.room.min_clients,
            max_clients: self.room.max_clients,
            ..RegistryConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_apply() {
        let config = ArenaConfig::default()
            .with_overrides(env(&[
                (ENV_APP_ID, "app-42"),
                (ENV_BASE_URL, "http://localhost:9000"),
                (ENV_DEVELOPER_TOKEN, "dev"),
            ]))
            .unwrap();
        assert_eq!(config.endpoint.app_id, "app-42");
        assert_eq!(config.endpoint.base_url, "http://localhost:9000");
        assert_eq!(config.endpoint.developer_token.as_deref(), Some("dev"));
    }

    #[test]
    fn test_missing_app_id_is_rejected() {
        let err = ArenaConfig::default().with_overrides(env(&[])).unwrap_err();
        assert!(matches!(err, ArenaError::Config(_)));
    }

    #[test]
    fn test_bad_base_url_is_rejected() {
        let err = ArenaConfig::default()
            .with_overrides(env(&[(ENV_APP_ID, "a"), (ENV_BASE_URL, "ftp://x")]))
            .unwrap_err();
        assert!(err.to_string().contains("ftp://x"));
    }

    #[test]
    fn test_registry_bounds_follow_room_bounds() {
        let mut config = ArenaConfig::default();
        config.room.min_clients = 4;
        config.room.max_clients = 8;
        let registry = config.registry();
        assert_eq!((registry.min_clients, registry.max_clients), (4, 8));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: ArenaConfig = serde_json::from_value(serde_json::json!({
            "endpoint": { "app_id": "app-1" },
            "room": { "tick_rate_hz": 30 }
        }))
        .unwrap();
        assert_eq!(config.endpoint.app_id, "app-1");
        assert_eq!(config.endpoint.base_url, "https://api.hathora.dev");
        assert_eq!(config.room.tick_rate_hz, 30);
        assert_eq!(config.room.max_clients, 16);
        assert_eq!(config.poll.interval_ms, 200);
    }
}
