//! Directory-facing types: lobby descriptors, regions and connection info.
//!
//! These mirror the JSON the external directory speaks, so every struct
//! uses `camelCase` on the wire. Unknown fields the directory adds
//! (creation timestamps, creator ids, ...) are ignored on decode.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::LobbyId;

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// A hosting region, e.g. `"Seattle"` or `"Sao_Paulo"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the discovery endpoint's response: a region plus the
/// host/port a connectivity probe should be opened against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCandidate {
    pub region: Region,
    pub host: String,
    pub port: u16,
}

impl RegionCandidate {
    /// Probe URL for this candidate using the given scheme (`wss` or `ws`).
    pub fn probe_url(&self, scheme: &str) -> String {
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// Lobby descriptors
// ---------------------------------------------------------------------------

/// Who can see a lobby in the public listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Local,
}

/// The lobby's `initialConfig`: what the creator asked for, plus the
/// occupancy at creation time.
///
/// Other clients write this record too, so every field is optional on the
/// way in. A missing `maxClients` decodes as 0 and is raised by
/// [`clamped`](Self::clamped).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyConfig {
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub map_name: String,
    #[serde(default)]
    pub max_clients: u32,
    #[serde(default, alias = "gamemode")]
    pub mode: String,
    /// Connected clients. Always 0 in a creation request.
    #[serde(default)]
    pub clients: u32,
}

impl LobbyConfig {
    /// Returns the config with `max_clients` forced into `[min, max]`.
    ///
    /// Never panics, even for an inverted range: the upper bound wins.
    pub fn clamped(mut self, min: u32, max: u32) -> Self {
        self.max_clients = self.max_clients.max(min).min(max);
        self
    }
}

/// Custom lobby state written by `SetState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyState {
    pub player_count: u32,
}

/// A directory entry as returned by create/list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyDescriptor {
    /// The directory calls this `roomId`; it is the lobby id and the room
    /// id at the same time.
    #[serde(rename = "roomId")]
    pub lobby_id: LobbyId,
    pub visibility: Visibility,
    pub region: Region,
    pub initial_config: LobbyConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<LobbyState>,
}

impl LobbyDescriptor {
    /// Current occupancy: the last published state if there is one,
    /// otherwise the count recorded at creation.
    pub fn occupancy(&self) -> u32 {
        self.state
            .map(|s| s.player_count)
            .unwrap_or(self.initial_config.clients)
    }

    /// Applies [`LobbyConfig::clamped`] to the initial config.
    pub fn clamped(mut self, min: u32, max: u32) -> Self {
        self.initial_config = self.initial_config.clamped(min, max);
        self
    }
}

/// Body of a lobby creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLobbyRequest {
    pub visibility: Visibility,
    pub region: Region,
    pub initial_config: LobbyConfig,
}

// ---------------------------------------------------------------------------
// Connection info
// ---------------------------------------------------------------------------

/// Readiness of the room process behind a lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Starting,
    /// Some directory versions report a running room as `active`.
    #[serde(alias = "active")]
    Ready,
    Error,
}

/// Result of one connection-info query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub status: ConnectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<LobbyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl ConnectionInfo {
    pub fn starting() -> Self {
        Self {
            status: ConnectionStatus::Starting,
            room_id: None,
            host: None,
            port: None,
        }
    }

    pub fn ready(host: impl Into<String>, port: u16) -> Self {
        Self {
            status: ConnectionStatus::Ready,
            room_id: None,
            host: Some(host.into()),
            port: Some(port),
        }
    }

    /// `true` once the status is anything other than `starting`.
    pub fn is_terminal(&self) -> bool {
        self.status != ConnectionStatus::Starting
    }

    pub fn is_ready(&self) -> bool {
        self.status == ConnectionStatus::Ready
    }

    /// `host:port`, when both are known.
    pub fn address(&self) -> Option<String> {
        match (&self.host, self.port) {
            (Some(host), Some(port)) => Some(format!("{host}:{port}")),
            _ => None,
        }
    }
}
