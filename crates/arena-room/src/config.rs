//! Room configuration and state machine.

use std::fmt;

use arena_protocol::RoomOptions;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every room in a process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Lower bound for a room's capacity. Also used when none is requested.
    pub min_clients: u32,

    /// Upper bound for a room's capacity.
    pub max_clients: u32,

    /// Player names are cut to this many characters.
    pub player_name_max: usize,

    /// Room names are cut to this many characters.
    pub room_name_max: usize,

    /// Simulation ticks per second.
    pub tick_rate_hz: u32,

    /// Dispose the room when its last client leaves.
    pub auto_dispose: bool,

    /// Capacity of the room's command channel.
    pub channel_size: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_clients: 2,
            max_clients: 16,
            player_name_max: 16,
            room_name_max: 24,
            tick_rate_hz: 60,
            auto_dispose: true,
            channel_size: 64,
        }
    }
}

impl RoomConfig {
    /// Forces every field into its valid range.
    pub fn validated(mut self) -> Self {
        self.min_clients = self.min_clients.max(1);
        if self.max_clients < self.min_clients {
            tracing::warn!(
                min = self.min_clients,
                max = self.max_clients,
                "max_clients below min_clients, raising"
            );
            self.max_clients = self.min_clients;
        }
        self.channel_size = self.channel_size.max(1);
        self
    }

    /// `requested` forced into `[min_clients, max_clients]`; missing counts
    /// as zero.
    pub fn clamp_clients(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(0)
            .max(self.min_clients)
            .min(self.max_clients)
    }

    /// Builds the room's metadata from its creation options.
    pub fn metadata(&self, options: &RoomOptions) -> RoomMetadata {
        RoomMetadata {
            player_name: truncate_chars(&options.player_name, self.player_name_max),
            room_name: truncate_chars(&options.room_name, self.room_name_max),
            room_map: options.room_map.clone(),
            room_max_players: self.clamp_clients(options.room_max_players),
            mode: options.mode.clone(),
        }
    }
}

/// Cuts `s` to at most `max` characters (not bytes).
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Creation options after truncation and clamping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMetadata {
    pub player_name: String,
    pub room_name: String,
    pub room_map: String,
    pub room_max_players: u32,
    pub mode: String,
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
/// Created → Active → Disposed
/// ```
///
/// - **Created**: options applied, simulation not yet running.
/// - **Active**: accepting clients, ticking, forwarding actions.
/// - **Disposed**: terminal. No ticks, no clients, directory entry
///   destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    Created,
    Active,
    Disposed,
}

impl RoomState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Created => Some(Self::Active),
            Self::Active => Some(Self::Disposed),
            Self::Disposed => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for RoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Active => write!(f, "Active"),
            Self::Disposed => write!(f, "Disposed"),
        }
    }
}
