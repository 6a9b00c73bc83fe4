//! Messages crossing the real-time transport boundary, and the options a
//! room is created/joined with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ClientId, LobbyId};

// ---------------------------------------------------------------------------
// Room / player options
// ---------------------------------------------------------------------------

/// Options a room is created with.
///
/// Names arrive untrusted and untruncated; the room layer enforces the
/// length limits and the player bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOptions {
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub room_map: String,
    /// Requested capacity. Missing is treated like 0 (raised to the minimum).
    #[serde(default)]
    pub room_max_players: Option<u32>,
    #[serde(default)]
    pub mode: String,
    /// Directory lobby id this room is registered under.
    pub hathora_id: LobbyId,
}

/// Options a client joins with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOptions {
    #[serde(default)]
    pub player_name: String,
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// The client actions a room forwards into its simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Move,
    Rotate,
    Shoot,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [Self::Move, Self::Rotate, Self::Shoot];

    /// Looks up an allow-listed action by its wire discriminator.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "move" => Some(Self::Move),
            "rotate" => Some(Self::Rotate),
            "shoot" => Some(Self::Shoot),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Rotate => "rotate",
            Self::Shoot => "shoot",
        }
    }
}

/// A raw message from a client: a type discriminator plus a JSON payload.
///
/// Any discriminator is accepted here; the room decides what to do with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl InboundMessage {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

/// An allow-listed action, tagged with the sender, as queued into the
/// simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAction {
    pub player_id: ClientId,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub payload: Value,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// A simulation-originated message, broadcast verbatim to every client
/// under its own type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl OutboundMessage {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}
