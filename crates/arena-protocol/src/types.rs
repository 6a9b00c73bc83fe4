//! Identity types.
//!
//! Both ids are opaque strings handed to us by external systems: the
//! directory assigns lobby ids, the real-time transport assigns client
//! session ids. Wrapping them keeps a `ClientId` from ever being passed
//! where a `LobbyId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a directory entry.
///
/// The authoritative room that backs the lobby uses the same value as its
/// room id, so this is also the key that ties a room's `RoomHandle` to
/// its `LobbyDescriptor`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LobbyId(String);

impl LobbyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LobbyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LobbyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A client's session id on the real-time transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
