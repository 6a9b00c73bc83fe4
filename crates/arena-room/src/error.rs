//! Error types for the room layer.

use arena_protocol::{ClientId, LobbyId, ProtocolError};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(LobbyId),

    /// A room is already running for this lobby.
    #[error("room {0} already exists")]
    AlreadyExists(LobbyId),

    /// No client slots left.
    #[error("room {0} is full")]
    RoomFull(LobbyId),

    /// The client is already in this room.
    #[error("client {0} already in room {1}")]
    AlreadyInRoom(ClientId, LobbyId),

    /// The client is not in this room.
    #[error("client {0} not in room {1}")]
    NotInRoom(ClientId, LobbyId),

    /// The room is in a state that doesn't allow this operation.
    #[error("invalid room state for this operation: {0}")]
    InvalidState(String),

    /// The room's command channel is closed; the room has been disposed.
    #[error("room {0} is unavailable")]
    Unavailable(LobbyId),

    /// An inbound frame could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
