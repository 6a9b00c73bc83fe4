//! Unified error type for Arena.

use arena_lobby::{CreateError, PollError, RegionError, RegistryError};
use arena_protocol::{LobbyId, ProtocolError};
use arena_room::RoomError;
use arena_session::SessionError;
use arena_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls, so
/// the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Player login failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A directory request failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Region(#[from] RegionError),

    /// The room never became ready.
    #[error(transparent)]
    Poll(#[from] PollError),

    #[error(transparent)]
    Room(#[from] RoomError),

    /// The room behind a lobby reported a terminal `error` status.
    #[error("room {0} failed to start")]
    RoomStartFailed(LobbyId),

    /// Required configuration is missing or malformed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<CreateError> for ArenaError {
    fn from(err: CreateError) -> Self {
        match err {
            CreateError::Auth(e) => Self::Session(e),
            CreateError::Region(e) => Self::Region(e),
            CreateError::Registry(e) => Self::Registry(e),
        }
    }
}
