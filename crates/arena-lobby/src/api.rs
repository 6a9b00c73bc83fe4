//! Traits for the external endpoints this layer depends on.
//!
//! Each trait is one capability of the external directory service, so a
//! component only asks for what it uses: the room side needs
//! [`LobbyDirectory`], the browser needs [`LobbyApi`], the poller needs
//! [`RoomInfoApi`]. [`HttpLobbyClient`](crate::HttpLobbyClient)
//! implements all of them; tests implement just the one under test.
//!
//! All futures are `Send` so implementations can be driven from spawned
//! tasks (the lobby browser, the per-room publisher).

use std::future::Future;

use arena_protocol::{
    ConnectionInfo, CreateLobbyRequest, LobbyDescriptor, LobbyId, LobbyState, RegionCandidate,
};
use arena_session::SessionToken;

use crate::RegistryError;

/// Lists the regions a lobby could be hosted in.
pub trait RegionDiscovery: Send + Sync + 'static {
    fn discover(&self) -> impl Future<Output = Result<Vec<RegionCandidate>, RegistryError>> + Send;
}

/// Player-side directory operations, authorised by the anonymous token.
pub trait LobbyApi: Send + Sync + 'static {
    /// Registers a new lobby and returns the directory's descriptor for it.
    fn create_lobby(
        &self,
        token: &SessionToken,
        request: &CreateLobbyRequest,
    ) -> impl Future<Output = Result<LobbyDescriptor, RegistryError>> + Send;

    /// Public lobbies, in whatever order the directory returns them.
    fn list_lobbies(&self) -> impl Future<Output = Result<Vec<LobbyDescriptor>, RegistryError>> + Send;
}

/// Room-side directory operations, authorised by the developer credential.
pub trait LobbyDirectory: Send + Sync + 'static {
    /// Replaces the lobby's custom state.
    fn set_state(
        &self,
        lobby_id: &LobbyId,
        state: LobbyState,
    ) -> impl Future<Output = Result<(), RegistryError>> + Send;

    /// Removes the lobby and tears down the room behind it.
    fn destroy(&self, lobby_id: &LobbyId) -> impl Future<Output = Result<(), RegistryError>> + Send;
}

/// Readiness of the room behind a lobby.
pub trait RoomInfoApi: Send + Sync + 'static {
    /// `Ok(None)` when the directory has no record for the room yet.
    fn connection_info(
        &self,
        room_id: &LobbyId,
    ) -> impl Future<Output = Result<Option<ConnectionInfo>, RegistryError>> + Send;
}

impl<T: RegionDiscovery> RegionDiscovery for std::sync::Arc<T> {
    fn discover(&self) -> impl Future<Output = Result<Vec<RegionCandidate>, RegistryError>> + Send {
        (**self).discover()
    }
}

impl<T: LobbyApi> LobbyApi for std::sync::Arc<T> {
    fn create_lobby(
        &self,
        token: &SessionToken,
        request: &CreateLobbyRequest,
    ) -> impl Future<Output = Result<LobbyDescriptor, RegistryError>> + Send {
        (**self).create_lobby(token, request)
    }

    fn list_lobbies(&self) -> impl Future<Output = Result<Vec<LobbyDescriptor>, RegistryError>> + Send {
        (**self).list_lobbies()
    }
}

impl<T: LobbyDirectory> LobbyDirectory for std::sync::Arc<T> {
    fn set_state(
        &self,
        lobby_id: &LobbyId,
        state: LobbyState,
    ) -> impl Future<Output = Result<(), RegistryError>> + Send {
        (**self).set_state(lobby_id, state)
    }

    fn destroy(&self, lobby_id: &LobbyId) -> impl Future<Output = Result<(), RegistryError>> + Send {
        (**self).destroy(lobby_id)
    }
}

impl<T: RoomInfoApi> RoomInfoApi for std::sync::Arc<T> {
    fn connection_info(
        &self,
        room_id: &LobbyId,
    ) -> impl Future<Output = Result<Option<ConnectionInfo>, RegistryError>> + Send {
        (**self).connection_info(room_id)
    }
}
