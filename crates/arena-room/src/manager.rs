//! Room manager: creates, tracks, and routes clients to rooms.

use std::collections::HashMap;
use std::sync::Arc;

use arena_lobby::{LobbyDirectory, ReportSink};
use arena_protocol::{ClientId, InboundMessage, LobbyId, PlayerOptions, RoomOptions};

use crate::{ClientSender, RoomConfig, RoomError, RoomHandle, RoomInfo, Simulation, spawn_room};

/// Manages every room in the process and tracks which client is in which
/// room.
///
/// Rooms are keyed by their lobby id, so a lobby can back at most one room
/// here. A client can be in at most one room at a time.
pub struct RoomManager<R> {
    directory: Arc<R>,
    config: RoomConfig,
    sink: Option<ReportSink>,
    rooms: HashMap<LobbyId, RoomHandle>,
    client_rooms: HashMap<ClientId, LobbyId>,
}

impl<R: LobbyDirectory> RoomManager<R> {
    pub fn new(directory: Arc<R>, config: RoomConfig) -> Self {
        Self {
            directory,
            config: config.validated(),
            sink: None,
            rooms: HashMap::new(),
            client_rooms: HashMap::new(),
        }
    }

    /// Also delivers every room's directory reports to `sink`.
    pub fn with_report_sink(mut self, sink: ReportSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Creates a room for `options.hathora_id` running simulation `S`.
    ///
    /// A disposed room under the same id is replaced.
    pub fn create_room<S: Simulation>(&mut self, options: RoomOptions) -> Result<RoomHandle, RoomError> {
        let room_id = options.hathora_id.clone();
        if self.rooms.get(&room_id).is_some_and(|h| !h.is_closed()) {
            return Err(RoomError::AlreadyExists(room_id));
        }

        let handle = spawn_room::<S, R>(
            options,
            self.config.clone(),
            self.directory.clone(),
            self.sink.clone(),
        );
        self.client_rooms.retain(|_, rid| *rid != room_id);
        self.rooms.insert(room_id.clone(), handle.clone());
        tracing::debug!(%room_id, rooms = self.rooms.len(), "room registered");
        Ok(handle)
    }

    /// Adds a client to a room, enforcing one room per client.
    pub async fn join(
        &mut self,
        room_id: &LobbyId,
        client: ClientId,
        options: PlayerOptions,
        sender: ClientSender,
    ) -> Result<(), RoomError> {
        if let Some(current) = self.client_rooms.get(&client) {
            if current == room_id {
                return Err(RoomError::AlreadyInRoom(client, room_id.clone()));
            }
            return Err(RoomError::InvalidState(format!(
                "client {client} is already in room {current}"
            )));
        }

        let handle = self.handle(room_id)?;
        handle.join(client.clone(), options, sender).await?;
        self.client_rooms.insert(client, room_id.clone());
        Ok(())
    }

    /// Removes a client from its current room.
    pub async fn leave(&mut self, client: &ClientId) -> Result<(), RoomError> {
        let room_id = self.client_room(client)?.clone();
        self.client_rooms.remove(client);

        match self.rooms.get(&room_id) {
            Some(handle) => handle.leave(client.clone()).await,
            None => Err(RoomError::NotFound(room_id)),
        }
    }

    /// Routes a client message to the client's current room.
    pub async fn route_message(
        &self,
        client: &ClientId,
        message: InboundMessage,
    ) -> Result<(), RoomError> {
        let room_id = self.client_room(client)?;
        self.handle(room_id)?
            .send_message(client.clone(), message)
            .await
    }

    pub async fn room_info(&self, room_id: &LobbyId) -> Result<RoomInfo, RoomError> {
        self.handle(room_id)?.info().await
    }

    /// Disposes a room and forgets it and its clients.
    pub async fn dispose_room(&mut self, room_id: &LobbyId) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        self.client_rooms.retain(|_, rid| rid != room_id);

        // Already gone (auto-disposed) is fine.
        match handle.dispose().await {
            Ok(()) | Err(RoomError::Unavailable(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Info for every live room. Rooms that fail to answer are skipped.
    pub async fn list_rooms(&self) -> Vec<RoomInfo> {
        let mut infos = Vec::with_capacity(self.rooms.len());
        for handle in self.rooms.values() {
            if let Ok(info) = handle.info().await {
                infos.push(info);
            }
        }
        infos
    }

    /// Forgets rooms whose actor has stopped and the clients that were in
    /// them. Returns how many rooms were removed.
    pub fn prune_disposed(&mut self) -> usize {
        let before = self.rooms.len();
        self.rooms.retain(|_, handle| !handle.is_closed());
        let rooms = &self.rooms;
        self.client_rooms.retain(|_, rid| rooms.contains_key(rid));
        let pruned = before - self.rooms.len();
        if pruned > 0 {
            tracing::debug!(pruned, rooms = self.rooms.len(), "pruned disposed rooms");
        }
        pruned
    }

    /// The room `client` is currently in, if any.
    pub fn client_room_id(&self, client: &ClientId) -> Option<&LobbyId> {
        self.client_rooms.get(client)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn handle(&self, room_id: &LobbyId) -> Result<&RoomHandle, RoomError> {
        self.rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }

    fn client_room(&self, client: &ClientId) -> Result<&LobbyId, RoomError> {
        self.client_rooms
            .get(client)
            .ok_or_else(|| RoomError::InvalidState(format!("client {client} is not in any room")))
    }
}
