//! Room actor: an isolated Tokio task that owns one authoritative room.
//!
//! Commands and ticks are handled by the same task in a `select!` loop,
//! so the simulation is never touched concurrently. Directory updates are
//! handed to a [`DirectoryPublisher`] and never awaited on the hot path.

use std::collections::HashMap;
use std::sync::Arc;

use arena_lobby::{DirectoryPublisher, LobbyDirectory, ReportSink};
use arena_protocol::{
    ActionKind, ClientId, Codec, InboundMessage, JsonCodec, LobbyId, OutboundMessage,
    PlayerAction, PlayerOptions, RoomOptions,
};
use arena_tick::{TickConfig, TickScheduler};
use tokio::sync::{mpsc, oneshot};

use crate::config::truncate_chars;
use crate::{RoomConfig, RoomError, RoomMetadata, RoomState, Simulation, SimulationInit};

/// Channel sender for delivering broadcasts to one client's transport.
pub type ClientSender = mpsc::UnboundedSender<OutboundMessage>;

/// Commands sent to a room actor through its channel.
///
/// Variants carrying a `oneshot::Sender` expect a reply; the rest are
/// fire-and-forget.
enum RoomCommand {
    Join {
        client: ClientId,
        options: PlayerOptions,
        sender: ClientSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Leave {
        client: ClientId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Message {
        client: ClientId,
        message: InboundMessage,
    },
    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },
    Dispose {
        reply: oneshot::Sender<()>,
    },
}

/// A snapshot of room metadata (not the simulation state).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    /// Equal to the directory lobby id.
    pub room_id: LobbyId,
    pub state: RoomState,
    pub client_count: u32,
    pub max_clients: u32,
    pub metadata: RoomMetadata,
    /// Inbound messages dropped because their type is not allow-listed.
    pub ignored_messages: u64,
    /// Actions forwarded into the simulation.
    pub forwarded_actions: u64,
    /// Simulation updates run so far.
    pub ticks: u64,
}

/// Handle to a running room actor.
///
/// Cheap to clone; it's an `mpsc::Sender` wrapper. Once the room is
/// disposed every call fails with [`RoomError::Unavailable`].
#[derive(Clone)]
pub struct RoomHandle {
    room_id: LobbyId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &LobbyId {
        &self.room_id
    }

    /// `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Adds a client. The client's broadcasts arrive on `sender`.
    pub async fn join(
        &self,
        client: ClientId,
        options: PlayerOptions,
        sender: ClientSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Join {
            client,
            options,
            sender,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Removes a client.
    pub async fn leave(&self, client: ClientId) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Leave {
            client,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Delivers a client message (fire-and-forget).
    pub async fn send_message(
        &self,
        client: ClientId,
        message: InboundMessage,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Message { client, message }).await
    }

    /// Decodes a raw transport frame and delivers it.
    pub async fn send_frame(&self, client: ClientId, frame: &[u8]) -> Result<(), RoomError> {
        let message: InboundMessage = JsonCodec.decode(frame)?;
        self.send_message(client, message).await
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::GetInfo { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Disposes the room and waits until its directory entry has been
    /// destroyed (or the attempt has failed and been reported).
    pub async fn dispose(&self) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Dispose { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender.send(cmd).await.map_err(|_| self.unavailable())
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.room_id.clone())
    }
}

struct Client {
    name: String,
    sender: ClientSender,
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor<S> {
    room_id: LobbyId,
    state: RoomState,
    config: RoomConfig,
    metadata: RoomMetadata,
    clients: HashMap<ClientId, Client>,
    simulation: S,
    scheduler: TickScheduler,
    publisher: Option<DirectoryPublisher>,
    receiver: mpsc::Receiver<RoomCommand>,
    had_clients: bool,
    ignored: u64,
    forwarded: u64,
    ticks: u64,
}

impl<S: Simulation> RoomActor<S> {
    /// Runs the actor loop until the room is disposed.
    async fn run(mut self) {
        self.transition(RoomState::Active);
        tracing::info!(
            room_id = %self.room_id,
            room_name = %self.metadata.room_name,
            map = %self.metadata.room_map,
            max_clients = self.metadata.room_max_players,
            mode = %self.metadata.mode,
            "room created"
        );

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else {
                        // Every handle is gone; nobody can reach this room again.
                        self.dispose().await;
                        break;
                    };
                    if let Some(reply) = self.handle(cmd) {
                        self.dispose().await;
                        let _ = reply.send(());
                        break;
                    }
                    if self.should_auto_dispose() {
                        tracing::info!(room_id = %self.room_id, "last client left, disposing");
                        self.dispose().await;
                        break;
                    }
                }
                tick = self.scheduler.wait_for_tick(), if self.state.is_active() => {
                    let out = self.simulation.update(tick.dt);
                    self.ticks += 1;
                    self.broadcast(out);
                    self.scheduler.record_tick_end();
                }
            }
        }

        tracing::info!(room_id = %self.room_id, ticks = self.ticks, "room actor stopped");
    }

    /// Handles one command. Returns the dispose reply channel when the
    /// command asks for disposal.
    fn handle(&mut self, cmd: RoomCommand) -> Option<oneshot::Sender<()>> {
        match cmd {
            RoomCommand::Join {
                client,
                options,
                sender,
                reply,
            } => {
                let _ = reply.send(self.handle_join(client, options, sender));
            }
            RoomCommand::Leave { client, reply } => {
                let _ = reply.send(self.handle_leave(client));
            }
            RoomCommand::Message { client, message } => self.handle_message(client, message),
            RoomCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
            }
            RoomCommand::Dispose { reply } => return Some(reply),
        }
        None
    }

    fn handle_join(
        &mut self,
        client: ClientId,
        options: PlayerOptions,
        sender: ClientSender,
    ) -> Result<(), RoomError> {
        if !self.state.is_active() {
            return Err(RoomError::InvalidState(format!(
                "cannot join room in state {}",
                self.state
            )));
        }
        if self.clients.contains_key(&client) {
            return Err(RoomError::AlreadyInRoom(client, self.room_id.clone()));
        }
        if self.client_count() >= self.metadata.room_max_players {
            return Err(RoomError::RoomFull(self.room_id.clone()));
        }

        let name = truncate_chars(&options.player_name, self.config.player_name_max);
        let out = self.simulation.add_player(&client, &name);
        tracing::info!(
            room_id = %self.room_id,
            client = %client,
            player_name = %name,
            clients = self.clients.len() + 1,
            "client joined"
        );
        self.clients.insert(client, Client { name, sender });
        self.had_clients = true;
        self.broadcast(out);
        self.publish_occupancy();
        Ok(())
    }

    fn handle_leave(&mut self, client: ClientId) -> Result<(), RoomError> {
        let Some(removed) = self.clients.remove(&client) else {
            return Err(RoomError::NotInRoom(client, self.room_id.clone()));
        };

        tracing::info!(
            room_id = %self.room_id,
            client = %client,
            player_name = %removed.name,
            clients = self.clients.len(),
            "client left"
        );
        let out = self.simulation.remove_player(&client);
        self.broadcast(out);
        self.publish_occupancy();
        Ok(())
    }

    fn handle_message(&mut self, client: ClientId, message: InboundMessage) {
        if !self.clients.contains_key(&client) {
            tracing::warn!(
                room_id = %self.room_id,
                client = %client,
                "message from non-member, ignoring"
            );
            return;
        }

        let Some(kind) = ActionKind::parse(&message.kind) else {
            self.ignored += 1;
            tracing::debug!(
                room_id = %self.room_id,
                client = %client,
                kind = %message.kind,
                "message type not allowed, ignoring"
            );
            return;
        };

        self.forwarded += 1;
        self.simulation.push_action(PlayerAction {
            player_id: client,
            kind,
            payload: message.payload,
        });
    }

    fn should_auto_dispose(&self) -> bool {
        // A freshly created room waits for its first client.
        self.config.auto_dispose
            && self.state.is_active()
            && self.had_clients
            && self.clients.is_empty()
    }

    async fn dispose(&mut self) {
        if self.state == RoomState::Disposed {
            return;
        }
        self.transition(RoomState::Disposed);
        // Dropping the senders closes every client channel.
        self.clients.clear();
        if let Some(publisher) = self.publisher.take() {
            publisher.destroy().await;
        }
        tracing::info!(room_id = %self.room_id, "room disposed");
    }

    fn transition(&mut self, target: RoomState) {
        debug_assert!(self.state.can_transition_to(target));
        tracing::debug!(room_id = %self.room_id, from = %self.state, to = %target, "room state change");
        self.state = target;
    }

    fn publish_occupancy(&mut self) {
        let count = self.client_count();
        if let Some(publisher) = &self.publisher {
            publisher.publish_occupancy(count);
        }
    }

    fn broadcast(&self, messages: Vec<OutboundMessage>) {
        for msg in messages {
            for client in self.clients.values() {
                // A closed receiver means the client is on its way out.
                let _ = client.sender.send(msg.clone());
            }
        }
    }

    fn client_count(&self) -> u32 {
        self.clients.len() as u32
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id.clone(),
            state: self.state,
            client_count: self.client_count(),
            max_clients: self.metadata.room_max_players,
            metadata: self.metadata.clone(),
            ignored_messages: self.ignored,
            forwarded_actions: self.forwarded,
            ticks: self.ticks,
        }
    }
}

/// Creates a room for `options.hathora_id` and starts its actor.
///
/// Capacity is clamped and names truncated per `config`; the simulation is
/// initialised before the actor starts, so the room is `Active` by the time
/// the first command is processed. Directory reports go to `sink` as well
/// as the log.
pub fn spawn_room<S, R>(
    options: RoomOptions,
    config: RoomConfig,
    directory: Arc<R>,
    sink: Option<ReportSink>,
) -> RoomHandle
where
    S: Simulation,
    R: LobbyDirectory,
{
    let config = config.validated();
    let metadata = config.metadata(&options);
    let room_id = options.hathora_id;

    let simulation = S::init(&SimulationInit {
        room_name: metadata.room_name.clone(),
        map: metadata.room_map.clone(),
        max_clients: metadata.room_max_players,
        mode: metadata.mode.clone(),
    });
    let scheduler = TickScheduler::new(TickConfig::with_rate(config.tick_rate_hz));
    let publisher = DirectoryPublisher::spawn(directory, room_id.clone(), sink);

    let (tx, rx) = mpsc::channel(config.channel_size);
    let actor = RoomActor {
        room_id: room_id.clone(),
        state: RoomState::Created,
        config,
        metadata,
        clients: HashMap::new(),
        simulation,
        scheduler,
        publisher: Some(publisher),
        receiver: rx,
        had_clients: false,
        ignored: 0,
        forwarded: 0,
        ticks: 0,
    };

    tokio::spawn(actor.run());

    RoomHandle { room_id, sender: tx }
}
