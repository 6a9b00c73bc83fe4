//! The `Simulation` trait: the game a room drives.
//!
//! The room owns lifecycle, membership and directory bookkeeping; the
//! simulation owns everything that happens inside the game world. The
//! room calls in at the right time and broadcasts whatever comes back.

use std::time::Duration;

use arena_protocol::{ClientId, OutboundMessage, PlayerAction};

/// What a simulation is initialised with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationInit {
    pub room_name: String,
    pub map: String,
    /// Already clamped to the configured bounds.
    pub max_clients: u32,
    pub mode: String,
}

/// The authoritative game world of one room.
///
/// All methods run on the room's task, one at a time, so implementations
/// need no locking. Returned messages are broadcast verbatim to every
/// connected client.
pub trait Simulation: Send + 'static {
    /// Creates the world when the room is created.
    fn init(init: &SimulationInit) -> Self
    where
        Self: Sized;

    /// A client joined. `name` is already truncated.
    fn add_player(&mut self, _client: &ClientId, _name: &str) -> Vec<OutboundMessage> {
        Vec::new()
    }

    /// A client left.
    fn remove_player(&mut self, _client: &ClientId) -> Vec<OutboundMessage> {
        Vec::new()
    }

    /// Queues an allow-listed action for the next update.
    fn push_action(&mut self, action: PlayerAction);

    /// Advances the world by one fixed step.
    fn update(&mut self, dt: Duration) -> Vec<OutboundMessage>;
}
