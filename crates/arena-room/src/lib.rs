//! Authoritative room lifecycle for Arena.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns its
//! simulation, its connected clients and its fixed-rate tick. Occupancy
//! changes and disposal are mirrored to the lobby directory through a
//! [`DirectoryPublisher`](arena_lobby::DirectoryPublisher), which never
//! blocks the room.
//!
//! # Key types
//!
//! - [`Simulation`] — the opaque game collaborator a room drives
//! - [`RoomManager`] — creates rooms, routes clients, prunes disposed rooms
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomState`] — `Created → Active → Disposed`
//! - [`RoomConfig`] — player bounds, name limits, tick rate, auto-dispose

mod config;
mod error;
mod manager;
mod room;
mod simulation;

pub use config::{RoomConfig, RoomMetadata, RoomState};
pub use error::RoomError;
pub use manager::RoomManager;
pub use room::{ClientSender, RoomHandle, RoomInfo, spawn_room};
pub use simulation::{Simulation, SimulationInit};
