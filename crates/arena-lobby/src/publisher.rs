//! Best-effort directory updates for one room.
//!
//! The room never waits on the directory. It hands each update to a
//! [`DirectoryPublisher`], whose task sends them one at a time in the order
//! they were queued. A failed update is reported and dropped; the room's
//! lifecycle carries on. The final destroy goes through the same queue, so
//! it always lands after the last state update.

use std::fmt;
use std::sync::Arc;

use arena_protocol::{LobbyId, LobbyState};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::RegistryError;
use crate::api::LobbyDirectory;

/// One directory update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryOp {
    /// Publish the room's current occupancy.
    SetState { player_count: u32 },
    /// Remove the lobby. Always the last op for a room.
    Destroy,
}

impl fmt::Display for DirectoryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetState { player_count } => write!(f, "set_state({player_count})"),
            Self::Destroy => f.write_str("destroy"),
        }
    }
}

/// Outcome of one directory update.
#[derive(Debug)]
pub struct DirectoryReport {
    pub lobby_id: LobbyId,
    pub op: DirectoryOp,
    pub result: Result<(), RegistryError>,
}

/// Where reports go besides the log.
pub type ReportSink = mpsc::UnboundedSender<DirectoryReport>;

/// Serialises the directory updates of one room.
///
/// Dropping the publisher without calling [`destroy`](Self::destroy)
/// flushes the queued updates and stops without destroying the lobby.
pub struct DirectoryPublisher {
    lobby_id: LobbyId,
    tx: mpsc::UnboundedSender<DirectoryOp>,
    task: JoinHandle<()>,
}

impl DirectoryPublisher {
    /// Spawns the publishing task for `lobby_id`.
    pub fn spawn<R: LobbyDirectory>(
        directory: Arc<R>,
        lobby_id: LobbyId,
        sink: Option<ReportSink>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(directory, lobby_id.clone(), rx, sink));
        Self { lobby_id, tx, task }
    }

    pub fn lobby_id(&self) -> &LobbyId {
        &self.lobby_id
    }

    /// Queues an occupancy update. Never blocks.
    pub fn publish_occupancy(&self, player_count: u32) {
        if self.tx.send(DirectoryOp::SetState { player_count }).is_err() {
            debug!(lobby_id = %self.lobby_id, "publisher already stopped");
        }
    }

    /// Queues the destroy, then waits until every queued op has been sent.
    ///
    /// Consumes the publisher, so a room can destroy its lobby only once.
    pub async fn destroy(self) {
        let _ = self.tx.send(DirectoryOp::Destroy);
        drop(self.tx);
        if let Err(e) = self.task.await {
            warn!(lobby_id = %self.lobby_id, error = %e, "directory publisher task failed");
        }
    }
}

async fn run<R: LobbyDirectory>(
    directory: Arc<R>,
    lobby_id: LobbyId,
    mut rx: mpsc::UnboundedReceiver<DirectoryOp>,
    sink: Option<ReportSink>,
) {
    while let Some(op) = rx.recv().await {
        let result = match op {
            DirectoryOp::SetState { player_count } => {
                directory
                    .set_state(&lobby_id, LobbyState { player_count })
                    .await
            }
            DirectoryOp::Destroy => directory.destroy(&lobby_id).await,
        };

        match &result {
            Ok(()) => debug!(%lobby_id, %op, "directory updated"),
            Err(e) => warn!(%lobby_id, %op, error = %e, "directory update failed"),
        }

        if let Some(sink) = &sink {
            let _ = sink.send(DirectoryReport {
                lobby_id: lobby_id.clone(),
                op,
                result,
            });
        }

        if op == DirectoryOp::Destroy {
            break;
        }
    }
}
