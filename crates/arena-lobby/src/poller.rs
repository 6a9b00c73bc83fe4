//! Waiting for a freshly created room to accept connections.

use arena_protocol::{ConnectionInfo, LobbyId};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::api::RoomInfoApi;
use crate::{PollConfig, PollError};

/// Polls a room's connection info until it leaves the starting state.
///
/// The first request goes out immediately, then one every
/// [`PollConfig::interval_ms`]. A missing record counts as still
/// starting. Polling stops at the first terminal status (`ready` or
/// `error`), when the attempt budget or deadline runs out, or when the
/// caller cancels.
pub struct ConnectionBootstrapPoller<R> {
    api: R,
    config: PollConfig,
}

impl<R: RoomInfoApi> ConnectionBootstrapPoller<R> {
    pub fn new(api: R, config: PollConfig) -> Self {
        Self {
            api,
            config: config.validated(),
        }
    }

    /// Returns the first terminal connection info.
    ///
    /// A terminal `error` status is returned as `Ok`; deciding what that
    /// means is up to the caller.
    ///
    /// # Errors
    /// - [`PollError::Timeout`] — still starting when a limit was hit
    /// - [`PollError::Cancelled`] — `cancel` fired
    /// - [`PollError::Request`] — a request failed outright
    #[tracing::instrument(skip(self, cancel), fields(room_id = %room_id))]
    pub async fn poll_until_ready(
        &self,
        room_id: &LobbyId,
        cancel: &CancellationToken,
    ) -> Result<ConnectionInfo, PollError> {
        let started = Instant::now();
        let deadline = started + self.config.deadline();
        let mut attempts: u32 = 0;

        let timed_out = |attempts: u32| PollError::Timeout {
            attempts,
            elapsed: started.elapsed(),
        };

        loop {
            attempts += 1;
            let request = time::timeout_at(deadline, self.api.connection_info(room_id));
            let info = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PollError::Cancelled),
                result = request => match result {
                    Ok(info) => info?,
                    Err(_) => return Err(timed_out(attempts)),
                },
            };

            match info {
                Some(info) if info.is_terminal() => {
                    info!(attempts, status = ?info.status, "room bootstrap finished");
                    return Ok(info);
                }
                Some(info) => trace!(attempts, status = ?info.status, "room still starting"),
                None => trace!(attempts, "no connection info yet"),
            }

            if attempts >= self.config.max_attempts {
                debug!(attempts, "poll attempt budget exhausted");
                return Err(timed_out(attempts));
            }
            let wake = Instant::now() + self.config.interval();
            if wake > deadline {
                debug!(attempts, "poll deadline reached");
                return Err(timed_out(attempts));
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PollError::Cancelled),
                _ = time::sleep_until(wake) => {}
            }
        }
    }
}
