//! Lowest-latency region selection.
//!
//! Every candidate gets a connectivity probe at the same time; the first
//! one whose connection opens wins. Nothing is spawned: the probes are
//! polled together in a [`FuturesUnordered`], so dropping it cancels the
//! losers and drops any connection they were still opening.

use std::time::Instant;

use arena_protocol::{Region, RegionCandidate};
use arena_transport::{Connection, Connector};
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tracing::{debug, info, warn};

use crate::RegionConfig;
use crate::api::RegionDiscovery;
use crate::error::{ProbeFailure, RegionError};

/// Picks the region with the fastest connectivity probe.
pub struct RegionSelector<D, C> {
    discovery: D,
    connector: C,
    config: RegionConfig,
}

impl<D: RegionDiscovery, C: Connector> RegionSelector<D, C> {
    pub fn new(discovery: D, connector: C, config: RegionConfig) -> Self {
        Self {
            discovery,
            connector,
            config,
        }
    }

    /// Discovers candidates and races them.
    pub async fn select(&self) -> Result<Region, RegionError> {
        let candidates = self.discover().await?;
        self.select_fastest(candidates).await
    }

    /// Fetches the candidate list.
    pub async fn discover(&self) -> Result<Vec<RegionCandidate>, RegionError> {
        self.discovery
            .discover()
            .await
            .map_err(RegionError::Discovery)
    }

    /// Races one probe per candidate and returns the first region whose
    /// connection opens.
    ///
    /// The winner's connection is closed before returning. Probes still in
    /// flight are cancelled when the race is dropped.
    ///
    /// # Errors
    /// - [`RegionError::NoRegionAvailable`] — no candidates, or every probe
    ///   failed
    /// - [`RegionError::Timeout`] — nothing opened within the race timeout
    pub async fn select_fastest(
        &self,
        candidates: Vec<RegionCandidate>,
    ) -> Result<Region, RegionError> {
        if candidates.is_empty() {
            return Err(RegionError::NoRegionAvailable("no candidates".into()));
        }

        let total = candidates.len();
        let started = Instant::now();
        let mut race: FuturesUnordered<_> = candidates
            .into_iter()
            .map(|candidate| self.probe(candidate))
            .collect();

        let limit = self.config.race_timeout();
        let outcome = tokio::time::timeout(limit, async {
            while let Some(result) = race.next().await {
                match result {
                    Ok(winner) => return Some(winner),
                    Err(failure) => debug!(error = %failure, "region probe failed"),
                }
            }
            None
        })
        .await;
        drop(race);

        match outcome {
            Ok(Some((region, conn))) => {
                if let Err(e) = conn.close().await {
                    debug!(%region, error = %e, "closing winning probe failed");
                }
                info!(
                    %region,
                    candidates = total,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "region selected"
                );
                Ok(region)
            }
            Ok(None) => {
                warn!(candidates = total, "every region probe failed");
                Err(RegionError::NoRegionAvailable(format!(
                    "all {total} probes failed"
                )))
            }
            Err(_) => {
                warn!(candidates = total, timeout = ?limit, "region probe race timed out");
                Err(RegionError::Timeout(limit))
            }
        }
    }

    async fn probe(
        &self,
        candidate: RegionCandidate,
    ) -> Result<(Region, C::Connection), ProbeFailure> {
        let url = candidate.probe_url(&self.config.probe_scheme);
        match self.connector.connect(&url).await {
            Ok(conn) => Ok((candidate.region, conn)),
            Err(source) => Err(ProbeFailure {
                region: candidate.region.to_string(),
                source,
            }),
        }
    }
}
