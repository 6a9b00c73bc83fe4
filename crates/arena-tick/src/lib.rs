//! Fixed-rate tick scheduler for Arena rooms.
//!
//! A room's simulation advances once per tick. The scheduler only decides
//! *when* a tick is due; everything that happens during a tick belongs to
//! the simulation.
//!
//! # Integration
//!
//! The scheduler sits inside a room actor's `tokio::select!` loop, so
//! ticks and commands are handled by the same task and never overlap:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = commands.recv() => { /* join, leave, message */ }
//!         tick = scheduler.wait_for_tick() => {
//!             let out = S::update(&mut state, tick.dt);
//!             scheduler.record_tick_end();
//!         }
//!     }
//! }
//! ```

use std::time::{Duration, Instant};

use rand::Rng;
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when the scheduler wakes up later than planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPolicy {
    /// Reschedule from now; missed ticks are never replayed.
    #[default]
    Skip,
    /// Keep the original cadence; the next tick fires at its planned time
    /// even if that is already in the past.
    Drop,
}

/// Scheduler settings.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Ticks per second, 1–[`TickConfig::MAX_TICK_RATE_HZ`].
    pub tick_rate_hz: u32,
    pub policy: TickPolicy,
    /// Fraction of the tick budget (0.0–1.0) above which a tick that ran
    /// long is reported.
    pub budget_warn_threshold: f64,
    /// Random delay (0–max µs) added to the first tick so rooms created
    /// together don't tick in lockstep.
    pub initial_jitter_us: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            policy: TickPolicy::default(),
            budget_warn_threshold: 0.80,
            initial_jitter_us: 2_000,
        }
    }
}

impl TickConfig {
    pub const MAX_TICK_RATE_HZ: u32 = 128;

    /// A config for `tick_rate_hz` with default settings otherwise.
    pub fn with_rate(tick_rate_hz: u32) -> Self {
        Self {
            tick_rate_hz,
            ..Default::default()
        }
    }

    /// Forces every field into its valid range.
    pub fn validated(mut self) -> Self {
        let clamped = self.tick_rate_hz.clamp(1, Self::MAX_TICK_RATE_HZ);
        if clamped != self.tick_rate_hz {
            warn!(
                requested = self.tick_rate_hz,
                used = clamped,
                "tick_rate_hz out of range, clamping"
            );
            self.tick_rate_hz = clamped;
        }
        self.budget_warn_threshold = self.budget_warn_threshold.clamp(0.0, 1.0);
        self
    }

    /// Length of one tick.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz.max(1) as f64)
    }
}

/// What [`TickScheduler::wait_for_tick`] hands back.
#[derive(Debug, Clone)]
pub struct TickInfo {
    /// 1-based, monotonically increasing.
    pub tick: u64,
    /// Always one tick duration, regardless of wall-clock drift.
    pub dt: Duration,
    /// The scheduler woke up more than 10% of a tick late.
    pub overrun: bool,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Drives the tick cadence of one room.
pub struct TickScheduler {
    config: TickConfig,
    tick_duration: Duration,
    tick_count: u64,
    overruns: u64,
    next_tick: TokioInstant,
    /// Set by `wait_for_tick`, consumed by `record_tick_end`.
    tick_start: Option<Instant>,
}

impl TickScheduler {
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();
        let tick_duration = config.tick_duration();

        let jitter = if config.initial_jitter_us > 0 {
            Duration::from_micros(rand::rng().random_range(0..config.initial_jitter_us))
        } else {
            Duration::ZERO
        };

        debug!(
            rate_hz = config.tick_rate_hz,
            budget_ms = tick_duration.as_secs_f64() * 1000.0,
            policy = ?config.policy,
            "tick scheduler created"
        );

        Self {
            next_tick: TokioInstant::now() + tick_duration + jitter,
            config,
            tick_duration,
            tick_count: 0,
            overruns: 0,
            tick_start: None,
        }
    }

    pub fn with_rate(tick_rate_hz: u32) -> Self {
        Self::new(TickConfig::with_rate(tick_rate_hz))
    }

    /// Sleeps until the next tick is due.
    ///
    /// Cancel-safe: if the future is dropped inside `select!` before it
    /// resolves, the tick is still pending and the next call waits for it.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let due = self.next_tick;
        time::sleep_until(due).await;

        let now = TokioInstant::now();
        self.tick_count += 1;
        self.tick_start = Some(Instant::now());

        let late_by = now.saturating_duration_since(due);
        let overrun = late_by > self.tick_duration / 10;
        if overrun {
            self.overruns += 1;
            warn!(
                tick = self.tick_count,
                late_ms = late_by.as_secs_f64() * 1000.0,
                policy = ?self.config.policy,
                "tick overrun"
            );
        }

        self.next_tick = match self.config.policy {
            TickPolicy::Skip if overrun => now + self.tick_duration,
            _ => due + self.tick_duration,
        };

        trace!(tick = self.tick_count, overrun, "tick fired");

        TickInfo {
            tick: self.tick_count,
            dt: self.tick_duration,
            overrun,
        }
    }

    /// Marks the end of the current tick's work and reports ticks that
    /// used more than the warning fraction of their budget.
    pub fn record_tick_end(&mut self) {
        let Some(start) = self.tick_start.take() else {
            return;
        };
        let elapsed = start.elapsed();
        let utilization = elapsed.as_secs_f64() / self.tick_duration.as_secs_f64();
        if utilization >= self.config.budget_warn_threshold {
            warn!(
                tick = self.tick_count,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                budget_ms = self.tick_duration.as_secs_f64() * 1000.0,
                "tick approaching budget limit"
            );
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn overrun_count(&self) -> u64 {
        self.overruns
    }

    pub fn tick_rate_hz(&self) -> u32 {
        self.config.tick_rate_hz
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }
}
