//! Logical time model.
//!
//! # Design
//!
//! Two clocks coexist:
//!
//! - **`Tick`** — the path service's monotonic logical counter, advanced once
//!   per `PathService::update`.  Cache ages are measured in ticks, never in
//!   wall-clock time, so staleness is exact and reproducible.
//! - **Simulated seconds** (`f32`) — the agent state machine's notion of
//!   time, used for retry throttling and path validity timeouts.
//!
//! `SimClock` ties them together for drivers that advance both in lockstep:
//!
//!   seconds = tick * dt_secs

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute logical tick counter.
///
/// Stored as `u64`; at 1,000 updates per second it lasts ~585 million years.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── LogicalClock ──────────────────────────────────────────────────────────────

/// Monotonic tick counter owned by the path service.
#[derive(Clone, Debug, Default)]
pub struct LogicalClock {
    current: Tick,
}

impl LogicalClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.current
    }

    /// Advance by exactly one tick and return the new value.
    #[inline]
    pub fn advance(&mut self) -> Tick {
        self.current = self.current.offset(1);
        self.current
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Maps ticks to simulated seconds for fixed-step drivers.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per tick.
    pub dt_secs: f32,
    /// The current tick — advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(dt_secs: f32) -> Self {
        Self { dt_secs, current_tick: Tick::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick.offset(1);
    }

    /// Simulated seconds elapsed since tick 0.
    #[inline]
    pub fn now_secs(&self) -> f32 {
        self.current_tick.0 as f32 * self.dt_secs
    }

    /// How many ticks span `secs` seconds (rounds up).
    #[inline]
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        if self.dt_secs <= 0.0 {
            return 0;
        }
        (secs / self.dt_secs).ceil().max(0.0) as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.now_secs())
    }
}
