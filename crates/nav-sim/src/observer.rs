//! Observer hooks for progress reporting and data collection.

use nav_agent::PathState;
use nav_core::{AgentId, Tick};
use nav_service::ServiceStats;

/// Callbacks invoked by [`NavSim::run`][crate::NavSim::run] during the tick
/// loop.  Every method defaults to a no-op.
///
/// # Example — arrival counter
///
/// ```rust,ignore
/// struct Arrivals(usize);
///
/// impl SimObserver for Arrivals {
///     fn on_state_change(&mut self, _t: Tick, _a: AgentId, from: PathState, to: PathState) {
///         if from == PathState::FollowingPath && to == PathState::Idle {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Before any agent is updated.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// An agent's pathing state changed during this tick's update.
    fn on_state_change(&mut self, _tick: Tick, _agent: AgentId, _from: PathState, _to: PathState) {}

    /// After the path service has been ticked.  `moving` is the number of
    /// agents that had a steering target this tick.
    fn on_tick_end(&mut self, _tick: Tick, _moving: usize) {}

    /// Once, after the final tick of [`run`][crate::NavSim::run].
    fn on_sim_end(&mut self, _final_tick: Tick, _stats: &ServiceStats) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
