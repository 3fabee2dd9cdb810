//! Top-level run configuration.

use nav_agent::AgentPathConfig;
use nav_core::{SimClock, Tick};
use nav_service::ServiceConfig;

use crate::{SimError, SimResult};

/// Everything needed to size and drive a [`NavSim`](crate::NavSim).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Simulated seconds per tick.
    pub dt_secs: f32,

    /// Ticks executed by [`NavSim::run`](crate::NavSim::run).
    pub total_ticks: u64,

    /// Path service sizing, shared by every agent.
    pub service: ServiceConfig,

    /// Pathing tunables applied to every agent.
    pub agent: AgentPathConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:        0,
            dt_secs:     0.1,
            total_ticks: 600,
            service:     ServiceConfig::default(),
            agent:       AgentPathConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.dt_secs.is_nan() || self.dt_secs <= 0.0 {
            return Err(SimError::Config(format!("dt_secs must be positive, got {}", self.dt_secs)));
        }
        self.service.validate()?;
        self.agent.validate()?;
        Ok(())
    }

    /// The tick at which `run` stops (exclusive).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.dt_secs)
    }
}
