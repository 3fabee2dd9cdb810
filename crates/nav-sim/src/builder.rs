//! Fluent builder for constructing a [`NavSim`].

use nav_agent::AgentPathing;
use nav_core::{AgentId, SimRng, Vec2};
use nav_graph::NavTopology;
use nav_service::PathService;
use tracing::info;

use crate::{NavSim, SimConfig, SimError, SimResult, TargetModel};

/// Fluent builder for [`NavSim<G, T>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — seed, step, service and agent tunables
/// - `G: NavTopology` — the world graph
/// - initial positions, one per agent (this fixes the agent count)
/// - `T: TargetModel` — how targets move
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                   |
/// |-----------------|-------------------------------------------|
/// | `.targets(v)`   | Each agent's own start position (idle)    |
/// | `.speeds(v)`    | `1.0` for every agent                     |
/// | `.speed(s)`     | Same speed for every agent                |
pub struct SimBuilder<G: NavTopology, T: TargetModel> {
    config:       SimConfig,
    graph:        G,
    positions:    Vec<Vec2>,
    targets:      Option<Vec<Vec2>>,
    speeds:       Option<Vec<f32>>,
    target_model: T,
}

impl<G: NavTopology, T: TargetModel> SimBuilder<G, T> {
    pub fn new(config: SimConfig, graph: G, positions: Vec<Vec2>, target_model: T) -> Self {
        Self {
            config,
            graph,
            positions,
            targets: None,
            speeds: None,
            target_model,
        }
    }

    /// Initial targets (must be length `agent_count`).
    pub fn targets(mut self, targets: Vec<Vec2>) -> Self {
        self.targets = Some(targets);
        self
    }

    /// Per-agent speeds (must be length `agent_count`).
    pub fn speeds(mut self, speeds: Vec<f32>) -> Self {
        self.speeds = Some(speeds);
        self
    }

    /// One speed for every agent.
    pub fn speed(mut self, speed: f32) -> Self {
        self.speeds = Some(vec![speed; self.positions.len()]);
        self
    }

    /// Validate inputs, allocate the service and agents, and return a
    /// ready-to-run [`NavSim`].
    pub fn build(self) -> SimResult<NavSim<G, T>> {
        self.config.validate()?;
        let agent_count = self.positions.len();

        let targets = match self.targets {
            Some(t) => {
                if t.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      t.len(),
                        what:     "targets",
                    });
                }
                t
            }
            None => self.positions.clone(),
        };

        let speeds = match self.speeds {
            Some(s) => {
                if s.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      s.len(),
                        what:     "speeds",
                    });
                }
                if let Some(bad) = s.iter().find(|v| v.is_nan() || **v < 0.0) {
                    return Err(SimError::Config(format!("agent speed must be non-negative, got {bad}")));
                }
                s
            }
            None => vec![1.0; agent_count],
        };

        let service = PathService::new(self.config.service.clone())?;
        let agents = (0..agent_count)
            .map(|i| AgentPathing::new(AgentId(i as u32), self.config.agent.clone(), self.config.seed))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            agents = agent_count,
            workers = self.config.service.worker_count,
            records = self.config.service.record_count,
            seed = self.config.seed,
            "sim_built"
        );

        Ok(NavSim {
            clock:        self.config.make_clock(),
            rng:          SimRng::new(self.config.seed),
            config:       self.config,
            graph:        self.graph,
            service,
            agents,
            positions:    self.positions,
            targets,
            speeds,
            steering:     vec![None; agent_count],
            target_model: self.target_model,
        })
    }
}
