//! The `NavSim` struct and its tick loop.

use nav_agent::{AgentPathing, PathingInput};
use nav_core::{AgentId, SimClock, SimRng, Tick, Vec2};
use nav_graph::NavTopology;
use nav_service::PathService;
use tracing::info;

use crate::{SimConfig, SimObserver, TargetModel};

/// A crowd of agents sharing one path service over one topology.
///
/// Each tick:
///
/// 1. The [`TargetModel`] moves targets.
/// 2. Every agent's state machine is updated in ascending `AgentId` order and
///    the agent moves toward its steering point by at most `speed * dt`.
/// 3. The path service is ticked once with its configured budget.
///
/// Per-agent vectors are indexed by `AgentId`.  Create via
/// [`SimBuilder`][crate::SimBuilder].
pub struct NavSim<G: NavTopology, T: TargetModel> {
    pub config:    SimConfig,
    pub clock:     SimClock,
    /// Borrowed by the agents and the service on every tick; safe to mutate
    /// (e.g. block an edge) between ticks.
    pub graph:     G,
    pub service:   PathService<G::Node>,
    pub agents:    Vec<AgentPathing<G::Node>>,
    pub positions: Vec<Vec2>,
    pub targets:   Vec<Vec2>,
    /// World units per second.
    pub speeds:    Vec<f32>,
    /// Steering point each agent reported on the last tick.
    pub steering:  Vec<Option<Vec2>>,
    pub target_model: T,
    pub rng:       SimRng,
}

impl<G: NavTopology, T: TargetModel> NavSim<G, T> {
    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        let start = self.clock.current_tick;
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        let stats = *self.service.stats();
        info!(
            ticks = self.clock.current_tick.since(start),
            solved = stats.solved,
            exhausted = stats.exhausted,
            dedup_hits = stats.dedup_hits,
            rejected = stats.rejected,
            "sim_finished"
        );
        observer.on_sim_end(self.clock.current_tick, &stats);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    fn step<O: SimObserver>(&mut self, observer: &mut O) {
        let tick = self.clock.current_tick;
        observer.on_tick_start(tick);
        let moving = self.process_tick(tick, observer);
        observer.on_tick_end(tick, moving);
        self.clock.advance();
    }

    fn process_tick<O: SimObserver>(&mut self, tick: Tick, observer: &mut O) -> usize {
        let now = self.clock.now_secs();
        let dt = self.clock.dt_secs;
        self.target_model.update_targets(now, &mut self.targets, &mut self.rng);

        let mut moving = 0;
        for (i, agent) in self.agents.iter_mut().enumerate() {
            let before = agent.state();
            let input = PathingInput::new(now, self.positions[i], self.targets[i]);
            let steer = agent.update(input, &mut self.service, &self.graph);

            let after = agent.state();
            if before != after {
                observer.on_state_change(tick, AgentId(i as u32), before, after);
            }
            if let Some(point) = steer {
                self.positions[i] = self.positions[i].move_towards(point, self.speeds[i] * dt);
                moving += 1;
            }
            self.steering[i] = steer;
        }

        self.service.tick(&self.graph);
        moving
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Agents within their waypoint distance of their target.
    pub fn arrived(&self) -> usize {
        self.agents
            .iter()
            .zip(self.positions.iter().zip(&self.targets))
            .filter(|(a, (p, t))| p.within(**t, a.config().waypoint_distance))
            .count()
    }
}
