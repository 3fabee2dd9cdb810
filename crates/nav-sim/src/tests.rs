//! Integration tests for nav-sim.

use nav_agent::{AgentPathConfig, PathState};
use nav_core::{AgentId, SimRng, Tick, Vec2};
use nav_graph::NavGraph;
use nav_service::{ServiceConfig, ServiceStats};

use crate::{FixedTargets, NoopObserver, SimBuilder, SimConfig, SimObserver, TargetModel};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig {
        seed: 42,
        dt_secs: 0.1,
        total_ticks,
        service: ServiceConfig {
            worker_count:     1,
            record_count:     8,
            path_capacity:    64,
            max_age_ticks:    50,
            iteration_budget: 64,
        },
        agent: AgentPathConfig {
            waypoint_distance:         0.25,
            nearest_node_max_distance: 1.0,
            ..AgentPathConfig::default()
        },
    }
}

/// `n` unit cells in a row.
fn corridor(n: u32) -> NavGraph {
    NavGraph::grid(n, 1, 1.0, |_, _| false).0
}

fn v(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

#[derive(Default)]
struct Recorder {
    changes:    Vec<(AgentId, PathState, PathState)>,
    ticks:      u64,
    ended_at:   Option<Tick>,
    last_stats: ServiceStats,
}

impl SimObserver for Recorder {
    fn on_state_change(&mut self, _tick: Tick, agent: AgentId, from: PathState, to: PathState) {
        self.changes.push((agent, from, to));
    }

    fn on_tick_end(&mut self, _tick: Tick, _moving: usize) {
        self.ticks += 1;
    }

    fn on_sim_end(&mut self, final_tick: Tick, stats: &ServiceStats) {
        self.ended_at = Some(final_tick);
        self.last_stats = *stats;
    }
}

/// Every tick, each target jumps to a random cell centre with probability 0.05.
struct Wander {
    size: u32,
}

impl TargetModel for Wander {
    fn update_targets(&mut self, _now_secs: f32, targets: &mut [Vec2], rng: &mut SimRng) {
        for t in targets.iter_mut() {
            if rng.gen_bool(0.05) {
                let x = rng.gen_range(0..self.size) as f32 + 0.5;
                let y = rng.gen_range(0..self.size) as f32 + 0.5;
                *t = v(x, y);
            }
        }
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn builds_with_defaults() {
        let sim = SimBuilder::new(test_config(10), corridor(4), vec![v(0.5, 0.5); 3], FixedTargets)
            .build()
            .unwrap();
        assert_eq!(sim.agent_count(), 3);
        assert_eq!(sim.targets, sim.positions);
        assert_eq!(sim.speeds, vec![1.0; 3]);
        assert_eq!(sim.service.worker_count(), 1);
    }

    #[test]
    fn target_count_mismatch_errors() {
        let result = SimBuilder::new(test_config(10), corridor(4), vec![v(0.5, 0.5); 3], FixedTargets)
            .targets(vec![v(1.5, 0.5); 2])
            .build();
        assert!(matches!(
            result,
            Err(SimError::AgentCountMismatch { expected: 3, got: 2, what: "targets" })
        ));
    }

    #[test]
    fn speed_count_mismatch_errors() {
        let result = SimBuilder::new(test_config(10), corridor(4), vec![v(0.5, 0.5); 2], FixedTargets)
            .speeds(vec![1.0; 5])
            .build();
        assert!(matches!(result, Err(SimError::AgentCountMismatch { what: "speeds", .. })));
    }

    #[test]
    fn negative_speed_errors() {
        let result = SimBuilder::new(test_config(10), corridor(4), vec![v(0.5, 0.5)], FixedTargets)
            .speed(-1.0)
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn invalid_nested_config_errors() {
        let mut config = test_config(10);
        config.service.worker_count = 0;
        let result = SimBuilder::new(config, corridor(4), vec![], FixedTargets).build();
        assert!(matches!(result, Err(SimError::Service(_))));

        let mut config = test_config(10);
        config.agent.path_capacity = 0;
        let result = SimBuilder::new(config, corridor(4), vec![], FixedTargets).build();
        assert!(matches!(result, Err(SimError::Agent(_))));

        let mut config = test_config(10);
        config.dt_secs = 0.0;
        let result = SimBuilder::new(config, corridor(4), vec![], FixedTargets).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn single_agent_walks_corridor() {
        let mut sim = SimBuilder::new(test_config(200), corridor(10), vec![v(0.5, 0.5)], FixedTargets)
            .targets(vec![v(9.5, 0.5)])
            .speed(2.0)
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        sim.run(&mut rec);

        assert_eq!(sim.arrived(), 1);
        assert_eq!(sim.agents[0].state(), PathState::Idle);
        assert_eq!(
            rec.changes,
            vec![
                (AgentId(0), PathState::Idle, PathState::FindingPath),
                (AgentId(0), PathState::FindingPath, PathState::FollowingPath),
                (AgentId(0), PathState::FollowingPath, PathState::Idle),
            ]
        );
        assert_eq!(rec.ticks, 200);
        assert_eq!(rec.ended_at, Some(Tick(200)));
        assert_eq!(rec.last_stats.solved, 1);
    }

    #[test]
    fn crowd_with_same_goal_shares_one_search() {
        let starts = vec![v(0.5, 0.5); 4];
        let mut sim = SimBuilder::new(test_config(200), corridor(10), starts, FixedTargets)
            .targets(vec![v(9.5, 0.5); 4])
            .speed(2.0)
            .build()
            .unwrap();

        sim.run_ticks(1, &mut NoopObserver);
        assert_eq!(sim.service.stats().scheduled, 1);
        assert_eq!(sim.service.stats().dedup_hits, 3);

        sim.run(&mut NoopObserver);
        assert_eq!(sim.arrived(), 4);
    }

    #[test]
    fn walled_off_target_is_never_reached() {
        let (graph, _) = NavGraph::grid(5, 1, 1.0, |x, _| x == 2);
        let mut sim = SimBuilder::new(test_config(100), graph, vec![v(0.5, 0.5)], FixedTargets)
            .targets(vec![v(4.5, 0.5)])
            .speed(2.0)
            .build()
            .unwrap();

        sim.run(&mut NoopObserver);
        assert_eq!(sim.arrived(), 0);
        assert_ne!(sim.agents[0].state(), PathState::Idle);
        assert!(sim.positions[0].x < 2.0);
        assert!(sim.service.stats().exhausted >= 1);
    }

    #[test]
    fn same_seed_same_run() {
        fn run(seed: u64) -> Vec<Vec2> {
            let mut config = test_config(300);
            config.seed = seed;
            config.service.worker_count = 2;
            config.agent.waypoint_jitter = 0.5;
            let (graph, _) = NavGraph::grid(8, 8, 1.0, |x, y| x == 4 && y > 1);
            let starts = (0..6).map(|i| v(0.5, i as f32 + 0.5)).collect();
            let mut sim = SimBuilder::new(config, graph, starts, Wander { size: 8 })
                .targets(vec![v(7.5, 7.5); 6])
                .speed(1.5)
                .build()
                .unwrap();
            sim.run(&mut NoopObserver);
            sim.positions
        }

        assert_eq!(run(7), run(7));
    }

    #[test]
    fn observer_sees_every_tick() {
        let mut sim = SimBuilder::new(test_config(25), corridor(3), vec![v(0.5, 0.5)], FixedTargets)
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec);
        assert_eq!(rec.ticks, 25);
        assert!(rec.changes.is_empty(), "agent already at its target");
        assert_eq!(sim.clock.current_tick, Tick(25));
    }
}
