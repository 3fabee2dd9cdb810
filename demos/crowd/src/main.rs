//! crowd — agents chasing wandering targets through a walled grid.
//!
//! Every agent shares one `PathService`; agents whose nearest nodes match
//! share one search.  Run with `RUST_LOG=debug` to watch individual requests
//! and state changes, or `RUST_LOG=nav_service=trace` for per-worker budget
//! accounting.

use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nav_agent::{AgentPathConfig, PathState};
use nav_core::{AgentId, SimRng, Tick, Vec2};
use nav_graph::NavGraph;
use nav_service::{ServiceConfig, ServiceStats};
use nav_sim::{SimBuilder, SimConfig, SimObserver, TargetModel};

// ── Constants ─────────────────────────────────────────────────────────────────

const GRID_SIZE:         u32   = 48;
const CELL_SIZE:         f32   = 1.0;
const AGENT_COUNT:       usize = 200;
const TARGET_GROUPS:     usize = 8;
const SEED:              u64   = 42;
const DT_SECS:           f32   = 0.1;
const SIM_SECS:          u64   = 120;
const REPORT_EVERY:      u64   = 100;
/// Chance per tick that a target group picks a new spot.
const RELOCATE_CHANCE:   f64   = 0.01;

// ── Map ───────────────────────────────────────────────────────────────────────

/// Three horizontal walls, each with two gaps, plus a solid border.
fn is_wall(x: u32, y: u32) -> bool {
    let last = GRID_SIZE - 1;
    if x == 0 || y == 0 || x == last || y == last {
        return true;
    }
    let wall_row = y % 12 == 0;
    let gap = (6..9).contains(&x) || (GRID_SIZE - 9..GRID_SIZE - 6).contains(&x);
    wall_row && !gap
}

fn cell_centre(x: u32, y: u32) -> Vec2 {
    Vec2::new((x as f32 + 0.5) * CELL_SIZE, (y as f32 + 0.5) * CELL_SIZE)
}

fn random_open_cell(rng: &mut SimRng) -> Vec2 {
    loop {
        let x = rng.gen_range(1..GRID_SIZE - 1);
        let y = rng.gen_range(1..GRID_SIZE - 1);
        if !is_wall(x, y) {
            return cell_centre(x, y);
        }
    }
}

// ── Target model ──────────────────────────────────────────────────────────────

/// Agents are split into groups that chase a shared target.  Each group's
/// target occasionally jumps to a random open cell.
struct WanderingGroups {
    spots: Vec<Vec2>,
}

impl WanderingGroups {
    fn new(rng: &mut SimRng) -> Self {
        Self { spots: (0..TARGET_GROUPS).map(|_| random_open_cell(rng)).collect() }
    }
}

impl TargetModel for WanderingGroups {
    fn update_targets(&mut self, _now_secs: f32, targets: &mut [Vec2], rng: &mut SimRng) {
        for spot in self.spots.iter_mut() {
            if rng.gen_bool(RELOCATE_CHANCE) {
                *spot = random_open_cell(rng);
            }
        }
        for (i, t) in targets.iter_mut().enumerate() {
            *t = self.spots[i % TARGET_GROUPS];
        }
    }
}

// ── Progress observer ─────────────────────────────────────────────────────────

#[derive(Default)]
struct Progress {
    arrivals:     u64,
    replans:      u64,
    peak_moving:  usize,
}

impl SimObserver for Progress {
    fn on_state_change(&mut self, _tick: Tick, _agent: AgentId, from: PathState, to: PathState) {
        match (from, to) {
            (PathState::FollowingPath, PathState::Idle) => self.arrivals += 1,
            (PathState::FollowingPath, PathState::FindingPath) => self.replans += 1,
            _ => {}
        }
    }

    fn on_tick_end(&mut self, tick: Tick, moving: usize) {
        self.peak_moving = self.peak_moving.max(moving);
        if tick.0 % REPORT_EVERY == 0 {
            info!(tick = tick.0, moving, arrivals = self.arrivals, replans = self.replans, "progress");
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick, stats: &ServiceStats) {
        info!(
            final_tick = final_tick.0,
            scheduled = stats.scheduled,
            dedup_hits = stats.dedup_hits,
            rejected = stats.rejected,
            reclaimed = stats.reclaimed,
            "service_summary"
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();
    info!("=== crowd — rust_nav demo ===");

    // 1. Build the map.
    let (graph, _cells) = NavGraph::grid(GRID_SIZE, GRID_SIZE, CELL_SIZE, is_wall);
    info!(nodes = graph.node_count(), edges = graph.edge_count(), "map_built");

    // 2. Spawn points and target groups, drawn from a setup RNG separate from
    //    the sim's own stream.
    let mut setup_rng = SimRng::new(SEED ^ 0x5EED);
    let starts: Vec<Vec2> = (0..AGENT_COUNT).map(|_| random_open_cell(&mut setup_rng)).collect();
    let targets = WanderingGroups::new(&mut setup_rng);
    let initial_targets = (0..AGENT_COUNT).map(|i| targets.spots[i % TARGET_GROUPS]).collect();

    // 3. Sim config.
    let config = SimConfig {
        seed:        SEED,
        dt_secs:     DT_SECS,
        total_ticks: (SIM_SECS as f32 / DT_SECS).round() as u64,
        service: ServiceConfig {
            worker_count:     8,
            record_count:     64,
            path_capacity:    512,
            max_age_ticks:    20,
            iteration_budget: 128,
        },
        agent: AgentPathConfig {
            waypoint_distance: 0.3,
            waypoint_jitter:   0.4,
            ..AgentPathConfig::default()
        },
    };

    // 4. Build sim.
    let mut sim = SimBuilder::new(config, graph, starts, targets)
        .targets(initial_targets)
        .speed(3.0)
        .build()?;

    // 5. Run.
    let mut progress = Progress::default();
    let t0 = Instant::now();
    sim.run(&mut progress);
    let elapsed = t0.elapsed();

    // 6. Summary.
    let stats = sim.service.stats();
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  agents at target : {} / {}", sim.arrived(), sim.agent_count());
    println!("  arrivals         : {}", progress.arrivals);
    println!("  replans          : {}", progress.replans);
    println!("  peak moving      : {}", progress.peak_moving);
    println!(
        "  searches         : {} scheduled, {} shared, {} refused",
        stats.scheduled, stats.dedup_hits, stats.rejected
    );
    println!("  outcomes         : {} solved, {} exhausted", stats.solved, stats.exhausted);

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
