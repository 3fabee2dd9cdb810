//! Where agents want to go.

use nav_core::{SimRng, Vec2};

/// Moves agent targets between ticks.
///
/// Called once per tick, before any agent updates, with the simulated time in
/// seconds and the world RNG.
pub trait TargetModel {
    fn update_targets(&mut self, now_secs: f32, targets: &mut [Vec2], rng: &mut SimRng);
}

/// Targets never move on their own; callers may still edit `NavSim::targets`.
pub struct FixedTargets;

impl TargetModel for FixedTargets {
    fn update_targets(&mut self, _now_secs: f32, _targets: &mut [Vec2], _rng: &mut SimRng) {}
}
