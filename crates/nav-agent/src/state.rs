//! Pathing states and the per-update input.

use nav_core::Vec2;

/// Where an agent is in its plan → fetch → follow cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathState {
    /// Close enough to the target; no path held.
    #[default]
    Idle,
    /// Waiting for the path service to accept or answer a request.
    FindingPath,
    /// Steering along a retrieved path.
    FollowingPath,
}

/// What the agent senses this update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathingInput {
    /// Current time in seconds.
    pub now:      f32,
    /// The agent's own position.
    pub position: Vec2,
    /// Where the agent wants to be.
    pub target:   Vec2,
}

impl PathingInput {
    #[inline]
    pub fn new(now: f32, position: Vec2, target: Vec2) -> Self {
        Self { now, position, target }
    }
}
