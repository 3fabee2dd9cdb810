//! Agent pathing tunables.

use crate::{AgentError, AgentResult};

/// Distances are world units, times are seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentPathConfig {
    /// Radius within which a waypoint (or the target) counts as reached.
    /// Also the distance the target must be away before an idle agent plans.
    pub waypoint_distance: f32,

    /// How far the target may drift from where it was when the path was
    /// retrieved before the path is considered invalid.
    pub target_distance_threshold: f32,

    /// Time spent following a path before drift is checked.
    pub path_validity_check_timeout: f32,

    /// Lower bound of the randomized wait between request attempts.
    pub retry_interval_min: f32,

    /// Upper bound (exclusive) of the randomized wait between request attempts.
    pub retry_interval_max: f32,

    /// Positions farther than this from every graph node cannot be planned
    /// from or to.
    pub nearest_node_max_distance: f32,

    /// Nodes the agent keeps from a retrieved path.
    pub path_capacity: usize,

    /// Fraction of each portal's width, centred on its midpoint, inside which
    /// waypoints are placed at random.  `0.0` always uses the midpoint.
    pub waypoint_jitter: f32,
}

impl Default for AgentPathConfig {
    fn default() -> Self {
        Self {
            waypoint_distance:           0.5,
            target_distance_threshold:   2.0,
            path_validity_check_timeout: 1.0,
            retry_interval_min:          0.25,
            retry_interval_max:          0.5,
            nearest_node_max_distance:   5.0,
            path_capacity:               64,
            waypoint_jitter:             0.0,
        }
    }
}

impl AgentPathConfig {
    pub fn validate(&self) -> AgentResult<()> {
        if self.waypoint_distance.is_nan() || self.waypoint_distance <= 0.0 {
            return Err(AgentError::Config(format!(
                "waypoint_distance must be positive, got {}",
                self.waypoint_distance
            )));
        }
        if self.target_distance_threshold < 0.0 || self.path_validity_check_timeout < 0.0 {
            return Err(AgentError::Config(
                "target_distance_threshold and path_validity_check_timeout must not be negative".into(),
            ));
        }
        if self.retry_interval_min < 0.0 || self.retry_interval_min >= self.retry_interval_max {
            return Err(AgentError::Config(format!(
                "retry interval must satisfy 0 <= min < max, got [{}, {})",
                self.retry_interval_min, self.retry_interval_max
            )));
        }
        if self.nearest_node_max_distance < 0.0 {
            return Err(AgentError::Config("nearest_node_max_distance must not be negative".into()));
        }
        if self.path_capacity == 0 {
            return Err(AgentError::Config("path_capacity must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.waypoint_jitter) {
            return Err(AgentError::Config(format!(
                "waypoint_jitter must be in [0, 1], got {}",
                self.waypoint_jitter
            )));
        }
        Ok(())
    }
}
