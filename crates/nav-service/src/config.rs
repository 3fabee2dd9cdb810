//! Path service configuration.

use crate::{ServiceError, ServiceResult};

/// Sizing and budget for a [`PathService`](crate::PathService).
///
/// Everything is allocated up front from these numbers; the service never
/// grows afterwards.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceConfig {
    /// Searches that may run concurrently.
    pub worker_count: usize,

    /// Requests that may be tracked at once (scheduled, running, or cached).
    pub record_count: usize,

    /// Nodes stored per result.  Longer paths keep their goal-end window.
    pub path_capacity: usize,

    /// Completed, unreferenced results older than this many ticks may be
    /// recycled, and are no longer handed out to new requests.
    pub max_age_ticks: u64,

    /// Default expansions per worker per tick for [`PathService::tick`].
    ///
    /// [`PathService::tick`]: crate::PathService::tick
    pub iteration_budget: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            worker_count:     4,
            record_count:     64,
            path_capacity:    256,
            max_age_ticks:    60,
            iteration_budget: 64,
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.worker_count == 0 || self.worker_count > u16::MAX as usize {
            return Err(ServiceError::Config(format!(
                "worker_count must be in 1..={}, got {}",
                u16::MAX,
                self.worker_count
            )));
        }
        if self.record_count == 0 || self.record_count >= u32::MAX as usize {
            return Err(ServiceError::Config(format!(
                "record_count must be in 1..{}, got {}",
                u32::MAX,
                self.record_count
            )));
        }
        if self.path_capacity == 0 {
            return Err(ServiceError::Config("path_capacity must be at least 1".into()));
        }
        if self.iteration_budget == 0 {
            return Err(ServiceError::Config("iteration_budget must be at least 1".into()));
        }
        Ok(())
    }
}
