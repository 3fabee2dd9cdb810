/// Running counters kept by the path service.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceStats {
    /// Requests that took a fresh record.
    pub scheduled:  u64,
    /// Requests answered by an existing record.
    pub dedup_hits: u64,
    /// Requests refused because no record was free.
    pub rejected:   u64,
    /// Stale completed records recycled for a new request.
    pub reclaimed:  u64,
    pub solved:     u64,
    /// Searches that ended without reaching the destination.
    pub exhausted:  u64,
    /// Records returned to `Available` by their last reference.
    pub cancelled:  u64,
    /// Running searches torn down by cancellation.
    pub aborted:    u64,
}
