//! Search records and their lifecycle stages.

use nav_core::{Tick, Ticket, WorkerId};

// ── Stage ─────────────────────────────────────────────────────────────────────

/// Lifecycle stage of a [`SearchRecord`].
///
/// ```text
/// Available ─► Scheduled ─► InProgress ─► Completed
///     ▲            │             │             │
///     └────────────┴─────────────┴─────────────┘   (ref count reaches zero)
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    Available,
    Scheduled,
    InProgress,
    Completed,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Available,
        Stage::Scheduled,
        Stage::InProgress,
        Stage::Completed,
    ];

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

// ── SearchRecord ──────────────────────────────────────────────────────────────

/// One slot of the service's request table.
///
/// Records are created once when the service is built and recycled through
/// the stage lists; a record's [`Ticket`] never changes.
#[derive(Clone, Debug)]
pub struct SearchRecord<N> {
    pub id:           Ticket,
    pub from:         Option<N>,
    pub to:           Option<N>,
    /// Fixed-capacity path storage.  A `None` after the last node marks the
    /// end of a path shorter than the buffer.
    pub path:         Box<[Option<N>]>,
    /// Leading slots of `path` that hold the result.
    pub valid_len:    usize,
    /// Full length of the found path, which may exceed `path.len()`.
    pub path_len:     usize,
    /// `true` when the search reached `to`; `false` for a best-effort path.
    pub complete:     bool,
    pub completed_at: Tick,
    pub ref_count:    u32,
    pub stage:        Stage,
    /// Worker running this record's search while `InProgress`.
    pub worker:       Option<WorkerId>,

    // Intrusive links for the record's stage list.
    pub(crate) prev:  Option<u32>,
    pub(crate) next:  Option<u32>,
}

impl<N: Copy + Eq> SearchRecord<N> {
    pub(crate) fn new(id: Ticket, path_capacity: usize) -> Self {
        Self {
            id,
            from:         None,
            to:           None,
            path:         vec![None; path_capacity].into_boxed_slice(),
            valid_len:    0,
            path_len:     0,
            complete:     false,
            completed_at: Tick::ZERO,
            ref_count:    0,
            stage:        Stage::Available,
            worker:       None,
            prev:         None,
            next:         None,
        }
    }

    /// Clear the result and bind the record to a new request.
    pub(crate) fn reset(&mut self, from: N, to: N) {
        self.from = Some(from);
        self.to = Some(to);
        self.path.fill(None);
        self.valid_len = 0;
        self.path_len = 0;
        self.complete = false;
        self.completed_at = Tick::ZERO;
        self.ref_count = 1;
        self.worker = None;
    }

    /// `Some(false)` if the record was requested as `from → to`, `Some(true)`
    /// if it was requested as `to → from`, `None` otherwise.
    pub fn orientation(&self, from: N, to: N) -> Option<bool> {
        match (self.from, self.to) {
            (Some(f), Some(t)) if f == from && t == to => Some(false),
            (Some(f), Some(t)) if f == to && t == from => Some(true),
            _ => None,
        }
    }

    /// The stored result window.
    #[inline]
    pub fn result(&self) -> &[Option<N>] {
        &self.path[..self.valid_len]
    }

    /// A completed result older than `max_age` ticks.
    #[inline]
    pub fn is_stale(&self, now: Tick, max_age: u64) -> bool {
        self.stage == Stage::Completed && now.since(self.completed_at) > max_age
    }
}
