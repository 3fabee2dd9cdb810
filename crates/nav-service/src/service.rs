//! The `PathService` — shared, budgeted path search for many requesters.
//!
//! # Request lifecycle
//!
//! 1. [`PathService::begin_search`] returns a [`Ticket`].  Requests for the
//!    same endpoint pair (in either order) that are scheduled, running, or
//!    freshly completed share one record and one physical search.
//! 2. [`PathService::update`] promotes scheduled records onto free workers in
//!    FIFO order, advances every running search by a fixed budget, and
//!    harvests finished ones into their record's path buffer.
//! 3. The requester polls [`PathService::retrieve_result`] and then drops its
//!    reference with [`PathService::release_result`] (result stays cached) or
//!    [`PathService::cancel_search`] (record is freed as soon as nobody else
//!    holds it).

use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, trace, warn};

use nav_core::{LogicalClock, Tick, Ticket, WorkerId};
use nav_graph::SearchGraph;
use nav_search::{BestFirstSearch, SearchStatus};

use crate::copy::{copy_forward, copy_reversed};
use crate::pool::RecordPool;
use crate::record::{SearchRecord, Stage};
use crate::{ServiceConfig, ServiceResult, ServiceStats};

/// A search engine plus the record it is working on.
#[derive(Debug)]
struct Worker<N> {
    engine: BestFirstSearch<N>,
    record: Option<u32>,
}

/// Fixed-capacity path search scheduler.
#[derive(Debug)]
pub struct PathService<N> {
    config:  ServiceConfig,
    records: RecordPool<N>,
    workers: Vec<Worker<N>>,
    clock:   LogicalClock,
    stats:   ServiceStats,
}

impl<N> PathService<N>
where
    N: Copy + Eq + Hash + Debug,
{
    /// Allocate every record and worker described by `config`.
    pub fn new(config: ServiceConfig) -> ServiceResult<Self> {
        config.validate()?;
        let records = RecordPool::new(config.record_count as u32, config.path_capacity);
        let workers = (0..config.worker_count)
            .map(|_| Worker { engine: BestFirstSearch::new(), record: None })
            .collect();
        debug!(
            workers = config.worker_count,
            records = config.record_count,
            path_capacity = config.path_capacity,
            "path_service_created"
        );
        Ok(Self {
            config,
            records,
            workers,
            clock: LogicalClock::new(),
            stats: ServiceStats::default(),
        })
    }

    // ── Requests ──────────────────────────────────────────────────────────

    /// Request a path between `from` and `to`.
    ///
    /// Returns `None` when every record is in use and none is stale; the
    /// caller should retry later.
    pub fn begin_search(&mut self, from: N, to: N) -> Option<Ticket> {
        if let Some(idx) = self.find_shared(from, to) {
            let rec = self.records.at_mut(idx);
            rec.ref_count += 1;
            self.stats.dedup_hits += 1;
            debug!(
                ticket = %rec.id,
                ?from,
                ?to,
                stage = ?rec.stage,
                ref_count = rec.ref_count,
                "search_shared"
            );
            return Some(rec.id);
        }

        let Some(idx) = self.take_free_record() else {
            self.stats.rejected += 1;
            debug!(?from, ?to, "search_rejected");
            return None;
        };

        self.records.at_mut(idx).reset(from, to);
        self.records.move_to(idx, Stage::Scheduled);
        self.stats.scheduled += 1;

        let ticket = self.records.at(idx).id;
        debug!(%ticket, ?from, ?to, queued = self.records.len(Stage::Scheduled), "search_scheduled");
        Some(ticket)
    }

    /// Drop one reference.  When the last reference goes the record returns
    /// to `Available`, aborting its search if it is running.
    pub fn cancel_search(&mut self, ticket: Ticket) {
        let Some(idx) = self.live_index(ticket, "cancel_search") else {
            return;
        };
        let rec = self.records.at_mut(idx);
        rec.ref_count = rec.ref_count.saturating_sub(1);
        if rec.ref_count == 0 {
            self.free_record(idx);
        }
    }

    /// Drop one reference but keep a completed result cached for other
    /// requesters until it ages past `max_age_ticks`.  A result that is not
    /// complete yet is handled like [`cancel_search`](Self::cancel_search).
    pub fn release_result(&mut self, ticket: Ticket) {
        let Some(idx) = self.live_index(ticket, "release_result") else {
            return;
        };
        let rec = self.records.at_mut(idx);
        if rec.stage != Stage::Completed {
            self.cancel_search(ticket);
            return;
        }
        if rec.ref_count == 0 {
            warn!(%ticket, "release_result on unreferenced record");
            return;
        }
        rec.ref_count -= 1;
        trace!(%ticket, ref_count = rec.ref_count, "result_released");
    }

    /// Copy a completed result into `out`, oriented as `from → to`.
    ///
    /// Returns the number of nodes written, or `None` if the ticket's search
    /// has not completed or the ticket does not hold this endpoint pair.
    /// Slots of `out` past the written nodes are set to `None`.
    pub fn retrieve_result(
        &self,
        ticket: Ticket,
        from:   N,
        to:     N,
        out:    &mut [Option<N>],
    ) -> Option<usize> {
        let rec = self.records.get(ticket)?;
        if rec.stage != Stage::Completed {
            return None;
        }
        let reversed = rec.orientation(from, to)?;
        let written = if reversed {
            copy_reversed(rec.result(), out)
        } else {
            copy_forward(rec.result(), out)
        };
        Some(written)
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// One scheduling tick: promote, iterate each running search by at most
    /// `budget` expansions, harvest, then advance the logical clock.
    pub fn update<G>(&mut self, graph: &G, budget: u32)
    where
        G: SearchGraph<Node = N> + ?Sized,
    {
        self.promote(graph);

        let now = self.clock.now();
        for w in 0..self.workers.len() {
            let Some(idx) = self.workers[w].record else {
                continue;
            };
            let status = self.workers[w].engine.iterate(graph, budget);
            trace!(worker = w, record = idx, ?status, "worker_iterated");
            if status.is_finished() {
                self.harvest(w, idx, status, now);
            }
        }

        self.clock.advance();
    }

    /// [`update`](Self::update) with the configured `iteration_budget`.
    pub fn tick<G>(&mut self, graph: &G)
    where
        G: SearchGraph<Node = N> + ?Sized,
    {
        self.update(graph, self.config.iteration_budget);
    }

    fn promote<G>(&mut self, graph: &G)
    where
        G: SearchGraph<Node = N> + ?Sized,
    {
        for w in 0..self.workers.len() {
            if self.workers[w].engine.is_active() {
                continue;
            }
            let Some(idx) = self.records.front(Stage::Scheduled) else {
                break;
            };
            let rec = self.records.at_mut(idx);
            let (Some(from), Some(to)) = (rec.from, rec.to) else {
                // Scheduled records are always bound to a request.
                continue;
            };
            rec.worker = Some(WorkerId(w as u16));
            let ticket = rec.id;
            self.records.move_to(idx, Stage::InProgress);

            let worker = &mut self.workers[w];
            worker.engine.begin_search(graph, from, to);
            worker.record = Some(idx);
            debug!(%ticket, worker = w, ?from, ?to, "search_started");
        }
    }

    fn harvest(&mut self, w: usize, idx: u32, status: SearchStatus, now: Tick) {
        let worker = &mut self.workers[w];
        let rec = self.records.at_mut(idx);

        let len = worker.engine.best_path_into(&mut rec.path).unwrap_or(0);
        rec.path_len = len;
        rec.valid_len = len.min(rec.path.len());
        rec.complete = status == SearchStatus::Solved;
        rec.completed_at = now;
        rec.worker = None;
        let (ticket, complete) = (rec.id, rec.complete);

        worker.engine.end_search();
        worker.record = None;
        self.records.move_to(idx, Stage::Completed);

        if complete {
            self.stats.solved += 1;
        } else {
            self.stats.exhausted += 1;
        }
        debug!(%ticket, worker = w, path_len = len, complete, "search_completed");
    }

    // ── Record management ─────────────────────────────────────────────────

    /// A record already answering `from ↔ to`: scheduled, running, or
    /// completed and not yet stale.
    fn find_shared(&self, from: N, to: N) -> Option<u32> {
        let now = self.clock.now();
        let max_age = self.config.max_age_ticks;
        [Stage::Scheduled, Stage::InProgress, Stage::Completed]
            .into_iter()
            .flat_map(|stage| self.records.indices(stage))
            .find(|&i| {
                let rec = self.records.at(i);
                rec.orientation(from, to).is_some() && !rec.is_stale(now, max_age)
            })
    }

    /// Any available record, else the oldest stale unreferenced result.
    fn take_free_record(&mut self) -> Option<u32> {
        if let Some(idx) = self.records.front(Stage::Available) {
            return Some(idx);
        }

        let now = self.clock.now();
        let max_age = self.config.max_age_ticks;
        // Completed is ordered by completion tick, so once one record is
        // fresh every later one is too.
        let idx = self
            .records
            .indices(Stage::Completed)
            .take_while(|&i| self.records.at(i).is_stale(now, max_age))
            .find(|&i| self.records.at(i).ref_count == 0)?;

        self.stats.reclaimed += 1;
        debug!(
            ticket = %self.records.at(idx).id,
            completed_at = %self.records.at(idx).completed_at,
            %now,
            "stale_result_reclaimed"
        );
        Some(idx)
    }

    /// Return an unreferenced record to `Available`, aborting its worker.
    fn free_record(&mut self, idx: u32) {
        let rec = self.records.at_mut(idx);
        let ticket = rec.id;
        let stage = rec.stage;
        if let Some(w) = rec.worker.take() {
            let worker = &mut self.workers[w.index()];
            worker.engine.end_search();
            worker.record = None;
            self.stats.aborted += 1;
        }
        rec.from = None;
        rec.to = None;
        self.records.move_to(idx, Stage::Available);
        self.stats.cancelled += 1;
        debug!(%ticket, from_stage = ?stage, "search_cancelled");
    }

    /// Record index for `ticket` if it is in use; warns otherwise.
    fn live_index(&self, ticket: Ticket, op: &'static str) -> Option<u32> {
        match self.records.get(ticket) {
            Some(rec) if rec.stage != Stage::Available => Some(ticket.0),
            Some(_) => {
                warn!(%ticket, op, "ticket is not in use");
                None
            }
            None => {
                warn!(%ticket, op, "unknown ticket");
                None
            }
        }
    }

    // ── Introspection ─────────────────────────────────────────────────────

    #[inline]
    pub fn stage_count(&self, stage: Stage) -> usize {
        self.records.len(stage)
    }

    /// Records in `stage`, in stage order.
    pub fn records_in(&self, stage: Stage) -> impl Iterator<Item = &SearchRecord<N>> + '_ {
        self.records.iter(stage)
    }

    #[inline]
    pub fn record(&self, ticket: Ticket) -> Option<&SearchRecord<N>> {
        self.records.get(ticket)
    }

    /// Workers currently running a search.
    pub fn busy_workers(&self) -> usize {
        self.workers.iter().filter(|w| w.engine.is_active()).count()
    }

    #[inline]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Logical tick; advanced once per [`update`](Self::update).
    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    #[inline]
    pub fn stats(&self) -> &ServiceStats {
        &self.stats
    }

    #[inline]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
