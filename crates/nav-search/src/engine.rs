//! Interruptible best-first search.
//!
//! # Resumability
//!
//! A search is started with [`BestFirstSearch::begin_search`] and advanced by
//! [`BestFirstSearch::iterate`], which performs at most `max_steps` node
//! expansions and returns.  Every piece of resume state (open list, closed
//! set, search tree, running best) lives inside the engine, so a caller can
//! spread one search over many frames with a fixed per-frame budget.
//!
//! # Ordering
//!
//! Nodes are expanded in ascending [`SearchGraph::cost`] order.  With the
//! default cost (`path_len + step + distance-to-goal`) this is A*; a cost that
//! ignores the goal gives Dijkstra.  Ties are broken first-in, first-out.
//!
//! A node is closed the first time it is popped and never reopened.  A node
//! still on the open list is re-parented when a route at least as cheap is
//! found.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use nav_graph::SearchGraph;

use crate::open::OpenList;
use crate::pool::NodePool;

// ── SearchStatus ──────────────────────────────────────────────────────────────

/// Outcome of one [`BestFirstSearch::iterate`] call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SearchStatus {
    /// The destination was reached; `best_path` ends at it.
    Solved,
    /// The open list emptied without reaching the destination.  `best_path`
    /// ends at the cheapest node expanded.  Also returned by an idle engine.
    Exhausted,
    /// The step budget ran out.  `cost_so_far` is the cost of the last node
    /// popped.
    InProgress { cost_so_far: f32 },
}

impl SearchStatus {
    /// `true` for `Solved` and `Exhausted`.
    #[inline]
    pub fn is_finished(&self) -> bool {
        !matches!(self, SearchStatus::InProgress { .. })
    }
}

// ── BestFirstSearch ───────────────────────────────────────────────────────────

/// One reusable search engine.  Owns its node pool exclusively.
#[derive(Debug)]
pub struct BestFirstSearch<N> {
    origin:      Option<N>,
    destination: Option<N>,
    pool:        NodePool<N>,
    open:        OpenList,
    /// Graph node → tree node, for nodes currently on the open list.
    open_index:  FxHashMap<N, u32>,
    closed:      FxHashSet<N>,
    /// Cheapest expanded node, or the destination once solved.  `None` until
    /// the first `begin_search`.
    best:        Option<u32>,
    last_cost:   f32,
    finished:    Option<SearchStatus>,
    steps:       u64,
    scratch:     Vec<N>,
}

impl<N> BestFirstSearch<N>
where
    N: Copy + Eq + std::hash::Hash + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            origin:      None,
            destination: None,
            pool:        NodePool::new(),
            open:        OpenList::default(),
            open_index:  FxHashMap::default(),
            closed:      FxHashSet::default(),
            best:        None,
            last_cost:   0.0,
            finished:    None,
            steps:       0,
            scratch:     Vec::new(),
        }
    }

    /// Start a new search, discarding any previous one.
    pub fn begin_search<G>(&mut self, graph: &G, origin: N, destination: N)
    where
        G: SearchGraph<Node = N> + ?Sized,
    {
        self.pool.reset();
        self.open.clear();
        self.open_index.clear();
        self.closed.clear();
        self.finished = None;
        self.steps = 0;

        // A blocked root is still seeded so the tree is never empty.
        let cost = graph
            .cost(origin, origin, destination, 0.0)
            .filter(|c| *c >= 0.0)
            .unwrap_or(0.0);
        let root = self.pool.alloc(origin, None, cost, 0.0);
        self.open.push(cost, root);
        self.open_index.insert(origin, root);

        self.origin = Some(origin);
        self.destination = Some(destination);
        self.best = Some(root);
        self.last_cost = cost;
    }

    /// Expand up to `max_steps` nodes.
    pub fn iterate<G>(&mut self, graph: &G, max_steps: u32) -> SearchStatus
    where
        G: SearchGraph<Node = N> + ?Sized,
    {
        if let Some(done) = self.finished {
            return done;
        }
        let Some(destination) = self.destination else {
            return SearchStatus::Exhausted;
        };

        let mut budget = max_steps;
        while budget > 0 {
            let Some((cost, idx)) = self.open.pop() else { break };
            budget -= 1;
            self.steps += 1;
            self.last_cost = cost;

            let node = self.pool.get(idx).node;
            self.open_index.remove(&node);

            if node == destination {
                self.best = Some(idx);
                self.open.clear();
                self.open_index.clear();
                self.finished = Some(SearchStatus::Solved);
                trace!(
                    origin = ?self.origin,
                    destination = ?destination,
                    steps = self.steps,
                    cost,
                    "search_solved"
                );
                return SearchStatus::Solved;
            }

            self.closed.insert(node);
            let improves = self.best.is_none_or(|b| cost < self.pool.get(b).cost);
            if improves {
                self.best = Some(idx);
            }
            self.expand(graph, idx, destination);
        }

        if self.open.is_empty() {
            self.finished = Some(SearchStatus::Exhausted);
            trace!(
                origin = ?self.origin,
                destination = ?destination,
                steps = self.steps,
                closed = self.closed.len(),
                "search_exhausted"
            );
            return SearchStatus::Exhausted;
        }
        SearchStatus::InProgress { cost_so_far: self.last_cost }
    }

    fn expand<G>(&mut self, graph: &G, parent: u32, destination: N)
    where
        G: SearchGraph<Node = N> + ?Sized,
    {
        let (current, current_len) = {
            let p = self.pool.get(parent);
            (p.node, p.path_len)
        };

        let mut neighbors = std::mem::take(&mut self.scratch);
        neighbors.clear();
        graph.neighbors(current, &mut neighbors);

        for &next in &neighbors {
            if self.closed.contains(&next) {
                continue;
            }
            let Some(cost) = graph
                .cost(current, next, destination, current_len)
                .filter(|c| *c >= 0.0)
            else {
                continue;
            };
            let path_len = current_len + graph.distance(current, next);

            match self.open_index.get(&next).copied() {
                Some(existing) => {
                    let old_cost = self.pool.get(existing).cost;
                    if old_cost >= cost {
                        self.open.remove(existing, old_cost);
                        self.pool.reparent(existing, parent, cost, path_len);
                        self.open.push(cost, existing);
                    }
                }
                None => {
                    let idx = self.pool.alloc(next, Some(parent), cost, path_len);
                    self.open.push(cost, idx);
                    self.open_index.insert(next, idx);
                }
            }
        }

        self.scratch = neighbors;
    }

    /// Root-to-best path, or `None` if no search has run.
    pub fn best_path(&self) -> Option<Vec<N>> {
        let best = self.best?;
        let mut path: Vec<N> = self.pool.ancestors(best).map(|i| self.pool.get(i).node).collect();
        path.reverse();
        Some(path)
    }

    /// Write the root-to-best path into `out` without allocating.
    ///
    /// When the path is longer than `out`, the goal-end window is kept (the
    /// last `out.len()` nodes).  When it is shorter, `None` is written right
    /// after the last node and later slots are left untouched.
    ///
    /// Returns the full path length, or `None` if no search has run.
    pub fn best_path_into(&self, out: &mut [Option<N>]) -> Option<usize> {
        let best = self.best?;
        let len = self.pool.depth(best);
        let skip = len.saturating_sub(out.len());

        // Walk goal → root; position `i` counts down from `len - 1`.
        for (i, idx) in (0..len).rev().zip(self.pool.ancestors(best)) {
            if i < skip {
                break;
            }
            out[i - skip] = Some(self.pool.get(idx).node);
        }
        if len < out.len() {
            out[len] = None;
        }
        Some(len)
    }

    /// Release the endpoints.  The tree stays readable until the next
    /// `begin_search`.
    pub fn end_search(&mut self) {
        self.origin = None;
        self.destination = None;
    }

    // ── Introspection ─────────────────────────────────────────────────────

    /// `true` between `begin_search` and `end_search`.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.destination.is_some()
    }

    #[inline]
    pub fn origin(&self) -> Option<N> {
        self.origin
    }

    #[inline]
    pub fn destination(&self) -> Option<N> {
        self.destination
    }

    #[inline]
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    #[inline]
    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }

    /// Expansions performed by the current search.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// The search tree of the current (or last) search.
    #[inline]
    pub fn tree(&self) -> &NodePool<N> {
        &self.pool
    }

    /// Tree index of the current best node.
    #[inline]
    pub fn best_index(&self) -> Option<u32> {
        self.best
    }
}

impl<N> Default for BestFirstSearch<N>
where
    N: Copy + Eq + std::hash::Hash + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
