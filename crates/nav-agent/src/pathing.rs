//! The per-agent pathing state machine.
//!
//! ```text
//!            target moves away
//!   Idle ──────────────────────────► FindingPath ◄──────────────┐
//!    ▲                                   │                      │ target drifted /
//!    │ reached target                    │ result retrieved     │ buffer exhausted
//!    │                                   ▼                      │
//!    └────────────────────────────── FollowingPath ─────────────┘
//! ```
//!
//! The agent talks to the [`PathService`] only through its ticket.  It never
//! holds a borrow of the service or the graph between updates, so both can be
//! driven or mutated freely by the caller.

use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

use nav_core::{AgentId, AgentRng, Ticket, Vec2};
use nav_graph::{NavTopology, Portal};
use nav_service::PathService;

use crate::{AgentPathConfig, AgentResult, PathState, PathingInput};

/// Result of looking up the waypoint for the current path index.
enum Step {
    Waypoint(Vec2),
    Replan,
}

/// Pathing context for one agent.
#[derive(Debug)]
pub struct AgentPathing<N> {
    agent:           AgentId,
    config:          AgentPathConfig,
    rng:             AgentRng,

    state:           PathState,
    state_started:   f32,

    agent_start:     Vec2,
    target_start:    Vec2,
    /// Agent and target positions the outstanding request was resolved from.
    requested_from:  Vec2,
    requested_to:    Vec2,
    from_node:       Option<N>,
    to_node:         Option<N>,
    ticket:          Option<Ticket>,

    path:            Box<[Option<N>]>,
    path_len:        usize,
    path_index:      usize,
    waypoint:        Option<Vec2>,

    next_attempt_at: f32,
}

impl<N> AgentPathing<N>
where
    N: Copy + Eq + Hash + Debug,
{
    /// An idle agent.  `seed` is the run's global seed; the agent's RNG
    /// stream is derived from it and `agent`.
    pub fn new(agent: AgentId, config: AgentPathConfig, seed: u64) -> AgentResult<Self> {
        config.validate()?;
        let path = vec![None; config.path_capacity].into_boxed_slice();
        Ok(Self {
            agent,
            config,
            rng: AgentRng::new(seed, agent),
            state: PathState::Idle,
            state_started: 0.0,
            agent_start: Vec2::ZERO,
            target_start: Vec2::ZERO,
            requested_from: Vec2::ZERO,
            requested_to: Vec2::ZERO,
            from_node: None,
            to_node: None,
            ticket: None,
            path,
            path_len: 0,
            path_index: 0,
            waypoint: None,
            next_attempt_at: 0.0,
        })
    }

    /// Advance the state machine and return the point to steer toward, if
    /// any.
    pub fn update<G>(
        &mut self,
        input:   PathingInput,
        service: &mut PathService<N>,
        graph:   &G,
    ) -> Option<Vec2>
    where
        G: NavTopology<Node = N> + ?Sized,
    {
        match self.state {
            PathState::Idle => {
                if input.position.within(input.target, self.config.waypoint_distance) {
                    return None;
                }
                self.enter(PathState::FindingPath, input.now);
                self.find_path(input, service, graph)
            }
            PathState::FindingPath => self.find_path(input, service, graph),
            PathState::FollowingPath => self.follow_path(input, service, graph),
        }
    }

    /// Drop any outstanding request and go idle at time `now`.
    pub fn cancel_pathfinding(&mut self, now: f32, service: &mut PathService<N>) {
        if let Some(ticket) = self.ticket.take() {
            service.cancel_search(ticket);
        }
        self.from_node = None;
        self.to_node = None;
        self.clear_path();
        if self.state != PathState::Idle {
            debug!(agent = %self.agent, from = ?self.state, "pathfinding_cancelled");
        }
        self.enter(PathState::Idle, now);
    }

    // ── States ────────────────────────────────────────────────────────────

    fn find_path<G>(
        &mut self,
        input:   PathingInput,
        service: &mut PathService<N>,
        graph:   &G,
    ) -> Option<Vec2>
    where
        G: NavTopology<Node = N> + ?Sized,
    {
        if input.position.within(input.target, self.config.waypoint_distance) {
            if let Some(ticket) = self.ticket.take() {
                service.cancel_search(ticket);
            }
            self.enter(PathState::Idle, input.now);
            return None;
        }

        if let (Some(ticket), Some(from), Some(to)) = (self.ticket, self.from_node, self.to_node) {
            let written = service.retrieve_result(ticket, from, to, &mut self.path)?;
            service.release_result(ticket);
            self.ticket = None;
            // Only a result starting at the agent's node is followed.
            if written == 0 || self.path[0] != Some(from) {
                debug!(agent = %self.agent, written, head = ?self.path[0], ?from, "path_not_anchored");
                self.clear_path();
                return None;
            }

            self.path_len = written;
            self.path_index = 0;
            self.agent_start = self.requested_from;
            self.target_start = self.requested_to;
            self.enter(PathState::FollowingPath, input.now);
            return match self.step(graph) {
                Step::Waypoint(p) => {
                    self.waypoint = Some(p);
                    Some(p)
                }
                Step::Replan => {
                    self.clear_path();
                    self.enter(PathState::FindingPath, input.now);
                    None
                }
            };
        }

        if input.now < self.next_attempt_at {
            return None;
        }
        self.next_attempt_at = input.now
            + self
                .rng
                .gen_range(self.config.retry_interval_min..self.config.retry_interval_max);

        let max = self.config.nearest_node_max_distance;
        let (Some(from), Some(to)) = (
            graph.nearest_node(input.position, max),
            graph.nearest_node(input.target, max),
        ) else {
            debug!(agent = %self.agent, position = %input.position, target = %input.target, "no_nearby_node");
            return None;
        };

        self.from_node = Some(from);
        self.to_node = Some(to);
        self.requested_from = input.position;
        self.requested_to = input.target;
        // Searched goal → agent so a truncated result keeps the agent end.
        self.ticket = service.begin_search(to, from);
        match self.ticket {
            Some(ticket) => debug!(agent = %self.agent, %ticket, ?from, ?to, "path_requested"),
            None => debug!(agent = %self.agent, retry_at = self.next_attempt_at, "path_request_refused"),
        }
        None
    }

    fn follow_path<G>(
        &mut self,
        input:   PathingInput,
        service: &mut PathService<N>,
        graph:   &G,
    ) -> Option<Vec2>
    where
        G: NavTopology<Node = N> + ?Sized,
    {
        let elapsed = input.now - self.state_started;
        if elapsed > self.config.path_validity_check_timeout
            && !input.target.within(self.target_start, self.config.target_distance_threshold)
        {
            debug!(agent = %self.agent, elapsed, "target_drifted");
            return self.replan(input, service, graph);
        }

        if input.position.within(self.target_start, self.config.waypoint_distance) {
            self.clear_path();
            self.enter(PathState::Idle, input.now);
            return None;
        }

        if let Some(current) = self.waypoint {
            if input.position.within(current, self.config.waypoint_distance) {
                self.path_index += 1;
                match self.step(graph) {
                    Step::Waypoint(p) => self.waypoint = Some(p),
                    Step::Replan => {
                        debug!(agent = %self.agent, index = self.path_index, "path_buffer_exhausted");
                        return self.replan(input, service, graph);
                    }
                }
            }
        }
        self.waypoint
    }

    fn replan<G>(
        &mut self,
        input:   PathingInput,
        service: &mut PathService<N>,
        graph:   &G,
    ) -> Option<Vec2>
    where
        G: NavTopology<Node = N> + ?Sized,
    {
        self.clear_path();
        self.enter(PathState::FindingPath, input.now);
        self.find_path(input, service, graph)
    }

    // ── Waypoints ─────────────────────────────────────────────────────────

    /// Waypoint for the edge leaving `path[path_index]`.
    fn step<G>(&mut self, graph: &G) -> Step
    where
        G: NavTopology<Node = N> + ?Sized,
    {
        match (self.path_node(self.path_index), self.path_node(self.path_index + 1)) {
            (Some(a), Some(b)) => match graph.portal(a, b) {
                Some(portal) => Step::Waypoint(self.crossing_point(portal)),
                None => Step::Waypoint(self.target_start),
            },
            (Some(a), None) if Some(a) == self.to_node => Step::Waypoint(self.target_start),
            _ => Step::Replan,
        }
    }

    fn crossing_point(&mut self, portal: Portal) -> Vec2 {
        let jitter = self.config.waypoint_jitter;
        if jitter > 0.0 {
            let half = jitter * 0.5;
            portal.point_at(0.5 + self.rng.gen_range(-half..=half))
        } else {
            portal.midpoint()
        }
    }

    #[inline]
    fn path_node(&self, i: usize) -> Option<N> {
        if i < self.path_len { self.path[i] } else { None }
    }

    fn clear_path(&mut self) {
        self.path.fill(None);
        self.path_len = 0;
        self.path_index = 0;
        self.waypoint = None;
    }

    fn enter(&mut self, state: PathState, now: f32) {
        if state != self.state {
            debug!(agent = %self.agent, from = ?self.state, to = ?state, at = now, "pathing_state_changed");
        }
        self.state = state;
        self.state_started = now;
    }

    // ── Introspection ─────────────────────────────────────────────────────

    #[inline]
    pub fn agent(&self) -> AgentId {
        self.agent
    }

    #[inline]
    pub fn state(&self) -> PathState {
        self.state
    }

    /// Time the current state was entered.
    #[inline]
    pub fn state_started(&self) -> f32 {
        self.state_started
    }

    #[inline]
    pub fn ticket(&self) -> Option<Ticket> {
        self.ticket
    }

    #[inline]
    pub fn waypoint(&self) -> Option<Vec2> {
        self.waypoint
    }

    /// The retrieved path, agent-side copy.
    #[inline]
    pub fn path(&self) -> &[Option<N>] {
        &self.path[..self.path_len]
    }

    #[inline]
    pub fn path_index(&self) -> usize {
        self.path_index
    }

    /// Graph nodes resolved for the agent and target at the last request.
    #[inline]
    pub fn endpoints(&self) -> (Option<N>, Option<N>) {
        (self.from_node, self.to_node)
    }

    /// Agent and target positions when the current path was retrieved.
    #[inline]
    pub fn start_positions(&self) -> (Vec2, Vec2) {
        (self.agent_start, self.target_start)
    }

    /// Earliest time of the next request attempt.
    #[inline]
    pub fn next_attempt_at(&self) -> f32 {
        self.next_attempt_at
    }

    #[inline]
    pub fn config(&self) -> &AgentPathConfig {
        &self.config
    }
}
