//! Topology traits — the seam between the pathfinding core and whatever owns
//! the world's graph.
//!
//! # Pluggability
//!
//! The search engine and the path service only ever see [`SearchGraph`]; the
//! agent state machine additionally needs [`NavTopology`] to turn positions
//! into nodes and node pairs into steering points.  [`NavGraph`] implements
//! both, but a dungeon generator, a navmesh, or a tile map can implement them
//! directly without converting into `NavGraph` first.
//!
//! Implementations are passed by reference to the calls that need them
//! (`BestFirstSearch::iterate`, `PathService::update`, `AgentPathing::update`)
//! rather than captured at construction, so the topology may be mutated
//! (e.g. doors opening) between ticks.
//!
//! [`NavGraph`]: crate::NavGraph

use std::fmt::Debug;
use std::hash::Hash;

use nav_core::Vec2;

/// Graph access required by the best-first search.
pub trait SearchGraph {
    /// Opaque node handle.  Compared by equality only; never mutated.
    type Node: Copy + Eq + Hash + Debug;

    /// Append the neighbours of `node` to `out`.  The caller clears `out`
    /// before calling.  Leaf nodes append nothing.
    fn neighbors(&self, node: Self::Node, out: &mut Vec<Self::Node>);

    /// Distance between two nodes, used to accumulate path length along the
    /// search tree.
    fn distance(&self, a: Self::Node, b: Self::Node) -> f32;

    /// Ordering cost for expanding `from → to` while searching for `goal`,
    /// given the path length accumulated up to `from`.
    ///
    /// `None` (or a negative value) marks the edge as blocked; the search
    /// skips it.  The default is the A* formulation
    /// `path_len + distance(from, to) + distance(to, goal)`.
    fn cost(
        &self,
        from:     Self::Node,
        to:       Self::Node,
        goal:     Self::Node,
        path_len: f32,
    ) -> Option<f32> {
        Some(path_len + self.distance(from, to) + self.distance(to, goal))
    }
}

/// World-space queries required by the agent state machine.
pub trait NavTopology: SearchGraph {
    /// Nearest node to `point`, or `None` if nothing lies within
    /// `max_distance`.
    fn nearest_node(&self, point: Vec2, max_distance: f32) -> Option<Self::Node>;

    /// World position of `node`.
    fn node_position(&self, node: Self::Node) -> Vec2;

    /// The segment where the edge `a → b` crosses from `a`'s region into
    /// `b`'s.  `None` if the nodes are not adjacent.
    fn portal(&self, a: Self::Node, b: Self::Node) -> Option<Portal>;
}

/// Edge intersection segment between two adjacent regions.
///
/// A degenerate portal (`left == right`) is a single crossing point, which is
/// what plain point-graphs use.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Portal {
    pub left:  Vec2,
    pub right: Vec2,
}

impl Portal {
    #[inline]
    pub fn new(left: Vec2, right: Vec2) -> Self {
        Self { left, right }
    }

    /// A zero-width portal at `p`.
    #[inline]
    pub fn point(p: Vec2) -> Self {
        Self { left: p, right: p }
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        self.left.lerp(self.right, 0.5)
    }

    /// Point at fraction `t` along the segment (`t` is clamped to [0, 1]).
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.left.lerp(self.right, t.clamp(0.0, 1.0))
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.left.distance(self.right)
    }
}
