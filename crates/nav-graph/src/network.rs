//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! Outgoing edges are stored in **Compressed Sparse Row (CSR)** form.  Given a
//! `NodeId n`, its outgoing edges are the `EdgeId`s
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length`, `edge_portal`,
//! `edge_blocked`) are sorted by source node and indexed by `EdgeId`, so
//! neighbour expansion is a contiguous memory scan.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps world positions to the nearest `NodeId`.  The
//! agent state machine uses it to resolve agent and target locations into
//! graph nodes.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use nav_core::{EdgeId, NodeId, Vec2};

use crate::topology::{NavTopology, Portal, SearchGraph};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Directed navigation graph in CSR format plus a spatial index.
///
/// All arrays are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`NavGraphBuilder`] or [`NavGraph::grid`].
pub struct NavGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// World position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Vec2>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,

    /// Traversal length of each edge.
    pub edge_length: Vec<f32>,

    /// Crossing segment of each edge (see [`Portal`]).
    pub edge_portal: Vec<Portal>,

    /// Blocked edges stay in the graph but report no traversal cost.
    pub edge_blocked: Vec<bool>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl NavGraph {
    /// An empty graph with no nodes or edges.  Every search against it ends
    /// `Exhausted` and every nearest-node query returns `None`.
    pub fn empty() -> Self {
        NavGraphBuilder::new().build()
    }

    /// Build a 4-connected grid of `width × height` square cells of side
    /// `cell_size`, skipping cells for which `is_wall(x, y)` is `true`.
    ///
    /// Nodes sit at cell centres; each link's portal is the shared cell
    /// boundary.  Returns the graph and a row-major table mapping each cell to
    /// its node (`None` for walls).
    pub fn grid<F>(width: u32, height: u32, cell_size: f32, is_wall: F) -> (NavGraph, Vec<Option<NodeId>>)
    where
        F: Fn(u32, u32) -> bool,
    {
        let (node_cap, edge_cap) = grid_capacity(width, height);
        let mut b = NavGraphBuilder::with_capacity(node_cap, edge_cap);
        let mut cells = vec![None; node_cap];
        let at = |x: u32, y: u32| y as usize * width as usize + x as usize;

        for y in 0..height {
            for x in 0..width {
                if is_wall(x, y) {
                    continue;
                }
                let centre = Vec2::new(
                    (x as f32 + 0.5) * cell_size,
                    (y as f32 + 0.5) * cell_size,
                );
                cells[at(x, y)] = Some(b.add_node(centre));
            }
        }

        for y in 0..height {
            for x in 0..width {
                let Some(a) = cells[at(x, y)] else {
                    continue;
                };
                // East neighbour: shared boundary is the vertical line x+1.
                if x + 1 < width {
                    if let Some(c) = cells[at(x + 1, y)] {
                        let bx = (x + 1) as f32 * cell_size;
                        let portal = Portal::new(
                            Vec2::new(bx, y as f32 * cell_size),
                            Vec2::new(bx, (y + 1) as f32 * cell_size),
                        );
                        b.add_link_with_portal(a, c, cell_size, portal);
                    }
                }
                // North neighbour: shared boundary is the horizontal line y+1.
                if y + 1 < height {
                    if let Some(c) = cells[at(x, y + 1)] {
                        let by = (y + 1) as f32 * cell_size;
                        let portal = Portal::new(
                            Vec2::new(x as f32 * cell_size, by),
                            Vec2::new((x + 1) as f32 * cell_size, by),
                        );
                        b.add_link_with_portal(a, c, cell_size, portal);
                    }
                }
            }
        }

        (b.build(), cells)
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// The edge `from → to`, if one exists.  Linear in `from`'s out-degree.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.out_edges(from).find(|e| self.edge_to[e.index()] == to)
    }

    // ── Dynamic blocking ──────────────────────────────────────────────────

    /// Block or unblock a directed edge.  Searches already in flight see the
    /// change on their next expansion of `edge`'s source.
    pub fn set_blocked(&mut self, edge: EdgeId, blocked: bool) {
        self.edge_blocked[edge.index()] = blocked;
    }

    /// Block or unblock both directions between `a` and `b`.  Returns the
    /// number of edges changed.
    pub fn set_link_blocked(&mut self, a: NodeId, b: NodeId, blocked: bool) -> usize {
        let mut changed = 0;
        for (from, to) in [(a, b), (b, a)] {
            if let Some(e) = self.find_edge(from, to) {
                self.set_blocked(e, blocked);
                changed += 1;
            }
        }
        changed
    }

    #[inline]
    pub fn is_blocked(&self, edge: EdgeId) -> bool {
        self.edge_blocked[edge.index()]
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `pos`; `None` only if the graph has no nodes.
    pub fn snap_to_node(&self, pos: Vec2) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }
}

impl SearchGraph for NavGraph {
    type Node = NodeId;

    fn neighbors(&self, node: NodeId, out: &mut Vec<NodeId>) {
        out.extend(self.out_edges(node).map(|e| self.edge_to[e.index()]));
    }

    fn distance(&self, a: NodeId, b: NodeId) -> f32 {
        self.node_pos[a.index()].distance(self.node_pos[b.index()])
    }

    fn cost(&self, from: NodeId, to: NodeId, goal: NodeId, path_len: f32) -> Option<f32> {
        let step = if from == to {
            0.0
        } else {
            let edge = self.find_edge(from, to)?;
            if self.edge_blocked[edge.index()] {
                return None;
            }
            self.edge_length[edge.index()]
        };
        Some(path_len + step + self.distance(to, goal))
    }
}

impl NavTopology for NavGraph {
    fn nearest_node(&self, point: Vec2, max_distance: f32) -> Option<NodeId> {
        let node = self.snap_to_node(point)?;
        self.node_pos[node.index()]
            .within(point, max_distance)
            .then_some(node)
    }

    fn node_position(&self, node: NodeId) -> Vec2 {
        self.node_pos[node.index()]
    }

    fn portal(&self, a: NodeId, b: NodeId) -> Option<Portal> {
        self.find_edge(a, b).map(|e| self.edge_portal[e.index()])
    }
}

/// Node and directed-edge capacity of a `width × height` grid, computed in
/// `usize` so large grids cannot overflow `u32`.
pub(crate) fn grid_capacity(width: u32, height: u32) -> (usize, usize) {
    let cells = width as usize * height as usize;
    (cells, cells * 4)
}

// ── NavGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use nav_core::Vec2;
/// use nav_graph::NavGraphBuilder;
///
/// let mut b = NavGraphBuilder::new();
/// let a = b.add_node(Vec2::new(0.0, 0.0));
/// let c = b.add_node(Vec2::new(3.0, 4.0));
/// b.add_link(a, c);
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
pub struct NavGraphBuilder {
    nodes:     Vec<Vec2>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:   NodeId,
    to:     NodeId,
    length: f32,
    portal: Portal,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Vec2) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge with an explicit length and portal.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length: f32, portal: Portal) {
        self.raw_edges.push(RawEdge { from, to, length, portal });
    }

    /// Undirected link whose length is the straight-line distance and whose
    /// portal is the midpoint between the two nodes.
    pub fn add_link(&mut self, a: NodeId, b: NodeId) {
        let pa = self.nodes[a.index()];
        let pb = self.nodes[b.index()];
        self.add_link_with_portal(a, b, pa.distance(pb), Portal::point(pa.lerp(pb, 0.5)));
    }

    /// Undirected link with explicit length and crossing segment.  The
    /// reverse edge gets the same portal with its endpoints swapped.
    pub fn add_link_with_portal(&mut self, a: NodeId, b: NodeId, length: f32, portal: Portal) {
        self.add_directed_edge(a, b, length, portal);
        self.add_directed_edge(b, a, length, Portal::new(portal.right, portal.left));
    }

    pub fn node_pos(&self, id: NodeId) -> Vec2 {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Consume the builder and produce a [`NavGraph`].
    ///
    /// O(E log E) for the edge sort plus O(N log N) for the R-tree bulk load.
    pub fn build(self) -> NavGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable sort keeps insertion order among a node's edges, which keeps
        // neighbour expansion order (and therefore tie-breaking) predictable.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:   Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:     Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length: Vec<f32>    = raw.iter().map(|e| e.length).collect();
        let edge_portal: Vec<Portal> = raw.iter().map(|e| e.portal).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.x, pos.y],
                id:    NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        NavGraph {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length,
            edge_portal,
            edge_blocked: vec![false; edge_count],
            spatial_idx,
        }
    }
}

impl Default for NavGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
