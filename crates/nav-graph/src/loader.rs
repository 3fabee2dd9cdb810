//! CSV navigation-graph loader.
//!
//! # CSV format
//!
//! Two tables.  **Nodes** — one row per node; ids must be `0..n` with no
//! gaps (any row order):
//!
//! ```csv
//! node_id,x,y
//! 0,0.5,0.5
//! 1,1.5,0.5
//! ```
//!
//! **Links** — one row per undirected link.  `length` defaults to the
//! straight-line distance; the four `portal_*` columns default to a
//! zero-width portal at the midpoint.  `one_way = true` adds only `a → b`.
//!
//! ```csv
//! a,b,length,portal_ax,portal_ay,portal_bx,portal_by,one_way
//! 0,1,,1.0,0.0,1.0,1.0,
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use nav_core::{NodeId, Vec2};

use crate::network::{NavGraph, NavGraphBuilder};
use crate::topology::Portal;
use crate::GraphError;

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node_id: u32,
    x:       f32,
    y:       f32,
}

#[derive(Deserialize)]
struct LinkRecord {
    a: u32,
    b: u32,
    #[serde(default)]
    length:    Option<f32>,
    #[serde(default)]
    portal_ax: Option<f32>,
    #[serde(default)]
    portal_ay: Option<f32>,
    #[serde(default)]
    portal_bx: Option<f32>,
    #[serde(default)]
    portal_by: Option<f32>,
    #[serde(default)]
    one_way:   Option<bool>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`NavGraph`] from a nodes CSV and a links CSV on disk.
pub fn load_graph_csv(nodes: &Path, links: &Path) -> Result<NavGraph, GraphError> {
    let nodes = std::fs::File::open(nodes)?;
    let links = std::fs::File::open(links)?;
    load_graph_reader(nodes, links)
}

/// Like [`load_graph_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded level data.
pub fn load_graph_reader<N: Read, L: Read>(nodes: N, links: L) -> Result<NavGraph, GraphError> {
    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut rows: Vec<NodeRecord> = csv::Reader::from_reader(nodes)
        .deserialize::<NodeRecord>()
        .collect::<Result<_, _>>()
        .map_err(|e| GraphError::Parse(e.to_string()))?;
    rows.sort_by_key(|r| r.node_id);

    let mut b = NavGraphBuilder::with_capacity(rows.len(), rows.len() * 4);
    for (expected, row) in rows.iter().enumerate() {
        if row.node_id as usize != expected {
            return Err(GraphError::Parse(format!(
                "node ids must be contiguous from 0: expected {expected}, found {}",
                row.node_id
            )));
        }
        b.add_node(Vec2::new(row.x, row.y));
    }

    // ── Links ─────────────────────────────────────────────────────────────
    let node_count = b.node_count() as u32;
    let mut csv_reader = csv::Reader::from_reader(links);
    for result in csv_reader.deserialize::<LinkRecord>() {
        let row = result.map_err(|e| GraphError::Parse(e.to_string()))?;
        for id in [row.a, row.b] {
            if id >= node_count {
                return Err(GraphError::NodeNotFound(NodeId(id)));
            }
        }

        let (a, c) = (NodeId(row.a), NodeId(row.b));
        let (pa, pc) = (b.node_pos(a), b.node_pos(c));
        let length = row.length.unwrap_or_else(|| pa.distance(pc));
        let portal = parse_portal(&row)?.unwrap_or_else(|| Portal::point(pa.lerp(pc, 0.5)));

        if row.one_way.unwrap_or(false) {
            b.add_directed_edge(a, c, length, portal);
        } else {
            b.add_link_with_portal(a, c, length, portal);
        }
    }

    Ok(b.build())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_portal(row: &LinkRecord) -> Result<Option<Portal>, GraphError> {
    match (row.portal_ax, row.portal_ay, row.portal_bx, row.portal_by) {
        (None, None, None, None) => Ok(None),
        (Some(ax), Some(ay), Some(bx), Some(by)) => {
            Ok(Some(Portal::new(Vec2::new(ax, ay), Vec2::new(bx, by))))
        }
        _ => Err(GraphError::Parse(format!(
            "link {}-{}: portal needs all four of portal_ax, portal_ay, portal_bx, portal_by",
            row.a, row.b
        ))),
    }
}
