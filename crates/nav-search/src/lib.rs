//! `nav-search` — interruptible best-first search over any [`SearchGraph`].
//!
//! # Crate layout
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`pool`]   | `NodePool`, `SearchNode` (index-linked search tree)     |
//! | [`engine`] | `BestFirstSearch`, `SearchStatus`                       |
//!
//! The engine never owns the graph; it is borrowed for each
//! `begin_search` / `iterate` call.
//!
//! [`SearchGraph`]: nav_graph::SearchGraph

pub mod engine;
pub mod pool;

mod open;

#[cfg(test)]
mod tests;

pub use engine::{BestFirstSearch, SearchStatus};
pub use pool::{NodePool, SearchNode};
