//! `nav-core` — foundational types for the `rust_nav` pathfinding framework.
//!
//! This crate is a dependency of every other `nav-*` crate.  It has no
//! `nav-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`, `AgentId`, `Ticket`, `WorkerId`      |
//! | [`geo`]     | `Vec2` and distance helpers                              |
//! | [`time`]    | `Tick`, `LogicalClock`, `SimClock`                       |
//! | [`rng`]     | `AgentRng` (per-agent), `SimRng` (world)                 |
//! | [`error`]   | `NavError`, `NavResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, `Vec2`, and time.   |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{NavError, NavResult};
pub use geo::Vec2;
pub use ids::{AgentId, EdgeId, NodeId, Ticket, WorkerId};
pub use rng::{AgentRng, SimRng};
pub use time::{LogicalClock, SimClock, Tick};
