//! `nav-agent` — per-agent client of the path service.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`state`]   | `PathState`, `PathingInput`                                 |
//! | [`config`]  | `AgentPathConfig`                                           |
//! | [`pathing`] | `AgentPathing` — Idle / FindingPath / FollowingPath         |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                              |
//!
//! # Degraded behaviour
//!
//! An agent whose requests keep being refused, or whose target cannot be
//! reached, stays in `FindingPath` (retrying at a randomized interval) or
//! keeps re-planning from the end of a best-effort path.  Neither is an
//! error.

pub mod config;
pub mod error;
pub mod pathing;
pub mod state;


pub use config::AgentPathConfig;
pub use error::{AgentError, AgentResult};
pub use pathing::AgentPathing;
pub use state::{PathState, PathingInput};
