//! `nav-sim` — fixed-step crowd driver for the rust_nav framework.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Targets  — TargetModel::update_targets moves where agents want to go.
//!   ② Agents   — for each agent in ascending AgentId order:
//!                  AgentPathing::update → steering point
//!                  move toward it by at most speed * dt
//!   ③ Service  — PathService::tick promotes, searches, and harvests.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nav_graph::NavGraph;
//! use nav_sim::{FixedTargets, NoopObserver, SimBuilder, SimConfig};
//!
//! let (graph, _) = NavGraph::grid(32, 32, 1.0, |_, _| false);
//! let mut sim = SimBuilder::new(SimConfig::default(), graph, starts, FixedTargets)
//!     .targets(goals)
//!     .speed(2.0)
//!     .build()?;
//! sim.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;
pub mod target;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::NavSim;
pub use target::{FixedTargets, TargetModel};
