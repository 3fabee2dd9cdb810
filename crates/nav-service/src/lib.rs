//! `nav-service` — shared path search for many requesters on a fixed budget.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`record`]  | `SearchRecord`, `Stage`                                      |
//! | [`pool`]    | `RecordPool` — record slab + intrusive stage lists           |
//! | [`copy`]    | `copy_forward`, `copy_reversed`                              |
//! | [`service`] | `PathService` — dedup, ref counting, workers, harvesting     |
//! | [`config`]  | `ServiceConfig`                                              |
//! | [`stats`]   | `ServiceStats`                                               |
//! | [`error`]   | `ServiceError`, `ServiceResult<T>`                           |
//!
//! # Resource model
//!
//! Records, path buffers, and workers are all allocated by
//! `PathService::new` and never grow.  When every record is taken and no
//! completed result is stale, `begin_search` refuses with `None` and the
//! requester retries on a later tick.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on config, stage, stats.   |

pub mod config;
pub mod copy;
pub mod error;
pub mod pool;
pub mod record;
pub mod service;
pub mod stats;


pub use config::ServiceConfig;
pub use copy::{copy_forward, copy_reversed};
pub use error::{ServiceError, ServiceResult};
pub use pool::RecordPool;
pub use record::{SearchRecord, Stage};
pub use service::PathService;
pub use stats::ServiceStats;
