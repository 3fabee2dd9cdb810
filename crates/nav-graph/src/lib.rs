//! `nav-graph` — topology traits, navigation graph, and loading.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`topology`] | `SearchGraph`, `NavTopology` traits, `Portal`               |
//! | [`network`]  | `NavGraph` (CSR + R-tree), `NavGraphBuilder`, grid helper   |
//! | [`loader`]   | `load_graph_csv`, `load_graph_reader`                       |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Portal`.               |

pub mod error;
pub mod loader;
pub mod network;
pub mod topology;


pub use error::{GraphError, GraphResult};
pub use loader::{load_graph_csv, load_graph_reader};
pub use network::{NavGraph, NavGraphBuilder};
pub use topology::{NavTopology, Portal, SearchGraph};
