//! Typed integer handles.
//!
//! Every id is `Copy + Ord + Hash`, so it works as a map key and as the graph
//! node handle the search layers compare by equality.  The inner integer is
//! `pub` for slab indexing; `.index()` is the readable spelling of that.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Navigation-graph node.
    pub struct NodeId(u32);
}

typed_id! {
    /// Directed navigation-graph edge.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Agent slot in the simulation driver.
    pub struct AgentId(u32);
}

typed_id! {
    /// Handle for one search record held by the path service.
    ///
    /// Record `n` always answers to `Ticket(n)`, whichever request currently
    /// occupies it, so a ticket held past its release may alias a later
    /// request for a different pair.
    pub struct Ticket(u32);
}

typed_id! {
    /// Search worker owned by the path service.
    pub struct WorkerId(u16);
}
