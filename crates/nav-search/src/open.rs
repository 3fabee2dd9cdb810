//! Sorted open list.
//!
//! Entries are kept in **descending** cost order so the cheapest entry is
//! popped from the back in O(1).  Among equal costs the oldest entry sits
//! closest to the back, giving FIFO tie-breaking.  Unlike a binary heap the
//! list supports in-place removal of a specific entry, which the engine needs
//! when a queued node is re-parented onto a cheaper route.

#[derive(Clone, Debug, Default)]
pub(crate) struct OpenList {
    entries: Vec<(f32, u32)>,
}

impl OpenList {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn push(&mut self, cost: f32, idx: u32) {
        let pos = self.entries.partition_point(|&(c, _)| c > cost);
        self.entries.insert(pos, (cost, idx));
    }

    /// Remove and return the cheapest entry.
    #[inline]
    pub(crate) fn pop(&mut self) -> Option<(f32, u32)> {
        self.entries.pop()
    }

    /// Remove the entry for tree node `idx`, which was queued at `cost`.
    pub(crate) fn remove(&mut self, idx: u32, cost: f32) -> bool {
        let start = self.entries.partition_point(|&(c, _)| c > cost);
        let found = self.entries[start..]
            .iter()
            .take_while(|&&(c, _)| c == cost)
            .position(|&(_, i)| i == idx);
        match found {
            Some(offset) => {
                self.entries.remove(start + offset);
                true
            }
            None => false,
        }
    }
}
