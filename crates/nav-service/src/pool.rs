//! The record slab and its four intrusive stage lists.
//!
//! Every record is linked into exactly one list, matching its `stage` field.
//! Lists are doubly linked through `SearchRecord::prev`/`next`, so moving a
//! record between stages is O(1) and each list keeps insertion order: FIFO for
//! `Scheduled`, completion order for `Completed`.

use nav_core::Ticket;

use crate::record::{SearchRecord, Stage};

#[derive(Copy, Clone, Debug, Default)]
struct StageList {
    head: Option<u32>,
    tail: Option<u32>,
    len:  usize,
}

/// Fixed set of search records partitioned by stage.
#[derive(Clone, Debug)]
pub struct RecordPool<N> {
    records: Vec<SearchRecord<N>>,
    lists:   [StageList; 4],
}

impl<N: Copy + Eq> RecordPool<N> {
    /// `count` records, all `Available`, each with a `path_capacity` buffer.
    pub fn new(count: u32, path_capacity: usize) -> Self {
        let mut pool = Self {
            records: (0..count)
                .map(|i| SearchRecord::new(Ticket(i), path_capacity))
                .collect(),
            lists:   [StageList::default(); 4],
        };
        for i in 0..count {
            pool.push_back(i, Stage::Available);
        }
        pool
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn len(&self, stage: Stage) -> usize {
        self.lists[stage.slot()].len
    }

    #[inline]
    pub fn front(&self, stage: Stage) -> Option<u32> {
        self.lists[stage.slot()].head
    }

    pub fn get(&self, ticket: Ticket) -> Option<&SearchRecord<N>> {
        self.records.get(ticket.index())
    }

    pub fn get_mut(&mut self, ticket: Ticket) -> Option<&mut SearchRecord<N>> {
        self.records.get_mut(ticket.index())
    }

    #[inline]
    pub(crate) fn at(&self, idx: u32) -> &SearchRecord<N> {
        &self.records[idx as usize]
    }

    #[inline]
    pub(crate) fn at_mut(&mut self, idx: u32) -> &mut SearchRecord<N> {
        &mut self.records[idx as usize]
    }

    /// Unlink `idx` from its current list and append it to `stage`.
    pub fn move_to(&mut self, idx: u32, stage: Stage) {
        self.unlink(idx);
        self.push_back(idx, stage);
    }

    /// Indices of the records in `stage`, in list order.
    pub fn indices(&self, stage: Stage) -> StageIter<'_, N> {
        StageIter { pool: self, cursor: self.front(stage) }
    }

    /// Records in `stage`, in list order.
    pub fn iter(&self, stage: Stage) -> impl Iterator<Item = &SearchRecord<N>> + '_ {
        self.indices(stage).map(move |i| self.at(i))
    }

    /// Every record, in ticket order.
    pub fn all(&self) -> impl Iterator<Item = &SearchRecord<N>> + '_ {
        self.records.iter()
    }

    fn push_back(&mut self, idx: u32, stage: Stage) {
        let list = &mut self.lists[stage.slot()];
        let old_tail = list.tail;
        list.tail = Some(idx);
        if list.head.is_none() {
            list.head = Some(idx);
        }
        list.len += 1;

        if let Some(t) = old_tail {
            self.records[t as usize].next = Some(idx);
        }
        let rec = &mut self.records[idx as usize];
        rec.prev = old_tail;
        rec.next = None;
        rec.stage = stage;
    }

    fn unlink(&mut self, idx: u32) {
        let (prev, next, stage) = {
            let rec = &self.records[idx as usize];
            (rec.prev, rec.next, rec.stage)
        };
        match prev {
            Some(p) => self.records[p as usize].next = next,
            None => self.lists[stage.slot()].head = next,
        }
        match next {
            Some(n) => self.records[n as usize].prev = prev,
            None => self.lists[stage.slot()].tail = prev,
        }
        self.lists[stage.slot()].len -= 1;

        let rec = &mut self.records[idx as usize];
        rec.prev = None;
        rec.next = None;
    }
}

/// Walks one stage list front to back.
pub struct StageIter<'a, N> {
    pool:   &'a RecordPool<N>,
    cursor: Option<u32>,
}

impl<N> Iterator for StageIter<'_, N> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let idx = self.cursor?;
        self.cursor = self.pool.records[idx as usize].next;
        Some(idx)
    }
}
