//! Endpoint coincidences found while intersecting two edges.
//!
//! At most two associations are recorded per intersection call (two curves
//! share at most two extremities). The first recorded association fills
//! slot 0, any later one slot 1.

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Slot {
    start1: bool,
    end1: bool,
    start2: bool,
    end2: bool,
}

impl Slot {
    #[inline]
    fn is_used(&self) -> bool {
        self.start1 || self.end1 || self.start2 || self.end2
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergePoints {
    slots: [Slot; 2],
}

impl MergePoints {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn next_slot(&mut self) -> &mut Slot {
        let rank = if self.number_of_associations() == 0 { 0 } else { 1 };
        &mut self.slots[rank]
    }

    pub fn start1_replaced(&mut self) {
        self.next_slot().start1 = true;
    }

    pub fn end1_replaced(&mut self) {
        self.next_slot().end1 = true;
    }

    pub fn start1_on_start2(&mut self) {
        let s = self.next_slot();
        s.start1 = true;
        s.start2 = true;
    }

    pub fn start1_on_end2(&mut self) {
        let s = self.next_slot();
        s.start1 = true;
        s.end2 = true;
    }

    pub fn end1_on_start2(&mut self) {
        let s = self.next_slot();
        s.end1 = true;
        s.start2 = true;
    }

    pub fn end1_on_end2(&mut self) {
        let s = self.next_slot();
        s.end1 = true;
        s.end2 = true;
    }

    #[inline]
    pub fn is_start1(&self, rank: usize) -> bool {
        self.slots[rank.min(1)].start1
    }
    #[inline]
    pub fn is_end1(&self, rank: usize) -> bool {
        self.slots[rank.min(1)].end1
    }
    #[inline]
    pub fn is_start2(&self, rank: usize) -> bool {
        self.slots[rank.min(1)].start2
    }
    #[inline]
    pub fn is_end2(&self, rank: usize) -> bool {
        self.slots[rank.min(1)].end2
    }

    pub fn clear(&mut self) {
        self.slots = [Slot::default(); 2];
    }

    pub fn number_of_associations(&self) -> usize {
        self.slots.iter().filter(|s| s.is_used()).count()
    }

    /// Records `e2 node -> e1 node` for every coincidence, keyed by caller
    /// node numbering. `None` ids are skipped.
    pub fn update_merged_nodes(
        &self,
        e1_start: Option<usize>,
        e1_end: Option<usize>,
        e2_start: Option<usize>,
        e2_end: Option<usize>,
        merged: &mut BTreeMap<usize, usize>,
    ) {
        let mut push = |key: Option<usize>, value: Option<usize>| {
            if let (Some(k), Some(v)) = (key, value) {
                merged.insert(k, v);
            }
        };
        for s in self.slots.iter().filter(|s| s.is_used()) {
            if s.start1 && s.start2 {
                push(e2_start, e1_start);
            }
            if s.start1 && s.end2 {
                push(e2_end, e1_start);
            }
            if s.end1 && s.start2 {
                push(e2_start, e1_end);
            }
            if s.end1 && s.end2 {
                push(e2_end, e1_end);
            }
        }
    }
}
