//! Shuffle cycle for queue randomization
//!
//! A cycle is one randomized pass over the playlist: every index is visited
//! exactly once before any index repeats. Wrapping under Repeat All draws a
//! fresh cycle.

use rand::seq::SliceRandom;
use rand::thread_rng;

/// One randomized pass over playlist indices
///
/// The anchored start index is always the first stop of the cycle, so
/// turning shuffle on never re-plays the current track.
#[derive(Debug, Clone)]
pub(crate) struct ShuffleCycle {
    /// Visit order of playlist indices
    order: Vec<usize>,

    /// Position of the current track within `order`
    pos: usize,
}

impl ShuffleCycle {
    /// Create a cycle over `len` indices, anchored at `start`
    pub fn new(len: usize, start: usize) -> Self {
        debug_assert!(start < len);

        let mut rest: Vec<usize> = (0..len).filter(|&i| i != start).collect();
        rest.shuffle(&mut thread_rng());

        let mut order = Vec::with_capacity(len);
        order.push(start);
        order.extend(rest);

        Self { order, pos: 0 }
    }

    /// Playlist index of the current track
    pub fn current(&self) -> usize {
        self.order[self.pos]
    }

    /// Advance to the next unvisited index, if the cycle has one left
    pub fn advance(&mut self) -> Option<usize> {
        if self.pos + 1 < self.order.len() {
            self.pos += 1;
            Some(self.order[self.pos])
        } else {
            None
        }
    }

    /// Step back within the cycle, if not at its first stop
    pub fn rewind(&mut self) -> Option<usize> {
        if self.pos > 0 {
            self.pos -= 1;
            Some(self.order[self.pos])
        } else {
            None
        }
    }

    /// Start a fresh cycle (Repeat All wrapped past the end)
    ///
    /// Avoids an immediate back-to-back repeat of the track just played.
    pub fn wrap_forward(&mut self) -> usize {
        let last = self.order[self.pos];
        self.order.shuffle(&mut thread_rng());

        if self.order.len() > 1 && self.order[0] == last {
            let len = self.order.len();
            self.order.swap(0, len - 1);
        }

        self.pos = 0;
        self.order[self.pos]
    }

    /// Jump to the cycle's final stop (Repeat All wrapped before the start)
    pub fn wrap_back(&mut self) -> usize {
        self.pos = self.order.len() - 1;
        self.order[self.pos]
    }

    /// Register a playlist index appended at the end of the playlist
    ///
    /// The new index lands at a random unvisited slot so the current cycle's
    /// once-per-cycle guarantee still holds.
    pub fn insert_appended(&mut self, index: usize) {
        let slot = rand::Rng::gen_range(&mut thread_rng(), self.pos + 1..=self.order.len());
        self.order.insert(slot, index);
    }

    /// Remove a playlist index, shifting the ones above it down
    pub fn remove_index(&mut self, index: usize) {
        if let Some(p) = self.order.iter().position(|&i| i == index) {
            self.order.remove(p);
            if p <= self.pos && self.pos > 0 {
                self.pos -= 1;
            }
        }

        for i in &mut self.order {
            if *i > index {
                *i -= 1;
            }
        }
    }

    /// Number of indices in the cycle
    pub fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn cycle_starts_at_anchor() {
        for start in 0..5 {
            let cycle = ShuffleCycle::new(5, start);
            assert_eq!(cycle.current(), start);
        }
    }

    #[test]
    fn cycle_visits_every_index_once() {
        let mut cycle = ShuffleCycle::new(8, 3);
        let mut seen = HashSet::new();
        seen.insert(cycle.current());

        while let Some(i) = cycle.advance() {
            assert!(seen.insert(i), "index {i} repeated within a cycle");
        }

        assert_eq!(seen.len(), 8);
        assert_eq!(seen, (0..8).collect());
    }

    #[test]
    fn advance_stops_at_cycle_end() {
        let mut cycle = ShuffleCycle::new(3, 0);
        assert!(cycle.advance().is_some());
        assert!(cycle.advance().is_some());
        assert!(cycle.advance().is_none());
        assert!(cycle.advance().is_none());
    }

    #[test]
    fn rewind_stops_at_cycle_start() {
        let mut cycle = ShuffleCycle::new(3, 1);
        assert!(cycle.rewind().is_none());

        cycle.advance();
        assert!(cycle.rewind().is_some());
        assert_eq!(cycle.current(), 1);
    }

    #[test]
    fn wrap_forward_avoids_immediate_repeat() {
        for _ in 0..50 {
            let mut cycle = ShuffleCycle::new(4, 0);
            while cycle.advance().is_some() {}
            let last = cycle.current();

            let first_of_new = cycle.wrap_forward();
            assert_ne!(first_of_new, last);
        }
    }

    #[test]
    fn wrap_forward_single_track() {
        let mut cycle = ShuffleCycle::new(1, 0);
        assert_eq!(cycle.wrap_forward(), 0);
    }

    #[test]
    fn insert_appended_lands_unvisited() {
        for _ in 0..50 {
            let mut cycle = ShuffleCycle::new(3, 0);
            cycle.advance();

            cycle.insert_appended(3);
            assert_eq!(cycle.len(), 4);

            // The new index must still be reachable in this cycle
            let mut remaining = Vec::new();
            while let Some(i) = cycle.advance() {
                remaining.push(i);
            }
            assert!(remaining.contains(&3));
        }
    }

    #[test]
    fn remove_index_shifts_higher_indices() {
        let mut cycle = ShuffleCycle::new(4, 2);
        cycle.remove_index(1);

        assert_eq!(cycle.len(), 3);
        // Former indices 2 and 3 are now 1 and 2; all must stay in range
        let mut seen = HashSet::new();
        seen.insert(cycle.current());
        while let Some(i) = cycle.advance() {
            seen.insert(i);
        }
        assert_eq!(seen, (0..3).collect());
    }

    #[test]
    fn remove_current_keeps_position_valid() {
        let mut cycle = ShuffleCycle::new(3, 0);
        cycle.advance();
        let current = cycle.current();

        cycle.remove_index(current);
        assert_eq!(cycle.len(), 2);
        assert!(cycle.current() < 2);
    }
}
