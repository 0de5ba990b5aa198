//! Priority holding queue for aircraft waiting to land.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::{Aircraft, Category};

/// Wrapper ordering aircraft by category (A first) and FIFO within a category.
struct HeldAircraft {
    category: Category,
    sequence: u64,
    aircraft: Aircraft,
}

impl HeldAircraft {
    const fn key(&self) -> (Category, u64) {
        (self.category, self.sequence)
    }
}

impl PartialEq for HeldAircraft {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for HeldAircraft {}

impl PartialOrd for HeldAircraft {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeldAircraft {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, lowest (category, sequence) must pop first.
        other.key().cmp(&self.key())
    }
}

/// Priority queue of aircraft keyed by `(category, insertion sequence)`.
///
/// Pops the lowest category first; aircraft of equal category leave in the
/// order they were pushed into this queue. The sequence counter is per queue,
/// so an aircraft promoted from another queue waits behind same-category
/// aircraft already held here.
pub struct HoldingQueue {
    next_sequence: u64,
    held: BinaryHeap<HeldAircraft>,
}

impl HoldingQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty queue with preallocated room for `capacity` aircraft.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next_sequence: 0,
            held: BinaryHeap::with_capacity(capacity.min(1024)),
        }
    }

    /// Insert an aircraft behind any already held aircraft of the same category.
    pub fn push(&mut self, aircraft: Aircraft) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.held.push(HeldAircraft {
            category: aircraft.category(),
            sequence,
            aircraft,
        });
    }

    /// Remove the highest-priority aircraft.
    pub fn pop(&mut self) -> Option<Aircraft> {
        self.held.pop().map(|held| held.aircraft)
    }

    /// Category of the aircraft that would pop next.
    #[must_use]
    pub fn peek_category(&self) -> Option<Category> {
        self.held.peek().map(|held| held.category)
    }

    /// Number of held aircraft.
    #[must_use]
    pub fn len(&self) -> usize {
        self.held.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Held aircraft in the order they would pop.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Aircraft> {
        let mut held: Vec<&HeldAircraft> = self.held.iter().collect();
        held.sort_by_key(|h| h.key());
        held.into_iter().map(|h| h.aircraft.clone()).collect()
    }
}

impl Default for HoldingQueue {
    fn default() -> Self {
        Self::new()
    }
}
