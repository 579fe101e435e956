//! Min-heap of actions that fire at a future audio-clock time.

use alloc::collections::BinaryHeap;
use core::cmp::{Ordering, Reverse};

/// A transport transition armed for later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredAction {
    /// A queued row became audible: move the playhead down one row.
    AdvanceRow,
    /// The last queued row finished: stop the transport.
    EndOfPattern,
}

#[derive(Clone, Copy, Debug)]
struct Armed {
    fire_at: f64,
    /// Arm order, breaks ties between equal fire times.
    seq: u64,
    generation: u32,
    action: DeferredAction,
}

impl Ord for Armed {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fire_at
            .total_cmp(&other.fire_at)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Armed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Armed {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Armed {}

/// Deterministic deferred-action queue polled against the audio clock.
///
/// Actions pop in `(fire_at, arm order)` order. [`invalidate`](Self::invalidate)
/// bumps the generation; actions armed under an older generation are
/// discarded when they come due instead of firing.
#[derive(Clone, Debug, Default)]
pub struct DeferredQueue {
    heap: BinaryHeap<Reverse<Armed>>,
    next_seq: u64,
    generation: u32,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `action` to fire once the clock reaches `fire_at`.
    pub fn arm(&mut self, fire_at: f64, action: DeferredAction) {
        let armed = Armed {
            fire_at,
            seq: self.next_seq,
            generation: self.generation,
            action,
        };
        self.next_seq += 1;
        self.heap.push(Reverse(armed));
    }

    /// Pop the earliest live action due at or before `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<DeferredAction> {
        while let Some(Reverse(head)) = self.heap.peek() {
            if head.fire_at > now {
                return None;
            }
            let Some(Reverse(armed)) = self.heap.pop() else {
                return None;
            };
            if armed.generation == self.generation {
                return Some(armed.action);
            }
        }
        None
    }

    /// Cancel everything armed so far.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Number of live actions.
    pub fn pending(&self) -> usize {
        self.heap
            .iter()
            .filter(|Reverse(a)| a.generation == self.generation)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }
}
