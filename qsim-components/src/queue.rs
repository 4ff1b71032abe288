//! FIFO wait queue for entities contending for the shared resource
//!
//! The waiting discipline is strictly first-come-first-served: no reneging,
//! no priorities, no preemption. An entity leaves the queue only when a
//! holder slot frees up and it is the queue head.

use qsim_core::{EntityId, SimTime};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A queued entity together with the instant it joined the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waiting {
    pub entity: EntityId,
    pub enqueued_at: SimTime,
}

impl Waiting {
    pub fn new(entity: EntityId, enqueued_at: SimTime) -> Self {
        Self {
            entity,
            enqueued_at,
        }
    }

    /// How long this entity has been in the queue.
    pub fn queue_time(&self, current_time: SimTime) -> std::time::Duration {
        current_time.duration_since(self.enqueued_at)
    }
}

/// First-In-First-Out wait queue.
///
/// The queue is unbounded; capacity limiting happens at the resource's
/// holder slots, not in the waiting line.
#[derive(Debug, Clone, Default)]
pub struct FifoQueue {
    items: VecDeque<Waiting>,
}

impl FifoQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity to the back of the line.
    pub fn enqueue(&mut self, item: Waiting) {
        self.items.push_back(item);
    }

    /// Remove and return the queue head, or `None` if the line is empty.
    pub fn dequeue(&mut self) -> Option<Waiting> {
        self.items.pop_front()
    }

    /// Peek at the queue head without removing it.
    pub fn peek(&self) -> Option<&Waiting> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
