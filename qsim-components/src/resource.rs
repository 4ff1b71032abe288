//! Capacity-limited shared resource with a FIFO wait queue
//!
//! The resource owns all contention state explicitly: holder slots, the
//! waiting line, and idle-interval tracking. Nothing is captured from an
//! enclosing scope, so a resource instance belongs to exactly one
//! replication and parallel batches stay independent.
//!
//! Idle time is accounted as the time between consecutive busy intervals: a
//! transition from zero busy holders to one closes the open idle interval
//! and credits it to the statistics collector. Trailing idleness at the end
//! of a replication is never credited, matching the convention that idle
//! time ends with "the next arrival that engages the resource".

use crate::queue::{FifoQueue, Waiting};
use qsim_core::{EntityId, SimError, SimTime};
use qsim_stats::RunStats;
use tracing::trace;

/// A pool of `capacity` holder slots plus the FIFO line behind them.
#[derive(Debug)]
pub struct Resource {
    capacity: usize,
    busy: usize,
    queue: FifoQueue,
    /// Set while every holder slot is empty; the replication starts idle.
    idle_since: Option<SimTime>,
}

impl Resource {
    /// Create a resource with the given number of holder slots.
    ///
    /// # Errors
    ///
    /// `SimError::InvalidParameter` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, SimError> {
        if capacity == 0 {
            return Err(SimError::invalid_parameter(
                "resource capacity must be a positive integer",
            ));
        }
        Ok(Self {
            capacity,
            busy: 0,
            queue: FifoQueue::new(),
            idle_since: Some(SimTime::zero()),
        })
    }

    /// Append an arriving entity to the wait queue.
    ///
    /// The statistics collector observes the new queue length at the instant
    /// of the change, not retroactively.
    pub fn enqueue(&mut self, entity: EntityId, at: SimTime, stats: &mut RunStats) {
        self.queue.enqueue(Waiting::new(entity, at));
        trace!(%entity, time = %at, queue_len = self.queue.len(), "Entity joined wait queue");
        stats.observe_queue_length(self.queue.len());
    }

    /// Admit the queue head into a holder slot, if one is free.
    ///
    /// A 0-to-busy transition closes the open idle interval and credits it.
    /// Returns the admitted entity, or `None` when no slot is free or the
    /// line is empty.
    pub fn admit_next(&mut self, at: SimTime, stats: &mut RunStats) -> Option<Waiting> {
        if self.busy >= self.capacity {
            return None;
        }
        let admitted = self.queue.dequeue()?;
        stats.observe_queue_length(self.queue.len());

        if self.busy == 0 {
            if let Some(idle_since) = self.idle_since.take() {
                stats.add_idle(at - idle_since);
            }
        }
        self.busy += 1;
        assert!(
            self.busy <= self.capacity,
            "resource invariant violated: {} busy holders exceed capacity {}",
            self.busy,
            self.capacity
        );
        trace!(
            entity = %admitted.entity,
            time = %at,
            busy = self.busy,
            queue_len = self.queue.len(),
            "Entity admitted to holder slot"
        );
        Some(admitted)
    }

    /// Free one holder slot. A busy-to-zero transition opens a new idle
    /// interval at `at`.
    pub fn release(&mut self, at: SimTime) {
        assert!(
            self.busy > 0,
            "resource invariant violated: release with no busy holders"
        );
        self.busy -= 1;
        if self.busy == 0 {
            self.idle_since = Some(at);
        }
        trace!(time = %at, busy = self.busy, "Holder slot released");
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn busy(&self) -> usize {
        self.busy
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// True while every holder slot is empty.
    pub fn is_idle(&self) -> bool {
        self.busy == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_capacity_must_be_positive() {
        assert!(Resource::new(0).is_err());
        assert!(Resource::new(1).is_ok());
    }

    #[test]
    fn test_admission_respects_capacity() {
        let mut stats = RunStats::new();
        let mut resource = Resource::new(2).unwrap();
        let t = SimTime::zero();

        for id in 0..3 {
            resource.enqueue(EntityId(id), t, &mut stats);
        }
        assert!(resource.admit_next(t, &mut stats).is_some());
        assert!(resource.admit_next(t, &mut stats).is_some());
        // Both slots taken: the third entity stays queued
        assert!(resource.admit_next(t, &mut stats).is_none());
        assert_eq!(resource.busy(), 2);
        assert_eq!(resource.queue_len(), 1);
    }

    #[test]
    fn test_release_admits_head_in_fifo_order() {
        let mut stats = RunStats::new();
        let mut resource = Resource::new(1).unwrap();
        let t0 = SimTime::zero();

        resource.enqueue(EntityId(0), t0, &mut stats);
        resource.enqueue(EntityId(1), t0, &mut stats);
        resource.enqueue(EntityId(2), t0, &mut stats);

        assert_eq!(
            resource.admit_next(t0, &mut stats).unwrap().entity,
            EntityId(0)
        );
        resource.release(SimTime::from_secs(5));
        assert_eq!(
            resource
                .admit_next(SimTime::from_secs(5), &mut stats)
                .unwrap()
                .entity,
            EntityId(1)
        );
        resource.release(SimTime::from_secs(10));
        assert_eq!(
            resource
                .admit_next(SimTime::from_secs(10), &mut stats)
                .unwrap()
                .entity,
            EntityId(2)
        );
    }

    #[test]
    fn test_idle_interval_credited_on_engagement() {
        let mut stats = RunStats::new();
        let mut resource = Resource::new(1).unwrap();

        // Idle from t=0 until the first admission at t=3
        let t3 = SimTime::from_secs(3);
        resource.enqueue(EntityId(0), t3, &mut stats);
        resource.admit_next(t3, &mut stats);
        assert_eq!(stats.idle_time(), Duration::from_secs(3));

        // Busy until release at t=8, idle again until t=10
        resource.release(SimTime::from_secs(8));
        let t10 = SimTime::from_secs(10);
        resource.enqueue(EntityId(1), t10, &mut stats);
        resource.admit_next(t10, &mut stats);
        assert_eq!(stats.idle_time(), Duration::from_secs(5));
    }

    #[test]
    fn test_no_idle_credit_while_backlog_exists() {
        let mut stats = RunStats::new();
        let mut resource = Resource::new(1).unwrap();
        let t0 = SimTime::zero();

        resource.enqueue(EntityId(0), t0, &mut stats);
        resource.enqueue(EntityId(1), t0, &mut stats);
        resource.admit_next(t0, &mut stats);

        // The release immediately admits the backlog head; busy never
        // reaches zero long enough to open an idle interval.
        let t5 = SimTime::from_secs(5);
        resource.release(t5);
        resource.admit_next(t5, &mut stats);
        assert_eq!(stats.idle_time(), Duration::ZERO);
    }

    #[test]
    fn test_trailing_idle_not_credited() {
        let mut stats = RunStats::new();
        let mut resource = Resource::new(1).unwrap();
        let t0 = SimTime::zero();

        resource.enqueue(EntityId(0), t0, &mut stats);
        resource.admit_next(t0, &mut stats);
        resource.release(SimTime::from_secs(4));
        // No further arrival engages the resource
        assert_eq!(stats.idle_time(), Duration::ZERO);
    }

    #[test]
    #[should_panic(expected = "release with no busy holders")]
    fn test_release_without_holder_panics() {
        let mut resource = Resource::new(1).unwrap();
        resource.release(SimTime::zero());
    }
}
