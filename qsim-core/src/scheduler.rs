//! Event clock: ordered timeline of pending events
//!
//! The scheduler keeps the current simulation time and a priority queue of
//! upcoming events. Time advances by jumping to the next event; there is no
//! real-time sleeping anywhere in the engine.
//!
//! Events at distinct timestamps are processed in timestamp order. Events at
//! equal timestamps are processed in the order they were scheduled (FIFO by
//! event id). This tie-break is part of the determinism contract: for a fixed
//! random seed, a replication always produces the same event interleaving.

use std::any::Any;
use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

use crate::types::EventId;
use crate::{Key, SimTime};

/// Entry type stored in the scheduler, including the event value, component
/// key, and the time when it is supposed to occur.
///
/// Besides being stored in the scheduler's internal priority queue, event
/// entries are passed to the [`crate::Components`] container, which unpacks
/// them and hands them to the correct component.
#[derive(Debug)]
pub struct EventEntry {
    event_id: EventId,
    time: SimTime,
    pub(crate) component: Uuid,
    inner: Box<dyn Any>,
}

impl EventEntry {
    pub(crate) fn new<E: fmt::Debug + 'static>(
        id: EventId,
        time: SimTime,
        component: Key<E>,
        event: E,
    ) -> Self {
        EventEntry {
            event_id: id,
            time,
            component: component.id(),
            inner: Box::new(event),
        }
    }

    /// The timestamp at which this event fires
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// The scheduling-order id of this event
    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Tries to downcast the event entry to one holding an event of type `E`.
    /// If it fails, returns `None`.
    #[must_use]
    pub(crate) fn downcast<E: fmt::Debug + 'static>(&self) -> Option<EventEntryTyped<'_, E>> {
        self.inner.downcast_ref::<E>().map(|event| EventEntryTyped {
            id: self.event_id,
            time: self.time,
            component_key: Key::new_with_id(self.component),
            event,
        })
    }
}

impl PartialEq for EventEntry {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.event_id == other.event_id
    }
}

impl Eq for EventEntry {}

impl PartialOrd for EventEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior in BinaryHeap: earliest time first,
        // then lowest event id (FIFO among equal timestamps).
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.event_id.cmp(&self.event_id))
    }
}

#[derive(Debug)]
pub struct EventEntryTyped<'e, E: fmt::Debug> {
    pub id: EventId,
    pub time: SimTime,
    pub component_key: Key<E>,
    pub event: &'e E,
}

type Clock = Rc<Cell<SimTime>>;

/// Immutable access to the simulation clock.
///
/// The clock itself is owned by the scheduler; components and statistics
/// collectors obtain a `ClockRef` to read the current simulation time.
pub struct ClockRef {
    clock: Clock,
}

impl From<Clock> for ClockRef {
    fn from(clock: Clock) -> Self {
        Self { clock }
    }
}

impl ClockRef {
    /// Return the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock.get()
    }
}

/// Scheduler keeps the current time and the queue of upcoming events.
///
/// A scheduler is exclusively owned by a single replication's
/// [`crate::Simulation`]; it is never shared across replications.
pub struct Scheduler {
    next_event_id: u64,
    events: BinaryHeap<EventEntry>,
    clock: Clock,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            next_event_id: 0,
            events: BinaryHeap::default(),
            clock: Rc::new(Cell::new(SimTime::default())),
        }
    }
}

impl Scheduler {
    /// Schedules `event` to be executed for `component` at `self.time() + delay`.
    pub fn schedule<E: fmt::Debug + 'static>(
        &mut self,
        delay: SimTime,
        component: Key<E>,
        event: E,
    ) {
        self.next_event_id += 1;
        let time = self.time() + delay;
        self.events.push(EventEntry::new(
            EventId(self.next_event_id),
            time,
            component,
            event,
        ));
    }

    /// Schedules `event` to be executed for `component` at the current time.
    ///
    /// The event fires after all events already scheduled for this instant,
    /// preserving causal order.
    pub fn schedule_now<E: fmt::Debug + 'static>(&mut self, component: Key<E>, event: E) {
        self.schedule(SimTime::zero(), component, event);
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock.get()
    }

    /// Returns a structure with immutable access to the simulation time.
    #[must_use]
    pub fn clock(&self) -> ClockRef {
        ClockRef {
            clock: Rc::clone(&self.clock),
        }
    }

    /// Returns a reference to the next scheduled event or `None` if none are left.
    pub fn peek(&self) -> Option<&EventEntry> {
        self.events.peek()
    }

    /// Removes and returns the next scheduled event, advancing the clock to
    /// its timestamp, or `None` if none are left.
    pub fn pop(&mut self) -> Option<EventEntry> {
        self.events.pop().inspect(|event| {
            self.clock.replace(event.time());
        })
    }

    /// Number of pending events.
    pub fn pending(&self) -> usize {
        self.events.len()
    }
}
