//! Core discrete event simulation engine.
//!
//! This crate provides the building blocks for discrete-event queueing
//! simulation: time management, deterministic event scheduling, component
//! dispatch, and seedable variate generation.
//!
//! # Architecture Overview
//!
//! The simulation is built around two main types:
//!
//! - [`Simulation`]: owns the event scheduler and the components. Use this
//!   to register components, schedule events, and run a replication.
//!
//! - [`Scheduler`]: the event clock. Logical time advances by jumping to the
//!   next scheduled event; events at equal timestamps fire in scheduling
//!   order so that a fixed random seed reproduces identical runs.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use qsim_core::{Simulation, SimTime, Executor};
//!
//! let mut simulation = Simulation::default();
//! let key = simulation.add_component(my_component);
//! simulation.schedule(SimTime::from_secs(1), key, MyEvent::Tick);
//! simulation.execute(Executor::unbound());
//! ```
//!
//! # Time Model
//!
//! All timing uses [`SimTime`], which represents simulation time (not
//! wall-clock time). A replication may additionally be bounded by a horizon
//! via [`Executor::timed`], which stops the clock at the ceiling with
//! whatever state has accumulated.

pub mod dists;
pub mod error;
pub mod execute;
pub mod logging;
pub mod scheduler;
pub mod time;
pub mod types;

use std::any::Any;
use std::collections::HashMap;
use tracing::{debug, info, instrument, trace, warn};

pub use dists::{Distribution, Sampler};
pub use error::SimError;
pub use execute::{Execute, Executor};
pub use logging::{init_simulation_logging, init_simulation_logging_with_level, replication_span};
pub use scheduler::{ClockRef, EventEntry, Scheduler};
pub use time::SimTime;
pub use types::{EntityId, EventId};

use uuid::Uuid;

/// Typed handle addressing a registered component.
#[derive(Debug)]
pub struct Key<T> {
    id: Uuid,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Key<T> {
    pub fn new_with_id(id: Uuid) -> Self {
        Self {
            id,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get the UUID of this key
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Key<T> {}

pub trait ProcessEventEntry: Any {
    fn process_event_entry(&mut self, entry: EventEntry, scheduler: &mut Scheduler);
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A simulation component: receives its own typed events from the scheduler
/// and may schedule further events in response.
pub trait Component: ProcessEventEntry {
    type Event: 'static;

    fn process_event(
        &mut self,
        self_id: Key<Self::Event>,
        event: &Self::Event,
        scheduler: &mut Scheduler,
    );
}

impl<E, C> ProcessEventEntry for C
where
    E: std::fmt::Debug + 'static,
    C: Component<Event = E> + 'static,
{
    fn process_event_entry(&mut self, entry: EventEntry, scheduler: &mut Scheduler) {
        let typed_entry = entry
            .downcast::<E>()
            .expect("Failed to downcast event entry.");
        self.process_event(typed_entry.component_key, typed_entry.event, scheduler);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Container holding type-erased components.
#[derive(Default)]
pub struct Components {
    components: HashMap<Uuid, Box<dyn ProcessEventEntry>>,
}

impl Components {
    /// Process the event on the component given by the event entry.
    pub fn process_event_entry(&mut self, entry: EventEntry, scheduler: &mut Scheduler) {
        if let Some(component) = self.components.get_mut(&entry.component) {
            component.process_event_entry(entry, scheduler);
        }
    }

    /// Registers a new component and returns its key.
    #[must_use]
    pub fn register<E: std::fmt::Debug + 'static, C: Component<Event = E> + 'static>(
        &mut self,
        component: C,
    ) -> Key<E> {
        let id = Uuid::now_v7();
        self.components.insert(id, Box::new(component));
        Key::new_with_id(id)
    }

    pub fn remove<E: 'static, C: Component<Event = E> + 'static>(
        &mut self,
        key: Key<E>,
    ) -> Option<C> {
        self.components.remove(&key.id).and_then(|boxed_trait| {
            let boxed_any: Box<dyn std::any::Any> = boxed_trait;
            boxed_any.downcast::<C>().ok().map(|boxed_c| *boxed_c)
        })
    }

    /// Get mutable access to a component
    pub fn get_component_mut<E: 'static, C: Component<Event = E> + 'static>(
        &mut self,
        key: Key<E>,
    ) -> Option<&mut C> {
        self.components.get_mut(&key.id).and_then(|boxed_trait| {
            let any_ref = boxed_trait.as_any_mut();
            any_ref.downcast_mut::<C>()
        })
    }
}

/// Simulation struct that puts the scheduler and components together.
///
/// A `Simulation` is the unit of one replication: it owns its own event
/// clock and component state, and shares nothing with other replications.
/// Monte-Carlo batches therefore build a fresh `Simulation` per run.
#[derive(Default)]
pub struct Simulation {
    scheduler: Scheduler,
    /// Component container.
    pub components: Components,
}

impl Simulation {
    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.scheduler.time()
    }

    /// Performs one step of the simulation. Returns `true` if there was in
    /// fact an event available to process, and `false` otherwise, which
    /// signifies that the simulation ended.
    pub fn step(&mut self) -> bool {
        let event = self.scheduler.pop();
        event.is_some_and(|event| {
            trace!(
                event_time = %event.time(),
                event_id = %event.event_id(),
                "Processing simulation step"
            );
            self.components.process_event_entry(event, &mut self.scheduler);
            true
        })
    }

    /// Runs the entire simulation.
    ///
    /// The stopping condition depends on the executor used; see [`Execute`]
    /// and [`Executor`] for details.
    #[instrument(skip(self, executor), fields(initial_time = %self.time()))]
    pub fn execute<E: Execute>(&mut self, executor: E) {
        info!("Starting simulation execution");
        executor.execute(self);
        info!(final_time = %self.time(), "Simulation execution completed");
    }

    /// Adds a new component.
    #[must_use]
    #[instrument(skip(self, component), fields(component_type = std::any::type_name::<C>()))]
    pub fn add_component<E: std::fmt::Debug + 'static, C: Component<Event = E> + 'static>(
        &mut self,
        component: C,
    ) -> Key<E> {
        let key = self.components.register(component);
        debug!(component_id = ?key.id(), "Added component to simulation");
        key
    }

    /// Remove a component: usually at the end of a replication to collect
    /// its accumulated statistics.
    #[must_use]
    #[instrument(skip(self), fields(component_id = ?key.id()))]
    pub fn remove_component<E: std::fmt::Debug + 'static, C: Component<Event = E> + 'static>(
        &mut self,
        key: Key<E>,
    ) -> Option<C> {
        let result = self.components.remove(key);
        if result.is_some() {
            debug!("Removed component from simulation");
        } else {
            warn!("Attempted to remove non-existent component");
        }
        result
    }

    /// Get mutable access to a component
    pub fn get_component_mut<E: std::fmt::Debug + 'static, C: Component<Event = E> + 'static>(
        &mut self,
        key: Key<E>,
    ) -> Option<&mut C> {
        self.components.get_component_mut(key)
    }

    /// Schedules a new event to be executed at `self.time() + delay` in
    /// component `component`.
    pub fn schedule<E: std::fmt::Debug + 'static>(
        &mut self,
        delay: SimTime,
        component: Key<E>,
        event: E,
    ) {
        self.scheduler.schedule(delay, component, event);
    }

    /// Returns the time of the next scheduled event, or None if no events
    /// are scheduled.
    pub fn peek_next_event_time(&self) -> Option<SimTime> {
        self.scheduler.peek().map(|e| e.time())
    }

    /// Returns a ClockRef for reading the simulation time.
    pub fn clock(&self) -> ClockRef {
        self.scheduler.clock()
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        self.scheduler.peek().is_some()
    }

    pub(crate) fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}
