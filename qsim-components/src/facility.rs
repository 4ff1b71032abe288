//! Entity lifecycle component
//!
//! The facility drives every entity through the three-stage lifecycle
//! arrival -> begin service -> end service against a shared
//! capacity-limited resource. Holder slots are reserved at the admission
//! instant, inside the event that frees or finds the slot, so two arrivals
//! at the same timestamp can never both observe a free slot.
//!
//! Waiting times are committed to the statistics collector when service
//! completes. An entity still waiting or still in service when a horizon
//! truncates the replication contributes no waiting-time observation.

use crate::resource::Resource;
use crate::workload::ArrivalRecord;
use qsim_core::{Component, EntityId, Key, Scheduler, SimError, SimTime};
use qsim_stats::RunStats;
use std::time::Duration;
use tracing::trace;

/// Lifecycle events of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilityEvent {
    /// The entity enters the system and joins the wait queue.
    Arrival(EntityId),
    /// The entity's reserved holder slot engages; its wait is over.
    BeginService(EntityId),
    /// Service completes; the slot frees and the queue head may be admitted.
    EndService(EntityId),
}

/// The queueing facility: one shared resource, one wait queue, and the
/// workload's arrival schedule.
///
/// Entity ids index into the workload, so a facility only accepts records
/// produced by the workload generators (ids dense from zero).
pub struct Facility {
    records: Vec<ArrivalRecord>,
    resource: Resource,
    /// Wait measured at admission, committed to stats at service end.
    pending_waits: Vec<Option<Duration>>,
    stats: RunStats,
}

impl Facility {
    /// Build a facility over the given workload and resource capacity.
    ///
    /// Every generated record is noted up front so that generated counts and
    /// drawn service totals cover entities a horizon later truncates.
    ///
    /// # Errors
    ///
    /// `SimError::InvalidParameter` when `capacity` is zero or the workload's
    /// entity ids are not dense from zero.
    pub fn new(records: Vec<ArrivalRecord>, capacity: usize) -> Result<Self, SimError> {
        let resource = Resource::new(capacity)?;
        if let Some((position, record)) = records
            .iter()
            .enumerate()
            .find(|(i, r)| r.entity.index() != *i)
        {
            return Err(SimError::invalid_parameter(format!(
                "workload entity ids must be dense from zero, found {} at position {position}",
                record.entity
            )));
        }
        let mut stats = RunStats::new();
        for record in &records {
            stats.note_generated(record.service);
        }
        let pending_waits = vec![None; records.len()];
        Ok(Self {
            records,
            resource,
            pending_waits,
            stats,
        })
    }

    fn on_arrival(&mut self, entity: EntityId, self_id: Key<FacilityEvent>, scheduler: &mut Scheduler) {
        let now = scheduler.time();
        self.resource.enqueue(entity, now, &mut self.stats);
        self.try_admit(self_id, scheduler);
    }

    fn on_begin_service(
        &mut self,
        entity: EntityId,
        self_id: Key<FacilityEvent>,
        scheduler: &mut Scheduler,
    ) {
        let service = self.records[entity.index()].service;
        trace!(%entity, service_secs = service.as_secs_f64(), "Service begins");
        scheduler.schedule(
            SimTime::zero() + service,
            self_id,
            FacilityEvent::EndService(entity),
        );
    }

    fn on_end_service(
        &mut self,
        entity: EntityId,
        self_id: Key<FacilityEvent>,
        scheduler: &mut Scheduler,
    ) {
        let now = scheduler.time();
        let wait = self.pending_waits[entity.index()]
            .take()
            .unwrap_or(Duration::ZERO);
        self.stats.record_wait(wait);
        trace!(%entity, time = %now, wait_secs = wait.as_secs_f64(), "Service complete");
        self.resource.release(now);
        self.try_admit(self_id, scheduler);
    }

    /// Admit the queue head if a slot is free, reserving the slot now and
    /// deferring the service start to a zero-delay event.
    fn try_admit(&mut self, self_id: Key<FacilityEvent>, scheduler: &mut Scheduler) {
        let now = scheduler.time();
        if let Some(admitted) = self.resource.admit_next(now, &mut self.stats) {
            self.pending_waits[admitted.entity.index()] = Some(admitted.queue_time(now));
            scheduler.schedule_now(self_id, FacilityEvent::BeginService(admitted.entity));
        }
    }

    /// Reduce the facility to its statistics collector after a replication.
    pub fn into_stats(self) -> RunStats {
        self.stats
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }
}

impl Component for Facility {
    type Event = FacilityEvent;

    fn process_event(
        &mut self,
        self_id: Key<Self::Event>,
        event: &Self::Event,
        scheduler: &mut Scheduler,
    ) {
        match *event {
            FacilityEvent::Arrival(entity) => self.on_arrival(entity, self_id, scheduler),
            FacilityEvent::BeginService(entity) => {
                self.on_begin_service(entity, self_id, scheduler)
            }
            FacilityEvent::EndService(entity) => self.on_end_service(entity, self_id, scheduler),
        }
    }
}
