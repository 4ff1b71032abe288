//! Queueing model components
//!
//! This crate builds the facility model on top of the `qsim-core` engine: a
//! FIFO wait queue, a capacity-limited shared resource with idle-time
//! accounting, the entity lifecycle component, workload generation, and the
//! replication runner used by Monte-Carlo batches.

pub mod config;
pub mod facility;
pub mod queue;
pub mod resource;
pub mod runner;
pub mod workload;

pub use config::SimulationConfig;
pub use facility::{Facility, FacilityEvent};
pub use queue::{FifoQueue, Waiting};
pub use resource::Resource;
pub use runner::{run_batch, run_batch_parallel, run_replication};
pub use workload::ArrivalRecord;
