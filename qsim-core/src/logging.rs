//! Structured logging for simulation debugging
//!
//! Logging is built on `tracing`. Levels follow the engine's conventions:
//!
//! - TRACE: per-event processing and queue state changes (very verbose)
//! - DEBUG: entity lifecycle transitions and scheduling decisions
//! - INFO: replication and batch progress
//! - WARN/ERROR: unusual conditions that may affect correctness
//!
//! Output can be controlled with `RUST_LOG`, e.g.
//! `RUST_LOG=qsim_components=debug cargo run --example queue_server`.

use tracing::{info, Span};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for the simulation with sensible defaults
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

/// Initialize logging with a specific level
///
/// # Arguments
/// * `level` - Log level: "trace", "debug", "info", "warn", or "error"
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("qsim_core={level},qsim_components={level},qsim_stats={level}").into()
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    info!("Simulation logging initialized at level: {}", level);
}

/// Create a span covering one Monte-Carlo replication
pub fn replication_span(run: usize, seed: u64) -> Span {
    tracing::info_span!("replication", run = run, seed = seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_creation() {
        let span = replication_span(3, 42);
        let _guard = span.enter();
    }
}
