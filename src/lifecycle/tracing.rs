//! Observability setup.
//!
//! Structured logging via the `tracing` crate. Log level is controlled with
//! `RUST_LOG` (`info` for compact workflow lines, `debug` for full request
//! payloads at client entry points).

/// Initializes the subscriber for the whole process. Call once, from `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type fields identify the actor instead
        .compact()
        .init();
}
