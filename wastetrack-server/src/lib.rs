//! HTTP surface of the waste collection tracker.
//!
//! [`routes::create_app`] wires the scanner page, the `/collect` transition
//! endpoint and health checks onto an [`AppState`] that owns the collection
//! log repository. Startup work (the daily seed) runs through
//! [`infra::startup::StartupHooks`] before the listener is bound. [`qr`]
//! renders the printable household codes the scanner reads.

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod qr;
pub mod routes;

pub use infra::app_state::AppState;
pub use routes::create_app;
