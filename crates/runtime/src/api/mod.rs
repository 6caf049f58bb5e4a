//! Public runtime API surface.
//!
//! This module gathers the port traits and error types exposed to consumers
//! so the resolver and adapters can stay focused on control flow.

pub mod errors;
pub mod ports;

pub use errors::{Result, RuntimeError};
pub use ports::{InputPort, ObservationPort};
