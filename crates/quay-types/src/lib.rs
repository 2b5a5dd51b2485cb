//! Foundation types for the quay console.
//!
//! This crate contains the pieces shared by every other quay crate: the
//! status-coded `Outcome` used instead of panics for fallible lookups, the
//! startup error type, console configuration, the message sink consumed by
//! the dispatcher, and the key events delivered by an input session.

pub mod config;
pub mod error;
pub mod input;
pub mod sink;
pub mod status;

pub use config::ConsoleConfig;
pub use error::QuayError;
pub use input::Key;
pub use sink::{Message, MessageLevel, MessageLog, MessageSink};
pub use status::{Failure, Outcome, ResultStatus, status_of, succeed};
