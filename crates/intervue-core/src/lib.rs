//! Domain core of the Intervue mock-interview orchestrator.
//!
//! Holds the session record, the phase state machine, the question roster,
//! transcript windowing, the session store, and the contract the reasoning
//! collaborator has to fulfil. Nothing in this crate performs network I/O.

pub mod collaborator;
pub mod config;
pub mod error;
pub mod report;
pub mod schema;
pub mod session;

// Re-export common error type
pub use error::{IntervueError, Result};
