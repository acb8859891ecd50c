//! Stepvault core - bounded conversational memory for agent loops
//!
//! This crate provides:
//! - An ordered, positionally addressed step log with summary
//!   replacement and removal
//! - A derived context-size metric over the rendered log
//! - A session-scoped persistent key-value store mirrored into log
//!   index 0 on every write
//! - A filesystem snapshot sink for offline context inspection
//!
//! The agent loop, model client, and UI are external collaborators:
//! they append steps and invoke the operations here, but none of them
//! are modeled in this crate.

pub mod error;
pub mod log;
pub mod message;
pub mod session;
pub mod snapshot;
pub mod step;
pub mod store;

// Re-export commonly used types
pub use error::{MemoryError, Result};
pub use log::StepLog;
pub use message::{Message, Role};
pub use session::{SessionHandle, SessionMemory};
pub use snapshot::SnapshotSink;
pub use step::{STEP_SUMMARY_PREFIX, Step};
pub use store::{PERSISTENT_MEMORY_HEADER, PersistentStore};
