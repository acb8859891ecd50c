//! Stepvault tools - agent-facing surface over the memory manager
//!
//! Eight named tools an orchestrating agent loop can call:
//! `list_steps`, `get_step`, `modify_step`, `remove_step`,
//! `get_context_size`, `persist_in_memory`, `get_from_persistent_memory`,
//! and `log_global_memory`. Each tool captures a [`SessionHandle`] at
//! construction; no process-wide globals. Domain failures come back as
//! `ToolOutput::error` payloads so the loop can report them into the
//! conversation and self-correct.

pub mod context;
pub mod error;
pub mod persist;
pub mod registry;
pub mod traits;

// Re-export commonly used types
pub use context::{ContextSizeTool, GetStepTool, ListStepsTool, ModifyStepTool, RemoveStepTool};
pub use error::{Result, ToolError};
pub use persist::{LogMemoryTool, PersistMemoryTool, RecallMemoryTool};
pub use registry::ToolRegistry;
pub use traits::{Tool, ToolOutput, ToolSchema};

pub use stepvault_core::{SessionHandle, SessionMemory, SnapshotSink};
