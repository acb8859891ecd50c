//! Tools over the session's persistent key-value store and snapshot sink.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use stepvault_core::{SessionHandle, SnapshotSink};

use crate::error::Result;
use crate::traits::{Tool, ToolOutput};

/// Tool that stores a value under a key and mirrors the full store
/// into log index 0.
pub struct PersistMemoryTool {
    handle: SessionHandle,
}

impl PersistMemoryTool {
    pub fn new(handle: SessionHandle) -> Self {
        Self { handle }
    }
}

#[derive(Debug, Deserialize)]
struct PersistMemoryInput {
    key: String,
    value: Value,
}

#[async_trait]
impl Tool for PersistMemoryTool {
    fn name(&self) -> &str {
        "persist_in_memory"
    }

    fn description(&self) -> &str {
        "Store a value under a key so it survives summarization and removal. \
         The full store is mirrored into step 0 of the log, replacing that \
         step's content. Requires at least one step in the log."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "key": {
                    "type": "string",
                    "description": "The key to store the value under"
                },
                "value": {
                    "description": "The value to store; any JSON value"
                }
            },
            "required": ["key", "value"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput> {
        let params: PersistMemoryInput = match serde_json::from_value(input) {
            Ok(p) => p,
            Err(e) => return Ok(ToolOutput::error(format!("Invalid input: {}", e))),
        };

        let PersistMemoryInput { key, value } = params;
        let result = self
            .handle
            .with_mut(|session| session.persist(key.clone(), value));
        match result {
            Ok(()) => Ok(ToolOutput::success(json!({
                "key": key,
                "stored": true,
            }))),
            Err(e) => Ok(ToolOutput::error(e.to_string())),
        }
    }
}

/// Tool that retrieves a stored value by key.
pub struct RecallMemoryTool {
    handle: SessionHandle,
}

impl RecallMemoryTool {
    pub fn new(handle: SessionHandle) -> Self {
        Self { handle }
    }
}

#[derive(Debug, Deserialize)]
struct RecallMemoryInput {
    key: String,
}

#[async_trait]
impl Tool for RecallMemoryTool {
    fn name(&self) -> &str {
        "get_from_persistent_memory"
    }

    fn description(&self) -> &str {
        "Retrieve a value previously stored with persist_in_memory. \
         A missing key is reported as found: false, not as an error."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "key": {
                    "type": "string",
                    "description": "The key to retrieve the value for"
                }
            },
            "required": ["key"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput> {
        let params: RecallMemoryInput = match serde_json::from_value(input) {
            Ok(p) => p,
            Err(e) => return Ok(ToolOutput::error(format!("Invalid input: {}", e))),
        };

        match self.handle.with(|session| Ok(session.recall(&params.key))) {
            Ok(Some(value)) => Ok(ToolOutput::success(json!({
                "found": true,
                "key": params.key,
                "value": value,
            }))),
            Ok(None) => Ok(ToolOutput::success(json!({
                "found": false,
                "key": params.key,
            }))),
            Err(e) => Ok(ToolOutput::error(e.to_string())),
        }
    }
}

/// Tool that logs the store contents and snapshots the full rendered
/// log to the configured sink file.
pub struct LogMemoryTool {
    handle: SessionHandle,
    sink: SnapshotSink,
}

impl LogMemoryTool {
    pub fn new(handle: SessionHandle, sink: SnapshotSink) -> Self {
        Self { handle, sink }
    }
}

#[async_trait]
impl Tool for LogMemoryTool {
    fn name(&self) -> &str {
        "log_global_memory"
    }

    fn description(&self) -> &str {
        "Log the persistent store contents and write the full rendered \
         conversation log to the snapshot file, replacing its previous contents."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value) -> Result<ToolOutput> {
        let result = self.handle.with(|session| {
            info!(store = %session.store().render(), "persistent store contents");
            self.sink.capture(session)?;
            Ok(json!({
                "snapshot_path": self.sink.path().display().to_string(),
                "entries": session.store().len(),
            }))
        });

        match result {
            Ok(payload) => Ok(ToolOutput::success(payload)),
            Err(e) => Ok(ToolOutput::error(e.to_string())),
        }
    }
}
