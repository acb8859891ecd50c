//! Tool registry for managing available tools

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use stepvault_core::{SessionHandle, SnapshotSink};

use crate::context::{
    ContextSizeTool, GetStepTool, ListStepsTool, ModifyStepTool, RemoveStepTool,
};
use crate::error::{Result, ToolError};
use crate::persist::{LogMemoryTool, PersistMemoryTool, RecallMemoryTool};
use crate::traits::{Tool, ToolOutput, ToolSchema};

/// Registry for managing available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry with the full memory tool set bound to one
    /// session handle and snapshot sink.
    pub fn context_tools(handle: SessionHandle, sink: SnapshotSink) -> Self {
        let mut registry = Self::new();
        registry.register(ListStepsTool::new(handle.clone()));
        registry.register(GetStepTool::new(handle.clone()));
        registry.register(ModifyStepTool::new(handle.clone()));
        registry.register(RemoveStepTool::new(handle.clone()));
        registry.register(ContextSizeTool::new(handle.clone()));
        registry.register(PersistMemoryTool::new(handle.clone()));
        registry.register(RecallMemoryTool::new(handle.clone()));
        registry.register(LogMemoryTool::new(handle, sink));
        registry
    }

    /// Register a tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    /// Register a tool from Arc
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if tool exists
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all tool names
    pub fn list(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Get schemas for all registered tools
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, input: Value) -> Result<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.execute(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_registry() -> (ToolRegistry, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let sink = SnapshotSink::new(dir.path().join("snapshot.txt")).unwrap();
        let registry = ToolRegistry::context_tools(SessionHandle::new_session(), sink);
        (registry, dir)
    }

    #[test]
    fn context_tools_registers_the_full_set() {
        let (registry, _dir) = full_registry();
        for name in [
            "list_steps",
            "get_step",
            "modify_step",
            "remove_step",
            "get_context_size",
            "persist_in_memory",
            "get_from_persistent_memory",
            "log_global_memory",
        ] {
            assert!(registry.has(name), "missing tool: {name}");
        }
        assert_eq!(registry.schemas().len(), 8);
    }

    #[tokio::test]
    async fn execute_unknown_tool_fails() {
        let (registry, _dir) = full_registry();
        let err = registry.execute("unknown", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn execute_dispatches_by_name() {
        let (registry, _dir) = full_registry();
        let output = registry.execute("get_context_size", json!({})).await.unwrap();
        assert!(output.success);
        assert_eq!(output.result["context_size"], json!(0));
    }
}
