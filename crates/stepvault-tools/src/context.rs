//! Tools for inspecting and shrinking the conversational step log.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use stepvault_core::SessionHandle;

use crate::error::Result;
use crate::traits::{Tool, ToolOutput};

/// Convert a raw tool-call index into a log position. Negative values
/// are rejected here so the core only ever sees real positions.
fn parse_index(raw: i64) -> std::result::Result<usize, String> {
    usize::try_from(raw).map_err(|_| format!("step index {raw} out of range"))
}

/// Tool that lists every step's position and metadata.
pub struct ListStepsTool {
    handle: SessionHandle,
}

impl ListStepsTool {
    pub fn new(handle: SessionHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl Tool for ListStepsTool {
    fn name(&self) -> &str {
        "list_steps"
    }

    fn description(&self) -> &str {
        "List every step in the conversation log as position -> metadata. \
         Positions are not stable: removing a step shifts later positions down, \
         so re-list before addressing a step after any removal."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value) -> Result<ToolOutput> {
        match self.handle.with(|session| Ok(session.list_steps())) {
            Ok(listing) => {
                let steps: serde_json::Map<String, Value> = listing
                    .into_iter()
                    .map(|(idx, meta)| (idx.to_string(), meta.unwrap_or(Value::Null)))
                    .collect();
                Ok(ToolOutput::success(json!({
                    "count": steps.len(),
                    "steps": steps,
                })))
            }
            Err(e) => Ok(ToolOutput::error(e.to_string())),
        }
    }
}

/// Tool that returns one step's rendered form and metadata.
pub struct GetStepTool {
    handle: SessionHandle,
}

impl GetStepTool {
    pub fn new(handle: SessionHandle) -> Self {
        Self { handle }
    }
}

#[derive(Debug, Deserialize)]
struct GetStepInput {
    index: i64,
}

#[async_trait]
impl Tool for GetStepTool {
    fn name(&self) -> &str {
        "get_step"
    }

    fn description(&self) -> &str {
        "Return the string form of the step at a position, plus its metadata if any."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "index": {
                    "type": "integer",
                    "description": "Position of the step to read (0-based)"
                }
            },
            "required": ["index"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput> {
        let params: GetStepInput = match serde_json::from_value(input) {
            Ok(p) => p,
            Err(e) => return Ok(ToolOutput::error(format!("Invalid input: {}", e))),
        };
        let index = match parse_index(params.index) {
            Ok(idx) => idx,
            Err(msg) => return Ok(ToolOutput::error(msg)),
        };

        match self.handle.with(|session| session.get_step(index)) {
            Ok((step, metadata)) => Ok(ToolOutput::success(json!({
                "index": index,
                "step": step,
                "metadata": metadata,
            }))),
            Err(e) => Ok(ToolOutput::error(e.to_string())),
        }
    }
}

/// Tool that replaces a step with a summarized version.
pub struct ModifyStepTool {
    handle: SessionHandle,
}

impl ModifyStepTool {
    pub fn new(handle: SessionHandle) -> Self {
        Self { handle }
    }
}

#[derive(Debug, Deserialize)]
struct ModifyStepInput {
    index: i64,
    summary: String,
}

#[async_trait]
impl Tool for ModifyStepTool {
    fn name(&self) -> &str {
        "modify_step"
    }

    fn description(&self) -> &str {
        "Replace the step at a position with a summary to reduce context size. \
         The original step content is discarded and cannot be recovered."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "index": {
                    "type": "integer",
                    "description": "Position of the step to replace (0-based)"
                },
                "summary": {
                    "type": "string",
                    "description": "Condensed text that stands in for the original step"
                }
            },
            "required": ["index", "summary"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput> {
        let params: ModifyStepInput = match serde_json::from_value(input) {
            Ok(p) => p,
            Err(e) => return Ok(ToolOutput::error(format!("Invalid input: {}", e))),
        };
        let index = match parse_index(params.index) {
            Ok(idx) => idx,
            Err(msg) => return Ok(ToolOutput::error(msg)),
        };

        match self
            .handle
            .with_mut(|session| session.modify_step(index, params.summary))
        {
            Ok(()) => {
                debug!(index, "step replaced with summary");
                Ok(ToolOutput::success(json!({
                    "index": index,
                    "message": "step replaced with summary",
                })))
            }
            Err(e) => Ok(ToolOutput::error(e.to_string())),
        }
    }
}

/// Tool that deletes a step from the log.
pub struct RemoveStepTool {
    handle: SessionHandle,
}

impl RemoveStepTool {
    pub fn new(handle: SessionHandle) -> Self {
        Self { handle }
    }
}

#[derive(Debug, Deserialize)]
struct RemoveStepInput {
    index: i64,
}

#[async_trait]
impl Tool for RemoveStepTool {
    fn name(&self) -> &str {
        "remove_step"
    }

    fn description(&self) -> &str {
        "Delete the step at a position to reduce context size. \
         Every later step shifts down one position."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "index": {
                    "type": "integer",
                    "description": "Position of the step to delete (0-based)"
                }
            },
            "required": ["index"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput> {
        let params: RemoveStepInput = match serde_json::from_value(input) {
            Ok(p) => p,
            Err(e) => return Ok(ToolOutput::error(format!("Invalid input: {}", e))),
        };
        let index = match parse_index(params.index) {
            Ok(idx) => idx,
            Err(msg) => return Ok(ToolOutput::error(msg)),
        };

        match self.handle.with_mut(|session| {
            session.remove_step(index)?;
            Ok(session.list_steps().len())
        }) {
            Ok(remaining) => {
                debug!(index, remaining, "step removed");
                Ok(ToolOutput::success(json!({
                    "index": index,
                    "remaining": remaining,
                })))
            }
            Err(e) => Ok(ToolOutput::error(e.to_string())),
        }
    }
}

/// Tool that reports the rendered size of the conversation log.
pub struct ContextSizeTool {
    handle: SessionHandle,
}

impl ContextSizeTool {
    pub fn new(handle: SessionHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl Tool for ContextSizeTool {
    fn name(&self) -> &str {
        "get_context_size"
    }

    fn description(&self) -> &str {
        "Report the character length of the rendered conversation log, \
         a proxy for context-budget pressure."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value) -> Result<ToolOutput> {
        match self.handle.with(|session| Ok(session.context_size())) {
            Ok(size) => Ok(ToolOutput::success(json!({ "context_size": size }))),
            Err(e) => Ok(ToolOutput::error(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stepvault_core::{Message, SessionHandle, Step};

    fn bound_handle(turns: &[&str]) -> SessionHandle {
        let handle = SessionHandle::new_session();
        handle
            .with_mut(|session| {
                for turn in turns {
                    session.append(Step::interaction(vec![Message::user(*turn)]));
                }
                Ok(())
            })
            .unwrap();
        handle
    }

    #[tokio::test]
    async fn list_steps_on_unbound_handle_reports_error() {
        let tool = ListStepsTool::new(SessionHandle::unbound());
        let output = tool.execute(json!({})).await.unwrap();
        assert!(!output.success);
        assert!(output.error.unwrap().contains("no session is bound"));
    }

    #[tokio::test]
    async fn get_step_rejects_negative_index() {
        let tool = GetStepTool::new(bound_handle(&["a"]));
        let output = tool.execute(json!({"index": -1})).await.unwrap();
        assert!(!output.success);
        assert!(output.error.unwrap().contains("out of range"));
    }

    #[tokio::test]
    async fn get_step_rejects_index_past_end() {
        let tool = GetStepTool::new(bound_handle(&["a"]));
        let output = tool.execute(json!({"index": 1})).await.unwrap();
        assert!(!output.success);
        assert!(output.error.unwrap().contains("out of range"));
    }

    #[tokio::test]
    async fn modify_then_get_contains_summary() {
        let handle = bound_handle(&["original long turn"]);
        let modify = ModifyStepTool::new(handle.clone());
        let get = GetStepTool::new(handle);

        let output = modify
            .execute(json!({"index": 0, "summary": "just a note"}))
            .await
            .unwrap();
        assert!(output.success);

        let output = get.execute(json!({"index": 0})).await.unwrap();
        assert!(output.success);
        let step = output.result["step"].as_str().unwrap();
        assert!(step.contains("just a note"));
        assert!(output.result["metadata"].is_null());
    }

    #[tokio::test]
    async fn remove_reindexes_following_steps() {
        let handle = bound_handle(&["a", "b", "c"]);
        let remove = RemoveStepTool::new(handle.clone());
        let list = ListStepsTool::new(handle);

        let output = remove.execute(json!({"index": 1})).await.unwrap();
        assert!(output.success);
        assert_eq!(output.result["remaining"], json!(2));

        let output = list.execute(json!({})).await.unwrap();
        let steps = output.result["steps"].as_object().unwrap();
        assert_eq!(steps.len(), 2);
        assert!(steps.contains_key("0"));
        assert!(steps.contains_key("1"));
        assert!(!steps.contains_key("2"));
    }

    #[tokio::test]
    async fn context_size_reflects_current_log() {
        let handle = bound_handle(&["hello there"]);
        let tool = ContextSizeTool::new(handle.clone());

        let before = tool.execute(json!({})).await.unwrap().result["context_size"]
            .as_u64()
            .unwrap();

        handle
            .with_mut(|session| {
                session.append(Step::interaction(vec![Message::assistant("reply")]));
                Ok(())
            })
            .unwrap();

        let after = tool.execute(json!({})).await.unwrap().result["context_size"]
            .as_u64()
            .unwrap();
        assert!(after > before);
    }
}
