//! Log entries: opaque interaction records and their summary replacements.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::Message;

/// Fixed prefix prepended to every summary step's rendered content.
pub const STEP_SUMMARY_PREFIX: &str = "[STEP_SUMMARY]:\n";

/// One entry in the conversational memory log.
///
/// Interaction records are produced by external collaborators (the agent
/// loop) and are opaque to this crate beyond their rendered messages and
/// optional metadata. Summaries are produced only by replacing an
/// existing step; they discard the original content irreversibly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Step {
    Interaction {
        messages: Vec<Message>,
        metadata: Option<Value>,
    },
    Summary {
        text: String,
    },
}

impl Step {
    /// Create an interaction record without metadata.
    pub fn interaction(messages: Vec<Message>) -> Self {
        Step::Interaction {
            messages,
            metadata: None,
        }
    }

    /// Create an interaction record carrying metadata.
    pub fn interaction_with_metadata(messages: Vec<Message>, metadata: Value) -> Self {
        Step::Interaction {
            messages,
            metadata: Some(metadata),
        }
    }

    /// Create a summary step wrapping condensed text.
    pub fn summary(text: impl Into<String>) -> Self {
        Step::Summary { text: text.into() }
    }

    /// Render this step to role-tagged messages.
    ///
    /// A summary renders to exactly one system message with the fixed
    /// `[STEP_SUMMARY]:` wrapper; an interaction yields its recorded
    /// messages unchanged.
    pub fn to_messages(&self) -> Vec<Message> {
        match self {
            Step::Interaction { messages, .. } => messages.clone(),
            Step::Summary { text } => {
                vec![Message::system(format!("{STEP_SUMMARY_PREFIX}{text}"))]
            }
        }
    }

    /// Step metadata, if any. Summaries never carry metadata.
    pub fn metadata(&self) -> Option<&Value> {
        match self {
            Step::Interaction { metadata, .. } => metadata.as_ref(),
            Step::Summary { .. } => None,
        }
    }

    /// Rendered text of this step, in the canonical message form.
    pub fn rendered_text(&self) -> String {
        self.to_messages().iter().map(Message::to_string).collect()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered_text())
    }
}
