//! Ordered, positionally addressed log of conversation steps.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{MemoryError, Result};
use crate::step::Step;

/// Ordered, mutable sequence of steps indexed `0..len`.
///
/// Indices are positional, not stable: removing index `k` shifts every
/// later step down by one, so an index cached across a removal addresses
/// a different step than intended. This is part of the public contract;
/// callers that interleave reads and removals must re-list between them.
#[derive(Debug, Clone, Default)]
pub struct StepLog {
    steps: Vec<Step>,
}

impl StepLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step. Collaborator-side entry point; the manager itself
    /// only ever replaces or removes.
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Get the step at `index`.
    pub fn get(&self, index: usize) -> Result<&Step> {
        self.steps
            .get(index)
            .ok_or(MemoryError::IndexOutOfRange {
                index,
                len: self.steps.len(),
            })
    }

    /// Replace the step at `index` with a summary wrapping `text`.
    /// Log length is unchanged; the previous content is discarded.
    pub fn replace_with_summary(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        let len = self.steps.len();
        let slot = self
            .steps
            .get_mut(index)
            .ok_or(MemoryError::IndexOutOfRange { index, len })?;
        *slot = Step::summary(text);
        Ok(())
    }

    /// Remove the step at `index`. Every later step shifts down by one.
    pub fn remove(&mut self, index: usize) -> Result<Step> {
        if index >= self.steps.len() {
            return Err(MemoryError::IndexOutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        Ok(self.steps.remove(index))
    }

    /// Number of steps in the log.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate over the steps in log order.
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    /// Map of every position to that step's metadata (absent for
    /// summaries and unannotated interactions). Keys are exactly
    /// `0..len` in order.
    pub fn metadata_index(&self) -> BTreeMap<usize, Option<Value>> {
        self.steps
            .iter()
            .enumerate()
            .map(|(idx, step)| (idx, step.metadata().cloned()))
            .collect()
    }

    /// Concatenated rendering of every step's messages, in log order.
    /// The same serialization backs [`StepLog::context_size`] and the
    /// snapshot sink.
    pub fn rendered_text(&self) -> String {
        self.steps.iter().map(Step::rendered_text).collect()
    }

    /// Character length of [`StepLog::rendered_text`]. A proxy for how
    /// much of the model's input budget the history consumes; computed
    /// fresh on every call.
    pub fn context_size(&self) -> usize {
        self.steps
            .iter()
            .map(|step| step.rendered_text().chars().count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use serde_json::json;

    fn log_with(contents: &[&str]) -> StepLog {
        let mut log = StepLog::new();
        for content in contents {
            log.push(Step::interaction(vec![Message::user(*content)]));
        }
        log
    }

    #[test]
    fn push_and_len() {
        let log = log_with(&["a", "b"]);
        assert_eq!(log.len(), 2);
        assert!(!log.is_empty());
    }

    #[test]
    fn get_out_of_range_fails() {
        let log = log_with(&["a"]);
        assert!(matches!(
            log.get(1),
            Err(MemoryError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert!(log.get(0).is_ok());
    }

    #[test]
    fn replace_keeps_length_and_discards_content() {
        let mut log = log_with(&["original content"]);
        log.replace_with_summary(0, "short note").unwrap();
        assert_eq!(log.len(), 1);
        let rendered = log.get(0).unwrap().rendered_text();
        assert!(rendered.contains("short note"));
        assert!(!rendered.contains("original content"));
    }

    #[test]
    fn replace_out_of_range_leaves_log_untouched() {
        let mut log = log_with(&["a"]);
        let before = log.rendered_text();
        assert!(log.replace_with_summary(5, "x").is_err());
        assert_eq!(log.rendered_text(), before);
    }

    #[test]
    fn remove_shifts_later_steps_down() {
        let mut log = StepLog::new();
        log.push(Step::interaction_with_metadata(
            vec![Message::user("a")],
            json!("meta-a"),
        ));
        log.push(Step::interaction_with_metadata(
            vec![Message::user("b")],
            json!("meta-b"),
        ));
        log.push(Step::interaction_with_metadata(
            vec![Message::user("c")],
            json!("meta-c"),
        ));

        log.remove(1).unwrap();

        assert_eq!(log.len(), 2);
        let index = log.metadata_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index[&0], Some(json!("meta-a")));
        assert_eq!(index[&1], Some(json!("meta-c")));
    }

    #[test]
    fn metadata_index_keys_cover_all_positions_in_order() {
        let log = log_with(&["a", "b", "c"]);
        let index = log.metadata_index();
        let keys: Vec<usize> = index.keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 2]);
        assert!(index.values().all(Option::is_none));
    }

    #[test]
    fn context_size_grows_with_appends() {
        let mut log = log_with(&["hello"]);
        let before = log.context_size();
        log.push(Step::interaction(vec![Message::assistant("world")]));
        assert!(log.context_size() > before);
    }

    #[test]
    fn context_size_counts_chars_not_bytes() {
        let mut log = StepLog::new();
        log.push(Step::interaction(vec![Message::user("héllo")]));
        let rendered = log.rendered_text();
        assert_eq!(log.context_size(), rendered.chars().count());
        assert!(rendered.len() > rendered.chars().count());
    }
}
