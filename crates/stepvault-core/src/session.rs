//! Session-scoped memory: one step log plus one persistent store.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::error::{MemoryError, Result};
use crate::log::StepLog;
use crate::step::Step;
use crate::store::PersistentStore;

/// Memory owned by a single conversational session.
///
/// Every session gets its own log and store pair; nothing here is
/// process-global. Cross-session sharing happens only by explicitly
/// cloning a [`SessionHandle`].
#[derive(Debug, Clone, Default)]
pub struct SessionMemory {
    log: StepLog,
    store: PersistentStore,
}

impl SessionMemory {
    /// Create a session with an empty log and store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collaborator-side append of an interaction record.
    pub fn append(&mut self, step: Step) {
        self.log.push(step);
    }

    /// Position → metadata for every step in the log.
    pub fn list_steps(&self) -> BTreeMap<usize, Option<Value>> {
        self.log.metadata_index()
    }

    /// Human-readable form of the step at `index` plus its metadata.
    pub fn get_step(&self, index: usize) -> Result<(String, Option<Value>)> {
        let step = self.log.get(index)?;
        Ok((step.to_string(), step.metadata().cloned()))
    }

    /// Replace the step at `index` with a summary. The previous step's
    /// content is discarded irreversibly.
    pub fn modify_step(&mut self, index: usize, summary: impl Into<String>) -> Result<()> {
        self.log.replace_with_summary(index, summary)
    }

    /// Delete the step at `index`; later steps shift down by one.
    pub fn remove_step(&mut self, index: usize) -> Result<()> {
        self.log.remove(index)?;
        Ok(())
    }

    /// Character length of the rendered log, recomputed on every call.
    pub fn context_size(&self) -> usize {
        self.log.context_size()
    }

    /// Write `key -> value` to the store, then mirror the full store
    /// into log index 0 as a summary step.
    ///
    /// The mirror keeps the store visible at a fixed log position for
    /// consumers that only read the log, at the cost of clobbering
    /// whatever was at index 0. On an empty log this fails with
    /// [`MemoryError::IndexOutOfRange`] before the store is touched;
    /// there is no placeholder auto-append.
    pub fn persist(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        if self.log.is_empty() {
            return Err(MemoryError::IndexOutOfRange { index: 0, len: 0 });
        }
        let key = key.into();
        debug!(key = %key, "persisting key to session store");
        self.store.insert(key, value);
        self.log.replace_with_summary(0, self.store.render())
    }

    /// Stored value for `key`, if any.
    pub fn recall(&self, key: &str) -> Option<Value> {
        self.store.get(key).cloned()
    }

    /// Write the full rendered log to `sink`, replacing prior contents.
    /// Same serialization as [`SessionMemory::context_size`].
    pub fn snapshot_to<W: Write>(&self, sink: &mut W) -> Result<()> {
        let text = self.log.rendered_text();
        debug!(chars = text.chars().count(), "snapshotting session log");
        sink.write_all(text.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    /// Read access to the bound log.
    pub fn log(&self) -> &StepLog {
        &self.log
    }

    /// Read access to the persistent store.
    pub fn store(&self) -> &PersistentStore {
        &self.store
    }
}

/// Cloneable handle through which tools reach the active session.
///
/// Tools capture a handle at registration time instead of going through
/// a process-wide global. Until [`SessionHandle::bind`] is called every
/// operation fails with [`MemoryError::UninitializedSession`].
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Option<SessionMemory>>>,
}

impl SessionHandle {
    /// Create an unbound handle.
    pub fn unbound() -> Self {
        Self::default()
    }

    /// Create a handle already bound to a fresh session.
    pub fn new_session() -> Self {
        let handle = Self::unbound();
        handle.bind(SessionMemory::new());
        handle
    }

    /// Bind (or rebind) the session this handle resolves to.
    pub fn bind(&self, session: SessionMemory) {
        *self.inner.write() = Some(session);
    }

    /// Drop the bound session, returning the handle to the unbound state.
    pub fn unbind(&self) -> Option<SessionMemory> {
        self.inner.write().take()
    }

    /// Run a read-only operation against the bound session.
    pub fn with<T>(&self, f: impl FnOnce(&SessionMemory) -> Result<T>) -> Result<T> {
        let guard = self.inner.read();
        let session = guard.as_ref().ok_or(MemoryError::UninitializedSession)?;
        f(session)
    }

    /// Run a mutating operation against the bound session.
    pub fn with_mut<T>(&self, f: impl FnOnce(&mut SessionMemory) -> Result<T>) -> Result<T> {
        let mut guard = self.inner.write();
        let session = guard.as_mut().ok_or(MemoryError::UninitializedSession)?;
        f(session)
    }
}
