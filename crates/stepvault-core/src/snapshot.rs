//! Filesystem sink for full-context snapshots.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::session::SessionMemory;

/// Write-only diagnostic sink backed by a single file.
///
/// Every capture replaces the previous file contents with the current
/// rendered log. There is no read-back contract; the file exists for
/// offline inspection.
#[derive(Debug, Clone)]
pub struct SnapshotSink {
    path: PathBuf,
}

impl SnapshotSink {
    /// Create a sink at `path`, creating parent directories if needed.
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the sink file with the session's full rendered log.
    pub fn capture(&self, session: &SessionMemory) -> Result<()> {
        let text = session.log().rendered_text();
        fs::write(&self.path, &text)?;
        info!(path = %self.path.display(), chars = text.chars().count(), "context snapshot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::step::Step;

    fn session_saying(content: &str) -> SessionMemory {
        let mut session = SessionMemory::new();
        session.append(Step::interaction(vec![Message::user(content)]));
        session
    }

    #[test]
    fn capture_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let sink = SnapshotSink::new(dir.path().join("full_context_log.txt")).unwrap();

        sink.capture(&session_saying("first snapshot")).unwrap();
        sink.capture(&session_saying("second snapshot")).unwrap();

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert!(contents.contains("second snapshot"));
        assert!(!contents.contains("first snapshot"));
    }

    #[test]
    fn new_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("diagnostics").join("context.txt");
        let sink = SnapshotSink::new(nested).unwrap();

        sink.capture(&session_saying("hello")).unwrap();
        assert!(sink.path().exists());
    }
}
