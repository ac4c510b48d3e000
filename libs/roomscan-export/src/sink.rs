//! # Artifact Sinks
//!
//! Where an exported artifact goes once serialization succeeded.

use std::path::{Path, PathBuf};

use crate::error::{ExportError, ExportResult};
use crate::ExportedArtifact;

/// Receives the finished artifact.
pub trait ArtifactSink {
    /// Persists or forwards the artifact.
    fn deliver(&mut self, artifact: &ExportedArtifact) -> ExportResult<()>;
}

/// Keeps delivered artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Vec<ExportedArtifact>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts delivered so far, oldest first.
    pub fn artifacts(&self) -> &[ExportedArtifact] {
        &self.artifacts
    }
}

impl ArtifactSink for MemorySink {
    fn deliver(&mut self, artifact: &ExportedArtifact) -> ExportResult<()> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }
}

/// Writes artifacts into a directory under their suggested filename.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ArtifactSink for FileSink {
    fn deliver(&mut self, artifact: &ExportedArtifact) -> ExportResult<()> {
        // Only bare filenames; a suggested name must not escape the directory.
        let name = Path::new(&artifact.filename);
        if artifact.filename.is_empty() || name.file_name() != Some(name.as_os_str()) {
            return Err(ExportError::InvalidFilename(artifact.filename.clone()));
        }

        let path = self.dir.join(name);
        std::fs::write(&path, &artifact.bytes).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        self.written.push(path);
        Ok(())
    }
}
