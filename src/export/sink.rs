use crate::foundation::error::{NewsprintError, NewsprintResult};
use anyhow::Context as _;
use std::path::{Path, PathBuf};

/// MIME type of every exported artifact.
pub const JPEG_MIME: &str = "image/jpeg";

/// One exported image, ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested file name, e.g. `newspaper-article-1700000000000.jpeg`.
    pub file_name: String,
    /// Content type.
    pub mime: &'static str,
    /// Encoded file bytes.
    pub bytes: Vec<u8>,
}

/// Destination for exported artifacts.
///
/// Delivery is all-or-nothing: a sink must never leave a partially written artifact behind.
pub trait ArtifactSink {
    /// Hand one artifact to the sink.
    fn deliver(&mut self, artifact: &Artifact) -> NewsprintResult<()>;
}

/// Writes artifacts into a directory, atomically (temp file then rename).
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Create a sink writing into `dir` (created on first delivery).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in delivery order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ArtifactSink for DirectorySink {
    #[tracing::instrument(level = "debug", skip_all, fields(file = %artifact.file_name))]
    fn deliver(&mut self, artifact: &Artifact) -> NewsprintResult<()> {
        if artifact.file_name.is_empty()
            || artifact.file_name.contains(['/', '\\'])
            || artifact.file_name.starts_with('.')
        {
            return Err(NewsprintError::validation(format!(
                "invalid artifact file name \"{}\"",
                artifact.file_name
            )));
        }

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let final_path = self.dir.join(&artifact.file_name);
        let tmp_path = self.dir.join(format!(".{}.partial", artifact.file_name));

        if let Err(e) = std::fs::write(&tmp_path, &artifact.bytes) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(anyhow::Error::new(e)
                .context(format!("write '{}'", tmp_path.display()))
                .into());
        }
        if let Err(e) = std::fs::rename(&tmp_path, &final_path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(anyhow::Error::new(e)
                .context(format!("move artifact to '{}'", final_path.display()))
                .into());
        }

        tracing::debug!(path = %final_path.display(), bytes = artifact.bytes.len(), "artifact written");
        self.written.push(final_path);
        Ok(())
    }
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    pub(crate) artifacts: Vec<Artifact>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the delivered artifacts.
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }
}

impl ArtifactSink for InMemorySink {
    fn deliver(&mut self, artifact: &Artifact) -> NewsprintResult<()> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;
