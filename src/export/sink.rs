//! Download adapters: where a finished artifact ends up.

use super::Artifact;
use crate::error::ExportError;
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Outcome of delivering one artifact
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Saved(PathBuf),
    Streamed { bytes: usize },
}

impl Delivery {
    /// Short description for the run summary
    pub fn describe(&self) -> String {
        match self {
            Delivery::Saved(path) => path.display().to_string(),
            Delivery::Streamed { .. } => "<stdout>".to_string(),
        }
    }
}

/// Hands an artifact to the user
pub trait DownloadSink {
    fn deliver(&mut self, artifact: &Artifact) -> Result<Delivery, ExportError>;
}

/// Saves artifacts into a directory.
///
/// Bytes go to a hidden temporary file in the target directory first and
/// are renamed into place, so a failed write never leaves a partial file
/// under the final name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, artifact: &Artifact) -> Result<Delivery, ExportError> {
        fs::create_dir_all(&self.dir)?;

        let mut tmp = tempfile::Builder::new().prefix(".retrofit-").suffix(".part").tempfile_in(&self.dir)?;
        debug!("writing {} bytes to {:?}", artifact.bytes.len(), tmp.path());
        tmp.write_all(&artifact.bytes)?;
        tmp.as_file().sync_all()?;

        let target = self.dir.join(&artifact.filename);
        tmp.persist(&target).map_err(io::Error::from)?;

        info!("saved {} ({}, {} bytes)", target.display(), artifact.mime, artifact.bytes.len());
        Ok(Delivery::Saved(target))
    }
}

/// Streams artifacts to a writer, normally stdout
pub struct StdoutSink<W: Write> {
    out: W,
}

impl<W: Write> StdoutSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DownloadSink for StdoutSink<W> {
    fn deliver(&mut self, artifact: &Artifact) -> Result<Delivery, ExportError> {
        self.out.write_all(&artifact.bytes)?;
        self.out.flush()?;
        debug!("streamed {} ({} bytes)", artifact.filename, artifact.bytes.len());
        Ok(Delivery::Streamed { bytes: artifact.bytes.len() })
    }
}
