use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    capture::session::Artifact,
    foundation::error::{MathvizError, MathvizResult},
};

/// Download trigger collaborator: saves a finalized artifact somewhere.
pub trait Downloader {
    /// Save `artifact` under its suggested filename and report where it went.
    fn download(&self, artifact: &Artifact) -> MathvizResult<PathBuf>;
}

/// Saves artifacts into a directory on disk.
#[derive(Clone, Debug)]
pub struct DirectoryDownloader {
    dir: PathBuf,
    overwrite: bool,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: true,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloader for DirectoryDownloader {
    fn download(&self, artifact: &Artifact) -> MathvizResult<PathBuf> {
        let path = self.dir.join(&artifact.filename);
        ensure_parent_dir(&path)?;

        if !self.overwrite && path.exists() {
            return Err(MathvizError::validation(format!(
                "output file '{}' already exists",
                path.display()
            )));
        }

        std::fs::write(&path, &artifact.data)
            .with_context(|| format!("failed to write artifact '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = artifact.data.len(), "artifact saved");
        Ok(path)
    }
}

pub fn ensure_parent_dir(path: &Path) -> MathvizResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}
