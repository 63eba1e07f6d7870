use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MirrorError;

/// Filesystem collaborator. All paths handed to it are names relative to the
/// destination directory chosen at construction.
#[derive(Clone)]
pub struct FileManager {
    base_dir: PathBuf,
}

impl FileManager {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Whether the destination exists, is a directory and the process can
    /// actually write into it. Mode bits alone don't answer that (ownership
    /// and ACLs matter), so this probes with a throwaway file.
    pub fn is_writable(&self) -> bool {
        if !self.base_dir.is_dir() {
            return false;
        }
        let probe = self
            .base_dir
            .join(format!(".write-probe-{}", std::process::id()));
        match fs::write(&probe, b"") {
            Ok(()) => {
                let _ = fs::remove_file(&probe);
                true
            }
            Err(_) => false,
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.base_dir.join(name).exists()
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    pub fn create_dir(&self, name: &str) -> Result<PathBuf, MirrorError> {
        let path = self.base_dir.join(name);
        fs::create_dir(&path).map_err(|source| MirrorError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Writes raw bytes, creating no intermediate directories.
    pub fn write_file(&self, name: &str, content: &[u8]) -> Result<PathBuf, MirrorError> {
        let path = self.base_dir.join(name);
        fs::write(&path, content).map_err(|source| MirrorError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
