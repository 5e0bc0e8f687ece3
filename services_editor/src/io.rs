//! Document storage and script execution

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Document I/O error
#[derive(Debug, Error)]
pub enum IoError {
    #[error("Document not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Document is not valid UTF-8: {}", .0.display())]
    InvalidUtf8(PathBuf),

    #[error("Script runner failed: {0}")]
    Runner(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Document I/O result
pub type IoResult<T> = Result<T, IoError>;

/// Where tab contents are loaded from and saved to
pub trait DocumentStore {
    fn load(&self, path: &Path) -> IoResult<String>;
    fn save(&mut self, path: &Path, content: &str) -> IoResult<()>;
}

/// Executes a saved Python file.
///
/// How the process is spawned and where its output goes is up to the host.
pub trait ScriptRunner {
    fn run(&mut self, path: &Path) -> IoResult<()>;
}

/// Plain files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentStore;

impl DocumentStore for FsDocumentStore {
    fn load(&self, path: &Path) -> IoResult<String> {
        let bytes = fs::read(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => IoError::NotFound(path.to_path_buf()),
            _ => IoError::Io(err),
        })?;
        String::from_utf8(bytes).map_err(|_| IoError::InvalidUtf8(path.to_path_buf()))
    }

    fn save(&mut self, path: &Path, content: &str) -> IoResult<()> {
        fs::write(path, content)?;
        Ok(())
    }
}

/// In-memory store for tests and scratch sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(|content| content.as_str())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn load(&self, path: &Path) -> IoResult<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| IoError::NotFound(path.to_path_buf()))
    }

    fn save(&mut self, path: &Path, content: &str) -> IoResult<()> {
        self.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}
