//! Version file access
//!
//! The version file is the one piece of shared mutable state the stamper
//! touches, so it is passed in as a handle instead of being opened by path
//! deep inside the stamping code.

use std::io;
use std::path::{Path, PathBuf};

/// Read/write handle to the persisted version record
pub trait VersionStore {
    /// Human-readable location for messages
    fn location(&self) -> String;

    fn read(&self) -> io::Result<String>;

    fn write(&mut self, contents: &str) -> io::Result<()>;
}

impl<S: VersionStore + ?Sized> VersionStore for &mut S {
    fn location(&self) -> String {
        (**self).location()
    }

    fn read(&self) -> io::Result<String> {
        (**self).read()
    }

    fn write(&mut self, contents: &str) -> io::Result<()> {
        (**self).write(contents)
    }
}

/// Version record stored in a file on disk
#[derive(Debug, Clone)]
pub struct FileVersionStore {
    path: PathBuf,
}

impl FileVersionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VersionStore for FileVersionStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.path)
    }

    fn write(&mut self, contents: &str) -> io::Result<()> {
        std::fs::write(&self.path, contents)
    }
}

/// In-memory version record that remembers every write
#[derive(Debug, Clone, Default)]
pub struct MemoryVersionStore {
    contents: String,
    writes: Vec<String>,
}

impl MemoryVersionStore {
    #[must_use]
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            writes: Vec::new(),
        }
    }

    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Every write in order, oldest first
    #[must_use]
    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl VersionStore for MemoryVersionStore {
    fn location(&self) -> String {
        "<memory>".to_string()
    }

    fn read(&self) -> io::Result<String> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> io::Result<()> {
        self.contents = contents.to_string();
        self.writes.push(contents.to_string());
        Ok(())
    }
}
