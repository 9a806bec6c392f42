//! Destinations for generated source text.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Receives generated files by name. Names are plain file names with no
/// directory component.
pub trait SourceSink {
    fn write(&mut self, name: &str, text: &str) -> io::Result<()>;
}

/// Writes each file into a single directory, replacing existing contents.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceSink for DirectorySink {
    fn write(&mut self, name: &str, text: &str) -> io::Result<()> {
        fs::write(self.root.join(name), text)
    }
}

/// Keeps files in memory, ordered by name.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    files: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceSink for MemorySink {
    fn write(&mut self, name: &str, text: &str) -> io::Result<()> {
        self.files.insert(name.to_string(), text.to_string());
        Ok(())
    }
}
