use std::collections::HashMap;
use std::fs;
use std::io;

/// Returns the full text content of a file identifier.
pub trait FileReader {
    fn read(&self, id: &str) -> io::Result<String>;
}

/// Reads identifiers as paths relative to the working directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read(&self, id: &str) -> io::Result<String> {
        fs::read_to_string(id)
    }
}

/// In-memory reader, handy for driving the engine without a filesystem.
#[derive(Debug, Default, Clone)]
pub struct MemoryReader {
    files: HashMap<String, String>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &str, content: &str) -> Self {
        self.insert(id, content);
        self
    }

    pub fn insert(&mut self, id: &str, content: &str) {
        self.files.insert(id.to_string(), content.to_string());
    }

    pub fn remove(&mut self, id: &str) {
        self.files.remove(id);
    }
}

impl FileReader for MemoryReader {
    fn read(&self, id: &str) -> io::Result<String> {
        self.files.get(id).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} does not exist", id))
        })
    }
}
