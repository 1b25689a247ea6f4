//! Destinations for generated artifacts.

use indexmap::IndexMap;
use std::io;
use std::path::{Path, PathBuf};

/// Receives generated files by name.
pub trait ArtifactSink {
    /// Store one artifact.
    fn write(&mut self, name: &str, contents: &str) -> io::Result<()>;

    /// Drop a stored artifact. Removing one that does not exist is not an error.
    fn remove(&mut self, name: &str) -> io::Result<()>;
}

/// Writes artifacts into a directory, creating it on first write.
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

impl ArtifactSink for DirectorySink {
    fn write(&mut self, name: &str, contents: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        tracing::debug!(path = %path.display(), "writing artifact");
        std::fs::write(path, contents)
    }

    fn remove(&mut self, name: &str) -> io::Result<()> {
        let path = self.dir.join(name);
        tracing::debug!(path = %path.display(), "removing artifact");
        match std::fs::remove_file(path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

/// Keeps artifacts in memory, in write order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub files: IndexMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, name: &str, contents: &str) -> io::Result<()> {
        self.files.insert(name.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&mut self, name: &str) -> io::Result<()> {
        self.files.shift_remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("nested/output");
        let mut sink = DirectorySink::new(&out);
        assert!(!out.exists());

        sink.write("A.component.ts", "class A {}\n").unwrap();
        assert_eq!(
            std::fs::read_to_string(out.join("A.component.ts")).unwrap(),
            "class A {}\n"
        );
    }

    #[test]
    fn test_memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        sink.write("b", "2").unwrap();
        sink.write("a", "1").unwrap();
        let names: Vec<_> = sink.files.keys().cloned().collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(sink.get("a"), Some("1"));

        sink.remove("b").unwrap();
        sink.remove("missing").unwrap();
        assert_eq!(sink.files.len(), 1);
    }

    #[test]
    fn test_directory_sink_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(tmp.path());
        sink.write("A.component.ts", "").unwrap();

        sink.remove("A.component.ts").unwrap();
        assert!(!tmp.path().join("A.component.ts").exists());
        sink.remove("A.component.ts").unwrap();
    }
}
