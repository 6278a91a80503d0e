use super::KvBackend;
use crate::error::{PromptzError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One file per key inside the data directory. Values are written verbatim,
/// so collection keys hold JSON and session keys hold plain strings.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KvBackend for FsBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PromptzError::Io(err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(PromptzError::Io)?;
        }
        fs::write(self.key_path(key), value).map_err(PromptzError::Io)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(PromptzError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn get_set_remove_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut backend = FsBackend::new(temp.path().join("data"));

        assert_eq!(backend.get("prompts").unwrap(), None);

        backend.set("prompts", "[1,2]").unwrap();
        assert_eq!(backend.get("prompts").unwrap().as_deref(), Some("[1,2]"));

        backend.set("prompts", "[]").unwrap();
        assert_eq!(backend.get("prompts").unwrap().as_deref(), Some("[]"));

        backend.remove("prompts").unwrap();
        assert_eq!(backend.get("prompts").unwrap(), None);
        // Absent keys remove cleanly.
        backend.remove("prompts").unwrap();
    }

    #[test]
    fn set_creates_the_data_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("a").join("b");
        let mut backend = FsBackend::new(&root);
        backend.set("tags", "[]").unwrap();
        assert!(root.join("tags").exists());
    }
}
