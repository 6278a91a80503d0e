//! # Storage Layer
//!
//! Persistence is a small key/value surface behind the [`KvBackend`] trait:
//! five collection keys holding JSON, plus a handful of raw session keys
//! (remote token, remote object id, bound file path and its last seen
//! mtime). [`LocalStore`] layers the snapshot codec and the session
//! accessors on top of a backend.
//!
//! ## Implementations
//!
//! - [`fs::FsBackend`]: one file per key inside the data directory
//! - [`memory::MemBackend`]: in-memory map for tests
//!
//! ## Load resilience
//!
//! Collection keys decode independently: a corrupt value is logged and
//! replaced by its default instead of discarding the rest of the store.
//! A missing folder list seeds the starter folders; an empty one is left
//! alone (the reserved folders are re-added either way).

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::model::{Prompt, Snapshot, SEED_FOLDERS};

pub mod fs;
pub mod memory;

pub use fs::FsBackend;
pub use memory::MemBackend;

pub const KEY_PROMPTS: &str = "prompts";
pub const KEY_FOLDERS: &str = "folders";
pub const KEY_TAGS: &str = "tags";
pub const KEY_TAG_COLORS: &str = "tag_colors";
pub const KEY_FAVORITE_FOLDERS: &str = "favorite_folders";

pub const KEY_FILE_PATH: &str = "file_path";
pub const KEY_FILE_MTIME: &str = "file_mtime";
pub const KEY_DRIVE_TOKEN: &str = "drive_access_token";
pub const KEY_DRIVE_FILE_ID: &str = "drive_file_id";

/// Abstract interface for the key/value backend.
pub trait KvBackend {
    /// Read a value, None when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value (create or overwrite)
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

pub struct LocalStore<B: KvBackend> {
    backend: B,
}

impl<B: KvBackend> LocalStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn decode<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.backend.get(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(err) => {
                    log::warn!("discarding corrupt \"{}\" entry: {}", key, err);
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                log::warn!("could not read \"{}\": {}", key, err);
                None
            }
        }
    }

    /// Assembles a normalized snapshot from the collection keys.
    pub fn load(&self) -> Snapshot {
        let mut snapshot = Snapshot {
            prompts: self.decode::<Vec<Prompt>>(KEY_PROMPTS).unwrap_or_default(),
            folders: self
                .decode::<Vec<String>>(KEY_FOLDERS)
                .unwrap_or_else(|| SEED_FOLDERS.iter().map(|f| f.to_string()).collect()),
            tags: self.decode::<Vec<String>>(KEY_TAGS).unwrap_or_default(),
            tag_colors: self
                .decode::<BTreeMap<String, String>>(KEY_TAG_COLORS)
                .unwrap_or_default(),
            favorite_folders: self
                .decode::<Vec<String>>(KEY_FAVORITE_FOLDERS)
                .unwrap_or_default(),
        };
        snapshot.ensure_reserved();
        snapshot.cleanup_tags();
        snapshot.sort_tags();
        snapshot
    }

    pub fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.backend
            .set(KEY_PROMPTS, &serde_json::to_string(&snapshot.prompts)?)?;
        self.backend
            .set(KEY_FOLDERS, &serde_json::to_string(&snapshot.folders)?)?;
        self.backend
            .set(KEY_TAGS, &serde_json::to_string(&snapshot.tags)?)?;
        self.backend
            .set(KEY_TAG_COLORS, &serde_json::to_string(&snapshot.tag_colors)?)?;
        self.backend.set(
            KEY_FAVORITE_FOLDERS,
            &serde_json::to_string(&snapshot.favorite_folders)?,
        )?;
        Ok(())
    }

    // --- Session keys, stored raw ---

    pub fn token(&self) -> Result<Option<String>> {
        self.backend.get(KEY_DRIVE_TOKEN)
    }

    pub fn set_token(&mut self, token: &str) -> Result<()> {
        self.backend.set(KEY_DRIVE_TOKEN, token)
    }

    pub fn clear_token(&mut self) -> Result<()> {
        self.backend.remove(KEY_DRIVE_TOKEN)
    }

    pub fn remote_file_id(&self) -> Result<Option<String>> {
        self.backend.get(KEY_DRIVE_FILE_ID)
    }

    pub fn set_remote_file_id(&mut self, id: &str) -> Result<()> {
        self.backend.set(KEY_DRIVE_FILE_ID, id)
    }

    pub fn clear_remote_file_id(&mut self) -> Result<()> {
        self.backend.remove(KEY_DRIVE_FILE_ID)
    }

    pub fn bound_file(&self) -> Result<Option<PathBuf>> {
        Ok(self.backend.get(KEY_FILE_PATH)?.map(PathBuf::from))
    }

    pub fn bind_file(&mut self, path: &str) -> Result<()> {
        self.backend.set(KEY_FILE_PATH, path)
    }

    pub fn unbind_file(&mut self) -> Result<()> {
        self.backend.remove(KEY_FILE_PATH)?;
        self.backend.remove(KEY_FILE_MTIME)
    }

    /// Last mtime this app read or wrote the bound file. Survives restarts
    /// so edits made while the app was closed are noticed.
    pub fn file_mtime(&self) -> Result<Option<i64>> {
        Ok(self
            .backend
            .get(KEY_FILE_MTIME)?
            .and_then(|raw| raw.parse().ok()))
    }

    pub fn set_file_mtime(&mut self, mtime_ms: i64) -> Result<()> {
        self.backend.set(KEY_FILE_MTIME, &mtime_ms.to_string())
    }

    /// Drop a snapshot dump next to the regular keys. Used when the bound
    /// file cannot be written, so the data still lands somewhere on disk.
    pub fn write_backup(&mut self, name: &str, body: &str) -> Result<()> {
        self.backend.set(name, body)
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemBackend;
    use super::*;
    use crate::model::{DEFAULT_FOLDER, TRASH_FOLDER};

    #[test]
    fn fresh_store_seeds_starter_folders() {
        let store = LocalStore::new(MemBackend::default());
        let snapshot = store.load();
        assert_eq!(
            snapshot.folders,
            vec!["General", "Marketing", "SEO", "Code", "Trash"]
        );
        assert!(snapshot.prompts.is_empty());
    }

    #[test]
    fn empty_folder_list_is_not_reseeded() {
        let mut store = LocalStore::new(MemBackend::default());
        store.backend.set(KEY_FOLDERS, "[]").unwrap();
        let snapshot = store.load();
        assert_eq!(snapshot.folders, vec![DEFAULT_FOLDER, TRASH_FOLDER]);
    }

    #[test]
    fn corrupt_key_falls_back_without_discarding_the_rest() {
        let mut store = LocalStore::new(MemBackend::default());
        store.backend.set(KEY_PROMPTS, "{not json").unwrap();
        store.backend.set(KEY_TAGS, r#"["kept"]"#).unwrap();
        // Keep a prompt referencing the tag alive so cleanup leaves it.
        let snapshot = store.load();
        assert!(snapshot.prompts.is_empty());
        // No prompt references "kept", so the registry is pruned.
        assert!(snapshot.tags.is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let mut store = LocalStore::new(MemBackend::default());
        let mut snapshot = store.load();
        let mut prompt = Prompt::new(42, "T".to_string(), String::new(), "body".to_string());
        prompt.tags = vec!["x".to_string()];
        snapshot.prompts.push(prompt);
        snapshot.tags.push("x".to_string());
        store.save(&snapshot).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.prompts.len(), 1);
        assert_eq!(loaded.prompts[0].id, 42);
        assert_eq!(loaded.tags, vec!["x"]);
    }

    #[test]
    fn session_keys_round_trip() {
        let mut store = LocalStore::new(MemBackend::default());
        assert_eq!(store.token().unwrap(), None);

        store.set_token("tok").unwrap();
        store.set_remote_file_id("abc").unwrap();
        store.bind_file("/tmp/db.json").unwrap();
        store.set_file_mtime(123456).unwrap();

        assert_eq!(store.token().unwrap().as_deref(), Some("tok"));
        assert_eq!(store.remote_file_id().unwrap().as_deref(), Some("abc"));
        assert_eq!(
            store.bound_file().unwrap(),
            Some(PathBuf::from("/tmp/db.json"))
        );
        assert_eq!(store.file_mtime().unwrap(), Some(123456));

        store.clear_token().unwrap();
        store.unbind_file().unwrap();
        assert_eq!(store.token().unwrap(), None);
        assert_eq!(store.bound_file().unwrap(), None);
        assert_eq!(store.file_mtime().unwrap(), None);
    }
}
