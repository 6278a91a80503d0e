//! Remote binding: one named JSON object on an authenticated drive.
//!
//! Lookup prefers the remembered object id and falls back to a name query
//! when that id has gone stale. Saves re-find by name every time, so a file
//! recreated out-of-band is patched rather than duplicated. Autosave is
//! debounced and suppressed while remote content is being applied locally,
//! so a fresh download is not immediately re-uploaded as stale local state.

use super::object::ObjectStore;
use crate::error::Result;
use crate::timer::Debounce;

pub struct RemoteSync {
    store: Box<dyn ObjectStore>,
    file_name: String,
    remembered_id: Option<String>,
    debounce: Debounce,
    loading: bool,
}

impl RemoteSync {
    pub fn new(
        store: Box<dyn ObjectStore>,
        file_name: &str,
        remembered_id: Option<String>,
        debounce_ms: i64,
    ) -> Self {
        Self {
            store,
            file_name: file_name.to_string(),
            remembered_id,
            debounce: Debounce::new(debounce_ms),
            loading: false,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn remembered_id(&self) -> Option<&str> {
        self.remembered_id.as_deref()
    }

    /// Fetch the remote body, or None when no object exists under the name.
    pub fn fetch(&mut self) -> Result<Option<String>> {
        if let Some(id) = self.remembered_id.clone() {
            match self.store.download(&id)? {
                Some(body) => return Ok(Some(body)),
                None => {
                    log::debug!("remembered remote id {} is stale, dropping it", id);
                    self.remembered_id = None;
                }
            }
        }
        match self.store.find(&self.file_name)? {
            Some(object) => {
                let body = self.store.download(&object.id)?;
                if body.is_some() {
                    self.remembered_id = Some(object.id);
                }
                Ok(body)
            }
            None => Ok(None),
        }
    }

    /// Create-or-replace by name. A failed lookup falls back to creating a
    /// fresh object rather than failing the save.
    pub fn save(&mut self, body: &str) -> Result<String> {
        let existing = match self.store.find(&self.file_name) {
            Ok(existing) => existing,
            Err(err) => {
                log::debug!("remote lookup before save failed: {}", err);
                None
            }
        };
        let id = self
            .store
            .upload(existing.as_ref().map(|o| o.id.as_str()), &self.file_name, body)?;
        self.remembered_id = Some(id.clone());
        Ok(id)
    }

    pub fn revoke(&self) -> Result<()> {
        self.store.revoke()
    }

    // --- Autosave scheduling ---

    /// Marks a remote-load in progress: cancels any pending autosave and
    /// ignores new requests until the load ends.
    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.debounce.cancel();
    }

    pub fn end_loading(&mut self) {
        self.loading = false;
    }

    pub fn request_autosave(&mut self, now_ms: i64) {
        if !self.loading {
            self.debounce.arm(now_ms);
        }
    }

    pub fn autosave_due(&mut self, now_ms: i64) -> bool {
        self.debounce.fire_if_due(now_ms)
    }

    pub fn autosave_pending(&self) -> bool {
        self.debounce.is_armed()
    }

    pub fn flush_now(&mut self) -> bool {
        self.debounce.fire_now()
    }

    pub fn cancel_autosave(&mut self) {
        self.debounce.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::object::fixtures::MemoryStore;

    fn remote_with(store: &MemoryStore, remembered: Option<String>) -> RemoteSync {
        RemoteSync::new(Box::new(store.clone()), "db.json", remembered, 2500)
    }

    #[test]
    fn fetch_prefers_the_remembered_id() {
        let store = MemoryStore::new();
        let id = store.seed("db.json", "remembered");
        // A second object under the same name would win a name query.
        store.seed("db.json", "other");

        let mut remote = remote_with(&store, Some(id));
        assert_eq!(remote.fetch().unwrap().as_deref(), Some("remembered"));
    }

    #[test]
    fn stale_remembered_id_falls_back_to_name_lookup() {
        let store = MemoryStore::new();
        let gone = store.seed("db.json", "old");
        store.delete(&gone);
        let live = store.seed("db.json", "current");

        let mut remote = remote_with(&store, Some(gone));
        assert_eq!(remote.fetch().unwrap().as_deref(), Some("current"));
        assert_eq!(remote.remembered_id(), Some(live.as_str()));
    }

    #[test]
    fn fetch_without_any_object_is_none() {
        let store = MemoryStore::new();
        let mut remote = remote_with(&store, None);
        assert_eq!(remote.fetch().unwrap(), None);
        assert_eq!(remote.remembered_id(), None);
    }

    #[test]
    fn save_creates_then_patches_the_same_object() {
        let store = MemoryStore::new();
        let mut remote = remote_with(&store, None);

        let first = remote.save("v1").unwrap();
        let second = remote.save("v2").unwrap();
        assert_eq!(first, second);
        assert_eq!(store.body_of("db.json").as_deref(), Some("v2"));
        assert_eq!(store.uploads(), 2);
        assert_eq!(remote.remembered_id(), Some(first.as_str()));
    }

    #[test]
    fn save_survives_a_failed_lookup_by_creating() {
        let store = MemoryStore::new();
        store.fail_finds(true);
        let mut remote = remote_with(&store, None);
        let id = remote.save("body").unwrap();
        assert!(!id.is_empty());
        store.fail_finds(false);
        assert_eq!(store.body_of("db.json").as_deref(), Some("body"));
    }

    #[test]
    fn autosave_is_suppressed_while_loading() {
        let store = MemoryStore::new();
        let mut remote = remote_with(&store, None);

        remote.request_autosave(1000);
        assert!(remote.autosave_pending());

        remote.begin_loading();
        assert!(!remote.autosave_pending());
        remote.request_autosave(2000);
        assert!(!remote.autosave_pending());

        remote.end_loading();
        remote.request_autosave(3000);
        assert!(!remote.autosave_due(5499));
        assert!(remote.autosave_due(5500));
    }
}
