//! Remote object store abstraction.
//!
//! The remote side of sync is one JSON object in an app-scoped drive,
//! addressed by name with a remembered id as a shortcut. The trait keeps
//! [`super::remote::RemoteSync`] testable without a network.

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    pub id: String,
    /// RFC 3339 modification time as reported by the drive, when available.
    pub modified: Option<String>,
}

pub trait ObjectStore {
    /// Look an object up by name; the first match wins.
    fn find(&self, name: &str) -> Result<Option<RemoteObject>>;

    /// Fetch an object body by id. None means the object is gone, which is
    /// not an error: remembered ids go stale when files are deleted remotely.
    fn download(&self, id: &str) -> Result<Option<String>>;

    /// Create (id None) or replace (id Some) an object. Returns the id of
    /// the stored object.
    fn upload(&self, id: Option<&str>, name: &str, body: &str) -> Result<String>;

    /// Invalidate the credential the store was built with.
    fn revoke(&self) -> Result<()>;
}

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::error::PromptzError;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default)]
    struct Inner {
        objects: HashMap<String, (String, String)>,
        next_id: u64,
        uploads: usize,
        revoked: bool,
        fail_finds: bool,
        fail_uploads: bool,
    }

    /// In-memory drive. Clones share state, so tests keep a handle to
    /// inspect what an adapter did after handing one over.
    #[derive(Clone, Default)]
    pub struct MemoryStore {
        inner: Rc<RefCell<Inner>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn seed(&self, name: &str, body: &str) -> String {
            let mut inner = self.inner.borrow_mut();
            inner.next_id += 1;
            let id = format!("obj-{}", inner.next_id);
            inner
                .objects
                .insert(id.clone(), (name.to_string(), body.to_string()));
            id
        }

        pub fn delete(&self, id: &str) {
            self.inner.borrow_mut().objects.remove(id);
        }

        pub fn body_of(&self, name: &str) -> Option<String> {
            let inner = self.inner.borrow();
            let mut ids: Vec<&String> = inner.objects.keys().collect();
            ids.sort();
            ids.into_iter()
                .map(|id| &inner.objects[id])
                .find(|(n, _)| n == name)
                .map(|(_, body)| body.clone())
        }

        pub fn uploads(&self) -> usize {
            self.inner.borrow().uploads
        }

        pub fn revoked(&self) -> bool {
            self.inner.borrow().revoked
        }

        pub fn fail_finds(&self, on: bool) {
            self.inner.borrow_mut().fail_finds = on;
        }

        pub fn fail_uploads(&self, on: bool) {
            self.inner.borrow_mut().fail_uploads = on;
        }
    }

    impl ObjectStore for MemoryStore {
        fn find(&self, name: &str) -> Result<Option<RemoteObject>> {
            let inner = self.inner.borrow();
            if inner.fail_finds {
                return Err(PromptzError::Store("remote lookup failed".to_string()));
            }
            let mut ids: Vec<&String> = inner.objects.keys().collect();
            ids.sort();
            Ok(ids
                .into_iter()
                .find(|id| inner.objects[*id].0 == name)
                .map(|id| RemoteObject {
                    id: id.clone(),
                    modified: None,
                }))
        }

        fn download(&self, id: &str) -> Result<Option<String>> {
            Ok(self
                .inner
                .borrow()
                .objects
                .get(id)
                .map(|(_, body)| body.clone()))
        }

        fn upload(&self, id: Option<&str>, name: &str, body: &str) -> Result<String> {
            let mut inner = self.inner.borrow_mut();
            if inner.fail_uploads {
                return Err(PromptzError::Store("remote upload failed".to_string()));
            }
            let id = match id {
                Some(id) => {
                    if !inner.objects.contains_key(id) {
                        return Err(PromptzError::Store(format!("no such object: {}", id)));
                    }
                    id.to_string()
                }
                None => {
                    inner.next_id += 1;
                    format!("obj-{}", inner.next_id)
                }
            };
            inner
                .objects
                .insert(id.clone(), (name.to_string(), body.to_string()));
            inner.uploads += 1;
            Ok(id)
        }

        fn revoke(&self) -> Result<()> {
            self.inner.borrow_mut().revoked = true;
            Ok(())
        }
    }
}
