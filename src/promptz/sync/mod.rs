//! # Sync Adapters
//!
//! Two optional backends mirror the local snapshot: a bound file on disk
//! ([`file::FileSync`]) and a named object on an authenticated remote drive
//! ([`remote::RemoteSync`]). Both coalesce writes behind debounce timers and
//! route every conflict through an explicit user choice; neither silently
//! discards data in either direction. [`merge::merge_snapshots`] is the
//! shared reconciliation primitive.

pub mod file;
pub mod http;
pub mod merge;
pub mod object;
pub mod remote;

pub use file::{FileSync, FileSyncStatus};
pub use http::HttpStore;
pub use merge::{merge_snapshots, MergeOutcome};
pub use object::{ObjectStore, RemoteObject};
pub use remote::RemoteSync;
