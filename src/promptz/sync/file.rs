//! File binding: full-file JSON reads and writes against one path, with
//! change detection by modification time. The adapter never overwrites in
//! either direction on its own; a newer file on disk is reported and the
//! caller routes the reload-or-keep decision to the user.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::error::{PromptzError, Result};
use crate::model::Snapshot;
use crate::timer::Debounce;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSyncStatus {
    /// File present and no newer than what was last applied.
    Connected,
    /// File changed on disk and the user chose to keep local data.
    PendingSync,
    /// File missing or unreadable; operations no-op until it comes back.
    Lost,
}

impl fmt::Display for FileSyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSyncStatus::Connected => write!(f, "connected"),
            FileSyncStatus::PendingSync => write!(f, "pending sync"),
            FileSyncStatus::Lost => write!(f, "disconnected (file missing)"),
        }
    }
}

/// Modification time of a path in epoch milliseconds.
pub fn mtime_ms(path: &Path) -> Result<i64> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(PromptzError::Io)?;
    let ms = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    Ok(ms)
}

pub struct FileSync {
    path: PathBuf,
    /// Mtime of the last read or write this app performed.
    last_mtime_ms: Option<i64>,
    /// Mtime the user declined to reload; suppresses repeat prompts while
    /// watching. Not persisted, so a fresh session asks again.
    declined_mtime_ms: Option<i64>,
    debounce: Debounce,
}

impl FileSync {
    pub fn new<P: AsRef<Path>>(path: P, last_mtime_ms: Option<i64>, debounce_ms: i64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            last_mtime_ms,
            declined_mtime_ms: None,
            debounce: Debounce::new(debounce_ms),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_mtime_ms(&self) -> Option<i64> {
        self.last_mtime_ms
    }

    /// Read and validate the whole file. On success the file's mtime becomes
    /// the new baseline.
    pub fn read(&mut self) -> Result<(Snapshot, i64)> {
        let text = fs::read_to_string(&self.path).map_err(PromptzError::Io)?;
        let snapshot = Snapshot::parse_validated(&text)?;
        let mtime = mtime_ms(&self.path)?;
        self.last_mtime_ms = Some(mtime);
        self.declined_mtime_ms = None;
        Ok((snapshot, mtime))
    }

    /// Overwrite the whole file with the snapshot, pretty-printed.
    pub fn write(&mut self, snapshot: &Snapshot) -> Result<i64> {
        fs::write(&self.path, snapshot.to_json_pretty()?).map_err(PromptzError::Io)?;
        let mtime = mtime_ms(&self.path)?;
        self.last_mtime_ms = Some(mtime);
        self.declined_mtime_ms = None;
        Ok(mtime)
    }

    /// Some(mtime) when the file is strictly newer than the baseline and the
    /// user has not already declined this exact version.
    pub fn check_changed(&self) -> Result<Option<i64>> {
        let current = mtime_ms(&self.path)?;
        let changed = match self.last_mtime_ms {
            Some(last) => current > last,
            None => true,
        };
        if changed && self.declined_mtime_ms != Some(current) {
            Ok(Some(current))
        } else {
            Ok(None)
        }
    }

    /// Remember a declined reload so watch mode stops asking about it.
    pub fn decline(&mut self, mtime_ms: i64) {
        self.declined_mtime_ms = Some(mtime_ms);
    }

    pub fn status(&self) -> FileSyncStatus {
        match mtime_ms(&self.path) {
            Err(_) => FileSyncStatus::Lost,
            Ok(current) => match self.last_mtime_ms {
                Some(last) if current > last => FileSyncStatus::PendingSync,
                _ => FileSyncStatus::Connected,
            },
        }
    }

    // --- Debounced write scheduling ---

    pub fn request_write(&mut self, now_ms: i64) {
        self.debounce.arm(now_ms);
    }

    pub fn write_due(&mut self, now_ms: i64) -> bool {
        self.debounce.fire_if_due(now_ms)
    }

    pub fn write_pending(&self) -> bool {
        self.debounce.is_armed()
    }

    pub fn flush_now(&mut self) -> bool {
        self.debounce.fire_now()
    }

    pub fn cancel_write(&mut self) {
        self.debounce.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_db(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    fn valid_body() -> String {
        let mut snapshot = Snapshot::default();
        snapshot.ensure_reserved();
        snapshot.to_json_pretty().unwrap()
    }

    #[test]
    fn read_validates_and_sets_the_baseline() {
        let dir = TempDir::new().unwrap();
        let path = write_db(&dir, "db.json", &valid_body());
        let mut sync = FileSync::new(&path, None, 2000);

        let (snapshot, mtime) = sync.read().unwrap();
        assert!(snapshot.folders.iter().any(|f| f == "General"));
        assert_eq!(sync.last_mtime_ms(), Some(mtime));
        assert_eq!(sync.check_changed().unwrap(), None);
    }

    #[test]
    fn read_rejects_invalid_content() {
        let dir = TempDir::new().unwrap();
        let path = write_db(&dir, "db.json", r#"{"folders": [], "tags": []}"#);
        let mut sync = FileSync::new(&path, None, 2000);
        assert!(sync.read().is_err());
    }

    #[test]
    fn change_detection_is_strictly_newer() {
        let dir = TempDir::new().unwrap();
        let path = write_db(&dir, "db.json", &valid_body());
        let current = mtime_ms(&path).unwrap();

        // Baseline equals the file: unchanged.
        let sync = FileSync::new(&path, Some(current), 2000);
        assert_eq!(sync.check_changed().unwrap(), None);
        assert_eq!(sync.status(), FileSyncStatus::Connected);

        // Baseline older than the file: changed.
        let sync = FileSync::new(&path, Some(current - 10), 2000);
        assert_eq!(sync.check_changed().unwrap(), Some(current));
        assert_eq!(sync.status(), FileSyncStatus::PendingSync);

        // No baseline at all counts as changed.
        let sync = FileSync::new(&path, None, 2000);
        assert_eq!(sync.check_changed().unwrap(), Some(current));
    }

    #[test]
    fn declined_version_stops_prompting_until_it_changes_again() {
        let dir = TempDir::new().unwrap();
        let path = write_db(&dir, "db.json", &valid_body());
        let current = mtime_ms(&path).unwrap();

        let mut sync = FileSync::new(&path, Some(current - 10), 2000);
        assert_eq!(sync.check_changed().unwrap(), Some(current));
        sync.decline(current);
        assert_eq!(sync.check_changed().unwrap(), None);
        // Still flagged for status purposes.
        assert_eq!(sync.status(), FileSyncStatus::PendingSync);
    }

    #[test]
    fn write_resets_decline_and_baseline() {
        let dir = TempDir::new().unwrap();
        let path = write_db(&dir, "db.json", &valid_body());
        let mut sync = FileSync::new(&path, Some(0), 2000);
        sync.decline(mtime_ms(&path).unwrap());

        let mut snapshot = Snapshot::default();
        snapshot.ensure_reserved();
        let mtime = sync.write(&snapshot).unwrap();
        assert_eq!(sync.last_mtime_ms(), Some(mtime));
        assert_eq!(sync.check_changed().unwrap(), None);
        assert_eq!(sync.status(), FileSyncStatus::Connected);
    }

    #[test]
    fn missing_file_reports_lost() {
        let dir = TempDir::new().unwrap();
        let sync = FileSync::new(dir.path().join("gone.json"), Some(1), 2000);
        assert_eq!(sync.status(), FileSyncStatus::Lost);
        assert!(sync.check_changed().is_err());
    }

    #[test]
    fn debounce_plumbing() {
        let dir = TempDir::new().unwrap();
        let path = write_db(&dir, "db.json", &valid_body());
        let mut sync = FileSync::new(&path, None, 2000);

        assert!(!sync.write_pending());
        sync.request_write(1000);
        assert!(sync.write_pending());
        assert!(!sync.write_due(2999));
        // Re-arming pushes the deadline out.
        sync.request_write(2000);
        assert!(!sync.write_due(3999));
        assert!(sync.write_due(4000));
        assert!(!sync.write_pending());
    }
}
