//! # Application Facade
//!
//! [`PromptzApp`] is the single entry point for every promptz operation. It
//! owns the repository, the local store and the optional sync bindings, and
//! dispatches to the command layer.
//!
//! ## Responsibilities
//!
//! - **Dispatch** to `commands/*` functions
//! - **Persistence plumbing**: every mutation is written to the local store
//!   synchronously and arms the debounced file/remote writers
//! - **Scheduling**: [`PromptzApp::fire_due`] drives the debounce timers from
//!   an injected clock; nothing in here spawns threads or sleeps
//!
//! ## What this layer does not do
//!
//! - **Business logic**: lives in `commands/*.rs` and `repo.rs`
//! - **Presentation**: results come back as [`CmdResult`] data, never as
//!   formatted output
//!
//! ## Generic over the backend
//!
//! `PromptzApp<B: KvBackend>` runs on `FsBackend` in production and
//! `MemBackend` in tests, so the whole stack is testable without touching
//! a real data directory.

use std::path::Path;

use crate::color;
use crate::commands;
use crate::config::PromptzConfig;
use crate::decide::Decider;
use crate::error::Result;
use crate::filter::ListQuery;
use crate::model::Snapshot;
use crate::repo::Repository;
use crate::selector::PromptSelector;
use crate::store::{KvBackend, LocalStore};
use crate::sync::{FileSync, ObjectStore, RemoteSync};
use crate::timer::Clock;

pub struct PromptzApp<B: KvBackend> {
    pub(crate) repo: Repository,
    pub(crate) store: LocalStore<B>,
    pub(crate) config: PromptzConfig,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) file: Option<FileSync>,
    pub(crate) remote: Option<RemoteSync>,
}

impl<B: KvBackend> PromptzApp<B> {
    /// Builds the app from a backend: loads the snapshot and re-establishes
    /// a file binding remembered from an earlier session.
    pub fn new(backend: B, config: PromptzConfig, clock: Box<dyn Clock>) -> Self {
        let store = LocalStore::new(backend);
        let repo = Repository::new(store.load());
        let file = match store.bound_file() {
            Ok(Some(path)) => {
                let mtime = store.file_mtime().unwrap_or(None);
                Some(FileSync::new(&path, mtime, config.file_debounce_ms))
            }
            Ok(None) => None,
            Err(err) => {
                log::warn!("could not read the file binding: {}", err);
                None
            }
        };
        Self {
            repo,
            store,
            config,
            clock,
            file,
            remote: None,
        }
    }

    /// Attach a remote drive, adopting the object id remembered from an
    /// earlier session.
    pub fn attach_remote(&mut self, store: Box<dyn ObjectStore>) {
        let remembered = self.store.remote_file_id().unwrap_or(None);
        self.remote = Some(RemoteSync::new(
            store,
            &self.config.remote_file,
            remembered,
            self.config.remote_debounce_ms,
        ));
    }

    pub fn config(&self) -> &PromptzConfig {
        &self.config
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// The bearer token stored by an earlier `remote connect`, if any.
    pub fn stored_token(&self) -> Option<String> {
        self.store.token().unwrap_or(None)
    }

    /// Remember the bearer token for later sessions.
    pub fn save_token(&mut self, token: &str) -> Result<()> {
        self.store.set_token(token)
    }

    pub fn has_file_binding(&self) -> bool {
        self.file.is_some()
    }

    pub fn tag_color(&self, name: &str) -> &str {
        color::tag_color(self.repo.data(), name)
    }

    // --- Persistence plumbing ---

    /// Store the snapshot and arm the debounced file write and remote
    /// autosave. Every mutating command ends here.
    pub(crate) fn persist(&mut self) -> Result<()> {
        self.store.save(self.repo.data())?;
        let now = self.now_ms();
        if let Some(file) = self.file.as_mut() {
            file.request_write(now);
        }
        if let Some(remote) = self.remote.as_mut() {
            remote.request_autosave(now);
        }
        Ok(())
    }

    /// Store the snapshot without arming anything. Used when the data came
    /// from a sync source and echoing it straight back would be noise.
    pub(crate) fn persist_quiet(&mut self) -> Result<()> {
        self.store.save(self.repo.data())
    }

    /// Replace the working snapshot with externally-sourced data, applying
    /// the same normalization the loader does.
    pub(crate) fn apply_snapshot(&mut self, mut snapshot: Snapshot) {
        snapshot.ensure_reserved();
        snapshot.cleanup_tags();
        snapshot.sort_tags();
        self.repo.replace(snapshot);
    }

    /// Mirror the adapter's remembered object id into the session store.
    pub(crate) fn remember_remote_id(&mut self) -> Result<()> {
        let id = self
            .remote
            .as_ref()
            .and_then(|r| r.remembered_id().map(str::to_string));
        match id {
            Some(id) => self.store.set_remote_file_id(&id),
            None => self.store.clear_remote_file_id(),
        }
    }

    /// Write the snapshot to the bound file. When the write fails, the data
    /// is dumped to a timestamped backup in the data dir instead, so a lost
    /// binding never loses records.
    pub(crate) fn write_file_now(&mut self) -> Vec<CmdMessage> {
        let mut messages = Vec::new();
        let now = self.now_ms();
        let snapshot = self.repo.data().clone();
        let file = match self.file.as_mut() {
            Some(file) => file,
            None => return messages,
        };
        let path = file.path().display().to_string();
        match file.write(&snapshot) {
            Ok(mtime) => {
                if let Err(err) = self.store.set_file_mtime(mtime) {
                    log::warn!("could not persist the file mtime: {}", err);
                }
                messages.push(CmdMessage::success(format!("Saved to {}", path)));
            }
            Err(err) => {
                let backup = format!("promptz-backup-{}.json", now);
                let fallback = snapshot
                    .to_json_pretty()
                    .and_then(|body| self.store.write_backup(&backup, &body));
                match fallback {
                    Ok(()) => messages.push(CmdMessage::warning(format!(
                        "Could not write {}: {}. Saved a backup to {} in the data dir instead.",
                        path, err, backup
                    ))),
                    Err(fallback_err) => messages.push(CmdMessage::error(format!(
                        "Could not write {} ({}) or a fallback backup ({})",
                        path, err, fallback_err
                    ))),
                }
            }
        }
        messages
    }

    // --- Scheduling ---

    /// Fire any debounce deadline that has passed. Returns the messages the
    /// flushes produced; the caller decides how to show them.
    pub fn fire_due(&mut self, now_ms: i64, decider: &mut dyn Decider) -> Vec<CmdMessage> {
        let mut messages = Vec::new();
        let file_due = self
            .file
            .as_mut()
            .map(|f| f.write_due(now_ms))
            .unwrap_or(false);
        if file_due {
            messages.extend(self.write_file_now());
        }

        let autosave_due = self
            .remote
            .as_mut()
            .map(|r| r.autosave_due(now_ms))
            .unwrap_or(false);
        if autosave_due {
            match commands::remote::run_sync(self, decider) {
                Ok(result) => messages.extend(result.messages),
                Err(err) => {
                    messages.push(CmdMessage::warning(format!("Remote autosave failed: {}", err)))
                }
            }
        }
        messages
    }

    /// Flush pending debounces immediately, due or not. Called before the
    /// process exits so a short-lived CLI invocation never drops a write.
    pub fn flush_pending(&mut self, decider: &mut dyn Decider) -> Vec<CmdMessage> {
        let mut messages = Vec::new();
        if self
            .file
            .as_mut()
            .map(|f| f.flush_now())
            .unwrap_or(false)
        {
            messages.extend(self.write_file_now());
        }
        if self
            .remote
            .as_mut()
            .map(|r| r.flush_now())
            .unwrap_or(false)
        {
            match commands::remote::run_sync(self, decider) {
                Ok(result) => messages.extend(result.messages),
                Err(err) => {
                    messages.push(CmdMessage::warning(format!("Remote autosave failed: {}", err)))
                }
            }
        }
        messages
    }

    pub fn anything_pending(&self) -> bool {
        self.file.as_ref().map(|f| f.write_pending()).unwrap_or(false)
            || self
                .remote
                .as_ref()
                .map(|r| r.autosave_pending())
                .unwrap_or(false)
    }

    // --- Prompt operations ---

    pub fn create_prompt(&mut self, fields: NewPrompt) -> Result<CmdResult> {
        commands::create::run(self, fields)
    }

    pub fn list_prompts(&self, query: &ListQuery) -> Result<CmdResult> {
        commands::list::run(self, query)
    }

    pub fn view_prompts<I: AsRef<str>>(&self, selectors: &[I]) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::view::run(self, &selectors)
    }

    pub fn update_prompt<I: AsRef<str>>(
        &mut self,
        selector: I,
        patch: PromptPatch,
    ) -> Result<CmdResult> {
        let selector = selector.as_ref().parse()?;
        commands::update::run(self, &selector, patch)
    }

    pub fn delete_prompts<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::delete::run(self, &selectors)
    }

    pub fn restore_prompts<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::delete::run_restore(self, &selectors)
    }

    pub fn duplicate_prompt<I: AsRef<str>>(&mut self, selector: I) -> Result<CmdResult> {
        let selector = selector.as_ref().parse()?;
        commands::duplicate::run(self, &selector)
    }

    pub fn favorite_prompts<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::favorite::run(self, &selectors)
    }

    pub fn move_prompts<I: AsRef<str>>(
        &mut self,
        selectors: &[I],
        folder: &str,
    ) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::mv::run(self, &selectors, folder)
    }

    pub fn purge_prompts<I: AsRef<str>>(
        &mut self,
        selectors: &[I],
        decider: &mut dyn Decider,
        skip_confirm: bool,
    ) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::purge::run(self, &selectors, decider, skip_confirm)
    }

    pub fn export_prompts(&self, format: ExportFormat, out: Option<&Path>) -> Result<CmdResult> {
        commands::export::run(self, format, out)
    }

    pub fn import_backup(
        &mut self,
        path: &Path,
        decider: &mut dyn Decider,
        skip_confirm: bool,
    ) -> Result<CmdResult> {
        commands::import::run(self, path, decider, skip_confirm)
    }

    // --- Folder operations ---

    pub fn list_folders(&self) -> Result<CmdResult> {
        commands::folders::run_list(self)
    }

    pub fn add_folder(&mut self, name: &str) -> Result<CmdResult> {
        commands::folders::run_add(self, name)
    }

    pub fn rename_folder(&mut self, old: &str, new: &str) -> Result<CmdResult> {
        commands::folders::run_rename(self, old, new)
    }

    pub fn delete_folder(&mut self, name: &str) -> Result<CmdResult> {
        commands::folders::run_delete(self, name)
    }

    pub fn favorite_folder(&mut self, name: &str) -> Result<CmdResult> {
        commands::folders::run_favorite(self, name)
    }

    // --- Tag operations ---

    pub fn list_tags(&self) -> Result<CmdResult> {
        commands::tags::run_list(self)
    }

    pub fn rename_tag(&mut self, old: &str, new: &str) -> Result<CmdResult> {
        commands::tags::run_rename(self, old, new)
    }

    pub fn delete_tag(&mut self, name: &str) -> Result<CmdResult> {
        commands::tags::run_delete(self, name)
    }

    pub fn color_tag(&mut self, name: &str, color: &str) -> Result<CmdResult> {
        commands::tags::run_color(self, name, color)
    }

    // --- File binding ---

    pub fn bind_file(&mut self, path: &Path) -> Result<CmdResult> {
        commands::file::run_bind(self, path)
    }

    pub fn create_file(
        &mut self,
        path: &Path,
        decider: &mut dyn Decider,
        skip_confirm: bool,
    ) -> Result<CmdResult> {
        commands::file::run_create(self, path, decider, skip_confirm)
    }

    pub fn save_file(&mut self) -> Result<CmdResult> {
        commands::file::run_save(self)
    }

    pub fn check_file(&mut self, decider: &mut dyn Decider) -> Result<CmdResult> {
        commands::file::run_check(self, decider)
    }

    pub fn unbind_file(&mut self) -> Result<CmdResult> {
        commands::file::run_unbind(self)
    }

    pub fn file_status(&self) -> Result<CmdResult> {
        commands::file::run_status(self)
    }

    // --- Remote binding ---

    pub fn connect_remote(&mut self, decider: &mut dyn Decider) -> Result<CmdResult> {
        commands::remote::run_connect(self, decider)
    }

    pub fn load_remote(&mut self, decider: &mut dyn Decider) -> Result<CmdResult> {
        commands::remote::run_load(self, decider)
    }

    pub fn sync_remote(&mut self, decider: &mut dyn Decider) -> Result<CmdResult> {
        commands::remote::run_sync(self, decider)
    }

    pub fn disconnect_remote(&mut self) -> Result<CmdResult> {
        commands::remote::run_disconnect(self)
    }

    pub fn remote_status(&self) -> Result<CmdResult> {
        commands::remote::run_status(self)
    }
}

fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<PromptSelector>> {
    inputs.iter().map(|s| s.as_ref().parse()).collect()
}

pub use crate::commands::export::ExportFormat;
pub use crate::commands::{CmdMessage, CmdResult, FolderInfo, ListedPrompt, MessageLevel, TagInfo};
pub use crate::repo::{NewPrompt, PromptPatch};

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::store::MemBackend;
    use crate::timer::ManualClock;

    /// App over a memory backend with a manual clock. The returned clock
    /// handle shares the instant the app reads.
    pub fn test_app() -> (PromptzApp<MemBackend>, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let app = PromptzApp::new(
            MemBackend::default(),
            PromptzConfig::default(),
            Box::new(clock.clone()),
        );
        (app, clock)
    }
}
