use std::path::Path;

use crate::api::PromptzApp;
use crate::commands::{CmdMessage, CmdResult};
use crate::decide::{Decider, FileChangeChoice};
use crate::error::Result;
use crate::store::KvBackend;
use crate::sync::{FileSync, FileSyncStatus};

/// Bind to an existing database file. Its content replaces local data, so
/// the file is validated before anything is touched.
pub fn run_bind<B: KvBackend>(app: &mut PromptzApp<B>, path: &Path) -> Result<CmdResult> {
    let mut sync = FileSync::new(path, None, app.config.file_debounce_ms);
    let (snapshot, mtime) = sync.read()?;
    let count = snapshot.prompts.len();

    app.apply_snapshot(snapshot);
    app.persist_quiet()?;
    app.store.bind_file(&path.to_string_lossy())?;
    app.store.set_file_mtime(mtime)?;
    app.file = Some(sync);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Loaded {} prompts from {}",
        count,
        path.display()
    )));
    Ok(result)
}

/// Create (or overwrite) a database file from current data and bind to it.
pub fn run_create<B: KvBackend>(
    app: &mut PromptzApp<B>,
    path: &Path,
    decider: &mut dyn Decider,
    skip_confirm: bool,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if path.exists()
        && !skip_confirm
        && !decider.confirm(&format!(
            "File \"{}\" already exists. Overwrite it?",
            path.display()
        ))
    {
        result.add_message(CmdMessage::info("Operation cancelled."));
        return Ok(result);
    }

    let mut sync = FileSync::new(path, None, app.config.file_debounce_ms);
    let mtime = sync.write(app.repo.data())?;
    app.store.bind_file(&path.to_string_lossy())?;
    app.store.set_file_mtime(mtime)?;
    app.file = Some(sync);

    result.add_message(CmdMessage::success(format!(
        "Saved {} prompts to {}",
        app.repo.prompt_count(),
        path.display()
    )));
    Ok(result)
}

/// Flush current data to the bound file right now, superseding any pending
/// debounced write.
pub fn run_save<B: KvBackend>(app: &mut PromptzApp<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if let Some(file) = app.file.as_mut() {
        file.cancel_write();
    } else {
        result.add_message(CmdMessage::warning("No file is bound."));
        return Ok(result);
    }
    for message in app.write_file_now() {
        result.add_message(message);
    }
    Ok(result)
}

/// One poll of the bound file. A newer file is routed through the decider;
/// keeping local data leaves the binding pending until the file changes
/// again or we write over it.
pub fn run_check<B: KvBackend>(
    app: &mut PromptzApp<B>,
    decider: &mut dyn Decider,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let file = match app.file.as_mut() {
        Some(file) => file,
        None => {
            result.add_message(CmdMessage::warning("No file is bound."));
            return Ok(result);
        }
    };

    match file.check_changed() {
        Err(_) => {
            result.add_message(CmdMessage::warning(format!(
                "Bound file \"{}\" is missing.",
                file.path().display()
            )));
        }
        Ok(None) => {
            result.add_message(CmdMessage::info("File is unchanged."));
        }
        Ok(Some(mtime)) => {
            let display = file.path().display().to_string();
            match decider.file_change(&display) {
                FileChangeChoice::Reload => {
                    let (snapshot, new_mtime) = file.read()?;
                    let count = snapshot.prompts.len();
                    app.apply_snapshot(snapshot);
                    app.persist_quiet()?;
                    app.store.set_file_mtime(new_mtime)?;
                    result.add_message(CmdMessage::success(format!(
                        "Reloaded {} prompts from {}",
                        count, display
                    )));
                }
                FileChangeChoice::Keep => {
                    file.decline(mtime);
                    result.add_message(CmdMessage::warning(
                        "Keeping local data; the file stays pending sync.",
                    ));
                }
            }
        }
    }
    Ok(result)
}

pub fn run_unbind<B: KvBackend>(app: &mut PromptzApp<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if app.file.is_none() {
        result.add_message(CmdMessage::warning("No file is bound."));
        return Ok(result);
    }
    app.file = None;
    app.store.unbind_file()?;
    result.add_message(CmdMessage::success("File unbound."));
    Ok(result)
}

pub fn run_status<B: KvBackend>(app: &PromptzApp<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match &app.file {
        None => result.add_message(CmdMessage::info("No file is bound.")),
        Some(file) => {
            let status = file.status();
            let line = format!("File: {} ({})", file.path().display(), status);
            match status {
                FileSyncStatus::Connected => result.add_message(CmdMessage::info(line)),
                FileSyncStatus::PendingSync => result.add_message(CmdMessage::warning(line)),
                FileSyncStatus::Lost => result.add_message(CmdMessage::error(line)),
            }
            if file.write_pending() {
                result.add_message(CmdMessage::info("A debounced write is pending."));
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::test_app;
    use crate::commands::create;
    use crate::decide::fixtures::ScriptedDecider;
    use crate::model::Snapshot;
    use crate::repo::NewPrompt;
    use crate::sync::file::mtime_ms;
    use std::fs;
    use tempfile::TempDir;

    fn db_body(content: &str) -> String {
        format!(
            r#"{{"prompts":[{{"id":1,"content":"{}"}}],"folders":["Work"],"tags":[]}}"#,
            content
        )
    }

    #[test]
    fn bind_replaces_local_data_and_remembers_the_file() {
        let (mut app, _clock) = test_app();
        create::run(
            &mut app,
            NewPrompt {
                content: "mine".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, db_body("theirs")).unwrap();

        let result = run_bind(&mut app, &path).unwrap();
        assert!(result.messages[0].content.starts_with("Loaded 1 prompts"));
        assert_eq!(app.repo.data().prompts[0].content, "theirs");
        assert_eq!(app.store.bound_file().unwrap(), Some(path.clone()));
        assert_eq!(app.store.file_mtime().unwrap(), Some(mtime_ms(&path).unwrap()));
        // Binding does not arm the debounced writer.
        assert!(!app.file.as_ref().unwrap().write_pending());
    }

    #[test]
    fn bind_refuses_invalid_files_untouched() {
        let (mut app, _clock) = test_app();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "{").unwrap();

        assert!(run_bind(&mut app, &path).is_err());
        assert!(app.file.is_none());
        assert_eq!(app.store.bound_file().unwrap(), None);
    }

    #[test]
    fn create_writes_and_binds_a_new_file() {
        let (mut app, _clock) = test_app();
        create::run(
            &mut app,
            NewPrompt {
                content: "mine".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.json");
        let mut decider = ScriptedDecider::new();
        run_create(&mut app, &path, &mut decider, false).unwrap();

        let written = Snapshot::parse_validated(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.prompts[0].content, "mine");
        assert!(app.file.is_some());
    }

    #[test]
    fn create_over_an_existing_file_needs_confirmation() {
        let (mut app, _clock) = test_app();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "old").unwrap();

        let mut decider = ScriptedDecider::new().on_confirm(false);
        let result = run_create(&mut app, &path, &mut decider, false).unwrap();
        assert_eq!(result.messages[0].content, "Operation cancelled.");
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");

        let mut decider = ScriptedDecider::new().on_confirm(true);
        run_create(&mut app, &path, &mut decider, false).unwrap();
        assert!(Snapshot::parse_validated(&fs::read_to_string(&path).unwrap()).is_ok());
    }

    #[test]
    fn save_flushes_current_data_to_the_bound_file() {
        let (mut app, _clock) = test_app();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, db_body("start")).unwrap();
        run_bind(&mut app, &path).unwrap();

        create::run(
            &mut app,
            NewPrompt {
                content: "added".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        let result = run_save(&mut app).unwrap();
        assert!(result.messages[0].content.starts_with("Saved to"));

        let written = Snapshot::parse_validated(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.prompts.len(), 2);
        assert!(!app.file.as_ref().unwrap().write_pending());
    }

    #[test]
    fn save_without_a_binding_warns() {
        let (mut app, _clock) = test_app();
        let result = run_save(&mut app).unwrap();
        assert_eq!(result.messages[0].content, "No file is bound.");
    }

    #[test]
    fn check_reloads_when_the_user_accepts() {
        let (mut app, _clock) = test_app();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, db_body("external")).unwrap();

        // A stale baseline stands in for an external edit.
        let baseline = mtime_ms(&path).unwrap() - 10;
        app.file = Some(FileSync::new(&path, Some(baseline), 2000));
        app.store.bind_file(&path.to_string_lossy()).unwrap();

        let mut decider =
            ScriptedDecider::new().on_file_change(FileChangeChoice::Reload);
        let result = run_check(&mut app, &mut decider).unwrap();
        assert!(result.messages[0].content.starts_with("Reloaded 1 prompts"));
        assert_eq!(app.repo.data().prompts[0].content, "external");
        assert_eq!(app.file.as_ref().unwrap().status(), FileSyncStatus::Connected);
    }

    #[test]
    fn check_keep_declines_and_stops_reasking() {
        let (mut app, _clock) = test_app();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, db_body("external")).unwrap();

        let baseline = mtime_ms(&path).unwrap() - 10;
        app.file = Some(FileSync::new(&path, Some(baseline), 2000));

        let mut decider = ScriptedDecider::new().on_file_change(FileChangeChoice::Keep);
        let result = run_check(&mut app, &mut decider).unwrap();
        assert!(result.messages[0].content.starts_with("Keeping local data"));
        assert_eq!(app.repo.prompt_count(), 0);

        // The declined version is not offered again.
        let mut decider = ScriptedDecider::new();
        let result = run_check(&mut app, &mut decider).unwrap();
        assert_eq!(result.messages[0].content, "File is unchanged.");
        assert_eq!(app.file.as_ref().unwrap().status(), FileSyncStatus::PendingSync);
    }

    #[test]
    fn unbind_clears_the_session_binding() {
        let (mut app, _clock) = test_app();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, db_body("x")).unwrap();
        run_bind(&mut app, &path).unwrap();

        run_unbind(&mut app).unwrap();
        assert!(app.file.is_none());
        assert_eq!(app.store.bound_file().unwrap(), None);
        assert_eq!(app.store.file_mtime().unwrap(), None);
    }

    #[test]
    fn status_reports_each_state() {
        let (mut app, _clock) = test_app();
        let result = run_status(&app).unwrap();
        assert_eq!(result.messages[0].content, "No file is bound.");

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, db_body("x")).unwrap();
        run_bind(&mut app, &path).unwrap();
        let result = run_status(&app).unwrap();
        assert!(result.messages[0].content.ends_with("(connected)"));

        fs::remove_file(&path).unwrap();
        let result = run_status(&app).unwrap();
        assert!(result.messages[0]
            .content
            .ends_with("(disconnected (file missing))"));
    }
}
