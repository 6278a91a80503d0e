use crate::api::PromptzApp;
use crate::commands::{CmdMessage, CmdResult};
use crate::decide::{ConnectChoice, Decider, SaveChoice};
use crate::error::Result;
use crate::model::Snapshot;
use crate::store::KvBackend;
use crate::sync::merge_snapshots;

/// Connect flow: fetch the remote object, validate it, then route the
/// load/merge/keep choice. Also runs for an explicit `remote load`.
pub fn run_connect<B: KvBackend>(
    app: &mut PromptzApp<B>,
    decider: &mut dyn Decider,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if app.remote.is_none() {
        result.add_message(CmdMessage::warning("No remote is attached."));
        return Ok(result);
    }
    result.add_message(CmdMessage::success("Connected to remote drive."));
    load_flow(app, decider, &mut result)?;
    app.remember_remote_id()?;
    Ok(result)
}

pub fn run_load<B: KvBackend>(
    app: &mut PromptzApp<B>,
    decider: &mut dyn Decider,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    load_flow(app, decider, &mut result)?;
    app.remember_remote_id()?;
    Ok(result)
}

/// Save current data to the remote, guarded against clobbering a remote
/// that holds much more than local does.
pub fn run_sync<B: KvBackend>(
    app: &mut PromptzApp<B>,
    decider: &mut dyn Decider,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let fetched = match app.remote.as_mut() {
        Some(remote) => remote.fetch(),
        None => {
            result.add_message(CmdMessage::warning("No remote is attached."));
            return Ok(result);
        }
    };

    let body = match fetched {
        Ok(body) => body,
        Err(err) => {
            result.add_message(CmdMessage::warning(format!(
                "Could not reach the remote; save aborted. {}",
                err
            )));
            return Ok(result);
        }
    };

    match body {
        None => upload_current(app, &mut result)?,
        Some(body) => match Snapshot::parse_validated(&body) {
            Err(_) => {
                result.add_message(CmdMessage::warning(
                    "Remote contains invalid data; overwriting.",
                ));
                upload_current(app, &mut result)?;
            }
            Ok(remote_snapshot) => {
                let local = app.repo.prompt_count();
                let remote_count = remote_snapshot.prompts.len();
                if local == 0 || local * 2 < remote_count {
                    match decider.save_choice(local, remote_count) {
                        SaveChoice::Overwrite => upload_current(app, &mut result)?,
                        SaveChoice::Merge => {
                            let outcome = merge_snapshots(app.repo.data(), &remote_snapshot);
                            let added = outcome.added;
                            apply_remote(app, outcome.snapshot)?;
                            result.add_message(CmdMessage::success(format!(
                                "Merged remote data: {} prompts added.",
                                added
                            )));
                            upload_current(app, &mut result)?;
                        }
                        SaveChoice::Cancel => {
                            if let Some(remote) = app.remote.as_mut() {
                                remote.cancel_autosave();
                            }
                            result.add_message(CmdMessage::info("Operation cancelled."));
                        }
                    }
                } else {
                    upload_current(app, &mut result)?;
                }
            }
        },
    }

    app.remember_remote_id()?;
    Ok(result)
}

pub fn run_disconnect<B: KvBackend>(app: &mut PromptzApp<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match app.remote.take() {
        None => {
            result.add_message(CmdMessage::warning("No remote is attached."));
        }
        Some(remote) => {
            // Best effort: a failed revoke still tears the binding down.
            if let Err(err) = remote.revoke() {
                log::warn!("token revoke failed: {}", err);
            }
            app.store.clear_token()?;
            app.store.clear_remote_file_id()?;
            result.add_message(CmdMessage::success("Remote disconnected."));
        }
    }
    Ok(result)
}

/// Local view of the binding; never touches the network.
pub fn run_status<B: KvBackend>(app: &PromptzApp<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match &app.remote {
        None => result.add_message(CmdMessage::info("No remote is attached.")),
        Some(remote) => {
            let line = match remote.remembered_id() {
                Some(id) => format!("Remote: {} (object id {})", remote.file_name(), id),
                None => format!("Remote: {} (no object yet)", remote.file_name()),
            };
            result.add_message(CmdMessage::info(line));
            if remote.autosave_pending() {
                result.add_message(CmdMessage::info("A debounced autosave is pending."));
            }
        }
    }
    Ok(result)
}

fn load_flow<B: KvBackend>(
    app: &mut PromptzApp<B>,
    decider: &mut dyn Decider,
    result: &mut CmdResult,
) -> Result<()> {
    let (file_name, body) = {
        let remote = match app.remote.as_mut() {
            Some(remote) => remote,
            None => {
                result.add_message(CmdMessage::warning("No remote is attached."));
                return Ok(());
            }
        };
        (remote.file_name().to_string(), remote.fetch()?)
    };

    let body = match body {
        Some(body) => body,
        None => {
            result.add_message(CmdMessage::info(format!(
                "No remote database found under \"{}\"; it will be created on the first save.",
                file_name
            )));
            return Ok(());
        }
    };

    let snapshot = match Snapshot::parse_validated(&body) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            result.add_message(CmdMessage::error(format!(
                "Remote data is invalid; keeping local data. {}",
                err
            )));
            return Ok(());
        }
    };

    let local = app.repo.prompt_count();
    let remote_count = snapshot.prompts.len();
    match decider.connect_choice(local, remote_count) {
        ConnectChoice::LoadRemote => {
            apply_remote(app, snapshot)?;
            result.add_message(CmdMessage::success(format!(
                "Loaded {} prompts from remote.",
                remote_count
            )));
        }
        ConnectChoice::Merge => {
            let outcome = merge_snapshots(app.repo.data(), &snapshot);
            let added = outcome.added;
            apply_remote(app, outcome.snapshot)?;
            result.add_message(CmdMessage::success(format!(
                "Merged remote data: {} prompts added.",
                added
            )));
            upload_current(app, result)?;
        }
        ConnectChoice::KeepLocal => {
            result.add_message(CmdMessage::info("Keeping local data."));
        }
    }
    Ok(())
}

/// Replace local data with remote-derived content, suppressing the autosave
/// the persistence would otherwise arm.
fn apply_remote<B: KvBackend>(app: &mut PromptzApp<B>, snapshot: Snapshot) -> Result<()> {
    if let Some(remote) = app.remote.as_mut() {
        remote.begin_loading();
    }
    app.apply_snapshot(snapshot);
    let persisted = app.persist_quiet();
    if let Some(remote) = app.remote.as_mut() {
        remote.end_loading();
    }
    persisted
}

fn upload_current<B: KvBackend>(app: &mut PromptzApp<B>, result: &mut CmdResult) -> Result<()> {
    let body = serde_json::to_string(app.repo.data())?;
    if let Some(remote) = app.remote.as_mut() {
        remote.save(&body)?;
        result.add_message(CmdMessage::success(format!(
            "Saved to remote \"{}\".",
            remote.file_name()
        )));
    }
    Ok(())
}
