use crate::api::PromptzApp;
use crate::commands::{CmdMessage, CmdResult, FolderInfo};
use crate::error::Result;
use crate::model::{DEFAULT_FOLDER, TRASH_FOLDER};
use crate::store::KvBackend;

pub fn run_list<B: KvBackend>(app: &PromptzApp<B>) -> Result<CmdResult> {
    let snapshot = app.repo.data();
    let folders = snapshot
        .folders
        .iter()
        .map(|name| FolderInfo {
            name: name.clone(),
            count: snapshot.prompts.iter().filter(|p| &p.category == name).count(),
            favorite: snapshot.favorite_folders.iter().any(|f| f == name),
            reserved: name == DEFAULT_FOLDER || name == TRASH_FOLDER,
        })
        .collect();
    Ok(CmdResult::default().with_folders(folders))
}

pub fn run_add<B: KvBackend>(app: &mut PromptzApp<B>, name: &str) -> Result<CmdResult> {
    app.repo.add_folder(name)?;
    app.persist()?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Folder \"{}\" created.",
        name.trim()
    )));
    Ok(result)
}

pub fn run_rename<B: KvBackend>(
    app: &mut PromptzApp<B>,
    old: &str,
    new: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if app.repo.rename_folder(old, new)? {
        app.persist()?;
        result.add_message(CmdMessage::success(format!(
            "Folder \"{}\" renamed to \"{}\".",
            old,
            new.trim()
        )));
    } else {
        result.add_message(CmdMessage::warning(format!("No folder named \"{}\".", old)));
    }
    Ok(result)
}

pub fn run_delete<B: KvBackend>(app: &mut PromptzApp<B>, name: &str) -> Result<CmdResult> {
    let now = app.now_ms();
    let mut result = CmdResult::default();
    match app.repo.delete_folder(name, now)? {
        Some(0) => {
            app.persist()?;
            result.add_message(CmdMessage::success(format!("Folder \"{}\" deleted.", name)));
        }
        Some(moved) => {
            app.persist()?;
            result.add_message(CmdMessage::success(format!(
                "Folder \"{}\" deleted; {} prompts moved to Trash.",
                name, moved
            )));
        }
        None => {
            result.add_message(CmdMessage::warning(format!("No folder named \"{}\".", name)));
        }
    }
    Ok(result)
}

pub fn run_favorite<B: KvBackend>(app: &mut PromptzApp<B>, name: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match app.repo.toggle_favorite_folder(name)? {
        Some(true) => {
            app.persist()?;
            result.add_message(CmdMessage::success(format!(
                "Marked folder as favorite: {}",
                name
            )));
        }
        Some(false) => {
            app.persist()?;
            result.add_message(CmdMessage::success(format!(
                "Removed folder favorite: {}",
                name
            )));
        }
        None if name == TRASH_FOLDER => {
            result.add_message(CmdMessage::warning(
                "The Trash folder cannot be a favorite.",
            ));
        }
        None => {
            result.add_message(CmdMessage::warning(format!("No folder named \"{}\".", name)));
        }
    }
    Ok(result)
}
