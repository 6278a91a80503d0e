use crate::api::PromptzApp;
use crate::color;
use crate::commands::{CmdMessage, CmdResult, TagInfo};
use crate::error::Result;
use crate::store::KvBackend;

pub fn run_list<B: KvBackend>(app: &PromptzApp<B>) -> Result<CmdResult> {
    let snapshot = app.repo.data();
    let tags = snapshot
        .tags
        .iter()
        .map(|name| TagInfo {
            name: name.clone(),
            color: color::tag_color(snapshot, name).to_string(),
            count: snapshot
                .prompts
                .iter()
                .filter(|p| p.tags.iter().any(|t| t == name))
                .count(),
        })
        .collect();
    Ok(CmdResult::default().with_tags(tags))
}

pub fn run_rename<B: KvBackend>(
    app: &mut PromptzApp<B>,
    old: &str,
    new: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if app.repo.rename_tag(old, new)? {
        app.persist()?;
        result.add_message(CmdMessage::success(format!(
            "Tag \"{}\" renamed to \"{}\".",
            old,
            new.trim()
        )));
    } else {
        result.add_message(CmdMessage::warning(format!(
            "Tag \"{}\" was not renamed.",
            old
        )));
    }
    Ok(result)
}

pub fn run_delete<B: KvBackend>(app: &mut PromptzApp<B>, name: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if app.repo.delete_tag(name)? {
        app.persist()?;
        result.add_message(CmdMessage::success(format!("Tag \"{}\" deleted.", name)));
    } else {
        result.add_message(CmdMessage::warning(format!("No tag named \"{}\".", name)));
    }
    Ok(result)
}

pub fn run_color<B: KvBackend>(
    app: &mut PromptzApp<B>,
    name: &str,
    color: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if app.repo.set_tag_color(name, color)? {
        app.persist()?;
        result.add_message(CmdMessage::success(format!(
            "Tag \"{}\" colored {}.",
            name, color
        )));
    } else {
        result.add_message(CmdMessage::warning(format!("No tag named \"{}\".", name)));
    }
    Ok(result)
}
