use crate::api::PromptzApp;
use crate::commands::{CmdMessage, CmdResult};
use crate::decide::Decider;
use crate::error::Result;
use crate::selector::PromptSelector;
use crate::store::KvBackend;

use super::helpers::{label_for, resolve_all};

/// Permanent removal. Without selectors, targets every prompt whose Trash
/// retention has run out; with selectors, exactly the named prompts.
pub fn run<B: KvBackend>(
    app: &mut PromptzApp<B>,
    selectors: &[PromptSelector],
    decider: &mut dyn Decider,
    skip_confirm: bool,
) -> Result<CmdResult> {
    let (targets, question): (Vec<(String, i64)>, String) = if selectors.is_empty() {
        let now = app.now_ms();
        let retention = app.config.trash_retention_ms();
        let ids: Vec<i64> = app
            .repo
            .expired(now, retention)
            .into_iter()
            .map(|p| p.id)
            .collect();
        let targets: Vec<(String, i64)> =
            ids.into_iter().map(|id| (label_for(app, id), id)).collect();
        let question = format!(
            "Cleanup: {} expired prompts in Trash. Delete permanently?",
            targets.len()
        );
        (targets, question)
    } else {
        let targets: Vec<(String, i64)> = resolve_all(app, selectors)?
            .into_iter()
            .map(|(selector, id)| (selector.to_string(), id))
            .collect();
        let question = format!("Permanently delete {} prompts from Trash?", targets.len());
        (targets, question)
    };

    let mut result = CmdResult::default();
    if targets.is_empty() {
        result.add_message(CmdMessage::info("No prompts to purge."));
        return Ok(result);
    }

    if !skip_confirm && !decider.confirm(&question) {
        result.add_message(CmdMessage::info("Operation cancelled."));
        return Ok(result);
    }

    for (label, id) in targets {
        let prompt = app.repo.hard_delete(id)?;
        result.add_message(CmdMessage::success(format!(
            "Purged ({}): {}",
            label, prompt.title
        )));
        result.affected_prompts.push(prompt);
    }

    app.persist()?;
    Ok(result)
}
