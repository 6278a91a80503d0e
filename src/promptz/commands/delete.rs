use crate::api::PromptzApp;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::selector::PromptSelector;
use crate::store::KvBackend;

use super::helpers::resolve_all;

/// Soft delete: move to Trash with a deletion stamp.
pub fn run<B: KvBackend>(
    app: &mut PromptzApp<B>,
    selectors: &[PromptSelector],
) -> Result<CmdResult> {
    let resolved = resolve_all(app, selectors)?;
    let mut result = CmdResult::default();

    for (selector, id) in resolved {
        let now = app.now_ms();
        let moved = app.repo.trash(id, now)?;
        let prompt = app.repo.get(id)?.clone();
        if moved {
            result.add_message(CmdMessage::success(format!(
                "Prompt deleted ({}): {}",
                selector, prompt.title
            )));
            result.affected_prompts.push(prompt);
        } else {
            result.add_message(CmdMessage::warning(format!(
                "Already in Trash: {}",
                prompt.title
            )));
        }
    }

    app.persist()?;
    Ok(result)
}

/// Restore from Trash back into the default folder.
pub fn run_restore<B: KvBackend>(
    app: &mut PromptzApp<B>,
    selectors: &[PromptSelector],
) -> Result<CmdResult> {
    let resolved = resolve_all(app, selectors)?;
    let mut result = CmdResult::default();

    for (selector, id) in resolved {
        let restored = app.repo.restore(id)?;
        let prompt = app.repo.get(id)?.clone();
        if restored {
            result.add_message(CmdMessage::success(format!(
                "Prompt restored ({}): {}",
                selector, prompt.title
            )));
            result.affected_prompts.push(prompt);
        } else {
            result.add_message(CmdMessage::warning(format!(
                "Not in Trash: {}",
                prompt.title
            )));
        }
    }

    app.persist()?;
    Ok(result)
}
