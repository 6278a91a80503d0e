use crate::api::PromptzApp;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::repo::PromptPatch;
use crate::selector::{self, PromptSelector};
use crate::store::KvBackend;

use super::helpers::label_for;

pub fn run<B: KvBackend>(
    app: &mut PromptzApp<B>,
    selector: &PromptSelector,
    patch: PromptPatch,
) -> Result<CmdResult> {
    let id = selector::resolve(app.repo.data(), selector)?;
    let was_trashed = app.repo.update(id, patch)?;
    app.persist()?;

    let prompt = app.repo.get(id)?.clone();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Prompt updated ({}): {}",
        label_for(app, id),
        prompt.title
    )));
    if was_trashed {
        result.add_message(CmdMessage::info(format!(
            "Restored from Trash to {}.",
            prompt.category
        )));
    }
    Ok(result.with_affected_prompts(vec![prompt]))
}
