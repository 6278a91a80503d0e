use crate::api::PromptzApp;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::selector::PromptSelector;
use crate::store::KvBackend;

use super::helpers::resolve_all;

pub fn run<B: KvBackend>(
    app: &mut PromptzApp<B>,
    selectors: &[PromptSelector],
    folder: &str,
) -> Result<CmdResult> {
    let resolved = resolve_all(app, selectors)?;
    let mut result = CmdResult::default();

    for (selector, id) in resolved {
        let now = app.now_ms();
        app.repo.move_to(id, folder, now)?;
        let prompt = app.repo.get(id)?.clone();
        result.add_message(CmdMessage::success(format!(
            "Moved to \"{}\" ({}): {}",
            prompt.category, selector, prompt.title
        )));
        result.affected_prompts.push(prompt);
    }

    app.persist()?;
    Ok(result)
}
