use crate::api::PromptzApp;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::selector::PromptSelector;
use crate::store::KvBackend;

use super::helpers::resolve_all;

pub fn run<B: KvBackend>(
    app: &PromptzApp<B>,
    selectors: &[PromptSelector],
) -> Result<CmdResult> {
    let resolved = resolve_all(app, selectors)?;
    let mut prompts = Vec::with_capacity(resolved.len());
    for (_, id) in resolved {
        prompts.push(app.repo.get(id)?.clone());
    }
    Ok(CmdResult::default().with_affected_prompts(prompts))
}
