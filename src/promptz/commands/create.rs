use crate::api::PromptzApp;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::repo::NewPrompt;
use crate::store::KvBackend;

use super::helpers::label_for;

pub fn run<B: KvBackend>(app: &mut PromptzApp<B>, fields: NewPrompt) -> Result<CmdResult> {
    let now = app.now_ms();
    let id = app.repo.create(now, fields)?;
    app.persist()?;

    let prompt = app.repo.get(id)?.clone();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Prompt created ({}): {}",
        label_for(app, id),
        prompt.title
    )));
    Ok(result.with_affected_prompts(vec![prompt]))
}
