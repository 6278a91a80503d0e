use std::collections::HashMap;

use crate::api::PromptzApp;
use crate::commands::{CmdMessage, CmdResult, ListedPrompt};
use crate::error::Result;
use crate::filter::{self, ListQuery};
use crate::selector;
use crate::store::KvBackend;

pub fn run<B: KvBackend>(app: &PromptzApp<B>, query: &ListQuery) -> Result<CmdResult> {
    let snapshot = app.repo.data();
    let prompts = filter::apply(snapshot, query);

    let mut result = CmdResult::default();
    if prompts.is_empty() {
        result.add_message(CmdMessage::info("No prompts found."));
        return Ok(result);
    }

    // Labels come from the full listings, so a filtered view still shows the
    // selector the user would type against the unfiltered one.
    let labels: HashMap<i64, String> = selector::index_prompts(snapshot)
        .into_iter()
        .map(|(selector, prompt)| (prompt.id, selector.to_string()))
        .collect();

    let listed = prompts
        .into_iter()
        .map(|prompt| ListedPrompt {
            label: labels.get(&prompt.id).cloned().unwrap_or_default(),
            prompt,
        })
        .collect();

    Ok(result.with_listed_prompts(listed))
}
