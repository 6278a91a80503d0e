use crate::api::PromptzApp;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::selector::PromptSelector;
use crate::store::KvBackend;

use super::helpers::resolve_all;

pub fn run<B: KvBackend>(
    app: &mut PromptzApp<B>,
    selectors: &[PromptSelector],
) -> Result<CmdResult> {
    let resolved = resolve_all(app, selectors)?;
    let mut result = CmdResult::default();

    for (selector, id) in resolved {
        let favorite = app.repo.toggle_favorite(id)?;
        let prompt = app.repo.get(id)?.clone();
        let message = if favorite {
            format!("Marked as favorite ({}): {}", selector, prompt.title)
        } else {
            format!("Removed favorite ({}): {}", selector, prompt.title)
        };
        result.add_message(CmdMessage::success(message));
        result.affected_prompts.push(prompt);
    }

    app.persist()?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::test_app;
    use crate::commands::create;
    use crate::repo::NewPrompt;

    #[test]
    fn toggles_back_and_forth() {
        let (mut app, _clock) = test_app();
        create::run(
            &mut app,
            NewPrompt {
                content: "c".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        let on = run(&mut app, &[PromptSelector::Number(1)]).unwrap();
        assert!(on.messages[0].content.starts_with("Marked as favorite"));
        assert!(app.repo.data().prompts[0].favorite);

        let off = run(&mut app, &[PromptSelector::Number(1)]).unwrap();
        assert!(off.messages[0].content.starts_with("Removed favorite"));
        assert!(!app.repo.data().prompts[0].favorite);
    }
}
