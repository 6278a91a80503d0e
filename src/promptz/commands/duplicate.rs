use crate::api::PromptzApp;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::selector::{self, PromptSelector};
use crate::store::KvBackend;

use super::helpers::label_for;

pub fn run<B: KvBackend>(app: &mut PromptzApp<B>, selector: &PromptSelector) -> Result<CmdResult> {
    let id = selector::resolve(app.repo.data(), selector)?;
    let now = app.now_ms();
    let copy_id = app.repo.duplicate(id, now)?;
    app.persist()?;

    let copy = app.repo.get(copy_id)?.clone();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Prompt duplicated ({}): {}",
        label_for(app, copy_id),
        copy.title
    )));
    Ok(result.with_affected_prompts(vec![copy]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::test_app;
    use crate::commands::create;
    use crate::repo::NewPrompt;

    #[test]
    fn copy_lands_at_position_one() {
        let (mut app, clock) = test_app();
        create::run(
            &mut app,
            NewPrompt {
                title: Some("Base".to_string()),
                content: "c".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        clock.advance(1000);

        let result = run(&mut app, &PromptSelector::Number(1)).unwrap();
        assert!(result.messages[0].content.contains("(1): Copy: Base"));
        assert_eq!(app.repo.data().prompts[0].title, "Copy: Base");
        assert_ne!(
            app.repo.data().prompts[0].id,
            app.repo.data().prompts[1].id
        );
    }
}
