use std::fs;
use std::path::Path;

use crate::api::PromptzApp;
use crate::commands::{CmdMessage, CmdResult};
use crate::decide::Decider;
use crate::error::{PromptzError, Result};
use crate::model::Snapshot;
use crate::store::KvBackend;

/// Imports a JSON backup, replacing the whole database. The file is validated
/// before the user is asked anything; a file that fails validation is refused
/// wholesale.
pub fn run<B: KvBackend>(
    app: &mut PromptzApp<B>,
    path: &Path,
    decider: &mut dyn Decider,
    skip_confirm: bool,
) -> Result<CmdResult> {
    let text = fs::read_to_string(path).map_err(PromptzError::Io)?;
    let snapshot = Snapshot::parse_validated(&text)?;

    if !skip_confirm && !decider.confirm("Import data and overwrite the current database?") {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info("Operation cancelled."));
        return Ok(result);
    }

    let count = snapshot.prompts.len();
    app.apply_snapshot(snapshot);
    app.persist()?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Imported {} prompts from {}",
        count,
        path.display()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::test_app;
    use crate::commands::create;
    use crate::decide::fixtures::ScriptedDecider;
    use crate::repo::NewPrompt;
    use tempfile::TempDir;

    fn backup_file(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("backup.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn replaces_the_database_after_confirmation() {
        let (mut app, _clock) = test_app();
        create::run(
            &mut app,
            NewPrompt {
                content: "existing".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        let dir = TempDir::new().unwrap();
        let path = backup_file(
            &dir,
            r#"{"prompts":[{"id":1,"content":"imported"},{"id":2,"content":"second"}],
                "folders":["Work"],"tags":[]}"#,
        );

        let mut decider = ScriptedDecider::new().on_confirm(true);
        let result = run(&mut app, &path, &mut decider, false).unwrap();
        assert!(result.messages[0].content.starts_with("Imported 2 prompts"));
        assert_eq!(app.repo.prompt_count(), 2);
        assert_eq!(app.repo.data().prompts[0].content, "imported");
        assert_eq!(
            decider.questions,
            vec!["Import data and overwrite the current database?"]
        );
    }

    #[test]
    fn invalid_backup_is_refused_before_asking() {
        let (mut app, _clock) = test_app();
        let dir = TempDir::new().unwrap();
        let path = backup_file(&dir, r#"{"folders":[],"tags":[]}"#);

        let mut decider = ScriptedDecider::new().on_confirm(true);
        let err = run(&mut app, &path, &mut decider, false).unwrap_err();
        assert!(matches!(err, PromptzError::Import(_)));
        assert!(decider.questions.is_empty());
    }

    #[test]
    fn declined_confirmation_keeps_current_data() {
        let (mut app, _clock) = test_app();
        create::run(
            &mut app,
            NewPrompt {
                content: "keep me".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        let dir = TempDir::new().unwrap();
        let path = backup_file(&dir, r#"{"prompts":[],"folders":[],"tags":[]}"#);

        let mut decider = ScriptedDecider::new().on_confirm(false);
        let result = run(&mut app, &path, &mut decider, false).unwrap();
        assert_eq!(result.messages[0].content, "Operation cancelled.");
        assert_eq!(app.repo.data().prompts[0].content, "keep me");
    }
}
