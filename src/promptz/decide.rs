//! User decisions for sync conflicts and destructive actions.
//!
//! Every conflict the adapters can hit is routed through [`Decider`] instead
//! of being resolved silently. Dismissing a question always lands on the
//! choice that preserves local data.

use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectChoice {
    LoadRemote,
    Merge,
    KeepLocal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Overwrite,
    Merge,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChangeChoice {
    Reload,
    Keep,
}

pub trait Decider {
    /// Remote data found on connect/load: take it, merge it, or leave local
    /// state alone.
    fn connect_choice(&mut self, local: usize, remote: usize) -> ConnectChoice;

    /// Local looks like it is missing data relative to remote during a save.
    fn save_choice(&mut self, local: usize, remote: usize) -> SaveChoice;

    /// The bound file changed behind our back.
    fn file_change(&mut self, file: &str) -> FileChangeChoice;

    /// Plain yes/no for destructive actions.
    fn confirm(&mut self, question: &str) -> bool;
}

/// Interactive decider for the binary. Prompts on stdout, reads one line.
#[derive(Default)]
pub struct StdinDecider;

impl StdinDecider {
    fn ask(prompt: &str) -> String {
        print!("{}", prompt);
        let _ = io::stdout().flush();
        let mut input = String::new();
        let _ = io::stdin().read_line(&mut input);
        input.trim().to_lowercase()
    }
}

impl Decider for StdinDecider {
    fn connect_choice(&mut self, local: usize, remote: usize) -> ConnectChoice {
        let answer = Self::ask(&format!(
            "Remote has {} prompts, local has {}. [l]oad remote / [m]erge / [k]eep local: ",
            remote, local
        ));
        match answer.as_str() {
            "l" | "load" => ConnectChoice::LoadRemote,
            "m" | "merge" => ConnectChoice::Merge,
            _ => ConnectChoice::KeepLocal,
        }
    }

    fn save_choice(&mut self, local: usize, remote: usize) -> SaveChoice {
        let answer = Self::ask(&format!(
            "Local has {} prompts but remote has {}. [o]verwrite remote / [m]erge / [c]ancel: ",
            local, remote
        ));
        match answer.as_str() {
            "o" | "overwrite" => SaveChoice::Overwrite,
            "m" | "merge" => SaveChoice::Merge,
            _ => SaveChoice::Cancel,
        }
    }

    fn file_change(&mut self, file: &str) -> FileChangeChoice {
        let answer = Self::ask(&format!(
            "\"{}\" was modified externally. [r]eload and discard local changes / [k]eep local: ",
            file
        ));
        match answer.as_str() {
            "r" | "reload" => FileChangeChoice::Reload,
            _ => FileChangeChoice::Keep,
        }
    }

    fn confirm(&mut self, question: &str) -> bool {
        let answer = Self::ask(&format!("{} [y/N]: ", question));
        answer == "y" || answer == "yes"
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted decider for tests. Answers are consumed front to back; an
    /// exhausted queue falls back to the dismissal default.
    #[derive(Default)]
    pub struct ScriptedDecider {
        pub connect: VecDeque<ConnectChoice>,
        pub save: VecDeque<SaveChoice>,
        pub file_change: VecDeque<FileChangeChoice>,
        pub confirms: VecDeque<bool>,
        /// Confirm questions asked, for asserting on prompts.
        pub questions: Vec<String>,
    }

    impl ScriptedDecider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn on_connect(mut self, choice: ConnectChoice) -> Self {
            self.connect.push_back(choice);
            self
        }

        pub fn on_save(mut self, choice: SaveChoice) -> Self {
            self.save.push_back(choice);
            self
        }

        pub fn on_file_change(mut self, choice: FileChangeChoice) -> Self {
            self.file_change.push_back(choice);
            self
        }

        pub fn on_confirm(mut self, answer: bool) -> Self {
            self.confirms.push_back(answer);
            self
        }
    }

    impl Decider for ScriptedDecider {
        fn connect_choice(&mut self, _local: usize, _remote: usize) -> ConnectChoice {
            self.connect.pop_front().unwrap_or(ConnectChoice::KeepLocal)
        }

        fn save_choice(&mut self, _local: usize, _remote: usize) -> SaveChoice {
            self.save.pop_front().unwrap_or(SaveChoice::Cancel)
        }

        fn file_change(&mut self, _file: &str) -> FileChangeChoice {
            self.file_change.pop_front().unwrap_or(FileChangeChoice::Keep)
        }

        fn confirm(&mut self, question: &str) -> bool {
            self.questions.push(question.to_string());
            self.confirms.pop_front().unwrap_or(false)
        }
    }
}
