use crate::model::Prompt;

pub mod create;
pub mod delete;
pub mod duplicate;
pub mod export;
pub mod favorite;
pub mod file;
pub mod folders;
pub mod helpers;
pub mod import;
pub mod list;
pub mod mv;
pub mod purge;
pub mod remote;
pub mod tags;
pub mod update;
pub mod view;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A listing row: the selector the user can type back, plus the prompt.
#[derive(Debug, Clone)]
pub struct ListedPrompt {
    pub label: String,
    pub prompt: Prompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderInfo {
    pub name: String,
    pub count: usize,
    pub favorite: bool,
    pub reserved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub color: String,
    pub count: usize,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_prompts: Vec<Prompt>,
    pub listed_prompts: Vec<ListedPrompt>,
    pub folders: Vec<FolderInfo>,
    pub tags: Vec<TagInfo>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_prompts(mut self, prompts: Vec<Prompt>) -> Self {
        self.affected_prompts = prompts;
        self
    }

    pub fn with_listed_prompts(mut self, prompts: Vec<ListedPrompt>) -> Self {
        self.listed_prompts = prompts;
        self
    }

    pub fn with_folders(mut self, folders: Vec<FolderInfo>) -> Self {
        self.folders = folders;
        self
    }

    pub fn with_tags(mut self, tags: Vec<TagInfo>) -> Self {
        self.tags = tags;
        self
    }
}
