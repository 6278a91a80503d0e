use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{PromptzError, Result};

pub const DEFAULT_FOLDER: &str = "General";
pub const TRASH_FOLDER: &str = "Trash";
pub const SEED_FOLDERS: [&str; 4] = ["General", "Marketing", "SEO", "Code"];
pub const COPY_PREFIX: &str = "Copy: ";
pub const TITLE_SNIPPET_LEN: usize = 50;

fn default_category() -> String {
    DEFAULT_FOLDER.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prompt {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content: String,
    #[serde(rename = "cat", default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "fav", default)]
    pub favorite: bool,
    #[serde(rename = "deletedAt", default)]
    pub deleted_at: Option<i64>,
}

impl Prompt {
    pub fn new(id: i64, title: String, description: String, content: String) -> Self {
        Self {
            id,
            title,
            description,
            content,
            category: DEFAULT_FOLDER.to_string(),
            tags: Vec::new(),
            favorite: false,
            deleted_at: None,
        }
    }

    pub fn is_trashed(&self) -> bool {
        self.category == TRASH_FOLDER
    }

    /// Lowercased search haystack over title, description and content.
    pub fn haystack(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.content).to_lowercase()
    }
}

/// Falls back to a content snippet when no title was given: content used
/// verbatim when short enough, otherwise the first 50 characters plus "...".
pub fn derive_title(content: &str) -> String {
    if content.chars().count() > TITLE_SNIPPET_LEN {
        let snippet: String = content.chars().take(TITLE_SNIPPET_LEN).collect();
        format!("{}...", snippet)
    } else {
        content.to_string()
    }
}

/// The persisted unit. This exact shape is what goes to the local store, to a
/// bound file and to the remote object, so the serde renames here are the wire
/// contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    #[serde(default)]
    pub folders: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "colors", default)]
    pub tag_colors: BTreeMap<String, String>,
    #[serde(rename = "favoriteFolders", default)]
    pub favorite_folders: Vec<String>,
}

impl Snapshot {
    /// First-run folder seed. Only applies when the folder list is empty.
    pub fn seed_if_empty(&mut self) {
        if self.folders.is_empty() {
            self.folders = SEED_FOLDERS.iter().map(|f| f.to_string()).collect();
        }
    }

    /// General goes to the front, Trash to the end. Existing entries are left
    /// where they are.
    pub fn ensure_reserved(&mut self) {
        if !self.folders.iter().any(|f| f == DEFAULT_FOLDER) {
            self.folders.insert(0, DEFAULT_FOLDER.to_string());
        }
        if !self.folders.iter().any(|f| f == TRASH_FOLDER) {
            self.folders.push(TRASH_FOLDER.to_string());
        }
    }

    pub fn sort_tags(&mut self) {
        self.tags.sort();
    }

    /// Drops registry tags no prompt references anymore. Counts trashed
    /// prompts as references; never adds missing tags, and color overrides
    /// are kept even for dropped tags.
    pub fn cleanup_tags(&mut self) {
        let used: std::collections::HashSet<&str> = self
            .prompts
            .iter()
            .flat_map(|p| p.tags.iter().map(|t| t.as_str()))
            .collect();
        self.tags.retain(|t| used.contains(t.as_str()));
    }

    /// Next creation id: the current millisecond unless that would collide
    /// with an existing id.
    pub fn next_id(&self, now_ms: i64) -> i64 {
        let max_id = self.prompts.iter().map(|p| p.id).max().unwrap_or(0);
        now_ms.max(max_id + 1)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates a raw JSON value against the snapshot contract, collecting
    /// every problem rather than stopping at the first.
    pub fn validate(value: &Value) -> Vec<String> {
        let root = match value.as_object() {
            Some(obj) => obj,
            None => return vec!["root is not an object".to_string()],
        };

        let mut problems = Vec::new();
        for key in ["prompts", "folders", "tags"] {
            if !root.get(key).map(Value::is_array).unwrap_or(false) {
                problems.push(format!("missing \"{}\" array", key));
            }
        }
        if let Some(colors) = root.get("colors") {
            if !colors.is_object() {
                problems.push("\"colors\" must be an object".to_string());
            }
        }
        if let Some(prompts) = root.get("prompts").and_then(Value::as_array) {
            for (i, entry) in prompts.iter().enumerate() {
                let obj = match entry.as_object() {
                    Some(obj) => obj,
                    None => {
                        problems.push(format!("prompt[{}] is not an object", i));
                        continue;
                    }
                };
                if !obj.contains_key("id") {
                    problems.push(format!("prompt[{}] is missing 'id'", i));
                }
                if !obj.contains_key("content") {
                    problems.push(format!("prompt[{}] is missing 'content'", i));
                }
                if let Some(tags) = obj.get("tags") {
                    if !tags.is_array() {
                        problems.push(format!("prompt[{}] 'tags' must be an array", i));
                    }
                }
            }
        }
        problems
    }

    /// Shared entry point for every externally-sourced snapshot (file import,
    /// bound-file read, remote download): validate first, refuse wholesale on
    /// any problem, then normalize the reserved folders and tag order.
    pub fn parse_validated(text: &str) -> Result<Snapshot> {
        let value: Value = serde_json::from_str(text)?;
        let problems = Self::validate(&value);
        if !problems.is_empty() {
            return Err(PromptzError::Import(problems));
        }
        let mut snapshot: Snapshot = serde_json::from_value(value)?;
        snapshot.ensure_reserved();
        snapshot.sort_tags();
        Ok(snapshot)
    }
}
