//! # Record Repository
//!
//! Owns the in-memory [`Snapshot`] and is the only place that mutates it.
//! Every operation leaves the snapshot upholding the model invariants:
//! reserved folders present, every category a live folder name, no orphaned
//! registry tags, and `deleted_at` set exactly for prompts sitting in Trash.
//!
//! Not-found semantics differ by kind: prompt lookups fail with
//! `PromptNotFound` (callers address prompts explicitly), while folder and
//! tag operations on missing names report a no-op through their return value
//! and leave state untouched.

use crate::error::{PromptzError, Result};
use crate::filter::{self, ListQuery};
use crate::model::{derive_title, Prompt, Snapshot, COPY_PREFIX, DEFAULT_FOLDER, TRASH_FOLDER};

/// Fields for a new prompt. Whitespace is trimmed; a missing title is derived
/// from the content.
#[derive(Debug, Clone, Default)]
pub struct NewPrompt {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: String,
    pub folder: Option<String>,
    pub tags: Vec<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PromptPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub folder: Option<String>,
    pub tags: Option<Vec<String>>,
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

pub struct Repository {
    data: Snapshot,
}

impl Repository {
    pub fn new(data: Snapshot) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &Snapshot {
        &self.data
    }

    /// Wholesale replacement, used by the load/merge paths after validation.
    pub fn replace(&mut self, data: Snapshot) {
        self.data = data;
    }

    pub fn find(&self, id: i64) -> Option<&Prompt> {
        self.data.prompts.iter().find(|p| p.id == id)
    }

    pub fn get(&self, id: i64) -> Result<&Prompt> {
        self.find(id).ok_or(PromptzError::PromptNotFound(id))
    }

    fn get_mut(&mut self, id: i64) -> Result<&mut Prompt> {
        self.data
            .prompts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PromptzError::PromptNotFound(id))
    }

    /// Total prompt count, trashed included. The remote save guard compares
    /// whole collections, not live views.
    pub fn prompt_count(&self) -> usize {
        self.data.prompts.len()
    }

    pub fn list_filtered(&self, query: &ListQuery) -> Vec<Prompt> {
        filter::apply(&self.data, query)
    }

    fn has_folder(&self, name: &str) -> bool {
        self.data.folders.iter().any(|f| f == name)
    }

    fn register_tags(&mut self, tags: &[String]) {
        let mut added = false;
        for tag in tags {
            if !self.data.tags.iter().any(|t| t == tag) {
                self.data.tags.push(tag.clone());
                added = true;
            }
        }
        if added {
            self.data.sort_tags();
        }
    }

    // --- Prompt CRUD ---

    pub fn create(&mut self, now_ms: i64, fields: NewPrompt) -> Result<i64> {
        let content = fields.content.trim().to_string();
        if content.is_empty() {
            return Err(PromptzError::Validation("Content is required".to_string()));
        }

        let title = match fields.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => derive_title(&content),
        };
        let category = match fields.folder.as_deref().map(str::trim) {
            Some(f) if !f.is_empty() => f.to_string(),
            _ => DEFAULT_FOLDER.to_string(),
        };
        if category == TRASH_FOLDER {
            return Err(PromptzError::Validation(
                "Prompts cannot be created directly in Trash".to_string(),
            ));
        }
        if !self.has_folder(&category) {
            return Err(PromptzError::Validation(format!(
                "Unknown folder: {}",
                category
            )));
        }

        let tags = normalize_tags(&fields.tags);
        self.register_tags(&tags);

        let id = self.data.next_id(now_ms);
        let mut prompt = Prompt::new(
            id,
            title,
            fields
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            content,
        );
        prompt.category = category;
        prompt.tags = tags;
        // Newest first.
        self.data.prompts.insert(0, prompt);
        self.data.cleanup_tags();
        Ok(id)
    }

    /// Applies a patch. Editing always clears `deleted_at`, so updating a
    /// trashed prompt restores it (into General unless the patch names a
    /// folder).
    pub fn update(&mut self, id: i64, patch: PromptPatch) -> Result<bool> {
        let was_trashed = self.get(id)?.is_trashed();

        let folder = match patch.folder.as_deref().map(str::trim) {
            Some(f) if !f.is_empty() => {
                if f == TRASH_FOLDER {
                    return Err(PromptzError::Validation(
                        "Use delete to move prompts into Trash".to_string(),
                    ));
                }
                if !self.has_folder(f) {
                    return Err(PromptzError::Validation(format!("Unknown folder: {}", f)));
                }
                Some(f.to_string())
            }
            _ => None,
        };

        let tags = patch.tags.as_deref().map(normalize_tags);
        if let Some(tags) = &tags {
            self.register_tags(tags);
        }

        let prompt = self.get_mut(id)?;
        if let Some(content) = patch.content.as_deref().map(str::trim) {
            if content.is_empty() {
                return Err(PromptzError::Validation("Content is required".to_string()));
            }
            prompt.content = content.to_string();
        }
        match patch.title.as_deref().map(str::trim) {
            Some("") => prompt.title = derive_title(&prompt.content),
            Some(title) => prompt.title = title.to_string(),
            None => {}
        }
        if let Some(description) = patch.description.as_deref().map(str::trim) {
            prompt.description = description.to_string();
        }
        if let Some(tags) = tags {
            prompt.tags = tags;
        }
        prompt.category = match folder {
            Some(folder) => folder,
            None if was_trashed => DEFAULT_FOLDER.to_string(),
            None => prompt.category.clone(),
        };
        prompt.deleted_at = None;

        self.data.cleanup_tags();
        Ok(was_trashed)
    }

    /// Clone with a fresh id at the front of the list. The copy is never a
    /// favorite and never trashed; a trashed source duplicates into General.
    pub fn duplicate(&mut self, id: i64, now_ms: i64) -> Result<i64> {
        let source = self.get(id)?.clone();
        let new_id = self.data.next_id(now_ms);
        let mut copy = source;
        copy.id = new_id;
        copy.title = format!("{}{}", COPY_PREFIX, copy.title);
        copy.favorite = false;
        copy.deleted_at = None;
        if copy.category == TRASH_FOLDER {
            copy.category = DEFAULT_FOLDER.to_string();
        }
        self.data.prompts.insert(0, copy);
        Ok(new_id)
    }

    /// Soft delete. Returns false when the prompt already sits in Trash.
    pub fn trash(&mut self, id: i64, now_ms: i64) -> Result<bool> {
        let prompt = self.get_mut(id)?;
        if prompt.is_trashed() {
            return Ok(false);
        }
        prompt.category = TRASH_FOLDER.to_string();
        prompt.deleted_at = Some(now_ms);
        Ok(true)
    }

    /// Back to General; the original folder is not remembered.
    pub fn restore(&mut self, id: i64) -> Result<bool> {
        let prompt = self.get_mut(id)?;
        if !prompt.is_trashed() {
            return Ok(false);
        }
        prompt.category = DEFAULT_FOLDER.to_string();
        prompt.deleted_at = None;
        Ok(true)
    }

    pub fn hard_delete(&mut self, id: i64) -> Result<Prompt> {
        let index = self
            .data
            .prompts
            .iter()
            .position(|p| p.id == id)
            .ok_or(PromptzError::PromptNotFound(id))?;
        if !self.data.prompts[index].is_trashed() {
            return Err(PromptzError::Validation(
                "Only prompts in Trash can be permanently deleted".to_string(),
            ));
        }
        let removed = self.data.prompts.remove(index);
        self.data.cleanup_tags();
        Ok(removed)
    }

    pub fn toggle_favorite(&mut self, id: i64) -> Result<bool> {
        let prompt = self.get_mut(id)?;
        prompt.favorite = !prompt.favorite;
        Ok(prompt.favorite)
    }

    pub fn move_to(&mut self, id: i64, folder: &str, now_ms: i64) -> Result<()> {
        let folder = folder.trim();
        if !self.has_folder(folder) {
            return Err(PromptzError::Validation(format!(
                "Unknown folder: {}",
                folder
            )));
        }
        let prompt = self.get_mut(id)?;
        prompt.category = folder.to_string();
        prompt.deleted_at = if folder == TRASH_FOLDER {
            Some(now_ms)
        } else {
            None
        };
        Ok(())
    }

    // --- Trash expiry ---

    /// Trash entries past the retention window, oldest deletion first.
    pub fn expired(&self, now_ms: i64, retention_ms: i64) -> Vec<&Prompt> {
        let mut expired: Vec<&Prompt> = self
            .data
            .prompts
            .iter()
            .filter(|p| {
                p.is_trashed()
                    && p.deleted_at
                        .map(|at| now_ms - at > retention_ms)
                        .unwrap_or(false)
            })
            .collect();
        expired.sort_by_key(|p| p.deleted_at);
        expired
    }

    // --- Folders ---

    pub fn add_folder(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PromptzError::Validation(
                "Folder name cannot be empty".to_string(),
            ));
        }
        if self.has_folder(name) {
            return Err(PromptzError::Validation(format!(
                "Folder \"{}\" already exists",
                name
            )));
        }
        self.data.folders.push(name.to_string());
        Ok(())
    }

    /// Renames in place and remaps prompt categories and folder favorites.
    /// Returns false when `old` does not exist.
    pub fn rename_folder(&mut self, old: &str, new: &str) -> Result<bool> {
        let new = new.trim();
        if old == TRASH_FOLDER {
            return Err(PromptzError::Validation(
                "The Trash folder cannot be renamed".to_string(),
            ));
        }
        if new.is_empty() {
            return Err(PromptzError::Validation(
                "Folder name cannot be empty".to_string(),
            ));
        }
        if new != old && self.has_folder(new) {
            return Err(PromptzError::Validation(format!(
                "Folder \"{}\" already exists",
                new
            )));
        }
        let index = match self.data.folders.iter().position(|f| f == old) {
            Some(index) => index,
            None => return Ok(false),
        };
        self.data.folders[index] = new.to_string();
        for prompt in &mut self.data.prompts {
            if prompt.category == old {
                prompt.category = new.to_string();
            }
        }
        for favorite in &mut self.data.favorite_folders {
            if favorite == old {
                *favorite = new.to_string();
            }
        }
        Ok(true)
    }

    /// Members go to Trash, not away. Returns the member count, or None when
    /// the folder does not exist.
    pub fn delete_folder(&mut self, name: &str, now_ms: i64) -> Result<Option<usize>> {
        if name == DEFAULT_FOLDER || name == TRASH_FOLDER {
            return Err(PromptzError::Validation(format!(
                "The \"{}\" folder cannot be deleted",
                name
            )));
        }
        let index = match self.data.folders.iter().position(|f| f == name) {
            Some(index) => index,
            None => return Ok(None),
        };
        let mut moved = 0;
        for prompt in &mut self.data.prompts {
            if prompt.category == name {
                prompt.category = TRASH_FOLDER.to_string();
                prompt.deleted_at = Some(now_ms);
                moved += 1;
            }
        }
        self.data.folders.remove(index);
        self.data.favorite_folders.retain(|f| f != name);
        Ok(Some(moved))
    }

    /// Returns the new favorite state, or None when the folder is unknown.
    pub fn toggle_favorite_folder(&mut self, name: &str) -> Result<Option<bool>> {
        if !self.has_folder(name) || name == TRASH_FOLDER {
            return Ok(None);
        }
        if let Some(index) = self.data.favorite_folders.iter().position(|f| f == name) {
            self.data.favorite_folders.remove(index);
            Ok(Some(false))
        } else {
            self.data.favorite_folders.push(name.to_string());
            Ok(Some(true))
        }
    }

    /// Favorite entries whose folder still exists; stale names are filtered
    /// at read time, not eagerly purged.
    pub fn favorite_folders_live(&self) -> Vec<&str> {
        self.data
            .favorite_folders
            .iter()
            .filter(|f| self.has_folder(f))
            .map(String::as_str)
            .collect()
    }

    // --- Tags ---

    /// Silent no-op (false) when `old` is unknown, `new` already exists or
    /// `new` is empty. A color override follows the rename.
    pub fn rename_tag(&mut self, old: &str, new: &str) -> Result<bool> {
        let new = new.trim();
        if new.is_empty() || self.data.tags.iter().any(|t| t == new) {
            return Ok(false);
        }
        let index = match self.data.tags.iter().position(|t| t == old) {
            Some(index) => index,
            None => return Ok(false),
        };
        self.data.tags[index] = new.to_string();
        for prompt in &mut self.data.prompts {
            for tag in &mut prompt.tags {
                if tag == old {
                    *tag = new.to_string();
                }
            }
        }
        if let Some(color) = self.data.tag_colors.remove(old) {
            self.data.tag_colors.insert(new.to_string(), color);
        }
        Ok(true)
    }

    /// Removes the tag from the registry and from every prompt. Color
    /// overrides stay behind in case the tag comes back.
    pub fn delete_tag(&mut self, name: &str) -> Result<bool> {
        let index = match self.data.tags.iter().position(|t| t == name) {
            Some(index) => index,
            None => return Ok(false),
        };
        self.data.tags.remove(index);
        for prompt in &mut self.data.prompts {
            prompt.tags.retain(|t| t != name);
        }
        self.data.cleanup_tags();
        Ok(true)
    }

    pub fn set_tag_color(&mut self, name: &str, color: &str) -> Result<bool> {
        if !color.starts_with('#') || !(color.len() == 4 || color.len() == 7) {
            return Err(PromptzError::Validation(format!(
                "Invalid color \"{}\": expected #rgb or #rrggbb",
                color
            )));
        }
        if !self.data.tags.iter().any(|t| t == name) {
            return Ok(false);
        }
        self.data
            .tag_colors
            .insert(name.to_string(), color.to_string());
        Ok(true)
    }
}
