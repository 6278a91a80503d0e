//! Additive reconciliation of two snapshots.
//!
//! Local records always win on id collision; remote-only records are
//! appended. This is deliberately not a field-level diff: conflicting edits
//! to the same id keep the local version wholesale.

use std::collections::HashSet;

use crate::model::Snapshot;

#[derive(Debug)]
pub struct MergeOutcome {
    pub snapshot: Snapshot,
    /// How many remote records were new to the local set.
    pub added: usize,
}

pub fn merge_snapshots(local: &Snapshot, remote: &Snapshot) -> MergeOutcome {
    let mut snapshot = local.clone();

    let local_ids: HashSet<i64> = local.prompts.iter().map(|p| p.id).collect();
    let mut added = 0;
    for record in &remote.prompts {
        if !local_ids.contains(&record.id) {
            snapshot.prompts.push(record.clone());
            added += 1;
        }
    }

    for folder in &remote.folders {
        if !snapshot.folders.iter().any(|f| f == folder) {
            snapshot.folders.push(folder.clone());
        }
    }
    for tag in &remote.tags {
        if !snapshot.tags.iter().any(|t| t == tag) {
            snapshot.tags.push(tag.clone());
        }
    }
    for favorite in &remote.favorite_folders {
        if !snapshot.favorite_folders.iter().any(|f| f == favorite) {
            snapshot.favorite_folders.push(favorite.clone());
        }
    }
    // Remote wins for color overrides.
    for (tag, color) in &remote.tag_colors {
        snapshot.tag_colors.insert(tag.clone(), color.clone());
    }

    snapshot.ensure_reserved();
    MergeOutcome { snapshot, added }
}
