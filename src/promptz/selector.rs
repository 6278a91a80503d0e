//! Prompt references on the command line.
//!
//! Listings number prompts from 1, newest first, with trashed prompts
//! numbered separately as `t1`, `t2`, ... A bare number that does not fit
//! the listing is treated as a raw prompt id, so scripts can address
//! prompts stably while interactive use stays short.

use std::fmt;
use std::str::FromStr;

use crate::error::{PromptzError, Result};
use crate::model::{Prompt, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptSelector {
    /// Position in the regular listing, or a raw id when out of range.
    Number(i64),
    /// Position in the trash listing.
    Trash(usize),
}

impl fmt::Display for PromptSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptSelector::Number(n) => write!(f, "{}", n),
            PromptSelector::Trash(n) => write!(f, "t{}", n),
        }
    }
}

impl FromStr for PromptSelector {
    type Err = PromptzError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || PromptzError::Validation(format!("Invalid prompt reference: \"{}\"", s));
        if let Some(rest) = s.strip_prefix('t') {
            let n: usize = rest.parse().map_err(|_| invalid())?;
            if n == 0 {
                return Err(invalid());
            }
            Ok(PromptSelector::Trash(n))
        } else {
            let n: i64 = s.parse().map_err(|_| invalid())?;
            Ok(PromptSelector::Number(n))
        }
    }
}

/// Regular listing order: non-trash, newest id first.
pub fn regular_listing(snapshot: &Snapshot) -> Vec<&Prompt> {
    let mut prompts: Vec<&Prompt> = snapshot.prompts.iter().filter(|p| !p.is_trashed()).collect();
    prompts.sort_by_key(|p| std::cmp::Reverse(p.id));
    prompts
}

/// Trash listing order mirrors the regular one.
pub fn trash_listing(snapshot: &Snapshot) -> Vec<&Prompt> {
    let mut prompts: Vec<&Prompt> = snapshot.prompts.iter().filter(|p| p.is_trashed()).collect();
    prompts.sort_by_key(|p| std::cmp::Reverse(p.id));
    prompts
}

/// Pairs every prompt with the selector a listing would print for it.
pub fn index_prompts(snapshot: &Snapshot) -> Vec<(PromptSelector, &Prompt)> {
    let mut indexed = Vec::with_capacity(snapshot.prompts.len());
    for (i, prompt) in regular_listing(snapshot).into_iter().enumerate() {
        indexed.push((PromptSelector::Number(i as i64 + 1), prompt));
    }
    for (i, prompt) in trash_listing(snapshot).into_iter().enumerate() {
        indexed.push((PromptSelector::Trash(i + 1), prompt));
    }
    indexed
}

/// The selector shown for one prompt, if it is still present.
pub fn selector_for(snapshot: &Snapshot, id: i64) -> Option<PromptSelector> {
    index_prompts(snapshot)
        .into_iter()
        .find(|(_, p)| p.id == id)
        .map(|(selector, _)| selector)
}

/// Resolves a selector to a prompt id.
pub fn resolve(snapshot: &Snapshot, selector: &PromptSelector) -> Result<i64> {
    match selector {
        PromptSelector::Trash(n) => {
            let listing = trash_listing(snapshot);
            n.checked_sub(1)
                .and_then(|i| listing.get(i).copied())
                .map(|p| p.id)
                .ok_or_else(|| PromptzError::Validation(format!("No prompt at t{}", n)))
        }
        PromptSelector::Number(n) => {
            let listing = regular_listing(snapshot);
            if *n >= 1 && (*n as usize) <= listing.len() {
                return Ok(listing[*n as usize - 1].id);
            }
            if snapshot.prompts.iter().any(|p| p.id == *n) {
                Ok(*n)
            } else {
                Err(PromptzError::PromptNotFound(*n))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TRASH_FOLDER;

    fn make_prompt(id: i64, trashed: bool) -> Prompt {
        let mut prompt = Prompt::new(id, format!("p{}", id), String::new(), "c".to_string());
        if trashed {
            prompt.category = TRASH_FOLDER.to_string();
            prompt.deleted_at = Some(id);
        }
        prompt
    }

    fn snapshot() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.ensure_reserved();
        // Stored unordered on purpose.
        snapshot.prompts = vec![
            make_prompt(3000, false),
            make_prompt(1000, false),
            make_prompt(2000, true),
            make_prompt(4000, false),
            make_prompt(500, true),
        ];
        snapshot
    }

    #[test]
    fn parses_numbers_and_trash_positions() {
        assert_eq!(
            "2".parse::<PromptSelector>().unwrap(),
            PromptSelector::Number(2)
        );
        assert_eq!(
            " t3 ".parse::<PromptSelector>().unwrap(),
            PromptSelector::Trash(3)
        );
        assert!("t0".parse::<PromptSelector>().is_err());
        assert!("x1".parse::<PromptSelector>().is_err());
        assert!("".parse::<PromptSelector>().is_err());
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(PromptSelector::Number(7).to_string(), "7");
        assert_eq!(PromptSelector::Trash(2).to_string(), "t2");
    }

    #[test]
    fn positions_count_newest_first() {
        let snapshot = snapshot();
        assert_eq!(resolve(&snapshot, &PromptSelector::Number(1)).unwrap(), 4000);
        assert_eq!(resolve(&snapshot, &PromptSelector::Number(2)).unwrap(), 3000);
        assert_eq!(resolve(&snapshot, &PromptSelector::Number(3)).unwrap(), 1000);
    }

    #[test]
    fn out_of_range_numbers_fall_back_to_raw_ids() {
        let snapshot = snapshot();
        // 2000 is trashed, so it has no regular position, but the id resolves.
        assert_eq!(resolve(&snapshot, &PromptSelector::Number(2000)).unwrap(), 2000);
        let err = resolve(&snapshot, &PromptSelector::Number(99)).unwrap_err();
        assert!(matches!(err, PromptzError::PromptNotFound(99)));
    }

    #[test]
    fn trash_positions_resolve_separately() {
        let snapshot = snapshot();
        assert_eq!(resolve(&snapshot, &PromptSelector::Trash(1)).unwrap(), 2000);
        assert_eq!(resolve(&snapshot, &PromptSelector::Trash(2)).unwrap(), 500);
        assert!(resolve(&snapshot, &PromptSelector::Trash(3)).is_err());
    }

    #[test]
    fn index_covers_both_listings() {
        let snapshot = snapshot();
        let indexed = index_prompts(&snapshot);
        assert_eq!(indexed.len(), 5);
        assert_eq!(indexed[0].0, PromptSelector::Number(1));
        assert_eq!(indexed[0].1.id, 4000);
        assert_eq!(indexed[3].0, PromptSelector::Trash(1));
        assert_eq!(indexed[3].1.id, 2000);
        assert_eq!(selector_for(&snapshot, 500), Some(PromptSelector::Trash(2)));
        assert_eq!(selector_for(&snapshot, 9), None);
    }
}
