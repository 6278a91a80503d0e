use chrono::{NaiveDate, NaiveTime};

use crate::model::{Prompt, Snapshot, TRASH_FOLDER};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    All,
    Favorites,
    Folder(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Folder,
    Tag,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDir {
    #[default]
    Desc,
    /// Reverses the base ordering produced by the sort key.
    Asc,
}

#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub view: View,
    pub tags: Vec<String>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: SortKey,
    pub dir: SortDir,
}

fn day_start_ms(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Filter and order prompts. Stages run in a fixed order: view selection,
/// Trash exclusion (unless the Trash folder itself is selected), tag filter
/// (match any selected tag), case-insensitive substring search, creation-date
/// range, sort, direction flip.
pub fn apply(snapshot: &Snapshot, query: &ListQuery) -> Vec<Prompt> {
    let viewing_trash = matches!(&query.view, View::Folder(name) if name == TRASH_FOLDER);

    let mut list: Vec<Prompt> = snapshot
        .prompts
        .iter()
        .filter(|p| match &query.view {
            View::All => true,
            View::Favorites => p.favorite,
            View::Folder(name) => p.category == *name,
        })
        .filter(|p| {
            if viewing_trash {
                p.is_trashed()
            } else {
                !p.is_trashed()
            }
        })
        .cloned()
        .collect();

    // Selected tags that have left the registry are ignored rather than
    // matching nothing.
    let selected: Vec<&String> = query
        .tags
        .iter()
        .filter(|t| snapshot.tags.contains(t))
        .collect();
    if !selected.is_empty() {
        list.retain(|p| selected.iter().any(|t| p.tags.contains(t)));
    }

    if let Some(term) = &query.search {
        let needle = term.to_lowercase();
        if !needle.is_empty() {
            list.retain(|p| p.haystack().contains(&needle));
        }
    }

    if let Some(from) = query.from {
        let start = day_start_ms(from);
        list.retain(|p| p.id >= start);
    }
    if let Some(to) = query.to {
        // Inclusive range: the end date covers its whole day.
        let end = day_start_ms(to) + 24 * 60 * 60 * 1000 - 1;
        list.retain(|p| p.id <= end);
    }

    match query.sort {
        SortKey::Date => list.sort_by(|a, b| b.id.cmp(&a.id)),
        SortKey::Folder => list.sort_by(|a, b| a.category.cmp(&b.category)),
        SortKey::Tag => list.sort_by(|a, b| {
            let at = a.tags.first().map(String::as_str).unwrap_or("");
            let bt = b.tags.first().map(String::as_str).unwrap_or("");
            at.cmp(bt)
        }),
    }
    if query.dir == SortDir::Asc {
        list.reverse();
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_FOLDER;

    fn make_prompt(id: i64, title: &str, category: &str, tags: &[&str]) -> Prompt {
        let mut p = Prompt::new(id, title.to_string(), String::new(), format!("{} body", title));
        p.category = category.to_string();
        p.tags = tags.iter().map(|t| t.to_string()).collect();
        if category == TRASH_FOLDER {
            p.deleted_at = Some(id);
        }
        p
    }

    fn snapshot_with(prompts: Vec<Prompt>, tags: &[&str]) -> Snapshot {
        let mut snapshot = Snapshot {
            prompts,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };
        snapshot.ensure_reserved();
        snapshot
    }

    #[test]
    fn trash_is_excluded_unless_selected() {
        let snapshot = snapshot_with(
            vec![
                make_prompt(1, "kept", DEFAULT_FOLDER, &[]),
                make_prompt(2, "binned", TRASH_FOLDER, &[]),
            ],
            &[],
        );

        let all = apply(&snapshot, &ListQuery::default());
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "kept");

        let trash = apply(
            &snapshot,
            &ListQuery {
                view: View::Folder(TRASH_FOLDER.to_string()),
                ..Default::default()
            },
        );
        assert_eq!(trash.len(), 1);
        assert_eq!(trash[0].title, "binned");
    }

    #[test]
    fn favorites_view_still_excludes_trash() {
        let mut fav = make_prompt(1, "fav", DEFAULT_FOLDER, &[]);
        fav.favorite = true;
        let mut trashed_fav = make_prompt(2, "gone", TRASH_FOLDER, &[]);
        trashed_fav.favorite = true;
        let snapshot = snapshot_with(vec![fav, trashed_fav], &[]);

        let list = apply(
            &snapshot,
            &ListQuery {
                view: View::Favorites,
                ..Default::default()
            },
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "fav");
    }

    #[test]
    fn tag_filter_matches_any_selected_tag() {
        let snapshot = snapshot_with(
            vec![
                make_prompt(1, "a", DEFAULT_FOLDER, &["rust"]),
                make_prompt(2, "b", DEFAULT_FOLDER, &["sql"]),
                make_prompt(3, "c", DEFAULT_FOLDER, &["go"]),
            ],
            &["rust", "sql", "go"],
        );

        let list = apply(
            &snapshot,
            &ListQuery {
                tags: vec!["rust".to_string(), "sql".to_string()],
                ..Default::default()
            },
        );
        let titles: Vec<&str> = list.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);
    }

    #[test]
    fn selected_tags_missing_from_registry_are_ignored() {
        let snapshot = snapshot_with(
            vec![make_prompt(1, "a", DEFAULT_FOLDER, &["rust"])],
            &["rust"],
        );
        let list = apply(
            &snapshot,
            &ListQuery {
                tags: vec!["stale".to_string()],
                ..Default::default()
            },
        );
        // Filter drops out entirely instead of matching nothing.
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn search_is_case_insensitive_over_all_text_fields() {
        let mut p = make_prompt(1, "Title", DEFAULT_FOLDER, &[]);
        p.description = "ProMPt EngineerinG".to_string();
        let snapshot = snapshot_with(vec![p, make_prompt(2, "other", DEFAULT_FOLDER, &[])], &[]);

        let list = apply(
            &snapshot,
            &ListQuery {
                search: Some("engineering".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "Title");
    }

    #[test]
    fn date_range_is_inclusive_to_end_of_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let start = day_start_ms(day);
        let last_ms = start + 24 * 60 * 60 * 1000 - 1;
        let snapshot = snapshot_with(
            vec![
                make_prompt(start - 1, "before", DEFAULT_FOLDER, &[]),
                make_prompt(start, "first", DEFAULT_FOLDER, &[]),
                make_prompt(last_ms, "last", DEFAULT_FOLDER, &[]),
                make_prompt(last_ms + 1, "after", DEFAULT_FOLDER, &[]),
            ],
            &[],
        );

        let list = apply(
            &snapshot,
            &ListQuery {
                from: Some(day),
                to: Some(day),
                ..Default::default()
            },
        );
        let titles: Vec<&str> = list.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["last", "first"]);
    }

    #[test]
    fn default_sort_is_newest_first_and_asc_flips_it() {
        let snapshot = snapshot_with(
            vec![
                make_prompt(10, "old", DEFAULT_FOLDER, &[]),
                make_prompt(30, "new", DEFAULT_FOLDER, &[]),
                make_prompt(20, "mid", DEFAULT_FOLDER, &[]),
            ],
            &[],
        );

        let desc = apply(&snapshot, &ListQuery::default());
        let titles: Vec<&str> = desc.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "mid", "old"]);

        let asc = apply(
            &snapshot,
            &ListQuery {
                dir: SortDir::Asc,
                ..Default::default()
            },
        );
        let titles: Vec<&str> = asc.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["old", "mid", "new"]);
    }

    #[test]
    fn folder_sort_is_stable_for_ties() {
        let snapshot = snapshot_with(
            vec![
                make_prompt(3, "b-new", "B", &[]),
                make_prompt(2, "a", "A", &[]),
                make_prompt(1, "b-old", "B", &[]),
            ],
            &[],
        );
        // The view stage keeps insertion order, so ties keep it too.
        let list = apply(
            &snapshot,
            &ListQuery {
                sort: SortKey::Folder,
                ..Default::default()
            },
        );
        let titles: Vec<&str> = list.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b-new", "b-old"]);
    }

    #[test]
    fn tag_sort_uses_the_first_tag_and_treats_untagged_as_empty() {
        let snapshot = snapshot_with(
            vec![
                make_prompt(1, "zebra", DEFAULT_FOLDER, &["zebra", "alpha"]),
                make_prompt(2, "none", DEFAULT_FOLDER, &[]),
                make_prompt(3, "beta", DEFAULT_FOLDER, &["beta"]),
            ],
            &["zebra", "alpha", "beta"],
        );
        let list = apply(
            &snapshot,
            &ListQuery {
                sort: SortKey::Tag,
                ..Default::default()
            },
        );
        let titles: Vec<&str> = list.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["none", "beta", "zebra"]);
    }
}
