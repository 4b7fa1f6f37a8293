//! Name completion over the catalog.

use std::collections::BTreeMap;

use crate::tree::SearchTree;

/// Suggestions returned when the caller does not choose a limit.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Catalog names starting with `prefix`, ignoring case.
///
/// A name equal to the prefix is left out since the user has already typed
/// it. Names differing only in case are reported once, using the spelling
/// that sorts first. Results are ordered by lowercased name, not by
/// catalog order, and capped at `limit`; an empty prefix suggests nothing.
pub fn suggest(tree: &SearchTree, prefix: &str, limit: usize) -> Vec<String> {
    let wanted = prefix.trim().to_lowercase();
    if wanted.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut found: BTreeMap<String, &str> = BTreeMap::new();
    for track in tree {
        let lowered = track.name.to_lowercase();
        if lowered.starts_with(&wanted) && lowered != wanted {
            found.entry(lowered).or_insert(track.name.as_str());
        }
    }

    found
        .into_values()
        .take(limit)
        .map(str::to_string)
        .collect()
}
