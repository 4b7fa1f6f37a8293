//! Range queries over a [`SearchTree`].
//!
//! A query keeps exactly the tracks of a traversal that satisfy the
//! attribute range, in traversal order. Matching is binary: there is no
//! scoring and no result limit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use attune_core::{AttributeRange, Track};

use crate::error::SearchError;
use crate::tree::{InOrder, LevelOrder, SearchTree};

/// Order in which the tree is walked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Depth-first, ascending by name.
    #[default]
    InOrder,
    /// Breadth-first from the root.
    LevelOrder,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InOrder => "in-order",
            Self::LevelOrder => "level-order",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in-order" | "inorder" | "in_order" | "dfs" => Ok(Self::InOrder),
            "level-order" | "levelorder" | "level_order" | "bfs" => Ok(Self::LevelOrder),
            _ => Err(SearchError::UnknownStrategy(s.to_string())),
        }
    }
}

/// A traversal of either kind.
#[derive(Debug, Clone)]
pub enum Traversal<'a> {
    InOrder(InOrder<'a>),
    LevelOrder(LevelOrder<'a>),
}

impl<'a> Iterator for Traversal<'a> {
    type Item = &'a Track;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::InOrder(walk) => walk.next(),
            Self::LevelOrder(walk) => walk.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::InOrder(walk) => walk.size_hint(),
            Self::LevelOrder(walk) => walk.size_hint(),
        }
    }
}

impl ExactSizeIterator for Traversal<'_> {}

/// Walk `tree` in the given order.
pub fn traverse(tree: &SearchTree, strategy: Strategy) -> Traversal<'_> {
    match strategy {
        Strategy::InOrder => Traversal::InOrder(tree.in_order()),
        Strategy::LevelOrder => Traversal::LevelOrder(tree.level_order()),
    }
}

/// Lazily yield the tracks of `tree` that fall within `range`.
pub fn matches<'a>(
    tree: &'a SearchTree,
    range: &'a AttributeRange,
    strategy: Strategy,
) -> impl Iterator<Item = &'a Track> + 'a {
    traverse(tree, strategy).filter(move |track| range.contains(*track))
}

/// Every track of `tree` within `range`, in traversal order.
pub fn query<'a>(tree: &'a SearchTree, range: &AttributeRange, strategy: Strategy) -> Vec<&'a Track> {
    let found: Vec<&Track> = traverse(tree, strategy)
        .filter(|track| range.contains(*track))
        .collect();

    log::debug!(
        "{} query matched {} of {} tracks on {} features",
        strategy,
        found.len(),
        tree.len(),
        range.len()
    );

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use attune_core::{Band, Feature};

    fn track(name: &str, energy: f64) -> Track {
        Track::new(name).with_feature(Feature::Energy, energy)
    }

    fn sample_tree() -> SearchTree {
        [
            track("m", 0.5),
            track("c", 0.9),
            track("x", 0.5),
            track("a", 0.5),
            track("e", 0.1),
            track("z", 0.52),
        ]
        .into_iter()
        .collect()
    }

    fn energy_range(min: f64, max: f64) -> AttributeRange {
        AttributeRange::new().with_band(Feature::Energy, Band::new(min, max))
    }

    fn names(tracks: &[&Track]) -> Vec<String> {
        tracks.iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("in-order".parse::<Strategy>().unwrap(), Strategy::InOrder);
        assert_eq!("BFS".parse::<Strategy>().unwrap(), Strategy::LevelOrder);
        assert_eq!("level_order".parse::<Strategy>().unwrap(), Strategy::LevelOrder);
        assert!("sideways".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_strategy_display_round_trip() {
        for strategy in [Strategy::InOrder, Strategy::LevelOrder] {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
        assert_eq!(Strategy::default(), Strategy::InOrder);
    }

    #[test]
    fn test_strategy_serde() {
        let json = serde_json::to_string(&Strategy::LevelOrder).unwrap();
        assert_eq!(json, "\"level-order\"");
    }

    #[test]
    fn test_query_in_order() {
        let tree = sample_tree();
        let found = query(&tree, &energy_range(0.45, 0.55), Strategy::InOrder);
        assert_eq!(names(&found), vec!["a", "m", "x", "z"]);
    }

    #[test]
    fn test_query_level_order() {
        let tree = sample_tree();
        // m / c x / a e _ z
        let found = query(&tree, &energy_range(0.45, 0.55), Strategy::LevelOrder);
        assert_eq!(names(&found), vec!["m", "x", "a", "z"]);
    }

    #[test]
    fn test_query_is_subsequence_of_traversal() {
        let tree = sample_tree();
        let range = energy_range(0.0, 0.6);
        for strategy in [Strategy::InOrder, Strategy::LevelOrder] {
            let expected: Vec<&Track> = traverse(&tree, strategy)
                .filter(|t| t.energy <= 0.6)
                .collect();
            assert_eq!(query(&tree, &range, strategy), expected);
        }
    }

    #[test]
    fn test_query_is_idempotent() {
        let tree = sample_tree();
        let range = energy_range(0.45, 0.55);
        assert_eq!(
            query(&tree, &range, Strategy::LevelOrder),
            query(&tree, &range, Strategy::LevelOrder)
        );
    }

    #[test]
    fn test_matches_is_lazy_equivalent() {
        let tree = sample_tree();
        let range = energy_range(0.45, 0.55);
        let lazy: Vec<&Track> = matches(&tree, &range, Strategy::InOrder).collect();
        assert_eq!(lazy, query(&tree, &range, Strategy::InOrder));
    }

    #[test]
    fn test_query_inverted_band_matches_nothing() {
        let tree = sample_tree();
        assert!(query(&tree, &energy_range(0.6, 0.4), Strategy::InOrder).is_empty());
    }

    #[test]
    fn test_query_empty_tree() {
        let tree = SearchTree::new();
        assert!(query(&tree, &energy_range(0.0, 1.0), Strategy::LevelOrder).is_empty());
    }

    #[test]
    fn test_wider_band_is_superset() {
        let tree = sample_tree();
        let narrow = query(&tree, &energy_range(0.49, 0.51), Strategy::InOrder);
        let wide = query(&tree, &energy_range(0.4, 0.6), Strategy::InOrder);
        assert!(narrow.iter().all(|t| wide.contains(t)));
        assert!(wide.len() > narrow.len());
    }
}
