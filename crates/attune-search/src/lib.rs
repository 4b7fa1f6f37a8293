//! Catalog search for attune.
//!
//! Holds tracks in a binary search tree ordered by name and answers range
//! queries by walking the tree in-order or level-order and keeping the
//! tracks that fall inside every band.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod query;
pub mod suggest;
pub mod tree;

pub use error::{SearchError, SearchResult};
pub use query::{matches, query, traverse, Strategy, Traversal};
pub use suggest::{suggest, DEFAULT_SUGGESTION_LIMIT};
pub use tree::{InOrder, LevelOrder, NodeId, SearchTree};
