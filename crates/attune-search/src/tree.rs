//! Append-only binary search tree of tracks, keyed by track name.
//!
//! Nodes live in an arena and refer to their children by index, so the
//! tree has no parent pointers and no recursive ownership. Both traversals
//! are iterative: a tree built from already-sorted input degenerates into a
//! list as deep as the catalog, and walking it must not touch the call
//! stack.
//!
//! Insertion sends a track left when its name sorts strictly before the
//! node's name and right otherwise, so tracks with equal names keep their
//! insertion order. There is no rebalancing, no removal and no lookup by
//! name.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use attune_core::Track;

/// Index of a node in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node {
    track: Track,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl Node {
    fn leaf(track: Track) -> Self {
        Self {
            track,
            left: None,
            right: None,
        }
    }
}

/// Tracks ordered by name.
#[derive(Debug, Clone, Default)]
pub struct SearchTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl SearchTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: None,
        }
    }

    /// Insert `track`, returning the id of its node.
    pub fn insert(&mut self, track: Track) -> NodeId {
        let id = NodeId(self.nodes.len());

        let Some(mut current) = self.root else {
            self.nodes.push(Node::leaf(track));
            self.root = Some(id);
            return id;
        };

        loop {
            let node = &self.nodes[current.0];
            let go_left = track.name < node.track.name;
            let next = if go_left { node.left } else { node.right };

            if let Some(child) = next {
                current = child;
                continue;
            }

            self.nodes.push(Node::leaf(track));
            let parent = &mut self.nodes[current.0];
            if go_left {
                parent.left = Some(id);
            } else {
                parent.right = Some(id);
            }
            return id;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The track stored at `id`, if the id belongs to this tree.
    pub fn get(&self, id: NodeId) -> Option<&Track> {
        self.nodes.get(id.0).map(|node| &node.track)
    }

    pub fn root(&self) -> Option<&Track> {
        self.root.and_then(|id| self.get(id))
    }

    /// Number of levels; `0` for an empty tree.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<NodeId> = self.root.into_iter().collect();

        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .flat_map(|&id| {
                    let node = &self.nodes[id.0];
                    node.left.into_iter().chain(node.right)
                })
                .collect();
        }

        height
    }

    /// Left subtree, node, right subtree: ascending name order.
    pub fn in_order(&self) -> InOrder<'_> {
        InOrder {
            tree: self,
            stack: Vec::new(),
            current: self.root,
            remaining: self.len(),
        }
    }

    /// Breadth-first from the root, left child before right.
    pub fn level_order(&self) -> LevelOrder<'_> {
        LevelOrder {
            tree: self,
            queue: self.root.into_iter().collect(),
            remaining: self.len(),
        }
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl FromIterator<Track> for SearchTree {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl Extend<Track> for SearchTree {
    fn extend<I: IntoIterator<Item = Track>>(&mut self, iter: I) {
        for track in iter {
            self.insert(track);
        }
    }
}

impl<'a> IntoIterator for &'a SearchTree {
    type Item = &'a Track;
    type IntoIter = InOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.in_order()
    }
}

/// In-order traversal driven by an explicit stack.
#[derive(Debug, Clone)]
pub struct InOrder<'a> {
    tree: &'a SearchTree,
    stack: Vec<NodeId>,
    current: Option<NodeId>,
    remaining: usize,
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a Track;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.current {
            self.stack.push(id);
            self.current = self.tree.node(id).left;
        }

        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        self.current = node.right;
        self.remaining -= 1;
        Some(&node.track)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for InOrder<'_> {}
impl FusedIterator for InOrder<'_> {}

/// Level-order traversal driven by a FIFO queue.
#[derive(Debug, Clone)]
pub struct LevelOrder<'a> {
    tree: &'a SearchTree,
    queue: VecDeque<NodeId>,
    remaining: usize,
}

impl<'a> Iterator for LevelOrder<'a> {
    type Item = &'a Track;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.queue.pop_front()?;
        let node = self.tree.node(id);
        self.queue.extend(node.left);
        self.queue.extend(node.right);
        self.remaining -= 1;
        Some(&node.track)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for LevelOrder<'_> {}
impl FusedIterator for LevelOrder<'_> {}
