//! Search tree nodes.
//!
//! Nodes live in a `SearchTree` arena and refer to their parent by `NodeId`
//! index, so a solution path is rebuilt by walking parent links.

use serde::{Deserialize, Serialize};

use crate::core::{Direction, GameState};

/// Index into the `SearchTree` node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A node in the search tree.
#[derive(Clone, Debug)]
pub struct Node {
    /// State reached at this node.
    pub state: GameState,

    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Move taken from the parent (None for root).
    pub action: Option<Direction>,

    /// Number of moves from the root.
    pub path_cost: u32,
}

impl Node {
    /// Create a root node.
    pub fn root(state: GameState) -> Self {
        Self {
            state,
            parent: NodeId::NONE,
            action: None,
            path_cost: 0,
        }
    }

    /// Create a child of `parent` reached by `action`.
    pub fn child(state: GameState, parent: NodeId, action: Direction, parent_cost: u32) -> Self {
        Self {
            state,
            parent,
            action: Some(action),
            path_cost: parent_cost + 1,
        }
    }

    /// Distance from the root. Every move costs one, so this is the path cost.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.path_cost
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Shorthand for the state's content hash.
    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.state.hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Board;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(5);
        assert_eq!(id.raw(), 5);
        assert!(!id.is_none());
        assert_eq!(format!("{}", id), "NodeId(5)");

        assert!(NodeId::NONE.is_none());
        assert_eq!(format!("{}", NodeId::NONE), "NodeId(NONE)");
    }

    #[test]
    fn test_root_and_child() {
        let state = GameState::from_board(Board::new(2, 2));
        let root = Node::root(state.clone());
        assert!(root.is_root());
        assert_eq!(root.path_cost, 0);
        assert_eq!(root.action, None);

        let child = Node::child(state, NodeId::new(0), Direction::Up, root.path_cost);
        assert!(!child.is_root());
        assert_eq!(child.path_cost, 1);
        assert_eq!(child.depth(), 1);
        assert_eq!(child.action, Some(Direction::Up));
    }
}
