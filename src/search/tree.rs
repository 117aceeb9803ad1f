//! Arena-based search tree.
//!
//! Uses a flat `Vec<Node>` with index-based parent references. A node never
//! outlives the tree, and a path is recovered by walking parents to the root.

use smallvec::SmallVec;
use tracing::trace;

use super::node::{Node, NodeId};
use super::solver::SearchError;
use crate::core::{Direction, GameState};
use crate::rules::Problem;

/// Arena-based search tree.
#[derive(Clone, Debug, Default)]
pub struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the tree and insert a root node for `state`.
    pub fn reset(&mut self, state: GameState) -> Result<NodeId, SearchError> {
        self.nodes.clear();
        self.alloc(Node::root(state))
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.raw() as usize]
    }

    /// Allocate a new node, returning its ID.
    ///
    /// Fails once every index below `NodeId::NONE` is taken.
    pub fn alloc(&mut self, node: Node) -> Result<NodeId, SearchError> {
        let id = id_for_index(self.nodes.len()).ok_or(SearchError::TreeFull(self.nodes.len()))?;
        self.nodes.push(node);
        Ok(id)
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Expand `id`: allocate one child per available move.
    ///
    /// Children are returned in the problem's action order. Each child's path
    /// cost is its parent's plus one.
    pub fn expand<P: Problem>(
        &mut self,
        id: NodeId,
        problem: &P,
    ) -> Result<SmallVec<[NodeId; 4]>, SearchError> {
        let (state, cost) = {
            let node = self.get(id);
            (node.state.clone(), node.path_cost)
        };

        let mut children = SmallVec::new();
        for action in problem.actions(&state) {
            let next = problem.result(&state, action)?;
            children.push(self.alloc(Node::child(next, id, action, cost))?);
        }

        trace!(node = %id, children = children.len(), "expanded");
        Ok(children)
    }

    /// States from the root to `id`, root first.
    #[must_use]
    pub fn path_states(&self, id: NodeId) -> Vec<GameState> {
        let mut states: Vec<GameState> = self.ancestry(id).map(|n| n.state.clone()).collect();
        states.reverse();
        states
    }

    /// Moves from the root to `id`, in play order.
    #[must_use]
    pub fn path_actions(&self, id: NodeId) -> Vec<Direction> {
        let mut actions: Vec<Direction> = self.ancestry(id).filter_map(|n| n.action).collect();
        actions.reverse();
        actions
    }

    /// Walk from `id` up to the root.
    fn ancestry(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        let mut current = id;
        std::iter::from_fn(move || {
            if current.is_none() {
                return None;
            }
            let node = self.get(current);
            current = node.parent;
            Some(node)
        })
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }
}

/// The id for arena slot `index`, if it is below the sentinel.
fn id_for_index(index: usize) -> Option<NodeId> {
    u32::try_from(index)
        .ok()
        .map(NodeId::new)
        .filter(|id| !id.is_none())
}
