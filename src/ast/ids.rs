//! Fresh node identifiers.

use super::{Node, NodeId, SlotMut, Tree};

/// Hands out ids strictly above every id already present in a tree.
#[derive(Debug, Clone)]
pub struct NodeIdAllocator {
    next: u64,
}

impl NodeIdAllocator {
    #[must_use]
    pub fn starting_at(first: NodeId) -> Self {
        Self { next: first.0 }
    }

    #[must_use]
    pub fn for_tree(tree: &Tree) -> Self {
        Self::starting_at(NodeId(tree.max_id().0 + 1))
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    #[must_use]
    pub fn peek(&self) -> NodeId {
        NodeId(self.next)
    }

    /// Gives `node` and all of its descendants fresh ids, in preorder.
    pub fn renumber(&mut self, node: &mut Node) {
        node.set_id(self.next_id());
        for slot in node.slots_mut() {
            for child in SlotMut::into_nodes(slot) {
                self.renumber(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::NodeBuilder;

    #[test]
    fn ids_are_sequential_from_start() {
        let mut ids = NodeIdAllocator::starting_at(NodeId(40));
        assert_eq!(ids.next_id(), NodeId(40));
        assert_eq!(ids.next_id(), NodeId(41));
        assert_eq!(ids.peek(), NodeId(42));
    }

    #[test]
    fn renumber_assigns_preorder_ids() {
        let mut build = NodeBuilder::new(NodeIdAllocator::starting_at(NodeId(1)));
        let lhs = build.identifier("x", None);
        let rhs = build.bool_literal(true);
        let mut assign = build.assignment(lhs, rhs);

        let mut ids = NodeIdAllocator::starting_at(NodeId(100));
        ids.renumber(&mut assign);
        let seen: Vec<_> = assign.preorder().iter().map(|n| n.id()).collect();
        assert_eq!(seen, vec![NodeId(100), NodeId(101), NodeId(102)]);
    }
}
