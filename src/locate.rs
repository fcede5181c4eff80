//! Id-based lookup over a [`Tree`](crate::ast::Tree).
use crate::ast::{Node, NodeId, NodeKind, SlotMut};

#[must_use]
pub fn find_by_id(root: &Node, id: NodeId) -> Option<&Node> {
    if root.id() == id {
        return Some(root);
    }
    root.children()
        .into_iter()
        .find_map(|child| find_by_id(child, id))
}

pub fn find_by_id_mut(root: &mut Node, id: NodeId) -> Option<&mut Node> {
    if root.id() == id {
        return Some(root);
    }
    for slot in root.slots_mut() {
        for child in SlotMut::into_nodes(slot) {
            if let Some(found) = find_by_id_mut(child, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Ancestors of `id`, outermost first, excluding the node itself.
/// `None` if the id is not in the tree.
#[must_use]
pub fn path_to(root: &Node, id: NodeId) -> Option<Vec<&Node>> {
    fn descend<'a>(node: &'a Node, id: NodeId, trail: &mut Vec<&'a Node>) -> bool {
        if node.id() == id {
            return true;
        }
        trail.push(node);
        if node.children().into_iter().any(|c| descend(c, id, trail)) {
            return true;
        }
        trail.pop();
        false
    }

    let mut trail = Vec::new();
    descend(root, id, &mut trail).then_some(trail)
}

/// Nearest enclosing owner of a statement or member list.
#[must_use]
pub fn find_parent_of(root: &Node, id: NodeId) -> Option<&Node> {
    path_to(root, id)?
        .into_iter()
        .rev()
        .find(|n| n.statements().is_some() || n.declarations().is_some())
}

/// Nearest ancestor that owns a declaration list (contract or source unit).
#[must_use]
pub fn find_declaration_owner(root: &Node, id: NodeId) -> Option<&Node> {
    path_to(root, id)?
        .into_iter()
        .rev()
        .find(|n| n.declarations().is_some())
}

/// First declaration of `kind` named `name`, in preorder.
#[must_use]
pub fn find_decl_by_kind_and_name(root: &Node, kind: NodeKind, name: &str) -> Option<NodeId> {
    root.preorder()
        .into_iter()
        .find(|n| n.kind() == kind && n.name() == Some(name))
        .map(Node::id)
}

/// Names of every contract, interface and library in the unit.
#[must_use]
pub fn contract_names(root: &Node) -> Vec<String> {
    root.preorder()
        .into_iter()
        .filter(|n| n.kind() == NodeKind::ContractDefinition)
        .filter_map(|n| n.name().map(str::to_string))
        .collect()
}
