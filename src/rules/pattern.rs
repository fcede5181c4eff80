//! Shape predicates shared by the detectors.
use crate::ast::{FunctionCall, FunctionDefinition, Node, NodeId, Tree};
use crate::locate;

/// `base.member` where `base` is a bare identifier, e.g. `msg.sender`.
pub(super) fn is_member_of(node: &Node, base: &str, member: &str) -> bool {
    match node {
        Node::MemberAccess(access) => {
            access.member_name == member
                && matches!(access.expression.as_ref(), Node::Identifier(id) if id.name == base)
        }
        _ => false,
    }
}

pub(super) fn is_msg_sender(node: &Node) -> bool {
    is_member_of(node, "msg", "sender")
}

/// Name a call invokes: the identifier, or the member of a member access.
pub(super) fn callee_name(call: &FunctionCall) -> Option<&str> {
    match call.expression.as_ref() {
        Node::Identifier(id) => Some(&id.name),
        Node::MemberAccess(access) => Some(&access.member_name),
        _ => None,
    }
}

/// Every node of `tree` satisfying `pred`, in preorder.
pub(super) fn collect_ids(tree: &Tree, mut pred: impl FnMut(&Node) -> bool) -> Vec<NodeId> {
    let mut out = Vec::new();
    tree.root().walk(&mut |node| {
        if pred(node) {
            out.push(node.id());
        }
    });
    out
}

/// Function definitions with their ids, in preorder.
pub(super) fn functions(root: &Node) -> impl Iterator<Item = &FunctionDefinition> {
    root.preorder().into_iter().filter_map(|node| match node {
        Node::FunctionDefinition(func) => Some(func),
        _ => None,
    })
}

/// The contract that declares `id`.
pub(super) fn enclosing_contract(root: &Node, id: NodeId) -> Option<&Node> {
    locate::path_to(root, id)?
        .into_iter()
        .rev()
        .find(|n| matches!(n, Node::ContractDefinition(_)))
}

/// First character upper-cased, the rest kept.
pub(super) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Top-level statements of a function body, empty when unimplemented.
pub(super) fn body_statements(func: &FunctionDefinition) -> &[Node] {
    func.body
        .as_deref()
        .and_then(Node::statements)
        .unwrap_or_default()
}
