//! Structural edits: replace, delete and append, addressed by node id.
use crate::ast::{Category, Node, NodeId, NodeIdAllocator, NodeKind, SlotMut, SourceSpan};
use crate::error::{MutationError, Result};
use crate::locate::{find_by_id, find_by_id_mut, find_declaration_owner};

/// Replaces the node `target` with `replacements`.
///
/// Single-child fields take exactly one node, optional fields zero or one,
/// list fields any number. An empty replacement in a tuple field leaves a hole.
///
/// # Errors
/// `NotFound` if `target` is absent, `Structural` if the replacement does not
/// fit the field that holds the target.
pub fn replace(root: &mut Node, target: NodeId, replacements: Vec<Node>) -> Result<()> {
    if root.id() == target {
        return Err(MutationError::structural(
            root.kind().as_str(),
            "the root node cannot be replaced",
        ));
    }
    let old = find_by_id(root, target).ok_or(MutationError::NotFound { id: target })?;
    for node in &replacements {
        if !fits_in_place_of(old, node) {
            return Err(MutationError::structural(
                node.kind().as_str(),
                format!("cannot stand in for {} #{target}", old.kind().as_str()),
            ));
        }
    }
    let mut pending = Some(replacements);
    if splice_into(root, target, &mut pending)? {
        Ok(())
    } else {
        Err(MutationError::NotFound { id: target })
    }
}

/// Removes the node `target` from its parent.
///
/// # Errors
/// See [`replace`].
pub fn delete(root: &mut Node, target: NodeId) -> Result<()> {
    replace(root, target, Vec::new())
}

/// Appends `nodes` to the member list of the contract (or source unit) that
/// encloses `anchor`. Each new subtree is renumbered above the tree's current
/// maximum id and given a zero-length span just past the last member.
///
/// Returns the ids of the appended top-level nodes.
///
/// # Errors
/// `NotFound` if `anchor` is absent, `Structural` if it has no enclosing
/// member list or a node is not a declaration.
pub fn append_sibling(root: &mut Node, anchor: NodeId, nodes: Vec<Node>) -> Result<Vec<NodeId>> {
    if find_by_id(root, anchor).is_none() {
        return Err(MutationError::NotFound { id: anchor });
    }
    let owner_id = find_declaration_owner(root, anchor)
        .map(Node::id)
        .ok_or_else(|| {
            MutationError::structural(root.kind().as_str(), format!("#{anchor} has no enclosing member list"))
        })?;
    if let Some(bad) = nodes.iter().find(|n| n.category() != Category::Declaration) {
        return Err(MutationError::structural(
            bad.kind().as_str(),
            "only declarations can be appended to a member list",
        ));
    }

    let mut ids = NodeIdAllocator::starting_at(NodeId(root.max_id().0 + 1));
    let owner = find_by_id_mut(root, owner_id).ok_or(MutationError::NotFound { id: owner_id })?;
    let owner_span = owner.src();
    let members = owner.declarations_mut().ok_or_else(|| {
        MutationError::structural("ContractDefinition", "owner lost its member list")
    })?;

    let mut appended = Vec::with_capacity(nodes.len());
    for mut node in nodes {
        ids.renumber(&mut node);
        node.set_src(Some(next_span(members, owner_span)));
        appended.push(node.id());
        members.push(node);
    }
    Ok(appended)
}

fn fits_in_place_of(old: &Node, new: &Node) -> bool {
    let category = old.category();
    match category {
        Category::Unit => false,
        Category::Clause => old.kind() == new.kind(),
        _ => new.category() == category,
    }
}

fn splice_into(node: &mut Node, target: NodeId, pending: &mut Option<Vec<Node>>) -> Result<bool> {
    let owner = node.kind().as_str();
    for slot in node.slots_mut() {
        match slot {
            SlotMut::One(name, child) => {
                if child.id() == target {
                    let mut nodes = pending.take().unwrap_or_default();
                    if nodes.len() != 1 {
                        return Err(MutationError::structural(
                            owner,
                            format!("field `{name}` needs exactly one node, got {}", nodes.len()),
                        ));
                    }
                    if let Some(new) = nodes.pop() {
                        *child = new;
                    }
                    return Ok(true);
                }
                if splice_into(child, target, pending)? {
                    return Ok(true);
                }
            }
            SlotMut::Opt(name, child) => {
                if child.as_deref().is_some_and(|c| c.id() == target) {
                    let mut nodes = pending.take().unwrap_or_default();
                    if nodes.len() > 1 {
                        return Err(MutationError::structural(
                            owner,
                            format!("field `{name}` holds at most one node, got {}", nodes.len()),
                        ));
                    }
                    *child = nodes.pop().map(Box::new);
                    return Ok(true);
                }
                if let Some(inner) = child.as_deref_mut() {
                    if splice_into(inner, target, pending)? {
                        return Ok(true);
                    }
                }
            }
            SlotMut::List(_, list) => {
                if let Some(pos) = list.iter().position(|c| c.id() == target) {
                    let nodes = pending.take().unwrap_or_default();
                    list.splice(pos..=pos, nodes);
                    return Ok(true);
                }
                for child in list.iter_mut() {
                    if splice_into(child, target, pending)? {
                        return Ok(true);
                    }
                }
            }
            SlotMut::Sparse(_, list) => {
                let hit = list
                    .iter()
                    .position(|c| c.as_ref().is_some_and(|c| c.id() == target));
                if let Some(pos) = hit {
                    let nodes = pending.take().unwrap_or_default();
                    if nodes.is_empty() {
                        list[pos] = None;
                    } else {
                        list.splice(pos..=pos, nodes.into_iter().map(Some));
                    }
                    return Ok(true);
                }
                for child in list.iter_mut().flatten() {
                    if splice_into(child, target, pending)? {
                        return Ok(true);
                    }
                }
            }
        }
    }
    Ok(false)
}

/// Zero-length span placed after the last positioned member.
fn next_span(members: &[Node], owner_span: Option<SourceSpan>) -> SourceSpan {
    let last = members.iter().rev().find_map(|m| m.src().map(|s| (m, s)));
    match (last, owner_span) {
        (Some((member, span)), _) => {
            SourceSpan::new(span.start + 1 + nested_length(member) + 1, 0, span.file)
        }
        (None, Some(owner)) => SourceSpan::new(owner.start, 0, owner.file),
        (None, None) => SourceSpan::new(0, 0, 0),
    }
}

/// Span length of a node plus everything nested in it, not counting bodies.
///
/// Also maps a node back to an approximate extent of the original text.
#[must_use]
pub fn nested_length(node: &Node) -> usize {
    let own = match node.kind() {
        NodeKind::Block => 0,
        _ => node.src().map_or(0, |s| s.length),
    };
    own + node
        .slots()
        .iter()
        .filter(|slot| slot.name() != "body")
        .flat_map(|slot| slot.nodes())
        .map(nested_length)
        .sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::NodeBuilder;
    use crate::ast::Tree;

    const UNIT: &str = r#"{
        "nodeType": "SourceUnit", "id": 30, "src": "0:200:0", "nodes": [
            {"nodeType": "ContractDefinition", "id": 29, "src": "0:200:0", "name": "Shop",
             "baseContracts": [], "nodes": [
                {"nodeType": "FunctionDefinition", "id": 28, "src": "20:100:0", "name": "buy",
                 "kind": "function", "visibility": "public",
                 "parameters": {"nodeType": "ParameterList", "id": 10, "src": "32:2:0", "parameters": []},
                 "returnParameters": {"nodeType": "ParameterList", "id": 11, "src": "42:0:0", "parameters": []},
                 "modifiers": [], "implemented": true,
                 "body": {"nodeType": "Block", "id": 27, "src": "42:78:0", "statements": [
                    {"nodeType": "VariableDeclarationStatement", "id": 26, "src": "50:20:0",
                     "declarations": [
                        {"nodeType": "VariableDeclaration", "id": 21, "src": "50:6:0", "name": "a",
                         "typeDescriptions": {"typeString": "uint256"}},
                        {"nodeType": "VariableDeclaration", "id": 22, "src": "58:6:0", "name": "b",
                         "typeDescriptions": {"typeString": "uint256"}}
                     ],
                     "initialValue": {"nodeType": "Identifier", "id": 25, "src": "66:3:0", "name": "pair"}},
                    {"nodeType": "IfStatement", "id": 24, "src": "72:40:0",
                     "condition": {"nodeType": "Identifier", "id": 23, "src": "76:2:0", "name": "ok"},
                     "trueBody": {"nodeType": "Break", "id": 20, "src": "80:6:0"}}
                 ]}}
             ]}
        ]
    }"#;

    fn tree() -> Tree {
        Tree::from_json(UNIT).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn replace_in_list_splices_many() {
        let mut tree = tree();
        let mut b = NodeBuilder::for_tree(&tree);
        let x = b.identifier("x", None);
        let y = b.identifier("y", None);
        let s1 = b.expression_statement(x, None);
        let s2 = b.expression_statement(y, None);
        replace(tree.root_mut(), NodeId(24), vec![s1, s2]).unwrap_or_else(|e| panic!("{e}"));
        let block = find_by_id(tree.root(), NodeId(27)).and_then(Node::statements).map(<[Node]>::len);
        assert_eq!(block, Some(3));
    }

    #[test]
    fn single_field_rejects_wrong_arity() {
        let mut tree = tree();
        let err = delete(tree.root_mut(), NodeId(23));
        assert!(matches!(err, Err(MutationError::Structural { .. })));
    }

    #[test]
    fn category_mismatch_is_structural() {
        let mut tree = tree();
        let mut b = NodeBuilder::for_tree(&tree);
        let block = b.block(Vec::new());
        let err = replace(tree.root_mut(), NodeId(23), vec![block]);
        assert!(matches!(err, Err(MutationError::Structural { .. })));
    }

    #[test]
    fn missing_target_is_not_found() {
        let mut tree = tree();
        assert!(matches!(
            delete(tree.root_mut(), NodeId(999)),
            Err(MutationError::NotFound { id: NodeId(999) })
        ));
    }

    #[test]
    fn root_is_never_replaced() {
        let mut tree = tree();
        assert!(matches!(
            delete(tree.root_mut(), NodeId(30)),
            Err(MutationError::Structural { .. })
        ));
    }

    #[test]
    fn deleting_tuple_member_leaves_hole() {
        let mut tree = tree();
        delete(tree.root_mut(), NodeId(21)).unwrap_or_else(|e| panic!("{e}"));
        match find_by_id(tree.root(), NodeId(26)) {
            Some(Node::VariableDeclarationStatement(vds)) => {
                assert_eq!(vds.declarations.len(), 2);
                assert!(vds.declarations[0].is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn optional_field_accepts_empty_replacement() {
        let mut tree = tree();
        delete(tree.root_mut(), NodeId(25)).unwrap_or_else(|e| panic!("{e}"));
        match find_by_id(tree.root(), NodeId(26)) {
            Some(Node::VariableDeclarationStatement(vds)) => assert!(vds.initial_value.is_none()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn append_renumbers_and_positions_new_members() {
        let mut tree = tree();
        let max_before = tree.max_id();
        let mut b = NodeBuilder::new(NodeIdAllocator::starting_at(NodeId(1)));
        let body = b.block(Vec::new());
        let func = b.function("toggle", "public", body, None);

        let ids = append_sibling(tree.root_mut(), NodeId(24), vec![func])
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(ids.len(), 1);
        assert!(ids[0] > max_before);

        let mut all = tree.ids();
        let count = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), count);

        let added = find_by_id(tree.root(), ids[0]).and_then(Node::src);
        let last = find_by_id(tree.root(), NodeId(28)).and_then(Node::src);
        match (added, last) {
            (Some(added), Some(last)) => {
                assert!(added.start > last.start);
                assert_eq!(added.length, 0);
            }
            other => panic!("missing spans {other:?}"),
        }
    }

    #[test]
    fn append_requires_member_list_owner() {
        let mut tree = tree();
        let mut b = NodeBuilder::for_tree(&tree);
        let body = b.block(Vec::new());
        let func = b.function("f", "public", body, None);
        let err = append_sibling(tree.root_mut(), NodeId(30), vec![func]);
        assert!(matches!(err, Err(MutationError::Structural { .. })));
    }
}
