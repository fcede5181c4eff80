// src/rules/owner_setter.rs
//! 8-1-2: an ownership variable gains an unguarded public setter.

use super::pattern::{body_statements, capitalize, functions, is_msg_sender};
use super::{OperationKind, Rewrite, RewriteContext, Rule};
use crate::ast::{Node, NodeId, Tree, TypeDescriptions, VariableDeclaration};
use crate::error::{MutationError, Result};
use std::collections::BTreeSet;

pub struct OwnerSetter;

fn is_address_state(var: &VariableDeclaration) -> bool {
    var.state_variable
        && !var.constant
        && var.type_name.as_deref().and_then(Node::name) == Some("address")
}

fn is_payable(var: &VariableDeclaration) -> bool {
    let declared = match var.type_name.as_deref() {
        Some(Node::ElementaryTypeName(ty)) => ty.state_mutability.as_deref() == Some("payable"),
        _ => false,
    };
    declared || var.type_descriptions.type_string.as_deref() == Some("address payable")
}

fn is_owner_value(node: &Node) -> bool {
    is_msg_sender(node) || matches!(node, Node::Literal(_))
}

/// Uninitialised address state variables a constructor sets to the caller
/// or to a fixed address.
fn constructor_assigned(root: &Node, uninitialised: &BTreeSet<NodeId>) -> BTreeSet<NodeId> {
    let mut out = BTreeSet::new();
    for ctor in functions(root).filter(|f| f.is_constructor()) {
        for stmt in body_statements(ctor) {
            let Node::ExpressionStatement(s) = stmt else {
                continue;
            };
            let Node::Assignment(assign) = s.expression.as_ref() else {
                continue;
            };
            if !is_owner_value(&assign.right_hand_side) {
                continue;
            }
            let referenced = match assign.left_hand_side.as_ref() {
                Node::Identifier(id) => id.referenced_declaration,
                _ => None,
            };
            let Some(target) = referenced.and_then(|r| u64::try_from(r).ok()).map(NodeId) else {
                continue;
            };
            if uninitialised.contains(&target) {
                out.insert(target);
            }
        }
    }
    out
}

impl Rule for OwnerSetter {
    fn id(&self) -> &'static str {
        "8-1-2"
    }

    fn name(&self) -> &'static str {
        "owner manipulation"
    }

    fn description(&self) -> &'static str {
        "Adds an unguarded public setter for an ownership address"
    }

    fn operation(&self) -> OperationKind {
        OperationKind::Add
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        let root = tree.root();
        let vars: Vec<&VariableDeclaration> = root
            .preorder()
            .into_iter()
            .filter_map(|node| match node {
                Node::VariableDeclaration(var) if is_address_state(var) => Some(var),
                _ => None,
            })
            .collect();

        let uninitialised: BTreeSet<NodeId> = vars
            .iter()
            .filter(|var| var.value.is_none())
            .map(|var| var.id)
            .collect();
        let assigned = constructor_assigned(root, &uninitialised);

        vars.into_iter()
            .filter(|var| {
                var.name == "owner"
                    || var.value.as_deref().is_some_and(is_owner_value)
                    || assigned.contains(&var.id)
            })
            .map(|var| var.id)
            .collect()
    }

    fn rewrite(&self, cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        let Node::VariableDeclaration(var) = target else {
            return Err(MutationError::structural(
                target.kind().as_str(),
                "expected a state variable",
            ));
        };
        if var.name.is_empty() {
            return Err(MutationError::structural("VariableDeclaration", "unnamed owner"));
        }
        let payable = is_payable(var);
        let lhs_type = if payable { "address payable" } else { "address" };
        let lhs = cx.build.identifier(&var.name, Some(lhs_type));
        let msg = cx.build.identifier("msg", Some("msg"));
        let mut sender = cx
            .build
            .member_access(msg, "sender", TypeDescriptions::new("address", "t_address"));
        if payable {
            sender = cx.build.payable_cast(sender);
        }
        let assign = cx.build.assignment(lhs, sender);
        let stmt = cx.build.expression_statement(assign, None);
        let body = cx.build.block(vec![stmt]);
        let doc = cx.marker(self.id(), "add", "function");
        let name = format!("set{}", capitalize(&var.name));
        Ok(Rewrite::add(vec![cx.build.function(&name, "public", body, doc)]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codegen::emit_tree;
    use crate::rules::fixture::{contract, expr_stmt, function, member, number, state_var};
    use crate::rules::mutate;

    fn constructor(id: u64, stmts: &str) -> String {
        function(id, "", stmts).replace(r#""kind": "function""#, r#""kind": "constructor""#)
    }

    fn assign_to(id: u64, var: &str, decl: u64, rhs: &str) -> String {
        expr_stmt(
            id,
            &format!(
                r#"{{"nodeType": "Assignment", "id": {}, "operator": "=",
                    "leftHandSide": {{"nodeType": "Identifier", "id": {}, "name": "{var}",
                        "referencedDeclaration": {decl}}},
                    "rightHandSide": {rhs}}}"#,
                id + 1,
                id + 2,
            ),
        )
    }

    #[test]
    fn finds_owner_like_addresses() {
        let sender = member(60, "msg", "sender", "address");
        let tree = contract(
            &[
                state_var(10, "owner", "address", "private", None),
                state_var(20, "admin", "address", "public", Some(&sender)),
                state_var(30, "treasury", "address", "internal", Some(&number(32, "0"))),
                state_var(40, "manager", "address", "internal", None),
                state_var(50, "spare", "address", "internal", None),
                state_var(70, "count", "uint256", "internal", None),
                constructor(100, &assign_to(140, "manager", 40, &member(150, "msg", "sender", "address"))),
            ]
            .join(", "),
        );
        assert_eq!(
            OwnerSetter.detect(&tree),
            vec![NodeId(10), NodeId(20), NodeId(30), NodeId(40)]
        );
    }

    #[test]
    fn constant_addresses_are_skipped() {
        let owner = state_var(10, "owner", "address", "internal", None)
            .replace(r#""constant": false"#, r#""constant": true"#);
        assert!(OwnerSetter.detect(&contract(&owner)).is_empty());
    }

    #[test]
    fn appends_public_setter() {
        let mut tree = contract(&state_var(10, "owner", "address", "internal", None));
        let id = mutate(&OwnerSetter, &mut tree, NodeId(10), true).unwrap();
        assert!(id > NodeId(1000));
        let text = emit_tree(&tree).unwrap();
        assert!(text.contains("@notice vuln,8-1-2,add,function"));
        assert!(text.contains("function setOwner() public {\n        owner = msg.sender;\n    }\n"));
    }

    #[test]
    fn payable_owner_gets_a_cast_sender() {
        let owner = state_var(10, "owner", "address", "internal", None).replace(
            r#""name": "address","#,
            r#""name": "address", "stateMutability": "payable","#,
        );
        let mut tree = contract(&owner);
        mutate(&OwnerSetter, &mut tree, NodeId(10), false).unwrap();
        let text = emit_tree(&tree).unwrap();
        assert!(text.contains("owner = payable(msg.sender);"), "{text}");
    }
}
