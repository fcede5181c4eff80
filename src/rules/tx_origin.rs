// src/rules/tx_origin.rs
//! 8-1-1: caller checks compare `tx.origin` instead of `msg.sender`.

use super::pattern::{collect_ids, is_msg_sender};
use super::{Rewrite, RewriteContext, Rule};
use crate::ast::{BinaryOperation, Node, NodeId, Tree, TypeDescriptions};
use crate::error::{MutationError, Result};

pub struct TxOrigin;

/// `msg.sender == x` or `x == msg.sender` where `x` is something a caller
/// can be compared against. The left operand wins when both sides qualify.
fn is_sender_check(op: &BinaryOperation) -> bool {
    if op.operator != "==" {
        return false;
    }
    if is_msg_sender(&op.left_expression) {
        return is_principal(&op.right_expression);
    }
    is_msg_sender(&op.right_expression) && is_principal(&op.left_expression)
}

/// Shapes accepted as the compared-against side.
fn is_principal(node: &Node) -> bool {
    matches!(
        node,
        Node::Identifier(_) | Node::FunctionCall(_) | Node::MemberAccess(_)
    )
}

impl Rule for TxOrigin {
    fn id(&self) -> &'static str {
        "8-1-1"
    }

    fn name(&self) -> &'static str {
        "tx.origin authentication"
    }

    fn description(&self) -> &'static str {
        "Swaps `msg.sender` for `tx.origin` in equality checks"
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        collect_ids(tree, |node| matches!(node, Node::BinaryOperation(op) if is_sender_check(op)))
    }

    fn rewrite(&self, cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        let mut check = target.clone();
        let Node::BinaryOperation(op) = &mut check else {
            return Err(MutationError::structural(
                target.kind().as_str(),
                "expected an equality check",
            ));
        };
        let (sender, other) = if is_msg_sender(&op.left_expression) {
            (&mut op.left_expression, &op.right_expression)
        } else if is_msg_sender(&op.right_expression) {
            (&mut op.right_expression, &op.left_expression)
        } else {
            return Err(MutationError::structural("BinaryOperation", "no msg.sender operand"));
        };
        if !is_principal(other) {
            return Err(MutationError::structural(
                other.kind().as_str(),
                "unsupported operand beside msg.sender",
            ));
        }

        let tx = cx.build.identifier("tx", Some("tx"));
        let origin = cx.build.member_access(
            tx,
            "origin",
            TypeDescriptions::new("address payable", "t_address_payable"),
        );
        **sender = origin;
        op.type_descriptions = TypeDescriptions::new("bool", "t_bool");
        Ok(Rewrite::replace(vec![check]))
    }
}
