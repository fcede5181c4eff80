// src/rules/unchecked_send.rs
//! 4-1: the success flag of `send` to the caller is no longer checked.

use super::pattern::{collect_ids, is_msg_sender};
use super::unchecked_call::split_declaration;
use super::{Rewrite, RewriteContext, Rule};
use crate::ast::{ElementaryTypeRef, Node, NodeId, Tree};
use crate::error::Result;

pub struct UncheckedSend;

/// `payable(msg.sender)`.
fn is_payable_sender(node: &Node) -> bool {
    let Node::FunctionCall(cast) = node else {
        return false;
    };
    let payable = match cast.expression.as_ref() {
        Node::ElementaryTypeNameExpression(e) => match &e.type_name {
            ElementaryTypeRef::Node(ty) => {
                matches!(ty.as_ref(), Node::ElementaryTypeName(t) if t.state_mutability.as_deref() == Some("payable"))
            }
            ElementaryTypeRef::Name(_) => false,
        },
        _ => false,
    };
    payable && cast.arguments.iter().any(is_msg_sender)
}

/// `msg.sender.send(v)` or `payable(msg.sender).send(v)`.
fn is_sender_send(node: &Node) -> bool {
    let Node::FunctionCall(call) = node else {
        return false;
    };
    let Node::MemberAccess(send) = call.expression.as_ref() else {
        return false;
    };
    send.member_name == "send" && (is_msg_sender(&send.expression) || is_payable_sender(&send.expression))
}

impl Rule for UncheckedSend {
    fn id(&self) -> &'static str {
        "4-1"
    }

    fn name(&self) -> &'static str {
        "unchecked send"
    }

    fn description(&self) -> &'static str {
        "Splits `T x = msg.sender.send(v)` into `T x = true` and a bare send"
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        collect_ids(tree, |node| match node {
            Node::VariableDeclarationStatement(stmt) => {
                stmt.initial_value.as_deref().is_some_and(is_sender_send)
            }
            _ => false,
        })
    }

    fn rewrite(&self, cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        split_declaration(cx, target, self.id(), "function_call,function")
    }
}
