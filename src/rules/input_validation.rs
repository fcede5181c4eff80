// src/rules/input_validation.rs
//! 6-2-1: a `msg.data.length` check is short-circuited to `true`.

use super::pattern::is_member_of;
use super::{Rewrite, RewriteContext, Rule};
use crate::ast::{Node, NodeId, Tree};
use crate::error::{MutationError, Result};

pub struct InputValidation;

fn is_length_check(node: &Node) -> bool {
    let Node::BinaryOperation(op) = node else {
        return false;
    };
    match op.left_expression.as_ref() {
        Node::MemberAccess(access) => {
            access.member_name == "length" && is_member_of(&access.expression, "msg", "data")
        }
        _ => false,
    }
}

/// Matches are reported once; their operands are not searched again.
fn collect_checks(node: &Node, out: &mut Vec<NodeId>) {
    if is_length_check(node) {
        out.push(node.id());
        return;
    }
    for child in node.children() {
        collect_checks(child, out);
    }
}

impl Rule for InputValidation {
    fn id(&self) -> &'static str {
        "6-2-1"
    }

    fn name(&self) -> &'static str {
        "missing input validation"
    }

    fn description(&self) -> &'static str {
        "Replaces comparisons on `msg.data.length` with `true`"
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        let mut out = Vec::new();
        collect_checks(tree.root(), &mut out);
        out
    }

    fn rewrite(&self, cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        if !is_length_check(target) {
            return Err(MutationError::structural(
                target.kind().as_str(),
                "expected a msg.data.length comparison",
            ));
        }
        Ok(Rewrite::replace(vec![cx.build.bool_literal(true)]))
    }
}
