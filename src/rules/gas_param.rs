// src/rules/gas_param.rs
//! 3-1: the gas-limit argument of an encoded call is dropped.

use super::pattern::collect_ids;
use super::{Rewrite, RewriteContext, Rule};
use crate::ast::{Node, NodeId, Tree};
use crate::error::{MutationError, Result};

const KEPT: usize = 2;

pub struct GasParam;

fn is_three_arg_encode(node: &Node) -> bool {
    let Node::FunctionCall(call) = node else {
        return false;
    };
    call.arguments.len() == KEPT + 1
        && matches!(call.expression.as_ref(),
            Node::MemberAccess(m) if m.member_name == "encodeWithSignature")
}

impl Rule for GasParam {
    fn id(&self) -> &'static str {
        "3-1"
    }

    fn name(&self) -> &'static str {
        "gas-limit parameter drop"
    }

    fn description(&self) -> &'static str {
        "Truncates a three-argument `abi.encodeWithSignature` to its first two arguments"
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        collect_ids(tree, is_three_arg_encode)
    }

    fn rewrite(&self, _cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        if !is_three_arg_encode(target) {
            return Err(MutationError::structural(
                target.kind().as_str(),
                "expected a three-argument encodeWithSignature call",
            ));
        }
        let mut call = target.clone();
        if let Node::FunctionCall(inner) = &mut call {
            inner.arguments.truncate(KEPT);
        }
        Ok(Rewrite::replace(vec![call]))
    }
}
