// src/rules/unsafe_call.rs
//! 2-1-1: a value-carrying low-level call becomes a `transfer`.
//!
//! Both spellings are recognised: `recv.call.value(amt)(...)` from 0.4/0.5
//! and `recv.call{value: amt}(...)` from 0.6 on.

use super::pattern::collect_ids;
use super::{Rewrite, RewriteContext, Rule};
use crate::ast::{FunctionCall, Node, NodeId, Tree, TypeDescriptions};
use crate::error::{MutationError, Result};

pub struct UnsafeCall;

/// Receiver and amount of a value call, plus whether it used call options.
struct ValueCall<'a> {
    receiver: &'a Node,
    amount: &'a Node,
    options: bool,
}

fn value_call(call: &FunctionCall) -> Option<ValueCall<'_>> {
    match call.expression.as_ref() {
        // recv.call.value(amt)
        Node::FunctionCall(setter) => {
            let Node::MemberAccess(value) = setter.expression.as_ref() else {
                return None;
            };
            if value.member_name != "value" {
                return None;
            }
            let Node::MemberAccess(raw) = value.expression.as_ref() else {
                return None;
            };
            if raw.member_name != "call" {
                return None;
            }
            Some(ValueCall {
                receiver: &raw.expression,
                amount: setter.arguments.first()?,
                options: false,
            })
        }
        // recv.call{value: amt}
        Node::FunctionCallOptions(opts) => {
            let Node::MemberAccess(raw) = opts.expression.as_ref() else {
                return None;
            };
            if raw.member_name != "call" {
                return None;
            }
            let at = opts.names.iter().position(|n| n == "value")?;
            Some(ValueCall {
                receiver: &raw.expression,
                amount: opts.options.get(at)?,
                options: true,
            })
        }
        _ => None,
    }
}

impl Rule for UnsafeCall {
    fn id(&self) -> &'static str {
        "2-1-1"
    }

    fn name(&self) -> &'static str {
        "unsafe low-level call"
    }

    fn description(&self) -> &'static str {
        "Turns `recv.call.value(amt)(...)` into `recv.transfer(amt)`"
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        collect_ids(tree, |node| match node {
            Node::FunctionCall(call) => value_call(call).is_some(),
            _ => false,
        })
    }

    fn rewrite(&self, cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        let Node::FunctionCall(call) = target else {
            return Err(MutationError::structural(
                target.kind().as_str(),
                "expected a function call",
            ));
        };
        let found = value_call(call).ok_or_else(|| {
            MutationError::structural("FunctionCall", "not a value-carrying low-level call")
        })?;

        let mut receiver = found.receiver.clone();
        // 0.6+ only lets payable addresses transfer.
        if found.options && receiver.type_string() == Some("address") {
            receiver = cx.build.payable_cast(receiver);
        }
        let transfer = cx.build.member_access(
            receiver,
            "transfer",
            TypeDescriptions::new(
                "function (uint256)",
                "t_function_transfer_nonpayable$_t_uint256_$returns$__$",
            ),
        );
        let replacement = cx
            .build
            .call(transfer, vec![found.amount.clone()], Some("tuple()"));
        Ok(Rewrite::replace(vec![replacement]))
    }
}
