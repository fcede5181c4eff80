// src/rules/overflow_guard.rs
//! 7-1-1: an arithmetic guard in `require`/`assert` is reduced to `true`,
//! re-opening the overflow or underflow it protected against.

use super::pattern::functions;
use super::{Rewrite, RewriteContext, Rule};
use crate::ast::{BinaryOperation, FunctionCall, FunctionDefinition, Node, NodeId, Tree};
use crate::error::{MutationError, Result};
use std::collections::{BTreeMap, BTreeSet};

pub struct OverflowGuard;

const ARITHMETIC: [&str; 4] = ["+", "-", "*", "/"];

/// Names on both sides of a binary operation, if both sides have one.
fn operand_names(op: &BinaryOperation) -> Option<(&str, &str)> {
    Some((op.left_expression.name()?, op.right_expression.name()?))
}

/// `require(...)`, `assert(...)`, or a member call on a base of that name.
fn is_guard_call(call: &FunctionCall) -> bool {
    let name = match call.expression.as_ref() {
        Node::Identifier(id) => Some(id.name.as_str()),
        Node::MemberAccess(access) => access.expression.name(),
        _ => None,
    };
    matches!(name, Some("require" | "assert"))
}

/// Variables a function does arithmetic on.
#[derive(Default)]
struct ArithmeticUse<'a> {
    operands: BTreeSet<&'a str>,
    /// Assigned name to the operands of the arithmetic that produced it.
    results: BTreeMap<&'a str, [&'a str; 2]>,
}

impl<'a> ArithmeticUse<'a> {
    fn of(body: &'a Node) -> Self {
        let mut usage = Self::default();
        body.walk(&mut |node| match node {
            Node::BinaryOperation(op) if ARITHMETIC.contains(&op.operator.as_str()) => {
                if let Some((l, r)) = operand_names(op) {
                    usage.operands.extend([l, r]);
                }
            }
            Node::ExpressionStatement(stmt) => {
                let Node::Assignment(assign) = stmt.expression.as_ref() else {
                    return;
                };
                let Node::BinaryOperation(op) = assign.right_hand_side.as_ref() else {
                    return;
                };
                if let (Some(lhs), Some((l, r))) = (assign.left_hand_side.name(), operand_names(op)) {
                    usage.results.insert(lhs, [l, r]);
                }
            }
            _ => {}
        });
        usage
    }

    fn guards(&self, condition: &Node) -> bool {
        let Node::BinaryOperation(op) = condition else {
            return false;
        };
        let left = op.left_expression.name();
        let right = op.right_expression.name();
        let direct = matches!((left, right), (Some(l), Some(r))
            if self.operands.contains(l) && self.operands.contains(r));
        let derived = self.results.values().any(|pair| {
            left.is_some_and(|l| pair.contains(&l)) || right.is_some_and(|r| pair.contains(&r))
        });
        direct || derived
    }
}

fn guard_conditions(func: &FunctionDefinition, out: &mut Vec<NodeId>) {
    let Some(body) = func.body.as_deref() else {
        return;
    };
    let usage = ArithmeticUse::of(body);
    body.walk(&mut |node| {
        let Node::FunctionCall(call) = node else {
            return;
        };
        let Some(condition) = call.arguments.first() else {
            return;
        };
        if is_guard_call(call) && usage.guards(condition) && !out.contains(&condition.id()) {
            out.push(condition.id());
        }
    });
}

impl Rule for OverflowGuard {
    fn id(&self) -> &'static str {
        "7-1-1"
    }

    fn name(&self) -> &'static str {
        "integer overflow"
    }

    fn description(&self) -> &'static str {
        "Replaces require/assert conditions over arithmetic operands with `true`"
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        let mut out = Vec::new();
        for func in functions(tree.root()) {
            guard_conditions(func, &mut out);
        }
        out
    }

    fn rewrite(&self, cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        if !matches!(target, Node::BinaryOperation(_)) {
            return Err(MutationError::structural(
                target.kind().as_str(),
                "expected a guard condition",
            ));
        }
        Ok(Rewrite::replace(vec![cx.build.bool_literal(true)]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codegen::emit_tree;
    use crate::rules::fixture::{binary, call, contract, expr_stmt, function, ident};
    use crate::rules::mutate;

    fn require(id: u64, condition: &str) -> String {
        let callee = ident(id + 1, "require", "function (bool) pure");
        expr_stmt(id + 5, &call(id, &callee, &[condition.to_string()]))
    }

    fn assign_sum(id: u64, lhs: &str, a: &str, b: &str) -> String {
        let sum = binary(id + 2, "+", &ident(id + 3, a, "uint256"), &ident(id + 4, b, "uint256"));
        expr_stmt(
            id,
            &format!(
                r#"{{"nodeType": "Assignment", "id": {}, "operator": "=",
                    "leftHandSide": {}, "rightHandSide": {sum}}}"#,
                id + 1,
                ident(id + 5, lhs, "uint256"),
            ),
        )
    }

    #[test]
    fn guard_over_summed_operands_is_a_candidate() {
        let body = [
            assign_sum(20, "total", "balance", "amount"),
            require(40, &binary(50, ">=", &ident(51, "total", "uint256"), &ident(52, "balance", "uint256"))),
        ]
        .join(", ");
        let tree = contract(&function(10, "deposit", &body));
        assert_eq!(OverflowGuard.detect(&tree), vec![NodeId(50)]);
    }

    #[test]
    fn unrelated_guards_are_ignored() {
        let body = [
            assign_sum(20, "total", "balance", "amount"),
            require(40, &binary(50, "==", &ident(51, "owner", "address"), &ident(52, "caller", "address"))),
        ]
        .join(", ");
        let tree = contract(&function(10, "deposit", &body));
        assert!(OverflowGuard.detect(&tree).is_empty());
    }

    #[test]
    fn operands_are_scoped_per_function() {
        let first = function(10, "add", &assign_sum(20, "total", "a", "b"));
        let second = function(
            100,
            "check",
            &require(140, &binary(150, ">=", &ident(151, "a", "uint256"), &ident(152, "b", "uint256"))),
        );
        let tree = contract(&[first, second].join(", "));
        assert!(OverflowGuard.detect(&tree).is_empty());
    }

    #[test]
    fn guard_becomes_true() {
        let body = [
            assign_sum(20, "total", "balance", "amount"),
            require(40, &binary(50, ">=", &ident(51, "total", "uint256"), &ident(52, "balance", "uint256"))),
        ]
        .join(", ");
        let mut tree = contract(&function(10, "deposit", &body));
        mutate(&OverflowGuard, &mut tree, NodeId(50), false).unwrap();
        let text = emit_tree(&tree).unwrap();
        assert!(text.contains("require(true);"));
        assert!(text.contains("total = balance + amount;"));
    }
}
