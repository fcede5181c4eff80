// src/rules/swallowed_exception.rs
//! 1-3-2: a guard around an external interaction is dropped.
//!
//! Any `if` whose condition mentions a contract of the unit, textually, is
//! replaced by its true branch.

use super::pattern::collect_ids;
use super::{Rewrite, RewriteContext, Rule};
use crate::ast::{Node, NodeId, Tree};
use crate::codegen::emit;
use crate::error::{MutationError, Result};
use crate::locate::contract_names;

pub struct SwallowedException;

impl Rule for SwallowedException {
    fn id(&self) -> &'static str {
        "1-3-2"
    }

    fn name(&self) -> &'static str {
        "swallowed exception"
    }

    fn description(&self) -> &'static str {
        "Keeps only the true branch of an `if` whose condition names a known contract"
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        let names = contract_names(tree.root());
        if names.is_empty() {
            return Vec::new();
        }
        collect_ids(tree, |node| {
            let Node::IfStatement(stmt) = node else {
                return false;
            };
            // Conditions the generator cannot render are not candidates.
            emit(&stmt.condition, 0)
                .map(|text| names.iter().any(|name| text.contains(name.as_str())))
                .unwrap_or(false)
        })
    }

    fn rewrite(&self, _cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        let Node::IfStatement(stmt) = target else {
            return Err(MutationError::structural(
                target.kind().as_str(),
                "expected an if statement",
            ));
        };
        Ok(Rewrite::replace(vec![stmt.true_body.as_ref().clone()]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codegen::emit_tree;
    use crate::rules::fixture::{call, contract, expr_stmt, function, ident, member};
    use crate::rules::mutate;

    fn guarded(id: u64, receiver: &str) -> String {
        let check = call(
            id + 1,
            &member(id + 2, receiver, "isListed", "function (address) view returns (bool)"),
            &[ident(id + 4, "item", "address")],
        );
        let action = expr_stmt(id + 10, &call(id + 11, &ident(id + 12, "ship", "function ()"), &[]));
        format!(
            r#"{{"nodeType": "IfStatement", "id": {id}, "condition": {check},
                "trueBody": {{"nodeType": "Block", "id": {b}, "statements": [{action}]}},
                "falseBody": {fb}}}"#,
            b = id + 9,
            fb = expr_stmt(id + 20, &ident(id + 21, "refund", "function ()")),
        )
    }

    #[test]
    fn condition_naming_contract_is_candidate() {
        // `Target` is the fixture contract's own name.
        let cond = r#"{"nodeType": "IfStatement", "id": 300,
            "condition": {"nodeType": "Identifier", "id": 301, "name": "open"},
            "trueBody": {"nodeType": "Break", "id": 302}}"#;
        let body = [
            guarded(100, "Target"),
            guarded(200, "Registry"),
            cond.to_string(),
        ]
        .join(", ");
        let tree = contract(&function(10, "run", &body));
        assert_eq!(SwallowedException.detect(&tree), vec![NodeId(100)]);
    }

    #[test]
    fn keeps_true_branch_only() {
        let body = guarded(100, "Target");
        let mut tree = contract(&function(10, "run", &body));
        mutate(&SwallowedException, &mut tree, NodeId(100), false).unwrap();
        let text = emit_tree(&tree).unwrap();
        assert!(text.contains("ship();"));
        assert!(!text.contains("if "));
        assert!(!text.contains("refund"));
    }
}
