// src/rules/missing_return.rs
//! 5-6-1: a function that declares return values stops returning them.

use super::pattern::collect_ids;
use super::{Rewrite, RewriteContext, Rule};
use crate::ast::build::NodeBuilder;
use crate::ast::{FunctionDefinition, Node, NodeId, Tree};
use crate::error::{MutationError, Result};

pub struct MissingReturn;

/// True if `node` is, or holds in a block or `if` branch, a `return`.
pub(super) fn contains_return(node: &Node) -> bool {
    match node {
        Node::Return(_) => true,
        Node::Block(block) | Node::UncheckedBlock(block) => block.statements.iter().any(contains_return),
        Node::IfStatement(stmt) => {
            contains_return(&stmt.true_body) || stmt.false_body.as_deref().is_some_and(contains_return)
        }
        _ => false,
    }
}

pub(super) fn returns_something(func: &FunctionDefinition) -> bool {
    matches!(func.return_parameters.as_ref(), Node::ParameterList(list) if !list.parameters.is_empty())
}

fn strip_returns(statements: &mut Vec<Node>, build: &mut NodeBuilder) {
    statements.retain(|s| !matches!(s, Node::Return(_)));
    for stmt in statements.iter_mut() {
        strip_nested(stmt, build);
    }
}

fn strip_nested(node: &mut Node, build: &mut NodeBuilder) {
    match node {
        Node::Block(block) | Node::UncheckedBlock(block) => strip_returns(&mut block.statements, build),
        Node::IfStatement(stmt) => {
            strip_branch(&mut stmt.true_body, build);
            if let Some(other) = stmt.false_body.as_deref_mut() {
                strip_branch(other, build);
            }
        }
        _ => {}
    }
}

/// A branch that was only a `return` keeps an empty block.
fn strip_branch(branch: &mut Node, build: &mut NodeBuilder) {
    if matches!(branch, Node::Return(_)) {
        *branch = build.block(Vec::new());
    } else {
        strip_nested(branch, build);
    }
}

impl Rule for MissingReturn {
    fn id(&self) -> &'static str {
        "5-6-1"
    }

    fn name(&self) -> &'static str {
        "missing return"
    }

    fn description(&self) -> &'static str {
        "Removes the return statements of a function that declares return values"
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        collect_ids(tree, |node| match node {
            Node::FunctionDefinition(func) => {
                returns_something(func) && func.body.as_deref().is_some_and(contains_return)
            }
            _ => false,
        })
    }

    fn rewrite(&self, cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        let mut func = target.clone();
        let Node::FunctionDefinition(def) = &mut func else {
            return Err(MutationError::structural(
                target.kind().as_str(),
                "expected a function definition",
            ));
        };
        let body = def
            .body
            .as_deref_mut()
            .ok_or_else(|| MutationError::structural("FunctionDefinition", "no body"))?;
        strip_nested(body, &mut cx.build);
        Ok(Rewrite::replace(vec![func]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codegen::emit_tree;
    use crate::rules::fixture::{contract, function, function_with, ident, local};
    use crate::rules::mutate;

    fn ret(id: u64, name: &str) -> String {
        format!(
            r#"{{"nodeType": "Return", "id": {id}, "expression": {}}}"#,
            ident(id + 1, name, "bool")
        )
    }

    fn guarded_return(id: u64) -> String {
        format!(
            r#"{{"nodeType": "IfStatement", "id": {id},
                "condition": {cond}, "trueBody": {body}}}"#,
            cond = ident(id + 1, "early", "bool"),
            body = ret(id + 2, "early"),
        )
    }

    #[test]
    fn needs_return_values_and_a_return() {
        let returns = format!("[{}]", local(30, "", "bool"));
        let tree = contract(
            &[
                function_with(10, "check", "[]", &returns, &ret(40, "ok")),
                function(100, "noReturns", &ret(140, "ok")),
                function_with(200, "noStatement", "[]", &returns, ""),
            ]
            .join(", "),
        );
        assert_eq!(MissingReturn.detect(&tree), vec![NodeId(10)]);
    }

    #[test]
    fn returns_in_branches_count() {
        let returns = format!("[{}]", local(30, "", "bool"));
        let tree = contract(&function_with(10, "check", "[]", &returns, &guarded_return(50)));
        assert_eq!(MissingReturn.detect(&tree), vec![NodeId(10)]);
    }

    #[test]
    fn strips_top_level_and_branch_returns() {
        let returns = format!("[{}]", local(30, "", "bool"));
        let body = [guarded_return(50), ret(40, "ok")].join(", ");
        let mut tree = contract(&function_with(10, "check", "[]", &returns, &body));
        mutate(&MissingReturn, &mut tree, NodeId(10), false).unwrap();
        let text = emit_tree(&tree).unwrap();
        assert!(!text.contains("return "));
        assert!(text.contains("returns (bool)"));
        assert!(text.contains("if (early) {\n"));
    }
}
