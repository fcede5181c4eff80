// src/rules/recursion.rs
//! 5-13-1: a parameterless function calls itself before anything else.

use super::pattern::{callee_name, collect_ids};
use super::{Rewrite, RewriteContext, Rule};
use crate::ast::{FunctionDefinition, Node, NodeId, Tree};
use crate::error::{MutationError, Result};

pub struct Recursion;

fn calls_itself(func: &FunctionDefinition) -> bool {
    let Some(body) = func.body.as_deref() else {
        return false;
    };
    let mut found = false;
    body.walk(&mut |node| {
        if let Node::FunctionCall(call) = node {
            found |= callee_name(call) == Some(func.name.as_str());
        }
    });
    found
}

fn is_candidate(func: &FunctionDefinition) -> bool {
    let niladic = matches!(func.parameters.as_ref(), Node::ParameterList(list) if list.parameters.is_empty());
    !func.is_constructor()
        && !func.is_special_entry()
        && !func.name.is_empty()
        && niladic
        && func.body.is_some()
        && !calls_itself(func)
}

impl Rule for Recursion {
    fn id(&self) -> &'static str {
        "5-13-1"
    }

    fn name(&self) -> &'static str {
        "unbounded recursion"
    }

    fn description(&self) -> &'static str {
        "Prepends a self-call to a parameterless function"
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        collect_ids(tree, |node| matches!(node, Node::FunctionDefinition(func) if is_candidate(func)))
    }

    fn rewrite(&self, cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        let Node::FunctionDefinition(def) = target else {
            return Err(MutationError::structural(
                target.kind().as_str(),
                "expected a function definition",
            ));
        };
        let callee = cx.build.identifier(&def.name, Some("function ()"));
        let call = cx.build.call(callee, Vec::new(), Some("tuple()"));
        let doc = cx.marker(self.id(), "add", "recursive_call,function");
        let stmt = cx.build.expression_statement(call, doc);

        let mut func = target.clone();
        let body = match &mut func {
            Node::FunctionDefinition(f) => f.body.as_deref_mut(),
            _ => None,
        };
        let Some(Node::Block(block)) = body else {
            return Err(MutationError::structural("FunctionDefinition", "no block body"));
        };
        block.statements.insert(0, stmt);
        Ok(Rewrite::replace(vec![func]))
    }
}
