// src/rules/missing_constructor.rs
//! 5-2-1: the constructor disappears, leaving state uninitialised.

use super::pattern::collect_ids;
use super::{OperationKind, Rewrite, RewriteContext, Rule};
use crate::ast::{Node, NodeId, Tree};
use crate::error::{MutationError, Result};

pub struct MissingConstructor;

impl Rule for MissingConstructor {
    fn id(&self) -> &'static str {
        "5-2-1"
    }

    fn name(&self) -> &'static str {
        "missing constructor"
    }

    fn description(&self) -> &'static str {
        "Deletes a constructor definition"
    }

    fn operation(&self) -> OperationKind {
        OperationKind::Delete
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        collect_ids(tree, |node| {
            matches!(node, Node::FunctionDefinition(func) if func.is_constructor())
        })
    }

    fn rewrite(&self, _cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        match target {
            Node::FunctionDefinition(func) if func.is_constructor() => Ok(Rewrite::delete()),
            other => Err(MutationError::structural(
                other.kind().as_str(),
                "expected a constructor",
            )),
        }
    }
}
