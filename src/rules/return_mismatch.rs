// src/rules/return_mismatch.rs
//! 5-6-2: a boolean return type is narrowed to `address`, so the declared
//! interface no longer matches what the body returns.

use super::missing_return::contains_return;
use super::pattern::collect_ids;
use super::{Rewrite, RewriteContext, Rule};
use crate::ast::{FunctionDefinition, Node, NodeId, Tree, TypeDescriptions};
use crate::error::{MutationError, Result};

pub struct ReturnMismatch;

fn is_bool_param(param: &Node) -> bool {
    let Node::VariableDeclaration(var) = param else {
        return false;
    };
    var.type_descriptions.type_string.as_deref() == Some("bool")
        || var.type_name.as_deref().and_then(Node::name) == Some("bool")
}

fn has_bool_return(func: &FunctionDefinition) -> bool {
    match func.return_parameters.as_ref() {
        Node::ParameterList(list) => list.parameters.iter().any(is_bool_param),
        _ => false,
    }
}

impl Rule for ReturnMismatch {
    fn id(&self) -> &'static str {
        "5-6-2"
    }

    fn name(&self) -> &'static str {
        "mismatched return"
    }

    fn description(&self) -> &'static str {
        "Changes `bool` return parameters to `address` while the body still returns booleans"
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        collect_ids(tree, |node| match node {
            Node::FunctionDefinition(func) => {
                has_bool_return(func) && func.body.as_deref().is_some_and(contains_return)
            }
            _ => false,
        })
    }

    fn rewrite(&self, _cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        let mut func = target.clone();
        let Node::FunctionDefinition(def) = &mut func else {
            return Err(MutationError::structural(
                target.kind().as_str(),
                "expected a function definition",
            ));
        };
        let Node::ParameterList(list) = def.return_parameters.as_mut() else {
            return Err(MutationError::structural("FunctionDefinition", "malformed return parameters"));
        };

        let mut narrowed = 0;
        for param in &mut list.parameters {
            let Node::VariableDeclaration(var) = param else {
                continue;
            };
            let Some(Node::ElementaryTypeName(ty)) = var.type_name.as_deref_mut() else {
                continue;
            };
            if ty.name != "bool" {
                continue;
            }
            ty.name = "address".to_string();
            ty.type_descriptions = TypeDescriptions::new("address", "t_address");
            var.type_descriptions = TypeDescriptions::new("address", "t_address");
            narrowed += 1;
        }
        if narrowed == 0 {
            return Err(MutationError::structural(
                "ParameterList",
                "no elementary bool return parameter",
            ));
        }
        Ok(Rewrite::replace(vec![func]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codegen::emit_tree;
    use crate::rules::fixture::{contract, function_with, ident, local};
    use crate::rules::mutate;

    fn ret(id: u64) -> String {
        format!(
            r#"{{"nodeType": "Return", "id": {id}, "expression": {}}}"#,
            ident(id + 1, "ok", "bool")
        )
    }

    #[test]
    fn detects_bool_returning_functions() {
        let bools = format!("[{}]", local(30, "", "bool"));
        let uints = format!("[{}]", local(130, "", "uint256"));
        let tree = contract(
            &[
                function_with(10, "ownerOf", "[]", &bools, &ret(40)),
                function_with(100, "count", "[]", &uints, &ret(140)),
            ]
            .join(", "),
        );
        assert_eq!(ReturnMismatch.detect(&tree), vec![NodeId(10)]);
    }

    #[test]
    fn narrows_bool_to_address() {
        let returns = format!("[{}, {}]", local(30, "", "bool"), local(32, "n", "uint256"));
        let mut tree = contract(&function_with(10, "ownerOf", "[]", &returns, &ret(40)));
        mutate(&ReturnMismatch, &mut tree, NodeId(10), false).unwrap();
        let text = emit_tree(&tree).unwrap();
        assert!(text.contains("returns (address, uint256 n)"));
        assert!(text.contains("return ok;"));
    }
}
