// src/rules/unchecked_call.rs
//! 1-3-1: the result of an external call is no longer checked.
//!
//! `bool result = product.addProduct();` becomes `bool result = true;`
//! followed by the bare call `product.addProduct();`.

use super::pattern::collect_ids;
use super::{Rewrite, RewriteContext, Rule};
use crate::ast::{Node, NodeId, Tree};
use crate::error::{MutationError, Result};

/// Receiver types that are plain values rather than contracts.
const VALUE_TYPES: [&str; 3] = ["uint256", "bytes32", "bytes memory"];

pub struct UncheckedCall;

impl Rule for UncheckedCall {
    fn id(&self) -> &'static str {
        "1-3-1"
    }

    fn name(&self) -> &'static str {
        "unchecked external call"
    }

    fn description(&self) -> &'static str {
        "Splits `T x = recv.f()` into a default-valued declaration and a bare call"
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        collect_ids(tree, |node| {
            let Node::VariableDeclarationStatement(stmt) = node else {
                return false;
            };
            let Some(Node::FunctionCall(call)) = stmt.initial_value.as_deref() else {
                return false;
            };
            let Node::MemberAccess(access) = call.expression.as_ref() else {
                return false;
            };
            !access
                .expression
                .type_string()
                .is_some_and(|ty| VALUE_TYPES.contains(&ty))
        })
    }

    fn rewrite(&self, cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        split_declaration(cx, target, self.id(), "function_call,function")
    }
}

/// Rewrites `T a = call;` into `T a = <default>;` and `call;`.
///
/// A tuple declaration yields one single-variable statement per named slot.
pub(super) fn split_declaration(
    cx: &mut RewriteContext<'_>,
    target: &Node,
    rule: &str,
    site: &str,
) -> Result<Rewrite> {
    let Node::VariableDeclarationStatement(stmt) = target else {
        return Err(MutationError::structural(
            target.kind().as_str(),
            "expected a variable declaration statement",
        ));
    };
    let call = stmt.initial_value.as_deref().ok_or_else(|| {
        MutationError::structural("VariableDeclarationStatement", "no initial value to detach")
    })?;

    let mut nodes = Vec::new();
    for decl in stmt.declarations.iter().flatten() {
        let value = cx.build.default_value(decl);
        nodes.push(cx.build.var_decl_statement(vec![Some(decl.clone())], value, None));
    }
    if nodes.is_empty() {
        return Err(MutationError::structural(
            "VariableDeclarationStatement",
            "no named declaration to keep",
        ));
    }

    let doc = cx.marker(rule, "replace", site);
    nodes.push(cx.build.expression_statement(call.clone(), doc));
    Ok(Rewrite::replace(nodes))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codegen::emit;
    use crate::locate::find_by_id;
    use crate::rules::fixture::{call, contract, function, ident, local};
    use crate::rules::mutate;

    fn local_of(id: u64, name: &str, contract: &str) -> String {
        format!(
            r#"{{"nodeType": "VariableDeclaration", "id": {id}, "name": "{name}",
                "typeName": {{"nodeType": "UserDefinedTypeName", "id": {t}, "name": "{contract}",
                    "typeDescriptions": {{"typeString": "contract {contract}"}}}},
                "typeDescriptions": {{"typeString": "contract {contract}"}}}}"#,
            t = id + 1,
        )
    }

    fn declaration(id: u64, decls: &[String], receiver_type: &str) -> String {
        let callee = format!(
            r#"{{"nodeType": "MemberAccess", "id": {m}, "memberName": "addProduct",
                "expression": {recv}}}"#,
            m = id + 1,
            recv = ident(id + 2, "product", receiver_type),
        );
        format!(
            r#"{{"nodeType": "VariableDeclarationStatement", "id": {id},
                "declarations": [{}], "initialValue": {init}}}"#,
            decls.join(", "),
            init = call(id + 3, &callee, &[]),
        )
    }

    #[test]
    fn detects_contract_receivers_only() {
        let body = [
            declaration(100, &[local(110, "result", "bool")], "contract Product"),
            declaration(200, &[local(210, "n", "uint256")], "uint256"),
        ]
        .join(", ");
        let tree = contract(&function(10, "buy", &body));
        assert_eq!(UncheckedCall.detect(&tree), vec![NodeId(100)]);
        assert_eq!(UncheckedCall.detect(&tree), UncheckedCall.detect(&tree));
    }

    #[test]
    fn splits_into_default_and_bare_call() {
        let body = declaration(100, &[local(110, "result", "bool")], "contract Product");
        let mut tree = contract(&function(10, "buy", &body));
        let id = mutate(&UncheckedCall, &mut tree, NodeId(100), false).unwrap();
        assert_eq!(id, NodeId(100));

        let block = find_by_id(tree.root(), NodeId(13)).unwrap();
        assert_eq!(
            emit(block, 1).unwrap(),
            "    {\n        bool result = true;\n        product.addProduct();\n    }\n"
        );
    }

    #[test]
    fn annotated_call_carries_marker() {
        let body = declaration(100, &[local(110, "result", "bool")], "contract Product");
        let mut tree = contract(&function(10, "buy", &body));
        mutate(&UncheckedCall, &mut tree, NodeId(100), true).unwrap();
        let block = find_by_id(tree.root(), NodeId(13)).unwrap();
        assert!(emit(block, 1)
            .unwrap()
            .contains("* @notice vuln,1-3-1,replace,function_call,function\n"));
    }

    #[test]
    fn defaults_follow_declared_type() {
        let body = declaration(100, &[local(110, "count", "uint256")], "contract Product");
        let mut tree = contract(&function(10, "buy", &body));
        mutate(&UncheckedCall, &mut tree, NodeId(100), false).unwrap();
        let block = find_by_id(tree.root(), NodeId(13)).unwrap();
        assert!(emit(block, 1).unwrap().contains("uint256 count = 10;"));
    }

    #[test]
    fn contract_typed_result_is_left_uninitialized() {
        let body = declaration(100, &[local_of(110, "other", "Product")], "contract Product");
        let mut tree = contract(&function(10, "buy", &body));
        mutate(&UncheckedCall, &mut tree, NodeId(100), false).unwrap();
        let block = find_by_id(tree.root(), NodeId(13)).unwrap();
        let text = emit(block, 1).unwrap();
        assert!(text.contains("Product other;\n"), "{text}");
        assert!(!text.contains("= true"));
    }

    #[test]
    fn declaration_without_names_is_structural() {
        let body = r#"{"nodeType": "VariableDeclarationStatement", "id": 100,
            "declarations": [null],
            "initialValue": {"nodeType": "Identifier", "id": 101, "name": "x"}}"#;
        let tree = contract(&function(10, "buy", body));
        let target = find_by_id(tree.root(), NodeId(100)).unwrap();
        let mut cx = RewriteContext::new(&tree, false);
        assert!(matches!(
            UncheckedCall.rewrite(&mut cx, target),
            Err(MutationError::Structural { .. })
        ));
    }
}
