// src/rules/access_toggle.rs
//! 6-1-7: anyone may flip a private boolean flag.

use super::pattern::{body_statements, capitalize, enclosing_contract, functions};
use super::{OperationKind, Rewrite, RewriteContext, Rule};
use crate::ast::{Node, NodeId, Tree, VariableDeclaration};
use crate::error::{MutationError, Result};

pub struct AccessToggle;

fn is_hidden_flag(var: &VariableDeclaration) -> bool {
    let is_bool = var.type_descriptions.type_string.as_deref() == Some("bool")
        || matches!(var.type_name.as_deref(), Some(Node::ElementaryTypeName(t)) if t.name == "bool");
    let assignable = !var.constant && !matches!(var.mutability.as_deref(), Some("constant" | "immutable"));
    var.state_variable
        && is_bool
        && assignable
        && !matches!(var.visibility.as_str(), "public" | "external")
}

/// Whether an externally callable function of `contract` assigns `name` at
/// the top level of its body.
fn has_public_setter(contract: &Node, name: &str) -> bool {
    functions(contract)
        .filter(|f| matches!(f.visibility.as_str(), "public" | "external"))
        .filter(|f| !f.is_constructor() && !f.is_special_entry())
        .any(|f| {
            body_statements(f).iter().any(|stmt| match stmt {
                Node::ExpressionStatement(s) => matches!(s.expression.as_ref(),
                    Node::Assignment(a) if a.left_hand_side.name() == Some(name)),
                _ => false,
            })
        })
}

impl Rule for AccessToggle {
    fn id(&self) -> &'static str {
        "6-1-7"
    }

    fn name(&self) -> &'static str {
        "missing access-control toggle"
    }

    fn description(&self) -> &'static str {
        "Adds an unguarded public function that sets a private boolean state variable"
    }

    fn operation(&self) -> OperationKind {
        OperationKind::Add
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        let root = tree.root();
        root.preorder()
            .into_iter()
            .filter_map(|node| match node {
                Node::VariableDeclaration(var) if is_hidden_flag(var) => Some(var),
                _ => None,
            })
            .filter(|var| {
                enclosing_contract(root, var.id).is_some_and(|c| !has_public_setter(c, &var.name))
            })
            .map(|var| var.id)
            .collect()
    }

    fn rewrite(&self, cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        let Node::VariableDeclaration(var) = target else {
            return Err(MutationError::structural(
                target.kind().as_str(),
                "expected a state variable",
            ));
        };
        if var.name.is_empty() {
            return Err(MutationError::structural("VariableDeclaration", "unnamed flag"));
        }
        let lhs = cx.build.identifier(&var.name, Some("bool"));
        let rhs = cx.build.bool_literal(true);
        let assign = cx.build.assignment(lhs, rhs);
        let stmt = cx.build.expression_statement(assign, None);
        let body = cx.build.block(vec![stmt]);
        let doc = cx.marker(self.id(), "add", "function");
        let name = format!("toggle{}Value", capitalize(&var.name));
        let toggle = cx.build.function(&name, "public", body, doc);
        Ok(Rewrite::add(vec![toggle]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codegen::emit_tree;
    use crate::rules::fixture::{contract, expr_stmt, function, ident, state_var};
    use crate::rules::mutate;

    fn setter(id: u64, var: &str) -> String {
        let assign = format!(
            r#"{{"nodeType": "Assignment", "id": {a}, "operator": "=",
                "leftHandSide": {lhs}, "rightHandSide": {rhs}}}"#,
            a = id + 50,
            lhs = ident(id + 51, var, "bool"),
            rhs = ident(id + 52, "value", "bool"),
        );
        function(id, &format!("set{var}"), &expr_stmt(id + 40, &assign))
    }

    #[test]
    fn private_flags_without_setter_are_candidates() {
        let tree = contract(
            &[
                state_var(100, "paused", "bool", "internal", None),
                state_var(200, "open", "bool", "public", None),
                state_var(300, "locked", "bool", "private", None),
                state_var(400, "count", "uint256", "private", None),
                setter(500, "locked"),
            ]
            .join(", "),
        );
        assert_eq!(AccessToggle.detect(&tree), vec![NodeId(100)]);
    }

    #[test]
    fn appends_public_toggle_with_fresh_ids() {
        let mut tree = contract(&state_var(100, "isPaused", "bool", "internal", None));
        let before = tree.max_id();
        let id = mutate(&AccessToggle, &mut tree, NodeId(100), true).unwrap();
        assert!(id > before);

        let text = emit_tree(&tree).unwrap();
        assert!(text.contains("function toggleIsPausedValue() public {\n        isPaused = true;\n    }\n"));
        assert!(text.contains("@notice vuln,6-1-7,add,function"));

        let mut ids = tree.ids();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
