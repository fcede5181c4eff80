use super::{decl, literal, unexpected};
use crate::ast::{ElementaryTypeRef, Node};
use crate::error::{MutationError, Result};

pub(super) fn expression(node: &Node) -> Result<String> {
    match node {
        Node::Assignment(n) => Ok(format!(
            "{} {} {}",
            operand(&n.left_hand_side)?,
            n.operator,
            operand(&n.right_hand_side)?
        )),
        Node::BinaryOperation(n) => Ok(format!(
            "({} {} {})",
            operand(&n.left_expression)?,
            n.operator,
            operand(&n.right_expression)?
        )),
        Node::UnaryOperation(n) => {
            let inner = operand(&n.sub_expression)?;
            Ok(match (n.operator.as_str(), n.prefix) {
                ("delete", _) => format!("delete {inner}"),
                (op, true) => format!("({op}{inner})"),
                (op, false) => format!("({inner}{op})"),
            })
        }
        Node::FunctionCall(n) => {
            let callee = expression(&n.expression)?;
            if n.names.is_empty() {
                return Ok(format!("{callee}({})", arguments(&n.arguments)?));
            }
            if n.names.len() != n.arguments.len() {
                return Err(MutationError::structural(
                    "FunctionCall",
                    "named argument count does not match values",
                ));
            }
            let pairs = n
                .names
                .iter()
                .zip(&n.arguments)
                .map(|(name, arg)| Ok(format!("{name}: {}", expression(arg)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("{callee}({{{}}})", pairs.join(", ")))
        }
        Node::FunctionCallOptions(n) => {
            if n.names.len() != n.options.len() {
                return Err(MutationError::structural(
                    "FunctionCallOptions",
                    "option count does not match values",
                ));
            }
            let pairs = n
                .names
                .iter()
                .zip(&n.options)
                .map(|(name, value)| Ok(format!("{name}: {}", expression(value)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!(
                "{}{{{}}}",
                expression(&n.expression)?,
                pairs.join(", ")
            ))
        }
        Node::MemberAccess(n) => Ok(format!("{}.{}", expression(&n.expression)?, n.member_name)),
        Node::IndexAccess(n) => {
            let index = match n.index_expression.as_deref() {
                Some(i) => expression(i)?,
                None => String::new(),
            };
            Ok(format!("{}[{index}]", expression(&n.base_expression)?))
        }
        Node::IndexRangeAccess(n) => {
            let start = match n.start_expression.as_deref() {
                Some(s) => expression(s)?,
                None => String::new(),
            };
            let end = match n.end_expression.as_deref() {
                Some(e) => expression(e)?,
                None => String::new(),
            };
            Ok(format!("{}[{start}:{end}]", expression(&n.base_expression)?))
        }
        Node::Identifier(n) => Ok(n.name.clone()),
        Node::Literal(n) => literal::render(n),
        Node::Conditional(n) => Ok(format!(
            "({} ? {} : {})",
            expression(&n.condition)?,
            operand(&n.true_expression)?,
            operand(&n.false_expression)?
        )),
        Node::TupleExpression(n) => {
            let parts = n
                .components
                .iter()
                .map(|c| match c {
                    Some(c) => expression(c),
                    None => Ok(String::new()),
                })
                .collect::<Result<Vec<_>>>()?;
            if n.is_inline_array {
                Ok(format!("[{}]", parts.join(", ")))
            } else {
                Ok(format!("({})", parts.join(", ")))
            }
        }
        Node::NewExpression(n) => Ok(format!("new {}", type_name(&n.type_name)?)),
        Node::ElementaryTypeNameExpression(n) => match &n.type_name {
            ElementaryTypeRef::Name(name) => Ok(name.clone()),
            ElementaryTypeRef::Node(inner) => match inner.as_ref() {
                Node::ElementaryTypeName(t)
                    if t.name == "address" && t.state_mutability.as_deref() == Some("payable") =>
                {
                    Ok("payable".to_string())
                }
                Node::ElementaryTypeName(t) => Ok(t.name.clone()),
                other => Err(unexpected(other, "an elementary type name")),
            },
        },
        other => Err(unexpected(other, "an expression")),
    }
}

/// An expression used inside another; assignments are parenthesized.
fn operand(node: &Node) -> Result<String> {
    let text = expression(node)?;
    if matches!(node, Node::Assignment(_)) {
        Ok(format!("({text})"))
    } else {
        Ok(text)
    }
}

pub(super) fn arguments(args: &[Node]) -> Result<String> {
    let parts = args.iter().map(expression).collect::<Result<Vec<_>>>()?;
    Ok(parts.join(", "))
}

pub(super) fn type_name(node: &Node) -> Result<String> {
    match node {
        Node::ElementaryTypeName(t) => {
            if t.name == "address" && t.state_mutability.as_deref() == Some("payable") {
                Ok("address payable".to_string())
            } else {
                Ok(t.name.clone())
            }
        }
        Node::UserDefinedTypeName(_) => node
            .name()
            .map(str::to_string)
            .ok_or_else(|| MutationError::structural("UserDefinedTypeName", "no name or path")),
        Node::Mapping(m) => {
            let key_name = if m.key_name.is_empty() {
                String::new()
            } else {
                format!(" {}", m.key_name)
            };
            let value_name = if m.value_name.is_empty() {
                String::new()
            } else {
                format!(" {}", m.value_name)
            };
            Ok(format!(
                "mapping({}{key_name} => {}{value_name})",
                type_name(&m.key_type)?,
                type_name(&m.value_type)?
            ))
        }
        Node::ArrayTypeName(a) => {
            let length = match a.length.as_deref() {
                Some(len) => expression(len)?,
                None => String::new(),
            };
            Ok(format!("{}[{length}]", type_name(&a.base_type)?))
        }
        Node::FunctionTypeName(f) => {
            let mut out = format!("function({})", decl::parameter_list(&f.parameter_types)?);
            if !f.visibility.is_empty() {
                out.push_str(&format!(" {}", f.visibility));
            }
            if let Some(m) = f.state_mutability.as_deref().filter(|m| *m != "nonpayable") {
                out.push_str(&format!(" {m}"));
            }
            let returns = decl::parameter_list(&f.return_parameter_types)?;
            if !returns.is_empty() {
                out.push_str(&format!(" returns ({returns})"));
            }
            Ok(out)
        }
        other => Err(unexpected(other, "a type name")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Tree;

    fn render(text: &str) -> String {
        let node = Tree::from_json(text)
            .unwrap_or_else(|e| panic!("{e}"))
            .into_root();
        super::super::emit(&node, 0).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn call_with_value_option() {
        let text = r#"{"nodeType": "FunctionCall", "id": 9,
            "expression": {"nodeType": "FunctionCallOptions", "id": 5, "names": ["value"],
                "options": [{"nodeType": "Identifier", "id": 4, "name": "amount"}],
                "expression": {"nodeType": "MemberAccess", "id": 3, "memberName": "call",
                    "expression": {"nodeType": "Identifier", "id": 2, "name": "to"}}},
            "arguments": [{"nodeType": "Literal", "id": 8, "kind": "string", "value": "", "hexValue": ""}]}"#;
        assert_eq!(render(text), "to.call{value: amount}(\"\")");
    }

    #[test]
    fn named_arguments() {
        let text = r#"{"nodeType": "FunctionCall", "id": 9, "names": ["a", "b"],
            "expression": {"nodeType": "Identifier", "id": 1, "name": "Point"},
            "arguments": [
                {"nodeType": "Literal", "id": 2, "kind": "number", "value": "1"},
                {"nodeType": "Literal", "id": 3, "kind": "number", "value": "2"}
            ]}"#;
        assert_eq!(render(text), "Point({a: 1, b: 2})");
    }

    #[test]
    fn payable_conversion_and_address_payable_type() {
        let cast = r#"{"nodeType": "FunctionCall", "id": 9, "kind": "typeConversion",
            "expression": {"nodeType": "ElementaryTypeNameExpression", "id": 3,
                "typeName": {"nodeType": "ElementaryTypeName", "id": 2, "name": "address",
                             "stateMutability": "payable"}},
            "arguments": [{"nodeType": "Identifier", "id": 4, "name": "owner"}]}"#;
        assert_eq!(render(cast), "payable(owner)");

        let ty = r#"{"nodeType": "ElementaryTypeName", "id": 2, "name": "address",
                     "stateMutability": "payable"}"#;
        assert_eq!(render(ty), "address payable");

        let legacy = r#"{"nodeType": "ElementaryTypeNameExpression", "id": 3, "typeName": "uint8"}"#;
        assert_eq!(render(legacy), "uint8");
    }

    #[test]
    fn nested_assignment_is_parenthesized() {
        let text = r#"{"nodeType": "Assignment", "id": 9, "operator": "=",
            "leftHandSide": {"nodeType": "Identifier", "id": 1, "name": "a"},
            "rightHandSide": {"nodeType": "Assignment", "id": 4, "operator": "+=",
                "leftHandSide": {"nodeType": "Identifier", "id": 2, "name": "b"},
                "rightHandSide": {"nodeType": "Identifier", "id": 3, "name": "c"}}}"#;
        assert_eq!(render(text), "a = (b += c)");
    }

    #[test]
    fn tuples_and_inline_arrays() {
        let tuple = r#"{"nodeType": "TupleExpression", "id": 9, "components": [
            {"nodeType": "Identifier", "id": 1, "name": "a"}, null,
            {"nodeType": "Identifier", "id": 2, "name": "b"}]}"#;
        assert_eq!(render(tuple), "(a, , b)");
        let array = r#"{"nodeType": "TupleExpression", "id": 9, "isInlineArray": true,
            "components": [{"nodeType": "Literal", "id": 1, "kind": "number", "value": "1"}]}"#;
        assert_eq!(render(array), "[1]");
    }

    #[test]
    fn unary_forms() {
        let delete = r#"{"nodeType": "UnaryOperation", "id": 9, "operator": "delete", "prefix": true,
            "subExpression": {"nodeType": "Identifier", "id": 1, "name": "x"}}"#;
        assert_eq!(render(delete), "delete x");
        let neg = r#"{"nodeType": "UnaryOperation", "id": 9, "operator": "!", "prefix": true,
            "subExpression": {"nodeType": "Identifier", "id": 1, "name": "ok"}}"#;
        assert_eq!(render(neg), "(!ok)");
    }
}
