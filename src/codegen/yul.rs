use super::literal::escape_bytes;
use super::pad;
use crate::ast::{YulCaseValue, YulNode};
use crate::error::{MutationError, Result};

fn wrong(node: &YulNode, expected: &str) -> MutationError {
    MutationError::structural("InlineAssembly", format!("{} where {expected} was expected", node.kind()))
}

/// `{ ... }` with the closing brace at `indent`.
pub(super) fn block(node: &YulNode, indent: usize) -> Result<String> {
    let YulNode::YulBlock { statements } = node else {
        return Err(wrong(node, "a block"));
    };
    if statements.is_empty() {
        return Ok("{ }".to_string());
    }
    let inner = pad(indent + 1);
    let mut out = String::from("{\n");
    for s in statements {
        out.push_str(&format!("{inner}{}\n", statement(s, indent + 1)?));
    }
    out.push_str(&pad(indent));
    out.push('}');
    Ok(out)
}

fn names(nodes: &[YulNode]) -> Result<String> {
    let parts = nodes
        .iter()
        .map(|n| match n {
            YulNode::YulTypedName { name } | YulNode::YulIdentifier { name } => Ok(name.clone()),
            other => Err(wrong(other, "a name")),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(", "))
}

fn statement(node: &YulNode, indent: usize) -> Result<String> {
    match node {
        YulNode::YulBlock { .. } => block(node, indent),
        YulNode::YulVariableDeclaration { variables, value } => {
            let mut out = format!("let {}", names(variables)?);
            if let Some(value) = value {
                out.push_str(&format!(" := {}", expression(value)?));
            }
            Ok(out)
        }
        YulNode::YulAssignment {
            variable_names,
            value,
        } => Ok(format!("{} := {}", names(variable_names)?, expression(value)?)),
        YulNode::YulExpressionStatement { expression: e } => expression(e),
        YulNode::YulIf { condition, body } => Ok(format!(
            "if {} {}",
            expression(condition)?,
            block(body, indent)?
        )),
        YulNode::YulForLoop {
            pre,
            condition,
            post,
            body,
        } => Ok(format!(
            "for {} {} {} {}",
            block(pre, indent)?,
            expression(condition)?,
            block(post, indent)?,
            block(body, indent)?
        )),
        YulNode::YulSwitch { expression: e, cases } => {
            let inner = pad(indent);
            let mut out = format!("switch {}", expression(e)?);
            for case in cases {
                let YulNode::YulCase { value, body } = case else {
                    return Err(wrong(case, "a case"));
                };
                let label = match value {
                    YulCaseValue::Default(_) => "default".to_string(),
                    YulCaseValue::Literal(lit) => format!("case {}", expression(lit)?),
                };
                out.push_str(&format!("\n{inner}{label} {}", block(body, indent)?));
            }
            Ok(out)
        }
        YulNode::YulFunctionDefinition {
            name,
            parameters,
            return_variables,
            body,
        } => {
            let mut out = format!("function {name}({})", names(parameters)?);
            if !return_variables.is_empty() {
                out.push_str(&format!(" -> {}", names(return_variables)?));
            }
            out.push_str(&format!(" {}", block(body, indent)?));
            Ok(out)
        }
        YulNode::YulBreak {} => Ok("break".to_string()),
        YulNode::YulContinue {} => Ok("continue".to_string()),
        YulNode::YulLeave {} => Ok("leave".to_string()),
        other => Err(wrong(other, "a statement")),
    }
}

fn expression(node: &YulNode) -> Result<String> {
    match node {
        YulNode::YulFunctionCall {
            function_name,
            arguments,
        } => {
            let args = arguments
                .iter()
                .map(expression)
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("{}({})", expression(function_name)?, args.join(", ")))
        }
        YulNode::YulIdentifier { name } => Ok(name.clone()),
        YulNode::YulLiteral {
            kind,
            value,
            hex_value,
        } => match kind.as_str() {
            "string" => {
                let bytes = match (hex_value, value) {
                    (Some(hex), _) => hex_bytes(hex)?,
                    (None, Some(v)) => v.clone().into_bytes(),
                    (None, None) => return Err(wrong(node, "a valued literal")),
                };
                Ok(format!("\"{}\"", escape_bytes(&bytes)))
            }
            _ => value.clone().ok_or_else(|| wrong(node, "a valued literal")),
        },
        other => Err(wrong(other, "an expression")),
    }
}

fn hex_bytes(hex: &str) -> Result<Vec<u8>> {
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| MutationError::structural("InlineAssembly", "bad literal hexValue"))
        })
        .collect()
}
