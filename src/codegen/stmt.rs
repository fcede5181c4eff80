use super::{decl, documentation, emit, expr, pad, unexpected, yul};
use crate::ast::{Node, TryCatchClause, VariableDeclarationStatement};
use crate::error::{MutationError, Result};

/// A statement as complete, newline-terminated lines, led by any NatSpec.
pub(super) fn statement(node: &Node, indent: usize) -> Result<String> {
    let doc = documentation(statement_doc(node), indent);
    Ok(format!("{doc}{}{}\n", pad(indent), inline(node, indent)?))
}

fn statement_doc(node: &Node) -> Option<&crate::ast::Documentation> {
    match node {
        Node::Block(n) | Node::UncheckedBlock(n) => n.documentation.as_ref(),
        Node::VariableDeclarationStatement(n) => n.documentation.as_ref(),
        Node::ExpressionStatement(n) => n.documentation.as_ref(),
        Node::IfStatement(n) => n.documentation.as_ref(),
        Node::ForStatement(n) => n.documentation.as_ref(),
        Node::WhileStatement(n) | Node::DoWhileStatement(n) => n.documentation.as_ref(),
        Node::Continue(n) | Node::Break(n) | Node::PlaceholderStatement(n) | Node::Throw(n) => {
            n.documentation.as_ref()
        }
        Node::Return(n) => n.documentation.as_ref(),
        Node::EmitStatement(n) => n.documentation.as_ref(),
        Node::RevertStatement(n) => n.documentation.as_ref(),
        Node::InlineAssembly(n) => n.documentation.as_ref(),
        Node::TryStatement(n) => n.documentation.as_ref(),
        _ => None,
    }
}

/// `{ ... }` with the closing brace at `indent`; no leading padding.
pub(super) fn block(node: &Node, indent: usize) -> Result<String> {
    let Some(statements) = node.statements() else {
        return Err(unexpected(node, "a block"));
    };
    let mut out = String::from("{\n");
    for s in statements {
        out.push_str(&statement(s, indent + 1)?);
    }
    out.push_str(&pad(indent));
    out.push('}');
    Ok(out)
}

/// Body of a branch or loop. Single statements are braced so an inner `if`
/// can never capture a following `else`.
fn branch(node: &Node, indent: usize) -> Result<String> {
    if node.kind() == crate::ast::NodeKind::Block {
        return block(node, indent);
    }
    Ok(format!(
        "{{\n{}{}}}",
        statement(node, indent + 1)?,
        pad(indent)
    ))
}

fn inline(node: &Node, indent: usize) -> Result<String> {
    match node {
        Node::Block(_) => block(node, indent),
        Node::UncheckedBlock(_) => Ok(format!("unchecked {}", block(node, indent)?)),
        Node::VariableDeclarationStatement(_) | Node::ExpressionStatement(_) => {
            Ok(format!("{};", simple(node)?))
        }
        Node::IfStatement(n) => {
            let mut out = format!(
                "if ({}) {}",
                expr::expression(&n.condition)?,
                branch(&n.true_body, indent)?
            );
            if let Some(otherwise) = n.false_body.as_deref() {
                let tail = match otherwise {
                    Node::IfStatement(_) => inline(otherwise, indent)?,
                    _ => branch(otherwise, indent)?,
                };
                out.push_str(&format!(" else {tail}"));
            }
            Ok(out)
        }
        Node::ForStatement(n) => {
            let init = match n.initialization_expression.as_deref() {
                Some(s) => simple(s)?,
                None => String::new(),
            };
            let condition = match n.condition.as_deref() {
                Some(c) => format!(" {}", expr::expression(c)?),
                None => String::new(),
            };
            let step = match n.loop_expression.as_deref() {
                Some(s) => format!(" {}", simple(s)?),
                None => String::new(),
            };
            Ok(format!(
                "for ({init};{condition};{step}) {}",
                branch(&n.body, indent)?
            ))
        }
        Node::WhileStatement(n) => Ok(format!(
            "while ({}) {}",
            expr::expression(&n.condition)?,
            branch(&n.body, indent)?
        )),
        Node::DoWhileStatement(n) => Ok(format!(
            "do {} while ({});",
            branch(&n.body, indent)?,
            expr::expression(&n.condition)?
        )),
        Node::Continue(_) => Ok("continue;".to_string()),
        Node::Break(_) => Ok("break;".to_string()),
        Node::PlaceholderStatement(_) => Ok("_;".to_string()),
        Node::Throw(_) => Ok("throw;".to_string()),
        Node::Return(n) => match n.expression.as_deref() {
            Some(e) => Ok(format!("return {};", expr::expression(e)?)),
            None => Ok("return;".to_string()),
        },
        Node::EmitStatement(n) => Ok(format!("emit {};", expr::expression(&n.event_call)?)),
        Node::RevertStatement(n) => Ok(format!("revert {};", expr::expression(&n.error_call)?)),
        Node::InlineAssembly(n) => {
            let mut out = String::from("assembly ");
            if !n.flags.is_empty() {
                let flags: Vec<String> = n.flags.iter().map(|f| format!("\"{f}\"")).collect();
                out.push_str(&format!("({}) ", flags.join(", ")));
            }
            match (&n.ast, &n.operations) {
                (Some(ast), _) => out.push_str(&yul::block(ast, indent)?),
                (None, Some(raw)) => out.push_str(raw.trim()),
                (None, None) => {
                    return Err(MutationError::structural(
                        "InlineAssembly",
                        "neither a Yul tree nor raw operations",
                    ))
                }
            }
            Ok(out)
        }
        Node::TryStatement(n) => {
            let mut clauses = n.clauses.iter();
            let success = clauses
                .next()
                .ok_or_else(|| MutationError::structural("TryStatement", "no clauses"))?;
            let Node::TryCatchClause(success) = success else {
                return Err(unexpected(success, "a try clause"));
            };
            let mut out = format!("try {}", expr::expression(&n.external_call)?);
            if let Some(params) = success.parameters.as_deref() {
                out.push_str(&format!(" returns ({})", decl::parameter_list(params)?));
            }
            out.push_str(&format!(" {}", block(&success.block, indent)?));
            for clause in clauses {
                out.push_str(&format!(" {}", catch_clause(clause, indent)?));
            }
            Ok(out)
        }
        other => Err(unexpected(other, "a statement")),
    }
}

pub(super) fn catch_clause(node: &Node, indent: usize) -> Result<String> {
    let Node::TryCatchClause(TryCatchClause {
        error_name,
        parameters,
        block: body,
        ..
    }) = node
    else {
        return Err(unexpected(node, "a catch clause"));
    };
    let mut out = String::from("catch");
    if !error_name.is_empty() {
        out.push_str(&format!(" {error_name}"));
    }
    if let Some(params) = parameters.as_deref() {
        let params = decl::parameter_list(params)?;
        if error_name.is_empty() {
            out.push_str(&format!(" ({params})"));
        } else {
            out.push_str(&format!("({params})"));
        }
    }
    out.push_str(&format!(" {}", block(body, indent)?));
    Ok(out)
}

/// Declaration or expression statement without its terminating `;`, as used
/// in `for` headers.
fn simple(node: &Node) -> Result<String> {
    match node {
        Node::ExpressionStatement(n) => expr::expression(&n.expression),
        Node::VariableDeclarationStatement(n) => declaration_statement(n),
        other => Err(unexpected(other, "a simple statement")),
    }
}

fn declaration_statement(n: &VariableDeclarationStatement) -> Result<String> {
    if n.declarations.iter().all(Option::is_none) {
        return Err(MutationError::structural(
            "VariableDeclarationStatement",
            "no declarations",
        ));
    }
    let lhs = match n.declarations.as_slice() {
        [Some(single)] => emit(single, 0)?,
        slots => {
            let untyped = slots.iter().flatten().all(|d| match d {
                Node::VariableDeclaration(v) => v.type_name.is_none(),
                _ => false,
            });
            let parts = slots
                .iter()
                .map(|slot| match slot {
                    None => Ok(String::new()),
                    Some(Node::VariableDeclaration(v)) if untyped => Ok(v.name.clone()),
                    Some(d @ Node::VariableDeclaration(_)) => emit(d, 0),
                    Some(other) => Err(unexpected(other, "a variable declaration")),
                })
                .collect::<Result<Vec<_>>>()?;
            let tuple = format!("({})", parts.join(", "));
            if untyped {
                format!("var {tuple}")
            } else {
                tuple
            }
        }
    };
    match n.initial_value.as_deref() {
        Some(value) => Ok(format!("{lhs} = {}", expr::expression(value)?)),
        None => Ok(lhs),
    }
}
