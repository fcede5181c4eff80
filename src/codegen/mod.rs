//! Regenerates Solidity source from a tree.
//!
//! Output is deterministic and order-preserving: members, statements and
//! arguments appear exactly in the order their owning list holds them. Nested
//! binary, unary and conditional expressions are fully parenthesized.

mod decl;
mod expr;
mod literal;
mod stmt;
mod yul;

use crate::ast::{Documentation, Node, Tree};
use crate::error::{MutationError, Result};

const INDENT: &str = "    ";

pub(crate) fn pad(indent: usize) -> String {
    INDENT.repeat(indent)
}

/// Source text of a whole program.
///
/// # Errors
/// Returns `Structural` if a node lacks a child its kind requires.
pub fn emit_tree(tree: &Tree) -> Result<String> {
    emit(tree.root(), 0)
}

/// Source text of a single node at `indent` levels of nesting.
///
/// Declarations and statements come out as complete lines; expressions and
/// type names come out bare.
///
/// # Errors
/// Returns `Structural` if a node lacks a child its kind requires.
pub fn emit(node: &Node, indent: usize) -> Result<String> {
    match node {
        Node::SourceUnit(unit) => decl::source_unit(unit),
        Node::PragmaDirective(_)
        | Node::ImportDirective(_)
        | Node::ContractDefinition(_)
        | Node::UsingForDirective(_)
        | Node::FunctionDefinition(_)
        | Node::ModifierDefinition(_)
        | Node::EventDefinition(_)
        | Node::ErrorDefinition(_)
        | Node::StructDefinition(_)
        | Node::EnumDefinition(_)
        | Node::UserDefinedValueTypeDefinition(_) => decl::member(node, indent),
        Node::VariableDeclaration(var) => decl::variable(var),
        Node::InheritanceSpecifier(spec) => decl::inheritance(spec),
        Node::ModifierInvocation(inv) => decl::modifier_invocation(inv),
        Node::ParameterList(_) => decl::parameter_list(node),
        Node::OverrideSpecifier(spec) => decl::override_specifier(spec),
        Node::EnumValue(value) => Ok(value.name.clone()),
        Node::IdentifierPath(path) => Ok(path.name.clone()),
        Node::TryCatchClause(_) => stmt::catch_clause(node, indent),
        Node::Block(_)
        | Node::UncheckedBlock(_)
        | Node::VariableDeclarationStatement(_)
        | Node::ExpressionStatement(_)
        | Node::IfStatement(_)
        | Node::ForStatement(_)
        | Node::WhileStatement(_)
        | Node::DoWhileStatement(_)
        | Node::Continue(_)
        | Node::Break(_)
        | Node::PlaceholderStatement(_)
        | Node::Throw(_)
        | Node::Return(_)
        | Node::EmitStatement(_)
        | Node::RevertStatement(_)
        | Node::InlineAssembly(_)
        | Node::TryStatement(_) => stmt::statement(node, indent),
        Node::Assignment(_)
        | Node::BinaryOperation(_)
        | Node::UnaryOperation(_)
        | Node::FunctionCall(_)
        | Node::FunctionCallOptions(_)
        | Node::MemberAccess(_)
        | Node::IndexAccess(_)
        | Node::IndexRangeAccess(_)
        | Node::Identifier(_)
        | Node::Literal(_)
        | Node::Conditional(_)
        | Node::TupleExpression(_)
        | Node::NewExpression(_)
        | Node::ElementaryTypeNameExpression(_) => expr::expression(node),
        Node::ElementaryTypeName(_)
        | Node::UserDefinedTypeName(_)
        | Node::Mapping(_)
        | Node::ArrayTypeName(_)
        | Node::FunctionTypeName(_) => expr::type_name(node),
    }
}

/// NatSpec block placed before a declaration or statement.
fn documentation(doc: Option<&Documentation>, indent: usize) -> String {
    let Some(doc) = doc else {
        return String::new();
    };
    let pad = pad(indent);
    let lines: Vec<&str> = doc.text().trim().lines().map(str::trim).collect();
    match doc {
        Documentation::Structured { .. } => {
            let mut out = format!("{pad}/**\n");
            for line in lines {
                if line.is_empty() {
                    out.push_str(&format!("{pad} *\n"));
                } else {
                    out.push_str(&format!("{pad} * {line}\n"));
                }
            }
            out.push_str(&format!("{pad} */\n"));
            out
        }
        Documentation::Plain(_) => lines
            .iter()
            .map(|line| format!("{pad}/// {line}\n"))
            .collect(),
    }
}

fn unexpected(node: &Node, expected: &str) -> MutationError {
    MutationError::structural(node.kind().as_str(), format!("expected {expected}"))
}
