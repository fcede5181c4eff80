use super::{documentation, emit, expr, pad, stmt, unexpected};
use crate::ast::{
    ContractDefinition, EventDefinition, FunctionDefinition, ImportDirective,
    InheritanceSpecifier, ModifierDefinition, ModifierInvocation, Node, OverrideSpecifier,
    PragmaDirective, SourceUnit, VariableDeclaration,
};
use crate::error::{MutationError, Result};

pub(super) fn source_unit(unit: &SourceUnit) -> Result<String> {
    let parts = unit
        .nodes
        .iter()
        .map(|n| member(n, 0))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("\n"))
}

/// A declaration as it appears in a member list: complete lines, newline
/// terminated.
pub(super) fn member(node: &Node, indent: usize) -> Result<String> {
    let p = pad(indent);
    match node {
        Node::PragmaDirective(n) => Ok(format!("{p}{}\n", pragma(n))),
        Node::ImportDirective(n) => Ok(format!("{p}{}\n", import(n))),
        Node::ContractDefinition(n) => contract(n, indent),
        Node::FunctionDefinition(n) => function(n, indent),
        Node::ModifierDefinition(n) => modifier(n, indent),
        Node::EventDefinition(n) => {
            let params = parameter_list(&n.parameters)?;
            let anonymous = if n.anonymous { " anonymous" } else { "" };
            Ok(format!(
                "{}{p}event {}({params}){anonymous};\n",
                documentation(n.documentation.as_ref(), indent),
                n.name
            ))
        }
        Node::ErrorDefinition(EventDefinition {
            name,
            parameters,
            documentation: doc,
            ..
        }) => Ok(format!(
            "{}{p}error {name}({});\n",
            documentation(doc.as_ref(), indent),
            parameter_list(parameters)?
        )),
        Node::StructDefinition(n) => {
            let inner = pad(indent + 1);
            let mut out = documentation(n.documentation.as_ref(), indent);
            out.push_str(&format!("{p}struct {} {{\n", n.name));
            for field in &n.members {
                out.push_str(&format!("{inner}{};\n", emit(field, 0)?));
            }
            out.push_str(&format!("{p}}}\n"));
            Ok(out)
        }
        Node::EnumDefinition(n) => {
            let inner = pad(indent + 1);
            let values = n
                .members
                .iter()
                .map(|v| Ok(format!("{inner}{}", emit(v, 0)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!(
                "{}{p}enum {} {{\n{}\n{p}}}\n",
                documentation(n.documentation.as_ref(), indent),
                n.name,
                values.join(",\n")
            ))
        }
        Node::UserDefinedValueTypeDefinition(n) => Ok(format!(
            "{p}type {} is {};\n",
            n.name,
            expr::type_name(&n.underlying_type)?
        )),
        Node::UsingForDirective(n) => {
            let library = n
                .library_name
                .as_deref()
                .ok_or_else(|| MutationError::structural("UsingForDirective", "missing library name"))?;
            let target = match n.type_name.as_deref() {
                Some(t) => expr::type_name(t)?,
                None => "*".to_string(),
            };
            let global = if n.global { " global" } else { "" };
            Ok(format!("{p}using {} for {target}{global};\n", emit(library, 0)?))
        }
        Node::VariableDeclaration(n) => member_variable(n, indent),
        other => Err(unexpected(other, "a declaration")),
    }
}

fn is_operator(token: &str) -> bool {
    token.starts_with(['^', '~', '>', '<', '=', '-'])
}

pub(super) fn pragma(n: &PragmaDirective) -> String {
    let mut tokens = n.literals.iter().map(String::as_str);
    match tokens.next() {
        Some("solidity") => {
            let mut version = String::new();
            let mut after_operator = true;
            for token in tokens {
                if token == "||" {
                    version.push_str(" || ");
                    after_operator = true;
                    continue;
                }
                let operator = is_operator(token);
                if operator && !after_operator {
                    version.push(' ');
                }
                version.push_str(token);
                after_operator = operator;
            }
            format!("pragma solidity {version};")
        }
        _ => format!("pragma {};", n.literals.join(" ")),
    }
}

fn import(n: &ImportDirective) -> String {
    if !n.symbol_aliases.is_empty() {
        let symbols: Vec<String> = n
            .symbol_aliases
            .iter()
            .map(|alias| match &alias.local {
                Some(local) if *local != alias.foreign.name => {
                    format!("{} as {local}", alias.foreign.name)
                }
                _ => alias.foreign.name.clone(),
            })
            .collect();
        return format!("import {{{}}} from \"{}\";", symbols.join(", "), n.file);
    }
    if n.unit_alias.is_empty() {
        format!("import \"{}\";", n.file)
    } else {
        format!("import \"{}\" as {};", n.file, n.unit_alias)
    }
}

fn contract(n: &ContractDefinition, indent: usize) -> Result<String> {
    let p = pad(indent);
    let mut out = documentation(n.documentation.as_ref(), indent);
    let abstract_kw = if n.is_abstract { "abstract " } else { "" };
    out.push_str(&format!("{p}{abstract_kw}{} {}", n.contract_kind, n.name));
    if !n.base_contracts.is_empty() {
        let bases = n
            .base_contracts
            .iter()
            .map(|b| emit(b, 0))
            .collect::<Result<Vec<_>>>()?;
        out.push_str(&format!(" is {}", bases.join(", ")));
    }
    out.push_str(" {\n");
    let members = n
        .nodes
        .iter()
        .map(|m| member(m, indent + 1))
        .collect::<Result<Vec<_>>>()?;
    out.push_str(&members.join("\n"));
    out.push_str(&format!("{p}}}\n"));
    Ok(out)
}

pub(super) fn inheritance(spec: &InheritanceSpecifier) -> Result<String> {
    let base = emit(&spec.base_name, 0)?;
    if spec.arguments.is_empty() {
        return Ok(base);
    }
    Ok(format!("{base}({})", expr::arguments(&spec.arguments)?))
}

pub(super) fn modifier_invocation(inv: &ModifierInvocation) -> Result<String> {
    Ok(format!(
        "{}({})",
        emit(&inv.modifier_name, 0)?,
        expr::arguments(&inv.arguments)?
    ))
}

pub(super) fn override_specifier(spec: &OverrideSpecifier) -> Result<String> {
    if spec.overrides.is_empty() {
        return Ok("override".to_string());
    }
    let names = spec
        .overrides
        .iter()
        .map(|o| emit(o, 0))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("override({})", names.join(", ")))
}

pub(super) fn parameter_list(node: &Node) -> Result<String> {
    let Node::ParameterList(list) = node else {
        return Err(unexpected(node, "a parameter list"));
    };
    let params = list
        .parameters
        .iter()
        .map(|p| emit(p, 0))
        .collect::<Result<Vec<_>>>()?;
    Ok(params.join(", "))
}

fn function_head(n: &FunctionDefinition) -> String {
    match n.kind.as_deref() {
        Some("constructor") => "constructor".to_string(),
        None if n.is_constructor() => {
            if n.name.is_empty() {
                "constructor".to_string()
            } else {
                format!("function {}", n.name)
            }
        }
        Some("fallback") if n.is_virtual.is_some() => "fallback".to_string(),
        Some("receive") => "receive".to_string(),
        _ if n.name.is_empty() => "function".to_string(),
        _ => format!("function {}", n.name),
    }
}

fn mutability(n: &FunctionDefinition) -> &str {
    match n.state_mutability.as_deref() {
        Some("nonpayable") => "",
        Some(m) => m,
        None if n.is_declared_const == Some(true) => "constant",
        None if n.payable == Some(true) => "payable",
        None => "",
    }
}

fn function(n: &FunctionDefinition, indent: usize) -> Result<String> {
    let p = pad(indent);
    let mut out = documentation(n.documentation.as_ref(), indent);
    out.push_str(&format!(
        "{p}{}({})",
        function_head(n),
        parameter_list(&n.parameters)?
    ));
    if !n.visibility.is_empty() && n.kind.as_deref() != Some("freeFunction") {
        out.push_str(&format!(" {}", n.visibility));
    }
    let mutability = mutability(n);
    if !mutability.is_empty() {
        out.push_str(&format!(" {mutability}"));
    }
    if n.is_virtual == Some(true) {
        out.push_str(" virtual");
    }
    if let Some(spec) = n.overrides.as_deref() {
        out.push_str(&format!(" {}", emit(spec, 0)?));
    }
    for modifier in &n.modifiers {
        out.push_str(&format!(" {}", emit(modifier, 0)?));
    }
    let returns = parameter_list(&n.return_parameters)?;
    if !returns.is_empty() {
        out.push_str(&format!(" returns ({returns})"));
    }
    out.push_str(&body(n.body.as_deref(), indent)?);
    Ok(out)
}

fn modifier(n: &ModifierDefinition, indent: usize) -> Result<String> {
    let p = pad(indent);
    let mut out = documentation(n.documentation.as_ref(), indent);
    out.push_str(&format!(
        "{p}modifier {}({})",
        n.name,
        parameter_list(&n.parameters)?
    ));
    if n.is_virtual == Some(true) {
        out.push_str(" virtual");
    }
    if let Some(spec) = n.overrides.as_deref() {
        out.push_str(&format!(" {}", emit(spec, 0)?));
    }
    out.push_str(&body(n.body.as_deref(), indent)?);
    Ok(out)
}

fn body(block: Option<&Node>, indent: usize) -> Result<String> {
    match block {
        Some(block) => Ok(format!(" {}\n", stmt::block(block, indent)?)),
        None => Ok(";\n".to_string()),
    }
}

fn declared_type(n: &VariableDeclaration) -> Result<String> {
    match n.type_name.as_deref() {
        Some(t) => expr::type_name(t),
        None => Ok("var".to_string()),
    }
}

/// State and file-level variables.
fn member_variable(n: &VariableDeclaration, indent: usize) -> Result<String> {
    let p = pad(indent);
    let mut out = documentation(n.documentation.as_ref(), indent);
    out.push_str(&format!("{p}{}", declared_type(n)?));
    if n.state_variable && !n.visibility.is_empty() {
        out.push_str(&format!(" {}", n.visibility));
    }
    match n.mutability.as_deref() {
        Some("immutable") => out.push_str(" immutable"),
        Some("constant") => out.push_str(" constant"),
        _ if n.constant => out.push_str(" constant"),
        _ => {}
    }
    if let Some(spec) = n.overrides.as_deref() {
        out.push_str(&format!(" {}", emit(spec, 0)?));
    }
    out.push_str(&format!(" {}", n.name));
    if let Some(value) = n.value.as_deref() {
        out.push_str(&format!(" = {}", expr::expression(value)?));
    }
    out.push_str(";\n");
    Ok(out)
}

/// Parameters, struct fields and local declarations.
pub(super) fn variable(n: &VariableDeclaration) -> Result<String> {
    let mut out = declared_type(n)?;
    if n.indexed {
        out.push_str(" indexed");
    }
    if n.storage_location != "default" && !n.storage_location.is_empty() {
        out.push_str(&format!(" {}", n.storage_location));
    }
    if !n.name.is_empty() {
        out.push_str(&format!(" {}", n.name));
    }
    Ok(out)
}
