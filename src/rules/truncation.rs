// src/rules/truncation.rs
//! 7-3-1: `uint256` declarations are narrowed to `uint32`.
//!
//! Only the declared type changes. Mapping keys keep their width, so a
//! `mapping(uint256 => bool)` has nothing to narrow and is not a candidate.

use super::pattern::collect_ids;
use super::{Rewrite, RewriteContext, Rule};
use crate::ast::{Node, NodeId, Tree, TypeDescriptions, VariableDeclaration};
use crate::error::{MutationError, Result};

pub struct Truncation;

const WIDE: &str = "uint256";
const NARROW: &str = "uint32";

fn narrowed(text: &str) -> String {
    text.replace(WIDE, NARROW)
}

/// Narrows `ty` in place. Returns whether anything changed.
fn narrow(ty: &mut Node) -> bool {
    match ty {
        Node::ElementaryTypeName(elementary) => {
            if !matches!(elementary.name.as_str(), "uint256" | "uint") {
                return false;
            }
            elementary.name = NARROW.to_string();
            elementary.type_descriptions = TypeDescriptions::new(NARROW, "t_uint32");
            true
        }
        Node::Mapping(mapping) => {
            if !narrow(&mut mapping.value_type) {
                return false;
            }
            let key = mapping.key_type.type_descriptions().cloned().unwrap_or_default();
            let value = mapping.value_type.type_descriptions().cloned().unwrap_or_default();
            if let (Some(k), Some(v)) = (key.type_string, value.type_string) {
                mapping.type_descriptions.type_string = Some(format!("mapping({k} => {v})"));
            }
            if let (Some(k), Some(v)) = (key.type_identifier, value.type_identifier) {
                mapping.type_descriptions.type_identifier = Some(format!("t_mapping$_{k}_$_{v}_$"));
            }
            true
        }
        Node::ArrayTypeName(array) => {
            if !narrow(&mut array.base_type) {
                return false;
            }
            let descriptions = &mut array.type_descriptions;
            descriptions.type_string = descriptions.type_string.as_deref().map(narrowed);
            descriptions.type_identifier = descriptions.type_identifier.as_deref().map(narrowed);
            true
        }
        _ => false,
    }
}

/// Carries the type name's change over to the declaration's own descriptions.
///
/// For a mapping the old type name text is swapped as a whole so the key
/// part stays as it was.
fn narrow_declaration(var: &mut VariableDeclaration) -> bool {
    let Some(ty) = var.type_name.as_deref_mut() else {
        return false;
    };
    let before = ty.type_descriptions().cloned().unwrap_or_default();
    let is_mapping = matches!(ty, Node::Mapping(_));
    if !narrow(ty) {
        return false;
    }
    let after = ty.type_descriptions().cloned().unwrap_or_default();

    let swap = |own: &Option<String>, old: &Option<String>, new: &Option<String>| -> Option<String> {
        let own = own.as_deref()?;
        match (old.as_deref(), new.as_deref()) {
            (Some(old), Some(new)) if own.contains(old) => Some(own.replace(old, new)),
            _ if is_mapping => new.clone().or_else(|| Some(own.to_string())),
            _ => Some(narrowed(own)),
        }
    };
    let descriptions = &var.type_descriptions;
    var.type_descriptions = TypeDescriptions {
        type_string: swap(&descriptions.type_string, &before.type_string, &after.type_string),
        type_identifier: swap(
            &descriptions.type_identifier,
            &before.type_identifier,
            &after.type_identifier,
        ),
    };
    true
}

fn mentions_wide(var: &VariableDeclaration) -> bool {
    let own = var.type_descriptions.type_string.as_deref();
    let declared = var.type_name.as_deref().and_then(Node::type_string);
    own.into_iter().chain(declared).any(|ts| ts.contains(WIDE))
}

impl Rule for Truncation {
    fn id(&self) -> &'static str {
        "7-3-1"
    }

    fn name(&self) -> &'static str {
        "width truncation"
    }

    fn description(&self) -> &'static str {
        "Narrows `uint256` declarations, parameters and mapping values to `uint32`"
    }

    fn detect(&self, tree: &Tree) -> Vec<NodeId> {
        collect_ids(tree, |node| match node {
            Node::VariableDeclaration(var) if mentions_wide(var) => {
                narrow_declaration(&mut var.clone())
            }
            _ => false,
        })
    }

    fn rewrite(&self, _cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite> {
        let mut decl = target.clone();
        let Node::VariableDeclaration(var) = &mut decl else {
            return Err(MutationError::structural(
                target.kind().as_str(),
                "expected a variable declaration",
            ));
        };
        if !narrow_declaration(var) {
            return Err(MutationError::structural(
                "VariableDeclaration",
                "no uint256 outside mapping keys",
            ));
        }
        Ok(Rewrite::replace(vec![decl]))
    }
}
