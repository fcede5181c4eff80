// src/rules/mod.rs
//! Vulnerability-injection rules.
//!
//! A rule pairs a detector, which lists candidate node ids in a baseline tree
//! without touching it, with a rewriter, which turns one candidate of a
//! private clone into replacement nodes. Applying the rewrite to the clone is
//! left to [`Rewrite::apply`] so every rule shares the same splice semantics.

mod access_toggle;
mod gas_param;
mod input_validation;
mod missing_constructor;
mod missing_return;
mod overflow_guard;
mod owner_setter;
mod pattern;
mod recursion;
mod return_mismatch;
mod swallowed_exception;
mod truncation;
mod tx_origin;
mod unchecked_call;
mod unchecked_send;
mod unsafe_call;

use crate::ast::build::{vuln_marker, NodeBuilder};
use crate::ast::{Documentation, Node, NodeId, Tree};
use crate::error::{MutationError, Result};
use crate::locate;
use crate::splice;
use serde::Serialize;
use std::fmt;

/// How a rewrite's nodes enter the clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// The nodes take the candidate's place.
    Replace,
    /// The nodes are appended to the member list enclosing the candidate.
    Add,
    /// The candidate is removed.
    Delete,
}

impl OperationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Add => "add",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a rewriter.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewrite {
    pub nodes: Vec<Node>,
    pub operation: OperationKind,
}

impl Rewrite {
    #[must_use]
    pub fn replace(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            operation: OperationKind::Replace,
        }
    }

    #[must_use]
    pub fn add(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            operation: OperationKind::Add,
        }
    }

    #[must_use]
    pub fn delete() -> Self {
        Self {
            nodes: Vec::new(),
            operation: OperationKind::Delete,
        }
    }

    /// Splices the rewrite into `tree` at `target`.
    ///
    /// Returns the id that names the variant: the first appended id for
    /// `Add`, the candidate's own id otherwise.
    ///
    /// # Errors
    /// `NotFound` if `target` is not in `tree`, `Structural` if the nodes do
    /// not fit the candidate's position.
    pub fn apply(self, tree: &mut Tree, target: NodeId) -> Result<NodeId> {
        match self.operation {
            OperationKind::Replace => {
                splice::replace(tree.root_mut(), target, self.nodes)?;
                Ok(target)
            }
            OperationKind::Delete => {
                splice::delete(tree.root_mut(), target)?;
                Ok(target)
            }
            OperationKind::Add => {
                let ids = splice::append_sibling(tree.root_mut(), target, self.nodes)?;
                ids.first().copied().ok_or_else(|| {
                    MutationError::structural("ContractDefinition", "add rewrite produced no nodes")
                })
            }
        }
    }
}

/// What a rewriter may consult while building nodes for one clone.
pub struct RewriteContext<'a> {
    tree: &'a Tree,
    /// Allocates ids above everything already in the clone.
    pub build: NodeBuilder,
    annotate: bool,
}

impl<'a> RewriteContext<'a> {
    #[must_use]
    pub fn new(tree: &'a Tree, annotate: bool) -> Self {
        Self {
            tree,
            build: NodeBuilder::for_tree(tree),
            annotate,
        }
    }

    #[must_use]
    pub fn tree(&self) -> &'a Tree {
        self.tree
    }

    /// Marker for a synthesized statement or function, if annotation is on.
    #[must_use]
    pub fn marker(&self, rule: &str, operation: &str, site: &str) -> Option<Documentation> {
        self.annotate.then(|| vuln_marker(rule, operation, site))
    }
}

pub trait Rule: Send + Sync {
    /// Catalog id, e.g. `1-3-1`.
    fn id(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Operation the rewriter reports, for listings.
    fn operation(&self) -> OperationKind {
        OperationKind::Replace
    }

    /// Suffix used in artifact names.
    fn suffix(&self) -> &'static str {
        self.id()
    }

    /// Candidate ids in preorder. Must not depend on anything but `tree`.
    fn detect(&self, tree: &Tree) -> Vec<NodeId>;

    /// Builds the replacement for `target`, a node of the clone in `cx`.
    ///
    /// # Errors
    /// `Structural` if `target` lacks something the rewrite depends on.
    fn rewrite(&self, cx: &mut RewriteContext<'_>, target: &Node) -> Result<Rewrite>;
}

/// Rewrites candidate `target` of `tree` in place and returns the variant id.
///
/// # Errors
/// `NotFound` if the candidate is absent, `Structural` from the rewriter or
/// the splice.
pub fn mutate(rule: &dyn Rule, tree: &mut Tree, target: NodeId, annotate: bool) -> Result<NodeId> {
    let rewrite = {
        let node = locate::find_by_id(tree.root(), target)
            .ok_or(MutationError::NotFound { id: target })?;
        let mut cx = RewriteContext::new(tree, annotate);
        rule.rewrite(&mut cx, node)?
    };
    rewrite.apply(tree, target)
}

/// Ordered set of rules.
pub struct Catalog {
    rules: Vec<Box<dyn Rule>>,
}

impl Catalog {
    /// Every known rule, in catalog order.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rules: vec![
                Box::new(unchecked_call::UncheckedCall),
                Box::new(swallowed_exception::SwallowedException),
                Box::new(unsafe_call::UnsafeCall),
                Box::new(gas_param::GasParam),
                Box::new(unchecked_send::UncheckedSend),
                Box::new(missing_constructor::MissingConstructor),
                Box::new(missing_return::MissingReturn),
                Box::new(return_mismatch::ReturnMismatch),
                Box::new(recursion::Recursion),
                Box::new(access_toggle::AccessToggle),
                Box::new(input_validation::InputValidation),
                Box::new(overflow_guard::OverflowGuard),
                Box::new(truncation::Truncation),
                Box::new(tx_origin::TxOrigin),
                Box::new(owner_setter::OwnerSetter),
            ],
        }
    }

    /// Keeps the rules whose ids appear in `ids`, preserving catalog order.
    /// An empty list keeps everything.
    ///
    /// # Errors
    /// Returns the first id that names no rule.
    pub fn select(self, ids: &[String]) -> std::result::Result<Self, String> {
        if let Some(unknown) = ids.iter().find(|id| !self.rules.iter().any(|r| r.id() == *id)) {
            return Err(unknown.clone());
        }
        if ids.is_empty() {
            return Ok(self);
        }
        let rules = self
            .rules
            .into_iter()
            .filter(|r| ids.iter().any(|id| id == r.id()))
            .collect();
        Ok(Self { rules })
    }

    /// Drops the rules whose ids appear in `ids`.
    #[must_use]
    pub fn without(self, ids: &[String]) -> Self {
        let rules = self
            .rules
            .into_iter()
            .filter(|r| !ids.iter().any(|id| id == r.id()))
            .collect();
        Self { rules }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn Rule> {
        self.rules.iter().find(|r| r.id() == id).map(Box::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(Box::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_is_stable() {
        let ids: Vec<_> = Catalog::standard().iter().map(|r| r.id()).collect();
        assert_eq!(
            ids,
            vec![
                "1-3-1", "1-3-2", "2-1-1", "3-1", "4-1", "5-2-1", "5-6-1", "5-6-2", "5-13-1",
                "6-1-7", "6-2-1", "7-1-1", "7-3-1", "8-1-1", "8-1-2"
            ]
        );
    }

    #[test]
    fn suffix_defaults_to_id() {
        for rule in Catalog::standard().iter() {
            assert_eq!(rule.suffix(), rule.id());
        }
    }

    #[test]
    fn select_keeps_catalog_order() {
        let picked = Catalog::standard()
            .select(&["8-1-1".to_string(), "1-3-1".to_string()])
            .unwrap();
        let ids: Vec<_> = picked.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["1-3-1", "8-1-1"]);
    }

    #[test]
    fn select_rejects_unknown_id() {
        let err = Catalog::standard().select(&["9-9-9".to_string()]).err();
        assert_eq!(err.as_deref(), Some("9-9-9"));
    }

    #[test]
    fn without_drops_rules() {
        let rest = Catalog::standard().without(&["5-2-1".to_string()]);
        assert_eq!(rest.len(), 14);
        assert!(rest.get("5-2-1").is_none());
    }

    #[test]
    fn mutate_reports_missing_candidate() {
        let mut tree = fixture::contract("");
        let rule = Catalog::standard();
        let err = mutate(rule.get("5-2-1").unwrap(), &mut tree, NodeId(4242), true);
        assert!(matches!(err, Err(MutationError::NotFound { .. })));
    }

    #[test]
    fn add_rewrite_without_nodes_is_structural() {
        let mut tree = fixture::contract(&fixture::state_var(10, "paused", "bool", "internal", None));
        let err = Rewrite::add(Vec::new()).apply(&mut tree, NodeId(10));
        assert!(matches!(err, Err(MutationError::Structural { .. })));
    }
}
