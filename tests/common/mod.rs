// tests/common/mod.rs
//! Compact-JSON fixtures and an in-memory compiler for the pipeline tests.
#![allow(dead_code)]

use solmutant_core::ast::Tree;
use solmutant_core::error::{MutationError, Result};
use solmutant_core::frontend::{CompilerFrontend, Verification};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Serves pre-built trees by file stem and accepts every variant unless it
/// contains `reject_marker`.
#[derive(Default)]
pub struct FakeFrontend {
    trees: HashMap<String, Tree>,
    pub reject_marker: Option<String>,
    pub verified: Mutex<Vec<String>>,
}

impl FakeFrontend {
    pub fn with(mut self, stem: &str, tree: Tree) -> Self {
        self.trees.insert(stem.to_string(), tree);
        self
    }

    pub fn rejecting(mut self, marker: &str) -> Self {
        self.reject_marker = Some(marker.to_string());
        self
    }
}

impl CompilerFrontend for FakeFrontend {
    fn parse(&self, path: &Path, _source: &str) -> Result<Tree> {
        let stem = path.file_stem().unwrap().to_string_lossy();
        self.trees
            .get(stem.as_ref())
            .cloned()
            .ok_or_else(|| MutationError::Frontend(format!("ParserError in {stem}")))
    }

    fn verify(&self, _path: &Path, source: &str) -> Verification {
        self.verified.lock().unwrap().push(source.to_string());
        match &self.reject_marker {
            Some(marker) if source.contains(marker.as_str()) => {
                Verification::rejected("TypeError: rejected")
            }
            _ => Verification {
                accepted: true,
                diagnostics: String::new(),
                tree: None,
            },
        }
    }
}

pub fn source_unit(contract_name: &str, members: &[String]) -> Tree {
    let text = format!(
        r#"{{"nodeType": "SourceUnit", "id": 5000, "src": "0:9000:0", "nodes": [
            {{"nodeType": "PragmaDirective", "id": 1, "src": "0:23:0",
              "literals": ["solidity", "^", "0.8", ".0"]}},
            {{"nodeType": "ContractDefinition", "id": 4999, "src": "25:8900:0",
              "name": "{contract_name}", "contractKind": "contract", "baseContracts": [],
              "nodes": [{}]}}
        ]}}"#,
        members.join(", ")
    );
    Tree::from_json(&text).unwrap_or_else(|e| panic!("bad fixture: {e}\n{text}"))
}

pub fn function(id: u64, name: &str, statements: &[String]) -> String {
    format!(
        r#"{{"nodeType": "FunctionDefinition", "id": {id}, "src": "{start}:60:0",
            "name": "{name}", "kind": "function", "visibility": "public",
            "stateMutability": "nonpayable", "implemented": true, "modifiers": [],
            "parameters": {{"nodeType": "ParameterList", "id": {p}, "parameters": []}},
            "returnParameters": {{"nodeType": "ParameterList", "id": {r}, "parameters": []}},
            "body": {{"nodeType": "Block", "id": {b}, "src": "{body}:20:0",
                      "statements": [{}]}}}}"#,
        statements.join(", "),
        start = id * 10,
        body = id * 10 + 30,
        p = id + 1,
        r = id + 2,
        b = id + 3,
    )
}

pub fn ident(id: u64, name: &str, type_string: &str) -> String {
    format!(
        r#"{{"nodeType": "Identifier", "id": {id}, "name": "{name}",
            "typeDescriptions": {{"typeString": "{type_string}"}}}}"#
    )
}

/// `base.member` with `base` an identifier at `id + 1`.
pub fn member(id: u64, base: &str, member: &str, base_type: &str) -> String {
    format!(
        r#"{{"nodeType": "MemberAccess", "id": {id}, "memberName": "{member}",
            "expression": {}}}"#,
        ident(id + 1, base, base_type)
    )
}

pub fn call(id: u64, callee: &str, args: &[String]) -> String {
    format!(
        r#"{{"nodeType": "FunctionCall", "id": {id}, "kind": "functionCall",
            "expression": {callee}, "arguments": [{}]}}"#,
        args.join(", ")
    )
}

pub fn expr_stmt(id: u64, expression: &str) -> String {
    format!(r#"{{"nodeType": "ExpressionStatement", "id": {id}, "expression": {expression}}}"#)
}

pub fn elementary(id: u64, name: &str) -> String {
    format!(
        r#"{{"nodeType": "ElementaryTypeName", "id": {id}, "name": "{name}",
            "typeDescriptions": {{"typeString": "{name}", "typeIdentifier": "t_{name}"}}}}"#
    )
}

pub fn local(id: u64, name: &str, ty: &str) -> String {
    format!(
        r#"{{"nodeType": "VariableDeclaration", "id": {id}, "name": "{name}",
            "typeName": {},
            "typeDescriptions": {{"typeString": "{ty}", "typeIdentifier": "t_{ty}"}}}}"#,
        elementary(id + 1, ty)
    )
}

/// `bool result = product.addProduct();`, ids `id..id + 6`.
pub fn unchecked_call_stmt(id: u64) -> String {
    let callee = member(id + 4, "product", "addProduct", "contract Product");
    format!(
        r#"{{"nodeType": "VariableDeclarationStatement", "id": {id}, "src": "{s}:36:0",
            "declarations": [{}], "initialValue": {}}}"#,
        local(id + 1, "result", "bool"),
        call(id + 3, &callee, &[]),
        s = id * 10,
    )
}

/// `require(msg.sender == owner);`, ids `id..id + 7`.
pub fn sender_guard(id: u64, sender_on_left: bool) -> String {
    let sender = member(id + 3, "msg", "sender", "msg");
    let owner = ident(id + 5, "owner", "address");
    let (left, right) = if sender_on_left {
        (sender, owner)
    } else {
        (owner, sender)
    };
    let condition = format!(
        r#"{{"nodeType": "BinaryOperation", "id": {c}, "operator": "==",
            "leftExpression": {left}, "rightExpression": {right},
            "typeDescriptions": {{"typeString": "bool"}}}}"#,
        c = id + 2,
    );
    let require = ident(id + 6, "require", "function (bool) pure");
    expr_stmt(id, &call(id + 1, &require, &[condition]))
}

/// A private bool flag with no setter, ids `id..id + 1`.
pub fn hidden_flag(id: u64, name: &str) -> String {
    format!(
        r#"{{"nodeType": "VariableDeclaration", "id": {id}, "src": "{s}:20:0",
            "name": "{name}", "stateVariable": true, "constant": false,
            "visibility": "private", "typeName": {},
            "typeDescriptions": {{"typeString": "bool", "typeIdentifier": "t_bool"}}}}"#,
        elementary(id + 1, "bool"),
        s = id * 10,
    )
}

/// Keeps every stored variant in memory, keyed by file stem.
#[derive(Default)]
pub struct MemoryStore {
    pub variants: Mutex<Vec<(String, String, Tree)>>,
}

impl solmutant_core::store::ArtifactStore for MemoryStore {
    fn store_baseline(&self, _stem: &str, _suffix: &str, _tree: &Tree) -> Result<()> {
        Ok(())
    }

    fn store_accepted(
        &self,
        key: &solmutant_core::store::VariantKey,
        source: &str,
        tree: &Tree,
        _status: solmutant_core::store::VariantStatus,
    ) -> Result<()> {
        self.variants
            .lock()
            .unwrap()
            .push((key.file_stem(), source.to_string(), tree.clone()));
        Ok(())
    }

    fn store_rejected(
        &self,
        key: &solmutant_core::store::VariantKey,
        _source: &str,
        _diagnostics: &str,
    ) -> Result<()> {
        panic!("unexpected rejection of {}", key.file_stem());
    }
}
