// tests/properties.rs - invariants that hold for every rule and input
mod common;

use common::{
    call, elementary, expr_stmt, function, hidden_flag, ident, member, sender_guard, source_unit,
    unchecked_call_stmt, FakeFrontend, MemoryStore,
};
use solmutant_core::ast::{Node, NodeId, Tree};
use solmutant_core::codegen::emit_tree;
use solmutant_core::driver::{Driver, DriverOptions, Outcome};
use solmutant_core::locate::find_by_id;
use solmutant_core::rules::{mutate, Catalog};
use std::collections::HashSet;
use std::path::Path;

fn string_lit(id: u64, value: &str) -> String {
    format!(
        r#"{{"nodeType": "Literal", "id": {id}, "kind": "string", "value": "{value}",
            "typeDescriptions": {{"typeString": "literal_string \"{value}\""}}}}"#
    )
}

fn encode(id: u64, args: &[&str]) -> String {
    let callee = member(id + 1, "abi", "encodeWithSignature", "abi");
    let mut nodes = vec![string_lit(id + 3, "transfer(address,uint256)")];
    nodes.extend(
        args.iter()
            .enumerate()
            .map(|(i, name)| ident(id + 4 + i as u64, name, "uint256")),
    );
    expr_stmt(id + 9, &call(id, &callee, &nodes))
}

fn nested_allowance(id: u64) -> String {
    let inner = format!(
        r#"{{"nodeType": "Mapping", "id": {m}, "keyType": {k}, "valueType": {v},
            "typeDescriptions": {{"typeString": "mapping(address => uint256)",
                "typeIdentifier": "t_mapping$_t_address_$_t_uint256_$"}}}}"#,
        m = id + 2,
        k = elementary(id + 3, "address"),
        v = elementary(id + 4, "uint256"),
    );
    format!(
        r#"{{"nodeType": "VariableDeclaration", "id": {id}, "src": "{s}:60:0",
            "name": "allowed", "stateVariable": true, "constant": false,
            "visibility": "public",
            "typeName": {{"nodeType": "Mapping", "id": {m}, "keyType": {k}, "valueType": {inner},
                "typeDescriptions": {{"typeString": "mapping(address => mapping(address => uint256))",
                    "typeIdentifier": "t_mapping$_t_address_$_t_mapping$_t_address_$_t_uint256_$_$"}}}},
            "typeDescriptions": {{"typeString": "mapping(address => mapping(address => uint256))",
                "typeIdentifier": "t_mapping$_t_address_$_t_mapping$_t_address_$_t_uint256_$_$"}}}}"#,
        s = id * 10,
        m = id + 1,
        k = elementary(id + 5, "address"),
    )
}

/// One contract that gives most rules something to do.
fn busy_contract() -> Tree {
    source_unit(
        "Vault",
        &[
            hidden_flag(20, "paused"),
            nested_allowance(30),
            function(
                100,
                "withdraw",
                &[
                    sender_guard(200, true),
                    unchecked_call_stmt(300),
                    encode(400, &["to", "gas"]),
                ],
            ),
            function(500, "refresh", &[]),
        ],
    )
}

fn all_ids(tree: &Tree) -> Vec<NodeId> {
    tree.ids()
}

#[test]
fn zero_mutations_emit_the_input_program() {
    let tree = source_unit(
        "Shop",
        &[function(10, "buy", &[unchecked_call_stmt(100)])],
    );
    assert_eq!(
        emit_tree(&tree).unwrap(),
        "pragma solidity ^0.8.0;\n\ncontract Shop {\n    function buy() public {\n        \
         bool result = product.addProduct();\n    }\n}\n"
    );
}

#[test]
fn detection_is_repeatable() {
    let tree = busy_contract();
    for rule in Catalog::standard().iter() {
        assert_eq!(rule.detect(&tree), rule.detect(&tree), "rule {}", rule.id());
    }
}

#[test]
fn variants_are_independent_of_each_other_and_the_baseline() {
    let baseline = busy_contract();
    let before = baseline.clone();
    let frontend = FakeFrontend::default();
    let store = MemoryStore::default();
    let catalog = Catalog::standard();
    let driver = Driver::new(&catalog, &frontend, &store, DriverOptions::default());

    let report = driver
        .run_tree(Path::new("Vault.sol"), &baseline, |_| {})
        .unwrap();

    assert_eq!(baseline, before);
    assert!(report.records.len() >= 5);
    let variants = store.variants.lock().unwrap();
    let sources: HashSet<&str> = variants.iter().map(|(_, s, _)| s.as_str()).collect();
    assert_eq!(sources.len(), variants.len(), "two variants share one source");
    let keys: HashSet<&str> = variants.iter().map(|(k, _, _)| k.as_str()).collect();
    assert_eq!(keys.len(), variants.len(), "two variants share one key");

    let baseline_text = emit_tree(&baseline).unwrap();
    for (key, source, _) in variants.iter() {
        assert_ne!(source, &baseline_text, "{key} changed nothing");
    }
}

#[test]
fn additions_get_fresh_unique_ids() {
    let catalog = Catalog::standard();
    let rule = catalog.get("6-1-7").unwrap();
    let baseline = busy_contract();
    let mut clone = baseline.clone();
    let before_max = clone.max_id();

    let first = mutate(rule, &mut clone, NodeId(20), true).unwrap();
    assert!(first > before_max);

    let ids = all_ids(&clone);
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    let old: HashSet<_> = baseline.ids().into_iter().collect();
    assert!(ids.iter().filter(|id| !old.contains(id)).all(|id| *id > before_max));
    assert!(emit_tree(&clone)
        .unwrap()
        .contains("function togglePausedValue() public {"));
}

#[test]
fn nested_mapping_value_narrows_and_keys_stay() {
    let catalog = Catalog::standard();
    let rule = catalog.get("7-3-1").unwrap();
    let mut tree = busy_contract();
    assert!(rule.detect(&tree).contains(&NodeId(30)));

    let outer_key = find_by_id(tree.root(), NodeId(35)).cloned().unwrap();
    let inner_key = find_by_id(tree.root(), NodeId(33)).cloned().unwrap();
    let sibling = find_by_id(tree.root(), NodeId(20)).cloned().unwrap();
    mutate(rule, &mut tree, NodeId(30), false).unwrap();

    assert_eq!(find_by_id(tree.root(), NodeId(35)), Some(&outer_key));
    assert_eq!(find_by_id(tree.root(), NodeId(33)), Some(&inner_key));
    assert_eq!(find_by_id(tree.root(), NodeId(20)), Some(&sibling));
    let Some(Node::VariableDeclaration(var)) = find_by_id(tree.root(), NodeId(30)) else {
        panic!("declaration missing");
    };
    assert_eq!(
        var.type_descriptions.type_string.as_deref(),
        Some("mapping(address => mapping(address => uint32))")
    );
    assert!(emit_tree(&tree)
        .unwrap()
        .contains("mapping(address => mapping(address => uint32)) public allowed;"));
}

#[test]
fn tx_origin_keeps_operand_positions() {
    let catalog = Catalog::standard();
    let rule = catalog.get("8-1-1").unwrap();
    for (left, expected) in [
        (true, "require(tx.origin == owner);"),
        (false, "require(owner == tx.origin);"),
    ] {
        let mut tree = source_unit("Vault", &[function(10, "withdraw", &[sender_guard(200, left)])]);
        assert_eq!(rule.detect(&tree), vec![NodeId(202)]);
        mutate(rule, &mut tree, NodeId(202), false).unwrap();
        assert!(emit_tree(&tree).unwrap().contains(expected));
    }
}

#[test]
fn encoded_call_keeps_its_first_two_arguments() {
    let catalog = Catalog::standard();
    let rule = catalog.get("3-1").unwrap();
    let mut tree = source_unit(
        "Relay",
        &[function(
            10,
            "relay",
            &[
                encode(100, &["to", "gas"]),
                encode(200, &["to"]),
                encode(300, &["to", "gas", "extra"]),
            ],
        )],
    );
    assert_eq!(rule.detect(&tree), vec![NodeId(100)]);
    mutate(rule, &mut tree, NodeId(100), false).unwrap();
    let text = emit_tree(&tree).unwrap();
    let truncated = "abi.encodeWithSignature(\"transfer(address,uint256)\", to);\n";
    assert_eq!(text.matches(truncated).count(), 2);
    assert!(!text.contains(", to, gas);"));
    assert!(text.contains("abi.encodeWithSignature(\"transfer(address,uint256)\", to, gas, extra);"));
}

#[test]
fn skipped_candidates_do_not_stop_other_rules() {
    let frontend = FakeFrontend::default();
    let store = MemoryStore::default();
    let catalog = Catalog::standard()
        .select(&["8-1-1".to_string(), "1-3-1".to_string()])
        .unwrap();
    let nameless = format!(
        r#"{{"nodeType": "VariableDeclarationStatement", "id": 700,
            "declarations": [null], "initialValue": {}}}"#,
        call(703, &member(704, "product", "addProduct", "contract Product"), &[])
    );
    let tree = source_unit(
        "Shop",
        &[function(
            10,
            "buy",
            &[nameless, unchecked_call_stmt(100), sender_guard(600, true)],
        )],
    );
    let driver = Driver::new(&catalog, &frontend, &store, DriverOptions::default());
    let report = driver.run_tree(Path::new("Shop.sol"), &tree, |_| {}).unwrap();

    let outcomes: Vec<_> = report
        .records
        .iter()
        .map(|r| (r.rule, r.candidate, &r.outcome))
        .collect();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].0, "1-3-1");
    assert_eq!(outcomes[0].1, NodeId(700));
    assert!(matches!(outcomes[0].2, Outcome::Skipped { .. }));
    assert_eq!(outcomes[1], ("1-3-1", NodeId(100), &Outcome::Accepted));
    assert_eq!(outcomes[2], ("8-1-1", NodeId(602), &Outcome::Accepted));
}
