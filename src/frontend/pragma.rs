// src/frontend/pragma.rs
//! Compiler version selection from `pragma solidity`.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PRAGMA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"pragma\s+solidity\s+([^;]+);").unwrap_or_else(|_| panic!("Invalid Regex"))
});
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+").unwrap_or_else(|_| panic!("Invalid Regex")));

/// First concrete `x.y.z` of the first `pragma solidity`, i.e. the lower
/// bound of a range such as `>=0.4.22 <0.6.0`.
#[must_use]
pub fn declared_version(source: &str) -> Option<&str> {
    let constraint = PRAGMA_RE.captures(source)?.get(1)?;
    VERSION_RE.find(constraint.as_str()).map(|m| m.as_str())
}

/// The version to select for `source`, after the floor table.
#[must_use]
pub fn select_version(source: &str, floor: &BTreeMap<String, String>) -> Option<String> {
    let declared = declared_version(source)?;
    Some(floor.get(declared).map_or(declared, String::as_str).to_string())
}
