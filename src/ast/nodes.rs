//! Per-kind payloads of [`Node`](super::Node).
//!
//! Field names follow the compiler's compact JSON (`camelCase`), and both the
//! 0.4/0.5 and the 0.6+ shapes deserialize into the same structs.

use super::{Node, NodeId, SourceSpan, YulNode};
use serde::{Deserialize, Deserializer, Serialize};

/// `null` and a missing key both become the empty value.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_identifier: Option<String>,
}

impl TypeDescriptions {
    #[must_use]
    pub fn new(type_string: &str, type_identifier: &str) -> Self {
        Self {
            type_string: Some(type_string.to_string()),
            type_identifier: Some(type_identifier.to_string()),
        }
    }
}

/// NatSpec attached to a declaration or statement.
///
/// Older compilers store the bare text, newer ones a `StructuredDocumentation`
/// object. The object's own id is dropped; it is always smaller than the id of
/// the node that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Documentation {
    Plain(String),
    Structured { text: String },
}

impl Documentation {
    #[must_use]
    pub fn structured(text: impl Into<String>) -> Self {
        Self::Structured { text: text.into() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Structured { text } => text,
        }
    }
}

// --- source unit level ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUnit {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    #[serde(default, deserialize_with = "nullable")]
    pub nodes: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PragmaDirective {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    #[serde(default, deserialize_with = "nullable")]
    pub literals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasedSymbol {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolAlias {
    pub foreign: AliasedSymbol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDirective {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub file: String,
    #[serde(default, deserialize_with = "nullable")]
    pub unit_alias: String,
    #[serde(default, deserialize_with = "nullable")]
    pub symbol_aliases: Vec<SymbolAlias>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDefinition {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub name: String,
    #[serde(default = "default_contract_kind")]
    pub contract_kind: String,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub base_contracts: Vec<Node>,
    #[serde(default, deserialize_with = "nullable")]
    pub nodes: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

fn default_contract_kind() -> String {
    "contract".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InheritanceSpecifier {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub base_name: Box<Node>,
    #[serde(default, deserialize_with = "nullable")]
    pub arguments: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsingForDirective {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    #[serde(default)]
    pub library_name: Option<Box<Node>>,
    #[serde(default)]
    pub type_name: Option<Box<Node>>,
    #[serde(default)]
    pub global: bool,
}

// --- callables ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDefinition {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    #[serde(default)]
    pub name: String,
    /// `function`, `constructor`, `fallback`, `receive` or `freeFunction` (0.5+).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// 0.4 constructor flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_constructor: Option<bool>,
    #[serde(default)]
    pub visibility: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
    #[serde(default, rename = "constant", skip_serializing_if = "Option::is_none")]
    pub is_declared_const: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<bool>,
    /// Present (even when false) only from 0.6 on.
    #[serde(default, rename = "virtual", skip_serializing_if = "Option::is_none")]
    pub is_virtual: Option<bool>,
    #[serde(default)]
    pub overrides: Option<Box<Node>>,
    pub parameters: Box<Node>,
    pub return_parameters: Box<Node>,
    #[serde(default, deserialize_with = "nullable")]
    pub modifiers: Vec<Node>,
    #[serde(default)]
    pub body: Option<Box<Node>>,
    #[serde(default)]
    pub implemented: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

impl FunctionDefinition {
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.kind.as_deref() == Some("constructor") || self.is_constructor == Some(true)
    }

    /// Fallback and receive entry points have no callable name.
    #[must_use]
    pub fn is_special_entry(&self) -> bool {
        matches!(self.kind.as_deref(), Some("fallback" | "receive"))
            || (self.name.is_empty() && !self.is_constructor())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierDefinition {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub name: String,
    pub parameters: Box<Node>,
    #[serde(default, rename = "virtual", skip_serializing_if = "Option::is_none")]
    pub is_virtual: Option<bool>,
    #[serde(default)]
    pub overrides: Option<Box<Node>>,
    #[serde(default)]
    pub body: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierInvocation {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub modifier_name: Box<Node>,
    #[serde(default, deserialize_with = "nullable")]
    pub arguments: Vec<Node>,
}

/// Shared shape of events and custom errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinition {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub name: String,
    pub parameters: Box<Node>,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructDefinition {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub members: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDefinition {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub members: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDefinedValueTypeDefinition {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub name: String,
    pub underlying_type: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclaration {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    #[serde(default)]
    pub name: String,
    /// Absent for 0.4 `var` declarations.
    #[serde(default)]
    pub type_name: Option<Box<Node>>,
    #[serde(default)]
    pub value: Option<Box<Node>>,
    #[serde(default)]
    pub state_variable: bool,
    #[serde(default)]
    pub constant: bool,
    /// `mutable`, `immutable` or `constant` (0.6.5+).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutability: Option<String>,
    #[serde(default)]
    pub visibility: String,
    #[serde(default = "default_storage")]
    pub storage_location: String,
    #[serde(default)]
    pub indexed: bool,
    #[serde(default)]
    pub overrides: Option<Box<Node>>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

fn default_storage() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterList {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    #[serde(default, deserialize_with = "nullable")]
    pub parameters: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideSpecifier {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    #[serde(default, deserialize_with = "nullable")]
    pub overrides: Vec<Node>,
}

// --- statements ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    #[serde(default, deserialize_with = "nullable")]
    pub statements: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclarationStatement {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    /// `None` entries are skipped tuple slots: `(, uint b) = f();`.
    #[serde(default, deserialize_with = "nullable")]
    pub declarations: Vec<Option<Node>>,
    #[serde(default)]
    pub initial_value: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionStatement {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub expression: Box<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfStatement {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub condition: Box<Node>,
    pub true_body: Box<Node>,
    #[serde(default)]
    pub false_body: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForStatement {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    #[serde(default)]
    pub initialization_expression: Option<Box<Node>>,
    #[serde(default)]
    pub condition: Option<Box<Node>>,
    #[serde(default)]
    pub loop_expression: Option<Box<Node>>,
    pub body: Box<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

/// Shared by `while` and `do ... while`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhileStatement {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub condition: Box<Node>,
    pub body: Box<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

/// Payload of keyword-only statements (`break`, `continue`, `_`, `throw`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Return {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    #[serde(default)]
    pub expression: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmitStatement {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub event_call: Box<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertStatement {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub error_call: Box<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineAssembly {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    /// Raw block text, as stored by 0.4/0.5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations: Option<String>,
    #[serde(default, rename = "AST", skip_serializing_if = "Option::is_none")]
    pub ast: Option<YulNode>,
    #[serde(default, deserialize_with = "nullable")]
    pub flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TryStatement {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub external_call: Box<Node>,
    #[serde(default, deserialize_with = "nullable")]
    pub clauses: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TryCatchClause {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    #[serde(default)]
    pub error_name: String,
    #[serde(default)]
    pub parameters: Option<Box<Node>>,
    pub block: Box<Node>,
}

// --- expressions ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub operator: String,
    pub left_hand_side: Box<Node>,
    pub right_hand_side: Box<Node>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryOperation {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub operator: String,
    pub left_expression: Box<Node>,
    pub right_expression: Box<Node>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnaryOperation {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub operator: String,
    #[serde(default)]
    pub prefix: bool,
    pub sub_expression: Box<Node>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCall {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub expression: Box<Node>,
    #[serde(default, deserialize_with = "nullable")]
    pub arguments: Vec<Node>,
    #[serde(default, deserialize_with = "nullable")]
    pub names: Vec<String>,
    /// `functionCall`, `typeConversion` or `structConstructorCall`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallOptions {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub expression: Box<Node>,
    #[serde(default, deserialize_with = "nullable")]
    pub names: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub options: Vec<Node>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberAccess {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub expression: Box<Node>,
    pub member_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_declaration: Option<i64>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexAccess {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub base_expression: Box<Node>,
    #[serde(default)]
    pub index_expression: Option<Box<Node>>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRangeAccess {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub base_expression: Box<Node>,
    #[serde(default)]
    pub start_expression: Option<Box<Node>>,
    #[serde(default)]
    pub end_expression: Option<Box<Node>>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_declaration: Option<i64>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Literal {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    /// `bool`, `number`, `string`, `hexString` or `unicodeString`.
    pub kind: String,
    /// `None` when the bytes are not valid UTF-8.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdenomination: Option<String>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditional {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub condition: Box<Node>,
    pub true_expression: Box<Node>,
    pub false_expression: Box<Node>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TupleExpression {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    #[serde(default, deserialize_with = "nullable")]
    pub components: Vec<Option<Node>>,
    #[serde(default)]
    pub is_inline_array: bool,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpression {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub type_name: Box<Node>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

/// `typeName` is a bare string before 0.6 and an `ElementaryTypeName` after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementaryTypeRef {
    Name(String),
    Node(Box<Node>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementaryTypeNameExpression {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub type_name: ElementaryTypeRef,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

// --- type names ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementaryTypeName {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDefinedTypeName {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub path_node: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_declaration: Option<i64>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierPath {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_declaration: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub key_type: Box<Node>,
    pub value_type: Box<Node>,
    #[serde(default, deserialize_with = "nullable")]
    pub key_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub value_name: String,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayTypeName {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub base_type: Box<Node>,
    #[serde(default)]
    pub length: Option<Box<Node>>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionTypeName {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpan>,
    pub parameter_types: Box<Node>,
    pub return_parameter_types: Box<Node>,
    #[serde(default)]
    pub visibility: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}
