//! Inline assembly (Yul) sub-grammar, as carried in `InlineAssembly.AST`.
//!
//! Yul nodes carry no ids, so they are never candidates or splice targets.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nodeType")]
pub enum YulNode {
    YulBlock {
        #[serde(default)]
        statements: Vec<YulNode>,
    },
    YulVariableDeclaration {
        variables: Vec<YulNode>,
        #[serde(default)]
        value: Option<Box<YulNode>>,
    },
    YulTypedName {
        name: String,
    },
    YulAssignment {
        #[serde(rename = "variableNames")]
        variable_names: Vec<YulNode>,
        value: Box<YulNode>,
    },
    YulExpressionStatement {
        expression: Box<YulNode>,
    },
    YulFunctionCall {
        #[serde(rename = "functionName")]
        function_name: Box<YulNode>,
        #[serde(default)]
        arguments: Vec<YulNode>,
    },
    YulIdentifier {
        name: String,
    },
    YulLiteral {
        kind: String,
        #[serde(default)]
        value: Option<String>,
        #[serde(default, rename = "hexValue", skip_serializing_if = "Option::is_none")]
        hex_value: Option<String>,
    },
    YulIf {
        condition: Box<YulNode>,
        body: Box<YulNode>,
    },
    YulForLoop {
        pre: Box<YulNode>,
        condition: Box<YulNode>,
        post: Box<YulNode>,
        body: Box<YulNode>,
    },
    YulSwitch {
        expression: Box<YulNode>,
        #[serde(default)]
        cases: Vec<YulNode>,
    },
    YulCase {
        value: YulCaseValue,
        body: Box<YulNode>,
    },
    YulFunctionDefinition {
        name: String,
        #[serde(default)]
        parameters: Vec<YulNode>,
        #[serde(default, rename = "returnVariables")]
        return_variables: Vec<YulNode>,
        body: Box<YulNode>,
    },
    YulBreak {},
    YulContinue {},
    YulLeave {},
}

/// A `case` label: either the literal `"default"` or a literal node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YulCaseValue {
    Default(String),
    Literal(Box<YulNode>),
}

impl YulNode {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::YulBlock { .. } => "YulBlock",
            Self::YulVariableDeclaration { .. } => "YulVariableDeclaration",
            Self::YulTypedName { .. } => "YulTypedName",
            Self::YulAssignment { .. } => "YulAssignment",
            Self::YulExpressionStatement { .. } => "YulExpressionStatement",
            Self::YulFunctionCall { .. } => "YulFunctionCall",
            Self::YulIdentifier { .. } => "YulIdentifier",
            Self::YulLiteral { .. } => "YulLiteral",
            Self::YulIf { .. } => "YulIf",
            Self::YulForLoop { .. } => "YulForLoop",
            Self::YulSwitch { .. } => "YulSwitch",
            Self::YulCase { .. } => "YulCase",
            Self::YulFunctionDefinition { .. } => "YulFunctionDefinition",
            Self::YulBreak {} => "YulBreak",
            Self::YulContinue {} => "YulContinue",
            Self::YulLeave {} => "YulLeave",
        }
    }
}
