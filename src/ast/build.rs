//! Constructors for synthesized nodes.
//!
//! Every node built here takes its id from the wrapped allocator, so a builder
//! seeded from a tree never collides with ids already in that tree.

use super::{
    Assignment, Block, BinaryOperation, Documentation, ElementaryTypeName,
    ElementaryTypeNameExpression, ElementaryTypeRef, ExpressionStatement, FunctionCall,
    FunctionDefinition, Identifier, Literal, MemberAccess, Node, NodeId, NodeIdAllocator,
    ParameterList, Tree, TypeDescriptions, VariableDeclarationStatement,
};

/// Address used when a rewritten declaration needs an `address` value.
pub const PLACEHOLDER_ADDRESS: &str = "0x874D72e8F9908fDC55a420Bead9A22a8A5b20D91";

/// NatSpec tag identifying an inserted statement or declaration.
#[must_use]
pub fn vuln_marker(rule: &str, operation: &str, site: &str) -> Documentation {
    Documentation::structured(format!("@notice vuln,{rule},{operation},{site}"))
}

pub struct NodeBuilder {
    ids: NodeIdAllocator,
}

impl NodeBuilder {
    #[must_use]
    pub fn new(ids: NodeIdAllocator) -> Self {
        Self { ids }
    }

    #[must_use]
    pub fn for_tree(tree: &Tree) -> Self {
        Self::new(NodeIdAllocator::for_tree(tree))
    }

    pub fn next_id(&mut self) -> NodeId {
        self.ids.next_id()
    }

    #[must_use]
    pub fn into_allocator(self) -> NodeIdAllocator {
        self.ids
    }

    pub fn identifier(&mut self, name: &str, type_string: Option<&str>) -> Node {
        Node::Identifier(Identifier {
            id: self.next_id(),
            src: None,
            name: name.to_string(),
            referenced_declaration: None,
            type_descriptions: TypeDescriptions {
                type_string: type_string.map(str::to_string),
                type_identifier: None,
            },
        })
    }

    pub fn member_access(
        &mut self,
        expression: Node,
        member: &str,
        type_descriptions: TypeDescriptions,
    ) -> Node {
        Node::MemberAccess(MemberAccess {
            id: self.next_id(),
            src: None,
            expression: Box::new(expression),
            member_name: member.to_string(),
            referenced_declaration: None,
            type_descriptions,
        })
    }

    pub fn literal(&mut self, kind: &str, value: &str, type_string: &str) -> Node {
        Node::Literal(Literal {
            id: self.next_id(),
            src: None,
            kind: kind.to_string(),
            value: Some(value.to_string()),
            hex_value: None,
            subdenomination: None,
            type_descriptions: TypeDescriptions {
                type_string: Some(type_string.to_string()),
                type_identifier: None,
            },
        })
    }

    pub fn bool_literal(&mut self, value: bool) -> Node {
        self.literal("bool", if value { "true" } else { "false" }, "bool")
    }

    pub fn number_literal(&mut self, value: &str) -> Node {
        self.literal("number", value, &format!("int_const {value}"))
    }

    /// A well-typed stand-in initial value for the declaration `decl`.
    ///
    /// Only elementary types get a value. Arrays, mappings, structs and
    /// contracts yield `None` and the declaration is left uninitialized.
    pub fn default_value(&mut self, decl: &Node) -> Option<Node> {
        let type_string = decl.type_string().unwrap_or_default();
        let Node::VariableDeclaration(var) = decl else {
            return None;
        };
        let (name, payable) = match var.type_name.as_deref() {
            Some(Node::ElementaryTypeName(ty)) => (
                ty.name.as_str(),
                ty.state_mutability.as_deref() == Some("payable")
                    || type_string == "address payable",
            ),
            Some(_) => return None,
            // legacy `var` declarations only carry the inferred type string
            None if type_string.contains(['[', '(']) => return None,
            None => (
                type_string.split_whitespace().next().unwrap_or_default(),
                type_string == "address payable",
            ),
        };
        let name = name.to_string();
        self.elementary_value(&name, payable)
    }

    fn elementary_value(&mut self, name: &str, payable: bool) -> Option<Node> {
        if name == "bool" {
            return Some(self.bool_literal(true));
        }
        if name.starts_with("uint") || name.starts_with("int") {
            return Some(self.number_literal("10"));
        }
        if name == "address" {
            let literal = self.literal("number", PLACEHOLDER_ADDRESS, "address");
            return Some(if payable {
                self.payable_cast(literal)
            } else {
                literal
            });
        }
        if name == "byte" {
            return Some(self.literal("number", "0x00", "bytes1"));
        }
        if let Some(width) = name
            .strip_prefix("bytes")
            .and_then(|w| w.parse::<usize>().ok())
        {
            let zeros = "00".repeat(width);
            return Some(self.literal("number", &format!("0x{zeros}"), name));
        }
        if name == "string" || name == "bytes" {
            return Some(self.literal("string", "", "literal_string \"\""));
        }
        None
    }

    pub fn binary(&mut self, operator: &str, left: Node, right: Node, type_string: &str) -> Node {
        Node::BinaryOperation(BinaryOperation {
            id: self.next_id(),
            src: None,
            operator: operator.to_string(),
            left_expression: Box::new(left),
            right_expression: Box::new(right),
            type_descriptions: TypeDescriptions {
                type_string: Some(type_string.to_string()),
                type_identifier: None,
            },
        })
    }

    pub fn assignment(&mut self, lhs: Node, rhs: Node) -> Node {
        let type_descriptions = lhs.type_descriptions().cloned().unwrap_or_default();
        Node::Assignment(Assignment {
            id: self.next_id(),
            src: None,
            operator: "=".to_string(),
            left_hand_side: Box::new(lhs),
            right_hand_side: Box::new(rhs),
            type_descriptions,
        })
    }

    pub fn call(&mut self, callee: Node, arguments: Vec<Node>, type_string: Option<&str>) -> Node {
        Node::FunctionCall(FunctionCall {
            id: self.next_id(),
            src: None,
            expression: Box::new(callee),
            arguments,
            names: Vec::new(),
            kind: Some("functionCall".to_string()),
            type_descriptions: TypeDescriptions {
                type_string: type_string.map(str::to_string),
                type_identifier: None,
            },
        })
    }

    /// `payable(value)`.
    pub fn payable_cast(&mut self, value: Node) -> Node {
        let type_name = Node::ElementaryTypeName(ElementaryTypeName {
            id: self.next_id(),
            src: None,
            name: "address".to_string(),
            state_mutability: Some("payable".to_string()),
            type_descriptions: TypeDescriptions::default(),
        });
        let callee = Node::ElementaryTypeNameExpression(ElementaryTypeNameExpression {
            id: self.next_id(),
            src: None,
            type_name: ElementaryTypeRef::Node(Box::new(type_name)),
            type_descriptions: TypeDescriptions::new(
                "type(address payable)",
                "t_type$_t_address_payable_$",
            ),
        });
        let mut cast = self.call(callee, vec![value], Some("address payable"));
        if let Node::FunctionCall(call) = &mut cast {
            call.kind = Some("typeConversion".to_string());
        }
        cast
    }

    pub fn expression_statement(&mut self, expression: Node, doc: Option<Documentation>) -> Node {
        Node::ExpressionStatement(ExpressionStatement {
            id: self.next_id(),
            src: None,
            expression: Box::new(expression),
            documentation: doc,
        })
    }

    pub fn var_decl_statement(
        &mut self,
        declarations: Vec<Option<Node>>,
        initial_value: Option<Node>,
        doc: Option<Documentation>,
    ) -> Node {
        Node::VariableDeclarationStatement(VariableDeclarationStatement {
            id: self.next_id(),
            src: None,
            declarations,
            initial_value: initial_value.map(Box::new),
            documentation: doc,
        })
    }

    pub fn block(&mut self, statements: Vec<Node>) -> Node {
        Node::Block(Block {
            id: self.next_id(),
            src: None,
            statements,
            documentation: None,
        })
    }

    pub fn parameter_list(&mut self, parameters: Vec<Node>) -> Node {
        Node::ParameterList(ParameterList {
            id: self.next_id(),
            src: None,
            parameters,
        })
    }

    pub fn elementary_type(&mut self, name: &str) -> Node {
        Node::ElementaryTypeName(ElementaryTypeName {
            id: self.next_id(),
            src: None,
            name: name.to_string(),
            state_mutability: None,
            type_descriptions: TypeDescriptions {
                type_string: Some(name.to_string()),
                type_identifier: Some(format!("t_{name}")),
            },
        })
    }

    /// A parameterless, non-payable function with the given body.
    pub fn function(
        &mut self,
        name: &str,
        visibility: &str,
        body: Node,
        doc: Option<Documentation>,
    ) -> Node {
        let id = self.next_id();
        let parameters = self.parameter_list(Vec::new());
        let return_parameters = self.parameter_list(Vec::new());
        Node::FunctionDefinition(FunctionDefinition {
            id,
            src: None,
            name: name.to_string(),
            kind: Some("function".to_string()),
            is_constructor: None,
            visibility: visibility.to_string(),
            state_mutability: Some("nonpayable".to_string()),
            is_declared_const: None,
            payable: None,
            is_virtual: None,
            overrides: None,
            parameters: Box::new(parameters),
            return_parameters: Box::new(return_parameters),
            modifiers: Vec::new(),
            body: Some(Box::new(body)),
            implemented: true,
            documentation: doc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> NodeBuilder {
        NodeBuilder::new(NodeIdAllocator::starting_at(NodeId(50)))
    }

    fn literal_value(node: &Node) -> Option<String> {
        match node {
            Node::Literal(lit) => lit.value.clone(),
            _ => None,
        }
    }

    fn declaration(type_name: &str, type_string: &str) -> Node {
        let type_name = if type_name.is_empty() {
            String::new()
        } else {
            format!(r#""typeName": {type_name},"#)
        };
        let json = format!(
            r#"{{"nodeType": "VariableDeclaration", "id": 1, "name": "x", {type_name}
                "typeDescriptions": {{"typeString": "{type_string}"}}}}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    fn elementary(name: &str, mutability: Option<&str>) -> String {
        let mutability =
            mutability.map_or_else(String::new, |m| format!(r#", "stateMutability": "{m}""#));
        format!(r#"{{"nodeType": "ElementaryTypeName", "id": 2, "name": "{name}"{mutability}}}"#)
    }

    fn default_for(name: &str, type_string: &str) -> Option<Node> {
        builder().default_value(&declaration(&elementary(name, None), type_string))
    }

    #[test]
    fn default_values_follow_declared_type() {
        let value = |name, ty| default_for(name, ty).as_ref().and_then(literal_value);
        assert_eq!(value("bool", "bool").as_deref(), Some("true"));
        assert_eq!(value("uint256", "uint256").as_deref(), Some("10"));
        assert_eq!(value("int8", "int8").as_deref(), Some("10"));
        assert_eq!(value("address", "address").as_deref(), Some(PLACEHOLDER_ADDRESS));
        assert_eq!(value("bytes2", "bytes2").as_deref(), Some("0x0000"));
        assert_eq!(value("string", "string memory").as_deref(), Some(""));
    }

    #[test]
    fn payable_address_default_is_cast() {
        let decl = declaration(&elementary("address", Some("payable")), "address payable");
        let value = builder().default_value(&decl).unwrap();
        let Node::FunctionCall(call) = &value else {
            panic!("expected a conversion, got {value:?}");
        };
        assert_eq!(call.kind.as_deref(), Some("typeConversion"));
        assert_eq!(value.type_string(), Some("address payable"));
        assert_eq!(
            literal_value(&call.arguments[0]).as_deref(),
            Some(PLACEHOLDER_ADDRESS)
        );
    }

    #[test]
    fn non_elementary_declarations_get_no_default() {
        let array = format!(
            r#"{{"nodeType": "ArrayTypeName", "id": 3, "baseType": {}}}"#,
            elementary("uint256", None)
        );
        let mut b = builder();
        assert!(b.default_value(&declaration(&array, "uint256[] memory")).is_none());
        let contract = r#"{"nodeType": "UserDefinedTypeName", "id": 4, "name": "Product"}"#;
        assert!(b.default_value(&declaration(contract, "contract Product")).is_none());
        assert!(b.default_value(&declaration("", "uint256[]")).is_none());
        assert_eq!(
            b.default_value(&declaration("", "uint8"))
                .as_ref()
                .and_then(literal_value)
                .as_deref(),
            Some("10")
        );
    }

    #[test]
    fn function_uses_distinct_ids() {
        let mut b = builder();
        let body = b.block(Vec::new());
        let func = b.function("toggle", "public", body, None);
        let mut ids: Vec<_> = func.preorder().iter().map(|n| n.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert!(ids.iter().all(|id| id.0 >= 50));
    }

    #[test]
    fn marker_text_names_rule_and_site() {
        let doc = vuln_marker("6-1-7", "add", "function");
        assert_eq!(doc.text(), "@notice vuln,6-1-7,add,function");
    }
}
