//! Typed syntax tree for the compiler's compact JSON AST.
//!
//! Every construct is one variant of the closed [`Node`] union. Child fields
//! are exposed generically through [`Node::slots`] and [`Node::slots_mut`] so
//! lookup and splicing never need per-kind code.

pub mod build;
mod ids;
mod nodes;
mod span;
mod yul;

pub use self::ids::NodeIdAllocator;
pub use self::nodes::*;
pub use self::span::{SourceSpan, SpanParseError};
pub use self::yul::{YulCaseValue, YulNode};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node, unique within one tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse grammar class, used to reject ill-kinded splices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Unit,
    Declaration,
    Statement,
    Expression,
    TypeName,
    /// Kind-specific helper nodes (parameter lists, modifier invocations, ...).
    Clause,
}

/// Read-only view of one child field.
#[derive(Debug, Clone, Copy)]
pub enum Slot<'a> {
    One(&'static str, &'a Node),
    Opt(&'static str, Option<&'a Node>),
    List(&'static str, &'a [Node]),
    Sparse(&'static str, &'a [Option<Node>]),
}

impl<'a> Slot<'a> {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::One(name, _) | Self::Opt(name, _) | Self::List(name, _) | Self::Sparse(name, _) => {
                *name
            }
        }
    }

    #[must_use]
    pub fn nodes(&self) -> Vec<&'a Node> {
        match *self {
            Self::One(_, node) => vec![node],
            Self::Opt(_, node) => node.into_iter().collect(),
            Self::List(_, list) => list.iter().collect(),
            Self::Sparse(_, list) => list.iter().flatten().collect(),
        }
    }
}

/// Mutable view of one child field, precise enough to splice into.
#[derive(Debug)]
pub enum SlotMut<'a> {
    One(&'static str, &'a mut Node),
    Opt(&'static str, &'a mut Option<Box<Node>>),
    List(&'static str, &'a mut Vec<Node>),
    Sparse(&'static str, &'a mut Vec<Option<Node>>),
}

impl<'a> SlotMut<'a> {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::One(name, _) | Self::Opt(name, _) | Self::List(name, _) | Self::Sparse(name, _) => {
                *name
            }
        }
    }

    #[must_use]
    pub fn into_nodes(self) -> Vec<&'a mut Node> {
        match self {
            Self::One(_, node) => vec![node],
            Self::Opt(_, node) => node.as_deref_mut().into_iter().collect(),
            Self::List(_, list) => list.iter_mut().collect(),
            Self::Sparse(_, list) => list.iter_mut().flatten().collect(),
        }
    }
}

/// Field types that can hold child nodes.
trait ChildField {
    fn slot(&self, name: &'static str) -> Slot<'_>;
    fn slot_mut(&mut self, name: &'static str) -> SlotMut<'_>;
}

impl ChildField for Box<Node> {
    fn slot(&self, name: &'static str) -> Slot<'_> {
        Slot::One(name, self)
    }
    fn slot_mut(&mut self, name: &'static str) -> SlotMut<'_> {
        SlotMut::One(name, self)
    }
}

impl ChildField for Option<Box<Node>> {
    fn slot(&self, name: &'static str) -> Slot<'_> {
        Slot::Opt(name, self.as_deref())
    }
    fn slot_mut(&mut self, name: &'static str) -> SlotMut<'_> {
        SlotMut::Opt(name, self)
    }
}

impl ChildField for Vec<Node> {
    fn slot(&self, name: &'static str) -> Slot<'_> {
        Slot::List(name, self)
    }
    fn slot_mut(&mut self, name: &'static str) -> SlotMut<'_> {
        SlotMut::List(name, self)
    }
}

impl ChildField for Vec<Option<Node>> {
    fn slot(&self, name: &'static str) -> Slot<'_> {
        Slot::Sparse(name, self)
    }
    fn slot_mut(&mut self, name: &'static str) -> SlotMut<'_> {
        SlotMut::Sparse(name, self)
    }
}

macro_rules! node_kinds {
    ($($variant:ident($payload:ident) [$($field:ident),*] $category:ident;)*) => {
        /// One syntax construct. The variant name is the compiler's `nodeType`.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "nodeType")]
        pub enum Node {
            $($variant($payload),)*
        }

        /// Payload-free mirror of [`Node`]'s variants.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $($variant,)*
        }

        impl NodeKind {
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }

            #[must_use]
            pub fn category(self) -> Category {
                match self {
                    $(Self::$variant => Category::$category,)*
                }
            }
        }

        impl Node {
            #[must_use]
            pub fn kind(&self) -> NodeKind {
                match self {
                    $(Self::$variant(_) => NodeKind::$variant,)*
                }
            }

            #[must_use]
            pub fn id(&self) -> NodeId {
                match self {
                    $(Self::$variant(n) => n.id,)*
                }
            }

            pub fn set_id(&mut self, id: NodeId) {
                match self {
                    $(Self::$variant(n) => n.id = id,)*
                }
            }

            #[must_use]
            pub fn src(&self) -> Option<SourceSpan> {
                match self {
                    $(Self::$variant(n) => n.src,)*
                }
            }

            pub fn set_src(&mut self, src: Option<SourceSpan>) {
                match self {
                    $(Self::$variant(n) => n.src = src,)*
                }
            }

            /// Child fields in source order.
            #[must_use]
            pub fn slots(&self) -> Vec<Slot<'_>> {
                match self {
                    $(Self::$variant(_n) => vec![$(ChildField::slot(&_n.$field, stringify!($field))),*],)*
                }
            }

            #[must_use]
            pub fn slots_mut(&mut self) -> Vec<SlotMut<'_>> {
                match self {
                    $(Self::$variant(_n) => vec![$(ChildField::slot_mut(&mut _n.$field, stringify!($field))),*],)*
                }
            }
        }
    };
}

node_kinds! {
    SourceUnit(SourceUnit) [nodes] Unit;
    PragmaDirective(PragmaDirective) [] Declaration;
    ImportDirective(ImportDirective) [] Declaration;
    ContractDefinition(ContractDefinition) [base_contracts, nodes] Declaration;
    InheritanceSpecifier(InheritanceSpecifier) [base_name, arguments] Clause;
    UsingForDirective(UsingForDirective) [library_name, type_name] Declaration;
    FunctionDefinition(FunctionDefinition) [parameters, overrides, modifiers, return_parameters, body] Declaration;
    ModifierDefinition(ModifierDefinition) [parameters, overrides, body] Declaration;
    ModifierInvocation(ModifierInvocation) [modifier_name, arguments] Clause;
    EventDefinition(EventDefinition) [parameters] Declaration;
    ErrorDefinition(EventDefinition) [parameters] Declaration;
    StructDefinition(StructDefinition) [members] Declaration;
    EnumDefinition(EnumDefinition) [members] Declaration;
    EnumValue(EnumValue) [] Clause;
    UserDefinedValueTypeDefinition(UserDefinedValueTypeDefinition) [underlying_type] Declaration;
    VariableDeclaration(VariableDeclaration) [type_name, overrides, value] Declaration;
    ParameterList(ParameterList) [parameters] Clause;
    OverrideSpecifier(OverrideSpecifier) [overrides] Clause;
    Block(Block) [statements] Statement;
    UncheckedBlock(Block) [statements] Statement;
    VariableDeclarationStatement(VariableDeclarationStatement) [declarations, initial_value] Statement;
    ExpressionStatement(ExpressionStatement) [expression] Statement;
    IfStatement(IfStatement) [condition, true_body, false_body] Statement;
    ForStatement(ForStatement) [initialization_expression, condition, loop_expression, body] Statement;
    WhileStatement(WhileStatement) [condition, body] Statement;
    DoWhileStatement(WhileStatement) [body, condition] Statement;
    Continue(Marker) [] Statement;
    Break(Marker) [] Statement;
    PlaceholderStatement(Marker) [] Statement;
    Throw(Marker) [] Statement;
    Return(Return) [expression] Statement;
    EmitStatement(EmitStatement) [event_call] Statement;
    RevertStatement(RevertStatement) [error_call] Statement;
    InlineAssembly(InlineAssembly) [] Statement;
    TryStatement(TryStatement) [external_call, clauses] Statement;
    TryCatchClause(TryCatchClause) [parameters, block] Clause;
    Assignment(Assignment) [left_hand_side, right_hand_side] Expression;
    BinaryOperation(BinaryOperation) [left_expression, right_expression] Expression;
    UnaryOperation(UnaryOperation) [sub_expression] Expression;
    FunctionCall(FunctionCall) [expression, arguments] Expression;
    FunctionCallOptions(FunctionCallOptions) [expression, options] Expression;
    MemberAccess(MemberAccess) [expression] Expression;
    IndexAccess(IndexAccess) [base_expression, index_expression] Expression;
    IndexRangeAccess(IndexRangeAccess) [base_expression, start_expression, end_expression] Expression;
    Identifier(Identifier) [] Expression;
    Literal(Literal) [] Expression;
    Conditional(Conditional) [condition, true_expression, false_expression] Expression;
    TupleExpression(TupleExpression) [components] Expression;
    NewExpression(NewExpression) [type_name] Expression;
    ElementaryTypeNameExpression(ElementaryTypeNameExpression) [] Expression;
    ElementaryTypeName(ElementaryTypeName) [] TypeName;
    UserDefinedTypeName(UserDefinedTypeName) [path_node] TypeName;
    IdentifierPath(IdentifierPath) [] Clause;
    Mapping(Mapping) [key_type, value_type] TypeName;
    ArrayTypeName(ArrayTypeName) [base_type, length] TypeName;
    FunctionTypeName(FunctionTypeName) [parameter_types, return_parameter_types] TypeName;
}

impl Node {
    #[must_use]
    pub fn category(&self) -> Category {
        self.kind().category()
    }

    /// Declared or referenced name, for the kinds that carry one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::ContractDefinition(n) => Some(&n.name),
            Self::FunctionDefinition(n) => Some(&n.name),
            Self::ModifierDefinition(n) => Some(&n.name),
            Self::EventDefinition(n) | Self::ErrorDefinition(n) => Some(&n.name),
            Self::StructDefinition(n) => Some(&n.name),
            Self::EnumDefinition(n) => Some(&n.name),
            Self::EnumValue(n) => Some(&n.name),
            Self::UserDefinedValueTypeDefinition(n) => Some(&n.name),
            Self::VariableDeclaration(n) => Some(&n.name),
            Self::Identifier(n) => Some(&n.name),
            Self::IdentifierPath(n) => Some(&n.name),
            Self::ElementaryTypeName(n) => Some(&n.name),
            Self::UserDefinedTypeName(n) => n
                .name
                .as_deref()
                .or_else(|| n.path_node.as_deref().and_then(Node::name)),
            _ => None,
        }
    }

    #[must_use]
    pub fn type_descriptions(&self) -> Option<&TypeDescriptions> {
        match self {
            Self::VariableDeclaration(n) => Some(&n.type_descriptions),
            Self::Assignment(n) => Some(&n.type_descriptions),
            Self::BinaryOperation(n) => Some(&n.type_descriptions),
            Self::UnaryOperation(n) => Some(&n.type_descriptions),
            Self::FunctionCall(n) => Some(&n.type_descriptions),
            Self::FunctionCallOptions(n) => Some(&n.type_descriptions),
            Self::MemberAccess(n) => Some(&n.type_descriptions),
            Self::IndexAccess(n) => Some(&n.type_descriptions),
            Self::IndexRangeAccess(n) => Some(&n.type_descriptions),
            Self::Identifier(n) => Some(&n.type_descriptions),
            Self::Literal(n) => Some(&n.type_descriptions),
            Self::Conditional(n) => Some(&n.type_descriptions),
            Self::TupleExpression(n) => Some(&n.type_descriptions),
            Self::NewExpression(n) => Some(&n.type_descriptions),
            Self::ElementaryTypeNameExpression(n) => Some(&n.type_descriptions),
            Self::ElementaryTypeName(n) => Some(&n.type_descriptions),
            Self::UserDefinedTypeName(n) => Some(&n.type_descriptions),
            Self::Mapping(n) => Some(&n.type_descriptions),
            Self::ArrayTypeName(n) => Some(&n.type_descriptions),
            Self::FunctionTypeName(n) => Some(&n.type_descriptions),
            _ => None,
        }
    }

    /// Static type as printed by the compiler, e.g. `uint256` or `contract Token`.
    #[must_use]
    pub fn type_string(&self) -> Option<&str> {
        self.type_descriptions()
            .and_then(|t| t.type_string.as_deref())
    }

    /// Member list of nodes that own declarations (source units and contracts).
    pub fn declarations_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Self::SourceUnit(n) => Some(&mut n.nodes),
            Self::ContractDefinition(n) => Some(&mut n.nodes),
            _ => None,
        }
    }

    #[must_use]
    pub fn declarations(&self) -> Option<&[Node]> {
        match self {
            Self::SourceUnit(n) => Some(&n.nodes),
            Self::ContractDefinition(n) => Some(&n.nodes),
            _ => None,
        }
    }

    #[must_use]
    pub fn statements(&self) -> Option<&[Node]> {
        match self {
            Self::Block(n) | Self::UncheckedBlock(n) => Some(&n.statements),
            _ => None,
        }
    }

    #[must_use]
    pub fn children(&self) -> Vec<&Node> {
        self.slots().iter().flat_map(Slot::nodes).collect()
    }

    /// Visits this node and every descendant in preorder.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    #[must_use]
    pub fn preorder(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        self.walk(&mut |node| out.push(node));
        out
    }

    #[must_use]
    pub fn max_id(&self) -> NodeId {
        let mut max = self.id();
        self.walk(&mut |node| max = max.max(node.id()));
        max
    }
}

/// A whole parsed program, rooted at its source unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    root: Node,
}

impl Tree {
    #[must_use]
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Parses compact JSON. Deeply nested expressions are common in real
    /// contracts, so serde_json's recursion limit is lifted.
    ///
    /// # Errors
    /// Returns error if the text is not a compact AST of a known shape.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let root = Node::deserialize(&mut de)?;
        de.end()?;
        Ok(Self { root })
    }

    /// # Errors
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    #[must_use]
    pub fn into_root(self) -> Node {
        self.root
    }

    #[must_use]
    pub fn max_id(&self) -> NodeId {
        self.root.max_id()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<NodeId> {
        self.root.preorder().iter().map(|n| n.id()).collect()
    }
}
