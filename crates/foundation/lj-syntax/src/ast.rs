//! Lijs abstract syntax tree
//!
//! This is the language-specific tree produced by the parser. Every child is a
//! fully formed [`Node`]; check keywords only ever appear inside a [`Check`].

use std::{fmt, iter};

/// Root of a parsed program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Top-level nodes in source order
    pub body: Vec<Node>,
}

impl Program {
    /// Creates a program from its top-level nodes
    #[must_use]
    pub fn new(body: Vec<Node>) -> Self {
        Self { body }
    }

    /// Visits every node in the program, parents before children
    pub fn walk<'ast>(&'ast self, visit: &mut impl FnMut(&'ast Node)) {
        for node in &self.body {
            node.walk(visit);
        }
    }
}

/// Lijs syntax tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Variable reference, possibly dotted
    Identifier {
        /// Name as written (`a.b.c` stays one name)
        name: String,
    },
    /// Integer literal
    IntegerLiteral {
        /// Source text
        value: String,
    },
    /// Float literal
    FloatLiteral {
        /// Source text
        value: String,
    },
    /// String literal
    StringLiteral {
        /// Contents without quotes
        value: String,
    },
    /// `[ ... ]`
    ArrayLiteral {
        /// Elements in order
        elements: Vec<Node>,
    },
    /// `$ name value`
    Assignment {
        /// Variable name
        name: String,
        /// Assigned value, never another assignment
        value: Box<Node>,
    },
    /// `make name`
    ObjectCreate {
        /// Object name
        name: String,
    },
    /// `get name key`
    ObjectGet {
        /// Object name
        name: String,
        /// Identifier or string key
        key: Box<Node>,
    },
    /// `set name key value`
    ObjectSet {
        /// Object name
        name: String,
        /// Identifier or string key
        key: Box<Node>,
        /// Stored value
        value: Box<Node>,
    },
    /// `use 'path'` or `use 'path' as name`
    Import {
        /// Module path
        path: String,
        /// Binding introduced by `as`
        binding: Option<String>,
    },
    /// `export name`
    Export {
        /// Exported identifier
        name: String,
    },
    /// `def name [ params ] body`
    FunctionDef {
        /// Function name
        name: String,
        /// Parameter names
        params: Vec<String>,
        /// Body statements
        body: Vec<Node>,
    },
    /// `(name args...)`
    FunctionCall {
        /// Callee name, possibly dotted
        name: String,
        /// Arguments in order
        args: Vec<Node>,
    },
    /// `@ source body`
    Iterator {
        /// Iterated identifier or inline array
        source: Box<Node>,
        /// Loop body
        body: Vec<Node>,
    },
    /// `? left check right body else body`
    IfStatement {
        /// Condition
        check: Check,
        /// Statements run when the check holds
        pass: Vec<Node>,
        /// Statements run otherwise
        fail: Option<Vec<Node>>,
    },
    /// `! value`
    ReturnStatement {
        /// Returned value
        value: Option<Box<Node>>,
    },
    /// `(add a b)` and friends with exactly two operands
    Arithmetic {
        /// Operator
        op: ArithmeticOp,
        /// Left operand
        left: Box<Node>,
        /// Right operand
        right: Box<Node>,
    },
}

impl Node {
    /// Identifier node
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier { name: name.into() }
    }

    /// The node's discriminant
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Identifier { .. } => NodeKind::Identifier,
            Self::IntegerLiteral { .. } => NodeKind::IntegerLiteral,
            Self::FloatLiteral { .. } => NodeKind::FloatLiteral,
            Self::StringLiteral { .. } => NodeKind::StringLiteral,
            Self::ArrayLiteral { .. } => NodeKind::ArrayLiteral,
            Self::Assignment { .. } => NodeKind::Assignment,
            Self::ObjectCreate { .. } => NodeKind::ObjectCreate,
            Self::ObjectGet { .. } => NodeKind::ObjectGet,
            Self::ObjectSet { .. } => NodeKind::ObjectSet,
            Self::Import { .. } => NodeKind::Import,
            Self::Export { .. } => NodeKind::Export,
            Self::FunctionDef { .. } => NodeKind::FunctionDef,
            Self::FunctionCall { .. } => NodeKind::FunctionCall,
            Self::Iterator { .. } => NodeKind::Iterator,
            Self::IfStatement { .. } => NodeKind::IfStatement,
            Self::ReturnStatement { .. } => NodeKind::ReturnStatement,
            Self::Arithmetic { .. } => NodeKind::Arithmetic,
        }
    }

    /// Visits this node and all of its descendants, parents first
    pub fn walk<'ast>(&'ast self, visit: &mut impl FnMut(&'ast Self)) {
        visit(self);
        match self {
            Self::Identifier { .. }
            | Self::IntegerLiteral { .. }
            | Self::FloatLiteral { .. }
            | Self::StringLiteral { .. }
            | Self::ObjectCreate { .. }
            | Self::Import { .. }
            | Self::Export { .. } => {}
            Self::ArrayLiteral { elements } => walk_all(elements, visit),
            Self::Assignment { value, .. } => value.walk(visit),
            Self::ObjectGet { key, .. } => key.walk(visit),
            Self::ObjectSet { key, value, .. } => {
                key.walk(visit);
                value.walk(visit);
            }
            Self::FunctionDef { body, .. } => walk_all(body, visit),
            Self::FunctionCall { args, .. } => walk_all(args, visit),
            Self::Iterator { source, body } => {
                source.walk(visit);
                walk_all(body, visit);
            }
            Self::IfStatement { check, pass, fail } => {
                check.left.walk(visit);
                if let Some(right) = &check.right {
                    right.walk(visit);
                }
                walk_all(pass, visit);
                if let Some(fail) = fail {
                    walk_all(fail, visit);
                }
            }
            Self::ReturnStatement { value } => {
                if let Some(value) = value {
                    value.walk(visit);
                }
            }
            Self::Arithmetic { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
        }
    }

    /// Every name this node binds or refers to directly
    ///
    /// Dotted names contribute their first segment, which is the only part that
    /// lives in the variable namespace.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Identifier { name }
            | Self::Assignment { name, .. }
            | Self::ObjectCreate { name }
            | Self::ObjectGet { name, .. }
            | Self::ObjectSet { name, .. }
            | Self::Export { name }
            | Self::FunctionCall { name, .. } => vec![root_segment(name)],
            Self::Import { binding, .. } => {
                binding.iter().map(|name| root_segment(name)).collect()
            }
            Self::FunctionDef { name, params, .. } => iter::once(name.as_str())
                .chain(params.iter().map(String::as_str))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// First segment of a possibly dotted name
#[must_use]
pub fn root_segment(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

fn walk_all<'ast>(nodes: &'ast [Node], visit: &mut impl FnMut(&'ast Node)) {
    for node in nodes {
        node.walk(visit);
    }
}

/// Fieldless discriminant of [`Node`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// [`Node::Identifier`]
    Identifier,
    /// [`Node::IntegerLiteral`]
    IntegerLiteral,
    /// [`Node::FloatLiteral`]
    FloatLiteral,
    /// [`Node::StringLiteral`]
    StringLiteral,
    /// [`Node::ArrayLiteral`]
    ArrayLiteral,
    /// [`Node::Assignment`]
    Assignment,
    /// [`Node::ObjectCreate`]
    ObjectCreate,
    /// [`Node::ObjectGet`]
    ObjectGet,
    /// [`Node::ObjectSet`]
    ObjectSet,
    /// [`Node::Import`]
    Import,
    /// [`Node::Export`]
    Export,
    /// [`Node::FunctionDef`]
    FunctionDef,
    /// [`Node::FunctionCall`]
    FunctionCall,
    /// [`Node::Iterator`]
    Iterator,
    /// [`Node::IfStatement`]
    IfStatement,
    /// [`Node::ReturnStatement`]
    ReturnStatement,
    /// [`Node::Arithmetic`]
    Arithmetic,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identifier => "identifier",
            Self::IntegerLiteral => "integer literal",
            Self::FloatLiteral => "float literal",
            Self::StringLiteral => "string literal",
            Self::ArrayLiteral => "array literal",
            Self::Assignment => "assignment",
            Self::ObjectCreate => "object creation",
            Self::ObjectGet => "object get",
            Self::ObjectSet => "object set",
            Self::Import => "import",
            Self::Export => "export",
            Self::FunctionDef => "function definition",
            Self::FunctionCall => "function call",
            Self::Iterator => "iterator",
            Self::IfStatement => "if statement",
            Self::ReturnStatement => "return statement",
            Self::Arithmetic => "arithmetic",
        };
        write!(formatter, "{name}")
    }
}

/// Condition of an if statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    /// Which comparison to perform
    pub kind: CheckKind,
    /// Left operand
    pub left: Box<Node>,
    /// Right operand, absent for [`CheckKind::Exists`]
    pub right: Option<Box<Node>>,
}

/// Comparison performed by an if statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    /// `is`, strict equality
    Equality,
    /// `kinda`, loose equality
    Approx,
    /// `contains`, membership
    Contains,
    /// `exists`, truthiness of the left operand
    Exists,
}

impl CheckKind {
    /// Whether the check takes a right operand
    #[must_use]
    pub fn takes_right(self) -> bool {
        !matches!(self, Self::Exists)
    }
}

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    /// `add`
    Add,
    /// `sub`
    Sub,
    /// `mul`
    Mul,
    /// `div`
    Div,
    /// `mod`
    Mod,
}

impl ArithmeticOp {
    /// Looks up the operator reserved under a call name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add" => Some(Self::Add),
            "sub" => Some(Self::Sub),
            "mul" => Some(Self::Mul),
            "div" => Some(Self::Div),
            "mod" => Some(Self::Mod),
            _ => None,
        }
    }

    /// The reserved call name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
        }
    }
}
