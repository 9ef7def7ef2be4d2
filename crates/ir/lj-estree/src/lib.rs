//! ESTree output tree
//!
//! The target representation of lowering. Every node serializes as a JSON
//! object tagged with its ESTree `type`, so the tree can be handed to any
//! ESTree-compatible code generator.

mod literal;

pub use literal::LiteralValue;

use serde::Serialize;

/// Root of an ESTree program
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Program {
    /// Top-level statements
    pub body: Vec<Node>,
}

impl Program {
    /// Creates a program from its statements
    #[must_use]
    pub fn new(body: Vec<Node>) -> Self {
        Self { body }
    }

    /// Visits every node in the program, parents before children
    pub fn walk<'tree>(&'tree self, visit: &mut impl FnMut(&'tree Node)) {
        for node in &self.body {
            node.walk(visit);
        }
    }
}

/// An ESTree node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Node {
    /// `name`
    Identifier {
        /// Variable name
        name: String,
    },
    /// `object.property` or `object[property]`
    MemberExpression {
        /// Accessed object
        object: Box<Node>,
        /// Property name or key expression
        property: Box<Node>,
        /// Whether the property is an expression (`[]`) rather than a name
        computed: bool,
    },
    /// `callee(arguments...)`
    CallExpression {
        /// Called function
        callee: Box<Node>,
        /// Arguments in order
        arguments: Vec<Node>,
    },
    /// `var id = init, ...`
    VariableDeclaration {
        /// Declared variables
        declarations: Vec<VariableDeclarator>,
        /// Declaration keyword
        kind: DeclarationKind,
    },
    /// `function id(params) { body }`
    FunctionDeclaration {
        /// Function name
        id: Box<Node>,
        /// Parameter identifiers
        params: Vec<Node>,
        /// Parameter defaults, always empty
        defaults: Vec<Node>,
        /// Body block
        body: Box<Node>,
    },
    /// `{ body }`
    BlockStatement {
        /// Statements in order
        body: Vec<Node>,
    },
    /// `return argument`
    ReturnStatement {
        /// Returned value, `null` when absent
        argument: Option<Box<Node>>,
    },
    /// `[elements...]`
    ArrayExpression {
        /// Elements in order
        elements: Vec<Node>,
    },
    /// `{}`
    ObjectExpression {
        /// Properties, always empty
        properties: Vec<Node>,
    },
    /// `left = right`
    AssignmentExpression {
        /// Assignment operator
        operator: AssignmentOperator,
        /// Assigned place
        left: Box<Node>,
        /// Assigned value
        right: Box<Node>,
    },
    /// `if (test) consequent else alternate`
    IfStatement {
        /// Condition
        test: Box<Node>,
        /// Block run when the condition holds
        consequent: Box<Node>,
        /// Block run otherwise, `null` when absent
        alternate: Option<Box<Node>>,
    },
    /// `left operator right`
    BinaryExpression {
        /// Operator
        operator: BinaryOperator,
        /// Left operand
        left: Box<Node>,
        /// Right operand
        right: Box<Node>,
    },
    /// `operator argument`
    UnaryExpression {
        /// Operator
        operator: UnaryOperator,
        /// Whether the operator precedes its argument
        prefix: bool,
        /// Operand
        argument: Box<Node>,
    },
    /// `for (init; test; update) body`
    ForStatement {
        /// Loop initializer
        init: Box<Node>,
        /// Loop condition
        test: Box<Node>,
        /// Step expression
        update: Box<Node>,
        /// Loop body block
        body: Box<Node>,
    },
    /// `argument++`
    UpdateExpression {
        /// Operator
        operator: UpdateOperator,
        /// Whether the operator precedes its argument
        prefix: bool,
        /// Updated place
        argument: Box<Node>,
    },
    /// An expression in statement position
    ExpressionStatement {
        /// The expression
        expression: Box<Node>,
    },
    /// Number or string literal
    Literal {
        /// Literal value
        value: LiteralValue,
        /// Source spelling
        raw: String,
    },
}

/// One `id = init` pair of a [`Node::VariableDeclaration`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct VariableDeclarator {
    /// Declared identifier
    pub id: Node,
    /// Initial value
    pub init: Node,
}

/// Keyword of a variable declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclarationKind {
    /// `var`
    #[serde(rename = "var")]
    Var,
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignmentOperator {
    /// `=`
    #[serde(rename = "=")]
    Assign,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    /// `===`
    #[serde(rename = "===")]
    StrictEqual,
    /// `==`
    #[serde(rename = "==")]
    LooseEqual,
    /// `<`
    #[serde(rename = "<")]
    LessThan,
    /// `+`
    #[serde(rename = "+")]
    Add,
    /// `-`
    #[serde(rename = "-")]
    Sub,
    /// `*`
    #[serde(rename = "*")]
    Mul,
    /// `/`
    #[serde(rename = "/")]
    Div,
    /// `%`
    #[serde(rename = "%")]
    Mod,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
    /// `~`
    #[serde(rename = "~")]
    BitwiseNot,
}

/// Update operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateOperator {
    /// `++`
    #[serde(rename = "++")]
    Increment,
}

impl Node {
    /// `name`
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier { name: name.into() }
    }

    /// A possibly dotted name as a left-nested chain of member accesses
    ///
    /// `a.b.c` becomes `(a.b).c`. Empty segments, as in `a..b` or `a.`, are
    /// skipped.
    #[must_use]
    pub fn path(name: &str) -> Self {
        let mut segments = name.split('.').filter(|segment| !segment.is_empty());
        let root = Self::identifier(segments.next().unwrap_or(name));
        segments.fold(root, |object, segment| {
            Self::member(object, Self::identifier(segment))
        })
    }

    /// `object.property`
    #[must_use]
    pub fn member(object: Self, property: Self) -> Self {
        Self::MemberExpression {
            object: Box::new(object),
            property: Box::new(property),
            computed: false,
        }
    }

    /// `object[property]`
    #[must_use]
    pub fn computed_member(object: Self, property: Self) -> Self {
        Self::MemberExpression {
            object: Box::new(object),
            property: Box::new(property),
            computed: true,
        }
    }

    /// `callee(arguments...)`
    #[must_use]
    pub fn call(callee: Self, arguments: Vec<Self>) -> Self {
        Self::CallExpression {
            callee: Box::new(callee),
            arguments,
        }
    }

    /// `var name = init`
    #[must_use]
    pub fn var(name: impl Into<String>, init: Self) -> Self {
        Self::VariableDeclaration {
            declarations: vec![VariableDeclarator {
                id: Self::identifier(name),
                init,
            }],
            kind: DeclarationKind::Var,
        }
    }

    /// `left = right`
    #[must_use]
    pub fn assign(left: Self, right: Self) -> Self {
        Self::AssignmentExpression {
            operator: AssignmentOperator::Assign,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `left operator right`
    #[must_use]
    pub fn binary(operator: BinaryOperator, left: Self, right: Self) -> Self {
        Self::BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `{ body }`
    #[must_use]
    pub fn block(body: Vec<Self>) -> Self {
        Self::BlockStatement { body }
    }

    /// `expression;`
    #[must_use]
    pub fn statement(expression: Self) -> Self {
        Self::ExpressionStatement {
            expression: Box::new(expression),
        }
    }

    /// Numeric literal with its source spelling
    #[must_use]
    pub fn number(value: f64, raw: impl Into<String>) -> Self {
        Self::Literal {
            value: LiteralValue::Number(value),
            raw: raw.into(),
        }
    }

    /// String literal, spelled with single quotes
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        let value = value.into();
        Self::Literal {
            raw: format!("'{value}'"),
            value: LiteralValue::String(value),
        }
    }

    /// Whether the node is an expression rather than a statement or declaration
    #[must_use]
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            Self::Identifier { .. }
                | Self::MemberExpression { .. }
                | Self::CallExpression { .. }
                | Self::ArrayExpression { .. }
                | Self::ObjectExpression { .. }
                | Self::AssignmentExpression { .. }
                | Self::BinaryExpression { .. }
                | Self::UnaryExpression { .. }
                | Self::UpdateExpression { .. }
                | Self::Literal { .. }
        )
    }

    /// Visits this node and all of its descendants, parents first
    pub fn walk<'tree>(&'tree self, visit: &mut impl FnMut(&'tree Self)) {
        visit(self);
        match self {
            Self::Identifier { .. } | Self::Literal { .. } => {}
            Self::MemberExpression {
                object, property, ..
            } => {
                object.walk(visit);
                property.walk(visit);
            }
            Self::CallExpression { callee, arguments } => {
                callee.walk(visit);
                walk_all(arguments, visit);
            }
            Self::VariableDeclaration { declarations, .. } => {
                for declarator in declarations {
                    declarator.id.walk(visit);
                    declarator.init.walk(visit);
                }
            }
            Self::FunctionDeclaration {
                id,
                params,
                defaults,
                body,
            } => {
                id.walk(visit);
                walk_all(params, visit);
                walk_all(defaults, visit);
                body.walk(visit);
            }
            Self::BlockStatement { body } => walk_all(body, visit),
            Self::ReturnStatement { argument } => {
                if let Some(argument) = argument {
                    argument.walk(visit);
                }
            }
            Self::ArrayExpression { elements } => walk_all(elements, visit),
            Self::ObjectExpression { properties } => walk_all(properties, visit),
            Self::AssignmentExpression { left, right, .. }
            | Self::BinaryExpression { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            Self::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                test.walk(visit);
                consequent.walk(visit);
                if let Some(alternate) = alternate {
                    alternate.walk(visit);
                }
            }
            Self::UnaryExpression { argument, .. } | Self::UpdateExpression { argument, .. } => {
                argument.walk(visit);
            }
            Self::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                init.walk(visit);
                test.walk(visit);
                update.walk(visit);
                body.walk(visit);
            }
            Self::ExpressionStatement { expression } => expression.walk(visit),
        }
    }
}

fn walk_all<'tree>(nodes: &'tree [Node], visit: &mut impl FnMut(&'tree Node)) {
    for node in nodes {
        node.walk(visit);
    }
}
