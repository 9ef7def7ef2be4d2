//! Lijs AST → ESTree lowering

use crate::{
    LowerOptions, LowerWarning,
    names::{NameRegistry, loop_index},
};
use lj_estree::{self as estree, BinaryOperator, UnaryOperator, UpdateOperator};
use lj_syntax::{ArithmeticOp, Check, CheckKind, Node, NodeKind, Program, root_segment};
use std::mem;

/// Statement kinds whose value a function body never implicitly returns
pub const IMPLICIT_RETURN_EXCLUSIONS: &[NodeKind] = &[
    NodeKind::IfStatement,
    NodeKind::ReturnStatement,
    NodeKind::Iterator,
    NodeKind::FunctionDef,
];

/// Output of lowering one program
#[derive(Debug, Clone, PartialEq)]
pub struct Lowered {
    /// The ESTree program
    pub program: estree::Program,
    /// Declared and synthesized names, in order of introduction
    pub names: Vec<String>,
    /// Non-fatal findings
    pub warnings: Vec<LowerWarning>,
}

/// Lowers a program with default options
#[must_use]
pub fn lower(program: &Program) -> Lowered {
    lower_with(program, &LowerOptions::default())
}

/// Lowers a program with explicit options
#[must_use]
pub fn lower_with(program: &Program, options: &LowerOptions) -> Lowered {
    LoweringContext::new(options).lower_program(program)
}

/// Context for lowering a Lijs AST to ESTree
pub struct LoweringContext<'opts> {
    /// Target environment options
    options: &'opts LowerOptions,
    /// Reserved and introduced names
    names: NameRegistry,
    /// Declarations to emit before the statement being lowered
    hoisted: Vec<estree::Node>,
    /// Number of enclosing loops
    loop_depth: usize,
    /// Findings so far
    warnings: Vec<LowerWarning>,
}

impl<'opts> LoweringContext<'opts> {
    /// Create a new lowering context
    #[must_use]
    pub fn new(options: &'opts LowerOptions) -> Self {
        Self {
            options,
            names: NameRegistry::new(&options.temporaries),
            hoisted: Vec::new(),
            loop_depth: 0,
            warnings: Vec::new(),
        }
    }

    /// Lowers a whole program, consuming the context
    #[must_use]
    pub fn lower_program(mut self, program: &Program) -> Lowered {
        self.reserve_names(program);
        let body = self.lower_statements(&program.body);

        Lowered {
            program: estree::Program::new(body),
            names: self.names.into_names(),
            warnings: self.warnings,
        }
    }

    fn reserve_names(&mut self, program: &Program) {
        let names = &mut self.names;
        program.walk(&mut |node| {
            for name in node.names() {
                names.reserve(name);
            }
        });

        names.reserve("item");
        names.reserve(root_segment(&self.options.require_callee));
        names.reserve(root_segment(&self.options.exports_target));
    }

    /// Lowers a statement list, placing hoisted declarations before their statement
    fn lower_statements(&mut self, nodes: &[Node]) -> Vec<estree::Node> {
        let outer = mem::take(&mut self.hoisted);
        let mut body = Vec::with_capacity(nodes.len());

        for node in nodes {
            let statement = self.lower_statement(node);
            body.append(&mut self.hoisted);
            body.push(statement);
        }

        self.hoisted = outer;
        body
    }

    fn lower_statement(&mut self, node: &Node) -> estree::Node {
        match node {
            Node::Identifier { .. }
            | Node::IntegerLiteral { .. }
            | Node::FloatLiteral { .. }
            | Node::StringLiteral { .. } => self.lower_expression(node),
            Node::ArrayLiteral { .. }
            | Node::ObjectGet { .. }
            | Node::ObjectSet { .. }
            | Node::Import { binding: None, .. }
            | Node::Export { .. }
            | Node::FunctionCall { .. }
            | Node::Arithmetic { .. } => estree::Node::statement(self.lower_expression(node)),
            Node::Assignment { name, value } => {
                let init = self.lower_expression(value);
                self.bind(name, init)
            }
            Node::ObjectCreate { name } => self.bind(
                name,
                estree::Node::ObjectExpression {
                    properties: Vec::new(),
                },
            ),
            Node::Import {
                path,
                binding: Some(binding),
            } => {
                let init = self.require(path);
                self.bind(binding, init)
            }
            Node::FunctionDef { name, params, body } => self.lower_function(name, params, body),
            Node::Iterator { source, body } => self.lower_iterator(source, body),
            Node::IfStatement { check, pass, fail } => self.lower_if(check, pass, fail.as_deref()),
            Node::ReturnStatement { value } => estree::Node::ReturnStatement {
                argument: value
                    .as_deref()
                    .map(|value| Box::new(self.lower_expression(value))),
            },
        }
    }

    fn lower_expression(&mut self, node: &Node) -> estree::Node {
        match node {
            Node::Identifier { name } => estree::Node::path(name),
            Node::IntegerLiteral { value } | Node::FloatLiteral { value } => {
                estree::Node::number(numeric_value(value), value.as_str())
            }
            Node::StringLiteral { value } => estree::Node::string(value.as_str()),
            Node::ArrayLiteral { elements } => estree::Node::ArrayExpression {
                elements: self.lower_expressions(elements),
            },
            Node::ObjectGet { name, key } => {
                estree::Node::computed_member(estree::Node::path(name), self.lower_expression(key))
            }
            Node::ObjectSet { name, key, value } => {
                let key = self.lower_expression(key);
                let place = estree::Node::computed_member(estree::Node::path(name), key);
                estree::Node::assign(place, self.lower_expression(value))
            }
            Node::Import {
                path,
                binding: None,
            } => self.require(path),
            Node::Export { name } => {
                let property = name.rsplit('.').next().unwrap_or(name);
                let target = estree::Node::member(
                    estree::Node::path(&self.options.exports_target),
                    estree::Node::identifier(property),
                );
                estree::Node::assign(target, estree::Node::path(name))
            }
            Node::FunctionCall { name, args } => {
                estree::Node::call(estree::Node::path(name), self.lower_expressions(args))
            }
            Node::Arithmetic { op, left, right } => estree::Node::binary(
                binary_operator(*op),
                self.lower_expression(left),
                self.lower_expression(right),
            ),
            Node::Assignment { .. }
            | Node::ObjectCreate { .. }
            | Node::Import { binding: Some(_), .. }
            | Node::FunctionDef { .. }
            | Node::Iterator { .. }
            | Node::IfStatement { .. }
            | Node::ReturnStatement { .. } => {
                self.warnings.push(LowerWarning::StatementInExpression { kind: node.kind() });
                self.lower_statement(node)
            }
        }
    }

    fn lower_expressions(&mut self, nodes: &[Node]) -> Vec<estree::Node> {
        nodes.iter().map(|node| self.lower_expression(node)).collect()
    }

    /// `var name = init`, or an assignment when `name` is dotted
    fn bind(&mut self, name: &str, init: estree::Node) -> estree::Node {
        if name.contains('.') {
            return estree::Node::statement(estree::Node::assign(estree::Node::path(name), init));
        }
        self.names.introduce(name);
        estree::Node::var(name, init)
    }

    fn require(&self, path: &str) -> estree::Node {
        estree::Node::call(
            estree::Node::path(&self.options.require_callee),
            vec![estree::Node::string(path)],
        )
    }

    fn lower_function(&mut self, name: &str, params: &[String], body: &[Node]) -> estree::Node {
        if !name.contains('.') {
            self.names.introduce(name);
        }
        for param in params {
            self.names.introduce(param.as_str());
        }

        let mut statements = self.lower_statements(body);
        let returns_last = body
            .last()
            .is_some_and(|last| !IMPLICIT_RETURN_EXCLUSIONS.contains(&last.kind()));
        if returns_last && let Some(last) = statements.pop() {
            statements.push(implicit_return(last));
        }

        estree::Node::FunctionDeclaration {
            id: Box::new(estree::Node::identifier(name)),
            params: params.iter().map(estree::Node::identifier).collect(),
            defaults: Vec::new(),
            body: Box::new(estree::Node::block(statements)),
        }
    }

    fn lower_iterator(&mut self, source: &Node, body: &[Node]) -> estree::Node {
        let mut source = self.lower_expression(source);
        if matches!(source, estree::Node::ArrayExpression { .. }) {
            let temporary = self.names.fresh();
            self.hoisted.push(estree::Node::var(temporary.as_str(), source));
            source = estree::Node::identifier(temporary);
        }

        let index = loop_index(self.loop_depth);
        self.loop_depth += 1;
        let mut statements = vec![estree::Node::var(
            "item",
            estree::Node::computed_member(source.clone(), estree::Node::identifier(index.as_str())),
        )];
        statements.extend(self.lower_statements(body));
        self.loop_depth -= 1;

        estree::Node::ForStatement {
            init: Box::new(estree::Node::var(index.as_str(), estree::Node::number(0.0, "0"))),
            test: Box::new(estree::Node::binary(
                BinaryOperator::LessThan,
                estree::Node::identifier(index.as_str()),
                estree::Node::member(source, estree::Node::identifier("length")),
            )),
            update: Box::new(estree::Node::UpdateExpression {
                operator: UpdateOperator::Increment,
                prefix: false,
                argument: Box::new(estree::Node::identifier(index)),
            }),
            body: Box::new(estree::Node::block(statements)),
        }
    }

    fn lower_if(&mut self, check: &Check, pass: &[Node], fail: Option<&[Node]>) -> estree::Node {
        let left = self.lower_expression(&check.left);
        let right = check
            .right
            .as_deref()
            .map(|right| self.lower_expression(right));

        // A missing right operand can only come from a hand-built tree
        let test = match (check.kind, right) {
            (CheckKind::Exists, _) | (_, None) => left,
            (CheckKind::Equality, Some(right)) => {
                estree::Node::binary(BinaryOperator::StrictEqual, left, right)
            }
            (CheckKind::Approx, Some(right)) => {
                estree::Node::binary(BinaryOperator::LooseEqual, left, right)
            }
            (CheckKind::Contains, Some(right)) => estree::Node::UnaryExpression {
                operator: UnaryOperator::BitwiseNot,
                prefix: true,
                argument: Box::new(estree::Node::call(
                    estree::Node::member(left, estree::Node::identifier("indexOf")),
                    vec![right],
                )),
            },
        };

        estree::Node::IfStatement {
            test: Box::new(test),
            consequent: Box::new(estree::Node::block(self.lower_statements(pass))),
            alternate: fail.map(|fail| Box::new(estree::Node::block(self.lower_statements(fail)))),
        }
    }
}

/// Value of a number literal, read like `parseFloat`
///
/// Only the prefix before a second `.` counts, so `1.2.3` is `1.2`.
fn numeric_value(text: &str) -> f64 {
    let end = text
        .match_indices('.')
        .nth(1)
        .map_or(text.len(), |(offset, _)| offset);
    text[..end].parse().unwrap_or_default()
}

/// Rewrites the last statement of a function body into a return of its value
fn implicit_return(statement: estree::Node) -> estree::Node {
    match statement {
        estree::Node::ExpressionStatement { expression } => estree::Node::ReturnStatement {
            argument: Some(expression),
        },
        expression if expression.is_expression() => estree::Node::ReturnStatement {
            argument: Some(Box::new(expression)),
        },
        declaration => declaration,
    }
}

fn binary_operator(op: ArithmeticOp) -> BinaryOperator {
    match op {
        ArithmeticOp::Add => BinaryOperator::Add,
        ArithmeticOp::Sub => BinaryOperator::Sub,
        ArithmeticOp::Mul => BinaryOperator::Mul,
        ArithmeticOp::Div => BinaryOperator::Div,
        ArithmeticOp::Mod => BinaryOperator::Mod,
    }
}
