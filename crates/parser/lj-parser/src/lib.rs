//! Parser for Lijs
//!
//! A single-pass recursive descent over the token list produced by `lj-lexer`.
//! The cursor lives in a [`Parser`] value, so separate parses share nothing.

pub mod error;

pub use error::ParseError;

use lj_span::Span;
use lj_syntax::{ArithmeticOp, Check, CheckKind, Node, Program, Token, TokenKind};
use miette::SourceSpan;

/// Parses a token list into a program
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered.
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}

/// What a single production step yielded
enum Item {
    /// A complete node
    Node(Node),
    /// A bare check keyword, only meaningful to the if-statement production
    Check(CheckKind),
    /// Line break or comment
    Trivia,
}

/// Recursive descent parser over a token slice
pub struct Parser<'tokens> {
    tokens: &'tokens [Token],
    position: usize,
}

impl<'tokens> Parser<'tokens> {
    /// Creates a parser positioned at the first token
    #[must_use]
    pub fn new(tokens: &'tokens [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses every remaining token into a program
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered.
    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();
        while self.peek().is_some() {
            if let Some(node) = self.parse_node()? {
                body.push(node);
            }
        }
        Ok(Program::new(body))
    }

    fn peek(&self) -> Option<&'tokens Token> {
        self.tokens.get(self.position)
    }

    fn next_is(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == *kind)
    }

    fn advance(&mut self, expected: &'static str) -> Result<&'tokens Token, ParseError> {
        let token = self.peek().ok_or_else(|| self.unexpected_end(expected))?;
        self.position += 1;
        Ok(token)
    }

    fn end_span(&self) -> SourceSpan {
        let end = self.tokens.last().map_or(0, |token| token.span.end as usize);
        Span::at(end, 0).into()
    }

    fn unexpected_end(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedEnd {
            expected,
            span: self.end_span(),
        }
    }

    /// Span of the next token, or the end of input
    fn next_span(&self) -> SourceSpan {
        self.peek()
            .map_or_else(|| self.end_span(), |token| token.span.into())
    }

    /// Span from `start` to the end of the last consumed token
    fn span_from(&self, start: Span) -> SourceSpan {
        let end = self
            .position
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map_or(start, |token| token.span);
        start.to(end).into()
    }

    fn parse_node(&mut self) -> Result<Option<Node>, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected_end("a value"));
        };

        match self.parse_item()? {
            Item::Node(node) => Ok(Some(node)),
            Item::Trivia => Ok(None),
            Item::Check(_) => Err(unexpected(token)),
        }
    }

    /// Parses a node in a position that requires one
    fn parse_value(&mut self, construct: &'static str) -> Result<Node, ParseError> {
        let span = self.next_span();
        self.parse_node()?
            .ok_or(ParseError::MissingValue { construct, span })
    }

    fn parse_item(&mut self) -> Result<Item, ParseError> {
        let token = self.advance("a value")?;
        if let Some(check) = token.kind.check_kind() {
            return Ok(Item::Check(check));
        }

        let node = match &token.kind {
            TokenKind::Identifier(name) => Node::Identifier { name: name.clone() },
            TokenKind::Integer(value) => Node::IntegerLiteral {
                value: value.clone(),
            },
            TokenKind::Float(value) => Node::FloatLiteral {
                value: value.clone(),
            },
            TokenKind::String(value) => Node::StringLiteral {
                value: value.clone(),
            },
            TokenKind::LineBreak
            | TokenKind::SingleLineComment(_)
            | TokenKind::MultiLineComment(_) => return Ok(Item::Trivia),
            TokenKind::ReturnStatement => self.parse_return()?,
            TokenKind::Import => self.parse_import()?,
            TokenKind::Export => self.parse_export()?,
            TokenKind::IfStatement => self.parse_if()?,
            TokenKind::ArrayStart => Node::ArrayLiteral {
                elements: self.parse_until(&TokenKind::ArrayEnd, "`]`")?,
            },
            TokenKind::Assignment => self.parse_assignment()?,
            TokenKind::Make => Node::ObjectCreate {
                name: self.parse_name("object")?,
            },
            TokenKind::Get => self.parse_get()?,
            TokenKind::Set => self.parse_set()?,
            TokenKind::OpenParen => self.parse_call(token.span)?,
            TokenKind::Definition => self.parse_function()?,
            TokenKind::Iterator => self.parse_iterator()?,
            TokenKind::ArrayEnd
            | TokenKind::BlockStart
            | TokenKind::BlockEnd
            | TokenKind::CloseParen
            | TokenKind::ImportAs
            | TokenKind::Else
            // Checks are returned above
            | TokenKind::EqualityCheck
            | TokenKind::ApproxCheck
            | TokenKind::ContainsCheck
            | TokenKind::ExistsCheck => return Err(unexpected(token)),
        };

        Ok(Item::Node(node))
    }

    /// Parses nodes until `closer`, consuming it
    fn parse_until(
        &mut self,
        closer: &TokenKind,
        expected: &'static str,
    ) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        loop {
            if self.peek().is_none() {
                return Err(self.unexpected_end(expected));
            }
            if self.next_is(closer) {
                self.position += 1;
                return Ok(nodes);
            }
            if let Some(node) = self.parse_node()? {
                nodes.push(node);
            }
        }
    }

    /// Either a `{ ... }` block or exactly one node
    fn parse_body(&mut self) -> Result<Vec<Node>, ParseError> {
        if self.peek().is_none() {
            return Err(self.unexpected_end("a body"));
        }
        if self.next_is(&TokenKind::BlockStart) {
            self.position += 1;
            return self.parse_until(&TokenKind::BlockEnd, "`}`");
        }
        Ok(self.parse_node()?.into_iter().collect())
    }

    /// Consumes an identifier token, mapping anything else through `error`
    fn expect_identifier(
        &mut self,
        expected: &'static str,
        error: impl FnOnce(String, SourceSpan) -> ParseError,
    ) -> Result<String, ParseError> {
        let token = self.advance(expected)?;
        match &token.kind {
            TokenKind::Identifier(name) => Ok(name.clone()),
            other => Err(error(other.to_string(), token.span.into())),
        }
    }

    fn parse_name(&mut self, construct: &'static str) -> Result<String, ParseError> {
        self.expect_identifier("a name", |found, span| {
            ParseError::NameMustBeIdentifier {
                construct,
                found,
                span,
            }
        })
    }

    fn parse_return(&mut self) -> Result<Node, ParseError> {
        let value = match self.peek() {
            None => None,
            Some(token) if token.kind == TokenKind::LineBreak => None,
            Some(_) => self.parse_node()?.map(Box::new),
        };
        Ok(Node::ReturnStatement { value })
    }

    fn parse_import(&mut self) -> Result<Node, ParseError> {
        let token = self.advance("a module path")?;
        let TokenKind::String(path) = &token.kind else {
            return Err(ParseError::ImportPathNotString {
                found: token.kind.to_string(),
                span: token.span.into(),
            });
        };

        let binding = if self.next_is(&TokenKind::ImportAs) {
            self.position += 1;
            Some(self.expect_identifier("an import binding", |found, span| {
                ParseError::ImportBindingNotIdentifier { found, span }
            })?)
        } else {
            None
        };

        Ok(Node::Import {
            path: path.clone(),
            binding,
        })
    }

    fn parse_export(&mut self) -> Result<Node, ParseError> {
        let name = self.expect_identifier("an exported name", |found, span| {
            ParseError::ExportNotIdentifier { found, span }
        })?;
        Ok(Node::Export { name })
    }

    fn parse_if(&mut self) -> Result<Node, ParseError> {
        let left = self.parse_value("if condition")?;

        let Some(token) = self.peek() else {
            return Err(self.unexpected_end("a check"));
        };
        let Item::Check(kind) = self.parse_item()? else {
            return Err(ParseError::MissingCheck {
                found: token.kind.to_string(),
                span: token.span.into(),
            });
        };

        let right = if kind.takes_right() {
            Some(Box::new(self.parse_value("if condition")?))
        } else {
            None
        };

        let pass = self.parse_body()?;
        let fail = if self.next_is(&TokenKind::Else) {
            self.position += 1;
            Some(self.parse_body()?)
        } else {
            None
        };

        Ok(Node::IfStatement {
            check: Check {
                kind,
                left: Box::new(left),
                right,
            },
            pass,
            fail,
        })
    }

    fn parse_assignment(&mut self) -> Result<Node, ParseError> {
        let name = self.parse_name("variable")?;

        let start = self.peek().map(|token| token.span);
        let value = self.parse_value("assignment")?;
        if let (Node::Assignment { .. }, Some(start)) = (&value, start) {
            return Err(ParseError::AssignmentValue {
                span: self.span_from(start),
            });
        }

        Ok(Node::Assignment {
            name,
            value: Box::new(value),
        })
    }

    fn parse_key(&mut self) -> Result<Node, ParseError> {
        let token = self.advance("an object key")?;
        match &token.kind {
            TokenKind::Identifier(name) => Ok(Node::Identifier { name: name.clone() }),
            TokenKind::String(value) => Ok(Node::StringLiteral {
                value: value.clone(),
            }),
            other => Err(ParseError::InvalidObjectKey {
                found: other.to_string(),
                span: token.span.into(),
            }),
        }
    }

    fn parse_get(&mut self) -> Result<Node, ParseError> {
        let name = self.parse_name("object")?;
        let key = self.parse_key()?;
        Ok(Node::ObjectGet {
            name,
            key: Box::new(key),
        })
    }

    fn parse_set(&mut self) -> Result<Node, ParseError> {
        let name = self.parse_name("object")?;
        let key = self.parse_key()?;
        let value = self.parse_value("object set")?;
        Ok(Node::ObjectSet {
            name,
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    fn parse_call(&mut self, open: Span) -> Result<Node, ParseError> {
        let name = self.parse_name("function call")?;
        let args = self.parse_until(&TokenKind::CloseParen, "`)`")?;

        match ArithmeticOp::from_name(&name) {
            Some(op) if args.len() > 2 => Err(ParseError::TooManyOperands {
                operator: op.name(),
                count: args.len(),
                span: self.span_from(open),
            }),
            // Fewer than two operands stays an ordinary call
            Some(op) => match <[Node; 2]>::try_from(args) {
                Ok([left, right]) => Ok(Node::Arithmetic {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                }),
                Err(args) => Ok(Node::FunctionCall { name, args }),
            },
            None => Ok(Node::FunctionCall { name, args }),
        }
    }

    fn parse_function(&mut self) -> Result<Node, ParseError> {
        let name = self.parse_name("function")?;

        let open = self.advance("`[`")?;
        if open.kind != TokenKind::ArrayStart {
            return Err(ParseError::ExpectedToken {
                expected: "[",
                found: open.kind.to_string(),
                span: open.span.into(),
            });
        }

        let mut params = Vec::new();
        loop {
            let token = self.advance("`]`")?;
            match &token.kind {
                TokenKind::ArrayEnd => break,
                TokenKind::Identifier(param) => params.push(param.clone()),
                trivia if trivia.is_trivia() => {}
                other => {
                    return Err(ParseError::ParameterNotIdentifier {
                        found: other.to_string(),
                        span: token.span.into(),
                    });
                }
            }
        }

        let body = self.parse_body()?;
        Ok(Node::FunctionDef { name, params, body })
    }

    fn parse_iterator(&mut self) -> Result<Node, ParseError> {
        let source = self.parse_value("iterator")?;
        let body = self.parse_body()?;
        Ok(Node::Iterator {
            source: Box::new(source),
            body,
        })
    }
}

fn unexpected(token: &Token) -> ParseError {
    ParseError::UnexpectedToken {
        kind: token.kind.to_string(),
        span: token.span.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lj_lexer::tokenize;

    fn parse_source(source: &str) -> Result<Program, ParseError> {
        let tokens = tokenize(source).unwrap();
        parse(&tokens)
    }

    fn body(source: &str) -> Vec<Node> {
        parse_source(source).unwrap().body
    }

    fn int(value: &str) -> Node {
        Node::IntegerLiteral {
            value: value.to_string(),
        }
    }

    #[test]
    fn test_function_call() {
        assert_eq!(
            body("(echo hello)"),
            vec![Node::FunctionCall {
                name: "echo".to_string(),
                args: vec![Node::identifier("hello")],
            }]
        );
    }

    #[test]
    fn test_nested_assignment_rejected() {
        let error = parse_source("$ a $ b 1").unwrap_err();
        assert_eq!(error.to_string(), "value cannot be assignment");
        assert_eq!(error.span(), Span::new(4, 9));
    }

    #[test]
    fn test_function_definition() {
        assert_eq!(
            body("def addone [ number ] (add number 1)"),
            vec![Node::FunctionDef {
                name: "addone".to_string(),
                params: vec!["number".to_string()],
                body: vec![Node::Arithmetic {
                    op: ArithmeticOp::Add,
                    left: Box::new(Node::identifier("number")),
                    right: Box::new(int("1")),
                }],
            }]
        );
    }

    #[test]
    fn test_function_requires_parameter_list() {
        let error = parse_source("def f x").unwrap_err();
        assert!(matches!(error, ParseError::ExpectedToken { expected: "[", .. }));
    }

    #[test]
    fn test_parameters_must_be_identifiers() {
        let error = parse_source("def f [ 1 ] x").unwrap_err();
        assert_eq!(
            error.to_string(),
            "function parameter must be an identifier, found number `1`"
        );
    }

    #[test]
    fn test_too_many_operands() {
        let error = parse_source("(add 1 2 3)").unwrap_err();
        assert_eq!(error.to_string(), "add only supports 2 arguments, found 3");
        assert_eq!(error.span(), Span::new(0, 11));
    }

    #[test]
    fn test_single_operand_stays_call() {
        assert_eq!(
            body("(sub 1)"),
            vec![Node::FunctionCall {
                name: "sub".to_string(),
                args: vec![int("1")],
            }]
        );
    }

    #[test]
    fn test_if_with_else() {
        let nodes = body("? a is 1 { (yes) } else (no)");
        let [Node::IfStatement { check, pass, fail }] = nodes.as_slice() else {
            panic!("expected a single if statement, got {nodes:?}");
        };
        assert_eq!(check.kind, CheckKind::Equality);
        assert_eq!(check.right.as_deref(), Some(&int("1")));
        assert_eq!(pass.len(), 1);
        assert_eq!(fail.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_exists_takes_no_right_operand() {
        let nodes = body("? a exists ! a");
        let [Node::IfStatement { check, pass, fail }] = nodes.as_slice() else {
            panic!("expected a single if statement, got {nodes:?}");
        };
        assert_eq!(check.kind, CheckKind::Exists);
        assert_eq!(check.right, None);
        assert_eq!(
            pass,
            &vec![Node::ReturnStatement {
                value: Some(Box::new(Node::identifier("a"))),
            }]
        );
        assert_eq!(fail, &None);
    }

    #[test]
    fn test_every_check_keyword() {
        let cases = [
            ("? a is b (f)", CheckKind::Equality),
            ("? a kinda b (f)", CheckKind::Approx),
            ("? a contains b (f)", CheckKind::Contains),
            ("? a exists (f)", CheckKind::Exists),
        ];
        for (source, expected) in cases {
            let nodes = body(source);
            let [Node::IfStatement { check, .. }] = nodes.as_slice() else {
                panic!("expected a single if statement for {source:?}");
            };
            assert_eq!(check.kind, expected, "{source}");
        }
    }

    #[test]
    fn test_if_requires_check() {
        let error = parse_source("? a b (c)").unwrap_err();
        assert!(matches!(error, ParseError::MissingCheck { .. }));
    }

    #[test]
    fn test_check_outside_if() {
        let error = parse_source("(f is 1)").unwrap_err();
        assert_eq!(error.to_string(), "unexpected token is");
    }

    #[test]
    fn test_return_without_value() {
        assert_eq!(
            body("!\n"),
            vec![Node::ReturnStatement { value: None }]
        );
        assert_eq!(body("!"), vec![Node::ReturnStatement { value: None }]);
    }

    #[test]
    fn test_import() {
        assert_eq!(
            body("use 'fs' as fs\nuse 'dotenv'"),
            vec![
                Node::Import {
                    path: "fs".to_string(),
                    binding: Some("fs".to_string()),
                },
                Node::Import {
                    path: "dotenv".to_string(),
                    binding: None,
                },
            ]
        );
    }

    #[test]
    fn test_import_path_must_be_string() {
        let error = parse_source("use fs").unwrap_err();
        assert!(matches!(error, ParseError::ImportPathNotString { .. }));
    }

    #[test]
    fn test_export_must_be_identifier() {
        let error = parse_source("export 'lol'").unwrap_err();
        assert!(matches!(error, ParseError::ExportNotIdentifier { .. }));
    }

    #[test]
    fn test_object_access() {
        assert_eq!(
            body("make obj\nset obj 'key' 1\nget obj key"),
            vec![
                Node::ObjectCreate {
                    name: "obj".to_string(),
                },
                Node::ObjectSet {
                    name: "obj".to_string(),
                    key: Box::new(Node::StringLiteral {
                        value: "key".to_string(),
                    }),
                    value: Box::new(int("1")),
                },
                Node::ObjectGet {
                    name: "obj".to_string(),
                    key: Box::new(Node::identifier("key")),
                },
            ]
        );
    }

    #[test]
    fn test_invalid_object_key() {
        let error = parse_source("get obj 1").unwrap_err();
        assert!(matches!(error, ParseError::InvalidObjectKey { .. }));
    }

    #[test]
    fn test_iterator_with_block() {
        assert_eq!(
            body("@ [ 1 2 ] {\n(console.log item)\n}"),
            vec![Node::Iterator {
                source: Box::new(Node::ArrayLiteral {
                    elements: vec![int("1"), int("2")],
                }),
                body: vec![Node::FunctionCall {
                    name: "console.log".to_string(),
                    args: vec![Node::identifier("item")],
                }],
            }]
        );
    }

    #[test]
    fn test_comments_and_line_breaks_produce_nothing() {
        assert!(body("// hi\n/* there */\n\n").is_empty());
    }

    #[test]
    fn test_unexpected_end() {
        let error = parse_source("$ a").unwrap_err();
        assert!(matches!(error, ParseError::UnexpectedEnd { .. }));
        let error = parse_source("[ 1 2").unwrap_err();
        assert_eq!(error.to_string(), "unexpected end of input, expected `]`");
    }

    #[test]
    fn test_missing_value() {
        let error = parse_source("$ a\n1").unwrap_err();
        assert_eq!(error.to_string(), "assignment is missing a value");
    }

    #[test]
    fn test_stray_closer() {
        let error = parse_source("]").unwrap_err();
        assert_eq!(error.to_string(), "unexpected token ]");
    }

    #[test]
    fn test_variable_name_must_be_identifier() {
        let error = parse_source("$ 1 2").unwrap_err();
        assert_eq!(
            error.to_string(),
            "variable name must be an identifier, found number `1`"
        );
    }
}
