//! Lexer for Lijs source text
//!
//! Scans the input once with a forward cursor and produces a flat token list.
//! Keywords only match when followed by a space, which is consumed with them,
//! so `use123` or a trailing `is` lex as identifiers.

mod error;

pub use error::LexError;

use lj_span::Span;
use lj_syntax::{Token, TokenKind};

/// Keyword spellings, including the mandatory trailing space
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("use ", TokenKind::Import),
    ("as ", TokenKind::ImportAs),
    ("export ", TokenKind::Export),
    ("make ", TokenKind::Make),
    ("set ", TokenKind::Set),
    ("get ", TokenKind::Get),
    ("is ", TokenKind::EqualityCheck),
    ("kinda ", TokenKind::ApproxCheck),
    ("contains ", TokenKind::ContainsCheck),
    ("exists ", TokenKind::ExistsCheck),
    ("def ", TokenKind::Definition),
    ("else ", TokenKind::Else),
];

/// Tokenizes a whole source file
///
/// # Errors
///
/// Returns the first [`LexError`] encountered; no partial token list is
/// produced.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).run()
}

/// Scanner state for one input
struct Lexer<'src> {
    input: &'src str,
    position: usize,
    tokens: Vec<Token>,
}

impl<'src> Lexer<'src> {
    fn new(input: &'src str) -> Self {
        Self {
            input,
            position: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(character) = self.peek() {
            let start = self.position;
            match character {
                ' ' => self.position += 1,
                '\n' => self.single(TokenKind::LineBreak),
                '$' => self.single(TokenKind::Assignment),
                '@' => self.single(TokenKind::Iterator),
                '?' => self.single(TokenKind::IfStatement),
                '!' => self.single(TokenKind::ReturnStatement),
                '[' => self.single(TokenKind::ArrayStart),
                ']' => self.single(TokenKind::ArrayEnd),
                '{' => self.single(TokenKind::BlockStart),
                '}' => self.single(TokenKind::BlockEnd),
                '(' => self.single(TokenKind::OpenParen),
                ')' => self.single(TokenKind::CloseParen),
                '\'' => self.string(start)?,
                '/' if self.rest().starts_with("//") => self.line_comment(start),
                '/' if self.rest().starts_with("/*") => self.block_comment(start)?,
                letter if letter.is_ascii_alphabetic() => {
                    if !self.keyword(start) {
                        self.identifier(start);
                    }
                }
                digit if digit.is_ascii_digit() => self.number(start)?,
                other => return Err(LexError::unexpected(other, start)),
            }
        }

        Ok(self.tokens)
    }

    fn rest(&self) -> &'src str {
        &self.input[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let span = Span::at(start, self.position - start);
        self.tokens.push(Token::new(kind, span));
    }

    fn single(&mut self, kind: TokenKind) {
        let start = self.position;
        self.position += 1;
        self.push(kind, start);
    }

    /// Advances past the longest run of characters matching `accept`
    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'src str {
        let start = self.position;
        let len = self
            .rest()
            .find(|character: char| !accept(character))
            .unwrap_or(self.input.len() - start);
        self.position += len;
        &self.input[start..self.position]
    }

    fn keyword(&mut self, start: usize) -> bool {
        let rest = self.rest();
        let Some((spelling, kind)) = KEYWORDS
            .iter()
            .find(|(spelling, _)| rest.starts_with(spelling))
        else {
            return false;
        };

        self.position += spelling.len();
        self.push(kind.clone(), start);
        true
    }

    fn identifier(&mut self, start: usize) {
        let name =
            self.take_while(|character| character.is_ascii_alphanumeric() || character == '.');
        self.push(TokenKind::Identifier(name.to_string()), start);
    }

    fn number(&mut self, start: usize) -> Result<(), LexError> {
        let text = self.take_while(|character| character.is_ascii_digit() || character == '.');

        if text.ends_with('.') {
            return Err(LexError::unexpected('.', self.position - 1));
        }

        let kind = if text.contains('.') {
            TokenKind::Float(text.to_string())
        } else {
            TokenKind::Integer(text.to_string())
        };
        self.push(kind, start);
        Ok(())
    }

    fn string(&mut self, start: usize) -> Result<(), LexError> {
        let body = &self.input[start + 1..];
        let Some(len) = body.find('\'') else {
            return Err(LexError::unterminated_string(start, self.input.len()));
        };

        let value = &body[..len];
        self.position = start + 1 + len + 1;
        self.push(TokenKind::String(value.to_string()), start);
        Ok(())
    }

    fn line_comment(&mut self, start: usize) {
        self.position += 2;
        let text = self.take_while(|character| character != '\n');
        self.push(TokenKind::SingleLineComment(text.to_string()), start);
    }

    fn block_comment(&mut self, start: usize) -> Result<(), LexError> {
        let body = &self.input[start + 2..];
        let Some(len) = body.find("*/") else {
            return Err(LexError::unterminated_comment(start, self.input.len()));
        };

        let lines = body[..len].split('\n').map(str::to_string).collect();
        self.position = start + 2 + len + 2;
        self.push(TokenKind::MultiLineComment(lines), start);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .expect("input should lex")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_string())
    }

    fn int(value: &str) -> TokenKind {
        TokenKind::Integer(value.to_string())
    }

    #[test]
    fn test_whitespace_only() {
        assert!(kinds("").is_empty());
        assert!(kinds("     ").is_empty());
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(kinds("\n\n"), vec![TokenKind::LineBreak, TokenKind::LineBreak]);
    }

    #[test]
    fn test_identifiers_and_integers() {
        assert_eq!(
            kinds("hello 137 world 42"),
            vec![ident("hello"), int("137"), ident("world"), int("42")]
        );
    }

    #[test]
    fn test_dotted_identifier() {
        assert_eq!(kinds("console.log"), vec![ident("console.log")]);
    }

    #[test]
    fn test_keywords_need_trailing_space() {
        assert_eq!(kinds("use123"), vec![ident("use123")]);
        assert_eq!(kinds("is123"), vec![ident("is123")]);
        assert_eq!(kinds("def123"), vec![ident("def123")]);
        assert_eq!(kinds("is"), vec![ident("is")]);
        assert_eq!(kinds("def\n"), vec![ident("def"), TokenKind::LineBreak]);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("use 'fs' as fs"),
            vec![
                TokenKind::Import,
                TokenKind::String("fs".to_string()),
                TokenKind::ImportAs,
                ident("fs"),
            ]
        );
        assert_eq!(
            kinds("? a kinda b else c"),
            vec![
                TokenKind::IfStatement,
                ident("a"),
                TokenKind::ApproxCheck,
                ident("b"),
                TokenKind::Else,
                ident("c"),
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_in_identifier() {
        assert_eq!(kinds("issue"), vec![ident("issue")]);
        assert_eq!(kinds("getter x"), vec![ident("getter"), ident("x")]);
    }

    #[test]
    fn test_single_character_tokens() {
        assert_eq!(
            kinds("$@?![]{}()"),
            vec![
                TokenKind::Assignment,
                TokenKind::Iterator,
                TokenKind::IfStatement,
                TokenKind::ReturnStatement,
                TokenKind::ArrayStart,
                TokenKind::ArrayEnd,
                TokenKind::BlockStart,
                TokenKind::BlockEnd,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
            ]
        );
    }

    #[test]
    fn test_float() {
        assert_eq!(kinds("3.14"), vec![TokenKind::Float("3.14".to_string())]);
    }

    #[test]
    fn test_trailing_dot_is_invalid() {
        let error = tokenize("42.").expect_err("trailing dot should fail");
        assert_eq!(error.to_string(), "invalid character .");
        assert_eq!(error.position(), 2);
    }

    #[test]
    fn test_several_dots_make_one_float() {
        assert_eq!(kinds("1.2.3"), [TokenKind::Float("1.2.3".to_string())]);
        let error = tokenize("1.2.").expect_err("trailing dot should fail");
        assert_eq!(error.position(), 3);
    }

    #[test]
    fn test_leading_dot_is_invalid() {
        let error = tokenize(".5").expect_err("leading dot should fail");
        assert_eq!(error.position(), 0);
    }

    #[test]
    fn test_string() {
        assert_eq!(
            kinds("'hello world'"),
            vec![TokenKind::String("hello world".to_string())]
        );
        assert_eq!(kinds("''"), vec![TokenKind::String(String::new())]);
    }

    #[test]
    fn test_unterminated_string() {
        let error = tokenize("$ a 'oops").expect_err("unterminated string should fail");
        assert!(matches!(error, LexError::UnterminatedString { position: 4, .. }));
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("//one\n/*two\nthree*/"),
            vec![
                TokenKind::SingleLineComment("one".to_string()),
                TokenKind::LineBreak,
                TokenKind::MultiLineComment(vec!["two".to_string(), "three".to_string()]),
            ]
        );
    }

    #[test]
    fn test_nested_comment_markers() {
        assert_eq!(
            kinds("// //one"),
            vec![TokenKind::SingleLineComment(" //one".to_string())]
        );
    }

    #[test]
    fn test_empty_multiline_comment_lines() {
        assert_eq!(
            kinds("/*\n\n\n\n*/"),
            vec![TokenKind::MultiLineComment(vec![String::new(); 5])]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let error = tokenize("/* never closed").expect_err("unterminated comment should fail");
        assert!(matches!(error, LexError::UnterminatedComment { position: 0, .. }));
    }

    #[test]
    fn test_tab_is_invalid() {
        let error = tokenize("a\tb").expect_err("tab should fail");
        assert!(matches!(
            error,
            LexError::UnexpectedCharacter {
                character: '\t',
                position: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("use 'x'").expect("input should lex");
        assert_eq!(tokens[0].span, Span::new(0, 4));
        assert_eq!(tokens[1].span, Span::new(4, 7));
    }
}
