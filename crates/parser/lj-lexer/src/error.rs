//! Lexer errors
//!
//! Each variant carries a byte position and a labelled span; the driver attaches
//! the source text when rendering.

#![allow(unused_assignments, reason = "fields are read by the miette derive")]

use lj_span::Span;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Error raised when no lexical rule matches the input
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum LexError {
    /// A character that starts no token, or a misplaced `.` in a number
    #[error("invalid character {character}")]
    #[diagnostic(code(lexer::invalid_character), help("`{character}` cannot appear here"))]
    UnexpectedCharacter {
        /// The offending character
        character: char,
        /// Byte offset of the character
        position: usize,
        /// Source location
        #[label("invalid character")]
        span: SourceSpan,
    },

    /// A `'` with no closing quote before the end of input
    #[error("unterminated string literal")]
    #[diagnostic(code(lexer::unterminated_string), help("close the string with `'`"))]
    UnterminatedString {
        /// Byte offset of the opening quote
        position: usize,
        /// Source location of the string so far
        #[label("string starts here")]
        span: SourceSpan,
    },

    /// A `/*` with no closing `*/` before the end of input
    #[error("unterminated block comment")]
    #[diagnostic(code(lexer::unterminated_comment), help("close the comment with `*/`"))]
    UnterminatedComment {
        /// Byte offset of the opening `/*`
        position: usize,
        /// Source location of the comment so far
        #[label("comment starts here")]
        span: SourceSpan,
    },
}

impl LexError {
    pub(crate) fn unexpected(character: char, position: usize) -> Self {
        Self::UnexpectedCharacter {
            character,
            position,
            span: Span::at(position, character.len_utf8()).into(),
        }
    }

    pub(crate) fn unterminated_string(position: usize, end: usize) -> Self {
        Self::UnterminatedString {
            position,
            span: Span::at(position, end - position).into(),
        }
    }

    pub(crate) fn unterminated_comment(position: usize, end: usize) -> Self {
        Self::UnterminatedComment {
            position,
            span: Span::at(position, end - position).into(),
        }
    }

    /// Byte offset where the error starts
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { position, .. }
            | Self::UnterminatedString { position, .. }
            | Self::UnterminatedComment { position, .. } => *position,
        }
    }
}
