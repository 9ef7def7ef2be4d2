//! Rich error reporting for the parser
//!
//! Errors carry the span of the offending token. Source text is attached by the
//! caller through [`miette::Report::with_source_code`].

#![allow(unused_assignments, reason = "fields are read by the miette derive")]

use lj_span::Span;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Parse error with rich diagnostic information
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ParseError {
    /// A construct's name was not an identifier
    #[error("{construct} name must be an identifier, found {found}")]
    #[diagnostic(code(parser::name_must_be_identifier))]
    NameMustBeIdentifier {
        /// Construct being parsed (e.g. "variable", "function")
        construct: &'static str,
        /// What was found
        found: String,
        /// Source location
        #[label("expected an identifier")]
        span: SourceSpan,
    },

    /// `$ a $ b 1`
    #[error("value cannot be assignment")]
    #[diagnostic(
        code(parser::assignment_value),
        help("assign the inner variable on its own line first")
    )]
    AssignmentValue {
        /// Location of the nested assignment
        #[label("nested assignment")]
        span: SourceSpan,
    },

    /// `use` followed by something other than a string
    #[error("use statement must use a string, found {found}")]
    #[diagnostic(code(parser::import_path), help("quote the module path: `use 'path'`"))]
    ImportPathNotString {
        /// What was found
        found: String,
        /// Source location
        #[label("expected a string")]
        span: SourceSpan,
    },

    /// `as` followed by something other than an identifier
    #[error("imports must be bound to an identifier, found {found}")]
    #[diagnostic(code(parser::import_binding))]
    ImportBindingNotIdentifier {
        /// What was found
        found: String,
        /// Source location
        #[label("expected an identifier")]
        span: SourceSpan,
    },

    /// `export` followed by something other than an identifier
    #[error("only identifiers can be exported, found {found}")]
    #[diagnostic(code(parser::export_name))]
    ExportNotIdentifier {
        /// What was found
        found: String,
        /// Source location
        #[label("expected an identifier")]
        span: SourceSpan,
    },

    /// `get`/`set` key that is neither an identifier nor a string
    #[error("object key must be an identifier or string, found {found}")]
    #[diagnostic(code(parser::object_key))]
    InvalidObjectKey {
        /// What was found
        found: String,
        /// Source location
        #[label("invalid key")]
        span: SourceSpan,
    },

    /// `?` without a check keyword after its left operand
    #[error("if statement must contain a check, found {found}")]
    #[diagnostic(
        code(parser::missing_check),
        help("use one of `is`, `kinda`, `contains` or `exists`")
    )]
    MissingCheck {
        /// What was found
        found: String,
        /// Source location
        #[label("expected a check")]
        span: SourceSpan,
    },

    /// Arithmetic call with more than two operands
    #[error("{operator} only supports 2 arguments, found {count}")]
    #[diagnostic(
        code(parser::too_many_operands),
        help("nest the calls: `({operator} a ({operator} b c))`")
    )]
    TooManyOperands {
        /// Reserved call name
        operator: &'static str,
        /// Number of arguments given
        count: usize,
        /// Location of the call
        #[label("too many operands")]
        span: SourceSpan,
    },

    /// Function parameter that is not an identifier
    #[error("function parameter must be an identifier, found {found}")]
    #[diagnostic(code(parser::parameter))]
    ParameterNotIdentifier {
        /// What was found
        found: String,
        /// Source location
        #[label("expected an identifier")]
        span: SourceSpan,
    },

    /// Missing expected token
    #[error("expected `{expected}`, found {found}")]
    #[diagnostic(code(parser::missing_token), help("try adding `{expected}` here"))]
    ExpectedToken {
        /// What was expected
        expected: &'static str,
        /// What was actually found
        found: String,
        /// Source location where it should be
        #[label("expected `{expected}` here")]
        span: SourceSpan,
    },

    /// Token that starts no construct at this position
    #[error("unexpected token {kind}")]
    #[diagnostic(code(parser::unexpected_token), help("this token is not valid here"))]
    UnexpectedToken {
        /// Description of the token
        kind: String,
        /// Source location
        #[label("unexpected token")]
        span: SourceSpan,
    },

    /// Input ended while a construct was incomplete
    #[error("unexpected end of input, expected {expected}")]
    #[diagnostic(code(parser::unexpected_end))]
    UnexpectedEnd {
        /// What the parser was waiting for
        expected: &'static str,
        /// End of the input
        #[label("input ends here")]
        span: SourceSpan,
    },

    /// A value position held only a line break or comment
    #[error("{construct} is missing a value")]
    #[diagnostic(code(parser::missing_value))]
    MissingValue {
        /// Construct being parsed
        construct: &'static str,
        /// Source location
        #[label("expected a value")]
        span: SourceSpan,
    },
}

impl ParseError {
    /// Span of the offending input
    #[must_use]
    pub fn span(&self) -> Span {
        let span = match self {
            Self::NameMustBeIdentifier { span, .. }
            | Self::AssignmentValue { span }
            | Self::ImportPathNotString { span, .. }
            | Self::ImportBindingNotIdentifier { span, .. }
            | Self::ExportNotIdentifier { span, .. }
            | Self::InvalidObjectKey { span, .. }
            | Self::MissingCheck { span, .. }
            | Self::TooManyOperands { span, .. }
            | Self::ParameterNotIdentifier { span, .. }
            | Self::ExpectedToken { span, .. }
            | Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEnd { span, .. }
            | Self::MissingValue { span, .. } => span,
        };
        Span::at(span.offset(), span.len())
    }
}
