//! Compilation errors

#![allow(unused_assignments, reason = "fields are read by the miette derive")]

use lj_lexer::LexError;
use lj_parser::ParseError;
use miette::{Diagnostic, NamedSource, Report};
use thiserror::Error;

/// Error from any stage of the pipeline
#[derive(Error, Debug, Diagnostic)]
pub enum CompileError {
    /// The source could not be tokenized
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    /// The tokens do not form a program
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    /// The configuration could not be parsed
    #[error("invalid configuration: {0}")]
    #[diagnostic(code(driver::config), help("see the `[lowering]` section of lijs.toml"))]
    Config(#[from] toml::de::Error),
}

impl CompileError {
    /// Attaches the source text so the report can show labelled snippets
    #[must_use]
    pub fn report(self, name: impl AsRef<str>, source: impl Into<String>) -> Report {
        Report::new(self).with_source_code(NamedSource::new(name, source.into()))
    }
}
