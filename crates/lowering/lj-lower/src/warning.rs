//! Lowering warnings
//!
//! Lowering never fails; questionable input is lowered anyway and reported here.

#![allow(unused_assignments, reason = "fields are read by the miette derive")]

use lj_syntax::NodeKind;
use miette::Diagnostic;
use thiserror::Error;

/// Non-fatal finding reported while lowering
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum LowerWarning {
    /// A declaration or control construct used where a value was expected
    #[error("{kind} used as a value")]
    #[diagnostic(
        code(lower::statement_in_expression),
        severity(Warning),
        help("move the {kind} onto its own line")
    )]
    StatementInExpression {
        /// Kind of the misplaced node
        kind: NodeKind,
    },
}
