//! Token and syntax tree types for Lijs
//!
//! The lexer produces [`Token`]s, the parser consumes them into a [`Program`]
//! built from [`Node`]s. Neither type outlives a single compilation.

pub mod ast;
pub mod token;

pub use ast::{ArithmeticOp, Check, CheckKind, Node, NodeKind, Program, root_segment};
pub use token::{Token, TokenKind};
