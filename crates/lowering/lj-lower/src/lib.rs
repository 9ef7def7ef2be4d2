//! Lowering from the Lijs AST to ESTree
//!
//! This crate handles:
//! - Desugaring of loops, conditionals, object access and imports/exports
//! - Implicit returns from function bodies
//! - Temporary-name synthesis and hoisting
//!
//! Lowering never fails. Questionable input is lowered as written and reported
//! through [`LowerWarning`]s.

pub mod lower;
pub mod names;
pub mod options;
pub mod warning;

pub use lower::{IMPLICIT_RETURN_EXCLUSIONS, Lowered, LoweringContext, lower, lower_with};
pub use names::{NameOptionError, NameRegistry, RandomLength, TemporaryNames, TemporaryPrefix};
pub use options::LowerOptions;
pub use warning::LowerWarning;
