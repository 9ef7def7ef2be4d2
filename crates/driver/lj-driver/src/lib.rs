//! Compilation driver and high-level APIs
//!
//! This crate runs the Lijs pipeline: lexing, parsing and lowering to ESTree.
//! Each stage is also usable on its own through its crate.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::CompileError;

use anyhow::{Context, Result};
use lj_estree::Program;
use lj_lower::{LowerWarning, Lowered};
use miette::{GraphicalReportHandler, GraphicalTheme};
use std::{fmt, fs, path::Path};

/// File extension of Lijs sources
pub const SOURCE_EXTENSION: &str = "lijs";

/// Whether `path` names a Lijs source file
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension == SOURCE_EXTENSION)
}

/// Result of compiling one source
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    /// The ESTree program
    pub program: Program,
    /// Declared and synthesized names, in order of introduction
    pub names: Vec<String>,
    /// Lowering warnings
    pub warnings: Vec<LowerWarning>,
}

impl Compilation {
    /// The program as compact ESTree JSON
    ///
    /// # Errors
    ///
    /// Fails only if a numeric literal is not finite.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.program)
    }

    /// The program as indented ESTree JSON
    ///
    /// # Errors
    ///
    /// Fails only if a numeric literal is not finite.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.program)
    }

    /// Renders every warning as a plain-text miette report
    ///
    /// # Errors
    ///
    /// Propagates formatter errors from the report handler.
    pub fn render_warnings(&self) -> Result<String, fmt::Error> {
        let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
        let mut out = String::new();
        for warning in &self.warnings {
            handler.render_report(&mut out, warning)?;
        }
        Ok(out)
    }
}

impl From<Lowered> for Compilation {
    fn from(lowered: Lowered) -> Self {
        Self {
            program: lowered.program,
            names: lowered.names,
            warnings: lowered.warnings,
        }
    }
}

/// Runs the pipeline with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: Config,
}

impl Compiler {
    /// Creates a compiler
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Compiles source text
    ///
    /// # Errors
    ///
    /// Returns the first lex or parse error.
    pub fn compile(&self, source: &str) -> Result<Compilation, CompileError> {
        let tokens = lj_lexer::tokenize(source)?;
        let program = lj_parser::parse(&tokens)?;
        Ok(lj_lower::lower_with(&program, &self.config.lowering).into())
    }

    /// Compiles a file
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or does not compile.
    pub fn compile_file(&self, path: &Path) -> Result<Compilation> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read source file: {}", path.display()))?;

        self.compile(&source)
            .with_context(|| format!("Failed to compile {}", path.display()))
    }
}

/// Compiles source text with the default configuration
///
/// # Errors
///
/// Returns the first lex or parse error.
pub fn compile(source: &str) -> Result<Compilation, CompileError> {
    Compiler::default().compile(source)
}
